use serde_json::json;
use std::time::Duration;
use terramino_client::{has_game_id, Client, ClientConfig};
use terramino_common::{BenchError, Classification, REQUEST_TIMEOUT};
use terramino_mock_server::{MockBehavior, Server, ServerConfig};

fn client_for(url: &str) -> Client {
    Client::new(ClientConfig::new(url)).expect("client builds")
}

// Port that was free a moment ago; nothing is listening on it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Start a mock backend that answers every request only after `delay`.
async fn start_slow_server(delay: Duration) -> String {
    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
    let server = Server::new(ServerConfig {
        address: "127.0.0.1:0".parse().unwrap(),
        behavior: MockBehavior::Ok,
        delay: Some(delay),
    });
    tokio::spawn(async move {
        server.run(ready_tx).await.expect("server failed");
    });
    let addr = tokio::time::timeout(Duration::from_secs(10), ready_rx)
        .await
        .expect("server did not start in time")
        .expect("ready signal dropped");
    format!("http://{addr}")
}

#[test]
fn test_client_config_default_timeout() {
    let config = ClientConfig::new("http://localhost:8081");
    assert_eq!(config.base_url, "http://localhost:8081");
    assert_eq!(config.timeout, REQUEST_TIMEOUT);
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn test_new_game_url() {
    let client = client_for("http://localhost:8081");
    assert_eq!(client.new_game_url(), "http://localhost:8081/api/new-game");
}

#[test]
fn test_new_game_url_strips_trailing_slashes() {
    assert_eq!(client_for("http://localhost:8081/").new_game_url(), "http://localhost:8081/api/new-game");
    assert_eq!(client_for("http://example.com:3000//").new_game_url(), "http://example.com:3000/api/new-game");
}

#[test]
fn test_has_game_id_accepts_each_key() {
    assert!(has_game_id(&json!({"game_id": 1})));
    assert!(has_game_id(&json!({"id": "abc"})));
    assert!(has_game_id(&json!({"gameId": null})));
    assert!(has_game_id(&json!({"game_id": 1, "score": 0})));
}

#[test]
fn test_has_game_id_rejects_other_shapes() {
    assert!(!has_game_id(&json!({})));
    assert!(!has_game_id(&json!({"game": 1, "ID": 2})));
    assert!(!has_game_id(&json!(["game_id"])));
    assert!(!has_game_id(&json!("game_id")));
    assert!(!has_game_id(&json!(42)));
}

#[tokio::test]
async fn test_new_game_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/new-game")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"game_id": 1}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let body = client.new_game().await.expect("new_game failed");
    assert_eq!(body, json!({"game_id": 1}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_new_game_non_200_is_http_status() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/api/new-game").with_status(503).create_async().await;

    let client = client_for(&server.url());
    assert_eq!(client.new_game().await, Err(BenchError::HttpStatus(503)));
}

#[tokio::test]
async fn test_new_game_other_2xx_is_http_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/new-game")
        .with_status(201)
        .with_body(r#"{"game_id": 1}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    assert_eq!(client.new_game().await, Err(BenchError::HttpStatus(201)));
}

#[tokio::test]
async fn test_new_game_unparsable_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/new-game")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client_for(&server.url());
    assert!(matches!(client.new_game().await, Err(BenchError::InvalidBody(_))));
}

#[tokio::test]
async fn test_new_game_missing_identifier() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/new-game")
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    assert_eq!(client.new_game().await, Err(BenchError::MissingGameId));
}

#[tokio::test]
async fn test_new_game_connection_refused_is_network_error() {
    let client = client_for(&closed_port_url());
    assert!(matches!(client.new_game().await, Err(BenchError::NetworkError(_))));
}

#[tokio::test]
async fn test_execute_classifies_success_and_times_request() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/new-game")
        .with_status(200)
        .with_body(r#"{"gameId": "g-1"}"#)
        .create_async()
        .await;

    let sample = client_for(&server.url()).execute().await;
    assert_eq!(sample.classification, Classification::Success);
    assert!(sample.elapsed_ms > 0.0);
}

#[tokio::test]
async fn test_execute_classifies_every_failure_as_error() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/api/new-game").with_status(500).create_async().await;
    let sample = client_for(&server.url()).execute().await;
    assert_eq!(sample.classification, Classification::Error);
    assert!(sample.elapsed_ms >= 0.0);

    let sample = client_for(&closed_port_url()).execute().await;
    assert_eq!(sample.classification, Classification::Error);
    assert!(sample.elapsed_ms >= 0.0);
}

#[tokio::test]
async fn test_slow_response_times_out_as_network_error() {
    let url = start_slow_server(Duration::from_millis(500)).await;
    let client = Client::new(ClientConfig { base_url: url, timeout: Duration::from_millis(100) }).unwrap();

    assert!(matches!(client.new_game().await, Err(BenchError::NetworkError(_))));

    let sample = client.execute().await;
    assert_eq!(sample.classification, Classification::Error);
    assert!(sample.elapsed_ms >= 100.0);
    assert!(sample.elapsed_ms < 500.0, "request was not cut off: {}ms", sample.elapsed_ms);
}

#[tokio::test]
async fn test_slow_response_within_timeout_succeeds() {
    let url = start_slow_server(Duration::from_millis(50)).await;
    let client = Client::new(ClientConfig { base_url: url, timeout: Duration::from_secs(2) }).unwrap();

    let sample = client.execute().await;
    assert_eq!(sample.classification, Classification::Success);
    assert!(sample.elapsed_ms >= 50.0);
}
