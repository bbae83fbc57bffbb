use clap::Parser;
use std::net::SocketAddr;
use std::process;
use std::time::Duration;
use terramino_mock_server::{MockBehavior, Server, ServerConfig};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "terramino-mock-server", about = "Stand-in Terramino backend for benchmark dry runs")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8081")]
    address: SocketAddr,

    /// Response behavior: ok | not-json | missing-id | status-<code>
    #[arg(long, default_value = "ok")]
    behavior: String,

    /// Artificial latency per request (milliseconds)
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("terramino_mock_server=info")),
        )
        .init();

    let behavior = MockBehavior::from_name(&args.behavior).unwrap_or_else(|| {
        eprintln!(
            "Unknown behavior {:?}. Valid values: ok, not-json, missing-id, status-<code>",
            args.behavior
        );
        process::exit(2);
    });

    let config = ServerConfig {
        address: args.address,
        behavior,
        delay: args.delay_ms.map(Duration::from_millis),
    };

    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        if let Ok(addr) = ready_rx.await {
            println!("Listening on {}", addr);
        }
    });

    Server::new(config).run(ready_tx).await?;
    Ok(())
}
