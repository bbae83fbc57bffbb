use chrono::{DateTime, Utc};
use std::sync::Arc;
use terramino_client::Client;
use terramino_common::{Result, NEW_GAME_ENDPOINT};

use crate::config::RunConfig;
use crate::metrics::RunAggregate;
use crate::report::{self, AggregateResult};
use crate::worker;

/// Run the benchmark described by `config`, append its row to the output CSV
/// and return the recorded result.
pub async fn run(config: &RunConfig, client: Client) -> Result<AggregateResult> {
    let aggregate = worker::run(Arc::new(client), config.concurrency, config.duration()).await;
    let result = summarize(config, &aggregate, Utc::now());
    report::append_result(&config.output_path, &result)?;
    Ok(result)
}

/// Fold a finished run into its CSV-ready summary. Missing percentiles become 0.
pub fn summarize(
    config: &RunConfig,
    aggregate: &RunAggregate,
    timestamp: DateTime<Utc>,
) -> AggregateResult {
    AggregateResult {
        timestamp,
        target: config.target_base_url.clone(),
        endpoint: NEW_GAME_ENDPOINT.to_string(),
        concurrency: config.concurrency,
        duration_s: config.duration_secs,
        total_requests: aggregate.total_attempted,
        success: aggregate.success_count,
        errors: aggregate.error_count,
        rps: requests_per_second(aggregate.success_count, config.duration_secs),
        p50_ms: aggregate.p50_ms().unwrap_or(0.0),
        p95_ms: aggregate.p95_ms().unwrap_or(0.0),
        p99_ms: aggregate.p99_ms().unwrap_or(0.0),
        mean_ms: aggregate.mean_ms(),
    }
}

/// Successful requests per configured second.
///
/// The denominator is the configured duration, not measured wall time: workers
/// share a deadline but may overrun it by one in-flight request each.
pub fn requests_per_second(success: u64, duration_secs: u64) -> f64 {
    if duration_secs == 0 {
        return 0.0;
    }
    success as f64 / duration_secs as f64
}

/// One-line human summary, e.g. `new-game: ok=120 err=3 rps=8.00 p95=12.40ms`.
pub fn summary_line(result: &AggregateResult) -> String {
    format!(
        "{}: ok={} err={} rps={:.2} p95={:.2}ms",
        result.endpoint, result.success, result.errors, result.rps, result.p95_ms
    )
}
