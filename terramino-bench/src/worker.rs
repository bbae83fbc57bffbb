use std::sync::Arc;
use std::time::{Duration, Instant};
use terramino_client::Client;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::metrics::{LatencyAggregator, RunAggregate};

/// Upper bound on a run when the requested duration overflows the clock.
pub const MAX_RUN_DURATION: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Hammer the new-game endpoint with `concurrency` workers until `duration` has passed.
///
/// The workers are tokio tasks spread over the runtime's worker threads. Every
/// worker shares one deadline fixed before the first spawn and checks it only
/// before starting a request, so in-flight requests always complete. Returns
/// once every worker has exited.
pub async fn run(client: Arc<Client>, concurrency: usize, duration: Duration) -> RunAggregate {
    let aggregator = Arc::new(LatencyAggregator::new());
    let deadline = deadline_after(Instant::now(), duration);

    info!(concurrency, duration_secs = duration.as_secs_f64(), "starting workers");

    let mut workers = JoinSet::new();
    for worker_id in 0..concurrency {
        let client = Arc::clone(&client);
        let aggregator = Arc::clone(&aggregator);
        workers.spawn(worker_loop(worker_id, client, aggregator, deadline));
    }

    let mut joined = 0usize;
    while let Some(result) = workers.join_next().await {
        match result {
            Ok(iterations) => {
                joined += 1;
                debug!(iterations, "worker finished");
            }
            Err(e) => warn!(error = %e, "worker task did not complete"),
        }
    }

    let aggregate = aggregator.snapshot();
    info!(
        workers = joined,
        total = aggregate.total_attempted,
        success = aggregate.success_count,
        errors = aggregate.error_count,
        "workers finished"
    );
    aggregate
}

/// `start + duration`, clamped to [`MAX_RUN_DURATION`] when that overflows `Instant`.
pub fn deadline_after(start: Instant, duration: Duration) -> Instant {
    start
        .checked_add(duration)
        .or_else(|| start.checked_add(MAX_RUN_DURATION))
        .unwrap_or(start)
}

async fn worker_loop(
    worker_id: usize,
    client: Arc<Client>,
    aggregator: Arc<LatencyAggregator>,
    deadline: Instant,
) -> u64 {
    let mut iterations = 0u64;
    while Instant::now() < deadline {
        let sample = client.execute().await;
        aggregator.record(sample.elapsed_ms, sample.classification);
        iterations += 1;
    }
    debug!(worker_id, iterations, "deadline reached");
    iterations
}
