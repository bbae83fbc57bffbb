use std::sync::{Mutex, PoisonError};
use terramino_common::Classification;

/// Counters and latencies accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunAggregate {
    pub total_attempted: u64,
    pub success_count: u64,
    pub error_count: u64,
    /// One entry per attempted request, in recording order (unsorted).
    pub latencies_ms: Vec<f64>,
}

impl RunAggregate {
    pub fn p50_ms(&self) -> Option<f64> {
        percentile(&self.latencies_ms, 50.0)
    }

    pub fn p95_ms(&self) -> Option<f64> {
        percentile(&self.latencies_ms, 95.0)
    }

    pub fn p99_ms(&self) -> Option<f64> {
        percentile(&self.latencies_ms, 99.0)
    }

    pub fn mean_ms(&self) -> f64 {
        mean(&self.latencies_ms)
    }
}

/// Shared sink every worker records into.
///
/// Counters and the latency list sit behind one lock so a reader never sees a
/// latency without its matching count.
#[derive(Debug, Default)]
pub struct LatencyAggregator {
    inner: Mutex<RunAggregate>,
}

impl LatencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempted request: bumps `total_attempted`, exactly one of
    /// the success/error counters, and appends the latency.
    pub fn record(&self, elapsed_ms: f64, classification: Classification) {
        // The critical section cannot panic halfway, so a poisoned lock still
        // guards consistent data.
        let mut agg = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        agg.total_attempted += 1;
        match classification {
            Classification::Success => agg.success_count += 1,
            Classification::Error => agg.error_count += 1,
        }
        agg.latencies_ms.push(elapsed_ms);
    }

    /// Consistent copy of everything recorded so far.
    pub fn snapshot(&self) -> RunAggregate {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Linear-interpolation percentile of `samples` (any order), `p` in `[0, 100]`.
///
/// With the samples sorted ascending and `k = (n - 1) * p / 100`, returns
/// `s[k]` when `k` is integral and otherwise interpolates between
/// `s[floor(k)]` and `s[ceil(k)]`. Returns `None` for an empty slice or a `p`
/// outside `[0, 100]`.
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let k = (sorted.len() - 1) as f64 * (p / 100.0);
    let f = k.floor();
    let c = k.ceil();
    if f == c {
        return Some(sorted[k as usize]);
    }
    let lower = sorted[f as usize] * (c - k);
    let upper = sorted[c as usize] * (k - f);
    Some(lower + upper)
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}
