use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use terramino_common::{BenchError, Result};
use tracing::info;

/// Column order of the results CSV.
pub const CSV_HEADER: &str = "timestamp,target,endpoint,concurrency,duration_s,total_requests,success,errors,rps,p50_ms,p95_ms,p99_ms,mean_ms";

/// Summary of one finished run; becomes one CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub timestamp: DateTime<Utc>,
    pub target: String,
    pub endpoint: String,
    pub concurrency: usize,
    pub duration_s: u64,
    pub total_requests: u64,
    pub success: u64,
    pub errors: u64,
    pub rps: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub mean_ms: f64,
}

impl AggregateResult {
    /// Render as one CSV line (no trailing newline).
    pub fn to_csv_row(&self) -> String {
        [
            self.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            escape_csv(&self.target),
            escape_csv(&self.endpoint),
            self.concurrency.to_string(),
            self.duration_s.to_string(),
            self.total_requests.to_string(),
            self.success.to_string(),
            self.errors.to_string(),
            format!("{:.2}", self.rps),
            format!("{:.2}", self.p50_ms),
            format!("{:.2}", self.p95_ms),
            format!("{:.2}", self.p99_ms),
            format!("{:.2}", self.mean_ms),
        ]
        .join(",")
    }
}

/// Append `result` to the CSV at `path`, creating the file (with header) and any
/// missing parent directories. Existing content is never rewritten.
///
/// Returns `true` if the header was written by this call.
pub fn append_result(path: &Path, result: &AggregateResult) -> Result<bool> {
    let write_err = |e: std::io::Error| BenchError::ReportWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    // Decide on the header before anything is written, then emit header and
    // row in a single write.
    let need_header = !path.exists();
    let mut buf = String::new();
    if need_header {
        buf.push_str(CSV_HEADER);
        buf.push('\n');
    }
    buf.push_str(&result.to_csv_row());
    buf.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(write_err)?;
    file.write_all(buf.as_bytes()).map_err(write_err)?;

    info!(path = %path.display(), header = need_header, "appended result row");
    Ok(need_header)
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
