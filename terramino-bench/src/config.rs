use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TARGET: &str = "http://localhost:8081";
pub const DEFAULT_OUT: &str = "reports/benchmarks/game_results.csv";

#[derive(Parser, Debug)]
#[command(name = "terramino-bench", about = "Terramino new-game load benchmark")]
pub struct Args {
    /// Base URL of the backend (or the frontend proxy)
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// How long to run (seconds)
    #[arg(long, env = "DURATION", default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: u64,

    /// Number of concurrent workers
    #[arg(long, env = "CONCURRENCY", default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: u64,

    /// CSV file the result row is appended to
    #[arg(long, env = "OUT", default_value = DEFAULT_OUT)]
    pub out: PathBuf,
}

/// Settings for one benchmark run. Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Backend base URL without trailing slash.
    pub target_base_url: String,
    pub duration_secs: u64,
    pub concurrency: usize,
    pub output_path: PathBuf,
}

impl RunConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            target_base_url: args.target.trim_end_matches('/').to_string(),
            duration_secs: args.duration,
            concurrency: args.concurrency as usize,
            output_path: args.out,
        }
    }
}
