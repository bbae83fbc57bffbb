use clap::Parser;
use std::process;
use terramino_bench::config::{Args, RunConfig};
use terramino_bench::runner;
use terramino_client::{Client, ClientConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("terramino_bench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::from(args);

    let client = Client::new(ClientConfig::new(config.target_base_url.clone())).unwrap_or_else(|e| {
        eprintln!("ERROR: {e}");
        process::exit(2);
    });

    info!(
        url = %config.target_base_url,
        duration_secs = config.duration_secs,
        concurrency = config.concurrency,
        out = %config.output_path.display(),
        "benchmark starting"
    );

    match runner::run(&config, client).await {
        Ok(result) => {
            println!("Wrote {}", config.output_path.display());
            println!("{}", runner::summary_line(&result));
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    }
}
