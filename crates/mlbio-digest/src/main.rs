//! ML x Biology Digest - Entry Point
//!
//! Runs one digest and exits. Configuration comes from the environment (and a
//! `.env` file if present); there are no command-line flags.

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mlbio_digest::{Config, Digest, DigestError, delivery::DeliveryReport};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

async fn run() -> anyhow::Result<DeliveryReport> {
    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let digest = Digest::new(&config).context("failed to initialise HTTP clients")?;
    let report = digest.run().await?;
    Ok(report)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let json_logs = std::env::var("DIGEST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    init_tracing(json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting ML x biology digest");

    match run().await {
        Ok(report) => {
            println!("Posted {} items to Slack.", report.items);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Digest run failed: {e:#}");
            let code = e.downcast_ref::<DigestError>().map_or(1, DigestError::exit_code);
            ExitCode::from(code)
        }
    }
}
