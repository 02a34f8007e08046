mod args;
mod error;
mod runfile;
mod sink;

use args::InscriberCli;
use clap::Parser;
use inscriber_core::{
    account::AccountSet, client::RpcSubmissionClient, controller::RunController,
    error::ValidationError,
};
use sink::ConsoleSink;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let settings = InscriberCli::parse().resolve()?;

    let accounts = AccountSet::from_raw_keys(&settings.raw_keys);
    if accounts.len() < settings.raw_keys.len() {
        warn!(
            skipped = settings.raw_keys.len() - accounts.len(),
            "malformed signing keys were skipped"
        );
    }
    let wallet = accounts.wallet().ok_or(ValidationError::NoAccounts)?;
    let client = RpcSubmissionClient::connect(&settings.config.endpoint, wallet).await?;

    let controller = RunController::new();
    controller.start(settings.config, accounts, client, ConsoleSink::new())?;

    match settings.duration {
        Some(limit) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("CTRL-C received; stopping after the current batch settles...");
                }
                _ = tokio::time::sleep(limit) => {
                    info!("time limit reached; stopping after the current batch settles...");
                }
            }
        }
        None => {
            tokio::signal::ctrl_c().await?;
            info!("CTRL-C received; stopping after the current batch settles...");
        }
    }

    let summary = controller.stop().await;
    info!(
        ticks = summary.ticks,
        successes = summary.successes,
        "run stopped"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
