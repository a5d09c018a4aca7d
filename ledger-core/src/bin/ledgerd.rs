//! Ledger daemon binary
//!
//! Hosts a ledger instance behind the actor facade. The crowdfunding web
//! layer (routes, persistence, wallet flows) connects from outside this
//! crate; until then this binary keeps the actor alive and exposes the
//! configured metrics registry for scraping.

use anyhow::Context;
use ledger_core::{spawn_ledger_actor, Config, Ledger, Metrics};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting FundChain ledger daemon");

    // Load configuration
    let config = Config::from_env().context("loading configuration")?;
    tracing::info!(
        difficulty = config.mining.difficulty,
        reward = %config.mining.reward,
        "ledger configured"
    );

    let metrics = Metrics::new().context("registering metrics")?;
    let ledger = Arc::new(Ledger::new(&config).with_metrics(metrics));
    let handle = spawn_ledger_actor(Arc::clone(&ledger));

    // TODO: serve the web API against `handle` once the HTTP layer lands
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down ledger daemon");
    handle.shutdown().await?;
    Ok(())
}
