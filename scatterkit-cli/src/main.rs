//! scatterkit command-line runner
//!
//! Feeds one or more data files through a single chart instance and prints
//! the resulting plans as a JSON array. Logs go to stderr.

mod config;
mod error;
mod runner;

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scatterkit=info,scatterkit_cli=info".into()),
        )
        .init();

    let config = Config::parse();
    info!(passes = config.data.len(), "starting scatterkit-cli");

    let chart = runner::load_config(config.config.as_deref())?;
    let passes = runner::load_passes(&config.data)?;
    let plans = runner::plan_passes(
        chart,
        &passes,
        Duration::from_millis(config.frame_interval_ms),
        config.key_field,
    )?;
    runner::write_plans(&plans, config.output.as_deref(), config.pretty)?;
    Ok(())
}
