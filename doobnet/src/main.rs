//! # doobnet
//!
//! Builds the value and drift networks from a JSON settings bundle and
//! evaluates every time step on synthetic inputs. Useful for checking that a
//! configuration produces the shapes a filtering pipeline expects before
//! wiring it into a trainer.

use anyhow::Result;
use clap::Parser;
use doobnet::app::{self, Args};
use tracing::Level;

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let summaries = app::run(&args)?;
    tracing::info!("Evaluated {} steps.", summaries.len());
    Ok(())
}
