//! fdrates CLI — fixed-deposit rate scraper.
//!
//! Scrapes bank rate tables, normalizes tenor text into day ranges, and
//! persists each bank's current rate set to a local database.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
