//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use url::Url;

use fdrates_acquire::PageAcquirer;
use fdrates_core::run_source;
use fdrates_extract::{BankSource, builtin_sources, find_source};
use fdrates_shared::{AcquireMode, AppConfig, init_config, load_config, load_config_from};
use fdrates_storage::Storage;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// fdrates — scrape fixed-deposit rates into a local database.
#[derive(Parser)]
#[command(
    name = "fdrates",
    version,
    about = "Scrape bank fixed-deposit rate tables into a local database.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path (defaults to ~/.fdrates/fdrates.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape the named sources (all sources when none are named).
    Run {
        /// Source names to scrape, e.g. "kotak" or "sbi".
        sources: Vec<String>,
    },

    /// Show stored banks and rates.
    Show {
        /// Bank name to show rates for (lists banks when omitted).
        #[arg(long)]
        bank: Option<String>,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List built-in sources.
    Sources,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Run { sources } => run_scrape(&config, &sources).await,
        Command::Show { bank, json } => show(&config, bank.as_deref(), json).await,
        Command::Sources => list_sources(&config),
        Command::Config { action } => match action {
            ConfigAction::Init => {
                let path = init_config()?;
                println!("wrote {}", path.display());
                Ok(())
            }
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        },
    }
}

/// Scrape the selected sources sequentially and print a per-source summary.
async fn run_scrape(config: &AppConfig, names: &[String]) -> Result<()> {
    let selected: Vec<Box<dyn BankSource>> = if names.is_empty() {
        builtin_sources()
    } else {
        names
            .iter()
            .map(|n| {
                find_source(n).ok_or_else(|| {
                    eyre!("unknown source '{n}' (available: {})", available_names())
                })
            })
            .collect::<Result<_>>()?
    };

    let acquirer = PageAcquirer::new(&config.fetch)?;
    let storage = Storage::open(&config.database).await?;

    let mut total_inserted = 0usize;
    for source in &selected {
        let url = source_url(config, source.as_ref())?;
        info!(source = source.name(), %url, "scraping source");

        let report = run_source(source.as_ref(), &url, &acquirer, &storage).await?;
        total_inserted += report.rows_inserted;

        println!(
            "{}: {} — {} rows extracted, {} skipped, {} inserted ({:.1?})",
            report.source,
            report.bank,
            report.rows_extracted,
            report.rows_skipped,
            report.rows_inserted,
            report.elapsed,
        );
    }

    println!(
        "{} source(s) scraped, {} rows inserted",
        selected.len(),
        total_inserted
    );
    Ok(())
}

/// Print stored banks, or the rate set for one bank.
async fn show(config: &AppConfig, bank: Option<&str>, json: bool) -> Result<()> {
    let storage = Storage::open(&config.database).await?;

    match bank {
        Some(name) => {
            let Some((bank, rates)) = storage.rates_for_bank(name).await? else {
                return Err(eyre!("no stored rates for bank '{name}'"));
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&rates)?);
            } else {
                println!("{} (bank id {}):", bank.name, bank.id);
                for rate in &rates {
                    println!(
                        "  {:>5} - {:>5} days  {:.2}%",
                        fmt_bound(rate.min_days),
                        fmt_bound(rate.max_days),
                        rate.interest_rate
                    );
                }
            }
        }
        None => {
            let banks = storage.list_banks().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&banks)?);
            } else if banks.is_empty() {
                println!("no banks stored yet; try `fdrates run`");
            } else {
                for bank in &banks {
                    println!("{}  {}", bank.id, bank.name);
                }
            }
        }
    }
    Ok(())
}

/// Print the built-in source registry.
fn list_sources(config: &AppConfig) -> Result<()> {
    for source in builtin_sources() {
        let url = config
            .url_override(source.name())
            .unwrap_or_else(|| source.default_url());
        let mode = match source.acquire_mode() {
            AcquireMode::Immediate => "static".to_string(),
            AcquireMode::WaitFor { selector } => format!("rendered (waits for {selector})"),
        };
        println!("{}: {} [{}]\n  {}", source.name(), source.bank_name(), mode, url);
    }
    Ok(())
}

/// Resolve the URL to scrape for a source: config override, else built-in.
fn source_url(config: &AppConfig, source: &dyn BankSource) -> Result<Url> {
    let raw = config
        .url_override(source.name())
        .unwrap_or_else(|| source.default_url());
    Url::parse(raw).map_err(|e| eyre!("invalid URL for source '{}': {e}", source.name()))
}

fn available_names() -> String {
    builtin_sources()
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_bound(bound: Option<u32>) -> String {
    match bound {
        Some(days) => days.to_string(),
        None => "?".into(),
    }
}
