//! Shared types, error model, and configuration for fdrates.
//!
//! This crate is the foundation depended on by all other fdrates crates.
//! It provides:
//! - [`FdRatesError`] — the unified error type
//! - Domain types ([`Bank`], [`RawRow`], [`RateRow`], [`IngestSummary`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DatabaseConfig, FetchConfig, SourceOverride, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{FdRatesError, Result};
pub use types::{AcquireMode, Bank, IngestSummary, RateRow, RawRow};
