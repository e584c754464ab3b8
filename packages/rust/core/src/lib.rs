//! Pipeline orchestration for fdrates.
//!
//! Ties the acquire, extract, and storage crates together into the
//! per-source scrape pipeline consumed by the CLI.

pub mod pipeline;

pub use pipeline::{PipelineReport, run_source};
