//! CLI module for rolecolor
//!
//! Provides the command-line interface with:
//!
//! - Human and JSON output formats
//! - Configuration file support
//! - JSON export of analyses and per-sentence scores
//!
//! ## Usage
//!
//! ```bash
//! # Analyze a resume
//! rolecolor analyze resume.txt
//!
//! # JSON output for scripting
//! rolecolor analyze resume.txt --json | jq '.scoring.dominant_role'
//!
//! # Read from stdin with the offline model
//! cat profile.md | rolecolor analyze --hashing-model
//!
//! # Configuration management
//! rolecolor config --list
//! rolecolor config --set scoring.temperature=1.5
//! ```
//!
//! ## Module Structure
//!
//! - `commands`: CLI command definitions using clap
//! - `output`: Output formatters for different formats
//! - `config`: Configuration file handling
//! - `export`: JSON files written by `analyze`

pub mod commands;
pub mod config;
pub mod export;
pub mod output;

// Re-exports for convenience
pub use commands::{Cli, CliOutputFormat, Commands};
pub use config::{ConfigError, ModelSettings, OutputConfig, RoleColorConfig, ScoringSettings};
pub use export::{export_sentence_scores, save_analysis, ExportError};
pub use output::{create_formatter, OutputFormat, OutputFormatter};
