//! CLI command definitions for rolecolor
//!
//! Defines all CLI commands and arguments using clap derive macros.
//!
//! ## Commands
//!
//! - `analyze` - Score a document against the role taxonomy
//! - `roles` - List the active roles
//! - `config` - Show or modify configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

// =============================================================================
// Main CLI
// =============================================================================

/// rolecolor - Behavioral role profiling for professional documents
#[derive(Parser, Debug)]
#[command(name = "rolecolor")]
#[command(about = "Behavioral role profiling for professional documents", long_about = None)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// =============================================================================
// Commands
// =============================================================================

/// Output format (CLI compatible)
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliOutputFormat {
    /// Human-readable report
    Human,
    /// JSON for scripting
    Json,
}

impl From<CliOutputFormat> for super::output::OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Human => super::output::OutputFormat::Human,
            CliOutputFormat::Json => super::output::OutputFormat::Json,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a document against the role taxonomy
    Analyze {
        /// Document to analyze (reads stdin when omitted or "-")
        file: Option<PathBuf>,

        /// Output format (defaults to config setting)
        #[arg(short, long, value_enum)]
        format: Option<CliOutputFormat>,

        /// Output as JSON (shorthand for --format json)
        #[arg(long)]
        json: bool,

        /// Include the per-sentence breakdown
        #[arg(long)]
        sentences: bool,

        /// Save the full analysis as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export per-sentence scores as JSON to this path
        #[arg(long)]
        export_sentences: Option<PathBuf>,

        /// Use the offline hashing model (no download, lexical overlap only)
        #[arg(long)]
        hashing_model: bool,

        /// Model2Vec model id or local path (defaults to config setting)
        #[arg(long)]
        model: Option<String>,

        /// Softmax temperature (defaults to config setting)
        #[arg(long)]
        temperature: Option<f64>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List the active roles
    Roles {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or modify configuration
    Config {
        /// Get a configuration value (e.g., scoring.temperature)
        #[arg(long)]
        get: Option<String>,

        /// Set a configuration value (e.g., scoring.temperature=1.5)
        #[arg(long)]
        set: Option<String>,

        /// List all configuration values
        #[arg(long)]
        list: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,

        /// Show configuration file path
        #[arg(long)]
        path: bool,
    },
}

// =============================================================================
// Tests
// =============================================================================
