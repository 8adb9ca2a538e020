use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Analyze financial documents with the Gemini API: 8 Pillars scoring plus
/// a DCF valuation, returned as structured JSON and rendered in the
/// terminal.
#[derive(Debug, Parser)]
#[command(name = "finlens", version, about)]
pub struct Cli {
    /// Verbose logging (debug level)
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors; also disables the progress spinner
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one or more financial documents
    Analyze(AnalyzeArgs),

    /// Manage the Gemini API key in the OS keychain
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Inspect previously recorded analyses
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Documents to analyze (PDF, text, ...)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Primary model, e.g. gemini-2.0-flash
    #[arg(long)]
    pub model: Option<String>,

    /// Model to fall back to on quota exhaustion
    #[arg(long)]
    pub fallback_model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Do not declare the web-search tool
    #[arg(long)]
    pub no_search: bool,

    /// Print the decoded report as pretty JSON instead of the formatted view
    #[arg(long)]
    pub raw: bool,

    /// Do not record this analysis in the history database
    #[arg(long)]
    pub no_history: bool,

    /// API key for this run (overrides env, keychain, and config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum KeyAction {
    /// Store an API key (reads from stdin when not given as an argument)
    Set { key: Option<String> },
    /// Print the stored key, masked
    Show,
    /// Remove the stored key
    Delete,
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List recorded analyses, newest first
    List,
    /// Print one recorded analysis as JSON
    Show { id: i64 },
    /// Delete all recorded analyses
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (API key redacted)
    Show,
}
