//! CLI argument parsing for Arbol

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for process-tree reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable fixed-width table (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "arbol")]
#[command(version)]
#[command(about = "Process-tree profiler for strace logs", long_about = None)]
pub struct Cli {
    /// Trace file to read (standard input when omitted)
    pub file: Option<PathBuf>,

    /// Hide processes whose total time does not exceed this many seconds
    #[arg(
        short = 't',
        long = "threshold",
        value_name = "SECONDS",
        default_value = "0.2"
    )]
    pub threshold: f64,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
