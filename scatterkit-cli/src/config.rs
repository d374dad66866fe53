//! Command-line configuration

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Plan scatterplot passes from JSON and print the plans
#[derive(Parser, Clone, Debug)]
#[command(name = "scatterkit-cli")]
#[command(about = "Runs chart data through the scatterplot planner and prints each pass as JSON")]
pub struct Config {
    /// Chart configuration (JSON, camelCase keys). Defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data file for one pass (JSON array of points). Repeat for more passes
    #[arg(short, long = "data", required = true)]
    pub data: Vec<PathBuf>,

    /// Clock distance between consecutive passes in milliseconds
    #[arg(long, default_value = "1000")]
    pub frame_interval_ms: u64,

    /// Write the plans here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Match points across passes by this field instead of position
    #[arg(long, value_enum)]
    pub key_field: Option<KeyField>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyField {
    Type,
}
