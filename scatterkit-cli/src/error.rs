//! Error types for the CLI

use std::path::PathBuf;

use error_stack::Report;
use scatterkit::PlotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Full engine report, rendered with its attachments.
    #[error("planning failed\n{0}")]
    Plan(String),
}

impl From<Report<PlotError>> for CliError {
    fn from(report: Report<PlotError>) -> Self {
        CliError::Plan(format!("{report:?}"))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
