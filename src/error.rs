//! Error kinds raised while planning a chart.

use thiserror::Error;

use crate::core::AxisRole;

/// Everything that can stop a planning pass.
///
/// These are deterministic configuration or input errors. They surface from
/// the pass that hit them and nothing from that pass is applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("invalid domain on {axis} axis: {reason}")]
    InvalidDomain { axis: AxisRole, reason: String },

    #[error("invalid margin: inner {dimension} would be {value}")]
    InvalidMargin { dimension: &'static str, value: f64 },

    #[error("unknown axis type `{0}` (expected linear, ordinal or time)")]
    UnknownAxisType(String),

    #[error("cannot parse `{value}` with date pattern `{pattern}`")]
    DateParse { value: String, pattern: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlotError {
    pub(crate) fn domain(axis: AxisRole, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            axis,
            reason: reason.into(),
        }
    }
}
