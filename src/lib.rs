//! Geometry and reconciliation engine for 2-D scatterplots.
//!
//! Given a [`ChartConfig`](config::ChartConfig) and a slice of
//! [`DataPoint`](core::DataPoint)s, a [`ScatterplotChart`](chart::ScatterplotChart)
//! plans one pass: margins, value→pixel scales, axis layout, per-mark
//! radius and color, and the enter / update / exit diff against the marks
//! bound by the previous pass. Drawing is left to the caller.
//!
//! ```
//! use std::time::Duration;
//! use scatterkit::prelude::*;
//!
//! let mut chart = scatterplot().axes(true).into_chart()?;
//! let data = [DataPoint::new(1.0, 2.0), DataPoint::new(3.0, 5.0)];
//! let plan = chart.update(&data, Duration::ZERO)?;
//! assert_eq!(plan.reconciliation.enter.len(), 2);
//! # Ok::<(), error_stack::Report<scatterkit::PlotError>>(())
//! ```

pub mod axis;
pub mod chart;
pub mod config;
pub mod core;
pub mod dates;
pub mod error;
pub mod layout;
pub mod palette;
pub mod radius;
pub mod reconcile;
pub mod scale;
pub mod transition;

pub use error::PlotError;

pub type Result<T> = std::result::Result<T, error_stack::Report<PlotError>>;

pub mod prelude {
    pub use crate::axis::*;
    pub use crate::chart::*;
    pub use crate::config::*;
    pub use crate::core::*;
    pub use crate::dates::{DateParserCache, DatePattern};
    pub use crate::error::PlotError;
    pub use crate::layout::*;
    pub use crate::palette::*;
    pub use crate::radius::*;
    pub use crate::reconcile::*;
    pub use crate::scale::{Scale, ScaleBuilder, ScaleKind, Tick};
    pub use crate::transition::*;
}
