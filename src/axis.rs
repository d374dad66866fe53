//! Axis layout: orientation, tick count, tick size and resolved ticks.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::ChartConfig;
use crate::core::{AxisRole, AxisType};
use crate::dates::DatePattern;
use crate::scale::{Scale, Tick};

/// Length of tick marks when nothing overrides it.
pub const DEFAULT_TICK_SIZE: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrient {
    Bottom,
    Left,
    Right,
}

/// Everything a renderer needs to draw one axis.
///
/// A negative `tick_size_inner` stretches ticks across the plot as grid
/// lines.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    pub role: AxisRole,
    pub orient: AxisOrient,
    pub tick_count: Option<usize>,
    /// Display pattern for time labels, if one was configured.
    pub tick_format: Option<String>,
    pub tick_size_inner: f64,
    pub tick_size_outer: f64,
    pub tick_padding: f64,
    pub ticks: Vec<Tick>,
}

/// `ticks` wins over `tick_number`; zero counts as unset.
fn tick_count(ticks: Option<usize>, tick_number: Option<usize>) -> Option<usize> {
    ticks.filter(|&n| n > 0).or(tick_number.filter(|&n| n > 0))
}

pub struct AxisPlanner<'a> {
    config: &'a ChartConfig,
    time_format: Option<Arc<DatePattern>>,
}

impl<'a> AxisPlanner<'a> {
    /// `time_format` is the compiled `tickTimeDisplayFormat`.
    pub fn new(config: &'a ChartConfig, time_format: Option<Arc<DatePattern>>) -> Self {
        Self {
            config,
            time_format,
        }
    }

    pub fn plan(&self, scale: &Scale, inner_w: f64, inner_h: f64) -> AxisSpec {
        let config = self.config;
        let role = scale.role();
        let (orient, tick_count, (inner, outer, padding)) = match role {
            AxisRole::X => (
                AxisOrient::Bottom,
                tick_count(config.x_ticks, config.x_tick_number),
                if config.grid && config.vertical_grid {
                    (-inner_h, DEFAULT_TICK_SIZE, 15.0)
                } else {
                    (0.0, 0.0, 15.0)
                },
            ),
            AxisRole::Y => (
                if config.y_axis_orient_right {
                    AxisOrient::Right
                } else {
                    AxisOrient::Left
                },
                tick_count(config.y_ticks, config.y_tick_number),
                if config.grid {
                    (-inner_w, DEFAULT_TICK_SIZE, 12.0)
                } else {
                    (DEFAULT_TICK_SIZE, DEFAULT_TICK_SIZE, 10.0)
                },
            ),
        };

        // display format applies to the x axis only
        let time_format = match (role, scale.axis_type()) {
            (AxisRole::X, AxisType::Time) => self.time_format.as_deref(),
            _ => None,
        };
        let ticks = scale.ticks(tick_count, time_format);
        debug!(axis = %role, ?orient, ticks = ticks.len(), "planned axis");

        AxisSpec {
            role,
            orient,
            tick_count,
            tick_format: time_format.map(|p| p.source().to_string()),
            tick_size_inner: inner,
            tick_size_outer: outer,
            tick_padding: padding,
            ticks,
        }
    }
}
