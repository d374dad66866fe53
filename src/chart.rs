//! The planning pipeline: margins, scales, axes, marks, reconciliation and
//! transition for one chart instance.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use error_stack::ResultExt;
use glam::DVec2;
use serde::Serialize;
use tracing::{debug, info};

use crate::Result;
use crate::axis::{AxisPlanner, AxisSpec};
use crate::config::ChartConfig;
use crate::core::{AxisRole, AxisType, DataPoint, Margin, Value};
use crate::dates::{DateParserCache, DatePattern};
use crate::layout::{Frame, MarginCalculator};
use crate::palette::Palette;
use crate::radius::RadiusMapper;
use crate::reconcile::{ElementAttrs, ElementTarget, KeyFn, ReconciliationPlan, Reconciler};
use crate::scale::{Scale, ScaleBuilder};
use crate::transition::{Transition, TransitionScheduler};

/// Opaque identity of one chart instance, unique within the process.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize)]
pub struct ChartHandle(u64);

impl Default for ChartHandle {
    fn default() -> Self {
        static CTR: AtomicU64 = AtomicU64::new(1);
        Self(CTR.fetch_add(1, Ordering::Relaxed))
    }
}

impl ChartHandle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for ChartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scatter-{}", self.0)
    }
}

/// Everything a renderer needs for one pass.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPlan {
    pub handle: ChartHandle,
    pub frame: Frame,
    pub margin: Margin,
    pub inner_width: f64,
    pub inner_height: f64,
    pub x_scale: Option<Scale>,
    pub y_scale: Option<Scale>,
    pub x_axis: Option<AxisSpec>,
    pub y_axis: Option<AxisSpec>,
    pub reconciliation: ReconciliationPlan,
    pub transition: Transition,
}

/// A scatterplot instance. Holds the configuration and the marks bound by
/// the last successful pass.
pub struct ScatterplotChart {
    handle: ChartHandle,
    config: ChartConfig,
    dates: Arc<DateParserCache>,
    date_pattern: Arc<DatePattern>,
    time_format: Option<Arc<DatePattern>>,
    palette: Palette,
    reconciler: Reconciler,
    scheduler: TransitionScheduler,
}

impl fmt::Debug for ScatterplotChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterplotChart")
            .field("handle", &self.handle)
            .field("config", &self.config)
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

impl ScatterplotChart {
    pub fn new(config: ChartConfig) -> Result<Self> {
        Self::with_date_cache(config, Arc::default())
    }

    /// Like [`new`](Self::new) but compiles date patterns through a shared
    /// cache.
    pub fn with_date_cache(config: ChartConfig, dates: Arc<DateParserCache>) -> Result<Self> {
        config.validate()?;
        let date_pattern = dates
            .get(&config.date_pattern)
            .attach("while compiling datePattern")?;
        let time_format = config
            .tick_time_display_format
            .as_deref()
            .map(|f| dates.get(f).attach("while compiling tickTimeDisplayFormat"))
            .transpose()?;

        let handle = ChartHandle::new();
        info!(%handle, x = %config.x_type, y = %config.y_type, "created chart");
        Ok(Self {
            handle,
            palette: Palette::new(config.type_styles.clone()),
            reconciler: Reconciler::new(None, config.interactions),
            scheduler: TransitionScheduler::new(),
            config,
            dates,
            date_pattern,
            time_format,
        })
    }

    pub fn handle(&self) -> ChartHandle {
        self.handle
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn date_cache(&self) -> &Arc<DateParserCache> {
        &self.dates
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Switch to keyed matching. Takes effect from the next pass.
    pub fn set_key_fn(&mut self, key_fn: KeyFn) {
        self.reconciler.set_key_fn(key_fn);
    }

    /// Plan one pass over `data` at clock time `now`.
    ///
    /// On error the bound set is left as the previous pass left it.
    pub fn update(&mut self, data: &[DataPoint], now: Duration) -> Result<ChartPlan> {
        let config = &self.config;
        let margin = MarginCalculator::resolve(
            config.margin,
            config.axes,
            2.0 * config.dot_radius,
            config.y_axis_orient_right,
        );
        let (inner_w, inner_h) = MarginCalculator::inner_dimensions(
            config.width,
            config.height,
            &margin,
            config.dot_radius,
        )
        .attach(format!("chart {}", self.handle))?;
        let mut frame = Frame::new(
            config.width,
            config.height,
            &margin,
            (inner_w, inner_h),
            config.dot_radius,
            config.y_axis_orient_right,
        );
        if config.axes {
            frame = frame.with_labels(
                &config.axis_labels.x,
                &config.axis_labels.y,
                &margin,
                inner_w,
                config.y_axis_orient_right,
            );
        }
        debug!(handle = %self.handle, ?margin, inner_w, inner_h, "layout");

        let x_scale = self.scale(AxisRole::X, data, inner_w)?;
        let y_scale = self.scale(AxisRole::Y, data, inner_h)?;

        let (x_axis, y_axis) = if config.axes {
            let planner = AxisPlanner::new(config, self.time_format.clone());
            (
                x_scale.as_ref().map(|s| planner.plan(s, inner_w, inner_h)),
                y_scale.as_ref().map(|s| planner.plan(s, inner_w, inner_h)),
            )
        } else {
            (None, None)
        };

        let targets = match (&x_scale, &y_scale) {
            (Some(x), Some(y)) => self.targets(data, x, y)?,
            _ => Vec::new(),
        };
        debug!(handle = %self.handle, marks = targets.len(), "computed targets");

        let reconciliation = self.reconciler.reconcile(targets, now);
        let transition = self
            .scheduler
            .schedule(&reconciliation.update, self.config.axes, now);

        Ok(ChartPlan {
            handle: self.handle,
            frame,
            margin,
            inner_width: inner_w,
            inner_height: inner_h,
            x_scale,
            y_scale,
            x_axis,
            y_axis,
            reconciliation,
            transition,
        })
    }

    /// Advance binding states of the bound marks to `now`.
    pub fn settle(&mut self, now: Duration) {
        self.reconciler.settle(now);
    }

    fn scale(&self, role: AxisRole, data: &[DataPoint], length: f64) -> Result<Option<Scale>> {
        let config = &self.config;
        let (axis_type, domain) = match role {
            AxisRole::X => (config.x_type, config.x_domain_range.as_deref()),
            AxisRole::Y => (config.y_type, config.y_domain_range.as_deref()),
        };
        // nothing to derive a domain from: the plot is empty, not broken
        let usable_domain = domain.is_some() && axis_type != AxisType::Ordinal;
        if data.is_empty() && !usable_domain {
            debug!(axis = %role, "no data and no domain, skipping scale");
            return Ok(None);
        }
        ScaleBuilder::new(role, axis_type, length)
            .explicit_domain(domain)
            .y_axis_orient_right(config.y_axis_orient_right)
            .date_pattern(Arc::clone(&self.date_pattern))
            .build(data)
            .map(Some)
    }

    fn targets(&self, data: &[DataPoint], x: &Scale, y: &Scale) -> Result<Vec<ElementTarget>> {
        let radii = RadiusMapper::new(data, self.config.dot_radius);
        data.iter()
            .enumerate()
            .map(|(i, p)| {
                let cx = x.map(&p.x).attach_with(|| point_context(i, &p.x))?;
                let cy = y.map(&p.y).attach_with(|| point_context(i, &p.y))?;
                Ok(ElementTarget {
                    datum: p.clone(),
                    attrs: ElementAttrs {
                        center: DVec2::new(cx, cy),
                        radius: radii.radius(p),
                        fill: self.palette.fill(p),
                        stroke: self.palette.stroke(p),
                    },
                })
            })
            .collect()
    }
}

fn point_context(index: usize, value: &Value) -> String {
    format!("data point {index} (value `{}`)", value.label())
}
