//! Value → pixel scales and the builder that derives them from data.

mod linear;
mod ordinal;
mod ticks;
mod time;

use std::sync::Arc;

use chrono::NaiveDateTime;
use error_stack::Report;
use serde::Serialize;
use tracing::{debug, warn};

use crate::Result;
use crate::core::{AxisRole, AxisType, DataPoint, Value};
use crate::dates::{self, DatePattern};
use crate::error::PlotError;

pub use linear::LinearScale;
pub use ordinal::OrdinalScale;
pub use ticks::{format_fixed, precision_for_step, tick_increment, tick_step, ticks};
pub use time::{TimeInterval, TimeScale, TimeTicks, TimeUnit};

/// Tick count used when none is configured.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// One labelled graduation, already in pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScaleKind {
    Linear(LinearScale),
    Ordinal(OrdinalScale),
    Time(TimeScale),
}

/// A built scale for one axis.
#[derive(Clone, Debug, Serialize)]
pub struct Scale {
    role: AxisRole,
    kind: ScaleKind,
}

impl Scale {
    pub fn role(&self) -> AxisRole {
        self.role
    }

    pub fn kind(&self) -> &ScaleKind {
        &self.kind
    }

    pub fn axis_type(&self) -> AxisType {
        match self.kind {
            ScaleKind::Linear(_) => AxisType::Linear,
            ScaleKind::Ordinal(_) => AxisType::Ordinal,
            ScaleKind::Time(_) => AxisType::Time,
        }
    }

    pub fn as_linear(&self) -> Option<&LinearScale> {
        match &self.kind {
            ScaleKind::Linear(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ordinal(&self) -> Option<&OrdinalScale> {
        match &self.kind {
            ScaleKind::Ordinal(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&TimeScale> {
        match &self.kind {
            ScaleKind::Time(s) => Some(s),
            _ => None,
        }
    }

    pub fn range(&self) -> [f64; 2] {
        match &self.kind {
            ScaleKind::Linear(s) => s.range(),
            ScaleKind::Ordinal(s) => s.range(),
            ScaleKind::Time(s) => s.range(),
        }
    }

    /// Pixel position of a data value on this axis.
    pub fn map(&self, value: &Value) -> Result<f64> {
        match &self.kind {
            ScaleKind::Linear(s) => Ok(s.map(number(self.role, value)?)),
            ScaleKind::Ordinal(s) => s.map(&value.label()).ok_or_else(|| {
                Report::new(PlotError::domain(
                    self.role,
                    format!("label `{}` is not in the ordinal domain", value.label()),
                ))
            }),
            ScaleKind::Time(s) => match value {
                Value::Number(ms) => Ok(s.map_millis(*ms)),
                Value::Text(text) => Ok(s.map(&s.pattern().parse(text)?)),
            },
        }
    }

    /// Ticks with pixel positions and labels.
    ///
    /// `time_format` overrides the interval-based label pattern of time
    /// scales and is ignored by the other kinds.
    pub fn ticks(&self, count: Option<usize>, time_format: Option<&DatePattern>) -> Vec<Tick> {
        let count = count.unwrap_or(DEFAULT_TICK_COUNT);
        match &self.kind {
            ScaleKind::Linear(s) => {
                let precision = precision_for_step(s.tick_step(count));
                s.ticks(count)
                    .into_iter()
                    .map(|v| Tick {
                        position: s.map(v),
                        label: format_fixed(v, precision),
                    })
                    .collect()
            }
            ScaleKind::Ordinal(s) => s
                .labels()
                .iter()
                .enumerate()
                .map(|(i, label)| Tick {
                    position: s.position(i),
                    label: label.clone(),
                })
                .collect(),
            ScaleKind::Time(s) => {
                let TimeTicks { interval, values } = s.ticks(count);
                values
                    .iter()
                    .map(|at| Tick {
                        position: s.map(at),
                        label: match time_format {
                            Some(pattern) => pattern.format(at),
                            None => at.format(interval.default_format()).to_string(),
                        },
                    })
                    .collect()
            }
        }
    }
}

fn number(role: AxisRole, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            Report::new(PlotError::domain(
                role,
                format!("`{s}` is not a number on a linear axis"),
            ))
        }),
    }
}

fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Derives the scale for one axis from data and configuration.
pub struct ScaleBuilder<'a> {
    role: AxisRole,
    axis_type: AxisType,
    length: f64,
    explicit_domain: Option<&'a [Value]>,
    y_axis_orient_right: bool,
    date_pattern: Option<Arc<DatePattern>>,
}

impl<'a> ScaleBuilder<'a> {
    pub fn new(role: AxisRole, axis_type: AxisType, length: f64) -> Self {
        Self {
            role,
            axis_type,
            length,
            explicit_domain: None,
            y_axis_orient_right: false,
            date_pattern: None,
        }
    }

    pub fn explicit_domain(mut self, domain: Option<&'a [Value]>) -> Self {
        self.explicit_domain = domain;
        self
    }

    pub fn y_axis_orient_right(mut self, right: bool) -> Self {
        self.y_axis_orient_right = right;
        self
    }

    /// Pattern used to parse date strings. Required for time axes.
    pub fn date_pattern(mut self, pattern: Arc<DatePattern>) -> Self {
        self.date_pattern = Some(pattern);
        self
    }

    fn range(&self) -> [f64; 2] {
        match self.role {
            AxisRole::X => [0.0, self.length],
            AxisRole::Y => [self.length, 0.0],
        }
    }

    pub fn build(&self, data: &[DataPoint]) -> Result<Scale> {
        let kind = match self.axis_type {
            AxisType::Ordinal => ScaleKind::Ordinal(self.ordinal(data)?),
            AxisType::Linear => ScaleKind::Linear(self.linear(data)?),
            AxisType::Time => ScaleKind::Time(self.time(data)?),
        };
        let scale = Scale {
            role: self.role,
            kind,
        };
        debug!(axis = %self.role, kind = %self.axis_type, range = ?scale.range(), "built scale");
        Ok(scale)
    }

    fn ordinal(&self, data: &[DataPoint]) -> Result<OrdinalScale> {
        if self.explicit_domain.is_some() {
            warn!(axis = %self.role, "explicit domain is ignored on ordinal axes");
        }
        if data.is_empty() {
            return Err(Report::new(PlotError::domain(
                self.role,
                "no data to derive ordinal labels from",
            )));
        }
        let labels = data
            .iter()
            .map(|p| p.coordinate(self.role).label().into_owned());
        Ok(OrdinalScale::new(labels, self.range()))
    }

    fn linear(&self, data: &[DataPoint]) -> Result<LinearScale> {
        if let Some(domain) = self.explicit_domain {
            let [lo, hi] = self.explicit_pair(domain)?;
            return Ok(LinearScale::new(
                [number(self.role, lo)?, number(self.role, hi)?],
                self.range(),
            ));
        }

        let values = data
            .iter()
            .map(|p| number(self.role, p.coordinate(self.role)))
            .collect::<Result<Vec<f64>>>()?;
        let (min, max) = extent(values).ok_or_else(|| {
            Report::new(PlotError::domain(self.role, "no data to derive a domain from"))
        })?;

        let step = padding_step(min, max);
        let domain = match (self.role, self.y_axis_orient_right) {
            (AxisRole::X, true) => [min - step, max],
            (AxisRole::X, false) => [min, max + step],
            (AxisRole::Y, _) => [min - step, max],
        };
        Ok(LinearScale::new(domain, self.range()))
    }

    fn time(&self, data: &[DataPoint]) -> Result<TimeScale> {
        let pattern = self.date_pattern.clone().ok_or_else(|| {
            Report::new(PlotError::InvalidConfig(format!(
                "time axis {} needs a date pattern",
                self.role
            )))
        })?;
        let parse = |value: &Value| -> Result<NaiveDateTime> {
            match value {
                Value::Text(text) => pattern.parse(text),
                Value::Number(ms) => dates::from_millis(*ms).ok_or_else(|| {
                    Report::new(PlotError::domain(
                        self.role,
                        format!("timestamp {ms} is out of range"),
                    ))
                }),
            }
        };

        let domain = match self.explicit_domain {
            Some(domain) => {
                let [lo, hi] = self.explicit_pair(domain)?;
                [parse(lo)?, parse(hi)?]
            }
            None => {
                let parsed = data
                    .iter()
                    .map(|p| parse(p.coordinate(self.role)))
                    .collect::<Result<Vec<_>>>()?;
                let lo = parsed.iter().min().copied();
                let hi = parsed.iter().max().copied();
                match lo.zip(hi) {
                    Some((lo, hi)) => [lo, hi],
                    None => {
                        return Err(Report::new(PlotError::domain(
                            self.role,
                            "no data to derive a time extent from",
                        )));
                    }
                }
            }
        };
        Ok(TimeScale::new(domain, self.range(), pattern))
    }

    fn explicit_pair<'v>(&self, domain: &'v [Value]) -> Result<[&'v Value; 2]> {
        match domain {
            [lo, hi] => Ok([lo, hi]),
            _ => Err(Report::new(PlotError::domain(
                self.role,
                format!("explicit domain needs exactly two values, got {}", domain.len()),
            ))),
        }
    }
}

/// Distance between the first two ticks of the raw extent. A zero-width
/// extent has no ticks to sample, so it pads by one unit.
fn padding_step(min: f64, max: f64) -> f64 {
    match ticks::ticks(min, max, DEFAULT_TICK_COUNT).as_slice() {
        [first, second, ..] => second - first,
        _ => 1.0,
    }
}
