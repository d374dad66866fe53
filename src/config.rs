use std::sync::Arc;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::chart::ScatterplotChart;
use crate::core::{AxisType, Color, DataPoint, Margin, Value};
use crate::dates::DateParserCache;
use crate::error::PlotError;
use crate::palette::TypeStyle;
use crate::reconcile::KeyFn;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

/// Which pointer handlers the renderer should bind on every mark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interactions {
    pub hover: bool,
    pub leave: bool,
    #[serde(rename = "move")]
    pub moves: bool,
    pub click: bool,
}

impl Interactions {
    pub const ALL: Self = Self {
        hover: true,
        leave: true,
        moves: true,
        click: true,
    };
}

/// Chart configuration. JSON keys are camelCase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    /// Replaces the computed margin when set.
    pub margin: Option<Margin>,
    pub axes: bool,
    pub axis_labels: AxisLabels,
    pub x_type: AxisType,
    pub y_type: AxisType,
    pub x_domain_range: Option<Vec<Value>>,
    pub y_domain_range: Option<Vec<Value>>,
    /// Horizontal tick count; wins over `x_tick_number`.
    pub x_ticks: Option<usize>,
    pub y_ticks: Option<usize>,
    pub x_tick_number: Option<usize>,
    pub y_tick_number: Option<usize>,
    pub grid: bool,
    pub vertical_grid: bool,
    pub y_axis_orient_right: bool,
    pub dot_radius: f64,
    pub date_pattern: String,
    pub tick_time_display_format: Option<String>,
    pub type_styles: Vec<TypeStyle>,
    pub interactions: Interactions,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 180.0,
            margin: None,
            axes: false,
            axis_labels: AxisLabels::default(),
            x_type: AxisType::Linear,
            y_type: AxisType::Linear,
            x_domain_range: None,
            y_domain_range: None,
            x_ticks: None,
            y_ticks: None,
            x_tick_number: None,
            y_tick_number: None,
            grid: false,
            vertical_grid: false,
            y_axis_orient_right: false,
            dot_radius: 5.0,
            date_pattern: "%d-%b-%y".to_string(),
            tick_time_display_format: None,
            type_styles: Vec::new(),
            interactions: Interactions::default(),
        }
    }
}

impl ChartConfig {
    /// Checks that need no data: sizes and radius.
    ///
    /// A tick count of zero is not an error; the axis treats it as unset.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Report::new(PlotError::InvalidConfig(msg)));
        for (name, v) in [
            ("width", self.width),
            ("height", self.height),
            ("dotRadius", self.dot_radius),
        ] {
            if !v.is_finite() || v < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {v}"));
            }
        }
        Ok(())
    }
}

pub fn scatterplot() -> ChartBuilder {
    ChartBuilder {
        config: ChartConfig::default(),
        key_fn: None,
        dates: None,
    }
}

/// Chained construction of a [`ChartConfig`] or a ready [`ScatterplotChart`].
pub struct ChartBuilder {
    config: ChartConfig,
    key_fn: Option<KeyFn>,
    dates: Option<Arc<DateParserCache>>,
}

impl ChartBuilder {
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.config.margin = Some(margin);
        self
    }

    pub fn axes(mut self, on: bool) -> Self {
        self.config.axes = on;
        self
    }

    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.config.axis_labels = AxisLabels {
            x: x.into(),
            y: y.into(),
        };
        self
    }

    pub fn x_type(mut self, t: AxisType) -> Self {
        self.config.x_type = t;
        self
    }

    pub fn y_type(mut self, t: AxisType) -> Self {
        self.config.y_type = t;
        self
    }

    pub fn x_domain(mut self, lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        self.config.x_domain_range = Some(vec![lo.into(), hi.into()]);
        self
    }

    pub fn y_domain(mut self, lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        self.config.y_domain_range = Some(vec![lo.into(), hi.into()]);
        self
    }

    pub fn x_ticks(mut self, n: usize) -> Self {
        self.config.x_ticks = Some(n);
        self
    }

    pub fn y_ticks(mut self, n: usize) -> Self {
        self.config.y_ticks = Some(n);
        self
    }

    pub fn x_tick_number(mut self, n: usize) -> Self {
        self.config.x_tick_number = Some(n);
        self
    }

    pub fn y_tick_number(mut self, n: usize) -> Self {
        self.config.y_tick_number = Some(n);
        self
    }

    /// Horizontal grid lines across the plot.
    pub fn grid(mut self, on: bool) -> Self {
        self.config.grid = on;
        self
    }

    /// Vertical grid lines; only drawn while `grid` is on.
    pub fn vertical_grid(mut self, on: bool) -> Self {
        self.config.vertical_grid = on;
        self
    }

    pub fn y_axis_orient_right(mut self, right: bool) -> Self {
        self.config.y_axis_orient_right = right;
        self
    }

    pub fn dot_radius(mut self, r: f64) -> Self {
        self.config.dot_radius = r;
        self
    }

    pub fn date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.date_pattern = pattern.into();
        self
    }

    pub fn tick_time_display_format(mut self, format: impl Into<String>) -> Self {
        self.config.tick_time_display_format = Some(format.into());
        self
    }

    pub fn type_style(
        mut self,
        kind: impl Into<String>,
        color: Color,
        stroke: Option<Color>,
    ) -> Self {
        self.config.type_styles.push(TypeStyle {
            kind: kind.into(),
            color,
            stroke,
        });
        self
    }

    pub fn interactions(mut self, interactions: Interactions) -> Self {
        self.config.interactions = interactions;
        self
    }

    /// Match marks across passes by key instead of array position.
    pub fn key_by<F>(mut self, f: F) -> Self
    where
        F: Fn(&DataPoint) -> String + Send + Sync + 'static,
    {
        self.key_fn = Some(Arc::new(f));
        self
    }

    /// Share a date pattern cache instead of giving the chart its own.
    pub fn date_cache(mut self, cache: Arc<DateParserCache>) -> Self {
        self.dates = Some(cache);
        self
    }

    /// Get the built config without creating a chart.
    pub fn build(self) -> ChartConfig {
        self.config
    }

    pub fn into_chart(self) -> Result<ScatterplotChart> {
        let dates = self.dates.unwrap_or_default();
        let mut chart = ScatterplotChart::with_date_cache(self.config, dates)?;
        if let Some(key_fn) = self.key_fn {
            chart.set_key_fn(key_fn);
        }
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_component_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.width, 320.0);
        assert_eq!(config.height, 180.0);
        assert_eq!(config.dot_radius, 5.0);
        assert_eq!(config.date_pattern, "%d-%b-%y");
        assert!(!config.axes);
        assert_eq!(config.x_type, AxisType::Linear);
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let config: ChartConfig = serde_json::from_str(
            r##"{
                "axes": true,
                "xType": "text",
                "yAxisOrientRight": true,
                "xDomainRange": [0, 10],
                "tickTimeDisplayFormat": "%d %b",
                "typeStyles": [{"type": "One", "color": "#ff0000"}],
                "interactions": {"hover": true, "move": true}
            }"##,
        )
        .unwrap();
        assert!(config.axes);
        assert_eq!(config.x_type, AxisType::Ordinal);
        assert!(config.y_axis_orient_right);
        assert_eq!(
            config.x_domain_range,
            Some(vec![Value::from(0.0), Value::from(10.0)])
        );
        assert_eq!(config.width, 320.0);
        assert_eq!(config.type_styles.len(), 1);
        assert!(config.interactions.hover && config.interactions.moves);
        assert!(!config.interactions.click);
    }

    #[test]
    fn unknown_axis_type_is_rejected_when_loading() {
        let err = serde_json::from_str::<ChartConfig>(r#"{"yType": "log"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown axis type `log`"));
    }

    #[test]
    fn builder_sets_fields() {
        let config = scatterplot()
            .size(400.0, 300.0)
            .axes(true)
            .grid(true)
            .vertical_grid(true)
            .x_ticks(4)
            .axis_labels("x", "y")
            .build();
        assert_eq!((config.width, config.height), (400.0, 300.0));
        assert!(config.grid && config.vertical_grid);
        assert_eq!(config.x_ticks, Some(4));
        assert_eq!(config.axis_labels.y, "y");
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        let config = scatterplot().dot_radius(-1.0).build();
        assert!(matches!(
            config.validate().unwrap_err().current_context(),
            PlotError::InvalidConfig(_)
        ));
        let config = scatterplot().size(f64::NAN, 100.0).build();
        assert!(config.validate().is_err());
        assert!(ChartConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_counts_pass_validation() {
        let config: ChartConfig =
            serde_json::from_str(r#"{"xTicks": 0, "yTickNumber": 0}"#).unwrap();
        assert_eq!(config.x_ticks, Some(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn grid_switches_are_independent() {
        let config = scatterplot().grid(false).build();
        assert!(!config.grid && !config.vertical_grid);
        let config = scatterplot().grid(true).build();
        assert!(config.grid && !config.vertical_grid);
        let config = scatterplot().grid(true).vertical_grid(true).grid(false).build();
        assert!(!config.grid && config.vertical_grid);
    }
}
