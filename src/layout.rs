//! Margins, inner plotting area and group placement.

use error_stack::Report;
use glam::DVec2;
use serde::Serialize;

use crate::Result;
use crate::core::Margin;
use crate::error::PlotError;

/// Margin reserved on the label side of the vertical axis.
pub const AXIS_LABEL_SPACE: f64 = 48.0;
/// Margin on the other sides when axes are drawn.
pub const AXIS_SPACE: f64 = 24.0;
/// Gap between the bottom margin and the x axis label.
pub const AXIS_LABEL_OFFSET: f64 = 18.0;

/// Derives margins from axis visibility and orientation.
pub struct MarginCalculator;

impl MarginCalculator {
    /// `spacer` pads every side when axes are hidden so edge marks are not
    /// clipped; the pipeline passes twice the mark radius.
    pub fn compute(axes_visible: bool, spacer: f64, y_axis_orient_right: bool) -> Margin {
        match (axes_visible, y_axis_orient_right) {
            (false, _) => Margin::uniform(spacer),
            (true, false) => Margin::new(AXIS_SPACE, AXIS_SPACE, AXIS_SPACE, AXIS_LABEL_SPACE),
            (true, true) => Margin::new(AXIS_SPACE, AXIS_LABEL_SPACE, AXIS_SPACE, AXIS_SPACE),
        }
    }

    /// `override_margin` wins over the computed margin when present.
    pub fn resolve(
        override_margin: Option<Margin>,
        axes_visible: bool,
        spacer: f64,
        y_axis_orient_right: bool,
    ) -> Margin {
        override_margin
            .unwrap_or_else(|| Self::compute(axes_visible, spacer, y_axis_orient_right))
    }

    /// Inner width and height. The vertical extent also loses one mark
    /// diameter so marks at the extremes stay inside.
    pub fn inner_dimensions(
        width: f64,
        height: f64,
        margin: &Margin,
        dot_radius: f64,
    ) -> Result<(f64, f64)> {
        let inner_w = width - margin.left - margin.right;
        let inner_h = height - margin.top - margin.bottom - 2.0 * dot_radius;
        if inner_w < 0.0 || inner_w.is_nan() {
            return Err(Report::new(PlotError::InvalidMargin {
                dimension: "width",
                value: inner_w,
            }));
        }
        if inner_h < 0.0 || inner_h.is_nan() {
            return Err(Report::new(PlotError::InvalidMargin {
                dimension: "height",
                value: inner_h,
            }));
        }
        Ok((inner_w, inner_h))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLabel {
    pub text: String,
    /// Position inside the axis group.
    pub position: DVec2,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Baseline shift in em.
    pub dy: f64,
    pub anchor: TextAnchor,
}

/// Where the renderer places the canvas, plot root and axis groups.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub canvas: DVec2,
    pub root_offset: DVec2,
    pub x_axis_offset: DVec2,
    pub y_axis_offset: DVec2,
    pub x_label: Option<AxisLabel>,
    pub y_label: Option<AxisLabel>,
}

impl Frame {
    pub fn new(
        width: f64,
        height: f64,
        margin: &Margin,
        inner: (f64, f64),
        dot_radius: f64,
        y_axis_orient_right: bool,
    ) -> Self {
        let (inner_w, inner_h) = inner;
        Self {
            canvas: DVec2::new(
                width + margin.left + margin.right,
                height + 3.0 * dot_radius + margin.top + margin.bottom,
            ),
            root_offset: DVec2::new(margin.left, margin.top),
            x_axis_offset: DVec2::new(0.0, inner_h),
            y_axis_offset: if y_axis_orient_right {
                DVec2::new(inner_w, 0.0)
            } else {
                DVec2::ZERO
            },
            x_label: None,
            y_label: None,
        }
    }

    /// Attach axis labels. Empty strings leave the label out.
    pub fn with_labels(
        mut self,
        x: &str,
        y: &str,
        margin: &Margin,
        inner_w: f64,
        y_axis_orient_right: bool,
    ) -> Self {
        if !x.is_empty() {
            self.x_label = Some(AxisLabel {
                text: x.to_string(),
                position: DVec2::new(
                    if y_axis_orient_right { 0.0 } else { inner_w },
                    margin.bottom + AXIS_LABEL_OFFSET,
                ),
                rotation: 0.0,
                dy: 0.0,
                anchor: if y_axis_orient_right {
                    TextAnchor::Start
                } else {
                    TextAnchor::End
                },
            });
        }
        if !y.is_empty() {
            self.y_label = Some(AxisLabel {
                text: y.to_string(),
                position: DVec2::new(
                    0.0,
                    if y_axis_orient_right {
                        margin.right - 25.0
                    } else {
                        10.0 - margin.left
                    },
                ),
                rotation: -90.0,
                dy: 0.71,
                anchor: TextAnchor::End,
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_follow_axis_orientation() {
        assert_eq!(
            MarginCalculator::compute(true, 10.0, false),
            Margin::new(24.0, 24.0, 24.0, 48.0)
        );
        assert_eq!(
            MarginCalculator::compute(true, 10.0, true),
            Margin::new(24.0, 48.0, 24.0, 24.0)
        );
        assert_eq!(
            MarginCalculator::compute(false, 10.0, false),
            Margin::uniform(10.0)
        );
        assert_eq!(
            MarginCalculator::compute(false, 10.0, true),
            Margin::uniform(10.0)
        );
    }

    #[test]
    fn explicit_margin_bypasses_computation() {
        let custom = Margin::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            MarginCalculator::resolve(Some(custom), true, 10.0, false),
            custom
        );
    }

    #[test]
    fn inner_height_loses_one_diameter() {
        let margin = Margin::new(24.0, 24.0, 24.0, 48.0);
        let inner = MarginCalculator::inner_dimensions(320.0, 180.0, &margin, 5.0).unwrap();
        assert_eq!(inner, (248.0, 122.0));
    }

    #[test]
    fn negative_inner_dimension_is_an_error() {
        let margin = Margin::uniform(100.0);
        let err = MarginCalculator::inner_dimensions(150.0, 400.0, &margin, 5.0).unwrap_err();
        assert_eq!(
            err.current_context(),
            &PlotError::InvalidMargin {
                dimension: "width",
                value: -50.0
            }
        );
        let err = MarginCalculator::inner_dimensions(400.0, 205.0, &margin, 5.0).unwrap_err();
        assert!(matches!(
            err.current_context(),
            PlotError::InvalidMargin {
                dimension: "height",
                ..
            }
        ));
    }

    #[test]
    fn frame_places_groups_and_labels() {
        let margin = Margin::new(24.0, 48.0, 24.0, 24.0);
        let frame = Frame::new(320.0, 180.0, &margin, (248.0, 122.0), 5.0, true)
            .with_labels("time", "value", &margin, 248.0, true);
        assert_eq!(frame.canvas, DVec2::new(392.0, 243.0));
        assert_eq!(frame.root_offset, DVec2::new(24.0, 24.0));
        assert_eq!(frame.x_axis_offset, DVec2::new(0.0, 122.0));
        assert_eq!(frame.y_axis_offset, DVec2::new(248.0, 0.0));

        let x = frame.x_label.unwrap();
        assert_eq!(x.position, DVec2::new(0.0, 42.0));
        assert_eq!(x.anchor, TextAnchor::Start);
        let y = frame.y_label.unwrap();
        assert_eq!(y.position, DVec2::new(0.0, 23.0));
        assert_eq!(y.rotation, -90.0);
    }

    #[test]
    fn empty_labels_are_left_out() {
        let margin = Margin::uniform(10.0);
        let frame = Frame::new(100.0, 100.0, &margin, (80.0, 70.0), 5.0, false)
            .with_labels("", "", &margin, 80.0, false);
        assert!(frame.x_label.is_none());
        assert!(frame.y_label.is_none());
        assert_eq!(frame.y_axis_offset, DVec2::ZERO);
    }
}
