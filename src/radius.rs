//! Mark radius from the optional third data dimension.

use crate::core::DataPoint;

pub const MIN_RADIUS: f64 = 5.0;
pub const MAX_RADIUS: f64 = 20.0;

/// Maps `z` onto `[MIN_RADIUS, MAX_RADIUS]` relative to the extent of `z`
/// over one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusMapper {
    extent: Option<(f64, f64)>,
    default_radius: f64,
}

impl RadiusMapper {
    pub fn new(points: &[DataPoint], default_radius: f64) -> Self {
        let extent = points
            .iter()
            .filter_map(|p| p.z)
            .filter(|z| z.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, z| match acc {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            });
        Self {
            extent,
            default_radius,
        }
    }

    pub fn extent(&self) -> Option<(f64, f64)> {
        self.extent
    }

    pub fn radius(&self, point: &DataPoint) -> f64 {
        let (Some((lo, hi)), Some(z)) = (self.extent, point.z) else {
            return self.default_radius;
        };
        let span = hi - lo;
        // constant z collapses every mark to the minimum radius
        let p = if span == 0.0 { 0.0 } else { (z - lo) / span };
        MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * p
    }
}

/// One-shot form of [`RadiusMapper::radius`].
pub fn radius_of(point: &DataPoint, all_points: &[DataPoint], default_radius: f64) -> f64 {
    RadiusMapper::new(all_points, default_radius).radius(point)
}
