use serde::Serialize;

use super::ticks;

/// Affine mapping from a numeric domain onto a pixel range.
///
/// Domain and range keep their given order, so `[length, 0]` gives the
/// inverted vertical axis. Values outside the domain are not clamped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Pixel position of `value`. A zero-width domain maps everything to the
    /// middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Domain value at pixel `px`.
    pub fn invert(&self, px: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks::ticks(self.domain[0], self.domain[1], count)
    }

    pub fn tick_step(&self, count: usize) -> f64 {
        ticks::tick_step(self.domain[0], self.domain[1], count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_range() {
        let scale = LinearScale::new([0.0, 100.0], [0.0, 500.0]);
        assert_eq!(scale.map(0.0), 0.0);
        assert_eq!(scale.map(50.0), 250.0);
        assert_eq!(scale.map(100.0), 500.0);
        assert_eq!(scale.map(150.0), 750.0);
    }

    #[test]
    fn inverted_range_for_vertical_axes() {
        let scale = LinearScale::new([0.0, 10.0], [200.0, 0.0]);
        assert_eq!(scale.map(0.0), 200.0);
        assert_eq!(scale.map(10.0), 0.0);
        assert_eq!(scale.invert(50.0), 7.5);
    }

    #[test]
    fn zero_width_domain_maps_to_middle() {
        let scale = LinearScale::new([4.0, 4.0], [0.0, 100.0]);
        assert_eq!(scale.map(4.0), 50.0);
        assert_eq!(scale.invert(30.0), 4.0);
    }

    #[test]
    fn ticks_follow_domain() {
        let scale = LinearScale::new([0.0, 10.0], [0.0, 100.0]);
        assert_eq!(scale.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(scale.tick_step(10), 1.0);
    }
}
