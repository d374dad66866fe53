use std::collections::HashMap;

use serde::Serialize;

/// Evenly spaced points for a set of labels.
///
/// One step of padding sits at each end, so with `n` labels the step is
/// `|range| / (n + 1)` and no point lands on the boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrdinalScale {
    labels: Vec<String>,
    range: [f64; 2],
    step: f64,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl OrdinalScale {
    /// Duplicate labels are dropped; first-seen order is kept.
    pub fn new<I, S>(labels: I, range: [f64; 2]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut unique = Vec::new();
        for label in labels {
            let label = label.into();
            if !index.contains_key(&label) {
                index.insert(label.clone(), unique.len());
                unique.push(label);
            }
        }

        let span = (range[1] - range[0]).abs();
        let step = span / (unique.len() + 1) as f64;
        Self {
            labels: unique,
            range,
            step,
            index,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Distance between adjacent points.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn position(&self, i: usize) -> f64 {
        let [r0, r1] = self.range;
        let offset = self.step * (i + 1) as f64;
        if r1 < r0 { r0 - offset } else { r0 + offset }
    }

    /// Position of `label`, or `None` if it is not in the domain.
    pub fn map(&self, label: &str) -> Option<f64> {
        self.index.get(label).map(|&i| self.position(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_one_step_at_each_end() {
        let scale = OrdinalScale::new(["a", "b", "c"], [0.0, 400.0]);
        assert_eq!(scale.step(), 100.0);
        assert_eq!(scale.map("a"), Some(100.0));
        assert_eq!(scale.map("b"), Some(200.0));
        assert_eq!(scale.map("c"), Some(300.0));
        assert_eq!(scale.map("d"), None);
    }

    #[test]
    fn keeps_first_seen_order_without_duplicates() {
        let scale = OrdinalScale::new(["b", "a", "b", "c", "a"], [0.0, 100.0]);
        assert_eq!(scale.labels(), ["b", "a", "c"]);
    }

    #[test]
    fn descending_range_counts_from_the_start() {
        let scale = OrdinalScale::new(["lo", "hi"], [90.0, 0.0]);
        assert_eq!(scale.map("lo"), Some(60.0));
        assert_eq!(scale.map("hi"), Some(30.0));
    }

    #[test]
    fn single_label_sits_in_the_middle() {
        let scale = OrdinalScale::new(["only"], [0.0, 50.0]);
        assert_eq!(scale.map("only"), Some(25.0));
    }
}
