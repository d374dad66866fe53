//! Timing and easing of update transitions.

use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::reconcile::{ElementKey, ElementUpdate};

/// Every update transition runs for this long. Not configurable.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(750);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Slow start, fast middle, slow finish.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Eased progress for raw progress `t`, clamped to `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// When a transition starts, how long it runs and how it eases.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    #[serde(rename = "startMs", serialize_with = "as_millis")]
    pub start: Duration,
    #[serde(rename = "durationMs", serialize_with = "as_millis")]
    pub duration: Duration,
    pub easing: Easing,
}

impl Timing {
    pub fn starting_at(now: Duration) -> Self {
        Self {
            start: now,
            duration: TRANSITION_DURATION,
            easing: Easing::default(),
        }
    }

    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.end()
    }

    /// Eased progress at `now`; 0 before the start, 1 after the end.
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        self.easing
            .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }
}

/// The transition covering one pass's update set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
    #[serde(flatten)]
    pub timing: Timing,
    /// Elements that animate, in current index order.
    pub keys: Vec<ElementKey>,
    /// Whether axis ticks animate with the marks.
    pub axes: bool,
}

/// Hands out one [`Transition`] per pass.
///
/// Entering and exiting elements are applied immediately and never appear
/// in a transition. Axes join the transition from the second pass on.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    passes: u64,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn schedule(
        &mut self,
        updates: &[ElementUpdate],
        axes_visible: bool,
        now: Duration,
    ) -> Transition {
        let first = self.passes == 0;
        self.passes += 1;
        let transition = Transition {
            timing: Timing::starting_at(now),
            keys: updates.iter().map(|u| u.element.key.clone()).collect(),
            axes: axes_visible && !first,
        };
        debug!(
            pass = self.passes,
            keys = transition.keys.len(),
            axes = transition.axes,
            "scheduled transition"
        );
        transition
    }
}

pub(crate) fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_in_out_is_symmetric() {
        let e = Easing::CubicInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(0.5), 0.5);
        assert_eq!(e.apply(1.0), 1.0);
        assert_eq!(e.apply(0.25), 0.0625);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-12);
        assert_eq!(e.apply(2.0), 1.0);
        assert_eq!(e.apply(-1.0), 0.0);
    }

    #[test]
    fn timing_progress_over_fixed_duration() {
        let timing = Timing::starting_at(Duration::from_millis(1000));
        assert_eq!(timing.duration, Duration::from_millis(750));
        assert_eq!(timing.progress(Duration::from_millis(500)), 0.0);
        assert_eq!(timing.progress(Duration::from_millis(1375)), 0.5);
        assert_eq!(timing.progress(Duration::from_millis(1750)), 1.0);
        assert!(!timing.is_finished(Duration::from_millis(1749)));
        assert!(timing.is_finished(Duration::from_millis(1750)));
    }

    #[test]
    fn axes_join_after_first_pass() {
        let mut scheduler = TransitionScheduler::new();
        let first = scheduler.schedule(&[], true, Duration::ZERO);
        assert!(!first.axes);
        let second = scheduler.schedule(&[], true, Duration::from_secs(1));
        assert!(second.axes);
        let hidden = scheduler.schedule(&[], false, Duration::from_secs(2));
        assert!(!hidden.axes);
        assert_eq!(scheduler.passes(), 3);
    }

    #[test]
    fn serializes_durations_in_millis() {
        let timing = Timing::starting_at(Duration::from_millis(1500));
        let json = serde_json::to_value(timing).unwrap();
        assert_eq!(json["startMs"], 1500.0);
        assert_eq!(json["durationMs"], 750.0);
        assert_eq!(json["easing"], "cubic-in-out");
    }
}
