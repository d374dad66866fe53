use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;

use super::linear::LinearScale;
use super::ticks;
use crate::dates::{self, DatePattern};

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const WEEK_MS: f64 = 7.0 * DAY_MS;
const MONTH_MS: f64 = 30.0 * DAY_MS;
const YEAR_MS: f64 = 365.0 * DAY_MS;

const MAX_STEPS: usize = 100_000;

/// Linear mapping over timestamps.
///
/// Works in milliseconds since the Unix epoch. String values are parsed
/// with the scale's date pattern.
#[derive(Clone, Debug, Serialize)]
pub struct TimeScale {
    domain: [NaiveDateTime; 2],
    range: [f64; 2],
    #[serde(skip)]
    inner: LinearScale,
    #[serde(skip)]
    pattern: Arc<DatePattern>,
}

impl TimeScale {
    pub fn new(domain: [NaiveDateTime; 2], range: [f64; 2], pattern: Arc<DatePattern>) -> Self {
        let inner = LinearScale::new(
            [dates::to_millis(&domain[0]), dates::to_millis(&domain[1])],
            range,
        );
        Self {
            domain,
            range,
            inner,
            pattern,
        }
    }

    pub fn domain(&self) -> [NaiveDateTime; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn pattern(&self) -> &DatePattern {
        &self.pattern
    }

    pub fn map(&self, at: &NaiveDateTime) -> f64 {
        self.inner.map(dates::to_millis(at))
    }

    pub fn map_millis(&self, ms: f64) -> f64 {
        self.inner.map(ms)
    }

    pub fn invert(&self, px: f64) -> Option<NaiveDateTime> {
        dates::from_millis(self.inner.invert(px))
    }

    /// Calendar-aligned ticks, about `count` of them.
    pub fn ticks(&self, count: usize) -> TimeTicks {
        let [start, stop] = self.domain;
        let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
        let interval = TimeInterval::for_span(
            dates::to_millis(&lo),
            dates::to_millis(&hi),
            count.max(1),
        );
        let mut values = interval.range(lo, hi);
        if stop < start {
            values.reverse();
        }
        TimeTicks { interval, values }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeTicks {
    pub interval: TimeInterval,
    pub values: Vec<NaiveDateTime>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// A calendar unit and how many of them lie between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

const INTERVALS: [(TimeUnit, u32, f64); 17] = [
    (TimeUnit::Second, 1, SECOND_MS),
    (TimeUnit::Second, 5, 5.0 * SECOND_MS),
    (TimeUnit::Second, 15, 15.0 * SECOND_MS),
    (TimeUnit::Second, 30, 30.0 * SECOND_MS),
    (TimeUnit::Minute, 1, MINUTE_MS),
    (TimeUnit::Minute, 5, 5.0 * MINUTE_MS),
    (TimeUnit::Minute, 15, 15.0 * MINUTE_MS),
    (TimeUnit::Minute, 30, 30.0 * MINUTE_MS),
    (TimeUnit::Hour, 1, HOUR_MS),
    (TimeUnit::Hour, 3, 3.0 * HOUR_MS),
    (TimeUnit::Hour, 6, 6.0 * HOUR_MS),
    (TimeUnit::Hour, 12, 12.0 * HOUR_MS),
    (TimeUnit::Day, 1, DAY_MS),
    (TimeUnit::Day, 2, 2.0 * DAY_MS),
    (TimeUnit::Week, 1, WEEK_MS),
    (TimeUnit::Month, 1, MONTH_MS),
    (TimeUnit::Month, 3, 3.0 * MONTH_MS),
];

impl TimeInterval {
    pub const fn new(unit: TimeUnit, step: u32) -> Self {
        Self { unit, step }
    }

    /// Interval whose tick spacing is closest to `(stop - start) / count`.
    pub fn for_span(start_ms: f64, stop_ms: f64, count: usize) -> Self {
        let target = (stop_ms - start_ms).abs() / count as f64;
        let i = INTERVALS.partition_point(|&(_, _, ms)| ms <= target);

        if i == INTERVALS.len() {
            let years = ticks::tick_step(start_ms / YEAR_MS, stop_ms / YEAR_MS, count);
            return Self::new(TimeUnit::Year, years.abs().max(1.0) as u32);
        }
        if i == 0 {
            let ms = ticks::tick_step(start_ms, stop_ms, count);
            return Self::new(TimeUnit::Millisecond, ms.abs().max(1.0) as u32);
        }

        let (below_unit, below_step, below_ms) = INTERVALS[i - 1];
        let (above_unit, above_step, above_ms) = INTERVALS[i];
        if target / below_ms < above_ms / target {
            Self::new(below_unit, below_step)
        } else {
            Self::new(above_unit, above_step)
        }
    }

    /// Default label pattern for ticks at this interval.
    pub fn default_format(&self) -> &'static str {
        match self.unit {
            TimeUnit::Millisecond => "%H:%M:%S%.3f",
            TimeUnit::Second => "%H:%M:%S",
            TimeUnit::Minute | TimeUnit::Hour => "%H:%M",
            TimeUnit::Day | TimeUnit::Week => "%b %d",
            TimeUnit::Month => "%B",
            TimeUnit::Year => "%Y",
        }
    }

    /// Interval boundaries within `[lo, hi]`.
    pub fn range(&self, lo: NaiveDateTime, hi: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let mut at = self.unit.ceil(lo);
        let mut steps = 0;
        while at <= hi && steps < MAX_STEPS {
            if self.keeps(&at) {
                out.push(at);
            }
            match self.unit.offset(at) {
                Some(next) => at = next,
                None => break,
            }
            steps += 1;
        }
        out
    }

    fn keeps(&self, at: &NaiveDateTime) -> bool {
        let step = self.step.max(1);
        match self.unit {
            TimeUnit::Millisecond => {
                (at.and_utc().timestamp_subsec_millis()).is_multiple_of(step)
            }
            TimeUnit::Second => at.second().is_multiple_of(step),
            TimeUnit::Minute => at.minute().is_multiple_of(step),
            TimeUnit::Hour => at.hour().is_multiple_of(step),
            TimeUnit::Day => (at.day() - 1).is_multiple_of(step),
            TimeUnit::Week => true,
            TimeUnit::Month => at.month0().is_multiple_of(step),
            TimeUnit::Year => at.year().rem_euclid(step as i32) == 0,
        }
    }
}

impl TimeUnit {
    fn fixed_ms(self) -> Option<f64> {
        match self {
            Self::Millisecond => Some(1.0),
            Self::Second => Some(SECOND_MS),
            Self::Minute => Some(MINUTE_MS),
            Self::Hour => Some(HOUR_MS),
            Self::Day => Some(DAY_MS),
            Self::Week | Self::Month | Self::Year => None,
        }
    }

    /// Latest boundary at or before `at`.
    fn floor(self, at: NaiveDateTime) -> NaiveDateTime {
        if let Some(unit_ms) = self.fixed_ms() {
            let ms = dates::to_millis(&at);
            let floored = (ms / unit_ms).floor() * unit_ms;
            return at - TimeDelta::milliseconds((ms - floored) as i64);
        }
        let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN);
        match self {
            Self::Week => {
                let day = Self::Day.floor(at);
                day - TimeDelta::days(day.weekday().num_days_from_sunday().into())
            }
            Self::Month => midnight(at.date().with_day(1).unwrap_or(at.date())),
            _ => midnight(at.date().with_ordinal(1).unwrap_or(at.date())),
        }
    }

    /// Earliest boundary at or after `at`.
    fn ceil(self, at: NaiveDateTime) -> NaiveDateTime {
        let floored = self.floor(at);
        if floored < at {
            self.offset(floored).unwrap_or(floored)
        } else {
            floored
        }
    }

    /// The boundary one unit after `at`.
    fn offset(self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Week => at.checked_add_signed(TimeDelta::days(7)),
            Self::Month => at.checked_add_months(Months::new(1)),
            Self::Year => at.checked_add_months(Months::new(12)),
            fixed => {
                let ms = fixed.fixed_ms()? as i64;
                at.checked_add_signed(TimeDelta::milliseconds(ms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn scale(lo: NaiveDateTime, hi: NaiveDateTime) -> TimeScale {
        let pattern = Arc::new(DatePattern::compile("%d-%b-%y").unwrap());
        TimeScale::new([lo, hi], [0.0, 100.0], pattern)
    }

    #[test]
    fn maps_and_inverts_linearly() {
        let s = scale(at(2020, 1, 1, 0, 0), at(2020, 1, 11, 0, 0));
        assert_eq!(s.map(&at(2020, 1, 6, 0, 0)), 50.0);
        assert_eq!(s.invert(10.0), Some(at(2020, 1, 2, 0, 0)));
    }

    #[test]
    fn picks_daily_ticks_for_ten_days() {
        let s = scale(at(2020, 1, 1, 0, 0), at(2020, 1, 11, 0, 0));
        let ticks = s.ticks(10);
        assert_eq!(ticks.interval, TimeInterval::new(TimeUnit::Day, 1));
        assert_eq!(ticks.values.len(), 11);
        assert_eq!(ticks.values[0], at(2020, 1, 1, 0, 0));
    }

    #[test]
    fn hour_ticks_align_to_step() {
        let s = scale(at(2020, 1, 1, 1, 20), at(2020, 1, 2, 1, 0));
        let ticks = s.ticks(8);
        assert_eq!(ticks.interval, TimeInterval::new(TimeUnit::Hour, 3));
        assert_eq!(ticks.values[0], at(2020, 1, 1, 3, 0));
        assert!(ticks.values.iter().all(|t| t.hour() % 3 == 0));
    }

    #[test]
    fn month_and_year_ticks_start_on_boundaries() {
        let s = scale(at(2019, 11, 15, 0, 0), at(2020, 9, 1, 0, 0));
        let months = s.ticks(10);
        assert_eq!(months.interval, TimeInterval::new(TimeUnit::Month, 1));
        assert_eq!(months.values[0], at(2019, 12, 1, 0, 0));

        let s = scale(at(1990, 6, 1, 0, 0), at(2030, 1, 1, 0, 0));
        let years = s.ticks(10);
        assert_eq!(years.interval, TimeInterval::new(TimeUnit::Year, 5));
        assert_eq!(years.values[0], at(1995, 1, 1, 0, 0));
    }

    #[test]
    fn week_ticks_fall_on_sundays() {
        let s = scale(at(2021, 1, 1, 0, 0), at(2021, 3, 15, 0, 0));
        let ticks = s.ticks(10);
        assert_eq!(ticks.interval, TimeInterval::new(TimeUnit::Week, 1));
        assert!(
            ticks
                .values
                .iter()
                .all(|t| t.weekday() == chrono::Weekday::Sun)
        );
    }
}
