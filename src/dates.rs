//! Date patterns, compiled once and shared.
//!
//! A [`DatePattern`] is a strftime-style pattern compiled into chrono format
//! items. It parses data values and formats tick labels. A
//! [`DateParserCache`] keeps compiled patterns keyed by their source string.
//! The chart owns its cache, or one can be injected and shared between charts.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::format::{self, Item, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDateTime, NaiveTime};
use error_stack::Report;
use parking_lot::Mutex;
use tracing::trace;

use crate::Result;
use crate::error::PlotError;

pub const DEFAULT_CACHE_CAPACITY: usize = 32;

#[derive(Debug)]
pub struct DatePattern {
    source: String,
    items: Vec<Item<'static>>,
}

impl DatePattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let items = StrftimeItems::new(pattern).parse_to_owned().map_err(|e| {
            Report::new(PlotError::InvalidConfig(format!(
                "invalid date pattern `{pattern}`"
            )))
            .attach(e.to_string())
        })?;
        Ok(Self {
            source: pattern.to_string(),
            items,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse a value. Patterns without time fields resolve to midnight.
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime> {
        let fail = |cause: String| {
            Report::new(PlotError::DateParse {
                value: value.to_string(),
                pattern: self.source.clone(),
            })
            .attach(cause)
        };

        let mut parsed = Parsed::new();
        format::parse(&mut parsed, value, self.items.iter()).map_err(|e| fail(e.to_string()))?;
        let date = parsed.to_naive_date().map_err(|e| fail(e.to_string()))?;
        let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
        Ok(date.and_time(time))
    }

    /// Format a timestamp. Falls back to ISO form when the pattern asks for
    /// fields a naive timestamp does not have (e.g. `%z`).
    pub fn format(&self, at: &NaiveDateTime) -> String {
        let mut out = String::new();
        match write!(out, "{}", at.format_with_items(self.items.iter())) {
            Ok(()) => out,
            Err(_) => at.to_string(),
        }
    }
}

/// Milliseconds since the Unix epoch, the unit time scales work in.
pub fn to_millis(at: &NaiveDateTime) -> f64 {
    at.and_utc().timestamp_millis() as f64
}

pub fn from_millis(ms: f64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms.round() as i64).map(|dt| dt.naive_utc())
}

/// Bounded, thread-safe map from pattern string to compiled pattern.
///
/// Eviction is first-in-first-out once `capacity` patterns are held.
#[derive(Debug)]
pub struct DateParserCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    patterns: HashMap<String, Arc<DatePattern>>,
    order: VecDeque<String>,
}

impl DateParserCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.inner.lock().patterns.contains_key(pattern)
    }

    /// Compiled pattern for `pattern`, compiling and caching it on first use.
    pub fn get(&self, pattern: &str) -> Result<Arc<DatePattern>> {
        let mut inner = self.inner.lock();
        if let Some(hit) = inner.patterns.get(pattern) {
            trace!(pattern, "date pattern cache hit");
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(DatePattern::compile(pattern)?);
        if inner.order.len() >= self.capacity
            && let Some(oldest) = inner.order.pop_front()
        {
            inner.patterns.remove(&oldest);
        }
        inner.order.push_back(pattern.to_string());
        inner
            .patterns
            .insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Shorthand for `get(pattern)?.parse(value)`.
    pub fn parse(&self, pattern: &str, value: &str) -> Result<NaiveDateTime> {
        self.get(pattern)?.parse(value)
    }
}

impl Default for DateParserCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_default_pattern_to_midnight() {
        let cache = DateParserCache::default();
        let at = cache.parse("%d-%b-%y", "1-May-12").unwrap();
        let expected = NaiveDate::from_ymd_opt(2012, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(at, expected);
    }

    #[test]
    fn parses_time_fields_when_present() {
        let cache = DateParserCache::default();
        let at = cache.parse("%Y-%m-%d %H:%M", "2020-02-29 13:45").unwrap();
        assert_eq!(at.to_string(), "2020-02-29 13:45:00");
    }

    #[test]
    fn rejects_values_that_do_not_match() {
        let cache = DateParserCache::default();
        let err = cache.parse("%d-%b-%y", "2012/05/01").unwrap_err();
        assert_eq!(
            err.current_context(),
            &PlotError::DateParse {
                value: "2012/05/01".into(),
                pattern: "%d-%b-%y".into(),
            }
        );
    }

    #[test]
    fn rejects_invalid_patterns() {
        let cache = DateParserCache::default();
        let err = cache.get("%Y%").unwrap_err();
        assert!(matches!(err.current_context(), PlotError::InvalidConfig(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn reuses_compiled_patterns() {
        let cache = DateParserCache::default();
        let a = cache.get("%Y").unwrap();
        let b = cache.get("%Y").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_oldest_pattern_when_full() {
        let cache = DateParserCache::with_capacity(2);
        cache.get("%Y").unwrap();
        cache.get("%m").unwrap();
        cache.get("%d").unwrap();
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("%Y"));
        assert!(cache.contains("%m"));
        assert!(cache.contains("%d"));
    }

    #[test]
    fn formats_with_the_same_pattern() {
        let pattern = DatePattern::compile("%b %Y").unwrap();
        let at = NaiveDate::from_ymd_opt(2016, 3, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(pattern.format(&at), "Mar 2016");
        assert_eq!(from_millis(to_millis(&at)), Some(at));
    }
}
