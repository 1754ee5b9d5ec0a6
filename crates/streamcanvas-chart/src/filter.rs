//! Category and time-range selection ahead of aggregation.

use std::sync::Arc;

use streamcanvas_core::alloc::HashSet;
use streamcanvas_core::profiling::profile_function;

use crate::aggregation::{AggregationPeriod, aggregate_by_period, sort_by_time};
use crate::generator::CATEGORIES;
use crate::point::Point;

/// Inclusive time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The `duration_ms` leading up to `now_ms`.
    pub fn last(duration_ms: f64, now_ms: f64) -> Self {
        Self::new(now_ms - duration_ms, now_ms)
    }

    pub const fn unbounded() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Which points reach the charts, and how they are bucketed.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub categories: HashSet<Arc<str>>,
    pub time_range: TimeRange,
    pub aggregation: AggregationPeriod,
}

impl FilterOptions {
    /// Options admitting `categories` over `time_range`.
    pub fn new<I, S>(categories: I, time_range: TimeRange, aggregation: AggregationPeriod) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            time_range,
            aggregation,
        }
    }

    /// Show or hide one category. Returns whether it is now selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.categories.remove(category) {
            false
        } else {
            self.categories.insert(Arc::from(category));
            true
        }
    }

    /// A point passes when its category is selected and its time is in range.
    /// Points without a category never pass.
    pub fn matches(&self, point: &Point) -> bool {
        point
            .category()
            .is_some_and(|category| self.categories.contains(category))
            && self.time_range.contains(point.time)
    }
}

impl Default for FilterOptions {
    /// Every generated category, any time, one-minute buckets.
    fn default() -> Self {
        Self::new(CATEGORIES, TimeRange::unbounded(), AggregationPeriod::default())
    }
}

/// Filter, aggregate, then sort by time.
pub fn apply_filters(points: &[Point], options: &FilterOptions) -> Vec<Point> {
    profile_function!();

    let selected: Vec<Point> = points
        .iter()
        .filter(|point| options.matches(point))
        .cloned()
        .collect();

    let mut output = match options.aggregation.milliseconds() {
        0 => selected,
        period => aggregate_by_period(&selected, period),
    };
    sort_by_time(&mut output);

    tracing::debug!(
        "Filtered {} points down to {} ({})",
        points.len(),
        output.len(),
        options.aggregation
    );
    output
}
