//! Fixed-width time bucketing.
//!
//! Each point falls into the bucket `floor(time / period) * period`. Every
//! non-empty bucket becomes one synthetic point whose value is the mean of its
//! members, whose category is the first member's, and whose metadata records
//! the member count.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use streamcanvas_core::profiling::profile_function;

use crate::point::{Metadata, Point};

/// Bucket widths offered to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AggregationPeriod {
    /// No bucketing; points pass through unchanged.
    None,
    #[default]
    OneMinute,
    FiveMinutes,
    OneHour,
}

impl AggregationPeriod {
    pub const ALL: [AggregationPeriod; 4] = [
        AggregationPeriod::None,
        AggregationPeriod::OneMinute,
        AggregationPeriod::FiveMinutes,
        AggregationPeriod::OneHour,
    ];

    pub const fn milliseconds(self) -> u64 {
        match self {
            AggregationPeriod::None => 0,
            AggregationPeriod::OneMinute => 60_000,
            AggregationPeriod::FiveMinutes => 300_000,
            AggregationPeriod::OneHour => 3_600_000,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AggregationPeriod::None => "Raw",
            AggregationPeriod::OneMinute => "1 Minute",
            AggregationPeriod::FiveMinutes => "5 Minutes",
            AggregationPeriod::OneHour => "1 Hour",
        }
    }
}

impl fmt::Display for AggregationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct Bucket {
    time: f64,
    sum: f64,
    count: usize,
    category: Option<Arc<str>>,
}

/// Bucket `points` into windows of `period_ms` milliseconds.
///
/// Buckets are emitted in the order their first member appears, which is not
/// necessarily time order; call [`sort_by_time`] when order matters. A period
/// of zero returns a copy of the input.
///
/// Points with a non-finite time are grouped under their own NaN or infinite
/// key, so the member counts of the output always sum to the input length.
///
/// Aggregating already-aggregated data with the same period yields one point
/// per bucket again, but the new `count` starts over at the number of
/// incoming buckets (usually 1) rather than summing the earlier counts.
pub fn aggregate_by_period(points: &[Point], period_ms: u64) -> Vec<Point> {
    profile_function!();

    if period_ms == 0 {
        return points.to_vec();
    }

    let period = period_ms as f64;
    let mut buckets: IndexMap<u64, Bucket> = IndexMap::new();

    for point in points {
        let time = bucket_start(point.time, period);
        let bucket = buckets.entry(bucket_key(time)).or_insert_with(|| Bucket {
            time,
            sum: 0.0,
            count: 0,
            category: point.category.clone(),
        });
        bucket.sum += point.value;
        bucket.count += 1;
    }

    tracing::trace!(
        "Aggregated {} points into {} buckets of {}ms",
        points.len(),
        buckets.len(),
        period_ms
    );

    buckets
        .into_values()
        .map(|bucket| Point {
            time: bucket.time,
            value: bucket.sum / bucket.count as f64,
            category: bucket.category,
            metadata: Some(Arc::new(Metadata::aggregated(bucket.count))),
        })
        .collect()
}

/// Stable sort by time. Non-finite times sort last.
pub fn sort_by_time(points: &mut [Point]) {
    points.sort_by(|a, b| {
        a.time
            .is_finite()
            .cmp(&b.time.is_finite())
            .reverse()
            .then(a.time.total_cmp(&b.time))
    });
}

fn bucket_start(time: f64, period: f64) -> f64 {
    (time / period).floor() * period
}

/// Hash key for a bucket start. All NaNs share one key and -0.0 maps to 0.0.
fn bucket_key(time: f64) -> u64 {
    if time.is_nan() {
        f64::NAN.to_bits()
    } else if time == 0.0 {
        0.0f64.to_bits()
    } else {
        time.to_bits()
    }
}
