//! Data-space extent of a point set.

use crate::point::Point;

/// Minimum and maximum of both axes over the finite points of a dataset.
///
/// Computed fresh for every frame. Both spans are always strictly positive:
/// an axis whose min equals its max is widened by one unit on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_time: f64,
    pub max_time: f64,
    pub min_value: f64,
    pub max_value: f64,
}

impl Bounds {
    /// Amount each side of a degenerate axis is widened by.
    pub const DEGENERATE_PAD: f64 = 1.0;

    /// Scan `points` once, skipping non-finite samples.
    ///
    /// Returns `None` when no point is finite. Renderers treat that as
    /// "nothing to draw".
    pub fn from_points(points: &[Point]) -> Option<Self> {
        Self::from_points_iter(points)
    }

    pub fn from_points_iter<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut min_time = f64::INFINITY;
        let mut max_time = f64::NEG_INFINITY;
        let mut min_value = f64::INFINITY;
        let mut max_value = f64::NEG_INFINITY;
        let mut seen = false;

        for point in points {
            if !point.is_finite() {
                continue;
            }
            seen = true;
            min_time = min_time.min(point.time);
            max_time = max_time.max(point.time);
            min_value = min_value.min(point.value);
            max_value = max_value.max(point.value);
        }

        if !seen {
            return None;
        }

        if min_time == max_time {
            min_time -= Self::DEGENERATE_PAD;
            max_time += Self::DEGENERATE_PAD;
        }
        if min_value == max_value {
            min_value -= Self::DEGENERATE_PAD;
            max_value += Self::DEGENERATE_PAD;
        }

        Some(Self {
            min_time,
            max_time,
            min_value,
            max_value,
        })
    }

    pub fn time_span(&self) -> f64 {
        self.max_time - self.min_time
    }

    pub fn value_span(&self) -> f64 {
        self.max_value - self.min_value
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.is_finite()
            && (self.min_time..=self.max_time).contains(&point.time)
            && (self.min_value..=self.max_value).contains(&point.value)
    }
}
