//! Synthetic data for demos, tests and the live stream.
//!
//! Values follow a slow sine wave around 100 with uniform noise, and each
//! point is tagged with a random category from [`CATEGORIES`].

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::point::{Metadata, Point};

/// Categories assigned by the synthetic generators.
pub const CATEGORIES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Spacing of the initial dataset, one point per second.
pub const INITIAL_SPACING_MS: f64 = 1000.0;

const BASELINE: f64 = 100.0;
const AMPLITUDE: f64 = 50.0;
const NOISE: f64 = 20.0;

/// Errors raised while producing a streamed point.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// The timestamp the point would carry is NaN or infinite.
    NonFiniteTime { time: f64 },
    /// The source has no more points to give.
    Exhausted,
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::NonFiniteTime { time } => {
                write!(f, "Cannot generate a point at non-finite time {}", time)
            }
            GeneratorError::Exhausted => write!(f, "Point source exhausted"),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Produces the next point of a live stream.
pub trait PointGenerator {
    /// Produce the point following one at `previous_time`, stamped at `time`.
    fn generate(&mut self, previous_time: f64, time: f64) -> Result<Point, GeneratorError>;
}

impl<F> PointGenerator for F
where
    F: FnMut(f64, f64) -> Result<Point, GeneratorError>,
{
    fn generate(&mut self, previous_time: f64, time: f64) -> Result<Point, GeneratorError> {
        self(previous_time, time)
    }
}

/// Sine-plus-noise generator for realtime points.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator<R = StdRng> {
    rng: R,
}

impl SyntheticGenerator<StdRng> {
    /// Generator with a reproducible sequence.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> SyntheticGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PointGenerator for SyntheticGenerator<R> {
    fn generate(&mut self, previous_time: f64, time: f64) -> Result<Point, GeneratorError> {
        if !time.is_finite() {
            return Err(GeneratorError::NonFiniteTime { time });
        }
        let base = if previous_time.is_finite() {
            previous_time
        } else {
            time
        };
        let value = (base / 10_000.0).sin() * AMPLITUDE + self.rng.random::<f64>() * NOISE + BASELINE;
        let metadata = Metadata::new()
            .with("realtime", true)
            .with("volatility", self.rng.random::<f64>());

        Ok(Point {
            time,
            value,
            category: Some(random_category(&mut self.rng)),
            metadata: Some(Arc::new(metadata)),
        })
    }
}

fn random_category<R: Rng>(rng: &mut R) -> Arc<str> {
    Arc::from(CATEGORIES[rng.random_range(0..CATEGORIES.len())])
}

/// The historical dataset shown before streaming starts.
///
/// `count` points, one per second, ending one second before `now_ms`.
pub fn generate_initial_dataset<R: Rng>(count: usize, now_ms: f64, rng: &mut R) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let time = now_ms - (count - i) as f64 * INITIAL_SPACING_MS;
            let value = (i as f64 / 100.0).sin() * AMPLITUDE + rng.random::<f64>() * NOISE + BASELINE;
            let category = random_category(rng);
            let metadata = Metadata::new()
                .with("index", i as i64)
                .with("volatility", rng.random::<f64>());
            Point {
                time,
                value,
                category: Some(category),
                metadata: Some(Arc::new(metadata)),
            }
        })
        .collect()
}
