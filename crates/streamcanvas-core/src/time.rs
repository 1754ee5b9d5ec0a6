//! Clock sources for stream ticks and frame timing.
//!
//! Everything time-dependent in streamcanvas takes timestamps as arguments and
//! asks a [`Clock`] only at the outermost loop, so tests and headless renders can
//! drive a [`ManualClock`] instead of real time.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A source of monotonic and wall-clock time.
pub trait Clock {
    /// Monotonic time since the clock was created.
    fn elapsed(&self) -> Duration;

    /// Wall-clock time as milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> f64;
}

/// Real time, backed by `Instant` and `SystemTime`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn epoch_millis(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// A clock that only moves when told to.
///
/// Monotonicity is not enforced: `set` may move time backwards, which the
/// stream and monitor code tolerate.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Duration>,
    epoch_origin_ms: f64,
}

impl ManualClock {
    /// Create a clock at `elapsed == 0` whose wall clock starts at `epoch_origin_ms`.
    pub fn new(epoch_origin_ms: f64) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            epoch_origin_ms,
        }
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, elapsed: Duration) {
        self.now.set(elapsed);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }

    fn epoch_millis(&self) -> f64 {
        self.epoch_origin_ms + self.now.get().as_secs_f64() * 1000.0
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }

    fn epoch_millis(&self) -> f64 {
        (**self).epoch_millis()
    }
}

/// Convert a duration to fractional milliseconds.
#[inline]
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
