//! Frame timing for the render loop.
//!
//! The `FrameMonitor` keeps a rolling window of inter-frame deltas from which it
//! derives FPS and a dropped-frame count. Render and data-processing work are
//! timed separately as start/stop scopes and do not affect the frame deltas.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use streamcanvas_core::ManualClock;
//! use streamcanvas_ui::frame_monitor::{FrameMonitor, MonitorConfig};
//!
//! let clock = Rc::new(ManualClock::default());
//! let mut monitor = FrameMonitor::with_clock(MonitorConfig::default(), clock.clone());
//!
//! for _ in 0..3 {
//!     clock.advance(Duration::from_millis(20));
//!     monitor.sample();
//! }
//!
//! let metrics = monitor.metrics();
//! assert_eq!(metrics.fps, 50.0);
//! assert_eq!(metrics.frame_drops, 3);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use streamcanvas_core::time::{Clock, SystemClock, as_millis_f64};

/// Configuration for the frame monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Number of deltas kept in the rolling window.
    pub window: usize,
    /// Single-frame budget; longer deltas count as drops.
    pub frame_budget: Duration,
    /// FPS reported while the window is empty.
    pub idle_fps: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window: 60,
            frame_budget: Duration::from_secs_f64(1.0 / 60.0),
            idle_fps: 60.0,
        }
    }
}

/// A snapshot of frame performance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameMetrics {
    pub fps: f64,
    pub memory_usage_mb: f64,
    /// Duration of the last completed render scope.
    pub render_time_ms: f64,
    /// Duration of the last completed data-processing scope.
    pub data_processing_time_ms: f64,
    pub frame_drops: u64,
}

/// Which scoped interval a timer measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimedScope {
    Render,
    DataProcessing,
}

#[derive(Debug, Default, Clone, Copy)]
struct ScopeTimer {
    started: Option<Duration>,
    last: Duration,
}

impl ScopeTimer {
    fn begin(&mut self, now: Duration) {
        self.started = Some(now);
    }

    fn end(&mut self, now: Duration) -> Option<Duration> {
        let started = self.started.take()?;
        self.last = now.saturating_sub(started);
        Some(self.last)
    }
}

/// Rolling frame-delta tracker.
#[derive(Debug)]
pub struct FrameMonitor<C: Clock = SystemClock> {
    config: MonitorConfig,
    clock: C,
    deltas: VecDeque<Duration>,
    delta_sum: Duration,
    last_sample: Duration,
    frame_count: u64,
    frame_drops: u64,
    render: ScopeTimer,
    data_processing: ScopeTimer,
    memory_usage_bytes: u64,
}

impl FrameMonitor<SystemClock> {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl Default for FrameMonitor<SystemClock> {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl<C: Clock> FrameMonitor<C> {
    /// Create a monitor whose first delta is measured from now.
    pub fn with_clock(config: MonitorConfig, clock: C) -> Self {
        let now = clock.elapsed();
        Self {
            deltas: VecDeque::with_capacity(config.window),
            config,
            clock,
            delta_sum: Duration::ZERO,
            last_sample: now,
            frame_count: 0,
            frame_drops: 0,
            render: ScopeTimer::default(),
            data_processing: ScopeTimer::default(),
            memory_usage_bytes: 0,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Record a frame boundary at the clock's current time.
    pub fn sample(&mut self) -> Duration {
        let now = self.clock.elapsed();
        self.sample_at(now)
    }

    /// Record a frame boundary at `now`, returning the delta since the last one.
    ///
    /// A clock that moves backwards yields a zero delta.
    pub fn sample_at(&mut self, now: Duration) -> Duration {
        let delta = now.saturating_sub(self.last_sample);
        self.last_sample = now;
        self.frame_count += 1;

        self.deltas.push_back(delta);
        self.delta_sum += delta;
        while self.deltas.len() > self.config.window.max(1) {
            if let Some(evicted) = self.deltas.pop_front() {
                self.delta_sum = self.delta_sum.saturating_sub(evicted);
            }
        }

        if delta > self.config.frame_budget {
            self.frame_drops += 1;
            tracing::trace!("Dropped frame: {:.2}ms", as_millis_f64(delta));
        }
        delta
    }

    /// Mean delta over the window, if any samples exist.
    pub fn average_frame_time(&self) -> Option<Duration> {
        if self.deltas.is_empty() {
            return None;
        }
        Some(self.delta_sum / self.deltas.len() as u32)
    }

    pub fn fps(&self) -> f64 {
        if self.deltas.is_empty() {
            return self.config.idle_fps;
        }
        let mean_ms = as_millis_f64(self.delta_sum) / self.deltas.len() as f64;
        if mean_ms > 0.0 {
            1000.0 / mean_ms
        } else {
            self.config.idle_fps
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_drops(&self) -> u64 {
        self.frame_drops
    }

    pub fn window_len(&self) -> usize {
        self.deltas.len()
    }

    pub fn begin(&mut self, scope: TimedScope) {
        let now = self.clock.elapsed();
        self.timer_mut(scope).begin(now);
    }

    /// Close the open interval for `scope`. Returns `None` if none was open.
    pub fn end(&mut self, scope: TimedScope) -> Option<Duration> {
        let now = self.clock.elapsed();
        self.timer_mut(scope).end(now)
    }

    /// Run `f` inside a timed scope.
    pub fn time<R>(&mut self, scope: TimedScope, f: impl FnOnce() -> R) -> R {
        self.begin(scope);
        let result = f();
        self.end(scope);
        result
    }

    pub fn last_duration(&self, scope: TimedScope) -> Duration {
        match scope {
            TimedScope::Render => self.render.last,
            TimedScope::DataProcessing => self.data_processing.last,
        }
    }

    /// Record the caller's memory estimate, reported in MB.
    pub fn set_memory_usage_bytes(&mut self, bytes: u64) {
        self.memory_usage_bytes = bytes;
    }

    /// Clear the delta window and drop count. Scope durations are kept.
    pub fn reset(&mut self) {
        self.deltas.clear();
        self.delta_sum = Duration::ZERO;
        self.frame_count = 0;
        self.frame_drops = 0;
        self.last_sample = self.clock.elapsed();
    }

    /// A fresh snapshot of the current numbers.
    pub fn metrics(&self) -> FrameMetrics {
        FrameMetrics {
            fps: self.fps(),
            memory_usage_mb: self.memory_usage_bytes as f64 / (1024.0 * 1024.0),
            render_time_ms: as_millis_f64(self.render.last),
            data_processing_time_ms: as_millis_f64(self.data_processing.last),
            frame_drops: self.frame_drops,
        }
    }

    fn timer_mut(&mut self, scope: TimedScope) -> &mut ScopeTimer {
        match scope {
            TimedScope::Render => &mut self.render,
            TimedScope::DataProcessing => &mut self.data_processing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use streamcanvas_core::ManualClock;

    fn monitor() -> (Rc<ManualClock>, FrameMonitor<Rc<ManualClock>>) {
        let clock = Rc::new(ManualClock::default());
        let monitor = FrameMonitor::with_clock(MonitorConfig::default(), clock.clone());
        (clock, monitor)
    }

    #[test]
    fn test_idle_fps() {
        let (_, monitor) = monitor();
        assert_eq!(monitor.fps(), 60.0);
        assert_eq!(monitor.metrics().frame_drops, 0);
        assert!(monitor.average_frame_time().is_none());
    }

    #[test]
    fn test_first_delta_from_construction() {
        let (clock, mut monitor) = monitor();
        clock.advance(Duration::from_millis(10));
        assert_eq!(monitor.sample(), Duration::from_millis(10));
        assert_eq!(monitor.fps(), 100.0);
    }

    #[test]
    fn test_drops_counted_over_budget() {
        let (_, mut monitor) = monitor();
        monitor.sample_at(Duration::from_millis(16));
        monitor.sample_at(Duration::from_millis(33));
        monitor.sample_at(Duration::from_millis(83));

        // 16ms and 17ms are within or just over the 16.67ms budget
        assert_eq!(monitor.frame_drops(), 2);
        assert_eq!(monitor.frame_count(), 3);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let (_, mut monitor) = monitor();
        let mut now = Duration::ZERO;

        // One slow frame, then a full window of fast ones pushes it out
        now += Duration::from_millis(100);
        monitor.sample_at(now);
        for _ in 0..60 {
            now += Duration::from_millis(10);
            monitor.sample_at(now);
        }

        assert_eq!(monitor.window_len(), 60);
        assert_eq!(monitor.average_frame_time(), Some(Duration::from_millis(10)));
        assert_eq!(monitor.fps(), 100.0);
        assert_eq!(monitor.frame_drops(), 1);
    }

    #[test]
    fn test_backwards_clock_is_zero_delta() {
        let (_, mut monitor) = monitor();
        monitor.sample_at(Duration::from_millis(50));
        assert_eq!(monitor.sample_at(Duration::from_millis(20)), Duration::ZERO);
    }

    #[test]
    fn test_scoped_timers_are_independent() {
        let (clock, mut monitor) = monitor();

        monitor.begin(TimedScope::Render);
        clock.advance(Duration::from_millis(4));
        monitor.begin(TimedScope::DataProcessing);
        clock.advance(Duration::from_millis(2));
        assert_eq!(monitor.end(TimedScope::DataProcessing), Some(Duration::from_millis(2)));
        assert_eq!(monitor.end(TimedScope::Render), Some(Duration::from_millis(6)));
        assert_eq!(monitor.end(TimedScope::Render), None);

        let metrics = monitor.metrics();
        assert_eq!(metrics.render_time_ms, 6.0);
        assert_eq!(metrics.data_processing_time_ms, 2.0);
        // Scopes do not produce frame samples
        assert_eq!(monitor.window_len(), 0);
    }

    #[test]
    fn test_time_closure() {
        let (clock, mut monitor) = monitor();
        let value = monitor.time(TimedScope::Render, || {
            clock.advance(Duration::from_millis(3));
            7
        });
        assert_eq!(value, 7);
        assert_eq!(monitor.last_duration(TimedScope::Render), Duration::from_millis(3));
    }

    #[test]
    fn test_reset_and_memory() {
        let (clock, mut monitor) = monitor();
        clock.advance(Duration::from_millis(40));
        monitor.sample();
        monitor.set_memory_usage_bytes(3 * 1024 * 1024);
        assert_eq!(monitor.metrics().memory_usage_mb, 3.0);

        monitor.reset();
        assert_eq!(monitor.frame_drops(), 0);
        assert_eq!(monitor.fps(), 60.0);

        // The next delta starts at the reset
        clock.advance(Duration::from_millis(5));
        assert_eq!(monitor.sample(), Duration::from_millis(5));
    }
}
