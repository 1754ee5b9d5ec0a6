//! Bounded live data window.
//!
//! [`StreamWindow`] holds the most recent points of a live series in a
//! fixed-capacity [`RingBuffer`]. While streaming, a periodic timer on the
//! [`Scheduler`] drives [`StreamWindow::tick`], which synthesizes one point
//! per period and evicts the oldest once the window is full.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use streamcanvas_chart::{StreamConfig, StreamWindow, SyntheticGenerator};
//! use streamcanvas_render::Scheduler;
//!
//! let config = StreamConfig { capacity: 3, ..Default::default() };
//! let mut window = StreamWindow::new(config, SyntheticGenerator::from_seed(1));
//! let mut scheduler = Scheduler::new();
//!
//! window.start(&mut scheduler, "tick");
//! for _ in scheduler.advance_to(Duration::from_millis(500)) {
//!     window.tick(0.0);
//! }
//! assert_eq!(window.len(), 3);
//!
//! window.stop(&mut scheduler);
//! assert!(!window.is_streaming());
//! ```

use std::time::Duration;

use streamcanvas_core::profiling::profile_function;
use streamcanvas_render::{Scheduler, TaskHandle};

use crate::generator::PointGenerator;
use crate::point::Point;

/// Fixed-capacity FIFO that overwrites its oldest element when full.
///
/// Storage grows up to `capacity` and is then reused in place, so pushes are
/// O(1) and never reallocate once the buffer is full.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Vec<T>,
    capacity: usize,
    /// Index of the oldest element once the buffer has filled.
    head: usize,
    total_written: u64,
}

impl<T: Clone> RingBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_written: 0,
        }
    }

    /// Build a buffer from `items`, keeping only the newest `capacity`.
    pub fn from_vec(mut items: Vec<T>, capacity: usize) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.total_written = items.len() as u64;
        if items.len() > buffer.capacity {
            items.drain(..items.len() - buffer.capacity);
        }
        buffer.data = items;
        buffer
    }

    /// Append `item`, returning the evicted oldest element if the buffer was full.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        self.total_written = self.total_written.wrapping_add(1);
        if self.data.len() < self.capacity {
            self.data.push(item);
            return None;
        }
        let evicted = std::mem::replace(&mut self.data[self.head], item);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Item by logical index, 0 being the oldest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.data.len() {
            return None;
        }
        self.data.get((self.head + index) % self.data.len())
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Total number of items ever pushed, evicted ones included.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }

    /// Contents as up to two slices that together run oldest to newest.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (newer, older) = self.data.split_at(self.head);
        (older, newer)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        let (older, newer) = self.as_slices();
        IterChain {
            older: older.iter(),
            newer: newer.iter(),
        }
    }

    /// Contiguous copy, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        let (older, newer) = self.as_slices();
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(older);
        out.extend_from_slice(newer);
        out
    }
}

/// `Chain` is not `ExactSizeIterator`; this one is.
struct IterChain<'a, T> {
    older: std::slice::Iter<'a, T>,
    newer: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for IterChain<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.older.next().or_else(|| self.newer.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.older.len() + self.newer.len();
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IterChain<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.newer.next_back().or_else(|| self.older.next_back())
    }
}

impl<T> ExactSizeIterator for IterChain<'_, T> {}

/// Stream window tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// Maximum number of points retained.
    pub capacity: usize,
    /// Period of the stream timer, also the spacing of generated timestamps.
    pub tick_interval: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            tick_interval: Duration::from_millis(100),
        }
    }
}

/// Whether the stream timer is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Streaming { timer: TaskHandle },
}

/// Capacity-bounded live series fed by a [`PointGenerator`].
#[derive(Debug)]
pub struct StreamWindow<G> {
    config: StreamConfig,
    buffer: RingBuffer<Point>,
    generator: G,
    state: StreamState,
    failed_ticks: u64,
}

impl<G: PointGenerator> StreamWindow<G> {
    pub fn new(config: StreamConfig, generator: G) -> Self {
        let buffer = RingBuffer::new(config.capacity);
        Self {
            config,
            buffer,
            generator,
            state: StreamState::Idle,
            failed_ticks: 0,
        }
    }

    /// Window pre-filled with `points` (newest `capacity` kept).
    pub fn with_points(config: StreamConfig, generator: G, points: Vec<Point>) -> Self {
        let mut window = Self::new(config, generator);
        window.reset(points);
        window
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.state, StreamState::Streaming { .. })
    }

    /// Register the stream timer, delivering `task` every tick interval.
    ///
    /// Starting an already streaming window keeps the existing timer.
    pub fn start<T: Clone>(&mut self, scheduler: &mut Scheduler<T>, task: T) -> TaskHandle {
        if let StreamState::Streaming { timer } = self.state {
            return timer;
        }
        let timer = scheduler.set_interval(self.config.tick_interval, task);
        self.state = StreamState::Streaming { timer };
        tracing::debug!(
            "Stream started, ticking every {:?} ({} points buffered)",
            self.config.tick_interval,
            self.buffer.len()
        );
        timer
    }

    /// Cancel the stream timer. The buffered points are kept.
    ///
    /// Returns `false` if the window was not streaming.
    pub fn stop<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) -> bool {
        let StreamState::Streaming { timer } = self.state else {
            return false;
        };
        scheduler.clear_interval(timer);
        self.state = StreamState::Idle;
        tracing::debug!("Stream stopped with {} points", self.buffer.len());
        true
    }

    /// Generate and append one point.
    ///
    /// The new point is stamped one tick interval after the newest buffered
    /// point, or after `now_ms` when the window is empty or the newest point
    /// has a non-finite time. A generator failure
    /// is logged and leaves the window untouched; returns whether a point was
    /// appended.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        profile_function!();

        let previous = self
            .buffer
            .last()
            .map(|p| p.time)
            .filter(|t| t.is_finite())
            .unwrap_or(now_ms);
        let time = previous + self.config.tick_interval.as_secs_f64() * 1000.0;

        match self.generator.generate(previous, time) {
            Ok(point) => {
                tracing::trace!("Stream tick at {}", point.time);
                self.buffer.push(point);
                true
            }
            Err(err) => {
                self.failed_ticks += 1;
                tracing::warn!("Stream tick failed: {}", err);
                false
            }
        }
    }

    /// Append an externally supplied point, evicting the oldest if full.
    pub fn push(&mut self, point: Point) {
        self.buffer.push(point);
    }

    /// Replace the whole buffer, keeping only the newest `capacity` points.
    ///
    /// Works in either state and does not start or stop the timer.
    pub fn reset(&mut self, points: Vec<Point>) {
        let incoming = points.len();
        self.buffer = RingBuffer::from_vec(points, self.config.capacity);
        tracing::debug!(
            "Stream window reset with {} points ({} kept)",
            incoming,
            self.buffer.len()
        );
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn last(&self) -> Option<&Point> {
        self.buffer.last()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Point> + ExactSizeIterator {
        self.buffer.iter()
    }

    /// Snapshot of the window, oldest first.
    pub fn points(&self) -> Vec<Point> {
        self.buffer.to_vec()
    }

    /// Ticks whose generator returned an error.
    pub fn failed_ticks(&self) -> u64 {
        self.failed_ticks
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorError, SyntheticGenerator};

    fn values(window: &StreamWindow<impl PointGenerator>) -> Vec<f64> {
        window.iter().map(|p| p.value).collect()
    }

    fn counter() -> impl FnMut(f64, f64) -> Result<Point, GeneratorError> {
        let mut n = 0.0;
        move |_prev, time| {
            n += 1.0;
            Ok(Point::new(time, n))
        }
    }

    #[test]
    fn test_ring_buffer_basic() {
        let mut buffer = RingBuffer::new(10);
        assert!(buffer.is_empty());
        buffer.push(1.0);
        buffer.push(2.0);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.first(), Some(&1.0));
        assert_eq!(buffer.last(), Some(&2.0));
    }

    #[test]
    fn test_ring_buffer_wrap() {
        let mut buffer = RingBuffer::new(3);
        for i in 1..=5 {
            buffer.push(i);
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.to_vec(), vec![3, 4, 5]);
        assert_eq!(buffer.get(0), Some(&3));
        assert_eq!(buffer.get(3), None);
        assert_eq!(buffer.total_written(), 5);
        assert_eq!(buffer.push(6), Some(3));
    }

    #[test]
    fn test_ring_buffer_iter_both_ends() {
        let mut buffer = RingBuffer::new(4);
        for i in 0..6 {
            buffer.push(i);
        }
        let forward: Vec<_> = buffer.iter().copied().collect();
        let backward: Vec<_> = buffer.iter().rev().copied().collect();
        assert_eq!(forward, vec![2, 3, 4, 5]);
        assert_eq!(backward, vec![5, 4, 3, 2]);
        assert_eq!(buffer.iter().len(), 4);
    }

    #[test]
    fn test_ring_buffer_from_vec_keeps_newest() {
        let buffer = RingBuffer::from_vec((0..10).collect(), 4);
        assert_eq!(buffer.to_vec(), vec![6, 7, 8, 9]);
        assert_eq!(RingBuffer::<u8>::new(0).capacity(), 1);
    }

    #[test]
    fn test_capacity_three_five_appends() {
        let config = StreamConfig {
            capacity: 3,
            ..Default::default()
        };
        let mut window = StreamWindow::new(config, counter());
        for _ in 0..5 {
            assert!(window.tick(0.0));
        }
        assert_eq!(values(&window), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_len_after_n_ticks() {
        for (ticks, expected) in [(0, 0), (7, 7), (10, 10), (25, 10)] {
            let config = StreamConfig {
                capacity: 10,
                ..Default::default()
            };
            let mut window = StreamWindow::new(config, SyntheticGenerator::from_seed(9));
            for _ in 0..ticks {
                window.tick(1_000.0);
            }
            assert_eq!(window.len(), expected);
        }
    }

    #[test]
    fn test_tick_timestamps_follow_last_point() {
        let mut window = StreamWindow::new(StreamConfig::default(), counter());
        window.tick(5_000.0);
        window.tick(9_999.0);
        let times: Vec<f64> = window.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![5_100.0, 5_200.0]);
    }

    #[test]
    fn test_non_finite_newest_point_falls_back_to_now() {
        let mut window = StreamWindow::with_points(
            StreamConfig::default(),
            SyntheticGenerator::from_seed(4),
            vec![Point::new(1_000.0, 1.0), Point::new(f64::NAN, 2.0)],
        );

        assert!(window.tick(5_000.0));
        assert_eq!(window.len(), 3);
        assert_eq!(window.failed_ticks(), 0);
        assert_eq!(window.last().map(|p| p.time), Some(5_100.0));

        // The invalid point stays buffered; later ticks follow the new one
        assert!(window.tick(9_000.0));
        assert!(window.iter().nth(1).is_some_and(|p| p.time.is_nan()));
        assert_eq!(window.last().map(|p| p.time), Some(5_200.0));
    }

    #[test]
    fn test_failed_tick_leaves_window_unchanged() {
        let failing = |_prev: f64, _time: f64| -> Result<Point, GeneratorError> {
            Err(GeneratorError::Exhausted)
        };
        let mut window = StreamWindow::with_points(
            StreamConfig::default(),
            failing,
            vec![Point::new(1.0, 1.0)],
        );
        assert!(!window.tick(0.0));
        assert_eq!(window.len(), 1);
        assert_eq!(window.failed_ticks(), 1);
    }

    #[test]
    fn test_start_stop_manage_timer() {
        let mut scheduler = Scheduler::new();
        let mut window = StreamWindow::new(StreamConfig::default(), counter());

        let timer = window.start(&mut scheduler, ());
        assert_eq!(window.start(&mut scheduler, ()), timer);
        assert_eq!(scheduler.active_intervals(), 1);
        assert_eq!(window.state(), StreamState::Streaming { timer });

        let due = scheduler.advance_to(Duration::from_millis(300));
        assert_eq!(due.len(), 3);
        for _ in due {
            window.tick(0.0);
        }

        assert!(window.stop(&mut scheduler));
        assert!(!window.stop(&mut scheduler));
        assert_eq!(scheduler.active_intervals(), 0);
        assert!(scheduler.advance_to(Duration::from_secs(5)).is_empty());
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_reset_keeps_state_and_newest_points() {
        let mut scheduler = Scheduler::new();
        let config = StreamConfig {
            capacity: 2,
            ..Default::default()
        };
        let mut window = StreamWindow::new(config, counter());
        window.start(&mut scheduler, ());

        window.reset(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(3.0, 3.0)]);
        assert!(window.is_streaming());
        assert_eq!(values(&window), vec![2.0, 3.0]);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let config = StreamConfig {
            capacity: 2,
            ..Default::default()
        };
        let mut window = StreamWindow::new(config, counter());
        window.push(Point::new(0.0, 10.0));
        window.push(Point::new(1.0, 20.0));
        window.push(Point::new(2.0, 30.0));
        assert_eq!(values(&window), vec![20.0, 30.0]);
        assert_eq!(window.points().len(), 2);
    }
}
