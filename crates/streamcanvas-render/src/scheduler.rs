//! Cooperative, single-threaded scheduling of animation frames and timers.
//!
//! The scheduler does not run callbacks. It keeps two queues of caller-defined
//! task values: one-shot *frame requests* that fire together at the next
//! animation-frame boundary, and periodic *intervals* that come due as time
//! advances. The host loop drains them and dispatches each task to its owner.
//! Every registration returns a [`TaskHandle`] that cancels it.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use streamcanvas_render::Scheduler;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Task { Redraw, Tick }
//!
//! let mut scheduler = Scheduler::new();
//! let timer = scheduler.set_interval(Duration::from_millis(100), Task::Tick);
//! scheduler.request_frame(Task::Redraw);
//!
//! let due = scheduler.advance_to(Duration::from_millis(250));
//! assert_eq!(due.len(), 2);
//!
//! let frame = scheduler.take_frame();
//! assert_eq!(frame.len(), 1);
//!
//! scheduler.clear_interval(timer);
//! ```

use std::time::Duration;

use indexmap::IndexMap;

/// Upper bound on catch-up ticks delivered for one interval in a single
/// [`Scheduler::advance_to`] call. Beyond this the interval skips ahead.
pub const MAX_CATCH_UP_TICKS: u32 = 10;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Cancel token for a frame request or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Interval<T> {
    period: Duration,
    next_due: Duration,
    task: T,
}

/// Frame-request and interval bookkeeping for one event loop.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_handle: u64,
    frame_requests: IndexMap<TaskHandle, T>,
    intervals: IndexMap<TaskHandle, Interval<T>>,
    frames_run: u64,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 1,
            frame_requests: IndexMap::new(),
            intervals: IndexMap::new(),
            frames_run: 0,
        }
    }

    fn allocate_handle(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Current scheduler time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `task` for the next animation frame.
    pub fn request_frame(&mut self, task: T) -> TaskHandle {
        let handle = self.allocate_handle();
        self.frame_requests.insert(handle, task);
        handle
    }

    /// Cancel a frame request. Returns `false` if it already ran or was cancelled.
    pub fn cancel_frame(&mut self, handle: TaskHandle) -> bool {
        self.frame_requests.shift_remove(&handle).is_some()
    }

    pub fn is_frame_pending(&self, handle: TaskHandle) -> bool {
        self.frame_requests.contains_key(&handle)
    }

    pub fn pending_frames(&self) -> usize {
        self.frame_requests.len()
    }

    /// Drain every frame request, in request order, at a frame boundary.
    pub fn take_frame(&mut self) -> Vec<(TaskHandle, T)> {
        self.frames_run += 1;
        self.frame_requests.drain(..).collect()
    }

    /// Number of frame boundaries processed so far.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Fire `task` every `period`, first at `now + period`.
    ///
    /// Periods shorter than one millisecond are clamped.
    pub fn set_interval(&mut self, period: Duration, task: T) -> TaskHandle {
        let period = period.max(MIN_INTERVAL);
        let handle = self.allocate_handle();
        self.intervals.insert(
            handle,
            Interval {
                period,
                next_due: self.now + period,
                task,
            },
        );
        handle
    }

    /// Cancel an interval. Returns `false` if the handle is not active.
    pub fn clear_interval(&mut self, handle: TaskHandle) -> bool {
        self.intervals.shift_remove(&handle).is_some()
    }

    pub fn is_interval_active(&self, handle: TaskHandle) -> bool {
        self.intervals.contains_key(&handle)
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Move time forward and collect every interval tick that came due.
    ///
    /// Ticks are returned in due-time order (registration order breaks ties),
    /// one entry per elapsed period, capped at [`MAX_CATCH_UP_TICKS`] per
    /// interval. Moving time backwards fires nothing.
    pub fn advance_to(&mut self, now: Duration) -> Vec<(TaskHandle, T)> {
        if now <= self.now {
            self.now = self.now.max(now);
            return Vec::new();
        }
        self.now = now;

        let mut due: Vec<(Duration, usize, TaskHandle, T)> = Vec::new();
        for (order, (handle, interval)) in self.intervals.iter_mut().enumerate() {
            let mut fired = 0;
            while interval.next_due <= now && fired < MAX_CATCH_UP_TICKS {
                due.push((interval.next_due, order, *handle, interval.task.clone()));
                interval.next_due += interval.period;
                fired += 1;
            }
            if interval.next_due <= now {
                // Realign to the first period boundary strictly after `now`
                let behind = (now - interval.next_due).as_nanos();
                let period = interval.period.as_nanos();
                let into_period = Duration::from_nanos((behind % period) as u64);
                tracing::debug!(
                    "Interval {:?} fell behind, skipping {} ticks",
                    handle,
                    behind / period + 1
                );
                interval.next_due = now + interval.period - into_period;
            }
        }

        due.sort_by_key(|(at, order, _, _)| (*at, *order));
        due.into_iter().map(|(_, _, handle, task)| (handle, task)).collect()
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
