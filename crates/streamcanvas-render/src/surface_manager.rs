//! Keeps a surface's backing resolution in sync with its layout box.
//!
//! The manager watches two signals: layout-box resizes and viewport (device
//! pixel ratio) changes. Either one recomputes the target backing size as
//! `round(logical * ratio)`. When the target matches what the surface already
//! has, nothing happens: resizing a backing store wipes it, so redundant
//! resizes would flicker. Otherwise the backing store is reallocated, the
//! pixel-ratio transform is re-issued and a redraw is scheduled.
//!
//! Redraws are cancel-and-reschedule: a new request cancels the pending one,
//! so at most one redraw per surface is ever queued on the [`Scheduler`].

use bitflags::bitflags;

use crate::geometry::{LogicalSize, PhysicalSize};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::surface::Surface;

bitflags! {
    /// Why a surface needs repainting. Reasons accumulate until the frame fires.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Invalidation: u8 {
        /// Backing store was resized or the pixel ratio changed.
        const RESIZE = 1 << 0;
        /// The data being drawn changed.
        const DATA = 1 << 1;
        /// Colors, padding or other presentation settings changed.
        const STYLE = 1 << 2;
    }
}

/// Identifies a managed surface inside scheduler tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Owns a surface and its resize/redraw bookkeeping.
#[derive(Debug)]
pub struct SurfaceManager<S> {
    id: SurfaceId,
    surface: S,
    logical_size: LogicalSize,
    pixel_ratio: f32,
    observing: bool,
    pending_redraw: Option<TaskHandle>,
    invalidation: Invalidation,
    resize_count: u64,
}

impl<S: Surface> SurfaceManager<S> {
    pub fn new(id: SurfaceId, surface: S) -> Self {
        let pixel_ratio = surface.pixel_ratio();
        Self {
            id,
            surface,
            logical_size: LogicalSize::default(),
            pixel_ratio,
            observing: false,
            pending_redraw: None,
            invalidation: Invalidation::empty(),
            resize_count: 0,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn logical_size(&self) -> LogicalSize {
        self.logical_size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Number of backing-store reallocations performed so far.
    pub fn resize_count(&self) -> u64 {
        self.resize_count
    }

    pub fn pending_redraw(&self) -> Option<TaskHandle> {
        self.pending_redraw
    }

    /// Start observing the layout box and perform the initial sync.
    ///
    /// The first observation always schedules a paint, even if the surface
    /// already had the right size.
    pub fn observe<T>(&mut self, size: LogicalSize, pixel_ratio: f32, scheduler: &mut Scheduler<T>)
    where
        T: Clone + From<SurfaceId>,
    {
        self.observing = true;
        self.logical_size = size;
        self.pixel_ratio = clamp_ratio(pixel_ratio);
        if !self.sync(scheduler) {
            self.request_redraw(Invalidation::DATA, scheduler);
        }
    }

    /// Layout-box size changed.
    pub fn on_layout_resize<T>(&mut self, size: LogicalSize, scheduler: &mut Scheduler<T>) -> bool
    where
        T: Clone + From<SurfaceId>,
    {
        if !self.observing {
            return false;
        }
        self.logical_size = size;
        self.sync(scheduler)
    }

    /// Viewport resized, possibly with a new device pixel ratio.
    pub fn on_viewport_resize<T>(&mut self, pixel_ratio: f32, scheduler: &mut Scheduler<T>) -> bool
    where
        T: Clone + From<SurfaceId>,
    {
        if !self.observing {
            return false;
        }
        self.pixel_ratio = clamp_ratio(pixel_ratio);
        self.sync(scheduler)
    }

    /// Target backing size for the current logical size and ratio.
    pub fn target_backing_size(&self) -> PhysicalSize {
        self.logical_size.to_physical(self.pixel_ratio)
    }

    fn sync<T>(&mut self, scheduler: &mut Scheduler<T>) -> bool
    where
        T: Clone + From<SurfaceId>,
    {
        let target = self.target_backing_size();
        let current = self.surface.backing_size();
        let ratio_changed = self.surface.pixel_ratio() != self.pixel_ratio;

        if target == current && !ratio_changed {
            tracing::trace!("Surface {:?} already at {:?}, skipping resize", self.id, target);
            return false;
        }

        if target != current {
            self.surface.resize_backing(target);
            self.resize_count += 1;
        }
        self.surface.set_pixel_ratio(self.pixel_ratio);

        tracing::debug!(
            "Surface {:?} resized {}x{} -> {}x{} (ratio {})",
            self.id,
            current.width,
            current.height,
            target.width,
            target.height,
            self.pixel_ratio
        );

        self.request_redraw(Invalidation::RESIZE, scheduler);
        true
    }

    /// Schedule a redraw on the next frame, replacing any pending one.
    pub fn request_redraw<T>(&mut self, reason: Invalidation, scheduler: &mut Scheduler<T>) -> TaskHandle
    where
        T: Clone + From<SurfaceId>,
    {
        if let Some(previous) = self.pending_redraw.take() {
            scheduler.cancel_frame(previous);
        }
        let handle = scheduler.request_frame(T::from(self.id));
        self.pending_redraw = Some(handle);
        self.invalidation |= reason;
        handle
    }

    /// Claim a fired frame.
    ///
    /// Returns the accumulated invalidation reasons when `handle` is this
    /// surface's pending redraw, clearing both. Stale handles return `None`.
    pub fn on_frame(&mut self, handle: TaskHandle) -> Option<Invalidation> {
        if self.pending_redraw != Some(handle) {
            return None;
        }
        self.pending_redraw = None;
        Some(std::mem::take(&mut self.invalidation))
    }

    /// Stop observing and cancel the pending redraw.
    pub fn detach<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(handle) = self.pending_redraw.take() {
            scheduler.cancel_frame(handle);
        }
        self.invalidation = Invalidation::empty();
        self.observing = false;
        tracing::debug!("Surface {:?} detached", self.id);
    }
}

fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() { ratio.max(1.0) } else { 1.0 }
}
