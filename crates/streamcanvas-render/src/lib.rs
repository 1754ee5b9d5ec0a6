//! Rendering plumbing for streamcanvas.
//!
//! Charts draw through the immediate-mode [`DrawContext`] trait onto a
//! [`Surface`]. The [`SurfaceManager`] keeps a surface's backing resolution in
//! step with its logical size and the device pixel ratio, and schedules
//! redraws through the cooperative [`Scheduler`], coalescing multiple
//! invalidations into a single paint per frame.

pub mod bitmap;
pub mod color;
pub mod geometry;
pub mod scheduler;
pub mod surface;
pub mod surface_manager;

pub use bitmap::BitmapSurface;
pub use color::Color;
pub use geometry::{LogicalSize, PhysicalSize, Rect};
pub use scheduler::{Scheduler, TaskHandle};
pub use surface::{DrawContext, Surface, SurfaceError};
pub use surface_manager::{Invalidation, SurfaceId, SurfaceManager};

pub use glam::Vec2;
