//! Immediate-mode 2D drawing surfaces.
//!
//! A [`Surface`] owns a raster backing store whose resolution is managed from
//! outside (see [`SurfaceManager`](crate::SurfaceManager)). Drawing goes through
//! the [`DrawContext`] it hands out, in logical pixel coordinates; the surface
//! applies the device pixel ratio itself.

use std::fmt;

use glam::Vec2;

use crate::color::Color;
use crate::geometry::{LogicalSize, PhysicalSize, Rect};

/// Errors raised while acquiring or drawing to a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// No drawing context can be acquired right now (zero-sized backing store,
    /// detached host, lost context).
    Unavailable {
        /// Why the context is unavailable.
        reason: String,
    },
    /// The raster backend rejected a draw call.
    Backend {
        /// Backend error message.
        message: String,
    },
}

impl SurfaceError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn backend(message: impl fmt::Display) -> Self {
        Self::Backend {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Unavailable { reason } => {
                write!(f, "Drawing context unavailable: {}", reason)
            }
            SurfaceError::Backend { message } => write!(f, "Raster backend error: {}", message),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Immediate-mode drawing operations in logical pixels.
///
/// Nothing is retained between calls: every frame starts with [`clear`](Self::clear)
/// and redraws everything.
pub trait DrawContext {
    /// Drawable area in logical pixels.
    fn logical_size(&self) -> LogicalSize;

    /// Reset every pixel to the surface background.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError>;

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) -> Result<(), SurfaceError>;

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError>;

    /// Stroke one connected path through `points`. Fewer than two points draws nothing.
    fn stroke_polyline(
        &mut self,
        points: &[Vec2],
        color: Color,
        line_width: f32,
    ) -> Result<(), SurfaceError>;
}

/// A raster surface with a resizable backing store.
pub trait Surface {
    /// Current backing-store resolution in device pixels.
    fn backing_size(&self) -> PhysicalSize;

    /// Reallocate the backing store. Existing contents are discarded.
    fn resize_backing(&mut self, size: PhysicalSize);

    /// Ratio between device pixels and logical drawing units.
    fn pixel_ratio(&self) -> f32;

    /// Set the logical-to-device transform used by subsequent draws.
    fn set_pixel_ratio(&mut self, ratio: f32);

    /// Acquire the drawing context for this frame.
    fn context(&mut self) -> Result<&mut dyn DrawContext, SurfaceError>;
}
