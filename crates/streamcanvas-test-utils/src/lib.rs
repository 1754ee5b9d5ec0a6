//! Test utilities for streamcanvas.
//!
//! The main component is [`RecordingSurface`], a [`Surface`] that records
//! every drawing call instead of rasterizing it. Tests hand the surface to a
//! chart or a [`SurfaceManager`](streamcanvas_render::SurfaceManager) and keep
//! a [`CallLog`] handle to assert on what was drawn.
//!
//! # Example
//!
//! ```rust
//! use streamcanvas_render::{Color, DrawContext, PhysicalSize, Rect, Surface};
//! use streamcanvas_test_utils::RecordingSurface;
//!
//! let mut surface = RecordingSurface::new(PhysicalSize::new(200, 100));
//! let log = surface.log();
//!
//! let ctx = surface.context().unwrap();
//! ctx.clear().unwrap();
//! ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK).unwrap();
//!
//! assert_eq!(log.count_clears(), 1);
//! assert_eq!(log.count_fill_rects(), 1);
//! ```
//!
//! # Interior Mutability
//!
//! The surface is usually moved into the code under test, so the log lives
//! behind an `Arc<Mutex<_>>` and [`RecordingSurface::log`] returns a cheap
//! clone that stays readable afterwards.

use std::sync::Arc;

use parking_lot::Mutex;
use streamcanvas_render::{
    Color, DrawContext, LogicalSize, PhysicalSize, Rect, Surface, SurfaceError, Vec2,
};

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokePolyline {
        points: Vec<Vec2>,
        color: Color,
        line_width: f32,
    },
    ResizeBacking {
        size: PhysicalSize,
    },
    SetPixelRatio {
        ratio: f32,
    },
}

/// Shared, clonable view of the calls recorded by a [`RecordingSurface`].
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl CallLog {
    fn push(&self, call: DrawCall) {
        self.calls.lock().push(call);
    }

    fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().clone()
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn count_clears(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Clear))
    }

    pub fn count_fill_rects(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::FillRect { .. }))
    }

    pub fn count_stroke_rects(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::StrokeRect { .. }))
    }

    pub fn count_circles(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::FillCircle { .. }))
    }

    pub fn count_polylines(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::StrokePolyline { .. }))
    }

    pub fn count_resizes(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::ResizeBacking { .. }))
    }

    /// Filled rectangles in draw order.
    pub fn fill_rects(&self) -> Vec<(Rect, Color)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// Filled circles in draw order.
    pub fn circles(&self) -> Vec<(Vec2, f32, Color)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillCircle {
                    center,
                    radius,
                    color,
                } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }

    /// Stroked polylines in draw order.
    pub fn polylines(&self) -> Vec<Vec<Vec2>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::StrokePolyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }
}

/// A surface that records draw calls without rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    log: CallLog,
    size: PhysicalSize,
    pixel_ratio: f32,
    unavailable: Option<String>,
}

impl RecordingSurface {
    /// Create a recording surface with the given backing size and ratio 1.
    pub fn new(size: PhysicalSize) -> Self {
        Self {
            log: CallLog::default(),
            size,
            pixel_ratio: 1.0,
            unavailable: None,
        }
    }

    /// Handle to the recorded calls that outlives moves of the surface.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Make [`Surface::context`] fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&mut self, reason: Option<&str>) {
        self.unavailable = reason.map(str::to_string);
    }
}

impl Surface for RecordingSurface {
    fn backing_size(&self) -> PhysicalSize {
        self.size
    }

    fn resize_backing(&mut self, size: PhysicalSize) {
        self.size = size;
        self.log.push(DrawCall::ResizeBacking { size });
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
        self.log.push(DrawCall::SetPixelRatio { ratio });
    }

    fn context(&mut self) -> Result<&mut dyn DrawContext, SurfaceError> {
        if let Some(reason) = &self.unavailable {
            return Err(SurfaceError::unavailable(reason.clone()));
        }
        Ok(self)
    }
}

impl DrawContext for RecordingSurface {
    fn logical_size(&self) -> LogicalSize {
        self.size.to_logical(self.pixel_ratio)
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.log.push(DrawCall::Clear);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        self.log.push(DrawCall::FillRect { rect, color });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) -> Result<(), SurfaceError> {
        self.log.push(DrawCall::StrokeRect {
            rect,
            color,
            line_width,
        });
        Ok(())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError> {
        self.log.push(DrawCall::FillCircle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[Vec2],
        color: Color,
        line_width: f32,
    ) -> Result<(), SurfaceError> {
        self.log.push(DrawCall::StrokePolyline {
            points: points.to_vec(),
            color,
            line_width,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_draw_calls() {
        let mut surface = RecordingSurface::new(PhysicalSize::new(100, 100));
        let log = surface.log();

        let ctx = surface.context().unwrap();
        ctx.clear().unwrap();
        ctx.fill_circle(Vec2::new(5.0, 5.0), 2.0, Color::BLACK).unwrap();
        ctx.stroke_polyline(&[Vec2::ZERO, Vec2::ONE], Color::BLACK, 2.0)
            .unwrap();

        assert_eq!(log.call_count(), 3);
        assert_eq!(log.count_circles(), 1);
        assert_eq!(log.polylines(), vec![vec![Vec2::ZERO, Vec2::ONE]]);
    }

    #[test]
    fn test_log_survives_move() {
        let surface = RecordingSurface::new(PhysicalSize::new(10, 10));
        let log = surface.log();

        let mut moved = Box::new(surface);
        moved.resize_backing(PhysicalSize::new(20, 20));

        assert_eq!(log.count_resizes(), 1);
    }

    #[test]
    fn test_unavailable_context() {
        let mut surface = RecordingSurface::new(PhysicalSize::new(10, 10));
        surface.set_unavailable(Some("detached"));
        assert!(matches!(surface.context(), Err(SurfaceError::Unavailable { .. })));

        surface.set_unavailable(None);
        assert!(surface.context().is_ok());
    }

    #[test]
    fn test_clear_calls() {
        let mut surface = RecordingSurface::new(PhysicalSize::new(10, 10));
        let log = surface.log();
        surface.clear().unwrap();
        assert_eq!(log.call_count(), 1);

        log.clear_calls();
        assert_eq!(log.call_count(), 0);
    }

    #[test]
    fn test_logical_size_uses_ratio() {
        let mut surface = RecordingSurface::new(PhysicalSize::new(200, 100));
        surface.set_pixel_ratio(2.0);
        assert_eq!(surface.logical_size(), LogicalSize::new(100.0, 50.0));
    }
}
