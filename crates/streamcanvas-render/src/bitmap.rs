//! Software raster surface backed by the plotters bitmap backend.

use glam::Vec2;
use plotters::prelude::{BitMapBackend, DrawingBackend, RGBAColor, ShapeStyle};
use streamcanvas_core::profiling::profile_function;

use crate::color::Color;
use crate::geometry::{LogicalSize, PhysicalSize, Rect};
use crate::surface::{DrawContext, Surface, SurfaceError};

const BYTES_PER_PIXEL: usize = 3;

/// An RGB8 pixel buffer that charts can draw into.
///
/// The buffer has no alpha channel; [`DrawContext::clear`] resets it to the
/// configured background and translucent fills are blended over it.
#[derive(Debug, Clone)]
pub struct BitmapSurface {
    pixels: Vec<u8>,
    size: PhysicalSize,
    pixel_ratio: f32,
    background: Color,
}

impl BitmapSurface {
    /// Create a surface with the given backing size and a white background.
    pub fn new(size: PhysicalSize) -> Self {
        Self::with_background(size, Color::WHITE)
    }

    pub fn with_background(size: PhysicalSize, background: Color) -> Self {
        let mut surface = Self {
            pixels: Vec::new(),
            size: PhysicalSize::default(),
            pixel_ratio: 1.0,
            background,
        };
        surface.resize_backing(size);
        surface
    }

    /// Raw RGB8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read back one device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    pub fn background(&self) -> Color {
        self.background
    }

    fn device_point(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x * self.pixel_ratio).round() as i32,
            (point.y * self.pixel_ratio).round() as i32,
        )
    }

    fn device_length(&self, length: f32) -> u32 {
        (length * self.pixel_ratio).round().max(1.0) as u32
    }

    fn device_rect(&self, rect: Rect) -> ((i32, i32), (i32, i32)) {
        let x0 = (rect.x * self.pixel_ratio).floor() as i32;
        let y0 = (rect.y * self.pixel_ratio).floor() as i32;
        let x1 = ((rect.right() * self.pixel_ratio).round() as i32 - 1).max(x0);
        let y1 = ((rect.bottom() * self.pixel_ratio).round() as i32 - 1).max(y0);
        ((x0, y0), (x1, y1))
    }

    fn style(color: Color, filled: bool, stroke_width: u32) -> ShapeStyle {
        let [r, g, b, _] = color.to_rgba_u8();
        ShapeStyle {
            color: RGBAColor(r, g, b, color.a.clamp(0.0, 1.0) as f64),
            filled,
            stroke_width,
        }
    }

    /// Run `draw` against a plotters backend wrapping the pixel buffer.
    fn with_backend<F, E>(&mut self, draw: F) -> Result<(), SurfaceError>
    where
        F: FnOnce(&mut BitMapBackend<'_>) -> Result<(), E>,
        E: std::fmt::Display,
    {
        if self.size.is_empty() {
            return Err(SurfaceError::unavailable("backing store has zero area"));
        }
        let dims = (self.size.width, self.size.height);
        let mut backend = BitMapBackend::with_buffer(self.pixels.as_mut_slice(), dims);
        draw(&mut backend).map_err(SurfaceError::backend)?;
        backend.present().map_err(SurfaceError::backend)
    }
}

impl Surface for BitmapSurface {
    fn backing_size(&self) -> PhysicalSize {
        self.size
    }

    fn resize_backing(&mut self, size: PhysicalSize) {
        self.size = size;
        let len = size.width as usize * size.height as usize * BYTES_PER_PIXEL;
        // Resizing drops the old contents, matching a canvas width/height reset.
        self.pixels.clear();
        self.pixels.resize(len, 0);
        let [r, g, b, _] = self.background.to_rgba_u8();
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&[r, g, b]);
        }
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = if ratio.is_finite() { ratio.max(1.0) } else { 1.0 };
    }

    fn context(&mut self) -> Result<&mut dyn DrawContext, SurfaceError> {
        if self.size.is_empty() {
            return Err(SurfaceError::unavailable("backing store has zero area"));
        }
        Ok(self)
    }
}

impl DrawContext for BitmapSurface {
    fn logical_size(&self) -> LogicalSize {
        self.size.to_logical(self.pixel_ratio)
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        profile_function!();
        let [r, g, b, _] = self.background.to_rgba_u8();
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&[r, g, b]);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        let (upper_left, bottom_right) = self.device_rect(rect);
        let style = Self::style(color, true, 1);
        self.with_backend(|backend| backend.draw_rect(upper_left, bottom_right, &style, true))
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) -> Result<(), SurfaceError> {
        let (upper_left, bottom_right) = self.device_rect(rect);
        let style = Self::style(color, false, self.device_length(line_width));
        self.with_backend(|backend| backend.draw_rect(upper_left, bottom_right, &style, false))
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError> {
        let center = self.device_point(center);
        let radius = self.device_length(radius);
        let style = Self::style(color, true, 1);
        self.with_backend(|backend| backend.draw_circle(center, radius, &style, true))
    }

    fn stroke_polyline(
        &mut self,
        points: &[Vec2],
        color: Color,
        line_width: f32,
    ) -> Result<(), SurfaceError> {
        profile_function!();
        if points.len() < 2 {
            return Ok(());
        }
        let path: Vec<(i32, i32)> = points.iter().map(|p| self.device_point(*p)).collect();
        let style = Self::style(color, false, self.device_length(line_width));
        self.with_backend(|backend| backend.draw_path(path, &style))
    }
}
