//! Rectangles and sizes in logical and physical pixels.

/// Axis-aligned rectangle in logical pixels, `(x, y)` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Size of a layout box in logical (CSS-like) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogicalSize {
    pub width: f32,
    pub height: f32,
}

impl LogicalSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Backing-store size for this logical size at `pixel_ratio`.
    ///
    /// Each dimension is `round(logical * ratio)`; negative or non-finite
    /// dimensions map to zero.
    pub fn to_physical(self, pixel_ratio: f32) -> PhysicalSize {
        let scale = |v: f32| {
            let scaled = (v * pixel_ratio).round();
            if scaled.is_finite() && scaled > 0.0 {
                scaled as u32
            } else {
                0
            }
        };
        PhysicalSize::new(scale(self.width), scale(self.height))
    }
}

/// Size of a surface's backing store in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Logical size covered by this backing store at `pixel_ratio`.
    pub fn to_logical(self, pixel_ratio: f32) -> LogicalSize {
        let ratio = pixel_ratio.max(f32::EPSILON);
        LogicalSize::new(self.width as f32 / ratio, self.height as f32 / ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_to_physical_rounds() {
        let size = LogicalSize::new(300.4, 200.6);
        assert_eq!(size.to_physical(1.0), PhysicalSize::new(300, 201));
        assert_eq!(size.to_physical(2.0), PhysicalSize::new(601, 401));
    }

    #[test]
    fn test_logical_to_physical_degenerate() {
        assert_eq!(LogicalSize::new(-5.0, f32::NAN).to_physical(2.0), PhysicalSize::new(0, 0));
        assert!(PhysicalSize::new(0, 10).is_empty());
    }

    #[test]
    fn test_physical_to_logical() {
        let logical = PhysicalSize::new(800, 600).to_logical(2.0);
        assert_eq!(logical, LogicalSize::new(400.0, 300.0));
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
    }
}
