//! Data-space to pixel-space mapping.

use streamcanvas_render::{LogicalSize, Rect};

use crate::bounds::Bounds;

/// Space reserved around the plot area, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub const fn uniform(amount: f32) -> Self {
        Self::new(amount, amount, amount, amount)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Default for Padding {
    /// Room for axis labels on the left and bottom.
    fn default() -> Self {
        Self::new(24.0, 12.0, 12.0, 24.0)
    }
}

/// Linear scales for one frame: bounds, padding and the surface's logical size.
///
/// The y axis is inverted so larger values sit higher on screen. The inner
/// plot dimensions never drop below one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotScale {
    pub bounds: Bounds,
    pub padding: Padding,
    pub width: f32,
    pub height: f32,
}

impl PlotScale {
    pub fn new(bounds: Bounds, padding: Padding, size: LogicalSize) -> Self {
        Self {
            bounds,
            padding,
            width: size.width,
            height: size.height,
        }
    }

    pub fn inner_width(&self) -> f32 {
        (self.width - self.padding.horizontal()).max(1.0)
    }

    pub fn inner_height(&self) -> f32 {
        (self.height - self.padding.vertical()).max(1.0)
    }

    /// The region inside the padding.
    pub fn plot_area(&self) -> Rect {
        Rect::new(
            self.padding.left,
            self.padding.top,
            self.inner_width(),
            self.inner_height(),
        )
    }

    /// Normalized position of `time` along the time axis (0 at min, 1 at max).
    pub fn time_fraction(&self, time: f64) -> f64 {
        (time - self.bounds.min_time) / non_zero(self.bounds.time_span())
    }

    pub fn value_fraction(&self, value: f64) -> f64 {
        (value - self.bounds.min_value) / non_zero(self.bounds.value_span())
    }

    pub fn scale_x(&self, time: f64) -> f32 {
        (self.time_fraction(time) * self.inner_width() as f64 + self.padding.left as f64) as f32
    }

    pub fn scale_y(&self, value: f64) -> f32 {
        (self.height as f64
            - self.padding.bottom as f64
            - self.value_fraction(value) * self.inner_height() as f64) as f32
    }
}

fn non_zero(span: f64) -> f64 {
    if span == 0.0 { 1.0 } else { span }
}
