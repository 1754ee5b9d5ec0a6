//! Grid lines and axes drawn beneath a series.

use streamcanvas_render::{Color, DrawContext, SurfaceError, Vec2};

use crate::scale::PlotScale;

/// Which background decorations a chart paints, and how.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decorations {
    pub grid: bool,
    pub axes: bool,
    /// Number of equal divisions per axis; `divisions + 1` lines are drawn.
    pub grid_divisions: u32,
    pub grid_color: Color,
    pub axis_color: Color,
    pub line_width: f32,
}

impl Decorations {
    /// No grid and no axes.
    pub const fn none() -> Self {
        Self {
            grid: false,
            axes: false,
            grid_divisions: 5,
            grid_color: Color::rgba(0.886, 0.910, 0.941, 0.2),
            axis_color: Color::rgb(0.886, 0.910, 0.941),
            line_width: 1.0,
        }
    }

    /// Grid and axes with the default styling.
    pub const fn full() -> Self {
        Self {
            grid: true,
            axes: true,
            ..Self::none()
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.grid && !self.axes
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, scale: &PlotScale) -> Result<(), SurfaceError> {
        if self.grid {
            self.draw_grid(ctx, scale)?;
        }
        if self.axes {
            self.draw_axes(ctx, scale)?;
        }
        Ok(())
    }

    /// Evenly spaced horizontal then vertical lines across the plot area.
    pub fn draw_grid(&self, ctx: &mut dyn DrawContext, scale: &PlotScale) -> Result<(), SurfaceError> {
        let area = scale.plot_area();
        let divisions = self.grid_divisions.max(1);

        for i in 0..=divisions {
            let y = area.y + area.height / divisions as f32 * i as f32;
            ctx.stroke_polyline(
                &[Vec2::new(area.x, y), Vec2::new(area.right(), y)],
                self.grid_color,
                self.line_width,
            )?;
        }
        for i in 0..=divisions {
            let x = area.x + area.width / divisions as f32 * i as f32;
            ctx.stroke_polyline(
                &[Vec2::new(x, area.y), Vec2::new(x, area.bottom())],
                self.grid_color,
                self.line_width,
            )?;
        }
        Ok(())
    }

    /// Left y axis and bottom x axis along the plot-area edges.
    pub fn draw_axes(&self, ctx: &mut dyn DrawContext, scale: &PlotScale) -> Result<(), SurfaceError> {
        let area = scale.plot_area();
        let origin = Vec2::new(area.x, area.bottom());
        ctx.stroke_polyline(
            &[Vec2::new(area.x, area.y), origin],
            self.axis_color,
            self.line_width,
        )?;
        ctx.stroke_polyline(
            &[origin, Vec2::new(area.right(), area.bottom())],
            self.axis_color,
            self.line_width,
        )
    }
}

impl Default for Decorations {
    fn default() -> Self {
        Self::none()
    }
}
