//! Density heatmap renderer.
//!
//! Points are binned into an `N x N` grid over the bounds, then every
//! non-empty cell is painted with a colour ramp from translucent blue (sparse)
//! to opaque red (the densest cell).

use streamcanvas_core::profiling::{profile_function, profile_scope};
use streamcanvas_render::{Color, DrawContext, Rect, SurfaceError};

use super::{ChartConfig, ChartKind, ChartRenderer};
use crate::bounds::Bounds;
use crate::point::Point;
use crate::scale::PlotScale;

pub const DEFAULT_GRID_SIZE: usize = 50;

const MAX_ALPHA: f32 = 0.85;
/// Cells are drawn slightly oversized so antialiased edges do not leave seams.
const CELL_OVERLAP: f32 = 0.5;

/// Point counts per cell. Row 0 is the top (highest values).
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    size: usize,
    counts: Vec<u32>,
    max_count: u32,
}

impl DensityGrid {
    /// Bin the finite points of `points` into a `size x size` grid over `bounds`.
    pub fn build(points: &[Point], bounds: &Bounds, size: usize) -> Self {
        profile_function!();

        let size = size.max(1);
        let last = (size - 1) as f64;
        let mut counts = vec![0u32; size * size];

        for point in points.iter().filter(|p| p.is_finite()) {
            let col = ((point.time - bounds.min_time) / non_zero(bounds.time_span()) * last).floor();
            let row = ((point.value - bounds.min_value) / non_zero(bounds.value_span()) * last).floor();
            if !(0.0..=last).contains(&col) || !(0.0..=last).contains(&row) {
                continue;
            }
            let (col, row) = (col as usize, size - 1 - row as usize);
            counts[row * size + col] += 1;
        }

        let max_count = counts.iter().copied().max().unwrap_or(0);
        Self {
            size,
            counts,
            max_count,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn count(&self, col: usize, row: usize) -> u32 {
        if col >= self.size || row >= self.size {
            return 0;
        }
        self.counts[row * self.size + col]
    }

    /// Non-empty cells as `(col, row, count)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, count)| (i % self.size, i / self.size, *count))
    }

    /// Fraction of the densest cell's count, in `0.0..=1.0`.
    pub fn intensity(&self, count: u32) -> f32 {
        if self.max_count == 0 {
            return 0.0;
        }
        (count as f32 / self.max_count as f32).min(1.0)
    }
}

/// Colour for a cell of the given intensity: hue 240 (blue) down to 0 (red).
pub fn intensity_color(intensity: f32) -> Color {
    let hue = 240.0 - intensity * 240.0;
    let alpha = (intensity * MAX_ALPHA).min(MAX_ALPHA);
    Color::from_hsla(hue, 0.7, 0.5, alpha)
}

fn non_zero(span: f64) -> f64 {
    if span == 0.0 { 1.0 } else { span }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRenderer {
    pub grid_size: usize,
}

impl HeatmapRenderer {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size: grid_size.max(1),
        }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.grid_size)
    }
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl ChartRenderer for HeatmapRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Heatmap
    }

    fn draw_series(
        &self,
        ctx: &mut dyn DrawContext,
        points: &[Point],
        scale: &PlotScale,
    ) -> Result<(), SurfaceError> {
        profile_function!();

        let grid = DensityGrid::build(points, &scale.bounds, self.grid_size);
        if grid.max_count() == 0 {
            return Ok(());
        }

        profile_scope!("heatmap_paint_cells");
        let area = scale.plot_area();
        let cell_width = area.width / grid.size() as f32;
        let cell_height = area.height / grid.size() as f32;

        for (col, row, count) in grid.cells() {
            let rect = Rect::new(
                area.x + col as f32 * cell_width,
                area.y + row as f32 * cell_height,
                cell_width + CELL_OVERLAP,
                cell_height + CELL_OVERLAP,
            );
            ctx.fill_rect(rect, intensity_color(grid.intensity(count)))?;
        }
        Ok(())
    }
}
