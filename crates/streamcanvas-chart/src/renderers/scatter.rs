//! Scatter renderer.

use streamcanvas_core::profiling::profile_function;
use streamcanvas_render::{DrawContext, SurfaceError};

use super::{ChartConfig, ChartKind, ChartRenderer, project};
use crate::palette::CategoryPalette;
use crate::point::Point;
use crate::scale::PlotScale;

/// Dot radius for a dataset of `count` points. Denser plots get smaller dots.
pub fn point_radius(count: usize) -> f32 {
    match count {
        n if n > 10_000 => 1.25,
        n if n > 5_000 => 1.75,
        n if n > 1_000 => 2.5,
        _ => 4.0,
    }
}

/// One filled dot per finite point, coloured by category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterRenderer {
    pub palette: CategoryPalette,
}

impl ScatterRenderer {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            palette: config.effective_palette(),
        }
    }
}

impl Default for ScatterRenderer {
    fn default() -> Self {
        Self::from_config(&ChartConfig::new(ChartKind::Scatter))
    }
}

impl ChartRenderer for ScatterRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Scatter
    }

    fn draw_series(
        &self,
        ctx: &mut dyn DrawContext,
        points: &[Point],
        scale: &PlotScale,
    ) -> Result<(), SurfaceError> {
        profile_function!();

        let radius = point_radius(points.len());
        for point in points {
            if let Some(pos) = project(point, scale) {
                ctx.fill_circle(pos, radius, self.palette.color_for(point.category()))?;
            }
        }
        Ok(())
    }
}
