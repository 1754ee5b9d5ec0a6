//! Bar renderer.

use streamcanvas_core::profiling::profile_function;
use streamcanvas_render::{Color, DrawContext, Rect, SurfaceError};

use super::{ChartConfig, ChartKind, ChartRenderer};
use crate::palette::CategoryPalette;
use crate::point::Point;
use crate::scale::PlotScale;

const OUTLINE_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.12);
const OUTLINE_WIDTH: f32 = 0.5;

/// One vertical bar per finite point, rising from the minimum value.
///
/// Bars share the inner width evenly with a two pixel gap but never get
/// narrower than `min_bar_width`, so dense data overlaps rather than vanishes.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRenderer {
    pub palette: CategoryPalette,
    pub min_bar_width: f32,
    pub outline_threshold: usize,
}

impl BarRenderer {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            palette: config.effective_palette(),
            min_bar_width: config.min_bar_width,
            outline_threshold: config.outline_threshold,
        }
    }

    /// Width of every bar for `count` points.
    pub fn bar_width(&self, count: usize, scale: &PlotScale) -> f32 {
        let per_bar = scale.inner_width() / count.max(1) as f32;
        (per_bar - 2.0).max(self.min_bar_width)
    }
}

impl Default for BarRenderer {
    fn default() -> Self {
        Self::from_config(&ChartConfig::new(ChartKind::Bar))
    }
}

impl ChartRenderer for BarRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn draw_series(
        &self,
        ctx: &mut dyn DrawContext,
        points: &[Point],
        scale: &PlotScale,
    ) -> Result<(), SurfaceError> {
        profile_function!();

        let width = self.bar_width(points.len(), scale);
        let baseline = scale.scale_y(scale.bounds.min_value);
        let outlined = points.len() < self.outline_threshold;

        for point in points.iter().filter(|p| p.is_finite()) {
            let top = scale.scale_y(point.value);
            let height = (baseline - top).max(1.0);
            let left = scale.scale_x(point.time) - width / 2.0;
            let rect = Rect::new(left, top, width, height);

            ctx.fill_rect(rect, self.palette.color_for(point.category()))?;
            if outlined {
                let inner = Rect::new(
                    rect.x + OUTLINE_WIDTH / 2.0,
                    rect.y + OUTLINE_WIDTH / 2.0,
                    rect.width - OUTLINE_WIDTH,
                    rect.height - OUTLINE_WIDTH,
                );
                ctx.stroke_rect(inner, OUTLINE_COLOR, OUTLINE_WIDTH)?;
            }
        }
        Ok(())
    }
}
