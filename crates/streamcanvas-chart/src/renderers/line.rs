//! Line renderer: one connected path plus optional point markers.

use streamcanvas_core::profiling::profile_function;
use streamcanvas_render::{Color, DrawContext, SurfaceError, Vec2};

use super::{ChartConfig, ChartKind, ChartRenderer, project};
use crate::palette::DEFAULT_SERIES_COLOR;
use crate::point::Point;
use crate::scale::PlotScale;

/// Datasets larger than this are drawn without point markers.
pub const POINT_MARKER_THRESHOLD: usize = 1000;

/// Strokes the finite points in array order as a single polyline.
///
/// Markers are a level-of-detail feature: with more than `point_threshold`
/// points they would overlap into a solid band, so only the path is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRenderer {
    pub color: Color,
    pub line_width: f32,
    pub point_radius: f32,
    pub point_threshold: usize,
}

impl LineRenderer {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            color: config.color,
            line_width: config.line_width,
            point_radius: config.point_radius,
            point_threshold: config.point_threshold,
        }
    }

    pub fn draws_markers(&self, point_count: usize) -> bool {
        point_count <= self.point_threshold
    }
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self {
            color: DEFAULT_SERIES_COLOR,
            line_width: 2.0,
            point_radius: 3.0,
            point_threshold: POINT_MARKER_THRESHOLD,
        }
    }
}

impl ChartRenderer for LineRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn draw_series(
        &self,
        ctx: &mut dyn DrawContext,
        points: &[Point],
        scale: &PlotScale,
    ) -> Result<(), SurfaceError> {
        profile_function!();

        let path: Vec<Vec2> = points.iter().filter_map(|p| project(p, scale)).collect();
        ctx.stroke_polyline(&path, self.color, self.line_width)?;

        if self.draws_markers(points.len()) {
            for pos in &path {
                ctx.fill_circle(*pos, self.point_radius, self.color)?;
            }
        }
        Ok(())
    }
}
