//! Immediate-mode chart renderers.
//!
//! Every renderer redraws from scratch: the frame is cleared, optional
//! decorations are painted, then the series. Nothing carries over between
//! frames, so a renderer holds configuration only.

pub mod bar;
pub mod heatmap;
pub mod line;
pub mod scatter;

use std::fmt;

use streamcanvas_render::{Color, DrawContext, SurfaceError, Vec2};

use crate::bounds::Bounds;
use crate::decorations::Decorations;
use crate::palette::{CategoryPalette, DEFAULT_SERIES_COLOR};
use crate::point::Point;
use crate::scale::{Padding, PlotScale};

pub use bar::BarRenderer;
pub use heatmap::{DensityGrid, HeatmapRenderer};
pub use line::LineRenderer;
pub use scatter::ScatterRenderer;

/// Draws one chart geometry.
pub trait ChartRenderer: fmt::Debug {
    fn kind(&self) -> ChartKind;

    /// Paint the series onto an already cleared context.
    fn draw_series(
        &self,
        ctx: &mut dyn DrawContext,
        points: &[Point],
        scale: &PlotScale,
    ) -> Result<(), SurfaceError>;

    /// Clear the context and draw `points`.
    ///
    /// `None` bounds means the dataset has nothing finite to show; the call
    /// returns without touching the context.
    fn render(
        &self,
        ctx: &mut dyn DrawContext,
        points: &[Point],
        bounds: Option<&Bounds>,
        padding: &Padding,
    ) -> Result<(), SurfaceError> {
        render_frame(self, ctx, points, bounds, padding, &Decorations::none()).map(|_| ())
    }
}

/// Run one full frame: clear, decorations, series.
///
/// Returns `false` when nothing was drawn because `bounds` is `None`.
pub fn render_frame<R: ChartRenderer + ?Sized>(
    renderer: &R,
    ctx: &mut dyn DrawContext,
    points: &[Point],
    bounds: Option<&Bounds>,
    padding: &Padding,
    decorations: &Decorations,
) -> Result<bool, SurfaceError> {
    let Some(bounds) = bounds else {
        return Ok(false);
    };

    ctx.clear()?;
    let scale = PlotScale::new(*bounds, *padding, ctx.logical_size());
    decorations.draw(ctx, &scale)?;
    renderer.draw_series(ctx, points, &scale)?;
    Ok(true)
}

/// The four supported chart geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Heatmap,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
        }
    }

    /// The heatmap has no axis labels and uses a tight uniform margin.
    pub const fn default_padding(self) -> Padding {
        match self {
            ChartKind::Heatmap => Padding::uniform(12.0),
            _ => Padding::new(24.0, 12.0, 12.0, 24.0),
        }
    }

    /// A renderer of this kind with default settings.
    pub fn renderer(self) -> Box<dyn ChartRenderer> {
        ChartConfig::new(self).build_renderer()
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-chart presentation settings.
///
/// Fields that a kind does not use are ignored by its renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub padding: Padding,
    /// Series colour for lines, and the fallback for uncategorized points.
    pub color: Color,
    pub palette: CategoryPalette,
    pub decorations: Decorations,
    pub line_width: f32,
    pub point_radius: f32,
    /// Line charts draw point markers only up to this many points.
    pub point_threshold: usize,
    pub min_bar_width: f32,
    /// Bar outlines are drawn only below this many points.
    pub outline_threshold: usize,
    /// Heatmap cells per axis.
    pub grid_size: usize,
}

impl ChartConfig {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            padding: kind.default_padding(),
            color: DEFAULT_SERIES_COLOR,
            palette: CategoryPalette::default(),
            decorations: Decorations::none(),
            line_width: 2.0,
            point_radius: 3.0,
            point_threshold: 1000,
            min_bar_width: 3.0,
            outline_threshold: 500,
            grid_size: 50,
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self
    }

    /// Palette whose fallback is this config's series colour.
    pub fn effective_palette(&self) -> CategoryPalette {
        let mut palette = self.palette.clone();
        palette.set_fallback(self.color);
        palette
    }

    pub fn build_renderer(&self) -> Box<dyn ChartRenderer> {
        match self.kind {
            ChartKind::Line => Box::new(LineRenderer::from_config(self)),
            ChartKind::Bar => Box::new(BarRenderer::from_config(self)),
            ChartKind::Scatter => Box::new(ScatterRenderer::from_config(self)),
            ChartKind::Heatmap => Box::new(HeatmapRenderer::from_config(self)),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new(ChartKind::Line)
    }
}

/// Pixel position of a finite point, or `None` if it cannot be drawn.
pub(crate) fn project(point: &Point, scale: &PlotScale) -> Option<Vec2> {
    if !point.is_finite() {
        return None;
    }
    let pos = Vec2::new(scale.scale_x(point.time), scale.scale_y(point.value));
    pos.is_finite().then_some(pos)
}
