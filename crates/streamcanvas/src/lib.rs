//! streamcanvas - real-time time-series charts
//!
//! streamcanvas turns a stream of timestamped samples into pixels at display
//! refresh rate:
//!
//! - **Data pipeline**: category/time-range filtering, fixed-width time-bucket
//!   aggregation and a capacity-bounded live stream window
//! - **Charts**: line, bar, scatter and density heatmap renderers drawing onto
//!   any immediate-mode [`Surface`](render::Surface)
//! - **Surfaces**: DPI-aware backing stores with coalesced redraw scheduling
//! - **UI support**: list virtualization and frame timing
//!
//! # Quick Start
//!
//! ```
//! use streamcanvas::prelude::*;
//!
//! let mut dashboard: Dashboard<BitmapSurface> = Dashboard::synthetic(DashboardConfig {
//!     data_count: 500,
//!     ..DashboardConfig::default()
//! });
//!
//! dashboard.add_chart(
//!     BitmapSurface::new(PhysicalSize::default()),
//!     ChartConfig::new(ChartKind::Line),
//!     LogicalSize::new(320.0, 160.0),
//!     1.0,
//! );
//!
//! let report = dashboard.run_frame();
//! assert_eq!(report.charts_painted, 1);
//! ```

pub mod dashboard;

pub use streamcanvas_chart as chart;
pub use streamcanvas_core as core;
pub use streamcanvas_render as render;
pub use streamcanvas_ui as ui;

pub use dashboard::{ChartId, Dashboard, DashboardConfig, FrameReport, MAX_DATA_COUNT, Task};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dashboard::{ChartId, Dashboard, DashboardConfig, FrameReport, Task};

    pub use streamcanvas_chart::{
        AggregationPeriod, Bounds, Chart, ChartConfig, ChartKind, ChartRenderer, Decorations,
        FilterOptions, Padding, PlotScale, Point, StreamConfig, StreamWindow, TimeRange,
        aggregate_by_period, apply_filters,
    };
    pub use streamcanvas_core::{Clock, Config, ManualClock, SystemClock};
    pub use streamcanvas_render::{
        BitmapSurface, Color, LogicalSize, PhysicalSize, Scheduler, Surface, SurfaceId,
        SurfaceManager, Vec2,
    };
    pub use streamcanvas_ui::{FrameMetrics, FrameMonitor, VirtualList, VirtualRange};
}
