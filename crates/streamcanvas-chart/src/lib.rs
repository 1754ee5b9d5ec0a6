//! Time-series charting for streamcanvas.
//!
//! The data side turns raw [`Point`]s into what a chart draws: filtering by
//! category and time range, fixed-width time bucketing, and the bounded
//! [`StreamWindow`] that appends synthetic samples on a timer. The drawing
//! side computes [`Bounds`], maps data to pixels through [`PlotScale`] and
//! hands the result to one of four [`ChartRenderer`]s. [`Chart`] ties a
//! renderer to a managed surface.
//!
//! # Example
//!
//! ```
//! use streamcanvas_chart::{aggregate_by_period, Bounds, Point};
//!
//! let points = vec![
//!     Point::new(100.0, 10.0),
//!     Point::new(200.0, 20.0),
//!     Point::new(1100.0, 30.0),
//! ];
//! let buckets = aggregate_by_period(&points, 1000);
//! assert_eq!(buckets.len(), 2);
//!
//! let bounds = Bounds::from_points(&buckets).unwrap();
//! assert_eq!(bounds.min_time, 0.0);
//! ```

pub mod aggregation;
pub mod bounds;
pub mod chart;
pub mod decorations;
pub mod filter;
pub mod generator;
pub mod palette;
pub mod point;
pub mod renderers;
pub mod scale;
pub mod stream;

pub use aggregation::{AggregationPeriod, aggregate_by_period, sort_by_time};
pub use bounds::Bounds;
pub use chart::Chart;
pub use decorations::Decorations;
pub use filter::{FilterOptions, TimeRange, apply_filters};
pub use generator::{
    CATEGORIES, GeneratorError, PointGenerator, SyntheticGenerator, generate_initial_dataset,
};
pub use palette::CategoryPalette;
pub use point::{MetaValue, Metadata, Point};
pub use renderers::{
    BarRenderer, ChartConfig, ChartKind, ChartRenderer, HeatmapRenderer, LineRenderer,
    ScatterRenderer,
};
pub use scale::{Padding, PlotScale};
pub use stream::{RingBuffer, StreamConfig, StreamState, StreamWindow};
