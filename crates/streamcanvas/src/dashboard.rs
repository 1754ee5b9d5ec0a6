//! The dashboard: one dataset, a filter, a live stream, and the charts and
//! table that display it.
//!
//! The dashboard owns every piece of mutable state and a single [`Scheduler`].
//! A host drives it by calling [`Dashboard::run_frame`] once per display
//! refresh; stream ticks and chart redraws both come out of the scheduler.

use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;
use rand::Rng;
use streamcanvas_chart::{
    AggregationPeriod, Chart, ChartConfig, FilterOptions, Point, PointGenerator, StreamConfig,
    StreamWindow, SyntheticGenerator, TimeRange, apply_filters, generate_initial_dataset,
};
use streamcanvas_core::Config;
use streamcanvas_core::profiling::profile_function;
use streamcanvas_core::time::{Clock, SystemClock, as_millis_f64};
use streamcanvas_render::{LogicalSize, Scheduler, Surface, SurfaceId};
use streamcanvas_ui::{
    FrameMetrics, FrameMonitor, MonitorConfig, TimedScope, VirtualList, VirtualListConfig,
    VirtualRange,
};

/// Identifies a chart within a dashboard.
pub type ChartId = SurfaceId;

/// Largest dataset [`Dashboard::regenerate`] will produce.
pub const MAX_DATA_COUNT: usize = 100_000;

/// Work items delivered by the dashboard's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    StreamTick,
    Redraw(ChartId),
}

impl From<SurfaceId> for Task {
    fn from(id: SurfaceId) -> Self {
        Task::Redraw(id)
    }
}

/// Dashboard settings.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub core: Config,
    /// Size of the generated dataset.
    pub data_count: usize,
    /// Width of the initial "last N" time range filter.
    pub time_range: Duration,
    pub aggregation: AggregationPeriod,
    pub stream: StreamConfig,
    pub table: VirtualListConfig,
    pub monitor: MonitorConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            core: Config::default(),
            data_count: 10_000,
            time_range: Duration::from_secs(3600),
            aggregation: AggregationPeriod::default(),
            stream: StreamConfig::default(),
            table: VirtualListConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

/// What one call to [`Dashboard::run_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Stream ticks that appended a point.
    pub ticks: usize,
    pub charts_painted: usize,
    pub metrics: FrameMetrics,
}

/// Owns the dataset pipeline and routes scheduler work to it.
///
/// The charts display the filtered dataset while idle and the stream window
/// while streaming. Changing a filter re-runs the pipeline and resets the
/// stream window to the new filtered set.
pub struct Dashboard<S, G = SyntheticGenerator> {
    config: DashboardConfig,
    clock: Rc<dyn Clock>,
    scheduler: Scheduler<Task>,
    raw: Vec<Point>,
    filters: FilterOptions,
    filtered: Vec<Point>,
    stream: StreamWindow<G>,
    /// Snapshot of the stream window, refreshed on tick.
    live: Vec<Point>,
    charts: IndexMap<ChartId, Chart<S>>,
    next_chart_id: u32,
    table: VirtualList,
    monitor: FrameMonitor<Rc<dyn Clock>>,
}

impl<S: Surface> Dashboard<S, SyntheticGenerator> {
    /// A dashboard over a freshly generated synthetic dataset, on real time.
    pub fn synthetic(config: DashboardConfig) -> Self {
        let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
        let mut rng = rand::rng();
        let raw = generate_initial_dataset(config.data_count, clock.epoch_millis(), &mut rng);
        Self::new(config, clock, raw, SyntheticGenerator::from_entropy())
    }
}

impl<S: Surface, G: PointGenerator> Dashboard<S, G> {
    /// Build a dashboard over `raw`, filtered to the configured time range
    /// ending at the clock's current wall time.
    pub fn new(config: DashboardConfig, clock: Rc<dyn Clock>, raw: Vec<Point>, generator: G) -> Self {
        let now_ms = clock.epoch_millis();
        let filters = FilterOptions {
            time_range: TimeRange::last(as_millis_f64(config.time_range), now_ms),
            aggregation: config.aggregation,
            ..FilterOptions::default()
        };
        let monitor = FrameMonitor::with_clock(config.monitor.clone(), clock.clone());

        let mut dashboard = Self {
            stream: StreamWindow::new(config.stream.clone(), generator),
            table: VirtualList::with_config(0, config.table),
            config,
            clock,
            scheduler: Scheduler::new(),
            raw,
            filters,
            filtered: Vec::new(),
            live: Vec::new(),
            charts: IndexMap::new(),
            next_chart_id: 0,
            monitor,
        };
        dashboard.refilter();
        tracing::debug!(
            "Dashboard created with {} raw points, {} after filtering",
            dashboard.raw.len(),
            dashboard.filtered.len()
        );
        dashboard
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler<Task> {
        &self.scheduler
    }

    pub fn raw_points(&self) -> &[Point] {
        &self.raw
    }

    pub fn filtered_points(&self) -> &[Point] {
        &self.filtered
    }

    /// The points the charts and table currently show.
    pub fn display_points(&self) -> &[Point] {
        if self.stream.is_streaming() {
            &self.live
        } else {
            &self.filtered
        }
    }

    pub fn stream(&self) -> &StreamWindow<G> {
        &self.stream
    }

    // Filters

    pub fn filters(&self) -> &FilterOptions {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterOptions) {
        self.filters = filters;
        self.refilter();
    }

    /// Edit the filters in place and re-run the pipeline.
    pub fn update_filters(&mut self, update: impl FnOnce(&mut FilterOptions)) {
        update(&mut self.filters);
        self.refilter();
    }

    pub fn toggle_category(&mut self, category: &str) -> bool {
        let selected = self.filters.toggle_category(category);
        self.refilter();
        selected
    }

    pub fn set_aggregation(&mut self, aggregation: AggregationPeriod) {
        self.update_filters(|f| f.aggregation = aggregation);
    }

    /// Show the last `duration` of data, ending now.
    pub fn set_time_range(&mut self, duration: Duration) {
        let range = TimeRange::last(as_millis_f64(duration), self.clock.epoch_millis());
        self.update_filters(|f| f.time_range = range);
    }

    /// Replace the raw dataset with `count` fresh synthetic points.
    ///
    /// `count` is clamped to `1..=MAX_DATA_COUNT`.
    pub fn regenerate<R: Rng>(&mut self, count: usize, rng: &mut R) {
        let count = count.clamp(1, MAX_DATA_COUNT);
        self.config.data_count = count;
        self.raw = generate_initial_dataset(count, self.clock.epoch_millis(), rng);
        self.refilter();
    }

    fn refilter(&mut self) {
        profile_function!();

        self.monitor.begin(TimedScope::DataProcessing);
        self.filtered = apply_filters(&self.raw, &self.filters);
        self.stream.reset(self.filtered.clone());
        self.live = self.stream.points();
        self.monitor.end(TimedScope::DataProcessing);

        self.table.set_item_count(self.display_points().len());
        self.invalidate_charts();
    }

    // Streaming

    pub fn is_streaming(&self) -> bool {
        self.stream.is_streaming()
    }

    pub fn start_streaming(&mut self) {
        if self.stream.is_streaming() {
            return;
        }
        self.stream.start(&mut self.scheduler, Task::StreamTick);
        self.live = self.stream.points();
        self.display_changed();
    }

    pub fn stop_streaming(&mut self) {
        if self.stream.stop(&mut self.scheduler) {
            self.display_changed();
        }
    }

    /// Flip streaming on or off. Returns the new state.
    pub fn toggle_streaming(&mut self) -> bool {
        if self.is_streaming() {
            self.stop_streaming();
        } else {
            self.start_streaming();
        }
        self.is_streaming()
    }

    // Charts

    /// Add a chart laid out at `size` and schedule its first paint.
    pub fn add_chart(&mut self, surface: S, config: ChartConfig, size: LogicalSize, pixel_ratio: f32) -> ChartId {
        let id = SurfaceId(self.next_chart_id);
        self.next_chart_id += 1;

        let mut chart = Chart::new(id, surface, config);
        let ratio = self.config.core.effective_pixel_ratio(pixel_ratio);
        chart.attach(size, ratio, &mut self.scheduler);
        tracing::debug!("Added {} chart {:?}", chart.kind(), id);
        self.charts.insert(id, chart);
        id
    }

    /// Detach and return a chart. Its pending redraw is cancelled.
    pub fn remove_chart(&mut self, id: ChartId) -> Option<Chart<S>> {
        let mut chart = self.charts.shift_remove(&id)?;
        chart.detach(&mut self.scheduler);
        Some(chart)
    }

    pub fn chart(&self, id: ChartId) -> Option<&Chart<S>> {
        self.charts.get(&id)
    }

    pub fn chart_mut(&mut self, id: ChartId) -> Option<&mut Chart<S>> {
        self.charts.get_mut(&id)
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart<S>> {
        self.charts.values()
    }

    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    pub fn set_chart_config(&mut self, id: ChartId, config: ChartConfig) -> bool {
        let Some(chart) = self.charts.get_mut(&id) else {
            return false;
        };
        chart.set_config(config, &mut self.scheduler);
        true
    }

    /// Layout changed the chart's box.
    pub fn resize_chart(&mut self, id: ChartId, size: LogicalSize) -> bool {
        let Some(chart) = self.charts.get_mut(&id) else {
            return false;
        };
        chart.manager_mut().on_layout_resize(size, &mut self.scheduler)
    }

    /// The display's pixel ratio changed; applies to every chart.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        let ratio = self.config.core.effective_pixel_ratio(pixel_ratio);
        for chart in self.charts.values_mut() {
            chart.manager_mut().on_viewport_resize(ratio, &mut self.scheduler);
        }
    }

    fn invalidate_charts(&mut self) {
        for chart in self.charts.values_mut() {
            if chart.manager().is_observing() {
                chart.invalidate_data(&mut self.scheduler);
            }
        }
    }

    fn display_changed(&mut self) {
        self.table.set_item_count(self.display_points().len());
        self.invalidate_charts();
    }

    // Table

    pub fn table(&self) -> &VirtualList {
        &self.table
    }

    pub fn scroll_table(&mut self, scroll_top: f32) -> &VirtualRange {
        self.table.set_scroll_top(scroll_top)
    }

    /// The display points for the table's current window.
    pub fn visible_rows(&self) -> &[Point] {
        let points = self.display_points();
        let range = self.table.range().range();
        let end = range.end.min(points.len());
        &points[range.start.min(end)..end]
    }

    // Frame loop

    /// Run everything that is due at the clock's current time.
    ///
    /// Order: stream ticks, then chart redraws, then the frame sample.
    pub fn run_frame(&mut self) -> FrameReport {
        profile_function!();

        let now = self.clock.elapsed();
        let mut report = FrameReport::default();

        for (_, task) in self.scheduler.advance_to(now) {
            if task == Task::StreamTick && self.stream.tick(self.clock.epoch_millis()) {
                report.ticks += 1;
            }
        }
        if report.ticks > 0 {
            self.live = self.stream.points();
            self.display_changed();
        }

        let frame = self.scheduler.take_frame();
        if !frame.is_empty() {
            self.monitor.begin(TimedScope::Render);
            let points: &[Point] = if self.stream.is_streaming() {
                &self.live
            } else {
                &self.filtered
            };
            for (handle, task) in frame {
                let Task::Redraw(id) = task else {
                    continue;
                };
                if let Some(chart) = self.charts.get_mut(&id)
                    && chart.on_frame(handle, points, &mut self.scheduler) == Some(true)
                {
                    report.charts_painted += 1;
                }
            }
            self.monitor.end(TimedScope::Render);
        }

        self.monitor.sample_at(now);
        self.monitor.set_memory_usage_bytes(self.estimated_memory_bytes());
        report.metrics = self.monitor.metrics();
        tracing::trace!(
            "Frame: {} ticks, {} charts painted, {:.1} fps",
            report.ticks,
            report.charts_painted,
            report.metrics.fps
        );
        report
    }

    pub fn metrics(&self) -> FrameMetrics {
        self.monitor.metrics()
    }

    pub fn monitor(&self) -> &FrameMonitor<Rc<dyn Clock>> {
        &self.monitor
    }

    pub fn reset_metrics(&mut self) {
        self.monitor.reset();
    }

    fn estimated_memory_bytes(&self) -> u64 {
        let points = self.raw.len() + self.filtered.len() + self.stream.len() + self.live.len();
        (points * std::mem::size_of::<Point>()) as u64
    }
}

impl<S, G> std::fmt::Debug for Dashboard<S, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("raw", &self.raw.len())
            .field("filtered", &self.filtered.len())
            .field("live", &self.live.len())
            .field("charts", &self.charts.len())
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use streamcanvas_chart::ChartKind;
    use streamcanvas_core::ManualClock;
    use streamcanvas_render::PhysicalSize;
    use streamcanvas_test_utils::RecordingSurface;

    // A whole number of minutes, so one-minute buckets align with the data
    const NOW_MS: f64 = 12_000_000.0;

    fn raw() -> Vec<Point> {
        (0..600)
            .map(|i| {
                let category = ["A", "B", "C", "D", "E"][i % 5];
                Point::new(NOW_MS - 600_000.0 + i as f64 * 1000.0, i as f64).with_category(category)
            })
            .collect()
    }

    fn dashboard() -> (Rc<ManualClock>, Dashboard<RecordingSurface>) {
        let clock = Rc::new(ManualClock::new(NOW_MS));
        let config = DashboardConfig {
            aggregation: AggregationPeriod::None,
            ..DashboardConfig::default()
        };
        let dashboard = Dashboard::new(config, clock.clone(), raw(), SyntheticGenerator::from_seed(1));
        (clock, dashboard)
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(PhysicalSize::default())
    }

    #[test]
    fn test_initial_pipeline() {
        let (_, dashboard) = dashboard();
        assert_eq!(dashboard.raw_points().len(), 600);
        assert_eq!(dashboard.display_points().len(), 600);
        assert!(!dashboard.is_streaming());
        assert_eq!(dashboard.table().item_count(), 600);
    }

    #[test]
    fn test_category_filter_resets_stream() {
        let (_, mut dashboard) = dashboard();
        assert!(!dashboard.toggle_category("A"));
        assert_eq!(dashboard.filtered_points().len(), 480);
        assert_eq!(dashboard.stream().len(), 480);
        assert!(dashboard.display_points().iter().all(|p| p.category() != Some("A")));
    }

    #[test]
    fn test_aggregation_change() {
        let (_, mut dashboard) = dashboard();
        dashboard.set_aggregation(AggregationPeriod::OneMinute);
        // 600 one-second points over ten whole minutes
        assert_eq!(dashboard.filtered_points().len(), 10);
        assert!(dashboard.filtered_points().windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_first_frame_paints_every_chart() {
        let (clock, mut dashboard) = dashboard();
        let size = LogicalSize::new(400.0, 200.0);
        for kind in ChartKind::ALL {
            dashboard.add_chart(surface(), ChartConfig::new(kind), size, 2.0);
        }

        clock.advance(Duration::from_millis(16));
        let report = dashboard.run_frame();
        assert_eq!(report.charts_painted, 4);
        assert_eq!(report.ticks, 0);

        // Nothing changed, nothing repainted
        clock.advance(Duration::from_millis(16));
        assert_eq!(dashboard.run_frame().charts_painted, 0);
    }

    #[test]
    fn test_streaming_ticks_and_repaints() {
        let (clock, mut dashboard) = dashboard();
        let id = dashboard.add_chart(surface(), ChartConfig::default(), LogicalSize::new(400.0, 200.0), 1.0);
        dashboard.run_frame();

        assert!(dashboard.toggle_streaming());
        clock.advance(Duration::from_millis(250));
        let report = dashboard.run_frame();
        assert_eq!(report.ticks, 2);
        assert_eq!(report.charts_painted, 1);
        assert_eq!(dashboard.display_points().len(), 602);

        // New points continue one tick after the newest filtered point
        let newest = dashboard.display_points().last().map(|p| p.time);
        assert_eq!(newest, Some(NOW_MS - 1000.0 + 200.0));
        assert_eq!(dashboard.chart(id).map(|c| c.frames_painted()), Some(2));

        assert!(!dashboard.toggle_streaming());
        assert_eq!(dashboard.scheduler().active_intervals(), 0);
        // Idle again: back to the filtered set
        assert_eq!(dashboard.display_points().len(), 600);
    }

    #[test]
    fn test_resize_coalesces_into_one_paint() {
        let (clock, mut dashboard) = dashboard();
        let id = dashboard.add_chart(surface(), ChartConfig::default(), LogicalSize::new(400.0, 200.0), 1.0);
        dashboard.run_frame();

        dashboard.resize_chart(id, LogicalSize::new(500.0, 200.0));
        dashboard.resize_chart(id, LogicalSize::new(600.0, 300.0));
        assert_eq!(dashboard.scheduler().pending_frames(), 1);

        clock.advance(Duration::from_millis(16));
        assert_eq!(dashboard.run_frame().charts_painted, 1);
        let backing = dashboard.chart(id).map(|c| c.surface().backing_size());
        assert_eq!(backing, Some(PhysicalSize::new(600, 300)));
    }

    #[test]
    fn test_unavailable_surface_repaints_once_restored() {
        let (clock, mut dashboard) = dashboard();
        let id = dashboard.add_chart(surface(), ChartConfig::default(), LogicalSize::new(400.0, 200.0), 1.0);
        let set_unavailable = |dashboard: &mut Dashboard<RecordingSurface>, reason: Option<&'static str>| {
            if let Some(chart) = dashboard.chart_mut(id) {
                chart.manager_mut().surface_mut().set_unavailable(reason);
            }
        };

        set_unavailable(&mut dashboard, Some("lost"));
        clock.advance(Duration::from_millis(16));
        assert_eq!(dashboard.run_frame().charts_painted, 0);
        assert_eq!(dashboard.scheduler().pending_frames(), 1);

        // Data is idle, so only the retried redraw can paint
        set_unavailable(&mut dashboard, None);
        let painted: usize = (0..10)
            .map(|_| {
                clock.advance(Duration::from_millis(16));
                dashboard.run_frame().charts_painted
            })
            .sum();
        assert_eq!(painted, 1);

        let chart = dashboard.chart(id).unwrap();
        assert_eq!(chart.frames_skipped(), 1);
        assert_eq!(chart.frames_painted(), 1);
        assert_eq!(dashboard.scheduler().pending_frames(), 0);
    }

    #[test]
    fn test_removed_chart_cancels_redraw() {
        let (_, mut dashboard) = dashboard();
        let id = dashboard.add_chart(surface(), ChartConfig::default(), LogicalSize::new(10.0, 10.0), 1.0);
        assert_eq!(dashboard.scheduler().pending_frames(), 1);

        assert!(dashboard.remove_chart(id).is_some());
        assert_eq!(dashboard.scheduler().pending_frames(), 0);
        assert!(dashboard.remove_chart(id).is_none());
    }

    #[test]
    fn test_table_window_follows_scroll() {
        let (_, mut dashboard) = dashboard();
        let range = dashboard.scroll_table(4_000.0).clone();
        assert_eq!(range.range(), 95..115);
        assert_eq!(dashboard.visible_rows().len(), 20);
        assert_eq!(dashboard.visible_rows()[0].value, 95.0);
    }

    #[test]
    fn test_regenerate_clamps_count() {
        let (_, mut dashboard) = dashboard();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        dashboard.regenerate(0, &mut rng);
        assert_eq!(dashboard.raw_points().len(), 1);
        assert_eq!(dashboard.config().data_count, 1);
    }
}
