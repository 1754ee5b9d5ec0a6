//! A renderer bound to a managed surface.

use streamcanvas_core::profiling::profile_function;
use streamcanvas_render::{
    Invalidation, LogicalSize, Scheduler, Surface, SurfaceError, SurfaceId, SurfaceManager,
    TaskHandle,
};

use crate::bounds::Bounds;
use crate::point::Point;
use crate::renderers::{ChartConfig, ChartKind, ChartRenderer, render_frame};

/// One chart: its surface, renderer, layout and bounds cache.
///
/// Charts share nothing; each keeps its own surface manager and last bounds.
#[derive(Debug)]
pub struct Chart<S> {
    manager: SurfaceManager<S>,
    config: ChartConfig,
    renderer: Box<dyn ChartRenderer>,
    bounds: Option<Bounds>,
    frames_painted: u64,
    frames_skipped: u64,
}

impl<S: Surface> Chart<S> {
    pub fn new(id: SurfaceId, surface: S, config: ChartConfig) -> Self {
        let renderer = config.build_renderer();
        Self {
            manager: SurfaceManager::new(id, surface),
            config,
            renderer,
            bounds: None,
            frames_painted: 0,
            frames_skipped: 0,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.manager.id()
    }

    pub fn kind(&self) -> ChartKind {
        self.config.kind
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn manager(&self) -> &SurfaceManager<S> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SurfaceManager<S> {
        &mut self.manager
    }

    pub fn surface(&self) -> &S {
        self.manager.surface()
    }

    /// Bounds used by the most recent paint.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    /// Attach to a layout box and schedule the first paint.
    pub fn attach<T>(&mut self, size: LogicalSize, pixel_ratio: f32, scheduler: &mut Scheduler<T>)
    where
        T: Clone + From<SurfaceId>,
    {
        self.manager.observe(size, pixel_ratio, scheduler);
    }

    pub fn detach<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        self.manager.detach(scheduler);
    }

    /// Swap in new presentation settings and schedule a repaint.
    pub fn set_config<T>(&mut self, config: ChartConfig, scheduler: &mut Scheduler<T>)
    where
        T: Clone + From<SurfaceId>,
    {
        self.renderer = config.build_renderer();
        self.config = config;
        self.manager.request_redraw(Invalidation::STYLE, scheduler);
    }

    /// The data changed; schedule a repaint.
    pub fn invalidate_data<T>(&mut self, scheduler: &mut Scheduler<T>) -> TaskHandle
    where
        T: Clone + From<SurfaceId>,
    {
        self.manager.request_redraw(Invalidation::DATA, scheduler)
    }

    /// Paint if `handle` is this chart's pending redraw.
    ///
    /// Returns `None` for handles that belong elsewhere or were superseded.
    /// A frame that fails to paint is skipped and the same redraw is
    /// requested again for the next frame.
    pub fn on_frame<T>(
        &mut self,
        handle: TaskHandle,
        points: &[Point],
        scheduler: &mut Scheduler<T>,
    ) -> Option<bool>
    where
        T: Clone + From<SurfaceId>,
    {
        let reasons = self.manager.on_frame(handle)?;
        tracing::trace!("Chart {:?} redraw for {:?}", self.id(), reasons);
        match self.try_paint(points) {
            Ok(drawn) => Some(drawn),
            Err(err) => {
                self.frames_skipped += 1;
                tracing::warn!(
                    "Skipping {} chart frame, retrying next frame: {}",
                    self.kind(),
                    err
                );
                self.manager.request_redraw(reasons, scheduler);
                Some(false)
            }
        }
    }

    /// Draw one frame of `points`.
    ///
    /// Failures are logged and the frame is skipped. Nothing is rescheduled
    /// here; [`on_frame`](Self::on_frame) re-requests the redraw itself.
    /// Returns whether anything was drawn.
    pub fn paint(&mut self, points: &[Point]) -> bool {
        match self.try_paint(points) {
            Ok(drawn) => drawn,
            Err(err) => {
                self.frames_skipped += 1;
                tracing::warn!("Skipping {} chart frame: {}", self.kind(), err);
                false
            }
        }
    }

    /// Like [`paint`](Self::paint), but hands the error back.
    pub fn try_paint(&mut self, points: &[Point]) -> Result<bool, SurfaceError> {
        profile_function!();

        self.bounds = Bounds::from_points(points);
        if self.bounds.is_none() {
            return Ok(false);
        }

        let ctx = self.manager.surface_mut().context()?;
        let drawn = render_frame(
            self.renderer.as_ref(),
            ctx,
            points,
            self.bounds.as_ref(),
            &self.config.padding,
            &self.config.decorations,
        )?;
        if drawn {
            self.frames_painted += 1;
        }
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorations::Decorations;
    use streamcanvas_render::PhysicalSize;
    use streamcanvas_test_utils::RecordingSurface;

    #[derive(Debug, Clone, PartialEq)]
    struct Redraw(SurfaceId);

    impl From<SurfaceId> for Redraw {
        fn from(id: SurfaceId) -> Self {
            Redraw(id)
        }
    }

    fn chart(kind: ChartKind) -> Chart<RecordingSurface> {
        Chart::new(
            SurfaceId(1),
            RecordingSurface::new(PhysicalSize::default()),
            ChartConfig::new(kind),
        )
    }

    fn sample() -> Vec<Point> {
        (0..10).map(|i| Point::new(i as f64, (i * i) as f64)).collect()
    }

    #[test]
    fn test_attach_then_frame_paints() {
        let mut scheduler: Scheduler<Redraw> = Scheduler::new();
        let mut chart = chart(ChartKind::Line);
        let log = chart.surface().log();
        chart.attach(LogicalSize::new(200.0, 100.0), 1.0, &mut scheduler);

        let frame = scheduler.take_frame();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].1, Redraw(SurfaceId(1)));

        let points = sample();
        assert_eq!(chart.on_frame(frame[0].0, &points, &mut scheduler), Some(true));
        assert_eq!(log.count_polylines(), 1);
        assert_eq!(chart.frames_painted(), 1);
        assert_eq!(chart.bounds().map(|b| b.max_value), Some(81.0));
    }

    #[test]
    fn test_empty_data_skips_clear() {
        let mut chart = chart(ChartKind::Bar);
        let log = chart.surface().log();
        assert!(!chart.paint(&[]));
        assert!(!chart.paint(&[Point::new(f64::NAN, 1.0)]));
        assert_eq!(log.call_count(), 0);
        assert!(chart.bounds().is_none());
    }

    #[test]
    fn test_unavailable_surface_skips_frame() {
        let mut chart = chart(ChartKind::Scatter);
        chart.manager_mut().surface_mut().set_unavailable(Some("detached"));

        assert!(!chart.paint(&sample()));
        assert_eq!(chart.frames_skipped(), 1);
        assert!(matches!(
            chart.try_paint(&sample()),
            Err(SurfaceError::Unavailable { .. })
        ));

        chart.manager_mut().surface_mut().set_unavailable(None);
        assert!(chart.paint(&sample()));
    }

    #[test]
    fn test_failed_frame_is_retried() {
        let mut scheduler: Scheduler<Redraw> = Scheduler::new();
        let mut chart = chart(ChartKind::Line);
        let log = chart.surface().log();
        chart.attach(LogicalSize::new(200.0, 100.0), 1.0, &mut scheduler);
        chart.manager_mut().surface_mut().set_unavailable(Some("lost"));

        let frame = scheduler.take_frame();
        assert_eq!(chart.on_frame(frame[0].0, &sample(), &mut scheduler), Some(false));
        assert_eq!(chart.frames_skipped(), 1);
        assert!(chart.manager().pending_redraw().is_some());

        // Still unavailable: skipped again, still pending
        let frame = scheduler.take_frame();
        assert_eq!(chart.on_frame(frame[0].0, &sample(), &mut scheduler), Some(false));
        assert_eq!(scheduler.pending_frames(), 1);

        chart.manager_mut().surface_mut().set_unavailable(None);
        let frame = scheduler.take_frame();
        assert_eq!(chart.on_frame(frame[0].0, &sample(), &mut scheduler), Some(true));
        assert_eq!(chart.frames_painted(), 1);
        assert_eq!(log.count_polylines(), 1);
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn test_set_config_rebuilds_renderer() {
        let mut scheduler: Scheduler<Redraw> = Scheduler::new();
        let mut chart = chart(ChartKind::Line);
        let log = chart.surface().log();
        chart.attach(LogicalSize::new(200.0, 100.0), 1.0, &mut scheduler);
        scheduler.take_frame();

        chart.set_config(
            ChartConfig::new(ChartKind::Heatmap).with_decorations(Decorations::full()),
            &mut scheduler,
        );
        assert_eq!(chart.kind(), ChartKind::Heatmap);
        assert_eq!(scheduler.pending_frames(), 1);

        log.clear_calls();
        chart.paint(&sample());
        assert_eq!(log.count_polylines(), 12 + 2);
        assert!(log.count_fill_rects() > 0);
    }

    #[test]
    fn test_stale_frame_does_not_paint() {
        let mut scheduler: Scheduler<Redraw> = Scheduler::new();
        let mut chart = chart(ChartKind::Line);
        chart.attach(LogicalSize::new(200.0, 100.0), 1.0, &mut scheduler);
        let stale = chart.manager().pending_redraw().unwrap();
        chart.invalidate_data(&mut scheduler);

        assert_eq!(chart.on_frame(stale, &sample(), &mut scheduler), None);
    }
}
