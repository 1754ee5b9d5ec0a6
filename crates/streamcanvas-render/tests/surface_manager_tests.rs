//! Surface resize and redraw coalescing tests.

use streamcanvas_render::{
    Invalidation, LogicalSize, PhysicalSize, Scheduler, Surface, SurfaceId, SurfaceManager,
};
use streamcanvas_test_utils::RecordingSurface;

#[derive(Debug, Clone, PartialEq)]
struct Redraw(SurfaceId);

impl From<SurfaceId> for Redraw {
    fn from(id: SurfaceId) -> Self {
        Redraw(id)
    }
}

fn observed(
    logical: LogicalSize,
    ratio: f32,
) -> (SurfaceManager<RecordingSurface>, Scheduler<Redraw>) {
    let mut scheduler = Scheduler::new();
    let mut manager = SurfaceManager::new(SurfaceId(1), RecordingSurface::new(PhysicalSize::default()));
    manager.observe(logical, ratio, &mut scheduler);
    (manager, scheduler)
}

/// Drain one frame and hand every task to the manager.
fn run_frame(
    manager: &mut SurfaceManager<RecordingSurface>,
    scheduler: &mut Scheduler<Redraw>,
) -> Vec<Invalidation> {
    scheduler
        .take_frame()
        .into_iter()
        .filter_map(|(handle, _)| manager.on_frame(handle))
        .collect()
}

#[test]
fn test_observe_sizes_backing_store_for_ratio() {
    let (mut manager, mut scheduler) = observed(LogicalSize::new(300.0, 150.0), 2.0);

    assert_eq!(manager.surface().backing_size(), PhysicalSize::new(600, 300));
    assert_eq!(manager.surface().pixel_ratio(), 2.0);
    assert_eq!(scheduler.pending_frames(), 1);

    let fired = run_frame(&mut manager, &mut scheduler);
    assert_eq!(fired, vec![Invalidation::RESIZE]);
}

#[test]
fn test_observe_paints_even_without_resize() {
    let mut scheduler: Scheduler<Redraw> = Scheduler::new();
    let surface = RecordingSurface::new(PhysicalSize::new(300, 150));
    let log = surface.log();
    let mut manager = SurfaceManager::new(SurfaceId(7), surface);

    manager.observe(LogicalSize::new(300.0, 150.0), 1.0, &mut scheduler);

    assert_eq!(log.count_resizes(), 0);
    let fired = run_frame(&mut manager, &mut scheduler);
    assert_eq!(fired.len(), 1);
}

#[test]
fn test_two_resizes_in_one_frame_paint_once() {
    let (mut manager, mut scheduler) = observed(LogicalSize::new(300.0, 150.0), 1.0);
    run_frame(&mut manager, &mut scheduler);

    assert!(manager.on_layout_resize(LogicalSize::new(400.0, 200.0), &mut scheduler));
    assert!(manager.on_layout_resize(LogicalSize::new(500.0, 250.0), &mut scheduler));

    // Both resizes reallocate, but only one redraw is queued.
    assert_eq!(manager.resize_count(), 3);
    assert_eq!(scheduler.pending_frames(), 1);

    let fired = run_frame(&mut manager, &mut scheduler);
    assert_eq!(fired, vec![Invalidation::RESIZE]);
    assert_eq!(manager.surface().backing_size(), PhysicalSize::new(500, 250));
}

#[test]
fn test_unchanged_size_is_a_no_op() {
    let (mut manager, mut scheduler) = observed(LogicalSize::new(300.0, 150.0), 2.0);
    run_frame(&mut manager, &mut scheduler);
    let log = manager.surface().log();
    log.clear_calls();

    // 300.2 * 2 rounds to the same 600 device pixels.
    assert!(!manager.on_layout_resize(LogicalSize::new(300.2, 150.0), &mut scheduler));
    assert!(!manager.on_viewport_resize(2.0, &mut scheduler));

    assert_eq!(log.call_count(), 0);
    assert_eq!(scheduler.pending_frames(), 0);
}

#[test]
fn test_ratio_change_resizes_backing_store() {
    let (mut manager, mut scheduler) = observed(LogicalSize::new(300.0, 150.0), 1.0);
    run_frame(&mut manager, &mut scheduler);

    assert!(manager.on_viewport_resize(3.0, &mut scheduler));
    assert_eq!(manager.surface().backing_size(), PhysicalSize::new(900, 450));
    assert_eq!(manager.surface().pixel_ratio(), 3.0);
    assert_eq!(scheduler.pending_frames(), 1);
}

#[test]
fn test_invalidation_reasons_accumulate() {
    let (mut manager, mut scheduler) = observed(LogicalSize::new(100.0, 100.0), 1.0);
    run_frame(&mut manager, &mut scheduler);

    manager.request_redraw(Invalidation::DATA, &mut scheduler);
    manager.on_layout_resize(LogicalSize::new(120.0, 100.0), &mut scheduler);
    manager.request_redraw(Invalidation::STYLE, &mut scheduler);

    let fired = run_frame(&mut manager, &mut scheduler);
    assert_eq!(
        fired,
        vec![Invalidation::DATA | Invalidation::RESIZE | Invalidation::STYLE]
    );
}

#[test]
fn test_stale_handle_is_ignored() {
    let (mut manager, mut scheduler) = observed(LogicalSize::new(100.0, 100.0), 1.0);
    let first = manager.pending_redraw().unwrap();

    manager.request_redraw(Invalidation::DATA, &mut scheduler);
    assert!(!scheduler.is_frame_pending(first));
    assert_eq!(manager.on_frame(first), None);
}

#[test]
fn test_detach_cancels_pending_redraw() {
    let (mut manager, mut scheduler) = observed(LogicalSize::new(100.0, 100.0), 1.0);
    manager.detach(&mut scheduler);

    assert!(!manager.is_observing());
    assert_eq!(scheduler.pending_frames(), 0);
    assert!(!manager.on_layout_resize(LogicalSize::new(50.0, 50.0), &mut scheduler));
}

#[test]
fn test_sub_unit_ratio_is_clamped() {
    let (manager, _scheduler) = observed(LogicalSize::new(100.0, 50.0), 0.5);
    assert_eq!(manager.pixel_ratio(), 1.0);
    assert_eq!(manager.surface().backing_size(), PhysicalSize::new(100, 50));
}
