//! End-to-end runs of the dashboard on a simulated clock.

use std::rc::Rc;
use std::time::Duration;

use streamcanvas::chart::{GeneratorError, SyntheticGenerator};
use streamcanvas::prelude::*;
use streamcanvas_test_utils::RecordingSurface;

const NOW_MS: f64 = 3_600_000.0 * 100.0;
const FRAME: Duration = Duration::from_micros(16_667);

fn raw(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let time = NOW_MS - (count - i) as f64 * 1000.0;
            Point::new(time, (i % 17) as f64).with_category(["A", "B", "C", "D", "E"][i % 5])
        })
        .collect()
}

fn raw_config() -> DashboardConfig {
    DashboardConfig {
        aggregation: AggregationPeriod::None,
        ..DashboardConfig::default()
    }
}

#[test]
fn test_bitmap_charts_receive_pixels() {
    let clock = Rc::new(ManualClock::new(NOW_MS));
    let mut dashboard: Dashboard<BitmapSurface> =
        Dashboard::new(raw_config(), clock.clone(), raw(300), SyntheticGenerator::from_seed(5));

    let ids: Vec<ChartId> = ChartKind::ALL
        .into_iter()
        .map(|kind| {
            dashboard.add_chart(
                BitmapSurface::new(PhysicalSize::default()),
                ChartConfig::new(kind),
                LogicalSize::new(200.0, 100.0),
                2.0,
            )
        })
        .collect();

    clock.advance(FRAME);
    assert_eq!(dashboard.run_frame().charts_painted, 4);

    for id in ids {
        let chart = dashboard.chart(id).unwrap();
        let surface = chart.surface();
        assert_eq!(surface.backing_size(), PhysicalSize::new(400, 200));
        let inked = surface.pixels().chunks(3).any(|px| px != [255, 255, 255]);
        assert!(inked, "{} chart drew nothing", chart.kind());
    }
}

#[test]
fn test_stream_window_stays_bounded() {
    let clock = Rc::new(ManualClock::new(NOW_MS));
    let config = DashboardConfig {
        stream: StreamConfig {
            capacity: 50,
            ..StreamConfig::default()
        },
        ..raw_config()
    };
    let mut dashboard: Dashboard<RecordingSurface> =
        Dashboard::new(config, clock.clone(), raw(40), SyntheticGenerator::from_seed(9));
    dashboard.toggle_streaming();

    let mut ticks = 0;
    for _ in 0..120 {
        clock.advance(FRAME);
        ticks += dashboard.run_frame().ticks;
    }

    // Two seconds at one tick per 100ms
    assert_eq!(ticks, 20);
    let shown = dashboard.display_points();
    assert_eq!(shown.len(), 50);
    assert!(shown.windows(2).all(|w| w[1].time - w[0].time > 0.0));
    assert_eq!(shown.last().map(|p| p.time), Some(NOW_MS - 1000.0 + 20.0 * 100.0));
}

#[test]
fn test_failing_generator_keeps_timer_running() {
    streamcanvas::core::logging::init_for_tests();
    let clock = Rc::new(ManualClock::new(NOW_MS));
    let failing = |_previous: f64, _time: f64| -> Result<Point, GeneratorError> {
        Err(GeneratorError::Exhausted)
    };
    let mut dashboard: Dashboard<RecordingSurface, _> =
        Dashboard::new(raw_config(), clock.clone(), raw(10), failing);
    dashboard.toggle_streaming();

    clock.advance(Duration::from_millis(350));
    let report = dashboard.run_frame();
    assert_eq!(report.ticks, 0);
    assert_eq!(dashboard.stream().failed_ticks(), 3);
    assert_eq!(dashboard.stream().len(), 10);
    assert!(dashboard.is_streaming());
    assert_eq!(dashboard.scheduler().active_intervals(), 1);
}

#[test]
fn test_time_range_narrows_display() {
    let clock = Rc::new(ManualClock::new(NOW_MS));
    let mut dashboard: Dashboard<RecordingSurface> =
        Dashboard::new(raw_config(), clock.clone(), raw(600), SyntheticGenerator::from_seed(1));
    assert_eq!(dashboard.display_points().len(), 600);

    dashboard.set_time_range(Duration::from_secs(60));
    assert_eq!(dashboard.display_points().len(), 60);
    assert_eq!(dashboard.table().item_count(), 60);
}

#[test]
fn test_filter_change_while_streaming_resets_window() {
    let clock = Rc::new(ManualClock::new(NOW_MS));
    let mut dashboard: Dashboard<RecordingSurface> =
        Dashboard::new(raw_config(), clock.clone(), raw(100), SyntheticGenerator::from_seed(2));
    dashboard.toggle_streaming();

    clock.advance(Duration::from_millis(500));
    dashboard.run_frame();
    assert_eq!(dashboard.display_points().len(), 105);

    dashboard.toggle_category("B");
    assert!(dashboard.is_streaming());
    assert_eq!(dashboard.display_points().len(), 80);
    assert!(dashboard.display_points().iter().all(|p| p.category() != Some("B")));
}

#[test]
fn test_metrics_follow_frame_cadence() {
    let clock = Rc::new(ManualClock::new(NOW_MS));
    let mut dashboard: Dashboard<RecordingSurface> =
        Dashboard::new(raw_config(), clock.clone(), raw(10), SyntheticGenerator::from_seed(3));

    for _ in 0..30 {
        clock.advance(Duration::from_millis(10));
        dashboard.run_frame();
    }
    clock.advance(Duration::from_millis(40));
    let metrics = dashboard.run_frame().metrics;

    assert_eq!(metrics.frame_drops, 1);
    assert!(metrics.fps > 90.0 && metrics.fps < 100.0);
    assert!(metrics.memory_usage_mb > 0.0);
}
