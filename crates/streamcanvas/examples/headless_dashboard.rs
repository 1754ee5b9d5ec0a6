//! Headless Dashboard - streaming into four software-rendered charts
//!
//! Drives a dashboard on a simulated clock for ten seconds of 60Hz frames:
//! - Two seconds idle on the filtered dataset
//! - Streaming switched on, a new sample every 100ms
//! - A resize and a pixel-ratio change mid-run
//! - Aggregation switched to 5 minutes, which resets the stream
//!
//! Run with `RUST_LOG=streamcanvas=trace` to see per-frame logging, and
//! connect `puffin_viewer` to inspect the render scopes.

use std::rc::Rc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use streamcanvas::chart::{SyntheticGenerator, generate_initial_dataset};
use streamcanvas::core::logging;
use streamcanvas::core::config::ProfilingMode;
use streamcanvas::core::profiling::{init_profiling, new_frame};
use streamcanvas::prelude::*;

const FRAME: Duration = Duration::from_micros(16_667);
const START_MS: f64 = 1_700_000_000_000.0;

fn main() {
    logging::init();

    let config = DashboardConfig {
        core: Config {
            profiling: ProfilingMode::WithWebserver,
            ..Config::default()
        },
        ..DashboardConfig::default()
    };
    if let Some(backend) = config.core.profiling.backend() {
        init_profiling(backend);
    }

    let clock = Rc::new(ManualClock::new(START_MS));
    let mut rng = StdRng::seed_from_u64(42);
    let raw = generate_initial_dataset(config.data_count, START_MS, &mut rng);
    let mut dashboard: Dashboard<BitmapSurface> =
        Dashboard::new(config, clock.clone(), raw, SyntheticGenerator::from_seed(7));

    let size = LogicalSize::new(800.0, 400.0);
    let charts: Vec<ChartId> = ChartKind::ALL
        .into_iter()
        .map(|kind| {
            let config = ChartConfig::new(kind).with_decorations(Decorations::full());
            dashboard.add_chart(BitmapSurface::new(PhysicalSize::default()), config, size, 1.0)
        })
        .collect();

    let mut painted = 0;
    for frame in 0..600 {
        match frame {
            120 => {
                dashboard.toggle_streaming();
                tracing::info!("Streaming on");
            }
            300 => {
                dashboard.resize_chart(charts[0], LogicalSize::new(1024.0, 512.0));
                dashboard.set_pixel_ratio(2.0);
            }
            420 => {
                dashboard.set_aggregation(AggregationPeriod::FiveMinutes);
                tracing::info!("Aggregation: {}", AggregationPeriod::FiveMinutes);
            }
            _ => {}
        }

        clock.advance(FRAME);
        new_frame();
        painted += dashboard.run_frame().charts_painted;

        if frame % 60 == 59 {
            dashboard.scroll_table((frame as f32) * 40.0);
        }
    }

    let metrics = dashboard.metrics();
    tracing::info!(
        "{} chart paints, {} points on screen, {:.1} fps, {} drops, {:.1} MB",
        painted,
        dashboard.display_points().len(),
        metrics.fps,
        metrics.frame_drops,
        metrics.memory_usage_mb
    );

    for chart in dashboard.charts() {
        let backing = chart.surface().backing_size();
        tracing::info!(
            "{} chart: {}x{} backing, {} frames",
            chart.kind(),
            backing.width,
            backing.height,
            chart.frames_painted()
        );
    }
}
