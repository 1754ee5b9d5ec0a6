//! streamcanvas UI support
//!
//! Headless pieces of the dashboard's user interface:
//! - [`virtual_list`]: windowed rendering of long tables
//! - [`frame_monitor`]: FPS, dropped frames and scoped timings for the render loop

pub mod frame_monitor;
pub mod virtual_list;

pub use frame_monitor::{FrameMetrics, FrameMonitor, MonitorConfig, TimedScope};
pub use virtual_list::{
    VirtualItem, VirtualList, VirtualListConfig, VirtualRange, compute_virtual_range,
};
