//! streamcanvas core
//!
//! Shared plumbing for the streamcanvas crates: hashed collections, logging,
//! profiling scopes, top-level configuration and the clock abstraction used by
//! the stream and frame timing code.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;
pub mod time;

pub use config::Config;
pub use time::{Clock, ManualClock, SystemClock};
