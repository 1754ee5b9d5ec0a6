//! Collection types used throughout streamcanvas.
//!
//! Re-exports hash collections backed by AHash, which is noticeably faster than
//! SipHash for the small integer and string keys used by palettes and buckets.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet};
