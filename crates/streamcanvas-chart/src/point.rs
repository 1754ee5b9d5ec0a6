//! Time-series samples and their metadata.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A tagged metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(Arc<str>),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int(v) => write!(f, "{}", v),
            MetaValue::Float(v) => write!(f, "{}", v),
            MetaValue::Bool(v) => write!(f, "{}", v),
            MetaValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(Arc::from(v))
    }
}

/// Free-form, insertion-ordered key/value annotations on a point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    entries: IndexMap<Arc<str>, MetaValue>,
}

impl Metadata {
    pub const COUNT: &'static str = "count";
    pub const AGGREGATED: &'static str = "aggregated";

    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata attached to a bucket produced by aggregation.
    pub fn aggregated(count: usize) -> Self {
        Self::new()
            .with(Self::COUNT, MetaValue::Int(count as i64))
            .with(Self::AGGREGATED, true)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.entries.insert(Arc::from(key), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Number of raw samples folded into this point, if it is a bucket.
    pub fn count(&self) -> Option<u64> {
        match self.get(Self::COUNT)? {
            MetaValue::Int(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self.get(Self::AGGREGATED), Some(MetaValue::Bool(true)))
    }
}

/// One time-series sample.
///
/// `time` is epoch milliseconds. Points with a non-finite time or value are
/// kept in buffers but skipped by bounds and drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub time: f64,
    pub value: f64,
    pub category: Option<Arc<str>>,
    pub metadata: Option<Arc<Metadata>>,
}

impl Point {
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            category: None,
            metadata: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<Arc<str>>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(Arc::new(metadata));
        self
    }

    /// Build a point from an RFC 3339 timestamp string.
    pub fn at_timestamp(timestamp: &str, value: f64) -> Self {
        Self::new(Self::parse_time(timestamp), value)
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Both coordinates are finite and the point can be drawn.
    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.value.is_finite()
    }

    /// Parse an RFC 3339 timestamp into epoch milliseconds.
    ///
    /// Unparseable input yields NaN, which the finiteness filter then drops.
    pub fn parse_time(timestamp: &str) -> f64 {
        match chrono::DateTime::parse_from_rfc3339(timestamp.trim()) {
            Ok(dt) => dt.timestamp_millis() as f64,
            Err(_) => f64::NAN,
        }
    }
}
