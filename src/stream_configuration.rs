//! Configuration types for lazy stream pipelines

use serde::{Deserialize, Serialize};

use crate::error::StreamResult;

/// Buffer configuration for collecting terminals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Capacity reserved up front by `to_list`
    pub initial_capacity: usize,
    /// Fail with `CapacityExceeded` instead of growing past this many items
    pub max_items: Option<usize>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            max_items: None,
        }
    }
}

/// Per-pipeline settings, inherited by every stage derived from a stream
///
/// # Examples
/// ```
/// use lazy_stream::StreamConfig;
///
/// let config = StreamConfig::from_json(r#"{ "name": "orders", "collect": { "max_items": 500 } }"#).unwrap();
/// assert_eq!(config.name, "orders");
/// assert_eq!(config.collect.max_items, Some(500));
/// assert!(!config.trace_pulls);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Label used in log lines
    pub name: String,
    /// Log every pulled element at trace level
    pub trace_pulls: bool,
    pub collect: BufferConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            name: "stream".to_string(),
            trace_pulls: false,
            collect: BufferConfig::default(),
        }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> StreamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> StreamResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set the name used in log lines
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable per-element trace logging
    pub fn trace_pulls(mut self, enabled: bool) -> Self {
        self.trace_pulls = enabled;
        self
    }

    /// Set the capacity `to_list` reserves before draining
    pub fn collect_capacity(mut self, capacity: usize) -> Self {
        self.collect.initial_capacity = capacity;
        self
    }

    /// Bound the number of items a collecting terminal may accumulate
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.collect.max_items = Some(max_items);
        self
    }
}
