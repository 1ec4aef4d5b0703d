//! Serializable point-in-time captures of a counter set.
//!
//! While the terminal renderer is the primary consumer of counter values,
//! it is often useful to persist or ship a capture elsewhere (a progress
//! file, an HTTP status endpoint). This module provides serde-serializable
//! snapshot types for that.
//!
//! # Feature Flag
//!
//! Requires the `serde` feature; the `json` feature additionally pulls in
//! `serde_json`:
//!
//! ```toml
//! [dependencies]
//! progresso = { version = "0.3", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use progresso::{Progress, ProgressSnapshot};
//!
//! let progress = Progress::new();
//! progress.inc("done", 42);
//!
//! let snapshot = ProgressSnapshot::capture(&progress);
//! let json = serde_json::to_string(&snapshot)?;
//! ```

use crate::progress::Progress;
use serde::{Deserialize, Serialize};

/// A capture of a single counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// The counter's name.
    pub name: String,
    /// The counter's value at capture time.
    pub value: i64,
}

impl CounterSnapshot {
    /// Creates a snapshot of a single counter.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A capture of a whole counter set, in ascending lexicographic name order.
///
/// The key set reflects one store version; each value was read atomically
/// when its entry was visited (the same weak-consistency contract as
/// [`Progress::iter`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Optional capture timestamp in milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// The captured counters, sorted by name.
    pub counters: Vec<CounterSnapshot>,
}

impl ProgressSnapshot {
    /// Captures all counters of `progress`.
    pub fn capture(progress: &Progress) -> Self {
        Self {
            timestamp_ms: None,
            counters: progress
                .iter()
                .map(|(name, value)| CounterSnapshot::new(&*name, value))
                .collect(),
        }
    }

    /// Captures all counters of `progress` with a timestamp.
    pub fn capture_with_timestamp(progress: &Progress, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            ..Self::capture(progress)
        }
    }

    /// Finds a captured counter by name.
    pub fn get(&self, name: &str) -> Option<&CounterSnapshot> {
        self.counters
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
            .map(|pos| &self.counters[pos])
    }
}
