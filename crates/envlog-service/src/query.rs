//! Read views over stored readings: latest value and chart history.

use std::sync::Arc;

use tracing::debug;

use envlog_store::Store;
use envlog_types::{DEFAULT_BLOCK_SIZE, Series, StoredSample, downsample};

use crate::error::Result;

/// Number of most recent rows the history view reads per source.
///
/// At one reading every 15 seconds this is the last 24 hours.
pub const DEFAULT_HISTORY_WINDOW: u32 = 5760;

/// Latest-value and history queries for a source.
pub struct ReadingQueries {
    store: Arc<Store>,
    window: u32,
}

impl ReadingQueries {
    /// Create queries that read [`DEFAULT_HISTORY_WINDOW`] rows for history.
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_window(store, DEFAULT_HISTORY_WINDOW)
    }

    /// Create queries with a custom history window.
    pub fn with_window(store: Arc<Store>, window: u32) -> Self {
        Self { store, window }
    }

    /// The history window in rows.
    pub fn window(&self) -> u32 {
        self.window
    }

    /// Most recent temperature for `source`.
    ///
    /// Returns [`envlog_store::NO_DATA`] (`0.0`) when the source has never
    /// reported. Callers must treat that as "no data", not as a reading.
    pub fn latest(&self, source: &str) -> Result<f64> {
        Ok(self.store.query_latest(source)?)
    }

    /// Most recent full sample for `source`, or `None` if it never reported.
    pub fn latest_sample(&self, source: &str) -> Result<Option<StoredSample>> {
        Ok(self.store.latest_sample(source)?)
    }

    /// Downsampled recent temperatures for `source`.
    ///
    /// Reads up to the window's worth of rows newest first and averages them
    /// in blocks of [`DEFAULT_BLOCK_SIZE`], so the result is
    /// newest-block-first. An unknown source yields an empty series.
    pub fn history(&self, source: &str) -> Result<Series> {
        let raw = self.store.query_recent(source, self.window)?;
        let series = downsample(&raw, DEFAULT_BLOCK_SIZE);

        debug!(
            "History for {}: {} rows -> {} points",
            source,
            raw.len(),
            series.len()
        );
        Ok(series)
    }

    /// Every source that has reported, most recently active first.
    pub fn sources(&self) -> Result<Vec<String>> {
        Ok(self.store.list_sources()?)
    }
}
