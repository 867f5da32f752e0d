//! Platform-agnostic types for envlog environmental sensor data.
//!
//! This crate provides the data model shared by the store and the service,
//! along with the pure downsampling engine used by the history view.
//!
//! # Features
//!
//! - [`Reading`]: a submitted measurement, parsed from the sensor's JSON payload
//! - [`StoredSample`]: a persisted, server-timestamped reading
//! - [`Series`]: paired values and timestamps for charting
//! - [`downsample`]: fixed-block averaging of a series
//!
//! # Example
//!
//! ```
//! use envlog_types::{Series, downsample, DEFAULT_BLOCK_SIZE};
//!
//! let raw: Series = (0..8).map(|i| (20.0 + i as f64, 1_700_000_000 - i * 15)).collect();
//! let chart = downsample(&raw, DEFAULT_BLOCK_SIZE);
//! assert_eq!(chart.len(), 2);
//! ```

pub mod downsample;
pub mod error;
pub mod types;

pub use downsample::{DEFAULT_BLOCK_SIZE, downsample};
pub use error::{ParseError, ParseResult};
pub use types::{Reading, Series, StoredSample, round_hundredths};
