//! Local data persistence for envlog sensor readings.
//!
//! This crate provides SQLite-based storage for submitted readings: an
//! append-only `temps` table keyed by source name and time, with insert and
//! range-query primitives.
//!
//! # Features
//!
//! - Append readings with 2-decimal rounding applied at the storage layer
//! - Read the most recent N temperatures for a source, newest first
//! - Read the latest temperature for a source
//! - Read the latest full sample for a source, or `None` if it never reported
//! - List the sources that have reported
//!
//! # Example
//!
//! ```no_run
//! use envlog_store::Store;
//! use envlog_types::Reading;
//!
//! let store = Store::open_default()?;
//!
//! store.insert(&Reading::new("office", 71.456, 40.0, 1012.0).into_sample(1_700_000_000))?;
//! assert_eq!(store.query_latest("office")?, 71.46);
//!
//! let recent = store.query_recent("office", 100)?;
//! # Ok::<(), envlog_store::Error>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use store::{NO_DATA, Store};

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/envlog/data.db`
/// - macOS: `~/Library/Application Support/envlog/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\envlog\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("envlog")
        .join("data.db")
}
