//! Ingestion service and HTTP API for environmental sensor readings.
//!
//! This crate provides a service that:
//! - Accepts JSON readings posted by sensors and stamps them with server time
//! - Stores readings in a local SQLite database
//! - Serves the latest temperature per source
//! - Serves a downsampled temperature history for charting
//!
//! # REST API Endpoints
//!
//! - `POST /posttemp` - Submit a reading
//! - `GET /temp` - Latest temperature for the default source
//! - `GET /{source}/temp` - Latest temperature for a source
//! - `GET /{source}/latest` - Latest full sample as JSON (404 if none)
//! - `GET /{source}/getHist` - Downsampled history (`{"Temps": [...], "Times": [...]}`)
//! - `GET /ping` - Reachability check
//! - `GET /api/health` - Service health check
//! - `GET /api/sources` - Sources that have reported
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/envlog/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8081"
//! default_source = "office"
//!
//! [storage]
//! path = "~/.local/share/envlog/data.db"
//!
//! [history]
//! window = 5760
//! ```
//!
//! # Library use
//!
//! The ingestion and query services work without the HTTP layer:
//!
//! ```
//! use std::sync::Arc;
//! use envlog_service::{Ingestor, ReadingQueries};
//! use envlog_store::Store;
//!
//! let store = Arc::new(Store::open_in_memory().unwrap());
//! let ingestor = Ingestor::new(Arc::clone(&store));
//! let queries = ReadingQueries::new(store);
//!
//! ingestor
//!     .ingest(br#"{"name":"office","temp":71.5,"humidity":40,"pressure":1012}"#)
//!     .unwrap();
//! assert_eq!(queries.latest("office").unwrap(), 71.5);
//! ```

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod ingest;
pub mod query;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    Config, ConfigError, HistoryConfig, ServerConfig, StorageConfig, ValidationError,
};
pub use error::{Result, ServiceError};
pub use ingest::Ingestor;
pub use query::{DEFAULT_HISTORY_WINDOW, ReadingQueries};
pub use state::AppState;
