//! Application state shared across handlers.
//!
//! The store is opened once at startup and handed to the ingestion and
//! query services as an `Arc`; handlers never reach for a global.

use std::sync::Arc;

use envlog_store::Store;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::ingest::Ingestor;
use crate::query::ReadingQueries;

/// Shared application state.
pub struct AppState {
    /// Write path.
    pub ingestor: Ingestor,
    /// Read paths.
    pub queries: ReadingQueries,
    /// Configuration, fixed for the life of the process.
    pub config: Config,
}

impl AppState {
    /// Create application state around an open store.
    pub fn new(store: Store, config: Config) -> Arc<Self> {
        Self::with_clock(Arc::new(store), config, Arc::new(SystemClock))
    }

    /// Create application state with a custom clock for ingestion timestamps.
    pub fn with_clock(store: Arc<Store>, config: Config, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            ingestor: Ingestor::with_clock(Arc::clone(&store), clock),
            queries: ReadingQueries::with_window(store, config.history.window),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::HistoryConfig;

    #[test]
    fn test_app_state_new() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store, Config::default());

        assert_eq!(state.config.server.default_source, "office");
        assert_eq!(state.queries.window(), 5760);
    }

    #[test]
    fn test_app_state_uses_configured_window() {
        let config = Config {
            history: HistoryConfig { window: 16 },
            ..Default::default()
        };
        let state = AppState::new(Store::open_in_memory().unwrap(), config);
        assert_eq!(state.queries.window(), 16);
    }

    #[test]
    fn test_app_state_shares_one_store() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let state = AppState::with_clock(
            Arc::clone(&store),
            Config::default(),
            Arc::new(ManualClock::new(60)),
        );

        state
            .ingestor
            .ingest(br#"{"name":"office","temp":70.25,"humidity":1,"pressure":1}"#)
            .unwrap();

        assert_eq!(state.queries.latest("office").unwrap(), 70.25);
        assert_eq!(store.list_sources().unwrap(), vec!["office"]);
    }
}
