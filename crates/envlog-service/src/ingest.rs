//! Ingestion of submitted readings.

use std::sync::Arc;

use tracing::debug;

use envlog_store::Store;
use envlog_types::{Reading, StoredSample};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;

/// Parses, timestamps, and stores incoming readings.
///
/// The only validation is structural: a payload that parses into a
/// [`Reading`] is stored as received, apart from the 2-decimal rounding the
/// store applies. Any `time` the client sends is discarded in favor of the
/// server clock.
pub struct Ingestor {
    store: Arc<Store>,
    clock: Arc<dyn Clock>,
}

impl Ingestor {
    /// Create an ingestor that stamps readings with the system clock.
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create an ingestor with a custom clock.
    pub fn with_clock(store: Arc<Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Parse a JSON payload and store it.
    ///
    /// Returns the sample as persisted, including its row id and timestamp.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidInput`](crate::ServiceError::InvalidInput) if the payload
    ///   is not a valid reading
    /// - [`ServiceError::StorageFailure`](crate::ServiceError::StorageFailure) if the
    ///   insert fails
    pub fn ingest(&self, raw: &[u8]) -> Result<StoredSample> {
        let reading = Reading::from_json(raw)?;
        self.ingest_reading(reading)
    }

    /// Timestamp and store an already-parsed reading.
    pub fn ingest_reading(&self, reading: Reading) -> Result<StoredSample> {
        let time = self.clock.now_unix();
        let sample = reading.into_sample(time);
        let id = self.store.insert(&sample)?;
        let sample = StoredSample { id, ..sample.rounded() };

        debug!(
            "Ingested reading {} from {} at {}",
            sample.id, sample.source, sample.time
        );
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::ServiceError;

    fn ingestor(start: i64) -> (Ingestor, Arc<Store>, Arc<ManualClock>) {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let clock = Arc::new(ManualClock::new(start));
        let ingestor = Ingestor::with_clock(Arc::clone(&store), clock.clone());
        (ingestor, store, clock)
    }

    #[test]
    fn test_ingest_valid_payload() {
        let (ingestor, store, _) = ingestor(1_700_000_000);

        let sample = ingestor
            .ingest(br#"{"name":"office","temp":71.5,"humidity":40.25,"pressure":1012.5}"#)
            .unwrap();

        assert_eq!(sample.id, 1);
        assert_eq!(sample.source, "office");
        assert_eq!(sample.time, 1_700_000_000);
        assert_eq!(store.query_recent("office", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_ingest_overwrites_client_time() {
        let (ingestor, store, _) = ingestor(500);

        let sample = ingestor
            .ingest(br#"{"name":"office","temp":1,"humidity":1,"pressure":1,"time":42}"#)
            .unwrap();

        assert_eq!(sample.time, 500);
        let stored = store.latest_sample("office").unwrap().unwrap();
        assert_eq!(stored.time, 500);
    }

    #[test]
    fn test_ingest_rounds_values() {
        let (ingestor, store, _) = ingestor(1);

        let sample = ingestor
            .ingest(br#"{"name":"office","temp":21.456,"humidity":50.004,"pressure":999.999}"#)
            .unwrap();

        assert_eq!(sample.temperature, 21.46);
        assert_eq!(sample.humidity, 50.0);
        assert_eq!(sample.pressure, 1000.0);
        assert_eq!(store.query_latest("office").unwrap(), 21.46);
    }

    #[test]
    fn test_ingest_returns_what_was_stored() {
        let (ingestor, store, _) = ingestor(42);

        let sample = ingestor
            .ingest_reading(Reading::new("office", 21.456, 33.335, 1013.254))
            .unwrap();

        let stored = store.latest_sample("office").unwrap().unwrap();
        assert_eq!(sample, stored);
    }

    #[test]
    fn test_ingest_huge_value_stays_finite() {
        let (ingestor, store, _) = ingestor(1);

        let sample = ingestor
            .ingest(br#"{"name":"office","temp":1e307,"humidity":1,"pressure":1}"#)
            .unwrap();

        assert_eq!(sample.temperature, 1e307);
        assert_eq!(store.query_latest("office").unwrap(), 1e307);
    }

    #[test]
    fn test_ingest_stores_out_of_range_values() {
        let (ingestor, store, _) = ingestor(1);

        ingestor
            .ingest_reading(Reading::new("freezer", -400.0, 250.0, -1.0))
            .unwrap();

        assert_eq!(store.query_latest("freezer").unwrap(), -400.0);
    }

    #[test]
    fn test_ingest_invalid_payload() {
        let (ingestor, store, _) = ingestor(1);

        let payloads: [&[u8]; 4] = [
            b"{ invalid json }",
            br#"{"name":"office"}"#,
            br#"{"name":7,"temp":1,"humidity":1,"pressure":1}"#,
            b"[1, 2, 3]",
        ];
        for payload in payloads {
            let err = ingestor.ingest(payload).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)), "{err}");
        }

        assert!(store.list_sources().unwrap().is_empty());
    }

    #[test]
    fn test_ingest_uses_clock_per_call() {
        let (ingestor, store, clock) = ingestor(100);

        ingestor.ingest_reading(Reading::new("office", 1.0, 1.0, 1.0)).unwrap();
        clock.advance(15);
        ingestor.ingest_reading(Reading::new("office", 2.0, 1.0, 1.0)).unwrap();

        let series = store.query_recent("office", 10).unwrap();
        assert_eq!(series.times, vec![115, 100]);
    }
}
