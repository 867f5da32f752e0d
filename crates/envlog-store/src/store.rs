//! Main store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info};

use envlog_types::{Series, StoredSample};

use crate::error::{Error, Result};
use crate::schema;

/// Value returned by [`Store::query_latest`] when a source has no rows.
///
/// This is indistinguishable from a real reading of zero; use
/// [`Store::latest_sample`] when the difference matters.
pub const NO_DATA: f64 = 0.0;

/// SQLite-based store for envlog readings.
///
/// The connection sits behind a mutex, so a single `Store` can be shared
/// (e.g. in an `Arc`) by any number of callers. Each insert is a single-row
/// append; concurrent writers are serialized by the lock and never need to
/// coordinate with each other.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL lets readers proceed while a write is in flight
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::ConnectionPoisoned)
    }
}

fn sample_from_row(row: &Row<'_>) -> rusqlite::Result<StoredSample> {
    Ok(StoredSample {
        id: row.get(0)?,
        source: row.get(1)?,
        temperature: row.get(2)?,
        humidity: row.get(3)?,
        pressure: row.get(4)?,
        time: row.get(5)?,
    })
}

// Write operations
impl Store {
    /// Append a sample and return its assigned row id.
    ///
    /// Temperature, humidity, and pressure are rounded to 2 decimal places
    /// before they are written. `sample.id` is ignored. Existing rows are
    /// never updated or deleted.
    pub fn insert(&self, sample: &StoredSample) -> Result<i64> {
        let sample = sample.rounded();
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO temps (name, time, humidity, pressure, temp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                sample.source,
                sample.time,
                sample.humidity,
                sample.pressure,
                sample.temperature,
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!("Inserted sample {} for {} at {}", id, sample.source, sample.time);
        Ok(id)
    }
}

// Read operations
impl Store {
    /// Get up to `limit` of the most recent temperatures for a source.
    ///
    /// Points are ordered newest first. A source with no rows yields an
    /// empty series.
    pub fn query_recent(&self, source: &str, limit: u32) -> Result<Series> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT temp, time FROM temps WHERE name = ?1
             ORDER BY time DESC, id DESC LIMIT ?2",
        )?;

        let series = stmt
            .query_map(rusqlite::params![source, limit], |row| {
                Ok((row.get::<_, f64>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Series, _>>()?;

        debug!("Read {} recent samples for {}", series.len(), source);
        Ok(series)
    }

    /// Get the most recent temperature for a source, or [`NO_DATA`].
    pub fn query_latest(&self, source: &str) -> Result<f64> {
        let conn = self.conn()?;
        let temp = conn
            .query_row(
                "SELECT temp FROM temps WHERE name = ?1 ORDER BY time DESC, id DESC LIMIT 1",
                [source],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;

        Ok(temp.unwrap_or(NO_DATA))
    }

    /// Get the most recent full sample for a source.
    ///
    /// Unlike [`Store::query_latest`], a source with no rows yields `None`.
    pub fn latest_sample(&self, source: &str) -> Result<Option<StoredSample>> {
        let conn = self.conn()?;
        let sample = conn
            .query_row(
                "SELECT id, name, temp, humidity, pressure, time FROM temps
                 WHERE name = ?1 ORDER BY time DESC, id DESC LIMIT 1",
                [source],
                sample_from_row,
            )
            .optional()?;

        Ok(sample)
    }

    /// List every source that has reported, most recently active first.
    pub fn list_sources(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT name FROM temps GROUP BY name ORDER BY MAX(time) DESC, name")?;

        let sources = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(sources)
    }
}
