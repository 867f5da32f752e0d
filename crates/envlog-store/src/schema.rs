//! Database schema and migrations.

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// Safe to call on every startup: an up-to-date database is left untouched.
pub fn initialize(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if version < SCHEMA_VERSION {
        migrate(conn, version)?;
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
///
/// The `temps` table predates the version table in existing deployments,
/// so every statement is `IF NOT EXISTS`.
fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- One row per submitted reading
        CREATE TABLE IF NOT EXISTS temps (
            name TEXT NOT NULL,
            time INTEGER NOT NULL,
            humidity REAL NOT NULL,
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pressure REAL NOT NULL,
            temp REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_temps_name_time
            ON temps(name, time);
        "#,
    )?;

    Ok(())
}

/// Run migrations from old_version to current.
fn migrate(conn: &Connection, old_version: i32) -> Result<()> {
    // Add future migrations here
    // if old_version < 2 { migrate_to_v2(conn)?; }

    let _ = old_version;
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_initialize_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"temps".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_schema_version_tracking() {
        let conn = Connection::open_in_memory().unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO temps (name, time, humidity, pressure, temp) VALUES ('a', 1, 2, 3, 4)",
            [],
        )
        .unwrap();

        initialize(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM temps", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_adopts_legacy_table() {
        // A database created before version tracking existed
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE temps (
                name VARCHAR(255) NOT NULL,
                time BIGINT NOT NULL,
                humidity FLOAT NOT NULL,
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                pressure FLOAT NOT NULL,
                temp FLOAT NOT NULL
            );
            INSERT INTO temps (name, time, humidity, pressure, temp) VALUES ('office', 5, 1, 1, 70.5);",
        )
        .unwrap();

        initialize(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        let temp: f64 = conn
            .query_row("SELECT temp FROM temps WHERE name = 'office'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(temp, 70.5);
    }

    #[test]
    fn test_not_null_columns() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO temps (name, time, humidity, pressure, temp) VALUES ('a', 1, NULL, 3, 4)",
            [],
        );
        assert!(result.is_err());
    }
}
