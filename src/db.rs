//! SQLite-backed persistence for the saved workspace key.
//!
//! The dashboard persists exactly one value. It lives in a `metadata`
//! key-value table so the file can grow other settings without a migration.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::models::Credential;

const WORKSPACE_KEY: &str = "workspace_key";

/// Metadata value with optional timestamp
#[derive(Debug, Clone)]
pub struct MetadataEntry {
    pub value: String,
    pub updated_at: Option<i64>,
}

/// Default database path: `~/.tokescope/dashboard.db`
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = directories::BaseDirs::new().context("Failed to find home directory")?;
    Ok(base_dirs.home_dir().join(".tokescope").join("dashboard.db"))
}

/// Handle on the credential database. Connections are short-lived.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Open the store at `path`, or at the default location when `None`.
    ///
    /// Creates the parent directory and schema on first use.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => default_db_path()?,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let store = CredentialStore { path };
        store.connect()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last saved credential, if any
    pub fn load(&self) -> Result<Option<Credential>> {
        let conn = self.connect()?;
        Ok(get_metadata(&conn, WORKSPACE_KEY)?.map(|e| Credential::new(e.value)))
    }

    pub fn save(&self, credential: &Credential) -> Result<()> {
        let conn = self.connect()?;
        set_metadata(&conn, WORKSPACE_KEY, credential.as_str())
    }

    /// Open a connection with WAL mode, retrying briefly on "database locked"
    fn connect(&self) -> Result<Connection> {
        let mut attempts = 0;
        let max_attempts = 3;

        loop {
            match Connection::open(&self.path) {
                Ok(conn) => {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                    conn.pragma_update(None, "busy_timeout", 5000)?;
                    init_schema(&conn)?;
                    return Ok(conn);
                }
                Err(e) if e.to_string().contains("locked") && attempts < max_attempts => {
                    attempts += 1;
                    thread::sleep(Duration::from_millis(100 * attempts));
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("open {}", self.path.display()));
                }
            }
        }
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER
        );
        INSERT OR IGNORE INTO metadata (key, value) VALUES ('schema_version', '1');",
    )?;
    Ok(())
}

/// Fetch metadata value and optional timestamp
pub fn get_metadata(conn: &Connection, key: &str) -> Result<Option<MetadataEntry>> {
    let mut stmt = conn.prepare("SELECT value, updated_at FROM metadata WHERE key = ?1")?;
    let result = stmt
        .query_row(params![key], |row| {
            let value: String = row.get(0)?;
            let updated_at: Option<i64> = row.get::<_, Option<i64>>(1).unwrap_or(None);
            Ok(MetadataEntry { value, updated_at })
        })
        .optional()?;
    Ok(result)
}

/// Set metadata value with current timestamp
pub fn set_metadata(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = Utc::now().timestamp();
    conn.execute(
        "INSERT INTO metadata (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )?;
    Ok(())
}
