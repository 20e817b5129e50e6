//! SQLite credential log.
//!
//! Every save inserts a new row; rows are never updated or deleted. Reads
//! only ever look at the row with the highest `id`, so the table behaves as
//! a single value whose history is kept.

use rusqlite::{params, Connection, OptionalExtension};

use super::errors::AgentError;
use super::types::{CredentialRecord, Credentials};

// ─── Database ───────────────────────────────────────────────────────────────

/// SQLite handle for the `credentials` table.
pub struct CredentialDatabase {
    conn: Connection,
}

impl CredentialDatabase {
    /// Open (or create) the credential database at the given path.
    ///
    /// Pass `":memory:"` for an in-memory database (tests).
    pub fn open(path: &str) -> Result<Self, AgentError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Create the `credentials` table if it doesn't exist. Idempotent.
    pub fn init(&self) -> Result<(), AgentError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS credentials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                api_key TEXT,
                deployment_url TEXT
            );
            ",
        )?;
        Ok(())
    }

    /// The most recently saved credentials, or `None` when the table is empty.
    pub fn get_latest(&self) -> Result<Option<Credentials>, AgentError> {
        let result = self
            .conn
            .query_row(
                "SELECT api_key, deployment_url FROM credentials ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(Credentials {
                        api_key: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        deployment_url: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// Append a credential row. Contents are stored unvalidated.
    pub fn save(&self, credentials: &Credentials) -> Result<i64, AgentError> {
        self.conn.execute(
            "INSERT INTO credentials (api_key, deployment_url) VALUES (?1, ?2)",
            params![credentials.api_key, credentials.deployment_url],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, deployment_url = %credentials.deployment_url, "credentials saved");
        Ok(id)
    }

    /// Stored rows, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<CredentialRecord>, AgentError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, api_key, deployment_url FROM credentials
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(CredentialRecord {
                id: row.get(0)?,
                credentials: Credentials {
                    api_key: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    deployment_url: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                },
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
