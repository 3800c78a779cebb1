//! SQLite implementation of [`ExamStore`].

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::instrument;

use ripple_core::error::StoreError;
use ripple_core::model::ExamDocument;
use ripple_core::traits::ExamStore;

const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS exams (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at_us INTEGER NOT NULL,
    write_seq     INTEGER NOT NULL,
    body          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS exams_by_updated_at
    ON exams (updated_at_us DESC, write_seq DESC);
";

/// Exam documents keyed by id, one JSON body per row.
///
/// `updated_at_us` backs the listing order; `write_seq` breaks ties between
/// saves stamped in the same microsecond.
#[derive(Clone)]
pub struct SqliteExamStore {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl SqliteExamStore {
    /// Open (creating if needed) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let location = path.display().to_string();
        let opened = {
            let loc = location.clone();
            tokio::task::spawn_blocking(move || -> Result<Connection, StoreError> {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| StoreError::unavailable(&loc, e))?;
                }
                let conn =
                    Connection::open(&path).map_err(|e| StoreError::unavailable(&loc, e))?;
                install_schema(&conn).map_err(|e| StoreError::unavailable(&loc, e))?;
                Ok(conn)
            })
            .await
            .map_err(|e| StoreError::unavailable(&location, e))??
        };
        tracing::debug!(location = %location, "exam store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(opened)),
            location,
        })
    }

    /// A private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::unavailable(":memory:", e))?;
        install_schema(&conn).map_err(|e| StoreError::unavailable(":memory:", e))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: ":memory:".to_string(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("store task failed: {e}")))?
    }
}

fn install_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(SCHEMA)?;
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    Ok(())
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn decode(id: &str, body: &str) -> Result<ExamDocument, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::CorruptRecord {
        id: id.to_string(),
        message: e.to_string(),
    })
}

/// A stamp strictly after `previous`, at microsecond precision.
fn next_stamp(previous: Option<i64>) -> i64 {
    let now = Utc::now().timestamp_micros();
    match previous {
        Some(prev) if now <= prev => prev + 1,
        _ => now,
    }
}

#[async_trait]
impl ExamStore for SqliteExamStore {
    #[instrument(skip(self, doc), fields(id = %doc.id))]
    async fn save(&self, doc: &ExamDocument) -> Result<ExamDocument, StoreError> {
        let mut stamped = doc.clone();
        let saved = self
            .with_conn(move |conn| {
                let tx = conn.transaction().map_err(backend)?;

                let stored: Option<i64> = tx
                    .query_row(
                        "SELECT updated_at_us FROM exams WHERE id = ?1",
                        params![stamped.id],
                        |row| row.get(0),
                    )
                    .optional()
                    .map_err(backend)?;
                let carried = stamped.updated_at.map(|t| t.timestamp_micros());
                let updated_us = next_stamp(stored.max(carried));
                let updated_at = DateTime::<Utc>::from_timestamp_micros(updated_us)
                    .ok_or_else(|| StoreError::Backend(format!("timestamp out of range: {updated_us}")))?;

                stamped.updated_at = Some(updated_at);
                let created_at = *stamped.created_at.get_or_insert(updated_at);

                let write_seq: i64 = tx
                    .query_row("SELECT COALESCE(MAX(write_seq), 0) + 1 FROM exams", [], |row| {
                        row.get(0)
                    })
                    .map_err(backend)?;
                let body = serde_json::to_string(&stamped)
                    .map_err(|e| StoreError::Backend(format!("failed to encode exam: {e}")))?;

                tx.execute(
                    "INSERT INTO exams (id, created_at, updated_at_us, write_seq, body)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                         created_at = excluded.created_at,
                         updated_at_us = excluded.updated_at_us,
                         write_seq = excluded.write_seq,
                         body = excluded.body",
                    params![
                        stamped.id,
                        created_at.to_rfc3339(),
                        updated_us,
                        write_seq,
                        body
                    ],
                )
                .map_err(backend)?;
                tx.commit().map_err(backend)?;
                Ok(stamped)
            })
            .await?;
        tracing::debug!(items = saved.items.len(), "exam saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<ExamDocument>, StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let body: Option<String> = conn
                .query_row("SELECT body FROM exams WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(backend)?;
            body.map(|body| decode(&id, &body)).transpose()
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ExamDocument>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, body FROM exams ORDER BY updated_at_us DESC, write_seq DESC")
                .map_err(backend)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
                .map_err(backend)?;

            let mut docs = Vec::new();
            for row in rows {
                let (id, body) = row.map_err(backend)?;
                docs.push(decode(&id, &body)?);
            }
            Ok(docs)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let removed = conn
                .execute("DELETE FROM exams WHERE id = ?1", params![id])
                .map_err(backend)?;
            tracing::debug!(removed, "exam delete");
            Ok(())
        })
        .await
    }
}
