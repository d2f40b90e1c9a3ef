//! SQLite message store: one row per distinct message content.
//!
//! Deduplication is enforced at the storage boundary with a `UNIQUE`
//! constraint on `content` plus `INSERT ... ON CONFLICT DO NOTHING` — a
//! single atomic insert-if-absent, never an application-level
//! check-then-insert, so concurrent identical submissions cannot create
//! duplicate rows.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use fraudlens_core::{AnalysisRecord, Label, PredictorRole, Verdict};

use crate::StoreError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    content             TEXT NOT NULL UNIQUE,
    centroid_label      INTEGER NOT NULL,
    centroid_confidence REAL NOT NULL,
    bayes_label         INTEGER NOT NULL,
    bayes_confidence    REAL NOT NULL,
    logistic_label      INTEGER NOT NULL,
    logistic_confidence REAL NOT NULL,
    verified            INTEGER NOT NULL DEFAULT 0,
    used_for_training   INTEGER NOT NULL DEFAULT 0,
    timestamp           TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_training
    ON messages (verified, used_for_training);
";

const COLUMNS: &str = "id, content, \
    centroid_label, centroid_confidence, \
    bayes_label, bayes_confidence, \
    logistic_label, logistic_confidence, \
    verified, used_for_training, timestamp";

/// SQLite-backed store for analysis records.
///
/// The connection sits behind a mutex so the store is `Sync` for concurrent
/// request handlers; correctness of concurrent identical inserts comes from
/// the `UNIQUE(content)` constraint, not from the lock.
pub struct MessageStore {
    conn: Mutex<Connection>,
}

impl MessageStore {
    /// Open or create a file-backed store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an ephemeral in-memory store (for tests).
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert a record for new content, or return the existing one.
    ///
    /// Predictions are write-once at first sight of a content string: when
    /// the content already exists the `verdicts` argument is discarded and
    /// the original record is returned unchanged, even if the predictors
    /// have since been retrained. Refreshing stale predictions would change
    /// the dedup contract, so the staleness is deliberate and documented.
    pub fn get_or_create(
        &self,
        content: &str,
        verdicts: &[Verdict; 3],
    ) -> Result<AnalysisRecord, StoreError> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let inserted = conn.execute(
            "INSERT INTO messages (content, \
                centroid_label, centroid_confidence, \
                bayes_label, bayes_confidence, \
                logistic_label, logistic_confidence, \
                timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             ON CONFLICT(content) DO NOTHING",
            params![
                content,
                verdicts[0].label.as_i64(),
                verdicts[0].confidence as f64,
                verdicts[1].label.as_i64(),
                verdicts[1].confidence as f64,
                verdicts[2].label.as_i64(),
                verdicts[2].confidence as f64,
                now,
            ],
        )?;
        if inserted > 0 {
            info!(content_len = content.len(), "persisted new analysis record");
        }

        let sql = format!("SELECT {COLUMNS} FROM messages WHERE content = ?1");
        let record = conn.query_row(&sql, [content], record_from_row)??;
        Ok(record)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: i64) -> Result<AnalysisRecord, StoreError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {COLUMNS} FROM messages WHERE id = ?1");
        let record = conn
            .query_row(&sql, [id], record_from_row)
            .optional()?
            .ok_or(StoreError::NotFound(id))??;
        Ok(record)
    }

    /// All records, oldest first.
    pub fn list_all(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {COLUMNS} FROM messages ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], record_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    /// Mark a record as human-verified.
    ///
    /// Idempotent: verifying an already-verified record succeeds without
    /// change. Fails with [`StoreError::NotFound`] for an unknown id.
    pub fn mark_verified(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let updated = conn.execute("UPDATE messages SET verified = 1 WHERE id = ?1", [id])?;
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Records eligible for the next retraining cycle:
    /// verified and not yet consumed.
    pub fn training_candidates(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE verified = 1 AND used_for_training = 0 ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], record_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    /// Mark a set of records as consumed by a completed retraining cycle.
    ///
    /// Only verified records are consumable; a missing or unverified id
    /// fails the call. All updates run in one transaction: either every
    /// record is marked or none is.
    pub fn mark_consumed(&self, ids: &[i64]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for id in ids {
            let updated = tx.execute(
                "UPDATE messages SET used_for_training = 1 \
                 WHERE id = ?1 AND verified = 1",
                [id],
            )?;
            if updated == 0 {
                return Err(StoreError::NotConsumable(*id));
            }
        }
        tx.commit()?;
        info!(count = ids.len(), "marked records consumed for training");
        Ok(())
    }

    /// Execute arbitrary SQL against the store (maintenance escape hatch).
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute_batch(sql)?;
        Ok(())
    }
}

/// Map a `SELECT {COLUMNS}` row to an [`AnalysisRecord`].
///
/// Label and timestamp decoding can fail on corrupt rows, so the mapper
/// returns a nested result: the outer layer is rusqlite's row access, the
/// inner layer is domain validation.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Result<AnalysisRecord, StoreError>> {
    let id: i64 = row.get(0)?;
    let content: String = row.get(1)?;
    let labels = [
        row.get::<_, i64>(2)?,
        row.get::<_, i64>(4)?,
        row.get::<_, i64>(6)?,
    ];
    let confidences = [
        row.get::<_, f64>(3)?,
        row.get::<_, f64>(5)?,
        row.get::<_, f64>(7)?,
    ];
    let verified: bool = row.get(8)?;
    let used_for_training: bool = row.get(9)?;
    let timestamp: String = row.get(10)?;

    Ok(build_record(
        id,
        content,
        labels,
        confidences,
        verified,
        used_for_training,
        &timestamp,
    ))
}

fn build_record(
    id: i64,
    content: String,
    labels: [i64; 3],
    confidences: [f64; 3],
    verified: bool,
    used_for_training: bool,
    timestamp: &str,
) -> Result<AnalysisRecord, StoreError> {
    let roles = PredictorRole::ALL;
    let mut verdicts = [Verdict {
        role: roles[0],
        label: Label::Legit,
        confidence: 0.0,
    }; 3];
    for i in 0..3 {
        verdicts[i] = Verdict {
            role: roles[i],
            label: Label::from_i64(labels[i])?,
            confidence: confidences[i] as f32,
        };
    }
    let timestamp: DateTime<Utc> = timestamp.parse()?;
    Ok(AnalysisRecord {
        id,
        content,
        verdicts,
        verified,
        used_for_training,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdicts(c: f32, b: f32, l: f32) -> [Verdict; 3] {
        [
            Verdict::from_fraud_probability(PredictorRole::Centroid, c),
            Verdict::from_fraud_probability(PredictorRole::Bayes, b),
            Verdict::from_fraud_probability(PredictorRole::Logistic, l),
        ]
    }

    #[test]
    fn create_then_fetch() {
        let store = MessageStore::in_memory().unwrap();
        let rec = store
            .get_or_create("free prize inside", &verdicts(0.9, 0.8, 0.7))
            .unwrap();

        assert_eq!(rec.content, "free prize inside");
        assert!(!rec.verified);
        assert!(!rec.used_for_training);
        assert_eq!(rec.verdict(PredictorRole::Centroid).label, Label::Fraud);

        let fetched = store.get(rec.id).unwrap();
        assert_eq!(fetched.id, rec.id);
        assert_eq!(fetched.timestamp, rec.timestamp);
    }

    #[test]
    fn duplicate_content_returns_original_record() {
        let store = MessageStore::in_memory().unwrap();
        let first = store
            .get_or_create("free prize inside", &verdicts(0.9, 0.8, 0.7))
            .unwrap();
        // Second submission with different verdicts: discarded.
        let second = store
            .get_or_create("free prize inside", &verdicts(0.1, 0.2, 0.3))
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(
            second.verdict(PredictorRole::Centroid).label,
            Label::Fraud,
            "original predictions must not be overwritten"
        );
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = MessageStore::in_memory().unwrap();
        assert!(matches!(store.get(42), Err(StoreError::NotFound(42))));
    }

    #[test]
    fn list_all_in_insertion_order() {
        let store = MessageStore::in_memory().unwrap();
        store.get_or_create("one", &verdicts(0.9, 0.9, 0.9)).unwrap();
        store.get_or_create("two", &verdicts(0.1, 0.1, 0.1)).unwrap();
        store.get_or_create("three", &verdicts(0.5, 0.5, 0.5)).unwrap();

        let all = store.list_all().unwrap();
        let contents: Vec<&str> = all.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn verify_is_idempotent() {
        let store = MessageStore::in_memory().unwrap();
        let rec = store.get_or_create("msg", &verdicts(0.9, 0.9, 0.9)).unwrap();

        store.mark_verified(rec.id).unwrap();
        assert!(store.get(rec.id).unwrap().verified);

        // Second verification: no-op success.
        store.mark_verified(rec.id).unwrap();
        assert!(store.get(rec.id).unwrap().verified);
    }

    #[test]
    fn verify_unknown_id_is_not_found() {
        let store = MessageStore::in_memory().unwrap();
        assert!(matches!(
            store.mark_verified(99),
            Err(StoreError::NotFound(99))
        ));
    }

    #[test]
    fn training_candidates_filters_on_both_flags() {
        let store = MessageStore::in_memory().unwrap();
        let a = store.get_or_create("a", &verdicts(0.9, 0.9, 0.9)).unwrap();
        let b = store.get_or_create("b", &verdicts(0.9, 0.9, 0.9)).unwrap();
        let _c = store.get_or_create("c", &verdicts(0.9, 0.9, 0.9)).unwrap();

        store.mark_verified(a.id).unwrap();
        store.mark_verified(b.id).unwrap();
        store.mark_consumed(&[b.id]).unwrap();

        let candidates = store.training_candidates().unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, a.id);
    }

    #[test]
    fn mark_consumed_is_transactional_over_all_ids() {
        let store = MessageStore::in_memory().unwrap();
        let a = store.get_or_create("a", &verdicts(0.9, 0.9, 0.9)).unwrap();
        let b = store.get_or_create("b", &verdicts(0.9, 0.9, 0.9)).unwrap();
        store.mark_verified(a.id).unwrap();
        store.mark_verified(b.id).unwrap();

        store.mark_consumed(&[a.id, b.id]).unwrap();
        assert!(store.training_candidates().unwrap().is_empty());
        assert!(store.get(a.id).unwrap().used_for_training);
        assert!(store.get(b.id).unwrap().used_for_training);
    }

    #[test]
    fn concurrent_identical_submissions_create_one_record() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MessageStore::in_memory().unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .get_or_create("same message, many submitters", &verdicts(0.9, 0.8, 0.7))
                        .unwrap()
                        .id
                })
            })
            .collect();

        let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn consuming_unverified_record_fails_and_marks_nothing() {
        let store = MessageStore::in_memory().unwrap();
        let a = store.get_or_create("a", &verdicts(0.9, 0.9, 0.9)).unwrap();
        let b = store.get_or_create("b", &verdicts(0.9, 0.9, 0.9)).unwrap();
        store.mark_verified(a.id).unwrap();

        let err = store.mark_consumed(&[a.id, b.id]).unwrap_err();
        assert!(matches!(err, StoreError::NotConsumable(id) if id == b.id));
        // Rolled back: the verified record was not consumed either.
        assert!(!store.get(a.id).unwrap().used_for_training);
    }

    #[test]
    fn consuming_unknown_id_fails() {
        let store = MessageStore::in_memory().unwrap();
        assert!(matches!(
            store.mark_consumed(&[42]),
            Err(StoreError::NotConsumable(42))
        ));
    }

    #[test]
    fn consumption_implies_verified() {
        let store = MessageStore::in_memory().unwrap();
        let rec = store.get_or_create("a", &verdicts(0.9, 0.9, 0.9)).unwrap();
        store.mark_verified(rec.id).unwrap();
        store.mark_consumed(&[rec.id]).unwrap();

        let rec = store.get(rec.id).unwrap();
        assert!(rec.verified && rec.used_for_training);
    }

    #[test]
    fn persistent_store_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fraudlens.db");

        let store = MessageStore::open(&path).unwrap();
        let rec = store
            .get_or_create("persisted", &verdicts(0.9, 0.8, 0.7))
            .unwrap();
        store.mark_verified(rec.id).unwrap();
        drop(store);

        let store = MessageStore::open(&path).unwrap();
        let fetched = store.get(rec.id).unwrap();
        assert_eq!(fetched.content, "persisted");
        assert!(fetched.verified);
    }

    #[test]
    fn confidences_roundtrip_as_floats() {
        let store = MessageStore::in_memory().unwrap();
        let rec = store
            .get_or_create("floats", &verdicts(0.91, 0.25, 0.5))
            .unwrap();
        let v = rec.verdicts;
        assert!((v[0].confidence - 0.91).abs() < 1e-6);
        // p = 0.25 normalises to legit with mass 0.75.
        assert_eq!(v[1].label, Label::Legit);
        assert!((v[1].confidence - 0.75).abs() < 1e-6);
    }
}
