use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;

use super::types::{AnalysisRecord, AnalysisSummary};
use crate::error::FinLensError;
use crate::report::AnalysisReport;

/// SQLite store for past analyses.
/// All operations are synchronous (rusqlite is blocking).
/// Callers in async contexts should use `tokio::task::spawn_blocking`.
pub struct AnalysisHistory {
    conn: Connection,
}

/// Default database location: `<data_dir>/finlens/history.db`.
pub fn default_db_path() -> Result<PathBuf, FinLensError> {
    dirs::data_dir()
        .map(|d| d.join("finlens").join("history.db"))
        .ok_or_else(|| FinLensError::History("no data directory on this platform".to_string()))
}

impl AnalysisHistory {
    /// Create or open the history database at `db_path`.
    pub fn new(db_path: &Path) -> Result<Self, FinLensError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FinLensError::History(format!("failed to create data dir: {}", e)))?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| FinLensError::History(format!("failed to open history db: {}", e)))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS analyses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                company_name TEXT NOT NULL,
                ticker TEXT NOT NULL,
                score INTEGER NOT NULL,
                model TEXT NOT NULL,
                report_json TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_analyses_created ON analyses(created_at DESC);",
        )
        .map_err(|e| FinLensError::History(format!("failed to create table: {}", e)))?;

        info!("Opened analysis history database at {:?}", db_path);
        Ok(Self { conn })
    }

    /// Record a completed analysis. Returns the new row ID.
    pub fn record(&self, report: &AnalysisReport, model: &str) -> Result<i64, FinLensError> {
        let report_json = serde_json::to_string(report)
            .map_err(|e| FinLensError::History(format!("failed to serialize report: {}", e)))?;

        // RFC 3339 timestamps sort correctly as text, which the
        // created_at index relies on.
        let created_at = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO analyses (created_at, company_name, ticker, score, model, report_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    created_at,
                    report.company_name,
                    report.ticker,
                    report.score,
                    model,
                    report_json
                ],
            )
            .map_err(|e| FinLensError::History(format!("failed to insert analysis: {}", e)))?;

        let id = self.conn.last_insert_rowid();
        info!("Recorded analysis {} for {}", id, report.ticker);
        Ok(id)
    }

    /// List all analyses, newest first.
    pub fn list(&self) -> Result<Vec<AnalysisSummary>, FinLensError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, created_at, company_name, ticker, score, model
                 FROM analyses
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| FinLensError::History(format!("failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AnalysisSummary {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    company_name: row.get(2)?,
                    ticker: row.get(3)?,
                    score: row.get(4)?,
                    model: row.get(5)?,
                })
            })
            .map_err(|e| FinLensError::History(format!("failed to query analyses: {}", e)))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| FinLensError::History(format!("failed to read analysis row: {}", e)))
    }

    /// Fetch one stored analysis by ID.
    pub fn get(&self, id: i64) -> Result<Option<AnalysisRecord>, FinLensError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, created_at, model, report_json
                 FROM analyses WHERE id = ?1",
            )
            .map_err(|e| FinLensError::History(format!("failed to prepare query: {}", e)))?;

        let result = stmt.query_row(params![id], |row| {
            Ok(AnalysisRecord {
                id: row.get(0)?,
                created_at: row.get(1)?,
                model: row.get(2)?,
                report_json: row.get(3)?,
            })
        });

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(FinLensError::History(format!(
                "failed to read analysis {}: {}",
                id, e
            ))),
        }
    }

    /// Delete all stored analyses. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, FinLensError> {
        let removed = self
            .conn
            .execute("DELETE FROM analyses", [])
            .map_err(|e| FinLensError::History(format!("failed to clear history: {}", e)))?;
        info!("Cleared {} stored analyses", removed);
        Ok(removed)
    }
}
