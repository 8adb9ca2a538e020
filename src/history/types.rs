use serde::Serialize;

/// One row of `history list`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub id: i64,
    pub created_at: String,
    pub company_name: String,
    pub ticker: String,
    pub score: u8,
    pub model: String,
}

/// Full stored analysis, as returned by `history show`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub created_at: String,
    pub model: String,
    /// The decoded report, re-serialized at record time.
    pub report_json: String,
}
