pub mod store;
pub mod types;

pub use store::{default_db_path, AnalysisHistory};
pub use types::{AnalysisRecord, AnalysisSummary};
