pub mod extract;
pub mod types;
pub mod validation;

pub use extract::decode_report;
pub use types::{
    AnalysisReport, DcfValuation, PillarOutcome, PillarStatus, Recommendation, ValidationWarning,
    Verdict,
};
pub use validation::validate_report;
