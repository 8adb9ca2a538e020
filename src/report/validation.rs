//! Plausibility checks on a decoded report.
//!
//! Schema decoding already guarantees shape; these checks flag values the
//! model can still get wrong (out-of-range scores, impossible valuations).
//! Warnings never fail the run.

use crate::report::types::{AnalysisReport, PillarOutcome, ValidationWarning};

pub fn validate_report(report: &AnalysisReport) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if report.score > 8 {
        warnings.push(ValidationWarning {
            field: "score".to_string(),
            message: format!("score {} is out of the 0-8 range", report.score),
        });
    }

    if report.pillars_status.len() > 8 {
        warnings.push(ValidationWarning {
            field: "pillarsStatus".to_string(),
            message: format!(
                "{} pillar entries returned, expected at most 8",
                report.pillars_status.len()
            ),
        });
    }

    let passes = report
        .pillars_status
        .iter()
        .filter(|p| p.status == PillarOutcome::Pass)
        .count();
    if !report.pillars_status.is_empty() && passes != report.score as usize {
        warnings.push(ValidationWarning {
            field: "score".to_string(),
            message: format!(
                "score is {} but {} of {} pillars passed",
                report.score,
                passes,
                report.pillars_status.len()
            ),
        });
    }

    for (name, value) in [
        ("dcf.conservative", report.dcf.conservative),
        ("dcf.base", report.dcf.base),
        ("dcf.optimistic", report.dcf.optimistic),
        ("dcf.marketPrice", report.dcf.market_price),
    ] {
        if !value.is_finite() || value <= 0.0 {
            warnings.push(ValidationWarning {
                field: name.to_string(),
                message: format!("{} is not a positive finite price", value),
            });
        }
    }

    if !report.dcf.margin_of_safety.is_finite() || report.dcf.margin_of_safety.abs() > 100.0 {
        warnings.push(ValidationWarning {
            field: "dcf.marginOfSafety".to_string(),
            message: format!(
                "margin of safety {} is outside the plausible +/-100% range",
                report.dcf.margin_of_safety
            ),
        });
    }

    warnings
}
