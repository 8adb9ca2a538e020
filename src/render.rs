//! Terminal rendering of analysis reports.
//!
//! Rendering is defensive: optional sections are omitted when absent, and
//! nothing here assumes the model filled every field sensibly (that is what
//! the validation warnings are for).

use std::fmt::Write as _;

use crate::error::FinLensError;
use crate::report::{AnalysisReport, PillarOutcome, ValidationWarning};

/// Pretty-printed JSON of the decoded report, the safe rendering used by
/// `--raw`.
pub fn render_raw(report: &AnalysisReport) -> Result<String, FinLensError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| FinLensError::MalformedResponse(format!("failed to re-serialize report: {}", e)))
}

/// Human-oriented text report.
pub fn render_report(report: &AnalysisReport, warnings: &[ValidationWarning]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", report.company_name, report.ticker);
    let _ = writeln!(out, "8 Pillars score: {}/8", report.score);

    if !report.pillars_status.is_empty() {
        let width = report
            .pillars_status
            .iter()
            .map(|p| p.id.len())
            .max()
            .unwrap_or(0);
        for pillar in &report.pillars_status {
            let mark = match pillar.status {
                PillarOutcome::Pass => "PASS",
                PillarOutcome::Fail => "FAIL",
            };
            let _ = writeln!(out, "  [{}] {:width$}  {}", mark, pillar.id, pillar.value);
        }
    }

    let _ = writeln!(out, "\nDCF valuation ({}):", report.currency);
    let _ = writeln!(out, "  Conservative:     {:.2}", report.dcf.conservative);
    let _ = writeln!(out, "  Base:             {:.2}", report.dcf.base);
    let _ = writeln!(out, "  Optimistic:       {:.2}", report.dcf.optimistic);
    let _ = writeln!(out, "  Market price:     {:.2}", report.dcf.market_price);
    let _ = writeln!(
        out,
        "  Margin of safety: {:.1}%",
        report.dcf.margin_of_safety
    );

    if let Some(verdict) = &report.verdict {
        let _ = writeln!(
            out,
            "\nVerdict: {} ({})",
            verdict.recommendation.as_str().to_uppercase(),
            verdict.reason
        );
    }

    if let Some(notes) = &report.analysis_notes {
        if !notes.trim().is_empty() {
            let _ = writeln!(out, "\nNotes: {}", notes.trim());
        }
    }

    if !warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in warnings {
            let _ = writeln!(out, "  - {}: {}", warning.field, warning.message);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{DcfValuation, PillarStatus, Recommendation, Verdict};

    fn report() -> AnalysisReport {
        AnalysisReport {
            company_name: "Acme Corp".to_string(),
            ticker: "ACME".to_string(),
            currency: "USD".to_string(),
            score: 6,
            pillars_status: vec![
                PillarStatus {
                    id: "pe_ratio".to_string(),
                    status: PillarOutcome::Pass,
                    value: "18.2".to_string(),
                },
                PillarStatus {
                    id: "revenue_growth".to_string(),
                    status: PillarOutcome::Fail,
                    value: "-2.1%".to_string(),
                },
            ],
            dcf: DcfValuation {
                conservative: 80.0,
                base: 105.5,
                optimistic: 130.0,
                market_price: 92.3,
                margin_of_safety: 12.5,
            },
            verdict: Some(Verdict {
                recommendation: Recommendation::Hold,
                reason: "Fairly priced.".to_string(),
            }),
            analysis_notes: None,
        }
    }

    #[test]
    fn test_render_report_includes_core_sections() {
        let text = render_report(&report(), &[]);
        assert!(text.contains("Acme Corp (ACME)"));
        assert!(text.contains("8 Pillars score: 6/8"));
        assert!(text.contains("[PASS] pe_ratio"));
        assert!(text.contains("[FAIL] revenue_growth"));
        assert!(text.contains("DCF valuation (USD):"));
        assert!(text.contains("Base:             105.50"));
        assert!(text.contains("Margin of safety: 12.5%"));
        assert!(text.contains("Verdict: HOLD (Fairly priced.)"));
        assert!(!text.contains("Warnings:"));
    }

    #[test]
    fn test_render_report_omits_absent_sections() {
        let mut r = report();
        r.verdict = None;
        r.pillars_status.clear();
        let text = render_report(&r, &[]);
        assert!(!text.contains("Verdict:"));
        assert!(!text.contains("[PASS]"));
    }

    #[test]
    fn test_render_report_lists_warnings() {
        let warnings = vec![ValidationWarning {
            field: "score".to_string(),
            message: "score 11 is out of the 0-8 range".to_string(),
        }];
        let text = render_report(&report(), &warnings);
        assert!(text.contains("Warnings:"));
        assert!(text.contains("score 11 is out of the 0-8 range"));
    }

    #[test]
    fn test_render_raw_is_pretty_json() {
        let raw = render_raw(&report()).unwrap();
        assert!(raw.contains("\"companyName\": \"Acme Corp\""));
        let round: AnalysisReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(round, report());
    }
}
