//! Strict decoding of the model's reply text into an `AnalysisReport`.
//!
//! The model is instructed to return bare JSON, but replies still arrive
//! wrapped in markdown fences or prose often enough that we first isolate
//! the braced region, then hand it to serde. Anything serde rejects is a
//! `MalformedResponse`; there is no field-by-field salvage.

use tracing::error;

use crate::error::FinLensError;
use crate::report::types::AnalysisReport;

const SAMPLE_LIMIT: usize = 500;

/// Decode the raw model reply into a report.
pub fn decode_report(raw_text: &str) -> Result<AnalysisReport, FinLensError> {
    let stripped = strip_markdown_fences(raw_text);
    let candidate = locate_json_object(&stripped).ok_or_else(|| {
        error!("Model reply contained no JSON object: {}", sample(raw_text));
        FinLensError::MalformedResponse(format!(
            "reply did not contain a JSON object (got: {})",
            sample(raw_text)
        ))
    })?;

    serde_json::from_str(candidate).map_err(|e| {
        error!("Model reply failed schema decode: {}", e);
        FinLensError::MalformedResponse(format!("{} (got: {})", e, sample(candidate)))
    })
}

/// Strip markdown code fences if present. Providers without a strict JSON
/// mode like to wrap output in ```json ... ```.
fn strip_markdown_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let after_open = match trimmed.find('\n') {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        };
        let cleaned = after_open.trim_end();
        if let Some(stripped) = cleaned.strip_suffix("```") {
            stripped.trim().to_string()
        } else {
            cleaned.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

/// Slice from the first `{` to the last `}`, inclusive. Returns None when no
/// such pair exists.
fn locate_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn sample(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() > SAMPLE_LIMIT {
        let mut cut = SAMPLE_LIMIT;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &trimmed[..cut])
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_report_json() -> String {
        serde_json::json!({
            "companyName": "Acme Corp",
            "ticker": "ACME",
            "currency": "USD",
            "score": 5,
            "pillarsStatus": [],
            "dcf": {
                "conservative": 80.0,
                "base": 100.0,
                "optimistic": 120.0,
                "marketPrice": 90.0,
                "marginOfSafety": 10.0
            }
        })
        .to_string()
    }

    #[test]
    fn test_decodes_bare_json() {
        let report = decode_report(&minimal_report_json()).unwrap();
        assert_eq!(report.score, 5);
    }

    #[test]
    fn test_decodes_json_wrapped_in_prose() {
        let wrapped = format!("Here is the result:\n{}\nThanks", minimal_report_json());
        let report = decode_report(&wrapped).unwrap();
        assert_eq!(report.ticker, "ACME");
    }

    #[test]
    fn test_decodes_fenced_json() {
        let fenced = format!("```json\n{}\n```", minimal_report_json());
        let report = decode_report(&fenced).unwrap();
        assert_eq!(report.company_name, "Acme Corp");
    }

    #[test]
    fn test_no_braces_is_malformed_not_a_panic() {
        let err = decode_report("I could not analyze these documents.").unwrap_err();
        match err {
            FinLensError::MalformedResponse(msg) => {
                assert!(msg.contains("did not contain a JSON object"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_braces_are_malformed() {
        let err = decode_report("} nothing here {").unwrap_err();
        assert!(matches!(err, FinLensError::MalformedResponse(_)));
    }

    #[test]
    fn test_schema_violation_is_malformed() {
        // Parses as JSON but is not an AnalysisReport.
        let err = decode_report(r#"{"score": "five"}"#).unwrap_err();
        assert!(matches!(err, FinLensError::MalformedResponse(_)));
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let mut json = minimal_report_json();
        json.truncate(json.len() - 10);
        // No closing brace at all once truncated mid-object? There may still
        // be a nested '}', which yields an unparseable slice. Either way the
        // error must be MalformedResponse.
        let err = decode_report(&json).unwrap_err();
        assert!(matches!(err, FinLensError::MalformedResponse(_)));
    }

    #[test]
    fn test_sample_truncates_long_text_on_char_boundary() {
        let long = "א".repeat(600);
        let s = sample(&long);
        assert!(s.ends_with("..."));
        assert!(s.len() <= SAMPLE_LIMIT + 3);
    }
}
