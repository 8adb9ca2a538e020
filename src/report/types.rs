use serde::{Deserialize, Serialize};

/// Structured analysis the model returns: an 8 Pillars scorecard plus a DCF
/// valuation. Wire names are camelCase to match the prompt schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub company_name: String,
    pub ticker: String,
    /// Reporting currency as detected from the documents (USD, ILS, ...).
    pub currency: String,
    /// Number of pillars that passed, 0-8.
    pub score: u8,
    pub pillars_status: Vec<PillarStatus>,
    pub dcf: DcfValuation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_notes: Option<String>,
}

/// Outcome of one of the eight fundamental checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PillarStatus {
    pub id: String,
    pub status: PillarOutcome,
    /// The figure the check was evaluated against, as display text.
    pub value: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PillarOutcome {
    Pass,
    Fail,
}

/// DCF fair values per share under three growth scenarios, plus the market
/// comparison. All figures are in the report's `currency`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DcfValuation {
    pub conservative: f64,
    pub base: f64,
    pub optimistic: f64,
    pub market_price: f64,
    /// Percent discount of market price to base fair value; negative when
    /// the stock trades above fair value.
    pub margin_of_safety: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub recommendation: Recommendation,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "buy",
            Recommendation::Hold => "hold",
            Recommendation::Sell => "sell",
        }
    }
}

/// A plausibility problem in an otherwise well-formed report. Never fatal;
/// surfaced in the rendered output and logged.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}
