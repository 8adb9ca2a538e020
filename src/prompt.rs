//! Prompt and response-schema construction for the analysis request.

use serde_json;

/// Return a compact text version of the response schema for embedding in the
/// prompt. Gemini is asked for `application/json` output, but the schema in
/// the prompt is what actually pins the field names down.
pub fn analysis_schema_text() -> String {
    serde_json::to_string_pretty(&analysis_json_schema()).unwrap_or_else(|_| "{}".to_string())
}

/// JSON schema for the analysis report the model must return.
pub fn analysis_json_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "companyName": {
                "type": "string",
                "description": "Full legal or common name of the analyzed company"
            },
            "ticker": {
                "type": "string",
                "description": "Primary exchange ticker symbol"
            },
            "currency": {
                "type": "string",
                "description": "Reporting currency detected from the documents, e.g. USD, ILS, EUR"
            },
            "score": {
                "type": "integer",
                "minimum": 0,
                "maximum": 8,
                "description": "Number of the 8 Pillars checks that passed"
            },
            "pillarsStatus": {
                "type": "array",
                "maxItems": 8,
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Short identifier of the pillar, e.g. 'pe_ratio', 'revenue_growth'"
                        },
                        "status": {
                            "type": "string",
                            "enum": ["pass", "fail"]
                        },
                        "value": {
                            "type": "string",
                            "description": "The figure the check was evaluated against, as displayed text"
                        }
                    },
                    "required": ["id", "status", "value"]
                }
            },
            "dcf": {
                "type": "object",
                "properties": {
                    "conservative": { "type": "number", "description": "DCF fair value per share, conservative growth assumptions" },
                    "base": { "type": "number", "description": "DCF fair value per share, base case" },
                    "optimistic": { "type": "number", "description": "DCF fair value per share, optimistic case" },
                    "marketPrice": { "type": "number", "description": "Current market price per share" },
                    "marginOfSafety": { "type": "number", "description": "Percent discount of market price to base fair value; negative when overpriced" }
                },
                "required": ["conservative", "base", "optimistic", "marketPrice", "marginOfSafety"]
            },
            "verdict": {
                "type": "object",
                "properties": {
                    "recommendation": { "type": "string", "enum": ["buy", "hold", "sell"] },
                    "reason": { "type": "string", "description": "One or two sentences justifying the recommendation" }
                },
                "required": ["recommendation", "reason"]
            },
            "analysisNotes": {
                "type": "string",
                "description": "Free-text caveats: missing statements, unusual items, data quality"
            }
        },
        "required": ["companyName", "ticker", "currency", "score", "pillarsStatus", "dcf"]
    })
}

/// Build the instruction text that precedes the document parts.
pub fn build_analysis_prompt() -> String {
    let schema = analysis_schema_text();
    format!(
        r#"You are a fundamental-analysis assistant. Analyze the attached financial documents (annual/quarterly reports, filings, or statements) for a single company.

Perform two analyses:

1. 8 Pillars: evaluate the eight fundamental checks (P/E ratio, revenue growth, net income growth, shares outstanding trend, cash flow growth, return on invested capital, long-term-debt-to-free-cash-flow, price-to-free-cash-flow). Mark each pillar pass or fail and report the figure you evaluated.

2. DCF valuation: compute a discounted-cash-flow fair value per share under conservative, base, and optimistic growth assumptions, compare against the current market price, and state the margin of safety in percent.

Rules:
- Auto-detect the reporting currency from the documents (e.g. ₪ for Israeli filings, $ for US filings) and report it in the 'currency' field.
- If a figure is missing from the documents, use the web search tool to find it; note any figure you could not verify in 'analysisNotes'.
- Include a buy/hold/sell verdict with a short reason.
- Return ONLY a JSON object matching the schema below. No markdown, no commentary outside the JSON.

Schema:
{schema}"#
    )
}
