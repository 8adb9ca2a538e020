//! Reqwest transport for the Gemini generateContent endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use crate::client::retry::ModelTarget;
use crate::client::GenerateContent;
use crate::encoder::RequestPart;
use crate::error::FinLensError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Request body for generateContent.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Content {
    pub parts: Vec<RequestPart>,
}

/// Capability declaration. Only web search is used, and the vendor field
/// name is exactly `googleSearch`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tool {
    #[serde(rename = "googleSearch")]
    pub google_search: serde_json::Map<String, serde_json::Value>,
}

impl Tool {
    pub fn google_search() -> Self {
        Self {
            google_search: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub response_mime_type: String,
}

impl GenerateRequest {
    /// Assemble the body: instruction text first, then the document parts,
    /// all inside a single content entry.
    pub fn new(
        prompt: String,
        file_parts: Vec<RequestPart>,
        temperature: f32,
        enable_search: bool,
    ) -> Self {
        let mut parts = Vec::with_capacity(file_parts.len() + 1);
        parts.push(RequestPart::text(prompt));
        parts.extend(file_parts);

        Self {
            contents: vec![Content { parts }],
            tools: enable_search.then(|| vec![Tool::google_search()]),
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

// Response wrapper. Every level is optional; the vendor omits whole
// branches on safety blocks and empty candidates.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the generative-language API. One instance per run.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, FinLensError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FinLensError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, api_key })
    }

    /// Endpoint URL for a model. The API key travels in the query string,
    /// per the vendor's scheme.
    fn endpoint(&self, model: &str) -> Result<Url, FinLensError> {
        let mut url = Url::parse(&format!("{}/{}:generateContent", API_BASE, model)).map_err(
            |e| FinLensError::Http {
                model: model.to_string(),
                message: format!("invalid endpoint URL: {}", e),
            },
        )?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl GenerateContent for GeminiClient {
    async fn generate(
        &self,
        target: &ModelTarget,
        request: &GenerateRequest,
    ) -> Result<String, FinLensError> {
        let url = self.endpoint(&target.model)?;
        info!("Calling generateContent on model '{}'", target.model);

        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("timed out after {}s", REQUEST_TIMEOUT.as_secs())
                } else {
                    // reqwest error displays never include the URL query, but
                    // drop the URL anyway so the key cannot leak into logs.
                    e.without_url().to_string()
                };
                error!("Request to '{}' failed: {}", target.model, message);
                FinLensError::Http {
                    model: target.model.clone(),
                    message,
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FinLensError::Http {
            model: target.model.clone(),
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            let message = vendor_error_message(&body);
            error!("API error {} from '{}': {}", status, target.model, message);
            return Err(FinLensError::Api {
                model: target.model.clone(),
                status: status.as_u16(),
                message,
            });
        }

        extract_reply_text(&body, &target.model)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a 2xx body.
fn extract_reply_text(body: &str, model: &str) -> Result<String, FinLensError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| FinLensError::Http {
            model: model.to_string(),
            message: format!("failed to parse response wrapper: {}", e),
        })?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(FinLensError::EmptyResponse)
}

/// Best available message from a non-2xx body: the vendor's
/// `error.message` when present, else the (truncated) raw body.
fn vendor_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.and_then(|e| e.message) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail returned".to_string()
    } else if trimmed.len() > 1024 {
        let mut cut = 1024;
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

    #[test]
    fn test_request_body_matches_wire_shape() {
        let request = GenerateRequest::new(
            "Analyze this.".to_string(),
            vec![RequestPart::inline("application/pdf", b"pdf-bytes")],
            // 0.5 is exactly representable in f32, so the serialized value
            // compares cleanly against the json! literal.
            0.5,
            true,
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Analyze this.");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "application/pdf"
        );
        assert_eq!(json["tools"][0]["googleSearch"], serde_json::json!({}));
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_tools_omitted_when_search_disabled() {
        let request = GenerateRequest::new("p".to_string(), vec![], 0.1, false);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_endpoint_carries_model_and_key() {
        let client = GeminiClient::new("secret-key".to_string()).unwrap();
        let url = client.endpoint("gemini-2.0-flash").unwrap();
        assert_eq!(
            url.path(),
            "/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(url.query(), Some("key=secret-key"));
    }

    #[test]
    fn test_extract_reply_text_happy_path() {
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"score\": 5}"}]}}
            ]
        })
        .to_string();
        assert_eq!(
            extract_reply_text(&body, "m").unwrap(),
            "{\"score\": 5}"
        );
    }

    #[test]
    fn test_empty_candidates_is_empty_response() {
        let body = r#"{"candidates": []}"#;
        assert!(matches!(
            extract_reply_text(body, "m").unwrap_err(),
            FinLensError::EmptyResponse
        ));
    }

    #[test]
    fn test_blank_text_is_empty_response() {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        })
        .to_string();
        assert!(matches!(
            extract_reply_text(&body, "m").unwrap_err(),
            FinLensError::EmptyResponse
        ));
    }

    #[test]
    fn test_vendor_error_message_prefers_error_payload() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded for model"}}"#;
        assert_eq!(vendor_error_message(body), "Quota exceeded for model");
    }

    #[test]
    fn test_vendor_error_message_falls_back_to_raw_body() {
        assert_eq!(vendor_error_message("<html>502</html>"), "<html>502</html>");
        assert_eq!(vendor_error_message("  "), "no error detail returned");
    }
}
