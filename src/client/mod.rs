//! generateContent transport and the fallback policy applied over it.

pub mod gemini;
pub mod retry;

pub use gemini::{GeminiClient, GenerateRequest};
pub use retry::{ModelTarget, RetryPolicy};

use tracing::warn;

use crate::error::FinLensError;

/// Transport seam for the generateContent call. The real implementation is
/// `GeminiClient`; tests substitute a scripted one.
pub trait GenerateContent {
    fn generate(
        &self,
        target: &ModelTarget,
        request: &GenerateRequest,
    ) -> impl std::future::Future<Output = Result<String, FinLensError>> + Send;
}

/// A successful reply together with the model that actually produced it,
/// which after a quota fallback is not the primary.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub text: String,
    pub model: String,
}

/// Walk the policy's targets in order. A quota-classified failure advances
/// to the next target; any other failure surfaces immediately. When every
/// target fails, the error surfaced is the last attempt's.
pub async fn generate_with_policy<C: GenerateContent>(
    client: &C,
    policy: &RetryPolicy,
    request: &GenerateRequest,
) -> Result<GenerateOutcome, FinLensError> {
    let (last, earlier) = policy
        .targets()
        .split_last()
        .ok_or_else(|| FinLensError::Config("retry policy has no targets".to_string()))?;

    for (index, target) in earlier.iter().enumerate() {
        match client.generate(target, request).await {
            Ok(text) => {
                return Ok(GenerateOutcome {
                    text,
                    model: target.model.clone(),
                })
            }
            Err(e) if policy.is_retryable(&e) => {
                let next = policy
                    .targets()
                    .get(index + 1)
                    .unwrap_or(last);
                warn!(
                    "Quota exhausted on '{}', falling back to '{}'",
                    target.model, next.model
                );
            }
            Err(e) => return Err(e),
        }
    }

    // Last target: whatever happens here is what the user sees.
    let text = client.generate(last, request).await?;
    Ok(GenerateOutcome {
        text,
        model: last.model.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted transport: pops one result per call, records which models
    /// were attempted.
    struct ScriptedClient {
        responses: Mutex<Vec<Result<String, FinLensError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String, FinLensError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GenerateContent for ScriptedClient {
        async fn generate(
            &self,
            target: &ModelTarget,
            _request: &GenerateRequest,
        ) -> Result<String, FinLensError> {
            self.calls.lock().unwrap().push(target.model.clone());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .expect("scripted client ran out of responses")
        }
    }

    fn two_target_policy() -> RetryPolicy {
        RetryPolicy::new(vec![
            ModelTarget::new("gemini-2.0-flash"),
            ModelTarget::new("gemini-1.5-flash"),
        ])
    }

    fn quota_error(model: &str) -> FinLensError {
        FinLensError::Api {
            model: model.to_string(),
            status: 429,
            message: "Quota exceeded".to_string(),
        }
    }

    fn request() -> GenerateRequest {
        GenerateRequest::new("prompt".to_string(), vec![], 0.1, false)
    }

    #[tokio::test]
    async fn test_primary_success_makes_one_call() {
        let client = ScriptedClient::new(vec![Ok("{\"ok\":true}".to_string())]);
        let outcome = generate_with_policy(&client, &two_target_policy(), &request())
            .await
            .unwrap();
        assert_eq!(outcome.text, "{\"ok\":true}");
        assert_eq!(outcome.model, "gemini-2.0-flash");
        assert_eq!(client.calls(), vec!["gemini-2.0-flash"]);
    }

    #[tokio::test]
    async fn test_429_triggers_exactly_one_fallback() {
        let client = ScriptedClient::new(vec![
            Err(quota_error("gemini-2.0-flash")),
            Ok("{\"ok\":true}".to_string()),
        ]);
        let outcome = generate_with_policy(&client, &two_target_policy(), &request())
            .await
            .unwrap();
        assert_eq!(outcome.text, "{\"ok\":true}");
        // The outcome names the model that answered, not the primary.
        assert_eq!(outcome.model, "gemini-1.5-flash");
        assert_eq!(
            client.calls(),
            vec!["gemini-2.0-flash", "gemini-1.5-flash"]
        );
    }

    #[tokio::test]
    async fn test_double_failure_surfaces_fallback_error() {
        let client = ScriptedClient::new(vec![
            Err(quota_error("gemini-2.0-flash")),
            Err(FinLensError::Api {
                model: "gemini-1.5-flash".to_string(),
                status: 503,
                message: "fallback unavailable".to_string(),
            }),
        ]);
        let err = generate_with_policy(&client, &two_target_policy(), &request())
            .await
            .unwrap_err();
        match err {
            FinLensError::Api { model, message, .. } => {
                assert_eq!(model, "gemini-1.5-flash");
                assert_eq!(message, "fallback unavailable");
            }
            other => panic!("expected fallback Api error, got {:?}", other),
        }
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_non_quota_failure_does_not_fall_back() {
        let client = ScriptedClient::new(vec![Err(FinLensError::Api {
            model: "gemini-2.0-flash".to_string(),
            status: 400,
            message: "invalid argument".to_string(),
        })]);
        let err = generate_with_policy(&client, &two_target_policy(), &request())
            .await
            .unwrap_err();
        assert!(matches!(err, FinLensError::Api { status: 400, .. }));
        assert_eq!(client.calls(), vec!["gemini-2.0-flash"]);
    }

    #[tokio::test]
    async fn test_quota_on_last_target_surfaces_that_error() {
        let client = ScriptedClient::new(vec![
            Err(quota_error("gemini-2.0-flash")),
            Err(quota_error("gemini-1.5-flash")),
        ]);
        let err = generate_with_policy(&client, &two_target_policy(), &request())
            .await
            .unwrap_err();
        match err {
            FinLensError::Api { model, .. } => assert_eq!(model, "gemini-1.5-flash"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
