//! Typed retry policy for the generateContent call.
//!
//! One ordered list of model targets replaces the copy-pasted inline
//! "if quota, try the other model" conditionals. Only quota exhaustion
//! (HTTP 429 or a "quota" error message) advances to the next target.

use crate::config::AppConfig;
use crate::error::FinLensError;

/// A single endpoint target, identified by model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    pub model: String,
}

impl ModelTarget {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    targets: Vec<ModelTarget>,
}

impl RetryPolicy {
    pub fn new(targets: Vec<ModelTarget>) -> Self {
        Self { targets }
    }

    /// Primary model then fallback model. A fallback identical to the
    /// primary is dropped so a quota failure is not retried against the
    /// same exhausted model.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut targets = vec![ModelTarget::new(&config.model)];
        if config.fallback_model != config.model && !config.fallback_model.is_empty() {
            targets.push(ModelTarget::new(&config.fallback_model));
        }
        Self { targets }
    }

    pub fn targets(&self) -> &[ModelTarget] {
        &self.targets
    }

    /// Whether this failure should advance to the next target.
    pub fn is_retryable(&self, error: &FinLensError) -> bool {
        error.is_quota_exhausted()
    }
}
