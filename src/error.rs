use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinLensError {
    #[error("No API key configured. Run `finlens key set` or export GEMINI_API_KEY.")]
    MissingApiKey,

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Request to {model} failed: {message}")]
    Http { model: String, message: String },

    #[error("API error {status} from {model}: {message}")]
    Api {
        model: String,
        status: u16,
        message: String,
    },

    #[error("The model returned an empty response")]
    EmptyResponse,

    #[error("The model did not return valid analysis data: {0}")]
    MalformedResponse(String),

    #[error("History error: {0}")]
    History(String),
}

impl FinLensError {
    /// Quota/rate-limit classification: HTTP 429, or a vendor error message
    /// mentioning "quota" (case-insensitive). Only these trigger the model
    /// fallback; everything else is terminal for the run.
    pub fn is_quota_exhausted(&self) -> bool {
        match self {
            FinLensError::Api {
                status, message, ..
            } => *status == 429 || message.to_lowercase().contains("quota"),
            _ => false,
        }
    }
}
