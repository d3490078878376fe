//! LLM provider abstraction for clarify-runtime.
//!
//! A provider turns one prompt into one text reply, classifying
//! transport failures so the gateway can decide what is retryable.
//! Providers hold no state between calls.
//!
//! ## Security
//!
//! Providers store their API key via [`secrets::ApiCredential`] so the
//! key can never leak through `Debug` output or error messages.

use async_trait::async_trait;
use thiserror::Error;

mod gemini;
pub mod secrets;

pub use gemini::{GeminiProvider, GEMINI_API_KEY_ENV};
pub use secrets::{ApiCredential, CredentialSource};

/// Literal returned when the oracle answers 200 OK with a body that
/// carries no candidate text. Callers treat this as a valid but
/// useless reply, not as a failure.
pub const NO_RESPONSE_FALLBACK: &str = "No response from Gemini API";

/// Errors from a single provider attempt.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("rate limited by the oracle")]
    RateLimited,

    #[error("oracle service unavailable")]
    Unavailable,

    #[error("request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// One-shot text completion against the oracle.
///
/// Each call is independent: no conversation state, no connection
/// state. Retrying is the gateway's job, not the provider's.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a single prompt and return the oracle's raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
