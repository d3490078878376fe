//! LLM-assisted runtime for clarify sessions.
//!
//! Wraps the deterministic core (`clarify-core`) with everything that
//! talks to an oracle: the Gemini provider, the retrying gateway, the
//! answer validator, the cross-question attributor, the summary
//! reconciler, and the orchestrator that drives a session end to end.

pub mod analysis;
pub mod attributor;
pub mod config;
pub mod gateway;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod reconciler;
pub mod validator;

pub use analysis::Analyzer;
pub use attributor::Attributor;
pub use config::{CacheConfig, ConfigError, ProviderConfig, RetryPolicy, RuntimeConfig};
pub use gateway::{Gateway, GatewayError, GatewayStats};
pub use orchestrator::{
    SessionError, SessionOrchestrator, SessionReport, SideAnswer, StartInfo, SubmitOutcome,
};
pub use providers::{
    ApiCredential, CredentialSource, GeminiProvider, LlmProvider, ProviderError,
    GEMINI_API_KEY_ENV, NO_RESPONSE_FALLBACK,
};
pub use reconciler::Reconciler;
pub use validator::Validator;
