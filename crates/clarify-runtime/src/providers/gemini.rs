//! Google Gemini provider implementation.
//!
//! Talks to the `generateContent` endpoint. Classification only: this
//! module maps HTTP outcomes to [`ProviderError`] variants and leaves
//! all retrying to the gateway.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{
    secrets::{ApiCredential, CredentialSource},
    LlmProvider, ProviderError, NO_RESPONSE_FALLBACK,
};

/// Environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Fixed per-attempt network timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini text-completion provider.
///
/// The API key is stored as an [`ApiCredential`] and only exposed at
/// the header-construction site.
pub struct GeminiProvider {
    credential: ApiCredential,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("credential", &self.credential)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a provider with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_credential(ApiCredential::new(
            api_key,
            CredentialSource::Programmatic,
            "Gemini API key",
        ))
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::with_credential(ApiCredential::from_env(GEMINI_API_KEY_ENV, "Gemini API key")?)
    }

    /// Create a provider from an optional configured key with
    /// environment fallback.
    pub fn from_config_or_env(api_key: Option<&str>) -> Result<Self, ProviderError> {
        Self::with_credential(ApiCredential::from_config_or_env(
            api_key,
            GEMINI_API_KEY_ENV,
            "Gemini API key",
        )?)
    }

    fn with_credential(credential: ApiCredential) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        Ok(Self {
            credential,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Gemini API request format.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Gemini API response format.
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
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GenerateResponse {
    /// First candidate text, if the body carries any.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        // SECURITY: only expose the credential here, at the point of use
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.credential.expose())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e.to_string())
                }
            })?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if status.as_u16() == 503 {
            return Err(ProviderError::Unavailable);
        }
        if !status.is_success() {
            let message = match response.json::<GeminiError>().await {
                Ok(body) => body.error.message,
                Err(e) => e.to_string(),
            };
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // A success body without candidate text is a valid-but-useless
        // reply, not a failure
        match response.json::<GenerateResponse>().await {
            Ok(body) => Ok(body
                .first_text()
                .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string())),
            Err(_) => Ok(NO_RESPONSE_FALLBACK.to_string()),
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
