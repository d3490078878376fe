//! Answer validation against the oracle.
//!
//! Three-stage pipeline: local pre-filter, oracle verdict, and a
//! one-shot escalation check when the oracle rejects. Only
//! oracle-produced rejections are escalated; pre-filter rejections
//! are final.

use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, info};

use clarify_core::{is_non_informative, parse_override, parse_verdict, Verdict};

use crate::config::CacheConfig;
use crate::gateway::{Gateway, GatewayError};
use crate::prompts;

/// Conservative rejection reason when no usable verdict exists: the
/// gateway failed or the oracle replied off-format.
const VALIDATION_FAILED: &str = "Validation failed due to API error";

/// Validates answers, caching oracle verdicts by question and answer.
pub struct Validator {
    gateway: Arc<Gateway>,
    cache: Option<Cache<String, Verdict>>,
}

impl Validator {
    pub fn new(gateway: Arc<Gateway>, cache: CacheConfig) -> Self {
        let cache = cache.enabled.then(|| {
            Cache::builder()
                .max_capacity(cache.capacity)
                .time_to_live(cache.ttl)
                .build()
        });
        Self { gateway, cache }
    }

    /// Validate an answer for a question.
    ///
    /// Infallible by contract: a gateway failure or an unparseable
    /// oracle reply both yield a rejection, so the caller re-asks
    /// instead of crashing the session.
    pub async fn validate(&self, question: &str, answer: &str, summary: &str) -> Verdict {
        if answer.trim().is_empty() {
            return Verdict::Invalid("Empty or too short answer".to_string());
        }
        if is_non_informative(answer) {
            return Verdict::Invalid("Answer is too vague or uninformative".to_string());
        }

        let key = format!("{question}\u{1f}{answer}");
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                debug!(question, "verdict cache hit");
                return hit;
            }
        }

        let verdict = match self.consult_oracle(question, answer, summary).await {
            Ok(verdict) => verdict,
            Err(err) => {
                debug!(error = %err, "validation call failed");
                // Not cached: the next attempt should reach the oracle
                return Verdict::Invalid(VALIDATION_FAILED.to_string());
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(key, verdict.clone()).await;
        }
        verdict
    }

    async fn consult_oracle(
        &self,
        question: &str,
        answer: &str,
        summary: &str,
    ) -> Result<Verdict, GatewayError> {
        let reply = self
            .gateway
            .send(&prompts::validation(question, answer, summary))
            .await?;

        // An off-format reply converts to a terminal rejection; only a
        // parsed INVALID is eligible for the second opinion
        let primary = match parse_verdict(&reply) {
            Some(verdict) => verdict,
            None => return Ok(Verdict::Invalid(VALIDATION_FAILED.to_string())),
        };

        let rejection = match &primary {
            Verdict::Valid(_) => return Ok(primary),
            Verdict::Invalid(reason) => reason.clone(),
        };

        // One-shot second opinion; a gateway failure here keeps the
        // primary rejection rather than failing the whole validation
        let escalation = prompts::escalation(question, answer, summary, &rejection);
        match self.gateway.send(&escalation).await {
            Ok(second) => match parse_override(&second) {
                Some(reason) => {
                    info!(question, "escalation overrode primary rejection");
                    Ok(Verdict::Valid(reason))
                }
                None => Ok(primary),
            },
            Err(err) => {
                debug!(error = %err, "escalation call failed, keeping primary verdict");
                Ok(primary)
            }
        }
    }
}
