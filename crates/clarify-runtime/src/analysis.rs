//! Pre-session gap analysis.
//!
//! Optional advisory step before the first question: the oracle looks
//! at the summary and the question list and describes what information
//! is missing. Failures are non-fatal, the session runs without it.

use std::sync::Arc;
use tracing::debug;

use crate::gateway::Gateway;
use crate::prompts;

pub struct Analyzer {
    gateway: Arc<Gateway>,
}

impl Analyzer {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Describe the information gap between summary and questions.
    pub async fn analyze(&self, summary: &str, questions_source: &str) -> Option<String> {
        match self
            .gateway
            .send(&prompts::analysis(summary, questions_source))
            .await
        {
            Ok(reply) => Some(reply),
            Err(err) => {
                debug!(error = %err, "gap analysis failed, continuing without it");
                None
            }
        }
    }
}
