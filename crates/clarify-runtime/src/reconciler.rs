//! Summary reconciliation.
//!
//! Rewrites the original summary with every accepted answer woven into
//! the text. When the oracle is unreachable or replies with nothing
//! usable, a deterministic append-only merge keeps the collected
//! answers from being lost.

use std::sync::Arc;
use tracing::warn;

use clarify_core::{fallback_merge, AcceptedAnswer};

use crate::gateway::Gateway;
use crate::prompts;
use crate::providers::NO_RESPONSE_FALLBACK;

/// Produces the enhanced summary from the original plus accepted answers.
pub struct Reconciler {
    gateway: Arc<Gateway>,
}

impl Reconciler {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Reconcile the original summary with the accepted answers.
    ///
    /// With no accepted answers the original is returned unchanged.
    pub async fn reconcile(&self, original: &str, accepted: &[AcceptedAnswer]) -> String {
        if accepted.is_empty() {
            return original.to_string();
        }

        let answers_block: String = accepted
            .iter()
            .map(|a| format!("- {}: {}\n", a.question_text, a.answer_text))
            .collect();

        let prompt = prompts::reconciliation(original, answers_block.trim_end());
        match self.gateway.send(&prompt).await {
            Ok(reply) if usable(&reply) => reply.trim().to_string(),
            Ok(_) => {
                warn!("oracle returned an empty rewrite, using fallback merge");
                fallback_merge(original, accepted)
            }
            Err(err) => {
                warn!(error = %err, "reconciliation call failed, using fallback merge");
                fallback_merge(original, accepted)
            }
        }
    }
}

/// An empty reply or the no-content sentinel would lose every answer.
fn usable(reply: &str) -> bool {
    let trimmed = reply.trim();
    !trimmed.is_empty() && trimmed != NO_RESPONSE_FALLBACK
}
