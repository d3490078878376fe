//! Cross-question attribution.
//!
//! A single answer often carries information for questions beyond the
//! one currently asked. The attributor asks the oracle which questions
//! an answer addresses and extracts the per-question text.

use std::sync::Arc;
use tracing::debug;

use clarify_core::{parse_extraction, Extraction, Question};

use crate::gateway::Gateway;
use crate::prompts;

/// Maps an answer onto the questions it addresses.
pub struct Attributor {
    gateway: Arc<Gateway>,
}

impl Attributor {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Ask the oracle which questions `answer` addresses.
    ///
    /// A gateway failure yields an empty [`Extraction`]; the caller
    /// falls back to direct validation of the current question.
    pub async fn attribute(
        &self,
        questions: &[Question],
        current_question: &str,
        answer: &str,
        summary: &str,
    ) -> Extraction {
        let prompt = prompts::attribution(questions, current_question, answer, summary);
        match self.gateway.send(&prompt).await {
            Ok(reply) => parse_extraction(&reply, questions.len()),
            Err(err) => {
                debug!(error = %err, "attribution call failed");
                Extraction::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::providers::{LlmProvider, ProviderError};
    use async_trait::async_trait;

    struct FixedProvider(Result<String, ()>);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(ProviderError::Timeout),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn attributor(reply: Result<String, ()>) -> Attributor {
        let gateway = Arc::new(Gateway::new(
            Arc::new(FixedProvider(reply)),
            RetryPolicy::default(),
        ));
        Attributor::new(gateway)
    }

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|index| Question {
                index,
                text: format!("question {}", index + 1),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_extracts_current_and_side_answers() {
        let reply = "CURRENT_QUESTION: YES - directly answered\n\
                     OTHER_QUESTIONS:\n\
                     - Question 2: his team is csk\n\
                     - Question 5: the number is 7\n";
        let a = attributor(Ok(reply.to_string()));

        let extraction = a
            .attribute(&questions(5), "question 1", "answer", "ctx")
            .await;
        assert!(extraction.current_satisfied);
        assert_eq!(
            extraction.other,
            vec![
                (1, "his team is csk".to_string()),
                (4, "the number is 7".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_yields_empty_extraction() {
        let a = attributor(Err(()));

        let extraction = a
            .attribute(&questions(3), "question 1", "answer", "ctx")
            .await;
        assert!(!extraction.current_satisfied);
        assert!(extraction.other.is_empty());
    }
}
