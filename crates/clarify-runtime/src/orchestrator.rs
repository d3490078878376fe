//! Session orchestration.
//!
//! Owns the single live [`SessionState`] and drives every turn:
//! pre-screening the raw answer, attributing it across the question
//! list, validating the current question and any side-answers, and
//! finally reconciling the summary.
//!
//! Oracle failures never surface here as errors. The validator and
//! attributor absorb them into conservative results, so a total
//! backend outage only slows convergence by forcing re-asks.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use clarify_core::{
    is_non_informative, is_quit_sentinel, normalize, parse_questions, AcceptedAnswer, NextQuestion,
    SessionState,
};

use crate::analysis::Analyzer;
use crate::attributor::Attributor;
use crate::config::CacheConfig;
use crate::gateway::Gateway;
use crate::reconciler::Reconciler;
use crate::validator::Validator;

/// Caller misuse: an action invoked before a session exists.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session; start one first")]
    NotStarted,
}

/// What `start` learned before the first question.
#[derive(Debug)]
pub struct StartInfo {
    /// Oracle's description of the information gap, when reachable.
    pub analysis: Option<String>,
    pub total_questions: usize,
}

/// A side-answer processed during a turn: information the answer
/// carried for a question other than the one asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideAnswer {
    pub index: usize,
    pub question_text: String,
    pub answer_text: String,
    pub accepted: bool,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The current question is now `Correct`.
    Accepted {
        reason: String,
        side_answers: Vec<SideAnswer>,
    },

    /// The current question was marked `Incorrect` and will be re-asked.
    Rejected {
        reason: String,
        side_answers: Vec<SideAnswer>,
    },

    /// Screened out before any oracle call; no state changed, ask again.
    RePrompt { reason: String },

    /// The user submitted a quit sentinel; the session ended early.
    Quit,

    /// No question is pending; every question is already `Correct`.
    Complete,
}

/// Final session output, ready for the sink.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub enhanced_summary: String,
    pub original_summary: String,
    pub accepted: Vec<AcceptedAnswer>,
    pub answered: usize,
    pub total: usize,
    pub completed: bool,
}

/// Drives one question-answer session end to end.
pub struct SessionOrchestrator {
    analyzer: Analyzer,
    validator: Validator,
    attributor: Attributor,
    reconciler: Reconciler,
    session: Option<SessionState>,
    quit: bool,
}

impl SessionOrchestrator {
    pub fn new(gateway: Arc<Gateway>, cache: CacheConfig) -> Self {
        Self {
            analyzer: Analyzer::new(gateway.clone()),
            validator: Validator::new(gateway.clone(), cache),
            attributor: Attributor::new(gateway.clone()),
            reconciler: Reconciler::new(gateway),
            session: None,
            quit: false,
        }
    }

    /// Start a fresh session from raw inputs, replacing any previous
    /// one. The summary is normalized to plain text and the question
    /// source parsed into the ordered question list.
    pub async fn start(&mut self, raw_summary: &str, questions_source: &str) -> StartInfo {
        let summary = normalize(raw_summary);
        let questions = parse_questions(questions_source);
        let total_questions = questions.len();

        info!(total_questions, "session started");
        let analysis = self.analyzer.analyze(&summary, questions_source).await;

        self.session = Some(SessionState::new(questions, summary));
        self.quit = false;

        StartInfo {
            analysis,
            total_questions,
        }
    }

    /// Select and present the next question.
    pub fn next_question(&mut self) -> Result<NextQuestion, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotStarted)?;
        Ok(session.next_question())
    }

    /// Progress so far: (answered, total).
    pub fn progress(&self) -> Result<(usize, usize), SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NotStarted)?;
        Ok((session.answered_count(), session.total()))
    }

    /// True once every question is `Correct`.
    pub fn is_complete(&self) -> Result<bool, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NotStarted)?;
        Ok(session.is_complete())
    }

    /// True when the user quit before completion.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Process one submitted answer for the current question.
    pub async fn submit_answer(&mut self, answer: &str) -> Result<SubmitOutcome, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotStarted)?;

        let current = match session.current_index() {
            Some(index) => index,
            // Caller skipped next_question; select here so a bare
            // submit still lands on the right question
            None => match session.next_question() {
                NextQuestion::Ask { index, .. } => index,
                NextQuestion::Complete => return Ok(SubmitOutcome::Complete),
            },
        };

        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return Ok(SubmitOutcome::RePrompt {
                reason: "Empty answer".to_string(),
            });
        }
        if is_quit_sentinel(trimmed) {
            info!("quit requested, ending session early");
            self.quit = true;
            return Ok(SubmitOutcome::Quit);
        }
        // Screened before attribution: no attempt is counted and the
        // question stays Unasked
        if is_non_informative(trimmed) {
            return Ok(SubmitOutcome::RePrompt {
                reason: "Answer is too vague or uninformative".to_string(),
            });
        }

        session.record_attempt(current);

        let questions = session.questions().to_vec();
        let summary = session.summary().to_string();
        let current_text = questions[current].text.clone();

        let extraction = self
            .attributor
            .attribute(&questions, &current_text, trimmed, &summary)
            .await;

        if !extraction.current_satisfied {
            // Attribution said no (or failed); fall back to judging
            // the raw answer directly against the current question
            debug!(index = current, "attribution fallback to direct validation");
        }

        let verdict = self.validator.validate(&current_text, trimmed, &summary).await;
        let reason = verdict.reason().to_string();

        let session = self.session.as_mut().ok_or(SessionError::NotStarted)?;
        let accepted = verdict.is_valid();
        if accepted {
            session.record_correct(current, trimmed);
            info!(index = current, "answer accepted");
        } else {
            session.record_incorrect(current);
            info!(index = current, reason = %reason, "answer rejected");
        }

        // Side-answers: duplicates collapse to the last extraction for
        // each index, then each candidate is validated independently.
        // They never touch the current question's status.
        let mut side_answers = Vec::new();
        for (index, text) in dedupe_last_wins(extraction.other) {
            if index == current {
                continue;
            }
            let session_ref = self.session.as_ref().ok_or(SessionError::NotStarted)?;
            if session_ref.status(index) == Some(clarify_core::QuestionStatus::Correct) {
                continue;
            }
            let question_text = questions[index].text.clone();
            let verdict = self.validator.validate(&question_text, &text, &summary).await;

            let session = self.session.as_mut().ok_or(SessionError::NotStarted)?;
            let side_accepted = verdict.is_valid();
            if side_accepted {
                session.record_correct(index, &text);
                info!(index, "side-answer accepted");
            } else {
                session.record_incorrect(index);
                debug!(index, "side-answer rejected");
            }
            side_answers.push(SideAnswer {
                index,
                question_text,
                answer_text: text,
                accepted: side_accepted,
            });
        }

        Ok(if accepted {
            SubmitOutcome::Accepted {
                reason,
                side_answers,
            }
        } else {
            SubmitOutcome::Rejected {
                reason,
                side_answers,
            }
        })
    }

    /// Reconcile and produce the final report. The session stays
    /// queryable afterwards.
    pub async fn finalize(&self) -> Result<SessionReport, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NotStarted)?;

        let enhanced_summary = self
            .reconciler
            .reconcile(session.summary(), session.accepted())
            .await;

        Ok(SessionReport {
            enhanced_summary,
            original_summary: session.summary().to_string(),
            accepted: session.accepted().to_vec(),
            answered: session.answered_count(),
            total: session.total(),
            completed: session.is_complete(),
        })
    }
}

/// Collapse duplicate indices, keeping the last extraction for each at
/// the position of its last occurrence.
fn dedupe_last_wins(pairs: Vec<(usize, String)>) -> Vec<(usize, String)> {
    let mut out: Vec<(usize, String)> = Vec::new();
    for (index, text) in pairs {
        out.retain(|(i, _)| *i != index);
        out.push((index, text));
    }
    out
}
