//! The session state machine.
//!
//! A session owns an ordered question list, one status per question,
//! and the append-only list of accepted answers. All mutation goes
//! through the transition methods here; `Correct` is terminal and can
//! never be revoked within a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::questions::Question;

/// Per-question status. One enum per index is the single source of
/// truth, so an index can never be simultaneously correct and marked
/// for re-asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionStatus {
    /// Never attempted.
    Unasked,

    /// Validated answer accepted. Terminal.
    Correct,

    /// Attempted and rejected; will be re-asked.
    Incorrect,
}

/// An answer accepted for a question. Appended exactly once per
/// question, the first time it validates; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedAnswer {
    pub question_index: usize,
    pub question_text: String,
    pub answer_text: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of next-question selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    /// Present this question next.
    Ask {
        index: usize,
        text: String,
        /// True when the question was previously answered incorrectly.
        is_retry: bool,
    },

    /// Every question is `Correct`; the session is done.
    Complete,
}

/// The aggregate session root. Exactly one live instance per session;
/// exclusively owned and mutated by its orchestrator.
#[derive(Debug, Clone)]
pub struct SessionState {
    questions: Vec<Question>,
    status: Vec<QuestionStatus>,
    attempts: Vec<u32>,
    accepted: Vec<AcceptedAnswer>,
    summary: String,
    current: Option<usize>,
}

impl SessionState {
    /// Create a fresh session from a parsed question list and the
    /// normalized background document.
    pub fn new(questions: Vec<Question>, summary: impl Into<String>) -> Self {
        let n = questions.len();
        Self {
            questions,
            status: vec![QuestionStatus::Unasked; n],
            attempts: vec![0; n],
            accepted: Vec::new(),
            summary: summary.into(),
            current: None,
        }
    }

    /// The full question list, in source order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The normalized background document.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Answers accepted so far, in acceptance order.
    pub fn accepted(&self) -> &[AcceptedAnswer] {
        &self.accepted
    }

    /// Status of a question index.
    pub fn status(&self, index: usize) -> Option<QuestionStatus> {
        self.status.get(index).copied()
    }

    /// Attempts recorded for a question index.
    pub fn attempts(&self, index: usize) -> u32 {
        self.attempts.get(index).copied().unwrap_or(0)
    }

    /// The index currently being presented, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Number of questions answered correctly.
    pub fn answered_count(&self) -> usize {
        self.status
            .iter()
            .filter(|s| **s == QuestionStatus::Correct)
            .count()
    }

    /// Total number of questions in the session.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// True once every question is `Correct`.
    pub fn is_complete(&self) -> bool {
        self.status.iter().all(|s| *s == QuestionStatus::Correct)
    }

    /// Select the next question to present and make it current.
    ///
    /// Selection is deterministic:
    /// 1. lowest index in `Incorrect` (re-asks take strict priority)
    /// 2. otherwise lowest index in `Unasked`
    /// 3. otherwise the session is complete
    pub fn next_question(&mut self) -> NextQuestion {
        let pick = self
            .status
            .iter()
            .position(|s| *s == QuestionStatus::Incorrect)
            .or_else(|| {
                self.status
                    .iter()
                    .position(|s| *s == QuestionStatus::Unasked)
            });

        match pick {
            Some(index) => {
                let is_retry = self.status[index] == QuestionStatus::Incorrect;
                self.current = Some(index);
                NextQuestion::Ask {
                    index,
                    text: self.questions[index].text.clone(),
                    is_retry,
                }
            }
            None => {
                self.current = None;
                NextQuestion::Complete
            }
        }
    }

    /// Count an attempt against a question.
    pub fn record_attempt(&mut self, index: usize) {
        if let Some(a) = self.attempts.get_mut(index) {
            *a += 1;
        }
    }

    /// Accept an answer for a question: append the `AcceptedAnswer`
    /// and mark the index `Correct`.
    ///
    /// Returns false without any state change if the index is out of
    /// range or already `Correct` — an index never appears twice in
    /// the accepted list.
    pub fn record_correct(&mut self, index: usize, answer: &str) -> bool {
        let Some(status) = self.status.get_mut(index) else {
            return false;
        };
        if *status == QuestionStatus::Correct {
            return false;
        }

        *status = QuestionStatus::Correct;
        self.accepted.push(AcceptedAnswer {
            question_index: index,
            question_text: self.questions[index].text.clone(),
            answer_text: answer.to_string(),
            timestamp: Utc::now(),
        });
        true
    }

    /// Mark a question for re-asking. No-op if the index is out of
    /// range or already `Correct` — `Correct` is terminal.
    pub fn record_incorrect(&mut self, index: usize) {
        if let Some(status) = self.status.get_mut(index) {
            if *status != QuestionStatus::Correct {
                *status = QuestionStatus::Incorrect;
            }
        }
    }
}

/// True when a submitted answer is one of the quit sentinels that end
/// the session early (`quit`, `exit`, `stop`; case-insensitive).
pub fn is_quit_sentinel(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "quit" | "exit" | "stop"
    )
}
