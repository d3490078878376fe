//! # clarify-core
//!
//! Deterministic core for the clarify questionnaire engine.
//!
//! This crate owns everything that does NOT require an LLM call:
//! - Parsing the question source into an ordered question list
//! - The session state machine (which question is pending, correct,
//!   or needs re-asking; when the session is complete)
//! - Typed parsers for the oracle's textual reply contracts
//!   (`VALID`/`INVALID`, `OVERRIDE_VALID`, extraction lines)
//! - Content normalization of the background document
//! - The deterministic append-only reconciliation fallback
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input always produces same output
//! 2. **No LLM calls**: all oracle interaction lives in `clarify-runtime`
//! 3. **Single source of truth**: per-question status is one enum, so an
//!    index can never be "correct" and "needs re-ask" at the same time
//!
//! ## Example
//!
//! ```rust,ignore
//! use clarify_core::{parse_questions, SessionState};
//!
//! let questions = parse_questions("1. What food does he like?\n2. Favorite team?");
//! let mut session = SessionState::new(questions, "the background summary");
//! let next = session.next_question(); // index 0
//! ```

pub mod normalize;
pub mod questions;
pub mod reconcile;
pub mod session;
pub mod verdict;

// Re-export main types at crate root
pub use normalize::normalize;
pub use questions::{parse_questions, Question};
pub use reconcile::fallback_merge;
pub use session::{
    AcceptedAnswer, NextQuestion, QuestionStatus, SessionState, is_quit_sentinel,
};
pub use verdict::{
    is_non_informative, parse_extraction, parse_override, parse_verdict, Extraction, Verdict,
};
