//! Deterministic reconciliation fallback.
//!
//! When the oracle cannot rewrite the document (outage, empty reply),
//! accepted answers are appended in a clearly delimited block instead.
//! Collected answers are never silently dropped.

use crate::session::AcceptedAnswer;

/// Merge accepted answers into the document without the oracle.
///
/// With no accepted answers the document is returned byte-for-byte
/// unchanged. Otherwise every question/answer pair is appended verbatim
/// under a "More details" block.
pub fn fallback_merge(original: &str, accepted: &[AcceptedAnswer]) -> String {
    if accepted.is_empty() {
        return original.to_string();
    }

    let mut merged = String::with_capacity(original.len() + accepted.len() * 64);
    merged.push_str(original);
    merged.push_str("\n\nMore details:\n");
    for qa in accepted {
        merged.push_str(&format!("- {}: {}\n", qa.question_text, qa.answer_text));
    }
    merged
}
