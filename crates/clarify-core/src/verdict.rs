//! Typed parsers for the oracle's textual reply contracts.
//!
//! The oracle replies in loose prefix-tagged text (`VALID: ...`,
//! `INVALID: ...`, `OVERRIDE_VALID: ...`, and the two-field extraction
//! format). That contract is fragile, so every piece of prefix sniffing
//! lives in this one module and returns a typed result; nothing else in
//! the workspace inspects raw oracle text.

use tracing::debug;

/// Typed validation verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The answer was judged relevant and informative.
    Valid(String),

    /// The answer was rejected, with the oracle's reason.
    Invalid(String),
}

impl Verdict {
    /// True for `Verdict::Valid`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }

    /// The explanation attached to either verdict.
    pub fn reason(&self) -> &str {
        match self {
            Verdict::Valid(r) | Verdict::Invalid(r) => r,
        }
    }
}

/// Result of attributing one free-text answer across the question
/// list. Transient; consumed by the state machine and discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Whether the answer addresses the currently-asked question.
    pub current_satisfied: bool,

    /// `(question_index, extracted_text)` pairs for other questions,
    /// in reply order. Duplicate indices are possible.
    pub other: Vec<(usize, String)>,
}

/// Answers that carry no information and are rejected without an
/// oracle round-trip. Compared after trimming and lowercasing.
const NON_INFORMATIVE: &[&str] = &[
    "i dont know",
    "i don't know",
    "idk",
    "not sure",
    "no idea",
    "dont know",
    "no",
    "yes",
    "maybe",
    "unknown",
];

/// Pre-filter: true when an answer is empty, a stock non-answer, or
/// shorter than 2 characters.
pub fn is_non_informative(answer: &str) -> bool {
    let clean = answer.trim().to_lowercase();
    clean.chars().count() < 2 || NON_INFORMATIVE.contains(&clean.as_str())
}

/// Parse a primary validation reply.
///
/// The reply is expected to begin with the literal token `VALID` or
/// `INVALID` (case-insensitive), usually followed by `: reason`.
/// Returns `None` for anything else; the caller decides what a
/// non-conforming reply means (it is always treated conservatively).
pub fn parse_verdict(reply: &str) -> Option<Verdict> {
    let reply = reply.trim();
    if starts_with_token(reply, "INVALID") {
        Some(Verdict::Invalid(reason_after(reply, "INVALID")))
    } else if starts_with_token(reply, "VALID") {
        Some(Verdict::Valid(reason_after(reply, "VALID")))
    } else {
        debug!(head = %head(reply), "unrecognized verdict reply");
        None
    }
}

/// Parse a secondary (reconsideration) reply.
///
/// Returns the override explanation iff the reply begins with the
/// literal token `OVERRIDE_VALID`; any other reply keeps the primary
/// rejection.
pub fn parse_override(reply: &str) -> Option<String> {
    let reply = reply.trim();
    if starts_with_token(reply, "OVERRIDE_VALID") {
        Some(reason_after(reply, "OVERRIDE_VALID"))
    } else {
        None
    }
}

/// Parse an attribution reply into an [`Extraction`].
///
/// Scans line by line:
/// - `CURRENT_QUESTION:` sets `current_satisfied` iff the uppercased
///   line contains `YES`
/// - `- Question <n>: <text>` contributes a pair (1-based `n` converted
///   to 0-based); malformed numbers and indices outside
///   `0..question_count` are dropped silently
///
/// No ordering is required and duplicates are kept; partial extraction
/// is expected and tolerated.
pub fn parse_extraction(reply: &str, question_count: usize) -> Extraction {
    let mut extraction = Extraction::default();

    for line in reply.lines() {
        let line = line.trim();

        if line.starts_with("CURRENT_QUESTION:") {
            if line.to_uppercase().contains("YES") {
                extraction.current_satisfied = true;
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("- Question") {
            let Some((number, text)) = rest.split_once(": ") else {
                debug!(%line, "dropping extraction line without separator");
                continue;
            };
            match number.trim().parse::<usize>() {
                Ok(n) if (1..=question_count).contains(&n) => {
                    extraction.other.push((n - 1, text.trim().to_string()));
                }
                Ok(n) => {
                    debug!(number = n, question_count, "dropping out-of-range extraction");
                }
                Err(_) => {
                    debug!(%line, "dropping extraction line with malformed number");
                }
            }
        }
    }

    extraction
}

/// Case-insensitive check that `reply` begins with `token`.
fn starts_with_token(reply: &str, token: &str) -> bool {
    reply
        .get(..token.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(token))
}

/// The explanation after a leading token, with any `:` separator and
/// surrounding whitespace removed.
fn reason_after(reply: &str, token: &str) -> String {
    reply[token.len()..]
        .trim_start_matches([':', '-', ' '])
        .trim()
        .to_string()
}

fn head(reply: &str) -> String {
    reply.chars().take(24).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_filter_rejects_stock_answers() {
        assert!(is_non_informative(""));
        assert!(is_non_informative("   "));
        assert!(is_non_informative("x"));
        assert!(is_non_informative("idk"));
        assert!(is_non_informative("  I Don't Know  "));
        assert!(is_non_informative("i dont know"));
        assert!(is_non_informative("MAYBE"));
    }

    #[test]
    fn test_pre_filter_accepts_informative_answers() {
        assert!(!is_non_informative("idli with sambar"));
        assert!(!is_non_informative("csk"));
        assert!(!is_non_informative("42069"));
    }

    #[test]
    fn test_parse_valid_verdict() {
        let v = parse_verdict("VALID: specific Indian dish").unwrap();
        assert_eq!(v, Verdict::Valid("specific Indian dish".to_string()));
        assert!(v.is_valid());
    }

    #[test]
    fn test_parse_invalid_verdict() {
        let v = parse_verdict("INVALID: too vague").unwrap();
        assert_eq!(v, Verdict::Invalid("too vague".to_string()));
        assert!(!v.is_valid());
    }

    #[test]
    fn test_parse_verdict_case_insensitive_prefix() {
        assert!(parse_verdict("valid - looks reasonable").unwrap().is_valid());
        assert!(!parse_verdict("Invalid: nope").unwrap().is_valid());
    }

    #[test]
    fn test_parse_verdict_rejects_garbage() {
        assert_eq!(parse_verdict("I think this answer is fine"), None);
        assert_eq!(parse_verdict(""), None);
        assert_eq!(parse_verdict("VAL"), None);
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("OVERRIDE_VALID: primary was too strict"),
            Some("primary was too strict".to_string())
        );
        assert_eq!(parse_override("CONFIRM_INVALID: still vague"), None);
        assert_eq!(parse_override(""), None);
    }

    #[test]
    fn test_parse_extraction_full_reply() {
        let reply = "\
CURRENT_QUESTION: YES - the answer names the dish
OTHER_QUESTIONS:
- Question 2: CSK
- Question 5: Chennai";
        let e = parse_extraction(reply, 5);
        assert!(e.current_satisfied);
        assert_eq!(
            e.other,
            vec![(1, "CSK".to_string()), (4, "Chennai".to_string())]
        );
    }

    #[test]
    fn test_parse_extraction_no_and_none() {
        let reply = "CURRENT_QUESTION: NO - unrelated\nOTHER_QUESTIONS: NONE";
        let e = parse_extraction(reply, 3);
        assert!(!e.current_satisfied);
        assert!(e.other.is_empty());
    }

    #[test]
    fn test_parse_extraction_drops_malformed_lines() {
        let reply = "\
CURRENT_QUESTION: YES
- Question two: not a number
- Question 9: out of range
- Question 1
- Question 3: kept";
        let e = parse_extraction(reply, 3);
        assert!(e.current_satisfied);
        assert_eq!(e.other, vec![(2, "kept".to_string())]);
    }

    #[test]
    fn test_parse_extraction_keeps_duplicates() {
        let reply = "- Question 2: first\n- Question 2: second";
        let e = parse_extraction(reply, 4);
        assert_eq!(
            e.other,
            vec![(1, "first".to_string()), (1, "second".to_string())]
        );
    }

    #[test]
    fn test_parse_extraction_empty_reply() {
        assert_eq!(parse_extraction("", 3), Extraction::default());
    }
}
