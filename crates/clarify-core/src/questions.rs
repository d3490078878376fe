//! Question-list parsing from the raw question source.
//!
//! One logical question per non-empty, non-comment line. Lines that
//! start with a digit have their enumeration marker stripped through
//! the first `.` ("3. What team?" becomes "What team?"). A question's
//! position in the parsed list is its stable identity for the rest of
//! the session.

use serde::{Deserialize, Serialize};

/// A single parsed question. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 0-based position in the source list; stable session identity.
    pub index: usize,

    /// The question text with any enumeration marker stripped.
    pub text: String,
}

/// Parse the newline-delimited question source.
///
/// Parsing rules:
/// - blank lines are skipped
/// - lines starting with `#` are comments and skipped
/// - a line whose first character is a digit is stripped through the
///   first `.` and trimmed; a line with no `.` is used as-is
/// - anything left empty after stripping is skipped
pub fn parse_questions(source: &str) -> Vec<Question> {
    let mut questions = Vec::new();

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let text = if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            match line.split_once('.') {
                Some((_, rest)) => rest.trim(),
                None => line,
            }
        } else {
            line
        };

        if !text.is_empty() {
            questions.push(Question {
                index: questions.len(),
                text: text.to_string(),
            });
        }
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_lines() {
        let questions = parse_questions("What food does he like?\nWhat is his team?");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].index, 0);
        assert_eq!(questions[0].text, "What food does he like?");
        assert_eq!(questions[1].index, 1);
    }

    #[test]
    fn test_strips_enumeration_markers() {
        let questions = parse_questions("1. First question?\n12. Twelfth question?");
        assert_eq!(questions[0].text, "First question?");
        assert_eq!(questions[1].text, "Twelfth question?");
    }

    #[test]
    fn test_skips_blanks_and_comments() {
        let source = "# questionnaire for the summary\n\nReal question?\n\n# trailing note\n";
        let questions = parse_questions(source);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Real question?");
    }

    #[test]
    fn test_digit_line_without_dot_kept_verbatim() {
        let questions = parse_questions("42 is the answer to what?");
        assert_eq!(questions[0].text, "42 is the answer to what?");
    }

    #[test]
    fn test_marker_only_line_dropped() {
        // "3." strips to nothing and must not become an empty question
        let questions = parse_questions("3.\nActual question?");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Actual question?");
        assert_eq!(questions[0].index, 0);
    }

    #[test]
    fn test_indices_are_dense_and_ordered() {
        let source = "# header\n1. A?\n\n2. B?\n# note\n3. C?";
        let questions = parse_questions(source);
        let indices: Vec<usize> = questions.iter().map(|q| q.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
