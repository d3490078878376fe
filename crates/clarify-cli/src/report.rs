//! Output record rendering.
//!
//! The final destination file carries three sections: the enhanced
//! summary, the plain-text original, and every gathered answer with
//! its timestamp.

use chrono::Local;
use clarify_runtime::SessionReport;

const RULE: &str = "==================================================";

/// Render the full output record.
pub fn render(report: &SessionReport) -> String {
    let mut out = String::new();

    out.push_str("ENHANCED SUMMARY\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Generated on: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Based on {} validated answers\n",
        report.accepted.len()
    ));
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&report.enhanced_summary);

    out.push_str("\n\n");
    out.push_str(RULE);
    out.push_str("\nORIGINAL SUMMARY (PLAIN TEXT):\n");
    out.push_str(&report.original_summary);

    out.push_str("\n\n");
    out.push_str(RULE);
    out.push_str("\nGATHERED INFORMATION:\n");
    for answer in &report.accepted {
        out.push_str(&format!("Q: {}\n", answer.question_text));
        out.push_str(&format!("A: {}\n", answer.answer_text));
        out.push_str(&format!(
            "Timestamp: {}\n\n",
            answer.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    out
}

/// Render a textual progress bar: `[*****---------------] 25.0% (1/4 questions)`.
pub fn progress_bar(answered: usize, total: usize) -> String {
    const BAR_LENGTH: usize = 20;
    let percentage = if total == 0 {
        100.0
    } else {
        answered as f64 / total as f64 * 100.0
    };
    let filled = if total == 0 {
        BAR_LENGTH
    } else {
        BAR_LENGTH * answered / total
    };
    format!(
        "[{}{}] {:.1}% ({}/{} questions)",
        "*".repeat(filled),
        "-".repeat(BAR_LENGTH - filled),
        percentage,
        answered,
        total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clarify_runtime::SessionReport;

    fn report() -> SessionReport {
        SessionReport {
            enhanced_summary: "he likes idli with sambar".to_string(),
            original_summary: "i know what food he likes".to_string(),
            accepted: vec![clarify_core::AcceptedAnswer {
                question_index: 0,
                question_text: "What food does he like?".to_string(),
                answer_text: "idli with sambar".to_string(),
                timestamp: Utc::now(),
            }],
            answered: 1,
            total: 1,
            completed: true,
        }
    }

    #[test]
    fn test_render_has_all_sections() {
        let out = render(&report());
        assert!(out.starts_with("ENHANCED SUMMARY\n"));
        assert!(out.contains("Based on 1 validated answers"));
        assert!(out.contains("ORIGINAL SUMMARY (PLAIN TEXT):\ni know what food he likes"));
        assert!(out.contains("GATHERED INFORMATION:\nQ: What food does he like?\nA: idli with sambar"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 4), "[--------------------] 0.0% (0/4 questions)");
        assert_eq!(progress_bar(1, 4), "[*****---------------] 25.0% (1/4 questions)");
        assert_eq!(progress_bar(4, 4), "[********************] 100.0% (4/4 questions)");
        assert_eq!(progress_bar(0, 0), "[********************] 100.0% (0/0 questions)");
    }
}
