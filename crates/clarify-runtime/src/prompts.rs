//! Prompt templates for the oracle calls.
//!
//! Each builder returns a complete prompt string. The reply formats
//! requested here are what `clarify_core::verdict` parses, so the two
//! modules change together.

use clarify_core::Question;

/// Pre-session analysis of the summary against the question list.
pub fn analysis(summary: &str, questions_source: &str) -> String {
    format!(
        "Please analyze the following summary and questions:\n\n\
         SUMMARY:\n{summary}\n\n\
         QUESTIONS:\n{questions_source}\n\n\
         Based on this analysis, please:\n\
         1. Identify what information is missing from the summary that the questions are trying to gather\n\
         2. For each question, suggest a clear way to ask it\n\
         3. Provide what type of answer is expected\n\n\
         Keep your response concise and structured. Focus on the actual topic and context provided in the summary."
    )
}

/// Cross-question attribution: which questions does this answer cover?
pub fn attribution(
    questions: &[Question],
    current_question: &str,
    answer: &str,
    summary: &str,
) -> String {
    let numbered: String = questions
        .iter()
        .map(|q| format!("{}. {}\n", q.index + 1, q.text))
        .collect();

    format!(
        "CONTEXT: {summary}\n\n\
         ALL QUESTIONS:\n{numbered}\n\
         CURRENT QUESTION ASKED: {current_question}\n\
         USER'S ANSWER: {answer}\n\n\
         Analyze the user's answer and determine:\n\n\
         1. Does the answer address the current question asked?\n\
         2. Does the answer address any OTHER questions from the list?\n\
         3. Extract specific information for each question the answer addresses.\n\n\
         Respond in this EXACT format:\n\
         CURRENT_QUESTION: [YES/NO] - [explanation]\n\
         OTHER_QUESTIONS: [List question numbers and extracted answers, or NONE]\n\n\
         Example format for OTHER_QUESTIONS:\n\
         - Question 2: [extracted answer]\n\
         - Question 5: [extracted answer]\n\
         OR\n\
         OTHER_QUESTIONS: NONE"
    )
}

/// Primary answer validation.
pub fn validation(question: &str, answer: &str, summary: &str) -> String {
    format!(
        "You are a smart validation system for interview answers. Your job is to determine if the user's answer is valid and informative.\n\n\
         CONTEXT/SUMMARY: {summary}\n\
         QUESTION: {question}\n\
         USER ANSWER: {answer}\n\n\
         VALIDATION CRITERIA:\n\n\
         1. RELEVANCE CHECK:\n\
            - Does the answer directly address what the question is asking?\n\
            - Is it related to the topic/subject in the question?\n\n\
         2. INFORMATIVENESS CHECK:\n\
            - Does the answer provide meaningful, specific information?\n\
            - Is it more than just \"yes/no\" or vague responses?\n\
            - Does it add value to understanding the topic?\n\n\
         3. CONTEXT COMPATIBILITY:\n\
            - The context might mention general knowledge without specifics\n\
            - The user's job is to provide the SPECIFIC details that fill in the gaps\n\
            - Accept reasonable answers that could logically fit the context\n\
            - Don't require exact matches - accept plausible variations\n\n\
         4. REALISTIC CHECK:\n\
            - Is the answer believable and realistic?\n\
            - For names: accept any reasonable name\n\
            - For preferences: accept reasonable options in that category\n\
            - For facts: accept plausible information\n\n\
         INSTRUCTIONS:\n\
         - Be reasonably strict about informativeness (reject vague answers)\n\
         - Be generous about variations (accept different ways of saying the same thing)\n\
         - Focus on whether the answer actually provides useful information\n\
         - Consider if this answer would help someone understand the topic better\n\n\
         Respond with either:\n\
         \"VALID: [brief explanation of why it's acceptable]\"\n\
         OR\n\
         \"INVALID: [specific reason why it's not acceptable]\""
    )
}

/// Secondary check after a primary INVALID verdict.
pub fn escalation(question: &str, answer: &str, summary: &str, rejection: &str) -> String {
    format!(
        "This is a secondary validation check. The primary validator rejected this answer, but let's double-check.\n\n\
         QUESTION: {question}\n\
         USER ANSWER: {answer}\n\
         CONTEXT: {summary}\n\
         PRIMARY REJECTION: {rejection}\n\n\
         Re-evaluate this answer with these considerations:\n\
         1. Is the answer specific and informative (not vague like \"yes/no/maybe\")?\n\
         2. Does it directly address what the question asks?\n\
         3. Is it a realistic/believable answer?\n\
         4. Would this answer help complete the missing information in the context?\n\n\
         Sometimes the primary validator is too strict. If this answer provides meaningful, specific information that addresses the question, it should be VALID even if it's not perfect.\n\n\
         ONLY respond with \"OVERRIDE_VALID: [reason]\" if you believe the primary validator was wrong and this is actually a good answer.\n\
         Otherwise respond with \"CONFIRM_INVALID: [reason]\""
    )
}

/// Rewrite the summary with the accepted answers woven in.
pub fn reconciliation(original_summary: &str, answers_block: &str) -> String {
    format!(
        "You are updating a project summary by weaving the user's specific answers DIRECTLY into the existing content. DO NOT add new sections - only enhance what's already there.\n\n\
         ORIGINAL SUMMARY:\n{original_summary}\n\n\
         USER'S ANSWERS TO QUESTIONS:\n{answers_block}\n\n\
         CRITICAL TASK:\n\
         Go through the original summary line by line. For each line, check if any of the user's answers can replace vague statements with specific details. If yes, replace that line with the specific information. If no relevant answer exists, keep the original line unchanged.\n\n\
         INTEGRATION RULES:\n\
         1. NEVER add new sections like \"More details:\" or \"Additional information:\"\n\
         2. NEVER append content at the end - only modify existing lines\n\
         3. Replace incomplete statements with specific details from answers\n\
         4. Keep the EXACT same line-by-line format\n\
         5. Maintain the casual, personal writing style\n\
         6. Fix grammar and spelling while keeping the natural tone\n\n\
         FORBIDDEN ACTIONS:\n\
         - Adding new sections or headers\n\
         - Appending content after the original summary\n\
         - Using phrases like \"More details about...\" or \"Additional information:\"\n\
         - Adding formal language\n\
         - Changing the overall structure or number of main points\n\n\
         Output ONLY the enhanced version of the original summary with specific details woven in where appropriate. Nothing more, nothing less."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question {
                index: 0,
                text: "What food does he like?".to_string(),
            },
            Question {
                index: 1,
                text: "What is his favorite team?".to_string(),
            },
        ]
    }

    #[test]
    fn test_attribution_numbers_questions_from_one() {
        let prompt = attribution(&questions(), "What food does he like?", "idli", "summary");
        assert!(prompt.contains("1. What food does he like?"));
        assert!(prompt.contains("2. What is his favorite team?"));
        assert!(prompt.contains("CURRENT_QUESTION: [YES/NO]"));
    }

    #[test]
    fn test_validation_embeds_inputs() {
        let prompt = validation("Q?", "A!", "the summary text");
        assert!(prompt.contains("QUESTION: Q?"));
        assert!(prompt.contains("USER ANSWER: A!"));
        assert!(prompt.contains("CONTEXT/SUMMARY: the summary text"));
    }

    #[test]
    fn test_escalation_carries_rejection() {
        let prompt = escalation("Q?", "A!", "ctx", "INVALID: too vague");
        assert!(prompt.contains("PRIMARY REJECTION: INVALID: too vague"));
        assert!(prompt.contains("OVERRIDE_VALID"));
    }

    #[test]
    fn test_reconciliation_forbids_appending() {
        let prompt = reconciliation("summary", "- Q: A");
        assert!(prompt.contains("ORIGINAL SUMMARY:\nsummary"));
        assert!(prompt.contains("NEVER append content"));
    }
}
