//! Prompt construction for meeting summaries.

use super::ChatMessage;

pub const SYSTEM_PROMPT: &str = "You are an expert meeting summarizer. Create a clear, structured summary based on the user's custom instruction. \
Format the response in a clean, readable way that matches the user's requirements.";

/// Builds the user turn. Both inputs are inserted verbatim.
pub fn user_prompt(custom_instruction: &str, transcript: &str) -> String {
    format!(
        "Custom Instruction: {}\n\nTranscript:\n{}\n\nPlease provide a summary based on the custom instruction above.",
        custom_instruction, transcript
    )
}

/// The fixed two-message conversation sent upstream: system, then user.
pub fn build_messages(custom_instruction: &str, transcript: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(custom_instruction, transcript)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_order_and_roles() {
        let messages = build_messages("Bullet points", "Alice: hi");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_user_prompt_is_verbatim() {
        let transcript = "Bob: {braces} and \"quotes\"\nCarol: <tags>";
        let prompt = user_prompt("List {action items}", transcript);

        assert!(prompt.starts_with("Custom Instruction: List {action items}\n"));
        assert!(prompt.contains(&format!("Transcript:\n{}\n", transcript)));
    }

    #[test]
    fn test_empty_instruction_is_allowed() {
        let prompt = user_prompt("", "Dave: ok");
        assert!(prompt.starts_with("Custom Instruction: \n"));
    }

    #[test]
    fn test_long_transcript_is_not_truncated() {
        let transcript = "word ".repeat(50_000);
        let prompt = user_prompt("Summarize", &transcript);
        assert!(prompt.contains(&transcript));
    }
}
