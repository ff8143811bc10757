//! Prompt builder for follow-up questions.

use crate::session::{Session, Turn};
use crate::summarizer::truncate_to_chars;

/// Role instruction sent as the system preamble.
pub const QA_PREAMBLE: &str = "You are a helpful assistant answering follow-up questions about a piece of content the user has already had summarized. Answer using the content, summary and key insights below. If the answer is not in the content, say so plainly instead of guessing.";

/// Build the user prompt for a question about `session`.
///
/// Only the last `max_history_turns` turns are rendered; the content is
/// cut to `max_content_chars` characters.
#[must_use]
pub fn build_prompt(
    session: &Session,
    question: &str,
    max_history_turns: usize,
    max_content_chars: usize,
) -> String {
    let noun = session.content_type.prompt_noun();
    let history = session.recent_turns(max_history_turns);
    let content = truncate_to_chars(&session.content, max_content_chars);

    let mut out = String::with_capacity(content.len() + 512);

    out.push_str("[SUMMARY]\n");
    out.push_str(&session.summary.summary);
    out.push('\n');

    out.push_str("\n[KEY_INSIGHTS]\n");
    for insight in &session.summary.key_insights {
        out.push_str("- ");
        out.push_str(insight);
        out.push('\n');
    }

    out.push_str("\n[FULL_");
    out.push_str(&noun.replace(' ', "_").to_ascii_uppercase());
    out.push_str("]\n");
    out.push_str(&content);
    out.push('\n');

    out.push_str("\n[CONVERSATION_HISTORY]\n");
    if history.is_empty() {
        out.push_str("(none)\n");
    }
    for turn in history {
        render_turn(&mut out, turn);
    }

    out.push_str("\n[QUESTION]\n");
    out.push_str(question.trim());
    out.push('\n');

    out
}

fn render_turn(out: &mut String, turn: &Turn) {
    out.push_str("User: ");
    out.push_str(&turn.question);
    out.push_str("\nAssistant: ");
    out.push_str(&turn.answer);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ContentKind;
    use crate::session::SessionId;
    use crate::summarizer::Summary;

    fn session(kind: ContentKind, turns: usize) -> Session {
        let mut session = Session::new(
            SessionId::new(),
            "The full original text.",
            kind,
            Summary {
                summary: "Short summary.".to_string(),
                key_insights: vec!["First insight".to_string(), "Second insight".to_string()],
            },
        );
        for i in 0..turns {
            session.history.push(Turn::new(format!("question {i}"), format!("answer {i}")));
        }
        session
    }

    #[test]
    fn test_prompt_contains_all_sections() {
        let prompt = build_prompt(&session(ContentKind::Article, 1), "What else?", 10, 1000);

        assert!(prompt.contains("[SUMMARY]\nShort summary.\n"));
        assert!(prompt.contains("- First insight\n- Second insight\n"));
        assert!(prompt.contains("[FULL_ARTICLE]\nThe full original text.\n"));
        assert!(prompt.contains("User: question 0\nAssistant: answer 0\n"));
        assert!(prompt.ends_with("[QUESTION]\nWhat else?\n"));
    }

    #[test]
    fn test_prompt_without_history() {
        let prompt = build_prompt(&session(ContentKind::Youtube, 0), "Why?", 10, 1000);
        assert!(prompt.contains("[CONVERSATION_HISTORY]\n(none)\n"));
        assert!(prompt.contains("[FULL_VIDEO_TRANSCRIPT]\n"));
    }

    #[test]
    fn test_history_is_windowed() {
        let prompt = build_prompt(&session(ContentKind::Article, 5), "Next?", 2, 1000);
        assert!(!prompt.contains("question 2"));
        assert!(prompt.contains("question 3"));
        assert!(prompt.contains("question 4"));
    }

    #[test]
    fn test_content_is_truncated() {
        let prompt = build_prompt(&session(ContentKind::Article, 0), "?", 10, 8);
        assert!(prompt.contains("[FULL_ARTICLE]\nThe full\n"));
    }
}
