//! Conversation History
//!
//! Append-only log of role-tagged turns owned by a single interview session.
//! Order is conversation order: the same sequence is replayed to the
//! generation provider and written into the report transcript. There is no
//! trimming and no in-place edit; a new session starts a new history.

use crate::llm::{Message, MessageRole};

/// Ordered, append-only conversation log
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the conversation
    pub fn push(&mut self, turn: Message) {
        self.turns.push(turn);
    }

    /// All turns in conversation order
    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of candidate turns
    pub fn user_turns(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.role == MessageRole::User)
            .count()
    }

    /// Most recent turn, if any
    pub fn last(&self) -> Option<&Message> {
        self.turns.last()
    }

    /// `ROLE: text` lines, as embedded in generation prompts
    pub fn render_plain(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.label(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Numbered transcript lines for the report document
    pub fn render_numbered(&self) -> String {
        let mut out = String::new();
        for (i, turn) in self.turns.iter().enumerate() {
            out.push_str(&format!("{}. {}: {}\n", i + 1, turn.role.label(), turn.content));
        }
        out
    }
}
