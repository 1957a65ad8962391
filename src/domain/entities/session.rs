use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const HEADER_MAX_CHARS: usize = 30;

/// One persisted conversation, as shown in the history sidebar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub conversation_id: Uuid,
    pub header: String,
    pub created_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

impl ChatSession {
    /// Creates a session titled after the opening message, truncated for the
    /// sidebar.
    pub fn new(first_message: &str) -> Self {
        Self {
            conversation_id: Uuid::new_v4(),
            header: truncate_header(first_message),
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    /// Records one full user/assistant exchange. Both turns land together:
    /// a failed generation must never leave a dangling user-only turn.
    pub fn record_exchange(&mut self, user_content: &str, assistant_content: &str) {
        let now = Utc::now();
        self.turns.push(Turn {
            role: TurnRole::Human,
            content: user_content.to_string(),
            created_at: now,
        });
        self.turns.push(Turn {
            role: TurnRole::Assistant,
            content: assistant_content.to_string(),
            created_at: now,
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Human,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Assistant => "assistant",
        }
    }
}

fn truncate_header(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= HEADER_MAX_CHARS {
        trimmed.to_string()
    } else {
        let mut header: String = trimmed.chars().take(HEADER_MAX_CHARS).collect();
        header.push_str("...");
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_header_kept_verbatim() {
        let session = ChatSession::new("Cheap flights?");
        assert_eq!(session.header, "Cheap flights?");
    }

    #[test]
    fn test_long_header_truncated_with_ellipsis() {
        let session =
            ChatSession::new("Where should I go for a two week summer holiday with kids?");
        assert_eq!(session.header.chars().count(), HEADER_MAX_CHARS + 3);
        assert!(session.header.ends_with("..."));
    }

    #[test]
    fn test_record_exchange_appends_both_turns() {
        let mut session = ChatSession::new("hello");
        session.record_exchange("hello", "Hi traveler!");

        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].role, TurnRole::Human);
        assert_eq!(session.turns[1].role, TurnRole::Assistant);
        assert_eq!(session.turns[1].content, "Hi traveler!");
    }
}
