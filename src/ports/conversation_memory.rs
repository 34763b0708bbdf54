//! ConversationMemory port - prior-turn history for chat generations.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ConversationId, Timestamp};

use super::MessageRole;

/// One recorded turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: MessageRole,
    pub content: String,
    pub recorded_at: Timestamp,
}

impl ConversationTurn {
    /// Creates a turn recorded now.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            recorded_at: Timestamp::now(),
        }
    }
}

/// Memory store failures.
#[derive(Debug, Clone, Error)]
pub enum MemoryError {
    #[error("conversation memory error: {0}")]
    Storage(String),
}

/// Port for the external conversation history store.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// Appends one turn to a conversation's history.
    async fn append_turn(
        &self,
        conversation_id: ConversationId,
        turn: ConversationTurn,
    ) -> Result<(), MemoryError>;

    /// Loads the most recent turns, oldest first, at most `limit`.
    async fn load_recent_turns(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, MemoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_records_creation_time() {
        let before = Timestamp::now();
        let turn = ConversationTurn::new(MessageRole::User, "hello");
        assert!(!turn.recorded_at.is_before(&before));
        assert_eq!(turn.content, "hello");
    }
}
