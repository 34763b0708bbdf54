//! In-memory conversation history.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationMemory, ConversationTurn, MemoryError};

/// Per-conversation turn log backed by a map under a lock.
pub struct InMemoryConversationMemory {
    turns: RwLock<HashMap<ConversationId, Vec<ConversationTurn>>>,
}

impl InMemoryConversationMemory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self {
            turns: RwLock::new(HashMap::new()),
        }
    }

    /// Number of turns recorded for a conversation.
    pub fn turn_count(&self, conversation_id: ConversationId) -> usize {
        self.turns
            .read()
            .expect("InMemoryConversationMemory: lock poisoned")
            .get(&conversation_id)
            .map_or(0, Vec::len)
    }
}

impl Default for InMemoryConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationMemory for InMemoryConversationMemory {
    async fn append_turn(
        &self,
        conversation_id: ConversationId,
        turn: ConversationTurn,
    ) -> Result<(), MemoryError> {
        self.turns
            .write()
            .expect("InMemoryConversationMemory: lock poisoned")
            .entry(conversation_id)
            .or_default()
            .push(turn);
        Ok(())
    }

    async fn load_recent_turns(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, MemoryError> {
        let turns = self
            .turns
            .read()
            .expect("InMemoryConversationMemory: lock poisoned");

        let Some(history) = turns.get(&conversation_id) else {
            return Ok(Vec::new());
        };

        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;

    #[tokio::test]
    async fn appends_and_loads_in_order() {
        let memory = InMemoryConversationMemory::new();
        let id = ConversationId::new();

        memory
            .append_turn(id, ConversationTurn::new(MessageRole::User, "first"))
            .await
            .unwrap();
        memory
            .append_turn(id, ConversationTurn::new(MessageRole::Assistant, "second"))
            .await
            .unwrap();

        let turns = memory.load_recent_turns(id, 10).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "first");
        assert_eq!(turns[1].content, "second");
    }

    #[tokio::test]
    async fn limit_keeps_most_recent_turns() {
        let memory = InMemoryConversationMemory::new();
        let id = ConversationId::new();

        for i in 0..5 {
            memory
                .append_turn(
                    id,
                    ConversationTurn::new(MessageRole::User, format!("turn {i}")),
                )
                .await
                .unwrap();
        }

        let turns = memory.load_recent_turns(id, 2).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "turn 3");
        assert_eq!(turns[1].content, "turn 4");
    }

    #[tokio::test]
    async fn unknown_conversation_is_empty() {
        let memory = InMemoryConversationMemory::new();
        let turns = memory
            .load_recent_turns(ConversationId::new(), 10)
            .await
            .unwrap();
        assert!(turns.is_empty());
    }
}
