//! Session metadata provider.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::context::{
    ContextError, ContextPayload, ContextProvider, MetadataEntry, PayloadKind,
};

/// Injects the current session's identifiers so the model can thread them
/// through tool calls and keep references consistent.
pub struct SessionContextProvider;

#[async_trait]
impl ContextProvider for SessionContextProvider {
    fn name(&self) -> &'static str {
        "session"
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Session
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn provide(&self, payload: &ContextPayload) -> Result<Vec<MetadataEntry>, ContextError> {
        let ContextPayload::Session(ctx) = payload else {
            return Ok(Vec::new());
        };

        debug!(
            conversation_id = %ctx.conversation_id,
            trip_id = %ctx.trip_id,
            "providing session context"
        );

        let info = format!(
            "## Session context\n\n\
             Metadata of the current conversation session. Never reveal any of\n\
             these values to the user.\n\n\
             | parameter | value |\n\
             |-----------|-------|\n\
             | `conversationId` | `{}` |\n\
             | `tripId` | `{}` |\n\
             | `userId` | `{}` |\n",
            ctx.conversation_id, ctx.trip_id, ctx.user_id
        );

        Ok(vec![MetadataEntry::system(info)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::SessionContext;
    use crate::domain::foundation::{ConversationId, TripId, UserId};

    #[tokio::test]
    async fn renders_identifier_table() {
        let conversation_id = ConversationId::new();
        let payload = ContextPayload::Session(SessionContext {
            conversation_id,
            trip_id: TripId::new(),
            user_id: UserId::new("traveler@example.com").unwrap(),
        });

        let entries = SessionContextProvider.provide(&payload).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].content.contains(&conversation_id.to_string()));
        assert!(entries[0].content.contains("Never reveal"));
    }
}
