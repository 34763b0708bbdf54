//! In-memory event router for tests and single-process deployments.
//!
//! Delivers events synchronously and in publish order, which keeps the
//! per-conversation ordering guarantee trivially and makes assertions
//! deterministic.
//!
//! # Panics
//!
//! Methods panic if an internal lock is poisoned. Acceptable here; a
//! production deployment routes through a broker-backed adapter instead.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::foundation::ConversationId;
use crate::domain::generation::GenerationEvent;
use crate::ports::{DeliveryError, EventRouter, GenerationEventHandler};

/// Records every published event and fans out to registered handlers.
pub struct InMemoryEventRouter {
    published: RwLock<Vec<GenerationEvent>>,
    handlers: RwLock<Vec<Arc<dyn GenerationEventHandler>>>,
}

impl InMemoryEventRouter {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Registers a consumer; every subsequent event reaches it in order.
    pub fn subscribe(&self, handler: Arc<dyn GenerationEventHandler>) {
        self.handlers
            .write()
            .expect("InMemoryEventRouter: handlers lock poisoned")
            .push(handler);
    }

    // === Test helpers ===

    /// All published events, in publish order.
    pub fn published_events(&self) -> Vec<GenerationEvent> {
        self.published
            .read()
            .expect("InMemoryEventRouter: published lock poisoned")
            .clone()
    }

    /// Events for one conversation, in publish order.
    pub fn events_for_conversation(&self, conversation_id: ConversationId) -> Vec<GenerationEvent> {
        self.published_events()
            .into_iter()
            .filter(|e| e.conversation_id() == Some(conversation_id))
            .collect()
    }

    /// Events of one type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<GenerationEvent> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventRouter: published lock poisoned")
            .len()
    }

    /// Whether an event of the given type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published_events()
            .iter()
            .any(|e| e.event_type() == event_type)
    }

    /// Clears recorded events for test isolation.
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventRouter: published lock poisoned")
            .clear();
    }
}

impl Default for InMemoryEventRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRouter for InMemoryEventRouter {
    async fn publish(&self, event: GenerationEvent) -> Result<(), DeliveryError> {
        self.published
            .write()
            .expect("InMemoryEventRouter: published lock poisoned")
            .push(event.clone());

        // Snapshot handlers so the lock is released across await points.
        let handlers: Vec<Arc<dyn GenerationEventHandler>> = self
            .handlers
            .read()
            .expect("InMemoryEventRouter: handlers lock poisoned")
            .clone();

        let mut failures = Vec::new();
        for handler in handlers {
            if let Err(err) = handler.handle(&event).await {
                failures.push(format!("{}: {}", handler.name(), err));
            }
        }

        if !failures.is_empty() {
            return Err(DeliveryError::new(failures.join(", ")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::generation::GenerationCompleted;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn completed(conversation_id: ConversationId) -> GenerationEvent {
        GenerationEvent::Completed(GenerationCompleted {
            conversation_id,
            occurred_at: Timestamp::now(),
        })
    }

    #[tokio::test]
    async fn publish_records_event() {
        let router = InMemoryEventRouter::new();
        router.publish(completed(ConversationId::new())).await.unwrap();

        assert_eq!(router.event_count(), 1);
        assert!(router.has_event("generation.completed"));
    }

    #[tokio::test]
    async fn events_filter_by_conversation() {
        let router = InMemoryEventRouter::new();
        let a = ConversationId::new();
        let b = ConversationId::new();

        router.publish(completed(a)).await.unwrap();
        router.publish(completed(b)).await.unwrap();
        router.publish(completed(a)).await.unwrap();

        assert_eq!(router.events_for_conversation(a).len(), 2);
        assert_eq!(router.events_for_conversation(b).len(), 1);
    }

    #[tokio::test]
    async fn handlers_receive_events_in_order() {
        struct Counting(Arc<AtomicUsize>);

        #[async_trait]
        impl GenerationEventHandler for Counting {
            async fn handle(&self, _: &GenerationEvent) -> Result<(), DeliveryError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            fn name(&self) -> &'static str {
                "counting"
            }
        }

        let router = InMemoryEventRouter::new();
        let count = Arc::new(AtomicUsize::new(0));
        router.subscribe(Arc::new(Counting(Arc::clone(&count))));
        router.subscribe(Arc::new(Counting(Arc::clone(&count))));

        router.publish(completed(ConversationId::new())).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn handler_failure_is_reported_with_name() {
        struct Failing;

        #[async_trait]
        impl GenerationEventHandler for Failing {
            async fn handle(&self, _: &GenerationEvent) -> Result<(), DeliveryError> {
                Err(DeliveryError::new("socket closed"))
            }
            fn name(&self) -> &'static str {
                "ws_bridge"
            }
        }

        let router = InMemoryEventRouter::new();
        router.subscribe(Arc::new(Failing));

        let err = router
            .publish(completed(ConversationId::new()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ws_bridge"));
        // Event is still recorded even when a handler fails.
        assert_eq!(router.event_count(), 1);
    }

    #[tokio::test]
    async fn clear_resets_recording() {
        let router = InMemoryEventRouter::new();
        router.publish(completed(ConversationId::new())).await.unwrap();
        router.clear();
        assert_eq!(router.event_count(), 0);
    }
}
