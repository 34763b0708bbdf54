//! EventRouter port - outbound delivery boundary for generation events.
//!
//! The domain publishes typed [`GenerationEvent`]s without knowing who
//! consumes them (persistence, live-connection fan-out, both).
//!
//! # Cardinality
//!
//! Exactly one producer exists per conversation generation; any number of
//! consumers may be attached by the adapter. Within one conversation,
//! events are published in order by the single generation task and the
//! adapter must preserve that order per consumer. Across conversations
//! there is no ordering guarantee.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::generation::GenerationEvent;

/// Failure to hand an event to downstream consumers.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("event delivery failed: {0}")]
    Delivery(String),
}

impl DeliveryError {
    /// Creates a delivery error.
    pub fn new(message: impl Into<String>) -> Self {
        DeliveryError::Delivery(message.into())
    }
}

/// Port for publishing generation events.
#[async_trait]
pub trait EventRouter: Send + Sync {
    /// Publishes one event; ownership transfers to the router.
    async fn publish(&self, event: GenerationEvent) -> Result<(), DeliveryError>;
}

/// A downstream consumer of generation events.
#[async_trait]
pub trait GenerationEventHandler: Send + Sync {
    /// Handles one event. Errors are the adapter's to surface.
    async fn handle(&self, event: &GenerationEvent) -> Result<(), DeliveryError>;

    /// Handler name for diagnostics.
    fn name(&self) -> &'static str;
}
