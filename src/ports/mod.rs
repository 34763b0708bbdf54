//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - model completions, blocking and streaming
//! - `EventRouter` - outbound delivery of generation events
//! - `PromptTemplateStore` - administered prompt templates
//! - `ConversationMemory` - prior-turn history per conversation
//! - `ItineraryReader` - read-only view of existing trip plans

mod ai_provider;
mod conversation_memory;
mod event_router;
mod itinerary_reader;
mod template_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, StreamChunk, TokenUsage,
};
pub use conversation_memory::{ConversationMemory, ConversationTurn, MemoryError};
pub use event_router::{DeliveryError, EventRouter, GenerationEventHandler};
pub use itinerary_reader::{
    DailyPlanOutline, ItineraryReadError, ItineraryReader, ScheduledPlaceOutline, TripPlanDetails,
};
pub use template_store::{PromptTemplate, PromptTemplateStore, TemplateError};
