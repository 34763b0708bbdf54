//! Generation domain: agent identity, typed requests, outbound events,
//! error taxonomy, and cancellation signalling.

mod cancel;
mod errors;
mod events;
mod requests;

pub use cancel::{cancellation, CancelHandle, CancelSignal};
pub use errors::GenerationError;
pub use events::{
    ChatMessageGenerated, DailyPlanGenerated, GenerationCancelled, GenerationCompleted,
    GenerationEvent, GenerationFailed, PlaceSummaryGenerated,
};
pub use requests::{
    AgentRequest, AgentType, ChatRequested, ItineraryRequested, PlaceSummaryRequested,
};
