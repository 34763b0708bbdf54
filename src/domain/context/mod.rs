//! Prompt context composition.
//!
//! Requests carry typed context payloads; providers turn payloads into
//! ordered prompt fragments; the composer assembles them deterministically.

mod composer;
mod fragment;
mod payload;
mod provider;

pub use composer::ContextComposer;
pub use fragment::{MetadataEntry, PromptRole};
pub use payload::{
    ContextPayload, ItineraryCommandContext, ItineraryQueryContext, OutputFormatContext,
    PayloadKind, PlaceQueryContext, SessionContext,
};
pub use provider::{ContextError, ContextProvider};
