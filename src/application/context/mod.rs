//! Built-in context providers.
//!
//! Each provider binds to one payload kind and renders it into prompt
//! fragments. Priorities define injection order: output format first,
//! then session metadata, then trip state, then the user's requirements.

mod itinerary_command;
mod itinerary_query;
mod output_format;
mod place_query;
mod session;

pub use itinerary_command::ItineraryCommandProvider;
pub use itinerary_query::ItineraryQueryProvider;
pub use output_format::OutputFormatProvider;
pub use place_query::PlaceQueryProvider;
pub use session::SessionContextProvider;

use std::sync::Arc;

use crate::domain::context::{ContextComposer, ContextProvider};
use crate::ports::ItineraryReader;

/// Builds a composer with the full built-in provider set.
pub fn default_composer(itinerary_reader: Arc<dyn ItineraryReader>) -> ContextComposer {
    let providers: Vec<Arc<dyn ContextProvider>> = vec![
        Arc::new(OutputFormatProvider),
        Arc::new(SessionContextProvider),
        Arc::new(ItineraryQueryProvider::new(itinerary_reader)),
        Arc::new(ItineraryCommandProvider),
        Arc::new(PlaceQueryProvider),
    ];
    ContextComposer::new(providers)
}
