//! Itinerary requirements provider.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::context::{
    ContextError, ContextPayload, ContextProvider, MetadataEntry, PayloadKind,
};
use crate::domain::itinerary::TransportMode;

/// Formats the user's trip requirements (region, dates, themes, party,
/// transport) into a system fragment for plan generation.
pub struct ItineraryCommandProvider;

fn transport_label(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Car => "car",
        TransportMode::PublicTransit => "public transit",
        TransportMode::Walk => "on foot",
    }
}

#[async_trait]
impl ContextProvider for ItineraryCommandProvider {
    fn name(&self) -> &'static str {
        "itinerary_command"
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::ItineraryCommand
    }

    fn priority(&self) -> i32 {
        21
    }

    async fn provide(&self, payload: &ContextPayload) -> Result<Vec<MetadataEntry>, ContextError> {
        let ContextPayload::ItineraryCommand(ctx) = payload else {
            return Ok(Vec::new());
        };

        debug!(region = %ctx.region, days = ctx.duration_days, "providing trip requirements");

        let themes = if ctx.themes.is_empty() {
            "- none".to_string()
        } else {
            ctx.themes
                .iter()
                .map(|t| format!("- {t}"))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let requirements = format!(
            "## Requirements context\n\n\
             The trip the user wants planned. Use these constraints when\n\
             generating the itinerary.\n\n\
             ### Trip conditions\n\
             | item | value |\n\
             |------|-------|\n\
             | region | {} |\n\
             | duration | {} days |\n\
             | start date | {} |\n\
             | end date | {} |\n\
             | party size | {} |\n\
             | transport | {} |\n\n\
             ### Preferred themes\n{}\n",
            ctx.region,
            ctx.duration_days,
            ctx.start_date,
            ctx.end_date(),
            ctx.party_size,
            transport_label(ctx.transport),
            themes
        );

        Ok(vec![MetadataEntry::system(requirements)])
    }
}
