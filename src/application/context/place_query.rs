//! Raw place record provider for summarization.

use async_trait::async_trait;

use crate::domain::context::{
    ContextError, ContextPayload, ContextProvider, MetadataEntry, PayloadKind,
};

/// Presents the raw, often messy catalog record the summary agent should
/// rewrite into clean prose.
pub struct PlaceQueryProvider;

#[async_trait]
impl ContextProvider for PlaceQueryProvider {
    fn name(&self) -> &'static str {
        "place_query"
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::PlaceQuery
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn provide(&self, payload: &ContextPayload) -> Result<Vec<MetadataEntry>, ContextError> {
        let ContextPayload::PlaceQuery(ctx) = payload else {
            return Ok(Vec::new());
        };

        let themes = if ctx.themes.is_empty() {
            "none".to_string()
        } else {
            ctx.themes.join(", ")
        };

        let record = format!(
            "## Place context\n\n\
             The raw catalog record to summarize.\n\n\
             - name: {}\n\
             - address: {}\n\
             - themes: {}\n\
             - operating hours: {}\n\
             - holidays: {}\n\
             - description: {}\n",
            ctx.name,
            ctx.address,
            themes,
            ctx.operating_hours.as_deref().unwrap_or("unknown"),
            ctx.holiday_info.as_deref().unwrap_or("unknown"),
            ctx.description
        );

        Ok(vec![MetadataEntry::system(record)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::PlaceQueryContext;

    #[tokio::test]
    async fn renders_raw_record() {
        let payload = ContextPayload::PlaceQuery(PlaceQueryContext {
            name: "Hyeopjae Beach".to_string(),
            address: "Hallim-eup, Jeju".to_string(),
            description: "White sand beach<br>emerald water".to_string(),
            operating_hours: Some("always open".to_string()),
            holiday_info: None,
            themes: vec!["nature".to_string(), "family".to_string()],
        });

        let entries = PlaceQueryProvider.provide(&payload).await.unwrap();
        assert_eq!(entries.len(), 1);
        let text = &entries[0].content;
        assert!(text.contains("Hyeopjae Beach"));
        assert!(text.contains("nature, family"));
        assert!(text.contains("holidays: unknown"));
    }
}
