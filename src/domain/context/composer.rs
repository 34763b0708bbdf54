//! Deterministic composition of provider output.

use std::sync::Arc;
use tracing::debug;

use super::{ContextError, ContextPayload, ContextProvider, MetadataEntry};

/// Collects registered providers and composes prompt context from typed
/// payloads.
///
/// For each payload, in argument order: gather the providers bound to its
/// kind, sort by ascending priority with registration order breaking ties,
/// invoke each, and concatenate the results preserving per-provider order.
/// A payload with no bound providers contributes nothing; a provider error
/// aborts composition and propagates.
pub struct ContextComposer {
    providers: Vec<Arc<dyn ContextProvider>>,
}

impl ContextComposer {
    /// Creates a composer over the registered providers.
    ///
    /// Registration order is remembered for stable tie-breaking.
    pub fn new(providers: Vec<Arc<dyn ContextProvider>>) -> Self {
        debug!(count = providers.len(), "context composer initialized");
        Self { providers }
    }

    /// Number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Composes entries for the given payloads.
    pub async fn compose(
        &self,
        payloads: &[ContextPayload],
    ) -> Result<Vec<MetadataEntry>, ContextError> {
        let mut entries = Vec::new();

        for payload in payloads {
            let kind = payload.kind();

            let mut bound: Vec<(usize, &Arc<dyn ContextProvider>)> = self
                .providers
                .iter()
                .enumerate()
                .filter(|(_, p)| p.payload_kind() == kind)
                .collect();

            if bound.is_empty() {
                debug!(?kind, "no providers bound to payload kind");
                continue;
            }

            bound.sort_by_key(|(index, provider)| (provider.priority(), *index));

            for (_, provider) in bound {
                let produced = provider.provide(payload).await?;
                debug!(
                    provider = provider.name(),
                    count = produced.len(),
                    "context entries produced"
                );
                entries.extend(produced);
            }
        }

        Ok(entries)
    }
}
