//! Agent registry and dispatch.
//!
//! Agents declare which [`AgentType`] they support; the registry is built
//! once at startup from the closed set of agents and rejects duplicate
//! registrations there, so dispatch can never be ambiguous.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::domain::generation::{
    cancellation, AgentRequest, AgentType, CancelHandle, CancelSignal, GenerationError,
};

/// A strategy that turns one typed request into model-driven output and
/// domain events.
///
/// `execute` is async and runs on the caller's task; the dispatcher's
/// [`AgentRegistry::dispatch_spawned`] gives each request its own task so
/// model I/O never blocks a shared dispatch path.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logs and duplicate diagnostics.
    fn name(&self) -> &'static str;

    /// Capability check: whether this agent handles the given type.
    fn supports(&self, agent_type: AgentType) -> bool;

    /// Runs the generation to its terminal outcome.
    async fn execute(
        &self,
        request: AgentRequest,
        cancel: CancelSignal,
    ) -> Result<(), GenerationError>;
}

/// Dispatch failures.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// No agent supports the requested type.
    #[error("no agent registered for type '{0}'")]
    AgentNotFound(AgentType),

    /// Two agents claimed the same type at startup.
    #[error("duplicate agents for type '{agent_type}': '{first}' and '{second}'")]
    DuplicateAgent {
        agent_type: AgentType,
        first: &'static str,
        second: &'static str,
    },

    /// The selected agent's generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Maps each agent type to the unique agent that supports it.
pub struct AgentRegistry {
    agents: HashMap<AgentType, Arc<dyn Agent>>,
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AgentRegistry {
    /// Builds the registry, validating that no type has two agents.
    ///
    /// Registration is by capability: every agent is asked about every
    /// type once, here, instead of scanning agents at dispatch time.
    pub fn new(agents: Vec<Arc<dyn Agent>>) -> Result<Self, DispatchError> {
        let mut by_type: HashMap<AgentType, Arc<dyn Agent>> = HashMap::new();

        for agent_type in AgentType::ALL {
            for agent in &agents {
                if !agent.supports(agent_type) {
                    continue;
                }
                if let Some(existing) = by_type.get(&agent_type) {
                    return Err(DispatchError::DuplicateAgent {
                        agent_type,
                        first: existing.name(),
                        second: agent.name(),
                    });
                }
                by_type.insert(agent_type, Arc::clone(agent));
            }
        }

        debug!(types = by_type.len(), "agent registry built");
        Ok(Self { agents: by_type })
    }

    /// Types that currently have an agent.
    pub fn registered_types(&self) -> Vec<AgentType> {
        let mut types: Vec<AgentType> = self.agents.keys().copied().collect();
        types.sort_by_key(|t| t.as_str());
        types
    }

    /// Routes the request to the unique supporting agent and awaits it.
    pub async fn dispatch(
        &self,
        request: AgentRequest,
        cancel: CancelSignal,
    ) -> Result<(), DispatchError> {
        let agent_type = request.agent_type();
        let agent = self
            .agents
            .get(&agent_type)
            .ok_or(DispatchError::AgentNotFound(agent_type))?;

        debug!(agent = agent.name(), %agent_type, "dispatching request");
        agent.execute(request, cancel).await.map_err(Into::into)
    }

    /// Dispatches on a dedicated task, returning a cancel handle for the
    /// transport layer and the join handle for the outcome.
    pub fn dispatch_spawned(
        self: &Arc<Self>,
        request: AgentRequest,
    ) -> (CancelHandle, JoinHandle<Result<(), DispatchError>>) {
        let (handle, signal) = cancellation();
        let registry = Arc::clone(self);

        let join = tokio::spawn(async move {
            let result = registry.dispatch(request, signal).await;
            if let Err(err) = &result {
                match err {
                    DispatchError::Generation(g) if g.is_cancellation() => {
                        debug!("generation cancelled by client");
                    }
                    other => error!(error = %other, "dispatched generation failed"),
                }
            }
            result
        });

        (handle, join)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, TripId, UserId};
    use crate::domain::generation::ChatRequested;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubAgent {
        name: &'static str,
        handles: Vec<AgentType>,
        executions: Arc<AtomicUsize>,
    }

    impl StubAgent {
        fn new(name: &'static str, handles: Vec<AgentType>) -> (Arc<Self>, Arc<AtomicUsize>) {
            let executions = Arc::new(AtomicUsize::new(0));
            (
                Arc::new(Self {
                    name,
                    handles,
                    executions: Arc::clone(&executions),
                }),
                executions,
            )
        }
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, agent_type: AgentType) -> bool {
            self.handles.contains(&agent_type)
        }

        async fn execute(
            &self,
            _request: AgentRequest,
            _cancel: CancelSignal,
        ) -> Result<(), GenerationError> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn chat_request() -> AgentRequest {
        AgentRequest::Chat(ChatRequested {
            conversation_id: ConversationId::new(),
            trip_id: TripId::new(),
            user_id: UserId::new("traveler@example.com").unwrap(),
            message: "hello".to_string(),
        })
    }

    #[tokio::test]
    async fn dispatches_to_supporting_agent() {
        let (chat, chat_count) = StubAgent::new("chat", vec![AgentType::Chat]);
        let (trip, trip_count) = StubAgent::new("trip", vec![AgentType::Itinerary]);
        let registry = AgentRegistry::new(vec![chat, trip]).unwrap();

        registry
            .dispatch(chat_request(), CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(chat_count.load(Ordering::SeqCst), 1);
        assert_eq!(trip_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_agent_fails_without_invocation() {
        let (trip, trip_count) = StubAgent::new("trip", vec![AgentType::Itinerary]);
        let registry = AgentRegistry::new(vec![trip]).unwrap();

        let err = registry
            .dispatch(chat_request(), CancelSignal::never())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::AgentNotFound(AgentType::Chat)));
        assert_eq!(trip_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_registration_is_rejected_at_startup() {
        let (a, _) = StubAgent::new("first_chat", vec![AgentType::Chat]);
        let (b, _) = StubAgent::new("second_chat", vec![AgentType::Chat]);

        let err = AgentRegistry::new(vec![a, b]).unwrap_err();
        match err {
            DispatchError::DuplicateAgent {
                agent_type,
                first,
                second,
            } => {
                assert_eq!(agent_type, AgentType::Chat);
                assert_eq!(first, "first_chat");
                assert_eq!(second, "second_chat");
            }
            other => panic!("expected duplicate error, got {other}"),
        }
    }

    #[test]
    fn registered_types_reflect_agents() {
        let (chat, _) = StubAgent::new("chat", vec![AgentType::Chat]);
        let registry = AgentRegistry::new(vec![chat]).unwrap();
        assert_eq!(registry.registered_types(), vec![AgentType::Chat]);
    }

    #[tokio::test]
    async fn spawned_dispatch_completes() {
        let (chat, chat_count) = StubAgent::new("chat", vec![AgentType::Chat]);
        let registry = Arc::new(AgentRegistry::new(vec![chat]).unwrap());

        let (_cancel, join) = registry.dispatch_spawned(chat_request());
        join.await.unwrap().unwrap();
        assert_eq!(chat_count.load(Ordering::SeqCst), 1);
    }
}
