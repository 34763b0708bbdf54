//! PromptTemplateStore port - administered prompt templates.
//!
//! Templates are owned by an administrative store and are read-only from
//! the agents' perspective. Lookup of a missing or inactive combination is
//! an error, never a silent default; a generation with no active template
//! is a configuration problem that must surface immediately.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::context::PromptRole;
use crate::domain::foundation::TemplateId;
use crate::domain::generation::AgentType;

/// A persisted prompt template.
///
/// Invariant (owned by the store): at most one active template per
/// `(role, agent)` pair. Reads are all-or-nothing; a template is never
/// observed mid-update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: TemplateId,
    pub role: PromptRole,
    pub agent: AgentType,
    pub body: String,
    pub active: bool,
    pub description: Option<String>,
}

impl PromptTemplate {
    /// Creates an active template.
    pub fn active(role: PromptRole, agent: AgentType, body: impl Into<String>) -> Self {
        Self {
            id: TemplateId::new(),
            role,
            agent,
            body: body.into(),
            active: true,
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Template store failures.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("no active {role:?} template for agent '{agent}'")]
    NotFound { role: PromptRole, agent: AgentType },

    #[error("template store error: {0}")]
    Storage(String),
}

/// Port for reading administered templates.
#[async_trait]
pub trait PromptTemplateStore: Send + Sync {
    /// Finds the single active template for a role and agent.
    async fn find_active(
        &self,
        role: PromptRole,
        agent: AgentType,
    ) -> Result<PromptTemplate, TemplateError>;
}
