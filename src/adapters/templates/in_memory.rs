//! In-memory prompt template store.
//!
//! Owns the one-active-per-(role, agent) invariant: inserting or
//! activating a template deactivates the previous active one under the
//! same write lock, so readers never observe two active templates or a
//! half-applied switch.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::context::PromptRole;
use crate::domain::foundation::TemplateId;
use crate::domain::generation::AgentType;
use crate::ports::{PromptTemplate, PromptTemplateStore, TemplateError};

/// Template store backed by a vector under a lock.
pub struct InMemoryTemplateStore {
    templates: RwLock<Vec<PromptTemplate>>,
}

impl InMemoryTemplateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(Vec::new()),
        }
    }

    /// Inserts a template. An active insert deactivates any existing
    /// active template for the same (role, agent).
    pub fn insert(&self, template: PromptTemplate) -> TemplateId {
        let mut templates = self
            .templates
            .write()
            .expect("InMemoryTemplateStore: lock poisoned");

        if template.active {
            for existing in templates.iter_mut() {
                if existing.role == template.role && existing.agent == template.agent {
                    existing.active = false;
                }
            }
        }
        let id = template.id;
        templates.push(template);
        id
    }

    /// Activates the template with the given id, deactivating its rivals
    /// in the same write. Returns false when the id is unknown.
    pub fn activate(&self, id: TemplateId) -> bool {
        let mut templates = self
            .templates
            .write()
            .expect("InMemoryTemplateStore: lock poisoned");

        let Some(target) = templates.iter().position(|t| t.id == id) else {
            return false;
        };
        let (role, agent) = (templates[target].role, templates[target].agent);

        for existing in templates.iter_mut() {
            if existing.role == role && existing.agent == agent {
                existing.active = false;
            }
        }
        templates[target].active = true;
        true
    }

    /// Number of stored templates.
    pub fn len(&self) -> usize {
        self.templates
            .read()
            .expect("InMemoryTemplateStore: lock poisoned")
            .len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptTemplateStore for InMemoryTemplateStore {
    async fn find_active(
        &self,
        role: PromptRole,
        agent: AgentType,
    ) -> Result<PromptTemplate, TemplateError> {
        self.templates
            .read()
            .expect("InMemoryTemplateStore: lock poisoned")
            .iter()
            .find(|t| t.active && t.role == role && t.agent == agent)
            .cloned()
            .ok_or(TemplateError::NotFound { role, agent })
    }
}
