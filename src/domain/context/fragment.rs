//! Prompt fragments contributed by context providers.

use serde::{Deserialize, Serialize};

/// Role a prompt fragment or template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptRole {
    /// Instructions that shape model behavior.
    System,
    /// Content presented as user input.
    User,
}

/// One typed text fragment destined for the outgoing prompt.
///
/// Entries from a single provider keep their insertion order; ordering
/// across providers is the provider's declared priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Message role this fragment becomes.
    pub role: PromptRole,
    /// Fragment text.
    pub content: String,
}

impl MetadataEntry {
    /// Creates a system-role fragment.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    /// Creates a user-role fragment.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }
}
