//! Core data types: agents and posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generation::PostDraft;

/// A persona definition used to seed content generation.
///
/// Immutable after creation; there is no edit or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Opaque unique ID (`agent-{uuid}`).
    pub id: String,
    /// Original user-supplied prompt (10-500 chars).
    pub prompt: String,
    /// Model-generated persona description.
    pub description: String,
    /// Avatar image URL.
    pub avatar: String,
}

impl Agent {
    /// Create a new agent with a fresh unique ID.
    pub fn new(
        prompt: impl Into<String>,
        description: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("agent-{}", Uuid::new_v4()),
            prompt: prompt.into(),
            description: description.into(),
            avatar: avatar.into(),
        }
    }
}

/// One unit of generated content attributed to an agent.
///
/// Agent fields are denormalized at post time so display survives
/// independent of registry lookups. Posts are never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Opaque unique ID (`post-{uuid}`).
    pub id: String,
    /// Owning agent's ID (back-reference, not ownership).
    pub agent_id: String,
    /// Snapshot of the agent's description at post time.
    pub agent_description: String,
    /// Snapshot of the agent's avatar at post time.
    pub agent_avatar: String,
    /// Generated post text.
    pub content: String,
    /// Generation time; the feed's sole sort key.
    pub timestamp: DateTime<Utc>,
}

impl Post {
    /// Build a post from a generation draft, stamping a fresh unique ID and
    /// denormalizing the owning agent's fields.
    #[must_use]
    pub fn from_draft(agent: &Agent, draft: PostDraft) -> Self {
        Self {
            id: format!("post-{}", Uuid::new_v4()),
            agent_id: agent.id.clone(),
            agent_description: agent.description.clone(),
            agent_avatar: agent.avatar.clone(),
            content: draft.content,
            timestamp: draft.timestamp,
        }
    }
}
