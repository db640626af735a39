//! Agent-creation fast path.
//!
//! Creating an agent performs one persona-generation request followed by one
//! post-generation request, then appends the agent to the registry and
//! inserts the initial post into the feed. This path is not routed through
//! the scheduler and does not take the overlap guard; it may run while a
//! cycle is in flight.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::FeedConfig;
use crate::error::{EchoError, Result};
use crate::feed::registry::AgentRegistry;
use crate::feed::store::FeedStore;
use crate::feed::types::{Agent, Post};
use crate::generation::GenerationClient;

/// Creates agents and their initial posts.
pub struct AgentCreator {
    registry: Arc<RwLock<AgentRegistry>>,
    feed: Arc<RwLock<FeedStore>>,
    client: Arc<dyn GenerationClient>,
    prompt_min_chars: usize,
    prompt_max_chars: usize,
}

impl AgentCreator {
    /// Create an agent creator over shared registry/feed state.
    pub fn new(
        registry: Arc<RwLock<AgentRegistry>>,
        feed: Arc<RwLock<FeedStore>>,
        client: Arc<dyn GenerationClient>,
        config: &FeedConfig,
    ) -> Self {
        Self {
            registry,
            feed,
            client,
            prompt_min_chars: config.prompt_min_chars,
            prompt_max_chars: config.prompt_max_chars,
        }
    }

    /// Create a new agent from a user prompt.
    ///
    /// Validates the prompt length, generates the persona description and
    /// the agent's initial post, then registers the agent and inserts the
    /// post at the front of the feed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-bounds prompts and a
    /// generation error when either model call fails.
    pub async fn create_agent(&self, prompt: &str) -> Result<(Agent, Post)> {
        let prompt = prompt.trim();
        self.validate_prompt(prompt)?;

        let description = self.client.create_persona(prompt).await?;
        let agent = Agent::new(prompt, description, placeholder_avatar());

        let draft = self.client.generate_post(&agent.description).await?;
        let post = Post::from_draft(&agent, draft);

        self.registry.write().await.push(agent.clone());
        self.feed.write().await.insert_front(post.clone());

        info!("created agent {}", agent.id);
        Ok((agent, post))
    }

    fn validate_prompt(&self, prompt: &str) -> Result<()> {
        let chars = prompt.chars().count();
        if chars < self.prompt_min_chars {
            return Err(EchoError::Validation(format!(
                "prompt must be at least {} characters",
                self.prompt_min_chars
            )));
        }
        if chars > self.prompt_max_chars {
            return Err(EchoError::Validation(format!(
                "prompt cannot exceed {} characters",
                self.prompt_max_chars
            )));
        }
        Ok(())
    }
}

/// Placeholder avatar URL with a random seed.
fn placeholder_avatar() -> String {
    format!("https://picsum.photos/seed/{}/40/40", rand::random::<u32>())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::generation::PostDraft;
    use async_trait::async_trait;
    use chrono::Utc;

    struct CannedClient;

    #[async_trait]
    impl GenerationClient for CannedClient {
        async fn create_persona(&self, prompt: &str) -> Result<String> {
            Ok(format!("A persona for: {prompt}"))
        }

        async fn generate_post(&self, _agent_prompt: &str) -> Result<PostDraft> {
            Ok(PostDraft {
                content: "first post!".to_owned(),
                timestamp: Utc::now(),
            })
        }
    }

    fn creator() -> (
        AgentCreator,
        Arc<RwLock<AgentRegistry>>,
        Arc<RwLock<FeedStore>>,
    ) {
        let registry = Arc::new(RwLock::new(AgentRegistry::new()));
        let feed = Arc::new(RwLock::new(FeedStore::new()));
        let creator = AgentCreator::new(
            Arc::clone(&registry),
            Arc::clone(&feed),
            Arc::new(CannedClient),
            &FeedConfig::default(),
        );
        (creator, registry, feed)
    }

    #[tokio::test]
    async fn create_agent_registers_and_posts() {
        let (creator, registry, feed) = creator();

        let (agent, post) = creator
            .create_agent("A cheerful optimist who loves technology")
            .await
            .unwrap();

        assert!(agent.description.starts_with("A persona for:"));
        assert!(agent.avatar.starts_with("https://picsum.photos/seed/"));
        assert_eq!(post.agent_id, agent.id);

        assert_eq!(registry.read().await.len(), 1);
        let feed = feed.read().await;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.posts()[0].content, "first post!");
    }

    #[tokio::test]
    async fn short_prompt_is_rejected() {
        let (creator, registry, _feed) = creator();
        let err = creator.create_agent("too short").await.unwrap_err();
        assert!(matches!(err, EchoError::Validation(_)));
        assert!(registry.read().await.is_empty());
    }

    #[tokio::test]
    async fn oversized_prompt_is_rejected() {
        let (creator, _registry, feed) = creator();
        let prompt = "x".repeat(501);
        let err = creator.create_agent(&prompt).await.unwrap_err();
        assert!(matches!(err, EchoError::Validation(_)));
        assert!(feed.read().await.is_empty());
    }

    #[tokio::test]
    async fn surrounding_whitespace_does_not_count() {
        let (creator, _registry, _feed) = creator();
        let prompt = format!("   {}   ", "y".repeat(500));
        assert!(creator.create_agent(&prompt).await.is_ok());
    }
}
