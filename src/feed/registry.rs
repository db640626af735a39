//! In-memory agent registry.

use crate::feed::types::Agent;

/// Ordered, append-only collection of created agents.
///
/// Rebuilt empty on every process start; agents are never mutated or
/// removed once registered.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a newly created agent.
    pub fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    /// Returns the registered agents in creation order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Clone the current agent set for a generation fan-out.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Agent> {
        self.agents.clone()
    }

    /// Number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
