//! Agent Registry
//!
//! Read-only, insertion-ordered set of the agents a deployment knows about.
//! Population is an external concern (seed file, future control plane); the
//! interaction core only consumes `list()` and `get()`.

use super::{Agent, AgentStatus};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Registry of scraping agents.
///
/// `list()` returns agents in insertion order, which is the stable order the
/// dashboard renders them in.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
    index: HashMap<String, usize>,
}

/// Aggregate numbers for the dashboard's stat cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySummary {
    /// Total registered agents
    pub total: usize,
    /// Agents currently active
    pub active: usize,
    /// Agents currently idle
    pub idle: usize,
    /// Agents in error state
    pub errored: usize,
    /// Mean success rate across all agents, percent in [0, 100]
    pub avg_success_rate: f64,
}

impl AgentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a seed list.
    ///
    /// Fails with `Configuration` on blank ids, duplicate ids, or success
    /// rates outside [0, 100].
    pub fn from_agents(agents: Vec<Agent>) -> Result<Self> {
        let mut registry = Self::new();
        for agent in agents {
            registry.register(agent)?;
        }
        Ok(registry)
    }

    /// Register an agent, keeping insertion order.
    pub fn register(&mut self, agent: Agent) -> Result<()> {
        if agent.id.trim().is_empty() {
            return Err(Error::Configuration("agent id must not be blank".to_string()));
        }
        if !(0.0..=100.0).contains(&agent.success_rate) {
            return Err(Error::Configuration(format!(
                "agent '{}' success_rate {} outside [0, 100]",
                agent.id, agent.success_rate
            )));
        }
        if self.index.contains_key(&agent.id) {
            return Err(Error::Configuration(format!(
                "duplicate agent id '{}'",
                agent.id
            )));
        }
        debug!(agent_id = %agent.id, name = %agent.name, "Registering agent");
        self.index.insert(agent.id.clone(), self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    /// All known agents in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Agent] {
        &self.agents
    }

    /// Look up an agent by id.
    pub fn get(&self, id: &str) -> Result<&Agent> {
        self.index
            .get(id)
            .map(|&i| &self.agents[i])
            .ok_or_else(|| Error::NotFound(format!("agent '{}'", id)))
    }

    /// Number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Aggregate counters for the dashboard header cards.
    #[must_use]
    pub fn summary(&self) -> RegistrySummary {
        let count = |status: AgentStatus| {
            self.agents.iter().filter(|a| a.status == status).count()
        };
        let avg_success_rate = if self.agents.is_empty() {
            0.0
        } else {
            self.agents.iter().map(|a| a.success_rate).sum::<f64>() / self.agents.len() as f64
        };
        RegistrySummary {
            total: self.agents.len(),
            active: count(AgentStatus::Active),
            idle: count(AgentStatus::Idle),
            errored: count(AgentStatus::Error),
            avg_success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_agents() -> Vec<Agent> {
        vec![
            Agent::new("agent-1", "E-commerce Scraper")
                .with_status(AgentStatus::Active)
                .with_description("Extracts product data from e-commerce websites"),
            Agent::new("agent-2", "News Crawler"),
            Agent::new("agent-3", "Social Media Monitor").with_status(AgentStatus::Active),
        ]
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let registry = AgentRegistry::from_agents(sample_agents()).unwrap();
        let ids: Vec<&str> = registry.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["agent-1", "agent-2", "agent-3"]);
    }

    #[test]
    fn test_get_known_and_unknown() {
        let registry = AgentRegistry::from_agents(sample_agents()).unwrap();

        let agent = registry.get("agent-2").unwrap();
        assert_eq!(agent.name, "News Crawler");

        let err = registry.get("agent-99").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut agents = sample_agents();
        agents.push(Agent::new("agent-1", "Impostor"));

        let err = AgentRegistry::from_agents(agents).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("agent-1"));
    }

    #[test]
    fn test_success_rate_range_checked() {
        let mut agent = Agent::new("agent-1", "Broken");
        agent.success_rate = 120.0;

        let err = AgentRegistry::from_agents(vec![agent]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_summary_counts() {
        let mut agents = sample_agents();
        agents[0].success_rate = 94.5;
        agents[1].success_rate = 89.2;
        agents[2].success_rate = 91.8;

        let registry = AgentRegistry::from_agents(agents).unwrap();
        let summary = registry.summary();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.idle, 1);
        assert_eq!(summary.errored, 0);
        assert!((summary.avg_success_rate - 91.833).abs() < 0.01);
    }

    #[test]
    fn test_empty_summary() {
        let registry = AgentRegistry::new();
        let summary = registry.summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.avg_success_rate, 0.0);
    }
}
