//! Agent data model
//!
//! Agents are the named scraping workers the user interacts with. They are
//! created at registry load time and live for the duration of the process.

use serde::{Deserialize, Serialize};

/// The queryable registry of known agents.
pub mod registry;

pub use registry::{AgentRegistry, RegistrySummary};

/// Operational status of an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Actively working on a scrape
    Active,
    /// Registered but not currently working
    #[default]
    Idle,
    /// Last run ended in an error
    Error,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Idle => write!(f, "idle"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A scraping agent as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique, immutable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Current status
    #[serde(default)]
    pub status: AgentStatus,
    /// Free-text description of what the agent specializes in
    #[serde(default)]
    pub description: String,
    /// Total messages exchanged with this agent
    #[serde(default)]
    pub total_messages: u64,
    /// Success rate as a percentage in [0, 100]
    #[serde(default)]
    pub success_rate: f64,
    /// Last-active display string (e.g. "2 minutes ago")
    #[serde(default = "default_last_active")]
    pub last_active: String,
}

fn default_last_active() -> String {
    "never".to_string()
}

impl Agent {
    /// Create an agent with the given id and display name.
    ///
    /// Status defaults to idle and counters to zero; fields are public for
    /// seed loaders that want to fill them in.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: AgentStatus::default(),
            description: String::new(),
            total_messages: 0,
            success_rate: 0.0,
            last_active: default_last_active(),
        }
    }

    /// Set the description (builder style).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the status (builder style).
    #[must_use]
    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let agent = Agent::new("agent-1", "E-commerce Scraper");
        assert_eq!(agent.status, AgentStatus::Idle);
        assert_eq!(agent.total_messages, 0);
        assert_eq!(agent.last_active, "never");
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&AgentStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");

        let status: AgentStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(status, AgentStatus::Error);
    }

    #[test]
    fn test_agent_deserialize_minimal() {
        // Seed files only need id and name
        let agent: Agent = serde_json::from_str(r#"{"id":"a","name":"A"}"#).unwrap();
        assert_eq!(agent.status, AgentStatus::Idle);
        assert_eq!(agent.success_rate, 0.0);
    }
}
