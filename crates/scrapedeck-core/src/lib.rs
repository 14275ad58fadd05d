//! Scrapedeck Core - Agent Interaction Engine
//!
//! This crate provides the in-process core of the Scrapedeck dashboard,
//! including:
//! - Agents: the registry of scraping agents and their aggregate stats
//! - Conversations: per-agent message history with choice sets
//! - Interaction: the submit → simulated reply → choice selection workflow
//! - Events: broadcast bus the presentation layer renders from
//!
//! All state is in-memory and process-lifetime; the presentation layer
//! (cards, charts, forms) is an external collaborator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod event_bus;
pub mod interaction;

pub use agent::{Agent, AgentRegistry, AgentStatus, RegistrySummary};
pub use config::InteractionConfig;
pub use conversation::{
    Choice, ChoiceSet, Conversation, ConversationStore, Message, NewMessage, Originator,
};
pub use error::{Error, Result, UserFriendlyError};
pub use event_bus::{EventBus, InteractionEvent};
pub use interaction::{InteractionController, Responder, SimulatedResponder, ANALYSIS_PROMPT};
