//! Response generation
//!
//! The `Responder` trait is the seam where a real agent backend would plug
//! in. The shipped implementation simulates one: it waits a configured
//! latency, then offers the fixed analysis prompt with four focus options.

use crate::agent::Agent;
use crate::conversation::{ChoiceSet, NewMessage};
use async_trait::async_trait;
use std::time::Duration;

/// Content of the simulated analysis reply.
pub const ANALYSIS_PROMPT: &str =
    "I've analyzed the website. Please choose what type of data you'd like me to focus on:";

/// Produces the agent reply to a submitted prompt.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Generate the agent's reply to `prompt`. The future may suspend to
    /// model network or processing latency.
    async fn respond(&self, agent: &Agent, prompt: &str) -> NewMessage;
}

/// Simulated responder with a fixed reply and configurable latency.
#[derive(Debug, Clone)]
pub struct SimulatedResponder {
    delay: Duration,
}

impl SimulatedResponder {
    /// Create a simulated responder that waits `delay` before replying.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The four-entry focus choice set offered with every simulated reply.
    #[must_use]
    pub fn analysis_choices() -> ChoiceSet {
        let mut choices = ChoiceSet::new();
        let entries = [
            ("choice_1", "Extract product titles and prices"),
            ("choice_2", "Focus on customer reviews and ratings"),
            ("choice_3", "Collect inventory and availability data"),
            ("choice_4", "Get product specifications and features"),
        ];
        for (key, text) in entries {
            // Keys are statically distinct, insert cannot fail
            let _ = choices.insert(key, text);
        }
        choices
    }
}

#[async_trait]
impl Responder for SimulatedResponder {
    async fn respond(&self, _agent: &Agent, _prompt: &str) -> NewMessage {
        tokio::time::sleep(self.delay).await;
        NewMessage::agent(ANALYSIS_PROMPT).with_choices(Self::analysis_choices())
    }
}
