//! Interaction Controller
//!
//! Drives the user-facing workflow: validate and submit input, schedule the
//! simulated agent reply, and apply choice selections. Response generation is
//! serialized per agent through a FIFO lane, so submissions made while a
//! reply is pending are answered in order instead of racing overlapping
//! timers. Each lane carries a cancellation token; an uncancelled reply lands
//! in the store even if the UI has moved on (store is truth).

use crate::agent::{Agent, AgentRegistry};
use crate::config::InteractionConfig;
use crate::conversation::{ConversationStore, Message, NewMessage};
use crate::error::{Error, Result};
use crate::event_bus::{EventBus, InteractionEvent};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Response generation trait and the simulated implementation.
pub mod responder;

pub use responder::{Responder, SimulatedResponder, ANALYSIS_PROMPT};

/// A submission waiting behind an in-flight response.
#[derive(Debug, Clone)]
struct QueuedPrompt {
    /// Unique queue entry ID
    id: Uuid,
    /// Prompt to answer
    prompt: String,
    /// When it was queued
    queued_at: DateTime<Utc>,
}

/// Per-agent response lane.
#[derive(Debug, Default)]
struct Lane {
    /// Whether a response task is in flight (the `Pending` state)
    busy: bool,
    /// Submissions waiting for the in-flight response to finish
    queue: VecDeque<QueuedPrompt>,
    /// Cancels the in-flight response and drains the queue
    cancel: CancellationToken,
}

struct Inner {
    registry: Arc<AgentRegistry>,
    store: Arc<ConversationStore>,
    responder: Arc<dyn Responder>,
    events: EventBus,
    lanes: Mutex<HashMap<String, Lane>>,
}

/// Orchestrates the submit → simulated reply → choice selection workflow.
///
/// Cheap to clone; clones share state, so the reply task spawned by one
/// handle is observable from all of them.
#[derive(Clone)]
pub struct InteractionController {
    inner: Arc<Inner>,
}

impl InteractionController {
    /// Create a controller over the given registry, store, and responder.
    #[must_use]
    pub fn new(
        registry: Arc<AgentRegistry>,
        store: Arc<ConversationStore>,
        responder: Arc<dyn Responder>,
        config: &InteractionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                store,
                responder,
                events: EventBus::new(config.event_capacity),
                lanes: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Create a controller wired to the simulated responder, with the
    /// response latency taken from `config`.
    #[must_use]
    pub fn with_simulated_responder(
        registry: Arc<AgentRegistry>,
        store: Arc<ConversationStore>,
        config: &InteractionConfig,
    ) -> Self {
        let responder = Arc::new(SimulatedResponder::new(config.response_delay()));
        Self::new(registry, store, responder, config)
    }

    /// The event bus this controller publishes to.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Registry of agents this controller can drive.
    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.inner.registry
    }

    /// Select an agent: resolves it in the registry and lazily initializes
    /// its conversation. Returns the conversation snapshot.
    pub async fn select_agent(&self, agent_id: &str) -> Result<Vec<Message>> {
        let agent = self.inner.registry.get(agent_id)?;
        Ok(self.inner.store.ensure_initialized(agent).await)
    }

    /// Conversation snapshot for `agent_id` (empty if never initialized).
    pub async fn conversation(&self, agent_id: &str) -> Vec<Message> {
        self.inner.store.get(agent_id).await
    }

    /// Submit user input to an agent.
    ///
    /// Fails with `NoAgentSelected` when `agent_id` is absent, `NotFound` for
    /// an unknown agent, and `EmptyInput` when both `text` and `website` are
    /// blank (instructions alone do not qualify). On success the user message
    /// is appended — content is `text`, or a composed
    /// `"Website: ...\nInstructions: ..."` string when `text` is blank — and
    /// response generation is scheduled on the agent's lane. Returns the
    /// appended user message.
    pub async fn submit(
        &self,
        agent_id: Option<&str>,
        text: &str,
        website: &str,
        instructions: &str,
    ) -> Result<Message> {
        let agent_id = agent_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(Error::NoAgentSelected)?;
        let agent = self.inner.registry.get(agent_id)?.clone();

        if text.trim().is_empty() && website.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let content = if text.trim().is_empty() {
            format!("Website: {}\nInstructions: {}", website, instructions)
        } else {
            text.to_string()
        };

        let message = self
            .inner
            .store
            .append(&agent, NewMessage::user(content.clone()))
            .await?;
        self.inner.events.publish(InteractionEvent::MessageSent {
            agent_id: agent.id.clone(),
            message_id: message.id,
        });

        self.schedule_response(agent, content).await;
        Ok(message)
    }

    /// Select one of a message's offered choices.
    ///
    /// Surfaces the store's `NotFound`/`InvalidChoice` unchanged; on success
    /// publishes a `ChoiceSelected` confirmation event and returns the
    /// updated message.
    pub async fn select_choice(
        &self,
        agent_id: Option<&str>,
        message_id: u64,
        key: &str,
    ) -> Result<Message> {
        let agent_id = agent_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(Error::NoAgentSelected)?;
        let message = self
            .inner
            .store
            .set_selected_choice(agent_id, message_id, key)
            .await?;
        self.inner.events.publish(InteractionEvent::ChoiceSelected {
            agent_id: agent_id.to_string(),
            message_id,
            key: key.to_string(),
        });
        Ok(message)
    }

    /// Whether a response is pending for `agent_id`.
    pub async fn is_pending(&self, agent_id: &str) -> bool {
        self.inner
            .lanes
            .lock()
            .await
            .get(agent_id)
            .map(|lane| lane.busy)
            .unwrap_or(false)
    }

    /// Cancel the pending response for `agent_id`, draining anything queued
    /// behind it. Returns whether a response was actually pending.
    pub async fn cancel_pending(&self, agent_id: &str) -> bool {
        let lanes = self.inner.lanes.lock().await;
        match lanes.get(agent_id) {
            Some(lane) if lane.busy => {
                lane.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Start response generation, or queue it if the lane is busy.
    async fn schedule_response(&self, agent: Agent, prompt: String) {
        let mut lanes = self.inner.lanes.lock().await;
        let lane = lanes.entry(agent.id.clone()).or_default();

        if lane.busy {
            lane.queue.push_back(QueuedPrompt {
                id: Uuid::new_v4(),
                prompt,
                queued_at: Utc::now(),
            });
            debug!(
                agent_id = %agent.id,
                pending = lane.queue.len(),
                "Response lane busy, queued submission"
            );
            return;
        }

        // A cancel that landed after the lane drained leaves a used token
        if lane.cancel.is_cancelled() {
            lane.cancel = CancellationToken::new();
        }
        lane.busy = true;
        let cancel = lane.cancel.clone();
        drop(lanes);

        self.inner
            .events
            .publish(InteractionEvent::ResponsePending {
                agent_id: agent.id.clone(),
            });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            Inner::run_lane(inner, agent, prompt, cancel).await;
        });
    }
}

impl Inner {
    /// Answer `first` and then everything queued behind it, in order.
    async fn run_lane(
        inner: Arc<Inner>,
        agent: Agent,
        first: String,
        cancel: CancellationToken,
    ) {
        let mut prompt = first;
        loop {
            let cancelled = tokio::select! {
                _ = cancel.cancelled() => true,
                reply = inner.responder.respond(&agent, &prompt) => {
                    match inner.store.append(&agent, reply).await {
                        Ok(message) => {
                            inner.events.publish(InteractionEvent::ResponseArrived {
                                agent_id: agent.id.clone(),
                                message_id: message.id,
                            });
                        }
                        Err(error) => {
                            warn!(agent_id = %agent.id, %error, "Dropping malformed simulated reply");
                        }
                    }
                    false
                }
            };

            let mut lanes = inner.lanes.lock().await;
            let Some(lane) = lanes.get_mut(&agent.id) else {
                return;
            };

            if cancelled {
                let dropped = lane.queue.len();
                lane.queue.clear();
                lane.busy = false;
                // Fresh token so the next submission gets a clean handle
                lane.cancel = CancellationToken::new();
                debug!(agent_id = %agent.id, dropped, "Pending response cancelled");
                inner.events.publish(InteractionEvent::ResponseCancelled {
                    agent_id: agent.id.clone(),
                });
                return;
            }

            match lane.queue.pop_front() {
                Some(next) => {
                    let waited_ms = (Utc::now() - next.queued_at).num_milliseconds();
                    debug!(
                        agent_id = %agent.id,
                        queued_id = %next.id,
                        waited_ms,
                        "Starting queued response"
                    );
                    prompt = next.prompt;
                    inner.events.publish(InteractionEvent::ResponsePending {
                        agent_id: agent.id.clone(),
                    });
                }
                None => {
                    lane.busy = false;
                    return;
                }
            }
        }
    }
}
