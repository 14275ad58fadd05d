use serde::Serialize;

/// Events emitted by the interaction controller.
///
/// Events carry ids, not message bodies; subscribers fetch the conversation
/// snapshot from the store when they need content.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// A user message was appended to a conversation
    MessageSent {
        /// Owning agent id
        agent_id: String,
        /// Id of the appended message
        message_id: u64,
    },
    /// Simulated response generation started for an agent
    ResponsePending {
        /// Agent the response is pending for
        agent_id: String,
    },
    /// A simulated agent reply was appended to a conversation
    ResponseArrived {
        /// Owning agent id
        agent_id: String,
        /// Id of the reply message
        message_id: u64,
    },
    /// A pending response was cancelled before it landed
    ResponseCancelled {
        /// Agent whose pending response was cancelled
        agent_id: String,
    },
    /// The user picked one of an agent message's offered choices
    ChoiceSelected {
        /// Owning agent id
        agent_id: String,
        /// Message whose selection changed
        message_id: u64,
        /// The chosen key
        key: String,
    },
}

impl InteractionEvent {
    /// Get the agent id from any event variant.
    #[must_use]
    pub fn agent_id(&self) -> &str {
        match self {
            Self::MessageSent { agent_id, .. }
            | Self::ResponsePending { agent_id }
            | Self::ResponseArrived { agent_id, .. }
            | Self::ResponseCancelled { agent_id }
            | Self::ChoiceSelected { agent_id, .. } => agent_id,
        }
    }

    /// Human-readable notice for toast-style display, if the event carries one.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::ChoiceSelected { key, .. } => Some(format!("Selected: {}", key)),
            _ => None,
        }
    }
}
