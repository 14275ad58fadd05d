//! Conversation Store
//!
//! Owns the mapping from agent id to conversation. All mutation goes through
//! the store's write lock, so `append` and `set_selected_choice` are mutually
//! exclusive and readers only ever observe whole messages.

use super::{Conversation, Message, NewMessage};
use crate::agent::Agent;
use crate::error::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory store of per-agent conversations.
///
/// One conversation per agent id, created on first selection of that agent
/// and kept for the process lifetime. There is no deletion path.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the conversation for `agent`, creating it seeded with a welcome
    /// message if it does not exist yet. Idempotent: an existing conversation
    /// is returned unchanged.
    pub async fn ensure_initialized(&self, agent: &Agent) -> Vec<Message> {
        let mut conversations = self.conversations.write().await;
        conversations
            .entry(agent.id.clone())
            .or_insert_with(|| {
                debug!(agent_id = %agent.id, "Initializing conversation");
                Conversation::new(agent)
            })
            .messages()
            .to_vec()
    }

    /// Append a draft to `agent`'s conversation, creating the conversation
    /// first if absent.
    ///
    /// Fails with `InvalidMessage` if the draft carries a selected choice
    /// without a choice set, or a selection that is not an offered key.
    /// Returns the stored message with its assigned id.
    pub async fn append(&self, agent: &Agent, draft: NewMessage) -> Result<Message> {
        draft.validate()?;
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .entry(agent.id.clone())
            .or_insert_with(|| Conversation::new(agent));
        Ok(conversation.push(draft))
    }

    /// Set the selected choice of one message.
    ///
    /// Fails with `NotFound` if the agent has no conversation or the message
    /// id is absent, and with `InvalidChoice` if `key` is not offered by that
    /// message. On success only that message's `selected_choice` changes;
    /// the updated message is returned.
    pub async fn set_selected_choice(
        &self,
        agent_id: &str,
        message_id: u64,
        key: &str,
    ) -> Result<Message> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(agent_id)
            .ok_or_else(|| Error::NotFound(format!("conversation for agent '{}'", agent_id)))?;
        let message = conversation.find_mut(message_id).ok_or_else(|| {
            Error::NotFound(format!(
                "message {} in conversation for agent '{}'",
                message_id, agent_id
            ))
        })?;

        let offered = message
            .choices
            .as_ref()
            .is_some_and(|choices| choices.contains(key));
        if !offered {
            return Err(Error::InvalidChoice {
                message_id,
                key: key.to_string(),
            });
        }

        message.selected_choice = Some(key.to_string());
        Ok(message.clone())
    }

    /// Snapshot of the conversation for `agent_id`, or an empty sequence if
    /// none exists. Unlike `ensure_initialized` this never creates one.
    pub async fn get(&self, agent_id: &str) -> Vec<Message> {
        self.conversations
            .read()
            .await
            .get(agent_id)
            .map(|c| c.messages().to_vec())
            .unwrap_or_default()
    }

    /// Number of messages in `agent_id`'s conversation (0 if none).
    pub async fn message_count(&self, agent_id: &str) -> usize {
        self.conversations
            .read()
            .await
            .get(agent_id)
            .map(Conversation::len)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ChoiceSet, Originator};

    fn agent() -> Agent {
        Agent::new("agent-2", "News Crawler")
    }

    #[tokio::test]
    async fn test_ensure_initialized_idempotent() {
        let store = ConversationStore::new();
        let agent = agent();

        let first = store.ensure_initialized(&agent).await;
        let second = store.ensure_initialized(&agent).await;

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0], second[0]);
        assert!(first[0].content.contains("News Crawler"));
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let store = ConversationStore::new();

        assert!(store.get("agent-2").await.is_empty());
        // Still no conversation afterwards
        assert_eq!(store.message_count("agent-2").await, 0);
    }

    #[tokio::test]
    async fn test_append_then_get() {
        let store = ConversationStore::new();
        let agent = agent();
        store.ensure_initialized(&agent).await;

        let before = store.get(&agent.id).await.len();
        let appended = store
            .append(&agent, NewMessage::user("hello"))
            .await
            .unwrap();

        let messages = store.get(&agent.id).await;
        assert_eq!(messages.len(), before + 1);
        assert_eq!(messages.last().unwrap(), &appended);
        assert_eq!(appended.originator, Originator::User);
    }

    #[tokio::test]
    async fn test_append_creates_conversation_with_welcome() {
        let store = ConversationStore::new();
        let agent = agent();

        store.append(&agent, NewMessage::user("hi")).await.unwrap();

        let messages = store.get(&agent.id).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].originator, Originator::Agent);
        assert_eq!(messages[1].content, "hi");
    }

    #[tokio::test]
    async fn test_append_rejects_orphan_selection() {
        let store = ConversationStore::new();
        let mut draft = NewMessage::user("hello");
        draft.selected_choice = Some("choice_1".to_string());

        let err = store.append(&agent(), draft).await.unwrap_err();
        assert!(matches!(err, Error::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn test_set_selected_choice() {
        let store = ConversationStore::new();
        let agent = agent();
        let choices = ChoiceSet::from_pairs([("choice_1", "A"), ("choice_2", "B")]).unwrap();
        let message = store
            .append(&agent, NewMessage::agent("pick one").with_choices(choices))
            .await
            .unwrap();

        let updated = store
            .set_selected_choice(&agent.id, message.id, "choice_2")
            .await
            .unwrap();
        assert_eq!(updated.selected_choice.as_deref(), Some("choice_2"));

        // Only that message changed
        let messages = store.get(&agent.id).await;
        assert_eq!(messages[0].selected_choice, None);
        assert_eq!(
            messages.last().unwrap().selected_choice.as_deref(),
            Some("choice_2")
        );
    }

    #[tokio::test]
    async fn test_set_selected_choice_invalid_key_leaves_message_unmodified() {
        let store = ConversationStore::new();
        let agent = agent();
        let choices = ChoiceSet::from_pairs([("choice_1", "A")]).unwrap();
        let message = store
            .append(&agent, NewMessage::agent("pick").with_choices(choices))
            .await
            .unwrap();

        let err = store
            .set_selected_choice(&agent.id, message.id, "choice_9")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidChoice { .. }));

        let messages = store.get(&agent.id).await;
        assert_eq!(messages.last().unwrap().selected_choice, None);
    }

    #[tokio::test]
    async fn test_set_selected_choice_not_found() {
        let store = ConversationStore::new();
        let agent = agent();

        // No conversation at all
        let err = store
            .set_selected_choice(&agent.id, 1, "choice_1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // Conversation exists but message id doesn't
        store.ensure_initialized(&agent).await;
        let err = store
            .set_selected_choice(&agent.id, 99, "choice_1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_message_without_choices_rejects_selection() {
        let store = ConversationStore::new();
        let agent = agent();
        let message = store
            .append(&agent, NewMessage::user("plain text"))
            .await
            .unwrap();

        let err = store
            .set_selected_choice(&agent.id, message.id, "choice_1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidChoice { .. }));
    }

    #[tokio::test]
    async fn test_conversations_independent_across_agents() {
        let store = ConversationStore::new();
        let a = Agent::new("agent-1", "A");
        let b = Agent::new("agent-2", "B");

        store.append(&a, NewMessage::user("to a")).await.unwrap();
        store.ensure_initialized(&b).await;

        assert_eq!(store.message_count("agent-1").await, 2);
        assert_eq!(store.message_count("agent-2").await, 1);
    }
}
