//! Conversation data model
//!
//! A conversation is the append-ordered message history between the user and
//! one agent. Message ids are assigned by the conversation from a monotonic
//! counter, so they are unique within a conversation and never reused.

use crate::agent::Agent;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The store owning all per-agent conversations.
pub mod store;

pub use store::ConversationStore;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Originator {
    /// The dashboard user
    User,
    /// The scraping agent
    Agent,
}

/// One entry of a choice set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Stable key, e.g. `choice_1`
    pub key: String,
    /// Human-readable label
    pub text: String,
}

/// An agent-offered set of response options attached to one message.
///
/// Keys are unique and iteration order is insertion order, which is the
/// order the presentation layer renders the option buttons in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
}

impl ChoiceSet {
    /// Create an empty choice set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a choice set from key/label pairs.
    ///
    /// Fails with `InvalidMessage` on a duplicate key.
    pub fn from_pairs<K, T>(pairs: impl IntoIterator<Item = (K, T)>) -> Result<Self>
    where
        K: Into<String>,
        T: Into<String>,
    {
        let mut set = Self::new();
        for (key, text) in pairs {
            set.insert(key, text)?;
        }
        Ok(set)
    }

    /// Append a choice. Fails with `InvalidMessage` if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.contains(&key) {
            return Err(Error::InvalidMessage(format!(
                "duplicate choice key '{}'",
                key
            )));
        }
        self.choices.push(Choice {
            key,
            text: text.into(),
        });
        Ok(())
    }

    /// Whether the given key is offered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.choices.iter().any(|c| c.key == key)
    }

    /// Label for the given key, if offered.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.text.as_str())
    }

    /// Iterate choices in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    /// Number of choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A message as stored in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Id unique within the owning conversation, monotonically assigned
    pub id: u64,
    /// Owning agent id
    pub agent_id: String,
    /// Who produced the message
    pub originator: Originator,
    /// Textual content
    pub content: String,
    /// Optional choice set offered by the agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<ChoiceSet>,
    /// Key of the chosen option; only ever set when `choices` is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_choice: Option<String>,
    /// Display timestamp (HH:MM)
    pub timestamp: String,
}

/// A message draft before the store assigns it an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    /// Who produced the message
    pub originator: Originator,
    /// Textual content
    pub content: String,
    /// Optional choice set
    pub choices: Option<ChoiceSet>,
    /// Optional pre-selected choice key
    pub selected_choice: Option<String>,
}

impl NewMessage {
    /// Draft a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            originator: Originator::User,
            content: content.into(),
            choices: None,
            selected_choice: None,
        }
    }

    /// Draft an agent message.
    #[must_use]
    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            originator: Originator::Agent,
            content: content.into(),
            choices: None,
            selected_choice: None,
        }
    }

    /// Attach a choice set (builder style).
    #[must_use]
    pub fn with_choices(mut self, choices: ChoiceSet) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Check the choice-set/selected-choice pairing invariant.
    ///
    /// A draft with no choice set must not carry a selection, and a selection
    /// must be one of the offered keys.
    pub fn validate(&self) -> Result<()> {
        match (&self.choices, &self.selected_choice) {
            (None, Some(selected)) => Err(Error::InvalidMessage(format!(
                "selected choice '{}' without a choice set",
                selected
            ))),
            (Some(choices), Some(selected)) if !choices.contains(selected) => {
                Err(Error::InvalidMessage(format!(
                    "selected choice '{}' is not an offered key",
                    selected
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Ordered message history between the user and one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    agent_id: String,
    messages: Vec<Message>,
    next_message_id: u64,
}

impl Conversation {
    /// Create a conversation seeded with the agent's welcome message.
    #[must_use]
    pub fn new(agent: &Agent) -> Self {
        let mut conversation = Self {
            agent_id: agent.id.clone(),
            messages: Vec::new(),
            next_message_id: 1,
        };
        conversation.push(NewMessage::agent(welcome_content(&agent.name)));
        conversation
    }

    /// Append a draft, assigning the next message id and a timestamp.
    pub(crate) fn push(&mut self, draft: NewMessage) -> Message {
        let message = Message {
            id: self.next_message_id,
            agent_id: self.agent_id.clone(),
            originator: draft.originator,
            content: draft.content,
            choices: draft.choices,
            selected_choice: draft.selected_choice,
            timestamp: display_timestamp(),
        };
        self.next_message_id += 1;
        self.messages.push(message.clone());
        message
    }

    pub(crate) fn find_mut(&mut self, id: u64) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Owning agent id.
    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Messages in append (chronological) order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Welcome message content for a lazily initialized conversation.
#[must_use]
pub fn welcome_content(agent_name: &str) -> String {
    format!(
        "Hello! I'm {}. I'm ready to help you scrape data. \
         Please provide the website URL and instructions.",
        agent_name
    )
}

fn display_timestamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_set_insertion_order() {
        let set = ChoiceSet::from_pairs([("b", "Second"), ("a", "First")]).unwrap();
        let keys: Vec<&str> = set.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_choice_set_duplicate_key() {
        let err = ChoiceSet::from_pairs([("x", "One"), ("x", "Two")]).unwrap_err();
        assert!(matches!(err, Error::InvalidMessage(_)));
    }

    #[test]
    fn test_choice_set_lookup() {
        let set = ChoiceSet::from_pairs([("choice_1", "Extract prices")]).unwrap();
        assert!(set.contains("choice_1"));
        assert_eq!(set.get("choice_1"), Some("Extract prices"));
        assert_eq!(set.get("choice_2"), None);
    }

    #[test]
    fn test_validate_selection_without_choices() {
        let mut draft = NewMessage::user("hello");
        draft.selected_choice = Some("choice_1".to_string());

        let err = draft.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidMessage(_)));
    }

    #[test]
    fn test_validate_selection_not_offered() {
        let choices = ChoiceSet::from_pairs([("choice_1", "A")]).unwrap();
        let mut draft = NewMessage::agent("pick").with_choices(choices);
        draft.selected_choice = Some("choice_2".to_string());

        assert!(draft.validate().is_err());

        draft.selected_choice = Some("choice_1".to_string());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_conversation_seeds_welcome() {
        let agent = Agent::new("agent-2", "News Crawler");
        let conversation = Conversation::new(&agent);

        assert_eq!(conversation.len(), 1);
        let welcome = &conversation.messages()[0];
        assert_eq!(welcome.originator, Originator::Agent);
        assert!(welcome.content.contains("News Crawler"));
        assert_eq!(welcome.agent_id, "agent-2");
    }

    #[test]
    fn test_message_ids_monotonic() {
        let agent = Agent::new("agent-1", "Scraper");
        let mut conversation = Conversation::new(&agent);

        let first = conversation.push(NewMessage::user("one"));
        let second = conversation.push(NewMessage::user("two"));

        assert!(second.id > first.id);
        assert_eq!(conversation.messages().last().unwrap().content, "two");
    }
}
