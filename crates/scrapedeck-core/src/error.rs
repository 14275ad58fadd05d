//! Error types for scrapedeck-core
//!
//! Every failure in the interaction core is a local validation error: the
//! caller gets a result it can render as user feedback, nothing is retried
//! automatically, and nothing is fatal to the process.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// An operation that needs a selected agent was called without one
    #[error("no agent selected")]
    NoAgentSelected,

    /// Submission carried neither free text nor a website URL
    #[error("empty input")]
    EmptyInput,

    /// Unknown agent id or message id
    #[error("not found: {0}")]
    NotFound(String),

    /// Choice key is not offered by that message's choice set
    #[error("invalid choice '{key}' for message {message_id}")]
    InvalidChoice {
        /// Message whose choice set was consulted
        message_id: u64,
        /// The rejected choice key
        key: String,
    },

    /// Malformed message construction (selected choice without a choice set,
    /// or a selection that is not one of the offered keys)
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid registry seed or interaction configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
///
/// The presentation layer surfaces validation failures as transient
/// toast-style notices; these strings are what it shows.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::NoAgentSelected => "Please select an agent first".to_string(),
            Error::EmptyInput => "Nothing to send yet.".to_string(),
            Error::NotFound(what) => format!("Not found: {}", what),
            Error::InvalidChoice { key, .. } => {
                format!("'{}' is not one of the offered choices.", key)
            }
            Error::InvalidMessage(msg) => format!("Message rejected: {}", msg),
            Error::Configuration(msg) => format!("Configuration error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::NoAgentSelected => {
                Some("Pick an agent from the agent list, then resend.".to_string())
            }
            Error::EmptyInput => {
                Some("Type a message or provide a website URL to scrape.".to_string())
            }
            Error::InvalidChoice { .. } => {
                Some("Pick one of the options the agent offered.".to_string())
            }
            Error::Configuration(_) => {
                Some("Check the [[agents]] entries in scrapedeck.toml.".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_agent_selected_message() {
        let error = Error::NoAgentSelected;

        let msg = error.user_message();
        assert!(msg.contains("select an agent"));

        let suggestion = error.suggestion().unwrap();
        assert!(suggestion.contains("agent list"));
    }

    #[test]
    fn test_invalid_choice_message() {
        let error = Error::InvalidChoice {
            message_id: 3,
            key: "choice_9".to_string(),
        };

        assert!(error.to_string().contains("choice_9"));
        assert!(error.to_string().contains('3'));
        assert!(error.user_message().contains("choice_9"));
    }

    #[test]
    fn test_not_found_message() {
        let error = Error::NotFound("agent 'agent-42'".to_string());
        assert!(error.user_message().contains("agent-42"));
        assert!(error.suggestion().is_none());
    }
}
