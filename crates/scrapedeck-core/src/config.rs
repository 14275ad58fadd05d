//! Interaction configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default simulated response delay in milliseconds (matches the observed
/// latency of the original dashboard)
pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 2000;

/// Default event bus channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration for the interaction controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Simulated response latency in milliseconds (default: 2000)
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,

    /// Event bus capacity before slow subscribers lag (default: 256)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_response_delay_ms() -> u64 {
    DEFAULT_RESPONSE_DELAY_MS
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: default_response_delay_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl InteractionConfig {
    /// Response delay as a `Duration`.
    #[must_use]
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InteractionConfig::default();
        assert_eq!(config.response_delay(), Duration::from_millis(2000));
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: InteractionConfig =
            serde_json::from_str(r#"{"response_delay_ms": 50}"#).unwrap();
        assert_eq!(config.response_delay_ms, 50);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }
}
