//! EventBus - broadcast-based event system for interaction updates.
//!
//! Publishes an event after every conversation mutation so the presentation
//! layer can re-render snapshots and show toast-style notices without polling.

/// Core event bus implementation (broadcast channel).
pub mod bus;
/// Event type definitions for the interaction workflow.
pub mod types;

pub use bus::EventBus;
pub use types::InteractionEvent;

#[cfg(test)]
mod tests;
