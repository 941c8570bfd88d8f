//! Error types for the classroom engine.

use classroom_events::AgentId;

use crate::config::ConfigError;

/// Errors that can occur while building or running a classroom.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A personality trait was outside [0, 1].
    #[error("personality trait `{trait_name}` out of range: {value}")]
    TraitOutOfRange {
        trait_name: &'static str,
        value: f32,
    },

    /// The log sink failed to persist records.
    #[error("log sink error: {0}")]
    Sink(#[from] std::io::Error),

    /// A record could not be encoded for the sink.
    #[error("record encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// No agent with the given id exists in this classroom.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),
}

pub type SimResult<T> = Result<T, SimError>;
