//! Shared data types for the classroom simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for the engine and for anything that reads its output.

pub mod behavior;
pub mod record;
pub mod scores;
pub mod snapshot;

pub use behavior::{AgentId, BehaviorKind};
pub use record::{LogLevel, LogRecord};
pub use scores::{Scores, MASKED_SCORE};
pub use snapshot::{
    AgentSnapshot, ClassroomSnapshot, EnvironmentSnapshot, FreeSeats, PeerView, SeatKind,
    TraitsSnapshot,
};
