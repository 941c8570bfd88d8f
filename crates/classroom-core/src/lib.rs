//! Classroom simulation engine: agents, behaviors, decisions and interactions.

pub mod agent;
pub mod behaviors;
pub mod classroom;
pub mod config;
pub mod decision;
pub mod error;
pub mod interaction;
pub mod journal;
pub mod personality;
pub mod setup;
pub mod sink;
pub mod state;

pub use agent::Agent;
pub use behaviors::{ActionState, AgentBehavior, Behavior, BehaviorSet};
pub use classroom::Classroom;
pub use config::{default_config_toml, Config, ConfigError};
pub use decision::{apply_sticky_bias, select_action, sticky_bias, Lottery};
pub use error::{SimError, SimResult};
pub use interaction::{Envelope, InteractionRequest, Mailbox, Outbox};
pub use personality::Personality;
pub use setup::spawn_agents;
pub use sink::{JsonlSink, LogSink, MemorySink, NullSink};
pub use state::{AgentState, Level};

pub use classroom_events as events;
