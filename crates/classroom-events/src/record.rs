//! Log Records
//!
//! The per-agent, per-tick record stream emitted by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AgentId;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Debug,
    Error,
}

impl LogLevel {
    /// Single-letter code used in flat exports.
    pub fn code(self) -> &'static str {
        match self {
            LogLevel::Info => "I",
            LogLevel::Debug => "D",
            LogLevel::Error => "E",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single `(agent, tick, level, message)` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub agent_id: AgentId,
    pub tick: u64,
    pub level: LogLevel,
    pub message: String,
}

impl LogRecord {
    pub fn new(agent_id: AgentId, tick: u64, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            agent_id,
            tick,
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}|{}", self.agent_id, self.tick, self.level, self.message)
    }
}
