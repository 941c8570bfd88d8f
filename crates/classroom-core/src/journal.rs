//! Agent Journal
//!
//! Per-agent record buffer. Each agent writes only to its own journal during a
//! phase; the classroom drains journals into the sink in agent order.

use std::collections::VecDeque;

use classroom_events::{AgentId, LogLevel, LogRecord};

/// Number of Debug/Error messages kept for status display
pub const RECENT_MESSAGES: usize = 5;

#[derive(Debug, Clone)]
pub struct Journal {
    agent_id: AgentId,
    tick: u64,
    records: Vec<LogRecord>,
    recent: VecDeque<String>,
}

impl Journal {
    pub fn new(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            tick: 0,
            records: Vec::new(),
            recent: VecDeque::with_capacity(RECENT_MESSAGES),
        }
    }

    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.remember(&message);
        self.push(LogLevel::Debug, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.remember(&message);
        self.push(LogLevel::Error, message);
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.records
            .push(LogRecord::new(self.agent_id, self.tick, level, message));
    }

    fn remember(&mut self, message: &str) {
        if self.recent.len() == RECENT_MESSAGES {
            self.recent.pop_front();
        }
        self.recent.push_back(message.to_string());
    }

    /// Take every buffered record, oldest first.
    pub fn drain(&mut self) -> Vec<LogRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn pending(&self) -> &[LogRecord] {
        &self.records
    }

    /// Last Debug/Error messages, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }
}
