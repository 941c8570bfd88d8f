//! Behavior Identity
//!
//! The fixed set of mutually exclusive behaviors and the identifier used to
//! address agents across the classroom.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an agent within one classroom.
///
/// Ids are dense: the agent with id `n` is the `n`-th agent spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Position of this agent in dense per-classroom storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "student_{:03}", self.0)
    }
}

/// One of the mutually exclusive behaviors an agent can perform.
///
/// The declaration order is the registry order: score vectors and peer score
/// vectors are indexed by it everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    Break,
    Quarrel,
    Chat,
    StudyAlone,
    StudyGroup,
}

impl BehaviorKind {
    /// Number of behavior variants.
    pub const COUNT: usize = 5;

    /// All variants in registry order.
    pub const ALL: [BehaviorKind; BehaviorKind::COUNT] = [
        BehaviorKind::Break,
        BehaviorKind::Quarrel,
        BehaviorKind::Chat,
        BehaviorKind::StudyAlone,
        BehaviorKind::StudyGroup,
    ];

    /// Index of this variant in score vectors.
    pub fn index(self) -> usize {
        match self {
            BehaviorKind::Break => 0,
            BehaviorKind::Quarrel => 1,
            BehaviorKind::Chat => 2,
            BehaviorKind::StudyAlone => 3,
            BehaviorKind::StudyGroup => 4,
        }
    }

    /// Variant at a score vector index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name used in log messages.
    pub fn name(self) -> &'static str {
        match self {
            BehaviorKind::Break => "Break",
            BehaviorKind::Quarrel => "Quarrel",
            BehaviorKind::Chat => "Chat",
            BehaviorKind::StudyAlone => "StudyAlone",
            BehaviorKind::StudyGroup => "StudyGroup",
        }
    }

    /// True for behaviors negotiated with a partner through interaction requests.
    pub fn is_interaction(self) -> bool {
        matches!(self, BehaviorKind::Chat | BehaviorKind::Quarrel)
    }

    /// True for behaviors that occupy a seat and produce attention.
    pub fn is_study(self) -> bool {
        matches!(self, BehaviorKind::StudyAlone | BehaviorKind::StudyGroup)
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
