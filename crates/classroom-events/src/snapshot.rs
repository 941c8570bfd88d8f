//! Snapshot Types
//!
//! The immutable per-tick environment view handed to every agent, and the
//! serialisable state dump of a whole classroom.

use serde::{Deserialize, Serialize};

use crate::{AgentId, BehaviorKind, Scores};

/// Kind of seat a study behavior occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    Individual,
    Group,
}

/// Seats still free after the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSeats {
    pub individual: u32,
    pub group: u32,
}

impl FreeSeats {
    pub fn get(&self, kind: SeatKind) -> u32 {
        match kind {
            SeatKind::Individual => self.individual,
            SeatKind::Group => self.group,
        }
    }

    /// Take one seat of `kind`. Returns false when none is left.
    pub fn claim(&mut self, kind: SeatKind) -> bool {
        let free = match kind {
            SeatKind::Individual => &mut self.individual,
            SeatKind::Group => &mut self.group,
        };
        if *free == 0 {
            return false;
        }
        *free -= 1;
        true
    }

    pub fn release(&mut self, kind: SeatKind) {
        match kind {
            SeatKind::Individual => self.individual += 1,
            SeatKind::Group => self.group += 1,
        }
    }
}

/// What other agents could see of one agent at the end of the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerView {
    pub id: AgentId,
    pub action: BehaviorKind,
    pub executing: bool,
}

/// Committed state of the classroom at the end of a tick.
///
/// Produced once per tick and read by every agent during the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// Tick this snapshot was committed at (0 before the first tick)
    pub tick: u64,
    /// Ambient noise level in [0, 1]
    pub noise: f32,
    /// Mean individual score vector across all agents
    pub peer_scores: Scores,
    /// One entry per agent, ordered by id
    pub peers: Vec<PeerView>,
    pub free_seats: FreeSeats,
}

impl EnvironmentSnapshot {
    /// A silent snapshot with no peers and zero peer scores.
    pub fn quiet(noise: f32, free_seats: FreeSeats) -> Self {
        Self {
            tick: 0,
            noise,
            peer_scores: Scores::zero(),
            peers: Vec::new(),
            free_seats,
        }
    }

    pub fn peer(&self, id: AgentId) -> Option<&PeerView> {
        match self.peers.get(id.index()) {
            Some(view) if view.id == id => Some(view),
            _ => self.peers.iter().find(|view| view.id == id),
        }
    }

    /// True when `id` was doing `kind` at the end of the previous tick.
    pub fn is_doing(&self, id: AgentId, kind: BehaviorKind) -> bool {
        self.peer(id).map_or(false, |view| view.action == kind)
    }

    /// Other agents whose last action satisfies `accept`, in id order.
    pub fn candidates<'a, F>(&'a self, me: AgentId, accept: F) -> impl Iterator<Item = AgentId> + 'a
    where
        F: Fn(BehaviorKind) -> bool + 'a,
    {
        self.peers
            .iter()
            .filter(move |view| view.id != me && accept(view.action))
            .map(|view| view.id)
    }

    pub fn free_seats(&self, kind: SeatKind) -> u32 {
        self.free_seats.get(kind)
    }
}

/// Personality traits as exported in state dumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitsSnapshot {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

/// State dump of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub name: String,
    pub personality: String,
    pub traits: TraitsSnapshot,
    pub conformity: f32,
    pub happiness: f32,
    pub motivation: f32,
    pub attention: f32,
    pub action: BehaviorKind,
    pub desire: BehaviorKind,
    pub previous_action: BehaviorKind,
    pub ticks_on_task: u32,
    pub scores: Scores,
    /// Last debug and error messages, oldest first
    pub recent_messages: Vec<String>,
}

/// State dump of a whole classroom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassroomSnapshot {
    pub tick: u64,
    pub noise: f32,
    pub peer_scores: Scores,
    pub free_seats: FreeSeats,
    pub agents: Vec<AgentSnapshot>,
}
