//! Partner Negotiation
//!
//! Sub-state machine shared by the behaviors that need a second agent.
//! Invitations travel as interaction requests; acceptance is observed in the
//! next committed snapshot, never by touching the other agent directly.

use rand::Rng;

use classroom_events::{AgentId, BehaviorKind};

use super::ExecContext;
use crate::interaction::InteractionRequest;

/// Where the negotiation with a partner stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Negotiation {
    #[default]
    Idle,
    /// Invitation sent, waiting to see the invitee join
    Pending { invitee: AgentId, waited: u32 },
    /// Partner agreed; `grace` ticks left for it to show up
    Accepted { partner: AgentId, grace: u32 },
}

#[derive(Debug, Clone)]
pub struct Partnership {
    kind: BehaviorKind,
    negotiation: Negotiation,
}

impl Partnership {
    pub fn new(kind: BehaviorKind) -> Self {
        Self {
            kind,
            negotiation: Negotiation::Idle,
        }
    }

    pub fn negotiation(&self) -> Negotiation {
        self.negotiation
    }

    /// The accepted partner, if any.
    pub fn partner(&self) -> Option<AgentId> {
        match self.negotiation {
            Negotiation::Accepted { partner, .. } => Some(partner),
            _ => None,
        }
    }

    /// True while an invitation is out or a partner is accepted.
    pub fn is_engaged(&self) -> bool {
        !matches!(self.negotiation, Negotiation::Idle)
    }

    pub fn accept(&mut self, partner: AgentId, grace: u32) {
        self.negotiation = Negotiation::Accepted { partner, grace };
    }

    pub fn release(&mut self) {
        self.negotiation = Negotiation::Idle;
    }

    /// Advance the negotiation one step.
    ///
    /// Returns true when a partner is confirmed doing the same behavior and the
    /// caller should apply its effect.
    pub fn advance<F>(&mut self, cx: &mut ExecContext<'_>, receptive: F) -> bool
    where
        F: Fn(BehaviorKind) -> bool,
    {
        let kind = self.kind;
        match self.negotiation {
            Negotiation::Idle => {
                let candidates: Vec<AgentId> = cx.env.candidates(cx.id, receptive).collect();
                if candidates.is_empty() {
                    cx.journal.debug(format!("Nobody around to {} with", kind));
                    return false;
                }
                let invitee = candidates[cx.rng.gen_range(0..candidates.len())];
                cx.outbox.post(invitee, InteractionRequest::new(cx.id, kind));
                cx.journal.debug(format!("Inviting {} to {} ...", invitee, kind));
                self.negotiation = Negotiation::Pending { invitee, waited: 0 };
                false
            }
            Negotiation::Pending { invitee, waited } => {
                if cx.env.is_doing(invitee, kind) {
                    cx.journal.debug(format!("{} joined to {}", invitee, kind));
                    self.negotiation = Negotiation::Accepted { partner: invitee, grace: 0 };
                    true
                } else if waited >= cx.config.interaction.max_pending_ticks {
                    cx.journal.debug(format!("{} did not answer, giving up on {}", invitee, kind));
                    self.negotiation = Negotiation::Idle;
                    false
                } else {
                    self.negotiation = Negotiation::Pending { invitee, waited: waited + 1 };
                    false
                }
            }
            Negotiation::Accepted { partner, grace } => {
                if cx.env.is_doing(partner, kind) {
                    self.negotiation = Negotiation::Accepted { partner, grace: 0 };
                    true
                } else if grace > 0 {
                    self.negotiation = Negotiation::Accepted { partner, grace: grace - 1 };
                    false
                } else {
                    cx.journal.debug(format!("{} stopped to {}", partner, kind));
                    self.negotiation = Negotiation::Idle;
                    false
                }
            }
        }
    }
}
