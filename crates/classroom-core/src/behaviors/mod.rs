//! Behavior Variants
//!
//! Every behavior exposes the same capability set: a feasibility check, a
//! desirability score, a single execution step and termination. The agent
//! owns one instance of each variant in a fixed, enum-indexed registry.

pub mod partnership;
pub mod social;
pub mod study;
pub mod take_break;

use rand::rngs::SmallRng;

use classroom_events::{AgentId, BehaviorKind, EnvironmentSnapshot};

use crate::config::Config;
use crate::interaction::Outbox;
use crate::journal::Journal;
use crate::personality::Personality;
use crate::state::AgentState;

pub use partnership::{Negotiation, Partnership};
pub use social::{Chat, Quarrel};
pub use study::{StudyAlone, StudyGroup};
pub use take_break::Break;

/// Execution state of a behavior instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    NotStarted,
    Executing,
}

/// Read-only view of an agent and its surroundings, used for scoring.
pub struct RateContext<'a> {
    pub id: AgentId,
    pub personality: &'a Personality,
    pub state: &'a AgentState,
    pub env: &'a EnvironmentSnapshot,
    pub config: &'a Config,
}

/// Mutable access needed to run one execution step.
pub struct ExecContext<'a> {
    pub id: AgentId,
    pub personality: &'a Personality,
    pub state: &'a mut AgentState,
    pub env: &'a EnvironmentSnapshot,
    pub config: &'a Config,
    pub rng: &'a mut SmallRng,
    pub outbox: &'a mut Outbox,
    pub journal: &'a mut Journal,
}

/// Capability set shared by all behavior variants.
pub trait AgentBehavior {
    fn kind(&self) -> BehaviorKind;

    fn state(&self) -> ActionState;

    /// Whether the behavior can run right now. Evaluated fresh on every call.
    fn is_possible(&self, cx: &RateContext<'_>) -> bool;

    /// Desirability score, roughly in [0, score_scale]. Must not mutate anything.
    fn rate(&self, cx: &RateContext<'_>) -> f32;

    /// Advance one step and apply the effect on the agent.
    ///
    /// Returns false when no effect could be applied this step.
    fn execute(&mut self, cx: &mut ExecContext<'_>) -> bool;

    /// Return to `NotStarted` and release any partner.
    fn end(&mut self);
}

/// Noise an agent contributes to the classroom while doing `kind`.
pub fn noise_of(kind: BehaviorKind, config: &Config) -> f32 {
    match kind {
        BehaviorKind::Break => config.break_time.noise,
        BehaviorKind::Quarrel => config.quarrel.noise,
        BehaviorKind::Chat => config.chat.noise,
        BehaviorKind::StudyAlone => config.study_alone.noise,
        BehaviorKind::StudyGroup => config.study_group.noise,
    }
}

/// Tagged behavior instance.
#[derive(Debug, Clone)]
pub enum Behavior {
    Break(Break),
    Quarrel(Quarrel),
    Chat(Chat),
    StudyAlone(StudyAlone),
    StudyGroup(StudyGroup),
}

impl Behavior {
    pub fn new(kind: BehaviorKind) -> Self {
        match kind {
            BehaviorKind::Break => Behavior::Break(Break::new()),
            BehaviorKind::Quarrel => Behavior::Quarrel(Quarrel::new()),
            BehaviorKind::Chat => Behavior::Chat(Chat::new()),
            BehaviorKind::StudyAlone => Behavior::StudyAlone(StudyAlone::new()),
            BehaviorKind::StudyGroup => Behavior::StudyGroup(StudyGroup::new()),
        }
    }

    fn inner(&self) -> &dyn AgentBehavior {
        match self {
            Behavior::Break(b) => b,
            Behavior::Quarrel(b) => b,
            Behavior::Chat(b) => b,
            Behavior::StudyAlone(b) => b,
            Behavior::StudyGroup(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn AgentBehavior {
        match self {
            Behavior::Break(b) => b,
            Behavior::Quarrel(b) => b,
            Behavior::Chat(b) => b,
            Behavior::StudyAlone(b) => b,
            Behavior::StudyGroup(b) => b,
        }
    }

    /// Partner negotiation state, for interaction behaviors only.
    pub fn partnership(&self) -> Option<&Partnership> {
        match self {
            Behavior::Chat(chat) => Some(chat.partnership()),
            Behavior::Quarrel(quarrel) => Some(quarrel.partnership()),
            Behavior::Break(_) | Behavior::StudyAlone(_) | Behavior::StudyGroup(_) => None,
        }
    }

    fn partnership_mut(&mut self) -> Option<&mut Partnership> {
        match self {
            Behavior::Chat(chat) => Some(chat.partnership_mut()),
            Behavior::Quarrel(quarrel) => Some(quarrel.partnership_mut()),
            Behavior::Break(_) | Behavior::StudyAlone(_) | Behavior::StudyGroup(_) => None,
        }
    }
}

impl AgentBehavior for Behavior {
    fn kind(&self) -> BehaviorKind {
        self.inner().kind()
    }

    fn state(&self) -> ActionState {
        self.inner().state()
    }

    fn is_possible(&self, cx: &RateContext<'_>) -> bool {
        self.inner().is_possible(cx)
    }

    fn rate(&self, cx: &RateContext<'_>) -> f32 {
        self.inner().rate(cx)
    }

    fn execute(&mut self, cx: &mut ExecContext<'_>) -> bool {
        self.inner_mut().execute(cx)
    }

    fn end(&mut self) {
        self.inner_mut().end()
    }
}

/// One instance of every behavior, stored in registry order.
#[derive(Debug, Clone)]
pub struct BehaviorSet {
    slots: [Behavior; BehaviorKind::COUNT],
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self {
            slots: BehaviorKind::ALL.map(Behavior::new),
        }
    }

    pub fn get(&self, kind: BehaviorKind) -> &Behavior {
        &self.slots[kind.index()]
    }

    pub fn get_mut(&mut self, kind: BehaviorKind) -> &mut Behavior {
        &mut self.slots[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Behavior> {
        self.slots.iter()
    }

    /// Record an accepted partner on an interaction behavior.
    ///
    /// Returns false when `kind` is not negotiated with a partner.
    pub fn accept_partner(&mut self, kind: BehaviorKind, partner: AgentId, grace_ticks: u32) -> bool {
        match self.get_mut(kind).partnership_mut() {
            Some(partnership) => {
                partnership.accept(partner, grace_ticks);
                true
            }
            None => false,
        }
    }

    /// Number of instances currently executing.
    pub fn executing_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|b| b.state() == ActionState::Executing)
            .count()
    }
}

impl Default for BehaviorSet {
    fn default() -> Self {
        Self::new()
    }
}
