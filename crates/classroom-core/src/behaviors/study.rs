//! Study Behaviors
//!
//! Studying occupies a seat: an individual desk for StudyAlone, a place at a
//! group table for StudyGroup. An agent already studying keeps its seat.

use classroom_events::{BehaviorKind, SeatKind};

use super::{ActionState, AgentBehavior, ExecContext, RateContext};
use crate::state::clamp_unit;

fn seat_available(state: ActionState, cx: &RateContext<'_>, seat: SeatKind) -> bool {
    state == ActionState::Executing || cx.env.free_seats(seat) > 0
}

#[derive(Debug, Clone, Default)]
pub struct StudyAlone {
    state: ActionState,
}

impl StudyAlone {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgentBehavior for StudyAlone {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::StudyAlone
    }

    fn state(&self) -> ActionState {
        self.state
    }

    fn is_possible(&self, cx: &RateContext<'_>) -> bool {
        seat_available(self.state, cx, SeatKind::Individual)
    }

    // Conscientious, motivated agents study alone unless the room is loud
    fn rate(&self, cx: &RateContext<'_>) -> f32 {
        let weights = &cx.config.study_alone;
        let diligent = cx.personality.conscientiousness();
        let motivation = cx.state.motivation.get();
        let t = diligent * weights.conscientiousness_weight
            + motivation * (1.0 - weights.conscientiousness_weight)
            - cx.env.noise * weights.noise_penalty;
        clamp_unit(t) * weights.score_scale
    }

    fn execute(&mut self, cx: &mut ExecContext<'_>) -> bool {
        self.state = ActionState::Executing;
        cx.state.motivation.adjust(-cx.config.study_alone.motivation_decrease);
        true
    }

    fn end(&mut self) {
        self.state = ActionState::NotStarted;
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudyGroup {
    state: ActionState,
}

impl StudyGroup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgentBehavior for StudyGroup {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::StudyGroup
    }

    fn state(&self) -> ActionState {
        self.state
    }

    fn is_possible(&self, cx: &RateContext<'_>) -> bool {
        seat_available(self.state, cx, SeatKind::Group)
    }

    fn rate(&self, cx: &RateContext<'_>) -> f32 {
        let weights = &cx.config.study_group;
        let traits = (cx.personality.conscientiousness() + cx.personality.extraversion()) / 2.0;
        let motivation = cx.state.motivation.get();
        let t = traits * weights.trait_weight + motivation * (1.0 - weights.trait_weight);
        clamp_unit(t) * weights.score_scale
    }

    fn execute(&mut self, cx: &mut ExecContext<'_>) -> bool {
        self.state = ActionState::Executing;
        let weights = &cx.config.study_group;
        cx.state.motivation.adjust(-weights.motivation_decrease);
        cx.state
            .happiness
            .adjust(weights.happiness_increase * cx.personality.extraversion());
        true
    }

    fn end(&mut self) {
        self.state = ActionState::NotStarted;
    }
}
