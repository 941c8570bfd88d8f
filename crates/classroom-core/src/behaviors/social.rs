//! Social Behaviors
//!
//! Chat and Quarrel both need a partner, negotiated through interaction
//! requests. Chatting cheers an agent up; quarrelling drags happiness down.

use classroom_events::BehaviorKind;

use super::{ActionState, AgentBehavior, ExecContext, Partnership, RateContext};
use crate::state::clamp_unit;

/// Agents on a break or already chatting can be drawn into a chat.
fn chat_receptive(kind: BehaviorKind) -> bool {
    matches!(kind, BehaviorKind::Break | BehaviorKind::Chat)
}

/// Anyone not buried in solo study can be picked on.
fn quarrel_receptive(kind: BehaviorKind) -> bool {
    kind != BehaviorKind::StudyAlone
}

#[derive(Debug, Clone)]
pub struct Chat {
    state: ActionState,
    partnership: Partnership,
}

impl Chat {
    pub fn new() -> Self {
        Self {
            state: ActionState::NotStarted,
            partnership: Partnership::new(BehaviorKind::Chat),
        }
    }

    pub fn partnership(&self) -> &Partnership {
        &self.partnership
    }

    pub fn partnership_mut(&mut self) -> &mut Partnership {
        &mut self.partnership
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBehavior for Chat {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Chat
    }

    fn state(&self) -> ActionState {
        self.state
    }

    fn is_possible(&self, cx: &RateContext<'_>) -> bool {
        self.partnership.is_engaged() || cx.env.candidates(cx.id, chat_receptive).next().is_some()
    }

    // Extraverted agents with little drive left to study prefer chatting
    fn rate(&self, cx: &RateContext<'_>) -> f32 {
        let weights = &cx.config.chat;
        let extra = cx.personality.extraversion();
        let drained = clamp_unit(1.0 - cx.state.motivation.get());
        let t = extra * weights.extraversion_weight + drained * (1.0 - weights.extraversion_weight);
        clamp_unit(t) * weights.score_scale
    }

    fn execute(&mut self, cx: &mut ExecContext<'_>) -> bool {
        self.state = ActionState::Executing;
        if !self.partnership.advance(cx, chat_receptive) {
            return false;
        }
        let weights = &cx.config.chat;
        cx.state.happiness.adjust(weights.happiness_increase);
        cx.state.motivation.adjust(-weights.motivation_decrease);
        true
    }

    fn end(&mut self) {
        self.state = ActionState::NotStarted;
        self.partnership.release();
    }
}

#[derive(Debug, Clone)]
pub struct Quarrel {
    state: ActionState,
    partnership: Partnership,
}

impl Quarrel {
    pub fn new() -> Self {
        Self {
            state: ActionState::NotStarted,
            partnership: Partnership::new(BehaviorKind::Quarrel),
        }
    }

    pub fn partnership(&self) -> &Partnership {
        &self.partnership
    }

    pub fn partnership_mut(&mut self) -> &mut Partnership {
        &mut self.partnership
    }
}

impl Default for Quarrel {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBehavior for Quarrel {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Quarrel
    }

    fn state(&self) -> ActionState {
        self.state
    }

    fn is_possible(&self, cx: &RateContext<'_>) -> bool {
        self.partnership.is_engaged()
            || cx.env.candidates(cx.id, quarrel_receptive).next().is_some()
    }

    // Disagreeable, neurotic and unhappy agents pick fights
    fn rate(&self, cx: &RateContext<'_>) -> f32 {
        let weights = &cx.config.quarrel;
        let hostile = 1.0 - cx.personality.agreeableness();
        let nervous = cx.personality.neuroticism();
        let unhappy = 1.0 - cx.state.happiness.get();
        let state_weight = 1.0 - weights.agreeableness_weight - weights.neuroticism_weight;
        let t = hostile * weights.agreeableness_weight
            + nervous * weights.neuroticism_weight
            + unhappy * state_weight;
        clamp_unit(t) * weights.score_scale
    }

    fn execute(&mut self, cx: &mut ExecContext<'_>) -> bool {
        self.state = ActionState::Executing;
        if !self.partnership.advance(cx, quarrel_receptive) {
            return false;
        }
        let weights = &cx.config.quarrel;
        cx.state.happiness.adjust(-weights.happiness_decrease);
        cx.state.motivation.adjust(-weights.motivation_decrease);
        true
    }

    fn end(&mut self) {
        self.state = ActionState::NotStarted;
        self.partnership.release();
    }
}
