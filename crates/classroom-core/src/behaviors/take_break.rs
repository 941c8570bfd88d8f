//! Break
//!
//! The default behavior. Always possible, so it terminates every fallback chain.

use classroom_events::BehaviorKind;

use super::{ActionState, AgentBehavior, ExecContext, RateContext};
use crate::state::clamp_unit;

#[derive(Debug, Clone, Default)]
pub struct Break {
    state: ActionState,
}

impl Break {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgentBehavior for Break {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Break
    }

    fn state(&self) -> ActionState {
        self.state
    }

    fn is_possible(&self, _cx: &RateContext<'_>) -> bool {
        true
    }

    /// Low extraversion and low motivation make a break more attractive.
    fn rate(&self, cx: &RateContext<'_>) -> f32 {
        let weights = &cx.config.break_time;
        let extra = clamp_unit(1.0 - cx.personality.extraversion());
        let tired = clamp_unit(1.0 - weights.motivation_bias - cx.state.motivation.get());
        let t = extra * weights.extraversion_weight + tired * (1.0 - weights.extraversion_weight);
        clamp_unit(t) * weights.score_scale
    }

    fn execute(&mut self, cx: &mut ExecContext<'_>) -> bool {
        self.state = ActionState::Executing;
        let weights = &cx.config.break_time;
        cx.state.motivation.adjust(weights.motivation_increase);
        cx.state.happiness.adjust(weights.happiness_increase);
        true
    }

    fn end(&mut self) {
        self.state = ActionState::NotStarted;
    }
}
