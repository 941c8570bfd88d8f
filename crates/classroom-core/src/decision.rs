//! Decision Core
//!
//! Sticky bias, peer blending and the weighted lottery used to pick a
//! behavior. Selection is probabilistic: every positively scored behavior
//! keeps a chance proportional to its cubed score.

use rand::Rng;

use classroom_events::{BehaviorKind, Scores};

use crate::config::AgentConfig;

/// Number of slots in the selection lottery
pub const LOTTERY_SLOTS: usize = 100;

/// Exponent applied to scores before normalising
pub const SELECTIVITY: i32 = 3;

/// Continuity bonus for the current behavior.
///
/// Starts at `bias_base + bias_scale` and decays toward `bias_base` the longer
/// the agent stays on its task; conscientious agents decay slower.
pub fn sticky_bias(config: &AgentConfig, conscientiousness: f32, ticks_on_task: u32) -> f32 {
    let exponent = -(1.0 - conscientiousness) * config.bias_decay * ticks_on_task as f32;
    config.bias_base + config.bias_scale * exponent.exp()
}

/// Add `bias` to the current behavior and subtract it from the previous one.
pub fn apply_sticky_bias(
    scores: &mut Scores,
    bias: f32,
    current: BehaviorKind,
    previous: BehaviorKind,
) {
    scores[current] += bias;
    scores[previous] -= bias;
}

/// Weighted lottery table built from a score vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lottery {
    slots: Vec<BehaviorKind>,
}

impl Lottery {
    /// Allocate up to [`LOTTERY_SLOTS`] contiguous slots, proportional to the
    /// cubed positive scores. Remainders are truncated, so fewer slots may be
    /// filled.
    pub fn from_scores(scores: &Scores) -> Self {
        let weight = |score: f32| -> Option<f32> {
            if score > 0.0 && score.is_finite() {
                Some(score.powi(SELECTIVITY))
            } else {
                None
            }
        };

        let total: f32 = scores.iter().filter_map(|(_, s)| weight(s)).sum();
        let mut slots = Vec::with_capacity(LOTTERY_SLOTS);
        if total > 0.0 && total.is_finite() {
            for (kind, score) in scores.iter() {
                if let Some(w) = weight(score) {
                    let share = ((w / total) * LOTTERY_SLOTS as f32) as usize;
                    let share = share.min(LOTTERY_SLOTS - slots.len());
                    slots.extend(std::iter::repeat(kind).take(share));
                }
            }
        }

        Self { slots }
    }

    /// Number of filled slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots owned by `kind`
    pub fn share(&self, kind: BehaviorKind) -> usize {
        self.slots.iter().filter(|k| **k == kind).count()
    }

    /// Draw uniformly over the filled slots.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Option<BehaviorKind> {
        if self.slots.is_empty() {
            return None;
        }
        Some(self.slots[rng.gen_range(0..self.slots.len())])
    }
}

/// Pick a behavior by weighted lottery. `None` when no score is positive.
pub fn select_action<R: Rng>(scores: &Scores, rng: &mut R) -> Option<BehaviorKind> {
    Lottery::from_scores(scores).draw(rng)
}
