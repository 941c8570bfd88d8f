//! Score Vectors
//!
//! One desirability score per behavior, index-aligned with the registry order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::BehaviorKind;

/// Score forced onto a behavior that must not be chosen again.
pub const MASKED_SCORE: f32 = -1.0;

/// Ordered score vector, one entry per [`BehaviorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scores([f32; BehaviorKind::COUNT]);

impl Scores {
    pub fn new(values: [f32; BehaviorKind::COUNT]) -> Self {
        Self(values)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Iterate `(kind, score)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (BehaviorKind, f32)> + '_ {
        BehaviorKind::ALL.iter().map(move |kind| (*kind, self.0[kind.index()]))
    }

    /// Weighted blend with peer scores: `self * (1 - conformity) + peer * conformity`.
    pub fn blend(&self, peer: &Scores, conformity: f32) -> Scores {
        let mut blended = [0.0; BehaviorKind::COUNT];
        for (i, slot) in blended.iter_mut().enumerate() {
            *slot = self.0[i] * (1.0 - conformity) + peer.0[i] * conformity;
        }
        Scores(blended)
    }

    /// Copy with every listed behavior forced to [`MASKED_SCORE`].
    pub fn masked(&self, kinds: &[BehaviorKind]) -> Scores {
        let mut masked = *self;
        for kind in kinds {
            masked[*kind] = MASKED_SCORE;
        }
        masked
    }

    /// Element-wise mean of a set of score vectors. Empty input yields zeros.
    pub fn mean<'a>(vectors: impl IntoIterator<Item = &'a Scores>) -> Scores {
        let mut sum = [0.0f32; BehaviorKind::COUNT];
        let mut count = 0usize;
        for vector in vectors {
            for (acc, value) in sum.iter_mut().zip(vector.0.iter()) {
                *acc += value;
            }
            count += 1;
        }
        if count > 0 {
            for acc in sum.iter_mut() {
                *acc /= count as f32;
            }
        }
        Scores(sum)
    }
}

impl Index<BehaviorKind> for Scores {
    type Output = f32;

    fn index(&self, kind: BehaviorKind) -> &f32 {
        &self.0[kind.index()]
    }
}

impl IndexMut<BehaviorKind> for Scores {
    fn index_mut(&mut self, kind: BehaviorKind) -> &mut f32 {
        &mut self.0[kind.index()]
    }
}

impl fmt::Display for Scores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, score)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{:.2}", kind, score)?;
        }
        Ok(())
    }
}
