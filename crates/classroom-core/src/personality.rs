//! Personality
//!
//! Five-factor trait vector fixed at agent creation.

use rand::Rng;
use std::fmt;

use classroom_events::TraitsSnapshot;

use crate::config::AgentConfig;
use crate::error::{SimError, SimResult};

/// Agent personality traits - fixed at creation.
/// All values are 0.0 to 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct Personality {
    openness: f32,
    conscientiousness: f32,
    extraversion: f32,
    agreeableness: f32,
    neuroticism: f32,
    label: String,
}

impl Personality {
    /// Build a personality, rejecting traits outside [0, 1].
    pub fn new(
        openness: f32,
        conscientiousness: f32,
        extraversion: f32,
        agreeableness: f32,
        neuroticism: f32,
    ) -> SimResult<Self> {
        let traits = [
            ("openness", openness),
            ("conscientiousness", conscientiousness),
            ("extraversion", extraversion),
            ("agreeableness", agreeableness),
            ("neuroticism", neuroticism),
        ];
        for (trait_name, value) in traits {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::TraitOutOfRange { trait_name, value });
            }
        }

        Ok(Self::from_traits(
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        ))
    }

    /// Sample a personality centred around 0.5.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        // Mean of two uniforms keeps extremes rare
        let mut draw = || -> f32 {
            let a: f32 = rng.gen();
            let b: f32 = rng.gen();
            ((a + b) / 2.0).clamp(0.05, 0.95)
        };
        let (o, c, e, a, n) = (draw(), draw(), draw(), draw(), draw());
        Self::from_traits(o, c, e, a, n)
    }

    fn from_traits(o: f32, c: f32, e: f32, a: f32, n: f32) -> Self {
        let label = derive_label(&[('O', o), ('C', c), ('E', e), ('A', a), ('N', n)]);
        Self {
            openness: o,
            conscientiousness: c,
            extraversion: e,
            agreeableness: a,
            neuroticism: n,
            label,
        }
    }

    pub fn openness(&self) -> f32 {
        self.openness
    }

    pub fn conscientiousness(&self) -> f32 {
        self.conscientiousness
    }

    pub fn extraversion(&self) -> f32 {
        self.extraversion
    }

    pub fn agreeableness(&self) -> f32 {
        self.agreeableness
    }

    pub fn neuroticism(&self) -> f32 {
        self.neuroticism
    }

    /// Short label, one letter per trait, upper-case when the trait is high.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Weight given to peer scores over individual scores, in [0, 1].
    pub fn conformity(&self, config: &AgentConfig) -> f32 {
        if !config.use_conformity_model {
            return config.conformity;
        }

        let stability = (1.0 - self.neuroticism) * 0.5
            + self.agreeableness * 0.6
            + self.conscientiousness * 0.6;
        let plasticity = self.extraversion * 0.8 + self.openness * 0.5;

        (stability * 0.8 - plasticity * 0.45).clamp(0.0, 1.0)
    }

    pub fn to_snapshot(&self) -> TraitsSnapshot {
        TraitsSnapshot {
            openness: self.openness,
            conscientiousness: self.conscientiousness,
            extraversion: self.extraversion,
            agreeableness: self.agreeableness,
            neuroticism: self.neuroticism,
        }
    }
}

fn derive_label(traits: &[(char, f32)]) -> String {
    traits
        .iter()
        .map(|(letter, value)| {
            if *value >= 0.5 {
                *letter
            } else {
                letter.to_ascii_lowercase()
            }
        })
        .collect()
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (O {:.2} C {:.2} E {:.2} A {:.2} N {:.2})",
            self.label,
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism
        )
    }
}
