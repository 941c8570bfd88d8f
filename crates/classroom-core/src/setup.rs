//! Agent Spawning
//!
//! Builds the student population from the simulation seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use classroom_events::AgentId;

use crate::agent::Agent;
use crate::config::Config;
use crate::personality::Personality;

const STUDENT_NAMES: &[&str] = &[
    "Allison", "Andrew", "Brian", "Claire", "John", "Carl", "Vernon", "Emma", "Felix", "Greta",
    "Hannah", "Isaac", "Jonas", "Karla", "Lena", "Mats", "Nina", "Oskar", "Paula", "Quinn",
    "Rosa", "Simon", "Tara", "Uwe", "Vera", "Wanda", "Xaver", "Yara", "Zoe", "Moritz",
];

/// Name for the `index`-th student. Repeats get a numeric suffix.
pub fn student_name(index: u32) -> String {
    let len = STUDENT_NAMES.len() as u32;
    let base = STUDENT_NAMES[(index % len) as usize];
    match index / len {
        0 => base.to_string(),
        round => format!("{} {}", base, round + 1),
    }
}

/// Spawn `simulation.agents` students.
///
/// A master generator seeded from `simulation.seed` samples each personality
/// and each agent's own seed, so one number reproduces the whole classroom.
pub fn spawn_agents(config: &Config) -> Vec<Agent> {
    let mut rng = SmallRng::seed_from_u64(config.simulation.seed);

    (0..config.simulation.agents)
        .map(|index| {
            let personality = Personality::sample(&mut rng);
            let seed: u64 = rng.gen();
            Agent::new(AgentId(index), student_name(index), personality, seed, config)
        })
        .collect()
}
