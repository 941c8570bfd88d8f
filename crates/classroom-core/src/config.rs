//! Configuration System
//!
//! Loads tuning parameters from a TOML file so behavior weights can be
//! adjusted without recompiling. Every key is required: a file missing a key
//! fails to load at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "classroom.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub classroom: ClassroomConfig,
    pub agent: AgentConfig,
    #[serde(rename = "break")]
    pub break_time: BreakConfig,
    pub chat: ChatConfig,
    pub quarrel: QuarrelConfig,
    pub study_alone: StudyAloneConfig,
    pub study_group: StudyGroupConfig,
    pub interaction: InteractionConfig,
}

/// Run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub agents: u32,
    pub seed: u64,
    pub ticks: u64,
    pub snapshot_interval: u64,
}

/// Shared classroom resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassroomConfig {
    pub individual_seats: u32,
    pub group_seats: u32,
    /// Noise floor added to the behavior-driven noise
    pub base_noise: f32,
}

/// Decision and state update constants common to every agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Sticky bias floor reached after a long time on the same task
    pub bias_base: f32,
    /// Sticky bias on top of the floor at the start of a task
    pub bias_scale: f32,
    pub bias_decay: f32,
    pub alignment_happiness_increase: f32,
    /// Scaled by neuroticism
    pub conflict_happiness_decrease: f32,
    pub attention_noise_scale: f32,
    /// Derive conformity from personality instead of using `conformity`
    pub use_conformity_model: bool,
    pub conformity: f32,
}

/// Break weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakConfig {
    pub score_scale: f32,
    pub extraversion_weight: f32,
    /// Positive values make agents take breaks earlier
    pub motivation_bias: f32,
    pub happiness_increase: f32,
    pub motivation_increase: f32,
    pub noise: f32,
}

/// Chat weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    pub score_scale: f32,
    pub extraversion_weight: f32,
    pub happiness_increase: f32,
    pub motivation_decrease: f32,
    pub noise: f32,
}

/// Quarrel weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuarrelConfig {
    pub score_scale: f32,
    pub agreeableness_weight: f32,
    pub neuroticism_weight: f32,
    pub happiness_decrease: f32,
    pub motivation_decrease: f32,
    pub noise: f32,
}

/// Individual study weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyAloneConfig {
    pub score_scale: f32,
    pub conscientiousness_weight: f32,
    /// How strongly classroom noise discourages studying alone
    pub noise_penalty: f32,
    pub motivation_decrease: f32,
    pub noise: f32,
}

/// Group study weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyGroupConfig {
    pub score_scale: f32,
    pub trait_weight: f32,
    pub motivation_decrease: f32,
    /// Scaled by extraversion
    pub happiness_increase: f32,
    pub noise: f32,
}

/// Partner negotiation limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionConfig {
    /// Ticks an invitation may stay unanswered before it is dropped
    pub max_pending_ticks: u32,
    /// Ticks a freshly accepted partner has to show up
    pub partner_grace_ticks: u32,
}

impl Config {
    /// Load, parse and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values outside the ranges the formulas are defined for
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.agents == 0 {
            return Err(ConfigError::invalid("simulation.agents", "must be at least 1"));
        }

        let unit_values = [
            ("classroom.base_noise", self.classroom.base_noise),
            ("agent.conformity", self.agent.conformity),
            ("break.extraversion_weight", self.break_time.extraversion_weight),
            ("break.motivation_bias", self.break_time.motivation_bias),
            ("chat.extraversion_weight", self.chat.extraversion_weight),
            ("quarrel.agreeableness_weight", self.quarrel.agreeableness_weight),
            ("quarrel.neuroticism_weight", self.quarrel.neuroticism_weight),
            ("study_alone.conscientiousness_weight", self.study_alone.conscientiousness_weight),
            ("study_group.trait_weight", self.study_group.trait_weight),
        ];
        for (key, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(key, format!("{} is outside [0, 1]", value)));
            }
        }

        if self.quarrel.agreeableness_weight + self.quarrel.neuroticism_weight > 1.0 {
            return Err(ConfigError::invalid(
                "quarrel.neuroticism_weight",
                "trait weights of quarrel must not sum above 1",
            ));
        }

        let non_negative = [
            ("agent.bias_base", self.agent.bias_base),
            ("agent.bias_scale", self.agent.bias_scale),
            ("agent.bias_decay", self.agent.bias_decay),
            ("agent.alignment_happiness_increase", self.agent.alignment_happiness_increase),
            ("agent.conflict_happiness_decrease", self.agent.conflict_happiness_decrease),
            ("agent.attention_noise_scale", self.agent.attention_noise_scale),
            ("break.score_scale", self.break_time.score_scale),
            ("break.noise", self.break_time.noise),
            ("chat.score_scale", self.chat.score_scale),
            ("chat.noise", self.chat.noise),
            ("quarrel.score_scale", self.quarrel.score_scale),
            ("quarrel.noise", self.quarrel.noise),
            ("study_alone.score_scale", self.study_alone.score_scale),
            ("study_alone.noise_penalty", self.study_alone.noise_penalty),
            ("study_alone.noise", self.study_alone.noise),
            ("study_group.score_scale", self.study_group.score_scale),
            ("study_group.noise", self.study_group.noise),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(key, format!("{} must be a non-negative number", value)));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                agents: 20,
                seed: 42,
                ticks: 1000,
                snapshot_interval: 100,
            },
            classroom: ClassroomConfig {
                individual_seats: 12,
                group_seats: 8,
                base_noise: 0.1,
            },
            agent: AgentConfig {
                bias_base: 5.0,
                bias_scale: 40.0,
                bias_decay: 0.5,
                alignment_happiness_increase: 0.05,
                conflict_happiness_decrease: 0.05,
                attention_noise_scale: 0.5,
                use_conformity_model: true,
                conformity: 0.3,
            },
            break_time: BreakConfig {
                score_scale: 100.0,
                extraversion_weight: 0.3,
                motivation_bias: 0.3,
                happiness_increase: 0.05,
                motivation_increase: 0.05,
                noise: 0.3,
            },
            chat: ChatConfig {
                score_scale: 100.0,
                extraversion_weight: 0.6,
                happiness_increase: 0.05,
                motivation_decrease: 0.02,
                noise: 0.6,
            },
            quarrel: QuarrelConfig {
                score_scale: 60.0,
                agreeableness_weight: 0.4,
                neuroticism_weight: 0.3,
                happiness_decrease: 0.1,
                motivation_decrease: 0.05,
                noise: 1.0,
            },
            study_alone: StudyAloneConfig {
                score_scale: 100.0,
                conscientiousness_weight: 0.5,
                noise_penalty: 0.5,
                motivation_decrease: 0.03,
                noise: 0.0,
            },
            study_group: StudyGroupConfig {
                score_scale: 100.0,
                trait_weight: 0.5,
                motivation_decrease: 0.02,
                happiness_increase: 0.02,
                noise: 0.2,
            },
            interaction: InteractionConfig {
                max_pending_ticks: 3,
                partner_grace_ticks: 1,
            },
        }
    }
}

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Generates the default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Classroom Simulation Tuning

[simulation]
agents = 20
seed = 42
ticks = 1000
snapshot_interval = 100

[classroom]
individual_seats = 12
group_seats = 8
base_noise = 0.1

[agent]
bias_base = 5.0
bias_scale = 40.0
bias_decay = 0.5
alignment_happiness_increase = 0.05
conflict_happiness_decrease = 0.05
attention_noise_scale = 0.5
use_conformity_model = true
conformity = 0.3

[break]
score_scale = 100.0
extraversion_weight = 0.3
motivation_bias = 0.3
happiness_increase = 0.05
motivation_increase = 0.05
noise = 0.3

[chat]
score_scale = 100.0
extraversion_weight = 0.6
happiness_increase = 0.05
motivation_decrease = 0.02
noise = 0.6

[quarrel]
score_scale = 60.0
agreeableness_weight = 0.4
neuroticism_weight = 0.3
happiness_decrease = 0.1
motivation_decrease = 0.05
noise = 1.0

[study_alone]
score_scale = 100.0
conscientiousness_weight = 0.5
noise_penalty = 0.5
motivation_decrease = 0.03
noise = 0.0

[study_group]
score_scale = 100.0
trait_weight = 0.5
motivation_decrease = 0.02
happiness_increase = 0.02
noise = 0.2

[interaction]
max_pending_ticks = 3
partner_grace_ticks = 1
"#
    .to_string()
}
