//! Agent
//!
//! One student: personality, internal state, the behavior registry and the
//! per-tick decision pipeline. An agent only ever mutates itself; everything
//! it knows about the others comes from the committed snapshot.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use classroom_events::{AgentId, AgentSnapshot, BehaviorKind, EnvironmentSnapshot, Scores, SeatKind};

use crate::behaviors::{ActionState, AgentBehavior, BehaviorSet, ExecContext, RateContext};
use crate::config::Config;
use crate::decision::{apply_sticky_bias, select_action, sticky_bias};
use crate::interaction::{Envelope, InteractionRequest, Mailbox, Outbox};
use crate::journal::Journal;
use crate::personality::Personality;
use crate::state::AgentState;

#[derive(Debug, Clone)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) name: String,
    pub(crate) personality: Personality,
    pub(crate) conformity: f32,
    pub(crate) state: AgentState,
    pub(crate) behaviors: BehaviorSet,
    pub(crate) current: BehaviorKind,
    pub(crate) previous: BehaviorKind,
    pub(crate) desire: BehaviorKind,
    pub(crate) tick: u64,
    pub(crate) ticks_on_task: u32,
    /// Rated and biased, before blending with peers
    pub(crate) individual_scores: Scores,
    pub(crate) scores: Scores,
    pub(crate) mailbox: Mailbox,
    pub(crate) outbox: Outbox,
    pub(crate) rng: SmallRng,
    pub(crate) journal: Journal,
}

impl Agent {
    /// Create an agent on Break with initial motivation and happiness drawn
    /// from its own seeded generator.
    pub fn new(id: AgentId, name: impl Into<String>, personality: Personality, seed: u64, config: &Config) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let motivation = rng.gen_range(0..100) as f32 / 100.0;
        let happiness = rng.gen_range(0..100) as f32 / 100.0;
        let conformity = personality.conformity(&config.agent);

        Self {
            id,
            name: name.into(),
            personality,
            conformity,
            state: AgentState::new(happiness, motivation),
            behaviors: BehaviorSet::new(),
            current: BehaviorKind::Break,
            previous: BehaviorKind::Break,
            desire: BehaviorKind::Break,
            tick: 0,
            ticks_on_task: 0,
            individual_scores: Scores::zero(),
            scores: Scores::zero(),
            mailbox: Mailbox::default(),
            outbox: Outbox::default(),
            rng,
            journal: Journal::new(id),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn conformity(&self) -> f32 {
        self.conformity
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn current_action(&self) -> BehaviorKind {
        self.current
    }

    pub fn previous_action(&self) -> BehaviorKind {
        self.previous
    }

    pub fn desire(&self) -> BehaviorKind {
        self.desire
    }

    pub fn ticks_on_task(&self) -> u32 {
        self.ticks_on_task
    }

    /// Execution state of the current behavior
    pub fn action_state(&self) -> ActionState {
        self.behaviors.get(self.current).state()
    }

    pub fn is_executing(&self) -> bool {
        self.action_state() == ActionState::Executing
    }

    /// Seat held while a study behavior is executing
    pub fn occupied_seat(&self) -> Option<SeatKind> {
        if !self.is_executing() {
            return None;
        }
        match self.current {
            BehaviorKind::StudyAlone => Some(SeatKind::Individual),
            BehaviorKind::StudyGroup => Some(SeatKind::Group),
            BehaviorKind::Break | BehaviorKind::Quarrel | BehaviorKind::Chat => None,
        }
    }

    pub fn individual_scores(&self) -> &Scores {
        &self.individual_scores
    }

    /// Scores after blending with the peer vector
    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn behaviors(&self) -> &BehaviorSet {
        &self.behaviors
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    pub fn pending_requests(&self) -> usize {
        self.mailbox.len()
    }

    /// Queue an incoming request. Handled during the next resolve phase.
    pub fn deliver(&mut self, request: InteractionRequest) {
        self.mailbox.push(request);
    }

    /// Take the requests this agent posted since the last barrier.
    pub fn take_outgoing(&mut self) -> Vec<Envelope> {
        self.outbox.drain()
    }

    /// Phase one: update attention, score, select and start an action.
    pub fn decide(&mut self, env: &EnvironmentSnapshot, config: &Config) {
        self.tick += 1;
        self.journal.set_tick(self.tick);
        if self.tick == 1 {
            self.log_personality();
        }

        self.update_attention(env, config);
        self.log_state();
        self.calculate_scores(env, config);

        match select_action(&self.scores, &mut self.rng) {
            Some(target) => {
                if self.start_action(target, true, true, env, config) {
                    self.journal.info(format!("Starting Action {}.", target));
                } else {
                    self.journal.info(format!("Starting Action {} failed!", target));
                }
            }
            None => {
                self.journal.error(format!(
                    "No behavior scored above zero, staying safe with {}",
                    BehaviorKind::Break
                ));
                self.switch_to_break(env, config);
            }
        }
    }

    /// Phase two: answer interaction requests, then update happiness.
    pub fn resolve(&mut self, env: &EnvironmentSnapshot, config: &Config) {
        self.handle_interactions(env, config);
        self.update_happiness(config);
    }

    /// Rate every behavior, apply the sticky bias and blend with the peers.
    pub fn calculate_scores(&mut self, env: &EnvironmentSnapshot, config: &Config) {
        let mut individual = self.rate_all(env, config);
        let bias = sticky_bias(&config.agent, self.personality.conscientiousness(), self.ticks_on_task);
        apply_sticky_bias(&mut individual, bias, self.current, self.previous);

        self.individual_scores = individual;
        self.scores = individual.blend(&env.peer_scores, self.conformity);
        self.journal.info(format!("Scores: {}", self.scores));
    }

    /// Plain ratings with no bias or blending.
    pub fn rate_all(&self, env: &EnvironmentSnapshot, config: &Config) -> Scores {
        let cx = self.rate_context(env, config);
        let mut scores = Scores::zero();
        for behavior in self.behaviors.iter() {
            scores[behavior.kind()] = behavior.rate(&cx);
        }
        scores
    }

    /// Try to make `target` the current action.
    ///
    /// Falls back to the desire, then to a fresh selection that excludes the
    /// rejected behaviors, and finally to Break. Returns false only when the
    /// agent ended up on the Break safety net.
    pub fn start_action(
        &mut self,
        target: BehaviorKind,
        set_desire: bool,
        allow_fallback: bool,
        env: &EnvironmentSnapshot,
        config: &Config,
    ) -> bool {
        if self.is_possible(target, env, config) {
            if target == self.current {
                self.continue_action(env, config);
            } else {
                self.switch_action(target, env, config);
                if set_desire {
                    self.desire = target;
                }
            }
            return true;
        }

        self.ticks_on_task = 0;
        if !allow_fallback {
            return false;
        }

        let desire = self.desire;
        if desire != target {
            self.journal.debug(format!(
                "{} is not possible. Will execute the desired action {} instead ...",
                target, desire
            ));
            if self.start_action(desire, false, false, env, config) {
                return true;
            }
        }

        let masked = self.scores.masked(&[target, desire]);
        if let Some(alternative) = select_action(&masked, &mut self.rng) {
            if self.start_action(alternative, false, false, env, config) {
                self.journal.debug(format!("Could not execute {}, chose {} instead ...", target, alternative));
                return true;
            }
        }

        self.journal.debug(format!("{} is not possible. Executing {} instead ...", target, BehaviorKind::Break));
        self.switch_to_break(env, config);
        false
    }

    /// End whatever runs and take a break. Break is always possible.
    pub fn switch_to_break(&mut self, env: &EnvironmentSnapshot, config: &Config) {
        if self.current == BehaviorKind::Break {
            self.continue_action(env, config);
        } else {
            self.switch_action(BehaviorKind::Break, env, config);
        }
    }

    pub fn is_possible(&self, kind: BehaviorKind, env: &EnvironmentSnapshot, config: &Config) -> bool {
        let cx = self.rate_context(env, config);
        self.behaviors.get(kind).is_possible(&cx)
    }

    fn switch_action(&mut self, target: BehaviorKind, env: &EnvironmentSnapshot, config: &Config) {
        self.journal.debug(format!("Ending current action {}.", self.current));
        self.behaviors.get_mut(self.current).end();
        self.previous = self.current;
        self.current = target;
        self.ticks_on_task = 0;
        self.journal.debug(format!("Starting new action {}. Executing ...", target));
        self.execute_current(env, config);
    }

    fn continue_action(&mut self, env: &EnvironmentSnapshot, config: &Config) {
        self.execute_current(env, config);
        if self.is_executing() {
            self.ticks_on_task = self.ticks_on_task.saturating_add(1);
        }
    }

    pub(crate) fn execute_current(&mut self, env: &EnvironmentSnapshot, config: &Config) -> bool {
        let kind = self.current;
        let Agent {
            id,
            personality,
            state,
            behaviors,
            rng,
            outbox,
            journal,
            ..
        } = self;
        let mut cx = ExecContext {
            id: *id,
            personality,
            state,
            env,
            config,
            rng,
            outbox,
            journal,
        };
        let applied = behaviors.get_mut(kind).execute(&mut cx);
        if !applied {
            self.journal.debug(format!("{} had no effect this tick", kind));
        }
        applied
    }

    fn rate_context<'a>(&'a self, env: &'a EnvironmentSnapshot, config: &'a Config) -> RateContext<'a> {
        RateContext {
            id: self.id,
            personality: &self.personality,
            state: &self.state,
            env,
            config,
        }
    }

    fn update_attention(&mut self, env: &EnvironmentSnapshot, config: &Config) {
        let attention = if self.current.is_study() && self.is_executing() {
            self.personality.conscientiousness() + self.state.motivation.get()
                - env.noise * config.agent.attention_noise_scale
        } else {
            0.0
        };
        self.state.attention.set(attention);
    }

    fn update_happiness(&mut self, config: &Config) {
        if self.current == BehaviorKind::Quarrel {
            return;
        }
        if self.current == self.desire {
            self.state.happiness.adjust(config.agent.alignment_happiness_increase);
        } else {
            let decrease = config.agent.conflict_happiness_decrease * self.personality.neuroticism();
            self.state.happiness.adjust(-decrease);
        }
    }

    fn log_personality(&mut self) {
        let message = format!(
            "Personality: {} | conformity {:.2} | {}",
            self.personality,
            self.conformity,
            self.name
        );
        self.journal.info(message);
    }

    fn log_state(&mut self) {
        let message = format!(
            "State: motivation {:.2} happiness {:.2} attention {:.2} | {} ({:?}) desire {} | {} ticks on task",
            self.state.motivation.get(),
            self.state.happiness.get(),
            self.state.attention.get(),
            self.current,
            self.action_state(),
            self.desire,
            self.ticks_on_task
        );
        self.journal.info(message);
    }

    /// One line summary of what the agent is up to.
    pub fn status(&self) -> String {
        format!(
            "{} ({}) | motivation {:.2} | happiness {:.2} | attention {:.2} | doing {} | wants {}",
            self.name,
            self.personality.label(),
            self.state.motivation.get(),
            self.state.happiness.get(),
            self.state.attention.get(),
            self.current,
            self.desire
        )
    }

    pub fn recent_messages(&self) -> impl Iterator<Item = &str> {
        self.journal.recent()
    }

    pub fn to_snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.name.clone(),
            personality: self.personality.label().to_string(),
            traits: self.personality.to_snapshot(),
            conformity: self.conformity,
            happiness: self.state.happiness.get(),
            motivation: self.state.motivation.get(),
            attention: self.state.attention.get(),
            action: self.current,
            desire: self.desire,
            previous_action: self.previous,
            ticks_on_task: self.ticks_on_task,
            scores: self.scores,
            recent_messages: self.recent_messages().map(str::to_string).collect(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{agent_with, env_with};
    use super::*;
    use crate::behaviors::testing::neutral;
    use classroom_events::{FreeSeats, LogLevel};

    #[test]
    fn test_new_agent_starts_on_break() {
        let agent = agent_with(neutral(), 7);
        assert_eq!(agent.current_action(), BehaviorKind::Break);
        assert_eq!(agent.previous_action(), BehaviorKind::Break);
        assert_eq!(agent.desire(), BehaviorKind::Break);
        assert_eq!(agent.action_state(), ActionState::NotStarted);
        let state = agent.state();
        assert!((0.0..1.0).contains(&state.motivation.get()));
        assert!((0.0..1.0).contains(&state.happiness.get()));
        assert_eq!(state.attention.get(), 0.0);
    }

    #[test]
    fn test_same_seed_same_initial_state() {
        let a = agent_with(neutral(), 11);
        let b = agent_with(neutral(), 11);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_first_tick_logs_personality() {
        let config = Config::default();
        let env = env_with(&[(0, BehaviorKind::Break), (1, BehaviorKind::Break)]);
        let mut agent = agent_with(neutral(), 3);
        agent.decide(&env, &config);
        let records = agent.journal_mut().drain();
        assert!(records[0].message.starts_with("Personality:"));
        assert!(records.iter().all(|r| r.tick == 1));
        assert!(records
            .iter()
            .any(|r| r.level == LogLevel::Info && r.message.starts_with("Scores:")));

        agent.decide(&env, &config);
        let records = agent.journal_mut().drain();
        assert!(records.iter().all(|r| !r.message.starts_with("Personality:")));
    }

    #[test]
    fn test_decide_always_ends_executing() {
        let config = Config::default();
        let env = env_with(&[(0, BehaviorKind::StudyAlone), (1, BehaviorKind::Break), (2, BehaviorKind::Chat)]);
        for seed in 0..50 {
            let mut agent = agent_with(Personality::sample(&mut SmallRng::seed_from_u64(seed)), seed);
            for _ in 0..20 {
                agent.decide(&env, &config);
                assert!(agent.is_executing());
                assert_eq!(agent.behaviors().executing_count(), 1);
            }
        }
    }

    #[test]
    fn test_continuing_counts_ticks_on_task() {
        let config = Config::default();
        let env = env_with(&[]);
        let mut agent = agent_with(neutral(), 1);
        assert!(agent.start_action(BehaviorKind::Break, true, true, &env, &config));
        assert_eq!(agent.ticks_on_task(), 1);
        assert!(agent.start_action(BehaviorKind::Break, true, true, &env, &config));
        assert_eq!(agent.ticks_on_task(), 2);

        assert!(agent.start_action(BehaviorKind::StudyGroup, true, true, &env, &config));
        assert_eq!(agent.ticks_on_task(), 0);
        assert_eq!(agent.previous_action(), BehaviorKind::Break);
        assert_eq!(agent.desire(), BehaviorKind::StudyGroup);
        assert_eq!(agent.behaviors().get(BehaviorKind::Break).state(), ActionState::NotStarted);
    }

    #[test]
    fn test_impossible_target_falls_back_to_desire() {
        let config = Config::default();
        let mut env = env_with(&[]);
        let mut agent = agent_with(neutral(), 1);
        assert!(agent.start_action(BehaviorKind::StudyGroup, true, true, &env, &config));

        env.free_seats = FreeSeats { individual: 0, group: 0 };
        // StudyAlone has no desk, the group seat is already ours
        assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
        assert_eq!(agent.current_action(), BehaviorKind::StudyGroup);
        assert!(agent.is_executing());
        assert_eq!(agent.desire(), BehaviorKind::StudyGroup);
    }

    #[test]
    fn test_impossible_target_switches_to_other_desire() {
        let config = Config::default();
        let mut env = env_with(&[]);
        let mut agent = agent_with(neutral(), 1);
        assert!(agent.start_action(BehaviorKind::Break, true, true, &env, &config));
        agent.desire = BehaviorKind::StudyGroup;

        env.free_seats = FreeSeats { individual: 0, group: 4 };
        assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
        assert_eq!(agent.current_action(), BehaviorKind::StudyGroup);
        assert_eq!(agent.previous_action(), BehaviorKind::Break);
        assert_eq!(agent.desire(), BehaviorKind::StudyGroup);
        assert_eq!(agent.ticks_on_task(), 0);
        assert!(agent.is_executing());
        assert_eq!(agent.occupied_seat(), Some(SeatKind::Group));

        let records = agent.journal_mut().drain();
        assert!(records
            .iter()
            .any(|r| r.message.contains("Will execute the desired action StudyGroup")));
    }

    #[test]
    fn test_masked_alternative_never_retries_target() {
        let config = Config::default();
        let mut env = env_with(&[]);
        env.free_seats = FreeSeats { individual: 0, group: 4 };
        let mut agent = agent_with(neutral(), 5);
        // Nobody to chat with and no free desk: both get masked
        agent.desire = BehaviorKind::Chat;
        agent.scores = Scores::new([0.0, 0.0, 50.0, 90.0, 10.0]);

        for _ in 0..20 {
            assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
            assert_eq!(agent.current_action(), BehaviorKind::StudyGroup);
            assert_eq!(agent.desire(), BehaviorKind::Chat);
        }
    }

    #[test]
    fn test_nothing_possible_ends_on_break() {
        let config = Config::default();
        let mut env = env_with(&[]);
        let mut agent = agent_with(neutral(), 5);
        assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));

        env.free_seats = FreeSeats { individual: 0, group: 0 };
        agent.behaviors = BehaviorSet::new();
        agent.scores = Scores::new([0.0, 50.0, 50.0, 50.0, 50.0]);
        assert!(!agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
        assert_eq!(agent.current_action(), BehaviorKind::Break);
        assert!(agent.is_executing());
    }

    #[test]
    fn test_all_nonpositive_scores_fall_back_to_break() {
        let mut config = Config::default();
        for weights in [
            &mut config.break_time.score_scale,
            &mut config.chat.score_scale,
            &mut config.quarrel.score_scale,
            &mut config.study_alone.score_scale,
            &mut config.study_group.score_scale,
        ] {
            *weights = 0.0;
        }
        let env = env_with(&[(1, BehaviorKind::Break)]);
        let mut agent = agent_with(neutral(), 2);
        agent.decide(&env, &config);
        assert_eq!(agent.current_action(), BehaviorKind::Break);
        assert!(agent.is_executing());
        let records = agent.journal_mut().drain();
        assert!(records.iter().any(|r| r.level == LogLevel::Error));
    }

    #[test]
    fn test_full_conformity_copies_peer_scores() {
        let mut config = Config::default();
        config.agent.use_conformity_model = false;
        config.agent.conformity = 1.0;
        let mut env = env_with(&[]);
        env.peer_scores = Scores::new([12.0, 3.0, 40.0, 7.5, 0.0]);

        let mut agent = Agent::new(AgentId(0), "Follower", neutral(), 9, &config);
        agent.calculate_scores(&env, &config);
        assert_eq!(agent.scores(), &env.peer_scores);
        assert_ne!(agent.individual_scores(), &env.peer_scores);
    }

    #[test]
    fn test_attention_only_while_studying() {
        let config = Config::default();
        let env = env_with(&[]);
        let mut agent = agent_with(neutral(), 4);
        agent.update_attention(&env, &config);
        assert_eq!(agent.state().attention.get(), 0.0);

        assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
        agent.update_attention(&env, &config);
        let expected = 0.5 + agent.state().motivation.get() - env.noise * config.agent.attention_noise_scale;
        assert!((agent.state().attention.get() - expected.clamp(0.0, 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_happiness_follows_desire_alignment() {
        let config = Config::default();
        let env = env_with(&[]);
        let mut agent = agent_with(neutral(), 4);
        agent.state.happiness.set(0.5);
        agent.update_happiness(&config);
        assert!((agent.state().happiness.get() - 0.55).abs() < 1e-6);

        agent.desire = BehaviorKind::StudyAlone;
        agent.update_happiness(&config);
        assert!((agent.state().happiness.get() - 0.525).abs() < 1e-6);

        assert!(agent.start_action(BehaviorKind::StudyGroup, true, true, &env, &config));
        agent.current = BehaviorKind::Quarrel;
        agent.state.happiness.set(0.3);
        agent.update_happiness(&config);
        assert_eq!(agent.state().happiness.get(), 0.3);
    }

    #[test]
    fn test_status_and_snapshot() {
        let agent = agent_with(neutral(), 8);
        let status = agent.status();
        assert!(status.starts_with("Tester (OCEAN)"));
        assert!(status.contains("doing Break"));

        let snapshot = agent.to_snapshot();
        assert_eq!(snapshot.name, "Tester");
        assert!(snapshot.recent_messages.is_empty());
        assert_eq!(snapshot.action, BehaviorKind::Break);
        assert_eq!(snapshot.traits.conscientiousness, 0.5);
    }
}
