//! Interaction Protocol
//!
//! Chat and Quarrel invitations travel between agents as immutable requests.
//! A sender posts into its own outbox; the classroom routes envelopes into
//! the receivers' mailboxes at the phase barrier, and each receiver answers
//! its mailbox during its resolve phase.

use std::collections::VecDeque;

use rand::Rng;

use classroom_events::{AgentId, BehaviorKind, EnvironmentSnapshot};

use crate::agent::Agent;
use crate::config::Config;

/// An invitation from `source` to join it in `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionRequest {
    source: AgentId,
    kind: BehaviorKind,
}

impl InteractionRequest {
    pub fn new(source: AgentId, kind: BehaviorKind) -> Self {
        Self { source, kind }
    }

    pub fn source(&self) -> AgentId {
        self.source
    }

    pub fn kind(&self) -> BehaviorKind {
        self.kind
    }
}

/// A request addressed to another agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub to: AgentId,
    pub request: InteractionRequest,
}

/// Requests an agent posted during the current phase.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    envelopes: Vec<Envelope>,
}

impl Outbox {
    pub fn post(&mut self, to: AgentId, request: InteractionRequest) {
        self.envelopes.push(Envelope { to, request });
    }

    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.envelopes)
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }
}

/// FIFO queue of requests waiting for an answer.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    queue: VecDeque<InteractionRequest>,
}

impl Mailbox {
    pub fn push(&mut self, request: InteractionRequest) {
        self.queue.push_back(request);
    }

    pub fn pop(&mut self) -> Option<InteractionRequest> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Agent {
    /// Answer every queued request in arrival order.
    pub fn handle_interactions(&mut self, env: &EnvironmentSnapshot, config: &Config) {
        while let Some(request) = self.mailbox.pop() {
            self.journal.debug(format!(
                "Interaction Request from {} for action {}",
                request.source(),
                request.kind()
            ));
            self.negotiate(request, env, config);
        }
    }

    fn negotiate(&mut self, request: InteractionRequest, env: &EnvironmentSnapshot, config: &Config) {
        let kind = request.kind();
        let source = request.source();
        if !kind.is_interaction() {
            self.journal.debug(format!("Ignoring request for {}, it needs no partner", kind));
            return;
        }

        let grace = config.interaction.partner_grace_ticks;
        if kind == self.current || kind == self.desire {
            self.journal.debug(format!("Accept invitation to {} with {} ...", kind, source));
            self.behaviors.accept_partner(kind, source, grace);
            self.start_action(kind, true, true, env, config);
            return;
        }

        let threshold = self.acceptance_threshold(kind);
        let draw = self.rng.gen_range(0..100) as f32 / 100.0;
        if draw >= threshold {
            self.journal.debug(format!(
                "Got convinced by {} to {} ({:.2} >= {:.2})",
                source, kind, draw, threshold
            ));
            self.behaviors.accept_partner(kind, source, grace);
            self.start_action(kind, false, false, env, config);
        } else {
            self.journal.debug(format!(
                "Keeps to current action {} ({:.2} < {:.2})",
                self.current, draw, threshold
            ));
        }
    }

    /// Draw needed to be talked into `kind`.
    ///
    /// Conscientious agents resist chatting; agreeable, happy agents resist
    /// quarrelling.
    pub fn acceptance_threshold(&self, kind: BehaviorKind) -> f32 {
        match kind {
            BehaviorKind::Chat => self.personality.conscientiousness(),
            BehaviorKind::Quarrel => self.personality.agreeableness() * self.state.happiness.get(),
            BehaviorKind::Break | BehaviorKind::StudyAlone | BehaviorKind::StudyGroup => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{agent_with, env_with};
    use crate::behaviors::testing::neutral;
    use crate::behaviors::{AgentBehavior, Negotiation};
    use crate::personality::Personality;

    #[test]
    fn test_mailbox_is_fifo() {
        let mut mailbox = Mailbox::default();
        mailbox.push(InteractionRequest::new(AgentId(1), BehaviorKind::Chat));
        mailbox.push(InteractionRequest::new(AgentId(2), BehaviorKind::Quarrel));
        assert_eq!(mailbox.len(), 2);
        assert_eq!(mailbox.pop().map(|r| r.source()), Some(AgentId(1)));
        assert_eq!(mailbox.pop().map(|r| r.source()), Some(AgentId(2)));
        assert!(mailbox.pop().is_none());
        assert!(mailbox.is_empty());
    }

    #[test]
    fn test_outbox_drain_empties() {
        let mut outbox = Outbox::default();
        outbox.post(AgentId(3), InteractionRequest::new(AgentId(0), BehaviorKind::Chat));
        assert_eq!(outbox.len(), 1);
        let envelopes = outbox.drain();
        assert_eq!(envelopes[0].to, AgentId(3));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_matching_desire_accepts_immediately() {
        let config = Config::default();
        let env = env_with(&[(0, BehaviorKind::Break), (5, BehaviorKind::Chat)]);
        let mut agent = agent_with(neutral(), 1);
        agent.desire = BehaviorKind::Chat;
        agent.deliver(InteractionRequest::new(AgentId(5), BehaviorKind::Chat));
        agent.handle_interactions(&env, &config);

        assert_eq!(agent.current_action(), BehaviorKind::Chat);
        assert!(agent.is_executing());
        let chat = agent.behaviors().get(BehaviorKind::Chat);
        assert_eq!(chat.partnership().and_then(|p| p.partner()), Some(AgentId(5)));
        assert_eq!(agent.pending_requests(), 0);
    }

    #[test]
    fn test_non_interaction_request_is_dropped() {
        let config = Config::default();
        let env = env_with(&[]);
        let mut agent = agent_with(neutral(), 1);
        let mut untouched = agent.rng.clone();
        agent.deliver(InteractionRequest::new(AgentId(2), BehaviorKind::StudyGroup));
        agent.handle_interactions(&env, &config);

        assert_eq!(agent.current_action(), BehaviorKind::Break);
        // No acceptance draw was taken
        assert_eq!(agent.rng.gen::<u64>(), untouched.gen::<u64>());
        let records = agent.journal_mut().drain();
        assert!(records.iter().any(|r| r.message.contains("needs no partner")));
    }

    #[test]
    fn test_rejected_request_changes_nothing() {
        let config = Config::default();
        let env = env_with(&[(3, BehaviorKind::Break)]);
        // Conscientiousness 1.0 can never be talked into chatting
        let mut agent = agent_with(Personality::new(0.5, 1.0, 0.5, 0.5, 0.5).unwrap(), 1);
        assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
        for _ in 0..50 {
            agent.deliver(InteractionRequest::new(AgentId(3), BehaviorKind::Chat));
        }
        agent.handle_interactions(&env, &config);

        assert_eq!(agent.current_action(), BehaviorKind::StudyAlone);
        let chat = agent.behaviors().get(BehaviorKind::Chat);
        assert_eq!(chat.partnership().map(|p| p.negotiation()), Some(Negotiation::Idle));
        assert_eq!(chat.state(), crate::behaviors::ActionState::NotStarted);
    }

    #[test]
    fn test_conscientious_student_rarely_chats() {
        let config = Config::default();
        let env = env_with(&[(1, BehaviorKind::Chat)]);
        let personality = Personality::new(0.5, 0.9, 0.5, 0.5, 0.5).unwrap();

        let mut accepted = 0;
        for seed in 0..1000 {
            let mut agent = agent_with(personality.clone(), seed);
            assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
            agent.deliver(InteractionRequest::new(AgentId(1), BehaviorKind::Chat));
            agent.handle_interactions(&env, &config);
            if agent.current_action() == BehaviorKind::Chat {
                accepted += 1;
                // Reluctant acceptance keeps the old desire
                assert_eq!(agent.desire(), BehaviorKind::StudyAlone);
            }
        }
        let rate = accepted as f32 / 1000.0;
        assert!((rate - 0.1).abs() < 0.04, "acceptance rate was {}", rate);
    }

    #[test]
    fn test_quarrel_matching_desire_or_current_accepts_without_draw() {
        let config = Config::default();
        // Agreeableness and happiness at 1.0 would reject any reluctant draw
        let peaceful = Personality::new(0.5, 0.5, 0.5, 1.0, 0.5).unwrap();

        let env = env_with(&[(0, BehaviorKind::Break), (5, BehaviorKind::Quarrel)]);
        let mut wants_it = agent_with(peaceful.clone(), 1);
        wants_it.state.happiness.set(1.0);
        wants_it.desire = BehaviorKind::Quarrel;
        wants_it.deliver(InteractionRequest::new(AgentId(5), BehaviorKind::Quarrel));
        wants_it.handle_interactions(&env, &config);
        assert_eq!(wants_it.current_action(), BehaviorKind::Quarrel);
        assert!(wants_it.is_executing());

        let env = env_with(&[(0, BehaviorKind::Break), (5, BehaviorKind::Break)]);
        let mut doing_it = agent_with(peaceful, 2);
        doing_it.state.happiness.set(1.0);
        assert!(doing_it.start_action(BehaviorKind::Quarrel, true, true, &env, &config));
        doing_it.deliver(InteractionRequest::new(AgentId(5), BehaviorKind::Quarrel));
        doing_it.handle_interactions(&env, &config);
        assert_eq!(doing_it.current_action(), BehaviorKind::Quarrel);

        for agent in [&mut wants_it, &mut doing_it] {
            let quarrel = agent.behaviors().get(BehaviorKind::Quarrel);
            assert_eq!(quarrel.partnership().and_then(|p| p.partner()), Some(AgentId(5)));
            let records = agent.journal_mut().drain();
            assert!(records.iter().any(|r| r.message.contains("Accept invitation to Quarrel")));
            assert!(records.iter().all(|r| !r.message.contains("Got convinced")));
        }
    }

    #[test]
    fn test_reluctant_quarrel_rate_follows_temper() {
        let config = Config::default();
        let env = env_with(&[(1, BehaviorKind::Break)]);
        let personality = Personality::new(0.5, 0.5, 0.5, 0.6, 0.5).unwrap();

        let mut accepted = 0;
        for seed in 0..1000 {
            let mut agent = agent_with(personality.clone(), seed);
            assert!(agent.start_action(BehaviorKind::StudyAlone, true, true, &env, &config));
            agent.state.happiness.set(0.5);
            agent.deliver(InteractionRequest::new(AgentId(1), BehaviorKind::Quarrel));
            agent.handle_interactions(&env, &config);
            if agent.current_action() == BehaviorKind::Quarrel {
                accepted += 1;
                assert_eq!(agent.desire(), BehaviorKind::StudyAlone);
            }
        }
        // Threshold is 0.6 * 0.5, so about 70% give in
        let rate = accepted as f32 / 1000.0;
        assert!((rate - 0.7).abs() < 0.05, "acceptance rate was {}", rate);
    }

    #[test]
    fn test_quarrel_threshold_scales_with_happiness() {
        let mut agent = agent_with(Personality::new(0.5, 0.5, 0.5, 0.8, 0.5).unwrap(), 1);
        agent.state.happiness.set(0.5);
        assert!((agent.acceptance_threshold(BehaviorKind::Quarrel) - 0.4).abs() < 1e-6);
        agent.state.happiness.set(0.0);
        assert_eq!(agent.acceptance_threshold(BehaviorKind::Quarrel), 0.0);
        assert_eq!(agent.acceptance_threshold(BehaviorKind::Chat), 0.5);
    }
}
