//! Behavioral scenarios over whole classrooms and single agents.

use classroom_core::events::{AgentId, BehaviorKind, EnvironmentSnapshot, FreeSeats, LogLevel, PeerView, Scores};
use classroom_core::{
    select_action, Agent, Classroom, Config, InteractionRequest, MemorySink, NullSink, Personality,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn env_with(peers: &[(u32, BehaviorKind)], seats: FreeSeats) -> EnvironmentSnapshot {
    let mut env = EnvironmentSnapshot::quiet(0.1, seats);
    env.peers = peers
        .iter()
        .map(|(id, action)| PeerView { id: AgentId(*id), action: *action, executing: true })
        .collect();
    env
}

#[test]
fn test_levels_stay_in_unit_range() {
    let mut config = Config::default();
    config.simulation.agents = 25;
    config.simulation.seed = 2024;
    let mut classroom = Classroom::from_config(config).unwrap();
    let mut sink = NullSink::new();

    for _ in 0..300 {
        classroom.step(&mut sink).unwrap();
        for agent in classroom.agents() {
            let state = agent.state();
            for level in [state.happiness, state.motivation, state.attention] {
                assert!((0.0..=1.0).contains(&level.get()), "{} out of range", agent.status());
            }
        }
    }
}

#[test]
fn test_every_agent_executes_exactly_one_action() {
    let mut config = Config::default();
    config.simulation.agents = 20;
    config.classroom.individual_seats = 2;
    config.classroom.group_seats = 2;
    let mut classroom = Classroom::from_config(config).unwrap();
    let mut sink = NullSink::new();

    for _ in 0..200 {
        classroom.step(&mut sink).unwrap();
        for agent in classroom.agents() {
            assert!(agent.is_executing());
            assert_eq!(agent.behaviors().executing_count(), 1);
        }
    }
}

#[test]
fn test_classroom_sees_social_behaviors() {
    let mut config = Config::default();
    config.simulation.agents = 20;
    let mut classroom = Classroom::from_config(config).unwrap();
    let mut sink = MemorySink::new();
    let mut seen = [false; BehaviorKind::COUNT];

    for _ in 0..300 {
        classroom.step(&mut sink).unwrap();
        for agent in classroom.agents() {
            seen[agent.current_action().index()] = true;
        }
    }

    assert!(seen[BehaviorKind::Break.index()]);
    assert!(seen[BehaviorKind::Chat.index()] || seen[BehaviorKind::Quarrel.index()]);
    assert!(sink
        .records()
        .iter()
        .any(|r| r.level == LogLevel::Debug && r.message.starts_with("Interaction Request from")));
}

#[test]
fn test_full_conformity_follows_peers() {
    let mut config = Config::default();
    config.agent.use_conformity_model = false;
    config.agent.conformity = 1.0;

    let personality = Personality::new(0.9, 0.1, 0.9, 0.1, 0.9).unwrap();
    let mut agent = Agent::new(AgentId(0), "Follower", personality, 3, &config);
    let mut env = env_with(&[(1, BehaviorKind::StudyAlone)], FreeSeats { individual: 3, group: 0 });
    env.peer_scores = Scores::new([0.0, 0.0, 0.0, 60.0, 0.0]);

    agent.calculate_scores(&env, &config);
    assert_eq!(agent.scores(), &env.peer_scores);

    agent.decide(&env, &config);
    assert_eq!(agent.current_action(), BehaviorKind::StudyAlone);
}

#[test]
fn test_fallback_terminates_on_break() {
    let config = Config::default();
    // No seats and nobody else around: only Break can run
    let env = env_with(&[], FreeSeats { individual: 0, group: 0 });
    for seed in 0..100 {
        let personality = Personality::sample(&mut SmallRng::seed_from_u64(seed));
        let mut agent = Agent::new(AgentId(0), "Lonely", personality, seed, &config);
        for _ in 0..10 {
            agent.decide(&env, &config);
            assert_eq!(agent.current_action(), BehaviorKind::Break);
            assert!(agent.is_executing());
        }
    }
}

#[test]
fn test_invitation_is_answered_next_barrier() {
    let config = Config::default();
    let env = env_with(
        &[(0, BehaviorKind::Break), (1, BehaviorKind::Break)],
        FreeSeats { individual: 2, group: 2 },
    );
    let personality = Personality::new(0.5, 0.5, 0.5, 0.5, 0.5).unwrap();
    let mut host = Agent::new(AgentId(1), "Host", personality, 5, &config);
    assert!(host.start_action(BehaviorKind::Chat, true, true, &env, &config));
    host.deliver(InteractionRequest::new(AgentId(0), BehaviorKind::Chat));
    assert_eq!(host.pending_requests(), 1);

    host.resolve(&env, &config);
    assert_eq!(host.pending_requests(), 0);
    assert_eq!(host.current_action(), BehaviorKind::Chat);
    let partner = host
        .behaviors()
        .get(BehaviorKind::Chat)
        .partnership()
        .and_then(|p| p.partner());
    assert_eq!(partner, Some(AgentId(0)));
}

#[test]
fn test_lottery_never_picks_nonpositive() {
    let mut rng = SmallRng::seed_from_u64(8);
    let scores = Scores::new([-5.0, 0.0, 3.0, -1.0, 1.0]);
    for _ in 0..2000 {
        let pick = select_action(&scores, &mut rng).unwrap();
        assert!(matches!(pick, BehaviorKind::Chat | BehaviorKind::StudyGroup));
    }
}
