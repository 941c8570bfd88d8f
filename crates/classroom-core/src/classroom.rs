//! Classroom
//!
//! Owns the agents and drives the two-phase tick. Every agent reads the same
//! committed snapshot during a tick; the next snapshot is published only after
//! all agents are done. Seats are the exception: they are claimed and released
//! live, in agent order, so a seat is never handed out twice.

use tracing::{debug, info};

use classroom_events::{
    AgentId, BehaviorKind, ClassroomSnapshot, EnvironmentSnapshot, FreeSeats, PeerView, Scores,
    SeatKind,
};

use crate::agent::Agent;
use crate::behaviors::noise_of;
use crate::config::Config;
use crate::error::{SimError, SimResult};
use crate::setup::spawn_agents;
use crate::sink::LogSink;
use crate::state::clamp_unit;

pub struct Classroom {
    config: Config,
    agents: Vec<Agent>,
    env: EnvironmentSnapshot,
    tick: u64,
}

impl Classroom {
    /// Validate `config` and spawn its students.
    pub fn from_config(config: Config) -> SimResult<Self> {
        config.validate()?;
        let agents = spawn_agents(&config);
        Ok(Self::new(config, agents))
    }

    /// Build a classroom around existing agents, ordered by id.
    ///
    /// The first snapshot carries the agents' plain ratings as peer scores.
    pub fn new(config: Config, mut agents: Vec<Agent>) -> Self {
        agents.sort_by_key(Agent::id);
        let mut classroom = Self {
            env: EnvironmentSnapshot::quiet(0.0, FreeSeats::default()),
            config,
            agents,
            tick: 0,
        };

        let previews: Vec<Scores> = classroom
            .agents
            .iter()
            .map(|agent| agent.rate_all(&classroom.env, &classroom.config))
            .collect();
        classroom.env = classroom.observe(Scores::mean(&previews));
        classroom
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot the agents are reading this tick
    pub fn environment(&self) -> &EnvironmentSnapshot {
        &self.env
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> SimResult<&Agent> {
        match self.agents.get(id.index()) {
            Some(agent) if agent.id() == id => Ok(agent),
            _ => self
                .agents
                .iter()
                .find(|agent| agent.id() == id)
                .ok_or(SimError::AgentNotFound(id)),
        }
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let index = match self.agents.get(id.index()) {
            Some(agent) if agent.id() == id => id.index(),
            _ => self.agents.iter().position(|agent| agent.id() == id)?,
        };
        self.agents.get_mut(index)
    }

    /// Advance one tick and write the agents' records to `sink`.
    pub fn step(&mut self, sink: &mut dyn LogSink) -> SimResult<()> {
        self.tick += 1;
        let mut live = self.env.clone();

        for agent in self.agents.iter_mut() {
            let held = agent.occupied_seat();
            agent.decide(&live, &self.config);
            account_seat(&mut live.free_seats, held, agent.occupied_seat());
        }

        self.route_requests();

        for agent in self.agents.iter_mut() {
            let held = agent.occupied_seat();
            agent.resolve(&live, &self.config);
            account_seat(&mut live.free_seats, held, agent.occupied_seat());
        }

        for agent in self.agents.iter_mut() {
            sink.record_batch(&agent.journal_mut().drain())?;
        }

        let peer_scores = Scores::mean(self.agents.iter().map(Agent::individual_scores));
        self.env = self.observe(peer_scores);

        debug!(
            "Tick {}: noise {:.2}, free seats {}/{}, actions {:?}",
            self.tick,
            self.env.noise,
            self.env.free_seats.individual,
            self.env.free_seats.group,
            self.action_counts()
        );
        Ok(())
    }

    /// Run `ticks` ticks and flush the sink.
    pub fn run(&mut self, ticks: u64, sink: &mut dyn LogSink) -> SimResult<()> {
        info!("Running {} ticks with {} students", ticks, self.agents.len());
        let interval = self.config.simulation.snapshot_interval;

        for _ in 0..ticks {
            self.step(sink)?;
            if interval > 0 && self.tick % interval == 0 {
                info!(
                    "Tick {}: noise {:.2}, actions {}",
                    self.tick,
                    self.env.noise,
                    self.describe_actions()
                );
            }
        }

        sink.flush()?;
        info!(
            "Finished at tick {} with {} records",
            self.tick,
            sink.record_count()
        );
        Ok(())
    }

    /// Move every posted request into its receiver's mailbox.
    ///
    /// Requests for unknown agents are dropped.
    fn route_requests(&mut self) {
        let envelopes: Vec<_> = self
            .agents
            .iter_mut()
            .flat_map(|agent| agent.take_outgoing())
            .collect();

        for envelope in envelopes {
            match self.agent_mut(envelope.to) {
                Some(receiver) => receiver.deliver(envelope.request),
                None => debug!(
                    "Dropping {} request from {} to unknown {}",
                    envelope.request.kind(),
                    envelope.request.source(),
                    envelope.to
                ),
            }
        }
    }

    /// Build the snapshot describing the classroom as it is now.
    fn observe(&self, peer_scores: Scores) -> EnvironmentSnapshot {
        let mut noise = 0.0;
        let mut at_desks = 0u32;
        let mut at_tables = 0u32;
        let mut peers = Vec::with_capacity(self.agents.len());

        for agent in &self.agents {
            let action = agent.current_action();
            let executing = agent.is_executing();
            if executing {
                noise += noise_of(action, &self.config);
            }
            match agent.occupied_seat() {
                Some(SeatKind::Individual) => at_desks += 1,
                Some(SeatKind::Group) => at_tables += 1,
                None => {}
            }
            peers.push(PeerView {
                id: agent.id(),
                action,
                executing,
            });
        }

        if !self.agents.is_empty() {
            noise /= self.agents.len() as f32;
        }

        let seats = &self.config.classroom;
        EnvironmentSnapshot {
            tick: self.tick,
            noise: clamp_unit(seats.base_noise + noise),
            peer_scores,
            peers,
            free_seats: FreeSeats {
                individual: seats.individual_seats.saturating_sub(at_desks),
                group: seats.group_seats.saturating_sub(at_tables),
            },
        }
    }

    /// Number of agents on each behavior, in registry order.
    pub fn action_counts(&self) -> [usize; BehaviorKind::COUNT] {
        let mut counts = [0; BehaviorKind::COUNT];
        for agent in &self.agents {
            counts[agent.current_action().index()] += 1;
        }
        counts
    }

    fn describe_actions(&self) -> String {
        BehaviorKind::ALL
            .iter()
            .zip(self.action_counts())
            .map(|(kind, count)| format!("{}:{}", kind, count))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialisable state of the whole classroom.
    pub fn snapshot(&self) -> ClassroomSnapshot {
        ClassroomSnapshot {
            tick: self.tick,
            noise: self.env.noise,
            peer_scores: self.env.peer_scores,
            free_seats: self.env.free_seats,
            agents: self.agents.iter().map(Agent::to_snapshot).collect(),
        }
    }
}

/// Move one agent's seat from `held` to `holds` in the live count.
fn account_seat(free: &mut FreeSeats, held: Option<SeatKind>, holds: Option<SeatKind>) {
    if held == holds {
        return;
    }
    if let Some(kind) = held {
        free.release(kind);
    }
    if let Some(kind) = holds {
        if !free.claim(kind) {
            debug!("Seat count for {:?} was already exhausted", kind);
        }
    }
}
