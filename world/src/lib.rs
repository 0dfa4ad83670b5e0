#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gridfire.

mod agent;
mod config;
mod level;
mod player;
mod spawning;

use std::time::Duration;

use gridfire_core::{
    AgentBehaviorState, AgentId, ArchetypeKind, CellCoord, Command, Event, GameOutcome, GridMap,
    OccupancySet, PropId, WorldPoint, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use agent::{Agent, Prop};
use player::Player;

pub use config::{CellRegion, PlayerConfig, SpawnConfig, SpawnWeights, WorldConfig};
pub use level::{LevelData, LevelError, PropPlacement};
pub use spawning::SpawnError;

/// Seconds of travel an agent's wall probe looks ahead of its position.
const AGENT_PROBE_LOOKAHEAD: f32 = 1.0 / 3.0;

/// Failures raised while building or resetting a world.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorldError {
    /// The level data is unusable.
    #[error(transparent)]
    Level(#[from] LevelError),
    /// Agents could not be placed.
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// Represents the authoritative Gridfire world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    grid: GridMap,
    rng: ChaCha8Rng,
    player: Player,
    agents: Vec<Agent>,
    props: Vec<Prop>,
    occupancy: OccupancySet,
    next_agent_id: u32,
    tick_index: u64,
    last_dt: Duration,
    outcome: Option<GameOutcome>,
}

impl World {
    /// Builds a world from the provided configuration and spawns its agents.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        let grid = config.level.build_grid()?;
        let start = config.player.start.cell();
        if grid.is_wall(start) {
            return Err(LevelError::PlayerInsideWall { cell: start }.into());
        }

        let mut world = Self {
            banner: WELCOME_BANNER,
            rng: ChaCha8Rng::seed_from_u64(config.spawning.seed),
            player: Player::new(&config.player),
            grid,
            config,
            agents: Vec::new(),
            props: Vec::new(),
            occupancy: OccupancySet::default(),
            next_agent_id: 0,
            tick_index: 0,
            last_dt: Duration::ZERO,
            outcome: None,
        };
        world.populate()?;
        Ok(world)
    }

    /// Starts a new game on the same level.
    ///
    /// Player, agents, props and clocks are rebuilt. The random stream
    /// continues, so successive games place agents differently.
    pub fn reset(&mut self) -> Result<(), WorldError> {
        self.player = Player::new(&self.config.player);
        self.tick_index = 0;
        self.last_dt = Duration::ZERO;
        self.outcome = None;
        self.populate()
    }

    fn populate(&mut self) -> Result<(), WorldError> {
        self.props = self
            .config
            .level
            .props
            .iter()
            .zip(0_u32..)
            .map(|(placement, id)| Prop::new(PropId::new(id), placement.kind, placement.position))
            .collect();

        self.agents.clear();
        self.next_agent_id = 0;
        let placements = spawning::place_agents(&self.grid, &self.config.spawning, &mut self.rng)?;
        for (kind, cell) in placements {
            let _ = self.spawn_agent(kind, cell);
        }
        self.refresh_occupancy();

        log::info!(
            "new game: {} agents, {} props on a {}x{} level",
            self.agents.len(),
            self.props.len(),
            self.grid.columns(),
            self.grid.rows()
        );
        Ok(())
    }

    fn spawn_agent(&mut self, kind: ArchetypeKind, cell: CellCoord) -> AgentId {
        let id = AgentId::new(self.next_agent_id);
        self.next_agent_id = self.next_agent_id.saturating_add(1);
        let descriptor = self.config.archetypes.get(kind);
        self.agents
            .push(Agent::spawn(id, descriptor, cell, &mut self.rng));
        id
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id == id)
    }

    fn refresh_occupancy(&mut self) {
        self.occupancy = OccupancySet::from_cells(
            self.agents
                .iter()
                .filter(|agent| agent.alive)
                .map(Agent::cell),
        );
    }

    fn check_victory(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() || self.agents.iter().any(|agent| agent.alive) {
            return;
        }
        self.outcome = Some(GameOutcome::Victory);
        log::info!("level cleared after {} ticks", self.tick_index);
        out_events.push(Event::LevelCleared);
    }

    fn step_agent(&mut self, id: AgentId, toward: CellCoord, out_events: &mut Vec<Event>) {
        let dt = self.last_dt.as_secs_f32();
        let Some(index) = self
            .agents
            .iter()
            .position(|agent| agent.id == id && agent.alive)
        else {
            return;
        };

        let agent = &self.agents[index];
        let current = agent.cell();
        if self.grid.is_wall(toward) || (toward != current && self.occupancy.contains(toward)) {
            out_events.push(Event::AgentStepRejected { agent: id, toward });
            return;
        }

        let from = agent.position;
        let target = toward.center();
        let remaining = from.distance_to(target);
        let travel = (agent.stats.speed * dt).min(remaining);
        if travel <= 0.0 {
            return;
        }

        let (sin, cos) = from.bearing_to(target).sin_cos();
        let reach = (agent.stats.speed * AGENT_PROBE_LOOKAHEAD).min(remaining);
        let mut to = from;
        if !self
            .grid
            .is_wall(WorldPoint::new(to.x() + cos * reach, to.y()).cell())
        {
            to = to.translated(cos * travel, 0.0);
        }
        if !self
            .grid
            .is_wall(WorldPoint::new(to.x(), to.y() + sin * reach).cell())
        {
            to = to.translated(0.0, sin * travel);
        }
        if to == from {
            return;
        }

        self.agents[index].position = to;
        out_events.push(Event::AgentMoved {
            agent: id,
            from,
            to,
        });
        if to.cell() != current {
            self.refresh_occupancy();
        }
    }

    fn damage_agent(&mut self, id: AgentId, amount: i32, out_events: &mut Vec<Event>) {
        let Some(agent) = self.agent_mut(id).filter(|agent| agent.alive) else {
            return;
        };

        let health = agent.take_damage(amount);
        out_events.push(Event::AgentDamaged {
            agent: id,
            amount,
            health,
        });

        if agent.is_lethally_wounded() {
            let from = agent.begin_dying();
            out_events.push(Event::AgentBehaviorChanged {
                agent: id,
                from,
                to: AgentBehaviorState::Dying,
            });
            out_events.push(Event::AgentDied { agent: id });
            log::debug!("agent {} ({:?}) died", id.get(), agent.archetype());
            self.player.clear_shot();
            self.refresh_occupancy();
            self.check_victory(out_events);
            return;
        }

        if let Some(from) = agent.begin_pain() {
            out_events.push(Event::AgentBehaviorChanged {
                agent: id,
                from,
                to: AgentBehaviorState::Pain,
            });
        }
        self.player.clear_shot();
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.last_dt = dt;
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
                dt,
            });

            world.player.clear_shot();
            if world.player.advance_reload(dt, &world.config.weapon) {
                out_events.push(Event::WeaponReloaded);
            }
            let delay = Duration::from_millis(world.config.player.regen_delay_ms);
            if let Some(health) = world.player.regenerate(dt, delay) {
                out_events.push(Event::PlayerHealed { health });
            }

            for agent in world.agents.iter_mut() {
                agent.animate(dt, out_events);
            }
            for prop in world.props.iter_mut() {
                prop.animate(dt);
            }

            world.refresh_occupancy();
            world.check_victory(out_events);
        }
        Command::MovePlayer { intent } => {
            if let Some(from) =
                world
                    .player
                    .apply_movement(&intent, &world.config.player, &world.grid)
            {
                out_events.push(Event::PlayerMoved {
                    from,
                    to: world.player.position(),
                    angle: world.player.angle(),
                });
            }
        }
        Command::FireWeapon => {
            if world.player.try_fire() {
                out_events.push(Event::WeaponFired);
            }
        }
        Command::SpawnAgent { archetype, cell } => {
            if world.grid.is_wall(cell) || world.occupancy.contains(cell) {
                out_events.push(Event::AgentSpawnRejected { archetype, cell });
                return;
            }
            let agent = world.spawn_agent(archetype, cell);
            world.refresh_occupancy();
            out_events.push(Event::AgentSpawned {
                agent,
                archetype,
                cell,
            });
        }
        Command::StepAgent { agent, toward } => world.step_agent(agent, toward, out_events),
        Command::SetAgentBehavior { agent, behavior } => {
            let Some(target) = world.agent_mut(agent) else {
                return;
            };
            if let Some(from) = target.transition(behavior) {
                log::debug!("agent {} {:?} -> {:?}", agent.get(), from, behavior);
                out_events.push(Event::AgentBehaviorChanged {
                    agent,
                    from,
                    to: behavior,
                });
            }
        }
        Command::DamageAgent { agent, amount } => world.damage_agent(agent, amount, out_events),
        Command::DamagePlayer { agent, amount } => {
            let health = world.player.take_damage(amount);
            out_events.push(Event::PlayerDamaged {
                agent,
                amount,
                health,
            });
            if health < 1 && world.outcome.is_none() {
                world.outcome = Some(GameOutcome::Defeat);
                log::info!("player defeated after {} ticks", world.tick_index);
                out_events.push(Event::PlayerDefeated);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{World, WorldConfig};
    use gridfire_core::{
        AgentView, GameOutcome, GridMap, OccupancySet, PlayerSnapshot, PropSnapshot, TickEvents,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the level grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of every agent, including dying and dead ones.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        AgentView::from_snapshots(world.agents.iter().map(|agent| agent.snapshot()).collect())
    }

    /// Captures the static props in placement order.
    #[must_use]
    pub fn props(world: &World) -> Vec<PropSnapshot> {
        world.props.iter().map(|prop| prop.snapshot()).collect()
    }

    /// Cells held by living agents.
    #[must_use]
    pub fn occupancy(world: &World) -> &OccupancySet {
        &world.occupancy
    }

    /// Signals of the current tick.
    #[must_use]
    pub fn tick_events(world: &World) -> TickEvents {
        TickEvents {
            tick: world.tick_index,
            weapon_fired: world.player.shot_pending(),
        }
    }

    /// Outcome of the current game, once decided.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        world.outcome
    }

    /// Number of ticks processed since the game started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }
}
