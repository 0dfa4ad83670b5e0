//! Single-threaded session loop tying the world, systems and backends together.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use gridfire_core::{Command, Event, GameOutcome, SpriteDescriptor, WorldPoint};
use gridfire_rendering::{
    AudioBackend, DrawList, FrameInput, Overlay, RenderingBackend, Scene, SoundId, SpriteSubject,
};
use gridfire_system_agent_behavior::{AgentBehavior, BehaviorInputs};
use gridfire_system_pathfinding::{PathFinder, PathGraph};
use gridfire_system_raycasting::RayCaster;
use gridfire_system_sprite_projection::SpriteProjector;
use gridfire_world::{apply, query, World};

use crate::config::GameConfig;

/// Counters accumulated over a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    pub(crate) ticks: u64,
    pub(crate) games: u32,
    pub(crate) victories: u32,
    pub(crate) defeats: u32,
    pub(crate) shots: u32,
    pub(crate) kills: u32,
}

/// Wall-clock time spent in each phase of the logic tick.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PhaseTimings {
    pub(crate) sweep: Duration,
    pub(crate) behavior: Duration,
    pub(crate) compose: Duration,
}

/// A running session: one world, its systems and the output backends.
pub(crate) struct Game<B> {
    world: World,
    caster: RayCaster,
    projector: SpriteProjector,
    behavior: AgentBehavior,
    pathfinder: PathFinder,
    backend: B,
    freeze: Duration,
    frozen: Option<Duration>,
    events: Vec<Event>,
    commands: Vec<Command>,
    summary: SessionSummary,
    timings: PhaseTimings,
}

impl<B> Game<B>
where
    B: RenderingBackend + AudioBackend,
{
    /// Builds the first game and starts the theme music.
    pub(crate) fn new(config: &GameConfig, mut backend: B) -> Result<Self> {
        let world = World::new(config.world.clone()).context("failed to build world")?;
        let pathfinder = PathFinder::new(PathGraph::from_grid(query::grid(&world)));
        backend
            .loop_music(SoundId::Theme)
            .context("failed to start music")?;

        Ok(Self {
            world,
            caster: RayCaster::new(config.view),
            projector: SpriteProjector::new(config.view),
            behavior: AgentBehavior::new(config.view, config.behavior_seed),
            pathfinder,
            backend,
            freeze: Duration::from_millis(config.freeze_ms),
            frozen: None,
            events: Vec::new(),
            commands: Vec::new(),
            summary: SessionSummary {
                games: 1,
                ..SessionSummary::default()
            },
            timings: PhaseTimings::default(),
        })
    }

    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Mean time per played tick spent in each phase.
    pub(crate) fn average_timings(&self) -> PhaseTimings {
        let ticks = u32::try_from(self.summary.ticks).unwrap_or(u32::MAX).max(1);
        PhaseTimings {
            sweep: self.timings.sweep / ticks,
            behavior: self.timings.behavior / ticks,
            compose: self.timings.compose / ticks,
        }
    }

    /// Advances the session by `dt`.
    ///
    /// After a win or loss the session holds the final frame for the freeze
    /// duration, then starts a new game on the same level.
    pub(crate) fn tick(&mut self, dt: Duration, input: FrameInput) -> Result<()> {
        self.summary.ticks = self.summary.ticks.saturating_add(1);
        if self.frozen.is_some() {
            return self.hold(dt);
        }

        self.events.clear();
        apply(&mut self.world, Command::Tick { dt }, &mut self.events);
        apply(
            &mut self.world,
            Command::MovePlayer {
                intent: input.movement(dt),
            },
            &mut self.events,
        );
        if input.fire {
            apply(&mut self.world, Command::FireWeapon, &mut self.events);
        }

        let started = Instant::now();
        let player = query::player(&self.world);
        let _ = self
            .caster
            .sweep(query::grid(&self.world), player.position, player.angle);
        self.timings.sweep += started.elapsed();

        let started = Instant::now();
        let agents = query::agent_view(&self.world);
        let inputs = BehaviorInputs {
            tick: query::tick_events(&self.world),
            player,
            agents: &agents,
            grid: query::grid(&self.world),
            occupancy: query::occupancy(&self.world),
            weapon_damage: query::config(&self.world).weapon.damage,
        };
        self.commands.clear();
        self.behavior
            .handle(&inputs, &mut self.pathfinder, &mut self.commands);
        for command in self.commands.drain(..) {
            apply(&mut self.world, command, &mut self.events);
        }
        self.timings.behavior += started.elapsed();

        let mut damaged = false;
        for event in &self.events {
            match event {
                Event::WeaponFired => self.summary.shots += 1,
                Event::AgentDied { .. } => self.summary.kills += 1,
                Event::LevelCleared => self.summary.victories += 1,
                Event::PlayerDefeated => self.summary.defeats += 1,
                Event::PlayerDamaged { .. } => damaged = true,
                _ => {}
            }
            if let Some(sound) = SoundId::for_event(event) {
                self.backend.play(sound)?;
            }
        }

        let started = Instant::now();
        let scene = self.compose(damaged);
        self.timings.compose += started.elapsed();
        self.backend
            .present(&scene)
            .context("failed to present frame")?;

        if let Some(outcome) = query::outcome(&self.world) {
            log::info!(
                "game {} ended in {:?} after {} ticks",
                self.summary.games,
                outcome,
                query::tick_index(&self.world)
            );
            self.frozen = Some(self.freeze);
        }
        Ok(())
    }

    fn hold(&mut self, dt: Duration) -> Result<()> {
        let remaining = self.frozen.unwrap_or_default().saturating_sub(dt);
        if !remaining.is_zero() {
            self.frozen = Some(remaining);
            let scene = self.compose(false);
            return self
                .backend
                .present(&scene)
                .context("failed to present frame");
        }

        self.frozen = None;
        self.world.reset().context("failed to start a new game")?;
        self.pathfinder.clear_cache();
        self.summary.games += 1;
        log::info!("starting game {}", self.summary.games);
        Ok(())
    }

    fn compose(&self, damaged: bool) -> Scene {
        let player = query::player(&self.world);
        let agents = query::agent_view(&self.world);
        let props = query::props(&self.world);
        let project = |position: WorldPoint, sprite: &SpriteDescriptor| {
            self.projector
                .project(player.position, player.angle, position, sprite)
        };

        let sprites = agents
            .iter()
            .map(|agent| {
                (
                    SpriteSubject::Agent(agent.id),
                    agent.animation,
                    project(agent.position, &agent.sprite),
                )
            })
            .chain(props.iter().map(|prop| {
                (
                    SpriteSubject::Prop(prop.id),
                    prop.animation,
                    project(prop.position, &prop.sprite),
                )
            }));
        let draw_list = DrawList::compose(self.caster.view(), self.caster.columns(), sprites);

        let mut overlays = vec![Overlay::Health {
            value: player.health,
            max: player.max_health,
        }];
        if damaged {
            overlays.push(Overlay::DamageTint(Overlay::DAMAGE_TINT));
        }
        match query::outcome(&self.world) {
            Some(GameOutcome::Victory) => overlays.push(Overlay::Victory),
            Some(GameOutcome::Defeat) => overlays.push(Overlay::Defeat),
            None => {}
        }
        Scene::new(draw_list, overlays)
    }
}
