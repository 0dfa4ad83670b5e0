#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that advances every agent's behaviour machine by one tick.
//!
//! The system reads immutable snapshots of the player and agents, resolves
//! the player's pending shot, and responds with commands for the world to
//! apply. Agents are evaluated in spawn order; a pending shot is consumed by
//! the first agent that satisfies the hit test, so at most one agent is
//! damaged per shot.

use gridfire_core::{
    AgentBehaviorState, AgentSnapshot, AgentView, Command, GridMap, OccupancySet, PlayerSnapshot,
    TickEvents, ViewConfig,
};
use gridfire_system_pathfinding::PathFinder;
use gridfire_system_raycasting::line_of_sight;
use gridfire_system_sprite_projection::SpriteProjector;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Snapshot of everything the behaviour system reads during one tick.
#[derive(Clone, Copy, Debug)]
pub struct BehaviorInputs<'a> {
    /// Signals of the current tick, including the pending shot.
    pub tick: TickEvents,
    /// Player state at the start of the logic phase.
    pub player: PlayerSnapshot,
    /// Every agent in spawn order.
    pub agents: &'a AgentView,
    /// Level walls used for visibility.
    pub grid: &'a GridMap,
    /// Cells held by living agents.
    pub occupancy: &'a OccupancySet,
    /// Health removed from an agent by a single shot.
    pub weapon_damage: i32,
}

/// Agent behaviour system that owns the random stream used for attack rolls.
#[derive(Debug)]
pub struct AgentBehavior {
    projector: SpriteProjector,
    max_depth: u32,
    rng: ChaCha8Rng,
}

impl AgentBehavior {
    /// Creates a behaviour system for the provided view with a seeded attack stream.
    #[must_use]
    pub fn new(view: ViewConfig, seed: u64) -> Self {
        Self {
            projector: SpriteProjector::new(view),
            max_depth: view.max_depth,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits behaviour, movement and damage commands for every living agent.
    ///
    /// Commands are appended to `out` in agent spawn order.
    pub fn handle(
        &mut self,
        inputs: &BehaviorInputs<'_>,
        pathfinder: &mut PathFinder,
        out: &mut Vec<Command>,
    ) {
        let player = &inputs.player;
        let mut shot_pending = inputs.tick.weapon_fired;

        for agent in inputs.agents.iter().filter(|agent| agent.alive) {
            let visible = line_of_sight(
                inputs.grid,
                player.position,
                agent.position,
                self.max_depth,
            );

            if shot_pending && visible && self.in_crosshair(player, agent) {
                shot_pending = false;
                log::debug!(
                    "tick {}: shot hit agent {} at distance {:.2}",
                    inputs.tick.tick,
                    agent.id.get(),
                    agent.position.distance_to(player.position)
                );
                out.push(Command::DamageAgent {
                    agent: agent.id,
                    amount: inputs.weapon_damage,
                });
                continue;
            }

            let distance = agent.position.distance_to(player.position);
            let next = resolve_state(agent, visible, distance);
            if next != agent.behavior {
                out.push(Command::SetAgentBehavior {
                    agent: agent.id,
                    behavior: next,
                });
            }

            match next {
                AgentBehaviorState::Attacking => self.attack(agent, out),
                AgentBehaviorState::Searching => {
                    let here = agent.cell();
                    let step = pathfinder.next_step(here, player.cell(), inputs.occupancy);
                    if step != here {
                        out.push(Command::StepAgent {
                            agent: agent.id,
                            toward: step,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    fn in_crosshair(&self, player: &PlayerSnapshot, agent: &AgentSnapshot) -> bool {
        let projection =
            self.projector
                .project(player.position, player.angle, agent.position, &agent.sprite);
        self.projector.overlaps_aim(&projection)
    }

    fn attack(&mut self, agent: &AgentSnapshot, out: &mut Vec<Command>) {
        if !agent.animation_trigger {
            return;
        }
        let roll: f32 = self.rng.gen();
        if roll < agent.stats.accuracy {
            log::debug!(
                "agent {} landed an attack for {}",
                agent.id.get(),
                agent.stats.attack_damage
            );
            out.push(Command::DamagePlayer {
                agent: agent.id,
                amount: agent.stats.attack_damage,
            });
        }
    }
}

/// Pain pre-empts everything; otherwise visibility and range pick the branch.
fn resolve_state(agent: &AgentSnapshot, visible: bool, distance: f32) -> AgentBehaviorState {
    if agent.pain {
        AgentBehaviorState::Pain
    } else if visible {
        if distance < agent.stats.attack_range {
            AgentBehaviorState::Attacking
        } else {
            AgentBehaviorState::Searching
        }
    } else if agent.acquired {
        AgentBehaviorState::Searching
    } else {
        AgentBehaviorState::Idle
    }
}
