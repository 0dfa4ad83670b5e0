#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridfire engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values. Systems read
//! immutable snapshots such as [`AgentView`] and [`PlayerSnapshot`] and respond
//! exclusively with new command batches.

mod animation;
mod archetype;
mod grid;
mod view;

use std::{
    collections::BTreeSet,
    f32::consts::{PI, TAU},
    time::Duration,
};

use serde::{Deserialize, Serialize};

pub use animation::{AnimationCursor, AnimationFrames, AnimationSequence, AnimationStep};
pub use archetype::{
    ArchetypeDescriptor, ArchetypeKind, ArchetypeTable, AttackRange, PropKind, SpriteDescriptor,
    WeaponDescriptor,
};
pub use grid::{GridMap, WallType};
pub use view::ViewConfig;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Gridfire.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    ///
    /// Opens a new tick: stale shots expire, reload and regeneration timers
    /// advance, animation triggers are sampled and occupancy is recomputed.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Applies sanitized movement and look input to the player.
    MovePlayer {
        /// Movement and rotation intent gathered by the input collaborator.
        intent: MovementIntent,
    },
    /// Requests that the player's weapon fire a single shot.
    FireWeapon,
    /// Places an agent of the provided archetype at the centre of a cell.
    SpawnAgent {
        /// Archetype describing the agent's stats and assets.
        archetype: ArchetypeKind,
        /// Cell the agent should occupy.
        cell: CellCoord,
    },
    /// Requests that an agent move toward the centre of a neighbouring cell.
    StepAgent {
        /// Identifier of the agent attempting to move.
        agent: AgentId,
        /// Cell the agent travels toward.
        toward: CellCoord,
    },
    /// Requests that an agent enter a new behavioural state.
    SetAgentBehavior {
        /// Identifier of the agent transitioning.
        agent: AgentId,
        /// Requested state. `Dying` and `Dead` are reserved for the world.
        behavior: AgentBehaviorState,
    },
    /// Applies weapon damage from the player to an agent.
    DamageAgent {
        /// Identifier of the agent that was hit.
        agent: AgentId,
        /// Health removed from the agent.
        amount: i32,
    },
    /// Applies damage from an attacking agent to the player.
    DamagePlayer {
        /// Identifier of the agent that landed the attack.
        agent: AgentId,
        /// Health removed from the player.
        amount: i32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just opened.
        tick: u64,
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player changed position or heading.
    PlayerMoved {
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
        /// Heading after the move, normalized to `[0, 2π)`.
        angle: f32,
    },
    /// Reports that the player regenerated health.
    PlayerHealed {
        /// Health after regeneration.
        health: i32,
    },
    /// Confirms that the weapon fired and a shot is pending for this tick.
    WeaponFired,
    /// Reports that the weapon finished reloading and may fire again.
    WeaponReloaded,
    /// Confirms that an agent entered the world.
    AgentSpawned {
        /// Identifier assigned to the agent.
        agent: AgentId,
        /// Archetype of the agent.
        archetype: ArchetypeKind,
        /// Cell the agent occupies.
        cell: CellCoord,
    },
    /// Reports that an explicit spawn request targeted an invalid cell.
    AgentSpawnRejected {
        /// Archetype requested.
        archetype: ArchetypeKind,
        /// Cell requested.
        cell: CellCoord,
    },
    /// Confirms that an agent moved.
    AgentMoved {
        /// Identifier of the agent that moved.
        agent: AgentId,
        /// Position before moving.
        from: WorldPoint,
        /// Position after moving.
        to: WorldPoint,
    },
    /// Reports that an agent's step targeted a wall or an occupied cell.
    AgentStepRejected {
        /// Identifier of the agent whose step was refused.
        agent: AgentId,
        /// Cell the agent attempted to enter.
        toward: CellCoord,
    },
    /// Announces that an agent changed behavioural state.
    AgentBehaviorChanged {
        /// Identifier of the agent.
        agent: AgentId,
        /// State before the transition.
        from: AgentBehaviorState,
        /// State after the transition.
        to: AgentBehaviorState,
    },
    /// Confirms that an agent took weapon damage.
    AgentDamaged {
        /// Identifier of the agent.
        agent: AgentId,
        /// Health removed.
        amount: i32,
        /// Health remaining, floored at zero.
        health: i32,
    },
    /// Announces that an agent's health dropped below one. Emitted once per agent.
    AgentDied {
        /// Identifier of the agent.
        agent: AgentId,
    },
    /// Announces that an agent finished its death sequence and left the simulation.
    AgentRemoved {
        /// Identifier of the agent.
        agent: AgentId,
    },
    /// Confirms that the player took damage from an agent.
    PlayerDamaged {
        /// Identifier of the attacking agent.
        agent: AgentId,
        /// Health removed.
        amount: i32,
        /// Health remaining.
        health: i32,
    },
    /// Announces that the player's health dropped below one.
    PlayerDefeated,
    /// Announces that no living agent remains.
    LevelCleared,
}

/// Unique identifier assigned to an agent. Identifiers follow spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a static prop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropId(u32);

impl PropId {
    /// Creates a new prop identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that ray traversals may step past the level
/// bounds; such cells are always reported as walls by [`GridMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell offset by the provided deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Continuous point at the centre of the cell.
    #[must_use]
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Number of king moves separating two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

/// Continuous position measured in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Grid cell that contains the point.
    #[must_use]
    pub fn cell(self) -> CellCoord {
        CellCoord::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the vector from this point toward `other`, in `(-π, π]`.
    #[must_use]
    pub fn bearing_to(self, other: WorldPoint) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Returns the point translated by the provided deltas.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Normalizes an angle in radians into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an angular difference into `(-π, π]`.
#[must_use]
pub fn wrap_angle_delta(delta: f32) -> f32 {
    let wrapped = normalize_angle(delta);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Sanitized movement input for a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MovementIntent {
    /// Forward (positive) or backward (negative) travel in `[-1, 1]`.
    pub forward: f32,
    /// Rightward (positive) or leftward (negative) strafing in `[-1, 1]`.
    pub strafe: f32,
    /// Keyboard rotation, clockwise positive, in `[-1, 1]`.
    pub turn: f32,
    /// Horizontal look delta reported by the pointer device, in pixels.
    pub look_delta: f32,
    /// Duration the intent applies to.
    pub dt: Duration,
}

/// States of the per-agent behaviour machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentBehaviorState {
    /// Standing still without having noticed the player.
    Idle,
    /// Moving toward the player's cell.
    Searching,
    /// Within attack range and firing on animation triggers.
    Attacking,
    /// Reacting to a hit until the pain sequence completes.
    Pain,
    /// Playing the death sequence.
    Dying,
    /// Terminal state; the agent no longer participates.
    Dead,
}

impl AgentBehaviorState {
    /// Animation sequence that plays while in this state.
    #[must_use]
    pub const fn sequence(self) -> AnimationSequence {
        match self {
            Self::Idle => AnimationSequence::Idle,
            Self::Searching => AnimationSequence::Walk,
            Self::Attacking => AnimationSequence::Attack,
            Self::Pain => AnimationSequence::Pain,
            Self::Dying | Self::Dead => AnimationSequence::Death,
        }
    }

    /// Reports whether only the world may enter this state.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Dying | Self::Dead)
    }
}

/// Set of cells currently held by living agents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancySet {
    cells: BTreeSet<CellCoord>,
}

impl OccupancySet {
    /// Creates an occupancy set from the provided cells.
    #[must_use]
    pub fn from_cells(cells: impl IntoIterator<Item = CellCoord>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Reports whether the cell is held by a living agent.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterator over the occupied cells in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }
}

/// Per-tick signals passed explicitly into systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TickEvents {
    /// Index of the current tick.
    pub tick: u64,
    /// Whether a shot was fired during this tick and has not been consumed.
    pub weapon_fired: bool,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous position.
    pub position: WorldPoint,
    /// Heading in `[0, 2π)`.
    pub angle: f32,
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Whether a fired shot is still pending resolution.
    pub shot_pending: bool,
    /// Whether the weapon is reloading.
    pub reloading: bool,
}

impl PlayerSnapshot {
    /// Cell containing the player.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        self.position.cell()
    }
}

/// Combat and locomotion constants resolved for a spawned agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentStats {
    /// Maximum health.
    pub max_health: i32,
    /// Distance below which the agent attacks, in grid units.
    pub attack_range: f32,
    /// Damage applied per successful attack.
    pub attack_damage: i32,
    /// Probability that an attack lands.
    pub accuracy: f32,
    /// Travel speed in grid units per second.
    pub speed: f32,
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Archetype the agent was spawned from.
    pub archetype: ArchetypeKind,
    /// Continuous position.
    pub position: WorldPoint,
    /// Current health, floored at zero.
    pub health: i32,
    /// Whether the agent is alive.
    pub alive: bool,
    /// Current behavioural state.
    pub behavior: AgentBehaviorState,
    /// Whether the agent is reacting to a hit.
    pub pain: bool,
    /// Whether the agent has ever seen the player.
    pub acquired: bool,
    /// Resolved combat constants.
    pub stats: AgentStats,
    /// Billboard parameters used for projection.
    pub sprite: SpriteDescriptor,
    /// Current animation frame.
    pub animation: AnimationCursor,
    /// Whether the agent's animation clock fired during this tick.
    pub animation_trigger: bool,
}

impl AgentSnapshot {
    /// Cell containing the agent.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        self.position.cell()
    }
}

/// Read-only snapshot describing all agents in spawn order.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured agent snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by identifier.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}

/// Immutable representation of a static prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropSnapshot {
    /// Identifier assigned to the prop.
    pub id: PropId,
    /// Kind of prop.
    pub kind: PropKind,
    /// Continuous position.
    pub position: WorldPoint,
    /// Billboard parameters used for projection.
    pub sprite: SpriteDescriptor,
    /// Current animation frame.
    pub animation: AnimationCursor,
}

/// Outcome of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// Every agent died.
    Victory,
    /// The player's health dropped below one.
    Defeat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_counts_king_moves() {
        let origin = CellCoord::new(1, 1);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(4, 3)), 3);
        assert_eq!(origin.chebyshev_distance(origin), 0);
    }

    #[test]
    fn world_point_cell_floors_coordinates() {
        assert_eq!(WorldPoint::new(2.9, 0.1).cell(), CellCoord::new(2, 0));
        assert_eq!(WorldPoint::new(-0.5, 3.0).cell(), CellCoord::new(-1, 3));
    }

    #[test]
    fn normalize_angle_wraps_into_positive_turn() {
        assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert!(normalize_angle(TAU) < TAU);
    }

    #[test]
    fn wrap_angle_delta_prefers_short_way_round() {
        assert!((wrap_angle_delta(TAU - 0.1) + 0.1).abs() < 1e-5);
        assert!((wrap_angle_delta(0.1) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn reserved_states_are_dying_and_dead() {
        assert!(AgentBehaviorState::Dying.is_reserved());
        assert!(AgentBehaviorState::Dead.is_reserved());
        assert!(!AgentBehaviorState::Pain.is_reserved());
    }

    #[test]
    fn occupancy_set_deduplicates_cells() {
        let set = OccupancySet::from_cells([CellCoord::new(1, 1), CellCoord::new(1, 1)]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(CellCoord::new(1, 1)));
    }
}
