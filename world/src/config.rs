//! Tunable parameters consumed when a world is built or reset.

use gridfire_core::{ArchetypeKind, ArchetypeTable, CellCoord, WeaponDescriptor, WorldPoint};
use serde::{Deserialize, Serialize};

use crate::level::LevelData;

/// Complete description of a new game.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Level layout and props.
    pub level: LevelData,
    /// Player start and locomotion constants.
    pub player: PlayerConfig,
    /// Weapon damage and reload timing.
    pub weapon: WeaponDescriptor,
    /// Random agent placement.
    pub spawning: SpawnConfig,
    /// Agent stat blocks.
    pub archetypes: ArchetypeTable,
}

/// Player start and locomotion constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Start position in grid units.
    pub start: WorldPoint,
    /// Start heading in radians.
    pub angle: f32,
    /// Travel speed in grid units per millisecond.
    pub speed: f32,
    /// Keyboard rotation speed in radians per millisecond.
    pub rotation_speed: f32,
    /// Collision probe scale; the probe reaches `delta * size_scale / dt_ms` ahead.
    pub size_scale: f32,
    /// Maximum health.
    pub max_health: i32,
    /// Milliseconds between regenerated health points.
    pub regen_delay_ms: u64,
    /// Radians per pixel of look delta per millisecond.
    pub look_sensitivity: f32,
    /// Largest look delta accepted per tick, in pixels.
    pub max_look_delta: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: WorldPoint::new(1.5, 5.0),
            angle: 0.0,
            speed: 0.004,
            rotation_speed: 0.002,
            size_scale: 60.0,
            max_health: 100,
            regen_delay_ms: 500,
            look_sensitivity: 0.0003,
            max_look_delta: 40.0,
        }
    }
}

/// Axis-aligned block of cells, inclusive of `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRegion {
    /// Upper-left cell.
    pub origin: CellCoord,
    /// Width in cells.
    pub columns: u32,
    /// Height in cells.
    pub rows: u32,
}

impl CellRegion {
    /// Region covering no cells.
    pub const EMPTY: CellRegion = CellRegion {
        origin: CellCoord::new(0, 0),
        columns: 0,
        rows: 0,
    };

    /// Reports whether the cell lies inside the region.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = i64::from(cell.column()) - i64::from(self.origin.column());
        let row = i64::from(cell.row()) - i64::from(self.origin.row());
        (0..i64::from(self.columns)).contains(&column) && (0..i64::from(self.rows)).contains(&row)
    }
}

/// Relative likelihood of each archetype when spawning at random.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    /// Soldier weight.
    pub soldier: u32,
    /// Caco demon weight.
    pub caco_demon: u32,
    /// Cyber demon weight.
    pub cyber_demon: u32,
}

impl SpawnWeights {
    /// Weight assigned to the provided archetype.
    #[must_use]
    pub const fn weight(&self, kind: ArchetypeKind) -> u32 {
        match kind {
            ArchetypeKind::Soldier => self.soldier,
            ArchetypeKind::CacoDemon => self.caco_demon,
            ArchetypeKind::CyberDemon => self.cyber_demon,
        }
    }
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            soldier: 70,
            caco_demon: 20,
            cyber_demon: 10,
        }
    }
}

/// Random agent placement parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seed of the world's random stream.
    pub seed: u64,
    /// Agents placed at random when a game starts.
    pub enemy_count: usize,
    /// Cell draws allowed per agent before placement fails.
    pub max_attempts: u32,
    /// Cells where random placement is refused.
    pub restricted: CellRegion,
    /// Archetype likelihoods.
    pub weights: SpawnWeights,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            seed: 0x6772_6964_6669_7265,
            enemy_count: 20,
            max_attempts: 1_000,
            restricted: CellRegion {
                origin: CellCoord::new(0, 0),
                columns: 10,
                rows: 10,
            },
            weights: SpawnWeights::default(),
        }
    }
}
