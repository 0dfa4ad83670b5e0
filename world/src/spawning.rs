//! Seeded random placement of agents at game start.

use std::collections::BTreeSet;

use gridfire_core::{ArchetypeKind, CellCoord, GridMap};
use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};

use crate::config::SpawnConfig;

/// Reasons random placement can fail.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpawnError {
    /// Every archetype weight is zero.
    #[error("spawn weights must not all be zero")]
    InvalidWeights,
    /// No valid cell was drawn within the attempt budget.
    #[error("could not place agent {index} after {attempts} attempts")]
    PlacementExhausted {
        /// Zero-based index of the agent being placed.
        index: usize,
        /// Attempts spent.
        attempts: u32,
    },
}

/// Draws archetypes and cells for `enemy_count` agents.
///
/// Cells are rejected when they hold a wall, lie in the restricted region or
/// were already chosen for an earlier agent.
pub(crate) fn place_agents<R: Rng>(
    grid: &GridMap,
    config: &SpawnConfig,
    rng: &mut R,
) -> Result<Vec<(ArchetypeKind, CellCoord)>, SpawnError> {
    if config.enemy_count == 0 {
        return Ok(Vec::new());
    }

    let weights = ArchetypeKind::ALL.map(|kind| config.weights.weight(kind));
    let chooser = WeightedIndex::new(weights).map_err(|_| SpawnError::InvalidWeights)?;
    let columns = i32::try_from(grid.columns()).unwrap_or(i32::MAX).max(1);
    let rows = i32::try_from(grid.rows()).unwrap_or(i32::MAX).max(1);

    let mut taken = BTreeSet::new();
    let mut placements = Vec::with_capacity(config.enemy_count);
    for index in 0..config.enemy_count {
        let kind = ArchetypeKind::ALL[chooser.sample(rng)];
        let mut placed = None;
        for _ in 0..config.max_attempts {
            let cell = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
            if grid.is_wall(cell) || config.restricted.contains(cell) || taken.contains(&cell) {
                continue;
            }
            placed = Some(cell);
            break;
        }

        let Some(cell) = placed else {
            return Err(SpawnError::PlacementExhausted {
                index,
                attempts: config.max_attempts,
            });
        };
        let _ = taken.insert(cell);
        placements.push((kind, cell));
    }

    Ok(placements)
}
