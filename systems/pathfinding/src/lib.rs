#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-step routing over the level's 8-connected free cells.

use std::collections::{hash_map::Entry, HashMap, VecDeque};

use gridfire_core::{CellCoord, GridMap, OccupancySet};

/// Neighbour offsets in exploration order: W, N, E, S, NW, NE, SE, SW.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, -1),
    (1, -1),
    (1, 1),
    (-1, 1),
];

/// Static adjacency between free cells, built once per level.
#[derive(Clone, Debug, Default)]
pub struct PathGraph {
    neighbours: HashMap<CellCoord, Vec<CellCoord>>,
}

impl PathGraph {
    /// Links every free cell to its free neighbours, diagonals included.
    #[must_use]
    pub fn from_grid(grid: &GridMap) -> Self {
        let neighbours = grid
            .free_cells()
            .map(|cell| {
                let adjacent = NEIGHBOUR_OFFSETS
                    .iter()
                    .map(|&(columns, rows)| cell.offset(columns, rows))
                    .filter(|candidate| !grid.is_wall(*candidate))
                    .collect();
                (cell, adjacent)
            })
            .collect();
        Self { neighbours }
    }

    /// Reports whether the cell is a node of the graph.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.neighbours.contains_key(&cell)
    }

    /// Neighbours of a node in exploration order. Empty for unknown cells.
    #[must_use]
    pub fn neighbours(&self, cell: CellCoord) -> &[CellCoord] {
        self.neighbours.get(&cell).map_or(&[], Vec::as_slice)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbours.len()
    }
}

/// Breadth-first router that memoizes the first hop per `(start, goal)` pair.
///
/// Cached answers are not invalidated when occupancy changes; callers clear
/// the cache when a new game starts.
#[derive(Debug)]
pub struct PathFinder {
    graph: PathGraph,
    cache: HashMap<(CellCoord, CellCoord), CellCoord>,
    queue: VecDeque<CellCoord>,
    parents: HashMap<CellCoord, CellCoord>,
}

impl PathFinder {
    /// Creates a router over the provided graph.
    #[must_use]
    pub fn new(graph: PathGraph) -> Self {
        Self {
            graph,
            cache: HashMap::new(),
            queue: VecDeque::new(),
            parents: HashMap::new(),
        }
    }

    /// Number of memoized queries.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Forgets every memoized query.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Returns the first cell on a shortest path from `start` to `goal`.
    ///
    /// Occupied cells are not expanded, except the goal itself. Returns
    /// `start` when already at the goal, when the goal cannot be reached, or
    /// when the only first hop is occupied.
    pub fn next_step(
        &mut self,
        start: CellCoord,
        goal: CellCoord,
        occupancy: &OccupancySet,
    ) -> CellCoord {
        if start == goal {
            return start;
        }
        if let Some(step) = self.cache.get(&(start, goal)) {
            return *step;
        }

        let step = self.search(start, goal, occupancy);
        if let Entry::Vacant(slot) = self.cache.entry((start, goal)) {
            let _ = slot.insert(step);
        }
        log::debug!(
            "path ({}, {}) -> ({}, {}) first hop ({}, {}); {} cached",
            start.column(),
            start.row(),
            goal.column(),
            goal.row(),
            step.column(),
            step.row(),
            self.cache.len()
        );
        step
    }

    fn search(
        &mut self,
        start: CellCoord,
        goal: CellCoord,
        occupancy: &OccupancySet,
    ) -> CellCoord {
        if !self.graph.contains(start) {
            return start;
        }

        self.queue.clear();
        self.parents.clear();
        self.queue.push_back(start);
        let _ = self.parents.insert(start, start);

        while let Some(current) = self.queue.pop_front() {
            if current == goal {
                break;
            }
            for &next in self.graph.neighbours(current) {
                if self.parents.contains_key(&next) {
                    continue;
                }
                if next != goal && occupancy.contains(next) {
                    continue;
                }
                let _ = self.parents.insert(next, current);
                self.queue.push_back(next);
            }
        }

        if !self.parents.contains_key(&goal) {
            return start;
        }

        let mut hop = goal;
        while let Some(&parent) = self.parents.get(&hop) {
            if parent == start {
                break;
            }
            hop = parent;
        }

        if occupancy.contains(hop) {
            start
        } else {
            hop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u8]]) -> GridMap {
        GridMap::from_rows(rows)
    }

    #[test]
    fn graph_links_diagonals_in_fixed_order() {
        let grid = grid(&[&[1, 1, 1, 1], &[1, 0, 0, 1], &[1, 0, 0, 1], &[1, 1, 1, 1]]);
        let graph = PathGraph::from_grid(&grid);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(
            graph.neighbours(CellCoord::new(1, 1)),
            &[
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
            ]
        );
        assert!(graph.neighbours(CellCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn adjacent_goal_is_the_first_hop() {
        let grid = grid(&[&[1, 1, 1, 1], &[1, 0, 0, 1], &[1, 1, 1, 1]]);
        let mut finder = PathFinder::new(PathGraph::from_grid(&grid));
        let step = finder.next_step(
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            &OccupancySet::default(),
        );
        assert_eq!(step, CellCoord::new(2, 1));
    }

    #[test]
    fn occupied_goal_as_only_hop_degrades_to_start() {
        let grid = grid(&[&[1, 1, 1, 1], &[1, 0, 0, 1], &[1, 1, 1, 1]]);
        let mut finder = PathFinder::new(PathGraph::from_grid(&grid));
        let occupancy = OccupancySet::from_cells([CellCoord::new(2, 1)]);
        let step = finder.next_step(CellCoord::new(1, 1), CellCoord::new(2, 1), &occupancy);
        assert_eq!(step, CellCoord::new(1, 1));
    }

    #[test]
    fn answers_are_memoized_until_cleared() {
        let grid = grid(&[&[1, 1, 1, 1, 1], &[1, 0, 0, 0, 1], &[1, 1, 1, 1, 1]]);
        let mut finder = PathFinder::new(PathGraph::from_grid(&grid));
        let start = CellCoord::new(1, 1);
        let goal = CellCoord::new(3, 1);

        let first = finder.next_step(start, goal, &OccupancySet::default());
        let blocked = OccupancySet::from_cells([CellCoord::new(2, 1)]);
        let cached = finder.next_step(start, goal, &blocked);
        assert_eq!(first, CellCoord::new(2, 1));
        assert_eq!(cached, first);
        assert_eq!(finder.cache_len(), 1);

        finder.clear_cache();
        assert_eq!(finder.next_step(start, goal, &blocked), start);
    }

    #[test]
    fn start_outside_graph_stays_put() {
        let grid = grid(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        let mut finder = PathFinder::new(PathGraph::from_grid(&grid));
        let wall = CellCoord::new(0, 0);
        assert_eq!(
            finder.next_step(wall, CellCoord::new(1, 1), &OccupancySet::default()),
            wall
        );
    }
}
