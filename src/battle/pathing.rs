//! Shortest-path search toward enemies.
//!
//! Movement uses a reverse flood-fill: every free cell next to a live enemy
//! is a seed at distance zero, and rings expand outward one step at a time.
//! Each reached cell records its distance and the reading-order-smallest
//! seed among those at that distance. A mover then ranks its own free
//! neighbours by `(distance, origin, neighbour)`, which picks the nearest
//! in-range cell (ties in reading order) and the first step toward it (ties
//! in reading order) in one pass.

use tracing::trace;

use crate::battle::{Coord, Faction, Grid, Registry};

/// What the flood-fill knows about one reached cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldEntry {
    /// Steps from this cell to `origin`.
    pub distance: u32,
    /// The in-range seed cell this distance was measured to.
    pub origin: Coord,
}

/// Distances from every reached free cell to the nearest seed.
#[derive(Debug, Clone)]
pub struct DistanceField {
    /// Grid width, for index math.
    width: u16,
    /// Row-major entries; `None` means not reached.
    entries: Vec<Option<FieldEntry>>,
}

impl DistanceField {
    /// Flood outward from `seeds` across open, unoccupied cells.
    ///
    /// Seeds that are blocked or occupied are ignored. When `goal` is given
    /// the fill stops after the first ring that touches a neighbour of
    /// `goal`, since nothing farther can matter to a unit standing there.
    #[must_use]
    pub fn flood(
        grid: &Grid,
        registry: &Registry,
        seeds: impl IntoIterator<Item = Coord>,
        goal: Option<Coord>,
    ) -> Self {
        let mut field = Self {
            width: grid.width(),
            entries: vec![None; grid.len()],
        };
        let passable = |coord: Coord| grid.is_open(coord) && !registry.is_occupied(coord);

        let mut frontier = Vec::new();
        for seed in seeds {
            if !passable(seed) {
                continue;
            }
            let Some(idx) = grid.index(seed) else {
                continue;
            };
            if field.entries[idx].is_none() {
                field.entries[idx] = Some(FieldEntry {
                    distance: 0,
                    origin: seed,
                });
                frontier.push(seed);
            }
        }

        let mut distance = 0u32;
        let mut reached = frontier.len();
        while !frontier.is_empty() {
            if goal.is_some_and(|goal| frontier.iter().any(|cell| cell.is_adjacent(goal))) {
                break;
            }

            distance += 1;
            let mut next = Vec::new();
            for &cell in &frontier {
                let Some(origin) = field.get(cell).map(|entry| entry.origin) else {
                    continue;
                };
                for neighbor in grid.neighbors(cell) {
                    if !passable(neighbor) {
                        continue;
                    }
                    let Some(idx) = grid.index(neighbor) else {
                        continue;
                    };
                    match field.entries[idx] {
                        None => {
                            field.entries[idx] = Some(FieldEntry { distance, origin });
                            next.push(neighbor);
                        }
                        // Same ring, earlier seed: the smaller origin wins.
                        Some(entry) if entry.distance == distance && origin < entry.origin => {
                            field.entries[idx] = Some(FieldEntry { distance, origin });
                        }
                        Some(_) => {}
                    }
                }
            }
            reached += next.len();
            frontier = next;
        }

        trace!(reached, rings = distance, "flood fill finished");
        field
    }

    /// The entry for `coord`, if the fill reached it.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<FieldEntry> {
        let width = usize::from(self.width);
        if coord.x >= self.width {
            return None;
        }
        let idx = usize::from(coord.y) * width + usize::from(coord.x);
        self.entries.get(idx).copied().flatten()
    }

    /// Number of cells the fill reached.
    #[must_use]
    pub fn reached(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }
}

/// Free cells orthogonally adjacent to any live enemy of `faction`.
#[must_use]
pub fn in_range_cells(grid: &Grid, registry: &Registry, faction: Faction) -> Vec<Coord> {
    let mut cells: Vec<Coord> = registry
        .live_enemies(faction)
        .flat_map(|(_, enemy)| grid.neighbors(enemy.position))
        .filter(|&cell| grid.is_open(cell) && !registry.is_occupied(cell))
        .collect();
    cells.sort_unstable();
    cells.dedup();
    cells
}

/// The single step a unit of `faction` standing on `from` should take.
///
/// Returns `None` when no in-range cell is reachable; the unit then stays
/// put this turn.
#[must_use]
pub fn next_step(grid: &Grid, registry: &Registry, from: Coord, faction: Faction) -> Option<Coord> {
    let seeds = in_range_cells(grid, registry, faction);
    if seeds.is_empty() {
        return None;
    }

    let field = DistanceField::flood(grid, registry, seeds, Some(from));
    grid.neighbors(from)
        .filter_map(|step| field.get(step).map(|entry| (entry.distance, entry.origin, step)))
        .min()
        .map(|(_, _, step)| step)
}
