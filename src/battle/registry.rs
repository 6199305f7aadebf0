//! Unit registry: every unit of a battle plus a dense occupancy array.
//!
//! Dead units stay in the backing vector (tombstoned) so ids and round
//! iteration are never disturbed; the occupancy array only holds live units
//! and is updated by the same two mutators that change positions and hit
//! points, so it cannot drift from the unit list.

use crate::battle::{Coord, Faction, Grid, Unit, UnitId};
use crate::error::{BattleError, BattleResult};

/// Result of applying damage to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Hit points after the hit (may be negative).
    pub remaining_hit_points: i32,
    /// Whether this hit killed the unit.
    pub killed: bool,
}

/// All units of a battle, addressed by [`UnitId`].
#[derive(Debug, Clone)]
pub struct Registry {
    /// Units in deployment order; index == id.
    units: Vec<Unit>,
    /// Row-major live-unit occupancy, same shape as the grid.
    occupancy: Vec<Option<UnitId>>,
    /// Grid width, for index math.
    width: u16,
    /// Grid height, for bounds checks.
    height: u16,
}

impl Registry {
    /// Build a registry for `grid`.
    ///
    /// # Errors
    ///
    /// Returns an error if a live unit starts on a blocked cell or shares a
    /// cell with another live unit.
    pub fn new(grid: &Grid, units: Vec<Unit>) -> BattleResult<Self> {
        let mut occupancy = vec![None; grid.len()];

        for (idx, unit) in units.iter().enumerate() {
            if !unit.is_alive() {
                continue;
            }
            let Some(cell) = grid.index(unit.position).filter(|_| grid.is_open(unit.position))
            else {
                return Err(BattleError::StartOnWall {
                    position: unit.position,
                });
            };
            if occupancy[cell].is_some() {
                return Err(BattleError::OverlappingUnits {
                    position: unit.position,
                });
            }
            occupancy[cell] = Some(id_for(idx));
        }

        Ok(Self {
            units,
            occupancy,
            width: grid.width(),
            height: grid.height(),
        })
    }

    /// Number of units ever deployed, dead ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no units were deployed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Look up a unit, dead or alive.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    /// Look up a unit, failing on unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnknownUnit`] if `id` was never deployed.
    pub fn unit(&self, id: UnitId) -> BattleResult<&Unit> {
        self.get(id).ok_or(BattleError::UnknownUnit(id))
    }

    /// The live unit standing on `coord`, if any.
    #[must_use]
    pub fn unit_at(&self, coord: Coord) -> Option<(UnitId, &Unit)> {
        let id = self.occupant(coord)?;
        self.get(id).map(|unit| (id, unit))
    }

    /// Id of the live unit standing on `coord`, if any.
    #[must_use]
    #[inline]
    pub fn occupant(&self, coord: Coord) -> Option<UnitId> {
        self.slot(coord).and_then(|idx| self.occupancy[idx])
    }

    /// Whether a live unit stands on `coord`.
    #[must_use]
    #[inline]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.occupant(coord).is_some()
    }

    /// Every unit with its id, dead ones included.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(idx, unit)| (id_for(idx), unit))
    }

    /// Every live unit with its id, in deployment order.
    pub fn live_units(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.iter().filter(|(_, unit)| unit.is_alive())
    }

    /// Every live unit that is hostile to `faction`.
    pub fn live_enemies(&self, faction: Faction) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.live_units()
            .filter(move |(_, unit)| unit.faction != faction)
    }

    /// Count live units of a faction.
    #[must_use]
    pub fn live_count(&self, faction: Faction) -> usize {
        self.live_units()
            .filter(|(_, unit)| unit.faction == faction)
            .count()
    }

    /// Count live units of both factions.
    #[must_use]
    pub fn total_live(&self) -> usize {
        self.live_units().count()
    }

    /// Sum of hit points over a faction's live units.
    #[must_use]
    pub fn live_hit_points(&self, faction: Faction) -> i64 {
        self.live_units()
            .filter(|(_, unit)| unit.faction == faction)
            .map(|(_, unit)| i64::from(unit.hit_points))
            .sum()
    }

    /// Live unit ids sorted by position in reading order.
    ///
    /// Taken once at the start of a round; later moves do not reorder it.
    #[must_use]
    pub fn turn_order(&self) -> Vec<UnitId> {
        let mut order: Vec<(Coord, UnitId)> = self
            .live_units()
            .map(|(id, unit)| (unit.position, id))
            .collect();
        order.sort_unstable();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Subtract `amount` from a unit's hit points.
    ///
    /// A unit whose hit points drop to zero or below is dead immediately: it
    /// leaves the occupancy array and drops out of every live query.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is unknown or already dead.
    pub fn apply_damage(&mut self, id: UnitId, amount: i32) -> BattleResult<DamageOutcome> {
        let slot = self.slot(self.unit(id)?.position);
        let unit = self
            .units
            .get_mut(id.index())
            .ok_or(BattleError::UnknownUnit(id))?;
        if !unit.is_alive() {
            return Err(BattleError::DeadUnit(id));
        }

        unit.hit_points = unit.hit_points.saturating_sub(amount);
        let killed = !unit.is_alive();
        let remaining_hit_points = unit.hit_points;

        if killed {
            if let Some(idx) = slot {
                self.occupancy[idx] = None;
            }
        }

        Ok(DamageOutcome {
            remaining_hit_points,
            killed,
        })
    }

    /// Relocate a live unit.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::IllegalMove`] if the destination is blocked or
    /// occupied, and an id error if the unit is unknown or dead.
    pub fn move_unit(&mut self, grid: &Grid, id: UnitId, to: Coord) -> BattleResult<()> {
        let unit = self.unit(id)?;
        if !unit.is_alive() {
            return Err(BattleError::DeadUnit(id));
        }
        let from = unit.position;

        if !grid.is_open(to) {
            return Err(BattleError::IllegalMove {
                unit: id,
                to,
                reason: "cell is blocked",
            });
        }
        if self.is_occupied(to) {
            return Err(BattleError::IllegalMove {
                unit: id,
                to,
                reason: "cell is occupied",
            });
        }

        let (Some(src), Some(dst)) = (self.slot(from), self.slot(to)) else {
            return Err(BattleError::IllegalMove {
                unit: id,
                to,
                reason: "cell is outside the grid",
            });
        };
        self.occupancy[src] = None;
        self.occupancy[dst] = Some(id);
        self.units[id.index()].position = to;

        Ok(())
    }

    /// Raw occupancy array, for consistency checks.
    pub(crate) fn occupancy(&self) -> &[Option<UnitId>] {
        &self.occupancy
    }

    /// Occupancy index of `coord`.
    fn slot(&self, coord: Coord) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }
}

/// Id for the unit stored at `idx`.
#[allow(clippy::cast_possible_truncation)]
fn id_for(idx: usize) -> UnitId {
    UnitId(idx as u32)
}
