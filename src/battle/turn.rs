//! Resolution of a single unit's turn.

use tracing::debug;

use crate::battle::{AttackReport, Coord, Faction, Grid, Registry, UnitId, choose_target, next_step, process_attack};
use crate::error::BattleResult;

/// Everything a unit did during its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// The acting unit.
    pub unit: UnitId,
    /// Where it stood when the turn began.
    pub start: Coord,
    /// The cell it stepped into, if it moved.
    pub moved_to: Option<Coord>,
    /// The attack it made, if any.
    pub attack: Option<AttackReport>,
}

impl TurnReport {
    /// The unit neither moved nor attacked.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.moved_to.is_none() && self.attack.is_none()
    }

    /// Where the unit stood when it attacked (or ended its turn).
    #[must_use]
    pub fn position(&self) -> Coord {
        self.moved_to.unwrap_or(self.start)
    }
}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The unit died earlier in the round and does not act.
    Skipped,
    /// The unit found no live enemies: its faction has won.
    Victory(Faction),
    /// The unit took its turn.
    Acted(TurnReport),
}

/// Resolve one unit's turn: attack if an enemy is adjacent, otherwise step
/// toward the nearest reachable in-range cell and attack if that brought an
/// enemy into reach.
///
/// # Errors
///
/// Returns an error if `id` is unknown or a registry precondition breaks,
/// which means the engine itself is inconsistent.
pub fn take_turn(grid: &Grid, registry: &mut Registry, id: UnitId) -> BattleResult<TurnOutcome> {
    let unit = *registry.unit(id)?;
    if !unit.is_alive() {
        return Ok(TurnOutcome::Skipped);
    }

    if registry.live_enemies(unit.faction).next().is_none() {
        debug!(unit = %id, faction = %unit.faction, "no enemies left");
        return Ok(TurnOutcome::Victory(unit.faction));
    }

    let mut report = TurnReport {
        unit: id,
        start: unit.position,
        moved_to: None,
        attack: None,
    };

    let mut target = choose_target(grid, registry, &unit);
    if target.is_none() {
        if let Some(step) = next_step(grid, registry, unit.position, unit.faction) {
            registry.move_unit(grid, id, step)?;
            debug!(unit = %id, from = %unit.position, to = %step, "move");
            report.moved_to = Some(step);
            target = choose_target(grid, registry, registry.unit(id)?);
        }
    }

    if let Some(target) = target {
        report.attack = Some(process_attack(registry, id, target)?);
    }

    Ok(TurnOutcome::Acted(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Cell, Unit};

    fn setup(rows: &[&str], hit_points: &[i32]) -> (Grid, Registry) {
        let mut cells = Vec::new();
        let mut units = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                cells.push(if glyph == '#' { Cell::Wall } else { Cell::Open });
                if let Some(faction) = Faction::from_glyph(glyph) {
                    let hp = hit_points.get(units.len()).copied().unwrap_or(200);
                    units.push(Unit::new(Coord::new(x as u16, y as u16), faction, hp, 3));
                }
            }
        }
        let grid = Grid::new(rows[0].len() as u16, rows.len() as u16, cells).unwrap();
        let registry = Registry::new(&grid, units).unwrap();
        (grid, registry)
    }

    #[test]
    fn test_adjacent_enemy_attacked_without_moving() {
        let (grid, mut registry) = setup(&["#####", "#EG.#", "#####"], &[]);
        let TurnOutcome::Acted(report) = take_turn(&grid, &mut registry, UnitId(0)).unwrap() else {
            panic!("elf should act");
        };
        assert_eq!(report.moved_to, None);
        let attack = report.attack.unwrap();
        assert_eq!(attack.target, UnitId(1));
        assert_eq!(attack.remaining_hit_points, 197);
    }

    #[test]
    fn test_move_then_attack_in_same_turn() {
        let (grid, mut registry) = setup(&["######", "#E.G.#", "######"], &[]);
        let TurnOutcome::Acted(report) = take_turn(&grid, &mut registry, UnitId(0)).unwrap() else {
            panic!("elf should act");
        };
        assert_eq!(report.moved_to, Some(Coord::new(2, 1)));
        assert_eq!(report.attack.map(|a| a.target), Some(UnitId(1)));
        assert!(report.position().is_adjacent(Coord::new(3, 1)));
    }

    #[test]
    fn test_move_without_reaching_range() {
        let (grid, mut registry) = setup(&["#######", "#E...G#", "#######"], &[]);
        let TurnOutcome::Acted(report) = take_turn(&grid, &mut registry, UnitId(0)).unwrap() else {
            panic!("elf should act");
        };
        assert_eq!(report.moved_to, Some(Coord::new(2, 1)));
        assert_eq!(report.attack, None);
    }

    #[test]
    fn test_blocked_unit_passes() {
        let (grid, mut registry) = setup(&["#######", "#E#..G#", "#######"], &[]);
        let TurnOutcome::Acted(report) = take_turn(&grid, &mut registry, UnitId(0)).unwrap() else {
            panic!("elf should act");
        };
        assert!(report.is_idle());
        assert_eq!(registry.unit(UnitId(0)).unwrap().position, Coord::new(1, 1));
    }

    #[test]
    fn test_dead_unit_is_skipped() {
        let (grid, mut registry) = setup(&["#####", "#EG.#", "#####"], &[200, 2]);
        take_turn(&grid, &mut registry, UnitId(0)).unwrap();
        assert_eq!(
            take_turn(&grid, &mut registry, UnitId(1)).unwrap(),
            TurnOutcome::Skipped
        );
    }

    #[test]
    fn test_victory_when_no_enemies_remain() {
        let (grid, mut registry) = setup(&["#####", "#EG.#", "#####"], &[200, 2]);
        take_turn(&grid, &mut registry, UnitId(0)).unwrap();
        assert_eq!(
            take_turn(&grid, &mut registry, UnitId(0)).unwrap(),
            TurnOutcome::Victory(Faction::Elf)
        );
    }

    #[test]
    fn test_attacks_weakest_of_two_equal_reading_order() {
        // Goblin is flanked by two elves with equal hp; the upper one is
        // first in reading order.
        let (grid, mut registry) = setup(&["#####", "#.E.#", "#.G.#", "#.E.#", "#####"], &[]);
        let TurnOutcome::Acted(report) = take_turn(&grid, &mut registry, UnitId(1)).unwrap() else {
            panic!("goblin should act");
        };
        assert_eq!(report.attack.map(|a| a.target), Some(UnitId(0)));
    }
}
