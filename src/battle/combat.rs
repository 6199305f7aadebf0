//! Attack resolution.
//!
//! A unit may only strike one of its four orthogonal neighbours. Among
//! adjacent enemies the weakest is chosen; equal hit points are broken by
//! the enemy's position in reading order.

use tracing::debug;

use crate::battle::{Grid, Registry, Unit, UnitId};
use crate::error::BattleResult;

/// What happened when one unit struck another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    /// The unit that was hit.
    pub target: UnitId,
    /// Damage dealt (the attacker's power).
    pub damage: i32,
    /// Target hit points after the hit.
    pub remaining_hit_points: i32,
    /// Whether the hit killed the target.
    pub killed: bool,
}

/// Choose the adjacent enemy `attacker` should strike, if any.
///
/// Neighbours are scanned up, left, right, down; the lowest hit points win
/// and reading order breaks ties.
#[must_use]
pub fn choose_target(grid: &Grid, registry: &Registry, attacker: &Unit) -> Option<UnitId> {
    grid.neighbors(attacker.position)
        .filter_map(|cell| registry.unit_at(cell))
        .filter(|(_, unit)| unit.is_enemy_of(attacker))
        .min_by_key(|(_, unit)| (unit.hit_points, unit.position))
        .map(|(id, _)| id)
}

/// Deal `attacker`'s power to `target`.
///
/// # Errors
///
/// Returns an error if either id is unknown or the target is already dead.
pub fn process_attack(
    registry: &mut Registry,
    attacker: UnitId,
    target: UnitId,
) -> BattleResult<AttackReport> {
    let damage = registry.unit(attacker)?.attack_power;
    let outcome = registry.apply_damage(target, damage)?;

    debug!(
        %attacker,
        %target,
        damage,
        remaining = outcome.remaining_hit_points,
        "attack"
    );
    if outcome.killed {
        debug!(%target, "unit killed");
    }

    Ok(AttackReport {
        target,
        damage,
        remaining_hit_points: outcome.remaining_hit_points,
        killed: outcome.killed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Coord, Faction};
    use crate::error::BattleError;

    fn unit(x: u16, y: u16, faction: Faction, hit_points: i32) -> Unit {
        Unit::new(Coord::new(x, y), faction, hit_points, 3)
    }

    #[test]
    fn test_lowest_hit_points_wins() {
        let grid = Grid::open(5, 5).unwrap();
        let registry = Registry::new(
            &grid,
            vec![
                unit(2, 2, Faction::Elf, 200),
                unit(2, 1, Faction::Goblin, 4),
                unit(3, 2, Faction::Goblin, 2),
                unit(2, 3, Faction::Goblin, 2),
                unit(1, 2, Faction::Goblin, 3),
            ],
        )
        .unwrap();
        let elf = *registry.unit(UnitId(0)).unwrap();
        // Two goblins at 2 hp: the one to the right precedes the one below.
        assert_eq!(choose_target(&grid, &registry, &elf), Some(UnitId(2)));
    }

    #[test]
    fn test_equal_hit_points_reading_order() {
        let grid = Grid::open(5, 5).unwrap();
        let registry = Registry::new(
            &grid,
            vec![
                unit(2, 3, Faction::Goblin, 200),
                unit(1, 2, Faction::Goblin, 200),
                unit(2, 2, Faction::Elf, 200),
            ],
        )
        .unwrap();
        let elf = *registry.unit(UnitId(2)).unwrap();
        assert_eq!(choose_target(&grid, &registry, &elf), Some(UnitId(1)));
    }

    #[test]
    fn test_ignores_allies_and_diagonals() {
        let grid = Grid::open(5, 5).unwrap();
        let registry = Registry::new(
            &grid,
            vec![
                unit(2, 2, Faction::Elf, 200),
                unit(2, 1, Faction::Elf, 1),
                unit(3, 3, Faction::Goblin, 1),
                unit(1, 1, Faction::Goblin, 1),
            ],
        )
        .unwrap();
        let elf = *registry.unit(UnitId(0)).unwrap();
        assert_eq!(choose_target(&grid, &registry, &elf), None);
    }

    #[test]
    fn test_process_attack_kills() {
        let grid = Grid::open(3, 1).unwrap();
        let mut registry = Registry::new(
            &grid,
            vec![
                Unit::new(Coord::new(0, 0), Faction::Elf, 200, 15),
                unit(1, 0, Faction::Goblin, 10),
            ],
        )
        .unwrap();

        let report = process_attack(&mut registry, UnitId(0), UnitId(1)).unwrap();
        assert_eq!(report.damage, 15);
        assert_eq!(report.remaining_hit_points, -5);
        assert!(report.killed);
        assert!(registry.unit_at(Coord::new(1, 0)).is_none());

        assert_eq!(
            process_attack(&mut registry, UnitId(0), UnitId(1)),
            Err(BattleError::DeadUnit(UnitId(1)))
        );
    }
}
