//! Battle invariants - sanity checks that detect engine bugs.
//!
//! These should NEVER trigger. A violation means the registry's occupancy
//! array and its unit list disagree, or a unit ended up somewhere it cannot
//! stand.

use std::fmt;

use crate::battle::{Grid, Registry};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all registry invariants against `grid`.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(grid: &Grid, registry: &Registry) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (id, unit) in registry.live_units() {
        if !grid.is_open(unit.position) {
            violations.push(InvariantViolation {
                message: format!("Live unit {id} stands on blocked cell {}", unit.position),
            });
            continue;
        }
        match registry.occupant(unit.position) {
            Some(occupant) if occupant == id => {}
            Some(occupant) => violations.push(InvariantViolation {
                message: format!(
                    "Cell {} holds {occupant} but live unit {id} stands there",
                    unit.position
                ),
            }),
            None => violations.push(InvariantViolation {
                message: format!("Live unit {id} at {} missing from occupancy", unit.position),
            }),
        }
    }

    for (coord, _) in grid.iter() {
        let Some(occupant) = registry.occupant(coord) else {
            continue;
        };
        match registry.get(occupant) {
            Some(unit) if unit.is_alive() && unit.position == coord => {}
            Some(unit) if !unit.is_alive() => violations.push(InvariantViolation {
                message: format!("Dead unit {occupant} still occupies {coord}"),
            }),
            Some(unit) => violations.push(InvariantViolation {
                message: format!(
                    "Cell {coord} points at {occupant}, which stands at {}",
                    unit.position
                ),
            }),
            None => violations.push(InvariantViolation {
                message: format!("Cell {coord} points at unknown unit {occupant}"),
            }),
        }
    }

    let occupied = registry.occupancy().iter().filter(|slot| slot.is_some()).count();
    let live = registry.total_live();
    if occupied != live {
        violations.push(InvariantViolation {
            message: format!("{occupied} occupied cells for {live} live units"),
        });
    }

    violations
}

/// Assert all battle invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(grid: &Grid, registry: &Registry) {
    let violations = check_invariants(grid, registry);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Battle invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_grid: &Grid, _registry: &Registry) {}
