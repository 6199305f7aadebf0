//! Battle layer for Skirmish.
//!
//! Implements the combat rules:
//! - Grid of open and blocked cells, coordinates in reading order
//! - Unit registry with tombstoned dead units and dense occupancy
//! - Reverse flood-fill movement with reading-order tie-breaks
//! - Attack selection (weakest adjacent enemy, then reading order)
//! - Round engine with a fixed per-round turn order

mod combat;
mod grid;
mod invariants;
mod pathing;
mod registry;
mod state;
mod turn;
mod unit;

pub use combat::{AttackReport, choose_target, process_attack};
pub use grid::{Cell, Coord, Grid};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use pathing::{DistanceField, FieldEntry, in_range_cells, next_step};
pub use registry::{DamageOutcome, Registry};
pub use state::{Battle, BattleConfig, GameResult, NoObserver, RoundObserver, RoundOutcome};
pub use turn::{TurnOutcome, TurnReport, take_turn};
pub use unit::{Faction, Unit, UnitId};

/// Hit points every unit starts with.
pub const DEFAULT_HIT_POINTS: i32 = 200;

/// Attack power of both factions unless overridden.
pub const DEFAULT_ATTACK_POWER: i32 = 3;

/// Completed rounds after which a battle is treated as stuck.
pub const DEFAULT_MAX_ROUNDS: u32 = 10_000;
