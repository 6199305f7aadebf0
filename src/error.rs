//! Error types for battles, searches and map loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::battle::{Coord, Faction, UnitId};

/// Errors raised while building, running or searching battles.
///
/// Expected situations inside a turn (no reachable target, nobody adjacent)
/// are not errors; these variants are configuration mistakes or broken
/// preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BattleError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A faction has no units at the start of the battle.
    #[error("no {0} units in the starting layout")]
    MissingFaction(Faction),

    /// A unit was deployed on a wall or outside the grid.
    #[error("unit starts on a blocked cell at {position}")]
    StartOnWall {
        /// The offending cell.
        position: Coord,
    },

    /// Two units were deployed on the same cell.
    #[error("two units start on the same cell at {position}")]
    OverlappingUnits {
        /// The shared cell.
        position: Coord,
    },

    /// A unit id does not belong to the registry.
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    /// A dead unit was asked to move or was attacked.
    #[error("unit {0} is dead")]
    DeadUnit(UnitId),

    /// A move broke the open-and-unoccupied precondition.
    #[error("unit {unit} cannot move to {to}: {reason}")]
    IllegalMove {
        /// The unit that tried to move.
        unit: UnitId,
        /// Destination cell.
        to: Coord,
        /// Which precondition failed.
        reason: &'static str,
    },

    /// The battle kept going past the configured round ceiling.
    #[error("battle did not finish within {0} rounds")]
    RoundLimitExceeded(u32),

    /// A round was requested after a faction already won.
    #[error("battle is already over ({0} won)")]
    BattleOver(Faction),

    /// The power search range is empty or malformed.
    #[error("invalid power search range {min}..={max} (batch {batch})")]
    InvalidSearchRange {
        /// First candidate power.
        min: i32,
        /// Last candidate power.
        max: i32,
        /// Candidates per parallel batch.
        batch: usize,
    },

    /// No candidate power produced a zero-loss win.
    #[error("{faction} cannot win without losses at any attack power up to {max_power}")]
    SearchExhausted {
        /// The faction the search was run for.
        faction: Faction,
        /// Highest power tried.
        max_power: i32,
    },
}

/// Result type for battle operations.
pub type BattleResult<T> = Result<T, BattleError>;

/// Errors raised while reading a map.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The map file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The input contains no map rows.
    #[error("map is empty")]
    Empty,

    /// A row differs in width from the first row.
    #[error("line {line} is {found} cells wide, expected {expected}")]
    Ragged {
        /// 1-based line number in the input.
        line: usize,
        /// Width of the offending row.
        found: usize,
        /// Width of the first row.
        expected: usize,
    },

    /// A character that is neither terrain nor a unit.
    #[error("unexpected {glyph:?} at line {line}, column {column}")]
    UnexpectedGlyph {
        /// The character found.
        glyph: char,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        column: usize,
    },

    /// The map does not fit in 16-bit coordinates.
    #[error("map is larger than {max}x{max} cells")]
    TooLarge {
        /// Largest supported side length.
        max: usize,
    },
}
