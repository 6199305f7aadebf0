// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Skirmish: a deterministic grid combat simulator.
//!
//! Two factions, Elves and Goblins, fight on a fixed map of open and blocked
//! cells. Every tie in the rules is broken by reading order, so a battle
//! always plays out the same way.
//!
//! This crate provides:
//! - Map loading and board rendering
//! - Turn resolution: attack selection, shortest-path movement
//! - A round engine that runs a battle to the end
//! - A parallel search for the lowest attack power that wins without losses
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Power Search (rayon)         │
//! ├─────────────────────────────────────┤
//! │      Round Engine / Turn Resolver   │
//! ├─────────────────────────────────────┤
//! │   Grid · Unit Registry · Pathing    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use skirmish::{BattleConfig, Faction, Scenario};
//!
//! let scenario: Scenario = "#####\n#EG.#\n#####".parse().unwrap();
//! let mut battle = scenario.battle(&BattleConfig::default()).unwrap();
//! let result = battle.run().unwrap();
//! assert_eq!(result.winner, Faction::Elf);
//! ```

pub mod battle;
pub mod error;
pub mod render;
pub mod scenario;
pub mod search;

pub use error::{BattleError, BattleResult, ScenarioError};

// Re-export key types at crate root for convenience
pub use battle::{Battle, BattleConfig, Coord, Faction, GameResult, Grid, Unit, UnitId};
pub use scenario::{Deployment, Scenario};
pub use search::{SearchConfig, Trial, find_minimal_power, find_minimal_power_with, run_trial};
