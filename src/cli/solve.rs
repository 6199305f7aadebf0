//! Solve command: both answers for a map with default settings.

use super::{CliError, load_scenario};
use skirmish::BattleConfig;
use skirmish::search::{SearchConfig, find_minimal_power};
use std::path::Path;

/// Execute the solve command.
///
/// Prints the outcome of the default battle, then the outcome of the battle
/// at the lowest Elf attack power that wins without losses.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded or either answer fails.
pub(crate) fn execute(map: &Path) -> Result<(), CliError> {
    let scenario = load_scenario(map)?;
    let config = BattleConfig::default();

    let result = scenario.battle(&config)?.run()?;
    println!(
        "Default battle: {} ({} rounds, {} win with {} hit points)",
        result.outcome(),
        result.rounds,
        result.winner.plural(),
        result.remaining_hit_points
    );

    let answer = find_minimal_power(&scenario, &config, &SearchConfig::default())?;
    println!(
        "Flawless Elves: {} (power {}, {} rounds, {} hit points)",
        answer.result.outcome(),
        answer.power,
        answer.result.rounds,
        answer.result.remaining_hit_points
    );

    Ok(())
}
