//! Run command implementation.

use super::output::JsonBattleResult;
use super::{CliError, OutputFormat, load_scenario};
use skirmish::battle::{Battle, BattleConfig, GameResult, RoundObserver};
use skirmish::render::{render_board, render_board_with_hit_points, render_result};
use std::path::Path;

/// Prints the board as a battle progresses.
#[derive(Debug, Clone, Copy)]
struct BoardPrinter;

impl RoundObserver for BoardPrinter {
    fn round_started(&mut self, round: u32, battle: &Battle) {
        if round == 1 {
            println!("Initially:");
            print!("{}", render_board_with_hit_points(battle));
            println!();
        }
    }

    fn round_completed(&mut self, round: u32, battle: &Battle) {
        let plural = if round == 1 { "" } else { "s" };
        println!("After {round} round{plural}:");
        print!("{}", render_board_with_hit_points(battle));
        println!();
    }

    fn battle_ended(&mut self, _result: &GameResult, battle: &Battle) {
        println!("Final board:");
        print!("{}", render_board(battle));
        println!();
    }
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded or the battle fails.
pub(crate) fn execute(
    map: &Path,
    config: &BattleConfig,
    format: OutputFormat,
    rounds: bool,
) -> Result<(), CliError> {
    let scenario = load_scenario(map)?;
    let mut battle = scenario.battle(config)?;

    let result = if rounds && format == OutputFormat::Text {
        battle.run_observed(&mut BoardPrinter)?
    } else {
        battle.run()?
    };

    match format {
        OutputFormat::Text => {
            print!("{}", render_result(&result));
        }
        OutputFormat::Json => {
            let json_result =
                JsonBattleResult::from_game_result(&map.display().to_string(), config, &result);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
    }

    Ok(())
}
