//! Output formatting utilities for CLI.

use serde::Serialize;
use skirmish::{BattleConfig, Faction, GameResult, Trial};

/// JSON-serializable battle result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBattleResult {
    /// Map file the battle was loaded from.
    pub(super) map: String,
    /// Settings the battle ran with.
    pub(super) config: BattleConfig,
    /// Winning faction.
    pub(super) winner: Faction,
    /// Units the winner has left.
    pub(super) survivors: usize,
    /// Sum of the survivors' hit points.
    pub(super) remaining_hit_points: i64,
    /// Full rounds completed.
    pub(super) rounds: u32,
    /// Rounds times remaining hit points.
    pub(super) outcome: i64,
}

impl JsonBattleResult {
    /// Create from a `GameResult`.
    pub(super) fn from_game_result(map: &str, config: &BattleConfig, result: &GameResult) -> Self {
        Self {
            map: map.to_string(),
            config: *config,
            winner: result.winner,
            survivors: result.survivors,
            remaining_hit_points: result.remaining_hit_points,
            rounds: result.rounds,
            outcome: result.outcome(),
        }
    }
}

/// JSON-serializable search result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSearchResult {
    /// Map file the battles were loaded from.
    pub(super) map: String,
    /// Faction whose power was raised.
    pub(super) faction: Faction,
    /// Lowest power that wins without losses.
    pub(super) power: i32,
    /// The winning battle.
    pub(super) result: GameResult,
    /// Rounds times remaining hit points of the winning battle.
    pub(super) outcome: i64,
    /// Every trial up to and including the answer.
    pub(super) trials: Vec<Trial>,
}

impl JsonSearchResult {
    /// Create from the winning trial and the trials that led to it.
    pub(super) fn from_trials(map: &str, faction: Faction, answer: &Trial, trials: Vec<Trial>) -> Self {
        Self {
            map: map.to_string(),
            faction,
            power: answer.power,
            result: answer.result,
            outcome: answer.result.outcome(),
            trials,
        }
    }
}

/// Format one trial as a single line of text.
pub(super) fn format_trial(faction: Faction, trial: &Trial) -> String {
    let result = &trial.result;
    if result.winner == faction {
        let losses = match trial.losses {
            0 => "no losses".to_string(),
            1 => "1 loss".to_string(),
            n => format!("{n} losses"),
        };
        format!(
            "  power {:>3}: {} win with {losses} after {} rounds",
            trial.power,
            faction.plural(),
            result.rounds
        )
    } else {
        format!(
            "  power {:>3}: {} lose after {} rounds",
            trial.power,
            faction.plural(),
            result.rounds
        )
    }
}

/// Format a search answer as human-readable text.
pub(super) fn format_search_text(faction: Faction, answer: &Trial) -> String {
    let result = &answer.result;
    format!(
        "{} need attack power {} to win without losses\n  Rounds: {}\n  Survivors: {} ({} hit points)\n  Outcome: {}\n",
        faction.plural(),
        answer.power,
        result.rounds,
        result.survivors,
        result.remaining_hit_points,
        result.outcome()
    )
}
