//! Minimal attack power search.
//!
//! Re-runs a scenario with one faction's attack power raised step by step
//! until that faction wins without losing a single unit.
//!
//! The search handles:
//! - A fresh battle per candidate, so no state leaks between trials
//! - Parallel evaluation of candidate batches with rayon
//! - In-order inspection of each batch, so the lowest winning power is the
//!   answer even when a higher candidate in the same batch also succeeds

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::battle::{BattleConfig, Faction, GameResult};
use crate::error::{BattleError, BattleResult};
use crate::scenario::Scenario;

/// Lowest candidate power tried by default, one above the default power.
pub const DEFAULT_MIN_POWER: i32 = 4;

/// Highest candidate power tried by default.
pub const DEFAULT_MAX_POWER: i32 = 200;

/// Candidates evaluated in parallel per batch by default.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Configuration for the power search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// The faction whose attack power is raised.
    pub faction: Faction,
    /// First candidate power.
    pub min_power: i32,
    /// Last candidate power (inclusive).
    pub max_power: i32,
    /// Candidates evaluated in parallel per batch.
    pub batch_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            faction: Faction::Elf,
            min_power: DEFAULT_MIN_POWER,
            max_power: DEFAULT_MAX_POWER,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SearchConfig {
    /// Check the candidate range and batch size.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidSearchRange`] for an empty or inverted
    /// range, a non-positive start or a zero batch.
    pub fn validate(&self) -> BattleResult<()> {
        if self.min_power <= 0 || self.min_power > self.max_power || self.batch_size == 0 {
            return Err(BattleError::InvalidSearchRange {
                min: self.min_power,
                max: self.max_power,
                batch: self.batch_size,
            });
        }
        Ok(())
    }
}

/// The outcome of one battle played at a candidate power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trial {
    /// Attack power the searched faction used.
    pub power: i32,
    /// How the battle ended.
    pub result: GameResult,
    /// Units the searched faction lost.
    pub losses: usize,
}

impl Trial {
    /// The searched faction won without losing a unit.
    #[must_use]
    pub fn is_flawless(&self, faction: Faction) -> bool {
        self.result.winner == faction && self.losses == 0
    }
}

/// Play one battle of `scenario` with `faction` at `power`.
///
/// # Errors
///
/// Returns an error if the battle cannot be built or exceeds its round
/// limit.
pub fn run_trial(
    scenario: &Scenario,
    base: &BattleConfig,
    faction: Faction,
    power: i32,
) -> BattleResult<Trial> {
    let config = base.with_attack_power(faction, power);
    let mut battle = scenario.battle(&config)?;
    let result = battle.run()?;
    Ok(Trial {
        power,
        result,
        losses: battle.losses(faction),
    })
}

/// Find the lowest power at which `search.faction` wins with no losses.
///
/// # Errors
///
/// Returns [`BattleError::SearchExhausted`] if no candidate up to
/// `search.max_power` succeeds, or any error raised by a trial.
pub fn find_minimal_power(
    scenario: &Scenario,
    base: &BattleConfig,
    search: &SearchConfig,
) -> BattleResult<Trial> {
    find_minimal_power_with(scenario, base, search, |_| {})
}

/// Like [`find_minimal_power`], calling `on_trial` for every trial up to and
/// including the answer, in increasing power order.
///
/// # Errors
///
/// See [`find_minimal_power`].
pub fn find_minimal_power_with<F>(
    scenario: &Scenario,
    base: &BattleConfig,
    search: &SearchConfig,
    mut on_trial: F,
) -> BattleResult<Trial>
where
    F: FnMut(&Trial),
{
    search.validate()?;
    let faction = search.faction;

    let mut start = search.min_power;
    while start <= search.max_power {
        let end = batch_end(start, search.max_power, search.batch_size);
        let candidates: Vec<i32> = (start..=end).collect();

        let trials: Vec<BattleResult<Trial>> = candidates
            .par_iter()
            .map(|&power| run_trial(scenario, base, faction, power))
            .collect();

        for trial in trials {
            let trial = trial?;
            info!(
                power = trial.power,
                winner = %trial.result.winner,
                losses = trial.losses,
                rounds = trial.result.rounds,
                "trial"
            );
            on_trial(&trial);
            if trial.is_flawless(faction) {
                info!(%faction, power = trial.power, outcome = trial.result.outcome(), "minimal power found");
                return Ok(trial);
            }
        }

        let Some(next) = end.checked_add(1) else {
            break;
        };
        start = next;
    }

    Err(BattleError::SearchExhausted {
        faction,
        max_power: search.max_power,
    })
}

/// Last candidate of the batch starting at `start`.
fn batch_end(start: i32, max_power: i32, batch_size: usize) -> i32 {
    let span = i32::try_from(batch_size - 1).unwrap_or(i32::MAX);
    start.saturating_add(span).min(max_power)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######
";

    fn sample() -> Scenario {
        SAMPLE.parse().unwrap()
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let inverted = SearchConfig {
            min_power: 10,
            max_power: 5,
            ..SearchConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(BattleError::InvalidSearchRange { min: 10, max: 5, .. })
        ));
        let zero_batch = SearchConfig {
            batch_size: 0,
            ..SearchConfig::default()
        };
        assert!(zero_batch.validate().is_err());
        let non_positive = SearchConfig {
            min_power: 0,
            ..SearchConfig::default()
        };
        assert!(non_positive.validate().is_err());
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_batch_end_clamps_to_max() {
        assert_eq!(batch_end(4, 200, 8), 11);
        assert_eq!(batch_end(196, 200, 8), 200);
        assert_eq!(batch_end(7, 7, 1), 7);
    }

    #[test]
    fn test_run_trial_reports_losses() {
        let trial = run_trial(&sample(), &BattleConfig::default(), Faction::Elf, 3).unwrap();
        assert_eq!(trial.result.winner, Faction::Goblin);
        assert_eq!(trial.losses, 2);
        assert!(!trial.is_flawless(Faction::Elf));
    }

    #[test]
    fn test_finds_published_minimum() {
        let trial =
            find_minimal_power(&sample(), &BattleConfig::default(), &SearchConfig::default())
                .unwrap();
        assert_eq!(trial.power, 15);
        assert_eq!(trial.result.rounds, 29);
        assert_eq!(trial.result.remaining_hit_points, 172);
        assert_eq!(trial.result.outcome(), 4988);
    }

    #[test]
    fn test_batch_size_does_not_change_answer() {
        for batch_size in [1, 3, 32] {
            let search = SearchConfig {
                batch_size,
                ..SearchConfig::default()
            };
            let trial = find_minimal_power(&sample(), &BattleConfig::default(), &search).unwrap();
            assert_eq!(trial.power, 15, "batch size {batch_size}");
        }
    }

    #[test]
    fn test_trials_reported_in_order() {
        let mut seen = Vec::new();
        let trial = find_minimal_power_with(
            &sample(),
            &BattleConfig::default(),
            &SearchConfig::default(),
            |trial| seen.push(trial.power),
        )
        .unwrap();
        assert_eq!(seen, (4..=trial.power).collect::<Vec<_>>());
    }

    #[test]
    fn test_exhausted_bound_is_an_error() {
        let search = SearchConfig {
            max_power: 10,
            ..SearchConfig::default()
        };
        assert_eq!(
            find_minimal_power(&sample(), &BattleConfig::default(), &search),
            Err(BattleError::SearchExhausted {
                faction: Faction::Elf,
                max_power: 10
            })
        );
    }
}
