//! Battle state and the round engine.

use serde::Serialize;
use tracing::debug;

use crate::battle::{
    Coord, DEFAULT_ATTACK_POWER, DEFAULT_HIT_POINTS, DEFAULT_MAX_ROUNDS, Faction, Grid, Registry,
    TurnOutcome, TurnReport, Unit, UnitId, assert_invariants, take_turn,
};
use crate::error::{BattleError, BattleResult};

/// Tunable parameters of a single battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BattleConfig {
    /// Starting hit points of every unit.
    pub hit_points: i32,
    /// Attack power of Elves.
    pub elf_power: i32,
    /// Attack power of Goblins.
    pub goblin_power: i32,
    /// Completed rounds after which the battle is declared stuck.
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hit_points: DEFAULT_HIT_POINTS,
            elf_power: DEFAULT_ATTACK_POWER,
            goblin_power: DEFAULT_ATTACK_POWER,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl BattleConfig {
    /// Attack power of `faction`.
    #[must_use]
    pub const fn attack_power(&self, faction: Faction) -> i32 {
        match faction {
            Faction::Elf => self.elf_power,
            Faction::Goblin => self.goblin_power,
        }
    }

    /// Copy of this config with `faction`'s power replaced.
    #[must_use]
    pub const fn with_attack_power(mut self, faction: Faction, power: i32) -> Self {
        match faction {
            Faction::Elf => self.elf_power = power,
            Faction::Goblin => self.goblin_power = power,
        }
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] naming the bad field.
    pub fn validate(&self) -> BattleResult<()> {
        if self.hit_points <= 0 {
            return Err(BattleError::InvalidConfig("hit points must be positive"));
        }
        if self.elf_power <= 0 || self.goblin_power <= 0 {
            return Err(BattleError::InvalidConfig("attack power must be positive"));
        }
        if self.max_rounds == 0 {
            return Err(BattleError::InvalidConfig("round limit must be positive"));
        }
        Ok(())
    }

    /// A fresh unit of `faction` standing on `position`.
    #[must_use]
    pub const fn recruit(&self, position: Coord, faction: Faction) -> Unit {
        Unit::new(position, faction, self.hit_points, self.attack_power(faction))
    }
}

/// Final result of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The faction left standing.
    pub winner: Faction,
    /// Number of units the winner has left.
    pub survivors: usize,
    /// Sum of the survivors' hit points.
    pub remaining_hit_points: i64,
    /// Rounds completed before the battle ended.
    pub rounds: u32,
}

impl GameResult {
    /// Completed rounds times remaining hit points.
    #[must_use]
    pub fn outcome(&self) -> i64 {
        i64::from(self.rounds) * self.remaining_hit_points
    }
}

/// How a call to [`Battle::play_round`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Every live unit acted; the round counts.
    Completed {
        /// Rounds completed so far, including this one.
        rounds: u32,
    },
    /// A unit found no enemies mid-round; the round does not count.
    Victory(Faction),
}

/// Hooks invoked at round boundaries. Observers only read the battle.
pub trait RoundObserver {
    /// A round is about to start; `round` is its 1-based number.
    fn round_started(&mut self, _round: u32, _battle: &Battle) {}

    /// A unit finished its turn.
    fn turn_taken(&mut self, _report: &TurnReport, _battle: &Battle) {}

    /// A round completed; `round` is the number of completed rounds.
    fn round_completed(&mut self, _round: u32, _battle: &Battle) {}

    /// The battle ended.
    fn battle_ended(&mut self, _result: &GameResult, _battle: &Battle) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl RoundObserver for NoObserver {}

/// A battle in progress.
#[derive(Debug, Clone)]
pub struct Battle {
    /// The fixed battlefield.
    grid: Grid,
    /// Every unit, dead ones tombstoned.
    registry: Registry,
    /// Live units per faction at deployment.
    starting: [usize; 2],
    /// Rounds completed so far.
    rounds: u32,
    /// Set once a unit finds no enemies.
    winner: Option<Faction>,
    /// Completed-round ceiling.
    max_rounds: u32,
}

impl Battle {
    /// Deploy `units` on `grid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, a unit starts on a blocked
    /// or shared cell, or either faction has no units.
    pub fn new(grid: Grid, units: Vec<Unit>, config: &BattleConfig) -> BattleResult<Self> {
        config.validate()?;
        let registry = Registry::new(&grid, units)?;

        let starting = Faction::ALL.map(|faction| registry.live_count(faction));
        for (faction, count) in Faction::ALL.into_iter().zip(starting) {
            if count == 0 {
                return Err(BattleError::MissingFaction(faction));
            }
        }

        Ok(Self {
            grid,
            registry,
            starting,
            rounds: 0,
            winner: None,
            max_rounds: config.max_rounds,
        })
    }

    /// The battlefield.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The units.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Rounds completed so far.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The winner, once the battle is over.
    #[must_use]
    pub const fn winner(&self) -> Option<Faction> {
        self.winner
    }

    /// Check if the battle is over.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Units `faction` deployed with.
    #[must_use]
    pub const fn starting_count(&self, faction: Faction) -> usize {
        self.starting[faction_slot(faction)]
    }

    /// Units `faction` has lost so far.
    #[must_use]
    pub fn losses(&self, faction: Faction) -> usize {
        self.starting_count(faction) - self.registry.live_count(faction)
    }

    /// Play one round.
    ///
    /// Turn order is fixed from positions at the start of the round. Units
    /// killed before their turn do not act.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::BattleOver`] if a faction already won, or any
    /// error raised while resolving a turn.
    pub fn play_round(&mut self) -> BattleResult<RoundOutcome> {
        self.play_round_observed(&mut NoObserver)
    }

    /// Play one round, reporting each turn to `observer`.
    ///
    /// # Errors
    ///
    /// See [`Battle::play_round`].
    pub fn play_round_observed(
        &mut self,
        observer: &mut dyn RoundObserver,
    ) -> BattleResult<RoundOutcome> {
        if let Some(winner) = self.winner {
            return Err(BattleError::BattleOver(winner));
        }

        observer.round_started(self.rounds + 1, self);
        for id in self.registry.turn_order() {
            match take_turn(&self.grid, &mut self.registry, id)? {
                TurnOutcome::Skipped => {}
                TurnOutcome::Victory(faction) => {
                    debug!(%faction, rounds = self.rounds, "battle won");
                    self.winner = Some(faction);
                    return Ok(RoundOutcome::Victory(faction));
                }
                TurnOutcome::Acted(report) => {
                    assert_invariants(&self.grid, &self.registry);
                    observer.turn_taken(&report, self);
                }
            }
        }

        self.rounds += 1;
        debug!(rounds = self.rounds, live = self.registry.total_live(), "round completed");
        observer.round_completed(self.rounds, self);
        Ok(RoundOutcome::Completed {
            rounds: self.rounds,
        })
    }

    /// Play until one faction is eliminated.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::RoundLimitExceeded`] if the battle is still
    /// going after the configured number of rounds.
    pub fn run(&mut self) -> BattleResult<GameResult> {
        self.run_observed(&mut NoObserver)
    }

    /// Play until one faction is eliminated, reporting to `observer`.
    ///
    /// # Errors
    ///
    /// See [`Battle::run`].
    pub fn run_observed(&mut self, observer: &mut dyn RoundObserver) -> BattleResult<GameResult> {
        loop {
            if self.rounds >= self.max_rounds {
                return Err(BattleError::RoundLimitExceeded(self.max_rounds));
            }
            if let RoundOutcome::Victory(_) = self.play_round_observed(observer)? {
                break;
            }
        }

        let result = self.result().ok_or(BattleError::InvalidConfig("battle ended without a winner"))?;
        observer.battle_ended(&result, self);
        Ok(result)
    }

    /// The final result, once the battle is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        let winner = self.winner?;
        Some(GameResult {
            winner,
            survivors: self.registry.live_count(winner),
            remaining_hit_points: self.registry.live_hit_points(winner),
            rounds: self.rounds,
        })
    }

    /// The unit with this id.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnknownUnit`] for ids not in this battle.
    pub fn unit(&self, id: UnitId) -> BattleResult<&Unit> {
        self.registry.unit(id)
    }
}

/// Index of `faction` in per-faction arrays.
const fn faction_slot(faction: Faction) -> usize {
    match faction {
        Faction::Elf => 0,
        Faction::Goblin => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    fn battle(map: &str, config: &BattleConfig) -> Battle {
        map.parse::<Scenario>().unwrap().battle(config).unwrap()
    }

    #[test]
    fn test_config_with_attack_power() {
        let config = BattleConfig::default().with_attack_power(Faction::Elf, 15);
        assert_eq!(config.attack_power(Faction::Elf), 15);
        assert_eq!(config.attack_power(Faction::Goblin), 3);
    }

    #[test]
    fn test_config_validation() {
        let bad = BattleConfig {
            hit_points: 0,
            ..BattleConfig::default()
        };
        assert!(matches!(
            Battle::new(Grid::open(2, 1).unwrap(), Vec::new(), &bad),
            Err(BattleError::InvalidConfig(_))
        ));
        let bad = BattleConfig::default().with_attack_power(Faction::Goblin, 0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_missing_faction_is_rejected() {
        let result = "#####\n#E.E#\n#####".parse::<Scenario>().unwrap().battle(&BattleConfig::default());
        assert_eq!(result.unwrap_err(), BattleError::MissingFaction(Faction::Goblin));
    }

    #[test]
    fn test_duel_counts_only_full_rounds() {
        // Equal duel: the elf acts first each round, so it lands the killing
        // blow in round 67 (67 * 3 = 201). The goblin's next turn is in round
        // 68, where it finds no enemies; 67 rounds completed.
        let mut battle = battle("####\n#EG#\n####", &BattleConfig::default());
        let result = battle.run().unwrap();
        assert_eq!(result.winner, Faction::Elf);
        assert_eq!(result.survivors, 1);
        assert_eq!(result.remaining_hit_points, 200 - 66 * 3);
        assert_eq!(result.rounds, 67);
    }

    #[test]
    fn test_victory_mid_round_not_counted() {
        // The goblin dies on the elf's turn in round 1; the second elf's turn
        // finds no enemies, ending the battle before round 1 completes.
        let config = BattleConfig {
            elf_power: 300,
            ..BattleConfig::default()
        };
        let mut battle = battle("#####\n#EGE#\n#####", &config);
        assert_eq!(battle.play_round().unwrap(), RoundOutcome::Victory(Faction::Elf));
        assert_eq!(battle.rounds(), 0);
        assert_eq!(battle.result().unwrap().rounds, 0);
        assert_eq!(battle.play_round(), Err(BattleError::BattleOver(Faction::Elf)));
    }

    #[test]
    fn test_unit_killed_before_its_turn_does_not_act() {
        // Round 1 order: E(1,1), G(2,1), G(3,1). The elf one-shots the
        // goblin next to it; that goblin's turn is skipped, and the last
        // goblin then walks into range.
        let config = BattleConfig {
            elf_power: 200,
            ..BattleConfig::default()
        };
        let mut battle = battle("######\n#EGG.#\n######", &config);
        let mut log = Recorder::default();
        battle.play_round_observed(&mut log).unwrap();
        assert_eq!(log.actors, vec![UnitId(0), UnitId(2)]);
        assert_eq!(battle.losses(Faction::Goblin), 1);
        assert_eq!(battle.registry().total_live(), 2);
    }

    #[test]
    fn test_stalemate_hits_round_limit() {
        let config = BattleConfig {
            max_rounds: 5,
            ..BattleConfig::default()
        };
        let mut battle = battle("#######\n#E.#.G#\n#######", &config);
        assert_eq!(battle.run(), Err(BattleError::RoundLimitExceeded(5)));
        assert_eq!(battle.rounds(), 5);
    }

    #[test]
    fn test_observer_sees_every_round() {
        let mut battle = battle("####\n#EG#\n####", &BattleConfig::default());
        let mut log = Recorder::default();
        let result = battle.run_observed(&mut log).unwrap();
        assert_eq!(log.started, (1..=68).collect::<Vec<_>>());
        assert_eq!(log.completed, (1..=67).collect::<Vec<_>>());
        assert_eq!(log.ended, Some(result));
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<u32>,
        completed: Vec<u32>,
        actors: Vec<UnitId>,
        ended: Option<GameResult>,
    }

    impl RoundObserver for Recorder {
        fn round_started(&mut self, round: u32, _battle: &Battle) {
            self.started.push(round);
        }

        fn turn_taken(&mut self, report: &TurnReport, _battle: &Battle) {
            self.actors.push(report.unit);
        }

        fn round_completed(&mut self, round: u32, _battle: &Battle) {
            self.completed.push(round);
        }

        fn battle_ended(&mut self, result: &GameResult, _battle: &Battle) {
            self.ended = Some(*result);
        }
    }
}
