//! Property-based tests for the battle engine.
//!
//! Random bordered maps are played out round by round to check that the
//! engine stays consistent no matter the layout.
//! Run with: cargo test --release prop_battle

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use skirmish::battle::{RoundObserver, TurnReport, check_invariants};
use skirmish::{Battle, BattleConfig, BattleError, Faction, Scenario};

/// Build a walled map from inner cell codes. The first inner cell is always
/// an Elf and the last a Goblin.
fn build_map(width: usize, height: usize, codes: &[u8]) -> String {
    let border = "#".repeat(width + 2);
    let mut map = format!("{border}\n");
    for y in 0..height {
        map.push('#');
        for x in 0..width {
            let idx = y * width + x;
            let glyph = if idx == 0 {
                'E'
            } else if idx == codes.len() - 1 {
                'G'
            } else {
                match codes[idx] {
                    0..=5 => '.',
                    6 | 7 => '#',
                    8 => 'E',
                    _ => 'G',
                }
            };
            map.push(glyph);
        }
        map.push_str("#\n");
    }
    map.push_str(&border);
    map
}

fn arb_map() -> impl Strategy<Value = String> {
    (2usize..9, 2usize..9).prop_flat_map(|(width, height)| {
        prop::collection::vec(0u8..10, width * height)
            .prop_map(move |codes| build_map(width, height, &codes))
    })
}

fn config(elf_power: i32) -> BattleConfig {
    BattleConfig {
        elf_power,
        max_rounds: 300,
        ..BattleConfig::default()
    }
}

/// Records any attack on a unit that is not an adjacent enemy.
#[derive(Default)]
struct AttackAudit {
    bad_attacks: Vec<String>,
}

impl RoundObserver for AttackAudit {
    fn turn_taken(&mut self, report: &TurnReport, battle: &Battle) {
        let Some(attack) = report.attack else {
            return;
        };
        let attacker = battle.unit(report.unit).unwrap();
        let target = battle.unit(attack.target).unwrap();
        if !target.position.is_adjacent(report.position()) || target.faction == attacker.faction {
            self.bad_attacks
                .push(format!("{} hit {} at {}", report.unit, attack.target, target.position));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Live units never come back and hit points never rise.
    #[test]
    fn prop_live_count_never_increases(map in arb_map(), elf_power in 3i32..40) {
        let mut battle = map.parse::<Scenario>().unwrap().battle(&config(elf_power)).unwrap();
        let mut live = battle.registry().total_live();
        let mut hit_points: Vec<i32> = battle.registry().iter().map(|(_, u)| u.hit_points).collect();

        while !battle.is_over() && battle.rounds() < 300 {
            battle.play_round().unwrap();
            let now = battle.registry().total_live();
            prop_assert!(now <= live);
            live = now;

            for (id, unit) in battle.registry().iter() {
                prop_assert!(unit.hit_points <= hit_points[id.index()]);
                hit_points[id.index()] = unit.hit_points;
            }
        }
    }

    /// Replaying a layout gives the same answer every time.
    #[test]
    fn prop_battles_are_deterministic(map in arb_map(), elf_power in 3i32..40) {
        let scenario: Scenario = map.parse().unwrap();
        let first = scenario.battle(&config(elf_power)).unwrap().run();
        let second = scenario.battle(&config(elf_power)).unwrap().run();
        prop_assert_eq!(first, second);
    }

    /// Occupancy and unit positions agree after every round.
    #[test]
    fn prop_invariants_hold(map in arb_map()) {
        let mut battle = map.parse::<Scenario>().unwrap().battle(&config(3)).unwrap();
        while !battle.is_over() && battle.rounds() < 300 {
            battle.play_round().unwrap();
            let violations = check_invariants(battle.grid(), battle.registry());
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
    }

    /// Attacks only land on orthogonally adjacent enemies.
    #[test]
    fn prop_attacks_hit_adjacent_enemies(map in arb_map(), elf_power in 3i32..40) {
        let mut battle = map.parse::<Scenario>().unwrap().battle(&config(elf_power)).unwrap();
        let mut audit = AttackAudit::default();
        match battle.run_observed(&mut audit) {
            Ok(result) => {
                prop_assert_eq!(battle.registry().live_count(result.winner.opponent()), 0);
            }
            Err(e) => prop_assert_eq!(e, BattleError::RoundLimitExceeded(300)),
        }
        prop_assert!(audit.bad_attacks.is_empty(), "{:?}", audit.bad_attacks);
    }

    /// A finished battle reports the winner's survivors.
    #[test]
    fn prop_result_matches_registry(map in arb_map()) {
        let mut battle = map.parse::<Scenario>().unwrap().battle(&config(3)).unwrap();
        if let Ok(result) = battle.run() {
            prop_assert_eq!(result.survivors, battle.registry().live_count(result.winner));
            prop_assert_eq!(result.remaining_hit_points, battle.registry().live_hit_points(result.winner));
            prop_assert!(result.survivors > 0);
            prop_assert_eq!(battle.losses(result.winner) + result.survivors, battle.starting_count(result.winner));
            prop_assert!(matches!(result.winner, Faction::Elf | Faction::Goblin));
        }
    }
}
