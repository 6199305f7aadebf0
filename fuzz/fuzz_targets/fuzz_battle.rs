#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skirmish::battle::check_invariants;
use skirmish::{BattleConfig, BattleError, Scenario};

/// Structured input for whole-battle fuzzing.
#[derive(Arbitrary, Debug)]
struct BattleInput {
    /// Inner width of the map.
    width: u8,
    /// Inner cell codes, row by row.
    cells: Vec<u8>,
    /// Elf attack power.
    elf_power: u8,
    /// Goblin attack power.
    goblin_power: u8,
    /// Starting hit points.
    hit_points: u8,
}

fuzz_target!(|input: BattleInput| {
    let width = usize::from(input.width % 12) + 1;
    let cells: Vec<u8> = input.cells.into_iter().take(144).collect();
    if cells.len() < width {
        return;
    }

    let border = "#".repeat(width + 2);
    let mut map = format!("{border}\n");
    for row in cells.chunks_exact(width) {
        map.push('#');
        for code in row {
            map.push(match code % 8 {
                0..=3 => '.',
                4 | 5 => '#',
                6 => 'E',
                _ => 'G',
            });
        }
        map.push_str("#\n");
    }
    map.push_str(&border);

    let Ok(scenario) = map.parse::<Scenario>() else {
        return;
    };
    let config = BattleConfig {
        hit_points: i32::from(input.hit_points.max(1)),
        elf_power: i32::from(input.elf_power.max(1)),
        goblin_power: i32::from(input.goblin_power.max(1)),
        max_rounds: 500,
    };
    // Maps missing a faction are rejected up front
    let Ok(mut battle) = scenario.battle(&config) else {
        return;
    };

    let live_before = battle.registry().total_live();
    match battle.run() {
        Ok(result) => {
            assert_eq!(battle.registry().live_count(result.winner.opponent()), 0);
            assert!(result.survivors > 0);
        }
        Err(BattleError::RoundLimitExceeded(_)) => {}
        Err(e) => panic!("battle failed: {e}"),
    }
    assert!(battle.registry().total_live() <= live_before);
    assert!(check_invariants(battle.grid(), battle.registry()).is_empty());
});
