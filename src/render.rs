//! Plain-text board snapshots.
//!
//! Rendering only reads the battle; it is a debugging aid for watching
//! rounds play out and never feeds back into the simulation.

use crate::battle::{Battle, Cell, Coord, GameResult};

/// Render the board: walls, open floor and live units by glyph.
///
/// ```text
/// #######
/// #.G...#
/// #...EG#
/// #######
/// ```
#[must_use]
pub fn render_board(battle: &Battle) -> String {
    render(battle, false)
}

/// Render the board with each row's live units and their hit points
/// appended in reading order, e.g. `#...EG#   E(197), G(197)`.
#[must_use]
pub fn render_board_with_hit_points(battle: &Battle) -> String {
    render(battle, true)
}

/// Summarise a finished battle.
#[must_use]
pub fn render_result(result: &GameResult) -> String {
    format!(
        "Combat ends after {} full rounds\n{} win with {} total hit points left ({} survivors)\nOutcome: {} * {} = {}\n",
        result.rounds,
        result.winner.plural(),
        result.remaining_hit_points,
        result.survivors,
        result.rounds,
        result.remaining_hit_points,
        result.outcome()
    )
}

fn render(battle: &Battle, hit_points: bool) -> String {
    let grid = battle.grid();
    let registry = battle.registry();
    let mut output = String::with_capacity(grid.len() + usize::from(grid.height()));

    for y in 0..grid.height() {
        let mut legend = Vec::new();
        for x in 0..grid.width() {
            let coord = Coord::new(x, y);
            match registry.unit_at(coord) {
                Some((_, unit)) => {
                    output.push(unit.faction.glyph());
                    legend.push(format!("{}({})", unit.faction.glyph(), unit.hit_points));
                }
                None => output.push(grid.get(coord).map_or('#', Cell::glyph)),
            }
        }
        if hit_points && !legend.is_empty() {
            output.push_str("   ");
            output.push_str(&legend.join(", "));
        }
        output.push('\n');
    }

    output
}
