//! Unit and faction types.

use std::fmt;

use serde::Serialize;

use crate::battle::Coord;

/// One of the two sides of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Elves, drawn as `E`.
    Elf,
    /// Goblins, drawn as `G`.
    Goblin,
}

impl Faction {
    /// Both factions, in glyph order.
    pub const ALL: [Faction; 2] = [Faction::Elf, Faction::Goblin];

    /// Parse a map glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'E' => Some(Faction::Elf),
            'G' => Some(Faction::Goblin),
            _ => None,
        }
    }

    /// Map glyph for this faction.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Faction::Elf => 'E',
            Faction::Goblin => 'G',
        }
    }

    /// The opposing faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Faction::Elf => Faction::Goblin,
            Faction::Goblin => Faction::Elf,
        }
    }

    /// Plural name used in reports ("Elves", "Goblins").
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Faction::Elf => "Elves",
            Faction::Goblin => "Goblins",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Elf => write!(f, "Elf"),
            Faction::Goblin => write!(f, "Goblin"),
        }
    }
}

/// Stable handle of a unit inside a [`Registry`](crate::battle::Registry).
///
/// Ids are assigned in the order units are deployed and never reused, even
/// after the unit dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Position of the unit in the registry's backing vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Current cell.
    pub position: Coord,
    /// Side the unit fights for.
    pub faction: Faction,
    /// Remaining hit points; may go negative on the killing blow.
    pub hit_points: i32,
    /// Damage dealt per attack.
    pub attack_power: i32,
}

impl Unit {
    /// Create a new unit.
    #[must_use]
    pub const fn new(position: Coord, faction: Faction, hit_points: i32, attack_power: i32) -> Self {
        Self {
            position,
            faction,
            hit_points,
            attack_power,
        }
    }

    /// A unit is alive while it has hit points left.
    #[must_use]
    #[inline]
    pub const fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// Whether `other` fights for the opposing side.
    #[must_use]
    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.faction != other.faction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_glyph_round_trip() {
        for faction in Faction::ALL {
            assert_eq!(Faction::from_glyph(faction.glyph()), Some(faction));
        }
        assert_eq!(Faction::from_glyph('.'), None);
        assert_eq!(Faction::from_glyph('e'), None);
    }

    #[test]
    fn test_faction_opponent() {
        assert_eq!(Faction::Elf.opponent(), Faction::Goblin);
        assert_eq!(Faction::Goblin.opponent(), Faction::Elf);
    }

    #[test]
    fn test_unit_alive_boundary() {
        let mut unit = Unit::new(Coord::new(1, 1), Faction::Elf, 1, 3);
        assert!(unit.is_alive());
        unit.hit_points = 0;
        assert!(!unit.is_alive());
        unit.hit_points = -2;
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_unit_id_display() {
        assert_eq!(UnitId(7).to_string(), "#7");
    }
}
