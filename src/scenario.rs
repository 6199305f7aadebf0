//! Battle layouts read from text maps.
//!
//! A map is a rectangle of glyphs: `#` wall, `.` open floor, `E` an Elf and
//! `G` a Goblin (each standing on open floor). Blank lines and trailing
//! whitespace are ignored.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::battle::{Battle, BattleConfig, Cell, Coord, Faction, Grid};
use crate::error::{BattleResult, ScenarioError};

/// Largest side length a map may have.
pub const MAX_SIDE: usize = u16::MAX as usize;

/// Where a unit starts and which side it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// Starting cell.
    pub position: Coord,
    /// The unit's side.
    pub faction: Faction,
}

/// A parsed map: the grid plus starting units in reading order.
///
/// A scenario never changes; every [`Battle`] built from it starts from the
/// same layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// The battlefield.
    grid: Grid,
    /// Starting units, in reading order.
    deployments: Vec<Deployment>,
}

impl Scenario {
    /// Parse a map from text.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, ragged rows, unknown glyphs or
    /// maps too large for 16-bit coordinates.
    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        let rows: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let Some(&(_, first)) = rows.first() else {
            return Err(ScenarioError::Empty);
        };
        let width = first.chars().count();
        if width > MAX_SIDE || rows.len() > MAX_SIDE {
            return Err(ScenarioError::TooLarge { max: MAX_SIDE });
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut deployments = Vec::new();

        for (y, &(line, row)) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ScenarioError::Ragged {
                    line,
                    found,
                    expected: width,
                });
            }

            for (x, glyph) in row.chars().enumerate() {
                let cell = match glyph {
                    '#' => Cell::Wall,
                    '.' => Cell::Open,
                    _ => {
                        let faction = Faction::from_glyph(glyph).ok_or(
                            ScenarioError::UnexpectedGlyph {
                                glyph,
                                line,
                                column: x + 1,
                            },
                        )?;
                        deployments.push(Deployment {
                            position: coord(x, y),
                            faction,
                        });
                        Cell::Open
                    }
                };
                cells.push(cell);
            }
        }

        let grid = Grid::new(side(width), side(rows.len()), cells).ok_or(ScenarioError::Empty)?;
        Ok(Self { grid, deployments })
    }

    /// Read and parse a map file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// The battlefield.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Starting units, in reading order.
    #[must_use]
    pub fn deployments(&self) -> &[Deployment] {
        &self.deployments
    }

    /// Number of starting units of `faction`.
    #[must_use]
    pub fn count(&self, faction: Faction) -> usize {
        self.deployments
            .iter()
            .filter(|deployment| deployment.faction == faction)
            .count()
    }

    /// Build a fresh battle from this layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a faction is missing.
    pub fn battle(&self, config: &BattleConfig) -> BattleResult<Battle> {
        let units = self
            .deployments
            .iter()
            .map(|deployment| config.recruit(deployment.position, deployment.faction))
            .collect();
        Battle::new(self.grid.clone(), units, config)
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Coordinate for a position already checked against [`MAX_SIDE`].
#[allow(clippy::cast_possible_truncation)]
fn coord(x: usize, y: usize) -> Coord {
    Coord::new(x as u16, y as u16)
}

/// Side length already checked against [`MAX_SIDE`].
#[allow(clippy::cast_possible_truncation)]
fn side(len: usize) -> u16 {
    len as u16
}
