//! Cell definitions
//!
//! The states a single grid coordinate can hold during generation.

use serde::{Deserialize, Serialize};

/// State of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Unused space, the default
    #[default]
    Wall,
    /// Corridor or room interior after merge
    Floor,
    /// Room footprint, only present between room stamping and normalization
    RoomInterior,
}

impl Cell {
    /// Integer code used by the JSON export format
    pub fn code(&self) -> u8 {
        match self {
            Cell::Wall => 0,
            Cell::Floor => 1,
            Cell::RoomInterior => 2,
        }
    }

    /// Parse an export code back into a cell
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Wall),
            1 => Some(Cell::Floor),
            2 => Some(Cell::RoomInterior),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Floor => '.',
            Cell::RoomInterior => '+',
        }
    }

    pub fn is_floor(&self) -> bool {
        matches!(self, Cell::Floor)
    }

    /// Collapse the transient room state into its merged form
    pub fn normalized(self) -> Self {
        match self {
            Cell::RoomInterior => Cell::Floor,
            other => other,
        }
    }
}
