use serde::{Deserialize, Serialize};

/// Gas species. Every gas and solid cell belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    A,
    B,
}

impl Species {
    /// The other species; used for the cross-species sticking check.
    #[inline]
    pub fn other(self) -> Species {
        match self {
            Species::A => Species::B,
            Species::B => Species::A,
        }
    }
}

/// State of a single lattice cell.
///
/// The discriminants are the stable external encoding used in snapshots and
/// CSV output (0 = empty .. 4 = solid B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    GasA = 1,
    GasB = 2,
    SolidA = 3,
    SolidB = 4,
}

impl Cell {
    #[inline]
    pub fn gas(species: Species) -> Cell {
        match species {
            Species::A => Cell::GasA,
            Species::B => Cell::GasB,
        }
    }

    #[inline]
    pub fn solid(species: Species) -> Cell {
        match species {
            Species::A => Cell::SolidA,
            Species::B => Cell::SolidB,
        }
    }

    /// Gas cells are the only mobile cells.
    #[inline]
    pub fn is_gas(self) -> bool {
        matches!(self, Cell::GasA | Cell::GasB)
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, Cell::SolidA | Cell::SolidB)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Species carried by the cell, `None` for empty cells.
    #[inline]
    pub fn species(self) -> Option<Species> {
        match self {
            Cell::Empty => None,
            Cell::GasA | Cell::SolidA => Some(Species::A),
            Cell::GasB | Cell::SolidB => Some(Species::B),
        }
    }

    /// Solid counterpart of a gas cell. Non-gas cells are returned unchanged.
    #[inline]
    pub fn solidified(self) -> Cell {
        match self {
            Cell::GasA => Cell::SolidA,
            Cell::GasB => Cell::SolidB,
            other => other,
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::GasA),
            2 => Some(Cell::GasB),
            3 => Some(Cell::SolidA),
            4 => Some(Cell::SolidB),
            _ => None,
        }
    }
}
