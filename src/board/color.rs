use std::fmt::{Display, Formatter, Result};

/// a player color. never used to describe an empty cell state; see
/// [`CellColor`] for that.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// the occupancy of a single board cell.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CellColor {
    Empty,
    Stone(Color),
}

impl CellColor {
    pub fn is_empty(self) -> bool {
        matches!(self, CellColor::Empty)
    }

    pub fn is_own_or_empty(self, color: Color) -> bool {
        match self {
            CellColor::Empty => true,
            CellColor::Stone(c) => c == color,
        }
    }

    pub fn stone(self) -> Option<Color> {
        match self {
            CellColor::Empty => None,
            CellColor::Stone(c) => Some(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_flips() {
        assert_eq!(Color::Black.other(), Color::White);
        assert_eq!(Color::White.other(), Color::Black);
    }

    #[test]
    fn own_or_empty() {
        assert!(CellColor::Empty.is_own_or_empty(Color::Black));
        assert!(CellColor::Stone(Color::Black).is_own_or_empty(Color::Black));
        assert!(!CellColor::Stone(Color::White).is_own_or_empty(Color::Black));
    }
}
