use crate::board::bitset::Bitset;
use crate::board::cell::{Cell, EAST, NORTH, SOUTH, WEST};
use crate::board::color::{CellColor, Color};
use crate::{Arbitrary, NUM_CELLS};
use std::fmt::{Display, Formatter, Result};

/// the full board state: the color of every cell, interior and
/// sentinel. sentinels are permanently colored for their owning player.
#[derive(Debug, Clone)]
pub struct Position {
    cells: [CellColor; NUM_CELLS],
}

impl Position {
    pub fn empty() -> Self {
        let mut cells = [CellColor::Empty; NUM_CELLS];
        cells[NORTH.index()] = CellColor::Stone(Color::Black);
        cells[SOUTH.index()] = CellColor::Stone(Color::Black);
        cells[EAST.index()] = CellColor::Stone(Color::White);
        cells[WEST.index()] = CellColor::Stone(Color::White);
        Self { cells }
    }

    pub fn color(&self, cell: Cell) -> CellColor {
        self.cells[cell.index()]
    }

    pub fn place(&mut self, cell: Cell, color: Color) {
        debug_assert!(!cell.is_edge(), "cannot place a stone on an edge sentinel");
        debug_assert!(self.color(cell).is_empty(), "cell already occupied");
        self.cells[cell.index()] = CellColor::Stone(color);
    }

    pub fn empties(&self) -> Bitset {
        let mut set = Bitset::empty();
        for i in 0..(NUM_CELLS - 4) {
            let cell = Cell::from(i);
            if self.color(cell).is_empty() {
                set.set(cell);
            }
        }
        set
    }

    pub fn stones(&self, color: Color) -> Bitset {
        let mut set = Bitset::empty();
        for i in 0..(NUM_CELLS - 4) {
            let cell = Cell::from(i);
            if self.color(cell) == CellColor::Stone(color) {
                set.set(cell);
            }
        }
        set
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter) -> Result {
        for row in 0..crate::BOARD_SIZE {
            write!(f, "{:indent$}", "", indent = row)?;
            for col in 0..crate::BOARD_SIZE {
                let c = match self.color(Cell::from_rc(row, col)) {
                    CellColor::Empty => '.',
                    CellColor::Stone(Color::Black) => 'B',
                    CellColor::Stone(Color::White) => 'W',
                };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Arbitrary for Position {
    /// a random sparse position: each interior cell is independently left
    /// empty, or given to black or white, biased toward mostly empty so
    /// generated positions resemble early-midgame boards.
    fn random() -> Self {
        use rand::Rng;
        let mut position = Self::empty();
        let mut rng = rand::thread_rng();
        for i in 0..(NUM_CELLS - 4) {
            let cell = Cell::from(i);
            match rng.gen_range(0..10) {
                0 => position.place(cell, Color::Black),
                1 => position.place(cell, Color::White),
                _ => {}
            }
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_board_is_all_empty_interior() {
        let pos = Position::empty();
        assert_eq!(pos.empties().count(), (NUM_CELLS - 4) as u32);
    }

    #[test]
    fn place_then_color_reports_stone() {
        let mut pos = Position::empty();
        let cell = Cell::from_rc(3, 3);
        pos.place(cell, Color::White);
        assert_eq!(pos.color(cell), CellColor::Stone(Color::White));
    }
}
