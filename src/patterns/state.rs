use crate::board::bitset::Bitset;
use crate::board::cell::Cell;
use crate::board::color::{CellColor, Color};
use crate::board::position::Position;
use crate::patterns::library::PatternLibrary;
use crate::NUM_CELLS;

/// `cap[p]`, per cell, recomputed once per build call against the current
/// position for one color. a bridge carrier-capture: if playing `p`
/// would complete a bridge to an existing own group and the opponent has
/// already taken one of the two carrier cells, the other carrier cell is
/// a forced reply and gets added to `cap[p]`.
#[derive(Debug, Clone)]
pub struct PatternState {
    cap: Vec<Bitset>,
}

impl PatternState {
    pub fn new() -> Self {
        Self {
            cap: vec![Bitset::empty(); NUM_CELLS],
        }
    }

    pub fn cap(&self, cell: Cell) -> Bitset {
        self.cap[cell.index()]
    }

    pub fn update(&mut self, position: &Position, color: Color, library: &PatternLibrary) {
        for i in 0..NUM_CELLS {
            let p = Cell::from(i);
            self.cap[i] = if position.color(p).is_empty() {
                Self::captured_set_at(position, color, p, library)
            } else {
                Bitset::empty()
            };
        }
    }

    fn captured_set_at(position: &Position, color: Color, p: Cell, library: &PatternLibrary) -> Bitset {
        let mut cap = Bitset::empty();
        for bridge in library.bridges_through(p) {
            let other = if bridge.x == p { bridge.y } else { bridge.x };
            let other_is_own = match position.color(other) {
                CellColor::Stone(c) => c == color,
                CellColor::Empty => false,
            };
            if !other_is_own {
                continue;
            }
            let mut it = bridge.carrier.iter();
            let c1 = it.next().expect("bridge carrier has two cells");
            let c2 = it.next().expect("bridge carrier has two cells");
            let opponent = color.other();
            if position.color(c1) == CellColor::Stone(opponent) && position.color(c2).is_empty() {
                cap.set(c2);
            } else if position.color(c2) == CellColor::Stone(opponent) && position.color(c1).is_empty() {
                cap.set(c1);
            }
        }
        cap
    }
}

impl Default for PatternState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_no_captured_cells() {
        let position = Position::empty();
        let library = PatternLibrary::generated();
        let mut state = PatternState::new();
        state.update(&position, Color::Black, &library);
        for i in 0..NUM_CELLS {
            assert!(state.cap(Cell::from(i)).none());
        }
    }

    #[test]
    fn completing_a_bridge_against_a_half_blocked_carrier_forces_a_reply() {
        let mut position = Position::empty();
        let library = PatternLibrary::generated();
        let anchor = Cell::from_rc(5, 5);
        position.place(anchor, Color::Black);
        let bridge = library
            .bridges_through(anchor)
            .find(|b| {
                let other = if b.x == anchor { b.y } else { b.x };
                position.color(other).is_empty()
            })
            .expect("center cell has an empty bridge partner");
        let p = if bridge.x == anchor { bridge.y } else { bridge.x };
        let mut it = bridge.carrier.iter();
        let c1 = it.next().unwrap();
        let c2 = it.next().unwrap();
        position.place(c1, Color::White);

        let mut state = PatternState::new();
        state.update(&position, Color::Black, &library);
        assert!(state.cap(p).test(c2));
    }
}
