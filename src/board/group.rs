use crate::board::bitset::Bitset;
use crate::board::cell::{Cell, EAST, NORTH, SOUTH, WEST};
use crate::board::color::{CellColor, Color};
use crate::board::position::Position;
use crate::NUM_CELLS;

/// a maximal same-color-connected component. `captain` is the canonical
/// representative cell; `members` is every cell in the component. the
/// four edge sentinels are always groups of one, per color.
#[derive(Debug, Clone)]
pub struct Group {
    pub captain: Cell,
    pub members: Bitset,
    pub color: CellColor,
}

impl Group {
    /// empty-or-own neighbors of every member, i.e. cells the group could
    /// extend into or connect through.
    pub fn nbs(&self, position: &Position, color: Color) -> Bitset {
        let mut nbs = Bitset::empty();
        for member in self.members.iter() {
            for n in member.neighbors().iter() {
                if position.color(n).is_own_or_empty(color) {
                    nbs.set(n);
                }
            }
        }
        nbs
    }
}

/// union-find partition of the board into same-color groups. recomputed
/// from scratch on every move (board sizes here are small enough that
/// this dominates nothing in practice); the spec's incremental build only
/// needs the old and new partitions, not an incrementally-maintained one.
#[derive(Debug, Clone)]
pub struct Groups {
    parent: Vec<u16>,
    color: Vec<CellColor>,
}

impl Groups {
    pub fn compute(position: &Position) -> Self {
        let mut parent: Vec<u16> = (0..NUM_CELLS as u16).collect();
        let color: Vec<CellColor> = (0..NUM_CELLS).map(|i| position.color(Cell::from(i))).collect();

        fn find(parent: &mut [u16], x: u16) -> u16 {
            if parent[x as usize] != x {
                let root = find(parent, parent[x as usize]);
                parent[x as usize] = root;
            }
            parent[x as usize]
        }
        fn union(parent: &mut [u16], a: u16, b: u16) {
            let ra = find(parent, a);
            let rb = find(parent, b);
            if ra != rb {
                parent[ra as usize] = rb;
            }
        }

        // edge sentinels never merge with interior stones or each other.
        for i in 0..(NUM_CELLS - 4) {
            let cell = Cell::from(i);
            let c = color[i];
            if c.is_empty() {
                continue;
            }
            for n in cell.neighbors().iter() {
                if n.is_edge() {
                    continue;
                }
                if color[n.index()] == c {
                    union(&mut parent, i as u16, n.index() as u16);
                }
            }
        }
        for i in 0..NUM_CELLS {
            find(&mut parent, i as u16);
        }

        let mut color = color;
        color[NORTH.index()] = CellColor::Stone(Color::Black);
        color[SOUTH.index()] = CellColor::Stone(Color::Black);
        color[EAST.index()] = CellColor::Stone(Color::White);
        color[WEST.index()] = CellColor::Stone(Color::White);

        Self { parent, color }
    }

    pub fn captain(&self, cell: Cell) -> Cell {
        Cell::from(self.parent[cell.index()] as usize)
    }

    pub fn is_captain(&self, cell: Cell) -> bool {
        self.captain(cell) == cell
    }

    pub fn color_of(&self, cell: Cell) -> CellColor {
        self.color[self.captain(cell).index()]
    }

    pub fn members(&self, captain: Cell) -> Bitset {
        let mut members = Bitset::empty();
        for i in 0..NUM_CELLS {
            if self.captain(Cell::from(i)) == captain {
                members.set(Cell::from(i));
            }
        }
        members
    }

    pub fn group(&self, cell: Cell) -> Group {
        let captain = self.captain(cell);
        Group {
            captain,
            members: self.members(captain),
            color: self.color[captain.index()],
        }
    }

    /// every distinct captain cell currently on the board.
    pub fn captains(&self) -> Vec<Cell> {
        let mut seen = Bitset::empty();
        let mut out = Vec::new();
        for i in 0..NUM_CELLS {
            let cell = Cell::from(i);
            let captain = self.captain(cell);
            if !seen.test(captain) {
                seen.set(captain);
                out.push(captain);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::color::Color;

    #[test]
    fn two_adjacent_stones_form_one_group() {
        let mut pos = Position::empty();
        let a = Cell::from_rc(0, 0);
        let b = Cell::from_rc(0, 1);
        pos.place(a, Color::Black);
        pos.place(b, Color::Black);
        let groups = Groups::compute(&pos);
        assert_eq!(groups.captain(a), groups.captain(b));
        assert_eq!(groups.members(groups.captain(a)).count(), 2);
    }

    #[test]
    fn edge_sentinels_stay_singleton() {
        let pos = Position::empty();
        let groups = Groups::compute(&pos);
        assert_eq!(groups.members(NORTH).count(), 1);
        assert_eq!(groups.members(SOUTH).count(), 1);
        assert_eq!(groups.color_of(NORTH), CellColor::Stone(Color::Black));
        assert_eq!(groups.color_of(EAST), CellColor::Stone(Color::White));
    }

    #[test]
    fn unrelated_stones_stay_separate() {
        let mut pos = Position::empty();
        let a = Cell::from_rc(0, 0);
        let b = Cell::from_rc(5, 5);
        pos.place(a, Color::Black);
        pos.place(b, Color::Black);
        let groups = Groups::compute(&pos);
        assert_ne!(groups.captain(a), groups.captain(b));
    }
}
