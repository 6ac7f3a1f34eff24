use crate::board::cell::Cell;
use crate::board::color::Color;
use crate::board::group::Groups;
use crate::board::position::Position;
use crate::patterns::{PatternLibrary, PatternState};
use crate::vc::{ChangeLog, Params, VCBuilder, VCSet};
use rayon::prelude::*;

/// one candidate move and the score used to rank it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub cell: Cell,
    pub score: i64,
}

/// a shallow move selector built directly on the VC engine: for every
/// empty cell, play it and build a fresh VCSet for the position after
/// that move, scoring it by whether it already wins and otherwise by
/// how many Fulls the resulting lattice carries. root moves are
/// independent VC builds over disjoint sets, so they evaluate in
/// parallel; deeper search (MCTS, alpha-beta, CFR-style policy
/// iteration) is out of scope here.
pub struct Solver {
    params: Params,
}

impl Solver {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// the best move for `color` to play in `position`, or `None` if the
    /// board is full.
    pub fn genmove(&self, position: &Position, color: Color, library: &PatternLibrary) -> Option<Cell> {
        let empties: Vec<Cell> = position.empties().iter().collect();
        if empties.is_empty() {
            return None;
        }
        empties
            .par_iter()
            .map(|&cell| Candidate {
                cell,
                score: self.evaluate(position, color, cell, library),
            })
            .max_by_key(|c| c.score)
            .map(|c| c.cell)
    }

    /// rank every empty cell without committing to one, for `vcs`-style
    /// introspection from the protocol layer.
    pub fn rank_moves(&self, position: &Position, color: Color, library: &PatternLibrary) -> Vec<Candidate> {
        let empties: Vec<Cell> = position.empties().iter().collect();
        let mut candidates: Vec<Candidate> = empties
            .par_iter()
            .map(|&cell| Candidate {
                cell,
                score: self.evaluate(position, color, cell, library),
            })
            .collect();
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    fn evaluate(&self, position: &Position, color: Color, cell: Cell, library: &PatternLibrary) -> i64 {
        let mut trial = position.clone();
        trial.place(cell, color);
        let groups = Groups::compute(&trial);
        let mut set = VCSet::new(color, self.params.soft_limit);
        let mut pattern_state = PatternState::new();
        let mut log = ChangeLog::new();
        let mut builder = VCBuilder::new(self.params);
        builder.build_static(&mut set, &groups, &trial, &mut pattern_state, library, &mut log);
        if set.has_winning_connection() {
            i64::MAX
        } else {
            set.full_count() as i64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SOFT_LIMIT;

    #[test]
    fn genmove_on_empty_board_returns_some_cell() {
        let position = Position::empty();
        let library = PatternLibrary::generated();
        let params = Params {
            soft_limit: DEFAULT_SOFT_LIMIT,
            ..Params::default()
        };
        let solver = Solver::new(params);
        assert!(solver.genmove(&position, Color::Black, &library).is_some());
    }

    #[test]
    fn rank_moves_covers_every_empty_cell() {
        let position = Position::empty();
        let library = PatternLibrary::generated();
        let solver = Solver::new(Params::default());
        let ranked = solver.rank_moves(&position, Color::Black, &library);
        assert_eq!(ranked.len(), position.empties().count() as usize);
    }
}
