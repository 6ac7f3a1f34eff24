use crate::board::bitset::Bitset;
use crate::board::cell::Cell;
use crate::board::color::Color;
use crate::board::group::Groups;
use crate::board::position::Position;
use crate::collaborators::{Eval, Solver};
use crate::patterns::{PatternLibrary, PatternState};
use crate::vc::{ChangeLog, Connection, Kind, Params, VCBuilder, VCSet};
use anyhow::{anyhow, bail, Result};

/// everything the VC engine tracks for one color: its lattice, the
/// bridge-capture state feeding it, and the undo journal recording
/// every mutation made against it.
struct ColorState {
    set: VCSet,
    pattern_state: PatternState,
    log: ChangeLog,
}

impl ColorState {
    fn new(color: Color, params: &Params) -> Self {
        Self {
            set: VCSet::new(color, params.soft_limit),
            pattern_state: PatternState::new(),
            log: ChangeLog::new(),
        }
    }
}

/// one play, recorded so `undo` can restore everything `play` touched.
struct Ply {
    position_before: Position,
    groups_before: Groups,
    black_mark: usize,
    white_mark: usize,
}

/// the live state behind the text command protocol: a board, both
/// colors' VC lattices kept in lockstep with it, and the collaborators
/// (`solver`, `eval`) that answer `genmove`-style queries against them.
pub struct Session {
    position: Position,
    groups: Groups,
    library: PatternLibrary,
    params: Params,
    black: ColorState,
    white: ColorState,
    history: Vec<Ply>,
    builder: VCBuilder,
}

impl Session {
    pub fn new(params: Params) -> Self {
        let position = Position::empty();
        let groups = Groups::compute(&position);
        let library = PatternLibrary::generated();
        let black = ColorState::new(Color::Black, &params);
        let white = ColorState::new(Color::White, &params);
        let mut session = Self {
            position,
            groups,
            library,
            params,
            black,
            white,
            history: Vec::new(),
            builder: VCBuilder::new(params),
        };
        session.rebuild_from_scratch();
        session
    }

    fn state(&self, color: Color) -> &ColorState {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn rebuild_from_scratch(&mut self) {
        self.builder.build_static(
            &mut self.black.set,
            &self.groups,
            &self.position,
            &mut self.black.pattern_state,
            &self.library,
            &mut self.black.log,
        );
        self.builder.build_static(
            &mut self.white.set,
            &self.groups,
            &self.position,
            &mut self.white.pattern_state,
            &self.library,
            &mut self.white.log,
        );
    }

    /// reset to an empty `size`x`size` board. only the board's square
    /// side length is configurable at runtime; the cell-count constant
    /// baked in at compile time (via the `board13`/`board19` features)
    /// must already match, since the lattice's `Bitset` width is fixed.
    pub fn boardsize(&mut self, size: usize) -> Result<()> {
        if size != crate::BOARD_SIZE {
            bail!(
                "this build is compiled for a {}x{} board; {}x{} requires rebuilding with the matching board feature",
                crate::BOARD_SIZE,
                crate::BOARD_SIZE,
                size,
                size
            );
        }
        self.position = Position::empty();
        self.groups = Groups::compute(&self.position);
        self.history.clear();
        self.rebuild_from_scratch();
        Ok(())
    }

    pub fn play(&mut self, color: Color, cell: Cell) -> Result<()> {
        if cell.is_edge() {
            bail!("cannot play on an edge sentinel");
        }
        if !self.position.color(cell).is_empty() {
            bail!("cell is already occupied");
        }
        let position_before = self.position.clone();
        let groups_before = self.groups.clone();
        let black_mark = self.black.log.mark();
        let white_mark = self.white.log.mark();

        self.position.place(cell, color);
        let new_groups = Groups::compute(&self.position);
        let added = Bitset::singleton(cell);
        let (added_black, added_white) = match color {
            Color::Black => (added, Bitset::empty()),
            Color::White => (Bitset::empty(), added),
        };

        self.builder.build_incremental(
            &mut self.black.set,
            &groups_before,
            &new_groups,
            &self.position,
            &mut self.black.pattern_state,
            &self.library,
            added_black,
            added_white,
            &mut self.black.log,
        );
        self.builder.build_incremental(
            &mut self.white.set,
            &groups_before,
            &new_groups,
            &self.position,
            &mut self.white.pattern_state,
            &self.library,
            added_black,
            added_white,
            &mut self.white.log,
        );
        self.groups = new_groups;
        self.history.push(Ply {
            position_before,
            groups_before,
            black_mark,
            white_mark,
        });
        Ok(())
    }

    pub fn undo(&mut self) -> Result<()> {
        let ply = self.history.pop().ok_or_else(|| anyhow!("nothing to undo"))?;
        self.black.log.rollback_to(ply.black_mark, &mut self.black.set);
        self.white.log.rollback_to(ply.white_mark, &mut self.white.set);
        self.groups = ply.groups_before;
        self.position = ply.position_before;
        Ok(())
    }

    /// the grid, with each stone colored by owner for a terminal
    /// audience; the plain-text shape still comes from `Position`'s own
    /// `Display`, this just recolors the characters it already prints.
    pub fn showboard(&self) -> String {
        use colored::Colorize;
        format!("{}", self.position)
            .lines()
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        'B' => c.to_string().red().to_string(),
                        'W' => c.to_string().blue().to_string(),
                        other => other.to_string(),
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn vcs(&self, color: Color, kind: Kind, x: Cell, y: Cell) -> Vec<Connection> {
        self.state(color)
            .set
            .get_list(kind, x, y)
            .map(|l| l.entries().to_vec())
            .unwrap_or_default()
    }

    pub fn param(&mut self, name: &str, value: Option<&str>) -> Result<String> {
        macro_rules! field {
            ($field:ident, bool) => {{
                if let Some(v) = value {
                    self.params.$field = v.parse().map_err(|_| anyhow!("expected true/false for {}", name))?;
                    *self.builder.params_mut() = self.params;
                }
                Ok(self.params.$field.to_string())
            }};
            ($field:ident, usize) => {{
                if let Some(v) = value {
                    self.params.$field = v.parse().map_err(|_| anyhow!("expected an integer for {}", name))?;
                    *self.builder.params_mut() = self.params;
                }
                Ok(self.params.$field.to_string())
            }};
        }
        match name {
            "max_ors" => field!(max_ors, usize),
            "soft_limit" => {
                let result = field!(soft_limit, usize);
                if value.is_some() {
                    self.black = ColorState::new(Color::Black, &self.params);
                    self.white = ColorState::new(Color::White, &self.params);
                    self.rebuild_from_scratch();
                    self.history.clear();
                }
                result
            }
            "and_over_edge" => field!(and_over_edge, bool),
            "use_patterns" => field!(use_patterns, bool),
            "use_non_edge_patterns" => field!(use_non_edge_patterns, bool),
            "use_greedy_union" => field!(use_greedy_union, bool),
            "abort_on_winning_connection" => field!(abort_on_winning_connection, bool),
            _ => bail!("unknown parameter '{}'", name),
        }
    }

    pub fn genmove(&self, color: Color) -> Option<Cell> {
        let solver = Solver::new(self.params);
        solver.genmove(&self.position, color, &self.library)
    }

    pub fn eval(&self, color: Color) -> i32 {
        Eval::new().score(&self.position, color)
    }

    pub fn has_won(&self, color: Color) -> bool {
        self.state(color).set.has_winning_connection()
    }
}
