//! the text command protocol (spec.md's "behind a text command
//! protocol"): a line-oriented REPL, read from stdin by default or
//! from any `BufRead` a caller hands in, in the spirit of the
//! teacher's `analysis::cli::CLI::run` loop.
mod session;

pub use session::Session;

use crate::board::cell::Cell;
use crate::board::color::Color;
use crate::vc::{Kind, Params};
use anyhow::{anyhow, Result};
use std::io::{BufRead, Write};

pub struct Repl {
    session: Session,
}

impl Repl {
    pub fn new(params: Params) -> Self {
        Self {
            session: Session::new(params),
        }
    }

    /// drive the loop until `quit`/`exit` or end of input, writing
    /// prompts and replies to `out`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            write!(out, "> ")?;
            out.flush()?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed == "quit" || trimmed == "exit" {
                break;
            }
            match self.handle(trimmed) {
                Ok(reply) => writeln!(out, "{}", reply)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            }
        }
        Ok(())
    }

    /// handle a single command line without the `run` loop's prompt or
    /// quit/exit handling, for callers driving their own input source
    /// (e.g. an interactive `dialoguer` prompt).
    pub fn handle(&mut self, line: &str) -> Result<String> {
        let args: Vec<&str> = line.split_whitespace().collect();
        match args.first().copied() {
            Some("boardsize") => {
                let size: usize = args.get(1).ok_or_else(|| anyhow!("usage: boardsize N"))?.parse()?;
                self.session.boardsize(size)?;
                Ok("ok".to_string())
            }
            Some("play") => {
                let color = parse_color(args.get(1))?;
                let cell = parse_cell(args.get(2))?;
                self.session.play(color, cell)?;
                Ok("ok".to_string())
            }
            Some("undo") => {
                self.session.undo()?;
                Ok("ok".to_string())
            }
            Some("showboard") => Ok(self.session.showboard()),
            Some("vcs") => {
                let color = parse_color(args.get(1))?;
                let kind = parse_kind(args.get(2))?;
                let x = parse_cell(args.get(3))?;
                let y = parse_cell(args.get(4))?;
                let connections = self.session.vcs(color, kind, x, y);
                Ok(connections
                    .iter()
                    .map(|vc| format!("{:?} carrier={} rule={:?}", vc.kind, vc.carrier.count(), vc.rule))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Some("param") => {
                let name = args.get(1).ok_or_else(|| anyhow!("usage: param <name> [value]"))?;
                let value = args.get(2).copied();
                self.session.param(name, value)
            }
            Some("genmove") => {
                let color = parse_color(args.get(1))?;
                match self.session.genmove(color) {
                    Some(cell) => Ok(format_cell(cell)),
                    None => Ok("resign".to_string()),
                }
            }
            Some("eval") => {
                let color = parse_color(args.get(1))?;
                Ok(self.session.eval(color).to_string())
            }
            Some(other) => Err(anyhow!("unrecognized command '{}'", other)),
            None => Ok(String::new()),
        }
    }
}

fn parse_color(arg: Option<&&str>) -> Result<Color> {
    match arg.copied() {
        Some("black" | "b") => Ok(Color::Black),
        Some("white" | "w") => Ok(Color::White),
        Some(other) => Err(anyhow!("unrecognized color '{}'", other)),
        None => Err(anyhow!("missing color argument")),
    }
}

fn parse_kind(arg: Option<&&str>) -> Result<Kind> {
    match arg.copied() {
        Some("full") => Ok(Kind::Full),
        Some("semi") => Ok(Kind::Semi),
        Some(other) => Err(anyhow!("unrecognized connection type '{}'", other)),
        None => Err(anyhow!("missing connection type argument")),
    }
}

/// cells on the wire are `<col><row>`, zero-indexed integers separated
/// by nothing, e.g. `54` for row 5 col 4. kept numeric rather than
/// SGF-style letters so it works unmodified past `BOARD_SIZE` 19.
fn parse_cell(arg: Option<&&str>) -> Result<Cell> {
    let raw = arg.copied().ok_or_else(|| anyhow!("missing cell argument"))?;
    let (row_str, col_str) = raw.split_once(',').ok_or_else(|| anyhow!("cell must be given as 'row,col'"))?;
    let row: usize = row_str.parse()?;
    let col: usize = col_str.parse()?;
    if row >= crate::BOARD_SIZE || col >= crate::BOARD_SIZE {
        return Err(anyhow!("cell ({},{}) is out of range for a {}x{} board", row, col, crate::BOARD_SIZE, crate::BOARD_SIZE));
    }
    Ok(Cell::from_rc(row, col))
}

fn format_cell(cell: Cell) -> String {
    match cell.to_rc() {
        Some((row, col)) => format!("{},{}", row, col),
        None => "edge".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boardsize_accepts_the_compiled_size() {
        let mut repl = Repl::new(Params::default());
        let input = format!("boardsize {}\nshowboard\nquit\n", crate::BOARD_SIZE);
        let mut out = Vec::new();
        repl.run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ok"));
    }

    #[test]
    fn play_then_showboard_reflects_the_stone() {
        let mut repl = Repl::new(Params::default());
        let input = "play black 5,5\nshowboard\nquit\n";
        let mut out = Vec::new();
        repl.run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('B'));
    }

    #[test]
    fn undo_without_a_prior_play_is_a_reported_error() {
        let mut repl = Repl::new(Params::default());
        let mut out = Vec::new();
        repl.run("undo\nquit\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("error"));
    }

    #[test]
    fn genmove_on_an_empty_board_returns_a_cell() {
        let mut repl = Repl::new(Params::default());
        let mut out = Vec::new();
        repl.run("genmove black\nquit\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.to_lowercase().contains("error"));
    }

    #[test]
    fn param_round_trips_a_boolean_field() {
        let mut repl = Repl::new(Params::default());
        let mut out = Vec::new();
        repl.run("param use_patterns false\nparam use_patterns\nquit\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("false"));
    }
}
