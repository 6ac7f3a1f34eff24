use crate::board::cell::Cell;
use crate::board::color::Color;
use crate::board::position::Position;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// one parsed move: the color to play and the cell it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub color: Color,
    pub cell: Cell,
}

/// a minimal SGF-subset reader: enough of the format to replay a game
/// record into a `Position`, not a general SGF parser. understands a
/// single unbranching sequence of `;B[xy]` / `;W[xy]` nodes and ignores
/// every other property (`SZ`, `C`, `PB`, ...), ending at the first `)`.
pub fn parse_moves(text: &str) -> Result<Vec<Move>> {
    let mut moves = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ';' => {
                chars.next();
                if let Some(mv) = parse_node(&mut chars)? {
                    moves.push(mv);
                }
            }
            _ => {
                chars.next();
            }
        }
    }
    Ok(moves)
}

fn parse_node(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<Option<Move>> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c == '[' {
            break;
        }
        if c.is_ascii_alphabetic() {
            ident.push(c);
        } else if c == ';' || c == ')' || c == '(' {
            return Ok(None);
        }
        chars.next();
    }
    let color = match ident.as_str() {
        "B" => Color::Black,
        "W" => Color::White,
        _ => {
            // skip any property value and move on without producing a move
            if chars.peek() == Some(&'[') {
                skip_bracket(chars)?;
            }
            return Ok(None);
        }
    };
    let value = read_bracket(chars)?;
    if value.is_empty() {
        // an empty bracket is a pass; no cell to place.
        return Ok(None);
    }
    let cell = sgf_coord_to_cell(&value)?;
    Ok(Some(Move { color, cell }))
}

fn skip_bracket(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<()> {
    read_bracket(chars).map(|_| ())
}

fn read_bracket(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<String> {
    if chars.next() != Some('[') {
        bail!("expected '[' opening a property value");
    }
    let mut value = String::new();
    for c in chars.by_ref() {
        if c == ']' {
            return Ok(value);
        }
        value.push(c);
    }
    bail!("unterminated property value, missing closing ']'")
}

/// SGF coordinates are two letters, column then row, `a` == 0.
fn sgf_coord_to_cell(value: &str) -> Result<Cell> {
    let mut letters = value.chars();
    let col = letters.next().context("empty SGF coordinate")?;
    let row = letters.next().context("SGF coordinate missing row letter")?;
    let col = (col as u8).wrapping_sub(b'a') as usize;
    let row = (row as u8).wrapping_sub(b'a') as usize;
    if col >= crate::BOARD_SIZE || row >= crate::BOARD_SIZE {
        bail!("SGF coordinate '{}' is out of range for this board size", value);
    }
    Ok(Cell::from_rc(row, col))
}

/// replay every move in `text` onto a fresh empty position, stopping at
/// the first move that would land on an occupied cell.
pub fn replay(text: &str) -> Result<Position> {
    let moves = parse_moves(text)?;
    let mut position = Position::empty();
    for mv in moves {
        if !position.color(mv.cell).is_empty() {
            bail!("SGF record plays on an already-occupied cell");
        }
        position.place(mv.cell, mv.color);
    }
    Ok(position)
}

pub fn load(path: &Path) -> Result<Position> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read SGF file at {}", path.display()))?;
    replay(&text).with_context(|| format!("failed to replay SGF file at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_alternating_sequence() {
        let moves = parse_moves("(;GM[1]SZ[11];B[cc];W[dd];B[ce])").unwrap();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].color, Color::Black);
        assert_eq!(moves[1].color, Color::White);
    }

    #[test]
    fn replay_places_every_move_on_the_board() {
        let position = replay("(;GM[1];B[cc];W[dd])").unwrap();
        assert!(!position.color(Cell::from_rc(2, 2)).is_empty());
        assert!(!position.color(Cell::from_rc(3, 3)).is_empty());
    }

    #[test]
    fn replay_rejects_a_move_onto_an_occupied_cell() {
        let result = replay("(;GM[1];B[cc];W[cc])");
        assert!(result.is_err());
    }

    #[test]
    fn an_unterminated_bracket_is_a_descriptive_error() {
        let result = parse_moves("(;B[cc");
        assert!(result.is_err());
    }
}
