use crate::board::bitset::Bitset;
use crate::board::cell::Cell;
use crate::NUM_CELLS;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

/// a single bridge: two cells sharing exactly two common neighbors and
/// not themselves adjacent. the shared neighbors are the bridge's
/// carrier -- if the opponent takes one, the player takes the other and
/// the connection survives, so a bridge is a Full, not a Semi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bridge {
    pub x: Cell,
    pub y: Cell,
    pub carrier: Bitset,
}

/// the captured-set and VC pattern tables, read-only once constructed.
/// bridges cover every hex orientation plus the edge-sentinel cases,
/// since an edge sentinel's neighbor set is its whole side of the board.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    bridges: Vec<Bridge>,
}

impl PatternLibrary {
    /// derive every bridge template directly from board adjacency rather
    /// than hardcoding the six canonical hex orientations: any unordered
    /// pair of non-adjacent cells with exactly two common neighbors is a
    /// bridge, regardless of board size or whether one side is a sentinel.
    pub fn generated() -> Self {
        let mut bridges = Vec::new();
        for xi in 0..NUM_CELLS {
            let x = Cell::from(xi);
            let x_nbs = x.neighbors();
            for yi in (xi + 1)..NUM_CELLS {
                let y = Cell::from(yi);
                if x_nbs.test(y) {
                    continue;
                }
                let common = x_nbs.and(&y.neighbors());
                if common.count() == 2 {
                    bridges.push(Bridge { x, y, carrier: common });
                }
            }
        }
        Self { bridges }
    }

    /// load a library overriding the generated bridge set from a text
    /// file: one bridge per line, as three whitespace-separated cell
    /// indices `x y c1 c2`. blank lines and `#`-prefixed comments are
    /// skipped. the engine cannot operate without a valid table, so any
    /// failure here is fatal to construction.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("loading pattern library from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing pattern library at {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        let mut bridges = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            anyhow::ensure!(
                fields.len() == 4,
                "line {}: expected `x y c1 c2`, found {:?}",
                lineno + 1,
                line
            );
            let parse_cell = |s: &str| -> Result<Cell> {
                let i: usize = s.parse().with_context(|| format!("invalid cell index {:?}", s))?;
                anyhow::ensure!(i < NUM_CELLS, "cell index {} out of range", i);
                Ok(Cell::from(i))
            };
            let x = parse_cell(fields[0])?;
            let y = parse_cell(fields[1])?;
            let c1 = parse_cell(fields[2])?;
            let c2 = parse_cell(fields[3])?;
            let mut carrier = Bitset::empty();
            carrier.set(c1);
            carrier.set(c2);
            bridges.push(Bridge { x, y, carrier });
        }
        Ok(Self { bridges })
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for b in &self.bridges {
            let mut it = b.carrier.iter();
            let c1 = it.next().expect("bridge carrier has exactly two cells");
            let c2 = it.next().expect("bridge carrier has exactly two cells");
            let _ = writeln!(out, "{} {} {} {}", usize::from(b.x), usize::from(b.y), usize::from(c1), usize::from(c2));
        }
        out
    }

    pub fn bridges(&self) -> &[Bridge] {
        &self.bridges
    }

    /// every bridge touching cell `p`, paired with the bridge's other
    /// endpoint.
    pub fn bridges_through(&self, p: Cell) -> impl Iterator<Item = &Bridge> {
        self.bridges.iter().filter(move |b| b.x == p || b.y == p)
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::generated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_bridges_have_two_carrier_cells_and_no_self_adjacency() {
        let lib = PatternLibrary::generated();
        assert!(!lib.bridges().is_empty());
        for b in lib.bridges() {
            assert_eq!(b.carrier.count(), 2);
            assert!(!b.carrier.test(b.x));
            assert!(!b.carrier.test(b.y));
        }
    }

    #[test]
    fn corner_cell_has_at_least_one_bridge() {
        let lib = PatternLibrary::generated();
        let corner = Cell::from_rc(0, 0);
        assert!(lib.bridges_through(corner).count() >= 1);
    }

    #[test]
    fn round_trips_through_serialize_and_parse() {
        let lib = PatternLibrary::generated();
        let text = lib.serialize();
        let reparsed = PatternLibrary::parse(&text).unwrap();
        assert_eq!(reparsed.bridges().len(), lib.bridges().len());
    }

    #[test]
    fn load_from_missing_path_is_a_descriptive_error() {
        let path = Path::new("/nonexistent/vc-patterns.txt");
        let err = PatternLibrary::load(path).unwrap_err();
        assert!(err.to_string().contains("vc-patterns.txt"));
    }
}
