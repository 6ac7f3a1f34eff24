use crate::board::cell::Cell;
use crate::board::color::Color;
use crate::vc::changelog::{Op, Record};
use crate::vc::connection::Kind;
use crate::vc::list::VCList;
use std::collections::HashMap;

type Key = (Cell, Cell);

fn key(x: Cell, y: Cell) -> Key {
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}

/// the per-color lattice of VCLists, indexed by unordered endpoint pair
/// and type. owned by the caller across a build call; the builder only
/// borrows it.
#[derive(Debug, Clone)]
pub struct VCSet {
    color: Color,
    soft_limit: usize,
    full: HashMap<Key, VCList>,
    semi: HashMap<Key, VCList>,
}

impl VCSet {
    pub fn new(color: Color, soft_limit: usize) -> Self {
        Self {
            color,
            soft_limit,
            full: HashMap::new(),
            semi: HashMap::new(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn clear(&mut self) {
        self.full.clear();
        self.semi.clear();
    }

    fn table(&self, kind: Kind) -> &HashMap<Key, VCList> {
        match kind {
            Kind::Full => &self.full,
            Kind::Semi => &self.semi,
        }
    }

    fn table_mut(&mut self, kind: Kind) -> &mut HashMap<Key, VCList> {
        match kind {
            Kind::Full => &mut self.full,
            Kind::Semi => &mut self.semi,
        }
    }

    pub fn get_list(&self, kind: Kind, x: Cell, y: Cell) -> Option<&VCList> {
        self.table(kind).get(&key(x, y))
    }

    pub fn list_mut(&mut self, kind: Kind, x: Cell, y: Cell) -> &mut VCList {
        let soft_limit = self.soft_limit;
        self.table_mut(kind)
            .entry(key(x, y))
            .or_insert_with(|| VCList::new(soft_limit))
    }

    pub fn exists(&self, x: Cell, y: Cell, kind: Kind) -> bool {
        self.get_list(kind, x, y).map(|l| !l.is_empty()).unwrap_or(false)
    }

    /// total number of Full entries across every pair, used by shallow
    /// move evaluation as a cheap proxy for connection strength.
    pub fn full_count(&self) -> usize {
        self.full.values().map(|l| l.len()).sum()
    }

    pub fn has_winning_connection(&self) -> bool {
        let (e1, e2) = (Cell::color_edge1(self.color), Cell::color_edge2(self.color));
        self.exists(e1, e2, Kind::Full)
    }

    /// every endpoint pair with at least one non-empty list, either type.
    pub fn pairs(&self) -> Vec<(Cell, Cell)> {
        let mut seen: Vec<(Cell, Cell)> = self.full.keys().copied().collect();
        for k in self.semi.keys() {
            if !seen.contains(k) {
                seen.push(*k);
            }
        }
        seen
    }

    pub fn undo(&mut self, record: &Record) {
        let list = self
            .table_mut(record.key.kind)
            .entry((record.key.x, record.key.y))
            .or_insert_with(|| VCList::new(self.soft_limit));
        match record.op {
            Op::Add => {
                list.raw_remove(&record.vc.carrier);
            }
            Op::Remove => {
                list.raw_insert(record.vc.clone());
            }
            Op::Processed => {
                list.clear_processed(&record.vc.carrier);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::bitset::Bitset;
    use crate::vc::changelog::ChangeLog;
    use crate::vc::connection::{Connection, Rule};
    use crate::DEFAULT_SOFT_LIMIT;

    #[test]
    fn key_is_order_independent() {
        let a = Cell::from(3);
        let b = Cell::from(9);
        assert_eq!(key(a, b), key(b, a));
    }

    #[test]
    fn add_then_rollback_restores_empty_set() {
        let mut set = VCSet::new(Color::Black, DEFAULT_SOFT_LIMIT);
        let mut log = ChangeLog::new();
        let mark = log.mark();
        let a = Cell::from(0);
        let b = Cell::from(1);
        let vc = Connection::full(a, b, Bitset::empty(), Rule::Base);
        set.list_mut(Kind::Full, a, b).add(vc, &mut log);
        assert!(set.exists(a, b, Kind::Full));
        log.rollback_to(mark, &mut set);
        assert!(!set.exists(a, b, Kind::Full));
    }
}
