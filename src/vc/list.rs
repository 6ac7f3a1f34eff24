use crate::board::bitset::Bitset;
use crate::vc::changelog::ChangeLog;
use crate::vc::connection::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    AddedInsideSoft,
    AddedOutsideSoft,
    Failed,
}

/// connections sharing one endpoint pair and type, ordered by carrier
/// size ascending then insertion order. no two entries are
/// carrier-superset comparable (dominance, P2).
#[derive(Debug, Clone)]
pub struct VCList {
    entries: Vec<Connection>,
    soft_limit: usize,
    hard_intersection: Bitset,
    soft_intersection: Bitset,
}

impl VCList {
    pub fn new(soft_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            soft_limit,
            hard_intersection: Bitset::universe(),
            soft_intersection: Bitset::universe(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Connection] {
        &self.entries
    }

    pub fn hard_intersection(&self) -> Bitset {
        self.hard_intersection
    }

    pub fn soft_intersection(&self) -> Bitset {
        self.soft_intersection
    }

    pub fn soft_prefix(&self) -> &[Connection] {
        let take = self.soft_limit.min(self.entries.len());
        &self.entries[..take]
    }

    pub fn find_index(&self, carrier: &Bitset) -> Option<usize> {
        self.entries.iter().position(|e| &e.carrier == carrier)
    }

    /// true iff some entry's carrier is a subset of `carrier` -- i.e. a
    /// hypothetical connection with this carrier would be dominated.
    pub fn is_superset_of_any(&self, carrier: &Bitset) -> bool {
        self.entries.iter().any(|e| e.carrier.is_subset_of(carrier))
    }

    pub fn union(&self) -> Bitset {
        self.entries
            .iter()
            .fold(Bitset::empty(), |acc, e| acc.or(&e.carrier))
    }

    /// union carriers in insertion order, skipping any that add nothing
    /// to the running union (their carrier is already covered).
    pub fn greedy_union(&self) -> Bitset {
        let mut acc = Bitset::empty();
        for e in &self.entries {
            if !e.carrier.is_subset_of(&acc) {
                acc = acc.or(&e.carrier);
            }
        }
        acc
    }

    fn recompute_intersections(&mut self) {
        self.hard_intersection = self
            .entries
            .iter()
            .fold(Bitset::universe(), |acc, e| acc.and(&e.carrier));
        let take = self.soft_limit.min(self.entries.len());
        self.soft_intersection = self.entries[..take]
            .iter()
            .fold(Bitset::universe(), |acc, e| acc.and(&e.carrier));
    }

    fn insertion_index(&self, count: u32) -> usize {
        self.entries
            .iter()
            .position(|e| e.carrier.count() > count)
            .unwrap_or(self.entries.len())
    }

    /// dominance-checked insert, logging every add/remove it causes.
    pub fn add(&mut self, vc: Connection, log: &mut ChangeLog) -> AddResult {
        if self.entries.iter().any(|e| e.carrier.is_subset_of(&vc.carrier)) {
            return AddResult::Failed;
        }
        let mut i = 0;
        while i < self.entries.len() {
            if vc.carrier.is_subset_of(&self.entries[i].carrier) {
                let removed = self.entries.remove(i);
                log.log_remove(removed);
            } else {
                i += 1;
            }
        }
        let idx = self.insertion_index(vc.carrier.count());
        log.log_add(vc.clone());
        self.entries.insert(idx, vc);
        self.recompute_intersections();
        if idx < self.soft_limit {
            AddResult::AddedInsideSoft
        } else {
            AddResult::AddedOutsideSoft
        }
    }

    pub fn append(&mut self, other: &VCList, log: &mut ChangeLog) {
        for vc in other.entries.iter().cloned() {
            self.add(vc, log);
        }
    }

    pub fn remove_all_containing(&mut self, mask: &Bitset, log: &mut ChangeLog) -> Vec<Connection> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].carrier.and(mask).any() {
                let e = self.entries.remove(i);
                log.log_remove(e.clone());
                removed.push(e);
            } else {
                i += 1;
            }
        }
        self.recompute_intersections();
        removed
    }

    /// remove the single entry whose carrier equals `carrier` exactly,
    /// logging it like any other mutation. used when relocating surviving
    /// entries to a different endpoint pair during a merge.
    pub fn remove_exact(&mut self, carrier: &Bitset, log: &mut ChangeLog) -> Option<Connection> {
        let idx = self.find_index(carrier)?;
        let vc = self.entries.remove(idx);
        log.log_remove(vc.clone());
        self.recompute_intersections();
        Some(vc)
    }

    pub fn remove_supersets_of(&mut self, carrier: &Bitset, log: &mut ChangeLog) -> Vec<Connection> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if carrier.is_subset_of(&self.entries[i].carrier) {
                let e = self.entries.remove(i);
                log.log_remove(e.clone());
                removed.push(e);
            } else {
                i += 1;
            }
        }
        self.recompute_intersections();
        removed
    }

    pub fn mark_processed(&mut self, idx: usize, log: &mut ChangeLog) {
        if !self.entries[idx].processed {
            self.entries[idx].processed = true;
            log.log_processed(self.entries[idx].clone());
        }
    }

    /// raw structural operations used only by `ChangeLog` rollback: no
    /// dominance checks, no logging.
    pub(crate) fn raw_remove(&mut self, carrier: &Bitset) -> Option<Connection> {
        let idx = self.find_index(carrier)?;
        let vc = self.entries.remove(idx);
        self.recompute_intersections();
        Some(vc)
    }

    pub(crate) fn raw_insert(&mut self, vc: Connection) {
        let idx = self.insertion_index(vc.carrier.count());
        self.entries.insert(idx, vc);
        self.recompute_intersections();
    }

    pub(crate) fn clear_processed(&mut self, carrier: &Bitset) {
        if let Some(idx) = self.find_index(carrier) {
            self.entries[idx].processed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cell::Cell;
    use crate::vc::connection::Rule;

    fn c(i: usize) -> Cell {
        Cell::from(i)
    }

    #[test]
    fn dominance_rejects_superset_and_evicts_existing() {
        let mut list = VCList::new(10);
        let mut log = ChangeLog::new();
        let small = Connection::full(c(0), c(1), Bitset::singleton(c(5)), Rule::Base);
        assert_eq!(list.add(small.clone(), &mut log), AddResult::AddedInsideSoft);

        let bigger = Connection::full(
            c(0),
            c(1),
            Bitset::singleton(c(5)).or(&Bitset::singleton(c(6))),
            Rule::Base,
        );
        assert_eq!(list.add(bigger, &mut log), AddResult::Failed);
        assert_eq!(list.len(), 1);

        let smaller = Connection::full(c(0), c(1), Bitset::empty(), Rule::Base);
        assert_eq!(list.add(smaller, &mut log), AddResult::AddedInsideSoft);
        assert_eq!(list.len(), 1, "the superset `small` should have been evicted");
    }

    #[test]
    fn hard_and_soft_intersection_track_entries() {
        let mut list = VCList::new(1);
        let mut log = ChangeLog::new();
        let a = Connection::full(c(0), c(1), Bitset::singleton(c(5)), Rule::Base);
        let b = Connection::full(
            c(0),
            c(1),
            Bitset::singleton(c(5)).or(&Bitset::singleton(c(6))),
            Rule::Base,
        );
        list.add(a, &mut log);
        list.add(b, &mut log);
        assert_eq!(list.hard_intersection(), Bitset::singleton(c(5)));
        // soft_limit = 1, so only the smallest-carrier entry contributes.
        assert_eq!(list.soft_intersection(), Bitset::singleton(c(5)));
    }

    #[test]
    fn remove_all_containing_returns_removed() {
        let mut list = VCList::new(10);
        let mut log = ChangeLog::new();
        let a = Connection::full(c(0), c(1), Bitset::singleton(c(5)), Rule::Base);
        list.add(a, &mut log);
        let removed = list.remove_all_containing(&Bitset::singleton(c(5)), &mut log);
        assert_eq!(removed.len(), 1);
        assert!(list.is_empty());
    }
}
