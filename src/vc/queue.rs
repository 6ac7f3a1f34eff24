use crate::board::bitset::Bitset;
use crate::board::cell::Cell;
use crate::NUM_CELLS;

/// a Full awaiting AND-closure. carries its carrier so the builder can
/// relocate the exact list entry even if other entries share its
/// endpoint pair.
#[derive(Debug, Clone, Copy)]
pub struct FullRef {
    pub x: Cell,
    pub y: Cell,
    pub carrier: Bitset,
}

/// append-only work queue of Fulls to process, with a read cursor so the
/// fixed-point loop in the builder can drain newly appended entries
/// without rescanning what it already processed.
#[derive(Debug, Clone, Default)]
pub struct FullsQueue {
    entries: Vec<FullRef>,
    head: usize,
}

impl FullsQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            head: 0,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = 0;
    }

    pub fn push(&mut self, x: Cell, y: Cell, carrier: Bitset) {
        self.entries.push(FullRef { x, y, carrier });
    }

    pub fn is_empty(&self) -> bool {
        self.head >= self.entries.len()
    }

    pub fn pop(&mut self) -> Option<FullRef> {
        if self.is_empty() {
            None
        } else {
            let item = self.entries[self.head];
            self.head += 1;
            Some(item)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// append-only work queue of endpoint pairs whose semi-lists need an AND
/// attempt, with a dense seen-matrix preventing the same pair from being
/// queued twice.
///
/// the reference bookkeeping this replaces keyed uniqueness as
/// `m_seen[a][a]`, so a pair `(a, a)` (never a real endpoint pair, since
/// I1 forbids equal endpoints) silently aliased every pair touching `a`.
/// this queue marks `seen[min(x,y)][max(x,y)]` on the pair actually
/// inserted instead, so no unrelated pair is ever skipped.
#[derive(Debug, Clone)]
pub struct SemiEndsQueue {
    entries: Vec<(Cell, Cell)>,
    head: usize,
    seen: Vec<bool>,
}

impl SemiEndsQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            head: 0,
            seen: vec![false; NUM_CELLS * NUM_CELLS],
        }
    }

    fn seen_index(x: Cell, y: Cell) -> usize {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        usize::from(a) * NUM_CELLS + usize::from(b)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = 0;
        self.seen.iter_mut().for_each(|b| *b = false);
    }

    /// queue `(x, y)` unless already queued; returns whether it was added.
    pub fn push(&mut self, x: Cell, y: Cell) -> bool {
        let idx = Self::seen_index(x, y);
        if self.seen[idx] {
            return false;
        }
        self.seen[idx] = true;
        self.entries.push((x, y));
        true
    }

    pub fn is_empty(&self) -> bool {
        self.head >= self.entries.len()
    }

    /// pop the next pair, clearing its `seen` slot so a later re-addition
    /// (e.g. a Semi added to an already-processed pair by AND-closure)
    /// re-enqueues it instead of being silently dropped. uniqueness only
    /// holds between a pair's push and its pop, not for the queue's
    /// entire lifetime.
    pub fn pop(&mut self) -> Option<(Cell, Cell)> {
        if self.is_empty() {
            None
        } else {
            let item = self.entries[self.head];
            self.head += 1;
            self.seen[Self::seen_index(item.0, item.1)] = false;
            Some(item)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for SemiEndsQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fulls_queue_drains_in_order_and_supports_late_pushes() {
        let mut q = FullsQueue::new();
        q.push(Cell::from(0), Cell::from(1), Bitset::empty());
        q.push(Cell::from(2), Cell::from(3), Bitset::empty());
        let first = q.pop().unwrap();
        assert_eq!((usize::from(first.x), usize::from(first.y)), (0, 1));
        q.push(Cell::from(4), Cell::from(5), Bitset::empty());
        assert_eq!(q.len(), 3);
        let second = q.pop().unwrap();
        assert_eq!((usize::from(second.x), usize::from(second.y)), (2, 3));
    }

    #[test]
    fn semi_ends_queue_dedupes_unordered_pairs() {
        let mut q = SemiEndsQueue::new();
        assert!(q.push(Cell::from(1), Cell::from(2)));
        assert!(!q.push(Cell::from(2), Cell::from(1)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn semi_ends_queue_does_not_alias_unrelated_pairs_sharing_an_endpoint() {
        let mut q = SemiEndsQueue::new();
        assert!(q.push(Cell::from(1), Cell::from(2)));
        // shares endpoint `1` with the pair above but is a distinct pair;
        // the old `m_seen[a][a]` scheme would have falsely marked this seen.
        assert!(q.push(Cell::from(1), Cell::from(3)));
    }

    #[test]
    fn semi_ends_queue_allows_re_push_after_pop() {
        let mut q = SemiEndsQueue::new();
        assert!(q.push(Cell::from(1), Cell::from(2)));
        assert!(!q.push(Cell::from(2), Cell::from(1)));
        assert_eq!(q.pop(), Some((Cell::from(1), Cell::from(2))));
        // the pair has left the queue, so and_closure adding a fresh Semi to
        // it must be able to re-enqueue it rather than being dropped.
        assert!(q.push(Cell::from(2), Cell::from(1)));
    }
}
