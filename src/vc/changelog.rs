use crate::board::cell::Cell;
use crate::vc::connection::{Connection, Kind};
use crate::vc::set::VCSet;

/// which list a log record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub x: Cell,
    pub y: Cell,
    pub kind: Kind,
}

impl ListKey {
    pub fn of(vc: &Connection) -> Self {
        let (x, y) = vc.endpoints();
        Self { x, y, kind: vc.kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Remove,
    Processed,
}

#[derive(Debug, Clone)]
pub struct Record {
    pub key: ListKey,
    pub op: Op,
    pub vc: Connection,
}

/// undo journal: every `VCList` mutation during a build appends one
/// record here. rolling back in reverse restores the set to its state at
/// the matching mark, per spec R3.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog(Vec<Record>);

impl ChangeLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn mark(&self) -> usize {
        self.0.len()
    }

    pub fn log_add(&mut self, vc: Connection) {
        self.0.push(Record {
            key: ListKey::of(&vc),
            op: Op::Add,
            vc,
        });
    }

    pub fn log_remove(&mut self, vc: Connection) {
        self.0.push(Record {
            key: ListKey::of(&vc),
            op: Op::Remove,
            vc,
        });
    }

    pub fn log_processed(&mut self, vc: Connection) {
        self.0.push(Record {
            key: ListKey::of(&vc),
            op: Op::Processed,
            vc,
        });
    }

    /// undo every record back to `mark`, most recent first.
    pub fn rollback_to(&mut self, mark: usize, set: &mut VCSet) {
        while self.0.len() > mark {
            let record = self.0.pop().expect("len > mark");
            set.undo(&record);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
