//! thin external callers of the VC engine: move selection, a small
//! opening book, a linear evaluator, and game-record loading. none of
//! these touch `vc::` internals directly; they go through the same
//! public API a protocol client would.
pub mod book;
pub mod eval;
pub mod sgf;
pub mod solver;

pub use book::Book;
pub use eval::Eval;
pub use solver::{Candidate, Solver};
