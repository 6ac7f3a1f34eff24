pub mod bitset;
pub mod cell;
pub mod color;
pub mod group;
pub mod position;

pub use bitset::Bitset;
pub use cell::Cell;
pub use color::{CellColor, Color};
pub use group::{Group, Groups};
pub use position::Position;
