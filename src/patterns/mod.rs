pub mod library;
pub mod state;

pub use library::{Bridge, PatternLibrary};
pub use state::PatternState;
