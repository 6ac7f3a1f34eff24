pub mod board;
pub mod collaborators;
pub mod patterns;
pub mod protocol;
pub mod vc;

/// side length of the hex board. a board13/board19 feature bumps this.
#[cfg(all(not(feature = "board13"), not(feature = "board19")))]
pub const BOARD_SIZE: usize = 11;
#[cfg(all(feature = "board13", not(feature = "board19")))]
pub const BOARD_SIZE: usize = 13;
#[cfg(feature = "board19")]
pub const BOARD_SIZE: usize = 19;

/// playing cells plus four edge sentinels: two per color.
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE + 4;

/// number of u64 words needed to hold NUM_CELLS bits.
pub const BITSET_WORDS: usize = (NUM_CELLS + 63) / 64;

/// soft-limit prefix length a VCList actively propagates.
pub const DEFAULT_SOFT_LIMIT: usize = 10;

/// below this, the bounded (enumerative) OR algorithm runs; at or above,
/// the enhanced (partition-refinement) algorithm runs.
pub const ENHANCED_OR_THRESHOLD: usize = 16;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging to the terminal
#[cfg(feature = "cli")]
pub fn init() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term]).expect("initialize logger");
}
