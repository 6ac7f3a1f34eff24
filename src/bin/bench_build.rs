//! quick manual timing for `VCBuilder::build_static`, outside of the
//! criterion harness in `benches/` -- handy for a one-off `cargo run
//! --bin bench_build --release` without the criterion warmup/sampling
//! overhead.
use hexvc::board::color::Color;
use hexvc::board::group::Groups;
use hexvc::board::position::Position;
use hexvc::patterns::{PatternLibrary, PatternState};
use hexvc::vc::{ChangeLog, Params, VCBuilder, VCSet};
use std::time::Instant;

fn main() {
    let iterations: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);

    let position = Position::empty();
    let groups = Groups::compute(&position);
    let library = PatternLibrary::generated();

    let started = Instant::now();
    for _ in 0..iterations {
        let mut set = VCSet::new(Color::Black, hexvc::DEFAULT_SOFT_LIMIT);
        let mut pattern_state = PatternState::new();
        let mut log = ChangeLog::new();
        let mut builder = VCBuilder::new(Params::default());
        builder.build_static(&mut set, &groups, &position, &mut pattern_state, &library, &mut log);
    }
    let elapsed = started.elapsed();

    println!(
        "{} static builds of an empty {}x{} board in {:.3?} ({:.3?}/build)",
        iterations,
        hexvc::BOARD_SIZE,
        hexvc::BOARD_SIZE,
        elapsed,
        elapsed / iterations as u32
    );
}
