use hexvc::board::bitset::Bitset;
use hexvc::board::color::Color;
use hexvc::board::group::Groups;
use hexvc::board::position::Position;
use hexvc::patterns::{PatternLibrary, PatternState};
use hexvc::vc::{ChangeLog, Params, VCBuilder, VCSet};

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        building_static_on_an_empty_board,
        building_static_mid_game,
        building_incremental_one_move,
}

fn midgame_position() -> Position {
    let mut position = Position::empty();
    let mut color = Color::Black;
    for i in 0..20 {
        let row = i % hexvc::BOARD_SIZE;
        let col = (i * 3) % hexvc::BOARD_SIZE;
        let cell = hexvc::board::cell::Cell::from_rc(row, col);
        if position.color(cell).is_empty() {
            position.place(cell, color);
            color = color.other();
        }
    }
    position
}

fn building_static_on_an_empty_board(c: &mut criterion::Criterion) {
    let position = Position::empty();
    let groups = Groups::compute(&position);
    let library = PatternLibrary::generated();
    c.bench_function("build_static on an empty board", |b| {
        b.iter(|| {
            let mut set = VCSet::new(Color::Black, hexvc::DEFAULT_SOFT_LIMIT);
            let mut pattern_state = PatternState::new();
            let mut log = ChangeLog::new();
            let mut builder = VCBuilder::new(Params::default());
            builder.build_static(&mut set, &groups, &position, &mut pattern_state, &library, &mut log);
        })
    });
}

fn building_static_mid_game(c: &mut criterion::Criterion) {
    let position = midgame_position();
    let groups = Groups::compute(&position);
    let library = PatternLibrary::generated();
    c.bench_function("build_static on a mid-game board", |b| {
        b.iter(|| {
            let mut set = VCSet::new(Color::Black, hexvc::DEFAULT_SOFT_LIMIT);
            let mut pattern_state = PatternState::new();
            let mut log = ChangeLog::new();
            let mut builder = VCBuilder::new(Params::default());
            builder.build_static(&mut set, &groups, &position, &mut pattern_state, &library, &mut log);
        })
    });
}

fn building_incremental_one_move(c: &mut criterion::Criterion) {
    let mut position = midgame_position();
    let old_groups = Groups::compute(&position);
    let library = PatternLibrary::generated();
    let mut set = VCSet::new(Color::Black, hexvc::DEFAULT_SOFT_LIMIT);
    let mut pattern_state = PatternState::new();
    let mut log = ChangeLog::new();
    let mut builder = VCBuilder::new(Params::default());
    builder.build_static(&mut set, &old_groups, &position, &mut pattern_state, &library, &mut log);

    let next_empty = position
        .empties()
        .iter()
        .next()
        .expect("mid-game board still has empty cells");
    position.place(next_empty, Color::Black);
    let new_groups = Groups::compute(&position);
    let added = Bitset::singleton(next_empty);

    c.bench_function("build_incremental for one move", |b| {
        b.iter(|| {
            let mut trial_set = set.clone();
            let mut trial_state = pattern_state.clone();
            let mut trial_log = ChangeLog::new();
            builder.build_incremental(
                &mut trial_set,
                &old_groups,
                &new_groups,
                &position,
                &mut trial_state,
                &library,
                added,
                Bitset::empty(),
                &mut trial_log,
            );
        })
    });
}
