use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polytris::core::{generate_shape_prototypes, Board, GameState, ShapeGenerator};
use polytris::types::{GameAction, GameConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_generate_shape(c: &mut Criterion) {
    let config = GameConfig::default();
    let generator = ShapeGenerator::new(&config);
    let mut rng = StdRng::seed_from_u64(12345);

    c.bench_function("generate_legal_shape", |b| {
        b.iter(|| black_box(generator.generate_legal_shape(&mut rng)))
    });
}

fn bench_generate_catalog(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(12345);

    c.bench_function("generate_catalog", |b| {
        b.iter(|| black_box(generate_shape_prototypes(&mut rng, &config)))
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let mut rows = vec![vec![0u8; 14]; 25];
    for row in rows.iter_mut().skip(21) {
        row.fill(1);
    }
    let board = Board::from_rows(rows.as_slice());

    c.bench_function("clear_4_lines", |b| {
        b.iter(|| black_box(board.clear_lines()))
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut state = GameState::new(GameConfig::default(), 12345);

    c.bench_function("game_tick", |b| {
        b.iter(|| {
            if state.game_over() {
                state.reset();
            }
            state.tick();
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut state = GameState::new(GameConfig::default(), 12345);

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            if state.game_over() {
                state.reset();
            }
            state.apply_action(GameAction::HardDrop);
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut state = GameState::new(GameConfig::default(), 12345);

    c.bench_function("rotate", |b| {
        b.iter(|| {
            state.apply_action(black_box(GameAction::Rotate));
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let state = GameState::new(GameConfig::default(), 12345);

    c.bench_function("snapshot", |b| b.iter(|| black_box(state.snapshot())));
}

criterion_group!(
    benches,
    bench_generate_shape,
    bench_generate_catalog,
    bench_line_clear,
    bench_tick,
    bench_hard_drop,
    bench_rotate,
    bench_snapshot
);
criterion_main!(benches);
