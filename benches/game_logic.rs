use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_2048::adapter::build_observation;
use tui_2048::core::{apply_move, legal_moves, play_turn, EngineConfig, GameState, Grid, SimpleRng};
use tui_2048::term::{FrameBuffer, GameView, Viewport};
use tui_2048::types::{Direction, GameAction};

fn busy_grid() -> Grid {
    Grid::from_rows(&[
        [2, 2, 4, 8],
        [0, 4, 4, 16],
        [2, 0, 8, 8],
        [32, 64, 0, 2],
    ])
    .unwrap()
}

fn bench_apply_move(c: &mut Criterion) {
    let grid = busy_grid();

    c.bench_function("apply_move_all_directions", |b| {
        b.iter(|| {
            for dir in Direction::ALL {
                black_box(apply_move(black_box(&grid), dir));
            }
        })
    });
}

fn bench_play_turn(c: &mut Criterion) {
    let grid = busy_grid();
    let config = EngineConfig::default();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("play_turn", |b| {
        b.iter(|| black_box(play_turn(black_box(&grid), Direction::Left, &config, &mut rng)))
    });
}

fn bench_legal_moves(c: &mut Criterion) {
    let grid = busy_grid();

    c.bench_function("legal_moves", |b| b.iter(|| black_box(legal_moves(black_box(&grid)))));
}

fn bench_game_loop(c: &mut Criterion) {
    let mut state = GameState::new(EngineConfig::default(), 12345);
    let mut i = 0usize;

    c.bench_function("apply_action_with_restart", |b| {
        b.iter(|| {
            if state.status().is_over() {
                state.apply_action(GameAction::Restart);
            }
            state.apply_action(GameAction::Move(Direction::ALL[i % 4]));
            i += 1;
        })
    });
}

fn bench_observation(c: &mut Criterion) {
    let state = GameState::new(EngineConfig::default(), 12345);

    c.bench_function("build_observation", |b| {
        b.iter(|| black_box(build_observation(black_box(&state), 1)))
    });
}

fn bench_render(c: &mut Criterion) {
    let state = GameState::new(EngineConfig::default(), 12345);
    let snap = state.snapshot();
    let view = GameView::default();
    let mut fb = FrameBuffer::new(80, 24);

    c.bench_function("render_80x24", |b| {
        b.iter(|| view.render_into(black_box(&snap), Viewport::new(80, 24), &mut fb))
    });
}

criterion_group!(
    benches,
    bench_apply_move,
    bench_play_turn,
    bench_legal_moves,
    bench_game_loop,
    bench_observation,
    bench_render
);
criterion_main!(benches);
