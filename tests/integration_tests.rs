//! Integration tests for turns and the game loop pieces

use crossterm::event::{KeyCode, KeyEvent};

use tui_2048::core::{
    apply_move, compute_score, create_initial_board, play_turn, spawn_tile, EngineConfig,
    GameState, Grid, SequenceRng, SimpleRng, SpawnDistribution,
};
use tui_2048::input::InputHandler;
use tui_2048::types::{Direction, GameAction, GameStatus};

fn scenario_grid() -> Grid {
    Grid::from_rows(&[[2, 0, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]).unwrap()
}

#[test]
fn test_end_to_end_turn() {
    let g = scenario_grid();

    let outcome = apply_move(&g, Direction::Left);
    assert!(outcome.changed);
    assert_eq!(outcome.grid.row(0), &[4, 0, 0, 0]);
    assert_eq!(compute_score(&outcome.grid), 4);

    for seed in 1..50 {
        let mut rng = SimpleRng::new(seed);
        let turn = play_turn(&g, Direction::Left, &EngineConfig::default(), &mut rng);
        assert!(turn.changed);
        assert_eq!(turn.grid.row(0)[0], 4);
        assert!(turn.score == 6 || turn.score == 8, "score {}", turn.score);
        assert!(!turn.won && !turn.lost);
    }
}

#[test]
fn test_spawn_bounds() {
    let mut rng = SimpleRng::new(5);
    let dist = SpawnDistribution::default();
    let mut g = create_initial_board(4, &dist, &mut rng);
    assert_eq!(g.count_empty(), 14);

    while !g.is_full() {
        let next = spawn_tile(&g, &dist, &mut rng);
        let changed: Vec<usize> = (0..16)
            .filter(|&i| g.cells()[i] != next.cells()[i])
            .collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(g.cells()[changed[0]], 0);
        assert!(matches!(next.cells()[changed[0]], 2 | 4));
        g = next;
    }

    assert_eq!(spawn_tile(&g, &dist, &mut rng), g);
}

#[test]
fn test_game_lifecycle() {
    let mut game = GameState::new(EngineConfig::default(), 12345);
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.grid().size(), 4);
    assert_eq!(game.grid().count_empty(), 14);
    assert_eq!(game.score(), compute_score(game.grid()));

    let mut applied = 0;
    for i in 0..200 {
        if game.status().is_over() {
            break;
        }
        if game.apply_action(GameAction::Move(Direction::ALL[i % 4])) {
            applied += 1;
        }
    }
    assert_eq!(game.moves(), applied);
    assert_eq!(game.score(), compute_score(game.grid()));

    assert!(game.apply_action(GameAction::Restart));
    assert_eq!(game.moves(), 0);
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.status(), GameStatus::Playing);
}

#[test]
fn test_win_locks_the_board() {
    let config = EngineConfig::default().with_win_target(8);
    let g = Grid::from_rows(&[[4, 4], [0, 0]]).unwrap();
    let mut game = GameState::with_grid(config.with_size(2), g, SequenceRng::new([0, 500])).unwrap();

    assert!(game.apply_action(GameAction::Move(Direction::Left)));
    assert_eq!(game.status(), GameStatus::Won);
    let frozen = game.grid().clone();

    for dir in Direction::ALL {
        assert!(!game.apply_action(GameAction::Move(dir)));
    }
    assert_eq!(game.grid(), &frozen);
}

#[test]
fn test_same_seed_same_game() {
    let actions = [
        GameAction::Move(Direction::Left),
        GameAction::Move(Direction::Up),
        GameAction::Move(Direction::Right),
        GameAction::Move(Direction::Down),
        GameAction::Restart,
        GameAction::Move(Direction::Up),
    ];

    let mut a = GameState::new(EngineConfig::default(), 777);
    let mut b = GameState::new(EngineConfig::default(), 777);
    for _ in 0..10 {
        for &action in &actions {
            a.apply_action(action);
            b.apply_action(action);
        }
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_input_handler_integration() {
    let mut game = GameState::new(EngineConfig::default(), 1);
    let mut input = InputHandler::with_cooldown_ms(100);

    let accepted: Vec<GameAction> = [KeyCode::Left, KeyCode::Up, KeyCode::Right, KeyCode::Down]
        .into_iter()
        .filter_map(|code| input.handle_key_event(KeyEvent::from(code)))
        .collect();
    // Only the first key got through the cooldown.
    assert_eq!(accepted, vec![GameAction::Move(Direction::Left)]);
    game.apply_action(accepted[0]);
    assert!(game.moves() <= 1);

    input.update(100);
    assert!(input.handle_key_event(KeyEvent::from(KeyCode::Char('k'))).is_some());
    assert_eq!(
        input.handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
        Some(GameAction::Restart)
    );
}
