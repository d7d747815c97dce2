use grid_snake::game::{
    CollisionType, Direction, GameConfig, GameEngine, GameState, Position, Snake, StepOutcome,
};

fn engine() -> GameEngine {
    GameEngine::with_seed(GameConfig::new(5, 5), 2024)
}

fn session(cells: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> GameState {
    let body = cells.iter().map(|&(x, y)| Position::new(x, y)).collect();
    let snake = Snake::from_cells(body, direction).expect("non-empty snake");
    GameState::new(snake, Position::new(food.0, food.1), 5, 5)
}

#[test]
fn growth_after_two_steps() {
    let mut engine = engine();
    let mut state = session(&[(2, 2)], Direction::Right, (4, 2));

    assert_eq!(engine.step(&mut state), StepOutcome::Moved);
    assert_eq!(state.snake.head(), Position::new(3, 2));

    assert_eq!(engine.step(&mut state), StepOutcome::Grew);
    assert_eq!(state.snake.head(), Position::new(4, 2));
    assert_eq!(state.score, 1);
    assert_eq!(state.snake.len(), 2);
    assert!(!state.snake.occupies(state.food));
    assert!(state.is_alive);
}

#[test]
fn wall_death_leaves_body_unchanged() {
    let mut engine = engine();
    let mut state = session(&[(4, 2), (3, 2)], Direction::Right, (0, 0));
    let before = state.snake.clone();

    let outcome = engine.step(&mut state);

    assert_eq!(outcome, StepOutcome::Died(CollisionType::Wall));
    assert!(!state.is_alive);
    assert_eq!(state.snake, before);
}

#[test]
fn moving_into_body_is_self_collision() {
    let mut engine = engine();
    let mut state = session(&[(2, 2), (2, 1), (2, 0)], Direction::Up, (4, 4));

    let outcome = engine.step(&mut state);

    assert_eq!(outcome, StepOutcome::Died(CollisionType::SelfCollision));
    assert!(!state.is_alive);
}

#[test]
fn reversal_request_keeps_heading() {
    let mut engine = engine();
    let mut state = session(&[(2, 2)], Direction::Right, (0, 4));

    assert!(!engine.set_direction(&mut state, Direction::Left));
    assert_eq!(state.direction(), Direction::Right);

    engine.step(&mut state);
    assert_eq!(state.snake.head(), Position::new(3, 2));
}

#[test]
fn dead_session_is_frozen() {
    let mut engine = engine();
    let mut state = session(&[(4, 2), (3, 2)], Direction::Right, (0, 0));
    engine.step(&mut state);
    let dead = state.clone();

    for dir in Direction::ALL {
        engine.set_direction(&mut state, dir);
        assert_eq!(engine.step(&mut state), StepOutcome::Idle);
    }

    assert_eq!(state, dead);
}

#[test]
fn seeded_engines_replay_identically() {
    let config = GameConfig {
        seed: Some(77),
        ..GameConfig::small()
    };
    let moves = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Down,
        Direction::Right,
    ];

    let play = || {
        let mut engine = GameEngine::new(config.clone());
        let mut state = engine.reset();
        let mut foods = vec![state.food];
        for round in 0..40 {
            engine.set_direction(&mut state, moves[round % moves.len()]);
            engine.step(&mut state);
            foods.push(state.food);
        }
        (state, foods)
    };

    assert_eq!(play(), play());
}

#[test]
fn eating_every_food_on_tiny_grid() {
    // 3x1 corridor: each meal is the only free cell ahead
    let mut engine = GameEngine::with_seed(GameConfig::new(3, 1), 3);
    let snake = Snake::from_cells(vec![Position::new(0, 0)], Direction::Right).unwrap();
    let mut state = GameState::new(snake, Position::new(1, 0), 3, 1);

    assert_eq!(engine.step(&mut state), StepOutcome::Grew);
    assert_eq!(state.food, Position::new(2, 0));
    assert_eq!(engine.step(&mut state), StepOutcome::Grew);
    assert_eq!(state.snake.len(), 3);
    assert_eq!(state.score, 2);
    assert_eq!(
        engine.step(&mut state),
        StepOutcome::Died(CollisionType::Wall)
    );
}
