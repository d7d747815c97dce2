use std::collections::HashSet;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameEvent, GameState, Position, Snake},
};

/// What a single call to [`GameEngine::step`] did. Exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Head moved one cell, length unchanged
    Moved,
    /// Head moved onto the food; the snake grew by one and food was replaced
    Grew,
    /// The move was fatal; the session is now terminal
    Died(CollisionType),
    /// Session was already dead, nothing changed
    Idle,
}

impl StepOutcome {
    pub fn ate_food(self) -> bool {
        self == StepOutcome::Grew
    }

    /// Whether the session is dead after this step
    pub fn terminated(self) -> bool {
        matches!(self, StepOutcome::Died(_) | StepOutcome::Idle)
    }

    pub fn collision(self) -> Option<CollisionType> {
        match self {
            StepOutcome::Died(collision) => Some(collision),
            _ => None,
        }
    }
}

/// Advances game sessions. Food placement draws from the injected `R`, so a
/// seeded engine replays the same game for the same inputs.
pub struct GameEngine<R = Pcg32> {
    config: GameConfig,
    rng: R,
    seed: Option<u64>,
}

impl GameEngine<Pcg32> {
    /// Create an engine seeded from `config.seed`, or from a fresh random
    /// seed that is logged so the run can be reproduced.
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("Food placement seed: {seed}");
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            seed: Some(seed),
        }
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine around any random source
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            seed: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the engine was built from, if it was built from one
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Build a fresh session: the snake sits on the grid centre heading
    /// right, with its body trailing to the left.
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self
            .spawn_food(&snake, self.config.grid_width, self.config.grid_height)
            .unwrap_or_else(|| {
                warn!("No free cell for the first food; placing it on the tail");
                snake.tail()
            });

        let mut state =
            GameState::new(snake, food, self.config.grid_width, self.config.grid_height);
        state.events.push(GameEvent::Started);
        state
    }

    /// Request a new heading. An exact reversal is ignored, and so is any
    /// request on a dead session. Returns whether the heading changed.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if !state.is_alive || state.snake.direction.is_opposite(direction) {
            return false;
        }
        let changed = state.snake.direction != direction;
        state.snake.direction = direction;
        changed
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepOutcome {
        if !state.is_alive {
            return StepOutcome::Idle;
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(collision) = Self::check_collision(state, new_head) {
            state.is_alive = false;
            state.steps += 1;
            state.events.push(GameEvent::Died(collision));
            debug!(
                "Snake {collision} at {new_head} after {} steps, score {}",
                state.steps, state.score
            );
            return StepOutcome::Died(collision);
        }

        state.steps += 1;

        if new_head == state.food {
            state.snake.advance(new_head, true);
            state.score += 1;
            state.events.push(GameEvent::Ate {
                at: new_head,
                score: state.score,
            });

            match self.spawn_food(&state.snake, state.grid_width, state.grid_height) {
                Some(food) => state.food = food,
                None => warn!("Snake fills the grid; no cell left for food"),
            }
            debug!("Ate food at {new_head}, length now {}", state.snake.len());
            return StepOutcome::Grew;
        }

        state.snake.advance(new_head, false);
        StepOutcome::Moved
    }

    /// Wall first, then the full pre-move body. The tail cell still counts
    /// even though it would be vacated by this move.
    fn check_collision(state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a cell uniformly among those the snake does not occupy, using a
    /// single draw. `None` when the snake covers the whole grid.
    pub fn spawn_food(&mut self, snake: &Snake, width: usize, height: usize) -> Option<Position> {
        let occupied: HashSet<Position> = snake
            .body
            .iter()
            .copied()
            .filter(|p| {
                p.x >= 0 && p.y >= 0 && (p.x as usize) < width && (p.y as usize) < height
            })
            .collect();

        let free = (width * height).checked_sub(occupied.len())?;
        if free == 0 {
            return None;
        }

        let pick = self.rng.random_range(0..free);
        (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Position::new(x, y)))
            .filter(|p| !occupied.contains(p))
            .nth(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::small(), 42)
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.direction(), Direction::Right);
        assert!(!state.snake.occupies(state.food));
        assert_eq!(state.events.latest(), Some(&GameEvent::Started));
    }

    #[test]
    fn test_same_seed_same_food() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 99);
        let mut b = GameEngine::with_seed(GameConfig::default(), 99);
        assert_eq!(a.reset().food, b.reset().food);
        assert_eq!(a.seed(), Some(99));
    }

    #[test]
    fn test_injected_rng() {
        use rand::rngs::StdRng;

        let mut engine = GameEngine::with_rng(GameConfig::small(), StdRng::seed_from_u64(3));
        let state = engine.reset();

        assert_eq!(engine.seed(), None);
        assert!(state.is_in_bounds(state.food));
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = engine.reset();
        let initial_head = state.snake.head();
        let initial_len = state.snake.len();
        state.food = Position::new(0, 0);

        let outcome = engine.step(&mut state);

        assert_eq!(outcome, StepOutcome::Moved);
        assert!(!outcome.terminated());
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.head(), initial_head.moved_by(1, 0));
        assert_eq!(state.snake.len(), initial_len);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = engine.reset();

        let head = state.snake.head();
        state.food = head.moved_in_direction(state.snake.direction);
        let initial_length = state.snake.len();

        let outcome = engine.step(&mut state);

        assert!(outcome.ate_food());
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(!state.snake.occupies(state.food));
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Position::new(5, 5),
            10,
            10,
        );
        let body_before = state.snake.body.clone();

        let outcome = engine.step(&mut state);

        assert_eq!(outcome, StepOutcome::Died(CollisionType::Wall));
        assert!(!state.is_alive);
        assert_eq!(state.snake.body, body_before);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();

        // Body: (5,5), (4,5), (3,5), (2,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        // (6,5), (5,5), (4,5), (3,5)
        engine.step(&mut state);
        engine.set_direction(&mut state, Direction::Down);
        // (6,6), (6,5), (5,5), (4,5)
        engine.step(&mut state);
        engine.set_direction(&mut state, Direction::Left);
        // (5,6), (6,6), (6,5), (5,5)
        engine.step(&mut state);
        engine.set_direction(&mut state, Direction::Up);
        let outcome = engine.step(&mut state);

        assert_eq!(outcome.collision(), Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_moving_into_vacating_tail_is_fatal() {
        let mut engine = engine();
        // A 2x2 loop: head (1,0), then (1,1), (0,1), tail (0,0). Moving left
        // puts the head where the tail is right now.
        let snake = Snake::from_cells(
            vec![
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
                Position::new(0, 0),
            ],
            Direction::Left,
        )
        .unwrap();
        let mut state = GameState::new(snake, Position::new(5, 5), 10, 10);

        let outcome = engine.step(&mut state);

        assert_eq!(outcome, StepOutcome::Died(CollisionType::SelfCollision));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(0, 0),
            10,
            10,
        );

        assert!(!engine.set_direction(&mut state, Direction::Left));
        assert_eq!(state.direction(), Direction::Right);

        assert!(engine.set_direction(&mut state, Direction::Up));
        assert_eq!(state.direction(), Direction::Up);

        assert!(!engine.set_direction(&mut state, Direction::Up));
    }

    #[test]
    fn test_set_direction_ignored_when_dead() {
        let engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 1),
            Position::new(0, 0),
            10,
            10,
        );
        state.is_alive = false;

        assert!(!engine.set_direction(&mut state, Direction::Up));
        assert_eq!(state.direction(), Direction::Right);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.is_alive = false;
        let before = state.clone();

        let outcome = engine.step(&mut state);

        assert_eq!(outcome, StepOutcome::Idle);
        assert!(outcome.terminated());
        assert_eq!(state, before);
    }

    #[test]
    fn test_spawn_food_takes_only_free_cell() {
        let mut engine = engine();
        // 2x2 grid, snake covers three cells
        let snake = Snake::from_cells(
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
            Direction::Down,
        )
        .unwrap();

        for _ in 0..10 {
            assert_eq!(engine.spawn_food(&snake, 2, 2), Some(Position::new(0, 1)));
        }
    }

    #[test]
    fn test_spawn_food_is_uniform_over_free_cells() {
        use std::collections::HashMap;

        // 3x3 grid, snake along the top row leaves six free cells
        let snake = Snake::from_cells(
            vec![Position::new(2, 0), Position::new(1, 0), Position::new(0, 0)],
            Direction::Right,
        )
        .unwrap();
        let draws = 6000;

        for seed in [1, 42, 2024] {
            let mut engine = GameEngine::with_seed(GameConfig::new(3, 3), seed);
            let mut counts: HashMap<Position, usize> = HashMap::new();
            for _ in 0..draws {
                let food = engine.spawn_food(&snake, 3, 3).unwrap();
                assert!(!snake.occupies(food));
                *counts.entry(food).or_default() += 1;
            }

            assert_eq!(counts.len(), 6, "every free cell should be picked");
            let expected = draws / 6;
            for (cell, count) in &counts {
                assert!(
                    count.abs_diff(expected) < expected / 5,
                    "seed {seed}: {cell} picked {count} times, expected about {expected}"
                );
            }
        }
    }

    #[test]
    fn test_spawn_food_on_full_grid() {
        let mut engine = engine();
        let snake = Snake::from_cells(
            vec![Position::new(0, 0), Position::new(1, 0)],
            Direction::Left,
        )
        .unwrap();

        assert_eq!(engine.spawn_food(&snake, 2, 1), None);
    }

    #[test]
    fn test_filling_the_grid_keeps_food_in_place() {
        let mut engine = engine();
        let snake = Snake::from_cells(vec![Position::new(0, 0)], Direction::Right).unwrap();
        let mut state = GameState::new(snake, Position::new(1, 0), 2, 1);

        let outcome = engine.step(&mut state);

        assert_eq!(outcome, StepOutcome::Grew);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.food, Position::new(1, 0));

        // Nowhere left to go
        assert_eq!(
            engine.step(&mut state),
            StepOutcome::Died(CollisionType::Wall)
        );
    }

    #[test]
    fn test_events_record_growth_and_death() {
        let mut engine = engine();
        let snake = Snake::from_cells(vec![Position::new(8, 0)], Direction::Right).unwrap();
        let mut state = GameState::new(snake, Position::new(9, 0), 10, 10);

        engine.step(&mut state);
        engine.step(&mut state);

        let events: Vec<GameEvent> = state.events.iter().copied().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::Ate {
                    at: Position::new(9, 0),
                    score: 1
                },
                GameEvent::Died(CollisionType::Wall),
            ]
        );
    }
}
