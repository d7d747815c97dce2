use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use std::io;
use std::time::Duration;
use tokio::time::interval;

use super::terminal::{Tui, restore_terminal, setup_terminal};
use crate::game::{Direction, GameConfig, GameEngine, GameState, StepOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::{PlayStyle, Renderer};

/// Timer-driven play: the game advances on every tick and the keyboard steers
pub struct RealTimeMode {
    engine: GameEngine,
    state: GameState,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_interval: Duration,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl RealTimeMode {
    pub fn new(config: GameConfig) -> Self {
        let tick_interval = Duration::from_millis(config.tick_interval_ms);
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(PlayStyle::RealTime),
            input_handler: InputHandler::new(),
            tick_interval,
            should_quit: false,
            pending_direction: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_game_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick_interval);

        // Render at ~30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    self.handle_stream_item(maybe_event)?;
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// A read error ends the game loop with that error; a closed stream quits
    fn handle_stream_item(&mut self, item: Option<io::Result<Event>>) -> Result<()> {
        match item {
            Some(Ok(event)) => self.handle_event(event),
            Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
            None => self.should_quit = true,
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            // Latest press wins; it is checked against the heading at tick time
            KeyAction::Turn(dir) => self.pending_direction = Some(dir),
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Advance | KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        if !self.state.is_alive {
            return;
        }

        if let Some(dir) = self.pending_direction.take() {
            self.engine.set_direction(&mut self.state, dir);
        }

        if let StepOutcome::Died(collision) = self.engine.step(&mut self.state) {
            info!(
                "Game over: snake {collision}, score {}, length {}",
                self.state.score,
                self.state.snake.len()
            );
            self.metrics
                .on_game_over(self.state.score, self.state.snake.len());
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
    }
}
