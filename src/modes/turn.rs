//! Turn-based play: direction keys set the heading right away and the game
//! only moves when the player asks for a step.

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;

use super::terminal::{Tui, restore_terminal, setup_terminal};
use crate::game::{GameConfig, GameEngine, GameState, StepOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::{PlayStyle, Renderer};

pub struct TurnMode {
    engine: GameEngine,
    state: GameState,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl TurnMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(PlayStyle::TurnBased),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_event_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    // Nothing changes between key presses, so redraw only after input
    async fn run_event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        loop {
            self.metrics.update();
            terminal
                .draw(|frame| {
                    self.renderer.render(frame, &self.state, &self.metrics);
                })
                .context("Failed to draw frame")?;

            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
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

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }
            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(dir) => {
                self.engine.set_direction(&mut self.state, dir);
            }
            KeyAction::Advance => self.advance(),
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn advance(&mut self) {
        if let StepOutcome::Died(collision) = self.engine.step(&mut self.state) {
            info!(
                "Game over after {} steps: snake {collision}, score {}",
                self.state.steps, self.state.score
            );
            self.metrics
                .on_game_over(self.state.score, self.state.snake.len());
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
    }
}
