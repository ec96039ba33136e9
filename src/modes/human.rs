use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval, sleep};

use crate::game::{Game, GameConfig, GameError};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Interactive keyboard session in the terminal
pub struct HumanMode {
    game: Game,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    game_over_delay: Duration,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, game_over_delay: Duration) -> Result<Self> {
        let game = Game::new(config).context("Failed to start game")?;

        Ok(Self {
            game,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            game_over_delay,
            should_quit: false,
        })
    }

    /// Play until the game ends or the player quits. Returns the final score.
    pub async fn run(&mut self) -> Result<u32> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result.map(|_| self.game.score())
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        let tick_interval = Duration::from_millis(self.game.config().tick_interval_ms());
        let mut tick_timer = interval(tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the player sees
        // the starting position for one full tick
        tick_timer.tick().await;

        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, terminal)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game(terminal).await?;
                }

                // Handle Ctrl+C
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

    fn handle_event(&mut self, event: Event, terminal: &mut Tui) -> Result<()> {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Steer(direction) => self.game.set_direction_intent(direction),
                    KeyAction::Quit => {
                        info!("player quit with score {}", self.game.score());
                        self.should_quit = true;
                    }
                    KeyAction::None => {}
                }
            }
            Event::Resize(_, _) => self.draw(terminal)?,
            _ => {}
        }

        Ok(())
    }

    async fn update_game(&mut self, terminal: &mut Tui) -> Result<()> {
        match self.game.advance() {
            Ok(result) => {
                self.draw(terminal)?;

                if result.terminated {
                    info!(
                        "game over ({:?}) after {} ticks, score {}",
                        result.collision,
                        self.game.ticks(),
                        result.score
                    );
                    // The final frame stays up for a moment before exiting
                    sleep(self.game_over_delay).await;
                    self.should_quit = true;
                }
            }
            Err(GameError::AlreadyTerminated) => {
                warn!("tick after game over ignored");
                self.should_quit = true;
            }
            Err(err) => return Err(err).context("Failed to advance game"),
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Tui) -> Result<()> {
        self.metrics.update(self.game.ticks());
        let state = self.game.state();
        let metrics = &self.metrics;
        let renderer = &self.renderer;

        terminal
            .draw(|frame| renderer.render(frame, state, metrics))
            .context("Failed to draw frame")?;

        Ok(())
    }

    fn cleanup_terminal(&mut self, terminal: &mut Tui) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
