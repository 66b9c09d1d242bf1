//! Terminal User Interface for askframe.
//!
//! Provides the main TUI application loop using ratatui and crossterm. One
//! question is in flight at a time: while it is, the loop keeps drawing and
//! draining key events so Esc can cancel it.

pub mod app;
mod events;
mod ui;
pub mod widgets;

pub use app::{Action, App, Entry};
pub use events::{Event, EventHandler};

use crate::app::Session;
use crate::error::{AskError, Result};
use crate::output::Output;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Self::setup_terminal()?,
            event_handler: EventHandler::new(),
        })
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| AskError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| AskError::internal(format!("Failed to enter alternate screen: {e}")))?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| AskError::internal(format!("Failed to create terminal: {e}")))
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| AskError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| AskError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| AskError::internal(format!("Failed to show cursor: {e}")))
    }

    fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| AskError::internal(format!("Failed to draw: {e}")))?;
        Ok(())
    }

    /// Runs the event loop until the user quits.
    pub async fn run(&mut self, session: &mut Session, load_output: Output) -> Result<()> {
        // Restore the terminal before the default hook prints the panic.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let dataset_name = session.dataset().map(|d| d.name().to_string());
        let mut app = App::new(dataset_name.as_deref(), load_output);

        let result = self.run_event_loop(&mut app, session).await;

        let _ = panic::take_hook();
        result
    }

    async fn run_event_loop(&mut self, app: &mut App, session: &mut Session) -> Result<()> {
        while app.running {
            self.draw(app)?;
            let event = self.event_handler.next()?;
            if let Action::Submit(question) = app.handle_event(event) {
                self.answer(app, session, question).await?;
            }
        }
        Ok(())
    }

    /// Runs one question while keeping the UI live.
    async fn answer(&mut self, app: &mut App, session: &mut Session, question: String) -> Result<()> {
        let cancel = CancellationToken::new();
        app.begin_request(&question);

        let pending = session.ask(&question, cancel.clone());
        tokio::pin!(pending);

        loop {
            self.draw(app)?;
            tokio::select! {
                output = &mut pending => {
                    app.finish_request(output);
                    return Ok(());
                }
                _ = tokio::time::sleep(self.event_handler.tick_rate()) => {
                    while let Some(event) = self.event_handler.try_next()? {
                        match app.handle_event(event) {
                            Action::Cancel => {
                                debug!("Cancelling in-flight question");
                                cancel.cancel();
                            }
                            Action::Quit => {
                                info!("Quit requested while a question was in flight");
                                cancel.cancel();
                            }
                            Action::Submit(_) | Action::None => {}
                        }
                    }
                }
            }
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the TUI over an already-prepared session.
pub async fn run(session: &mut Session, load_output: Output) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.run(session, load_output).await
}
