use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::store::Store;

use super::app::{Controller, Outcome};
use super::input::from_key_event;
use super::render::draw;

/// How long to wait for input before checking the scheduled return.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Take over the terminal, process keys one at a time until the user quits,
/// and restore the terminal on every exit path.
pub fn run_app<S: Store>(controller: &mut Controller<S>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let result = event_loop(&mut terminal, controller);

    cleanup_terminal(&mut terminal)?;
    result
}

fn event_loop<S: Store>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    controller: &mut Controller<S>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal
                .draw(|frame| draw(frame, controller.state()))
                .context("failed to draw frame")?;
            dirty = false;
        }

        let mut outcome = Outcome::Ignored;
        if event::poll(POLL_INTERVAL).context("event polling failed")? {
            match event::read().context("failed to read event")? {
                Event::Key(key_event) => {
                    outcome = controller.handle_key(from_key_event(&key_event));
                }
                Event::Resize(_, _) => outcome = Outcome::Repaint,
                _ => {}
            }
        }

        if outcome == Outcome::Ignored {
            outcome = controller.tick(Instant::now());
        }

        match outcome {
            Outcome::Quit => {
                info!("session ended by user");
                return Ok(());
            }
            Outcome::Repaint => dirty = true,
            Outcome::Ignored => {}
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
