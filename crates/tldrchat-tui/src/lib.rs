//! tldrchat-tui: Terminal UI for the tldrchat chat client
//!
//! This crate provides the interactive chat screen:
//! - Transcript with message bubbles and a typewriter reveal of each reply
//! - Input bar with history
//! - Header, sidebar, theme toggle and help overlay
//! - Transcript export

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod text;
mod theme;
mod ui;
mod widgets;

use screens::Screen as ScreenTrait;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use text::{CmarkRenderer, MarkdownRender};
pub use theme::Theme;
pub use tldrchat_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyCode, KeyEvent, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tldrchat_engine::{Config, ReplyError, ReplyRequest, ReplyService, RevealTicker};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Input polling period; also drives notification expiry and animations.
const TICK_RATE: Duration = Duration::from_millis(250);

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop and restores the terminal on
/// exit. Replies come from `service`; exports land in `export_dir`.
pub async fn run_tui(
    config: &Config,
    service: Arc<dyn ReplyService>,
    export_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, export_dir);
    let mut events = EventHandler::new(TICK_RATE);

    info!(endpoint = %config.endpoint, "tui started");
    let result = run_loop(&mut terminal, &mut app, &mut events, &service).await;

    terminal.show_cursor()?;
    info!(turns = app.session.store().len(), "tui stopped");
    result
}

/// Async work belonging to the send in flight.
#[derive(Default)]
struct InFlight {
    request: Option<JoinHandle<Result<String, ReplyError>>>,
    ticker: Option<RevealTicker>,
}

impl InFlight {
    fn dispatch(&mut self, service: &Arc<dyn ReplyService>, request: ReplyRequest) {
        let service = Arc::clone(service);
        self.request = Some(tokio::spawn(async move { service.fetch_reply(&request).await }));
    }

    fn abort(&mut self) {
        if let Some(handle) = self.request.take() {
            handle.abort();
        }
        self.ticker = None;
    }
}

/// Resolve with the request result; pending forever when none is out.
async fn next_reply(
    request: &mut Option<JoinHandle<Result<String, ReplyError>>>,
) -> Result<String, ReplyError> {
    match request {
        Some(handle) => match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(ReplyError::Interrupted(join_error.to_string())),
        },
        None => std::future::pending().await,
    }
}

/// Resolve on the next reveal tick; pending forever when not revealing.
async fn next_frame(ticker: &mut Option<RevealTicker>) {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => std::future::pending().await,
    }
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    service: &Arc<dyn ReplyService>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut in_flight = InFlight::default();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screens::chat::ChatScreen.render(app, area, frame.buffer_mut());
            if let Some(position) = screens::chat::ChatScreen::cursor_position(app, area) {
                frame.set_cursor_position(position);
            }
        })?;

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                if let Some(request) = handle_event(app, event) {
                    in_flight.dispatch(service, request);
                }
            }
            result = next_reply(&mut in_flight.request) => {
                in_flight.request = None;
                if app.apply_reply(result) {
                    in_flight.ticker = Some(RevealTicker::new(app.cadence()));
                }
            }
            () = next_frame(&mut in_flight.ticker) => {
                if !app.advance_reveal() {
                    debug!("reveal finished, releasing ticker");
                    in_flight.ticker = None;
                }
            }
        }

        if app.should_quit {
            in_flight.abort();
            break;
        }
    }

    Ok(())
}

/// Apply one terminal event. Returns a request when a send starts.
fn handle_event(app: &mut App, event: Event) -> Option<ReplyRequest> {
    match event {
        Event::Key(key) => {
            if app.show_help {
                // Any key closes help; Quit and Help keep their meaning
                let action = event::key_to_action(key, true);
                if matches!(action, Action::Quit | Action::Help) {
                    return app.handle_action(action);
                }
                app.show_help = false;
                return None;
            }
            if handle_input_key(app, key) {
                return None;
            }
            app.handle_action(event::key_to_action(key, app.input.is_empty()))
        }
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                _ => None,
            }
        }
        Event::Paste(text) => {
            // Single-line input: newlines become spaces
            app.input.insert_str(&text.replace(['\r', '\n'], " "));
            None
        }
        Event::Tick => {
            app.tick();
            None
        }
        Event::Resize(_, _) => None,
    }
}

/// Handle text-editing keys for the input bar.
/// Returns true if the key was consumed.
fn handle_input_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('w') => {
                app.input.delete_word();
                true
            }
            KeyCode::Char('u') => {
                app.input.clear();
                true
            }
            _ => false,
        };
    }

    match key.code {
        KeyCode::Char('?') if app.input.is_empty() => false,
        KeyCode::Char(c) => {
            app.input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            true
        }
        KeyCode::Delete => {
            app.input.delete();
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::End => {
            app.input.move_end();
            true
        }
        // History recall starts only from an empty box
        KeyCode::Up if app.input.is_empty() || app.input.is_browsing_history() => {
            app.input.history_prev();
            true
        }
        KeyCode::Down if app.input.is_browsing_history() => {
            app.input.history_next();
            true
        }
        _ => false,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
