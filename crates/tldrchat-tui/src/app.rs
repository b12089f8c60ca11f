//! Application state for the tldrchat TUI.

use std::cell::Cell;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tldrchat_engine::{
    ChatSession, Config, ReplyError, ReplyRequest, RequestOutcome, RevealStep, SendDecision,
    SessionState, ThemeName,
};
use tracing::{info, warn};

use crate::event::Action;
use crate::text::{CmarkRenderer, MarkdownRender};
use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Lines moved per PgUp/PgDn.
const SCROLL_PAGE: usize = 10;

/// Ticks a notification stays visible (~3 seconds at 4 Hz).
const NOTIFICATION_TICKS: usize = 12;

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,

    /// Conversation and send lifecycle.
    pub session: ChatSession,

    /// Text input state for the message box.
    pub input: TextInputState,

    pub theme_name: ThemeName,
    pub theme: Theme,
    pub sidebar_open: bool,

    /// Lines scrolled up from the bottom of the transcript. Zero follows.
    pub scroll_from_bottom: usize,

    /// Largest useful scroll offset, recorded on each draw.
    max_scroll: Cell<usize>,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Pause between reveal frames.
    cadence: Duration,

    /// Where transcript exports are written.
    export_dir: PathBuf,

    renderer: Box<dyn MarkdownRender>,
}

impl App {
    /// Create the app from configuration.
    pub fn new(config: &Config, export_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            session: ChatSession::new(),
            input: TextInputState::new(),
            theme_name: config.theme,
            theme: Theme::for_name(config.theme),
            sidebar_open: config.sidebar_open,
            scroll_from_bottom: 0,
            max_scroll: Cell::new(0),
            tick: 0,
            notification: None,
            notification_ttl: 0,
            cadence: config.reveal_interval(),
            export_dir,
            renderer: Box::new(CmarkRenderer),
        }
    }

    /// Replace the markdown renderer used for message bodies.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn MarkdownRender>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn renderer(&self) -> &dyn MarkdownRender {
        self.renderer.as_ref()
    }

    /// Pause between reveal frames.
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Handle an action. Returns a request to dispatch when a send starts.
    pub fn handle_action(&mut self, action: Action) -> Option<ReplyRequest> {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return None;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return None;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return None;
        }

        match action {
            Action::Send => return self.submit(),
            Action::ToggleTheme => self.toggle_theme(),
            Action::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            Action::Export => self.export_transcript(),
            Action::ScrollUp => self.scroll_up(),
            Action::ScrollDown => self.scroll_down(),
            Action::Quit | Action::Help | Action::None => {}
        }
        None
    }

    /// Start a send from the input box.
    pub fn submit(&mut self) -> Option<ReplyRequest> {
        let mut text = self.input.content().to_string();
        match self.session.begin_send(&mut text) {
            SendDecision::Dispatch(request) => {
                self.input.submit();
                self.follow();
                Some(request)
            }
            SendDecision::Busy => {
                self.set_notification("Still answering the last message".to_string());
                None
            }
            SendDecision::Ignored => None,
        }
    }

    /// Apply the result of the dispatched request.
    ///
    /// Returns true when a reveal started and frames should be ticked.
    /// A manual scroll position is left alone.
    pub fn apply_reply(&mut self, result: Result<String, ReplyError>) -> bool {
        let outcome = self.session.complete_request(result);
        matches!(outcome, RequestOutcome::Revealing)
    }

    /// Show the next reveal frame. Returns true while more frames remain.
    ///
    /// The view keeps following only while it is already at the bottom.
    pub fn advance_reveal(&mut self) -> bool {
        let step = self.session.advance_reveal();
        matches!(step, RevealStep::Frame(_))
    }

    /// Short label for the current send state.
    pub fn state_label(&self) -> &'static str {
        match self.session.state() {
            SessionState::Idle => "READY",
            SessionState::Waiting => "WAITING",
            SessionState::Revealing => "TYPING",
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_name = self.theme_name.toggled();
        self.theme = Theme::for_name(self.theme_name);
    }

    /// Record the scroll limit for the current viewport.
    pub fn set_max_scroll(&self, max: usize) {
        self.max_scroll.set(max);
    }

    fn scroll_up(&mut self) {
        self.scroll_from_bottom =
            (self.scroll_from_bottom + SCROLL_PAGE).min(self.max_scroll.get());
    }

    fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(SCROLL_PAGE);
    }

    /// Scroll back to the newest content.
    fn follow(&mut self) {
        self.scroll_from_bottom = 0;
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// The committed conversation as markdown.
    pub fn transcript_markdown(&self, exported_at: &str) -> String {
        let mut content = String::from("# SmartChatTLDR AI Transcript\n\n");
        let _ = writeln!(content, "Exported: {exported_at}\n");
        content.push_str("---\n");

        for message in self.session.store() {
            let _ = write!(content, "\n### {}\n\n{}\n", message.role().label(), message.text());
        }
        content
    }

    /// Export the transcript to `<export_dir>/transcript-<timestamp>.md`.
    pub fn export_transcript(&mut self) {
        let now = chrono::Local::now();
        let content = self.transcript_markdown(&now.format("%Y-%m-%d %H:%M:%S").to_string());
        let path = self
            .export_dir
            .join(format!("transcript-{}.md", now.format("%Y%m%d-%H%M%S")));

        let result = std::fs::create_dir_all(&self.export_dir)
            .and_then(|()| std::fs::write(&path, content));
        match result {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    turns = self.session.store().len(),
                    "transcript exported"
                );
                self.set_notification(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "transcript export failed");
                self.set_notification(format!("Export failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
impl App {
    /// App with default config, exporting into the working directory.
    pub fn new_for_test() -> Self {
        Self::new(&Config::default(), PathBuf::from(".tldrchat"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tldrchat_engine::{Message, SERVER_ERROR_TEXT};

    fn type_text(app: &mut App, text: &str) {
        app.input.insert_str(text);
    }

    fn finish_reveal(app: &mut App) {
        while app.advance_reveal() {}
    }

    #[test]
    fn test_new_uses_config() {
        let config = Config {
            theme: ThemeName::Light,
            sidebar_open: true,
            reveal_interval_ms: 35,
            ..Config::default()
        };
        let app = App::new(&config, PathBuf::from("out"));
        assert_eq!(app.theme_name, ThemeName::Light);
        assert_eq!(app.theme, Theme::latte());
        assert!(app.sidebar_open);
        assert_eq!(app.cadence(), Duration::from_millis(35));
        assert_eq!(app.export_dir(), Path::new("out"));
    }

    #[test]
    fn test_with_renderer_replaces_markdown_renderer() {
        struct Shouting;

        impl MarkdownRender for Shouting {
            fn render(&self, text: &str, _theme: &Theme) -> Vec<ratatui::text::Line<'static>> {
                vec![ratatui::text::Line::from(text.to_uppercase())]
            }
        }

        let app = App::new_for_test().with_renderer(Box::new(Shouting));
        let lines = app.renderer().render("**hi**", &app.theme);
        assert_eq!(lines, vec![ratatui::text::Line::from("**HI**")]);
    }

    #[test]
    fn test_send_dispatches_raw_text_and_clears_input() {
        let mut app = App::new_for_test();
        type_text(&mut app, " Hello ");

        let request = app.handle_action(Action::Send);
        assert_eq!(request, Some(ReplyRequest::new(" Hello ")));
        assert!(app.input.is_empty());
        assert_eq!(app.session.store().messages(), &[Message::user(" Hello ")]);
        assert_eq!(app.state_label(), "WAITING");
    }

    #[test]
    fn test_blank_send_is_ignored() {
        let mut app = App::new_for_test();
        type_text(&mut app, "   ");
        assert_eq!(app.handle_action(Action::Send), None);
        assert!(app.session.store().is_empty());
        assert_eq!(app.input.content(), "   ");
    }

    #[test]
    fn test_send_while_busy_keeps_input() {
        let mut app = App::new_for_test();
        type_text(&mut app, "first");
        app.submit();

        type_text(&mut app, "second");
        assert_eq!(app.submit(), None);
        assert_eq!(app.input.content(), "second");
        assert_eq!(app.session.store().len(), 1);
        assert!(app.notification.is_some());
    }

    #[test]
    fn test_reply_reveals_then_commits() {
        let mut app = App::new_for_test();
        type_text(&mut app, "Hello");
        app.submit();

        assert!(app.apply_reply(Ok("Hi there".into())));
        assert_eq!(app.state_label(), "TYPING");
        let mut frames = 0;
        while app.advance_reveal() {
            frames += 1;
        }
        // Eight partial frames, then the final one
        assert_eq!(frames, 8);
        assert_eq!(app.session.store().last(), Some(&Message::bot("Hi there")));
        assert_eq!(app.state_label(), "READY");
    }

    #[test]
    fn test_failed_reply_commits_error_turn() {
        let mut app = App::new_for_test();
        type_text(&mut app, "Ping");
        app.submit();

        assert!(!app.apply_reply(Err(ReplyError::Timeout)));
        assert_eq!(app.session.store().last().map(Message::text), Some(SERVER_ERROR_TEXT));
        assert!(!app.advance_reveal());
    }

    #[test]
    fn test_scroll_pages_and_send_returns_to_bottom() {
        let mut app = App::new_for_test();
        app.set_max_scroll(25);
        app.handle_action(Action::ScrollUp);
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.scroll_from_bottom, 20);
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.scroll_from_bottom, 25);
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.scroll_from_bottom, 15);

        type_text(&mut app, "Hello");
        app.submit();
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn test_manual_scroll_survives_reveal_frames() {
        let mut app = App::new_for_test();
        type_text(&mut app, "Hello");
        app.submit();
        app.apply_reply(Ok("Hi there".into()));
        app.set_max_scroll(25);
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.scroll_from_bottom, 10);

        assert!(app.advance_reveal());
        assert_eq!(app.scroll_from_bottom, 10);
        finish_reveal(&mut app);
        assert_eq!(app.scroll_from_bottom, 10);

        // Back at the bottom, following resumes
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.scroll_from_bottom, 0);
        type_text(&mut app, "Again");
        app.submit();
        app.apply_reply(Ok("ok".into()));
        finish_reveal(&mut app);
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn test_failed_reply_keeps_manual_scroll() {
        let mut app = App::new_for_test();
        type_text(&mut app, "Ping");
        app.submit();
        app.set_max_scroll(25);
        app.handle_action(Action::ScrollUp);

        assert!(!app.apply_reply(Err(ReplyError::Timeout)));
        assert_eq!(app.scroll_from_bottom, 10);
    }

    #[test]
    fn test_toggles() {
        let mut app = App::new_for_test();
        app.handle_action(Action::ToggleTheme);
        assert_eq!(app.theme_name, ThemeName::Light);
        assert_eq!(app.theme, Theme::latte());

        app.handle_action(Action::ToggleSidebar);
        assert!(app.sidebar_open);
        app.handle_action(Action::ToggleSidebar);
        assert!(!app.sidebar_open);
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Help);
        assert!(app.show_help);

        // Quit first closes help
        app.handle_action(Action::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        // Any other action also closes help without acting
        app.handle_action(Action::Help);
        app.handle_action(Action::ToggleTheme);
        assert!(!app.show_help);
        assert_eq!(app.theme_name, ThemeName::Dark);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_notification_expires() {
        let mut app = App::new_for_test();
        app.set_notification("hello".into());
        for _ in 0..NOTIFICATION_TICKS - 1 {
            app.tick();
        }
        assert!(app.notification.is_some());
        app.tick();
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_transcript_markdown() {
        let mut app = App::new_for_test();
        type_text(&mut app, "Hello");
        app.submit();
        app.apply_reply(Ok("Hi **there**".into()));
        finish_reveal(&mut app);

        insta::assert_snapshot!(app.transcript_markdown("2026-01-02 03:04:05"), @r"
        # SmartChatTLDR AI Transcript

        Exported: 2026-01-02 03:04:05

        ---

        ### You

        Hello

        ### Bot

        Hi **there**
        ");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("exports");
        let mut app = App::new(&Config::default(), export_dir.clone());
        type_text(&mut app, "Ping");
        app.submit();
        app.apply_reply(Err(ReplyError::Status(503)));

        app.handle_action(Action::Export);

        let files: Vec<_> = std::fs::read_dir(&export_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("transcript-") && name.ends_with(".md"));

        let content = std::fs::read_to_string(&files[0]).unwrap();
        assert!(content.contains("### You\n\nPing"));
        assert!(content.contains(SERVER_ERROR_TEXT));
        assert!(app.notification.as_deref().unwrap().starts_with("Exported to"));
    }
}
