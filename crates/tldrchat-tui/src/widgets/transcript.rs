//! Conversation transcript: committed turns as bubbles, then the partial
//! reply (or the typing indicator) while a send is in flight.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use tldrchat_engine::{ChatSession, Message, Role};

use crate::text::{wrap_lines, MarkdownRender};
use crate::theme::Theme;

/// Text shown while waiting for the first visible reply character.
pub const TYPING_TEXT: &str = "🤖 Typing";

/// Hint shown on an empty conversation.
pub const EMPTY_HINT: &str = "Ask anything to get started.";

const TYPING_DOTS: [&str; 4] = ["   ", ".  ", ".. ", "..."];

/// Filled in by a render: the scroll limit for the drawn viewport.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptState {
    /// Largest useful `scroll_from_bottom`.
    pub max_scroll: usize,
}

/// Scrollable transcript widget.
pub struct TranscriptView<'a> {
    session: &'a ChatSession,
    theme: &'a Theme,
    renderer: &'a dyn MarkdownRender,
    scroll_from_bottom: usize,
    tick: usize,
}

impl<'a> TranscriptView<'a> {
    pub fn new(
        session: &'a ChatSession,
        theme: &'a Theme,
        renderer: &'a dyn MarkdownRender,
    ) -> Self {
        Self {
            session,
            theme,
            renderer,
            scroll_from_bottom: 0,
            tick: 0,
        }
    }

    /// Lines scrolled up from the newest content. Zero follows the bottom.
    #[must_use]
    pub fn scroll_from_bottom(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }

    /// Animation frame for the typing indicator.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// All transcript lines for a viewport `width` cells wide.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width);
        let mut lines = Vec::new();

        for message in self.session.store() {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(self.message_lines(message, width));
        }

        if let Some(partial) = self.session.transient().filter(|t| !t.is_empty()) {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(self.bubble(Role::Bot, partial, self.bot_style(), width));
        }

        if self.session.show_typing_indicator() {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            let dots = TYPING_DOTS[self.tick % TYPING_DOTS.len()];
            lines.push(Line::from(Span::styled(
                format!("{TYPING_TEXT}{dots}"),
                Style::default()
                    .fg(self.theme.subtext)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        lines
    }

    fn message_lines(&self, message: &Message, width: usize) -> Vec<Line<'static>> {
        let style = match message.role() {
            Role::User => Style::default()
                .fg(self.theme.user_text)
                .bg(self.theme.user_bubble),
            Role::Bot if message.is_server_error() => Style::default()
                .fg(self.theme.error)
                .bg(self.theme.bot_bubble),
            Role::Bot => self.bot_style(),
        };
        self.bubble(message.role(), message.text(), style, width)
    }

    fn bot_style(&self) -> Style {
        Style::default().fg(self.theme.text).bg(self.theme.bot_bubble)
    }

    /// A role label followed by the rendered text on a padded background.
    fn bubble(&self, role: Role, text: &str, style: Style, width: usize) -> Vec<Line<'static>> {
        let alignment = match role {
            Role::User => Alignment::Right,
            Role::Bot => Alignment::Left,
        };
        // Bubbles take at most three quarters of the row, one cell of padding each side
        let max_bubble = (width * 3 / 4).max(8).min(width);
        let inner_width = max_bubble.saturating_sub(2).max(1);

        let body = wrap_lines(self.renderer.render(text, self.theme), inner_width);
        let fill = body.iter().map(Line::width).max().unwrap_or(0);

        let mut lines = vec![Line::from(Span::styled(
            role.label(),
            Style::default().fg(self.theme.muted),
        ))
        .alignment(alignment)];

        let body = if body.is_empty() { vec![Line::default()] } else { body };
        for line in body {
            let pad = fill.saturating_sub(line.width());
            let mut spans = Vec::with_capacity(line.spans.len() + 3);
            spans.push(Span::raw(" "));
            spans.extend(line.spans);
            spans.push(Span::raw(" ".repeat(pad + 1)));
            lines.push(Line::from(spans).style(style).alignment(alignment));
        }
        lines
    }
}

impl StatefulWidget for TranscriptView<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        state.max_scroll = 0;
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.session.store().is_empty() && !self.session.in_flight() {
            let y = area.y + area.height / 2;
            let hint = Line::from(Span::styled(EMPTY_HINT, Style::default().fg(self.theme.muted)))
                .alignment(Alignment::Center);
            Paragraph::new(hint).render(Rect::new(area.x, y, area.width, 1), buf);
            return;
        }

        let lines = self.lines(area.width);
        let height = usize::from(area.height);
        let max_top = lines.len().saturating_sub(height);
        let top = max_top - self.scroll_from_bottom.min(max_top);
        state.max_scroll = max_top;

        let visible: Vec<Line<'static>> = lines.into_iter().skip(top).take(height).collect();
        Paragraph::new(visible).render(area, buf);
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        StatefulWidget::render(self, area, buf, &mut TranscriptState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use ratatui::style::Color;

    /// Renders text verbatim, one line per input line.
    struct PlainRenderer;

    impl MarkdownRender for PlainRenderer {
        fn render(&self, text: &str, _theme: &Theme) -> Vec<Line<'static>> {
            text.lines().map(|l| Line::from(l.to_string())).collect()
        }
    }

    fn session_with(turns: &[(&str, &str)]) -> ChatSession {
        let mut session = ChatSession::new();
        for (question, answer) in turns {
            let mut input = (*question).to_string();
            session.begin_send(&mut input);
            session.complete_request(Ok((*answer).to_string()));
            while !matches!(session.advance_reveal(), tldrchat_engine::RevealStep::Completed(_)) {}
        }
        session
    }

    fn render(view: TranscriptView<'_>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        Widget::render(view, area, &mut buf);
        buffer_to_string(&buf)
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_empty_session_shows_hint() {
        let session = ChatSession::new();
        let theme = Theme::default();
        let out = render(TranscriptView::new(&session, &theme, &PlainRenderer), 40, 5);
        assert!(out.contains(EMPTY_HINT));
    }

    #[test]
    fn test_bubbles_in_order_with_labels() {
        let session = session_with(&[("Hello", "Hi there")]);
        let theme = Theme::default();
        let view = TranscriptView::new(&session, &theme, &PlainRenderer);

        let lines = view.lines(40);
        assert_eq!(
            plain(&lines),
            vec!["You", " Hello ", "", "Bot", " Hi there "]
        );
        assert_eq!(lines[1].alignment, Some(Alignment::Right));
        assert_eq!(lines[4].alignment, Some(Alignment::Left));
        assert_eq!(lines[1].style.bg, Some(theme.user_bubble));
        assert_eq!(lines[4].style.bg, Some(theme.bot_bubble));
    }

    #[test]
    fn test_user_bubble_right_aligned_on_screen() {
        let session = session_with(&[("Hello", "Hi there")]);
        let theme = Theme::default();
        let out = render(TranscriptView::new(&session, &theme, &PlainRenderer), 30, 6);
        let rows: Vec<&str> = out.lines().collect();
        assert_eq!(rows[0], format!("{}You", " ".repeat(27)));
        assert_eq!(rows[1], format!("{} Hello", " ".repeat(23)));
        assert_eq!(rows[3], "Bot");
        assert_eq!(rows[4], " Hi there");
    }

    #[test]
    fn test_multiline_bubble_is_padded_to_a_block() {
        let session = session_with(&[("q", "short\na longer line")]);
        let theme = Theme::default();
        let lines = TranscriptView::new(&session, &theme, &PlainRenderer).lines(60);
        let bubble: Vec<usize> = lines[4..].iter().map(Line::width).collect();
        assert_eq!(bubble, vec![15, 15]);
    }

    #[test]
    fn test_server_error_uses_error_color() {
        let mut session = ChatSession::new();
        let mut input = "Ping".to_string();
        session.begin_send(&mut input);
        session.complete_request(Err(tldrchat_engine::ReplyError::Status(500)));

        let theme = Theme::default();
        let lines = TranscriptView::new(&session, &theme, &PlainRenderer).lines(60);
        let last = lines.last().unwrap();
        assert_eq!(last.style.fg, Some(theme.error));
        assert!(plain(&lines).last().unwrap().contains("Server error"));
    }

    #[test]
    fn test_typing_indicator_while_waiting() {
        let mut session = ChatSession::new();
        let mut input = "Hello".to_string();
        session.begin_send(&mut input);

        let theme = Theme::default();
        let lines = TranscriptView::new(&session, &theme, &PlainRenderer)
            .tick(3)
            .lines(40);
        assert_eq!(plain(&lines).last().unwrap(), "🤖 Typing...");
    }

    #[test]
    fn test_partial_reply_replaces_indicator() {
        let mut session = ChatSession::new();
        let mut input = "Hello".to_string();
        session.begin_send(&mut input);
        session.complete_request(Ok("Hi there".into()));
        for _ in 0..4 {
            session.advance_reveal();
        }
        assert_eq!(session.transient(), Some("Hi "));

        let theme = Theme::default();
        let lines = TranscriptView::new(&session, &theme, &PlainRenderer).lines(40);
        let text = plain(&lines);
        assert_eq!(text.last().unwrap(), " Hi  ");
        assert!(!text.iter().any(|l| l.starts_with(TYPING_TEXT)));
    }

    #[test]
    fn test_renderer_is_used_for_message_bodies() {
        struct Shouting;
        impl MarkdownRender for Shouting {
            fn render(&self, text: &str, _theme: &Theme) -> Vec<Line<'static>> {
                vec![Line::from(text.to_uppercase())]
            }
        }

        let session = session_with(&[("hello", "hi")]);
        let theme = Theme::default();
        let lines = TranscriptView::new(&session, &theme, &Shouting).lines(40);
        assert_eq!(plain(&lines)[1], " HELLO ");
        assert_eq!(plain(&lines)[4], " HI ");
    }

    #[test]
    fn test_follows_bottom_and_scrolls_back() {
        let session = session_with(&[("one", "1"), ("two", "2"), ("three", "3")]);
        let theme = Theme::default();

        let bottom = render(TranscriptView::new(&session, &theme, &PlainRenderer), 30, 3);
        assert!(bottom.contains(" 3"));
        assert!(!bottom.contains("one"));

        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        let mut state = TranscriptState::default();
        StatefulWidget::render(
            TranscriptView::new(&session, &theme, &PlainRenderer),
            area,
            &mut buf,
            &mut state,
        );
        // Six bubbles of two lines, five blank separators
        assert_eq!(state.max_scroll, 17 - 3);

        let view = TranscriptView::new(&session, &theme, &PlainRenderer);
        let top = render(view.scroll_from_bottom(state.max_scroll + 10), 30, 3);
        assert!(top.contains("one"));
    }

    #[test]
    fn test_render_formats_each_message_once() {
        struct Counting(std::cell::Cell<usize>);

        impl MarkdownRender for Counting {
            fn render(&self, text: &str, _theme: &Theme) -> Vec<Line<'static>> {
                self.0.set(self.0.get() + 1);
                vec![Line::from(text.to_string())]
            }
        }

        let session = session_with(&[("one", "1"), ("two", "2")]);
        let theme = Theme::default();
        let renderer = Counting(std::cell::Cell::new(0));
        let area = Rect::new(0, 0, 30, 3);
        let mut state = TranscriptState::default();

        StatefulWidget::render(
            TranscriptView::new(&session, &theme, &renderer),
            area,
            &mut Buffer::empty(area),
            &mut state,
        );

        assert_eq!(renderer.0.get(), 4);
        assert!(state.max_scroll > 0);
    }

    #[test]
    fn test_long_reply_wraps_inside_bubble() {
        let session = session_with(&[("q", "alpha beta gamma delta")]);
        let theme = Theme::default();
        // 24 columns: bubble at most 18 wide, 16 of text
        let lines = TranscriptView::new(&session, &theme, &PlainRenderer).lines(24);
        let body = &plain(&lines)[4..];
        assert_eq!(
            body,
            &[" alpha beta gamma ".to_string(), format!(" delta{}", " ".repeat(12))]
        );
        assert!(lines.iter().all(|l| l.width() <= 24));
        assert!(matches!(lines[4].style.bg, Some(Color::Rgb(..))));
    }
}
