//! Bottom status bar: send state, key hints and a right-aligned message.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::text::visual_width;
use crate::theme::Theme;

/// A key hint for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Hints shown on the chat screen.
pub const CHAT_HINTS: [KeyHint; 5] = [
    KeyHint::new("Enter", "send"),
    KeyHint::new("^T", "theme"),
    KeyHint::new("^B", "chats"),
    KeyHint::new("^E", "export"),
    KeyHint::new("F1", "help"),
];

pub struct StatusBar<'a> {
    theme: &'a Theme,
    mode: &'a str,
    hints: &'a [KeyHint],
    right_text: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a Theme, mode: &'a str) -> Self {
        Self {
            theme,
            mode,
            hints: &[],
            right_text: None,
        }
    }

    #[must_use]
    pub fn hints(mut self, hints: &'a [KeyHint]) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: Option<&'a str>) -> Self {
        self.right_text = text;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }
        let bar = Style::default().bg(self.theme.surface).fg(self.theme.subtext);
        buf.set_style(area, bar);

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Style::default()
                    .bg(self.theme.primary)
                    .fg(self.theme.base)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ];
        for hint in self.hints {
            spans.push(Span::styled(
                hint.key,
                Style::default()
                    .fg(self.theme.secondary)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(" {}  ", hint.label)));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // Drawn last so it covers any hints it overlaps
        if let Some(text) = self.right_text {
            let width = u16::try_from(visual_width(text) + 1).unwrap_or(u16::MAX);
            if width < area.width {
                let x = area.x + area.width - width;
                let style = Style::default().fg(self.theme.warning);
                buf.set_stringn(x, area.y, text, usize::from(width), style);
            }
        }
    }
}
