//! Title bar.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use tldrchat_engine::ThemeName;

use crate::theme::Theme;

/// Application title.
pub const TITLE: &str = "🤖 SmartChatTLDR AI";

/// One-row header: title on the left, active theme on the right.
pub struct Header<'a> {
    theme: &'a Theme,
    theme_name: ThemeName,
}

impl<'a> Header<'a> {
    pub fn new(theme: &'a Theme, theme_name: ThemeName) -> Self {
        Self { theme, theme_name }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = Style::default().bg(self.theme.surface);
        buf.set_style(area, background);

        let title = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                TITLE,
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(title).style(background).render(area, buf);

        let icon = match self.theme_name {
            ThemeName::Dark => "☾",
            ThemeName::Light => "☀",
        };
        let indicator = Line::from(Span::styled(
            format!("{icon} {} ", self.theme_name.as_str()),
            Style::default().fg(self.theme.subtext),
        ))
        .alignment(Alignment::Right);
        indicator.render(area, buf);
    }
}
