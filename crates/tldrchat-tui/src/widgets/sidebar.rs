//! Conversation list panel.
//!
//! The entries are fixed placeholders; selecting one does nothing yet.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::text::truncate_to_width;
use crate::theme::Theme;

/// Titles listed in the sidebar.
pub const SIDEBAR_ENTRIES: [&str; 3] = [
    "Futuristic AI Chat UI",
    "Chatbot Integration Tutorial",
    "Patna Metro Job Updates",
];

pub struct Sidebar<'a> {
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface));
        let inner = block.inner(area);
        block.render(area, buf);

        // "💬 " takes three cells, plus one leading space
        let room = usize::from(inner.width).saturating_sub(4);
        let mut lines = vec![
            Line::from(Span::styled(
                " Chats",
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];
        lines.extend(SIDEBAR_ENTRIES.iter().map(|entry| {
            Line::from(vec![
                Span::raw(" 💬 "),
                Span::styled(
                    truncate_to_width(entry, room),
                    Style::default().fg(self.theme.text),
                ),
            ])
        }));
        Paragraph::new(lines).render(inner, buf);

        if inner.height > 4 {
            let hint = Line::from(Span::styled(
                " ^B to close",
                Style::default().fg(self.theme.muted),
            ));
            let y = inner.bottom() - 1;
            hint.render(Rect::new(inner.x, y, inner.width, 1), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(width: u16, height: u16) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        Sidebar::new(&theme).render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_lists_all_entries() {
        let out = render(36, 10);
        for entry in SIDEBAR_ENTRIES {
            assert!(out.contains(entry), "missing {entry}");
        }
        assert!(out.contains("^B to close"));
    }

    #[test]
    fn test_narrow_sidebar_truncates() {
        let out = render(16, 10);
        assert!(out.contains("Futuristic"));
        assert!(out.contains('…'));
        assert!(!out.contains("Futuristic AI Chat UI"));
    }
}
