//! Screen definitions for the tldrchat TUI.

pub mod chat;

use crate::app::App;
use crate::theme::Theme;
use crate::ui::centered_fixed;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

const HELP_TEXT: &str = "
  Chat
    Enter             Send message
    Up / Down         Recall sent messages
    PgUp / PgDn       Scroll transcript

  View
    Ctrl+T            Toggle light/dark theme
    Ctrl+B            Toggle chat list
    Ctrl+E            Export transcript

    F1 or ?           Toggle this help
    Esc / Ctrl+C      Quit

  [Press any key to close]
";

/// Render the help overlay.
pub fn render_help_overlay(theme: &Theme, area: Rect, buf: &mut Buffer) {
    let width = 50.min(area.width.saturating_sub(4));
    let height = 18.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().fg(theme.text).bg(theme.overlay));

    Paragraph::new(HELP_TEXT)
        .block(block)
        .render(overlay_area, buf);
}
