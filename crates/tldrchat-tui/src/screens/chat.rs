//! The chat screen: header, optional sidebar, transcript, input and
//! status bar.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, StatefulWidget, Widget, Wrap},
};

use super::{render_help_overlay, Screen};
use crate::app::App;
use crate::ui::{chat_layout, MIN_HEIGHT, MIN_WIDTH};
use crate::widgets::{
    Header, InputBar, Sidebar, StatusBar, TranscriptState, TranscriptView, CHAT_HINTS,
};

/// Main (and only) screen.
pub struct ChatScreen;

impl ChatScreen {
    /// Where the terminal cursor belongs, if the input is on screen.
    pub fn cursor_position(app: &App, area: Rect) -> Option<Position> {
        if too_small(area) || app.show_help {
            return None;
        }
        let layout = chat_layout(area, app.sidebar_open);
        Some(InputBar::new(&app.input, &app.theme).cursor_position(layout.input))
    }
}

fn too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let theme = &app.theme;
        buf.set_style(area, Style::default().fg(theme.text).bg(theme.base));

        if too_small(area) {
            Paragraph::new(Line::from(format!(
                "Terminal too small. Resize to at least {MIN_WIDTH}x{MIN_HEIGHT}."
            )))
            .wrap(Wrap { trim: true })
            .render(area, buf);
            return;
        }

        let layout = chat_layout(area, app.sidebar_open);

        Header::new(theme, app.theme_name).render(layout.header, buf);

        if let Some(sidebar) = layout.sidebar {
            Sidebar::new(theme).render(sidebar, buf);
        }

        let mut transcript_state = TranscriptState::default();
        let transcript = TranscriptView::new(&app.session, theme, app.renderer())
            .scroll_from_bottom(app.scroll_from_bottom)
            .tick(app.tick);
        StatefulWidget::render(transcript, layout.transcript, buf, &mut transcript_state);
        app.set_max_scroll(transcript_state.max_scroll);

        InputBar::new(&app.input, theme)
            .busy(app.session.in_flight())
            .render(layout.input, buf);

        StatusBar::new(theme, app.state_label())
            .hints(&CHAT_HINTS)
            .right(app.notification.as_deref())
            .render(layout.status, buf);

        if app.show_help {
            render_help_overlay(theme, area, buf);
        }
    }
}
