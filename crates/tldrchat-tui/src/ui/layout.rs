//! Layout helpers for the chat screen.
//!
//! ```text
//! ┌ header ───────────────────────────────┐
//! │ sidebar │ transcript                  │
//! │         ├─────────────────────────────┤
//! │         │ input                       │
//! └ status bar ───────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Minimum terminal width for the full layout.
pub const MIN_WIDTH: u16 = 30;
/// Minimum terminal height for the full layout.
pub const MIN_HEIGHT: u16 = 8;

/// Preferred sidebar width when open.
pub const SIDEBAR_WIDTH: u16 = 30;

/// Height of the bordered input box.
const INPUT_HEIGHT: u16 = 3;

/// Regions of the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Split `area` into chat regions.
///
/// The sidebar never takes more than half the width.
pub fn chat_layout(area: Rect, sidebar_open: bool) -> ChatLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    let (header, body, status) = (rows[0], rows[1], rows[2]);

    let (sidebar, main) = if sidebar_open {
        let width = SIDEBAR_WIDTH.min(body.width / 2);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(width), Constraint::Min(1)])
            .split(body);
        (Some(cols[0]), cols[1])
    } else {
        (None, body)
    };

    let main_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(INPUT_HEIGHT)])
        .split(main);

    ChatLayout {
        header,
        sidebar,
        transcript: main_rows[0],
        input: main_rows[1],
        status,
    }
}

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
