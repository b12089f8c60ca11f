//! Single-line message input.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::theme::Theme;

/// Placeholder shown while the input is empty.
pub const PLACEHOLDER: &str = "Ask anything...";

const PROMPT: &str = "> ";

/// Editable input text with a cursor and submit history.
///
/// The cursor is a char index, never a byte offset, so multi-byte input
/// edits cleanly.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    cursor: usize,
    history: Vec<String>,
    /// Position while browsing history, counted back from the newest entry.
    history_index: Option<usize>,
    /// Draft stashed when history browsing starts.
    saved_input: String,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete back to the start of the previous word.
    pub fn delete_word(&mut self) {
        let chars: Vec<char> = self.content.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let (from, to) = (self.byte_index(start), self.byte_index(self.cursor));
        self.content.replace_range(from..to, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the content, recording it in history if it has any text.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// True while a recalled history entry is in the box.
    pub fn is_browsing_history(&self) -> bool {
        self.history_index.is_some()
    }

    /// Step back to an older history entry.
    pub fn history_prev(&mut self) {
        let next = self.history_index.map_or(0, |i| i + 1);
        if next >= self.history.len() {
            return;
        }
        if self.history_index.is_none() {
            self.saved_input = std::mem::take(&mut self.content);
        }
        self.history_index = Some(next);
        self.content = self.history[self.history.len() - 1 - next].clone();
        self.move_end();
    }

    /// Step forward to a newer entry, ending at the stashed draft.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => return,
            Some(0) => {
                self.history_index = None;
                self.content = std::mem::take(&mut self.saved_input);
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.content = self.history[self.history.len() - i].clone();
            }
        }
        self.move_end();
    }

    /// Visible tail of the content for `width` cells, and the cursor column.
    ///
    /// Scrolls horizontally so the cursor stays inside the window.
    fn window(&self, width: usize) -> (String, usize) {
        let chars: Vec<char> = self.content.chars().collect();
        let cell = |ch: &char| ch.width().unwrap_or(0);

        let mut start = 0;
        let mut before: usize = chars[..self.cursor].iter().map(cell).sum();
        while start < self.cursor && before >= width {
            before -= cell(&chars[start]);
            start += 1;
        }
        (chars[start..].iter().collect(), before)
    }
}

/// Bordered input box.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    busy: bool,
}

impl<'a> InputBar<'a> {
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            busy: false,
        }
    }

    /// Dim the border while a send is in flight.
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    fn block(&self) -> Block<'static> {
        let (border, title) = if self.busy {
            (self.theme.border, " Message (waiting for reply) ")
        } else {
            (self.theme.border_focused, " Message ")
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(title, Style::default().fg(self.theme.subtext)))
    }

    fn text_width(inner: Rect) -> usize {
        usize::from(inner.width).saturating_sub(PROMPT.len())
    }

    /// Terminal cursor position for `area`.
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner = self.block().inner(area);
        let (_, column) = self.input.window(Self::text_width(inner));
        let column = u16::try_from(column + PROMPT.len()).unwrap_or(u16::MAX);
        let max_x = inner.right().saturating_sub(1);
        Position::new((inner.x + column).min(max_x), inner.y)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let prompt = Span::styled(PROMPT, Style::default().fg(self.theme.primary));
        let line = if self.input.is_empty() {
            Line::from(vec![
                prompt,
                Span::styled(
                    PLACEHOLDER,
                    Style::default()
                        .fg(self.theme.muted)
                        .add_modifier(Modifier::ITALIC),
                ),
            ])
        } else {
            let (visible, _) = self.input.window(Self::text_width(inner));
            Line::from(vec![
                prompt,
                Span::styled(visible, Style::default().fg(self.theme.text)),
            ])
        };
        Paragraph::new(line).render(inner, buf);
    }
}
