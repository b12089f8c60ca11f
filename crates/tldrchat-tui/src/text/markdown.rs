//! Markdown rendering using pulldown-cmark.
//!
//! Bot replies are markdown. The transcript does not call the parser
//! directly; it goes through the [`MarkdownRender`] trait so the renderer
//! can be swapped (or stubbed in tests).

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::theme::Theme;

use super::styles::MarkdownStyles;

/// Turns message text into styled lines.
pub trait MarkdownRender {
    /// Render `text`. The result carries no trailing blank lines.
    fn render(&self, text: &str, theme: &Theme) -> Vec<Line<'static>>;
}

/// [`MarkdownRender`] backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkRenderer;

impl MarkdownRender for CmarkRenderer {
    fn render(&self, text: &str, theme: &Theme) -> Vec<Line<'static>> {
        render_markdown(text, theme)
    }
}

/// Render markdown text to styled ratatui Lines.
///
/// Partial input (an unterminated `**` mid-reveal, say) is fine: the parser
/// treats it as literal text until the closing marker arrives.
pub fn render_markdown(input: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = MarkdownRenderer::new(MarkdownStyles::from_theme(theme));
    renderer.run(Parser::new_ext(input, options));
    renderer.lines
}

struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    styles: MarkdownStyles,
    /// Active inline styles, innermost last.
    style_stack: Vec<Style>,
    current_spans: Vec<Span<'static>>,
    /// One entry per open list: the next number, or `None` for bullets.
    list_stack: Vec<Option<u64>>,
    in_code_block: bool,
    quote_depth: usize,
    pending_marker: Option<String>,
    task_checkbox: Option<bool>,
}

impl MarkdownRenderer {
    fn new(styles: MarkdownStyles) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            list_stack: Vec::new(),
            in_code_block: false,
            quote_depth: 0,
            pending_marker: None,
            task_checkbox: None,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => self.start_block(),
            Event::End(TagEnd::Paragraph) => self.flush_line(),

            Event::Start(Tag::Heading { level, .. }) => {
                self.start_block();
                let style = self.heading_style(level);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
            }

            Event::Start(Tag::Emphasis) => self.style_stack.push(self.styles.emphasis),
            Event::Start(Tag::Strong) => self.style_stack.push(self.styles.strong),
            Event::Start(Tag::Strikethrough) => self.style_stack.push(self.styles.strikethrough),
            Event::Start(Tag::Link { .. }) => self.style_stack.push(self.styles.link),
            Event::End(
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link,
            ) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.start_block();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
            }

            Event::Start(Tag::List(start)) => {
                if self.list_stack.is_empty() {
                    self.start_block();
                } else {
                    self.flush_line();
                }
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.list_stack.pop();
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                self.pending_marker = Some(self.next_marker());
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
                self.task_checkbox = None;
            }
            Event::TaskListMarker(checked) => self.task_checkbox = Some(checked),

            Event::Start(Tag::BlockQuote) => {
                self.start_block();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }

            Event::Rule => {
                self.start_block();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(16), self.styles.rule)));
            }

            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                self.prepare_line();
                self.current_spans
                    .push(Span::styled(code.to_string(), self.styles.code));
            }
            Event::SoftBreak => self.add_text(" "),
            Event::HardBreak => self.flush_line(),

            Event::Start(
                Tag::Image { .. }
                | Tag::Table(_)
                | Tag::TableHead
                | Tag::TableRow
                | Tag::TableCell
                | Tag::FootnoteDefinition(_)
                | Tag::MetadataBlock(_)
                | Tag::HtmlBlock,
            )
            | Event::End(
                TagEnd::Image
                | TagEnd::Table
                | TagEnd::TableHead
                | TagEnd::TableRow
                | TagEnd::TableCell
                | TagEnd::FootnoteDefinition
                | TagEnd::MetadataBlock(_)
                | TagEnd::HtmlBlock,
            )
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_) => {}
        }
    }

    /// Separate top-level blocks with one blank line.
    fn start_block(&mut self) {
        self.flush_line();
        let nested = !self.list_stack.is_empty() || self.quote_depth > 0;
        if !nested && self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn next_marker(&mut self) -> String {
        let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
        match self.list_stack.last_mut() {
            Some(Some(number)) => {
                let marker = format!("{indent}{number}. ");
                *number += 1;
                marker
            }
            _ => format!("{indent}• "),
        }
    }

    /// Emit quote bars and any pending list marker at the start of a line.
    fn prepare_line(&mut self) {
        if self.current_spans.is_empty() && self.quote_depth > 0 {
            self.current_spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                self.styles.blockquote,
            ));
        }
        if let Some(marker) = self.pending_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.list_marker));
            if let Some(checked) = self.task_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(Span::styled(checkbox, self.styles.list_marker));
            }
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.prepare_line();
                self.current_spans
                    .push(Span::styled(format!("  {line}"), self.styles.code_block));
                self.flush_line();
            }
            return;
        }

        self.prepare_line();
        let mut style = if self.quote_depth > 0 {
            self.styles.blockquote
        } else {
            Style::default()
        };
        for s in &self.style_stack {
            style = style.patch(*s);
        }
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.styles.h1,
            HeadingLevel::H2 => self.styles.h2,
            _ => self.styles.h3,
        }
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }
}
