//! Wrapping of styled lines.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Wrap each line to at most `width` cells, keeping span styles.
///
/// Line-level style and alignment carry over to every fragment.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if line.width() <= width {
        return vec![line];
    }

    let styled: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain: String = styled.iter().map(|(ch, _)| ch).collect();

    let mut fragments = Vec::new();
    let mut pos = 0;
    for piece in textwrap::wrap(&plain, width) {
        // textwrap drops the whitespace it breaks on
        while pos < styled.len()
            && !piece.starts_with(styled[pos].0)
            && styled[pos].0.is_whitespace()
        {
            pos += 1;
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        for _ in piece.chars() {
            let Some(&(ch, style)) = styled.get(pos) else {
                break;
            };
            pos += 1;
            match spans.last_mut() {
                Some(last) if last.style == style => last.content.to_mut().push(ch),
                _ => spans.push(Span::styled(ch.to_string(), style)),
            }
        }

        let mut fragment = Line::from(spans).style(line.style);
        fragment.alignment = line.alignment;
        fragments.push(fragment);
    }

    if fragments.is_empty() {
        fragments.push(Line::default().style(line.style));
    }
    fragments
}
