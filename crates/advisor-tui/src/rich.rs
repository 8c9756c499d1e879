//! Conversion of parsed message markup into ratatui lines, plus word wrapping.

use advisor_core::markup::{LineKind, RichText, SegmentStyle};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Styled lines for a message body. `base` applies to every span.
pub fn rich_lines(text: &RichText, base: Style) -> Vec<Line<'static>> {
    text.lines
        .iter()
        .map(|line| {
            let mut spans = Vec::with_capacity(line.segments.len() + 1);
            let mut line_style = base;
            match &line.kind {
                LineKind::Text => {}
                LineKind::Heading => {
                    line_style = line_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                LineKind::ListItem { marker, depth } => {
                    spans.push(Span::styled(
                        format!("{}{} ", "  ".repeat(*depth), marker),
                        base.fg(Color::Cyan),
                    ));
                }
            }
            spans.extend(
                line.segments
                    .iter()
                    .map(|segment| Span::styled(segment.text.clone(), segment_style(line_style, segment.style))),
            );
            Line::from(spans)
        })
        .collect()
}

fn segment_style(base: Style, style: SegmentStyle) -> Style {
    let mut out = base;
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.code {
        out = out.fg(Color::Yellow);
    }
    out
}

/// Greedy word wrap of styled lines to `width` terminal columns.
///
/// Words wider than a row are split between characters.
pub fn wrap_lines(lines: &[Line<'static>], width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in lines {
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut row_width = 0;

        for span in &line.spans {
            for word in span.content.split_inclusive(' ') {
                let word_width = word.width();
                if row_width + word_width > width && row_width > 0 {
                    rows.push(Line::from(std::mem::take(&mut row)));
                    row_width = 0;
                    if word.trim().is_empty() {
                        continue;
                    }
                }
                if word_width <= width {
                    row_width += word_width;
                    row.push(Span::styled(word.to_string(), span.style));
                    continue;
                }

                let mut piece = String::new();
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if row_width + ch_width > width && row_width > 0 {
                        if !piece.is_empty() {
                            row.push(Span::styled(std::mem::take(&mut piece), span.style));
                        }
                        rows.push(Line::from(std::mem::take(&mut row)));
                        row_width = 0;
                    }
                    piece.push(ch);
                    row_width += ch_width;
                }
                if !piece.is_empty() {
                    row.push(Span::styled(piece, span.style));
                }
            }
        }
        rows.push(Line::from(row));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_styles_follow_markup() {
        let text = RichText::parse("Try <b>breathing</b> and <code>notes</code>");
        let lines = rich_lines(&text, Style::default());

        assert_eq!(lines.len(), 1);
        let bold = lines[0].spans.iter().find(|s| s.content == "breathing").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        let code = lines[0].spans.iter().find(|s| s.content == "notes").unwrap();
        assert_eq!(code.style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_list_items_get_markers() {
        let text = RichText::parse("<ul><li>rest</li><li>walk</li></ul>");
        let lines = rich_lines(&text, Style::default());

        assert_eq!(text_of(&lines[0]), "• rest");
        assert_eq!(text_of(&lines[1]), "• walk");
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        let lines = vec![Line::from("the quick brown fox")];
        let rows = wrap_lines(&lines, 10);

        let texts: Vec<_> = rows.iter().map(text_of).collect();
        assert_eq!(texts, vec!["the quick ", "brown fox"]);
    }

    #[test]
    fn test_wrap_splits_long_words_and_keeps_empty_lines() {
        let lines = vec![Line::from("abcdefghij"), Line::from("")];
        let rows = wrap_lines(&lines, 4);

        let texts: Vec<_> = rows.iter().map(text_of).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij", ""]);
    }

    #[test]
    fn test_wrap_counts_wide_glyphs_as_two_columns() {
        let lines = vec![Line::from("你好你好你好你好")];
        let rows = wrap_lines(&lines, 10);

        assert!(rows.iter().all(|row| row.width() <= 10));
        let texts: Vec<_> = rows.iter().map(text_of).collect();
        assert_eq!(texts, vec!["你好你好你", "好你好"]);
    }

    #[test]
    fn test_wrap_breaks_words_by_display_width() {
        let lines = vec![Line::from("ok 日本語です")];
        let rows = wrap_lines(&lines, 6);

        assert!(rows.iter().all(|row| row.width() <= 6));
        assert_eq!(rows.iter().map(text_of).collect::<String>(), "ok 日本語です");
    }
}
