//! Plain-text helpers behind the editor surface

use std::ops::Range;

/// Number of newline-separated lines; empty text still has one line
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Rows the line-number gutter shows
pub fn gutter_len(line_count: usize, min_rows: usize) -> usize {
    line_count.max(min_rows)
}

/// Gutter content: `1..=rows`, one right-aligned number per line
pub fn gutter_text(rows: usize) -> String {
    let width = rows.to_string().len();
    (1..=rows)
        .map(|n| format!("{:>width$}", n))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the selected char range with `width` spaces.
///
/// Returns the char index the cursor should land on.
pub fn insert_indent(text: &mut String, selection: Range<usize>, width: usize) -> usize {
    let start = byte_offset(text, selection.start);
    let end = byte_offset(text, selection.end.max(selection.start));
    text.replace_range(start..end, &" ".repeat(width));
    selection.start + width
}

/// Convert CRLF and lone CR line endings to LF
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
