/// Line scanner for f-string candidates
///
/// This module splits file content into numbered lines and picks out the ones
/// containing an f-string opening marker. Detection is a plain substring test,
/// so a marker inside a comment or an unrelated string still yields a candidate.

use serde::Serialize;

/// Token sequences that open an f-string literal
pub const MARKERS: [&str; 2] = ["f\"", "f'"];

/// A single line of the scanned file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    /// 1-based line number
    pub number: usize,
    /// Raw line text without its line terminator
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Line text with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Split content into numbered lines
///
/// Accepts both `\n` and `\r\n` terminators. Empty content yields no lines.
pub fn scan_lines(content: &str) -> Vec<SourceLine> {
    content
        .lines()
        .enumerate()
        .map(|(index, text)| SourceLine::new(index + 1, text))
        .collect()
}

/// Whether the text contains any f-string marker
pub fn is_candidate(text: &str) -> bool {
    MARKERS.iter().any(|marker| text.contains(marker))
}

/// Count marker occurrences across both quote styles
pub fn count_markers(text: &str) -> usize {
    MARKERS
        .iter()
        .map(|marker| text.matches(marker).count())
        .sum()
}

/// Byte offsets of the f-string literals actually opened on a line
///
/// Unlike the substring test this walks the code: string contents and a
/// trailing `#` comment are skipped, and an `f` that ends an identifier
/// (`pdf"`, `['conf']`) does not open a literal.
pub fn literal_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((index, c)) = chars.next() {
        match c {
            '#' => break,
            '"' | '\'' => {
                skip_string(&mut chars, c, false);
                prev = Some(c);
                continue;
            }
            'f' if !prev.map_or(false, is_identifier_char) => {
                if let Some(&(_, quote)) = chars.peek() {
                    if quote == '"' || quote == '\'' {
                        chars.next();
                        starts.push(index);
                        skip_string(&mut chars, quote, true);
                        prev = Some(quote);
                        continue;
                    }
                }
            }
            _ => {}
        }
        prev = Some(c);
    }

    starts
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Advance past the closing quote; inside an f-string a quote within braces does not close it
fn skip_string<I>(chars: &mut I, quote: char, interpolated: bool)
where
    I: Iterator<Item = (usize, char)>,
{
    let mut depth = 0usize;
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' if interpolated => depth += 1,
            '}' if interpolated => depth = depth.saturating_sub(1),
            c if c == quote && depth == 0 => return,
            _ => {}
        }
    }
}

/// Ordered subset of lines that contain a marker
pub fn find_candidates(lines: &[SourceLine]) -> Vec<SourceLine> {
    lines
        .iter()
        .filter(|line| is_candidate(&line.text))
        .cloned()
        .collect()
}
