//! Byte-range splicing.

use std::ops::Range;

/// Replace `range` of the original source with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

impl Edit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }
}

/// Apply non-overlapping edits expressed in original-source offsets.
///
/// Edits are applied from the end of the file towards the start so earlier
/// offsets stay valid.
pub(crate) fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
    let mut out = source.to_string();
    let mut floor = usize::MAX;
    for edit in edits {
        debug_assert!(edit.range.end <= floor, "overlapping edits: {edit:?}");
        floor = edit.range.start;
        out.replace_range(edit.range, &edit.text);
    }
    out
}

/// Byte offset of the start of the line containing `pos`.
pub(crate) fn line_start(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Byte offset of the line terminator after `pos` (before `\r\n` if CRLF).
pub(crate) fn line_end(source: &str, pos: usize) -> usize {
    let end = source[pos..].find('\n').map_or(source.len(), |i| pos + i);
    if end > 0 && source.as_bytes()[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

/// Leading whitespace of the line containing `pos`.
pub(crate) fn indent_at(source: &str, pos: usize) -> &str {
    let start = line_start(source, pos);
    let line = &source[start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// True when only whitespace precedes `pos` on its line.
pub(crate) fn starts_line(source: &str, pos: usize) -> bool {
    source[line_start(source, pos)..pos]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

/// The file's line terminator.
pub(crate) fn newline(source: &str) -> &'static str {
    if source.contains("\r\n") { "\r\n" } else { "\n" }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn applies_back_to_front() {
        let source = "class Foo(BotAI):\n    pass\n";
        let edits = vec![
            Edit::replace(10..15, "AresBot"),
            Edit::insert(18, "    x = 1\n"),
        ];
        assert_eq!(
            apply(source, edits),
            "class Foo(AresBot):\n    x = 1\n    pass\n"
        );
    }

    #[test]
    fn line_helpers() {
        let source = "a\r\n    b = 1\r\n";
        let pos = source.find('b').unwrap();
        assert_eq!(indent_at(source, pos), "    ");
        assert!(starts_line(source, pos));
        assert_eq!(line_end(source, pos), source.len() - 2);
        assert_eq!(newline(source), "\r\n");
    }
}
