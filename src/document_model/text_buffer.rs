use crate::audio::{CueEvent, CueQueue};
use crate::error::{EditorError, Result};
use std::fmt;

/// A location in the document. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset of the character at `column`, or the line length past the end.
fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(index, _)| index)
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    tab_width: usize,
    modified: bool,
}

impl TextBuffer {
    pub fn new(tab_width: usize) -> Self {
        Self {
            lines: vec![String::new()],
            tab_width: tab_width.max(1),
            modified: false,
        }
    }

    /// Build a buffer from `\n` separated text. A trailing newline yields a
    /// trailing empty line, so `text()` round-trips exactly.
    pub fn from_text(text: &str, tab_width: usize) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            tab_width: tab_width.max(1),
            modified: false,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_at(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.line_at(row).map_or(0, |line| line.chars().count())
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.lines.len() && pos.column <= self.line_len(pos.row)
    }

    pub fn end_position(&self) -> Position {
        let row = self.lines.len() - 1;
        Position::new(row, self.line_len(row))
    }

    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line_at(pos.row)?.chars().nth(pos.column)
    }

    /// The position one character before `pos`, crossing line starts.
    pub fn previous_position(&self, pos: Position) -> Option<Position> {
        if pos.column > 0 {
            Some(Position::new(pos.row, pos.column - 1))
        } else if pos.row > 0 {
            Some(Position::new(pos.row - 1, self.line_len(pos.row - 1)))
        } else {
            None
        }
    }

    /// The position one character after `pos`, crossing line ends.
    pub fn next_position(&self, pos: Position) -> Option<Position> {
        if pos.column < self.line_len(pos.row) {
            Some(Position::new(pos.row, pos.column + 1))
        } else if pos.row + 1 < self.lines.len() {
            Some(Position::new(pos.row + 1, 0))
        } else {
            None
        }
    }

    /// Walk `count` characters forward from `pos`, newlines included.
    pub fn advance(&self, pos: Position, count: usize) -> Option<Position> {
        let mut pos = pos;
        for _ in 0..count {
            pos = self.next_position(pos)?;
        }
        Some(pos)
    }

    /// Insert `text` at `pos` and return the position just past it.
    pub fn insert(&mut self, pos: Position, text: &str, events: &mut CueQueue) -> Result<Position> {
        if !self.contains(pos) {
            return Err(EditorError::OutOfBounds { position: pos });
        }
        if text.is_empty() {
            return Ok(pos);
        }

        // Work out the echo before the line changes underneath us
        let mut chars = text.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };
        let completed_word = match single {
            Some(c) if c != '\n' && !is_word_char(c) => {
                let word = self.word_before(pos);
                (!word.is_empty()).then_some(word)
            }
            _ => None,
        };

        let at = byte_index(&self.lines[pos.row], pos.column);
        let line = &mut self.lines[pos.row];
        let tail = line.split_off(at);
        let mut parts = text.split('\n');
        let first = parts.next().unwrap_or_default();
        line.push_str(first);

        let mut new_pos = Position::new(pos.row, pos.column + first.chars().count());
        let mut row = pos.row;
        for part in parts {
            row += 1;
            self.lines.insert(row, part.to_string());
            new_pos = Position::new(row, part.chars().count());
        }
        self.lines[row].push_str(&tail);
        self.modified = true;

        let event = match single {
            Some('\n') => CueEvent::LineBroken {
                finished_line: self.lines[pos.row].clone(),
            },
            Some(ch) => CueEvent::CharacterTyped { ch, completed_word },
            None => CueEvent::TextInserted {
                text: text.to_string(),
            },
        };
        events.push(event);

        Ok(new_pos)
    }

    /// Remove the half-open range `[start, end)` and return what was removed.
    pub fn delete_range(
        &mut self,
        start: Position,
        end: Position,
        events: &mut CueQueue,
    ) -> Result<String> {
        if start > end || !self.contains(start) || !self.contains(end) {
            return Err(EditorError::InvalidRange { start, end });
        }
        if start == end {
            return Ok(String::new());
        }

        let removed = self.text_in_range(start, end);

        let head_end = byte_index(&self.lines[start.row], start.column);
        let tail_start = byte_index(&self.lines[end.row], end.column);
        let tail = self.lines[end.row][tail_start..].to_string();
        let line = &mut self.lines[start.row];
        line.truncate(head_end);
        line.push_str(&tail);
        if end.row > start.row {
            self.lines.drain(start.row + 1..=end.row);
        }
        self.modified = true;

        let mut chars = removed.chars();
        let event = match (chars.next(), chars.next()) {
            (Some('\n'), None) => CueEvent::LinesJoined { row: start.row },
            (Some(ch), None) => CueEvent::CharacterDeleted { ch },
            _ => CueEvent::TextDeleted {
                text: removed.clone(),
            },
        };
        events.push(event);

        Ok(removed)
    }

    fn text_in_range(&self, start: Position, end: Position) -> String {
        if start.row == end.row {
            let line = &self.lines[start.row];
            return line[byte_index(line, start.column)..byte_index(line, end.column)].to_string();
        }

        let first = &self.lines[start.row];
        let last = &self.lines[end.row];
        let mut text = first[byte_index(first, start.column)..].to_string();
        for line in &self.lines[start.row + 1..end.row] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(&last[..byte_index(last, end.column)]);
        text
    }

    /// The word touching or following `pos` on its line, or an empty string.
    pub fn word_at(&self, pos: Position) -> String {
        let Some(line) = self.line_at(pos.row) else {
            return String::new();
        };
        let chars: Vec<char> = line.chars().collect();
        let column = pos.column.min(chars.len());

        let mut start = if column < chars.len() && is_word_char(chars[column]) {
            column
        } else if column > 0 && is_word_char(chars[column - 1]) {
            column - 1
        } else {
            match chars[column..].iter().position(|c| is_word_char(*c)) {
                Some(offset) => column + offset,
                None => return String::new(),
            }
        };
        while start > 0 && is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let end = chars[start..]
            .iter()
            .position(|c| !is_word_char(*c))
            .map_or(chars.len(), |offset| start + offset);

        chars[start..end].iter().collect()
    }

    /// The run of word characters ending exactly at `pos`.
    pub fn word_before(&self, pos: Position) -> String {
        let Some(line) = self.line_at(pos.row) else {
            return String::new();
        };
        let chars: Vec<char> = line.chars().take(pos.column).collect();
        let start = chars
            .iter()
            .rposition(|c| !is_word_char(*c))
            .map_or(0, |index| index + 1);
        chars[start..].iter().collect()
    }

    /// Leading whitespace of `row` in tab-width units. A tab counts as a full unit.
    pub fn indent_level(&self, row: usize) -> usize {
        let width: usize = self
            .line_at(row)
            .unwrap_or_default()
            .chars()
            .map_while(|c| match c {
                ' ' => Some(1),
                '\t' => Some(self.tab_width),
                _ => None,
            })
            .sum();
        width / self.tab_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueTag;

    fn buffer(text: &str) -> TextBuffer {
        TextBuffer::from_text(text, 4)
    }

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buffer = TextBuffer::new(4);
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_at(0), Some(""));
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_insert_char_emits_character_typed() {
        let mut buffer = buffer("Hello World");
        let mut events = CueQueue::new();

        let pos = buffer.insert(Position::new(0, 5), ",", &mut events).unwrap();

        assert_eq!(pos, Position::new(0, 6));
        assert_eq!(buffer.text(), "Hello, World");
        assert_eq!(
            events.pop(),
            Some(CueEvent::CharacterTyped {
                ch: ',',
                completed_word: Some("Hello".to_string())
            })
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_insert_word_char_has_no_completed_word() {
        let mut buffer = buffer("ab");
        let mut events = CueQueue::new();

        buffer.insert(Position::new(0, 2), "c", &mut events).unwrap();

        assert_eq!(
            events.pop(),
            Some(CueEvent::CharacterTyped {
                ch: 'c',
                completed_word: None
            })
        );
    }

    #[test]
    fn test_insert_newline_splits_line() {
        let mut buffer = buffer("hello world");
        let mut events = CueQueue::new();

        let pos = buffer.insert(Position::new(0, 5), "\n", &mut events).unwrap();

        assert_eq!(pos, Position::new(1, 0));
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_at(0), Some("hello"));
        assert_eq!(buffer.line_at(1), Some(" world"));
        assert_eq!(
            events.pop(),
            Some(CueEvent::LineBroken {
                finished_line: "hello".to_string()
            })
        );
    }

    #[test]
    fn test_insert_multiline_text() {
        let mut buffer = buffer("ad");
        let mut events = CueQueue::new();

        let pos = buffer.insert(Position::new(0, 1), "b\nc\nx", &mut events).unwrap();

        assert_eq!(buffer.text(), "ab\nc\nxd");
        assert_eq!(pos, Position::new(2, 1));
        assert_eq!(events.pop().map(|e| e.tag()), Some(CueTag::TextInserted));
    }

    #[test]
    fn test_insert_out_of_bounds_is_rejected() {
        let mut buffer = buffer("abc");
        let mut events = CueQueue::new();

        let result = buffer.insert(Position::new(0, 4), "x", &mut events);
        assert_eq!(
            result,
            Err(EditorError::OutOfBounds {
                position: Position::new(0, 4)
            })
        );
        assert!(buffer.insert(Position::new(1, 0), "x", &mut events).is_err());
        assert_eq!(buffer.text(), "abc");
        assert!(events.is_empty());
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_insert_multibyte() {
        let mut buffer = buffer("héllo");
        let mut events = CueQueue::new();

        let pos = buffer.insert(Position::new(0, 2), "ü", &mut events).unwrap();

        assert_eq!(buffer.text(), "héüllo");
        assert_eq!(pos, Position::new(0, 3));
        assert_eq!(buffer.line_len(0), 6);
    }

    #[test]
    fn test_delete_single_char() {
        let mut buffer = buffer("abc");
        let mut events = CueQueue::new();

        let removed = buffer
            .delete_range(Position::new(0, 1), Position::new(0, 2), &mut events)
            .unwrap();

        assert_eq!(removed, "b");
        assert_eq!(buffer.text(), "ac");
        assert_eq!(events.pop(), Some(CueEvent::CharacterDeleted { ch: 'b' }));
    }

    #[test]
    fn test_delete_line_boundary_merges_lines() {
        let mut buffer = buffer("hello\nworld");
        let mut events = CueQueue::new();

        let removed = buffer
            .delete_range(Position::new(0, 5), Position::new(1, 0), &mut events)
            .unwrap();

        assert_eq!(removed, "\n");
        assert_eq!(buffer.text(), "helloworld");
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(events.pop(), Some(CueEvent::LinesJoined { row: 0 }));
    }

    #[test]
    fn test_delete_across_lines() {
        let mut buffer = buffer("one\ntwo\nthree");
        let mut events = CueQueue::new();

        let removed = buffer
            .delete_range(Position::new(0, 1), Position::new(2, 2), &mut events)
            .unwrap();

        assert_eq!(removed, "ne\ntwo\nth");
        assert_eq!(buffer.text(), "oree");
        assert_eq!(
            events.pop(),
            Some(CueEvent::TextDeleted {
                text: "ne\ntwo\nth".to_string()
            })
        );
    }

    #[test]
    fn test_delete_invalid_range() {
        let mut buffer = buffer("abc\ndef");
        let mut events = CueQueue::new();

        let start = Position::new(1, 0);
        let end = Position::new(0, 2);
        assert_eq!(
            buffer.delete_range(start, end, &mut events),
            Err(EditorError::InvalidRange { start, end })
        );
        assert!(buffer
            .delete_range(Position::new(0, 0), Position::new(0, 9), &mut events)
            .is_err());
        assert!(buffer
            .delete_range(Position::new(0, 0), Position::new(5, 0), &mut events)
            .is_err());
        assert_eq!(buffer.text(), "abc\ndef");
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_operations_are_silent() {
        let mut buffer = buffer("abc");
        let mut events = CueQueue::new();

        assert_eq!(
            buffer.insert(Position::new(0, 1), "", &mut events),
            Ok(Position::new(0, 1))
        );
        assert_eq!(
            buffer.delete_range(Position::new(0, 1), Position::new(0, 1), &mut events),
            Ok(String::new())
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_word_at() {
        let buffer = buffer("let foo_bar = baz(1);");

        assert_eq!(buffer.word_at(Position::new(0, 4)), "foo_bar");
        assert_eq!(buffer.word_at(Position::new(0, 8)), "foo_bar");
        // touching from the left
        assert_eq!(buffer.word_at(Position::new(0, 11)), "foo_bar");
        // following
        assert_eq!(buffer.word_at(Position::new(0, 12)), "baz");
        assert_eq!(buffer.word_at(Position::new(0, 21)), "");
        assert_eq!(buffer.word_at(Position::new(3, 0)), "");
    }

    #[test]
    fn test_word_before() {
        let buffer = buffer("x = value");
        assert_eq!(buffer.word_before(Position::new(0, 9)), "value");
        assert_eq!(buffer.word_before(Position::new(0, 4)), "");
        assert_eq!(buffer.word_before(Position::new(0, 1)), "x");
    }

    #[test]
    fn test_indent_level() {
        let buffer = buffer("none\n    one\n        two\n\tone tab\n  \t mixed\n   three spaces");

        assert_eq!(buffer.indent_level(0), 0);
        assert_eq!(buffer.indent_level(1), 1);
        assert_eq!(buffer.indent_level(2), 2);
        assert_eq!(buffer.indent_level(3), 1);
        assert_eq!(buffer.indent_level(4), 1);
        assert_eq!(buffer.indent_level(5), 0);
    }

    #[test]
    fn test_indent_level_custom_tab_width() {
        let buffer = TextBuffer::from_text("  a\n    b", 2);
        assert_eq!(buffer.indent_level(0), 1);
        assert_eq!(buffer.indent_level(1), 2);
    }

    #[test]
    fn test_advance_crosses_lines() {
        let buffer = buffer("ab\ncd");
        assert_eq!(buffer.advance(Position::new(0, 1), 2), Some(Position::new(1, 0)));
        assert_eq!(buffer.advance(Position::new(1, 1), 2), None);
    }

    #[test]
    fn test_from_text_round_trips() {
        let text = "first\n\nthird\n";
        assert_eq!(TextBuffer::from_text(text, 4).text(), text);
    }
}
