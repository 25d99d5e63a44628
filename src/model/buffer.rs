use ropey::Rope;

use super::position::Position;

/// The document text, backed by a Rope.
///
/// Lines are separated by `\n` only, so a trailing newline yields a trailing
/// empty line and an empty buffer is a single empty line. Every index passed
/// in is expected to be in range; callers clamp before calling.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole content.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(&text.replace("\r\n", "\n"));
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total number of lines in the buffer. Never zero.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the text of a specific line (without trailing newline).
    pub fn line_text(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(idx);
        let mut s: String = line.chunks().collect();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Length of a line in chars, excluding the line break.
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.line_count()).filter_map(|idx| self.line_text(idx))
    }

    /// Remove one line and return what it held.
    pub fn delete_line(&mut self, idx: usize) -> String {
        self.delete_lines(idx, idx).join("\n")
    }

    /// Remove lines `first..=last`. The buffer keeps at least one line.
    pub fn delete_lines(&mut self, first: usize, last: usize) -> Vec<String> {
        let removed: Vec<String> = (first..=last).filter_map(|i| self.line_text(i)).collect();

        let start = self.rope.line_to_char(first);
        if last + 1 < self.line_count() {
            let end = self.rope.line_to_char(last + 1);
            self.rope.remove(start..end);
        } else if first > 0 {
            // Trailing block: the line break in front of it goes too.
            let end = self.rope.len_chars();
            self.rope.remove(start - 1..end);
        } else {
            self.rope = Rope::new();
        }

        removed
    }

    /// Splice `lines` immediately before or after line `idx`.
    pub fn insert_lines(&mut self, idx: usize, lines: &[&str], before: bool) {
        let joined = lines.join("\n");

        if before {
            let at = self.rope.line_to_char(idx);
            self.rope.insert(at, &format!("{joined}\n"));
        } else if idx + 1 < self.line_count() {
            let at = self.rope.line_to_char(idx + 1);
            self.rope.insert(at, &format!("{joined}\n"));
        } else {
            let at = self.rope.len_chars();
            self.rope.insert(at, &format!("\n{joined}"));
        }
    }

    /// Text between two positions, both inclusive.
    pub fn slice(&self, start: Position, stop: Position) -> String {
        let (from, to) = self.char_span(start, stop);
        if from >= to {
            return String::new();
        }
        self.rope.slice(from..to).to_string()
    }

    /// Remove the chars between two positions, both inclusive, joining what
    /// is left of the first and last line.
    pub fn remove_range(&mut self, start: Position, stop: Position) -> String {
        let (from, to) = self.char_span(start, stop);
        if from >= to {
            return String::new();
        }
        let removed = self.rope.slice(from..to).to_string();
        self.rope.remove(from..to);
        removed
    }

    /// Insert a character at the given position.
    pub fn insert_char(&mut self, pos: Position, ch: char) {
        let char_idx = self.char_idx(pos);
        self.rope.insert_char(char_idx, ch);
    }

    /// Split the line at the given position.
    pub fn insert_newline(&mut self, pos: Position) {
        let char_idx = self.char_idx(pos);
        self.rope.insert_char(char_idx, '\n');
    }

    /// Delete the character before `pos` (backspace), returning where the
    /// cursor lands. At column 1 the line is joined onto the previous one.
    pub fn delete_char_before(&mut self, pos: Position) -> Option<Position> {
        if pos.col <= 1 && pos.row <= 1 {
            return None;
        }

        let char_idx = self.char_idx(pos);
        let landing = if pos.col <= 1 {
            let prev_line_len = self.line_len(pos.line_idx() - 1);
            Position::new(pos.row - 1, prev_line_len + 1)
        } else {
            Position::new(pos.row, pos.col - 1)
        };
        self.rope.remove(char_idx - 1..char_idx);

        Some(landing)
    }

    fn char_idx(&self, pos: Position) -> usize {
        let line_start = self.rope.line_to_char(pos.line_idx());
        (line_start + pos.col_idx()).min(self.rope.len_chars())
    }

    fn char_span(&self, start: Position, stop: Position) -> (usize, usize) {
        let from = self.char_idx(start);
        let to = (self.char_idx(stop) + 1).min(self.rope.len_chars());
        (from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(buffer: &TextBuffer) -> Vec<String> {
        buffer.lines().collect()
    }

    #[test]
    fn empty_document_is_one_empty_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_text(0).as_deref(), Some(""));
    }

    #[test]
    fn set_text_splits_on_newline() {
        let buffer = TextBuffer::from_text("a\nbc\n");
        assert_eq!(lines_of(&buffer), vec!["a", "bc", ""]);
        assert_eq!(buffer.line_len(1), 2);
        assert_eq!(buffer.line_len(2), 0);
    }

    #[test]
    fn crlf_is_folded_to_lf() {
        let buffer = TextBuffer::from_text("a\r\nb");
        assert_eq!(lines_of(&buffer), vec!["a", "b"]);
    }

    #[test]
    fn delete_line_returns_prior_content() {
        let mut buffer = TextBuffer::from_text("L1\nL2\nL3");
        assert_eq!(buffer.delete_line(1), "L2");
        assert_eq!(lines_of(&buffer), vec!["L1", "L3"]);

        assert_eq!(buffer.delete_line(1), "L3");
        assert_eq!(lines_of(&buffer), vec!["L1"]);

        assert_eq!(buffer.delete_line(0), "L1");
        assert_eq!(lines_of(&buffer), vec![""]);
    }

    #[test]
    fn delete_lines_spanning_the_end() {
        let mut buffer = TextBuffer::from_text("a\nb\nc\nd");
        let removed = buffer.delete_lines(2, 3);
        assert_eq!(removed, vec!["c", "d"]);
        assert_eq!(lines_of(&buffer), vec!["a", "b"]);
    }

    #[test]
    fn insert_lines_after_and_before() {
        let mut buffer = TextBuffer::from_text("L1\nL2\nL3");
        buffer.insert_lines(1, &["A", "B"], false);
        assert_eq!(lines_of(&buffer), vec!["L1", "L2", "A", "B", "L3"]);

        let mut buffer = TextBuffer::from_text("L1\nL2\nL3");
        buffer.insert_lines(1, &["A", "B"], true);
        assert_eq!(lines_of(&buffer), vec!["L1", "A", "B", "L2", "L3"]);
    }

    #[test]
    fn insert_lines_after_last_line() {
        let mut buffer = TextBuffer::from_text("L1");
        buffer.insert_lines(0, &["A"], false);
        assert_eq!(lines_of(&buffer), vec!["L1", "A"]);
    }

    #[test]
    fn remove_range_joins_remainders() {
        let mut buffer = TextBuffer::from_text("SELECT a\nFROM t\nWHERE x");
        let removed = buffer.remove_range(Position::new(1, 7), Position::new(2, 5));
        assert_eq!(removed, " a\nFROM ");
        assert_eq!(lines_of(&buffer), vec!["SELECTt", "WHERE x"]);
    }

    #[test]
    fn slice_does_not_mutate() {
        let buffer = TextBuffer::from_text("abc\ndef");
        assert_eq!(buffer.slice(Position::new(1, 2), Position::new(2, 1)), "bc\nd");
        assert_eq!(buffer.text(), "abc\ndef");
    }

    #[test]
    fn backspace_joins_lines_at_column_one() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        let landing = buffer.delete_char_before(Position::new(2, 1));
        assert_eq!(landing, Some(Position::new(1, 3)));
        assert_eq!(lines_of(&buffer), vec!["abcd"]);

        assert_eq!(buffer.delete_char_before(Position::new(1, 1)), None);
    }

    #[test]
    fn typing_inserts_before_position() {
        let mut buffer = TextBuffer::from_text("ac");
        buffer.insert_char(Position::new(1, 2), 'b');
        buffer.insert_newline(Position::new(1, 3));
        assert_eq!(lines_of(&buffer), vec!["ab", "c"]);
    }
}
