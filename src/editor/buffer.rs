use ropey::Rope;

use super::mode::Mode;

/// Marker inserted between a line's code and its inline execution result.
pub const ANNOTATION_MARKER: &str = " → ";

/// Cursor position in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub row: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at a specific position.
    pub const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Direction for single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// The buffer is an ordered sequence of lines with a 2D cursor. It is never
/// empty: an empty buffer is one empty line. Column clamping is mode-aware:
/// in Normal mode the cursor rests on a character (never past the last one),
/// in Insert mode it may sit one past the end (the insertion point). All
/// row/column math clamps silently; out-of-range requests never panic.
pub struct Buffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset where a line's annotation begins, if it has one.
fn annotation_start(line: &str) -> Option<usize> {
    line.find(" →")
}

impl Buffer {
    /// Create a buffer from a string. The cursor starts at (0, 0).
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            dirty: false,
        }
    }

    /// Create an empty buffer (one empty line).
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer. Always at least 1.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, row: usize) -> Option<String> {
        if row >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(row).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, row: usize) -> usize {
        self.line_at(row).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer, annotations included.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The buffer content with every execution annotation stripped.
    pub fn clean_text(&self) -> String {
        (0..self.line_count())
            .filter_map(|row| self.line_at(row))
            .map(|line| annotation_start(&line).map_or_else(|| line.clone(), |idx| line[..idx].to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Split a line into its code part and annotation span, if annotated.
    pub fn split_annotation(line: &str) -> (&str, Option<&str>) {
        annotation_start(line).map_or((line, None), |idx| (&line[..idx], Some(&line[idx..])))
    }

    /// The maximum valid column for a row under the given mode's bound.
    ///
    /// Insert mode allows the insertion point one past the last character;
    /// Normal/Command mode rests the cursor on the last character (column 0
    /// on an empty line).
    pub fn max_col(&self, row: usize, mode: Mode) -> usize {
        let Some(line) = self.line_at(row) else {
            return 0;
        };
        if mode == Mode::Insert {
            line.len()
        } else {
            line.char_indices().next_back().map_or(0, |(i, _)| i)
        }
    }

    /// Move the cursor to a position, clamping row and column to the mode's
    /// bounds. Leaving a row strips that row's annotation.
    pub fn move_to(&mut self, row: usize, col: usize, mode: Mode) {
        let row = row.min(self.line_count().saturating_sub(1));
        if row != self.cursor.row {
            let left = self.cursor.row;
            self.cursor.row = row;
            self.strip_annotation(left);
        }
        self.cursor.col = self.bounded_col(col, mode);
    }

    /// Clamp the cursor column to the given mode's bound for the current row.
    pub fn clamp_col(&mut self, mode: Mode) {
        self.cursor.col = self.bounded_col(self.cursor.col, mode);
    }

    /// Clamp a column to the mode's bound for the current row, then round it
    /// down to a char boundary. Columns are byte offsets, so a clamp against
    /// another line's length can land inside a multi-byte character.
    fn bounded_col(&self, col: usize, mode: Mode) -> usize {
        let mut col = col.min(self.max_col(self.cursor.row, mode));
        if let Some(line) = self.line_at(self.cursor.row) {
            while col > 0 && !line.is_char_boundary(col) {
                col -= 1;
            }
        }
        col
    }

    // --- Edits ---

    /// Insert a character at the cursor. Strips any execution annotation from
    /// the current line first, then advances the column.
    pub fn insert_char(&mut self, ch: char) {
        self.strip_annotation(self.cursor.row);
        self.clamp_col(Mode::Insert);
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        self.cursor.col += ch.len_utf8();
        self.dirty = true;
    }

    /// Insert a string at the cursor (single-line content, e.g. a tab run).
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.strip_annotation(self.cursor.row);
        self.clamp_col(Mode::Insert);
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, s);
        self.cursor.col += s.len();
        self.dirty = true;
    }

    /// Split the current line at the cursor (Enter in Insert mode). Strips
    /// the annotation first; the cursor moves to column 0 of the new line.
    pub fn split_line(&mut self) {
        self.strip_annotation(self.cursor.row);
        self.clamp_col(Mode::Insert);
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, '\n');
        self.cursor.row += 1;
        self.cursor.col = 0;
        self.dirty = true;
    }

    /// Delete the character before the cursor (Backspace). At column 0 the
    /// current line joins onto the previous one, cursor at the join point.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.row == 0 {
            return false;
        }
        self.strip_annotation(self.cursor.row);
        self.clamp_col(Mode::Insert);

        if self.cursor.col == 0 {
            let prev_len = self.line_len(self.cursor.row - 1);
            let idx = self.cursor_char_idx();
            self.rope.remove(idx - 1..idx);
            self.cursor.row -= 1;
            self.cursor.col = prev_len;
        } else {
            let line = self.line_at(self.cursor.row).unwrap_or_default();
            let prev_char_len = line[..self.cursor.col]
                .chars()
                .next_back()
                .map_or(1, char::len_utf8);
            let idx = self.cursor_char_idx();
            self.rope.remove(idx - 1..idx);
            self.cursor.col -= prev_char_len;
        }
        self.dirty = true;
        true
    }

    /// Delete the character under the cursor (Normal-mode `x`). No-op when
    /// the cursor sits past the end of the line content.
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_at_cursor(&mut self) -> bool {
        if self.cursor.col >= self.line_len(self.cursor.row) {
            return false;
        }
        let idx = self.cursor_char_idx();
        self.rope.remove(idx..=idx);
        self.dirty = true;
        self.clamp_col(Mode::Normal);
        true
    }

    /// Delete the current line (Normal-mode `dd`). Deleting the last
    /// remaining line leaves one empty line.
    pub fn delete_line(&mut self) {
        let row = self.cursor.row;
        let start = self.rope.line_to_char(row);
        if row + 1 < self.line_count() {
            let end = self.rope.line_to_char(row + 1);
            self.rope.remove(start..end);
        } else if row > 0 {
            // Last line: also remove the newline that ended the previous line.
            self.rope.remove(start - 1..self.rope.len_chars());
            self.cursor.row -= 1;
        } else {
            let len = self.rope.len_chars();
            self.rope.remove(0..len);
        }
        self.dirty = true;
        self.cursor.row = self.cursor.row.min(self.line_count().saturating_sub(1));
        self.clamp_col(Mode::Normal);
    }

    /// Insert an empty line below the current row and move the cursor to it.
    pub fn open_line_below(&mut self) {
        let row = self.cursor.row;
        let idx = if row + 1 < self.line_count() {
            self.rope.line_to_char(row + 1)
        } else {
            self.rope.len_chars()
        };
        self.rope.insert_char(idx, '\n');
        self.cursor.row = row + 1;
        self.cursor.col = 0;
        self.dirty = true;
    }

    /// Insert an empty line above the current row and move the cursor to it.
    pub fn open_line_above(&mut self) {
        let idx = self.rope.line_to_char(self.cursor.row);
        self.rope.insert_char(idx, '\n');
        self.cursor.col = 0;
        self.dirty = true;
    }

    // --- Annotations ---

    /// Remove the execution annotation from a row, if present. Clamps the
    /// cursor if it sat inside the removed span.
    pub fn strip_annotation(&mut self, row: usize) {
        let Some(line) = self.line_at(row) else {
            return;
        };
        let Some(idx) = annotation_start(&line) else {
            return;
        };
        self.replace_line(row, &line[..idx]);
        if self.cursor.row == row {
            self.clamp_col(Mode::Insert);
        }
    }

    /// Append the execution annotation on a row, replacing any existing one.
    pub fn annotate(&mut self, row: usize, result: &str) {
        let Some(line) = self.line_at(row) else {
            return;
        };
        let code = annotation_start(&line).map_or(line.as_str(), |idx| &line[..idx]);
        let annotated = format!("{code}{ANNOTATION_MARKER}{result}");
        self.replace_line(row, &annotated);
    }

    /// The annotation span of a row (marker included), if any.
    pub fn annotation(&self, row: usize) -> Option<String> {
        let line = self.line_at(row)?;
        let idx = annotation_start(&line)?;
        Some(line[idx..].to_string())
    }

    // --- Motions ---

    /// Move the cursor one step in the given direction, clamped to the
    /// mode's bounds.
    pub fn step(&mut self, direction: Direction, mode: Mode) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(mode),
            Direction::Up => {
                let (row, col) = (self.cursor.row, self.cursor.col);
                self.move_to(row.saturating_sub(1), col, mode);
            }
            Direction::Down => {
                let (row, col) = (self.cursor.row, self.cursor.col);
                self.move_to(row + 1, col, mode);
            }
        }
    }

    /// Move to the start of the current line (`0`).
    pub const fn line_start(&mut self) {
        self.cursor.col = 0;
    }

    /// Move to the end of the current line (`$` in Normal, End in Insert).
    pub fn line_end(&mut self, mode: Mode) {
        self.cursor.col = self.max_col(self.cursor.row, mode);
    }

    /// Move to the first line (`gg`).
    pub fn go_to_top(&mut self) {
        self.move_to(0, 0, Mode::Normal);
    }

    /// Move to the last line (`G`).
    pub fn go_to_bottom(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.move_to(last, 0, Mode::Normal);
    }

    /// Move to the start of the next word (`w`). Wraps to the next line when
    /// the end of the current line is reached.
    pub fn word_forward(&mut self) {
        let line = self.line_at(self.cursor.row).unwrap_or_default();
        let mut col = self.cursor.col.min(line.len());
        while let Some(c) = line[col..].chars().next() {
            if !is_word(c) {
                break;
            }
            col += c.len_utf8();
        }
        while let Some(c) = line[col..].chars().next() {
            if !c.is_whitespace() {
                break;
            }
            col += c.len_utf8();
        }
        if col >= line.len() && self.cursor.row + 1 < self.line_count() {
            let row = self.cursor.row;
            self.move_to(row + 1, 0, Mode::Normal);
        } else {
            self.move_to(self.cursor.row, col, Mode::Normal);
        }
    }

    /// Move to the start of the previous word (`b`). Wraps to the end of the
    /// previous line at column 0.
    pub fn word_back(&mut self) {
        let line = self.line_at(self.cursor.row).unwrap_or_default();
        let before = &line[..self.cursor.col.min(line.len())];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word(*c))
            .last()
            .map(|(i, _)| i);

        match start {
            Some(i) if !trimmed.is_empty() => {
                self.move_to(self.cursor.row, i, Mode::Normal);
            }
            _ if self.cursor.row > 0 => {
                let row = self.cursor.row - 1;
                let col = self.max_col(row, Mode::Normal);
                self.move_to(row, col, Mode::Normal);
            }
            _ => self.line_start(),
        }
    }

    // --- Private helpers ---

    /// Convert the cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.row);
        let line: String = self.rope.line(self.cursor.row).chars().collect();
        let byte_col = self.cursor.col.min(line.len());
        line_start + line[..byte_col].chars().count()
    }

    /// Replace a row's content (without touching its newline).
    fn replace_line(&mut self, row: usize, new: &str) {
        if row >= self.line_count() {
            return;
        }
        let start = self.rope.line_to_char(row);
        let old_len = self.line_at(row).map_or(0, |line| line.chars().count());
        self.rope.remove(start..start + old_len);
        self.rope.insert(start, new);
    }

    fn move_left(&mut self) {
        if self.cursor.col == 0 {
            return;
        }
        let line = self.line_at(self.cursor.row).unwrap_or_default();
        let prev_char_len = line[..self.cursor.col.min(line.len())]
            .chars()
            .next_back()
            .map_or(1, char::len_utf8);
        self.cursor.col = self.cursor.col.saturating_sub(prev_char_len);
    }

    fn move_right(&mut self, mode: Mode) {
        let line = self.line_at(self.cursor.row).unwrap_or_default();
        let next_char_len = line[self.cursor.col.min(line.len())..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.cursor.col =
            (self.cursor.col + next_char_len).min(self.max_col(self.cursor.row, mode));
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = Buffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = Buffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = Buffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_text_roundtrip() {
        let content = "line one\nline two\nline three";
        let buf = Buffer::from_text(content);
        assert_eq!(buf.text(), content);
    }

    #[test]
    fn test_cursor_starts_at_origin() {
        let buf = Buffer::from_text("hello\nworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    // --- Mode-aware column bounds ---

    #[test]
    fn test_max_col_normal_rests_on_last_char() {
        let buf = Buffer::from_text("hello");
        assert_eq!(buf.max_col(0, Mode::Normal), 4);
    }

    #[test]
    fn test_max_col_insert_allows_insertion_point() {
        let buf = Buffer::from_text("hello");
        assert_eq!(buf.max_col(0, Mode::Insert), 5);
    }

    #[test]
    fn test_max_col_empty_line_is_zero() {
        let buf = Buffer::empty();
        assert_eq!(buf.max_col(0, Mode::Normal), 0);
        assert_eq!(buf.max_col(0, Mode::Insert), 0);
    }

    #[test]
    fn test_max_col_normal_multibyte_last_char() {
        let buf = Buffer::from_text("café");
        // 'é' is 2 bytes and starts at byte 3
        assert_eq!(buf.max_col(0, Mode::Normal), 3);
        assert_eq!(buf.max_col(0, Mode::Insert), 5);
    }

    #[test]
    fn test_move_to_clamps_row_and_col() {
        let mut buf = Buffer::from_text("hello");
        buf.move_to(100, 100, Mode::Normal);
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
        buf.move_to(0, 100, Mode::Insert);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    // --- Character insertion ---

    #[test]
    fn test_insert_char_at_start() {
        let mut buf = Buffer::from_text("hello");
        buf.insert_char('H');
        assert_eq!(buf.line_at(0), Some("Hhello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = Buffer::from_text("hllo");
        buf.move_to(0, 1, Mode::Insert);
        buf.insert_char('e');
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_marks_dirty() {
        let mut buf = Buffer::from_text("hello");
        assert!(!buf.is_dirty());
        buf.insert_char('!');
        assert!(buf.is_dirty());
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_insert_strips_annotation_first() {
        let mut buf = Buffer::from_text("print(1) → 1");
        buf.move_to(0, 8, Mode::Insert);
        buf.insert_char('!');
        assert_eq!(buf.line_at(0), Some("print(1)!".to_string()));
    }

    #[test]
    fn test_insert_str_tab_run() {
        let mut buf = Buffer::from_text("x");
        buf.insert_str("    ");
        assert_eq!(buf.line_at(0), Some("    x".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = Buffer::from_text("hello");
        buf.line_end(Mode::Insert);
        buf.insert_char('é');
        assert_eq!(buf.line_at(0), Some("helloé".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 7));
    }

    // --- Line splitting ---

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = Buffer::from_text("hello world");
        buf.move_to(0, 5, Mode::Insert);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_split_line_strips_annotation() {
        let mut buf = Buffer::from_text("x = 1 → done");
        buf.move_to(0, 5, Mode::Insert);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("x = 1".to_string()));
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    // --- Backspace deletion ---

    #[test]
    fn test_delete_back_at_origin_is_noop() {
        let mut buf = Buffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_removes_char() {
        let mut buf = Buffer::from_text("hello");
        buf.move_to(0, 5, Mode::Insert);
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("hell".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_to(1, 0, Mode::Insert);
        buf.delete_back();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = Buffer::from_text("café");
        buf.move_to(0, 5, Mode::Insert);
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("caf".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    // --- Round trip ---

    #[test]
    fn test_insert_then_delete_restores_content() {
        let mut buf = Buffer::from_text("hello");
        buf.move_to(0, 5, Mode::Insert);
        for c in "abc".chars() {
            buf.insert_char(c);
        }
        for _ in 0..3 {
            buf.delete_back();
        }
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    // --- Delete at cursor (x) ---

    #[test]
    fn test_delete_at_cursor() {
        let mut buf = Buffer::from_text("ab");
        buf.move_to(0, 1, Mode::Normal);
        assert!(buf.delete_at_cursor());
        assert_eq!(buf.line_at(0), Some("a".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_delete_at_cursor_past_end_is_noop() {
        let mut buf = Buffer::empty();
        assert!(!buf.delete_at_cursor());
    }

    // --- Delete line (dd) ---

    #[test]
    fn test_delete_line_middle() {
        let mut buf = Buffer::from_text("one\ntwo\nthree");
        buf.move_to(1, 0, Mode::Normal);
        buf.delete_line();
        assert_eq!(buf.text(), "one\nthree");
        assert_eq!(buf.cursor().row, 1);
    }

    #[test]
    fn test_delete_line_last() {
        let mut buf = Buffer::from_text("one\ntwo");
        buf.move_to(1, 0, Mode::Normal);
        buf.delete_line();
        assert_eq!(buf.text(), "one");
        assert_eq!(buf.cursor().row, 0);
    }

    #[test]
    fn test_delete_line_only_line_leaves_empty_buffer() {
        let mut buf = Buffer::from_text("hello");
        buf.delete_line();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    // --- Open lines ---

    #[test]
    fn test_open_line_below() {
        let mut buf = Buffer::from_text("one\ntwo");
        buf.open_line_below();
        assert_eq!(buf.text(), "one\n\ntwo");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_open_line_below_at_last_row() {
        let mut buf = Buffer::from_text("one");
        buf.open_line_below();
        assert_eq!(buf.text(), "one\n");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_open_line_above() {
        let mut buf = Buffer::from_text("one\ntwo");
        buf.move_to(1, 0, Mode::Normal);
        buf.open_line_above();
        assert_eq!(buf.text(), "one\n\ntwo");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    // --- Annotations ---

    #[test]
    fn test_annotate_appends_marker() {
        let mut buf = Buffer::from_text("print(1+1)");
        buf.annotate(0, "2");
        assert_eq!(buf.line_at(0), Some("print(1+1) → 2".to_string()));
    }

    #[test]
    fn test_annotate_replaces_existing() {
        let mut buf = Buffer::from_text("print(1+1) → 2");
        buf.annotate(0, "3");
        assert_eq!(buf.line_at(0), Some("print(1+1) → 3".to_string()));
        assert_eq!(buf.line_at(0).unwrap().matches('→').count(), 1);
    }

    #[test]
    fn test_strip_annotation() {
        let mut buf = Buffer::from_text("print(1+1) → 2\nx = 1");
        buf.strip_annotation(0);
        assert_eq!(buf.line_at(0), Some("print(1+1)".to_string()));
        assert_eq!(buf.line_at(1), Some("x = 1".to_string()));
    }

    #[test]
    fn test_strip_annotation_clamps_cursor() {
        let mut buf = Buffer::from_text("ab → result");
        buf.move_to(0, 8, Mode::Insert);
        buf.strip_annotation(0);
        assert_eq!(buf.cursor().col, 2);
    }

    #[test]
    fn test_annotation_accessor() {
        let mut buf = Buffer::from_text("code");
        assert_eq!(buf.annotation(0), None);
        buf.annotate(0, "out");
        assert_eq!(buf.annotation(0), Some(" → out".to_string()));
    }

    #[test]
    fn test_clean_text_strips_all_annotations() {
        let buf = Buffer::from_text("a = 1 → done\nprint(a) → 1\nb = 2");
        assert_eq!(buf.clean_text(), "a = 1\nprint(a)\nb = 2");
    }

    #[test]
    fn test_leaving_row_strips_annotation() {
        let mut buf = Buffer::from_text("print(1) → 1\nnext");
        buf.move_to(1, 0, Mode::Normal);
        assert_eq!(buf.line_at(0), Some("print(1)".to_string()));
    }

    // --- Motions ---

    #[test]
    fn test_step_down_clamps_at_last_line() {
        let mut buf = Buffer::from_text("line1\nline2");
        buf.step(Direction::Down, Mode::Normal);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.step(Direction::Down, Mode::Normal);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_step_up_clamps_at_first_line() {
        let mut buf = Buffer::from_text("line1\nline2");
        buf.step(Direction::Up, Mode::Normal);
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_step_right_clamps_in_normal_mode() {
        let mut buf = Buffer::from_text("ab");
        buf.step(Direction::Right, Mode::Normal);
        assert_eq!(buf.cursor().col, 1);
        buf.step(Direction::Right, Mode::Normal);
        assert_eq!(buf.cursor().col, 1);
    }

    #[test]
    fn test_step_right_reaches_insertion_point_in_insert_mode() {
        let mut buf = Buffer::from_text("ab");
        buf.move_to(0, 1, Mode::Insert);
        buf.step(Direction::Right, Mode::Insert);
        assert_eq!(buf.cursor().col, 2);
    }

    #[test]
    fn test_step_left_at_start_is_noop() {
        let mut buf = Buffer::from_text("ab");
        buf.step(Direction::Left, Mode::Normal);
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_vertical_step_clamps_to_shorter_line() {
        let mut buf = Buffer::from_text("hello\nhi");
        buf.move_to(0, 4, Mode::Normal);
        buf.step(Direction::Down, Mode::Normal);
        assert_eq!(buf.cursor(), Cursor::at(1, 1));
    }

    #[test]
    fn test_vertical_step_snaps_to_char_boundary() {
        // Byte col 2 on "abc" sits inside the two-byte 'é' on the next line;
        // the clamp must round down, not leave a mid-char offset behind.
        let mut buf = Buffer::from_text("abc\naé b");
        buf.move_to(0, 2, Mode::Normal);
        buf.step(Direction::Down, Mode::Normal);
        assert_eq!(buf.cursor(), Cursor::at(1, 1));
        buf.step(Direction::Left, Mode::Normal);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_move_to_rounds_down_inside_multibyte_char() {
        let mut buf = Buffer::from_text("héllo");
        buf.move_to(0, 2, Mode::Insert);
        assert_eq!(buf.cursor().col, 1);
    }

    #[test]
    fn test_line_start_and_end() {
        let mut buf = Buffer::from_text("hello");
        buf.move_to(0, 2, Mode::Normal);
        buf.line_end(Mode::Normal);
        assert_eq!(buf.cursor().col, 4);
        buf.line_start();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_go_to_top_and_bottom() {
        let mut buf = Buffer::from_text("one\ntwo\nthree");
        buf.go_to_bottom();
        assert_eq!(buf.cursor(), Cursor::at(2, 0));
        buf.go_to_top();
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_word_forward() {
        let mut buf = Buffer::from_text("hello world");
        buf.word_forward();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_word_forward_wraps_to_next_line() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_to(0, 4, Mode::Normal);
        buf.word_forward();
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_word_back() {
        let mut buf = Buffer::from_text("hello world");
        buf.move_to(0, 8, Mode::Normal);
        buf.word_back();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_word_back_wraps_to_previous_line() {
        let mut buf = Buffer::from_text("hello\nworld");
        buf.move_to(1, 0, Mode::Normal);
        buf.word_back();
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
    }

    // --- split_annotation ---

    #[test]
    fn test_split_annotation() {
        assert_eq!(Buffer::split_annotation("code"), ("code", None));
        assert_eq!(
            Buffer::split_annotation("code → out"),
            ("code", Some(" → out"))
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Motion {
            Step(Direction),
            WordForward,
            WordBack,
            LineStart,
            LineEnd,
            Top,
            Bottom,
        }

        fn motion_strategy() -> impl Strategy<Value = Motion> {
            prop_oneof![
                Just(Motion::Step(Direction::Up)),
                Just(Motion::Step(Direction::Down)),
                Just(Motion::Step(Direction::Left)),
                Just(Motion::Step(Direction::Right)),
                Just(Motion::WordForward),
                Just(Motion::WordBack),
                Just(Motion::LineStart),
                Just(Motion::LineEnd),
                Just(Motion::Top),
                Just(Motion::Bottom),
            ]
        }

        proptest! {
            #[test]
            fn cursor_stays_within_normal_bounds(
                text in "[a-z \n]{0,200}",
                motions in proptest::collection::vec(motion_strategy(), 0..50),
            ) {
                let mut buf = Buffer::from_text(&text);
                for motion in motions {
                    match motion {
                        Motion::Step(d) => buf.step(d, Mode::Normal),
                        Motion::WordForward => buf.word_forward(),
                        Motion::WordBack => buf.word_back(),
                        Motion::LineStart => buf.line_start(),
                        Motion::LineEnd => buf.line_end(Mode::Normal),
                        Motion::Top => buf.go_to_top(),
                        Motion::Bottom => buf.go_to_bottom(),
                    }
                    let cursor = buf.cursor();
                    prop_assert!(cursor.row < buf.line_count());
                    prop_assert!(cursor.col <= buf.max_col(cursor.row, Mode::Normal));
                }
            }

            #[test]
            fn move_to_never_exceeds_line_len(
                text in "[a-z\n]{0,100}",
                row in 0usize..20,
                col in 0usize..200,
            ) {
                let mut buf = Buffer::from_text(&text);
                buf.move_to(row, col, Mode::Insert);
                let cursor = buf.cursor();
                prop_assert!(cursor.row < buf.line_count());
                prop_assert!(cursor.col <= buf.line_len(cursor.row));
            }
        }
    }
}
