//! The modal editor state machine.
//!
//! Composes the line buffer, the mode FSM, and the colon-command buffer into
//! a single [`EditorState`] owned by the application model. The state machine
//! never touches the terminal; rendering is a separate projection.

pub mod buffer;
pub mod command;
pub mod mode;

pub use buffer::{ANNOTATION_MARKER, Buffer, Cursor, Direction};
pub use command::{ExCommand, ParseError};
pub use mode::{Mode, PENDING_KEY_TIMEOUT_MS, PendingKey};

/// Where Insert mode places the cursor on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// `i` — insert before the cursor.
    Cursor,
    /// `a` — insert after the cursor.
    After,
    /// `A` — insert at end of line.
    LineEnd,
    /// `I` — insert at start of line.
    LineStart,
    /// `o` — open a new line below.
    Below,
    /// `O` — open a new line above.
    Above,
}

/// One editor instance: buffer, mode, command line, and persistence identity.
#[derive(Debug, Default)]
pub struct EditorState {
    pub buffer: Buffer,
    pub mode: Mode,
    /// Colon-command buffer, includes the leading ':' while in Command mode.
    pub command_line: String,
    /// Persistence identity of the buffer; mutable via `:w <name>`.
    pub filename: String,
    /// Unmatched first key of a double-key sequence (`dd`, `gg`).
    pub pending: Option<PendingKey>,
}

impl EditorState {
    /// Create an editor over `content` (or an empty buffer) identified by
    /// `filename`. Starts in Normal mode, cursor at (0, 0).
    pub fn new(filename: impl Into<String>, content: Option<&str>) -> Self {
        Self {
            buffer: content.map_or_else(Buffer::empty, Buffer::from_text),
            mode: Mode::Normal,
            command_line: String::new(),
            filename: filename.into(),
            pending: None,
        }
    }

    /// Replace the buffer content (`:o`), resetting the cursor to (0, 0).
    pub fn load(&mut self, filename: impl Into<String>, content: Option<&str>) {
        self.buffer = content.map_or_else(Buffer::empty, Buffer::from_text);
        self.filename = filename.into();
        self.mode = Mode::Normal;
    }

    /// Enter Insert mode. Strips the current line's annotation first, then
    /// positions the cursor per the entry variant.
    pub fn enter_insert(&mut self, at: InsertAt) {
        let row = self.buffer.cursor().row;
        self.buffer.strip_annotation(row);
        self.mode = Mode::Insert;
        match at {
            InsertAt::Cursor => self.buffer.clamp_col(Mode::Insert),
            InsertAt::After => self.buffer.step(Direction::Right, Mode::Insert),
            InsertAt::LineEnd => self.buffer.line_end(Mode::Insert),
            InsertAt::LineStart => self.buffer.line_start(),
            InsertAt::Below => self.buffer.open_line_below(),
            InsertAt::Above => self.buffer.open_line_above(),
        }
    }

    /// Leave Insert mode (Escape). The column steps back one character,
    /// clamped at 0, so the cursor rests on a character again.
    pub fn leave_insert(&mut self) {
        self.mode = Mode::Normal;
        self.buffer.step(Direction::Left, Mode::Normal);
        self.buffer.clamp_col(Mode::Normal);
    }

    /// Enter Command mode with the buffer reset to ":".
    pub fn begin_command(&mut self) {
        self.mode = Mode::Command;
        self.command_line = ":".to_string();
    }

    /// Leave Command mode without running anything (Escape).
    pub fn cancel_command(&mut self) {
        self.mode = Mode::Normal;
        self.command_line.clear();
    }

    /// Append a character to the command buffer.
    pub fn command_input(&mut self, c: char) {
        if self.mode == Mode::Command {
            self.command_line.push(c);
        }
    }

    /// Remove the last character of the command buffer. Deleting the leading
    /// ':' returns to Normal mode.
    pub fn command_backspace(&mut self) {
        if self.command_line.len() > 1 {
            self.command_line.pop();
        } else {
            self.cancel_command();
        }
    }

    /// Take the accumulated command (content after ':') and return to Normal
    /// mode. Commands always return to Normal, success or failure.
    pub fn take_command(&mut self) -> String {
        let cmd = self.command_line.strip_prefix(':').unwrap_or_default().to_string();
        self.cancel_command();
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_editor_starts_normal_at_origin() {
        let ed = EditorState::new("scratch.py", None);
        assert_eq!(ed.mode, Mode::Normal);
        assert_eq!(ed.buffer.cursor(), Cursor::at(0, 0));
        assert_eq!(ed.filename, "scratch.py");
    }

    #[test]
    fn test_enter_insert_after_advances_column() {
        let mut ed = EditorState::new("f", Some("ab"));
        ed.enter_insert(InsertAt::After);
        assert_eq!(ed.mode, Mode::Insert);
        assert_eq!(ed.buffer.cursor().col, 1);
    }

    #[test]
    fn test_enter_insert_line_end() {
        let mut ed = EditorState::new("f", Some("hello"));
        ed.enter_insert(InsertAt::LineEnd);
        assert_eq!(ed.buffer.cursor().col, 5);
    }

    #[test]
    fn test_enter_insert_line_start() {
        let mut ed = EditorState::new("f", Some("hello"));
        ed.buffer.move_to(0, 3, Mode::Normal);
        ed.enter_insert(InsertAt::LineStart);
        assert_eq!(ed.buffer.cursor().col, 0);
    }

    #[test]
    fn test_enter_insert_strips_annotation() {
        let mut ed = EditorState::new("f", Some("print(1) → 1"));
        ed.enter_insert(InsertAt::Cursor);
        assert_eq!(ed.buffer.line_at(0), Some("print(1)".to_string()));
    }

    #[test]
    fn test_open_below_enters_insert_on_new_line() {
        let mut ed = EditorState::new("f", Some("one"));
        ed.enter_insert(InsertAt::Below);
        assert_eq!(ed.mode, Mode::Insert);
        assert_eq!(ed.buffer.cursor(), Cursor::at(1, 0));
        assert_eq!(ed.buffer.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_leave_insert_steps_back_one() {
        let mut ed = EditorState::new("f", Some(""));
        ed.enter_insert(InsertAt::Cursor);
        ed.buffer.insert_char('h');
        ed.buffer.insert_char('i');
        ed.leave_insert();
        assert_eq!(ed.mode, Mode::Normal);
        assert_eq!(ed.buffer.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_leave_insert_clamps_at_zero() {
        let mut ed = EditorState::new("f", None);
        ed.enter_insert(InsertAt::Cursor);
        ed.leave_insert();
        assert_eq!(ed.buffer.cursor().col, 0);
    }

    #[test]
    fn test_command_buffer_lifecycle() {
        let mut ed = EditorState::new("f", None);
        ed.begin_command();
        assert_eq!(ed.mode, Mode::Command);
        assert_eq!(ed.command_line, ":");
        ed.command_input('w');
        ed.command_input('q');
        assert_eq!(ed.command_line, ":wq");
        assert_eq!(ed.take_command(), "wq");
        assert_eq!(ed.mode, Mode::Normal);
        assert_eq!(ed.command_line, "");
    }

    #[test]
    fn test_command_backspace_to_normal() {
        let mut ed = EditorState::new("f", None);
        ed.begin_command();
        ed.command_input('w');
        ed.command_backspace();
        assert_eq!(ed.command_line, ":");
        ed.command_backspace();
        assert_eq!(ed.mode, Mode::Normal);
        assert_eq!(ed.command_line, "");
    }

    #[test]
    fn test_cancel_command_takes_no_action() {
        let mut ed = EditorState::new("f", Some("text"));
        ed.begin_command();
        ed.command_input('q');
        ed.cancel_command();
        assert_eq!(ed.mode, Mode::Normal);
        assert_eq!(ed.buffer.text(), "text");
    }

    #[test]
    fn test_load_replaces_buffer_and_filename() {
        let mut ed = EditorState::new("a.py", Some("old"));
        ed.buffer.move_to(0, 2, Mode::Normal);
        ed.load("b.py", Some("new content"));
        assert_eq!(ed.filename, "b.py");
        assert_eq!(ed.buffer.cursor(), Cursor::at(0, 0));
        assert_eq!(ed.buffer.text(), "new content");
    }
}
