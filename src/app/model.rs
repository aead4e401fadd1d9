use std::time::{Duration, Instant};

use crate::editor::{EditorState, ExCommand, Mode};
use crate::exec::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Output,
}

/// One line in the output pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub is_error: bool,
}

impl OutputLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The modal editor: buffer, mode, command line.
    pub editor: EditorState,
    /// Which pane receives keystrokes.
    pub focus: Focus,
    /// Lines shown in the output pane, oldest first.
    pub output_lines: Vec<OutputLine>,
    /// Input line being typed at the output-pane prompt.
    pub output_input: String,
    /// Command accepted by [`update`](super::update) and awaiting its side
    /// effect. The effects pass takes it; it never survives a frame.
    pub submitted: Option<ExCommand>,
    /// Guard against re-entrant execution while a run is in flight.
    pub executing: bool,
    /// First buffer row visible in the editor pane.
    pub scroll_offset: usize,
    /// Terminal size (columns, rows).
    pub view_size: (u16, u16),
    /// Forced execution language (overrides detection).
    pub lang_override: Option<Language>,
    /// Spaces inserted per Tab press.
    pub tab_width: u8,
    /// Whether the app should quit
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("filename", &self.editor.filename)
            .field("mode", &self.editor.mode)
            .field("focus", &self.focus)
            .field("executing", &self.executing)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model with default settings.
    pub fn new(editor: EditorState, terminal_size: (u16, u16)) -> Self {
        Self {
            editor,
            focus: Focus::Editor,
            output_lines: Vec::new(),
            output_input: String::new(),
            submitted: None,
            executing: false,
            scroll_offset: 0,
            view_size: terminal_size,
            lang_override: None,
            tab_width: 4,
            should_quit: false,
            toast: None,
        }
    }

    /// Rows available to the editor pane: total minus the output pane and
    /// the status bar.
    pub fn editor_rows(&self) -> usize {
        let total = self.view_size.1 as usize;
        total
            .saturating_sub(crate::ui::OUTPUT_PANE_ROWS as usize)
            .saturating_sub(1)
            .max(1)
    }

    /// Keep the cursor row inside the visible window, scrolling as needed.
    pub fn ensure_cursor_visible(&mut self) {
        let rows = self.editor_rows();
        let cursor_row = self.editor.buffer.cursor().row;
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + rows {
            self.scroll_offset = cursor_row + 1 - rows;
        }
    }

    /// Whether Command mode is echoing into the status bar.
    pub fn command_echo(&self) -> Option<&str> {
        (self.editor.mode == Mode::Command).then_some(self.editor.command_line.as_str())
    }

    pub fn push_output(&mut self, line: OutputLine) {
        self.output_lines.push(line);
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(EditorState::default(), (80, 24))
    }
}
