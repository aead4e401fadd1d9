use tracing::debug;

use crate::app::Model;
use crate::app::model::ToastLevel;
use crate::editor::{Direction, InsertAt, Mode, PendingKey, command};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Normal-mode motions
    /// Move the cursor one cell
    MoveCursor(Direction),
    /// Jump to column 0 (`0`)
    LineStart,
    /// Jump to the end of the line (`$`)
    LineEnd,
    /// Jump to the next word start (`w`)
    WordForward,
    /// Jump to the previous word start (`b`)
    WordBack,
    /// Jump to the first line (`gg`)
    GoToTop,
    /// Jump to the last line (`G`)
    GoToBottom,

    // Normal-mode edits
    /// Delete the character under the cursor (`x`)
    DeleteAtCursor,
    /// Delete the current line (`dd`)
    DeleteLine,
    /// Enter Insert mode at the given position
    EnterInsert(InsertAt),
    /// Hold the first key of a double-key sequence, stamped with now-ms
    SetPending(char, u64),

    // Insert mode
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert a tab stop's worth of spaces
    InsertTab,
    /// Split the line at the cursor (Enter)
    SplitLine,
    /// Delete the character before the cursor (Backspace)
    DeleteBack,
    /// Return to Normal mode (Escape)
    LeaveInsert,

    // Command mode
    /// Enter Command mode (`:`)
    BeginCommand,
    /// Append a character to the command buffer
    CommandInput(char),
    /// Remove the last command-buffer character
    CommandBackspace,
    /// Abandon the command buffer (Escape)
    CancelCommand,
    /// Parse and stage the command for execution
    SubmitCommand,

    // Execution (side effects run after the state transition)
    /// Run the current line inline (Ctrl+E)
    ExecuteLine,
    /// Run the whole buffer into the output pane (Ctrl+X)
    ExecuteBuffer,

    // Output pane
    /// Append a character to the output prompt
    OutputInput(char),
    /// Remove the last output-prompt character
    OutputBackspace,
    /// Submit the output prompt line for execution
    SubmitOutputLine,
    /// Focus the editor pane
    FocusEditor,
    /// Focus the output pane
    FocusOutput,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Any key other than the one that set it consumes the pending prefix;
    // the matching second key already arrived as DeleteLine/GoToTop.
    if !matches!(msg, Message::SetPending(..)) {
        model.editor.pending = None;
    }

    let mode = model.editor.mode;
    match msg {
        // Motions. The buffer clamps per mode, so these are safe to feed
        // from both Normal and Insert (arrow keys).
        Message::MoveCursor(direction) => model.editor.buffer.step(direction, mode),
        Message::LineStart => model.editor.buffer.line_start(),
        Message::LineEnd => model.editor.buffer.line_end(mode),
        Message::WordForward => model.editor.buffer.word_forward(),
        Message::WordBack => model.editor.buffer.word_back(),
        Message::GoToTop => model.editor.buffer.go_to_top(),
        Message::GoToBottom => model.editor.buffer.go_to_bottom(),

        // Normal-mode edits
        Message::DeleteAtCursor => {
            let row = model.editor.buffer.cursor().row;
            model.editor.buffer.strip_annotation(row);
            model.editor.buffer.delete_at_cursor();
        }
        Message::DeleteLine => model.editor.buffer.delete_line(),
        Message::EnterInsert(at) => model.editor.enter_insert(at),
        Message::SetPending(key, now_ms) => {
            model.editor.pending = Some(PendingKey::new(key, now_ms));
        }

        // Insert mode
        Message::InsertChar(c) => model.editor.buffer.insert_char(c),
        Message::InsertTab => {
            let spaces = " ".repeat(model.tab_width.max(1) as usize);
            model.editor.buffer.insert_str(&spaces);
        }
        Message::SplitLine => model.editor.buffer.split_line(),
        Message::DeleteBack => {
            model.editor.buffer.delete_back();
        }
        Message::LeaveInsert => model.editor.leave_insert(),

        // Command mode
        Message::BeginCommand => model.editor.begin_command(),
        Message::CommandInput(c) => model.editor.command_input(c),
        Message::CommandBackspace => model.editor.command_backspace(),
        Message::CancelCommand => model.editor.cancel_command(),
        Message::SubmitCommand => {
            let raw = model.editor.take_command();
            match command::parse(&raw) {
                Ok(cmd) => {
                    debug!(?cmd, "command accepted");
                    model.submitted = Some(cmd);
                }
                Err(err) => {
                    debug!(input = %raw, %err, "command rejected");
                    model.show_toast(ToastLevel::Error, err.to_string());
                }
            }
        }

        // Output pane
        Message::OutputInput(c) => model.output_input.push(c),
        Message::OutputBackspace => {
            model.output_input.pop();
        }
        Message::FocusEditor => model.focus = super::Focus::Editor,
        Message::FocusOutput => model.focus = super::Focus::Output,

        // ExecuteLine/ExecuteBuffer/SubmitOutputLine: handled in effects
        Message::ExecuteLine | Message::ExecuteBuffer | Message::SubmitOutputLine => {}

        // Window
        Message::Resize(width, height) => model.view_size = (width, height),

        // Application
        Message::Quit => model.should_quit = true,
    }

    if model.editor.mode == Mode::Insert || model.editor.mode == Mode::Normal {
        model.ensure_cursor_visible();
    }
    model
}
