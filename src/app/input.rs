use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus, Message, Model};
use crate::editor::{Direction, InsertAt, Mode};

impl App {
    /// Translate a terminal event into a message, given the current state.
    /// Key handling reads the model (mode, focus, pending key) but never
    /// mutates it; all transitions go through `update`.
    pub(super) fn handle_event(event: &Event, model: &Model, now_ms: u64) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Self::handle_key(*key, model, now_ms)
            }
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    fn handle_key(key: KeyEvent, model: &Model, now_ms: u64) -> Option<Message> {
        // Execution shortcuts work from every mode and pane.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('e') => return Some(Message::ExecuteLine),
                KeyCode::Char('x') => return Some(Message::ExecuteBuffer),
                KeyCode::Char('c') => return Some(Message::Quit),
                _ => {}
            }
        }

        if model.focus == Focus::Output {
            return Self::handle_output_key(key);
        }

        match model.editor.mode {
            Mode::Normal => Self::handle_normal_key(key, model, now_ms),
            Mode::Insert => Self::handle_insert_key(key),
            Mode::Command => Self::handle_command_key(key),
        }
    }

    fn handle_normal_key(key: KeyEvent, model: &Model, now_ms: u64) -> Option<Message> {
        // Resolve double-key sequences first. A live pending prefix plus its
        // partner key becomes the combined action; anything else falls
        // through (and `update` drops the prefix).
        if let Some(pending) = model.editor.pending
            && let KeyCode::Char(c) = key.code
            && pending.completes(c, now_ms)
        {
            match c {
                'd' => return Some(Message::DeleteLine),
                'g' => return Some(Message::GoToTop),
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('h') | KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Char('l') | KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Char('0') | KeyCode::Home => Some(Message::LineStart),
            KeyCode::Char('$') | KeyCode::End => Some(Message::LineEnd),
            KeyCode::Char('w') => Some(Message::WordForward),
            KeyCode::Char('b') => Some(Message::WordBack),
            KeyCode::Char('G') => Some(Message::GoToBottom),
            KeyCode::Char('x') => Some(Message::DeleteAtCursor),
            KeyCode::Char('i') => Some(Message::EnterInsert(InsertAt::Cursor)),
            KeyCode::Char('a') => Some(Message::EnterInsert(InsertAt::After)),
            KeyCode::Char('A') => Some(Message::EnterInsert(InsertAt::LineEnd)),
            KeyCode::Char('I') => Some(Message::EnterInsert(InsertAt::LineStart)),
            KeyCode::Char('o') => Some(Message::EnterInsert(InsertAt::Below)),
            KeyCode::Char('O') => Some(Message::EnterInsert(InsertAt::Above)),
            KeyCode::Char(':') => Some(Message::BeginCommand),
            KeyCode::Char(c @ ('d' | 'g')) => Some(Message::SetPending(c, now_ms)),
            _ => None,
        }
    }

    fn handle_insert_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::LeaveInsert),
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Tab => Some(Message::InsertTab),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Char(c) => Some(Message::InsertChar(c)),
            _ => None,
        }
    }

    fn handle_command_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::CancelCommand),
            KeyCode::Enter => Some(Message::SubmitCommand),
            KeyCode::Backspace => Some(Message::CommandBackspace),
            KeyCode::Char(c) => Some(Message::CommandInput(c)),
            _ => None,
        }
    }

    fn handle_output_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::FocusEditor),
            KeyCode::Enter => Some(Message::SubmitOutputLine),
            KeyCode::Backspace => Some(Message::OutputBackspace),
            KeyCode::Char(c) => Some(Message::OutputInput(c)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorState, PENDING_KEY_TIMEOUT_MS};

    fn press(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn model_in(mode: Mode) -> Model {
        let mut model = Model::new(EditorState::new("f", Some("text")), (80, 24));
        model.editor.mode = mode;
        model
    }

    #[test]
    fn test_normal_mode_motions() {
        let model = model_in(Mode::Normal);
        assert_eq!(
            App::handle_event(&press('j'), &model, 0),
            Some(Message::MoveCursor(Direction::Down))
        );
        assert_eq!(App::handle_event(&press('$'), &model, 0), Some(Message::LineEnd));
        assert_eq!(App::handle_event(&press('G'), &model, 0), Some(Message::GoToBottom));
    }

    #[test]
    fn test_first_d_sets_pending_second_deletes() {
        let mut model = model_in(Mode::Normal);
        assert_eq!(
            App::handle_event(&press('d'), &model, 100),
            Some(Message::SetPending('d', 100))
        );
        model = crate::app::update(model, Message::SetPending('d', 100));
        assert_eq!(
            App::handle_event(&press('d'), &model, 200),
            Some(Message::DeleteLine)
        );
    }

    #[test]
    fn test_expired_pending_restarts_sequence() {
        let mut model = model_in(Mode::Normal);
        model = crate::app::update(model, Message::SetPending('d', 100));
        let late = 100 + PENDING_KEY_TIMEOUT_MS + 1;
        assert_eq!(
            App::handle_event(&press('d'), &model, late),
            Some(Message::SetPending('d', late))
        );
    }

    #[test]
    fn test_insert_mode_types_motion_letters() {
        let model = model_in(Mode::Insert);
        assert_eq!(
            App::handle_event(&press('j'), &model, 0),
            Some(Message::InsertChar('j'))
        );
        assert_eq!(
            App::handle_event(&Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)), &model, 0),
            Some(Message::LeaveInsert)
        );
    }

    #[test]
    fn test_command_mode_collects_and_submits() {
        let model = model_in(Mode::Command);
        assert_eq!(
            App::handle_event(&press('w'), &model, 0),
            Some(Message::CommandInput('w'))
        );
        assert_eq!(
            App::handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), &model, 0),
            Some(Message::SubmitCommand)
        );
    }

    #[test]
    fn test_ctrl_shortcuts_work_in_insert_mode() {
        let model = model_in(Mode::Insert);
        assert_eq!(App::handle_event(&ctrl('e'), &model, 0), Some(Message::ExecuteLine));
        assert_eq!(App::handle_event(&ctrl('x'), &model, 0), Some(Message::ExecuteBuffer));
    }

    #[test]
    fn test_output_focus_takes_keys() {
        let mut model = model_in(Mode::Normal);
        model.focus = Focus::Output;
        assert_eq!(
            App::handle_event(&press('1'), &model, 0),
            Some(Message::OutputInput('1'))
        );
        assert_eq!(
            App::handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), &model, 0),
            Some(Message::SubmitOutputLine)
        );
    }
}
