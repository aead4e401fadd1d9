use tracing::warn;

use crate::app::model::{Focus, OutputLine, ToastLevel};
use crate::app::{App, Message, Model};
use crate::editor::ExCommand;
use crate::exec::{ExecError, Language, RunOutcome, Runner, annotation_for, detect_language};

impl App {
    /// Perform the side effects a message requires after the pure state
    /// transition: persistence, interpreter runs, quitting.
    pub(super) fn handle_message_side_effects(&self, model: &mut Model, msg: &Message) {
        match msg {
            Message::SubmitCommand => {
                if let Some(cmd) = model.submitted.take() {
                    self.run_command(model, cmd);
                }
            }
            Message::ExecuteLine => self.execute_line(model),
            Message::ExecuteBuffer => self.execute_buffer(model),
            Message::SubmitOutputLine => self.submit_output_line(model),
            _ => {}
        }
    }

    fn run_command(&self, model: &mut Model, cmd: ExCommand) {
        match cmd {
            ExCommand::Quit => model.should_quit = true,
            ExCommand::Write => {
                self.save_buffer(model, None);
            }
            ExCommand::WriteAs(name) => {
                self.save_buffer(model, Some(name));
            }
            ExCommand::WriteQuit => {
                // Quit is gated on the save landing.
                if self.save_buffer(model, None) {
                    model.should_quit = true;
                }
            }
            ExCommand::Open(name) => self.open_buffer(model, &name),
            ExCommand::ExecuteBuffer => self.execute_buffer(model),
            ExCommand::ExecuteLine => self.execute_line(model),
            ExCommand::FocusOutput => model.focus = Focus::Output,
            ExCommand::FocusEditor => model.focus = Focus::Editor,
        }
    }

    /// Save under `name`, or the current filename when `None`. Annotations
    /// are stripped first; they are run artifacts, not buffer content. A new
    /// name is adopted only once the save lands, so a failed `:w <name>`
    /// leaves the editor pointing at the old file.
    fn save_buffer(&self, model: &mut Model, name: Option<String>) -> bool {
        let content = model.editor.buffer.clean_text();
        let name = name.unwrap_or_else(|| model.editor.filename.clone());
        match self.store.save(&name, &content) {
            Ok(()) => {
                model.editor.filename.clone_from(&name);
                model.editor.buffer.mark_clean();
                model.show_toast(ToastLevel::Info, format!("\"{name}\" written"));
                true
            }
            Err(err) => {
                warn!(%name, %err, "save failed");
                model.show_toast(ToastLevel::Error, err.to_string());
                false
            }
        }
    }

    /// Load a named buffer; a missing name opens a fresh empty buffer under
    /// that name.
    fn open_buffer(&self, model: &mut Model, name: &str) {
        match self.store.load(name) {
            Ok(Some(content)) => model.editor.load(name, Some(&content)),
            Ok(None) => {
                model.editor.load(name, None);
                model.show_toast(ToastLevel::Info, format!("\"{name}\" (new buffer)"));
            }
            Err(err) => {
                warn!(%name, %err, "open failed");
                model.show_toast(ToastLevel::Error, err.to_string());
                return;
            }
        }
        model.scroll_offset = 0;
    }

    fn runner_for(&self, language: Language) -> Option<&dyn Runner> {
        self.runners
            .iter()
            .find(|r| r.language() == language)
            .map(|r| &**r)
    }

    /// Pick the language for `code`: explicit override, else detection over
    /// the whole buffer so one line inherits its surroundings.
    fn language_for(&self, model: &Model) -> Language {
        model
            .lang_override
            .unwrap_or_else(|| detect_language(&model.editor.buffer.clean_text()))
    }

    fn run_code(&self, model: &Model, code: &str) -> Result<RunOutcome, ExecError> {
        let language = self.language_for(model);
        let Some(runner) = self.runner_for(language) else {
            return Err(ExecError::NotAvailable(language));
        };
        runner.run(code)
    }

    /// Run the current line and annotate it with the outcome. Silent runs
    /// clear any stale annotation instead of leaving it behind.
    fn execute_line(&self, model: &mut Model) {
        if model.executing {
            model.show_toast(ToastLevel::Warning, "Execution already in progress");
            return;
        }
        let row = model.editor.buffer.cursor().row;
        let Some(line) = model.editor.buffer.line_at(row) else {
            return;
        };
        let (code, _) = crate::editor::Buffer::split_annotation(&line);
        let code = code.trim().to_string();
        if code.is_empty() {
            return;
        }

        model.executing = true;
        let outcome = self.run_code(model, &code);
        model.executing = false;

        match annotation_for(&outcome) {
            Some(text) => model.editor.buffer.annotate(row, &text),
            None => model.editor.buffer.strip_annotation(row),
        }
    }

    /// Run the whole buffer and stream its output into the output pane.
    fn execute_buffer(&self, model: &mut Model) {
        if model.executing {
            model.show_toast(ToastLevel::Warning, "Execution already in progress");
            return;
        }
        let code = model.editor.buffer.clean_text();
        if code.trim().is_empty() {
            return;
        }

        model.executing = true;
        let outcome = self.run_code(model, &code);
        model.executing = false;

        push_outcome(model, &outcome);
    }

    /// One-line REPL at the output-pane prompt.
    fn submit_output_line(&self, model: &mut Model) {
        let code = std::mem::take(&mut model.output_input);
        let code = code.trim().to_string();
        if code.is_empty() {
            return;
        }
        model.push_output(OutputLine::plain(format!("> {code}")));

        if model.executing {
            model.show_toast(ToastLevel::Warning, "Execution already in progress");
            return;
        }
        model.executing = true;
        let language = model
            .lang_override
            .unwrap_or_else(|| detect_language(&code));
        let outcome = match self.runner_for(language) {
            Some(runner) => runner.run(&code),
            None => Err(ExecError::NotAvailable(language)),
        };
        model.executing = false;

        push_outcome(model, &outcome);
    }
}

/// Append a run's output to the pane: printed lines, else the expression
/// result, else a "(no output)" placeholder so the run is visibly done.
fn push_outcome(model: &mut Model, outcome: &Result<RunOutcome, ExecError>) {
    match outcome {
        Ok(out) => {
            let printed: Vec<&str> = out
                .printed
                .lines()
                .filter(|l| !l.trim().is_empty())
                .collect();
            if printed.is_empty() {
                match out.result.as_deref().map(str::trim) {
                    Some(r) if !r.is_empty() && r != "None" && r != "undefined" => {
                        model.push_output(OutputLine::plain(r));
                    }
                    _ => model.push_output(OutputLine::plain("(no output)")),
                }
            } else {
                for line in printed {
                    model.push_output(OutputLine::plain(line));
                }
            }
        }
        Err(err) => model.push_output(OutputLine::error(format!("Error: {err}"))),
    }
}
