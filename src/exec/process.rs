//! Runs snippets through a local interpreter process.

use std::io::ErrorKind;
use std::process::Command;

use tracing::debug;

use super::{ExecError, Language, RunOutcome, Runner};

/// A [`Runner`] that hands code to an interpreter binary on `PATH`
/// (`python3 -c` or `node -e`) and captures its output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    language: Language,
    program: String,
    eval_flag: &'static str,
}

impl ProcessRunner {
    pub fn new(language: Language) -> Self {
        let (program, eval_flag) = match language {
            Language::Python => ("python3", "-c"),
            Language::JavaScript => ("node", "-e"),
        };
        Self {
            language,
            program: program.to_string(),
            eval_flag,
        }
    }

    #[cfg(test)]
    fn with_program(language: Language, program: &str, eval_flag: &'static str) -> Self {
        Self {
            language,
            program: program.to_string(),
            eval_flag,
        }
    }
}

impl Runner for ProcessRunner {
    fn language(&self) -> Language {
        self.language
    }

    fn run(&self, code: &str) -> Result<RunOutcome, ExecError> {
        debug!(program = %self.program, bytes = code.len(), "spawning interpreter");
        let output = Command::new(&self.program)
            .arg(self.eval_flag)
            .arg(code)
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    ExecError::NotAvailable(self.language)
                } else {
                    ExecError::Spawn(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            Ok(RunOutcome {
                printed: stdout,
                // A subprocess prints or it doesn't; there is no separate
                // expression-value channel like an embedded interpreter has.
                result: None,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ExecError::Failed(last_error_line(&stderr)))
        }
    }
}

/// The most useful line of an interpreter traceback is the last non-empty
/// one (`NameError: ...`, `ReferenceError: ...`).
fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("execution failed")
        .trim()
        .to_string()
}
