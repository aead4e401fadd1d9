//! Code execution: language detection, interpreter processes, and the
//! translation of run results into inline annotations.

pub mod classify;
pub mod process;

use std::io;

use thiserror::Error;

pub use classify::detect_language;
pub use process::ProcessRunner;

/// Languages the scratchpad can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    JavaScript,
}

impl Language {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "py" | "python" => Ok(Self::Python),
            "js" | "javascript" | "node" => Ok(Self::JavaScript),
            other => Err(format!("unknown language '{other}' (expected py or js)")),
        }
    }
}

/// What a successful run produced: anything the program printed, plus the
/// value of the final expression where the interpreter reports one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub printed: String,
    pub result: Option<String>,
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{} environment not loaded", .0.name())]
    NotAvailable(Language),
    #[error("{0}")]
    Failed(String),
    #[error("failed to launch interpreter: {0}")]
    Spawn(#[from] io::Error),
}

/// Something that can execute a snippet of code.
pub trait Runner {
    fn language(&self) -> Language;

    /// Run `code` to completion and capture what it produced.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when the interpreter is missing, fails to
    /// launch, or the program itself fails.
    fn run(&self, code: &str) -> Result<RunOutcome, ExecError>;
}

/// Inline annotation text for a run, or `None` for a silent success.
///
/// Printed output wins over the expression result; interpreter "nothing"
/// values (`None`, `undefined`) never annotate. Newlines collapse to spaces
/// so the annotation stays on one line.
pub fn annotation_for(outcome: &Result<RunOutcome, ExecError>) -> Option<String> {
    match outcome {
        Ok(out) => {
            let printed = out.printed.trim();
            if !printed.is_empty() {
                return Some(collapse(printed));
            }
            match out.result.as_deref().map(str::trim) {
                Some(r) if !r.is_empty() && r != "None" && r != "undefined" => Some(collapse(r)),
                _ => None,
            }
        }
        Err(err) => Some(collapse(&format!("Error: {err}"))),
    }
}

fn collapse(s: &str) -> String {
    s.replace('\n', " ").trim().to_string()
}
