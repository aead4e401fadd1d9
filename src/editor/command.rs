use thiserror::Error;

/// A parsed colon command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:q` — discard the buffer and close the editor.
    Quit,
    /// `:w` — persist under the current filename.
    Write,
    /// `:w <name>` — persist under `<name>` and adopt it as the filename.
    WriteAs(String),
    /// `:wq` / `:x` — persist, then close only if the save succeeded.
    WriteQuit,
    /// `:o <name>` — load `<name>`, replacing the buffer.
    Open(String),
    /// `:run` / `:py` / `:js` — execute the whole buffer.
    ExecuteBuffer,
    /// `:run -l` / `:py -l` / `:js -l` — execute the current line inline.
    ExecuteLine,
    /// `:t` — move focus to the output pane.
    FocusOutput,
    /// `:c` — move focus back to the editor.
    FocusEditor,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("{0} requires a file name")]
    MissingName(&'static str),
}

/// Parse the command buffer content (after the leading ':').
///
/// # Errors
///
/// Returns [`ParseError::Unknown`] for unrecognized commands and
/// [`ParseError::MissingName`] when `:o` is given without an argument.
pub fn parse(input: &str) -> Result<ExCommand, ParseError> {
    let input = input.trim();
    let (head, rest) = input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(h, r)| (h, r.trim()));

    match (head, rest) {
        ("q" | "quit", "") => Ok(ExCommand::Quit),
        ("w" | "write", "") => Ok(ExCommand::Write),
        ("w" | "write", name) => Ok(ExCommand::WriteAs(name.to_string())),
        ("wq" | "x", "") => Ok(ExCommand::WriteQuit),
        ("o" | "open", "") => Err(ParseError::MissingName("open")),
        ("o" | "open", name) => Ok(ExCommand::Open(name.to_string())),
        ("run" | "py" | "python" | "js" | "javascript", "") => Ok(ExCommand::ExecuteBuffer),
        ("run" | "py" | "python" | "js" | "javascript", "-l") => Ok(ExCommand::ExecuteLine),
        ("t" | "terminal", "") => Ok(ExCommand::FocusOutput),
        ("c" | "code", "") => Ok(ExCommand::FocusEditor),
        _ => Err(ParseError::Unknown(input.to_string())),
    }
}
