// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorState)
    clippy::module_name_repetitions
)]

//! # Linerun
//!
//! A modal terminal scratchpad that runs your code line by line.
//!
//! Linerun is a vim-flavored editor over named buffers with:
//! - Normal/Insert/Command modes and the usual motions
//! - Inline execution results appended to the line (`code → result`)
//! - Whole-buffer runs streamed into an output pane with a one-line REPL
//! - Python and JavaScript backends, picked by syntax detection
//!
//! ## Architecture
//!
//! Linerun uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Buffer, modes, and colon-command parsing
//! - [`exec`]: Language detection and interpreter backends
//! - [`storage`]: Named-buffer persistence
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod editor;
pub mod exec;
pub mod storage;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{Buffer, EditorState, Mode};
    pub use crate::exec::{Language, Runner};
    pub use crate::storage::Store;
}
