//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Focus, Model, OutputLine, ToastLevel};
pub use update::{Message, update};

use crate::exec::{Language, Runner};
use crate::storage::Store;

/// Main application struct that owns the collaborators and runs the event
/// loop.
pub struct App {
    buffer_name: String,
    store: Box<dyn Store>,
    runners: Vec<Box<dyn Runner>>,
    lang_override: Option<Language>,
    tab_width: u8,
}

impl App {
    /// Create a new application over a persistence backend, starting on the
    /// named buffer.
    pub fn new(buffer_name: impl Into<String>, store: Box<dyn Store>) -> Self {
        Self {
            buffer_name: buffer_name.into(),
            store,
            runners: Vec::new(),
            lang_override: None,
            tab_width: 4,
        }
    }

    /// Register an execution backend. One per language; the first match wins.
    #[must_use]
    pub fn with_runner(mut self, runner: Box<dyn Runner>) -> Self {
        self.runners.push(runner);
        self
    }

    /// Force an execution language, bypassing detection.
    #[must_use]
    pub const fn with_lang(mut self, lang: Option<Language>) -> Self {
        self.lang_override = lang;
        self
    }

    /// Set how many spaces a Tab press inserts.
    #[must_use]
    pub const fn with_tab_width(mut self, width: u8) -> Self {
        self.tab_width = width;
        self
    }
}
