//! Terminal UI components.
//!
//! Pure projection of the model onto ratatui widgets: the editor pane with
//! its gutter and inline annotations, the output pane, and the status bar.

mod render;
mod status;

pub use render::render;

/// Rows reserved for the output pane, borders included.
pub const OUTPUT_PANE_ROWS: u16 = 8;
/// Width of the line-number gutter, separator included.
pub const GUTTER_WIDTH: usize = 5;
