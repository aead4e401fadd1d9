use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToastLevel};

/// Bottom bar: an active toast wins the row; otherwise mode (or the command
/// echo) on the left, position and filename on the right.
pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if render_toast_bar(model, frame, area) {
        return;
    }

    let left = model
        .command_echo()
        .map_or_else(|| model.editor.mode.label().to_string(), String::from);

    let cursor = model.editor.buffer.cursor();
    let display_col = model
        .editor
        .buffer
        .line_at(cursor.row)
        .map_or(0, |line| line[..cursor.col.min(line.len())].width());
    let dirty = if model.editor.buffer.is_dirty() {
        " [+]"
    } else {
        ""
    };
    let right = format!(
        "{}{}  Line {}, Col {} ",
        model.editor.filename,
        dirty,
        cursor.row + 1,
        display_col + 1
    );

    let pad = (area.width as usize).saturating_sub(left.width() + right.width());
    let status = format!("{}{}{}", left, " ".repeat(pad), right);
    let bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}

fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) -> bool {
    let Some((message, level)) = model.active_toast() else {
        return false;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
    true
}
