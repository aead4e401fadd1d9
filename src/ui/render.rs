use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{Focus, Model};
use crate::editor::Buffer;

use super::{GUTTER_WIDTH, OUTPUT_PANE_ROWS, status};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(OUTPUT_PANE_ROWS),
            Constraint::Length(1),
        ])
        .split(area);

    render_editor(model, frame, chunks[0]);
    render_output(model, frame, chunks[1]);
    status::render_status_bar(model, frame, chunks[2]);
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buffer = &model.editor.buffer;
    let cursor = buffer.cursor();
    let show_cursor = model.focus == Focus::Editor;
    let rows = area.height as usize;

    let lines: Vec<Line> = (model.scroll_offset..model.scroll_offset + rows)
        .map_while(|row| {
            let line = buffer.line_at(row)?;
            let cursor_col = (show_cursor && row == cursor.row).then_some(cursor.col);
            Some(editor_line(row, &line, cursor_col))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Build one editor row: gutter, code with an optional reversed cursor cell,
/// and the dimmed annotation span.
fn editor_line(row: usize, line: &str, cursor_col: Option<usize>) -> Line<'static> {
    let gutter = format!("{:>width$} ", row + 1, width = GUTTER_WIDTH - 1);
    let mut spans = vec![Span::styled(gutter, Style::default().fg(Color::DarkGray))];

    let (code, annotation) = Buffer::split_annotation(line);
    match cursor_col {
        Some(col) if col < code.len() => {
            let ch_len = code[col..].chars().next().map_or(1, char::len_utf8);
            spans.push(Span::raw(code[..col].to_string()));
            spans.push(Span::styled(
                code[col..col + ch_len].to_string(),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
            spans.push(Span::raw(code[col + ch_len..].to_string()));
        }
        Some(_) => {
            // Insertion point past the end of the code.
            spans.push(Span::raw(code.to_string()));
            spans.push(Span::styled(
                " ".to_string(),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        }
        None => spans.push(Span::raw(code.to_string())),
    }

    if let Some(annotation) = annotation {
        spans.push(Span::styled(
            annotation.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    Line::from(spans)
}

fn render_output(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Output;
    let block = Block::default()
        .title("Output")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner_rows = area.height.saturating_sub(2) as usize;

    // Last lines, leaving the bottom row for the prompt.
    let history_rows = inner_rows.saturating_sub(1);
    let start = model.output_lines.len().saturating_sub(history_rows);
    let mut lines: Vec<Line> = model.output_lines[start..]
        .iter()
        .map(|out| {
            if out.is_error {
                Line::styled(out.text.clone(), Style::default().fg(Color::Red))
            } else {
                Line::raw(out.text.clone())
            }
        })
        .collect();

    let mut prompt = vec![
        Span::styled("> ", Style::default().fg(Color::Green)),
        Span::raw(model.output_input.clone()),
    ];
    if focused {
        prompt.push(Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }
    lines.push(Line::from(prompt));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
