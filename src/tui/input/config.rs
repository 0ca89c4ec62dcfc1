use crossterm::event::{KeyCode, KeyEvent};

use super::*;

pub(super) fn handle_config(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    if handle_help_overlay(app, key) {
        return Vec::new();
    }
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            if !app.config_fields.is_empty() {
                let max = app.config_fields.len() - 1;
                app.config_cursor = (app.config_cursor + 1).min(max);
            }
            Vec::new()
        }
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            app.config_cursor = app.config_cursor.saturating_sub(1);
            Vec::new()
        }
        // Enter edits the value under the cursor in place.
        (_, KeyCode::Enter) => {
            if let Some((path, value)) = app.config_fields.get(app.config_cursor).cloned() {
                start_capture(app, InputMode::TextareaEdit, Some(path), &value);
            }
            Vec::new()
        }
        (_, KeyCode::Char('r')) => vec![Cmd::LoadConfig],
        (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => {
            app.view = ViewMode::List;
            Vec::new()
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Config values are single lines, so the shared textarea mode gets line
/// semantics here: Enter submits instead of inserting a newline.
pub(super) fn edit_config_value(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    match line_event(app, key) {
        CaptureEvent::Submit => {
            let Some(path) = app.capture_target.clone() else {
                end_capture(app);
                return Vec::new();
            };
            let value = app.input_buffer.clone();
            end_capture(app);
            vec![Cmd::SetConfigField { path, value }]
        }
        CaptureEvent::Cancel => {
            end_capture(app);
            Vec::new()
        }
        CaptureEvent::Edited | CaptureEvent::Ignored => Vec::new(),
    }
}
