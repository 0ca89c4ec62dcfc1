use crossterm::event::{KeyCode, KeyEvent};

use super::*;

pub(super) fn handle_template_list(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    if handle_help_overlay(app, key) {
        return Vec::new();
    }
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            if !app.templates.is_empty() {
                let max = app.templates.len() - 1;
                app.template_cursor = (app.template_cursor + 1).min(max);
            }
            Vec::new()
        }
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            app.template_cursor = app.template_cursor.saturating_sub(1);
            Vec::new()
        }
        (_, KeyCode::Enter) => {
            let Some(template) = app.templates.get(app.template_cursor) else {
                return Vec::new();
            };
            let id = template.id.clone();
            app.template_detail = None;
            app.view = ViewMode::TemplateDetail;
            vec![Cmd::LoadTemplate { id }]
        }
        (_, KeyCode::Char('r')) => vec![Cmd::LoadTemplates],
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

pub(super) fn handle_template_detail(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    if handle_help_overlay(app, key) {
        return Vec::new();
    }
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => {
            app.template_detail = None;
            app.view = ViewMode::TemplateList;
            Vec::new()
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            Vec::new()
        }
        _ => Vec::new(),
    }
}
