use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::editor::EditTarget;

use super::*;

pub(super) fn handle_detail(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    if handle_help_overlay(app, key) {
        return Vec::new();
    }
    let Some(id) = app.detail_id() else {
        app.view = ViewMode::List;
        return Vec::new();
    };

    match (key.modifiers, key.code) {
        // Escape leaves dependency navigation before leaving the view.
        (_, KeyCode::Esc) => {
            let in_dep_nav = app
                .detail
                .as_ref()
                .is_some_and(|d| d.dep_cursor.is_some());
            if in_dep_nav {
                if let Some(detail) = app.detail.as_mut() {
                    detail.dep_cursor = None;
                }
            } else {
                app.detail = None;
                app.graph = None;
                app.view = ViewMode::List;
            }
            Vec::new()
        }

        // Tab cycles through the dependency lists.
        (_, KeyCode::Tab) => {
            if let Some(detail) = app.detail.as_mut() {
                let count = detail.dep_count();
                if count > 0 {
                    detail.dep_cursor = Some(match detail.dep_cursor {
                        None => 0,
                        Some(i) => (i + 1) % count,
                    });
                }
            }
            Vec::new()
        }
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            move_inner_cursor(app, 1);
            Vec::new()
        }
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            move_inner_cursor(app, -1);
            Vec::new()
        }
        // Enter follows the dependency under the cursor.
        (_, KeyCode::Enter) => {
            let target = app
                .detail
                .as_ref()
                .and_then(|d| d.dep_selection())
                .map(str::to_string);
            match target {
                Some(dep_id) if app.item(&dep_id).is_some() => app.open_detail(dep_id),
                Some(dep_id) => {
                    app.set_message(format!("{dep_id} not found"));
                    Vec::new()
                }
                None => Vec::new(),
            }
        }

        (_, KeyCode::Char('g')) => {
            app.rebuild_graph();
            if app.graph.is_some() {
                app.view = ViewMode::Graph;
            }
            Vec::new()
        }

        (_, KeyCode::Char('a')) => {
            start_capture(app, InputMode::AddDependency, Some(id), "");
            Vec::new()
        }
        (_, KeyCode::Char('e')) => {
            let description = app
                .item(&id)
                .map(|i| i.description.clone())
                .unwrap_or_default();
            start_capture(app, InputMode::TextareaEdit, Some(id), &description);
            Vec::new()
        }
        (_, KeyCode::Char('E')) => {
            let description = app
                .item(&id)
                .map(|i| i.description.clone())
                .unwrap_or_default();
            app.pending_edit = Some((EditTarget::Description, description));
            Vec::new()
        }
        // Template variable under the cursor: toggle expansion, or edit it
        // externally.
        (_, KeyCode::Char('v')) => {
            if let Some(name) = current_variable(app, &id) {
                let detail = app.detail.as_mut().filter(|d| d.id == id);
                if let Some(detail) = detail {
                    if !detail.expanded_vars.remove(&name) {
                        detail.expanded_vars.insert(name);
                    }
                }
            }
            Vec::new()
        }
        (_, KeyCode::Char('V')) => {
            if let Some(name) = current_variable(app, &id) {
                let value = app
                    .item(&id)
                    .and_then(|i| i.template.as_ref())
                    .and_then(|t| t.variables.get(&name).cloned())
                    .unwrap_or_default();
                app.pending_edit = Some((EditTarget::Variable(name), value));
            }
            Vec::new()
        }

        (_, KeyCode::Char(c @ '1'..='5')) => {
            let priority = c as u8 - b'0';
            vec![Cmd::SetPriority { id, priority }]
        }
        (_, KeyCode::Char('s')) => {
            start_capture(app, InputMode::StatusMenu, Some(id), "");
            Vec::new()
        }
        (_, KeyCode::Char('b')) => {
            start_capture(app, InputMode::BlockReason, Some(id), "");
            Vec::new()
        }
        (_, KeyCode::Char('m')) => {
            start_capture(app, InputMode::LogMessage, Some(id), "");
            Vec::new()
        }
        (m, KeyCode::Char('d')) if m.contains(KeyModifiers::CONTROL) => delete_guard(app),
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// j/k move the dependency cursor while navigating deps, otherwise the
/// template-variable cursor.
fn move_inner_cursor(app: &mut App, delta: isize) {
    let var_count = app
        .detail_id()
        .and_then(|id| app.item(&id))
        .and_then(|i| i.template.as_ref())
        .map(|t| t.variables.len())
        .unwrap_or(0);
    let Some(detail) = app.detail.as_mut() else {
        return;
    };
    if let Some(cursor) = detail.dep_cursor {
        let count = detail.dep_count();
        if count > 0 {
            let max = count - 1;
            detail.dep_cursor = Some(cursor.saturating_add_signed(delta).min(max));
        }
        return;
    }
    if var_count > 0 {
        let max = var_count - 1;
        detail.var_cursor = detail.var_cursor.saturating_add_signed(delta).min(max);
    }
}

fn current_variable(app: &App, id: &str) -> Option<String> {
    let cursor = app.detail.as_ref()?.var_cursor;
    let template = app.item(id)?.template.as_ref()?;
    template
        .variables
        .get_index(cursor)
        .map(|(name, _)| name.clone())
}
