use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Status;
use crate::tui::wizard::WizardState;

use super::*;

pub(super) fn handle_list(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    if handle_help_overlay(app, key) {
        return Vec::new();
    }

    match (key.modifiers, key.code) {
        // Movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            app.move_cursor(1);
            Vec::new()
        }
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            app.move_cursor(-1);
            Vec::new()
        }
        (_, KeyCode::Char('g')) => {
            app.cursor = 0;
            Vec::new()
        }
        (_, KeyCode::Char('G')) => {
            app.cursor = app.visible_rows().len().saturating_sub(1);
            Vec::new()
        }

        // Tree expansion
        (_, KeyCode::Char('l')) | (_, KeyCode::Right) => {
            if let Some(row) = row_info(app) {
                if row.has_children && !row.is_expanded {
                    app.expanded.insert(row.id);
                }
            }
            Vec::new()
        }
        (_, KeyCode::Char('h')) | (_, KeyCode::Left) => {
            collapse_or_go_parent(app);
            Vec::new()
        }
        (_, KeyCode::Tab) => {
            if let Some(row) = row_info(app) {
                if row.has_children {
                    if row.is_expanded {
                        app.expanded.remove(&row.id);
                    } else {
                        app.expanded.insert(row.id);
                    }
                }
            }
            Vec::new()
        }

        // Navigation out of the list
        (_, KeyCode::Enter) => match app.current_id() {
            Some(id) => app.open_detail(id),
            None => Vec::new(),
        },
        (_, KeyCode::Char('T')) => {
            app.view = ViewMode::TemplateList;
            vec![Cmd::LoadTemplates]
        }
        (_, KeyCode::Char('C')) => {
            app.view = ViewMode::Config;
            vec![Cmd::LoadConfig]
        }
        (_, KeyCode::Char('c')) => {
            app.wizard = Some(WizardState::new(app.project.clone()));
            app.view = ViewMode::CreateWizard;
            sync_wizard_input(app);
            Vec::new()
        }

        // Selection
        (_, KeyCode::Char(' ')) => {
            if let Some(id) = app.current_id() {
                if !app.selected.remove(&id) {
                    app.selected.insert(id);
                }
            }
            Vec::new()
        }

        // Targeted actions
        (_, KeyCode::Char('s')) => {
            if let Some(target) = app.current_id() {
                start_capture(app, InputMode::StatusMenu, Some(target), "");
            }
            Vec::new()
        }
        (_, KeyCode::Char('b')) => {
            if let Some(target) = app.current_id() {
                start_capture(app, InputMode::BlockReason, Some(target), "");
            }
            Vec::new()
        }
        (_, KeyCode::Char('m')) => {
            if let Some(target) = app.current_id() {
                start_capture(app, InputMode::LogMessage, Some(target), "");
            }
            Vec::new()
        }

        // Batch actions require a selection
        (_, KeyCode::Char('S')) => {
            if app.selected.is_empty() {
                app.set_error("no items selected");
            } else {
                start_capture(app, InputMode::BatchStatus, None, "");
            }
            Vec::new()
        }
        (_, KeyCode::Char('P')) => {
            if app.selected.is_empty() {
                app.set_error("no items selected");
            } else {
                start_capture(app, InputMode::BatchPriority, None, "");
            }
            Vec::new()
        }

        // Filters
        (_, KeyCode::Char('/')) => {
            app.filter_backup = Some(app.filter.clone());
            let initial = app.filter.search.clone();
            start_capture(app, InputMode::Search, None, &initial);
            Vec::new()
        }
        (_, KeyCode::Char('p')) => {
            app.filter_backup = Some(app.filter.clone());
            let initial = app.filter.project.clone();
            start_capture(app, InputMode::ProjectFilter, None, &initial);
            Vec::new()
        }
        (_, KeyCode::Char('f')) => {
            app.filter_backup = Some(app.filter.clone());
            let initial = app.filter.label.clone();
            start_capture(app, InputMode::LabelFilter, None, &initial);
            Vec::new()
        }
        (_, KeyCode::Char(c @ '1'..='5')) => {
            let index = c as usize - '1' as usize;
            app.filter.toggle_status(Status::ALL[index]);
            app.move_cursor(0);
            Vec::new()
        }

        // Store maintenance
        (_, KeyCode::Char('r')) => vec![Cmd::Reload],

        // Delete needs the same key twice on the same item
        (m, KeyCode::Char('d')) if m.contains(KeyModifiers::CONTROL) => delete_guard(app),

        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            Vec::new()
        }
        (_, KeyCode::Char('q')) => {
            app.should_quit = true;
            Vec::new()
        }
        // Escape clears active filters first; quits only from the default
        // filter state.
        (_, KeyCode::Esc) => {
            if app.filter.is_default() {
                app.should_quit = true;
            } else {
                app.filter.clear();
                app.move_cursor(0);
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

struct RowInfo {
    id: String,
    has_children: bool,
    is_expanded: bool,
    level: usize,
}

fn row_info(app: &App) -> Option<RowInfo> {
    app.visible_rows().get(app.cursor).map(|row| RowInfo {
        id: row.item.id.clone(),
        has_children: row.has_children,
        is_expanded: row.is_expanded,
        level: row.level,
    })
}

/// `h`: collapse an expanded node, otherwise move up to the parent row.
fn collapse_or_go_parent(app: &mut App) {
    let Some(row) = row_info(app) else {
        return;
    };
    if row.is_expanded {
        app.expanded.remove(&row.id);
        return;
    }
    if row.level == 0 {
        return;
    }
    let parent = app
        .item(&row.id)
        .and_then(|item| item.parent.clone());
    if let Some(parent) = parent {
        if let Some(pos) = app.visible_ids().iter().position(|id| *id == parent) {
            app.cursor = pos;
        }
    }
}

pub(super) fn delete_guard(app: &mut App) -> Vec<Cmd> {
    let Some(target) = app.action_target() else {
        return Vec::new();
    };
    if app.pending_delete.as_deref() == Some(target.as_str()) {
        app.pending_delete = None;
        vec![Cmd::DeleteItem { id: target }]
    } else {
        app.pending_delete = Some(target.clone());
        app.set_message(format!("Ctrl+D again to delete {target}"));
        Vec::new()
    }
}
