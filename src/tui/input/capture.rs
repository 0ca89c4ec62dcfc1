use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Status;

use super::*;

pub(super) enum CaptureEvent {
    Edited,
    Submit,
    Cancel,
    Ignored,
}

/// Shared line-capture editing: append, backspace, submit on Enter, cancel
/// on Escape.
pub(super) fn line_event(app: &mut App, key: KeyEvent) -> CaptureEvent {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => CaptureEvent::Cancel,
        (_, KeyCode::Enter) => CaptureEvent::Submit,
        (_, KeyCode::Backspace) => {
            app.input_buffer.pop();
            CaptureEvent::Edited
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.input_buffer.push(c);
            CaptureEvent::Edited
        }
        _ => CaptureEvent::Ignored,
    }
}

pub(super) fn start_capture(app: &mut App, mode: InputMode, target: Option<String>, initial: &str) {
    app.input = mode;
    app.capture_target = target;
    app.input_buffer.clear();
    app.input_buffer.push_str(initial);
}

pub(super) fn end_capture(app: &mut App) {
    app.input = InputMode::None;
    app.input_buffer.clear();
    app.capture_target = None;
}

// ---------------------------------------------------------------------------
// Reason/message captures
// ---------------------------------------------------------------------------

pub(super) fn block_reason(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    reason_capture(app, key, Status::Blocked)
}

pub(super) fn cancel_reason(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    reason_capture(app, key, Status::Canceled)
}

fn reason_capture(app: &mut App, key: KeyEvent, status: Status) -> Vec<Cmd> {
    match line_event(app, key) {
        CaptureEvent::Submit => {
            let Some(id) = app.capture_target.clone() else {
                end_capture(app);
                return Vec::new();
            };
            let reason = app.input_buffer.trim().to_string();
            end_capture(app);
            vec![Cmd::SetStatus {
                id,
                status,
                reason: (!reason.is_empty()).then_some(reason),
            }]
        }
        CaptureEvent::Cancel => {
            end_capture(app);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

pub(super) fn log_message(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    match line_event(app, key) {
        CaptureEvent::Submit => {
            let text = app.input_buffer.trim().to_string();
            if text.is_empty() {
                // Stay in the capture; nothing is issued for an empty note.
                app.set_error("log message is empty");
                return Vec::new();
            }
            let Some(id) = app.capture_target.clone() else {
                end_capture(app);
                return Vec::new();
            };
            end_capture(app);
            vec![Cmd::AddLog { id, text }]
        }
        CaptureEvent::Cancel => {
            end_capture(app);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

pub(super) fn add_dependency(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    match line_event(app, key) {
        CaptureEvent::Submit => {
            let blocker = app.input_buffer.trim().to_string();
            if blocker.is_empty() {
                app.set_error("dependency id is empty");
                return Vec::new();
            }
            let Some(blocked) = app.capture_target.clone() else {
                end_capture(app);
                return Vec::new();
            };
            end_capture(app);
            vec![Cmd::AddDependency { blocker, blocked }]
        }
        CaptureEvent::Cancel => {
            end_capture(app);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Filter captures: edits apply live, Escape restores the saved state
// ---------------------------------------------------------------------------

enum FilterField {
    Search,
    Project,
    Label,
}

pub(super) fn search(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    filter_capture(app, key, FilterField::Search)
}

pub(super) fn project_filter(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    filter_capture(app, key, FilterField::Project)
}

pub(super) fn label_filter(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    filter_capture(app, key, FilterField::Label)
}

fn filter_capture(app: &mut App, key: KeyEvent, field: FilterField) -> Vec<Cmd> {
    match line_event(app, key) {
        CaptureEvent::Edited => {
            apply_filter_field(app, &field);
            app.move_cursor(0);
        }
        CaptureEvent::Submit => {
            apply_filter_field(app, &field);
            app.filter_backup = None;
            end_capture(app);
            app.move_cursor(0);
        }
        CaptureEvent::Cancel => {
            if let Some(backup) = app.filter_backup.take() {
                app.filter = backup;
            }
            end_capture(app);
            app.move_cursor(0);
        }
        CaptureEvent::Ignored => {}
    }
    Vec::new()
}

fn apply_filter_field(app: &mut App, field: &FilterField) {
    let value = app.input_buffer.clone();
    match field {
        FilterField::Search => app.filter.search = value,
        FilterField::Project => app.filter.project = value,
        FilterField::Label => app.filter.label = value,
    }
}

// ---------------------------------------------------------------------------
// Batch captures: one letter applied to every selected item
// ---------------------------------------------------------------------------

pub(super) fn batch_status(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    match key.code {
        KeyCode::Esc => {
            end_capture(app);
            Vec::new()
        }
        KeyCode::Char(c) => match Status::from_code(c) {
            Some(status) => {
                let ids: Vec<String> = app.selected.iter().cloned().collect();
                end_capture(app);
                ids.into_iter()
                    .map(|id| Cmd::SetStatus {
                        id,
                        status,
                        reason: None,
                    })
                    .collect()
            }
            None => {
                app.set_error(format!("unknown status letter '{c}'"));
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

pub(super) fn batch_priority(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    match key.code {
        KeyCode::Esc => {
            end_capture(app);
            Vec::new()
        }
        KeyCode::Char(c) => match c.to_digit(10).filter(|d| (1..=5).contains(d)) {
            Some(priority) => {
                let ids: Vec<String> = app.selected.iter().cloned().collect();
                end_capture(app);
                ids.into_iter()
                    .map(|id| Cmd::SetPriority {
                        id,
                        priority: priority as u8,
                    })
                    .collect()
            }
            None => {
                app.set_error(format!("priority must be 1-5, got '{c}'"));
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Multi-line description editing
// ---------------------------------------------------------------------------

pub(super) fn textarea_edit(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            end_capture(app);
            Vec::new()
        }
        (m, KeyCode::Char('s')) if m.contains(KeyModifiers::CONTROL) => {
            let Some(id) = app.capture_target.clone() else {
                end_capture(app);
                return Vec::new();
            };
            let text = app.input_buffer.clone();
            end_capture(app);
            vec![Cmd::SetDescription { id, text }]
        }
        (_, KeyCode::Enter) => {
            app.input_buffer.push('\n');
            Vec::new()
        }
        (_, KeyCode::Backspace) => {
            app.input_buffer.pop();
            Vec::new()
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.input_buffer.push(c);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Status menu overlay: single-letter shortcuts
// ---------------------------------------------------------------------------

pub(super) fn status_menu(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    let Some(target) = app.capture_target.clone() else {
        end_capture(app);
        return Vec::new();
    };
    match key.code {
        KeyCode::Char('s') => {
            end_capture(app);
            vec![Cmd::SetStatus {
                id: target,
                status: Status::InProgress,
                reason: None,
            }]
        }
        KeyCode::Char('d') => {
            end_capture(app);
            vec![Cmd::SetStatus {
                id: target,
                status: Status::Done,
                reason: None,
            }]
        }
        // Block and cancel want a reason; hand over to those captures with
        // the same target.
        KeyCode::Char('b') => {
            app.input = InputMode::BlockReason;
            app.input_buffer.clear();
            Vec::new()
        }
        KeyCode::Char('c') => {
            app.input = InputMode::CancelReason;
            app.input_buffer.clear();
            Vec::new()
        }
        KeyCode::Esc => {
            end_capture(app);
            Vec::new()
        }
        _ => Vec::new(),
    }
}
