use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::ItemKind;
use crate::tui::wizard::{
    STEP_CONFIRM, STEP_CONTENT, STEP_DESCRIPTION, STEP_KIND, STEP_METHOD, STEP_PRIORITY,
    STEP_RELATIONS, STEP_WORKTREE, WizardMethod, WizardState,
};

use super::*;

pub(super) fn handle_wizard(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    let (step, method) = match &app.wizard {
        Some(w) => (w.step, w.method),
        None => {
            app.view = ViewMode::List;
            return Vec::new();
        }
    };

    match (key.modifiers, key.code) {
        // Escape abandons the wizard; nothing has touched the store yet.
        (_, KeyCode::Esc) => {
            app.close_wizard();
            Vec::new()
        }
        (_, KeyCode::Left) => {
            if let Some(w) = app.wizard.as_mut() {
                w.back();
            }
            sync_wizard_input(app);
            Vec::new()
        }
        (_, KeyCode::Right) => advance(app),
        (_, KeyCode::Tab) => {
            if step == STEP_DESCRIPTION {
                return advance(app);
            }
            if let Some(w) = app.wizard.as_mut() {
                match w.step {
                    STEP_PRIORITY | STEP_WORKTREE => w.focus = (w.focus + 1) % 2,
                    STEP_RELATIONS => w.focus = (w.focus + 1) % 3,
                    STEP_CONTENT => match w.method {
                        WizardMethod::AdHoc => w.focus = (w.focus + 1) % 2,
                        WizardMethod::Template => {
                            if !w.variables.is_empty() {
                                w.var_cursor = (w.var_cursor + 1) % w.variables.len();
                            }
                        }
                    },
                    _ => {}
                }
            }
            Vec::new()
        }
        (_, KeyCode::Enter) => match step {
            STEP_METHOD => {
                apply_method_choice(app);
                advance(app)
            }
            // Enter walks the variable list; from the last variable it
            // advances the step.
            STEP_CONTENT if method == WizardMethod::Template => {
                let at_last = app.wizard.as_ref().is_some_and(|w| {
                    w.variables.is_empty() || w.var_cursor + 1 >= w.variables.len()
                });
                if at_last {
                    advance(app)
                } else {
                    if let Some(w) = app.wizard.as_mut() {
                        w.var_cursor += 1;
                    }
                    Vec::new()
                }
            }
            STEP_DESCRIPTION => {
                if let Some(w) = app.wizard.as_mut() {
                    w.description.push('\n');
                }
                Vec::new()
            }
            STEP_CONFIRM => submit(app),
            _ => advance(app),
        },
        (_, KeyCode::Up) => {
            vertical(app, -1);
            Vec::new()
        }
        (_, KeyCode::Down) => {
            vertical(app, 1);
            Vec::new()
        }
        (_, KeyCode::Backspace) => {
            if let Some(w) = app.wizard.as_mut() {
                if let Some(buf) = focused_buffer(w) {
                    buf.pop();
                }
            }
            Vec::new()
        }
        (_, KeyCode::Char('y')) if step == STEP_CONFIRM => submit(app),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            on_char(app, c);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Mirror the wizard step into the input mode the status row displays.
pub(super) fn sync_wizard_input(app: &mut App) {
    app.input = match app.wizard.as_ref().map(|w| w.step) {
        Some(STEP_KIND) => InputMode::CreateType,
        Some(STEP_CONTENT) => InputMode::CreateTitle,
        Some(STEP_DESCRIPTION) => InputMode::TextareaEdit,
        _ => InputMode::None,
    };
}

/// Advance a step. Landing on the method step with no templates cached yet
/// kicks off a load so the list is ready by the time it renders.
fn advance(app: &mut App) -> Vec<Cmd> {
    let advanced = app.wizard.as_mut().is_some_and(|w| w.next());
    sync_wizard_input(app);
    let on_method = app.wizard.as_ref().is_some_and(|w| w.step == STEP_METHOD);
    if advanced && on_method && app.templates.is_empty() {
        vec![Cmd::LoadTemplates]
    } else {
        Vec::new()
    }
}

fn apply_method_choice(app: &mut App) {
    let choice = app.wizard.as_ref().map(|w| w.method_cursor).unwrap_or(0);
    let template = match choice {
        0 => None,
        n => app.templates.get(n - 1).cloned(),
    };
    if let Some(w) = app.wizard.as_mut() {
        match template {
            Some(t) => w.choose_template(t),
            None => w.choose_ad_hoc(),
        }
    }
}

fn submit(app: &mut App) -> Vec<Cmd> {
    let Some(w) = app.wizard.as_ref() else {
        return Vec::new();
    };
    let submission = w.submission();
    app.pending_create = Some(submission.follow_ups);
    app.close_wizard();
    vec![submission.create]
}

/// Up/Down drive whichever selector the current step shows.
fn vertical(app: &mut App, delta: isize) {
    let template_count = app.templates.len();
    let Some(w) = app.wizard.as_mut() else {
        return;
    };
    match w.step {
        STEP_KIND => toggle_kind(w),
        STEP_METHOD => {
            // Entry 0 is ad hoc; templates follow.
            w.method_cursor = w
                .method_cursor
                .saturating_add_signed(delta)
                .min(template_count);
        }
        STEP_CONTENT if w.method == WizardMethod::Template => {
            if !w.variables.is_empty() {
                let max = w.variables.len() - 1;
                w.var_cursor = w.var_cursor.saturating_add_signed(delta).min(max);
            }
        }
        _ => {}
    }
}

fn toggle_kind(w: &mut WizardState) {
    w.kind = match w.kind {
        ItemKind::Task => ItemKind::Epic,
        ItemKind::Epic => ItemKind::Task,
    };
}

fn on_char(app: &mut App, c: char) {
    let step = match app.wizard.as_ref() {
        Some(w) => w.step,
        None => return,
    };
    // The method step is a pure selector; j/k drive it like Up/Down.
    if step == STEP_METHOD {
        match c {
            'j' => vertical(app, 1),
            'k' => vertical(app, -1),
            _ => {}
        }
        return;
    }
    let Some(w) = app.wizard.as_mut() else {
        return;
    };
    match w.step {
        STEP_KIND => match c {
            't' => w.kind = ItemKind::Task,
            'e' => w.kind = ItemKind::Epic,
            'j' | 'k' => toggle_kind(w),
            _ => {}
        },
        STEP_PRIORITY if w.focus == 0 => match c {
            '1'..='5' => w.priority = c as u8 - b'0',
            'p' => {
                w.use_custom_project = !w.use_custom_project;
                if w.use_custom_project {
                    w.focus = 1;
                }
            }
            _ => {}
        },
        STEP_CONFIRM => {}
        _ => {
            // Typing into the project field implies wanting it used.
            if w.step == STEP_PRIORITY && w.focus == 1 {
                w.use_custom_project = true;
            }
            if let Some(buf) = focused_buffer(w) {
                buf.push(c);
            }
        }
    }
}

/// The text buffer chars land in, given the step and its focus.
fn focused_buffer(w: &mut WizardState) -> Option<&mut String> {
    match w.step {
        STEP_PRIORITY if w.focus == 1 => Some(&mut w.project),
        STEP_RELATIONS => Some(match w.focus {
            0 => &mut w.parent,
            1 => &mut w.depends_on,
            _ => &mut w.blocks,
        }),
        STEP_WORKTREE => Some(if w.focus == 0 {
            &mut w.branch
        } else {
            &mut w.base
        }),
        STEP_CONTENT => match w.method {
            WizardMethod::AdHoc => Some(if w.focus == 0 {
                &mut w.title
            } else {
                &mut w.labels
            }),
            WizardMethod::Template => w.variables.get_index_mut(w.var_cursor).map(|(_, v)| v),
        },
        STEP_DESCRIPTION => Some(&mut w.description),
        _ => None,
    }
}
