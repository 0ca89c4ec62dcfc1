mod capture;
mod config;
mod detail;
mod graph;
mod list;
mod templates;
mod wizard;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, InputMode, ViewMode};
use super::msg::Cmd;

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use capture::*;
#[allow(unused_imports)]
use config::*;
#[allow(unused_imports)]
use detail::*;
#[allow(unused_imports)]
use graph::*;
#[allow(unused_imports)]
use list::*;
#[allow(unused_imports)]
use templates::*;
#[allow(unused_imports)]
use wizard::*;

pub type Handler = fn(&mut App, KeyEvent) -> Vec<Cmd>;

/// The transition table: every `(view, input)` pair resolves to exactly one
/// handler, so each transition can be exercised on its own.
pub fn handler_for(view: ViewMode, input: InputMode) -> Handler {
    match (view, input) {
        // The wizard owns all of its captures, whatever the sub-mode says.
        (ViewMode::CreateWizard, _) => handle_wizard,

        // Config reuses the text capture slot with line semantics.
        (ViewMode::Config, InputMode::TextareaEdit) => edit_config_value,

        (_, InputMode::BlockReason) => block_reason,
        (_, InputMode::LogMessage) => log_message,
        (_, InputMode::CancelReason) => cancel_reason,
        (_, InputMode::Search) => search,
        (_, InputMode::ProjectFilter) => project_filter,
        (_, InputMode::LabelFilter) => label_filter,
        (_, InputMode::AddDependency) => add_dependency,
        (_, InputMode::BatchStatus) => batch_status,
        (_, InputMode::BatchPriority) => batch_priority,
        (_, InputMode::TextareaEdit) => textarea_edit,
        (_, InputMode::StatusMenu) => status_menu,
        (_, InputMode::CreateTitle) | (_, InputMode::CreateType) => handle_wizard,

        (ViewMode::List, InputMode::None) => handle_list,
        (ViewMode::Detail, InputMode::None) => handle_detail,
        (ViewMode::Graph, InputMode::None) => handle_graph,
        (ViewMode::TemplateList, InputMode::None) => handle_template_list,
        (ViewMode::TemplateDetail, InputMode::None) => handle_template_detail,
        (ViewMode::Config, InputMode::None) => handle_config,
    }
}

/// Help overlay intercepts everything while open. Returns true when the key
/// was consumed.
pub(super) fn handle_help_overlay(app: &mut App, key: KeyEvent) -> bool {
    if !app.show_help {
        return false;
    }
    if matches!(
        key.code,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')
    ) {
        app.show_help = false;
    }
    true
}

#[cfg(test)]
pub(super) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        KeyEvent::new(KeyCode::Char(c), modifiers)
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn type_str(app: &mut crate::tui::app::App, text: &str) {
        for c in text.chars() {
            app.on_key(ch(c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_modes_route_to_capture_handlers_regardless_of_view() {
        // Same capture handler from List and Detail; different view handlers
        // when no capture is active.
        assert!(std::ptr::fn_addr_eq(
            handler_for(ViewMode::List, InputMode::BlockReason),
            handler_for(ViewMode::Detail, InputMode::BlockReason),
        ));
        assert!(!std::ptr::fn_addr_eq(
            handler_for(ViewMode::List, InputMode::None),
            handler_for(ViewMode::Detail, InputMode::None),
        ));
    }

    #[test]
    fn wizard_view_wins_over_capture_modes() {
        assert!(std::ptr::fn_addr_eq(
            handler_for(ViewMode::CreateWizard, InputMode::TextareaEdit),
            handler_for(ViewMode::CreateWizard, InputMode::None),
        ));
    }

    #[test]
    fn config_text_capture_gets_line_semantics() {
        assert!(!std::ptr::fn_addr_eq(
            handler_for(ViewMode::Config, InputMode::TextareaEdit),
            handler_for(ViewMode::Detail, InputMode::TextareaEdit),
        ));
    }
}
