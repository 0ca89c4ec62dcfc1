pub mod config_view;
pub mod detail_view;
pub mod graph_view;
pub mod help_overlay;
pub mod list_view;
pub mod status_row;
pub mod templates_view;
pub mod title_bar;
pub mod wizard_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, ViewMode};

/// Main render function, dispatching to the per-view renderers.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    title_bar::render_title_bar(frame, app, chunks[0]);

    match app.view {
        ViewMode::List => list_view::render_list_view(frame, app, chunks[1]),
        ViewMode::Detail => detail_view::render_detail_view(frame, app, chunks[1]),
        ViewMode::Graph => graph_view::render_graph_view(frame, app, chunks[1]),
        ViewMode::TemplateList => templates_view::render_template_list(frame, app, chunks[1]),
        ViewMode::TemplateDetail => templates_view::render_template_detail(frame, app, chunks[1]),
        ViewMode::Config => config_view::render_config_view(frame, app, chunks[1]),
        ViewMode::CreateWizard => wizard_view::render_wizard(frame, app, chunks[1]),
    }

    // Help overlay sits on top of everything.
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
