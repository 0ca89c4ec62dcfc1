use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, ViewMode};

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let text_color = app.theme.text;
    let bright = app.theme.text_bright;
    let highlight = app.theme.highlight;
    let dim = app.theme.dim;

    let key_style = Style::default()
        .fg(highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(text_color).bg(bg);
    let header_style = Style::default()
        .fg(bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    match app.view {
        ViewMode::List => {
            lines.push(Line::from(Span::styled(" Navigation", header_style)));
            add_binding(
                &mut lines,
                " \u{2191}\u{2193}/jk",
                "Move cursor up/down",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " \u{2190}/h",
                "Collapse / go to parent",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " \u{2192}/l",
                "Expand children",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " Tab", "Toggle expansion", key_style, desc_style);
            add_binding(&mut lines, " g/G", "First / last row", key_style, desc_style);
            lines.push(Line::from(""));

            lines.push(Line::from(Span::styled(" Items", header_style)));
            add_binding(&mut lines, " Enter", "Open detail", key_style, desc_style);
            add_binding(&mut lines, " c", "Create item (wizard)", key_style, desc_style);
            add_binding(&mut lines, " Space", "Select / deselect", key_style, desc_style);
            add_binding(&mut lines, " s", "Status menu", key_style, desc_style);
            add_binding(&mut lines, " b", "Block with reason", key_style, desc_style);
            add_binding(&mut lines, " m", "Add log entry", key_style, desc_style);
            add_binding(
                &mut lines,
                " S/P",
                "Batch status / priority (selection)",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " Ctrl+D",
                "Delete (press twice)",
                key_style,
                desc_style,
            );
            lines.push(Line::from(""));

            lines.push(Line::from(Span::styled(" Filters", header_style)));
            add_binding(&mut lines, " /", "Search titles and ids", key_style, desc_style);
            add_binding(&mut lines, " p", "Filter by project", key_style, desc_style);
            add_binding(&mut lines, " f", "Filter by label", key_style, desc_style);
            add_binding(
                &mut lines,
                " 1-5",
                "Toggle status visibility",
                key_style,
                desc_style,
            );
            lines.push(Line::from(""));

            lines.push(Line::from(Span::styled(" Views", header_style)));
            add_binding(&mut lines, " T", "Templates", key_style, desc_style);
            add_binding(&mut lines, " C", "Config", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload from disk", key_style, desc_style);
        }
        ViewMode::Detail => {
            add_binding(
                &mut lines,
                " Tab",
                "Cycle dependency cursor",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " j/k", "Move within section", key_style, desc_style);
            add_binding(
                &mut lines,
                " Enter",
                "Open selected dependency",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " g", "Dependency graph", key_style, desc_style);
            add_binding(&mut lines, " a", "Add dependency", key_style, desc_style);
            add_binding(
                &mut lines,
                " e/E",
                "Edit description (inline / $EDITOR)",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " v/V",
                "Expand / edit template variable",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " s", "Status menu", key_style, desc_style);
            add_binding(&mut lines, " b", "Block with reason", key_style, desc_style);
            add_binding(&mut lines, " m", "Add log entry", key_style, desc_style);
            add_binding(&mut lines, " 1-5", "Set priority", key_style, desc_style);
            add_binding(
                &mut lines,
                " Ctrl+D",
                "Delete (press twice)",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " Esc", "Back to list", key_style, desc_style);
        }
        ViewMode::Graph => {
            add_binding(&mut lines, " \u{2190}\u{2192}/hl", "Switch column", key_style, desc_style);
            add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move within column", key_style, desc_style);
            add_binding(
                &mut lines,
                " Enter",
                "Jump to selected item",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " Esc/q", "Back to detail", key_style, desc_style);
        }
        ViewMode::TemplateList | ViewMode::TemplateDetail => {
            add_binding(&mut lines, " j/k", "Move cursor", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Open template", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload templates", key_style, desc_style);
            add_binding(&mut lines, " Esc/q", "Back", key_style, desc_style);
        }
        ViewMode::Config => {
            add_binding(&mut lines, " j/k", "Move cursor", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Edit value", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload config", key_style, desc_style);
            add_binding(&mut lines, " Esc/q", "Back to list", key_style, desc_style);
        }
        ViewMode::CreateWizard => {
            add_binding(&mut lines, " \u{2190}/\u{2192}", "Previous / next step", key_style, desc_style);
            add_binding(&mut lines, " Tab", "Switch field", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Select / advance", key_style, desc_style);
            add_binding(&mut lines, " y", "Create (confirm step)", key_style, desc_style);
            add_binding(&mut lines, " Esc", "Abandon", key_style, desc_style);
        }
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit (from the list)", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn list_help_shows_filter_bindings() {
        let app = app_with_items(vec![make_item("ts-1", "One")]);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_help_overlay(frame, &app, area);
        });
        assert!(output.contains("Key Bindings"));
        assert!(output.contains("Search titles and ids"));
        assert!(output.contains("Toggle this help"));
    }

    #[test]
    fn wizard_help_swaps_to_step_bindings() {
        let mut app = app_with_items(vec![]);
        app.view = ViewMode::CreateWizard;
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_help_overlay(frame, &app, area);
        });
        assert!(output.contains("Previous / next step"));
        assert!(!output.contains("Search titles and ids"));
    }
}
