use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, InputMode};
use crate::util::text::truncate_to_width;

/// Render the flattened config as editable `path = value` rows
pub fn render_config_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    if app.config_fields.is_empty() {
        let loading = Paragraph::new(" loading\u{2026}")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(loading, area);
        return;
    }

    let width = area.width as usize;
    let path_width = app
        .config_fields
        .iter()
        .map(|(path, _)| path.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, (path, value)) in app.config_fields.iter().enumerate() {
        let is_cursor = idx == app.config_cursor;
        let editing = is_cursor
            && app.input == InputMode::TextareaEdit
            && app.capture_target.as_deref() == Some(path.as_str());
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let bar = if is_cursor { "\u{258E}" } else { " " };

        let mut spans = vec![
            Span::styled(
                bar.to_string(),
                Style::default().fg(app.theme.selection_border).bg(row_bg),
            ),
            Span::styled(
                format!("{path:<path_width$}"),
                Style::default()
                    .fg(if is_cursor {
                        app.theme.text_bright
                    } else {
                        app.theme.text
                    })
                    .bg(row_bg),
            ),
            Span::styled(" = ", Style::default().fg(app.theme.dim).bg(row_bg)),
        ];
        let value_width = width.saturating_sub(path_width + 5);
        if editing {
            spans.push(Span::styled(
                truncate_to_width(&app.input_buffer, value_width),
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(row_bg),
            ));
        } else {
            spans.push(Span::styled(
                truncate_to_width(value, value_width),
                Style::default().fg(app.theme.green).bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::msg::Msg;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_config_view(frame, app, area);
        })
    }

    fn app_with_config() -> App {
        let mut app = app_with_items(vec![]);
        app.apply_msg(Msg::ConfigLoaded(vec![
            ("default_project".to_string(), "demo".to_string()),
            ("stale.after_hours".to_string(), "72".to_string()),
        ]));
        app
    }

    #[test]
    fn rows_show_path_and_value() {
        let app = app_with_config();
        let output = render(&app);
        assert!(output.contains("default_project"));
        assert!(output.contains("= demo"));
        assert!(output.contains("stale.after_hours"));
        assert!(output.contains("= 72"));
    }

    #[test]
    fn cursor_bar_tracks_config_cursor() {
        let mut app = app_with_config();
        app.config_cursor = 1;
        let output = render(&app);
        let bar_line = output
            .lines()
            .find(|l| l.contains('\u{258E}'))
            .unwrap_or_default();
        assert!(bar_line.contains("stale.after_hours"));
    }

    #[test]
    fn editing_row_shows_the_buffer_instead_of_the_value() {
        let mut app = app_with_config();
        app.config_cursor = 1;
        app.input = InputMode::TextareaEdit;
        app.capture_target = Some("stale.after_hours".to_string());
        app.input_buffer = "48".to_string();
        let output = render(&app);
        let row = output
            .lines()
            .find(|l| l.contains("stale.after_hours"))
            .unwrap_or_default();
        assert!(row.contains("= 48\u{258C}"));
        assert!(!row.contains("72"));
    }
}
