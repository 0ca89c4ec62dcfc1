use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, InputMode, ViewMode};
use crate::util::text::tail_to_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    // The wizard overlay carries its own footer, so captures it drives
    // never reach the status row.
    let line = if app.input != InputMode::None && app.view != ViewMode::CreateWizard {
        capture_line(app, width)
    } else if let Some(error) = &app.error {
        Line::from(Span::styled(
            format!(" {error}"),
            Style::default()
                .fg(app.theme.red)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
    } else if let Some(message) = &app.message {
        let color = if app.pending_delete.is_some() {
            app.theme.yellow
        } else {
            app.theme.text
        };
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(color).bg(bg),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {}", view_hints(app.view)),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn capture_line(app: &App, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let selected = app.selected.len();
    match app.input {
        InputMode::StatusMenu => {
            return menu_line(
                app,
                " status: [s]tart  [d]one  [b]lock  [c]ancel".to_string(),
                "Esc cancel",
                width,
            );
        }
        InputMode::BatchStatus => {
            return menu_line(
                app,
                format!(" status for {selected} selected: [o]pen [i]n-progress [b]locked [d]one [c]anceled"),
                "Esc cancel",
                width,
            );
        }
        InputMode::BatchPriority => {
            return menu_line(
                app,
                format!(" priority for {selected} selected: 1-5"),
                "Esc cancel",
                width,
            );
        }
        _ => {}
    }

    let (prompt, hint) = match app.input {
        InputMode::Search => ("/", "live filter  Enter keep  Esc restore"),
        InputMode::ProjectFilter => ("project: ", "live filter  Enter keep  Esc restore"),
        InputMode::LabelFilter => ("label: ", "live filter  Enter keep  Esc restore"),
        InputMode::BlockReason => ("block reason: ", "Enter submit  Esc cancel"),
        InputMode::CancelReason => ("cancel reason: ", "Enter submit  Esc cancel"),
        InputMode::LogMessage => ("log: ", "Enter submit  Esc cancel"),
        InputMode::AddDependency => ("depends on: ", "Enter submit  Esc cancel"),
        InputMode::TextareaEdit if app.view == ViewMode::Config => {
            ("value: ", "Enter save  Esc cancel")
        }
        InputMode::TextareaEdit => ("description: ", "Ctrl+S save  Enter newline  Esc cancel"),
        _ => ("", ""),
    };

    // Multi-line buffers collapse onto one row; the caret stays visible by
    // keeping the tail.
    let buffer = app.input_buffer.replace('\n', "\u{23CE}");
    let available = width.saturating_sub(prompt.chars().count() + hint.chars().count() + 2);
    let mut spans = vec![
        Span::styled(
            prompt.to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(
            tail_to_width(&buffer, available),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
    ];
    pad_with_hint(app, &mut spans, hint, width);
    Line::from(spans)
}

fn menu_line(app: &App, text: String, hint: &'static str, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(
        text,
        Style::default().fg(app.theme.text_bright).bg(bg),
    )];
    pad_with_hint(app, &mut spans, hint, width);
    Line::from(spans)
}

fn pad_with_hint(app: &App, spans: &mut Vec<Span<'static>>, hint: &'static str, width: usize) {
    let bg = app.theme.background;
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
}

fn view_hints(view: ViewMode) -> &'static str {
    match view {
        ViewMode::List => "j/k move  Space select  Enter detail  c create  s status  / search  ? help",
        ViewMode::Detail => "Tab deps  g graph  e description  s status  m log  1-5 priority  ? help",
        ViewMode::Graph => "h/l columns  j/k rows  Enter jump  Esc back",
        ViewMode::TemplateList => "j/k move  Enter view  r reload  Esc back",
        ViewMode::TemplateDetail => "Esc back",
        ViewMode::Config => "j/k move  Enter edit  r reload  Esc back",
        ViewMode::CreateWizard => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn search_capture_shows_prompt_buffer_and_hint() {
        let mut app = app_with_items(vec![make_item("ts-1", "One")]);
        app.input = InputMode::Search;
        app.input_buffer = "parser".to_string();
        let output = render(&app);
        assert!(output.starts_with("/parser\u{258C}"));
        assert!(output.contains("Esc restore"));
    }

    #[test]
    fn error_beats_message() {
        let mut app = app_with_items(vec![]);
        app.message = Some("created ts-9".to_string());
        app.error = Some("no such item".to_string());
        let output = render(&app);
        assert!(output.contains("no such item"));
        assert!(!output.contains("created ts-9"));
    }

    #[test]
    fn idle_list_view_shows_key_hints() {
        let app = app_with_items(vec![make_item("ts-1", "One")]);
        let output = render(&app);
        assert!(output.contains("Enter detail"));
        assert!(output.contains("? help"));
    }

    #[test]
    fn status_menu_lists_shortcuts() {
        let mut app = app_with_items(vec![make_item("ts-1", "One")]);
        app.input = InputMode::StatusMenu;
        app.capture_target = Some("ts-1".to_string());
        let output = render(&app);
        assert!(output.contains("[s]tart"));
        assert!(output.contains("[b]lock"));
    }

    #[test]
    fn multiline_description_collapses_to_one_row() {
        let mut app = app_with_items(vec![make_item("ts-1", "One")]);
        app.view = ViewMode::Detail;
        app.input = InputMode::TextareaEdit;
        app.input_buffer = "line one\nline two".to_string();
        let output = render(&app);
        assert!(output.contains("line one\u{23CE}line two\u{258C}"));
        assert!(output.contains("Ctrl+S save"));
    }
}
