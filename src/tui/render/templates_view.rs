use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::template::render;
use crate::tui::app::App;
use crate::util::text::{truncate_to_width, wrap_text};

/// Render the template list view
pub fn render_template_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    if app.templates.is_empty() {
        let hint = Paragraph::new(" No templates. Add .trellis/templates/*.toml files to define some.")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(hint, area);
        return;
    }

    let width = area.width as usize;
    let name_width = app
        .templates
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, template) in app.templates.iter().enumerate() {
        let is_cursor = idx == app.template_cursor;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let bar = if is_cursor { "\u{258E}" } else { " " };
        let name = format!("{:<name_width$} ", truncate_to_width(&template.name, name_width));
        let id = format!("({}) ", template.id);
        let used = 1 + name.chars().count() + id.chars().count();
        let description = truncate_to_width(&template.description, width.saturating_sub(used + 1));
        lines.push(Line::from(vec![
            Span::styled(
                bar.to_string(),
                Style::default().fg(app.theme.selection_border).bg(row_bg),
            ),
            Span::styled(
                name,
                Style::default()
                    .fg(if is_cursor {
                        app.theme.text_bright
                    } else {
                        app.theme.text
                    })
                    .bg(row_bg),
            ),
            Span::styled(id, Style::default().fg(app.theme.purple).bg(row_bg)),
            Span::styled(description, Style::default().fg(app.theme.dim).bg(row_bg)),
        ]));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Render one template with its variables and raw body
pub fn render_template_detail(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let Some(template) = app.template_detail.as_ref() else {
        let loading = Paragraph::new(" loading\u{2026}").style(dim_style);
        frame.render_widget(loading, area);
        return;
    };

    let width = area.width as usize;
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", template.name),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("({})", template.id), Style::default().fg(app.theme.purple).bg(bg)),
        ]),
        Line::from(""),
    ];
    if !template.description.is_empty() {
        for wrapped in wrap_text(&template.description, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(
                format!(" {wrapped}"),
                Style::default().fg(app.theme.text).bg(bg),
            )));
        }
        lines.push(Line::from(""));
    }

    if !template.variables.is_empty() {
        lines.push(Line::from(Span::styled(
            " variables",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )));
        for variable in &template.variables {
            let mut spans = vec![Span::styled(
                format!("   {}", variable.name),
                Style::default().fg(app.theme.cyan).bg(bg),
            )];
            if !variable.prompt.is_empty() {
                spans.push(Span::styled(format!("  {}", variable.prompt), dim_style));
            }
            if !variable.default.is_empty() {
                spans.push(Span::styled(
                    format!("  [default: {}]", variable.default),
                    Style::default().fg(app.theme.yellow).bg(bg),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        " body",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    for raw in template.body.lines() {
        if raw.is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in wrap_text(raw, width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(format!("   {wrapped}"), dim_style)));
        }
    }

    // Preview with each variable at its default (empty when none)
    let defaults: IndexMap<String, String> = template
        .variables
        .iter()
        .map(|v| (v.name.clone(), v.default.clone()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " preview",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    for raw in render(&template.body, &defaults).lines() {
        if raw.is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in wrap_text(raw, width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(format!("   {wrapped}"), text_style)));
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
