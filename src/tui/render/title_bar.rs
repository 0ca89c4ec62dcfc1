use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ViewMode};

/// Render the title bar: project and view name, with a separator line below
/// that carries the active filter summary.
pub fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1]);
}

fn view_name(app: &App) -> &'static str {
    match app.view {
        ViewMode::List => "items",
        ViewMode::Detail => "detail",
        ViewMode::Graph => "graph",
        ViewMode::TemplateList | ViewMode::TemplateDetail => "templates",
        ViewMode::Config => "config",
        ViewMode::CreateWizard => "create",
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "\u{25C6}",
        Style::default().fg(app.theme.purple).bg(bg),
    ));
    spans.push(Span::styled(
        format!(" {} ", app.project),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    spans.push(Span::styled(
        format!(" {} ", view_name(app)),
        Style::default().fg(app.theme.text).bg(bg),
    ));

    // Selection count on the right edge.
    if !app.selected.is_empty() {
        let tag = format!("{} selected ", app.selected.len());
        let content: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let tag_width = tag.chars().count();
        if content + tag_width < width {
            spans.push(Span::styled(" ".repeat(width - content - tag_width), bg_style));
            spans.push(Span::styled(
                tag,
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
        }
    }

    let title = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(title, area);
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    let summary = app.filter.summary();
    if app.view == ViewMode::List && !summary.is_empty() {
        // Embed the filter summary at the right end of the rule.
        let indicator = format!(" filter: {} ", summary);
        let indicator_width = indicator.chars().count();
        let rule_end = width.saturating_sub(indicator_width + 1);

        let mut spans: Vec<Span> = Vec::new();
        spans.push(Span::styled(
            "\u{2500}".repeat(rule_end),
            Style::default().fg(dim).bg(bg),
        ));
        spans.push(Span::styled(
            indicator,
            Style::default().fg(app.theme.purple).bg(bg),
        ));
        let current: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        if current < width {
            spans.push(Span::styled(
                "\u{2500}".repeat(width - current),
                Style::default().fg(dim).bg(bg),
            ));
        }
        let sep = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
        frame.render_widget(sep, area);
    } else {
        let rule = "\u{2500}".repeat(width);
        let sep = Paragraph::new(rule).style(Style::default().fg(dim).bg(bg));
        frame.render_widget(sep, area);
    }
}
