use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{DepRef, Item, ItemKind, Template};
use crate::template::find_unused;
use crate::tui::app::{App, DetailState};
use crate::util::text::{truncate_to_width, wrap_text};

/// How many log entries the activity tail shows.
const LOG_TAIL: usize = 6;

/// Render the detail view for a single item
pub fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let Some(detail) = app.detail.as_ref() else {
        return;
    };
    let Some(item) = app.item(&detail.id) else {
        let gone = Paragraph::new(format!(" {} no longer exists", detail.id)).style(dim_style);
        frame.render_widget(gone, area);
        return;
    };

    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    let kind = match item.kind {
        ItemKind::Task => "task",
        ItemKind::Epic => "epic",
    };
    lines.push(Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            format!("{} ", item.status.icon()),
            Style::default().fg(app.theme.status_color(item.status)).bg(bg),
        ),
        Span::styled(
            format!("{} ", item.id),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled(format!("\u{B7} {kind} "), dim_style),
        Span::styled(
            format!("\u{B7} {} ", item.status.name()),
            Style::default().fg(app.theme.status_color(item.status)).bg(bg),
        ),
        Span::styled(
            format!("\u{B7} p{}", item.priority),
            Style::default().fg(app.theme.priority_color(item.priority)).bg(bg),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!(" {}", item.title),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    push_meta(&mut lines, app, "project", &item.project);
    if let Some(parent) = &item.parent {
        push_meta(&mut lines, app, "parent", parent);
    }
    if !item.labels.is_empty() {
        let labels: Vec<String> = item.labels.iter().map(|l| format!("#{l}")).collect();
        push_meta(&mut lines, app, "labels", &labels.join(" "));
    }
    if let Some(worktree) = &item.worktree {
        let text = if worktree.base.is_empty() {
            worktree.branch.clone()
        } else {
            format!("{} (from {})", worktree.branch, worktree.base)
        };
        push_meta(&mut lines, app, "worktree", &text);
    }
    push_meta(
        &mut lines,
        app,
        "created",
        &item.created_at.format("%Y-%m-%d %H:%M").to_string(),
    );
    push_meta(
        &mut lines,
        app,
        "updated",
        &item.updated_at.format("%Y-%m-%d %H:%M").to_string(),
    );
    lines.push(Line::from(""));

    push_section(&mut lines, app, "description", width);
    if item.description.is_empty() {
        lines.push(Line::from(Span::styled(" (none)", dim_style)));
    } else {
        for wrapped in wrap_text(&item.description, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(
                format!(" {wrapped}"),
                Style::default().fg(app.theme.text).bg(bg),
            )));
        }
    }
    lines.push(Line::from(""));

    if let Some(link) = &item.template {
        push_section(&mut lines, app, "template", width);
        lines.push(Line::from(vec![
            Span::styled(" from ", dim_style),
            Span::styled(
                link.template_id.clone(),
                Style::default().fg(app.theme.purple).bg(bg),
            ),
        ]));
        let unused = unused_variables(app, item);
        for (idx, (name, value)) in link.variables.iter().enumerate() {
            let is_var_cursor = detail.dep_cursor.is_none() && idx == detail.var_cursor;
            push_variable(
                &mut lines,
                app,
                name,
                value,
                is_var_cursor,
                detail.expanded_vars.contains(name),
                unused.iter().any(|u| u == name),
                width,
            );
        }
        lines.push(Line::from(""));
    }

    if !detail.loaded {
        lines.push(Line::from(Span::styled(" loading\u{2026}", dim_style)));
    } else {
        // The dependency cursor indexes depends_on first, then blocks.
        if !detail.depends_on.is_empty() {
            push_section(&mut lines, app, "depends on", width);
            for (idx, dep) in detail.depends_on.iter().enumerate() {
                push_dep_line(&mut lines, app, detail, idx, dep);
            }
            lines.push(Line::from(""));
        }
        if !detail.blocks.is_empty() {
            push_section(&mut lines, app, "blocks", width);
            let offset = detail.depends_on.len();
            for (idx, dep) in detail.blocks.iter().enumerate() {
                push_dep_line(&mut lines, app, detail, offset + idx, dep);
            }
            lines.push(Line::from(""));
        }

        if !detail.logs.is_empty() {
            push_section(&mut lines, app, "activity", width);
            let skip = detail.logs.len().saturating_sub(LOG_TAIL);
            for entry in detail.logs.iter().skip(skip) {
                lines.push(Line::from(vec![
                    Span::styled(format!(" {} ", entry.at.format("%m-%d %H:%M")), dim_style),
                    Span::styled(
                        format!("{} ", entry.actor),
                        Style::default().fg(app.theme.cyan).bg(bg),
                    ),
                    Span::styled(
                        entry.text.clone(),
                        Style::default().fg(app.theme.text).bg(bg),
                    ),
                ]));
            }
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn push_meta(lines: &mut Vec<Line<'static>>, app: &App, name: &str, value: &str) {
    let bg = app.theme.background;
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {name:<9}"),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(
            value.to_string(),
            Style::default().fg(app.theme.text).bg(bg),
        ),
    ]));
}

fn push_section(lines: &mut Vec<Line<'static>>, app: &App, name: &str, width: usize) {
    let bg = app.theme.background;
    let rule_len = width.saturating_sub(name.chars().count() + 4);
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {name} "),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "\u{2500}".repeat(rule_len),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]));
}

#[allow(clippy::too_many_arguments)]
fn push_variable(
    lines: &mut Vec<Line<'static>>,
    app: &App,
    name: &str,
    value: &str,
    is_cursor: bool,
    expanded: bool,
    unused: bool,
    width: usize,
) {
    let bg = app.theme.background;
    let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
    let marker = if is_cursor { "\u{25B8}" } else { " " };
    let mut spans = vec![
        Span::styled(
            marker.to_string(),
            Style::default().fg(app.theme.highlight).bg(row_bg),
        ),
        Span::styled(
            format!("{name}: "),
            Style::default().fg(app.theme.text).bg(row_bg),
        ),
    ];
    if unused {
        spans.push(Span::styled(
            "(unused) ",
            Style::default().fg(app.theme.yellow).bg(row_bg),
        ));
    }

    if expanded {
        lines.push(Line::from(spans));
        for wrapped in wrap_text(value, width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(
                format!("   {wrapped}"),
                Style::default().fg(app.theme.dim).bg(bg),
            )));
        }
    } else {
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let first_line = value.lines().next().unwrap_or("");
        spans.push(Span::styled(
            truncate_to_width(first_line, width.saturating_sub(used + 1)),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ));
        lines.push(Line::from(spans));
    }
}

fn push_dep_line(
    lines: &mut Vec<Line<'static>>,
    app: &App,
    detail: &DetailState,
    idx: usize,
    dep: &DepRef,
) {
    let bg = app.theme.background;
    let is_cursor = detail.dep_cursor == Some(idx);
    let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
    let bar = if is_cursor { "\u{258E}" } else { " " };
    lines.push(Line::from(vec![
        Span::styled(
            bar.to_string(),
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        ),
        Span::styled(
            format!("{} ", dep.status.icon()),
            Style::default().fg(app.theme.status_color(dep.status)).bg(row_bg),
        ),
        Span::styled(
            format!("{} ", dep.id),
            Style::default()
                .fg(if is_cursor {
                    app.theme.text_bright
                } else {
                    app.theme.text
                })
                .bg(row_bg),
        ),
        Span::styled(
            dep.title.clone(),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ),
    ]));
}

/// Variables stored on the item that the template body no longer references.
/// Needs the template body, so nothing is reported until templates are cached.
fn unused_variables(app: &App, item: &Item) -> Vec<String> {
    let Some(link) = &item.template else {
        return Vec::new();
    };
    let template: Option<&Template> = app
        .templates
        .iter()
        .find(|t| t.id == link.template_id)
        .or(app
            .template_detail
            .as_ref()
            .filter(|t| t.id == link.template_id));
    match template {
        Some(t) => find_unused(&t.body, &t.variable_names(), &link.variables),
        None => Vec::new(),
    }
}
