use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::ItemKind;
use crate::tui::app::App;
use crate::tui::wizard::{
    description_accepted, WizardMethod, WizardState, STEP_CONFIRM, STEP_CONTENT, STEP_DESCRIPTION,
    STEP_KIND, STEP_METHOD, STEP_PRIORITY, STEP_RELATIONS, STEP_WORKTREE,
};
use crate::util::text::{truncate_to_width, word_count, wrap_text};

/// Render the eight-step creation wizard as a centered overlay
pub fn render_wizard(frame: &mut Frame, app: &App, area: Rect) {
    let Some(w) = app.wizard.as_ref() else {
        return;
    };

    let overlay_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);
    let width = overlay_area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(
                format!(" step {}/8 ", w.step),
                Style::default().fg(app.theme.highlight).bg(bg),
            ),
            Span::styled(
                format!("\u{B7} {}", step_name(w.step)),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    match w.step {
        STEP_KIND => render_kind(app, w, &mut lines),
        STEP_PRIORITY => render_priority(app, w, &mut lines),
        STEP_RELATIONS => render_relations(app, w, &mut lines),
        STEP_WORKTREE => render_worktree(app, w, &mut lines),
        STEP_METHOD => render_method(app, w, &mut lines, width),
        STEP_CONTENT => render_content(app, w, &mut lines, width),
        STEP_DESCRIPTION => render_description(app, w, &mut lines, width),
        _ => render_confirm(app, w, &mut lines, width),
    }

    if let Some(error) = &w.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default()
                .fg(app.theme.red)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " \u{2190} back  \u{2192}/Enter next  Esc cancel",
        dim_style,
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" create item ")
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn step_name(step: u8) -> &'static str {
    match step {
        STEP_KIND => "kind",
        STEP_PRIORITY => "priority & project",
        STEP_RELATIONS => "relations",
        STEP_WORKTREE => "worktree",
        STEP_METHOD => "method",
        STEP_CONTENT => "content",
        STEP_DESCRIPTION => "description",
        _ => "confirm",
    }
}

fn render_kind(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>) {
    choice_line(app, lines, w.kind == ItemKind::Task, "task", "a unit of work (ts- prefix)");
    choice_line(app, lines, w.kind == ItemKind::Epic, "epic", "groups tasks, may carry a worktree (ep- prefix)");
}

fn render_priority(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>) {
    let bg = app.theme.background;
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {:<12}", "priority"),
            label_style(app, w.focus == 0),
        ),
        Span::styled(
            format!("p{}", w.priority),
            Style::default()
                .fg(app.theme.priority_color(w.priority))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  (1 highest .. 5 lowest)", Style::default().fg(app.theme.dim).bg(bg)),
    ]));
    if w.use_custom_project || w.focus == 1 {
        field_line(app, lines, "project", &w.project, w.focus == 1);
    } else {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<12}", "project"), label_style(app, false)),
            Span::styled(
                w.current_project.clone(),
                Style::default().fg(app.theme.text).bg(bg),
            ),
            Span::styled("  (p to change)", Style::default().fg(app.theme.dim).bg(bg)),
        ]));
    }
}

fn render_relations(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>) {
    field_line(app, lines, "parent", &w.parent, w.focus == 0);
    field_line(app, lines, "depends on", &w.depends_on, w.focus == 1);
    field_line(app, lines, "blocks", &w.blocks, w.focus == 2);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ids separated by commas or spaces, Tab to switch fields",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    )));
}

fn render_worktree(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>) {
    field_line(app, lines, "branch", &w.branch, w.focus == 0);
    field_line(app, lines, "base", &w.base, w.focus == 1);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " leave branch empty to skip the worktree",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    )));
}

fn render_method(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>, width: usize) {
    choice_line(app, lines, w.method_cursor == 0, "ad hoc", "type a title and labels yourself");
    for (idx, template) in app.templates.iter().enumerate() {
        let selected = w.method_cursor == idx + 1;
        let description = truncate_to_width(&template.description, width.saturating_sub(16));
        choice_line_owned(app, lines, selected, template.name.clone(), description);
    }
    if app.templates.is_empty() {
        lines.push(Line::from(Span::styled(
            " (no templates defined)",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )));
    }
}

fn render_content(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>, width: usize) {
    let bg = app.theme.background;
    if w.method == WizardMethod::AdHoc {
        field_line(app, lines, "title", &w.title, w.focus == 0);
        field_line(app, lines, "labels", &w.labels, w.focus == 1);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " labels separated by commas",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        return;
    }

    if let Some(template) = &w.template {
        lines.push(Line::from(vec![
            Span::styled(" template ", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled(
                template.name.clone(),
                Style::default().fg(app.theme.purple).bg(bg),
            ),
        ]));
        lines.push(Line::from(""));
        for (idx, (name, value)) in w.variables.iter().enumerate() {
            let focused = idx == w.var_cursor;
            let prompt = template
                .variables
                .iter()
                .find(|v| v.name == *name)
                .map(|v| v.prompt.as_str())
                .unwrap_or("");
            let label = if prompt.is_empty() {
                name.clone()
            } else {
                format!("{name} ({prompt})")
            };
            let label = truncate_to_width(&label, width.saturating_sub(20));
            field_line_owned(app, lines, label, value.clone(), focused);
        }
    }
}

fn render_description(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>, width: usize) {
    let bg = app.theme.background;
    for wrapped in wrap_text(&w.description, width.saturating_sub(2)) {
        lines.push(Line::from(Span::styled(
            format!(" {wrapped}"),
            Style::default().fg(app.theme.text).bg(bg),
        )));
    }
    // Caret on the last line.
    if let Some(last) = lines.last_mut() {
        last.spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    lines.push(Line::from(""));
    let words = word_count(&w.description);
    let gate = if description_accepted(&w.description) {
        Span::styled(
            format!(" {words} words"),
            Style::default().fg(app.theme.green).bg(bg),
        )
    } else {
        Span::styled(
            format!(" {words} words (need 3 words or 20 characters)"),
            Style::default().fg(app.theme.yellow).bg(bg),
        )
    };
    lines.push(Line::from(vec![
        gate,
        Span::styled(
            "  Enter newline, Tab to continue",
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]));
}

fn render_confirm(app: &App, w: &WizardState, lines: &mut Vec<Line<'static>>, width: usize) {
    let bg = app.theme.background;
    let kind = match w.kind {
        ItemKind::Task => "task",
        ItemKind::Epic => "epic",
    };
    let title = match (&w.method, &w.template) {
        (WizardMethod::Template, Some(t)) => t.name.clone(),
        _ => w.title.trim().to_string(),
    };

    summary_line(app, lines, "kind", kind.to_string());
    summary_line(app, lines, "title", title);
    summary_line(app, lines, "project", w.effective_project().to_string());
    summary_line(app, lines, "priority", format!("p{}", w.priority));
    if !w.parent.trim().is_empty() {
        summary_line(app, lines, "parent", w.parent.trim().to_string());
    }
    if !w.depends_on.trim().is_empty() {
        summary_line(app, lines, "depends on", w.depends_on.trim().to_string());
    }
    if !w.blocks.trim().is_empty() {
        summary_line(app, lines, "blocks", w.blocks.trim().to_string());
    }
    if !w.labels.trim().is_empty() {
        summary_line(app, lines, "labels", w.labels.trim().to_string());
    }
    if w.kind == ItemKind::Epic && !w.branch.trim().is_empty() {
        summary_line(app, lines, "worktree", w.branch.trim().to_string());
    }
    let first = w.description.lines().next().unwrap_or("");
    summary_line(
        app,
        lines,
        "description",
        truncate_to_width(first, width.saturating_sub(16)),
    );

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " press y or Enter to create",
        Style::default()
            .fg(app.theme.green)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
}

fn label_style(app: &App, focused: bool) -> Style {
    let bg = app.theme.background;
    if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    }
}

fn field_line(app: &App, lines: &mut Vec<Line<'static>>, label: &str, value: &str, focused: bool) {
    field_line_owned(app, lines, label.to_string(), value.to_string(), focused);
}

fn field_line_owned(
    app: &App,
    lines: &mut Vec<Line<'static>>,
    label: String,
    value: String,
    focused: bool,
) {
    let bg = app.theme.background;
    let mut spans = vec![
        Span::styled(format!(" {label:<12}"), label_style(app, focused)),
        Span::styled(
            value,
            Style::default()
                .fg(if focused {
                    app.theme.text_bright
                } else {
                    app.theme.text
                })
                .bg(bg),
        ),
    ];
    if focused {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    lines.push(Line::from(spans));
}

fn choice_line(
    app: &App,
    lines: &mut Vec<Line<'static>>,
    selected: bool,
    name: &str,
    hint: &str,
) {
    choice_line_owned(app, lines, selected, name.to_string(), hint.to_string());
}

fn choice_line_owned(
    app: &App,
    lines: &mut Vec<Line<'static>>,
    selected: bool,
    name: String,
    hint: String,
) {
    let bg = app.theme.background;
    let row_bg = if selected { app.theme.selection_bg } else { bg };
    let marker = if selected { "\u{25B8} " } else { "  " };
    lines.push(Line::from(vec![
        Span::styled(
            marker.to_string(),
            Style::default().fg(app.theme.highlight).bg(row_bg),
        ),
        Span::styled(
            format!("{name:<10}"),
            Style::default()
                .fg(if selected {
                    app.theme.text_bright
                } else {
                    app.theme.text
                })
                .bg(row_bg)
                .add_modifier(if selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
        ),
        Span::styled(hint, Style::default().fg(app.theme.dim).bg(row_bg)),
    ]));
}

fn summary_line(app: &App, lines: &mut Vec<Line<'static>>, label: &str, value: String) {
    let bg = app.theme.background;
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {label:<12}"),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(value, Style::default().fg(app.theme.text).bg(bg)),
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
