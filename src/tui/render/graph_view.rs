use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::graph::{GraphNode, GraphState};
use crate::util::text::truncate_to_width;

/// Render the dependency graph: blockers, the focal item, blocked items in
/// three fixed columns.
pub fn render_graph_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(graph) = app.graph.as_ref() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let titles = ["depends on", "item", "blocks"];
    for (column, title) in titles.iter().enumerate() {
        render_column(frame, app, graph, column, title, columns[column]);
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    graph: &GraphState,
    column: usize,
    title: &str,
    area: Rect,
) {
    let bg = app.theme.background;
    let mut rows: Vec<&GraphNode> = graph.nodes.iter().filter(|n| n.column == column).collect();
    rows.sort_by_key(|n| n.position);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {title}"),
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    // Center the node block vertically so the focal item sits mid-screen.
    let body_height = (area.height as usize).saturating_sub(2);
    let pad = body_height.saturating_sub(rows.len()) / 2;
    for _ in 0..pad {
        lines.push(Line::from(""));
    }

    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            " (none)",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    let width = area.width as usize;
    for node in rows {
        lines.push(node_line(app, graph, node, width));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn node_line(app: &App, graph: &GraphState, node: &GraphNode, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let is_cursor = graph.cursor == (node.column, node.position);
    let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
    let bar = if is_cursor { "\u{258E}" } else { " " };

    let id_text = format!("{} ", node.id);
    let used = 3 + id_text.chars().count();
    let title = truncate_to_width(&node.title, width.saturating_sub(used + 1));

    Line::from(vec![
        Span::styled(
            bar.to_string(),
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        ),
        Span::styled(
            format!("{} ", node.status.icon()),
            Style::default()
                .fg(app.theme.status_color(node.status))
                .bg(row_bg),
        ),
        Span::styled(
            id_text,
            Style::default()
                .fg(if is_cursor {
                    app.theme.text_bright
                } else {
                    app.theme.text
                })
                .bg(row_bg)
                .add_modifier(if is_cursor {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
        ),
        Span::styled(title, Style::default().fg(app.theme.dim).bg(row_bg)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_graph_view(frame, app, area);
        })
    }

    fn app_with_graph() -> App {
        let mut app = app_in_detail(
            vec![make_item("ts-5", "Ship the feature")],
            "ts-5",
            vec![dep("ts-1", Status::Done), dep("ts-2", Status::Open)],
            vec![dep("ts-9", Status::Blocked)],
        );
        app.rebuild_graph();
        app
    }

    #[test]
    fn columns_render_headers_and_nodes() {
        let app = app_with_graph();
        let output = render(&app);
        assert!(output.contains("depends on"));
        assert!(output.contains("blocks"));
        assert!(output.contains("ts-1"));
        assert!(output.contains("ts-2"));
        assert!(output.contains("ts-5"));
        assert!(output.contains("ts-9"));
    }

    #[test]
    fn cursor_starts_on_the_focal_item() {
        let app = app_with_graph();
        let output = render(&app);
        let bar_line = output
            .lines()
            .find(|l| l.contains('\u{258E}'))
            .unwrap_or_default();
        assert!(bar_line.contains("ts-5"));
    }

    #[test]
    fn empty_side_column_says_none() {
        let mut app = app_in_detail(
            vec![make_item("ts-5", "Leaf item")],
            "ts-5",
            vec![dep("ts-1", Status::Open)],
            vec![],
        );
        app.rebuild_graph();
        let output = render(&app);
        assert!(output.contains("(none)"));
    }
}
