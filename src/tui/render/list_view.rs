use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Status;
use crate::tui::app::App;
use crate::tui::tree::TreeRow;
use crate::util::text::truncate_to_width;

/// Render the List view content area
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let row_count = app.visible_rows().len();
    let visible_height = area.height as usize;

    // Clamp the cursor and keep it inside the window.
    let cursor = app.cursor.min(row_count.saturating_sub(1));
    app.cursor = cursor;
    if cursor < app.scroll {
        app.scroll = cursor;
    } else if visible_height > 0 && cursor >= app.scroll + visible_height {
        app.scroll = cursor + 1 - visible_height;
    }
    let scroll = app.scroll;

    if row_count == 0 {
        render_empty(frame, app, area);
        return;
    }

    let rows = app.visible_rows();
    let end = rows.len().min(scroll + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    for (tree_row, row_idx) in rows[scroll..end].iter().zip(scroll..end) {
        let is_cursor = row_idx == cursor;
        let is_selected = app.selected.contains(&tree_row.item.id);
        lines.push(render_item_line(
            app,
            tree_row,
            is_cursor,
            is_selected,
            area.width as usize,
        ));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    if !app.filter.is_default() {
        let msg = " no matching items ";
        let padding = (area.width as usize).saturating_sub(msg.len() + 1);
        let warn_style = Style::default()
            .fg(app.theme.text_bright)
            .bg(ratatui::style::Color::Rgb(0x8D, 0x0B, 0x0B))
            .add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled(" ".repeat(padding), Style::default().bg(bg)),
            Span::styled(msg, warn_style),
        ]);
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
    } else {
        let empty = Paragraph::new(" No items yet. Press c to create one.")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
    }
}

/// One list row: bar, tree connectors, status icon, stale marker, id,
/// priority, title, labels.
fn render_item_line(
    app: &App,
    row: &TreeRow<'_>,
    is_cursor: bool,
    is_selected: bool,
    width: usize,
) -> Line<'static> {
    let item = row.item;
    let bg = app.theme.background;
    let row_bg = if is_cursor {
        app.theme.selection_bg
    } else {
        bg
    };
    let dim_style = Style::default().fg(app.theme.dim).bg(row_bg);
    let mut spans: Vec<Span> = Vec::new();

    // Column 0: cursor / selection bar.
    if is_cursor {
        spans.push(Span::styled(
            "\u{258E}",
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        ));
    } else if is_selected {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(row_bg),
        ));
    } else {
        spans.push(Span::styled(" ", Style::default().bg(row_bg)));
    }

    // Tree prefix.
    if row.level == 0 {
        let expand_char = if row.has_children {
            if row.is_expanded { "\u{25BC}" } else { "\u{25B6}" }
        } else {
            " "
        };
        spans.push(Span::styled(expand_char, dim_style));
    } else {
        for (d, ancestor_last) in row.ancestor_last.iter().enumerate() {
            if d == 0 || *ancestor_last {
                spans.push(Span::styled("   ", dim_style));
            } else {
                spans.push(Span::styled("\u{2502}  ", dim_style));
            }
        }
        let tree_char = if row.is_last_sibling {
            "\u{2514}"
        } else {
            "\u{251C}"
        };
        spans.push(Span::styled(tree_char, dim_style));
        if row.has_children {
            let expand_char = if row.is_expanded { "\u{25BC}" } else { "\u{25B6}" };
            spans.push(Span::styled(expand_char, dim_style));
        } else {
            spans.push(Span::styled(" ", dim_style));
        }
    }

    // Status icon.
    let status_style = if is_cursor {
        Style::default()
            .fg(app.theme.status_color(item.status))
            .bg(row_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.status_color(item.status)).bg(row_bg)
    };
    spans.push(Span::styled(item.status.icon().to_string(), status_style));

    // Stale marker keeps its cell so columns stay aligned.
    if app.stale_ids.contains(&item.id) {
        spans.push(Span::styled(
            "!",
            Style::default()
                .fg(app.theme.yellow)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(" ", Style::default().bg(row_bg)));
    }
    spans.push(Span::styled(" ", Style::default().bg(row_bg)));

    // Id.
    let id_style = if item.status == Status::Done || item.status == Status::Canceled {
        dim_style
    } else if is_cursor {
        Style::default().fg(app.theme.text_bright).bg(row_bg)
    } else {
        Style::default().fg(app.theme.text).bg(row_bg)
    };
    spans.push(Span::styled(format!("{} ", item.id), id_style));

    // Priority.
    spans.push(Span::styled(
        format!("p{} ", item.priority),
        Style::default()
            .fg(app.theme.priority_color(item.priority))
            .bg(row_bg),
    ));

    // Labels render after the title; reserve their width first.
    let labels_text: String = item.labels.iter().map(|l| format!(" #{l}")).collect();
    let prefix_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let label_width = labels_text.chars().count();
    let available = width
        .saturating_sub(prefix_width + 1)
        .saturating_sub(label_width);

    let title_style = if item.status == Status::Done || item.status == Status::Canceled {
        dim_style
    } else if is_cursor {
        Style::default().fg(app.theme.text_bright).bg(row_bg)
    } else {
        Style::default().fg(app.theme.text).bg(row_bg)
    };
    let match_style = Style::default()
        .fg(app.theme.highlight)
        .bg(row_bg)
        .add_modifier(Modifier::BOLD);
    spans.extend(title_spans(
        &truncate_to_width(&item.title, available),
        &app.filter.search,
        title_style,
        match_style,
    ));

    if !labels_text.is_empty() {
        spans.push(Span::styled(
            labels_text,
            Style::default().fg(app.theme.cyan).bg(row_bg),
        ));
    }

    Line::from(spans)
}

/// Split a title into spans with the active search needle emphasized,
/// case-insensitively. Comparison runs over chars; if lowercasing shifts
/// the char count (rare scripts) the title renders unemphasized.
fn title_spans(
    title: &str,
    needle: &str,
    base: Style,
    emphasis: Style,
) -> Vec<Span<'static>> {
    let whole = || vec![Span::styled(title.to_string(), base)];
    if needle.is_empty() {
        return whole();
    }
    let chars: Vec<char> = title.chars().collect();
    let folded: Vec<char> = title.to_lowercase().chars().collect();
    let pat: Vec<char> = needle.to_lowercase().chars().collect();
    if pat.is_empty() || folded.len() != chars.len() {
        return whole();
    }

    let mut spans = Vec::new();
    let mut plain_from = 0;
    let mut i = 0;
    while i + pat.len() <= chars.len() {
        if folded[i..i + pat.len()] == pat[..] {
            if plain_from < i {
                spans.push(Span::styled(
                    chars[plain_from..i].iter().collect::<String>(),
                    base,
                ));
            }
            spans.push(Span::styled(
                chars[i..i + pat.len()].iter().collect::<String>(),
                emphasis,
            ));
            i += pat.len();
            plain_from = i;
        } else {
            i += 1;
        }
    }
    if plain_from < chars.len() {
        spans.push(Span::styled(
            chars[plain_from..].iter().collect::<String>(),
            base,
        ));
    }
    spans
}
