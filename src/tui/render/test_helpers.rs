use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{DepRef, Item, ItemKind, Status};
use crate::tui::app::App;
use crate::tui::msg::Msg;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An open task in the `demo` project, default priority.
pub fn make_item(id: &str, title: &str) -> Item {
    Item::new(
        id.to_string(),
        "demo".to_string(),
        ItemKind::Task,
        title.to_string(),
    )
}

pub fn dep(id: &str, status: Status) -> DepRef {
    DepRef {
        id: id.to_string(),
        title: format!("title {id}"),
        status,
    }
}

/// A small mixed snapshot: an epic with one child, a labeled task, and a
/// done task the default filter hides.
pub fn sample_items() -> Vec<Item> {
    let mut epic = Item::new(
        "ep-1".to_string(),
        "demo".to_string(),
        ItemKind::Epic,
        "Release".to_string(),
    );
    epic.priority = 1;

    let mut task = make_item("ts-1", "Fix parser crash");
    task.priority = 2;
    task.labels.insert("backend".to_string());

    let mut child = make_item("ts-2", "Write docs");
    child.parent = Some("ep-1".to_string());

    let mut done = make_item("ts-3", "Old cleanup");
    done.status = Status::Done;

    vec![epic, task, child, done]
}

/// Build an App holding `items` as its loaded snapshot.
pub fn app_with_items(items: Vec<Item>) -> App {
    let mut app = App::new("demo".to_string(), Theme::default(), None);
    app.apply_msg(Msg::ItemsLoaded(items));
    app
}

/// Build an App in Detail view with companion data already loaded.
pub fn app_in_detail(items: Vec<Item>, id: &str, depends_on: Vec<DepRef>, blocks: Vec<DepRef>) -> App {
    let mut app = app_with_items(items);
    app.open_detail(id.to_string());
    app.apply_msg(Msg::DetailLoaded {
        id: id.to_string(),
        logs: Vec::new(),
        depends_on,
        blocks,
    });
    app
}
