use crossterm::event::{KeyCode, KeyEvent};

use super::*;

pub(super) fn handle_graph(app: &mut App, key: KeyEvent) -> Vec<Cmd> {
    if handle_help_overlay(app, key) {
        return Vec::new();
    }
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => {
            app.graph = None;
            app.view = ViewMode::Detail;
            Vec::new()
        }
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            if let Some(graph) = app.graph.as_mut() {
                graph.move_down();
            }
            Vec::new()
        }
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            if let Some(graph) = app.graph.as_mut() {
                graph.move_up();
            }
            Vec::new()
        }
        (_, KeyCode::Char('h')) | (_, KeyCode::Left) => {
            if let Some(graph) = app.graph.as_mut() {
                graph.move_left();
            }
            Vec::new()
        }
        (_, KeyCode::Char('l')) | (_, KeyCode::Right) => {
            if let Some(graph) = app.graph.as_mut() {
                graph.move_right();
            }
            Vec::new()
        }
        // Enter jumps the list cursor to the selected node.
        (_, KeyCode::Enter) => {
            let target = app
                .graph
                .as_ref()
                .and_then(|g| g.selected())
                .map(|node| node.id.clone());
            if let Some(id) = target {
                if app.jump_to(&id) {
                    app.graph = None;
                    app.detail = None;
                }
            }
            Vec::new()
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            Vec::new()
        }
        _ => Vec::new(),
    }
}
