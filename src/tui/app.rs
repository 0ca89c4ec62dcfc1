//! Application state and the event loop: one key, watcher tick, or worker
//! completion at a time, each producing follow-up commands for the store
//! worker.

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use thiserror::Error;

use crate::io::config_io::load_config;
use crate::io::project_io::{ProjectError, discover_store_dir};
use crate::io::watcher::StoreWatcher;
use crate::model::{DepRef, Item, LogEntry, Template};
use crate::store::{Store, StoreError};

use super::dispatch::{self, WorkerHandle};
use super::editor::{self, EditTarget};
use super::filter::{FilterState, filter_items};
use super::graph::GraphState;
use super::input;
use super::msg::{Cmd, Msg};
use super::render;
use super::theme::Theme;
use super::tree::{TreeRow, build_rows_iterative};
use super::wizard::{FollowUps, WizardState};

#[derive(Debug, Error)]
pub enum TuiError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Detail,
    Graph,
    TemplateList,
    TemplateDetail,
    Config,
    CreateWizard,
}

/// Input-capture sub-modes. While anything but `None` is active, every key
/// goes to that capture's handler instead of the view's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    None,
    BlockReason,
    LogMessage,
    CancelReason,
    Search,
    ProjectFilter,
    LabelFilter,
    AddDependency,
    CreateTitle,
    CreateType,
    BatchStatus,
    BatchPriority,
    TextareaEdit,
    StatusMenu,
}

/// Async-loaded companion data for the item open in Detail or Graph view.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub id: String,
    pub logs: Vec<LogEntry>,
    pub depends_on: Vec<DepRef>,
    pub blocks: Vec<DepRef>,
    pub loaded: bool,
    /// Cursor into depends_on followed by blocks; `Some` while dependency
    /// navigation is active.
    pub dep_cursor: Option<usize>,
    pub var_cursor: usize,
    pub expanded_vars: HashSet<String>,
}

impl DetailState {
    pub fn new(id: String) -> Self {
        DetailState {
            id,
            logs: Vec::new(),
            depends_on: Vec::new(),
            blocks: Vec::new(),
            loaded: false,
            dep_cursor: None,
            var_cursor: 0,
            expanded_vars: HashSet::new(),
        }
    }

    pub fn dep_count(&self) -> usize {
        self.depends_on.len() + self.blocks.len()
    }

    /// Id under the dependency cursor, if navigation is active.
    pub fn dep_selection(&self) -> Option<&str> {
        let cursor = self.dep_cursor?;
        if cursor < self.depends_on.len() {
            Some(&self.depends_on[cursor].id)
        } else {
            self.blocks
                .get(cursor - self.depends_on.len())
                .map(|d| d.id.as_str())
        }
    }
}

pub struct App {
    // Snapshot data, replaced wholesale by worker completions.
    pub items: Vec<Item>,
    pub stale_ids: HashSet<String>,
    pub templates: Vec<Template>,
    pub template_detail: Option<Template>,
    pub config_fields: Vec<(String, String)>,

    // Fixed at startup, refreshed when config loads.
    pub project: String,
    pub theme: Theme,
    pub editor_command: Option<String>,

    // View state.
    pub view: ViewMode,
    pub input: InputMode,
    pub filter: FilterState,
    pub filter_backup: Option<FilterState>,
    pub expanded: HashSet<String>,
    pub cursor: usize,
    pub scroll: usize,
    pub selected: BTreeSet<String>,
    pub detail: Option<DetailState>,
    pub graph: Option<GraphState>,
    pub template_cursor: usize,
    pub config_cursor: usize,
    pub wizard: Option<WizardState>,
    pub show_help: bool,

    // Captures and transients.
    pub input_buffer: String,
    pub capture_target: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub pending_delete: Option<String>,
    pub pending_create: Option<FollowUps>,
    pub pending_edit: Option<(EditTarget, String)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(project: String, theme: Theme, editor_command: Option<String>) -> Self {
        App {
            items: Vec::new(),
            stale_ids: HashSet::new(),
            templates: Vec::new(),
            template_detail: None,
            config_fields: Vec::new(),
            project,
            theme,
            editor_command,
            view: ViewMode::List,
            input: InputMode::None,
            filter: FilterState::default(),
            filter_backup: None,
            expanded: HashSet::new(),
            cursor: 0,
            scroll: 0,
            selected: BTreeSet::new(),
            detail: None,
            graph: None,
            template_cursor: 0,
            config_cursor: 0,
            wizard: None,
            show_help: false,
            input_buffer: String::new(),
            capture_target: None,
            message: None,
            error: None,
            pending_delete: None,
            pending_create: None,
            pending_edit: None,
            should_quit: false,
        }
    }

    /// The rows the List view would draw right now. Rebuilt on demand from
    /// the snapshot, never cached across events.
    pub fn visible_rows(&self) -> Vec<TreeRow<'_>> {
        let filtered = filter_items(&self.items, &self.filter);
        build_rows_iterative(&filtered, &self.expanded)
    }

    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_rows()
            .iter()
            .map(|r| r.item.id.clone())
            .collect()
    }

    /// Id under the List cursor.
    pub fn current_id(&self) -> Option<String> {
        self.visible_rows()
            .get(self.cursor)
            .map(|r| r.item.id.clone())
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn detail_id(&self) -> Option<String> {
        self.detail.as_ref().map(|d| d.id.clone())
    }

    /// The id a targeted action applies to: an explicit capture target, the
    /// open detail, or the List cursor.
    pub fn action_target(&self) -> Option<String> {
        self.capture_target.clone().or_else(|| match self.view {
            ViewMode::Detail | ViewMode::Graph => self.detail_id(),
            _ => self.current_id(),
        })
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
        self.error = None;
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.error = Some(text.into());
        self.message = None;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn open_detail(&mut self, id: String) -> Vec<Cmd> {
        self.detail = Some(DetailState::new(id.clone()));
        self.graph = None;
        self.view = ViewMode::Detail;
        self.input = InputMode::None;
        vec![Cmd::LoadDetail { id }]
    }

    /// Move the List cursor to `id` if it is visible; otherwise leave the
    /// cursor alone and show a transient message.
    pub fn jump_to(&mut self, id: &str) -> bool {
        match self.visible_ids().iter().position(|v| v == id) {
            Some(pos) => {
                self.cursor = pos;
                self.view = ViewMode::List;
                self.input = InputMode::None;
                true
            }
            None => {
                self.set_message(format!("{id} is not in the current view"));
                false
            }
        }
    }

    pub fn close_wizard(&mut self) {
        self.wizard = None;
        self.view = ViewMode::List;
        self.input = InputMode::None;
    }

    /// Key entry point: clears transients, disarms a pending delete on any
    /// other key, and dispatches through the handler table.
    pub fn on_key(&mut self, key: KeyEvent) -> Vec<Cmd> {
        self.message = None;
        self.error = None;
        let is_delete_key =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('d');
        if !is_delete_key {
            self.pending_delete = None;
        }
        let handler = input::handler_for(self.view, self.input);
        handler(self, key)
    }

    /// Apply one worker completion, returning any follow-up commands.
    pub fn apply_msg(&mut self, msg: Msg) -> Vec<Cmd> {
        match msg {
            Msg::ItemsLoaded(items) => {
                self.items = items;
                let ids: HashSet<&str> = self.items.iter().map(|i| i.id.as_str()).collect();
                self.selected.retain(|id| ids.contains(id.as_str()));
                self.expanded.retain(|id| ids.contains(id.as_str()));
                let len = self.visible_rows().len();
                if len == 0 {
                    self.cursor = 0;
                } else if self.cursor >= len {
                    self.cursor = len - 1;
                }
                // Keep the stale markers in step with the snapshot.
                vec![Cmd::LoadStale]
            }
            Msg::DetailLoaded {
                id,
                logs,
                depends_on,
                blocks,
            } => {
                // A late result for an item we already navigated away from
                // is dropped, not applied.
                let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) else {
                    return Vec::new();
                };
                detail.logs = logs;
                detail.depends_on = depends_on;
                detail.blocks = blocks;
                detail.loaded = true;
                if let Some(cursor) = detail.dep_cursor {
                    let count = detail.dep_count();
                    detail.dep_cursor = if count == 0 {
                        None
                    } else {
                        Some(cursor.min(count - 1))
                    };
                }
                if self.view == ViewMode::Graph {
                    self.rebuild_graph();
                }
                Vec::new()
            }
            Msg::StaleLoaded(ids) => {
                self.stale_ids = ids.into_iter().collect();
                Vec::new()
            }
            Msg::TemplatesLoaded(templates) => {
                self.templates = templates;
                if self.template_cursor >= self.templates.len() {
                    self.template_cursor = self.templates.len().saturating_sub(1);
                }
                Vec::new()
            }
            Msg::TemplateLoaded(template) => {
                self.template_detail = Some(template);
                Vec::new()
            }
            Msg::ConfigLoaded(fields) => {
                if let Some((_, v)) = fields.iter().find(|(p, _)| p == "editor.command") {
                    self.editor_command = (!v.is_empty()).then(|| v.clone());
                }
                self.config_fields = fields;
                if self.config_cursor >= self.config_fields.len() {
                    self.config_cursor = self.config_fields.len().saturating_sub(1);
                }
                Vec::new()
            }
            Msg::ActionDone {
                label,
                error,
                created_id,
            } => self.apply_action_done(label, error, created_id),
            Msg::StoreChangedOnDisk => vec![Cmd::Reload],
        }
    }

    fn apply_action_done(
        &mut self,
        label: String,
        error: Option<String>,
        created_id: Option<String>,
    ) -> Vec<Cmd> {
        if let Some(err) = error {
            if label == "create" {
                // The rest of the wizard chain needs the id; abandon it.
                self.pending_create = None;
            }
            self.set_error(format!("{label}: {err}"));
            return vec![Cmd::LoadItems];
        }

        let mut cmds = Vec::new();
        if let Some(id) = &created_id {
            self.set_message(format!("created {id}"));
            if let Some(follow_ups) = self.pending_create.take() {
                cmds.extend(follow_ups.into_cmds(id));
            }
        } else {
            self.set_message(format!("{label} ✓"));
        }

        if let Some(deleted) = label.strip_prefix("delete ") {
            let deleted = deleted.to_string();
            self.selected.remove(&deleted);
            if self.detail_id().as_deref() == Some(deleted.as_str()) {
                self.detail = None;
                self.graph = None;
                self.view = ViewMode::List;
            }
        }

        cmds.push(Cmd::LoadItems);
        if let Some(id) = self.detail_id() {
            cmds.push(Cmd::LoadDetail { id });
        }
        if self.view == ViewMode::Config || label.starts_with("config ") {
            cmds.push(Cmd::LoadConfig);
        }
        cmds
    }

    pub fn rebuild_graph(&mut self) {
        let Some(detail) = &self.detail else {
            self.graph = None;
            return;
        };
        let Some(item) = self.item(&detail.id).cloned() else {
            self.graph = None;
            return;
        };
        let previous = self.graph.as_ref().map(|g| g.cursor);
        let mut graph = GraphState::build(&item, &detail.depends_on, &detail.blocks);
        if let Some((column, row)) = previous {
            let len = graph.column_len(column);
            if len > 0 {
                graph.cursor = (column, row.min(len - 1));
            }
        }
        self.graph = Some(graph);
    }
}

/// Discover the store, start the worker and watcher, and run the terminal
/// loop until quit.
pub fn run(start_dir: &Path) -> Result<(), TuiError> {
    let store_dir = discover_store_dir(start_dir)?;
    let config = load_config(&store_dir)?;
    let theme = Theme::from_config(&config.ui);
    let project = config.project.default.clone();
    let editor_command = config.editor.command.clone();
    let store = Store::open(&store_dir)?;

    let worker = dispatch::spawn(store, config);
    let watcher = StoreWatcher::start(&store_dir).ok();

    let mut app = App::new(project, theme, editor_command);
    worker.cmd_tx.send(Cmd::LoadItems).ok();

    install_panic_hook();
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run_loop(&mut terminal, &mut app, &worker, watcher.as_ref());

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &WorkerHandle,
    watcher: Option<&StoreWatcher>,
) -> Result<(), TuiError> {
    loop {
        terminal.draw(|frame| render::draw(frame, app))?;

        let mut cmds: Vec<Cmd> = Vec::new();

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    cmds.extend(app.on_key(key));
                }
                // Resize redraws on the next pass.
                _ => {}
            }
        }

        if let Some((target, initial)) = app.pending_edit.take() {
            run_editor_session(terminal, app, worker, &target, &initial)?;
        }

        if let Some(watcher) = watcher {
            if !watcher.poll().is_empty() {
                cmds.push(Cmd::Reload);
            }
        }

        while let Ok(msg) = worker.msg_rx.try_recv() {
            cmds.extend(app.apply_msg(msg));
        }

        for cmd in cmds {
            if worker.cmd_tx.send(cmd).is_err() {
                app.set_error("store worker stopped");
                break;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Blocks the loop for the whole editor session; the store worker keeps its
/// queue and catches up afterwards.
fn run_editor_session(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &WorkerHandle,
    target: &EditTarget,
    initial: &str,
) -> Result<(), TuiError> {
    let command = editor::editor_command(app.editor_command.as_deref());
    match editor::edit_with_terminal_released(&command, initial) {
        Ok(outcome) => {
            if let Some(err) = outcome.error {
                app.set_error(err);
            }
            match (outcome.content, app.detail_id()) {
                (Some(text), Some(id)) => {
                    worker.cmd_tx.send(target.update_cmd(&id, text)).ok();
                }
                (Some(_), None) => {}
                (None, _) => app.set_message("No changes made"),
            }
        }
        Err(e) => app.set_error(format!("editor: {e}")),
    }
    terminal.clear()?;
    Ok(())
}

/// Restore the terminal before the default panic output so the report stays
/// readable.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
