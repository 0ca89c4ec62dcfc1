use indexmap::IndexMap;

use crate::model::{DepRef, Item, ItemKind, LogEntry, Status, Template};

/// Work descriptors handed to the store worker. Executed strictly in order;
/// completions come back as `Msg` in the same order.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    LoadItems,
    LoadDetail { id: String },
    LoadStale,
    LoadTemplates,
    LoadTemplate { id: String },
    LoadConfig,
    SetStatus {
        id: String,
        status: Status,
        reason: Option<String>,
    },
    AddLog { id: String, text: String },
    AddDependency { blocker: String, blocked: String },
    RemoveDependency { blocker: String, blocked: String },
    CreateItem {
        kind: ItemKind,
        title: String,
        project: String,
        priority: u8,
        description: String,
        template: Option<NewTemplateLink>,
        worktree: Option<NewWorktree>,
    },
    SetParent { id: String, parent: Option<String> },
    AddLabel { id: String, name: String },
    RemoveLabel { id: String, name: String },
    SetDescription { id: String, text: String },
    SetTemplateVariable {
        id: String,
        name: String,
        value: String,
    },
    SetPriority { id: String, priority: u8 },
    DeleteItem { id: String },
    SetConfigField { path: String, value: String },
    Reload,
}

/// Template linkage captured by the wizard for `Cmd::CreateItem`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplateLink {
    pub template_id: String,
    pub variables: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorktree {
    pub branch: String,
    pub base: String,
}

/// Completions delivered back to the event loop. Handlers never block on
/// these; the loop drains whatever has arrived each tick.
#[derive(Debug)]
pub enum Msg {
    ItemsLoaded(Vec<Item>),
    DetailLoaded {
        id: String,
        logs: Vec<LogEntry>,
        depends_on: Vec<DepRef>,
        blocks: Vec<DepRef>,
    },
    StaleLoaded(Vec<String>),
    TemplatesLoaded(Vec<Template>),
    TemplateLoaded(Template),
    ConfigLoaded(Vec<(String, String)>),
    /// A mutation finished. `created_id` is set for item creation so the
    /// wizard chain can hang follow-up commands off the new id.
    ActionDone {
        label: String,
        error: Option<String>,
        created_id: Option<String>,
    },
    StoreChangedOnDisk,
}

impl Cmd {
    /// Mutations schedule a full reload when their completion arrives.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Cmd::LoadItems
                | Cmd::LoadDetail { .. }
                | Cmd::LoadStale
                | Cmd::LoadTemplates
                | Cmd::LoadTemplate { .. }
                | Cmd::LoadConfig
                | Cmd::Reload
        )
    }
}
