use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use chrono::{Duration, Utc};

use crate::io::config_io;
use crate::model::{Config, Item, TemplateLink, Worktree};
use crate::store::templates;
use crate::store::{ListFilter, Store, StoreError};
use crate::template::render;
use crate::tui::msg::{Cmd, Msg};

/// Channel ends held by the event loop. Dropping `cmd_tx` shuts the worker
/// down.
pub struct WorkerHandle {
    pub cmd_tx: Sender<Cmd>,
    pub msg_rx: Receiver<Msg>,
}

/// Start the store worker thread. It owns the store outright and executes
/// commands strictly in arrival order, so completions come back in the order
/// the commands were issued.
pub fn spawn(store: Store, config: Config) -> WorkerHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Cmd>();
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    thread::spawn(move || worker_loop(store, config, cmd_rx, msg_tx));
    WorkerHandle { cmd_tx, msg_rx }
}

fn worker_loop(
    mut store: Store,
    mut config: Config,
    cmd_rx: Receiver<Cmd>,
    msg_tx: Sender<Msg>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let msg = execute(&mut store, &mut config, cmd);
        if msg_tx.send(msg).is_err() {
            return;
        }
    }
}

fn execute(store: &mut Store, config: &mut Config, cmd: Cmd) -> Msg {
    match cmd {
        // ------------------------------------------------------------------
        // Reads
        // ------------------------------------------------------------------
        Cmd::LoadItems => Msg::ItemsLoaded(store.list_items(&ListFilter::default())),
        Cmd::LoadDetail { id } => Msg::DetailLoaded {
            logs: store.get_logs(&id),
            depends_on: store.depends_on(&id),
            blocks: store.blocked_by(&id),
            id,
        },
        Cmd::LoadStale => {
            let cutoff = Utc::now() - Duration::hours(config.stale.after_hours as i64);
            let ids = store
                .stale_items(None, cutoff)
                .into_iter()
                .map(|item| item.id)
                .collect();
            Msg::StaleLoaded(ids)
        }
        Cmd::LoadTemplates => match templates::list_templates(store.dir()) {
            Ok(list) => Msg::TemplatesLoaded(list),
            Err(e) => failed("templates", e),
        },
        Cmd::LoadTemplate { id } => match templates::load_template(store.dir(), &id) {
            Ok(template) => Msg::TemplateLoaded(template),
            Err(e) => failed(&format!("template {id}"), e),
        },
        Cmd::LoadConfig => match config_io::load_config(store.dir()) {
            Ok(fresh) => {
                *config = fresh;
                Msg::ConfigLoaded(config_io::config_fields(config))
            }
            Err(e) => failed("config", e),
        },
        Cmd::Reload => {
            if let Err(e) = store.reload() {
                return failed("reload", e);
            }
            if let Ok(fresh) = config_io::load_config(store.dir()) {
                *config = fresh;
            }
            Msg::ItemsLoaded(store.list_items(&ListFilter::default()))
        }

        // ------------------------------------------------------------------
        // Mutations: apply, save, report
        // ------------------------------------------------------------------
        Cmd::SetStatus { id, status, reason } => {
            let ctx = config.agent_context();
            mutate(store, format!("status {id}"), |s| {
                s.update_status(&id, status, reason.as_deref(), &ctx)?;
                Ok(None)
            })
        }
        Cmd::AddLog { id, text } => {
            let ctx = config.agent_context();
            mutate(store, format!("log {id}"), |s| {
                s.add_log(&id, &text, &ctx)?;
                Ok(None)
            })
        }
        Cmd::AddDependency { blocker, blocked } => mutate(
            store,
            format!("dep {blocker} blocks {blocked}"),
            |s| {
                s.add_dependency(&blocker, &blocked)?;
                Ok(None)
            },
        ),
        Cmd::RemoveDependency { blocker, blocked } => mutate(
            store,
            format!("remove dep {blocker} blocks {blocked}"),
            |s| {
                s.remove_dependency(&blocker, &blocked)?;
                Ok(None)
            },
        ),
        Cmd::CreateItem {
            kind,
            title,
            project,
            priority,
            description,
            template,
            worktree,
        } => {
            let link = template.map(|t| {
                let content_hash = template_content_hash(store, &t.template_id, &t.variables);
                TemplateLink {
                    template_id: t.template_id,
                    step: 0,
                    variables: t.variables,
                    content_hash,
                }
            });
            mutate(store, "create".to_string(), |s| {
                let mut item = Item::new(String::new(), project, kind, title);
                item.priority = priority;
                item.description = description;
                item.template = link;
                item.worktree = worktree.map(|w| Worktree {
                    branch: w.branch,
                    base: w.base,
                });
                let created = s.create_item(item)?;
                Ok(Some(created.id))
            })
        }
        Cmd::SetParent { id, parent } => mutate(store, format!("parent {id}"), |s| {
            s.set_parent(&id, parent.as_deref())?;
            Ok(None)
        }),
        Cmd::AddLabel { id, name } => mutate(store, format!("label {id}"), |s| {
            s.add_label(&id, &name)?;
            Ok(None)
        }),
        Cmd::RemoveLabel { id, name } => mutate(store, format!("unlabel {id}"), |s| {
            s.remove_label(&id, &name)?;
            Ok(None)
        }),
        Cmd::SetDescription { id, text } => mutate(store, format!("describe {id}"), |s| {
            s.set_description(&id, &text)?;
            Ok(None)
        }),
        Cmd::SetTemplateVariable { id, name, value } => {
            mutate(store, format!("variable {name} on {id}"), |s| {
                s.set_template_variable(&id, &name, &value)?;
                Ok(None)
            })
        }
        Cmd::SetPriority { id, priority } => mutate(store, format!("priority {id}"), |s| {
            s.update_priority(&id, priority)?;
            Ok(None)
        }),
        Cmd::DeleteItem { id } => mutate(store, format!("delete {id}"), |s| {
            s.delete_item(&id)?;
            Ok(None)
        }),
        Cmd::SetConfigField { path, value } => {
            let label = format!("config {path}");
            match config_io::set_config_field(store.dir(), &path, &value) {
                Ok(_) => {
                    if let Ok(fresh) = config_io::load_config(store.dir()) {
                        *config = fresh;
                    }
                    Msg::ActionDone {
                        label,
                        error: None,
                        created_id: None,
                    }
                }
                Err(e) => failed(&label, e),
            }
        }
    }
}

/// Run one mutation and persist it. Save errors surface in the same banner
/// as domain errors.
fn mutate(
    store: &mut Store,
    label: String,
    op: impl FnOnce(&mut Store) -> Result<Option<String>, StoreError>,
) -> Msg {
    let result = op(store).and_then(|created| {
        store.save()?;
        Ok(created)
    });
    match result {
        Ok(created_id) => Msg::ActionDone {
            label,
            error: None,
            created_id,
        },
        Err(e) => Msg::ActionDone {
            label,
            error: Some(e.to_string()),
            created_id: None,
        },
    }
}

fn failed(label: &str, error: impl std::fmt::Display) -> Msg {
    Msg::ActionDone {
        label: label.to_string(),
        error: Some(error.to_string()),
        created_id: None,
    }
}

fn template_content_hash(
    store: &Store,
    template_id: &str,
    variables: &indexmap::IndexMap<String, String>,
) -> String {
    match templates::load_template(store.dir(), template_id) {
        Ok(template) => {
            let mut hasher = DefaultHasher::new();
            render(&template.body, variables).hash(&mut hasher);
            format!("{:016x}", hasher.finish())
        }
        Err(_) => String::new(),
    }
}
