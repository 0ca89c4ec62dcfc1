pub mod jsonl;
pub mod templates;

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::io::lock::{LockError, StoreLock};
use crate::io::project_io::items_path;
use crate::model::{
    cmp_ids, AgentContext, DepEdge, DepRef, Item, ItemKind, LogEntry, Status, PRIORITY_MAX,
    PRIORITY_MIN,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("id already exists: {0}")]
    IdCollision(String),
    #[error("parent {0} is not an epic")]
    ParentNotEpic(String),
    #[error("parent chain would loop through {0}")]
    ParentCycle(String),
    #[error("{0} cannot block itself")]
    SelfDependency(String),
    #[error("{blocker} already blocks {blocked}")]
    DuplicateDependency { blocker: String, blocked: String },
    #[error("dependency would create a cycle: {blocker} -> {blocked}")]
    DependencyCycle { blocker: String, blocked: String },
    #[error("no dependency: {blocker} does not block {blocked}")]
    NoSuchDependency { blocker: String, blocked: String },
    #[error("cannot delete {id}: {count} child item(s) still reference it")]
    HasChildren { id: String, count: usize },
    #[error("priority must be {PRIORITY_MIN}-{PRIORITY_MAX}, got {0}")]
    PriorityRange(u8),
    #[error("{0} was not created from a template")]
    NoTemplate(String),
    #[error("could not parse {path} line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filters for `list_items`. All criteria are conjunctive. `project` and
/// `label` are exact matches; `search` is a case-insensitive title substring.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub project: Option<String>,
    pub status: Option<Status>,
    pub label: Option<String>,
    pub search: Option<String>,
}

/// The item store: every task and epic, their blocking edges, and their
/// per-item history. Held by exactly one owner at a time (the store worker
/// thread in the TUI, or a short-lived CLI handler).
pub struct Store {
    dir: PathBuf,
    items: IndexMap<String, Item>,
    deps: Vec<DepEdge>,
    logs: HashMap<String, Vec<LogEntry>>,
}

impl Store {
    /// Load from `<store_dir>/items.jsonl`. A missing file is an empty store.
    pub fn open(store_dir: &Path) -> Result<Self, StoreError> {
        let mut store = Store {
            dir: store_dir.to_path_buf(),
            items: IndexMap::new(),
            deps: Vec::new(),
            logs: HashMap::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-read the backing file, replacing all in-memory state.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.items.clear();
        self.deps.clear();
        self.logs.clear();

        let path = items_path(&self.dir);
        if !path.exists() {
            return Ok(());
        }
        let loaded = jsonl::load(&path)?;
        for item in loaded.items {
            self.items.insert(item.id.clone(), item);
        }
        self.deps = loaded.deps;
        self.logs = loaded.logs;
        Ok(())
    }

    /// Rewrite the backing file under the advisory lock.
    pub fn save(&self) -> Result<(), StoreError> {
        let _lock = StoreLock::acquire_default(&self.dir)?;
        jsonl::save(
            &items_path(&self.dir),
            self.items.values(),
            &self.deps,
            &self.logs,
        )
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Store {
            dir: PathBuf::new(),
            items: IndexMap::new(),
            deps: Vec::new(),
            logs: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Result<&Item, StoreError> {
        self.items
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Matching items, sorted priority ascending then id ascending.
    pub fn list_items(&self, filter: &ListFilter) -> Vec<Item> {
        let mut out: Vec<Item> = self
            .items
            .values()
            .filter(|item| Self::matches(item, filter))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| cmp_ids(&a.id, &b.id)));
        out
    }

    fn matches(item: &Item, filter: &ListFilter) -> bool {
        if let Some(ref project) = filter.project {
            if &item.project != project {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(ref label) = filter.label {
            if !item.labels.contains(label) {
                return false;
            }
        }
        if let Some(ref search) = filter.search {
            if !item
                .title
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }

    pub fn get_logs(&self, id: &str) -> Vec<LogEntry> {
        self.logs.get(id).cloned().unwrap_or_default()
    }

    /// Items the given item depends on (its blockers).
    pub fn depends_on(&self, id: &str) -> Vec<DepRef> {
        self.deps
            .iter()
            .filter(|e| e.blocked == id)
            .filter_map(|e| self.items.get(&e.blocker))
            .map(dep_ref)
            .collect()
    }

    /// Items the given item blocks.
    pub fn blocked_by(&self, id: &str) -> Vec<DepRef> {
        self.deps
            .iter()
            .filter(|e| e.blocker == id)
            .filter_map(|e| self.items.get(&e.blocked))
            .map(dep_ref)
            .collect()
    }

    /// In-progress items in the project not touched since `cutoff`.
    pub fn stale_items(&self, project: Option<&str>, cutoff: DateTime<Utc>) -> Vec<Item> {
        let mut out: Vec<Item> = self
            .items
            .values()
            .filter(|item| {
                item.status == Status::InProgress
                    && item.updated_at < cutoff
                    && project.is_none_or(|p| item.project == p)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        out
    }

    /// Next free id for the kind: highest numeric suffix plus one.
    pub fn generate_id(&self, kind: ItemKind) -> String {
        let prefix = kind.prefix();
        let max = self
            .items
            .keys()
            .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-'))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("{}-{}", prefix, max + 1)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Insert a new item. An empty id is replaced with a generated one.
    /// A set parent must already exist and be an epic.
    pub fn create_item(&mut self, mut item: Item) -> Result<Item, StoreError> {
        if item.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if item.id.is_empty() {
            item.id = self.generate_id(item.kind);
        } else if self.items.contains_key(&item.id) {
            return Err(StoreError::IdCollision(item.id));
        }
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&item.priority) {
            return Err(StoreError::PriorityRange(item.priority));
        }
        if let Some(parent) = item.parent.clone() {
            self.check_parent(&item.id, &parent)?;
        }

        let now = Utc::now();
        item.created_at = now;
        item.updated_at = now;
        self.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    /// Change status, appending a history line naming the acting context.
    pub fn update_status(
        &mut self,
        id: &str,
        status: Status,
        reason: Option<&str>,
        ctx: &AgentContext,
    ) -> Result<(), StoreError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let old = item.status;
        item.status = status;
        item.updated_at = Utc::now();

        let text = match reason {
            Some(r) if !r.trim().is_empty() => {
                format!("status {} → {}: {}", old.name(), status.name(), r.trim())
            }
            _ => format!("status {} → {}", old.name(), status.name()),
        };
        self.push_log(id, text, ctx);
        Ok(())
    }

    /// Append a free-form history line.
    pub fn add_log(&mut self, id: &str, text: &str, ctx: &AgentContext) -> Result<(), StoreError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        item.updated_at = Utc::now();
        self.push_log(id, text.to_string(), ctx);
        Ok(())
    }

    /// Record that `blocker` blocks `blocked`. Refuses self-edges,
    /// duplicates, unknown endpoints, and anything that would close a cycle.
    pub fn add_dependency(&mut self, blocker: &str, blocked: &str) -> Result<(), StoreError> {
        if blocker == blocked {
            return Err(StoreError::SelfDependency(blocker.to_string()));
        }
        self.get(blocker)?;
        self.get(blocked)?;
        if self
            .deps
            .iter()
            .any(|e| e.blocker == blocker && e.blocked == blocked)
        {
            return Err(StoreError::DuplicateDependency {
                blocker: blocker.to_string(),
                blocked: blocked.to_string(),
            });
        }
        if self.would_create_cycle(blocker, blocked) {
            return Err(StoreError::DependencyCycle {
                blocker: blocker.to_string(),
                blocked: blocked.to_string(),
            });
        }
        self.deps.push(DepEdge {
            blocker: blocker.to_string(),
            blocked: blocked.to_string(),
        });
        self.touch(blocked);
        Ok(())
    }

    pub fn remove_dependency(&mut self, blocker: &str, blocked: &str) -> Result<(), StoreError> {
        let before = self.deps.len();
        self.deps
            .retain(|e| !(e.blocker == blocker && e.blocked == blocked));
        if self.deps.len() == before {
            return Err(StoreError::NoSuchDependency {
                blocker: blocker.to_string(),
                blocked: blocked.to_string(),
            });
        }
        self.touch(blocked);
        Ok(())
    }

    /// Re-parent an item. `None` detaches it.
    pub fn set_parent(&mut self, id: &str, parent: Option<&str>) -> Result<(), StoreError> {
        self.get(id)?;
        if let Some(parent) = parent {
            self.check_parent(id, parent)?;
        }
        if let Some(item) = self.items.get_mut(id) {
            item.parent = parent.map(String::from);
            item.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn add_label(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let name = name.trim();
        if !name.is_empty() && item.labels.insert(name.to_string()) {
            item.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn remove_label(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if item.labels.remove(name) {
            item.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn set_description(&mut self, id: &str, text: &str) -> Result<(), StoreError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        item.description = text.to_string();
        item.updated_at = Utc::now();
        Ok(())
    }

    /// Update one stored template variable on an item created from a template.
    pub fn set_template_variable(
        &mut self,
        id: &str,
        name: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let Some(link) = item.template.as_mut() else {
            return Err(StoreError::NoTemplate(id.to_string()));
        };
        link.variables.insert(name.to_string(), value.to_string());
        item.updated_at = Utc::now();
        Ok(())
    }

    pub fn update_priority(&mut self, id: &str, priority: u8) -> Result<(), StoreError> {
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
            return Err(StoreError::PriorityRange(priority));
        }
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        item.priority = priority;
        item.updated_at = Utc::now();
        Ok(())
    }

    /// Remove an item with its edges and history. Refused while any child
    /// still names it as parent.
    pub fn delete_item(&mut self, id: &str) -> Result<(), StoreError> {
        self.get(id)?;
        let children = self
            .items
            .values()
            .filter(|i| i.parent.as_deref() == Some(id))
            .count();
        if children > 0 {
            return Err(StoreError::HasChildren {
                id: id.to_string(),
                count: children,
            });
        }
        self.items.shift_remove(id);
        self.deps.retain(|e| e.blocker != id && e.blocked != id);
        self.logs.remove(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn check_parent(&self, id: &str, parent: &str) -> Result<(), StoreError> {
        let parent_item = self.get(parent)?;
        if !parent_item.is_epic() {
            return Err(StoreError::ParentNotEpic(parent.to_string()));
        }
        // Walk the ancestor chain from the proposed parent.
        let mut current = Some(parent.to_string());
        while let Some(cur) = current {
            if cur == id {
                return Err(StoreError::ParentCycle(parent.to_string()));
            }
            current = self.items.get(&cur).and_then(|i| i.parent.clone());
        }
        Ok(())
    }

    /// True if `blocker` already (transitively) depends on `blocked`.
    fn would_create_cycle(&self, blocker: &str, blocked: &str) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([blocker.to_string()]);
        while let Some(current) = queue.pop_front() {
            if current == blocked {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            for e in &self.deps {
                if e.blocked == current {
                    queue.push_back(e.blocker.clone());
                }
            }
        }
        false
    }

    fn push_log(&mut self, id: &str, text: String, ctx: &AgentContext) {
        self.logs.entry(id.to_string()).or_default().push(LogEntry {
            at: Utc::now(),
            actor: ctx.actor.clone(),
            text,
        });
    }

    fn touch(&mut self, id: &str) {
        if let Some(item) = self.items.get_mut(id) {
            item.updated_at = Utc::now();
        }
    }
}

fn dep_ref(item: &Item) -> DepRef {
    DepRef {
        id: item.id.clone(),
        title: item.title.clone(),
        status: item.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ctx() -> AgentContext {
        AgentContext {
            actor: "tester".to_string(),
        }
    }

    fn task(store: &mut Store, title: &str) -> String {
        let item = Item::new(
            String::new(),
            "demo".to_string(),
            ItemKind::Task,
            title.to_string(),
        );
        store.create_item(item).unwrap().id
    }

    fn epic(store: &mut Store, title: &str) -> String {
        let item = Item::new(
            String::new(),
            "demo".to_string(),
            ItemKind::Epic,
            title.to_string(),
        );
        store.create_item(item).unwrap().id
    }

    // ── creation and ids ──────────────────────────────────────────────────

    #[test]
    fn generated_ids_count_up_per_prefix() {
        let mut store = Store::in_memory();
        assert_eq!(task(&mut store, "a"), "ts-1");
        assert_eq!(task(&mut store, "b"), "ts-2");
        assert_eq!(epic(&mut store, "e"), "ep-1");
        assert_eq!(task(&mut store, "c"), "ts-3");
    }

    #[test]
    fn empty_title_rejected() {
        let mut store = Store::in_memory();
        let item = Item::new(
            String::new(),
            "demo".to_string(),
            ItemKind::Task,
            "   ".to_string(),
        );
        assert!(matches!(
            store.create_item(item),
            Err(StoreError::EmptyTitle)
        ));
    }

    #[test]
    fn explicit_id_collision_rejected() {
        let mut store = Store::in_memory();
        task(&mut store, "first");
        let dup = Item::new(
            "ts-1".to_string(),
            "demo".to_string(),
            ItemKind::Task,
            "again".to_string(),
        );
        assert!(matches!(
            store.create_item(dup),
            Err(StoreError::IdCollision(_))
        ));
    }

    // ── parents ───────────────────────────────────────────────────────────

    #[test]
    fn parent_must_be_epic() {
        let mut store = Store::in_memory();
        let t1 = task(&mut store, "a");
        let t2 = task(&mut store, "b");
        let e = epic(&mut store, "home");

        assert!(matches!(
            store.set_parent(&t2, Some(&t1)),
            Err(StoreError::ParentNotEpic(_))
        ));
        store.set_parent(&t2, Some(&e)).unwrap();
        assert_eq!(store.get(&t2).unwrap().parent.as_deref(), Some(e.as_str()));

        store.set_parent(&t2, None).unwrap();
        assert!(store.get(&t2).unwrap().parent.is_none());
    }

    #[test]
    fn parent_chain_loop_refused() {
        let mut store = Store::in_memory();
        let e1 = epic(&mut store, "outer");
        let e2 = epic(&mut store, "inner");
        store.set_parent(&e2, Some(&e1)).unwrap();
        assert!(matches!(
            store.set_parent(&e1, Some(&e2)),
            Err(StoreError::ParentCycle(_))
        ));
    }

    // ── dependencies ──────────────────────────────────────────────────────

    #[test]
    fn dependency_directions() {
        let mut store = Store::in_memory();
        let a = task(&mut store, "blocker");
        let b = task(&mut store, "blocked");
        store.add_dependency(&a, &b).unwrap();

        let deps = store.depends_on(&b);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].id, a);

        let blocked = store.blocked_by(&a);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, b);
    }

    #[test]
    fn dependency_cycle_refused() {
        let mut store = Store::in_memory();
        let a = task(&mut store, "a");
        let b = task(&mut store, "b");
        let c = task(&mut store, "c");
        store.add_dependency(&a, &b).unwrap();
        store.add_dependency(&b, &c).unwrap();

        assert!(matches!(
            store.add_dependency(&c, &a),
            Err(StoreError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn self_and_duplicate_dependency_refused() {
        let mut store = Store::in_memory();
        let a = task(&mut store, "a");
        let b = task(&mut store, "b");
        assert!(matches!(
            store.add_dependency(&a, &a),
            Err(StoreError::SelfDependency(_))
        ));
        store.add_dependency(&a, &b).unwrap();
        assert!(matches!(
            store.add_dependency(&a, &b),
            Err(StoreError::DuplicateDependency { .. })
        ));
    }

    #[test]
    fn remove_dependency_requires_existing_edge() {
        let mut store = Store::in_memory();
        let a = task(&mut store, "a");
        let b = task(&mut store, "b");
        assert!(matches!(
            store.remove_dependency(&a, &b),
            Err(StoreError::NoSuchDependency { .. })
        ));
        store.add_dependency(&a, &b).unwrap();
        store.remove_dependency(&a, &b).unwrap();
        assert!(store.depends_on(&b).is_empty());
    }

    // ── status and history ────────────────────────────────────────────────

    #[test]
    fn status_change_appends_log_with_actor() {
        let mut store = Store::in_memory();
        let id = task(&mut store, "work");
        store
            .update_status(&id, Status::Blocked, Some("waiting on review"), &ctx())
            .unwrap();

        assert_eq!(store.get(&id).unwrap().status, Status::Blocked);
        let logs = store.get_logs(&id);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].actor, "tester");
        assert_eq!(logs[0].text, "status open → blocked: waiting on review");
    }

    #[test]
    fn status_change_bumps_updated_at() {
        let mut store = Store::in_memory();
        let id = task(&mut store, "work");
        let before = store.get(&id).unwrap().updated_at;
        store
            .update_status(&id, Status::InProgress, None, &ctx())
            .unwrap();
        assert!(store.get(&id).unwrap().updated_at >= before);
        assert_eq!(store.get_logs(&id)[0].text, "status open → in_progress");
    }

    // ── deletion ──────────────────────────────────────────────────────────

    #[test]
    fn delete_refused_while_children_exist() {
        let mut store = Store::in_memory();
        let e = epic(&mut store, "parent");
        let t = task(&mut store, "child");
        store.set_parent(&t, Some(&e)).unwrap();

        assert!(matches!(
            store.delete_item(&e),
            Err(StoreError::HasChildren { count: 1, .. })
        ));
        store.delete_item(&t).unwrap();
        store.delete_item(&e).unwrap();
        assert!(store.get(&e).is_err());
    }

    #[test]
    fn delete_strips_edges_and_logs() {
        let mut store = Store::in_memory();
        let a = task(&mut store, "a");
        let b = task(&mut store, "b");
        store.add_dependency(&a, &b).unwrap();
        store.add_log(&a, "note", &ctx()).unwrap();

        store.delete_item(&a).unwrap();
        assert!(store.depends_on(&b).is_empty());
        assert!(store.get_logs(&a).is_empty());
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[test]
    fn list_sorts_by_priority_then_numeric_id() {
        let mut store = Store::in_memory();
        for i in 0..11 {
            task(&mut store, &format!("t{}", i));
        }
        store.update_priority("ts-11", 1).unwrap();
        store.update_priority("ts-2", 1).unwrap();

        let listed = store.list_items(&ListFilter::default());
        let ids: Vec<&str> = listed.iter().map(|i| i.id.as_str()).take(3).collect();
        assert_eq!(ids, ["ts-2", "ts-11", "ts-1"]);
    }

    #[test]
    fn list_filter_is_conjunctive() {
        let mut store = Store::in_memory();
        let a = task(&mut store, "fix login flow");
        let b = task(&mut store, "fix logging");
        store.add_label(&a, "auth").unwrap();
        store.add_label(&b, "auth").unwrap();

        let hits = store.list_items(&ListFilter {
            label: Some("auth".to_string()),
            search: Some("LOGIN".to_string()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a);
    }

    #[test]
    fn stale_cutoff_only_catches_old_in_progress() {
        let mut store = Store::in_memory();
        let old = task(&mut store, "forgotten");
        let fresh = task(&mut store, "active");
        store
            .update_status(&old, Status::InProgress, None, &ctx())
            .unwrap();
        store
            .update_status(&fresh, Status::InProgress, None, &ctx())
            .unwrap();
        if let Some(item) = store.items.get_mut(&old) {
            item.updated_at = Utc::now() - Duration::hours(48);
        }

        let cutoff = Utc::now() - Duration::hours(24);
        let stale = store.stale_items(Some("demo"), cutoff);
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].id, old);

        assert!(store.stale_items(Some("other"), cutoff).is_empty());
    }

    // ── template variables ────────────────────────────────────────────────

    #[test]
    fn template_variable_requires_link() {
        let mut store = Store::in_memory();
        let id = task(&mut store, "plain");
        assert!(matches!(
            store.set_template_variable(&id, "x", "1"),
            Err(StoreError::NoTemplate(_))
        ));

        let mut item = Item::new(
            String::new(),
            "demo".to_string(),
            ItemKind::Task,
            "templated".to_string(),
        );
        item.template = Some(crate::model::TemplateLink {
            template_id: "bugfix".to_string(),
            step: 0,
            variables: IndexMap::new(),
            content_hash: String::new(),
        });
        let id = store.create_item(item).unwrap().id;
        store.set_template_variable(&id, "problem", "crash").unwrap();
        let stored = store.get(&id).unwrap();
        assert_eq!(
            stored
                .template
                .as_ref()
                .unwrap()
                .variables
                .get("problem")
                .map(String::as_str),
            Some("crash")
        );
    }

    // ── persistence ───────────────────────────────────────────────────────

    #[test]
    fn save_and_reopen_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = crate::io::project_io::init_store(tmp.path(), "demo").unwrap();

        let mut store = Store::open(&dir).unwrap();
        let e = epic(&mut store, "release");
        let t = task(&mut store, "ship it");
        store.set_parent(&t, Some(&e)).unwrap();
        store.add_dependency(&e, &t).unwrap();
        store
            .update_status(&t, Status::InProgress, None, &ctx())
            .unwrap();
        store.save().unwrap();

        let reopened = Store::open(&dir).unwrap();
        assert_eq!(reopened.get(&t).unwrap().parent.as_deref(), Some(e.as_str()));
        assert_eq!(reopened.depends_on(&t)[0].id, e);
        assert_eq!(reopened.get_logs(&t).len(), 1);
        // Creation order survives the round trip.
        let all: Vec<&String> = reopened.items.keys().collect();
        assert_eq!(all, [&e, &t]);
    }
}
