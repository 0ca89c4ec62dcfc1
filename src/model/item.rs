use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Item kind: a leaf task or an epic that may own children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Epic,
}

impl ItemKind {
    /// The id prefix for this kind (`ts-…` / `ep-…`).
    pub fn prefix(self) -> &'static str {
        match self {
            ItemKind::Task => "ts",
            ItemKind::Epic => "ep",
        }
    }

    pub fn parse(s: &str) -> Result<ItemKind, String> {
        match s {
            "task" => Ok(ItemKind::Task),
            "epic" => Ok(ItemKind::Epic),
            _ => Err(format!("unknown kind '{}' (expected: task, epic)", s)),
        }
    }
}

/// Item lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Blocked,
    Done,
    Canceled,
}

impl Status {
    /// All statuses in display order. Index in this array is the canonical
    /// position used by the five-way visibility filter.
    pub const ALL: [Status; 5] = [
        Status::Open,
        Status::InProgress,
        Status::Blocked,
        Status::Done,
        Status::Canceled,
    ];

    /// One-cell glyph shown in list rows.
    pub fn icon(self) -> char {
        match self {
            Status::Open => '\u{25CB}',       // ○
            Status::InProgress => '\u{25B8}', // ▸
            Status::Blocked => '\u{2298}',    // ⊘
            Status::Done => '\u{2713}',       // ✓
            Status::Canceled => '\u{2717}',   // ✗
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
            Status::Done => "done",
            Status::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Result<Status, String> {
        match s {
            "open" => Ok(Status::Open),
            "in_progress" => Ok(Status::InProgress),
            "blocked" => Ok(Status::Blocked),
            "done" => Ok(Status::Done),
            "canceled" => Ok(Status::Canceled),
            _ => Err(format!(
                "unknown status '{}' (expected: open, in_progress, blocked, done, canceled)",
                s
            )),
        }
    }

    /// Single-letter code used by batch operations: o/i/b/d/c.
    pub fn from_code(c: char) -> Option<Status> {
        match c {
            'o' => Some(Status::Open),
            'i' => Some(Status::InProgress),
            'b' => Some(Status::Blocked),
            'd' => Some(Status::Done),
            'c' => Some(Status::Canceled),
            _ => None,
        }
    }

    /// Index into `Status::ALL`.
    pub fn index(self) -> usize {
        match self {
            Status::Open => 0,
            Status::InProgress => 1,
            Status::Blocked => 2,
            Status::Done => 3,
            Status::Canceled => 4,
        }
    }
}

pub const PRIORITY_MIN: u8 = 1;
pub const PRIORITY_MAX: u8 = 5;
pub const PRIORITY_DEFAULT: u8 = 3;

/// Parse a priority argument, enforcing the 1–5 range (1 = most urgent).
pub fn parse_priority(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(n) if (PRIORITY_MIN..=PRIORITY_MAX).contains(&n) => Ok(n),
        _ => Err(format!("priority must be 1-5, got '{}'", s)),
    }
}

/// Linkage back to the template an item was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLink {
    pub template_id: String,
    /// Step index within a multi-step template flow.
    #[serde(default)]
    pub step: usize,
    /// Variable values captured at creation time, in declaration order.
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    /// Hash of the rendered content at creation, for drift detection.
    #[serde(default)]
    pub content_hash: String,
}

/// Worktree association for an epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worktree {
    pub branch: String,
    pub base: String,
}

/// A task or epic record. Owned by the store; the TUI only ever holds a
/// read snapshot of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub project: String,
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub priority: u8,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub template: Option<TemplateLink>,
    #[serde(default)]
    pub worktree: Option<Worktree>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// A fresh open item with default priority; the caller supplies the id.
    pub fn new(id: String, project: String, kind: ItemKind, title: String) -> Self {
        let now = Utc::now();
        Item {
            id,
            project,
            kind,
            title,
            description: String::new(),
            status: Status::Open,
            priority: PRIORITY_DEFAULT,
            parent: None,
            labels: BTreeSet::new(),
            template: None,
            worktree: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_epic(&self) -> bool {
        self.kind == ItemKind::Epic
    }
}

/// A dependency endpoint as shown in depends-on / blocks lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepRef {
    pub id: String,
    pub title: String,
    pub status: Status,
}

/// A directed edge: `blocker` blocks `blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepEdge {
    pub blocker: String,
    pub blocked: String,
}

/// One line of an item's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub actor: String,
    pub text: String,
}

/// Order ids prefix-first, then numerically where both suffixes are numbers,
/// so `ts-2` sorts before `ts-10`.
pub fn cmp_ids(a: &str, b: &str) -> Ordering {
    fn split(id: &str) -> (&str, Option<u64>) {
        match id.rsplit_once('-') {
            Some((head, tail)) => (head, tail.parse().ok()),
            None => (id, None),
        }
    }
    let (ap, an) = split(a);
    let (bp, bn) = split(b);
    match (ap.cmp(bp), an, bn) {
        (Ordering::Equal, Some(x), Some(y)) => x.cmp(&y),
        (Ordering::Equal, _, _) => a.cmp(b),
        (ord, _, _) => ord,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trip() {
        for s in Status::ALL {
            assert_eq!(Status::parse(s.name()), Ok(s));
        }
        assert!(Status::parse("in-progress").is_err());
    }

    #[test]
    fn status_codes() {
        assert_eq!(Status::from_code('o'), Some(Status::Open));
        assert_eq!(Status::from_code('i'), Some(Status::InProgress));
        assert_eq!(Status::from_code('b'), Some(Status::Blocked));
        assert_eq!(Status::from_code('d'), Some(Status::Done));
        assert_eq!(Status::from_code('c'), Some(Status::Canceled));
        assert_eq!(Status::from_code('x'), None);
    }

    #[test]
    fn priority_bounds() {
        assert_eq!(parse_priority("1"), Ok(1));
        assert_eq!(parse_priority("5"), Ok(5));
        assert!(parse_priority("0").is_err());
        assert!(parse_priority("6").is_err());
        assert!(parse_priority("fast").is_err());
    }

    #[test]
    fn id_ordering_is_numeric_within_prefix() {
        assert_eq!(cmp_ids("ts-2", "ts-10"), Ordering::Less);
        assert_eq!(cmp_ids("ts-10", "ts-10"), Ordering::Equal);
        assert_eq!(cmp_ids("ep-1", "ts-1"), Ordering::Less);
        // Non-numeric suffixes fall back to string order.
        assert_eq!(cmp_ids("ts-a", "ts-b"), Ordering::Less);
    }

    #[test]
    fn item_serde_defaults() {
        let json = r#"{
            "id": "ts-1", "project": "demo", "kind": "task",
            "title": "First", "status": "open", "priority": 3,
            "created_at": "2025-06-01T00:00:00Z",
            "updated_at": "2025-06-01T00:00:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.description, "");
        assert!(item.parent.is_none());
        assert!(item.labels.is_empty());
        assert!(item.template.is_none());
        assert!(item.worktree.is_none());
    }
}
