use serde::Serialize;

use crate::model::item::{DepRef, Item, ItemKind, LogEntry, Status};
use crate::model::template::Template;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: String,
    pub kind: ItemKind,
    pub project: String,
    pub title: String,
    pub status: Status,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worktree: Option<WorktreeJson>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct WorktreeJson {
    pub branch: String,
    pub base: String,
}

#[derive(Serialize)]
pub struct ItemDetailJson {
    #[serde(flatten)]
    pub item: ItemJson,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<DepJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<DepJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub log: Vec<LogJson>,
}

#[derive(Serialize)]
pub struct DepJson {
    pub id: String,
    pub title: String,
    pub status: Status,
}

#[derive(Serialize)]
pub struct LogJson {
    pub at: String,
    pub actor: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct StaleItemJson {
    #[serde(flatten)]
    pub item: ItemJson,
    pub idle_hours: i64,
}

#[derive(Serialize)]
pub struct TemplateJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<TemplateVariableJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Serialize)]
pub struct TemplateVariableJson {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
}

#[derive(Serialize)]
pub struct ConfigFieldJson {
    pub path: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn item_to_json(item: &Item) -> ItemJson {
    ItemJson {
        id: item.id.clone(),
        kind: item.kind,
        project: item.project.clone(),
        title: item.title.clone(),
        status: item.status,
        priority: item.priority,
        parent: item.parent.clone(),
        labels: item.labels.iter().cloned().collect(),
        description: if item.description.is_empty() {
            None
        } else {
            Some(item.description.clone())
        },
        template: item.template.as_ref().map(|t| t.template_id.clone()),
        worktree: item.worktree.as_ref().map(|w| WorktreeJson {
            branch: w.branch.clone(),
            base: w.base.clone(),
        }),
        created_at: item.created_at.to_rfc3339(),
        updated_at: item.updated_at.to_rfc3339(),
    }
}

pub fn dep_to_json(dep: &DepRef) -> DepJson {
    DepJson {
        id: dep.id.clone(),
        title: dep.title.clone(),
        status: dep.status,
    }
}

pub fn log_to_json(entry: &LogEntry) -> LogJson {
    LogJson {
        at: entry.at.to_rfc3339(),
        actor: entry.actor.clone(),
        text: entry.text.clone(),
    }
}

pub fn template_to_json(template: &Template, with_body: bool) -> TemplateJson {
    TemplateJson {
        id: template.id.clone(),
        name: template.name.clone(),
        description: template.description.clone(),
        variables: template
            .variables
            .iter()
            .map(|v| TemplateVariableJson {
                name: v.name.clone(),
                prompt: v.prompt.clone(),
                default: v.default.clone(),
            })
            .collect(),
        body: if with_body {
            Some(template.body.clone())
        } else {
            None
        },
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single item as a one-line summary
pub fn format_item_line(item: &Item) -> String {
    let labels_str = if item.labels.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            item.labels
                .iter()
                .map(|l| format!("#{}", l))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };
    format!(
        "[{}] {} p{} {}{}",
        item.status.icon(),
        item.id,
        item.priority,
        item.title,
        labels_str
    )
}

/// Format detailed item view
pub fn format_item_detail(
    item: &Item,
    depends_on: &[DepRef],
    blocks: &[DepRef],
    log: &[LogEntry],
) -> Vec<String> {
    let mut lines = Vec::new();

    // Header
    lines.push(format_item_line(item));
    lines.push(format!(
        "{} · {} · {}",
        match item.kind {
            ItemKind::Task => "task",
            ItemKind::Epic => "epic",
        },
        item.project,
        item.status.name()
    ));

    if let Some(parent) = &item.parent {
        lines.push(format!("parent: {}", parent));
    }
    if let Some(wt) = &item.worktree {
        lines.push(format!("worktree: {} (from {})", wt.branch, wt.base));
    }
    if let Some(link) = &item.template {
        lines.push(format!("template: {}", link.template_id));
        for (name, value) in &link.variables {
            lines.push(format!("  {} = {}", name, value));
        }
    }

    if !item.description.is_empty() {
        lines.push(String::new());
        for line in item.description.lines() {
            lines.push(format!("  {}", line));
        }
    }

    if !depends_on.is_empty() {
        lines.push(String::new());
        lines.push("depends on:".to_string());
        for dep in depends_on {
            lines.push(format!("  [{}] {} {}", dep.status.icon(), dep.id, dep.title));
        }
    }
    if !blocks.is_empty() {
        lines.push(String::new());
        lines.push("blocks:".to_string());
        for dep in blocks {
            lines.push(format!("  [{}] {} {}", dep.status.icon(), dep.id, dep.title));
        }
    }

    if !log.is_empty() {
        lines.push(String::new());
        lines.push("log:".to_string());
        for entry in log {
            lines.push(format!(
                "  {} {} {}",
                entry.at.format("%Y-%m-%d %H:%M"),
                entry.actor,
                entry.text
            ));
        }
    }

    lines
}

/// Format a template as a one-line summary
pub fn format_template_line(template: &Template, name_width: usize) -> String {
    format!(
        "{:<width$} ({}){}{}",
        template.name,
        template.id,
        if template.description.is_empty() { "" } else { "  " },
        template.description,
        width = name_width
    )
}

/// Format a template with its variables and raw body
pub fn format_template_detail(template: &Template) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("{} ({})", template.name, template.id));
    if !template.description.is_empty() {
        lines.push(template.description.clone());
    }

    if !template.variables.is_empty() {
        lines.push(String::new());
        lines.push("variables:".to_string());
        for var in &template.variables {
            let mut line = format!("  {}", var.name);
            if !var.prompt.is_empty() {
                line.push_str(&format!("  {}", var.prompt));
            }
            if !var.default.is_empty() {
                line.push_str(&format!("  [default: {}]", var.default));
            }
            lines.push(line);
        }
    }

    lines.push(String::new());
    lines.push("body:".to_string());
    for line in template.body.lines() {
        lines.push(format!("  {}", line));
    }

    lines
}
