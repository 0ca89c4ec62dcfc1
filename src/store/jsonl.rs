use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DepEdge, Item, LogEntry};
use crate::store::StoreError;

/// One line of items.jsonl. The tag keeps items, dependency edges, and log
/// entries in a single append-friendly file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Record {
    Item(Item),
    Dep(DepEdge),
    Log {
        item: String,
        at: DateTime<Utc>,
        actor: String,
        text: String,
    },
}

#[derive(Debug, Default)]
pub struct Loaded {
    pub items: Vec<Item>,
    pub deps: Vec<DepEdge>,
    pub logs: HashMap<String, Vec<LogEntry>>,
}

/// Read a store file. Blank lines are skipped; a malformed line is an error
/// naming the line number.
pub fn load(path: &Path) -> Result<Loaded, StoreError> {
    let text = fs::read_to_string(path)?;
    let mut loaded = Loaded::default();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source: e,
        })?;
        match record {
            Record::Item(item) => loaded.items.push(item),
            Record::Dep(dep) => loaded.deps.push(dep),
            Record::Log {
                item,
                at,
                actor,
                text,
            } => loaded
                .logs
                .entry(item)
                .or_default()
                .push(LogEntry { at, actor, text }),
        }
    }

    Ok(loaded)
}

/// Rewrite the store file: items in creation order, then edges, then logs.
/// Writes a sibling temp file and renames over the target.
pub fn save<'a>(
    path: &Path,
    items: impl Iterator<Item = &'a Item>,
    deps: &[DepEdge],
    logs: &HashMap<String, Vec<LogEntry>>,
) -> Result<(), StoreError> {
    let mut out = Vec::new();
    for item in items {
        write_record(&mut out, &Record::Item(item.clone()))?;
    }
    for dep in deps {
        write_record(&mut out, &Record::Dep(dep.clone()))?;
    }
    let mut log_ids: Vec<&String> = logs.keys().collect();
    log_ids.sort();
    for id in log_ids {
        for entry in &logs[id] {
            write_record(
                &mut out,
                &Record::Log {
                    item: id.clone(),
                    at: entry.at,
                    actor: entry.actor.clone(),
                    text: entry.text.clone(),
                },
            )?;
        }
    }

    let tmp = path.with_extension("jsonl.tmp");
    fs::write(&tmp, &out)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_record(out: &mut Vec<u8>, record: &Record) -> Result<(), StoreError> {
    serde_json::to_writer(&mut *out, record)?;
    out.push(b'\n');
    Ok(())
}
