use std::fs;
use std::path::Path;

use crate::io::project_io::{config_path, ProjectError};
use crate::model::config::Config;

/// Read the store config, tolerating a missing file (all defaults).
pub fn load_config(store_dir: &Path) -> Result<Config, ProjectError> {
    let path = config_path(store_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ProjectError::Read {
        path: path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text)?;
    Ok(config)
}

/// Read both the parsed config and the raw toml_edit document for
/// round-trip-safe editing.
pub fn read_config_doc(
    store_dir: &Path,
) -> Result<(Config, toml_edit::DocumentMut), ProjectError> {
    let path = config_path(store_dir);
    let text = if path.exists() {
        fs::read_to_string(&path).map_err(|e| ProjectError::Read {
            path: path.clone(),
            source: e,
        })?
    } else {
        String::new()
    };
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text
        .parse()
        .map_err(|e: toml_edit::TomlError| ProjectError::InvalidField(format!("config.toml: {}", e)))?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config_doc(store_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ProjectError> {
    let path = config_path(store_dir);
    fs::write(&path, doc.to_string()).map_err(|e| ProjectError::Write { path, source: e })?;
    Ok(())
}

/// Editable fields as (dotted path, current value) pairs, in display order.
/// `ui.colors.*` entries follow the fixed fields.
pub fn config_fields(config: &Config) -> Vec<(String, String)> {
    let mut fields = vec![
        ("project.default".to_string(), config.project.default.clone()),
        ("agent.actor".to_string(), config.agent.actor.clone()),
        (
            "editor.command".to_string(),
            config.editor.command.clone().unwrap_or_default(),
        ),
        (
            "stale.after_hours".to_string(),
            config.stale.after_hours.to_string(),
        ),
    ];
    let mut colors: Vec<_> = config.ui.colors.iter().collect();
    colors.sort();
    for (name, value) in colors {
        fields.push((format!("ui.colors.{}", name), value.clone()));
    }
    fields
}

/// Validate and set one dotted-path field, preserving document layout.
/// Returns the normalized value actually written.
pub fn set_config_field(
    store_dir: &Path,
    path: &str,
    value: &str,
) -> Result<String, ProjectError> {
    let (_, mut doc) = read_config_doc(store_dir)?;
    let written = apply_config_field(&mut doc, path, value)?;
    write_config_doc(store_dir, &doc)?;
    Ok(written)
}

/// The document-level half of `set_config_field`, separated for tests.
pub fn apply_config_field(
    doc: &mut toml_edit::DocumentMut,
    path: &str,
    value: &str,
) -> Result<String, ProjectError> {
    match path {
        "project.default" => {
            set_path(doc, &["project", "default"], toml_edit::value(value));
            Ok(value.to_string())
        }
        "agent.actor" => {
            if value.trim().is_empty() {
                return Err(field_error("agent.actor cannot be empty"));
            }
            set_path(doc, &["agent", "actor"], toml_edit::value(value));
            Ok(value.to_string())
        }
        "editor.command" => {
            set_path(doc, &["editor", "command"], toml_edit::value(value));
            Ok(value.to_string())
        }
        "stale.after_hours" => {
            let hours: i64 = value
                .parse()
                .map_err(|_| field_error("stale.after_hours must be a number of hours"))?;
            if hours < 1 {
                return Err(field_error("stale.after_hours must be at least 1"));
            }
            set_path(doc, &["stale", "after_hours"], toml_edit::value(hours));
            Ok(hours.to_string())
        }
        _ => {
            if let Some(name) = path.strip_prefix("ui.colors.") {
                if !is_hex_color(value) {
                    return Err(field_error("colors must be #rgb or #rrggbb hex"));
                }
                set_path(doc, &["ui", "colors", name], toml_edit::value(value));
                return Ok(value.to_string());
            }
            Err(field_error(&format!("unknown config field '{}'", path)))
        }
    }
}

/// How a value renders in the Config view: quoted strings, bare numbers,
/// color values as-is. Empty shows as the placeholder `(unset)`.
pub fn format_config_value(path: &str, value: &str) -> String {
    if value.is_empty() {
        return "(unset)".to_string();
    }
    match path {
        "stale.after_hours" => value.to_string(),
        p if p.starts_with("ui.colors.") => value.to_string(),
        _ => format!("\"{}\"", value),
    }
}

fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn set_path(doc: &mut toml_edit::DocumentMut, segments: &[&str], value: toml_edit::Item) {
    let mut item = doc.as_item_mut();
    for seg in &segments[..segments.len() - 1] {
        let next = &mut item[seg];
        if next.is_none() {
            let mut table = toml_edit::Table::new();
            table.set_implicit(true);
            *next = toml_edit::Item::Table(table);
        }
        item = next;
    }
    item[segments[segments.len() - 1]] = value;
}

fn field_error(msg: &str) -> ProjectError {
    ProjectError::InvalidField(msg.to_string())
}
