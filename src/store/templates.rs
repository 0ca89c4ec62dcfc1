use std::fs;
use std::path::{Path, PathBuf};

use crate::io::project_io::templates_dir;
use crate::model::Template;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// All templates under `<store_dir>/templates/`, sorted by id.
/// A missing directory is an empty list; an unparseable file is an error.
pub fn list_templates(store_dir: &Path) -> Result<Vec<Template>, TemplateError> {
    let dir = templates_dir(store_dir);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(&dir).map_err(|e| TemplateError::Read {
        path: dir.clone(),
        source: e,
    })?;

    let mut templates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TemplateError::Read {
            path: dir.clone(),
            source: e,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        templates.push(parse_template_file(&path)?);
    }
    templates.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(templates)
}

/// Load one template by id.
pub fn load_template(store_dir: &Path, id: &str) -> Result<Template, TemplateError> {
    let path = templates_dir(store_dir).join(format!("{}.toml", id));
    if !path.exists() {
        return Err(TemplateError::NotFound(id.to_string()));
    }
    parse_template_file(&path)
}

fn parse_template_file(path: &Path) -> Result<Template, TemplateError> {
    let text = fs::read_to_string(path).map_err(|e| TemplateError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut template: Template = toml::from_str(&text).map_err(|e| TemplateError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    // The file stem is authoritative for the id.
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        template.id = stem.to_string();
    }
    Ok(template)
}
