use std::fs;
use std::path::{Path, PathBuf};

/// Name of the store directory discovered upward from the cwd.
pub const STORE_DIR: &str = ".trellis";

/// Error type for store directory discovery and scaffolding
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("not a trellis project: no .trellis/ directory found (run `tre init`)")]
    NotAProject,
    #[error("already a trellis project: {0} exists")]
    AlreadyInitialized(PathBuf),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("{0}")]
    InvalidField(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Walk up from `start` looking for a `.trellis/` directory with either an
/// items file or a config file in it. Returns the `.trellis` path itself.
pub fn discover_store_dir(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        let dir = current.join(STORE_DIR);
        if dir.is_dir() && (dir.join("items.jsonl").exists() || dir.join("config.toml").exists()) {
            return Ok(dir);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

pub fn items_path(store_dir: &Path) -> PathBuf {
    store_dir.join("items.jsonl")
}

pub fn config_path(store_dir: &Path) -> PathBuf {
    store_dir.join("config.toml")
}

pub fn templates_dir(store_dir: &Path) -> PathBuf {
    store_dir.join("templates")
}

/// Create a fresh `.trellis/` scaffold under `root`: empty items file,
/// default config, templates dir with one starter template.
pub fn init_store(root: &Path, project_name: &str) -> Result<PathBuf, ProjectError> {
    let dir = root.join(STORE_DIR);
    if dir.exists() {
        return Err(ProjectError::AlreadyInitialized(dir));
    }
    fs::create_dir_all(templates_dir(&dir))?;

    let items = items_path(&dir);
    fs::write(&items, "").map_err(|e| ProjectError::Write {
        path: items.clone(),
        source: e,
    })?;

    let config = config_path(&dir);
    let config_text = format!(
        "\
[project]
default = \"{}\"

[agent]
actor = \"local\"

[stale]
after_hours = 24
",
        project_name
    );
    fs::write(&config, config_text).map_err(|e| ProjectError::Write {
        path: config.clone(),
        source: e,
    })?;

    let starter = templates_dir(&dir).join("bugfix.toml");
    fs::write(&starter, STARTER_TEMPLATE).map_err(|e| ProjectError::Write {
        path: starter.clone(),
        source: e,
    })?;

    Ok(dir)
}

const STARTER_TEMPLATE: &str = r#"id = "bugfix"
name = "Bug fix"
description = "A bug report with repro steps and expected behavior"
body = """
## Problem

{{.problem}}

## Reproduction

{{if hasValue .repro}}{{.repro}}{{else}}Not yet reproduced.{{end}}

## Expected

{{default .expected "Behavior matches the documentation."}}
"""

[[variables]]
name = "problem"
prompt = "What is broken?"

[[variables]]
name = "repro"
prompt = "Steps to reproduce (optional)"

[[variables]]
name = "expected"
prompt = "Expected behavior (optional)"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discover_from_root_and_subdir() {
        let tmp = TempDir::new().unwrap();
        init_store(tmp.path(), "demo").unwrap();

        let dir = discover_store_dir(tmp.path()).unwrap();
        assert_eq!(dir, tmp.path().join(STORE_DIR));

        let sub = tmp.path().join("src/deep");
        fs::create_dir_all(&sub).unwrap();
        let dir = discover_store_dir(&sub).unwrap();
        assert_eq!(dir, tmp.path().join(STORE_DIR));
    }

    #[test]
    fn discover_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_store_dir(tmp.path()).is_err());
    }

    #[test]
    fn init_scaffold() {
        let tmp = TempDir::new().unwrap();
        let dir = init_store(tmp.path(), "demo").unwrap();
        assert!(items_path(&dir).exists());
        assert!(config_path(&dir).exists());
        assert!(templates_dir(&dir).join("bugfix.toml").exists());

        let config = fs::read_to_string(config_path(&dir)).unwrap();
        assert!(config.contains("default = \"demo\""));
    }

    #[test]
    fn init_refuses_existing() {
        let tmp = TempDir::new().unwrap();
        init_store(tmp.path(), "demo").unwrap();
        assert!(matches!(
            init_store(tmp.path(), "demo"),
            Err(ProjectError::AlreadyInitialized(_))
        ));
    }
}
