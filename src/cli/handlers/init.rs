use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::project_io::{self, STORE_DIR};
use crate::template::engine::slug;

/// Pick the project name: explicit --name wins, otherwise the slugged
/// directory name.
fn project_name_from(cwd: &Path, explicit: Option<String>) -> String {
    if let Some(name) = explicit {
        return name;
    }
    cwd.file_name()
        .and_then(|n| n.to_str())
        .map(slug)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let dir = cwd.join(STORE_DIR);

    if dir.is_dir() {
        if !args.force {
            return Err(format!(
                "store already exists at ./{}/ (use --force to recreate)",
                STORE_DIR
            )
            .into());
        }
        fs::remove_dir_all(&dir)?;
    }

    // Warn when a parent store would shadow this one during discovery
    if let Some(parent) = cwd.parent() {
        if let Ok(parent_dir) = project_io::discover_store_dir(parent) {
            eprintln!("Note: parent store found at {}", parent_dir.display());
            eprintln!("Creating a new store in ./{}/", STORE_DIR);
        }
    }

    let name = project_name_from(&cwd, args.name);
    let created = project_io::init_store(&cwd, &name)?;

    println!("Initialized trellis store: {}", created.display());
    println!("  project: {}", name);
    println!("  starter template: templates/bugfix.toml");
    Ok(())
}
