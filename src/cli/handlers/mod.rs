mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Duration, Utc};

/// Global override for store discovery (set by -C flag)
static DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::project_io::{self, ProjectError};
use crate::model::config::Config;
use crate::model::item::{Item, ItemKind, Status};
use crate::store::templates;
use crate::store::{ListFilter, Store};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for store_dir_cwd()
    if let Some(ref dir) = cli.dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        None => {
            // main.rs launches the TUI for the bare invocation
            Ok(())
        }
        Some(cmd) => match cmd {
            // Init is handled in main.rs before store discovery
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Stale(args) => cmd_stale(args, json),
            Commands::Templates(args) => cmd_templates(args, json),
            Commands::Config(args) => cmd_config(args, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, json),
            Commands::Status(args) => cmd_status(args),
            Commands::Log(args) => cmd_log(args),
            Commands::Dep(args) => cmd_dep(args),
            Commands::Label(args) => cmd_label(args),
            Commands::Priority(args) => cmd_priority(args),
            Commands::Describe(args) => cmd_describe(args),
            Commands::Delete(args) => cmd_delete(args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn store_dir_cwd() -> Result<PathBuf, ProjectError> {
    let start = match DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(ProjectError::Io)?,
    };
    project_io::discover_store_dir(&start)
}

fn open_store_cwd() -> Result<(Store, Config), Box<dyn std::error::Error>> {
    let dir = store_dir_cwd()?;
    let config = config_io::load_config(&dir)?;
    let store = Store::open(&dir)?;
    Ok((store, config))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (store, _config) = open_store_cwd()?;
    let status = args
        .status
        .as_deref()
        .map(Status::parse)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;

    let filter = ListFilter {
        project: args.project,
        status,
        label: args.label,
        search: args.search,
    };
    let items = store.list_items(&filter);

    if json {
        let rows: Vec<ItemJson> = items.iter().map(item_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for item in &items {
            println!("{}", format_item_line(item));
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (store, _config) = open_store_cwd()?;
    let item = store.get(&args.id)?;
    let depends_on = store.depends_on(&args.id);
    let blocks = store.blocked_by(&args.id);
    let log = store.get_logs(&args.id);

    if json {
        let detail = ItemDetailJson {
            item: item_to_json(item),
            depends_on: depends_on.iter().map(dep_to_json).collect(),
            blocks: blocks.iter().map(dep_to_json).collect(),
            log: log.iter().map(log_to_json).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        for line in format_item_detail(item, &depends_on, &blocks, &log) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stale(args: StaleArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (store, config) = open_store_cwd()?;
    let hours = args.hours.unwrap_or(config.stale.after_hours);
    let now = Utc::now();
    let cutoff = now - Duration::hours(hours as i64);
    let items = store.stale_items(args.project.as_deref(), cutoff);

    if json {
        let rows: Vec<StaleItemJson> = items
            .iter()
            .map(|item| StaleItemJson {
                item: item_to_json(item),
                idle_hours: (now - item.updated_at).num_hours(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for item in &items {
            let idle = (now - item.updated_at).num_hours();
            println!("{}  idle {}h", format_item_line(item), idle);
        }
    }
    Ok(())
}

fn cmd_templates(args: TemplatesCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir_cwd()?;

    match args.action {
        None => {
            let list = templates::list_templates(&dir)?;
            if json {
                let rows: Vec<TemplateJson> =
                    list.iter().map(|t| template_to_json(t, false)).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if list.is_empty() {
                println!("no templates (add .trellis/templates/*.toml)");
            } else {
                let name_width = list.iter().map(|t| t.name.len()).max().unwrap_or(0);
                for t in &list {
                    println!("{}", format_template_line(t, name_width));
                }
            }
            Ok(())
        }
        Some(TemplatesAction::Show(show)) => {
            let template = templates::load_template(&dir, &show.id)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&template_to_json(&template, true))?
                );
            } else {
                for line in format_template_detail(&template) {
                    println!("{}", line);
                }
            }
            Ok(())
        }
    }
}

fn cmd_config(args: ConfigCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir_cwd()?;

    match args.action {
        None | Some(ConfigAction::List) => {
            let config = config_io::load_config(&dir)?;
            let fields = config_io::config_fields(&config);
            if json {
                let rows: Vec<ConfigFieldJson> = fields
                    .iter()
                    .map(|(path, value)| ConfigFieldJson {
                        path: path.clone(),
                        value: value.clone(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (path, value) in &fields {
                    println!("{} = {}", path, config_io::format_config_value(path, value));
                }
            }
            Ok(())
        }
        Some(ConfigAction::Get(get)) => {
            let config = config_io::load_config(&dir)?;
            let fields = config_io::config_fields(&config);
            match fields.iter().find(|(path, _)| path == &get.path) {
                Some((_, value)) => {
                    println!("{}", value);
                    Ok(())
                }
                None => Err(format!("unknown config field '{}'", get.path).into()),
            }
        }
        Some(ConfigAction::Set(set)) => {
            let written = config_io::set_config_field(&dir, &set.path, &set.value)?;
            println!("{} = {}", set.path, written);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_store_cwd()?;

    let kind = ItemKind::parse(&args.kind).map_err(Box::<dyn std::error::Error>::from)?;
    let project = args
        .project
        .unwrap_or_else(|| config.project.default.clone());

    let mut item = Item::new(String::new(), project, kind, args.title);
    if let Some(priority) = args.priority {
        item.priority = priority;
    }
    item.parent = args.parent;
    if let Some(text) = args.description {
        item.description = text;
    }

    let created = store.create_item(item)?;
    store.save()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&item_to_json(&created))?);
    } else {
        println!("{}", format_item_line(&created));
    }
    Ok(())
}

fn cmd_status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_store_cwd()?;
    let status = Status::parse(&args.status).map_err(Box::<dyn std::error::Error>::from)?;

    store.update_status(
        &args.id,
        status,
        args.reason.as_deref(),
        &config.agent_context(),
    )?;
    store.save()?;
    println!("{} → {}", args.id, status.name());
    Ok(())
}

fn cmd_log(args: LogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = open_store_cwd()?;
    store.add_log(&args.id, &args.text, &config.agent_context())?;
    store.save()?;
    println!("{} log added", args.id);
    Ok(())
}

fn cmd_dep(args: DepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _config) = open_store_cwd()?;

    // `tre dep A add B` records that A depends on B, so B is the blocker.
    match args.action.as_str() {
        "add" => store.add_dependency(&args.other, &args.id)?,
        "rm" => store.remove_dependency(&args.other, &args.id)?,
        other => return Err(format!("unknown action '{}' (expected: add, rm)", other).into()),
    }

    store.save()?;
    println!("{} dep {} {}", args.id, args.action, args.other);
    Ok(())
}

fn cmd_label(args: LabelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _config) = open_store_cwd()?;

    match args.action.as_str() {
        "add" => store.add_label(&args.id, &args.name)?,
        "rm" => store.remove_label(&args.id, &args.name)?,
        other => return Err(format!("unknown action '{}' (expected: add, rm)", other).into()),
    }

    store.save()?;
    println!("{} label {} {}", args.id, args.action, args.name);
    Ok(())
}

fn cmd_priority(args: PriorityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _config) = open_store_cwd()?;
    store.update_priority(&args.id, args.priority)?;
    store.save()?;
    println!("{} p{}", args.id, args.priority);
    Ok(())
}

fn cmd_describe(args: DescribeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _config) = open_store_cwd()?;

    let text = if args.text == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.text
    };

    store.set_description(&args.id, text.trim_end())?;
    store.save()?;
    println!("{} description updated", args.id);
    Ok(())
}

fn cmd_delete(args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _config) = open_store_cwd()?;
    store.delete_item(&args.id)?;
    store.save()?;
    println!("{} deleted", args.id);
    Ok(())
}
