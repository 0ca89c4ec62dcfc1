use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tre", about = concat!("[#] trellis v", env!("CARGO_PKG_VERSION"), " - tasks, dependencies, and a terminal UI"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a .trellis store in the current directory
    Init(InitArgs),
    /// List items
    List(ListArgs),
    /// Show one item in full
    Show(ShowArgs),
    /// Create a task or epic
    Add(AddArgs),
    /// Change an item's status
    Status(StatusArgs),
    /// Append a log entry to an item
    Log(LogArgs),
    /// Add or remove a dependency
    Dep(DepArgs),
    /// Add or remove a label
    Label(LabelArgs),
    /// Set an item's priority
    Priority(PriorityArgs),
    /// Replace an item's description
    Describe(DescribeArgs),
    /// Permanently delete an item
    Delete(DeleteArgs),
    /// Show in-progress items that have not been touched recently
    Stale(StaleArgs),
    /// List templates, or show one
    Templates(TemplatesCmd),
    /// Read or write configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Project name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if .trellis/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by project
    #[arg(long)]
    pub project: Option<String>,
    /// Filter by status (open, in_progress, blocked, done, canceled)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by label
    #[arg(long)]
    pub label: Option<String>,
    /// Case-insensitive title substring
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Item ID to show
    pub id: String,
}

#[derive(Args)]
pub struct StaleArgs {
    /// Age threshold in hours (default: from config)
    #[arg(long)]
    pub hours: Option<u64>,
    /// Limit to one project
    #[arg(long)]
    pub project: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Item kind: "task" or "epic"
    pub kind: String,
    /// Item title
    pub title: String,
    /// Project (default: from config)
    #[arg(long)]
    pub project: Option<String>,
    /// Priority 1-5 (default: 3)
    #[arg(long)]
    pub priority: Option<u8>,
    /// Parent epic ID
    #[arg(long)]
    pub parent: Option<String>,
    /// Description body
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Item ID
    pub id: String,
    /// New status (open, in_progress, blocked, done, canceled)
    pub status: String,
    /// Reason recorded in the item history
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Item ID
    pub id: String,
    /// Log text
    pub text: String,
}

#[derive(Args)]
pub struct DepArgs {
    /// Item ID that depends on the other
    pub id: String,
    /// Action: "add" or "rm"
    pub action: String,
    /// The blocking item's ID
    pub other: String,
}

#[derive(Args)]
pub struct LabelArgs {
    /// Item ID
    pub id: String,
    /// Action: "add" or "rm"
    pub action: String,
    /// Label name
    pub name: String,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Item ID
    pub id: String,
    /// Priority 1 (highest) to 5 (lowest)
    pub priority: u8,
}

#[derive(Args)]
pub struct DescribeArgs {
    /// Item ID
    pub id: String,
    /// New description ("-" reads stdin)
    pub text: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Item ID to delete
    pub id: String,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TemplatesCmd {
    #[command(subcommand)]
    pub action: Option<TemplatesAction>,
}

#[derive(Subcommand)]
pub enum TemplatesAction {
    /// Show one template with its variables and body
    Show(TemplateShowArgs),
}

#[derive(Args)]
pub struct TemplateShowArgs {
    /// Template ID (file stem under .trellis/templates/)
    pub id: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// List every field as `path = value` (default)
    List,
    /// Print one field's value
    Get(ConfigGetArgs),
    /// Set one field
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigGetArgs {
    /// Dotted field path (e.g. stale.after_hours)
    pub path: String,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted field path (e.g. stale.after_hours)
    pub path: String,
    /// New value
    pub value: String,
}
