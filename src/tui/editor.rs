use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;
use std::time::SystemTime;

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};

use crate::tui::msg::Cmd;

/// What an external-editor session writes back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Description,
    Variable(String),
}

impl EditTarget {
    pub fn label(&self) -> String {
        match self {
            EditTarget::Description => "description".to_string(),
            EditTarget::Variable(name) => format!("variable:{name}"),
        }
    }

    pub fn update_cmd(&self, id: &str, text: String) -> Cmd {
        match self {
            EditTarget::Description => Cmd::SetDescription {
                id: id.to_string(),
                text,
            },
            EditTarget::Variable(name) => Cmd::SetTemplateVariable {
                id: id.to_string(),
                name: name.clone(),
                value: text,
            },
        }
    }
}

#[derive(Debug)]
pub struct EditOutcome {
    /// New content, present only when the file's mtime changed during the
    /// session.
    pub content: Option<String>,
    /// Non-zero editor exit. Reported to the user but does not suppress a
    /// save decided by the mtime check.
    pub error: Option<String>,
}

/// Resolve the editor command line: configured value, then $VISUAL, then
/// $EDITOR, then vi.
pub fn editor_command(configured: Option<&str>) -> String {
    resolve_editor(
        configured,
        env::var("VISUAL").ok().as_deref(),
        env::var("EDITOR").ok().as_deref(),
    )
}

fn resolve_editor(
    configured: Option<&str>,
    visual: Option<&str>,
    editor: Option<&str>,
) -> String {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|c| !c.is_empty())
        .unwrap_or("vi")
        .to_string()
}

/// Release the terminal, run one editor session, restore the terminal on
/// every exit path. The caller redraws afterwards.
pub fn edit_with_terminal_released(command: &str, initial: &str) -> io::Result<EditOutcome> {
    let _pause = TerminalPause::acquire()?;
    run_session(command, initial)
}

/// One editor round trip over a temporary file. The save decision is the
/// file's modification time, nothing else; the temp file is removed when the
/// handle drops, on success and failure alike.
pub fn run_session(command: &str, initial: &str) -> io::Result<EditOutcome> {
    let mut file = tempfile::Builder::new()
        .prefix("trellis-")
        .suffix(".md")
        .tempfile()?;
    file.write_all(initial.as_bytes())?;
    file.as_file().sync_all()?;
    let before = modified_at(file.path())?;

    let status = spawn_editor(command, file.path())?;

    let after = modified_at(file.path())?;
    let content = if after != before {
        Some(fs::read_to_string(file.path())?)
    } else {
        None
    };
    let error = (!status.success())
        .then(|| format!("editor exited with {status}"));
    Ok(EditOutcome { content, error })
}

fn modified_at(path: &std::path::Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

fn spawn_editor(command: &str, path: &std::path::Path) -> io::Result<std::process::ExitStatus> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "empty editor command")
    })?;
    Command::new(program).args(parts).arg(path).status()
}

struct TerminalPause;

impl TerminalPause {
    fn acquire() -> io::Result<Self> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(TerminalPause)
    }
}

impl Drop for TerminalPause {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), EnterAlternateScreen);
        let _ = enable_raw_mode();
    }
}
