use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from .trellis/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub stale: StaleConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project assigned to new items when none is given.
    #[serde(default)]
    pub default: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Name recorded as the actor on log entries written by this process.
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            actor: default_actor(),
        }
    }
}

fn default_actor() -> String {
    "local".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    /// External editor command. Falls back to $VISUAL, then $EDITOR, then vi.
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleConfig {
    /// Hours without an update before an in-progress item counts as stale.
    #[serde(default = "default_stale_hours")]
    pub after_hours: u64,
}

impl Default for StaleConfig {
    fn default() -> Self {
        StaleConfig {
            after_hours: default_stale_hours(),
        }
    }
}

fn default_stale_hours() -> u64 {
    24
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Hex overrides keyed by status name or ui element (e.g. open = "#87d787").
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

/// Identity attached to mutating store calls and recorded in log entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentContext {
    pub actor: String,
}

impl Config {
    pub fn agent_context(&self) -> AgentContext {
        AgentContext {
            actor: self.agent.actor.clone(),
        }
    }
}
