use serde::{Deserialize, Serialize};

/// A reusable item template from .trellis/templates/<id>.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// File stem; stable identifier.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Body text with {{.var}} placeholders, rendered into the item
    /// description at creation time.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    /// Shown when prompting for a value in the wizard.
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub default: String,
}

impl Template {
    /// Declared variable names, in declaration order.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }
}
