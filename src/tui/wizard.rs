use indexmap::IndexMap;

use crate::model::{ItemKind, Template, PRIORITY_DEFAULT};
use crate::template::render;
use crate::tui::msg::{Cmd, NewTemplateLink, NewWorktree};

pub const STEP_KIND: u8 = 1;
pub const STEP_PRIORITY: u8 = 2;
pub const STEP_RELATIONS: u8 = 3;
pub const STEP_WORKTREE: u8 = 4;
pub const STEP_METHOD: u8 = 5;
pub const STEP_CONTENT: u8 = 6;
pub const STEP_DESCRIPTION: u8 = 7;
pub const STEP_CONFIRM: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMethod {
    AdHoc,
    Template,
}

/// Accumulates item fields across the eight creation steps. Nothing touches
/// the store until the confirmation step submits.
#[derive(Debug, Clone)]
pub struct WizardState {
    pub step: u8,
    pub kind: ItemKind,
    pub priority: u8,
    pub use_custom_project: bool,
    pub project: String,
    pub current_project: String,
    pub parent: String,
    pub depends_on: String,
    pub blocks: String,
    pub branch: String,
    pub base: String,
    pub method: WizardMethod,
    pub method_cursor: usize,
    pub template: Option<Template>,
    pub variables: IndexMap<String, String>,
    pub var_cursor: usize,
    pub title: String,
    pub labels: String,
    pub description: String,
    pub focus: usize,
    pub error: Option<String>,
}

impl WizardState {
    pub fn new(current_project: String) -> Self {
        WizardState {
            step: STEP_KIND,
            kind: ItemKind::Task,
            priority: PRIORITY_DEFAULT,
            use_custom_project: false,
            project: String::new(),
            current_project,
            parent: String::new(),
            depends_on: String::new(),
            blocks: String::new(),
            branch: String::new(),
            base: String::new(),
            method: WizardMethod::AdHoc,
            method_cursor: 0,
            template: None,
            variables: IndexMap::new(),
            var_cursor: 0,
            title: String::new(),
            labels: String::new(),
            description: String::new(),
            focus: 0,
            error: None,
        }
    }

    /// Advance one step, honoring the epic-only worktree step and the
    /// per-step gates. Returns false when a gate blocked the advance.
    pub fn next(&mut self) -> bool {
        if self.step == STEP_CONTENT
            && self.method == WizardMethod::AdHoc
            && self.title.trim().is_empty()
        {
            self.error = Some("a title is required".to_string());
            return false;
        }
        if self.step == STEP_DESCRIPTION && !description_accepted(&self.description) {
            self.error =
                Some("description needs at least 3 words or 20 characters".to_string());
            return false;
        }
        self.error = None;
        self.focus = 0;
        self.step = match self.step {
            STEP_RELATIONS if self.kind != ItemKind::Epic => STEP_METHOD,
            STEP_CONFIRM => STEP_CONFIRM,
            s => s + 1,
        };
        if self.step == STEP_DESCRIPTION
            && self.method == WizardMethod::Template
            && self.description.is_empty()
        {
            if let Some(template) = &self.template {
                self.description = render(&template.body, &self.variables);
            }
        }
        true
    }

    /// Step back, skipping the worktree step for tasks so that forward and
    /// backward traversal visit the same steps.
    pub fn back(&mut self) {
        self.error = None;
        self.focus = 0;
        self.step = match self.step {
            STEP_METHOD if self.kind != ItemKind::Epic => STEP_RELATIONS,
            STEP_KIND => STEP_KIND,
            s => s - 1,
        };
    }

    pub fn choose_ad_hoc(&mut self) {
        self.method = WizardMethod::AdHoc;
        self.template = None;
        self.variables.clear();
        self.var_cursor = 0;
    }

    pub fn choose_template(&mut self, template: Template) {
        self.method = WizardMethod::Template;
        self.variables = template
            .variables
            .iter()
            .map(|v| (v.name.clone(), v.default.clone()))
            .collect();
        self.var_cursor = 0;
        self.template = Some(template);
    }

    pub fn effective_project(&self) -> &str {
        let custom = self.project.trim();
        if self.use_custom_project && !custom.is_empty() {
            custom
        } else {
            &self.current_project
        }
    }

    /// The create command plus the follow-ups to run once the new id is
    /// known. Only called from the confirmation step.
    pub fn submission(&self) -> Submission {
        let title = match (&self.method, &self.template) {
            (WizardMethod::Template, Some(template)) => template.name.clone(),
            _ => self.title.trim().to_string(),
        };
        let template = self.template.as_ref().map(|t| NewTemplateLink {
            template_id: t.id.clone(),
            variables: self.variables.clone(),
        });
        let worktree = (self.kind == ItemKind::Epic && !self.branch.trim().is_empty())
            .then(|| NewWorktree {
                branch: self.branch.trim().to_string(),
                base: self.base.trim().to_string(),
            });
        let create = Cmd::CreateItem {
            kind: self.kind,
            title,
            project: self.effective_project().to_string(),
            priority: self.priority,
            description: self.description.clone(),
            template,
            worktree,
        };
        let parent = self.parent.trim();
        Submission {
            create,
            follow_ups: FollowUps {
                parent: (!parent.is_empty()).then(|| parent.to_string()),
                depends_on: parse_id_list(&self.depends_on),
                blocks: parse_id_list(&self.blocks),
                labels: parse_label_list(&self.labels),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub create: Cmd,
    pub follow_ups: FollowUps,
}

/// Commands that need the created item's id, issued in order once the
/// create completes. Failures later in the chain are reported but nothing
/// is rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowUps {
    pub parent: Option<String>,
    pub depends_on: Vec<String>,
    pub blocks: Vec<String>,
    pub labels: Vec<String>,
}

impl FollowUps {
    pub fn is_empty(&self) -> bool {
        self.parent.is_none()
            && self.depends_on.is_empty()
            && self.blocks.is_empty()
            && self.labels.is_empty()
    }

    pub fn into_cmds(self, id: &str) -> Vec<Cmd> {
        let mut cmds = Vec::new();
        if let Some(parent) = self.parent {
            cmds.push(Cmd::SetParent {
                id: id.to_string(),
                parent: Some(parent),
            });
        }
        for blocker in self.depends_on {
            cmds.push(Cmd::AddDependency {
                blocker,
                blocked: id.to_string(),
            });
        }
        for blocked in self.blocks {
            cmds.push(Cmd::AddDependency {
                blocker: id.to_string(),
                blocked,
            });
        }
        for name in self.labels {
            cmds.push(Cmd::AddLabel {
                id: id.to_string(),
                name,
            });
        }
        cmds
    }
}

/// A description passes once it has three whitespace-separated words or
/// twenty characters.
pub fn description_accepted(text: &str) -> bool {
    text.split_whitespace().count() >= 3 || text.trim().chars().count() >= 20
}

fn parse_id_list(buf: &str) -> Vec<String> {
    buf.split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_label_list(buf: &str) -> Vec<String> {
    buf.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TemplateVariable;

    fn wizard() -> WizardState {
        WizardState::new("demo".to_string())
    }

    fn advance_to(w: &mut WizardState, step: u8) {
        while w.step < step {
            // Satisfy gates along the way.
            if w.step == STEP_CONTENT {
                w.title = "placeholder".to_string();
            }
            if w.step == STEP_DESCRIPTION {
                w.description = "one two three".to_string();
            }
            assert!(w.next());
        }
    }

    #[test]
    fn task_skips_worktree_step_both_directions() {
        let mut w = wizard();
        advance_to(&mut w, STEP_RELATIONS);
        assert!(w.next());
        assert_eq!(w.step, STEP_METHOD);
        w.back();
        assert_eq!(w.step, STEP_RELATIONS);
    }

    #[test]
    fn epic_visits_worktree_step_both_directions() {
        let mut w = wizard();
        w.kind = ItemKind::Epic;
        advance_to(&mut w, STEP_RELATIONS);
        assert!(w.next());
        assert_eq!(w.step, STEP_WORKTREE);
        assert!(w.next());
        assert_eq!(w.step, STEP_METHOD);
        w.back();
        assert_eq!(w.step, STEP_WORKTREE);
        w.back();
        assert_eq!(w.step, STEP_RELATIONS);
    }

    #[test]
    fn step_bounds_hold() {
        let mut w = wizard();
        w.back();
        assert_eq!(w.step, STEP_KIND);
        advance_to(&mut w, STEP_CONFIRM);
        assert!(w.next());
        assert_eq!(w.step, STEP_CONFIRM);
    }

    #[test]
    fn short_description_blocks_advance_with_inline_error() {
        let mut w = wizard();
        advance_to(&mut w, STEP_DESCRIPTION);
        w.description = "too short".to_string();
        assert!(!w.next());
        assert_eq!(w.step, STEP_DESCRIPTION);
        assert!(w.error.is_some());

        w.description = "fix the login flow".to_string();
        assert!(w.next());
        assert_eq!(w.step, STEP_CONFIRM);
        assert!(w.error.is_none());
    }

    #[test]
    fn description_gate_accepts_words_or_length() {
        assert!(description_accepted("one two three"));
        assert!(description_accepted("a-single-very-long-token"));
        assert!(!description_accepted("two words"));
        assert!(!description_accepted("   "));
    }

    #[test]
    fn empty_title_blocks_ad_hoc_content_step() {
        let mut w = wizard();
        advance_to(&mut w, STEP_CONTENT);
        w.title = "   ".to_string();
        assert!(!w.next());
        assert_eq!(w.step, STEP_CONTENT);
        assert!(w.error.is_some());
    }

    #[test]
    fn template_selection_seeds_variables_and_prefills_description() {
        let template = Template {
            id: "bugfix".to_string(),
            name: "Bug fix".to_string(),
            description: String::new(),
            body: "Problem: {{.problem}}".to_string(),
            variables: vec![TemplateVariable {
                name: "problem".to_string(),
                prompt: String::new(),
                default: "unknown".to_string(),
            }],
        };
        let mut w = wizard();
        advance_to(&mut w, STEP_METHOD);
        w.choose_template(template);
        assert_eq!(w.variables.get("problem").map(String::as_str), Some("unknown"));

        assert!(w.next());
        w.variables
            .insert("problem".to_string(), "login 500s".to_string());
        assert!(w.next());
        assert_eq!(w.step, STEP_DESCRIPTION);
        assert_eq!(w.description, "Problem: login 500s");
    }

    #[test]
    fn submission_orders_follow_up_commands() {
        let mut w = wizard();
        w.kind = ItemKind::Epic;
        w.title = "Payments rework".to_string();
        w.parent = " ep-1 ".to_string();
        w.depends_on = "ts-2, ts-3".to_string();
        w.blocks = "ts-9".to_string();
        w.labels = "backend, infra".to_string();
        w.branch = "payments".to_string();

        let submission = w.submission();
        match &submission.create {
            Cmd::CreateItem {
                kind,
                title,
                project,
                worktree,
                ..
            } => {
                assert_eq!(*kind, ItemKind::Epic);
                assert_eq!(title, "Payments rework");
                assert_eq!(project, "demo");
                assert!(worktree.is_some());
            }
            other => panic!("expected CreateItem, got {other:?}"),
        }

        let cmds = submission.follow_ups.into_cmds("ep-7");
        assert_eq!(cmds.len(), 6);
        assert!(matches!(&cmds[0], Cmd::SetParent { id, parent: Some(p) }
            if id == "ep-7" && p == "ep-1"));
        assert!(matches!(&cmds[1], Cmd::AddDependency { blocker, blocked }
            if blocker == "ts-2" && blocked == "ep-7"));
        assert!(matches!(&cmds[2], Cmd::AddDependency { blocker, blocked }
            if blocker == "ts-3" && blocked == "ep-7"));
        assert!(matches!(&cmds[3], Cmd::AddDependency { blocker, blocked }
            if blocker == "ep-7" && blocked == "ts-9"));
        assert!(matches!(&cmds[4], Cmd::AddLabel { id, name }
            if id == "ep-7" && name == "backend"));
        assert!(matches!(&cmds[5], Cmd::AddLabel { id, name }
            if id == "ep-7" && name == "infra"));
    }

    #[test]
    fn custom_project_only_applies_when_set() {
        let mut w = wizard();
        assert_eq!(w.effective_project(), "demo");
        w.use_custom_project = true;
        assert_eq!(w.effective_project(), "demo");
        w.project = "web".to_string();
        assert_eq!(w.effective_project(), "web");
    }
}
