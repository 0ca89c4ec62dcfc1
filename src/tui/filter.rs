use crate::model::{cmp_ids, Item, Status};

/// Which items the List view shows. All criteria AND together; the text
/// criteria are case-insensitive substring matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Indexed by `Status::index()`.
    pub status_visible: [bool; 5],
    pub project: String,
    pub search: String,
    pub label: String,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            // open, in_progress, blocked on; done, canceled off
            status_visible: [true, true, true, false, false],
            project: String::new(),
            search: String::new(),
            label: String::new(),
        }
    }
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    pub fn toggle_status(&mut self, status: Status) {
        self.status_visible[status.index()] ^= true;
    }

    pub fn matches(&self, item: &Item) -> bool {
        if !self.status_visible[item.status.index()] {
            return false;
        }
        if !self.project.is_empty()
            && !contains_ci(&item.project, &self.project)
        {
            return false;
        }
        if !self.search.is_empty()
            && !contains_ci(&item.title, &self.search)
            && !contains_ci(&item.id, &self.search)
            && !contains_ci(&item.description, &self.search)
        {
            return false;
        }
        if !self.label.is_empty()
            && !item.labels.iter().any(|l| contains_ci(l, &self.label))
        {
            return false;
        }
        true
    }

    /// Short description for the title bar, empty when nothing is active.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.project.is_empty() {
            parts.push(format!("project:{}", self.project));
        }
        if !self.search.is_empty() {
            parts.push(format!("/{}", self.search));
        }
        if !self.label.is_empty() {
            parts.push(format!("label:{}", self.label));
        }
        let default_visible = FilterState::default().status_visible;
        if self.status_visible != default_visible {
            let shown: Vec<&str> = Status::ALL
                .iter()
                .filter(|s| self.status_visible[s.index()])
                .map(|s| s.name())
                .collect();
            parts.push(format!("[{}]", shown.join(" ")));
        }
        parts.join("  ")
    }
}

/// Filtered view of the snapshot, sorted priority ascending then id
/// ascending (numeric within a prefix).
pub fn filter_items<'a>(items: &'a [Item], filter: &FilterState) -> Vec<&'a Item> {
    let mut out: Vec<&Item> = items.iter().filter(|i| filter.matches(i)).collect();
    out.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| cmp_ids(&a.id, &b.id))
    });
    out
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
