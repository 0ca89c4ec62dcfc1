use std::collections::{HashMap, HashSet};

use crate::model::Item;

/// One visible row of the List view tree. Derived on every rebuild, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    pub item: &'a Item,
    pub level: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    /// For each ancestor, whether it was the last among its siblings.
    /// Drives the connector glyphs when rendering.
    pub ancestor_last: Vec<bool>,
}

struct TreeIndex<'a> {
    roots: Vec<&'a Item>,
    children: HashMap<&'a str, Vec<&'a Item>>,
}

impl<'a> TreeIndex<'a> {
    fn new(filtered: &[&'a Item]) -> Self {
        let ids: HashSet<&str> = filtered.iter().map(|i| i.id.as_str()).collect();
        let mut roots = Vec::new();
        let mut children: HashMap<&str, Vec<&Item>> = HashMap::new();
        for item in filtered {
            match item.parent.as_deref().filter(|p| ids.contains(p)) {
                // A parent outside the visible set promotes the item to a root.
                None => roots.push(*item),
                Some(parent) => children.entry(parent).or_default().push(*item),
            }
        }
        TreeIndex { roots, children }
    }

    fn children_of(&self, id: &str) -> &[&'a Item] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Flattens the filtered items into visible rows: roots in filtered order,
/// children depth-first beneath each expanded node.
pub fn build_rows<'a>(
    filtered: &[&'a Item],
    expanded: &HashSet<String>,
) -> Vec<TreeRow<'a>> {
    let index = TreeIndex::new(filtered);
    let mut rows = Vec::with_capacity(filtered.len());
    let mut visited: HashSet<&str> = HashSet::new();
    let root_count = index.roots.len();
    for (i, root) in index.roots.iter().enumerate() {
        push_subtree(
            &index,
            expanded,
            root,
            0,
            i + 1 == root_count,
            &[],
            &mut visited,
            &mut rows,
        );
    }
    rows
}

#[allow(clippy::too_many_arguments)]
fn push_subtree<'a>(
    index: &TreeIndex<'a>,
    expanded: &HashSet<String>,
    item: &'a Item,
    level: usize,
    is_last: bool,
    ancestor_last: &[bool],
    visited: &mut HashSet<&'a str>,
    rows: &mut Vec<TreeRow<'a>>,
) {
    // Parent chains are validated on write, but the data file can be edited
    // by hand; never emit the same node twice.
    if !visited.insert(item.id.as_str()) {
        return;
    }
    let children = index.children_of(&item.id);
    let has_children = !children.is_empty();
    let is_expanded = has_children && expanded.contains(&item.id);
    rows.push(TreeRow {
        item,
        level,
        has_children,
        is_expanded,
        is_last_sibling: is_last,
        ancestor_last: ancestor_last.to_vec(),
    });
    if is_expanded {
        let mut child_prefix = ancestor_last.to_vec();
        child_prefix.push(is_last);
        let count = children.len();
        for (i, child) in children.iter().enumerate() {
            push_subtree(
                index,
                expanded,
                child,
                level + 1,
                i + 1 == count,
                &child_prefix,
                visited,
                rows,
            );
        }
    }
}

/// Explicit-stack equivalent of [`build_rows`], safe for pathologically deep
/// hierarchies. Produces identical output.
pub fn build_rows_iterative<'a>(
    filtered: &[&'a Item],
    expanded: &HashSet<String>,
) -> Vec<TreeRow<'a>> {
    struct Frame<'a> {
        item: &'a Item,
        level: usize,
        is_last: bool,
        ancestor_last: Vec<bool>,
    }

    let index = TreeIndex::new(filtered);
    let mut rows = Vec::with_capacity(filtered.len());
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    let root_count = index.roots.len();
    for (i, root) in index.roots.iter().enumerate().rev() {
        stack.push(Frame {
            item: root,
            level: 0,
            is_last: i + 1 == root_count,
            ancestor_last: Vec::new(),
        });
    }

    while let Some(frame) = stack.pop() {
        if !visited.insert(frame.item.id.as_str()) {
            continue;
        }
        let children = index.children_of(&frame.item.id);
        let has_children = !children.is_empty();
        let is_expanded = has_children && expanded.contains(&frame.item.id);
        if is_expanded {
            let mut child_prefix = frame.ancestor_last.clone();
            child_prefix.push(frame.is_last);
            let count = children.len();
            for (i, child) in children.iter().enumerate().rev() {
                stack.push(Frame {
                    item: child,
                    level: frame.level + 1,
                    is_last: i + 1 == count,
                    ancestor_last: child_prefix.clone(),
                });
            }
        }
        rows.push(TreeRow {
            item: frame.item,
            level: frame.level,
            has_children,
            is_expanded,
            is_last_sibling: frame.is_last,
            ancestor_last: frame.ancestor_last,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, Status};
    use crate::tui::filter::{filter_items, FilterState};

    fn item(id: &str, parent: Option<&str>) -> Item {
        let mut item = Item::new(
            id.to_string(),
            "demo".to_string(),
            ItemKind::Task,
            format!("title {id}"),
        );
        item.parent = parent.map(str::to_string);
        item
    }

    fn ids<'a>(rows: &[TreeRow<'a>]) -> Vec<&'a str> {
        rows.iter().map(|r| r.item.id.as_str()).collect()
    }

    fn expanded(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn collapsed_root_hides_children() {
        let items = vec![
            item("ts-1", None),
            item("ts-2", Some("ts-1")),
            item("ts-3", Some("ts-1")),
        ];
        let filtered: Vec<&Item> = items.iter().collect();
        let rows = build_rows(&filtered, &HashSet::new());
        assert_eq!(ids(&rows), ["ts-1"]);
        assert!(rows[0].has_children);
        assert!(!rows[0].is_expanded);
    }

    #[test]
    fn expanding_shows_children_in_order_at_level_one() {
        let items = vec![
            item("ts-1", None),
            item("ts-2", Some("ts-1")),
            item("ts-3", Some("ts-1")),
        ];
        let filtered: Vec<&Item> = items.iter().collect();
        let rows = build_rows(&filtered, &expanded(&["ts-1"]));
        assert_eq!(ids(&rows), ["ts-1", "ts-2", "ts-3"]);
        assert_eq!(rows[0].level, 0);
        assert_eq!(rows[1].level, 1);
        assert_eq!(rows[2].level, 1);
        assert!(!rows[1].is_last_sibling);
        assert!(rows[2].is_last_sibling);
        assert_eq!(rows[1].ancestor_last, [true]);
    }

    #[test]
    fn hidden_parent_promotes_child_to_root() {
        let mut done_parent = item("ts-1", None);
        done_parent.status = Status::Done;
        let items = vec![done_parent, item("ts-2", Some("ts-1")), item("ts-3", None)];

        // Default filter hides done, so ts-2's parent drops out of the set.
        let filtered = filter_items(&items, &FilterState::default());
        let rows = build_rows(&filtered, &HashSet::new());
        assert_eq!(ids(&rows), ["ts-2", "ts-3"]);
        assert_eq!(rows[0].level, 0);
    }

    #[test]
    fn level_is_always_parent_level_plus_one() {
        let items = vec![
            item("ts-1", None),
            item("ts-2", Some("ts-1")),
            item("ts-3", Some("ts-2")),
            item("ts-4", Some("ts-3")),
            item("ts-5", None),
        ];
        let filtered: Vec<&Item> = items.iter().collect();
        let rows = build_rows(&filtered, &expanded(&["ts-1", "ts-2", "ts-3"]));

        let level_of: HashMap<&str, usize> = rows
            .iter()
            .map(|r| (r.item.id.as_str(), r.level))
            .collect();
        for row in &rows {
            match row.item.parent.as_deref().and_then(|p| level_of.get(p)) {
                Some(parent_level) => assert_eq!(row.level, parent_level + 1),
                None => assert_eq!(row.level, 0),
            }
        }
        // Ancestors always precede descendants in emitted order.
        let pos: HashMap<&str, usize> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.item.id.as_str(), i))
            .collect();
        for row in &rows {
            if let Some(parent) = row.item.parent.as_deref() {
                assert!(pos[parent] < pos[row.item.id.as_str()]);
            }
        }
    }

    #[test]
    fn toggling_expansion_twice_restores_rows() {
        let items = vec![
            item("ts-1", None),
            item("ts-2", Some("ts-1")),
            item("ts-3", None),
        ];
        let filtered: Vec<&Item> = items.iter().collect();
        let mut set = expanded(&["ts-3"]);

        let before = build_rows(&filtered, &set);
        set.insert("ts-1".to_string());
        let during = build_rows(&filtered, &set);
        set.remove("ts-1");
        let after = build_rows(&filtered, &set);

        assert_ne!(ids(&before), ids(&during));
        assert_eq!(before, after);
    }

    #[test]
    fn cyclic_parent_chain_terminates() {
        // Cannot be produced through the store, but the file can be edited by
        // hand. A cycle has no root, so its members simply do not render.
        let items = vec![
            item("ts-1", Some("ts-2")),
            item("ts-2", Some("ts-1")),
            item("ts-3", None),
        ];
        let filtered: Vec<&Item> = items.iter().collect();
        let rows = build_rows(&filtered, &expanded(&["ts-1", "ts-2", "ts-3"]));
        assert_eq!(ids(&rows), ["ts-3"]);
    }

    #[test]
    fn iterative_variant_matches_recursive() {
        let items = vec![
            item("ts-1", None),
            item("ts-2", Some("ts-1")),
            item("ts-3", Some("ts-1")),
            item("ts-4", Some("ts-2")),
            item("ts-5", None),
            item("ts-6", Some("ts-5")),
        ];
        let filtered: Vec<&Item> = items.iter().collect();
        for set in [
            HashSet::new(),
            expanded(&["ts-1"]),
            expanded(&["ts-1", "ts-2", "ts-5"]),
        ] {
            assert_eq!(
                build_rows(&filtered, &set),
                build_rows_iterative(&filtered, &set),
            );
        }
    }

    #[test]
    fn iterative_variant_survives_deep_nesting() {
        let mut items = vec![item("ts-0", None)];
        for i in 1..10_000 {
            items.push(item(&format!("ts-{i}"), Some(&format!("ts-{}", i - 1))));
        }
        let filtered: Vec<&Item> = items.iter().collect();
        let all: HashSet<String> = items.iter().map(|i| i.id.clone()).collect();
        let rows = build_rows_iterative(&filtered, &all);
        assert_eq!(rows.len(), 10_000);
        assert_eq!(rows[9_999].level, 9_999);
    }
}
