//! Focus-scoped visibility: which topics are on screen for a given
//! focus, depth budget, and show-all flag.
//!
//! Pure with respect to its inputs and the immutable [`MapIndex`], so
//! it is safe to recompute on every state change; [`VisibilityCache`]
//! memoizes the last result keyed on the inputs.

use std::collections::HashSet;

use crate::map::index::MapIndex;

/// The resolver's output: visible topic ids plus the subset whose
/// children exist but are hidden (collapsed subtrees the UI should
/// mark with an affordance).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visibility {
    pub visible: HashSet<String>,
    pub expandable: HashSet<String>,
}

impl Visibility {
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn is_expandable(&self, id: &str) -> bool {
        self.expandable.contains(id)
    }
}

/// Compute the visible and expandable sets.
///
/// Guarantees: the focused topic is always visible; its full ancestor
/// chain is visible regardless of `depth`; siblings are visible but
/// not expanded; descendants are expanded at most `depth` hops down,
/// with boundary topics that still have children flagged expandable.
pub fn resolve(
    index: &MapIndex,
    all_ids: &[String],
    focus: Option<&str>,
    depth: u8,
    show_all: bool,
) -> Visibility {
    let focus = match (show_all, focus) {
        (true, _) | (false, None) => {
            return Visibility {
                visible: all_ids.iter().cloned().collect(),
                expandable: HashSet::new(),
            };
        }
        (false, Some(id)) => id,
    };

    let mut out = Visibility::default();
    out.visible.insert(focus.to_string());

    // Ancestor chain to root, independent of the depth budget, so the
    // breadcrumb path is never truncated.
    for ancestor in index.ancestors_of(focus) {
        out.visible.insert(ancestor.to_string());
    }

    // Siblings are shown but their subtrees stay collapsed.
    for sibling in index.siblings_of(focus) {
        out.visible.insert(sibling.to_string());
        if index.has_children(sibling) {
            out.expandable.insert(sibling.to_string());
        }
    }

    let mut visited = HashSet::new();
    expand(index, focus, 1, depth, &mut out, &mut visited);
    out
}

fn expand(
    index: &MapIndex,
    id: &str,
    current_depth: u8,
    max_depth: u8,
    out: &mut Visibility,
    visited: &mut HashSet<String>,
) {
    if !visited.insert(id.to_string()) {
        return;
    }
    for child in index.children_of(id) {
        out.visible.insert(child.clone());
        if current_depth >= max_depth {
            if index.has_children(child) {
                out.expandable.insert(child.clone());
            }
        } else {
            expand(index, child, current_depth + 1, max_depth, out, visited);
        }
    }
}

/// Memoizes the last [`resolve`] result; the canvas consults this every
/// frame and inputs change only on discrete navigation events.
#[derive(Debug, Default)]
pub struct VisibilityCache {
    key: Option<(Option<String>, u8, bool)>,
    value: Visibility,
}

impl VisibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        index: &MapIndex,
        all_ids: &[String],
        focus: Option<&str>,
        depth: u8,
        show_all: bool,
    ) -> &Visibility {
        let key = (focus.map(str::to_string), depth, show_all);
        if self.key.as_ref() != Some(&key) {
            self.value = resolve(index, all_ids, focus, depth, show_all);
            self.key = Some(key);
        }
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::model::Topic;

    fn topic(id: &str, parent: Option<&str>, deps: &[&str]) -> Topic {
        let mut t = Topic::new(id, id);
        t.parent = parent.map(str::to_string);
        t.deps = deps.iter().map(|d| d.to_string()).collect();
        t
    }

    fn chain() -> (MapIndex, Vec<String>) {
        let topics = vec![
            topic("root", None, &[]),
            topic("a", Some("root"), &["root"]),
            topic("b", Some("a"), &["a"]),
        ];
        let ids = topics.iter().map(|t| t.id.clone()).collect();
        (MapIndex::build(&topics), ids)
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn depth_one_hides_grandchildren_and_flags_boundary() {
        let (index, ids) = chain();
        let vis = resolve(&index, &ids, Some("root"), 1, false);
        assert_eq!(vis.visible, set(&["root", "a"]));
        assert_eq!(vis.expandable, set(&["a"]));
    }

    #[test]
    fn depth_two_expands_the_full_chain() {
        let (index, ids) = chain();
        let vis = resolve(&index, &ids, Some("root"), 2, false);
        assert_eq!(vis.visible, set(&["root", "a", "b"]));
        assert!(vis.expandable.is_empty());
    }

    #[test]
    fn show_all_returns_every_id_even_without_focus() {
        let (index, ids) = chain();
        let vis = resolve(&index, &ids, None, 1, true);
        assert_eq!(vis.visible, ids.iter().cloned().collect());
        assert!(vis.expandable.is_empty());

        let vis = resolve(&index, &ids, Some("b"), 1, true);
        assert_eq!(vis.visible.len(), ids.len());
    }

    #[test]
    fn no_focus_behaves_like_show_all() {
        let (index, ids) = chain();
        let vis = resolve(&index, &ids, None, 1, false);
        assert_eq!(vis.visible.len(), ids.len());
        assert!(vis.expandable.is_empty());
    }

    #[test]
    fn focus_is_always_visible_with_full_ancestor_chain() {
        let (index, ids) = chain();
        let vis = resolve(&index, &ids, Some("b"), 1, false);
        assert!(vis.is_visible("b"), "focused topic must be visible");
        assert!(vis.is_visible("a"), "every ancestor must be visible");
        assert!(vis.is_visible("root"), "chain must reach the root");
    }

    #[test]
    fn siblings_are_shown_collapsed() {
        let topics = vec![
            topic("root", None, &[]),
            topic("a", Some("root"), &["root"]),
            topic("b", Some("root"), &["root"]),
            topic("b1", Some("b"), &["b"]),
        ];
        let ids: Vec<String> = topics.iter().map(|t| t.id.clone()).collect();
        let index = MapIndex::build(&topics);

        let vis = resolve(&index, &ids, Some("a"), 1, false);
        assert!(vis.is_visible("b"), "sibling must be visible");
        assert!(!vis.is_visible("b1"), "sibling subtree stays collapsed");
        assert!(vis.is_expandable("b"), "collapsed sibling subtree is flagged");
    }

    #[test]
    fn depth_boundedness_below_focus() {
        let topics = vec![
            topic("root", None, &[]),
            topic("a", Some("root"), &["root"]),
            topic("b", Some("a"), &["a"]),
            topic("c", Some("b"), &["b"]),
        ];
        let ids: Vec<String> = topics.iter().map(|t| t.id.clone()).collect();
        let index = MapIndex::build(&topics);

        let vis = resolve(&index, &ids, Some("root"), 2, false);
        assert!(vis.is_visible("b"));
        assert!(!vis.is_visible("c"), "three hops down exceeds depth 2");
        assert!(vis.is_expandable("b"));
    }

    #[test]
    fn oversized_depth_expands_until_no_children_remain() {
        let (index, ids) = chain();
        let vis = resolve(&index, &ids, Some("root"), 10, false);
        assert_eq!(vis.visible.len(), ids.len());
        assert!(vis.expandable.is_empty());
    }

    #[test]
    fn expansion_terminates_on_cyclic_deps() {
        let topics = vec![topic("a", None, &["b"]), topic("b", None, &["a"])];
        let ids: Vec<String> = topics.iter().map(|t| t.id.clone()).collect();
        let index = MapIndex::build(&topics);
        let vis = resolve(&index, &ids, Some("a"), 3, false);
        assert!(vis.is_visible("a"));
        assert!(vis.is_visible("b"));
    }

    #[test]
    fn cache_reuses_result_until_inputs_change() {
        let (index, ids) = chain();
        let mut cache = VisibilityCache::new();

        let first = cache.resolve(&index, &ids, Some("root"), 1, false).clone();
        let second = cache.resolve(&index, &ids, Some("root"), 1, false).clone();
        assert_eq!(first, second);

        let deeper = cache.resolve(&index, &ids, Some("root"), 2, false);
        assert!(deeper.is_visible("b"), "cache must refresh on a new key");
    }
}
