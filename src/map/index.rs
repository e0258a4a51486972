//! Adjacency structures derived once per map load.
//!
//! Two independent relations over the same id space: a single-parent
//! tree (from each topic's `parent`) and a prerequisite DAG (a topic is
//! a "child" of everything in its `deps` list). They are built once and
//! never entangled.

use std::collections::{HashMap, HashSet};

use crate::map::model::Topic;

/// Read-only lookup structures for both relations.
#[derive(Debug, Default)]
pub struct MapIndex {
    child_to_parent: HashMap<String, String>,
    parent_to_children: HashMap<String, Vec<String>>,
}

impl MapIndex {
    /// Build both indexes. Children buckets follow input topic order;
    /// duplicate insertion into the same bucket is suppressed.
    pub fn build(topics: &[Topic]) -> Self {
        let mut child_to_parent = HashMap::new();
        let mut parent_to_children: HashMap<String, Vec<String>> = HashMap::new();

        for topic in topics {
            if let Some(parent) = &topic.parent {
                child_to_parent.insert(topic.id.clone(), parent.clone());
            }
            for dep in &topic.deps {
                let bucket = parent_to_children.entry(dep.clone()).or_default();
                if !bucket.contains(&topic.id) {
                    bucket.push(topic.id.clone());
                }
            }
        }

        Self {
            child_to_parent,
            parent_to_children,
        }
    }

    /// Tree parent of `id`, if any. Unknown ids have no parent.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.child_to_parent.get(id).map(String::as_str)
    }

    /// Topics that list `id` as a prerequisite, in map order.
    pub fn children_of(&self, id: &str) -> &[String] {
        self.parent_to_children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_children(&self, id: &str) -> bool {
        !self.children_of(id).is_empty()
    }

    /// Children of `id`'s parent, excluding `id` itself. Empty when
    /// `id` has no parent.
    pub fn siblings_of(&self, id: &str) -> Vec<&str> {
        match self.parent_of(id) {
            Some(parent) => self
                .children_of(parent)
                .iter()
                .map(String::as_str)
                .filter(|sib| *sib != id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Count of all topics transitively unlocked by `id`.
    ///
    /// The dependency relation is expected to be acyclic; the visited
    /// set turns malformed cyclic input into a bounded traversal
    /// instead of infinite recursion.
    pub fn descendant_count(&self, id: &str) -> usize {
        let mut visited = HashSet::new();
        self.count_below(id, &mut visited);
        visited.len()
    }

    fn count_below<'a>(&'a self, id: &'a str, visited: &mut HashSet<&'a str>) {
        for child in self.children_of(id) {
            if visited.insert(child.as_str()) {
                self.count_below(child, visited);
            }
        }
    }

    /// Ancestor chain of `id` via tree parents, nearest first, root
    /// last. Guarded against parent cycles: traversal truncates at the
    /// first revisited id.
    pub fn ancestors_of(&self, id: &str) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::from([id]);
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str, parent: Option<&str>, deps: &[&str]) -> Topic {
        let mut t = Topic::new(id, id);
        t.parent = parent.map(str::to_string);
        t.deps = deps.iter().map(|d| d.to_string()).collect();
        t
    }

    fn chain_index() -> MapIndex {
        // root <- a <- b (a depends on root, b depends on a)
        MapIndex::build(&[
            topic("root", None, &[]),
            topic("a", Some("root"), &["root"]),
            topic("b", Some("a"), &["a"]),
        ])
    }

    #[test]
    fn parent_and_children_follow_both_relations() {
        let index = chain_index();
        assert_eq!(index.parent_of("a"), Some("root"));
        assert_eq!(index.parent_of("root"), None);
        assert_eq!(index.children_of("root"), ["a".to_string()]);
        assert_eq!(index.children_of("a"), ["b".to_string()]);
        assert!(index.children_of("b").is_empty());
        assert!(index.has_children("a"));
        assert!(!index.has_children("b"));
    }

    #[test]
    fn unknown_ids_degrade_to_empty() {
        let index = chain_index();
        assert_eq!(index.parent_of("ghost"), None);
        assert!(index.children_of("ghost").is_empty());
        assert!(index.siblings_of("ghost").is_empty());
        assert_eq!(index.descendant_count("ghost"), 0);
    }

    #[test]
    fn children_preserve_input_order_and_dedup() {
        let mut dup = topic("x", Some("root"), &["root"]);
        dup.deps.push("root".to_string());
        let index = MapIndex::build(&[
            topic("root", None, &[]),
            topic("z", Some("root"), &["root"]),
            dup,
        ]);
        assert_eq!(index.children_of("root"), ["z".to_string(), "x".to_string()]);
    }

    #[test]
    fn siblings_exclude_self_and_need_a_parent() {
        let index = MapIndex::build(&[
            topic("root", None, &[]),
            topic("a", Some("root"), &["root"]),
            topic("b", Some("root"), &["root"]),
            topic("c", Some("root"), &["root"]),
        ]);
        assert_eq!(index.siblings_of("b"), ["a", "c"]);
        assert!(index.siblings_of("root").is_empty());
    }

    #[test]
    fn descendant_count_is_transitive() {
        let index = chain_index();
        assert_eq!(index.descendant_count("root"), 2);
        assert_eq!(index.descendant_count("a"), 1);
        assert_eq!(index.descendant_count("b"), 0);
    }

    #[test]
    fn descendant_count_terminates_on_cyclic_deps() {
        let index = MapIndex::build(&[
            topic("a", None, &["b"]),
            topic("b", None, &["a"]),
        ]);
        // a unlocks b, b unlocks a; each counts the other once.
        assert_eq!(index.descendant_count("a"), 2);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let index = chain_index();
        assert_eq!(index.ancestors_of("b"), ["a", "root"]);
        assert!(index.ancestors_of("root").is_empty());
    }

    #[test]
    fn ancestors_truncate_on_parent_cycle() {
        let index = MapIndex::build(&[
            topic("a", Some("b"), &[]),
            topic("b", Some("a"), &[]),
        ]);
        assert_eq!(index.ancestors_of("a"), ["b"]);
    }
}
