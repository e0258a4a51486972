//! Loading and validating `map.json`.
//!
//! The map is machine-authored data (an external layout pass assigns
//! positions), so it is plain JSON rather than a hand-aligned text
//! format. Validation reports problems instead of panicking; the
//! viewer degrades gracefully around missing references, but cycles
//! deserve a loud report because they silently shrink traversals.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::map::model::{ROOT_ID, Topic, TopicMap};

#[derive(Debug, Deserialize)]
struct MapFile {
    topics: Vec<Topic>,
}

/// Parse a map from JSON text.
pub fn parse(text: &str) -> Result<TopicMap> {
    let file: MapFile = serde_json::from_str(text).context("malformed map.json")?;
    Ok(TopicMap { topics: file.topics })
}

/// Read and parse a map file.
pub fn load(path: &Path) -> Result<TopicMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse(&text)
}

/// Structural checks over a parsed map. Returns human-readable issue
/// lines; an empty vec means the map is clean.
pub fn validate(map: &TopicMap) -> Vec<String> {
    let mut issues = Vec::new();
    let ids: HashSet<&str> = map.topics.iter().map(|t| t.id.as_str()).collect();

    let mut seen = HashSet::new();
    for topic in &map.topics {
        if !seen.insert(topic.id.as_str()) {
            issues.push(format!("duplicate topic id: {}", topic.id));
        }
        if let Some(parent) = &topic.parent
            && !ids.contains(parent.as_str())
        {
            issues.push(format!("{}: unknown parent {}", topic.id, parent));
        }
        for dep in &topic.deps {
            if !ids.contains(dep.as_str()) {
                issues.push(format!("{}: unknown dependency {}", topic.id, dep));
            }
        }
    }

    if !ids.contains(ROOT_ID) {
        issues.push(format!("no `{ROOT_ID}` topic — keyboard navigation needs one"));
    }

    for id in parent_cycle_members(map) {
        issues.push(format!("{id}: parent chain forms a cycle"));
    }
    for id in dependency_cycle_members(map) {
        issues.push(format!("{id}: dependency cycle"));
    }

    issues
}

/// Ids whose parent chain never reaches a parentless topic.
fn parent_cycle_members(map: &TopicMap) -> Vec<String> {
    let parents: HashMap<&str, &str> = map
        .topics
        .iter()
        .filter_map(|t| t.parent.as_deref().map(|p| (t.id.as_str(), p)))
        .collect();

    let mut members = Vec::new();
    for topic in &map.topics {
        let mut seen = HashSet::from([topic.id.as_str()]);
        let mut current = topic.id.as_str();
        while let Some(parent) = parents.get(current) {
            if !seen.insert(parent) {
                members.push(topic.id.clone());
                break;
            }
            current = parent;
        }
    }
    members
}

/// Ids on a cycle in the dependency relation, found by iterative DFS
/// with an explicit on-stack set.
fn dependency_cycle_members(map: &TopicMap) -> Vec<String> {
    let deps: HashMap<&str, &[String]> = map
        .topics
        .iter()
        .map(|t| (t.id.as_str(), t.deps.as_slice()))
        .collect();

    let mut done: HashSet<&str> = HashSet::new();
    let mut members = Vec::new();

    for topic in &map.topics {
        if done.contains(topic.id.as_str()) {
            continue;
        }
        // (id, next dep index) frames; `on_stack` is the current path.
        let mut stack: Vec<(&str, usize)> = vec![(topic.id.as_str(), 0)];
        let mut on_stack: HashSet<&str> = HashSet::from([topic.id.as_str()]);
        while let Some((id, next)) = stack.pop() {
            let dep_list = deps.get(id).copied().unwrap_or(&[]);
            if next < dep_list.len() {
                stack.push((id, next + 1));
                let dep = dep_list[next].as_str();
                if on_stack.contains(dep) {
                    if !members.contains(&dep.to_string()) {
                        members.push(dep.to_string());
                    }
                } else if !done.contains(dep) && deps.contains_key(dep) {
                    on_stack.insert(dep);
                    stack.push((dep, 0));
                }
            } else {
                on_stack.remove(id);
                done.insert(id);
            }
        }
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"{
        "topics": [
            {"id": "root", "label": "Start here", "pos": [0, 0]},
            {"id": "hashing", "label": "Hashing", "parent": "root",
             "deps": ["root"], "pos": [120, 80], "summary": "One-way functions."}
        ]
    }"#;

    #[test]
    fn parse_reads_topics_in_order() {
        let map = parse(GOOD).unwrap();
        assert_eq!(map.ids(), vec!["root", "hashing"]);
        assert_eq!(map.get("hashing").unwrap().pos, (120.0, 80.0));
        assert_eq!(map.get("hashing").unwrap().deps, vec!["root"]);
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(parse("{not json").is_err());
    }

    #[test]
    fn validate_accepts_a_clean_map() {
        let map = parse(GOOD).unwrap();
        assert!(validate(&map).is_empty());
    }

    #[test]
    fn validate_reports_missing_references_and_root() {
        let map = parse(
            r#"{"topics": [
                {"id": "a", "label": "A", "parent": "ghost",
                 "deps": ["phantom"], "pos": [0, 0]}
            ]}"#,
        )
        .unwrap();
        let issues = validate(&map);
        assert!(issues.iter().any(|i| i.contains("unknown parent ghost")));
        assert!(issues.iter().any(|i| i.contains("unknown dependency phantom")));
        assert!(issues.iter().any(|i| i.contains("no `root` topic")));
    }

    #[test]
    fn validate_reports_duplicate_ids() {
        let map = parse(
            r#"{"topics": [
                {"id": "root", "label": "R", "pos": [0, 0]},
                {"id": "root", "label": "R again", "pos": [1, 1]}
            ]}"#,
        )
        .unwrap();
        assert!(
            validate(&map)
                .iter()
                .any(|i| i.contains("duplicate topic id: root"))
        );
    }

    #[test]
    fn validate_reports_parent_cycles() {
        let map = parse(
            r#"{"topics": [
                {"id": "root", "label": "R", "pos": [0, 0]},
                {"id": "a", "label": "A", "parent": "b", "pos": [0, 0]},
                {"id": "b", "label": "B", "parent": "a", "pos": [0, 0]}
            ]}"#,
        )
        .unwrap();
        let issues = validate(&map);
        assert!(issues.iter().any(|i| i.contains("parent chain forms a cycle")));
    }

    #[test]
    fn validate_reports_dependency_cycles() {
        let map = parse(
            r#"{"topics": [
                {"id": "root", "label": "R", "pos": [0, 0]},
                {"id": "a", "label": "A", "deps": ["b"], "pos": [0, 0]},
                {"id": "b", "label": "B", "deps": ["a"], "pos": [0, 0]}
            ]}"#,
        )
        .unwrap();
        let issues = validate(&map);
        assert!(
            issues.iter().any(|i| i.contains("dependency cycle")),
            "expected a dependency cycle report, got {issues:?}"
        );
    }

    #[test]
    fn validate_is_quiet_on_diamond_dependencies() {
        // A diamond is a DAG, not a cycle.
        let map = parse(
            r#"{"topics": [
                {"id": "root", "label": "R", "pos": [0, 0]},
                {"id": "l", "label": "L", "deps": ["root"], "pos": [0, 0]},
                {"id": "r", "label": "R2", "deps": ["root"], "pos": [0, 0]},
                {"id": "join", "label": "J", "deps": ["l", "r"], "pos": [0, 0]}
            ]}"#,
        )
        .unwrap();
        assert!(validate(&map).is_empty());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(&path, GOOD).unwrap();
        let map = load(&path).unwrap();
        assert_eq!(map.topics.len(), 2);
    }
}
