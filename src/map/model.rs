use serde::Deserialize;

/// The conventional traversal root. Every map is expected to contain a
/// topic with this id and no parent.
pub const ROOT_ID: &str = "root";

/// A single topic in the knowledge map.
///
/// Topics are immutable for a session. `parent` defines a strict tree
/// (ancestor paths, siblings); `deps` defines the prerequisite DAG from
/// which "unlocks" edges are derived. `pos` comes from an external
/// layout pass and is treated as given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topic {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Single tree parent. Root topics have none.
    #[serde(default)]
    pub parent: Option<String>,
    /// Ids this topic depends on, in authored order.
    #[serde(default)]
    pub deps: Vec<String>,
    /// World coordinates from the layout pass.
    pub pos: (f32, f32),
    #[serde(default)]
    pub summary: String,
}

impl Topic {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: None,
            parent: None,
            deps: Vec::new(),
            pos: (0.0, 0.0),
            summary: String::new(),
        }
    }
}

/// The full map: an ordered collection of topics.
///
/// Order is preserved exactly as authored in `map.json`; the children
/// index inherits it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TopicMap {
    pub topics: Vec<Topic>,
}

impl TopicMap {
    /// Find a topic by id, returning a reference.
    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Check whether an id is present in the map.
    pub fn contains(&self, id: &str) -> bool {
        self.topics.iter().any(|t| t.id == id)
    }

    /// All topic ids in map order.
    pub fn ids(&self) -> Vec<String> {
        self.topics.iter().map(|t| t.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_contains_find_topics_by_id() {
        let mut map = TopicMap::default();
        map.topics.push(Topic::new("root", "Root"));
        map.topics.push(Topic::new("hashing", "Hashing"));

        assert!(map.contains("hashing"));
        assert_eq!(map.get("hashing").unwrap().label, "Hashing");
        assert!(map.get("missing").is_none());
    }

    #[test]
    fn ids_preserve_authored_order() {
        let mut map = TopicMap::default();
        map.topics.push(Topic::new("root", "Root"));
        map.topics.push(Topic::new("b", "B"));
        map.topics.push(Topic::new("a", "A"));
        assert_eq!(map.ids(), vec!["root", "b", "a"]);
    }
}
