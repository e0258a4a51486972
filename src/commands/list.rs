//! `atlas list` — print topics in map order with their graph shape.

use anyhow::Result;

use crate::atlas_dir;
use crate::map::index::MapIndex;
use crate::map::load;
use crate::map::model::TopicMap;

pub fn run() -> Result<()> {
    let root = atlas_dir::find_root()?;
    let map = load::load(&atlas_dir::map_path(&root))?;

    for line in list_topics(&map) {
        println!("  {line}");
    }
    Ok(())
}

fn list_topics(map: &TopicMap) -> Vec<String> {
    let index = MapIndex::build(&map.topics);
    map.topics
        .iter()
        .map(|topic| {
            let parent = topic.parent.as_deref().unwrap_or("-");
            format!(
                "{}  (parent: {}, requires {}, unlocks {})",
                topic.id,
                parent,
                topic.deps.len(),
                index.descendant_count(&topic.id)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::model::Topic;

    #[test]
    fn list_shows_parent_and_counts_in_map_order() {
        let mut a = Topic::new("a", "A");
        a.parent = Some("root".to_string());
        a.deps = vec!["root".to_string()];
        let map = TopicMap {
            topics: vec![Topic::new("root", "Root"), a],
        };

        let lines = list_topics(&map);
        assert_eq!(
            lines,
            vec![
                "root  (parent: -, requires 0, unlocks 1)".to_string(),
                "a  (parent: root, requires 1, unlocks 0)".to_string(),
            ]
        );
    }
}
