//! `atlas check` — load the map and report structural problems.

use anyhow::Result;

use crate::atlas_dir;
use crate::map::load;

pub fn run() -> Result<()> {
    let root = atlas_dir::find_root()?;
    let map = load::load(&atlas_dir::map_path(&root))?;

    let issues = load::validate(&map);
    println!("{}", report(map.topics.len(), &issues));
    Ok(())
}

fn report(topic_count: usize, issues: &[String]) -> String {
    if issues.is_empty() {
        return format!("{topic_count} topics, no issues.");
    }
    let mut out = format!("{topic_count} topics, {} issue(s):\n", issues.len());
    for issue in issues {
        out.push_str("  ");
        out.push_str(issue);
        out.push('\n');
    }
    out.pop();
    out
}
