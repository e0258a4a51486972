//! `atlas init` — scaffold an `atlas/` directory with a starter map.

use std::path::Path;

use anyhow::{Result, bail};

use crate::atlas_dir;

const STARTER_MAP: &str = r#"{
  "topics": [
    { "id": "root", "label": "Start here", "pos": [0, 0],
      "summary": "The entry point of your map. Every other topic should eventually trace back here." },
    { "id": "first-topic", "label": "A first topic", "parent": "root",
      "deps": ["root"], "pos": [0, 100],
      "summary": "Replace this with something worth learning." }
  ]
}
"#;

pub fn run() -> Result<()> {
    let cwd = std::env::current_dir()?;
    init_at(&cwd)?;
    println!("created atlas/map.json — run `atlas view` to open it");
    Ok(())
}

fn init_at(dir: &Path) -> Result<()> {
    let map_path = atlas_dir::map_path(dir);
    if map_path.exists() {
        bail!("atlas/map.json already exists");
    }
    std::fs::create_dir_all(atlas_dir::atlas_dir(dir))?;
    std::fs::write(&map_path, STARTER_MAP)?;
    Ok(())
}
