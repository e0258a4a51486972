//! Paths and common operations for the `atlas/` directory.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Walk upward from `start` to find the directory containing `atlas/map.json`.
pub fn find_root_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join("atlas").join("map.json").exists() {
            return Ok(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => bail!("no atlas map found — run `atlas init` to create one"),
        }
    }
}

/// Walk upward from the current working directory to find the map root.
pub fn find_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    find_root_from(&cwd)
}

pub fn atlas_dir(root: &Path) -> PathBuf {
    root.join("atlas")
}

pub fn map_path(root: &Path) -> PathBuf {
    root.join("atlas").join("map.json")
}

pub fn progress_path(root: &Path) -> PathBuf {
    root.join("atlas").join("progress.json")
}
