//! The per-topic "learned" flag, persisted outside the map itself.
//!
//! Stored as a JSON array of topic ids so the map file stays pristine.
//! The visibility core never reads this; only the renderer does.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default)]
pub struct Progress {
    path: Option<PathBuf>,
    learned: HashSet<String>,
}

impl Progress {
    /// In-memory only; used by demo mode.
    pub fn ephemeral() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file is an empty set, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        let learned = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let ids: Vec<String> =
                serde_json::from_str(&text).context("malformed progress.json")?;
            ids.into_iter().collect()
        } else {
            HashSet::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            learned,
        })
    }

    pub fn is_learned(&self, id: &str) -> bool {
        self.learned.contains(id)
    }

    pub fn learned_count(&self) -> usize {
        self.learned.len()
    }

    /// Flip the flag for `id` and persist when backed by a file.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let now_learned = if !self.learned.remove(id) {
            self.learned.insert(id.to_string());
            true
        } else {
            false
        };
        self.save()?;
        Ok(now_learned)
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut ids: Vec<&str> = self.learned.iter().map(String::as_str).collect();
        ids.sort_unstable();
        let text = serde_json::to_string_pretty(&ids)?;
        std::fs::write(path, text)
            .with_context(|| format!("cannot write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let progress = Progress::load(&dir.path().join("progress.json")).unwrap();
        assert_eq!(progress.learned_count(), 0);
    }

    #[test]
    fn toggle_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");

        let mut progress = Progress::load(&path).unwrap();
        assert!(progress.toggle("hashing").unwrap(), "first toggle learns");
        assert!(progress.is_learned("hashing"));

        let reloaded = Progress::load(&path).unwrap();
        assert!(reloaded.is_learned("hashing"));

        let mut progress = reloaded;
        assert!(!progress.toggle("hashing").unwrap(), "second toggle unlearns");
        assert!(!progress.is_learned("hashing"));
    }

    #[test]
    fn ephemeral_toggles_do_not_touch_disk() {
        let mut progress = Progress::ephemeral();
        assert!(progress.toggle("a").unwrap());
        assert!(progress.is_learned("a"));
    }
}
