//! Navigation state: focus, selection, breadcrumb history, hover set.
//!
//! All mutation funnels through named methods so the invariants hold
//! everywhere: the history never exceeds [`HISTORY_CAP`] entries, never
//! holds two consecutive equal ids, and its tail always matches the
//! current focus right after a focus change.

use std::collections::HashSet;

pub const HISTORY_CAP: usize = 10;
pub const MIN_FOCUS_DEPTH: u8 = 1;
pub const MAX_FOCUS_DEPTH: u8 = 3;

#[derive(Debug)]
pub struct NavState {
    focused: Option<String>,
    selected: Option<String>,
    history: Vec<String>,
    hovered: HashSet<String>,
    focus_depth: u8,
    show_all: bool,
    /// True while a camera fly-to is in flight; gates traversal keys.
    pub is_navigating: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            focused: None,
            selected: None,
            history: Vec::new(),
            hovered: HashSet::new(),
            focus_depth: MIN_FOCUS_DEPTH,
            show_all: false,
            is_navigating: false,
        }
    }
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn hovered(&self) -> &HashSet<String> {
        &self.hovered
    }

    pub fn focus_depth(&self) -> u8 {
        self.focus_depth
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Focus a topic and record it on the breadcrumb trail.
    pub fn focus_topic(&mut self, id: &str) {
        self.focused = Some(id.to_string());
        if self.history.last().map(String::as_str) != Some(id) {
            self.history.push(id.to_string());
            if self.history.len() > HISTORY_CAP {
                self.history.remove(0);
            }
        }
    }

    /// Set the inspected topic (drives the details panel). A non-empty
    /// selection also focuses the topic.
    pub fn select_topic(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
        if let Some(id) = id {
            self.focus_topic(id);
        }
    }

    /// Pop the last breadcrumb and re-focus the new tail. No-op when
    /// there is nowhere to go back to.
    pub fn go_back(&mut self) -> Option<&str> {
        if self.history.len() <= 1 {
            return None;
        }
        self.history.pop();
        let tail = self.history.last().cloned();
        self.focused = tail;
        self.focused.as_deref()
    }

    /// Hard reset to the root: focus it and restart the trail.
    pub fn go_to_root(&mut self, root: &str) {
        self.focused = Some(root.to_string());
        self.history = vec![root.to_string()];
    }

    /// Teardown: drop focus and trail.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.focused = None;
    }

    pub fn set_hovered(&mut self, ids: HashSet<String>) {
        self.hovered = ids;
    }

    /// Clamped to `1..=3`; the resolver itself does not range-check.
    pub fn set_focus_depth(&mut self, depth: u8) {
        self.focus_depth = depth.clamp(MIN_FOCUS_DEPTH, MAX_FOCUS_DEPTH);
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
    }
}
