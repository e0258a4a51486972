//! The interactive map view: application state, event loop, and the
//! glue between navigation state, visibility, and the camera.

use std::collections::{HashMap, HashSet};
use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Margin, Rect};
use ratatui::{Frame, Terminal};

use crate::atlas_dir;
use crate::map::index::MapIndex;
use crate::map::load;
use crate::map::model::{ROOT_ID, Topic, TopicMap};
use crate::map::visibility::{Visibility, VisibilityCache};
use crate::progress::Progress;
use crate::tui::camera::{self, Camera};
use crate::tui::input::{self, Action};
use crate::tui::render::{self, CanvasRenderData, DetailsData, RenderEdge, RenderTopic};
use crate::tui::state::NavState;

/// Relaxed polling while idle; a faster cadence while a fly-to runs so
/// the interpolation looks continuous.
const IDLE_POLL: Duration = Duration::from_millis(200);
const ANIM_POLL: Duration = Duration::from_millis(33);

struct AppState {
    map: TopicMap,
    index: MapIndex,
    ids: Vec<String>,
    positions: HashMap<String, (f32, f32)>,
    visibility: VisibilityCache,
    nav: NavState,
    camera: Camera,
    progress: Progress,
    /// Focus as last seen by the camera; a difference starts a fly-to.
    observed_focus: Option<String>,
    status_message: Option<String>,
    show_help: bool,
    /// Inner canvas area from the last draw, for projections outside
    /// the draw path (mouse hit-tests, fly-to targets).
    canvas_area: Rect,
}

impl AppState {
    fn load(demo: bool) -> Result<Self> {
        let (map, progress) = if demo {
            (demo_map(), Progress::ephemeral())
        } else {
            let root = atlas_dir::find_root()?;
            let map = load::load(&atlas_dir::map_path(&root))?;
            let progress = Progress::load(&atlas_dir::progress_path(&root))?;
            (map, progress)
        };

        let index = MapIndex::build(&map.topics);
        let ids = map.ids();
        let positions = map.topics.iter().map(|t| (t.id.clone(), t.pos)).collect();

        let mut app = Self {
            map,
            index,
            ids,
            positions,
            visibility: VisibilityCache::new(),
            nav: NavState::new(),
            camera: Camera::new(),
            progress,
            observed_focus: None,
            status_message: demo.then(|| "demo map: progress is in-memory only".to_string()),
            show_help: false,
            canvas_area: Rect::new(0, 0, 120, 40),
        };
        if app.map.contains(ROOT_ID) {
            app.nav.go_to_root(ROOT_ID);
            if let Some(pos) = app.positions.get(ROOT_ID) {
                app.camera
                    .jump_to(camera::center_on(*pos, app.canvas_area.width));
            }
            app.observed_focus = Some(ROOT_ID.to_string());
        }
        Ok(app)
    }

    /// Advance the camera and propagate its state into the navigation
    /// flag that gates traversal keys.
    fn tick(&mut self, now: Instant) {
        self.observe_focus(now);
        let running = self.camera.tick(now);
        self.nav.is_navigating = running;
    }

    /// Start a fly-to when the focus differs from what the camera last
    /// saw. Starting over an in-flight animation replaces it.
    fn observe_focus(&mut self, now: Instant) {
        let focus = self.nav.focused().map(str::to_string);
        if focus == self.observed_focus {
            return;
        }
        if let Some(id) = &focus
            && let Some(pos) = self.positions.get(id)
        {
            self.camera
                .fly_to(camera::center_on(*pos, self.canvas_area.width), now);
            self.nav.is_navigating = true;
        }
        self.observed_focus = focus;
    }

    fn current_visibility(&mut self) -> Visibility {
        self.visibility
            .resolve(
                &self.index,
                &self.ids,
                self.nav.focused(),
                self.nav.focus_depth(),
                self.nav.show_all(),
            )
            .clone()
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<bool> {
        self.status_message = None;
        let action = input::action_for_key(key);

        if self.show_help {
            // Any key closes the overlay; quit still works.
            self.show_help = false;
            return Ok(action == Action::Quit);
        }

        match action {
            Action::Quit => return Ok(true),
            Action::ToggleHelp => self.show_help = true,
            Action::ZoomIn => self.camera.zoom_by(0.1),
            Action::ZoomOut => self.camera.zoom_by(-0.1),
            Action::SetDepth(depth) => self.nav.set_focus_depth(depth),
            Action::ToggleShowAll => self.nav.toggle_show_all(),
            Action::ToggleLearned => self.toggle_learned()?,
            Action::GoBack => {
                self.nav.go_back();
            }
            Action::GoToRoot => {
                if self.map.contains(ROOT_ID) {
                    self.nav.go_to_root(ROOT_ID);
                }
            }
            Action::FitView => self.fit_view(now),
            Action::NextTopic => self.cycle_topic(),
            Action::Move(_) | Action::Activate if self.nav.is_navigating => {
                // Traversal is suppressed while the camera is mid-flight.
            }
            Action::Move(direction) => match self.nav.focused().map(str::to_string) {
                None => self.focus_root(),
                Some(focus) => {
                    if let Some(next) =
                        camera::step(&self.index, &self.positions, &focus, direction)
                    {
                        self.nav.focus_topic(&next);
                    }
                }
            },
            Action::Activate => match self.nav.focused().map(str::to_string) {
                None => self.focus_root(),
                Some(focus) if self.nav.selected() == Some(focus.as_str()) => {
                    // Activating the open topic again closes the panel.
                    self.nav.select_topic(None);
                }
                Some(focus) => self.nav.select_topic(Some(&focus)),
            },
            Action::Noop => {}
        }
        self.observe_focus(now);
        Ok(false)
    }

    fn focus_root(&mut self) {
        if self.map.contains(ROOT_ID) {
            self.nav.focus_topic(ROOT_ID);
        }
    }

    fn toggle_learned(&mut self) -> Result<()> {
        let Some(focus) = self.nav.focused().map(str::to_string) else {
            return Ok(());
        };
        let learned = self.progress.toggle(&focus)?;
        self.status_message = Some(if learned {
            format!("{focus}: learned")
        } else {
            format!("{focus}: not learned")
        });
        Ok(())
    }

    /// Escape: frame every currently visible topic.
    fn fit_view(&mut self, now: Instant) {
        let visible = self.current_visibility();
        let points = self
            .positions
            .iter()
            .filter(|(id, _)| visible.is_visible(id))
            .map(|(_, pos)| *pos);
        let target = camera::fit_view(points, self.canvas_area);
        self.camera.fly_to(target, now);
    }

    /// Tab: next visible topic in map order, wrapping.
    fn cycle_topic(&mut self) {
        let visible = self.current_visibility();
        let order: Vec<&String> = self.ids.iter().filter(|id| visible.is_visible(id)).collect();
        if order.is_empty() {
            return;
        }
        let pos = self
            .nav
            .focused()
            .and_then(|focus| order.iter().position(|id| id.as_str() == focus))
            .unwrap_or(order.len() - 1);
        let next = order[(pos + 1) % order.len()].clone();
        self.nav.focus_topic(&next);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Moved {
            return;
        }
        let hovered = self.hovered_at(mouse.column, mouse.row);
        self.nav.set_hovered(hovered);
    }

    /// Hit-test the canvas: the hovered topic plus its direct graph
    /// neighbors (parent, unlocked children, prerequisites), or the
    /// empty set when nothing is hit.
    fn hovered_at(&mut self, column: u16, row: u16) -> HashSet<String> {
        let area = self.canvas_area;
        let visible = self.current_visibility();

        for topic in &self.map.topics {
            if !visible.is_visible(&topic.id) {
                continue;
            }
            let Some((start, line)) = self.camera.viewport.project(area, topic.pos) else {
                continue;
            };
            // marker + space + label, plus the expandable affordance.
            let mut width = 2 + topic.label.chars().count() as u16;
            if visible.is_expandable(&topic.id) {
                width += 4;
            }
            if row == line && column >= start && column < start.saturating_add(width) {
                let mut set = HashSet::from([topic.id.clone()]);
                if let Some(parent) = self.index.parent_of(&topic.id) {
                    set.insert(parent.to_string());
                }
                for child in self.index.children_of(&topic.id) {
                    set.insert(child.clone());
                }
                for dep in &topic.deps {
                    set.insert(dep.clone());
                }
                return set;
            }
        }
        HashSet::new()
    }

    fn draw(&mut self, frame: &mut Frame) {
        let layout = render::layout(frame.area(), self.selected_topic().is_some());
        self.canvas_area = layout.canvas.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });

        let visible = self.current_visibility();
        let hovered = self.nav.hovered().clone();
        let ancestors: HashSet<&str> = self
            .nav
            .focused()
            .map(|focus| self.index.ancestors_of(focus).into_iter().collect())
            .unwrap_or_default();

        let topics: Vec<RenderTopic> = self
            .map
            .topics
            .iter()
            .filter(|t| visible.is_visible(&t.id))
            .map(|t| RenderTopic {
                id: t.id.clone(),
                label: t.label.clone(),
                pos: t.pos,
                focused: self.nav.focused() == Some(t.id.as_str()),
                selected: self.nav.selected() == Some(t.id.as_str()),
                expandable: visible.is_expandable(&t.id),
                learned: self.progress.is_learned(&t.id),
                hovered: hovered.contains(&t.id),
                on_ancestor_path: ancestors.contains(t.id.as_str()),
            })
            .collect();

        let mut edges = Vec::new();
        for topic in &self.map.topics {
            if !visible.is_visible(&topic.id) {
                continue;
            }
            for dep in &topic.deps {
                if let Some(dep_topic) = self.map.get(dep)
                    && visible.is_visible(dep)
                {
                    edges.push(RenderEdge {
                        from: dep_topic.pos,
                        to: topic.pos,
                        hovered: hovered.contains(dep) && hovered.contains(&topic.id),
                    });
                }
            }
        }

        let details = self.selected_topic().map(|topic| DetailsData {
            learned: self.progress.is_learned(&topic.id),
            unlocks: self.index.descendant_count(&topic.id),
            topic,
        });

        let data = CanvasRenderData {
            topics: &topics,
            edges: &edges,
            viewport: self.camera.viewport,
            breadcrumb: self.nav.history(),
            focus_depth: self.nav.focus_depth(),
            show_all: self.nav.show_all(),
            learned_count: self.progress.learned_count(),
            topic_count: self.map.topics.len(),
            details,
            message: self.status_message.as_deref(),
            show_help: self.show_help,
            animating: self.camera.is_animating(),
        };
        render::draw(frame, &data);
    }

    fn selected_topic(&self) -> Option<&Topic> {
        self.nav.selected().and_then(|id| self.map.get(id))
    }
}

pub fn run(demo: bool) -> Result<()> {
    let mut app = AppState::load(demo)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.tick(Instant::now());
        terminal.draw(|f| app.draw(f))?;

        let cadence = if app.camera.is_animating() {
            ANIM_POLL
        } else {
            IDLE_POLL
        };
        if !event::poll(cadence)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                    continue;
                }
                if app.handle_key(key, Instant::now())? {
                    break;
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }

    app.nav.clear_history();
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// A built-in sample map so `atlas view --demo` runs without a file.
fn demo_map() -> TopicMap {
    fn topic(
        id: &str,
        label: &str,
        parent: Option<&str>,
        deps: &[&str],
        pos: (f32, f32),
        summary: &str,
    ) -> Topic {
        let mut t = Topic::new(id, label);
        t.parent = parent.map(str::to_string);
        t.deps = deps.iter().map(|d| d.to_string()).collect();
        t.pos = pos;
        t.summary = summary.to_string();
        t
    }

    TopicMap {
        topics: vec![
            topic(
                "root",
                "Start here",
                None,
                &[],
                (0.0, 0.0),
                "The entry point of the map.",
            ),
            topic(
                "hashing",
                "Hash functions",
                Some("root"),
                &["root"],
                (-160.0, 90.0),
                "One-way functions that fingerprint data.",
            ),
            topic(
                "keys",
                "Public-key crypto",
                Some("root"),
                &["root"],
                (0.0, 90.0),
                "Key pairs: sign with one half, verify with the other.",
            ),
            topic(
                "p2p",
                "Peer-to-peer networks",
                Some("root"),
                &["root"],
                (160.0, 90.0),
                "Nodes exchanging data without a central server.",
            ),
            topic(
                "signatures",
                "Digital signatures",
                Some("keys"),
                &["keys", "hashing"],
                (-80.0, 180.0),
                "Prove a message came from a key holder.",
            ),
            topic(
                "merkle",
                "Merkle trees",
                Some("hashing"),
                &["hashing"],
                (-220.0, 180.0),
                "Hash trees that let you verify one leaf cheaply.",
            ),
            topic(
                "blocks",
                "Blocks",
                Some("merkle"),
                &["merkle", "signatures"],
                (-150.0, 270.0),
                "Batches of transactions chained by hashes.",
            ),
            topic(
                "consensus",
                "Consensus",
                Some("p2p"),
                &["p2p", "blocks"],
                (60.0, 270.0),
                "How nodes agree on a single chain.",
            ),
            topic(
                "pow",
                "Proof of work",
                Some("consensus"),
                &["consensus"],
                (-20.0, 360.0),
                "Consensus weight from expended computation.",
            ),
            topic(
                "pos",
                "Proof of stake",
                Some("consensus"),
                &["consensus"],
                (140.0, 360.0),
                "Consensus weight from locked-up value.",
            ),
            topic(
                "wallets",
                "Wallets",
                Some("signatures"),
                &["signatures"],
                (-80.0, 270.0),
                "Key management for everyday use.",
            ),
            topic(
                "contracts",
                "Smart contracts",
                Some("consensus"),
                &["consensus", "signatures"],
                (260.0, 360.0),
                "Programs that run as part of consensus.",
            ),
        ],
    }
}
