//! Viewport state, the fly-to animation, and graph-aware traversal.
//!
//! The animation is an explicit `idle -> running -> idle` machine: at
//! most one [`FlyTo`] exists at a time, and starting a new one replaces
//! (cancels) the old one before the next tick. The event loop drives
//! `tick` with the current instant; the camera never schedules itself.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::map::index::MapIndex;
use crate::tui::input::Direction;

pub const DEFAULT_ZOOM: f32 = 0.50;
pub const MIN_ZOOM: f32 = 0.10;
pub const MAX_ZOOM: f32 = 2.00;
/// Focus zoom drops one notch on narrow terminals so the neighborhood
/// still fits.
pub const FOCUS_ZOOM: f32 = 0.80;
pub const FOCUS_ZOOM_NARROW: f32 = 0.55;
const NARROW_COLS: u16 = 90;

pub const FLY_TO_DURATION: Duration = Duration::from_millis(450);

/// Terminal cells are roughly twice as tall as wide; world y is
/// compressed by this factor when projecting.
const CELL_ASPECT: f32 = 0.5;

/// World coordinates of the view center plus scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    /// Project a world position to fractional cell coordinates relative
    /// to `area`'s origin. May fall outside the area; edge plotting
    /// clips per cell.
    pub fn project_f(&self, area: Rect, world: (f32, f32)) -> (f32, f32) {
        let cx = area.width as f32 / 2.0;
        let cy = area.height as f32 / 2.0;
        (
            cx + (world.0 - self.x) * self.zoom,
            cy + (world.1 - self.y) * self.zoom * CELL_ASPECT,
        )
    }

    /// Project a world position to an absolute terminal cell inside
    /// `area`, or None when it falls outside.
    pub fn project(&self, area: Rect, world: (f32, f32)) -> Option<(u16, u16)> {
        let (sx, sy) = self.project_f(area, world);
        if sx < 0.0 || sy < 0.0 || sx >= area.width as f32 || sy >= area.height as f32 {
            return None;
        }
        Some((area.x + sx as u16, area.y + sy as u16))
    }
}

/// One in-flight viewport animation.
#[derive(Debug, Clone, Copy)]
struct FlyTo {
    start: Viewport,
    target: Viewport,
    started_at: Instant,
    duration: Duration,
}

/// Ease-out: approaches the target quickly, then settles.
fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[derive(Debug, Default)]
pub struct Camera {
    pub viewport: Viewport,
    anim: Option<FlyTo>,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }

    /// Start an eased pan+zoom toward `target`, replacing any in-flight
    /// animation. Cancel-then-restart, never queue.
    pub fn fly_to(&mut self, target: Viewport, now: Instant) {
        self.anim = Some(FlyTo {
            start: self.viewport,
            target,
            started_at: now,
            duration: FLY_TO_DURATION,
        });
    }

    /// Set the viewport immediately, cancelling any animation.
    pub fn jump_to(&mut self, target: Viewport) {
        self.anim = None;
        self.viewport = target;
    }

    /// Advance the animation to `now`. Returns true while still in
    /// flight; at full progress the viewport lands exactly on the
    /// target and the machine returns to idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.anim else {
            return false;
        };
        let elapsed = now.saturating_duration_since(anim.started_at);
        let progress = (elapsed.as_secs_f32() / anim.duration.as_secs_f32()).min(1.0);
        let eased = ease_out(progress);
        self.viewport = Viewport {
            x: lerp(anim.start.x, anim.target.x, eased),
            y: lerp(anim.start.y, anim.target.y, eased),
            zoom: lerp(anim.start.zoom, anim.target.zoom, eased),
        };
        if progress >= 1.0 {
            self.anim = None;
            false
        } else {
            true
        }
    }

    /// Manual zoom step; keeps the current center, cancels nothing.
    pub fn zoom_by(&mut self, delta: f32) {
        self.viewport.zoom = (self.viewport.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// Discrete zoom policy for centering a focused topic.
pub fn focus_zoom(canvas_width: u16) -> f32 {
    if canvas_width < NARROW_COLS {
        FOCUS_ZOOM_NARROW
    } else {
        FOCUS_ZOOM
    }
}

/// Viewport centering `world` at the focus zoom for this canvas width.
pub fn center_on(world: (f32, f32), canvas_width: u16) -> Viewport {
    Viewport {
        x: world.0,
        y: world.1,
        zoom: focus_zoom(canvas_width),
    }
}

/// Viewport framing every position in `points` inside `area`, for the
/// Escape fit-to-view reset.
pub fn fit_view<I: IntoIterator<Item = (f32, f32)>>(points: I, area: Rect) -> Viewport {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Viewport::default();
    };
    let (mut min_x, mut min_y) = first;
    let (mut max_x, mut max_y) = first;
    for (x, y) in iter {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let span_x = (max_x - min_x).max(1.0);
    let span_y = (max_y - min_y).max(1.0);
    // Leave a margin so labels at the extremes stay on screen.
    let avail_x = area.width.saturating_sub(8).max(1) as f32;
    let avail_y = area.height.saturating_sub(4).max(1) as f32;
    let zoom = (avail_x / span_x)
        .min(avail_y / (span_y * CELL_ASPECT))
        .clamp(MIN_ZOOM, MAX_ZOOM);

    Viewport {
        x: (min_x + max_x) / 2.0,
        y: (min_y + max_y) / 2.0,
        zoom,
    }
}

/// Map a directional key to the next focus id, consulting the graph
/// index and on-screen x positions. Returns None for a boundary no-op.
pub fn step(
    index: &MapIndex,
    positions: &HashMap<String, (f32, f32)>,
    focus: &str,
    direction: Direction,
) -> Option<String> {
    match direction {
        Direction::Up => index.parent_of(focus).map(str::to_string),
        Direction::Down => index.children_of(focus).first().cloned(),
        Direction::Left => sibling_step(index, positions, focus, -1),
        Direction::Right => sibling_step(index, positions, focus, 1),
    }
}

/// Order `{siblings} ∪ {current}` by x ascending and move one slot.
fn sibling_step(
    index: &MapIndex,
    positions: &HashMap<String, (f32, f32)>,
    focus: &str,
    delta: isize,
) -> Option<String> {
    let mut row: Vec<&str> = index.siblings_of(focus);
    row.push(focus);
    row.sort_by(|a, b| {
        let ax = positions.get(*a).map(|p| p.0).unwrap_or(0.0);
        let bx = positions.get(*b).map(|p| p.0).unwrap_or(0.0);
        ax.total_cmp(&bx)
    });

    let pos = row.iter().position(|id| *id == focus)?;
    let next = pos as isize + delta;
    if next < 0 || next >= row.len() as isize {
        return None;
    }
    Some(row[next as usize].to_string())
}
