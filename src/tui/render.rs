//! Drawing the map canvas: projected topics and prerequisite edges,
//! breadcrumb trail, details panel, status line, help overlay.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::map::model::Topic;
use crate::tui::camera::Viewport;

/// A topic ready to draw, with every per-frame annotation resolved.
#[derive(Debug, Clone)]
pub struct RenderTopic {
    pub id: String,
    pub label: String,
    pub pos: (f32, f32),
    pub focused: bool,
    pub selected: bool,
    /// Children exist but are hidden at this depth.
    pub expandable: bool,
    pub learned: bool,
    pub hovered: bool,
    pub on_ancestor_path: bool,
}

/// A prerequisite edge between two visible topics.
#[derive(Debug, Clone, Copy)]
pub struct RenderEdge {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub hovered: bool,
}

#[derive(Debug)]
pub struct DetailsData<'a> {
    pub topic: &'a Topic,
    pub learned: bool,
    pub unlocks: usize,
}

#[derive(Debug)]
pub struct CanvasRenderData<'a> {
    pub topics: &'a [RenderTopic],
    pub edges: &'a [RenderEdge],
    pub viewport: Viewport,
    pub breadcrumb: &'a [String],
    pub focus_depth: u8,
    pub show_all: bool,
    pub learned_count: usize,
    pub topic_count: usize,
    pub details: Option<DetailsData<'a>>,
    pub message: Option<&'a str>,
    pub show_help: bool,
    pub animating: bool,
}

/// The screen regions for one frame. Computed identically by `draw`
/// and by the mouse hit-test path.
#[derive(Debug, Clone, Copy)]
pub struct ScreenLayout {
    pub breadcrumb: Rect,
    pub canvas: Rect,
    pub details: Option<Rect>,
    pub status: Rect,
}

pub fn layout(frame_area: Rect, details_open: bool) -> ScreenLayout {
    let area = frame_area.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    let [breadcrumb, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(6),
        Constraint::Length(2),
    ])
    .areas(area);

    if details_open {
        let [canvas, details] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(36)]).areas(body);
        ScreenLayout {
            breadcrumb,
            canvas,
            details: Some(details),
            status,
        }
    } else {
        ScreenLayout {
            breadcrumb,
            canvas: body,
            details: None,
            status,
        }
    }
}

pub fn draw(frame: &mut Frame, data: &CanvasRenderData<'_>) {
    let layout = layout(frame.area(), data.details.is_some());

    draw_breadcrumb(frame, layout.breadcrumb, data.breadcrumb);
    draw_canvas(frame, layout.canvas, data);
    if let (Some(area), Some(details)) = (layout.details, &data.details) {
        draw_details(frame, area, details);
    }
    draw_status(frame, layout.status, data);

    if data.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_breadcrumb(frame: &mut Frame, area: Rect, trail: &[String]) {
    let mut spans = Vec::new();
    for (i, id) in trail.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i + 1 == trail.len() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(id.clone(), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    style: Style,
}

impl Cell {
    fn blank() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

fn draw_canvas(frame: &mut Frame, area: Rect, data: &CanvasRenderData<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" map ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut grid =
        vec![vec![Cell::blank(); inner.width as usize]; inner.height as usize];

    for edge in data.edges {
        plot_edge(&mut grid, inner, data.viewport, edge);
    }
    // Focused topic last so its label wins overlaps.
    for topic in data.topics.iter().filter(|t| !t.focused) {
        plot_topic(&mut grid, inner, data.viewport, topic);
    }
    for topic in data.topics.iter().filter(|t| t.focused) {
        plot_topic(&mut grid, inner, data.viewport, topic);
    }

    let lines: Vec<Line> = grid.iter().map(|row| row_to_line(row)).collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn plot_edge(grid: &mut [Vec<Cell>], area: Rect, viewport: Viewport, edge: &RenderEdge) {
    let (x0, y0) = viewport.project_f(area, edge.from);
    let (x1, y1) = viewport.project_f(area, edge.to);
    let style = if edge.hovered {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    for (col, row) in line_cells((x0, y0), (x1, y1)) {
        put(grid, area, col, row, '·', style);
    }
}

/// Integer cells along the segment, stepped on the dominant axis.
fn line_cells(from: (f32, f32), to: (f32, f32)) -> Vec<(i32, i32)> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = dx.abs().max(dy.abs()).ceil() as i32;
    if steps == 0 {
        return vec![(from.0.round() as i32, from.1.round() as i32)];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            (
                (from.0 + dx * t).round() as i32,
                (from.1 + dy * t).round() as i32,
            )
        })
        .collect()
}

fn plot_topic(grid: &mut [Vec<Cell>], area: Rect, viewport: Viewport, topic: &RenderTopic) {
    let (x, y) = viewport.project_f(area, topic.pos);
    let col = x.round() as i32;
    let row = y.round() as i32;

    let style = if topic.focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if topic.hovered {
        Style::default().fg(Color::Cyan)
    } else if topic.selected {
        Style::default().fg(Color::LightGreen)
    } else if topic.on_ancestor_path {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White)
    };

    let marker = if topic.learned { '◆' } else { '◇' };
    let mut text = format!("{marker} {}", topic.label);
    if topic.expandable {
        text.push_str(" [+]");
    }

    for (i, ch) in text.chars().enumerate() {
        put(grid, area, col + i as i32, row, ch, style);
    }
}

fn put(grid: &mut [Vec<Cell>], area: Rect, col: i32, row: i32, ch: char, style: Style) {
    if col < 0 || row < 0 || col >= area.width as i32 || row >= area.height as i32 {
        return;
    }
    grid[row as usize][col as usize] = Cell { ch, style };
}

/// Collapse a row of cells into spans, grouping runs of equal style.
fn row_to_line(row: &[Cell]) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    for cell in row {
        if cell.style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = cell.style;
        run.push(cell.ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

fn draw_details(frame: &mut Frame, area: Rect, details: &DetailsData<'_>) {
    let topic = details.topic;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .padding(Padding::new(1, 1, 0, 0))
        .title(format!(" {} ", topic.label));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    if let Some(category) = &topic.category {
        lines.push(Line::from(Span::styled(
            category.clone(),
            Style::default().fg(Color::Magenta),
        )));
    }
    let learned_label = if details.learned {
        Span::styled("learned ✓", Style::default().fg(Color::Green))
    } else {
        Span::styled("not learned", Style::default().fg(Color::DarkGray))
    };
    lines.push(Line::from(learned_label));
    lines.push(Line::from(Span::styled(
        format!("unlocks {} topics", details.unlocks),
        Style::default().fg(Color::Gray),
    )));
    if !topic.deps.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "requires:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for dep in &topic.deps {
            lines.push(Line::from(format!("  {dep}")));
        }
    }
    if !topic.summary.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(topic.summary.clone()));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_status(frame: &mut Frame, area: Rect, data: &CanvasRenderData<'_>) {
    let mode = if data.show_all {
        "all".to_string()
    } else {
        format!("depth {}", data.focus_depth)
    };
    let mut left = format!(
        "{mode} · {}/{} learned · zoom {:.2}",
        data.learned_count, data.topic_count, data.viewport.zoom
    );
    if data.animating {
        left.push_str(" · …");
    }

    let mut lines = vec![Line::from(Span::styled(
        left,
        Style::default().fg(Color::Gray),
    ))];
    let second = match data.message {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            "arrows: navigate · enter: open · 1-3: depth · a: show all · x: learned · esc: fit · ?: help",
            Style::default().fg(Color::DarkGray),
        )),
    };
    lines.push(second);
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 60, 70);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .padding(Padding::new(2, 2, 1, 1))
        .title(" keys ");

    let rows = [
        ("↑ / k", "focus parent"),
        ("↓ / j", "focus first unlocked topic"),
        ("← → / h l", "step between siblings"),
        ("enter / space", "open topic details"),
        ("backspace / b", "go back"),
        ("home / g", "back to the root"),
        ("tab", "cycle visible topics"),
        ("1 2 3", "focus depth"),
        ("a", "show the whole map"),
        ("x", "toggle learned"),
        ("+ / -", "zoom"),
        ("esc", "fit map to view"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:>14}  "), Style::default().fg(Color::Cyan)),
                Span::raw(*what),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}
