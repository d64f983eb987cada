use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Wrap,
        canvas::{Canvas, Circle, Context, Line as Segment},
    },
};

use gitscope_graph::model::{Bounds, Dashes, Edge, Node};

use super::app::App;
use super::surface::{CanvasSurface, NavButton};
use super::theme;
use super::viewport::{UNITS_PER_COLUMN, UNITS_PER_ROW, Viewport, dash_segments};

const TOOLTIP_WIDTH: u16 = 48;

/// Create a styled block with rounded corners
fn styled_block(title: &str, is_focused: bool) -> Block<'_> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
        .border_style(if is_focused {
            Style::default().fg(theme::FOCUSED)
        } else {
            Style::default()
        })
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    // Canvas + nav bar + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = format!(" {} ", app.title());
    let block = styled_block(&title, true);
    let inner = block.inner(chunks[0]);

    let nav = nav_layout(chunks[1]);
    let status = app.status.clone();
    let show_help = app.show_help;

    match app.controller_mut().surface_mut() {
        Some(surface) => {
            surface.set_canvas_area(inner);
            surface.set_nav_layout(nav.clone());
            draw_canvas(frame, surface, block, chunks[0]);
            draw_tooltip(frame, surface, inner);
            draw_nav(frame, &nav);
            draw_status_bar(frame, Some(surface.viewport()), status.as_deref(), chunks[2]);
        }
        None => {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No repository data",
                Style::default().fg(theme::MUTED),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, chunks[0]);
            draw_status_bar(frame, None, status.as_deref(), chunks[2]);
        }
    }

    // Popups (rendered last, on top)
    if show_help {
        draw_help_popup(frame);
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

fn draw_canvas(frame: &mut Frame, surface: &CanvasSurface, block: Block<'_>, area: Rect) {
    let inner = block.inner(area);
    let vp = surface.viewport();
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(theme::CANVAS_BG)
        .x_bounds(vp.x_bounds(inner.width))
        .y_bounds(vp.y_bounds(inner.height))
        .paint(|ctx| {
            let window = vp.visible(inner.width, inner.height);
            for edge in surface.edges() {
                if let (Some(from), Some(to)) = (surface.node(&edge.from), surface.node(&edge.to)) {
                    paint_edge(ctx, vp, window, edge, from, to);
                }
            }
            for node in surface.nodes().iter().filter(|n| !n.is_marker()) {
                ctx.draw(&Circle {
                    x: node.x,
                    y: node.y,
                    radius: UNITS_PER_COLUMN * 0.6 / vp.scale,
                    color: theme::rgb(node.color),
                });
            }
            ctx.layer();
            for node in surface.nodes() {
                paint_label(ctx, vp, node);
            }
        });
    frame.render_widget(canvas, area);
}

fn paint_edge(
    ctx: &mut Context<'_>,
    vp: Viewport,
    window: Bounds,
    edge: &Edge,
    from: &Node,
    to: &Node,
) {
    let color = theme::rgb(edge.color);
    let cell = UNITS_PER_COLUMN / vp.scale;
    let (a, b) = ((from.x, from.y), (to.x, to.y));

    let segments = match edge.dashes {
        Dashes::Solid => vec![(a, b)],
        Dashes::Dashed => dash_segments(a, b, 2.0 * cell, cell, window),
        Dashes::Pattern(dash, gap) => dash_segments(
            a,
            b,
            f64::from(dash) * cell / 2.0,
            f64::from(gap) * cell / 2.0,
            window,
        ),
    };
    for ((x1, y1), (x2, y2)) in segments {
        ctx.draw(&Segment::new(x1, y1, x2, y2, color));
    }

    if edge.arrow {
        paint_arrow_head(ctx, a, b, cell, color);
    }
}

/// Two short strokes at `to`, pulled back by the node radius.
fn paint_arrow_head(ctx: &mut Context<'_>, from: (f64, f64), to: (f64, f64), cell: f64, color: Color) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.hypot(dy);
    if length <= f64::EPSILON {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);
    let tip = (ux.mul_add(-cell * 0.8, to.0), uy.mul_add(-cell * 0.8, to.1));
    let size = cell * 1.5;
    for angle in [0.45_f64, -0.45] {
        let (sin, cos) = angle.sin_cos();
        let bx = ux.mul_add(cos, -uy * sin);
        let by = ux.mul_add(sin, uy * cos);
        ctx.draw(&Segment::new(
            tip.0,
            tip.1,
            bx.mul_add(-size, tip.0),
            by.mul_add(-size, tip.1),
            color,
        ));
    }
}

fn paint_label(ctx: &mut Context<'_>, vp: Viewport, node: &Node) {
    if node.label.is_empty() {
        return;
    }
    if node.is_marker() {
        ctx.print(
            node.x,
            node.y,
            Span::styled(
                node.label.clone(),
                Style::default()
                    .fg(theme::rgb(node.color))
                    .add_modifier(Modifier::BOLD),
            ),
        );
    } else {
        // Hover excerpt sits one row above the commit.
        ctx.print(
            node.x,
            node.y + UNITS_PER_ROW / vp.scale,
            Span::styled(node.label.clone(), Style::default().fg(theme::LABEL)),
        );
    }
}

fn draw_tooltip(frame: &mut Frame, surface: &CanvasSurface, canvas: Rect) {
    let Some(node) = surface.hovered().and_then(|id| surface.node(id)) else {
        return;
    };
    let lines: Vec<Line> = node.title.lines().map(|l| Line::from(l.to_string())).collect();
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let width = TOOLTIP_WIDTH.min(canvas.width);
    let area = Rect::new(
        canvas.right().saturating_sub(width),
        canvas.bottom().saturating_sub(height),
        width,
        height.min(canvas.height),
    );
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
        .border_style(Style::default().fg(theme::rgb(node.color)));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

// ---------------------------------------------------------------------------
// Navigation buttons
// ---------------------------------------------------------------------------

fn nav_layout(area: Rect) -> Vec<(NavButton, Rect)> {
    let mut x = area.x;
    let mut out = Vec::new();
    for button in NavButton::ALL {
        let width = u16::try_from(button.label().chars().count()).unwrap_or(u16::MAX);
        if x.saturating_add(width) > area.right() {
            break;
        }
        out.push((button, Rect::new(x, area.y, width, 1)));
        x = x.saturating_add(width + 1);
    }
    out
}

fn draw_nav(frame: &mut Frame, nav: &[(NavButton, Rect)]) {
    for (button, rect) in nav {
        let label = Paragraph::new(button.label())
            .style(Style::default().bg(theme::NAV_BUTTON_BG).fg(theme::LABEL));
        frame.render_widget(label, *rect);
    }
}

// ---------------------------------------------------------------------------
// Status bar and help
// ---------------------------------------------------------------------------

fn draw_status_bar(frame: &mut Frame, viewport: Option<Viewport>, error: Option<&str>, area: Rect) {
    let blue = Color::Blue;
    let hints = [
        ("Pan", "drag/←↑↓→"),
        ("Zoom", "wheel/+-"),
        ("Fit", "f"),
        ("Reload", "r"),
        ("Keybindings", "?"),
        ("Quit", "q"),
    ];

    let mut spans = Vec::new();
    if let Some(vp) = viewport {
        spans.push(Span::styled(
            format!("{:>5.0}%  ", vp.scale * 100.0),
            Style::default().fg(theme::MUTED),
        ));
    }
    for (i, (action, key)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(blue)));
        }
        spans.push(Span::styled(format!("{action}: "), Style::default().fg(blue)));
        spans.push(Span::styled(*key, Style::default().fg(blue)));
    }
    if let Some(error) = error {
        spans.push(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let popup_area = centered_rect(44, 19, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    };
    let help_text = vec![
        heading("Navigation"),
        Line::from("  drag, arrows, hjkl   Pan"),
        Line::from("  wheel, + / -         Zoom"),
        Line::from("  f, 0                 Fit graph"),
        Line::from("  double-click         Fit graph"),
        Line::from(""),
        heading("Commits"),
        Line::from("  hover                Show message"),
        Line::from(""),
        heading("General"),
        Line::from("  r                    Reload data"),
        Line::from("  ?                    This help"),
        Line::from("  q, Esc               Quit"),
    ];

    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
        .border_style(Style::default().fg(theme::FOCUSED));

    frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}
