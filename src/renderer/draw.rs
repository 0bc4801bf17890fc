//! Drawing instructions
//!
//! Scenes are lists of polylines, filled circles and text in normalized
//! drawing coordinates (`[0, 1]`, +y down). Building a scene only reads its
//! inputs, so it is safe to call from a free-running frame callback.

use glam::{DVec2, Vec2};

use super::vertex::{Color, colors, hsl};
use crate::board::{Bounds, Coord, SparseGrid, WarpLink, link_hue};
use crate::consts::*;
use crate::sim::{LambdaMap, MapCell, Waypoint};
use crate::viewport::Viewport;

/// One drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Polyline {
        points: Vec<Vec2>,
        color: Color,
        width: f32,
        dashed: bool,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        at: Vec2,
        size: f32,
        color: Color,
    },
}

/// Marker sizes in normalized units plus overlay toggles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub checkpoint_radius: f32,
    pub waypoint_radius: f32,
    pub head_radius: f32,
    pub path_width: f32,
    pub crosshair_half: f32,
    pub show_cursor_readout: bool,
    pub show_future_path: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        let edge = CANVAS_SIZE as f32;
        Self {
            checkpoint_radius: CHECKPOINT_RADIUS / edge,
            waypoint_radius: WAYPOINT_RADIUS / edge,
            head_radius: HEAD_RADIUS / edge,
            path_width: PATH_WIDTH / edge,
            crosshair_half: CROSSHAIR_HALF / edge,
            show_cursor_readout: true,
            show_future_path: true,
        }
    }
}

/// Ordered list of drawing instructions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, points: Vec<Vec2>, color: Color, width: f32) {
        if points.len() >= 2 {
            self.commands.push(DrawCommand::Polyline {
                points,
                color,
                width,
                dashed: false,
            });
        }
    }

    pub fn dashed_line(&mut self, points: Vec<Vec2>, color: Color, width: f32) {
        if points.len() >= 2 {
            self.commands.push(DrawCommand::Polyline {
                points,
                color,
                width,
                dashed: true,
            });
        }
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, at: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            at,
            size,
            color,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn project(vp: &Viewport, p: DVec2) -> Vec2 {
    vp.to_drawing(p).as_vec2()
}

/// Axes, checkpoints, executed path, projected path and cursor readout.
///
/// With no `future` samples, a single drift step past the last waypoint is
/// previewed instead.
pub fn trajectory_scene(
    vp: &Viewport,
    style: &RenderStyle,
    checkpoints: &[(i64, i64)],
    waypoints: &[Waypoint],
    future: &[Waypoint],
) -> Scene {
    let mut scene = Scene::new();

    // Axes through the logical origin
    let origin = project(vp, DVec2::ZERO);
    let axis_width = style.path_width * 2.0 / 3.0;
    scene.line(
        vec![Vec2::new(0.0, origin.y), Vec2::new(1.0, origin.y)],
        colors::AXIS,
        axis_width,
    );
    scene.line(
        vec![Vec2::new(origin.x, 0.0), Vec2::new(origin.x, 1.0)],
        colors::AXIS,
        axis_width,
    );

    for &(x, y) in checkpoints {
        let center = project(vp, DVec2::new(x as f64, y as f64));
        scene.circle(center, style.checkpoint_radius, colors::CHECKPOINT);
    }

    if let Some(last) = waypoints.last() {
        let path: Vec<Vec2> = waypoints.iter().map(|w| project(vp, w.position())).collect();
        let head = project(vp, last.position());

        let preview: Vec<Waypoint> = if !style.show_future_path {
            Vec::new()
        } else if future.is_empty() {
            vec![last.drift()]
        } else {
            future.to_vec()
        };
        let ahead: Vec<Vec2> = preview.iter().map(|w| project(vp, w.position())).collect();

        scene.line(path.clone(), colors::PATH, style.path_width);
        let mut dashed = Vec::with_capacity(ahead.len() + 1);
        dashed.push(head);
        dashed.extend(ahead.iter().copied());
        scene.dashed_line(dashed, colors::FUTURE_PATH, style.path_width);

        for p in path {
            scene.circle(p, style.waypoint_radius, colors::PATH);
        }
        scene.circle(head, style.head_radius, colors::PATH);
        for p in ahead {
            scene.circle(p, style.waypoint_radius, colors::FUTURE_PATH);
        }
    }

    if style.show_cursor_readout {
        if let Some(readout) = vp.cursor_readout() {
            let (x, y) = readout.logical;
            let text_size = style.crosshair_half * 1.28;
            scene.text(format!("({}, {})", x, y), Vec2::ZERO, text_size, colors::TEXT);

            let anchor = readout.anchor.as_vec2();
            let half = style.crosshair_half;
            scene.line(
                vec![anchor - Vec2::new(0.0, half), anchor + Vec2::new(0.0, half)],
                colors::AXIS,
                style.path_width * 5.0 / 3.0,
            );
            scene.line(
                vec![anchor - Vec2::new(half, 0.0), anchor + Vec2::new(half, 0.0)],
                colors::AXIS,
                style.path_width * 5.0 / 3.0,
            );
        }
    }

    scene
}

/// Square cell layout of a grid window on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    window: Bounds,
    cell: f32,
}

impl CellLayout {
    pub fn new(window: Bounds) -> Self {
        let cells = window.width().max(window.height()).max(1) as f32;
        Self {
            window,
            cell: 1.0 / cells,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell
    }

    /// Center of a cell in normalized drawing coordinates
    pub fn center(&self, c: Coord) -> Vec2 {
        Vec2::new(
            ((c.x - self.window.min_x) as f32 + 0.5) * self.cell,
            ((c.y - self.window.min_y) as f32 + 0.5) * self.cell,
        )
    }
}

/// Board cells as text plus warp links, each link in its own hue
pub fn board_scene(grid: &SparseGrid, window: Bounds, links: &[WarpLink]) -> Scene {
    let layout = CellLayout::new(grid.editor_window(window));
    let mut scene = Scene::new();
    let cell = layout.cell_size();

    for (coord, value) in grid.iter() {
        scene.text(value, layout.center(coord), cell * 0.5, colors::TEXT);
    }

    for (i, link) in links.iter().enumerate() {
        let color = hsl(link_hue(i, links.len()), 1.0, 0.5);
        let from = layout.center(link.from);
        let to = layout.center(link.to);
        scene.line(vec![from, to], color, cell * 0.08);
        scene.circle(to, cell * 0.15, color);
    }

    scene
}

/// Walk map: walls as `#`, pills as dots, walker as a large disc
pub fn walk_scene(map: &LambdaMap) -> Scene {
    let rows = map.height().max(1) as i64;
    let cols = map.cells.iter().map(Vec::len).max().unwrap_or(1).max(1) as i64;
    let layout = CellLayout::new(Bounds {
        min_x: 0,
        min_y: 0,
        max_x: cols - 1,
        max_y: rows - 1,
    });
    let cell = layout.cell_size();
    let mut scene = Scene::new();

    for (r, row) in map.cells.iter().enumerate() {
        for (c, kind) in row.iter().enumerate() {
            let center = layout.center(Coord::new(c as i64, r as i64));
            match kind {
                MapCell::Wall => scene.text("#", center, cell, colors::WALL),
                MapCell::Pill => scene.circle(center, cell * 0.15, colors::PILL),
                MapCell::Lambda => scene.circle(center, cell * 0.4, colors::WALKER),
                MapCell::Done => {}
            }
        }
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::integrate;

    fn count<F: Fn(&DrawCommand) -> bool>(scene: &Scene, f: F) -> usize {
        scene.commands.iter().filter(|c| f(c)).count()
    }

    #[test]
    fn test_trajectory_scene_markers() {
        let waypoints = integrate("236659");
        let checkpoints = [(1, -1), (1, -3)];
        let vp = Viewport::fit(waypoints.iter().map(|w| w.position()));
        let scene = trajectory_scene(&vp, &RenderStyle::default(), &checkpoints, &waypoints, &[]);

        let circles = count(&scene, |c| matches!(c, DrawCommand::Circle { .. }));
        // checkpoints + waypoints + head + one drift preview
        assert_eq!(circles, 2 + 7 + 1 + 1);
        let dashed = count(&scene, |c| matches!(c, DrawCommand::Polyline { dashed: true, .. }));
        assert_eq!(dashed, 1);
        // No cursor, no readout
        assert_eq!(count(&scene, |c| matches!(c, DrawCommand::Text { .. })), 0);
    }

    #[test]
    fn test_trajectory_scene_cursor_readout() {
        let mut vp = Viewport::default();
        vp.apply(crate::viewport::PointerEvent::Move(DVec2::splat(0.5)));
        let scene = trajectory_scene(&vp, &RenderStyle::default(), &[], &[], &[]);
        let texts: Vec<_> = scene
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["(0, 0)"]);
    }

    #[test]
    fn test_board_scene_link_colors_differ() {
        let grid = SparseGrid::parse("a b\n@a @b");
        let links = crate::board::infer_links(&grid);
        let scene = board_scene(&grid, Bounds::DEFAULT_WINDOW, &links);
        let colors: Vec<Color> = scene
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polyline { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors.len(), 2);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn test_deep_zoom_on_head_tessellates() {
        let waypoints = integrate("66666");
        let mut vp = Viewport::fit(waypoints.iter().map(|w| w.position()));
        let head = vp.to_drawing(waypoints[5].position());
        for _ in 0..60 {
            vp.apply(crate::viewport::PointerEvent::Wheel { delta_y: -1.0, at: head });
        }
        assert!(vp.space_size() < 1e-4);

        let scene = trajectory_scene(&vp, &RenderStyle::default(), &[], &waypoints, &[]);
        let vertices = crate::renderer::tessellate(&scene);
        assert!(!vertices.is_empty());
        assert!(vertices.len() < 20_000, "{} vertices", vertices.len());
    }

    #[test]
    fn test_cell_layout_centers() {
        let layout = CellLayout::new(Bounds {
            min_x: 0,
            min_y: 0,
            max_x: 3,
            max_y: 1,
        });
        assert_eq!(layout.cell_size(), 0.25);
        assert_eq!(layout.center(Coord::new(0, 0)), Vec2::new(0.125, 0.125));
        assert_eq!(layout.center(Coord::new(3, 1)), Vec2::new(0.875, 0.375));
    }

    #[test]
    fn test_walk_scene() {
        let map = LambdaMap::parse("#.L");
        let scene = walk_scene(&map);
        assert_eq!(scene.len(), 3);
    }
}
