//! Tessellation of drawing instructions into triangle lists
//!
//! Output positions are in clip space (`[-1, 1]`, +y up). Text is left to the
//! backend and produces no vertices.

use glam::{DVec2, Vec2};
use std::f32::consts::PI;

use super::draw::{DrawCommand, Scene};
use super::vertex::{Color, Vertex};

/// Triangle segments per circle
pub const CIRCLE_SEGMENTS: u32 = 24;
/// Dash and gap length in normalized units
pub const DASH_LENGTH: f32 = 10.0 / 4000.0;

/// Visible area in normalized coordinates, with room for markers straddling
/// the edge
const CLIP_MIN: f64 = -0.5;
const CLIP_MAX: f64 = 1.5;

/// Normalized drawing coordinates (+y down) to clip space (+y up)
#[inline]
pub fn to_clip(p: Vec2) -> Vec2 {
    Vec2::new(p.x * 2.0 - 1.0, 1.0 - p.y * 2.0)
}

fn push(vertices: &mut Vec<Vertex>, p: Vec2, color: Color) {
    let c = to_clip(p);
    vertices.push(Vertex::new(c.x, c.y, color));
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        push(&mut vertices, center, color);
        push(
            &mut vertices,
            center + Vec2::new(theta1.cos(), theta1.sin()) * radius,
            color,
        );
        push(
            &mut vertices,
            center + Vec2::new(theta2.cos(), theta2.sin()) * radius,
            color,
        );
    }

    vertices
}

/// Generate vertices for one thick segment
fn segment(vertices: &mut Vec<Vertex>, p1: Vec2, p2: Vec2, width: f32, color: Color) {
    // Direction from p1 to p2
    let dir = (p2 - p1).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    // Quad corners
    let v1a = p1 + perp;
    let v1b = p1 - perp;
    let v2a = p2 + perp;
    let v2b = p2 - perp;

    // Two triangles
    push(vertices, v1a, color);
    push(vertices, v1b, color);
    push(vertices, v2a, color);

    push(vertices, v2a, color);
    push(vertices, v1b, color);
    push(vertices, v2b, color);
}

/// Parameter range `[t0, t1]` of the segment `p1 -> p2` that lies inside the
/// clip box, `None` when nothing of it is visible
fn clip(p1: DVec2, p2: DVec2) -> Option<(f64, f64)> {
    if !p1.is_finite() || !p2.is_finite() {
        return None;
    }
    let d = p2 - p1;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, p1.x - CLIP_MIN),
        (d.x, CLIP_MAX - p1.x),
        (-d.y, p1.y - CLIP_MIN),
        (d.y, CLIP_MAX - p1.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// Generate vertices for a polyline, optionally dashed.
///
/// Segments are clipped to the visible area first, so the cost depends on
/// what is on screen rather than on how far the points are zoomed apart.
pub fn polyline(points: &[Vec2], width: f32, color: Color, dashed: bool) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(1) * 6);
    let dash = DASH_LENGTH as f64;

    // Distance along the whole polyline, so the dash phase carries across corners
    let mut travelled = 0.0_f64;
    for pair in points.windows(2) {
        let (a, b) = (pair[0].as_dvec2(), pair[1].as_dvec2());
        let length = a.distance(b);
        let at = |t: f64| a.lerp(b, t).as_vec2();

        if let Some((t0, t1)) = clip(a, b) {
            if !dashed {
                segment(&mut vertices, at(t0), at(t1), width, color);
            } else {
                let (s0, s1) = (travelled + t0 * length, travelled + t1 * length);
                // Even dash indices are drawn, odd ones are gaps
                let first = (s0 / dash).floor() as u64;
                let last = (s1 / dash).ceil() as u64;
                for k in (first..last).filter(|k| k % 2 == 0) {
                    let from = (k as f64 * dash).max(s0);
                    let to = ((k + 1) as f64 * dash).min(s1);
                    if to > from {
                        segment(
                            &mut vertices,
                            at((from - travelled) / length),
                            at((to - travelled) / length),
                            width,
                            color,
                        );
                    }
                }
            }
        }

        travelled += length;
    }

    vertices
}

/// Triangle list for a whole scene, in draw order
pub fn tessellate(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for command in &scene.commands {
        match command {
            DrawCommand::Polyline {
                points,
                color,
                width,
                dashed,
            } => vertices.extend(polyline(points, *width, *color, *dashed)),
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => vertices.extend(circle(*center, *radius, *color, CIRCLE_SEGMENTS)),
            DrawCommand::Text { .. } => {}
        }
    }
    vertices
}
