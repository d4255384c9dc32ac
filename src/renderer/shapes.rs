//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in playfield pixels (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};

/// Obstacle cap dimensions
const CAP_HEIGHT: f32 = 30.0;
const CAP_OVERHANG: f32 = 5.0;
const OUTLINE: f32 = 2.0;

fn push_quad(vertices: &mut Vec<Vertex>, corners: [Vertex; 4]) {
    // corners: top-left, top-right, bottom-right, bottom-left
    let [tl, tr, br, bl] = corners;
    vertices.extend_from_slice(&[tl, tr, bl, bl, tr, br]);
}

/// Solid axis-aligned rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(x, y, w, h, color, color)
}

/// Rectangle with a vertical gradient from `top` to `bottom`
pub fn gradient_rect(x: f32, y: f32, w: f32, h: f32, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [
            Vertex::new(x, y, top),
            Vertex::new(x + w, y, top),
            Vertex::new(x + w, y + h, bottom),
            Vertex::new(x, y + h, bottom),
        ],
    );
    vertices
}

/// Rectangle with a three-stop horizontal gradient
pub fn banded_rect(x: f32, y: f32, w: f32, h: f32, stops: [[f32; 4]; 3]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(12);
    let mid = x + w * 0.5;
    let [left, center, right] = stops;
    push_quad(
        &mut vertices,
        [
            Vertex::new(x, y, left),
            Vertex::new(mid, y, center),
            Vertex::new(mid, y + h, center),
            Vertex::new(x, y + h, left),
        ],
    );
    push_quad(
        &mut vertices,
        [
            Vertex::new(mid, y, center),
            Vertex::new(x + w, y, right),
            Vertex::new(x + w, y + h, right),
            Vertex::new(mid, y + h, center),
        ],
    );
    vertices
}

/// Rectangle border drawn inside the given bounds
pub fn outline_rect(x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(w * 0.5).min(h * 0.5).max(0.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(x, y, w, t, color));
    vertices.extend(rect(x, y + h - t, w, t, color));
    vertices.extend(rect(x, y + t, t, h - 2.0 * t, color));
    vertices.extend(rect(x + w - t, y + t, t, h - 2.0 * t, color));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    radial_circle(center, radius, color, color, segments)
}

/// Filled circle fading from `inner` at the center to `outer` at the rim
pub fn radial_circle(
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, inner, outer, segments)
}

/// Filled ellipse with radii `radii`, rotated by `angle` radians
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    angle: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let rotation = Vec2::from_angle(angle);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let p1 = center + rotation.rotate(Vec2::new(radii.x * theta1.cos(), radii.y * theta1.sin()));
        let p2 = center + rotation.rotate(Vec2::new(radii.x * theta2.cos(), radii.y * theta2.sin()));

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(p1.x, p1.y, outer));
        vertices.push(Vertex::new(p2.x, p2.y, outer));
    }

    vertices
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Rotate vertex positions about `pivot`
pub fn rotate(vertices: &mut [Vertex], pivot: Vec2, angle: f32) {
    if angle == 0.0 {
        return;
    }
    let rotation = Vec2::from_angle(angle);
    for v in vertices {
        let p = rotation.rotate(Vec2::from(v.position) - pivot) + pivot;
        v.position = p.into();
    }
}

/// Textured quad of `size` centered on `center`, rotated by `angle`.
/// `flip_y` mirrors the image vertically.
pub fn sprite_quad(center: Vec2, size: Vec2, angle: f32, flip_y: bool) -> Vec<Vertex> {
    let half = size * 0.5;
    let (v0, v1) = if flip_y { (1.0, 0.0) } else { (0.0, 1.0) };
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [
            Vertex::textured(center.x - half.x, center.y - half.y, 0.0, v0),
            Vertex::textured(center.x + half.x, center.y - half.y, 1.0, v0),
            Vertex::textured(center.x + half.x, center.y + half.y, 1.0, v1),
            Vertex::textured(center.x - half.x, center.y + half.y, 0.0, v1),
        ],
    );
    rotate(&mut vertices, center, angle);
    vertices
}

/// Textured disc: the image's inscribed circle mapped onto `radius`
pub fn sprite_disc(center: Vec2, radius: f32, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let rim = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        let dir = Vec2::from_angle(theta);
        let p = center + dir * radius;
        Vertex::textured(p.x, p.y, 0.5 + 0.5 * dir.x, 0.5 + 0.5 * dir.y)
    };
    for i in 0..segments {
        vertices.push(Vertex::textured(center.x, center.y, 0.5, 0.5));
        vertices.push(rim(i));
        vertices.push(rim(i + 1));
    }
    vertices
}

/// Puffy cloud: four overlapping circles anchored at (x, y)
pub fn cloud(x: f32, y: f32, size: f32) -> Vec<Vertex> {
    let puffs = [
        (0.0, 0.0, 0.5),
        (0.4, -0.2, 0.4),
        (0.8, 0.0, 0.5),
        (0.6, 0.2, 0.4),
    ];
    puffs
        .iter()
        .flat_map(|&(dx, dy, r)| {
            circle(
                Vec2::new(x + size * dx, y + size * dy),
                size * r,
                colors::CLOUD,
                20,
            )
        })
        .collect()
}

/// Ground strip with a row of grass tufts along its top edge
pub fn ground(width: f32, ground_y: f32, height: f32) -> Vec<Vertex> {
    let mut vertices = rect(0.0, ground_y, width, (height - ground_y).max(0.0), colors::GROUND);
    let mut x = 0.0;
    while x < width {
        vertices.extend(circle(Vec2::new(x, ground_y), 15.0, colors::GRASS, 12));
        x += 30.0;
    }
    vertices
}

/// One obstacle segment with its cap on the gap side
pub fn pipe_segment(x: f32, y: f32, w: f32, h: f32, cap_at_bottom: bool) -> Vec<Vertex> {
    if h <= 0.0 {
        return Vec::new();
    }
    let mut vertices = banded_rect(
        x,
        y,
        w,
        h,
        [colors::PIPE_LIGHT, colors::PIPE_MID, colors::PIPE_DARK],
    );
    vertices.extend(outline_rect(x, y, w, h, OUTLINE, colors::PIPE_OUTLINE));

    let cap_h = CAP_HEIGHT.min(h);
    let cap_x = x - CAP_OVERHANG;
    let cap_w = w + 2.0 * CAP_OVERHANG;
    let cap_y = if cap_at_bottom { y + h - cap_h } else { y };
    vertices.extend(gradient_rect(
        cap_x,
        cap_y,
        cap_w,
        cap_h,
        colors::PIPE_CAP,
        colors::PIPE_LIGHT,
    ));
    vertices.extend(outline_rect(cap_x, cap_y, cap_w, cap_h, OUTLINE, colors::PIPE_OUTLINE));
    vertices
}

/// Built-in bird drawn when no player image is available
pub fn bird(center: Vec2, size: f32, angle: f32) -> Vec<Vertex> {
    let r = size * 0.5;
    let s = size / 50.0;
    let at = |dx: f32, dy: f32| center + Vec2::new(dx, dy) * s;

    let mut vertices = radial_circle(center, r, colors::BIRD_CENTER, colors::BIRD_EDGE, 32);
    vertices.extend(ellipse(
        at(-5.0, 5.0),
        Vec2::new(12.0, 8.0) * s,
        -0.3,
        colors::BIRD_WING,
        colors::BIRD_WING,
        16,
    ));
    vertices.extend(ellipse(
        at(8.0, -5.0),
        Vec2::new(10.0, 12.0) * s,
        0.0,
        colors::EYE,
        colors::EYE,
        16,
    ));
    vertices.extend(circle(at(10.0, -5.0), 5.0 * s, colors::PUPIL, 12));
    vertices.extend(circle(at(12.0, -7.0), 2.0 * s, colors::EYE, 8));
    vertices.extend(triangle(
        at(20.0, 0.0),
        at(37.0, 3.0),
        at(20.0, 8.0),
        colors::BEAK,
    ));

    rotate(&mut vertices, center, angle);
    vertices
}
