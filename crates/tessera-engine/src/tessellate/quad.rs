//! Rectangles and textured quads: 4 corners in TL, TR, BR, BL order.

use crate::coords::{Vec2, Vec3};
use crate::scene::shapes::{ArrayTexturedRect, Point, Rect, TexturedRect};

use super::curve::place;
use super::vertex::{ColorVertex, TexVertex};

/// Unit corner directions, scaled by the half extents.
const CORNERS: [Vec2; 4] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
];

/// Fraction of the texture extent reached at each corner.
const CORNER_UV: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Non-positive dimensions collapse to a zero-area quad.
#[inline]
fn half_extents(dimensions: Vec2) -> Vec2 {
    Vec2::new(dimensions.x.max(0.0), dimensions.y.max(0.0)) * 0.5
}

fn corners(center: &Point, dimensions: Vec2, rotation: f32) -> [Vec3; 4] {
    let half = half_extents(dimensions);
    CORNERS.map(|dir| place(center, dir.scaled(half), rotation))
}

pub(super) fn rect(r: &Rect, out: &mut Vec<ColorVertex>) {
    let color = r.center.color;
    out.extend(
        corners(&r.center, r.dimensions, r.rotation)
            .into_iter()
            .map(|p| ColorVertex::new(p, color)),
    );
}

fn textured(
    center: &Point,
    dimensions: Vec2,
    rotation: f32,
    origin: Vec2,
    extent: Vec2,
    layer: f32,
    out: &mut Vec<TexVertex>,
) {
    let color = center.color;
    let positions = corners(center, dimensions, rotation);
    for (p, t) in positions.into_iter().zip(CORNER_UV) {
        let uv = origin + extent.scaled(t);
        out.push(TexVertex::new(p, color, [uv.x, uv.y, layer]));
    }
}

pub(super) fn texture_2d(r: &TexturedRect, out: &mut Vec<TexVertex>) {
    textured(
        &r.center,
        r.dimensions,
        r.rotation,
        r.texture_origin,
        r.texture_extent,
        0.0,
        out,
    );
}

pub(super) fn texture_2d_array(r: &ArrayTexturedRect, out: &mut Vec<TexVertex>) {
    textured(
        &r.center,
        r.dimensions,
        r.rotation,
        r.texture_origin.xy(),
        r.texture_extent.xy(),
        r.texture_origin.z,
        out,
    );
}
