//! Shared curve math for fan-shaped primitives.

use std::f32::consts::PI;

use crate::coords::{Vec2, Vec3};
use crate::scene::shapes::Point;

use super::vertex::ColorVertex;

/// Lower bound on full-circle segments for any visible circle.
pub(super) const MIN_CURVE_SEGMENTS: u32 = 8;

/// Lower bound on segments per rounded corner with a non-zero radius.
pub(super) const MIN_CORNER_SEGMENTS: u32 = 2;

/// Segments a full circle of `radius` needs so that no chord deviates from
/// the true arc by more than `tolerance` pixels.
///
/// Solves `r * (1 - cos(pi / n)) <= tolerance` for `n`. Returns 0 for
/// non-positive or NaN radii; callers clamp into their vertex budget.
pub fn segments_for_radius(radius: f32, tolerance: f32) -> u32 {
    if radius.is_nan() || radius <= 0.0 {
        return 0;
    }
    let cos_half = (1.0 - tolerance / radius).clamp(-1.0, 1.0);
    let half_angle = cos_half.acos();
    if half_angle <= 0.0 {
        return u32::MAX;
    }
    // Saturating float-to-int cast.
    (PI / half_angle).ceil() as u32
}

/// Maps a local offset into world space: rotate about the center, then translate.
#[inline]
pub(super) fn place(center: &Point, offset: Vec2, rotation: f32) -> Vec3 {
    center.position.offset(offset.rotated(rotation))
}

/// Emits a hub vertex followed by `rim` vertices, all sharing the center color.
pub(super) fn emit_fan(
    center: &Point,
    rotation: f32,
    rim: impl IntoIterator<Item = Vec2>,
    out: &mut Vec<ColorVertex>,
) {
    out.push(ColorVertex::new(center.position, center.color));
    out.extend(
        rim.into_iter()
            .map(|offset| ColorVertex::new(place(center, offset, rotation), center.color)),
    );
}

/// Emits a fan whose every vertex sits on the center: valid, zero-area geometry.
pub(super) fn emit_collapsed_fan(center: &Point, rim: u32, out: &mut Vec<ColorVertex>) {
    let v = ColorVertex::new(center.position, center.color);
    out.extend(std::iter::repeat_n(v, rim as usize + 1));
}
