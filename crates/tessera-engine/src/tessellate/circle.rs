use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::scene::shapes::Circle;

use super::Tessellation;
use super::curve::{MIN_CURVE_SEGMENTS, emit_collapsed_fan, emit_fan, segments_for_radius};
use super::vertex::ColorVertex;

/// Number of distinct rim points used for `radius` within a budget of `rim` slots.
pub(super) fn effective_segments(radius: f32, quality: &Tessellation) -> u32 {
    let rim = quality.curve_segments;
    segments_for_radius(radius, quality.tolerance).clamp(MIN_CURVE_SEGMENTS.min(rim), rim)
}

/// Triangle fan with `curve_segments` rim slots.
///
/// Only `effective_segments` distinct rim points are produced; the remaining
/// slots repeat the last one, so small circles cost degenerate triangles
/// instead of a different per-object vertex count.
pub(super) fn circle(c: &Circle, quality: &Tessellation, out: &mut Vec<ColorVertex>) {
    let rim = quality.curve_segments;
    if !(c.radius.is_finite() && c.radius > 0.0) {
        emit_collapsed_fan(&c.center, rim, out);
        return;
    }

    let n = effective_segments(c.radius, quality);
    let step = TAU / n as f32;
    let points = (0..rim).map(|j| {
        let k = j.min(n - 1) as f32;
        let (sin, cos) = (k * step).sin_cos();
        Vec2::new(cos, sin) * c.radius
    });
    emit_fan(&c.center, 0.0, points, out);
}
