use std::f32::consts::{FRAC_PI_2, PI};

use crate::coords::Vec2;
use crate::scene::shapes::RoundRect;

use super::Tessellation;
use super::curve::{MIN_CORNER_SEGMENTS, emit_fan, segments_for_radius};
use super::vertex::ColorVertex;

/// Corner arcs in rim order (clockwise on screen, +Y down):
/// `(sign of the arc center relative to the rect center, start angle)`.
const ARCS: [(Vec2, f32); 4] = [
    (Vec2::new(1.0, -1.0), -FRAC_PI_2), // top-right
    (Vec2::new(1.0, 1.0), 0.0),         // bottom-right
    (Vec2::new(-1.0, 1.0), FRAC_PI_2),  // bottom-left
    (Vec2::new(-1.0, -1.0), PI),        // top-left
];

/// Segments per quarter arc for `radius`, within `[2, corner_segments]`.
pub(super) fn corner_segments(radius: f32, quality: &Tessellation) -> u32 {
    let budget = quality.corner_segments;
    if !(radius > 0.0) {
        return 1;
    }
    segments_for_radius(radius, quality.tolerance)
        .div_ceil(4)
        .clamp(MIN_CORNER_SEGMENTS.min(budget), budget)
}

/// Triangle fan over four corner arcs, each owning `corner_segments + 1` rim slots.
///
/// A zero corner radius puts every arc slot on its rectangle corner, which
/// degenerates to a plain rectangle.
pub(super) fn round_rect(r: &RoundRect, quality: &Tessellation, out: &mut Vec<ColorVertex>) {
    let half = Vec2::new(r.dimensions.x.max(0.0), r.dimensions.y.max(0.0)) * 0.5;
    let radius = r.effective_corner_radius();
    let slots = quality.corner_segments;
    let n = corner_segments(radius, quality);
    let inset = Vec2::new(half.x - radius, half.y - radius);

    let rim = ARCS.iter().flat_map(move |&(sign, start)| {
        let arc_center = sign.scaled(inset);
        (0..=slots).map(move |j| {
            let t = j.min(n) as f32 / n as f32;
            let (sin, cos) = (start + t * FRAC_PI_2).sin_cos();
            arc_center + Vec2::new(cos, sin) * radius
        })
    });
    emit_fan(&r.center, r.rotation, rim, out);
}
