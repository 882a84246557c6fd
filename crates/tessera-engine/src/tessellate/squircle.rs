use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::scene::shapes::Squircle;

use super::Tessellation;
use super::curve::{emit_collapsed_fan, emit_fan};
use super::vertex::ColorVertex;

/// `sgn(v) * |v|^p`, keeping the quadrant of the sampled angle.
#[inline]
fn signed_pow(v: f32, p: f32) -> f32 {
    v.signum() * v.abs().powf(p)
}

/// Offset of the superellipse boundary at parameter angle `t` (before rotation).
#[inline]
pub(super) fn boundary_point(t: f32, semi_axes: Vec2, exponent: f32) -> Vec2 {
    let p = 2.0 / exponent;
    let (sin, cos) = t.sin_cos();
    Vec2::new(signed_pow(cos, p), signed_pow(sin, p)).scaled(semi_axes)
}

/// Triangle fan sampling `|x/a|^e + |y/b|^e = 1` at `curve_segments` equal
/// angular steps. The boundary is star-shaped around the center for every
/// positive exponent, so a fan covers concave (`e < 1`) shapes too.
pub(super) fn squircle(s: &Squircle, quality: &Tessellation, out: &mut Vec<ColorVertex>) {
    let rim = quality.curve_segments;
    if !(s.exponent.is_finite() && s.exponent > 0.0) {
        emit_collapsed_fan(&s.center, rim, out);
        return;
    }

    let semi_axes = Vec2::new(s.dimensions.x.max(0.0), s.dimensions.y.max(0.0)) * 0.5;
    let step = TAU / rim as f32;
    let points = (0..rim).map(|j| boundary_point(j as f32 * step, semi_axes, s.exponent));
    emit_fan(&s.center, s.rotation, points, out);
}
