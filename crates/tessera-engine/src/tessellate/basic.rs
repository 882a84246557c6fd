//! Point, line and triangle: one vertex per input point, drawn directly.

use crate::scene::shapes::{Line, Point, Triangle};

use super::vertex::ColorVertex;

#[inline]
fn vertex(p: &Point) -> ColorVertex {
    ColorVertex::new(p.position, p.color)
}

pub(super) fn point(p: &Point, out: &mut Vec<ColorVertex>) {
    out.push(vertex(p));
}

pub(super) fn line(l: &Line, out: &mut Vec<ColorVertex>) {
    out.extend([vertex(&l.start), vertex(&l.end)]);
}

pub(super) fn triangle(t: &Triangle, out: &mut Vec<ColorVertex>) {
    out.extend(t.points.iter().map(vertex));
}
