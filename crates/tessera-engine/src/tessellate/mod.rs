//! Tessellator: shape descriptors to GPU-ready vertices.
//!
//! Pure and deterministic. Each [`PrimitiveKind`] has a fixed per-object
//! [`Topology`] (vertex count, index pattern, stride) for a given
//! [`Tessellation`] quality, which is what lets object buffers address and
//! re-upload any object by index.

mod basic;
mod circle;
mod curve;
mod quad;
mod round_rect;
mod squircle;
mod topology;
mod vertex;

use crate::scene::Shape;

pub use curve::segments_for_radius;
pub use topology::{Primitive, Topology};
pub use vertex::{ColorVertex, TexVertex};

/// Curve quality settings, fixed per object buffer.
///
/// Circle and rounded-rect segment counts adapt to the radius (chord error
/// below `tolerance`) but never exceed the slot budgets here, which fix the
/// per-object vertex count.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tessellation {
    /// Rim vertex slots for circles and squircles.
    pub curve_segments: u32,

    /// Segment slots per rounded-rect corner.
    pub corner_segments: u32,

    /// Maximum distance in logical pixels between a chord and its arc.
    pub tolerance: f32,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            curve_segments: 64,
            corner_segments: 12,
            tolerance: 0.25,
        }
    }
}

impl Tessellation {
    const MIN_CURVE_SLOTS: u32 = 3;
    const MAX_CURVE_SLOTS: u32 = 4096;
    const MAX_CORNER_SLOTS: u32 = 1024;

    /// Pulls every field into its valid range.
    pub fn clamped(self) -> Self {
        let fallback = Self::default();
        Self {
            curve_segments: self.curve_segments.clamp(Self::MIN_CURVE_SLOTS, Self::MAX_CURVE_SLOTS),
            corner_segments: self.corner_segments.clamp(1, Self::MAX_CORNER_SLOTS),
            tolerance: if self.tolerance.is_finite() && self.tolerance > 0.0 {
                self.tolerance
            } else {
                fallback.tolerance
            },
        }
    }

    /// Like [`clamped`](Self::clamped), warning when anything had to change.
    pub fn sanitized(self) -> Self {
        let clamped = self.clamped();
        if clamped != self {
            log::warn!("tessellation settings {self:?} out of range; using {clamped:?}");
        }
        clamped
    }
}

/// Vertices of one tessellated object.
#[derive(Debug, Clone, PartialEq)]
pub enum Mesh {
    Color(Vec<ColorVertex>),
    Textured(Vec<TexVertex>),
}

impl Mesh {
    /// Raw bytes, laid out exactly as uploaded.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Mesh::Color(v) => bytemuck::cast_slice(v),
            Mesh::Textured(v) => bytemuck::cast_slice(v),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Mesh::Color(v) => v.len(),
            Mesh::Textured(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> Vec<[f32; 3]> {
        match self {
            Mesh::Color(v) => v.iter().map(|v| v.position).collect(),
            Mesh::Textured(v) => v.iter().map(|v| v.position).collect(),
        }
    }
}

/// Tessellates one object. Always yields `Topology::of(shape.kind(), quality).vertices` vertices.
pub fn tessellate(shape: &Shape, quality: &Tessellation) -> Mesh {
    let quality = quality.clamped();
    let topology = Topology::of(shape.kind(), &quality);
    let capacity = topology.vertices as usize;

    let mesh = match shape {
        Shape::Texture2D(r) => Mesh::Textured(textured(capacity, |out| quad::texture_2d(r, out))),
        Shape::Texture2DArray(r) => {
            Mesh::Textured(textured(capacity, |out| quad::texture_2d_array(r, out)))
        }
        Shape::Point(p) => Mesh::Color(colored(capacity, |out| basic::point(p, out))),
        Shape::Line(l) => Mesh::Color(colored(capacity, |out| basic::line(l, out))),
        Shape::Triangle(t) => Mesh::Color(colored(capacity, |out| basic::triangle(t, out))),
        Shape::Rect(r) => Mesh::Color(colored(capacity, |out| quad::rect(r, out))),
        Shape::RoundRect(r) => {
            Mesh::Color(colored(capacity, |out| round_rect::round_rect(r, &quality, out)))
        }
        Shape::Circle(c) => Mesh::Color(colored(capacity, |out| circle::circle(c, &quality, out))),
        Shape::Squircle(s) => {
            Mesh::Color(colored(capacity, |out| squircle::squircle(s, &quality, out)))
        }
    };

    debug_assert_eq!(mesh.len(), capacity, "{:?} tessellated to the wrong size", shape.kind());
    mesh
}

#[inline]
fn colored(capacity: usize, emit: impl FnOnce(&mut Vec<ColorVertex>)) -> Vec<ColorVertex> {
    let mut out = Vec::with_capacity(capacity);
    emit(&mut out);
    out
}

#[inline]
fn textured(capacity: usize, emit: impl FnOnce(&mut Vec<TexVertex>)) -> Vec<TexVertex> {
    let mut out = Vec::with_capacity(capacity);
    emit(&mut out);
    out
}

/// Distinct rim points a circle of `radius` gets under `quality`.
pub fn circle_segments(radius: f32, quality: &Tessellation) -> u32 {
    if radius.is_finite() && radius > 0.0 {
        circle::effective_segments(radius, &quality.clamped())
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::coords::{ColorRgba, Vec2, Vec3};
    use crate::scene::PrimitiveKind;
    use crate::scene::shapes::{
        ArrayTexturedRect, Circle, Line, Point, Rect, RoundRect, Squircle, TexturedRect, Triangle,
    };

    const RED: ColorRgba = ColorRgba::rgb(1.0, 0.0, 0.0);

    fn center() -> Point {
        Point::at(400.0, 300.0, RED)
    }

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Point::at(1.0, 2.0, RED).into(),
            Line::new(Point::at(0.0, 0.0, RED), Point::at(10.0, 0.0, RED)).into(),
            Triangle::new(Point::at(0.0, 0.0, RED), Point::at(10.0, 0.0, RED), Point::at(0.0, 10.0, RED))
                .into(),
            Rect::new(center(), Vec2::new(100.0, 50.0)).rotated(0.3).into(),
            RoundRect::new(center(), Vec2::new(100.0, 50.0), 12.0).into(),
            Circle::new(center(), 50.0).into(),
            Squircle::new(center(), Vec2::new(80.0, 80.0), 4.0).into(),
            TexturedRect::new(center(), Vec2::new(64.0, 64.0)).into(),
            ArrayTexturedRect::new(center(), Vec2::new(64.0, 64.0), 2).into(),
        ]
    }

    fn dist(p: [f32; 3], c: Point) -> f32 {
        (p[0] - c.position.x).hypot(p[1] - c.position.y)
    }

    // ── topology agreement ────────────────────────────────────────────────

    #[test]
    fn every_kind_matches_its_topology() {
        let q = Tessellation::default();
        for shape in sample_shapes() {
            let topo = Topology::of(shape.kind(), &q);
            let mesh = tessellate(&shape, &q);
            assert_eq!(mesh.len() as u32, topo.vertices, "{:?}", shape.kind());
            assert_eq!(mesh.as_bytes().len() as u64, topo.object_bytes(), "{:?}", shape.kind());
        }
    }

    #[test]
    fn every_kind_is_covered_by_samples() {
        let kinds: Vec<_> = sample_shapes().iter().map(Shape::kind).collect();
        for kind in PrimitiveKind::ALL {
            assert!(kinds.contains(&kind), "{kind:?} missing");
        }
    }

    #[test]
    fn tessellation_is_deterministic() {
        let q = Tessellation::default();
        for shape in sample_shapes() {
            assert_eq!(tessellate(&shape, &q).as_bytes(), tessellate(&shape, &q).as_bytes());
        }
    }

    // ── rect / textured ───────────────────────────────────────────────────

    #[test]
    fn rect_corners_are_centered() {
        let mesh = tessellate(&Rect::new(center(), Vec2::new(100.0, 50.0)).into(), &Tessellation::default());
        assert_eq!(
            mesh.positions(),
            vec![
                [350.0, 275.0, 0.0],
                [450.0, 275.0, 0.0],
                [450.0, 325.0, 0.0],
                [350.0, 325.0, 0.0],
            ]
        );
    }

    #[test]
    fn rect_rotation_turns_around_center() {
        let r = Rect::new(center(), Vec2::new(100.0, 50.0)).rotated(FRAC_PI_2);
        let p = tessellate(&r.into(), &Tessellation::default()).positions();
        // Top-left (-50, -25) turns to (25, -50).
        assert_abs_diff_eq!(p[0][0], 425.0, epsilon = 1e-3);
        assert_abs_diff_eq!(p[0][1], 250.0, epsilon = 1e-3);
    }

    #[test]
    fn rect_keeps_depth_and_color() {
        let c = Point::new(Vec3::new(5.0, 5.0, 0.75), ColorRgba::new(0.1, 0.2, 0.3, 0.4));
        let Mesh::Color(v) = tessellate(&Rect::new(c, Vec2::new(2.0, 2.0)).into(), &Tessellation::default())
        else {
            panic!("rect must be flat colored");
        };
        assert!(v.iter().all(|v| v.position[2] == 0.75 && v.color == [0.1, 0.2, 0.3, 0.4]));
    }

    #[test]
    fn negative_dimensions_collapse_rect() {
        let mesh = tessellate(&Rect::new(center(), Vec2::new(-5.0, 10.0)).into(), &Tessellation::default());
        assert!(mesh.positions().iter().all(|p| p[0] == 400.0));
    }

    #[test]
    fn texture_uv_spans_region() {
        let r = TexturedRect::new(center(), Vec2::new(10.0, 10.0))
            .with_region(Vec2::new(0.25, 0.5), Vec2::new(0.5, 0.25));
        let Mesh::Textured(v) = tessellate(&r.into(), &Tessellation::default()) else {
            panic!("textured rect must carry uv");
        };
        let uv: Vec<_> = v.iter().map(|v| v.uv).collect();
        assert_eq!(
            uv,
            vec![[0.25, 0.5, 0.0], [0.75, 0.5, 0.0], [0.75, 0.75, 0.0], [0.25, 0.75, 0.0]]
        );
    }

    #[test]
    fn array_texture_carries_constant_layer() {
        let r = ArrayTexturedRect::new(center(), Vec2::new(10.0, 10.0), 3);
        let Mesh::Textured(v) = tessellate(&r.into(), &Tessellation::default()) else {
            panic!("array rect must carry uv");
        };
        assert!(v.iter().all(|v| v.uv[2] == 3.0));
        assert_eq!(v[2].uv, [1.0, 1.0, 3.0]);
    }

    // ── circle ────────────────────────────────────────────────────────────

    #[test]
    fn circle_rim_lies_on_radius() {
        let c = Circle::new(center(), 50.0);
        let p = tessellate(&c.into(), &Tessellation::default()).positions();
        assert_eq!(p[0], [400.0, 300.0, 0.0]);
        for rim in &p[1..] {
            assert_abs_diff_eq!(dist(*rim, c.center), 50.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn circle_zero_radius_collapses_to_center() {
        let p = tessellate(&Circle::new(center(), 0.0).into(), &Tessellation::default()).positions();
        assert_eq!(p.len(), 65);
        assert!(p.iter().all(|p| *p == [400.0, 300.0, 0.0]));
    }

    #[test]
    fn small_circle_pads_rim_with_last_point() {
        let q = Tessellation::default();
        let n = circle_segments(4.0, &q) as usize;
        assert!(n < q.curve_segments as usize);
        let p = tessellate(&Circle::new(center(), 4.0).into(), &q).positions();
        // Hub, n distinct rim points, then repeats of the last.
        assert!(p[n + 1..].iter().all(|v| *v == p[n]));
        assert_ne!(p[n], p[n - 1]);
    }

    #[test]
    fn circle_segments_respect_budget_and_floor() {
        let q = Tessellation::default();
        assert_eq!(circle_segments(0.01, &q), 8);
        assert_eq!(circle_segments(50.0, &q), 32);
        assert_eq!(circle_segments(10_000.0, &q), 64);
        assert_eq!(circle_segments(-1.0, &q), 0);
    }

    // ── round rect ────────────────────────────────────────────────────────

    #[test]
    fn round_rect_zero_radius_is_plain_rect() {
        let r = RoundRect::new(center(), Vec2::new(100.0, 50.0), 0.0);
        let p = tessellate(&r.into(), &Tessellation::default()).positions();
        let corners = [[450.0, 275.0], [450.0, 325.0], [350.0, 325.0], [350.0, 275.0]];
        for rim in &p[1..] {
            assert!(
                corners.iter().any(|c| (c[0] - rim[0]).abs() < 1e-3 && (c[1] - rim[1]).abs() < 1e-3),
                "{rim:?} is not a rect corner"
            );
        }
    }

    #[test]
    fn round_rect_stays_inside_bounds() {
        let r = RoundRect::new(center(), Vec2::new(100.0, 50.0), 500.0);
        let p = tessellate(&r.into(), &Tessellation::default()).positions();
        for v in &p {
            assert!(v[0] >= 350.0 - 1e-3 && v[0] <= 450.0 + 1e-3);
            assert!(v[1] >= 275.0 - 1e-3 && v[1] <= 325.0 + 1e-3);
        }
        // Radius clamped to 25: the rim touches the middle of the short sides.
        assert!(p.iter().any(|v| (v[0] - 450.0).abs() < 1e-3 && (v[1] - 300.0).abs() < 1e-3));
    }

    #[test]
    fn round_rect_arcs_keep_radius() {
        let r = RoundRect::new(center(), Vec2::new(100.0, 60.0), 10.0);
        let p = tessellate(&r.into(), &Tessellation::default()).positions();
        // First arc (top-right) is centered at (440, 280).
        for v in &p[1..=13] {
            assert_abs_diff_eq!((v[0] - 440.0).hypot(v[1] - 280.0), 10.0, epsilon = 1e-3);
        }
    }

    // ── squircle ──────────────────────────────────────────────────────────

    #[test]
    fn squircle_exponent_two_is_ellipse() {
        let s = Squircle::new(center(), Vec2::new(100.0, 100.0), 2.0);
        let p = tessellate(&s.into(), &Tessellation::default()).positions();
        for rim in &p[1..] {
            assert_abs_diff_eq!(dist(*rim, s.center), 50.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn squircle_satisfies_superellipse_equation() {
        let s = Squircle::new(center(), Vec2::new(120.0, 60.0), 5.0);
        let p = tessellate(&s.into(), &Tessellation::default()).positions();
        for rim in &p[1..] {
            let x = ((rim[0] - 400.0) / 60.0).abs();
            let y = ((rim[1] - 300.0) / 30.0).abs();
            assert_abs_diff_eq!(x.powf(5.0) + y.powf(5.0), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn squircle_below_one_is_concave_star() {
        let s = Squircle::new(center(), Vec2::new(100.0, 100.0), 0.5);
        let q = Tessellation { curve_segments: 8, ..Tessellation::default() };
        let p = tessellate(&s.into(), &q).positions();
        // Axis points reach the full radius, diagonals are pulled far inward.
        assert_abs_diff_eq!(dist(p[1], s.center), 50.0, epsilon = 1e-3);
        assert!(dist(p[2], s.center) < 20.0);
    }

    #[test]
    fn squircle_non_positive_exponent_collapses() {
        for e in [0.0, -1.0, f32::NAN] {
            let s = Squircle::new(center(), Vec2::new(100.0, 100.0), e);
            let p = tessellate(&s.into(), &Tessellation::default()).positions();
            assert!(p.iter().all(|p| *p == [400.0, 300.0, 0.0]));
        }
    }

    // ── quality settings ──────────────────────────────────────────────────

    #[test]
    fn clamped_repairs_invalid_settings() {
        let q = Tessellation { curve_segments: 0, corner_segments: 0, tolerance: f32::NAN }.clamped();
        assert_eq!(q.curve_segments, 3);
        assert_eq!(q.corner_segments, 1);
        assert_eq!(q.tolerance, Tessellation::default().tolerance);
    }

    #[test]
    fn clamped_keeps_valid_settings() {
        let q = Tessellation { curve_segments: 24, corner_segments: 4, tolerance: 1.0 };
        assert_eq!(q.clamped(), q);
    }
}
