//! CPU side of an object buffer: descriptors, fill state and the vertex mirror.
//!
//! Holds no GPU handles. [`ObjectBuffer`](super::ObjectBuffer) uploads the byte
//! ranges this store reports; every check that can fail happens here, before any
//! state is touched.

use std::ops::Range;

use crate::error::ContractViolation;
use crate::scene::{PrimitiveKind, Shape};
use crate::tessellate::{Tessellation, Topology, tessellate};

/// Element range for one draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawRange {
    /// Index range for `draw_indexed`.
    Indexed(Range<u32>),
    /// Vertex range for `draw`.
    Direct(Range<u32>),
}

impl DrawRange {
    pub fn is_empty(&self) -> bool {
        match self {
            DrawRange::Indexed(r) | DrawRange::Direct(r) => r.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectStore {
    kind: PrimitiveKind,
    quality: Tessellation,
    topology: Topology,

    /// `None` marks a slot never filled since creation or growth.
    objects: Vec<Option<Shape>>,
    vertices: Vec<u8>,
    indices: Vec<u32>,
}

impl ObjectStore {
    /// Tessellates `objects` into a store of capacity `objects.len()`.
    pub fn new(
        kind: PrimitiveKind,
        quality: Tessellation,
        objects: &[Shape],
    ) -> Result<Self, ContractViolation> {
        if objects.is_empty() {
            return Err(ContractViolation::Empty);
        }
        check_kinds(kind, 0, objects)?;

        let quality = quality.clamped();
        let topology = Topology::of(kind, &quality);
        let mut store = Self {
            kind,
            quality,
            topology,
            objects: vec![None; objects.len()],
            vertices: vec![0; objects.len() * topology.object_bytes() as usize],
            indices: topology.indices_for(objects.len() as u32),
        };
        store.write(0, objects)?;
        Ok(store)
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.objects.len()
    }

    /// Number of slots holding data.
    pub fn filled(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    #[inline]
    pub fn is_filled(&self, index: usize) -> bool {
        matches!(self.objects.get(index), Some(Some(_)))
    }

    /// Descriptor last written to slot `index`.
    pub fn object(&self, index: usize) -> Option<&Shape> {
        self.objects.get(index).and_then(Option::as_ref)
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn tessellation(&self) -> Tessellation {
        self.quality
    }

    /// The whole vertex mirror, laid out as on the GPU.
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertices
    }

    /// Absolute indices for every slot; empty for direct kinds.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Byte range of slots `start..start + count` in the vertex mirror.
    pub fn byte_range(&self, start: usize, count: usize) -> Range<usize> {
        let bytes = self.topology.object_bytes() as usize;
        start * bytes..(start + count) * bytes
    }

    // ── writes ────────────────────────────────────────────────────────────

    /// Re-tessellates slots `start..start + objects.len()`.
    ///
    /// Returns the byte range that changed in [`vertex_bytes`](Self::vertex_bytes).
    /// Nothing is modified when a check fails.
    pub fn write(
        &mut self,
        start: usize,
        objects: &[Shape],
    ) -> Result<Range<usize>, ContractViolation> {
        self.check_range(start, objects.len())?;
        check_kinds(self.kind, start, objects)?;

        let bytes = self.topology.object_bytes() as usize;
        for (i, shape) in objects.iter().enumerate() {
            let slot = start + i;
            let mesh = tessellate(shape, &self.quality);
            self.vertices[slot * bytes..(slot + 1) * bytes].copy_from_slice(mesh.as_bytes());
            self.objects[slot] = Some(*shape);
        }
        Ok(self.byte_range(start, objects.len()))
    }

    /// Re-tessellates every slot. `objects` must match the capacity exactly.
    pub fn fill(&mut self, objects: &[Shape]) -> Result<Range<usize>, ContractViolation> {
        if objects.len() != self.capacity() {
            return Err(ContractViolation::LengthMismatch {
                expected: self.capacity(),
                actual: objects.len(),
            });
        }
        self.write(0, objects)
    }

    /// Changes the capacity.
    ///
    /// With `preserve`, slots below `min(old, new)` keep their data. Grown slots
    /// are zeroed and unfilled either way, so data dropped by a shrink never
    /// comes back on a later grow. Without `preserve` every slot is unfilled.
    pub fn resize(&mut self, new_capacity: usize, preserve: bool) -> Result<(), ContractViolation> {
        if new_capacity == 0 {
            return Err(ContractViolation::Empty);
        }

        let bytes = self.topology.object_bytes() as usize;
        if preserve {
            self.objects.resize(new_capacity, None);
            self.vertices.resize(new_capacity * bytes, 0);
        } else {
            self.objects = vec![None; new_capacity];
            self.vertices = vec![0; new_capacity * bytes];
        }
        self.indices = self.topology.indices_for(new_capacity as u32);
        Ok(())
    }

    // ── draws ─────────────────────────────────────────────────────────────

    /// Draw range for slots `start..start + count`; every slot must be filled.
    pub fn draw_range(&self, start: usize, count: usize) -> Result<DrawRange, ContractViolation> {
        self.check_range(start, count)?;
        if let Some(index) = (start..start + count).find(|&i| !self.is_filled(i)) {
            return Err(ContractViolation::Unfilled { index });
        }

        let t = self.topology;
        let (start, end) = (start as u32, (start + count) as u32);
        Ok(if t.is_indexed() {
            DrawRange::Indexed(start * t.indices..end * t.indices)
        } else {
            DrawRange::Direct(start * t.vertices..end * t.vertices)
        })
    }

    /// Draw range covering the whole capacity.
    pub fn full_draw_range(&self) -> Result<DrawRange, ContractViolation> {
        self.draw_range(0, self.capacity())
    }

    fn check_range(&self, start: usize, count: usize) -> Result<(), ContractViolation> {
        let capacity = self.capacity();
        match start.checked_add(count) {
            Some(end) if end <= capacity => Ok(()),
            end => Err(ContractViolation::OutOfRange {
                start,
                end: end.unwrap_or(usize::MAX),
                capacity,
            }),
        }
    }
}

fn check_kinds(
    kind: PrimitiveKind,
    start: usize,
    objects: &[Shape],
) -> Result<(), ContractViolation> {
    match objects.iter().position(|o| o.kind() != kind) {
        None => Ok(()),
        Some(i) => Err(ContractViolation::KindMismatch {
            index: start + i,
            expected: kind,
            found: objects[i].kind(),
        }),
    }
}

/// Vertex and index buffer sizes in bytes for `capacity` objects, or `None` on overflow.
pub fn buffer_sizes(topology: &Topology, capacity: usize) -> Option<(u64, u64)> {
    let capacity = u64::try_from(capacity).ok()?;
    let vertex_bytes = capacity.checked_mul(topology.object_bytes())?;
    let index_bytes = capacity
        .checked_mul(topology.indices as u64)?
        .checked_mul(std::mem::size_of::<u32>() as u64)?;
    // Vertex ids and draw-range index bounds are u32.
    capacity.checked_mul(topology.vertices as u64).filter(|&v| v <= u32::MAX as u64)?;
    capacity.checked_mul(topology.indices as u64).filter(|&i| i <= u32::MAX as u64)?;
    Some((vertex_bytes, index_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ColorRgba, Vec2};
    use crate::scene::shapes::{Circle, Point, Rect};
    use crate::tessellate::ColorVertex;

    const WHITE: ColorRgba = ColorRgba::white();

    fn circle(radius: f32) -> Shape {
        Circle::new(Point::at(400.0, 300.0, WHITE), radius).into()
    }

    fn circles(n: usize, radius: f32) -> Vec<Shape> {
        vec![circle(radius); n]
    }

    fn radius_of(store: &ObjectStore, i: usize) -> f32 {
        match store.object(i) {
            Some(Shape::Circle(c)) => c.radius,
            other => panic!("slot {i} holds {other:?}"),
        }
    }

    fn points(n: usize) -> Vec<Shape> {
        (0..n).map(|i| Point::at(i as f32, 0.0, WHITE).into()).collect()
    }

    fn store(objects: &[Shape]) -> ObjectStore {
        ObjectStore::new(objects[0].kind(), Tessellation::default(), objects).unwrap()
    }

    // ── create ────────────────────────────────────────────────────────────

    #[test]
    fn create_sizes_storage_by_topology() {
        let s = store(&circles(4, 50.0));
        let t = s.topology();
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.filled(), 4);
        assert_eq!(s.vertex_bytes().len() as u64, 4 * t.vertices as u64 * t.stride);
        assert_eq!(s.indices().len(), 4 * t.indices as usize);
    }

    #[test]
    fn create_rejects_empty() {
        let err = ObjectStore::new(PrimitiveKind::Circle, Tessellation::default(), &[]).unwrap_err();
        assert_eq!(err, ContractViolation::Empty);
    }

    #[test]
    fn create_rejects_kind_mismatch() {
        let mut objects = circles(3, 10.0);
        objects[2] = Point::at(0.0, 0.0, WHITE).into();
        let err = ObjectStore::new(PrimitiveKind::Circle, Tessellation::default(), &objects).unwrap_err();
        assert_eq!(
            err,
            ContractViolation::KindMismatch {
                index: 2,
                expected: PrimitiveKind::Circle,
                found: PrimitiveKind::Point,
            }
        );
    }

    #[test]
    fn create_sanitizes_quality() {
        let q = Tessellation { curve_segments: 1, ..Tessellation::default() };
        let s = ObjectStore::new(PrimitiveKind::Circle, q, &circles(1, 5.0)).unwrap();
        assert_eq!(s.tessellation().curve_segments, 3);
        assert_eq!(s.topology().vertices, 4);
    }

    // ── render ranges ─────────────────────────────────────────────────────

    #[test]
    fn full_render_covers_every_object() {
        let s = store(&circles(4, 50.0));
        let per = s.topology().indices;
        assert_eq!(s.full_draw_range().unwrap(), DrawRange::Indexed(0..4 * per));
    }

    #[test]
    fn direct_kinds_draw_vertices() {
        let s = store(&points(5));
        assert_eq!(s.draw_range(1, 3).unwrap(), DrawRange::Direct(1..4));
    }

    #[test]
    fn subrender_covers_only_its_range() {
        let s = store(&circles(4, 50.0));
        let per = s.topology().indices;
        assert_eq!(s.draw_range(1, 2).unwrap(), DrawRange::Indexed(per..3 * per));
    }

    #[test]
    fn zero_count_range_is_empty() {
        let s = store(&circles(2, 1.0));
        assert!(s.draw_range(2, 0).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_render_is_rejected() {
        let s = store(&circles(4, 50.0));
        assert_eq!(
            s.draw_range(3, 2).unwrap_err(),
            ContractViolation::OutOfRange { start: 3, end: 5, capacity: 4 }
        );
        assert!(matches!(
            s.draw_range(usize::MAX, 2),
            Err(ContractViolation::OutOfRange { end: usize::MAX, .. })
        ));
    }

    // ── fill / subfill ────────────────────────────────────────────────────

    #[test]
    fn subfill_then_subrender_scenario() {
        let mut s = store(&circles(4, 50.0));
        let before = s.vertex_bytes().to_vec();

        let changed = s.write(0, &[circle(20.0), circle(30.0)]).unwrap();
        let range = s.draw_range(0, 2).unwrap();

        let t = s.topology();
        assert_eq!(range, DrawRange::Indexed(0..2 * t.indices));
        assert_eq!(radius_of(&s, 0), 20.0);
        assert_eq!(radius_of(&s, 1), 30.0);
        assert_eq!(radius_of(&s, 2), 50.0);
        assert_eq!(radius_of(&s, 3), 50.0);

        assert_eq!(changed, s.byte_range(0, 2));
        assert_eq!(s.vertex_bytes()[changed.end..], before[changed.end..]);
        assert_ne!(s.vertex_bytes()[changed.clone()], before[changed]);
    }

    #[test]
    fn subfill_leaves_other_slots_untouched() {
        let mut s = store(&circles(5, 40.0));
        let before = s.vertex_bytes().to_vec();
        let changed = s.write(2, &[circle(10.0)]).unwrap();

        assert_eq!(s.vertex_bytes()[..changed.start], before[..changed.start]);
        assert_eq!(s.vertex_bytes()[changed.end..], before[changed.end..]);
    }

    #[test]
    fn subfill_writes_tessellated_vertices() {
        let mut s = store(&circles(2, 40.0));
        let changed = s.write(1, &[circle(0.0)]).unwrap();
        let written: &[ColorVertex] = bytemuck::cast_slice(&s.vertex_bytes()[changed]);
        assert!(written.iter().all(|v| v.position == [400.0, 300.0, 0.0]));
    }

    #[test]
    fn last_write_wins() {
        let mut s = store(&circles(3, 40.0));
        s.write(0, &[circle(1.0), circle(2.0)]).unwrap();
        s.write(1, &[circle(3.0), circle(4.0)]).unwrap();
        assert_eq!([radius_of(&s, 0), radius_of(&s, 1), radius_of(&s, 2)], [1.0, 3.0, 4.0]);
    }

    #[test]
    fn failed_subfill_changes_nothing() {
        let mut s = store(&circles(3, 40.0));
        let before = s.vertex_bytes().to_vec();

        let bad = [circle(1.0), Point::at(0.0, 0.0, WHITE).into()];
        assert!(matches!(s.write(0, &bad), Err(ContractViolation::KindMismatch { index: 1, .. })));
        assert!(matches!(s.write(2, &[circle(1.0), circle(1.0)]), Err(ContractViolation::OutOfRange { .. })));

        assert_eq!(s.vertex_bytes(), &before[..]);
        assert_eq!(radius_of(&s, 0), 40.0);
    }

    #[test]
    fn fill_requires_exact_length() {
        let mut s = store(&circles(3, 40.0));
        assert_eq!(
            s.fill(&circles(2, 1.0)).unwrap_err(),
            ContractViolation::LengthMismatch { expected: 3, actual: 2 }
        );
        assert_eq!(s.fill(&circles(3, 1.0)).unwrap(), 0..s.vertex_bytes().len());
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn grow_preserves_low_slots_and_leaves_new_unfilled() {
        let mut s = store(&circles(2, 40.0));
        let before = s.vertex_bytes().to_vec();
        s.resize(4, true).unwrap();

        assert_eq!(s.capacity(), 4);
        assert_eq!(s.filled(), 2);
        assert_eq!(&s.vertex_bytes()[..before.len()], &before[..]);
        assert!(s.vertex_bytes()[before.len()..].iter().all(|b| *b == 0));
        assert_eq!(s.indices().len(), 4 * s.topology().indices as usize);

        assert!(s.draw_range(0, 2).is_ok());
        assert_eq!(s.full_draw_range().unwrap_err(), ContractViolation::Unfilled { index: 2 });
    }

    #[test]
    fn shrink_then_grow_does_not_resurrect() {
        let mut s = store(&circles(4, 40.0));
        s.resize(1, true).unwrap();
        s.resize(4, true).unwrap();

        assert_eq!(radius_of(&s, 0), 40.0);
        assert!(s.object(1).is_none());
        assert!(s.vertex_bytes()[s.byte_range(1, 3)].iter().all(|b| *b == 0));
        assert_eq!(s.draw_range(1, 1).unwrap_err(), ContractViolation::Unfilled { index: 1 });
    }

    #[test]
    fn resize_without_preserve_unfills_everything() {
        let mut s = store(&circles(3, 40.0));
        s.resize(3, false).unwrap();
        assert_eq!(s.filled(), 0);
        assert!(s.vertex_bytes().iter().all(|b| *b == 0));

        s.fill(&circles(3, 5.0)).unwrap();
        assert!(s.full_draw_range().is_ok());
    }

    #[test]
    fn resize_to_zero_is_rejected() {
        let mut s = store(&points(2));
        assert_eq!(s.resize(0, true).unwrap_err(), ContractViolation::Empty);
        assert_eq!(s.capacity(), 2);
    }

    #[test]
    fn regrown_slots_can_be_refilled() {
        let rect = |w: f32| -> Shape { Rect::new(Point::at(0.0, 0.0, WHITE), Vec2::new(w, w)).into() };
        let mut s = store(&[rect(1.0), rect(2.0)]);
        s.resize(3, true).unwrap();
        s.write(2, &[rect(3.0)]).unwrap();
        assert_eq!(s.full_draw_range().unwrap(), DrawRange::Indexed(0..18));
    }

    // ── sizes ─────────────────────────────────────────────────────────────

    #[test]
    fn buffer_sizes_match_topology() {
        let t = Topology::of(PrimitiveKind::Rect, &Tessellation::default());
        assert_eq!(buffer_sizes(&t, 10), Some((10 * 4 * t.stride, 10 * 6 * 4)));
    }

    #[test]
    fn buffer_sizes_detect_overflow() {
        let t = Topology::of(PrimitiveKind::Circle, &Tessellation::default());
        assert_eq!(buffer_sizes(&t, usize::MAX), None);
        assert_eq!(buffer_sizes(&t, u32::MAX as usize), None);
    }

    #[test]
    fn buffer_sizes_bound_index_count_too() {
        // Fans carry about three indices per vertex, so the index bound trips first.
        let t = Topology::of(PrimitiveKind::Circle, &Tessellation::default());
        let capacity = (u32::MAX / t.vertices) as usize;
        assert!(capacity as u64 * t.indices as u64 > u32::MAX as u64);
        assert_eq!(buffer_sizes(&t, capacity), None);

        let fits = (u32::MAX / t.indices) as usize;
        assert!(buffer_sizes(&t, fits).is_some());
    }
}
