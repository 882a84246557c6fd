use std::ops::Range;
use std::sync::{Arc, Weak};

use wgpu::util::DeviceExt;

use crate::error::{ContractViolation, Error, Result, check_allocation, report, scoped_allocation};
use crate::scene::{PrimitiveKind, Shape};
use crate::tessellate::{Tessellation, Topology};

use super::pipeline::{ShaderFamily, ViewportUniform, bind_group_layout, create_pipeline};
use super::store::{DrawRange, ObjectStore, buffer_sizes};
use super::texture::{Texture, TextureDesc, TextureInner};
use super::{RenderCtx, RenderTarget};

/// GPU buffer holding `capacity` objects of one [`PrimitiveKind`].
///
/// Every object occupies a fixed slot (see [`Topology`]), so partial writes
/// ([`subfill`](Self::subfill)) and partial draws ([`subrender`](Self::subrender))
/// address objects by index without touching the rest of the buffer.
///
/// Caller errors (wrong kind, out-of-range slots, unfilled slots, missing
/// texture) are [`ContractViolation`]s: they panic in debug builds and are
/// logged and skipped in release builds.
pub struct ObjectBuffer {
    store: ObjectStore,
    family: ShaderFamily,

    vbo: wgpu::Buffer,
    ibo: Option<wgpu::Buffer>,

    pipeline_key: Option<(wgpu::TextureFormat, bool)>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    texture: Option<Weak<TextureInner>>,
}

impl ObjectBuffer {
    /// Creates a buffer sized for exactly `objects.len()` objects and uploads them.
    pub fn create(ctx: &RenderCtx<'_>, kind: PrimitiveKind, objects: &[Shape]) -> Result<Self> {
        Self::with_tessellation(ctx, kind, Tessellation::default(), objects)
    }

    /// Like [`create`](Self::create) with explicit curve quality, fixed for the
    /// buffer's lifetime.
    pub fn with_tessellation(
        ctx: &RenderCtx<'_>,
        kind: PrimitiveKind,
        tessellation: Tessellation,
        objects: &[Shape],
    ) -> Result<Self> {
        let tessellation = tessellation.sanitized();

        // Reject oversized requests before tessellating anything.
        let topology = Topology::of(kind, &tessellation);
        let (vertex_bytes, index_bytes) = Self::check_sizes(ctx, &topology, objects.len())?;

        let store = match ObjectStore::new(kind, tessellation, objects) {
            Ok(store) => store,
            Err(violation) => {
                report(violation.clone());
                return Err(Error::Contract(violation));
            }
        };

        let (vbo, ibo) = Self::upload(ctx, &store, vertex_bytes, index_bytes)?;
        log::debug!(
            "object buffer created: kind={} capacity={} vertex_bytes={} index_bytes={}",
            kind.label(),
            store.capacity(),
            vertex_bytes,
            index_bytes,
        );

        Ok(Self {
            store,
            family: ShaderFamily::of(kind),
            vbo,
            ibo,
            pipeline_key: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            texture: None,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.store.kind()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Number of slots holding data.
    #[inline]
    pub fn filled(&self) -> usize {
        self.store.filled()
    }

    /// Descriptor last written to slot `index`, from the CPU mirror.
    #[inline]
    pub fn object(&self, index: usize) -> Option<&Shape> {
        self.store.object(index)
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.store.topology()
    }

    #[inline]
    pub fn tessellation(&self) -> Tessellation {
        self.store.tessellation()
    }

    // ── fill ──────────────────────────────────────────────────────────────

    /// Re-tessellates and uploads every object. `objects.len()` must equal the capacity.
    pub fn fill(&mut self, ctx: &RenderCtx<'_>, objects: &[Shape]) {
        let written = self.store.fill(objects);
        self.upload_range(ctx, written);
    }

    /// Re-tessellates and uploads objects `start..start + objects.len()` only.
    pub fn subfill(&mut self, ctx: &RenderCtx<'_>, start: usize, objects: &[Shape]) {
        let written = self.store.write(start, objects);
        self.upload_range(ctx, written);
    }

    fn upload_range(
        &self,
        ctx: &RenderCtx<'_>,
        written: std::result::Result<Range<usize>, ContractViolation>,
    ) {
        match written {
            Ok(range) if range.is_empty() => {}
            Ok(range) => {
                let bytes = &self.store.vertex_bytes()[range.clone()];
                ctx.queue.write_buffer(&self.vbo, range.start as u64, bytes);
            }
            Err(violation) => report(violation),
        }
    }

    // ── resize ────────────────────────────────────────────────────────────

    /// Reallocates GPU storage for `new_capacity` objects.
    ///
    /// With `preserve`, objects below `min(old, new)` keep their data and index.
    /// Grown slots are unfilled until written; rendering them is a violation.
    pub fn resize(&mut self, ctx: &RenderCtx<'_>, new_capacity: usize, preserve: bool) -> Result<()> {
        let topology = self.store.topology();
        let (vertex_bytes, index_bytes) = Self::check_sizes(ctx, &topology, new_capacity)?;

        // Resized off to the side so a failed allocation leaves the buffer intact.
        let mut store = self.store.clone();
        if let Err(violation) = store.resize(new_capacity, preserve) {
            report(violation);
            return Ok(());
        }
        let (vbo, ibo) = Self::upload(ctx, &store, vertex_bytes, index_bytes)?;

        let old_capacity = self.store.capacity();
        self.store = store;
        self.vbo.destroy();
        if let Some(old) = self.ibo.take() {
            old.destroy();
        }
        self.vbo = vbo;
        self.ibo = ibo;

        log::debug!(
            "object buffer resized: kind={} capacity {} -> {} preserve={}",
            self.kind().label(),
            old_capacity,
            new_capacity,
            preserve,
        );
        Ok(())
    }

    // ── texture ───────────────────────────────────────────────────────────

    /// Binds `texture` for sampling. Only texture kinds accept one, and its
    /// dimensionality must match (`Texture2DArray` needs an array texture).
    ///
    /// The buffer keeps a weak reference; destroying the texture requires a rebind.
    pub fn bind_texture(&mut self, texture: &Texture) {
        if let Err(violation) = check_binding(self.kind(), texture.desc()) {
            report(violation);
            return;
        }
        self.texture = Some(texture.downgrade());
        self.bind_group = None;
    }

    // ── render ────────────────────────────────────────────────────────────

    /// Draws every object in one call.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let capacity = self.capacity();
        self.subrender(ctx, target, 0, capacity);
    }

    /// Draws objects `start..start + count` in one call; the rest of the buffer
    /// is left undrawn.
    pub fn subrender(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        start: usize,
        count: usize,
    ) {
        let range = match self.store.draw_range(start, count) {
            Ok(range) => range,
            Err(violation) => return report(violation),
        };

        let texture = match live_texture(self.kind(), self.texture.as_ref()) {
            Ok(texture) => texture,
            Err(violation) => return report(violation),
        };

        if range.is_empty() {
            return;
        }

        let filterable = texture.as_ref().is_none_or(|t| t.filterable);
        self.ensure_pipeline(ctx, filterable);
        self.ensure_bindings(ctx, texture.as_deref());
        self.write_viewport_uniform(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.pass("tessera object pass", wgpu::LoadOp::Load);

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vbo.slice(..));

        match (range, self.ibo.as_ref()) {
            (DrawRange::Indexed(indices), Some(ibo)) => {
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(indices, 0, 0..1);
            }
            (DrawRange::Direct(vertices), _) => rpass.draw(vertices, 0..1),
            (DrawRange::Indexed(_), None) => {
                log::error!("{} buffer has no index buffer", self.kind().label());
            }
        }
    }

    /// Releases GPU storage.
    pub fn destroy(self) {
        self.vbo.destroy();
        if let Some(ibo) = &self.ibo {
            ibo.destroy();
        }
        if let Some(ubo) = &self.viewport_ubo {
            ubo.destroy();
        }
        log::debug!(
            "object buffer destroyed: kind={} capacity={}",
            self.kind().label(),
            self.capacity()
        );
    }

    // ── GPU resources ─────────────────────────────────────────────────────

    fn check_sizes(ctx: &RenderCtx<'_>, topology: &Topology, capacity: usize) -> Result<(u64, u64)> {
        let limit = ctx.limits().max_buffer_size;
        let sizes = buffer_sizes(topology, capacity);
        let vertex_bytes = check_allocation("vertex buffer", sizes.map(|s| s.0), limit)?;
        let index_bytes = check_allocation("index buffer", sizes.map(|s| s.1), limit)?;
        Ok((vertex_bytes, index_bytes))
    }

    fn upload(
        ctx: &RenderCtx<'_>,
        store: &ObjectStore,
        vertex_bytes: u64,
        index_bytes: u64,
    ) -> Result<(wgpu::Buffer, Option<wgpu::Buffer>)> {
        let vbo = scoped_allocation(ctx.device, "vertex buffer", vertex_bytes, || {
            ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tessera object vbo"),
                contents: store.vertex_bytes(),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        })?;

        if !store.topology().is_indexed() {
            return Ok((vbo, None));
        }
        let ibo = scoped_allocation(ctx.device, "index buffer", index_bytes, || {
            ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tessera object ibo"),
                contents: bytemuck::cast_slice(store.indices()),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        match ibo {
            Ok(ibo) => Ok((vbo, Some(ibo))),
            Err(err) => {
                vbo.destroy();
                Err(err)
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, filterable: bool) {
        let key = (ctx.surface_format, filterable);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let bgl = bind_group_layout(ctx.device, self.family, filterable);
        let pipeline = create_pipeline(ctx, self.family, self.store.topology().primitive, &bgl);

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);

        self.bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, texture: Option<&TextureInner>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = match self.viewport_ubo.take() {
            Some(ubo) => ubo,
            None => ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("tessera object viewport ubo"),
                size: std::mem::size_of::<ViewportUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        };

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: viewport_ubo.as_entire_binding(),
        }];
        if let Some(texture) = texture {
            entries.push(wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            });
        }

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera object bind group"),
            layout: bgl,
            entries: &entries,
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform::new(ctx.viewport);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

/// Whether a texture described by `desc` may be bound to a `kind` buffer.
pub(crate) fn check_binding(kind: PrimitiveKind, desc: &TextureDesc) -> std::result::Result<(), ContractViolation> {
    match kind {
        PrimitiveKind::Texture2D if !desc.is_array() => Ok(()),
        PrimitiveKind::Texture2DArray if desc.is_array() => Ok(()),
        PrimitiveKind::Texture2D | PrimitiveKind::Texture2DArray => {
            Err(ContractViolation::TextureDimension { kind, layers: desc.layers })
        }
        _ => Err(ContractViolation::NotTextured { kind }),
    }
}

/// The texture a `kind` buffer samples from: `None` for untextured kinds, a
/// violation when a textured kind was never bound or its texture is gone.
pub(crate) fn live_texture<T>(
    kind: PrimitiveKind,
    binding: Option<&Weak<T>>,
) -> std::result::Result<Option<Arc<T>>, ContractViolation> {
    if !kind.is_textured() {
        return Ok(None);
    }
    binding
        .and_then(Weak::upgrade)
        .map(Some)
        .ok_or(ContractViolation::MissingTexture { kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::texture::TextureFormat;

    // ── live texture ──────────────────────────────────────────────────────

    #[test]
    fn untextured_kinds_need_no_texture() {
        assert_eq!(live_texture::<u32>(PrimitiveKind::Circle, None), Ok(None));
    }

    #[test]
    fn never_bound_texture_is_missing() {
        assert_eq!(
            live_texture::<u32>(PrimitiveKind::Texture2D, None),
            Err(ContractViolation::MissingTexture { kind: PrimitiveKind::Texture2D })
        );
    }

    #[test]
    fn dropped_texture_is_missing_until_rebound() {
        let kind = PrimitiveKind::Texture2DArray;
        let first = Arc::new(1u32);
        let mut binding = Some(Arc::downgrade(&first));
        assert_eq!(live_texture(kind, binding.as_ref()).map(|t| t.map(|t| *t)), Ok(Some(1)));

        drop(first);
        assert_eq!(
            live_texture(kind, binding.as_ref()),
            Err(ContractViolation::MissingTexture { kind })
        );

        let second = Arc::new(2u32);
        binding = Some(Arc::downgrade(&second));
        assert_eq!(live_texture(kind, binding.as_ref()).map(|t| t.map(|t| *t)), Ok(Some(2)));
    }

    // ── binding ───────────────────────────────────────────────────────────

    #[test]
    fn plain_texture_binds_to_texture_2d() {
        let desc = TextureDesc::new(TextureFormat::Rgba8Unorm, 4, 4);
        assert_eq!(check_binding(PrimitiveKind::Texture2D, &desc), Ok(()));
    }

    #[test]
    fn array_texture_binds_to_texture_2d_array() {
        let desc = TextureDesc::new(TextureFormat::Rgba8Unorm, 4, 4).with_layers(1);
        assert_eq!(check_binding(PrimitiveKind::Texture2DArray, &desc), Ok(()));
    }

    #[test]
    fn dimensionality_must_match() {
        let plain = TextureDesc::new(TextureFormat::Rgba8Unorm, 4, 4);
        let array = plain.with_layers(3);
        assert_eq!(
            check_binding(PrimitiveKind::Texture2DArray, &plain),
            Err(ContractViolation::TextureDimension { kind: PrimitiveKind::Texture2DArray, layers: None })
        );
        assert_eq!(
            check_binding(PrimitiveKind::Texture2D, &array),
            Err(ContractViolation::TextureDimension { kind: PrimitiveKind::Texture2D, layers: Some(3) })
        );
    }

    #[test]
    fn untextured_kinds_reject_textures() {
        let desc = TextureDesc::new(TextureFormat::Rgba8Unorm, 4, 4);
        for kind in PrimitiveKind::ALL.into_iter().filter(|k| !k.is_textured()) {
            assert_eq!(check_binding(kind, &desc), Err(ContractViolation::NotTextured { kind }));
        }
    }
}
