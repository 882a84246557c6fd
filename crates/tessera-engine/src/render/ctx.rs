use crate::coords::{ColorRgba, Viewport};

/// What object buffers and textures need from the device for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }

    /// Features the device was created with; decides float texture filtering.
    #[inline]
    pub fn features(&self) -> wgpu::Features {
        self.device.features()
    }

    /// Limits that bound buffer and texture allocations.
    #[inline]
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }
}

/// Color target that draws are recorded into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    /// Fills the whole target with `color`.
    pub fn clear(&mut self, color: ColorRgba) {
        let _pass = self.pass(
            "tessera clear",
            wgpu::LoadOp::Clear(wgpu::Color {
                r: color.r as f64,
                g: color.g as f64,
                b: color.b as f64,
                a: color.a as f64,
            }),
        );
    }

    /// Opens a single-attachment pass; `LoadOp::Load` keeps earlier draws.
    pub(crate) fn pass(&mut self, label: &str, load: wgpu::LoadOp<wgpu::Color>) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
