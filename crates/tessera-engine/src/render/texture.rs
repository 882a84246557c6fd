//! Texture resources sampled by textured object buffers.

use std::sync::{Arc, Weak};

use wgpu::util::DeviceExt;

use crate::error::{FormatError, Result, check_allocation, scoped_allocation};

use super::RenderCtx;

/// Pixel layouts accepted by [`Texture::create`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFormat {
    R8Unorm,
    Rg8Unorm,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba16Float,
    R32Float,
    Rgba32Float,
}

impl TextureFormat {
    pub fn to_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TextureFormat::R8Unorm => wgpu::TextureFormat::R8Unorm,
            TextureFormat::Rg8Unorm => wgpu::TextureFormat::Rg8Unorm,
            TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
            TextureFormat::R32Float => wgpu::TextureFormat::R32Float,
            TextureFormat::Rgba32Float => wgpu::TextureFormat::Rgba32Float,
        }
    }

    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rg8Unorm => 2,
            TextureFormat::Rgba8Unorm
            | TextureFormat::Rgba8UnormSrgb
            | TextureFormat::Bgra8Unorm
            | TextureFormat::Bgra8UnormSrgb
            | TextureFormat::R32Float => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
        }
    }

    /// Whether a filtering sampler may read this format on a device with `features`.
    pub fn is_filterable(self, features: wgpu::Features) -> bool {
        match self {
            TextureFormat::R32Float | TextureFormat::Rgba32Float => {
                features.contains(wgpu::Features::FLOAT32_FILTERABLE)
            }
            _ => true,
        }
    }
}

/// Upscale / downscale filter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

impl Filter {
    fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            Filter::Nearest => wgpu::FilterMode::Nearest,
            Filter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Behavior outside `[0, 1]` on one axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Wrap {
    #[default]
    Clamp,
    Repeat,
}

impl Wrap {
    fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            Wrap::Clamp => wgpu::AddressMode::ClampToEdge,
            Wrap::Repeat => wgpu::AddressMode::Repeat,
        }
    }
}

/// Texture creation parameters.
///
/// `layers: None` creates a plain 2D texture; `Some(n)` a 2D array of `n`
/// layers (including `Some(1)`). Pixel data is tightly packed, row-major,
/// layer after layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureDesc {
    pub format: TextureFormat,
    pub upscale: Filter,
    pub downscale: Filter,
    pub wrap_x: Wrap,
    pub wrap_y: Wrap,
    pub width: u32,
    pub height: u32,
    pub layers: Option<u32>,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            format: TextureFormat::Rgba8UnormSrgb,
            upscale: Filter::Nearest,
            downscale: Filter::Nearest,
            wrap_x: Wrap::Clamp,
            wrap_y: Wrap::Clamp,
            width: 1,
            height: 1,
            layers: None,
        }
    }
}

impl TextureDesc {
    pub fn new(format: TextureFormat, width: u32, height: u32) -> Self {
        Self { format, width, height, ..Self::default() }
    }

    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = Some(layers);
        self
    }

    pub fn with_filter(mut self, upscale: Filter, downscale: Filter) -> Self {
        self.upscale = upscale;
        self.downscale = downscale;
        self
    }

    pub fn with_wrap(mut self, wrap_x: Wrap, wrap_y: Wrap) -> Self {
        self.wrap_x = wrap_x;
        self.wrap_y = wrap_y;
        self
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.layers.is_some()
    }

    #[inline]
    pub fn layer_count(&self) -> u32 {
        self.layers.unwrap_or(1)
    }

    fn uses_linear(&self) -> bool {
        self.upscale == Filter::Linear || self.downscale == Filter::Linear
    }
}

/// Checks `desc` and `pixels_len` against the device; returns the expected byte length.
pub fn validate(
    desc: &TextureDesc,
    pixels_len: usize,
    limits: &wgpu::Limits,
    features: wgpu::Features,
) -> Result<usize> {
    let layers = desc.layer_count();
    if desc.width == 0 || desc.height == 0 || layers == 0 {
        return Err(FormatError::EmptyExtent {
            width: desc.width,
            height: desc.height,
            layers,
        }
        .into());
    }

    if desc.uses_linear() && !desc.format.is_filterable(features) {
        return Err(FormatError::NotFilterable { format: desc.format.to_wgpu() }.into());
    }

    let max_dim = limits.max_texture_dimension_2d as u64;
    check_allocation("texture width", Some(desc.width as u64), max_dim)?;
    check_allocation("texture height", Some(desc.height as u64), max_dim)?;
    check_allocation(
        "texture layers",
        Some(layers as u64),
        limits.max_texture_array_layers as u64,
    )?;

    let expected = (desc.width as u64)
        .checked_mul(desc.height as u64)
        .and_then(|n| n.checked_mul(layers as u64))
        .and_then(|n| n.checked_mul(desc.format.bytes_per_pixel() as u64));
    let expected = check_allocation("texture data", expected, usize::MAX as u64)? as usize;

    if pixels_len != expected {
        return Err(FormatError::DataLength { expected, actual: pixels_len }.into());
    }
    Ok(expected)
}

#[derive(Debug)]
pub(crate) struct TextureInner {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) desc: TextureDesc,
    pub(crate) filterable: bool,
}

/// GPU image storage plus sampler state.
///
/// Object buffers hold only a weak reference: destroying the texture leaves
/// bound buffers unable to render until they are rebound.
#[derive(Debug)]
pub struct Texture {
    inner: Arc<TextureInner>,
}

impl Texture {
    /// Uploads `pixels` as a new texture.
    pub fn create(ctx: &RenderCtx<'_>, desc: &TextureDesc, pixels: &[u8]) -> Result<Self> {
        let bytes = validate(desc, pixels.len(), &ctx.limits(), ctx.features())?;

        let filterable = desc.format.is_filterable(ctx.features());
        let texture = scoped_allocation(ctx.device, "texture", bytes as u64, || {
            ctx.device.create_texture_with_data(
                ctx.queue,
                &wgpu::TextureDescriptor {
                    label: Some("tessera texture"),
                    size: wgpu::Extent3d {
                        width: desc.width,
                        height: desc.height,
                        depth_or_array_layers: desc.layer_count(),
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: desc.format.to_wgpu(),
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                wgpu::util::TextureDataOrder::LayerMajor,
                pixels,
            )
        })?;

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("tessera texture view"),
            dimension: Some(if desc.is_array() {
                wgpu::TextureViewDimension::D2Array
            } else {
                wgpu::TextureViewDimension::D2
            }),
            ..Default::default()
        });

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessera texture sampler"),
            address_mode_u: desc.wrap_x.to_wgpu(),
            address_mode_v: desc.wrap_y.to_wgpu(),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: desc.upscale.to_wgpu(),
            min_filter: desc.downscale.to_wgpu(),
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        log::debug!(
            "texture created: {:?} {}x{} layers={:?}",
            desc.format,
            desc.width,
            desc.height,
            desc.layers
        );

        Ok(Self {
            inner: Arc::new(TextureInner {
                texture,
                view,
                sampler,
                desc: *desc,
                filterable,
            }),
        })
    }

    #[inline]
    pub fn desc(&self) -> &TextureDesc {
        &self.inner.desc
    }

    /// Releases the GPU image storage.
    pub fn destroy(self) {
        self.inner.texture.destroy();
        log::debug!("texture destroyed: {:?}", self.inner.desc.format);
    }

    pub(crate) fn downgrade(&self) -> Weak<TextureInner> {
        Arc::downgrade(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn limits() -> wgpu::Limits {
        wgpu::Limits::default()
    }

    fn check(desc: &TextureDesc, len: usize) -> Result<usize> {
        validate(desc, len, &limits(), wgpu::Features::empty())
    }

    #[test]
    fn accepts_tightly_packed_rgba() {
        let desc = TextureDesc::new(TextureFormat::Rgba8Unorm, 4, 2);
        assert_eq!(check(&desc, 32), Ok(32));
    }

    #[test]
    fn array_length_counts_every_layer() {
        let desc = TextureDesc::new(TextureFormat::R8Unorm, 8, 8).with_layers(3);
        assert_eq!(check(&desc, 192), Ok(192));
    }

    #[test]
    fn rejects_wrong_data_length() {
        let desc = TextureDesc::new(TextureFormat::Rg8Unorm, 2, 2);
        assert_eq!(
            check(&desc, 7),
            Err(Error::Format(FormatError::DataLength { expected: 8, actual: 7 }))
        );
    }

    #[test]
    fn rejects_zero_extent() {
        let desc = TextureDesc::new(TextureFormat::Rgba8Unorm, 0, 4);
        assert!(matches!(check(&desc, 0), Err(Error::Format(FormatError::EmptyExtent { .. }))));

        let desc = TextureDesc::new(TextureFormat::Rgba8Unorm, 4, 4).with_layers(0);
        assert!(matches!(check(&desc, 0), Err(Error::Format(FormatError::EmptyExtent { layers: 0, .. }))));
    }

    #[test]
    fn rejects_dimensions_over_limit() {
        let max = limits().max_texture_dimension_2d;
        let desc = TextureDesc::new(TextureFormat::R8Unorm, max + 1, 1);
        assert_eq!(
            check(&desc, 0),
            Err(Error::Allocation {
                what: "texture width",
                requested: max as u64 + 1,
                limit: max as u64,
            })
        );
    }

    #[test]
    fn rejects_layers_over_limit() {
        let max = limits().max_texture_array_layers;
        let desc = TextureDesc::new(TextureFormat::R8Unorm, 1, 1).with_layers(max + 1);
        assert!(matches!(check(&desc, 0), Err(Error::Allocation { what: "texture layers", .. })));
    }

    #[test]
    fn float32_linear_needs_feature() {
        let desc = TextureDesc::new(TextureFormat::R32Float, 1, 1)
            .with_filter(Filter::Linear, Filter::Nearest);
        assert_eq!(
            check(&desc, 4),
            Err(Error::Format(FormatError::NotFilterable { format: wgpu::TextureFormat::R32Float }))
        );
        assert_eq!(validate(&desc, 4, &limits(), wgpu::Features::FLOAT32_FILTERABLE), Ok(4));
    }

    #[test]
    fn float32_nearest_is_allowed() {
        let desc = TextureDesc::new(TextureFormat::Rgba32Float, 2, 1);
        assert_eq!(check(&desc, 32), Ok(32));
    }

    #[test]
    fn bytes_per_pixel_matches_wgpu() {
        for format in [
            TextureFormat::R8Unorm,
            TextureFormat::Rg8Unorm,
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm,
            TextureFormat::Rgba16Float,
            TextureFormat::Rgba32Float,
        ] {
            assert_eq!(
                format.to_wgpu().block_copy_size(None),
                Some(format.bytes_per_pixel()),
                "{format:?}"
            );
        }
    }
}
