/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Features the device must have; device creation fails without them.
    pub required_features: wgpu::Features,

    /// Features requested only when the adapter offers them.
    ///
    /// Defaults to `FLOAT32_FILTERABLE`, which lets 32-bit float textures use
    /// linear filtering.
    pub optional_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::FLOAT32_FILTERABLE,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Features to request from an adapter offering `available`.
    pub fn features_for(&self, available: wgpu::Features) -> wgpu::Features {
        self.required_features | (self.optional_features & available)
    }
}
