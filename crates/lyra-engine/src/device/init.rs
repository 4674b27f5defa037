/// Initialization parameters for the GPU layer.
///
/// Kept small on purpose; new knobs are added only when a concrete platform
/// or backend requirement shows up.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// sRGB output is what color work downstream assumes.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is broadly supported and right for
    /// frame-driven visualization workloads.
    pub present_mode: wgpu::PresentMode,

    /// Required wgpu features. Favor the empty set for portability.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint; support is
    /// platform-dependent).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
