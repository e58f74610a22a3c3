//! HDR post-processing renderer on wgpu.
//!
//! The chain renders the caller's scene into a depth-backed HDR target,
//! anti-aliases it with FXAA, extracts bright regions, blurs them through
//! a five-level separable Gaussian pyramid, and composites the weighted
//! bloom back over the scene with a radial chromatic shift and ACES tone
//! mapping. Targets are pooled and reallocated together when the
//! viewport or device pixel ratio changes.
//!
//! [`Renderer`] owns the device and surface for the common windowed
//! case; [`RenderManager`] is the surface-agnostic core for callers that
//! manage their own device and output texture.

pub mod context;
pub mod error;
pub mod manager;
pub mod passes;
pub mod pipeline;
pub mod pyramid;
pub mod scene;
pub mod settings;
pub mod targets;

pub use context::GpuContext;
pub use error::RenderError;
pub use manager::RenderManager;
pub use pyramid::BloomPyramid;
pub use scene::{Camera, FrameClock, FrameTimer, SceneRenderer};
pub use settings::PostSettings;
pub use targets::{Viewport, DEPTH_FORMAT, HDR_FORMAT};

/// Windowed renderer: device, surface, post-processing chain, and frame
/// timing in one place.
pub struct Renderer {
    context: GpuContext,
    manager: RenderManager,
    timer: FrameTimer,
}

impl Renderer {
    /// Create a renderer for a window and size its targets to `viewport`,
    /// with the default five-level bloom pyramid.
    pub fn new(
        window: impl raw_window_handle::HasWindowHandle
            + raw_window_handle::HasDisplayHandle
            + Send
            + Sync
            + 'static,
        viewport: Viewport,
    ) -> Result<Self, RenderError> {
        Self::with_pyramid_levels(window, viewport, pyramid::MAX_PYRAMID_LEVELS)
    }

    /// Create a renderer with an explicit bloom pyramid depth (clamped
    /// to `1..=5`). Fewer levels mean a tighter, cheaper bloom.
    pub fn with_pyramid_levels(
        window: impl raw_window_handle::HasWindowHandle
            + raw_window_handle::HasDisplayHandle
            + Send
            + Sync
            + 'static,
        viewport: Viewport,
        pyramid_levels: usize,
    ) -> Result<Self, RenderError> {
        let _ = env_logger::try_init();

        let (width, height) = viewport.full_extent();
        let context = GpuContext::new(window, width, height)?;
        let mut manager =
            RenderManager::new(&context.device, context.surface_format(), pyramid_levels);
        manager.resize(&context.device, &context.queue, viewport)?;

        Ok(Self {
            context,
            manager,
            timer: FrameTimer::new(),
        })
    }

    pub fn settings(&self) -> PostSettings {
        self.manager.settings()
    }

    pub fn set_settings(&mut self, settings: PostSettings) {
        self.manager.set_settings(settings);
    }

    pub fn set_bloom(&mut self, strength: f32, radius: f32) {
        self.manager.set_bloom(strength, radius);
    }

    pub fn set_luminosity_threshold(&mut self, threshold: f32) {
        self.manager.set_luminosity_threshold(threshold);
    }

    pub fn set_distortion(&mut self, distortion: f32) {
        self.manager.set_distortion(distortion);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.manager.set_enabled(enabled);
    }

    /// Resize the surface and every render target. A no-op when the
    /// viewport is unchanged.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        let (width, height) = viewport.full_extent();
        self.context.resize(width, height);
        self.manager
            .resize(&self.context.device, &self.context.queue, viewport)?;
        Ok(())
    }

    /// Render one frame and present it.
    pub fn update(
        &mut self,
        scene: &mut dyn SceneRenderer,
        camera: &Camera,
    ) -> Result<(), RenderError> {
        let frame = self.context.surface.get_current_texture()?;
        let output = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.render_into(scene, camera, &output);

        frame.present();
        Ok(())
    }

    /// Render one frame into a caller-supplied view instead of the
    /// surface. The view must use the surface format.
    pub fn update_into(
        &mut self,
        scene: &mut dyn SceneRenderer,
        camera: &Camera,
        output: &wgpu::TextureView,
    ) {
        self.render_into(scene, camera, output);
    }

    fn render_into(
        &mut self,
        scene: &mut dyn SceneRenderer,
        camera: &Camera,
        output: &wgpu::TextureView,
    ) {
        let clock = self.timer.tick();
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });

        self.manager.update(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            scene,
            camera,
            &clock,
            output,
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
    }
}
