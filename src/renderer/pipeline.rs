//! WebGPU scene pipeline
//!
//! Owns the device, queue and surface plus every pass, and renders a scene
//! `Frame` as depth pass -> lit pass (+ overlay) -> post effect -> present.

use super::gpu_mesh::GpuMeshCache;
use super::lit_pass::LitPass;
use super::overlay::OverlayPass;
use super::post_effect::PostEffect;
use super::shadow_pass::ShadowPass;
use super::targets::{Framebuffer, ShadowMap};
use super::uniforms::{FrameUniform, ObjectBuffer};
use crate::consts::SHADOW_WIDTH;
use crate::error::RenderError;
use crate::resources::ResourceCache;
use crate::scene::{Frame, FrameRenderer};
use crate::settings::{PostEffectKind, Settings};

pub struct ScenePipeline {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// Viewport size in pixels
    pub size: (u32, u32),
    settings: Settings,

    shadow_map: ShadowMap,
    framebuffer: Framebuffer,
    meshes: GpuMeshCache,
    objects: ObjectBuffer,
    shadow: ShadowPass,
    lit: LitPass,
    overlay: OverlayPass,
    post: PostEffect,
}

impl ScenePipeline {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        settings: Settings,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("dodge-room-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        log::info!("Using surface format: {:?}", surface_format);

        let (width, height) = (width.max(1), height.max(1));
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: settings.present_mode(),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Off-screen targets are fixed for the session
        let shadow_map = ShadowMap::new(&device, SHADOW_WIDTH);
        let framebuffer = Framebuffer::new(&device, width, height);
        log::info!(
            "Targets: shadow {}x{}, framebuffer {}x{}",
            shadow_map.size,
            shadow_map.size,
            framebuffer.size.0,
            framebuffer.size.1
        );

        let objects = ObjectBuffer::new(&device);
        let shadow = ShadowPass::new(&device, &objects);
        let lit = LitPass::new(&device, &objects, &shadow_map);
        let overlay = OverlayPass::new(&device);
        let post = PostEffect::new(&device, surface_format, &framebuffer, settings.post_effect);
        log::info!("Post effect: {}", settings.post_effect.as_str());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size: (width, height),
            settings,
            shadow_map,
            framebuffer,
            meshes: GpuMeshCache::new(),
            objects,
            shadow,
            lit,
            overlay,
            post,
        })
    }

    /// Reconfigure the swapchain. Off-screen targets keep their size and
    /// the post-effect blit rescales.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.size.0 as f32 / self.size.1 as f32
    }

    pub fn set_post_effect(&mut self, kind: PostEffectKind) {
        self.settings.post_effect = kind;
        self.post.set_kind(&self.queue, kind);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl FrameRenderer for ScenePipeline {
    type Error = RenderError;

    fn render_frame(&mut self, frame: &Frame, cache: &ResourceCache) -> Result<(), RenderError> {
        for draw in &frame.draws {
            self.meshes.prepare(&self.device, cache, draw.mesh)?;
        }
        self.objects.reserve(&self.device, frame.draws.len());
        self.objects.write(&self.queue, &frame.draws);
        self.overlay.prepare(&self.device, &frame.overlay);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        self.shadow.record(
            &mut encoder,
            &self.queue,
            &self.shadow_map,
            frame,
            &self.meshes,
            &self.objects,
        );

        let uniform = FrameUniform::new(frame, &self.settings, self.shadow_map.size);
        let overlay = self.settings.show_ui.then_some(&self.overlay);
        self.lit.record(
            &mut encoder,
            &self.queue,
            &self.framebuffer,
            frame,
            &uniform,
            self.settings.clear_color,
            &self.meshes,
            &self.objects,
            overlay,
        );

        self.post.blit(&mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
