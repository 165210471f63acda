//! GPU context and frame composition.
//!
//! A frame is three layers bottom to top: the field raster, the charge
//! sprites, the sensor overlay, alpha-blended over a white clear. The
//! field layer lives in an offscreen texture owned by its pass; a full
//! render re-evaluates it, a sensors-only render just recomposites it.

mod field_pass;
mod overlay_pass;
mod sprite_pass;

use std::sync::Arc;

use winit::window::Window;

use crate::error::GpuError;
use crate::scene::Scene;
use crate::sprites::SpriteImage;

use field_pass::FieldPass;
use overlay_pass::OverlayPass;
use sprite_pass::SpritePass;

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    field: FieldPass,
    sprites: SpritePass,
    overlay: OverlayPass,
}

impl Renderer {
    /// Set up the surface, device and the three passes for `window`.
    pub async fn new(
        window: Arc<Window>,
        electron: &SpriteImage,
        proton: &SpriteImage,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let field = FieldPass::new(&device, surface_format);
        let sprites = SpritePass::new(&device, &queue, surface_format, electron, proton);
        let overlay = OverlayPass::new(&device, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            field,
            sprites,
            overlay,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Full pipeline: re-evaluate the field raster, then composite all
    /// three layers.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        flux_scale: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        self.field.update(&self.queue, scene, flux_scale);
        self.render(scene, true)
    }

    /// Fast path for sensor-only mutations: the cached field raster is
    /// recomposited untouched.
    pub fn render_sensors_only(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.render(scene, false)
    }

    fn render(&mut self, scene: &Scene, evaluate_field: bool) -> Result<(), wgpu::SurfaceError> {
        self.sprites.update(&self.queue, scene);
        self.overlay.update(&self.queue, scene);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if evaluate_field {
            self.field.render_field(&mut encoder);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.field.composite(&mut pass);
            self.sprites.draw(&mut pass);
            self.overlay.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
