//! Window shell: owns the event loop and routes pointer and keyboard
//! events into the interaction layer.
//!
//! Rendering is demand-driven. Handlers bank the strongest outstanding
//! redraw request and the next `RedrawRequested` consumes it, so the GPU
//! only re-evaluates the field when a charge or the flux scale actually
//! changed.

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Cursor, CursorIcon, Window, WindowId};

use crate::controller::{Controller, Redraw};
use crate::controls::Controls;
use crate::coords::CANVAS_SIZE;
use crate::error::AppError;
use crate::gpu::Renderer;
use crate::scene::Scene;
use crate::sprites;

pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    scene: Scene,
    controller: Controller,
    controls: Controls,
    /// Last cursor position in logical window coordinates. Button events
    /// carry no position of their own, so presses land here.
    cursor: Option<Vec2>,
    pointer_cursor: bool,
    pending: Redraw,
    fatal: Option<AppError>,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            renderer: None,
            scene: Scene::new(),
            controller: Controller::new(),
            controls: Controls::new(),
            cursor: None,
            pointer_cursor: false,
            // The first frame has nothing cached to recomposite.
            pending: Redraw::Full,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title("Fluxfield")
            .with_inner_size(LogicalSize::new(CANVAS_SIZE, CANVAS_SIZE))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let electron = sprites::electron()?;
        let proton = sprites::proton()?;
        let renderer = pollster::block_on(Renderer::new(window.clone(), &electron, &proton))?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn request(&mut self, redraw: Redraw) {
        if redraw == Redraw::None {
            return;
        }
        self.pending = self.pending.max(redraw);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Switch between the arrow and the pointing hand as entities come in
    /// and out of pick range.
    fn refresh_cursor_icon(&mut self) {
        let wants = self.controller.wants_pointer_cursor();
        if wants == self.pointer_cursor {
            return;
        }
        self.pointer_cursor = wants;
        if let Some(window) = &self.window {
            let icon = if wants {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            };
            window.set_cursor(Cursor::Icon(icon));
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                log::error!("startup failed: {err}");
                self.fatal = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
                // Surface contents are gone but the field raster is not.
                self.request(Redraw::SensorsOnly);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f32>(scale);
                let pos = Vec2::new(logical.x, logical.y);
                self.cursor = Some(pos);
                let redraw = self.controller.pointer_move(&mut self.scene, pos);
                self.refresh_cursor_icon();
                self.request(redraw);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                let redraw = self.controller.pointer_leave();
                self.refresh_cursor_icon();
                self.request(redraw);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    let redraw = match state {
                        ElementState::Pressed => match self.cursor {
                            Some(pos) => self.controller.pointer_down(
                                &mut self.scene,
                                pos,
                                self.controls.placement(),
                            ),
                            None => Redraw::None,
                        },
                        ElementState::Released => self.controller.pointer_up(),
                    };
                    self.refresh_cursor_icon();
                    self.request(redraw);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => {
                // Repeats are welcome: holding an arrow ramps the flux scale.
                let redraw = self.controls.key_pressed(code);
                self.request(redraw);
            }
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = &mut self.renderer {
                    let result = match self.pending {
                        Redraw::Full => {
                            renderer.render_frame(&self.scene, self.controls.flux_scale())
                        }
                        // An expose with nothing pending still recomposites
                        // the cached layers.
                        Redraw::SensorsOnly | Redraw::None => {
                            renderer.render_sensors_only(&self.scene)
                        }
                    };
                    match result {
                        Ok(()) => self.pending = Redraw::None,
                        // Keep `pending` so the retry repeats the same work.
                        Err(wgpu::SurfaceError::Lost) => {
                            let size = renderer.size();
                            renderer.resize(size);
                            if let Some(window) = &self.window {
                                window.request_redraw();
                            }
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("surface out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("surface error: {e:?}"),
                    }
                }
            }
            _ => {}
        }
    }
}

/// Build the event loop, run the shell to completion and surface any
/// startup failure as the process result.
pub fn run() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
