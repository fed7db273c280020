//! Platform layer: windowing & event loop.
//!
//! Design goals:
//! - No busy loop: redraw only when the trackball moves, the window resizes
//!   or the math backend changes.
//! - Initialization failures end the loop and are returned to the caller.
//! - Clear log messages to help future debugging.

use std::sync::Arc;

use anyhow::Result;
use corelib::{
    MathBackend,
    camera::Projection,
    scene::Scene,
    trackball::{PointerEvent, TrackballRotator},
};
use renderer::GpuState;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

pub mod input;

use input::PointerTracker;

/// Startup options for [`run_viewer`].
#[derive(Clone, Copy, Debug)]
pub struct ViewerConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub math: MathBackend,
    pub view_distance: f64,
}

/// Open the viewer window and block until it is closed.
pub fn run_viewer(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = ViewerApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match app.init_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct ViewerApp {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    rotator: Option<TrackballRotator>,
    pointer: PointerTracker,
    scene: Scene,
    projection: Projection,
    math: MathBackend,
    init_error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            rotator: None,
            pointer: PointerTracker::new(config.width, config.height),
            scene: Scene::furnished_room(),
            projection: Projection::default(),
            math: config.math,
            init_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(format!("Roomview [{}]", self.math))
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends))?;
        let (width, height) = gpu.size();
        self.pointer.resize(width, height);

        let redraw_target = window.clone();
        self.rotator = Some(
            TrackballRotator::new(Some(self.config.view_distance))
                .with_redraw(move || redraw_target.request_redraw()),
        );
        self.gpu = Some(gpu);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(rotator)) = (self.gpu.as_mut(), self.rotator.as_ref()) else {
            return;
        };
        let items = self.scene.draw_list(rotator.view_matrix(), self.math);
        let projection = self.projection.with_aspect(gpu.aspect()).matrix(self.math);
        match gpu.render(&items, projection) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost/outdated ({err:?}); reconfiguring.");
                gpu.recreate_surface();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory. Exiting.");
                event_loop.exit();
            }
            Err(err) => log::warn!("Frame skipped: {err:?}"),
        }
    }

    fn feed_pointer(&mut self, event: Option<PointerEvent>) {
        if let (Some(event), Some(rotator)) = (event, self.rotator.as_mut()) {
            rotator.handle_pointer(event);
        }
    }

    fn key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => {
                log::info!("Escape pressed. Exiting event loop.");
                event_loop.exit();
            }
            Key::Character(c) if c.eq_ignore_ascii_case("m") => {
                self.math = self.math.toggled();
                log::info!("Math backend: {}", self.math);
                if let Some(window) = &self.window {
                    window.set_title(&format!("Roomview [{}]", self.math));
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            log::error!("Initialization failed: {err:#}");
            self.init_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                self.pointer.resize(new_size.width, new_size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::CursorMoved { position, .. } => {
                let event = self.pointer.cursor_moved(position.x, position.y);
                self.feed_pointer(event);
            }
            WindowEvent::CursorLeft { .. } => self.pointer.cursor_left(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = self.pointer.mouse_button(state == ElementState::Pressed);
                self.feed_pointer(event);
            }
            WindowEvent::Touch(touch) => {
                let event = self.pointer.touch(
                    touch.id,
                    touch.phase,
                    touch.location.x,
                    touch.location.y,
                );
                self.feed_pointer(event);
            }
            WindowEvent::Focused(false) => {
                // Release events are lost along with focus.
                let event = self.pointer.cancel();
                self.feed_pointer(event);
            }
            WindowEvent::KeyboardInput { event, .. } => self.key(event_loop, &event),
            _ => {}
        }
    }
}
