use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    effect::{EffectId, EffectKind, EffectStage},
    error::VitrineError,
    gfx::StageRenderer,
    viewport::Viewport,
};

/// Host application driving every effect through one event loop
///
/// Owns the window, the renderer and the [`EffectStage`]. Register viewports
/// and create effects before calling [`run`](Self::run); the stage keeps
/// ticking running instances until the window closes.
pub struct VitrineApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    renderer: Option<StageRenderer>,
    stage: EffectStage,
    init_error: Option<VitrineError>,
}

impl Default for VitrineApp {
    fn default() -> Self {
        Self::new()
    }
}

impl VitrineApp {
    /// Creates a new Vitrine application with default settings
    pub fn new() -> Self {
        let _ = env_logger::try_init();
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                renderer: None,
                stage: EffectStage::new(),
                init_error: None,
            },
        }
    }

    /// Registers a viewport effects can attach to
    pub fn register_viewport(&mut self, viewport: Viewport) {
        self.app_state.stage.register_viewport(viewport);
    }

    /// Creates an effect on a named viewport; `None` if the name is unknown
    pub fn create_effect(&mut self, viewport_name: &str, kind: EffectKind) -> Option<EffectId> {
        self.app_state.stage.create(viewport_name, kind)
    }

    /// Direct access to the stage for start/stop/destroy
    pub fn stage_mut(&mut self) -> &mut EffectStage {
        &mut self.app_state.stage
    }

    /// Runs the application, consuming self and starting the event loop
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut self.app_state)?;

        if let Some(error) = self.app_state.init_error.take() {
            return Err(error.into());
        }
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_transparent(true)
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            let scale_factor = window_handle.scale_factor() as f32;

            let window_clone = window_handle.clone();
            match pollster::block_on(StageRenderer::new(window_clone, width, height)) {
                Ok(renderer) => {
                    self.stage.notify_resize(width, height, scale_factor);
                    self.renderer = Some(renderer);
                    window_handle.request_redraw();
                }
                Err(error) => {
                    log::error!("failed to initialize renderer: {error}");
                    self.init_error = Some(error);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                let scale_factor = window.scale_factor() as f32;
                self.stage.notify_resize(width, height, scale_factor);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(width, height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                // Normalize to [-1, 1] with (0, 0) at the window centre
                let size = window.inner_size();
                if size.width > 0 && size.height > 0 {
                    let x = (position.x as f32 / size.width as f32) * 2.0 - 1.0;
                    let y = 1.0 - (position.y as f32 / size.height as f32) * 2.0;
                    self.stage.notify_pointer(x, y);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.stage.tick();
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.render_frame(&self.stage);
                }
                window.request_redraw();
            }
            _ => {}
        }
    }
}
