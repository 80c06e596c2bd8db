//! Interactive window showing the live field.
//!
//! | Input | Effect |
//! |-------|--------|
//! | `Up` / `Down` | count ± 1000 |
//! | `Right` / `Left` | branches ± 1 |
//! | `]` / `[` | spin ± 1 |
//! | `=` / `-` | radius ± 1 |
//! | `.` / `,` | randomness power ± 0.1 |
//! | `R` | regenerate with the current parameters |
//! | `P` | save a PNG preview |
//! | `Esc` | quit |
//! | left drag | orbit |
//! | wheel | zoom |
//!
//! Parameter keys edit on press (and on key repeat) and regenerate on
//! release, so holding a key rebuilds the field once.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::controls::{ControlPanel, ParamField};
use crate::error::{InvalidParameterError, ViewerError};
#[cfg(feature = "egui")]
use crate::gpu::EguiIntegration;
use crate::gpu::GpuState;
use crate::manager::FieldManager;
use crate::preview::{save_preview, PreviewOptions};
use crate::random::RandomSource;
use crate::scene::{ResourceId, SceneGraph};

/// What a key does in the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    /// Move a parameter by this many steps.
    Nudge(ParamField, i32),
    Regenerate,
    SavePreview,
    Quit,
}

/// Look up the action bound to a physical key.
pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    use KeyAction::*;
    let action = match code {
        KeyCode::ArrowUp => Nudge(ParamField::Count, 10),
        KeyCode::ArrowDown => Nudge(ParamField::Count, -10),
        KeyCode::ArrowRight => Nudge(ParamField::Branches, 1),
        KeyCode::ArrowLeft => Nudge(ParamField::Branches, -1),
        KeyCode::BracketRight => Nudge(ParamField::Spin, 1),
        KeyCode::BracketLeft => Nudge(ParamField::Spin, -1),
        KeyCode::Equal => Nudge(ParamField::Radius, 1),
        KeyCode::Minus => Nudge(ParamField::Radius, -1),
        KeyCode::Period => Nudge(ParamField::RandomnessPower, 1),
        KeyCode::Comma => Nudge(ParamField::RandomnessPower, -1),
        KeyCode::KeyR => Regenerate,
        KeyCode::KeyP => SavePreview,
        KeyCode::Escape => Quit,
        _ => return None,
    };
    Some(action)
}

/// Put the panel's parameters on screen, so the panel and the live field
/// start out identical.
pub fn show_initial_field<R, S>(
    panel: &ControlPanel,
    manager: &mut FieldManager<R>,
    scene: &mut S,
) -> Result<ResourceId, InvalidParameterError>
where
    R: RandomSource,
    S: SceneGraph + ?Sized,
{
    manager.regenerate(panel.params(), scene)
}

/// Open the viewer and block until its window closes.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    config.params.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    config: ViewerConfig,
    manager: FieldManager,
    panel: ControlPanel,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let manager = match config.seed {
            Some(seed) => FieldManager::with_seed(seed),
            None => FieldManager::new(),
        };
        let panel = ControlPanel::new(config.params.clone());
        Self {
            config,
            manager,
            panel,
            window: None,
            gpu_state: None,
            #[cfg(feature = "egui")]
            egui: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let mut gpu_state = pollster::block_on(GpuState::new(window.clone(), self.config.window.background))?;

        show_initial_field(&self.panel, &mut self.manager, &mut gpu_state)?;

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(gpu_state.device(), gpu_state.config.format, &window));
        }

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.update_title();
        Ok(())
    }

    /// Regenerate if the panel has pending edits.
    fn commit(&mut self) {
        let Some(gpu_state) = self.gpu_state.as_mut() else {
            return;
        };
        // A rejected set is already logged by the manager; the old field stays.
        if let Ok(Some(_)) = self.panel.commit(&mut self.manager, gpu_state) {
            self.update_title();
        }
    }

    fn update_title(&self) {
        if let (Some(window), Some(field)) = (&self.window, self.manager.live_field()) {
            let p = field.params();
            window.set_title(&format!(
                "{} | {} points, {} branches, spin {}",
                self.config.window.title, p.count, p.branches, p.spin
            ));
        }
    }

    fn save_preview(&self) {
        let Some(field) = self.manager.live_field() else {
            return;
        };
        let options = PreviewOptions {
            background: self.config.window.background,
            ..PreviewOptions::sized(self.config.preview.width, self.config.preview.height)
        };
        if let Err(e) = save_preview(field, &self.config.preview.path, &options) {
            tracing::error!(error = %e, "failed to save preview");
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(action) = key_action(code) else {
            return;
        };

        match (action, event.state) {
            (KeyAction::Nudge(field, steps), ElementState::Pressed) => {
                let value = self.panel.nudge(field, steps);
                tracing::debug!(field = field.name(), value, "edited parameter");
            }
            (KeyAction::Nudge(..), ElementState::Released) => self.commit(),
            (KeyAction::Regenerate, ElementState::Pressed) if !event.repeat => {
                self.panel.mark_dirty();
                self.commit();
            }
            (KeyAction::SavePreview, ElementState::Pressed) if !event.repeat => self.save_preview(),
            (KeyAction::Quit, ElementState::Pressed) => event_loop.exit(),
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        #[cfg(feature = "egui")]
        let mut finished = false;
        #[cfg(feature = "egui")]
        let ui_output = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => {
                let panel = &mut self.panel;
                Some(egui.run(window, |ctx| {
                    egui::Window::new("Galaxy").show(ctx, |ui| {
                        finished |= panel.ui(ui);
                    });
                }))
            }
            _ => None,
        };
        #[cfg(feature = "egui")]
        if finished {
            self.commit();
        }

        let Some(gpu_state) = self.gpu_state.as_mut() else {
            return;
        };

        match gpu_state.begin_frame() {
            Ok(frame) => {
                #[cfg(feature = "egui")]
                let mut frame = frame;
                #[cfg(feature = "egui")]
                if let (Some(egui), Some(output)) = (&mut self.egui, ui_output) {
                    let size = [gpu_state.config.width, gpu_state.config.height];
                    egui.paint(gpu_state.device(), gpu_state.queue(), &mut frame, size, output);
                }
                gpu_state.present(frame);
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => tracing::warn!(error = ?e, "render error"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!(error = %e, "failed to start viewer");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            let consumed = egui.on_window_event(window, &event);
            let passthrough = matches!(
                event,
                WindowEvent::CloseRequested | WindowEvent::Resized(_) | WindowEvent::RedrawRequested
            );
            if consumed && !passthrough {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state
                                .camera
                                .orbit((position.x - last_x) as f32, (position.y - last_y) as f32);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu_state) = self.gpu_state.as_mut() {
            self.manager.clear(gpu_state);
        }
        let stats = self.manager.stats();
        tracing::info!(
            generations = stats.generations,
            disposals = stats.disposals,
            rejected = stats.rejected,
            "viewer closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HeadlessScene;

    #[test]
    fn test_every_editable_key_nudges_a_different_direction() {
        let pairs = [
            (KeyCode::ArrowUp, KeyCode::ArrowDown),
            (KeyCode::ArrowRight, KeyCode::ArrowLeft),
            (KeyCode::BracketRight, KeyCode::BracketLeft),
            (KeyCode::Equal, KeyCode::Minus),
            (KeyCode::Period, KeyCode::Comma),
        ];
        for (up, down) in pairs {
            match (key_action(up), key_action(down)) {
                (Some(KeyAction::Nudge(a, x)), Some(KeyAction::Nudge(b, y))) => {
                    assert_eq!(a, b);
                    assert_eq!(x, -y);
                    assert!(x > 0);
                }
                other => panic!("unexpected bindings {:?}", other),
            }
        }
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(key_action(KeyCode::KeyR), Some(KeyAction::Regenerate));
        assert_eq!(key_action(KeyCode::KeyP), Some(KeyAction::SavePreview));
        assert_eq!(key_action(KeyCode::Escape), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_key_edit_keeps_unedited_config_values() {
        let config = ViewerConfig::from_json(
            r#"{ "params": { "count": 50, "spin": 0, "radius": 2.5, "branches": 3 }, "seed": 1 }"#,
        )
        .unwrap();
        let mut panel = ControlPanel::new(config.params.clone());
        let mut manager = FieldManager::with_seed(1);
        let mut scene = HeadlessScene::new();

        show_initial_field(&panel, &mut manager, &mut scene).unwrap();
        assert_eq!(manager.live_field().unwrap().params(), panel.params());

        // Right arrow: press nudges, release commits.
        let Some(KeyAction::Nudge(field, steps)) = key_action(KeyCode::ArrowRight) else {
            panic!("ArrowRight is not a nudge");
        };
        panel.nudge(field, steps);
        panel.commit(&mut manager, &mut scene).unwrap();

        let live = manager.live_field().unwrap().params();
        assert_eq!(live.branches, 4);
        assert_eq!(live.count, 50);
        assert_eq!(live.spin, 0.0);
        assert_eq!(live.radius, 2.5);
        assert_eq!(manager.live_field().unwrap().len(), 50);
    }

    #[test]
    fn test_count_keys_move_by_a_thousand() {
        let mut panel = ControlPanel::new(Default::default());
        let Some(KeyAction::Nudge(field, steps)) = key_action(KeyCode::ArrowUp) else {
            panic!("ArrowUp is not a nudge");
        };
        assert_eq!(panel.nudge(field, steps), 101_000.0);
    }
}
