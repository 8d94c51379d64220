//! The winit viewer: one window, one simulation, one renderer.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::error::AppError;
use crate::gpu::SpriteRenderer;
use crate::input::{self, Command};
use crate::loader::{ImageLoader, LoadedImage};
use crate::pixels::ImageSource;
use crate::settings::Settings;
use crate::simulation::Simulation;
use crate::time::{FrameClock, TickProfiler};

const TITLE: &str = "Image Particles";

/// Ticks between average tick time reports.
const PROFILE_INTERVAL: u64 = 600;

pub struct App {
    settings: Settings,
    /// Image behind the current field; `R` reloads it.
    source: Option<ImageSource>,
    window: Option<Arc<Window>>,
    renderer: Option<SpriteRenderer>,
    simulation: Simulation,
    loader: ImageLoader,
    clock: FrameClock,
    profiler: TickProfiler,
    error: Option<AppError>,
}

impl App {
    /// Create the viewer and start loading `source` right away.
    pub fn new(settings: Settings, source: Option<ImageSource>) -> Self {
        let mut loader = ImageLoader::new(settings.clone());
        if let Some(source) = source {
            loader.request(source);
        }
        Self {
            settings,
            source: None,
            window: None,
            renderer: None,
            simulation: Simulation::new(),
            loader,
            clock: FrameClock::new(),
            profiler: TickProfiler::new(),
            error: None,
        }
    }

    /// The fatal error that stopped the event loop, if any.
    pub fn into_result(self) -> Result<(), AppError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn run_command(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        match command {
            Command::TogglePause => {
                self.clock.toggle_pause();
                log::info!(
                    "{}",
                    if self.clock.is_paused() { "Paused" } else { "Resumed" }
                );
                self.update_title();
            }
            Command::Reload => match &self.source {
                Some(source) => self.loader.request(source.clone()),
                None => log::warn!("Nothing to reload"),
            },
            Command::Quit => event_loop.exit(),
        }
    }

    /// Swap in the latest finished load. Failures were already logged by the loader.
    fn poll_loader(&mut self) {
        let Some(Ok(loaded)) = self.loader.poll() else {
            return;
        };
        let LoadedImage {
            source,
            size,
            field,
        } = loaded;

        log::info!(
            "Showing {} ({}x{}, {} particles)",
            source.describe(),
            size.0,
            size.1,
            field.len()
        );
        self.simulation.replace_field(field);
        self.source = Some(source);

        if let Some(window) = &self.window {
            if let Some(actual) = window.request_inner_size(PhysicalSize::new(size.0, size.1)) {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(actual);
                }
            }
        }
        self.update_title();
    }

    fn tick(&mut self) {
        if !self.clock.advance() {
            return;
        }
        if let Err(violation) = self.profiler.measure(|| self.simulation.tick()) {
            log::error!("Frame {}: {}", self.simulation.frame(), violation);
        }
        if self.profiler.samples() >= PROFILE_INTERVAL {
            if let Some(average) = self.profiler.average() {
                log::debug!(
                    "Average tick over {} frames: {:?} ({} particles)",
                    self.profiler.samples(),
                    average,
                    self.simulation.field().len()
                );
            }
            self.profiler.reset();
        }
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let mut title = format!(
            "{} - {} particles - {:.0} FPS",
            TITLE,
            self.simulation.field().len(),
            self.clock.fps()
        );
        if self.clock.is_paused() {
            title.push_str(" (paused)");
        }
        if self.loader.is_loading() {
            title.push_str(" (loading)");
        }
        window.set_title(&title);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(800, 600));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        match pollster::block_on(SpriteRenderer::new(
            window,
            self.settings.sprite_size,
            self.settings.background,
        )) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer) = input::pointer_event(&event) {
            self.simulation.handle_event(pointer);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(command) = input::key_command(physical_key) {
                    self.run_command(event_loop, command);
                }
            }
            WindowEvent::DroppedFile(path) => {
                self.loader.request(ImageSource::from(path));
                self.update_title();
            }
            WindowEvent::RedrawRequested => {
                self.poll_loader();
                self.tick();

                if let Some(renderer) = &mut self.renderer {
                    renderer.upload(self.simulation.sprites());
                    match renderer.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            log::warn!("Surface lost, reconfiguring");
                            renderer.resize(PhysicalSize {
                                width: renderer.config.width,
                                height: renderer.config.height,
                            });
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Dropped frame: {:?}", e),
                    }
                }

                if self.clock.fps_updated() {
                    self.update_title();
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
