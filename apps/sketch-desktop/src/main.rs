mod window;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use sketch_common::{ObjectId, SketchConfig};
use sketch_loop::{Callbacks, Sketch, Ticker};
use sketch_render_wgpu::WgpuRenderer;
use sketch_scene::{Drawable, Geometry, Material};

use crate::window::WindowContainer;

#[derive(Parser)]
#[command(name = "sketch-desktop", about = "Spinning-cube sketch in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Sketch config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

const CUBE_SIZE: f32 = 25.0;

/// Everything that exists once the window does.
struct Running {
    container: WindowContainer,
    sketch: Sketch<WgpuRenderer>,
}

struct App {
    config: SketchConfig,
    ticker: Ticker,
    running: Option<Running>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: SketchConfig) -> Self {
        Self {
            config,
            ticker: Ticker::new(),
            running: None,
            failure: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attrs = Window::default_attributes()
            .with_title("sketch")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let renderer = WgpuRenderer::new(window.clone(), &self.config.surface)
            .context("failed to initialize GPU")?;

        let cube = ObjectId::new();
        let callbacks = Callbacks::new().on_fixed_update(move |time, scene| {
            if let Some(drawable) = scene.get_mut(cube) {
                let e = time.elapsed as f32;
                drawable.transform.set_euler(e, e * 0.5, e * 0.25);
            }
        });

        let mut container = WindowContainer::new(window);
        let mut sketch = Sketch::new(
            &mut container,
            &self.config,
            renderer,
            self.ticker.clone(),
            callbacks,
        )?;
        sketch.scene().add_with_id(
            cube,
            Drawable::new(Geometry::cube(CUBE_SIZE), Material::Normal),
        );
        sketch.resume();
        container.window().request_redraw();

        Ok(Running { container, sketch })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                running.sketch.pause();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                running.sketch.resize(&running.container);
            }
            WindowEvent::Occluded(occluded) => {
                if occluded {
                    running.sketch.pause();
                } else {
                    running.sketch.resume();
                    running.container.window().request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                self.ticker.dispatch();
                if running.sketch.is_running() {
                    running.container.window().request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            let stats = running.sketch.stats();
            tracing::info!(
                frames = stats.frames,
                fixed_steps = stats.fixed_steps,
                fps = stats.frame_times.fps(),
                "sketch-desktop exiting"
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SketchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SketchConfig::default(),
    };

    tracing::info!("sketch-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
