//! Morph Tree
//!
//! A few thousand small solids that either stack into a spiralling cone or
//! drift apart into a loose cloud. A pinch assembles the tree, an open hand
//! scatters it, and moving the hand sideways spins it.

mod gui;
mod pointer;
mod scene;

use anyhow::{Context, Result};
use clap::Parser;
use gui::{Gui, UiState};
use particle_renderer::{Camera, MorphRenderer};
use pointer::PointerTracker;
use scene::{Args, Scene};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: MorphRenderer,
    camera: Camera,
    gui: Gui,
    ui_state: UiState,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl GpuState {
    async fn new(window: Arc<Window>, scene: &Scene) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("Surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer = MorphRenderer::new(&device, &queue, &config, scene.layout());
        scene.upload_colors(&mut renderer);
        log::info!("✓ Renderer initialized");

        let camera = Camera::new(size.width, size.height);
        let gui = Gui::new(&device, config.format, &window);
        let ui_state = UiState {
            particle_count: scene.particle_count(),
            source_label: scene.source().label(),
            ..Default::default()
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            camera,
            gui,
            ui_state,
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, &self.config);
            self.camera.resize(new_size.width, new_size.height);
        }
    }

    fn render(&mut self, window: &Window, scene: &mut Scene) -> Result<(f32, f32), wgpu::SurfaceError> {
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        if self.frame_times.len() == self.frame_times.capacity() {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        let avg_frame_time =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = if avg_frame_time > 0.0 {
            1000.0 / avg_frame_time
        } else {
            0.0
        };

        let input = scene.advance();
        scene.flush(&mut self.renderer);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&self.device, &view, &self.camera, input.elapsed);

        let gesture = scene.gesture();
        self.ui_state.fps = fps;
        self.ui_state.frame_time = avg_frame_time;
        self.ui_state.mode = gesture.mode;
        self.ui_state.hand_present = gesture.hand_present;
        self.ui_state.rotation_drive = gesture.rotation_drive;
        self.ui_state.cursor = gesture.cursor;

        {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("GUI Encoder"),
                });

            self.gui.render(
                &self.device,
                &self.queue,
                &mut encoder,
                window,
                &view,
                &mut self.ui_state,
            );

            self.queue.submit(std::iter::once(encoder.finish()));
        }

        if std::mem::take(&mut self.ui_state.toggle_requested) {
            scene.toggle_mode();
        }

        output.present();
        Ok((fps, avg_frame_time))
    }
}

struct App {
    scene: Scene,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,

    pointer: PointerTracker,
}

impl App {
    fn new(scene: Scene) -> Self {
        Self {
            scene,
            window: None,
            gpu_state: None,
            pointer: PointerTracker::default(),
        }
    }

    fn on_cursor_moved(&mut self, x: f64, y: f64) {
        if let Some(window) = &self.window {
            let size = window.inner_size();
            let w = size.width.max(1) as f64;
            let h = size.height.max(1) as f64;
            self.scene.sim_cursor((x / w) as f32, (y / h) as f32);
        }

        if let Some((delta_x, delta_y)) = self.pointer.moved(x, y) {
            if let Some(gpu_state) = &mut self.gpu_state {
                gpu_state.camera.rotate(delta_x * 0.005, delta_y * 0.005);
            }
        }
    }

    fn on_left_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => self.pointer.press(),
            ElementState::Released => {
                if self.pointer.release() {
                    self.scene.toggle_mode();
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Morph Tree")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(GpuState::new(window.clone(), &self.scene)) {
            Ok(gpu_state) => {
                self.gpu_state = Some(gpu_state);
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("GPU initialization failed: {e:#}");
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
        // Handle GUI events
        if let (Some(gpu_state), Some(window)) = (&mut self.gpu_state, &self.window) {
            if gpu_state.gui.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.scene.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match (key_code, state) {
                (KeyCode::Space, ElementState::Pressed) if !repeat => self.scene.toggle_mode(),
                (KeyCode::KeyP, state) if !repeat => {
                    self.scene.sim_pinch(state == ElementState::Pressed)
                }
                (KeyCode::KeyH, ElementState::Pressed) if !repeat => {
                    self.scene.sim_toggle_hand()
                }
                _ => {}
            },

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.on_left_button(state),

            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_x, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.02,
                };

                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.zoom(-scroll * 0.8);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render(window, &mut self.scene) {
                        Ok((fps, frame_time)) => {
                            window.set_title(&format!(
                                "Morph Tree - {:.0} FPS ({:.2}ms) - {} particles",
                                fps,
                                frame_time,
                                self.scene.particle_count()
                            ));
                        }
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(window.inner_size())
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Surface out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Render error: {e:?}"),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting morph tree...");

    let scene = Scene::new(&args)?;

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene);
    event_loop.run_app(&mut app)?;
    Ok(())
}
