use egui::{Color32, Context};
use egui_wgpu::Renderer;
use egui_winit::State;
use glam::Vec2;
use particle_layout::Mode;
use wgpu::{Device, TextureFormat};
use winit::{event::WindowEvent, window::Window};

const ACCENT: Color32 = Color32::from_rgb(0xFF, 0x69, 0xB4);
const DIM: Color32 = Color32::from_rgb(0x8A, 0x7A, 0x80);

pub struct UiState {
    pub fps: f32,
    pub frame_time: f32,
    pub particle_count: usize,
    pub mode: Mode,
    pub hand_present: bool,
    pub rotation_drive: f32,
    /// Normalized screen position of the tracked fingertip
    pub cursor: Option<Vec2>,
    pub source_label: &'static str,
    /// Set by the toggle button, consumed by the app after the frame
    pub toggle_requested: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: 0.0,
            particle_count: 0,
            mode: Mode::Assembled,
            hand_present: false,
            rotation_drive: 0.0,
            cursor: None,
            source_label: "none",
            toggle_requested: false,
        }
    }
}

pub struct Gui {
    context: Context,
    state: State,
    renderer: Renderer,
}

impl Gui {
    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let context = Context::default();
        let id = context.viewport_id();

        let state = State::new(
            context.clone(),
            id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = Renderer::new(
            device,
            output_color_format,
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                ..Default::default()
            },
        );

        Self {
            context,
            state,
            renderer,
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    pub fn render(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        ui_state: &mut UiState,
    ) {
        let raw_input = self.state.take_egui_input(window);

        let size = window.inner_size();
        let scale = window.scale_factor() as f32;
        let screen = Vec2::new(size.width as f32, size.height as f32) / scale;

        let full_output = self.context.run(raw_input, |ctx| {
            Self::ui(ctx, ui_state, screen);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: scale,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Egui Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.renderer.render(
            &mut render_pass.forget_lifetime(),
            &clipped_primitives,
            &screen_descriptor,
        );

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn ui(ctx: &Context, state: &mut UiState, screen: Vec2) {
        egui::Window::new("Morph Tree")
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let (label, color) = match state.mode {
                    Mode::Assembled => ("ASSEMBLED", ACCENT),
                    Mode::Dispersed => ("DISPERSED", Color32::WHITE),
                };
                ui.colored_label(color, egui::RichText::new(label).strong());

                if state.hand_present {
                    ui.colored_label(ACCENT, "● Hand tracked");
                    ui.label(format!("Spin drive: {:+.2}", state.rotation_drive));
                } else {
                    ui.colored_label(DIM, "○ No hand");
                }
                ui.label(format!("Landmarks: {}", state.source_label));

                ui.separator();
                if ui.button("Toggle mode").clicked() {
                    state.toggle_requested = true;
                }
            });

        egui::Window::new("Diagnostics")
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.1}", state.fps));
                ui.label(format!("Frame Time: {:.2} ms", state.frame_time));
                ui.label(format!("Particles: {}", state.particle_count));
            });

        egui::Window::new("Gestures")
            .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
            .resizable(false)
            .collapsible(true)
            .default_open(false)
            .show(ctx, |ui| {
                egui::Grid::new("gesture_legend").show(ui, |ui| {
                    for (gesture, effect) in LEGEND {
                        ui.label(*gesture);
                        ui.colored_label(DIM, *effect);
                        ui.end_row();
                    }
                });
            });

        if let Some(cursor) = state.cursor {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("hand_cursor"),
            ));
            let center = egui::pos2(cursor.x * screen.x, cursor.y * screen.y);
            painter.circle_filled(center, 6.0, ACCENT.gamma_multiply(0.8));
            painter.circle_stroke(center, 10.0, egui::Stroke::new(1.5, Color32::WHITE));
        }
    }
}

const LEGEND: &[(&str, &str)] = &[
    ("Pinch", "assemble"),
    ("Open hand", "disperse"),
    ("Hand left / right", "spin"),
    ("Click / Space", "toggle mode"),
    ("Hold P (sim)", "pinch"),
    ("H (sim)", "show / hide hand"),
    ("Drag", "orbit"),
];
