use std::path::PathBuf;

use eframe::egui;
use particle_field::surface::backing_size;
use particle_field::{
    Container, FieldConfig, FrameLoops, Glow, ParticleView, Rgb, SharedPointer, Surface,
};

const GLOW_SEGMENTS: u32 = 20;

/// Collects glows into one egui mesh per frame, in canvas-local coordinates.
#[derive(Default)]
struct MeshSurface {
    backing: (u32, u32),
    mesh: egui::Mesh,
}

fn glow_color(glow: &Glow, alpha: f32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        glow.color.r,
        glow.color.g,
        glow.color.b,
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

impl Surface for MeshSurface {
    fn configure(&mut self, logical: cgmath::Vector2<f32>, device_pixel_ratio: f32) {
        self.backing = backing_size(logical, device_pixel_ratio);
        self.mesh = egui::Mesh::default();
    }

    fn clear(&mut self) {
        self.mesh = egui::Mesh::default();
    }

    fn fill_glow(&mut self, glow: &Glow) {
        if self.backing.0 == 0 || self.backing.1 == 0 || glow.alpha <= 0.0 {
            return;
        }

        // Triangle fan with two rings so vertex colors approximate the radial gradient.
        let center = egui::pos2(glow.center.x, glow.center.y);
        let base = self.mesh.vertices.len() as u32;
        self.mesh.colored_vertex(center, glow_color(glow, glow.alpha));

        let rings = [glow.radius * 0.5, glow.radius];
        for radius in rings {
            let color = glow_color(glow, glow.alpha_at(radius));
            for segment in 0..GLOW_SEGMENTS {
                let angle = segment as f32 / GLOW_SEGMENTS as f32 * std::f32::consts::TAU;
                let point = center + egui::vec2(angle.cos(), angle.sin()) * radius;
                self.mesh.colored_vertex(point, color);
            }
        }

        for segment in 0..GLOW_SEGMENTS {
            let next = (segment + 1) % GLOW_SEGMENTS;
            let inner = base + 1;
            let outer = base + 1 + GLOW_SEGMENTS;
            self.mesh.add_triangle(base, inner + segment, inner + next);
            self.mesh.add_triangle(inner + segment, outer + segment, outer + next);
            self.mesh.add_triangle(inner + segment, outer + next, inner + next);
        }
    }
}

struct FieldApp {
    config: FieldConfig,
    config_path: Option<PathBuf>,
    loops: FrameLoops,
    pointer: SharedPointer,
    view: Option<ParticleView<MeshSurface, SharedPointer>>,
    color_input: String,
    status: Option<String>,
    last_frame_time: std::time::Instant,
}

impl FieldApp {
    fn new(config: FieldConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            color_input: config.color.clone(),
            config,
            config_path,
            loops: FrameLoops::new(),
            pointer: SharedPointer::new(),
            view: None,
            status: None,
            last_frame_time: std::time::Instant::now(),
        }
    }

    fn mount(&mut self, container: Container) {
        match ParticleView::mount(
            self.config.clone(),
            container,
            &self.loops,
            MeshSurface::default(),
            self.pointer.clone(),
        ) {
            Ok(view) => {
                self.view = Some(view);
                self.status = None;
            }
            Err(err) => {
                log::error!("mount failed: {err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn unmount(&mut self) {
        self.status = None;
        if let Some(view) = self.view.take() {
            view.unmount();
        }
    }

    fn apply_config(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        if view.field().config() == &self.config {
            return;
        }
        match view.reconfigure(self.config.clone()) {
            Ok(()) => self.status = None,
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn render_ui_panel(&mut self, ui: &mut egui::Ui, frame_time: f32) {
        ui.label(format!("FPS: {:.1}", 1.0 / frame_time.max(f32::EPSILON)));
        ui.label(format!("Frame Time: {:.3}ms", frame_time * 1000.0));
        if let Some(view) = &self.view {
            let field = view.field();
            ui.label(format!("Particles: {}", field.len()));
            ui.label(format!("Frame: {}", field.frame()));
            let target = field.pointer_target();
            ui.label(format!("Pointer: ({:.0}, {:.0})", target.x, target.y));
        }
        ui.label(format!("Running loops: {}", self.loops.active()));
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Quantity: ");
            ui.add(egui::Slider::new(&mut self.config.quantity, 0..=500));
        });
        ui.horizontal(|ui| {
            ui.label("Staticity: ");
            ui.add(egui::Slider::new(&mut self.config.staticity, 1.0..=200.0));
        });
        ui.horizontal(|ui| {
            ui.label("Ease: ");
            ui.add(egui::Slider::new(&mut self.config.ease, 1.0..=200.0));
        });
        ui.horizontal(|ui| {
            ui.label("Size: ");
            ui.add(egui::Slider::new(&mut self.config.size, 0.0..=5.0));
        });
        ui.horizontal(|ui| {
            ui.label("Drift X: ");
            ui.add(egui::Slider::new(&mut self.config.vx, -2.0..=2.0));
        });
        ui.horizontal(|ui| {
            ui.label("Drift Y: ");
            ui.add(egui::Slider::new(&mut self.config.vy, -2.0..=2.0));
        });

        ui.horizontal(|ui| {
            ui.label("Color: ");
            ui.text_edit_singleline(&mut self.color_input);
        });
        // half-typed colors stay in the text box until they parse
        if self.color_input != self.config.color && Rgb::from_hex(&self.color_input).is_ok() {
            self.config.color = self.color_input.clone();
        }

        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                self.config.refresh = !self.config.refresh;
            }
            if ui.button("Remount").clicked() {
                self.unmount();
            }
        });

        if let Some(path) = self.config_path.clone() {
            if ui.button("Save Config").clicked() {
                match self.config.save(&path) {
                    Ok(()) => log::info!("saved config to {}", path.display()),
                    Err(err) => self.status = Some(err.to_string()),
                }
            }
        }

        if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::LIGHT_RED, status.as_str());
        }
    }
}

impl eframe::App for FieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = std::time::Instant::now();
        let frame_time = current_time.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = current_time;

        if let Some(position) = ctx.input(|i| i.pointer.hover_pos()) {
            self.pointer.record(position.x, position.y);
        }

        egui::SidePanel::left("Control Panel").show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_ui_panel(ui, frame_time);
                ui.allocate_space(ui.available_size());
            });
        });
        self.apply_config();

        let mut keep_running = true;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ctx.style().visuals.panel_fill))
            .show(ctx, |ui| {
                let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                let container = Container::new(
                    cgmath::vec2(rect.min.x, rect.min.y),
                    cgmath::vec2(rect.width(), rect.height()),
                    ctx.pixels_per_point(),
                );

                match self.view.as_mut() {
                    None if self.status.is_none() => self.mount(container),
                    None => {}
                    Some(view) => {
                        let mounted = view.container();
                        if mounted.size != container.size || mounted.device_pixel_ratio != container.device_pixel_ratio {
                            view.resize(container);
                        } else if mounted.origin != container.origin {
                            view.reposition(container.origin);
                        }
                    }
                }

                if let Some(view) = self.view.as_mut() {
                    keep_running = view.frame();
                    let mut mesh = view.surface().mesh.clone();
                    mesh.translate(rect.min.to_vec2());
                    ui.painter().with_clip_rect(rect).add(egui::Shape::mesh(mesh));
                }
            });

        if keep_running {
            ctx.request_repaint();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match &config_path {
        Some(path) if path.exists() => FieldConfig::load(path)?,
        _ => FieldConfig::hero(),
    };
    log::info!("starting with {config:?}");

    eframe::run_native(
        "Particle Field",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(1280.0, 800.0)),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(FieldApp::new(config, config_path))),
    )
    .map_err(|err| anyhow::anyhow!("eframe: {err}"))
}
