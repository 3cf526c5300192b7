//! Interactive 3-D DLA snowflake viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] and an
//! [`OrbitCamera`] and implements [`eframe::App`] to step, draw and control
//! the aggregation through an egui UI.

use crate::camera::OrbitCamera;
use eframe::App;
use sim_core::{Config, Simulation};

/// Structure colour near the seed.
const CORE_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 200, 255);
/// Structure colour at the tips.
const TIP_COLOR: egui::Color32 = egui::Color32::from_rgb(240, 250, 255);
const WALKER_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 170, 60);
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(4, 6, 14);

/// One particle ready to paint, in back-to-front order.
#[derive(Clone, Copy, Debug)]
struct Sprite {
    pos: egui::Pos2,
    depth: f32,
    radius: f32,
    color: egui::Color32,
}

/// Main application state for the viewer.
///
/// Each frame:
/// 1. Handle UI interactions (orbit, zoom, buttons).
/// 2. If `running`, advance the simulation `steps_per_frame` times.
/// 3. Re-project the instance buffer when it or the camera changed, then
///    draw glow halos and particles.
pub struct Viewer {
    sim: Simulation,
    /// Edited in the side panel; applied on "Apply & reset".
    cfg_edit: Config,
    cfg_error: Option<String>,

    camera: OrbitCamera,
    auto_rotate: bool,
    /// Strength of the halo drawn behind each particle, 0 disables it.
    glow: f32,

    running: bool,
    steps_per_frame: usize,

    sprites: Vec<Sprite>,
    /// Cached structure extent, refreshed only when the structure grows.
    extent: f32,
    sprites_key: Option<(OrbitCamera, egui::Rect)>,

    frame_dt: f32,
}

impl Viewer {
    /// Creates a viewer running a fresh simulation.
    ///
    /// ### Errors
    /// Fails if `cfg` is invalid.
    pub fn new(cfg: Config, seed: u64) -> anyhow::Result<Self> {
        let sim = Simulation::new(cfg, seed)?;
        let mut camera = OrbitCamera::default();
        camera.frame(cfg.spawn_radius);

        Ok(Self {
            sim,
            cfg_edit: cfg,
            cfg_error: None,
            camera,
            auto_rotate: true,
            glow: 0.6,
            running: true,
            steps_per_frame: 1,
            sprites: Vec::with_capacity(cfg.max_particles),
            extent: 0.0,
            sprites_key: None,
            frame_dt: 0.0,
        })
    }

    /// Advances the simulation by `steps_per_frame` steps.
    fn step_frame(&mut self) {
        for _ in 0..self.steps_per_frame {
            self.step_once();
        }
    }

    fn step_once(&mut self) {
        if self.sim.step().structure_changed {
            self.extent = self.sim.structure().extent();
        }
    }

    fn reset(&mut self) {
        self.sim.reset();
        self.extent = self.sim.structure().extent();
        self.sprites_key = None;
    }

    fn reseed(&mut self) {
        let seed = rand::random();
        log::info!("reseeding with {seed}");
        self.sim.reseed(seed);
        self.extent = self.sim.structure().extent();
        self.sprites_key = None;
    }

    /// Validates the edited config and restarts the simulation with it.
    ///
    /// On failure the running simulation is kept and the error is shown in
    /// the config panel.
    fn apply_config(&mut self) {
        match self.sim.reconfigure(self.cfg_edit) {
            Ok(()) => {
                log::info!("applied config {:?}", self.cfg_edit);
                self.cfg_error = None;
                self.camera.frame(self.cfg_edit.spawn_radius);
                self.extent = self.sim.structure().extent();
                self.sprites_key = None;
            }
            Err(err) => {
                log::warn!("rejected config: {err:#}");
                self.cfg_error = Some(format!("{err:#}"));
            }
        }
    }

    /// Projects the live instances and sorts them back to front.
    ///
    /// Skipped when neither the instance buffer, the camera, nor the
    /// viewport changed since the last call.
    fn refresh_sprites(&mut self, rect: egui::Rect) {
        let changed = self.sim.instances_mut().take_needs_update();
        let key = (self.camera, rect);
        if !changed && self.sprites_key == Some(key) {
            return;
        }
        self.sprites_key = Some(key);

        let radius = self.sim.config().particle_radius;
        let structure_len = self.sim.structure().len();
        let extent = self.extent.max(radius);

        self.sprites.clear();
        for (i, &p) in self.sim.instances().live_positions().iter().enumerate() {
            let Some(proj) = self.camera.project(p, rect) else {
                continue;
            };
            let color = if i < structure_len {
                lerp_color(CORE_COLOR, TIP_COLOR, p.length() / extent)
            } else {
                WALKER_COLOR
            };
            self.sprites.push(Sprite {
                pos: proj.pos,
                depth: proj.depth,
                radius: (radius * proj.scale).max(1.0),
                color,
            });
        }
        self.sprites.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    }

    /// Builds the top panel (run controls, speed, camera toggles).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Reseed").clicked() {
                    self.reseed();
                }

                ui.separator();
                ui.add(
                    egui::DragValue::new(&mut self.steps_per_frame)
                        .prefix("steps/frame = ")
                        .range(1..=50)
                        .speed(0.2),
                );

                ui.separator();
                ui.checkbox(&mut self.auto_rotate, "Auto-rotate");
                ui.add(egui::Slider::new(&mut self.glow, 0.0..=1.0).text("Glow"));
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let stats = self.sim.stats();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let fps = if self.frame_dt > 0.0 { 1.0 / self.frame_dt } else { 0.0 };
                ui.label(format!("{fps:.0} fps"));
                ui.label(format!("seed = {}", self.sim.seed()));
                ui.separator();
                ui.label(format!("steps = {}", stats.steps));
                ui.label(format!("walkers = {}", stats.walkers));
                ui.label(format!("structure = {} / {}", stats.structure, stats.capacity));
                if stats.is_full {
                    ui.colored_label(egui::Color32::YELLOW, "full");
                }
            });
        });
    }

    /// Builds the right-hand panel for editing engine constants.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Particles");
                labeled_drag_f32(ui, "particle_radius:", &mut self.cfg_edit.particle_radius, 0.01..=1.0, 0.005);
                labeled_drag_usize(ui, "max_particles:", &mut self.cfg_edit.max_particles, 1..=20_000, 10.0);

                ui.separator();
                ui.label("Walkers");
                labeled_drag_usize(ui, "max_active:", &mut self.cfg_edit.max_active, 0..=200, 1.0);
                labeled_drag_f32(ui, "spawn_radius:", &mut self.cfg_edit.spawn_radius, 0.1..=20.0, 0.05);
                labeled_drag_f32(ui, "step_size:", &mut self.cfg_edit.step_size, 0.0..=1.0, 0.005);
                labeled_drag_f32(ui, "jitter:", &mut self.cfg_edit.jitter, 0.0..=2.0, 0.01);

                ui.separator();
                if ui.button("Apply & reset").clicked() {
                    self.apply_config();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg_edit = Config::default();
                }

                if let Some(err) = &self.cfg_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
            });
    }

    /// Builds the central 3-D view with orbit and zoom interaction.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(BACKGROUND))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
                let rect = response.rect;

                if response.dragged() {
                    self.camera.orbit(response.drag_delta());
                } else if self.auto_rotate {
                    self.camera.yaw += 0.3 * self.frame_dt;
                }

                if response.hovered() {
                    let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                    if scroll != 0.0 {
                        self.camera.zoom((1.0 - scroll * 0.001).clamp(0.5, 2.0));
                    }
                }

                self.refresh_sprites(rect);

                let painter = ui.painter_at(rect);
                for s in &self.sprites {
                    if self.glow > 0.0 {
                        let alpha = (self.glow * 40.0) as u8;
                        let halo = egui::Color32::from_rgba_unmultiplied(s.color.r(), s.color.g(), s.color.b(), alpha);
                        painter.circle_filled(s.pos, s.radius * 2.5, halo);
                    }
                    painter.circle_filled(s.pos, s.radius, s.color);
                }
            });
    }
}

/// Helper to draw a labeled `usize` [`egui::DragValue`].
fn labeled_drag_usize(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut usize,
    range: std::ops::RangeInclusive<usize>,
    speed: f64,
) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).range(range).speed(speed));
    });
}

/// Helper to draw a labeled `f32` [`egui::DragValue`].
fn labeled_drag_f32(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    speed: f64,
) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).range(range).speed(speed));
    });
}

fn lerp_color(a: egui::Color32, b: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    egui::Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

impl App for Viewer {
    /// eframe callback: steps the simulation and builds all panels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame_dt = ctx.input(|i| i.stable_dt);

        if self.running {
            self.step_frame();
        }

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);

        if self.running || self.auto_rotate {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn small_config() -> Config {
        Config {
            max_particles: 64,
            ..Config::default()
        }
    }

    #[test]
    fn new_starts_running_with_seed_sprite_pending() {
        let viewer = Viewer::new(small_config(), 1).unwrap();
        assert!(viewer.running);
        assert_eq!(viewer.sim.stats().structure, 1);
        assert!(viewer.sim.instances().needs_update());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = Config {
            particle_radius: -1.0,
            ..Config::default()
        };
        assert!(Viewer::new(cfg, 1).is_err());
    }

    #[test]
    fn step_frame_runs_configured_number_of_steps() {
        let mut viewer = Viewer::new(small_config(), 2).unwrap();
        viewer.steps_per_frame = 5;
        viewer.step_frame();
        assert_eq!(viewer.sim.stats().steps, 5);
    }

    #[test]
    fn extent_follows_structure_growth() {
        let cfg = Config {
            spawn_radius: 0.5,
            step_size: 0.1,
            ..small_config()
        };
        let mut viewer = Viewer::new(cfg, 9).unwrap();
        viewer.steps_per_frame = 200;
        viewer.step_frame();

        assert!(viewer.sim.structure().len() > 1, "no walker stuck");
        assert_eq!(viewer.extent, viewer.sim.structure().extent());

        viewer.reset();
        assert_eq!(viewer.extent, 0.0);
    }

    #[test]
    fn refresh_sprites_projects_live_instances_back_to_front() {
        let mut viewer = Viewer::new(small_config(), 3).unwrap();
        viewer.step_frame();
        viewer.refresh_sprites(test_rect());

        assert_eq!(viewer.sprites.len(), viewer.sim.instances().live_count());
        assert!(viewer.sprites.windows(2).all(|w| w[0].depth >= w[1].depth));
        assert!(!viewer.sim.instances().needs_update());
    }

    #[test]
    fn refresh_sprites_is_cached_until_something_changes() {
        let mut viewer = Viewer::new(small_config(), 4).unwrap();
        viewer.refresh_sprites(test_rect());
        let key = viewer.sprites_key;

        viewer.sprites.clear();
        viewer.refresh_sprites(test_rect());
        assert!(viewer.sprites.is_empty(), "unchanged frame should reuse cache");
        assert_eq!(viewer.sprites_key, key);

        viewer.camera.orbit(egui::vec2(10.0, 0.0));
        viewer.refresh_sprites(test_rect());
        assert_eq!(viewer.sprites.len(), 1);
    }

    #[test]
    fn walkers_use_walker_color() {
        let mut viewer = Viewer::new(small_config(), 5).unwrap();
        viewer.step_frame();
        viewer.refresh_sprites(test_rect());
        let walkers = viewer
            .sprites
            .iter()
            .filter(|s| s.color == WALKER_COLOR)
            .count();
        assert_eq!(walkers, viewer.sim.walkers().len());
    }

    #[test]
    fn apply_config_restarts_with_new_capacity() {
        let mut viewer = Viewer::new(small_config(), 6).unwrap();
        viewer.step_frame();
        viewer.cfg_edit.max_particles = 32;
        viewer.apply_config();

        assert!(viewer.cfg_error.is_none());
        assert_eq!(viewer.sim.stats().capacity, 32);
        assert_eq!(viewer.sim.stats().steps, 0);
    }

    #[test]
    fn apply_config_keeps_running_sim_on_error() {
        let mut viewer = Viewer::new(small_config(), 7).unwrap();
        viewer.step_frame();
        viewer.cfg_edit.spawn_radius = 0.0;
        viewer.apply_config();

        assert!(viewer.cfg_error.is_some());
        assert_eq!(viewer.sim.stats().capacity, 64);
        assert_eq!(viewer.sim.stats().steps, 1);
    }

    #[test]
    fn reset_returns_to_seed() {
        let mut viewer = Viewer::new(small_config(), 8).unwrap();
        viewer.steps_per_frame = 20;
        viewer.step_frame();
        viewer.reset();
        assert_eq!(viewer.sim.stats().structure, 1);
        assert_eq!(viewer.sim.stats().walkers, 0);
        assert!(viewer.sprites_key.is_none());
    }

    #[test]
    fn lerp_color_hits_endpoints() {
        assert_eq!(lerp_color(CORE_COLOR, TIP_COLOR, 0.0), CORE_COLOR);
        assert_eq!(lerp_color(CORE_COLOR, TIP_COLOR, 1.0), TIP_COLOR);
        assert_eq!(lerp_color(CORE_COLOR, TIP_COLOR, 7.0), TIP_COLOR);
    }
}
