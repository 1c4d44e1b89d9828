use eframe::egui::{self, Color32, Stroke};
use eframe::epaint::Vec2;
use egui_plot::{Line, Plot, PlotPoints};

use collision_sim::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use collision_sim::{Container, Rgb, Simulation, SimulationConfig};

// ===================================================================================
// Phases
// ===================================================================================

/// The window first shows the particles; once the termination predicate fires
/// it switches to a plot of the recorded mean speeds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    Particles,
    Telemetry,
}

// ===================================================================================
// Main Application
// ===================================================================================

/// The viewer state:
/// - `params` edited through the side panel while stopped
/// - the `Simulation` itself, rebuilt on Reset with the next seed
/// - the current `Phase`
///
/// One simulation step is taken per repaint while running.
pub struct ViewerApp {
    // -------------- Config / UI --------------
    params: SimulationConfig, // user-chosen parameters
    circle: bool,             // circular container instead of the rectangle
    bounds: (f32, f32),       // drawing area the container is fitted into
    running: bool,            // is the simulation running?
    needs_reset: bool,        // parameters changed since the last reset
    seed: u64,

    // -------------- Simulation Data --------------
    sim: Simulation,
    phase: Phase,
}

impl ViewerApp {
    pub fn new(params: SimulationConfig, sim: Simulation, seed: u64) -> Self {
        let circle = matches!(params.container, Container::Circle { .. });
        let bounds = drawing_area(&params.container);
        Self {
            params,
            circle,
            bounds,
            running: false,
            needs_reset: false,
            seed,
            sim,
            phase: Phase::Particles,
        }
    }

    /// Rebuild the simulation from the current `params`.
    ///
    /// Invalid slider combinations (a radius too large for the container) keep
    /// the previous simulation and log the reason.
    fn reset_simulation(&mut self) {
        let (width, height) = self.bounds;
        self.params.container = if self.circle {
            Container::inscribed_circle(width, height)
        } else {
            Container::Rect { width, height }
        };

        self.seed = self.seed.wrapping_add(1);
        match Simulation::new(self.params.clone(), self.seed) {
            Ok(sim) => {
                self.sim = sim;
                self.phase = Phase::Particles;
            }
            Err(e) => tracing::warn!("cannot reset simulation: {e}"),
        }
        self.needs_reset = false;
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Simulation Controls");

        // Sliders: only matter if we haven't started or we want to reset
        if !self.running {
            let p = &mut self.params;
            let mut changed = false;
            changed |= ui
                .add(egui::Slider::new(&mut p.num_particles, 1..=400).text("Particles"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut p.initial_radius, 2.0..=40.0).text("Particle Radius"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut p.gravity, 0.0..=2.0).text("Gravity"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut p.max_speed, 1.0..=60.0).text("Max Speed"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut p.damping, 0.05..=1.0).text("Damping"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut p.growth, 0.0..=1.0).text("Growth"))
                .changed();
            if let Some(threshold) = p.termination_radius.as_mut() {
                changed |= ui
                    .add(egui::Slider::new(threshold, 5.0..=200.0).text("Stop Radius"))
                    .changed();
            }
            changed |= ui.checkbox(&mut self.circle, "Circular container").changed();
            if changed {
                self.needs_reset = true;
            }
        } else {
            ui.label("Parameters locked while running. Stop to change.");
        }

        ui.separator();

        // Start / Stop
        if self.running {
            if ui.button("Stop").clicked() {
                self.running = false;
            }
        } else if ui.button("Start").clicked() {
            if self.needs_reset {
                self.reset_simulation();
            }
            self.running = self.phase == Phase::Particles;
        }

        // Reset
        if ui.button("Reset").clicked() {
            self.reset_simulation();
            self.running = false;
        }
    }

    fn draw_particles(&self, ui: &mut egui::Ui) {
        let painter = ui.painter();
        let rect = ui.max_rect();
        let (box_x, box_y) = self.sim.config().container.extent();

        // Scale from simulation space to the drawing area:
        let scale = (rect.width() / box_x).min(rect.height() / box_y);
        let to_screen = |x: f32, y: f32| rect.min + Vec2::new(x * scale, y * scale);

        let outline = Stroke::new(1.0, Color32::GRAY);
        match self.sim.config().container {
            Container::Rect { width, height } => {
                let r = egui::Rect::from_min_max(to_screen(0.0, 0.0), to_screen(width, height));
                painter.rect_stroke(r, 0.0, outline);
            }
            Container::Circle {
                center_x,
                center_y,
                radius,
            } => {
                painter.circle_stroke(to_screen(center_x, center_y), radius * scale, outline);
            }
        }

        for p in self.sim.particles() {
            painter.circle_filled(to_screen(p.x, p.y), p.radius * scale, color32(p.color));
        }
    }

    fn draw_telemetry(&self, ui: &mut egui::Ui) {
        ui.label("Mean speed over time");
        Plot::new("mean_speed")
            .x_axis_label("step")
            .y_axis_label("speed")
            .allow_scroll(true)
            .allow_drag(true)
            .show(ui, |plot_ui| {
                if !self.sim.telemetry().is_empty() {
                    let line = Line::new(PlotPoints::from(self.sim.telemetry().points()))
                        .color(Color32::GREEN);
                    plot_ui.line(line);
                }
            });
    }
}

/// Rectangle the container toggle switches within. A circular start uses the
/// default window, which is what `--circle` inscribes the circle in.
fn drawing_area(container: &Container) -> (f32, f32) {
    match *container {
        Container::Rect { width, height } => (width, height),
        Container::Circle { .. } => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    }
}

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r(), c.g(), c.b())
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("config_panel").show(ctx, |ui| self.controls(ui));

        if self.running && self.phase == Phase::Particles {
            let outcome = self.sim.step();
            if outcome.terminated {
                self.running = false;
                self.phase = Phase::Telemetry;
            }
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.heading("2D Particle Collisions");
            ui.horizontal(|ui| {
                ui.label(format!("Particles: {}", self.sim.particles().len()));
                ui.label(format!("Step: {}", self.sim.steps()));
                ui.label(format!("Collisions: {}", self.sim.collision_count()));
                if let Some(speed) = self.sim.telemetry().last() {
                    ui.label(format!("Mean speed: {speed:.2}"));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.phase {
            Phase::Particles => self.draw_particles(ui),
            Phase::Telemetry => self.draw_telemetry(ui),
        });

        // Request another frame to keep animating (or remain static if stopped).
        ctx.request_repaint();
    }
}

/// Open the viewer window and block until it is closed.
pub fn run(params: SimulationConfig, seed: u64) -> anyhow::Result<()> {
    let sim = Simulation::new(params.clone(), seed)?;
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Particle Simulation",
        native_options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(params, sim, seed)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
