//! The per-frame orchestrator.
//!
//! [`Simulation`] owns every piece of network state and advances it once per
//! rendered frame: consume a pending reset, run the reveal sweep, integrate
//! motion, and rebuild the graph every `rebuild_every` frames. Hosts drive it
//! with [`Simulation::step`] and read back [`render_points`](Simulation::render_points)
//! and [`render_edges`](Simulation::render_edges).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{NetworkConfig, Viewport};
use crate::error::ConfigError;
use crate::graph::GraphMaintainer;
use crate::motion::MotionIntegrator;
use crate::noise::{NoiseField, PerlinNoise};
use crate::palette::PaletteMode;
use crate::placement::AnchorPlacer;
use crate::point::{Edge, Point};
use crate::render::{edge_record, point_record, RenderEdge, RenderPoint};
use crate::reveal::{Phase, RevealController};
use crate::time::FrameTick;

/// Snapshot of the simulation for logging and HUDs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkStats {
    pub frame: u64,
    /// Seconds of host time at the last tick.
    pub elapsed: f32,
    pub active: usize,
    pub edges: usize,
    pub phase: Phase,
    pub sweep_position: f32,
    pub palette: PaletteMode,
}

/// A particle network simulation.
///
/// `R` is the random source and `N` the coherent noise; both default to
/// seeded implementations so a run is reproducible from a single seed.
pub struct Simulation<R = SmallRng, N = PerlinNoise> {
    config: NetworkConfig,
    radius: f32,
    rng: R,
    noise: N,
    placer: AnchorPlacer,
    reveal: RevealController,
    motion: MotionIntegrator,
    graph: GraphMaintainer,
    points: Vec<Point>,
    palette: PaletteMode,
    paused: bool,
    /// Normalized pick X of the latest reset request. Later requests in the
    /// same frame overwrite earlier ones.
    pending_reset: Option<f32>,
    frames_since_rebuild: u32,
    frame: u64,
    elapsed: f32,
}

impl Simulation<SmallRng, PerlinNoise> {
    /// Create a simulation seeded from the system clock.
    pub fn new(config: NetworkConfig) -> Result<Self, ConfigError> {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(config, seed)
    }

    /// Create a reproducible simulation.
    pub fn with_seed(config: NetworkConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_sources(config, SmallRng::seed_from_u64(seed), PerlinNoise::new(seed))
    }
}

impl<R: Rng, N: NoiseField> Simulation<R, N> {
    /// Create a simulation from explicit random and noise sources.
    ///
    /// Validates the configuration and places all anchors immediately.
    pub fn with_sources(config: NetworkConfig, rng: R, noise: N) -> Result<Self, ConfigError> {
        config.validate()?;

        let radius = config.radius;
        let mut sim = Self {
            placer: AnchorPlacer::new(&config.placement),
            reveal: RevealController::new(&config.reveal, radius),
            motion: MotionIntegrator::new(&config.motion, radius, config.wall_clamp),
            graph: GraphMaintainer::new(&config.links),
            config,
            radius,
            rng,
            noise,
            points: Vec::new(),
            palette: PaletteMode::default(),
            paused: false,
            pending_reset: None,
            frames_since_rebuild: 0,
            frame: 0,
            elapsed: 0.0,
        };
        sim.reset_all();
        Ok(sim)
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Current domain radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Every point, active or not.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Edges after the last rebuild.
    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Degree of each point after the last rebuild.
    pub fn degrees(&self) -> &[usize] {
        self.graph.degrees()
    }

    pub fn phase(&self) -> Phase {
        self.reveal.phase()
    }

    pub fn sweep_position(&self) -> f32 {
        self.reveal.sweep_position()
    }

    pub fn palette(&self) -> PaletteMode {
        self.palette
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frame of the last tick.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Host time of the last tick, in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn active_count(&self) -> usize {
        self.points.iter().filter(|p| p.active).count()
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            frame: self.frame,
            elapsed: self.elapsed,
            active: self.active_count(),
            edges: self.graph.edges().len(),
            phase: self.reveal.phase(),
            sweep_position: self.reveal.sweep_position(),
            palette: self.palette,
        }
    }

    // ========== Host controls ==========

    /// Freeze or unfreeze all simulation state. Reads stay valid while paused.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Queue a sweep restart from a pick at `normalized_x` in `[0, 1]` across
    /// the viewport. Takes effect at the start of the next step.
    pub fn request_reset(&mut self, normalized_x: f32) {
        if normalized_x.is_nan() {
            tracing::warn!("ignoring reset request with NaN pick coordinate");
            return;
        }
        self.pending_reset = Some(normalized_x.clamp(0.0, 1.0));
    }

    /// Queue a sweep restart from a pick at pixel column `x`.
    pub fn request_pick(&mut self, x: f32, viewport: Viewport) {
        if viewport.width > 0.0 {
            self.request_reset(x / viewport.width);
        }
    }

    /// Switch palette and recolor every point.
    pub fn set_palette(&mut self, mode: PaletteMode) {
        self.palette = mode;
        self.recolor();
    }

    /// Re-place all anchors and start over from a fresh sweep.
    ///
    /// Every point starts inactive, including the seed anchor at `-0.99R`;
    /// the sweep reveals it on its first frames.
    pub fn reset_all(&mut self) {
        let placement = self.placer.place_anchors(
            self.config.point_count,
            self.radius,
            self.config.wall_clamp,
            &mut self.rng,
        );
        self.points =
            self.placer
                .build_points(&placement.anchors, self.radius, self.palette, &mut self.rng);

        self.reveal = RevealController::new(&self.config.reveal, self.radius);
        self.motion = MotionIntegrator::new(&self.config.motion, self.radius, self.config.wall_clamp);
        self.graph.clear();
        self.frames_since_rebuild = 0;
        self.pending_reset = None;
        self.paused = false;

        tracing::info!(
            points = self.points.len(),
            spaced = placement.spaced,
            radius = self.radius,
            "network reset"
        );
    }

    /// Adopt a new viewport: recompute the radius and start over.
    pub fn resize(&mut self, viewport: Viewport) {
        let radius = self.config.radius_for_viewport(viewport);
        let candidate = NetworkConfig {
            radius,
            ..self.config.clone()
        };
        match candidate.validate() {
            Ok(()) => {
                self.radius = radius;
                self.config = candidate;
            }
            Err(err) => {
                tracing::warn!(?viewport, %err, "unusable viewport, keeping radius {}", self.radius);
            }
        }
        self.reset_all();
    }

    // ========== Frame ==========

    /// Advance one frame.
    pub fn step(&mut self, tick: FrameTick) {
        self.frame = tick.frame;
        self.elapsed = tick.elapsed;

        if let Some(pick) = self.pending_reset.take() {
            self.restart_sweep(pick);
        }

        if self.paused {
            return;
        }

        if self.reveal.phase() == Phase::Run {
            self.reveal.step(&mut self.points, tick.frame);
        }

        self.motion
            .step(&mut self.points, tick.frame, &mut self.rng, &self.noise);

        self.frames_since_rebuild += 1;
        if self.frames_since_rebuild >= self.config.links.rebuild_every {
            self.graph.rebuild(&self.points);
            self.frames_since_rebuild = 0;
        }
    }

    /// Active points to draw this frame.
    pub fn render_points(&self) -> impl Iterator<Item = RenderPoint> + '_ {
        let frame = self.frame;
        self.points
            .iter()
            .step_by(self.config.render.point_stride)
            .filter(|p| p.active)
            .map(move |p| point_record(p, frame, &self.config.render))
    }

    /// Edges to draw this frame.
    pub fn render_edges(&self) -> impl Iterator<Item = RenderEdge> + '_ {
        self.graph
            .edges()
            .iter()
            .step_by(self.config.render.edge_stride)
            .filter_map(move |&edge| {
                edge_record(edge, &self.points, self.radius, self.palette, &self.config.render)
            })
    }

    fn restart_sweep(&mut self, pick: f32) {
        let origin = (pick * 2.0 - 1.0) * self.radius;
        self.reveal.restart(origin);
        self.palette = self.palette.next_random(&mut self.rng);
        for point in &mut self.points {
            point.deactivate();
        }
        self.recolor();
        self.graph.clear();
        self.frames_since_rebuild = 0;

        tracing::info!(origin, palette = self.palette.name(), "sweep restarted");
    }

    fn recolor(&mut self) {
        let exponent = self.config.placement.color_radius_exponent;
        for point in &mut self.points {
            point.color = self
                .palette
                .point_color(point.anchor, self.radius, exponent, &mut self.rng);
        }
    }
}
