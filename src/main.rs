//! Headless runner.
//!
//! Steps a network on a fixed 60 fps clock and logs its progress.
//!
//! ```text
//! nodeweave [config.json] [frames]
//! ```
//!
//! Set `NODEWEAVE_SEED` for a reproducible run and `RUST_LOG` to adjust logging.

use nodeweave::prelude::*;
use tracing_subscriber::EnvFilter;

const FPS: f32 = 60.0;

fn main() -> Result<(), SimulationError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => NetworkConfig::load(path)?,
        None => NetworkConfig::default(),
    };
    let frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    let seed = std::env::var("NODEWEAVE_SEED").ok().and_then(|s| s.parse().ok());
    let mut sim = match seed {
        Some(seed) => Simulation::with_seed(config, seed)?,
        None => Simulation::new(config)?,
    };

    tracing::info!(
        points = sim.points().len(),
        radius = sim.radius(),
        frames,
        "starting run"
    );

    let mut clock = FrameClock::fixed(FPS);
    let mut reported_done = false;
    while clock.frame() < frames {
        let tick = clock.tick();
        sim.step(tick);
        let frame = tick.frame;

        if frame % FPS as u64 == 0 {
            let stats = sim.stats();
            tracing::info!(
                frame,
                seconds = stats.elapsed,
                active = stats.active,
                edges = stats.edges,
                sweep = stats.sweep_position,
                palette = stats.palette.name(),
                "progress"
            );
        }

        if !reported_done && sim.phase() == Phase::Done {
            reported_done = true;
            tracing::info!(
                frame,
                seconds = tick.elapsed,
                active = sim.active_count(),
                "all points revealed"
            );
        }
    }

    let stats = sim.stats();
    let drawn_points = sim.render_points().count();
    let drawn_edges = sim.render_edges().count();
    tracing::info!(
        active = stats.active,
        edges = stats.edges,
        drawn_points,
        drawn_edges,
        phase = ?stats.phase,
        "run finished"
    );

    Ok(())
}
