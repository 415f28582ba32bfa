//! Progressive reveal along the X axis.
//!
//! A plane sweeps from its origin toward `+radius`, activating every point
//! whose anchor it has crossed. When several frames pass without a new
//! activation the sweep speeds up, so sparse regions do not stall the reveal.
//! Reaching the far side activates whatever is left and ends the sweep.

use serde::{Deserialize, Serialize};

use crate::config::RevealConfig;
use crate::point::Point;

/// Sweep state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// The sweep is advancing.
    #[default]
    Run,
    /// The sweep reached the boundary. Only a restart leaves this state.
    Done,
}

/// Drives the reveal sweep.
#[derive(Debug, Clone)]
pub struct RevealController {
    config: RevealConfig,
    radius: f32,
    sweep: f32,
    phase: Phase,
    starved_frames: u32,
}

impl RevealController {
    /// A sweep starting at `-radius`.
    pub fn new(config: &RevealConfig, radius: f32) -> Self {
        Self {
            config: config.clone(),
            radius,
            sweep: -radius,
            phase: Phase::Run,
            starved_frames: 0,
        }
    }

    /// Current X coordinate of the sweep plane.
    #[inline]
    pub fn sweep_position(&self) -> f32 {
        self.sweep
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Consecutive frames without an activation.
    #[inline]
    pub fn starved_frames(&self) -> u32 {
        self.starved_frames
    }

    /// Restart from `origin` (clamped to the domain) in the `Run` phase.
    pub fn restart(&mut self, origin: f32) {
        self.sweep = origin.clamp(-self.radius, self.radius);
        self.phase = Phase::Run;
        self.starved_frames = 0;
    }

    /// Advance one frame. Returns the number of points activated.
    pub fn step(&mut self, points: &mut [Point], frame: u64) -> usize {
        if self.phase == Phase::Done {
            return 0;
        }

        let mut activated = activate_crossed(points, self.sweep + self.config.epsilon, frame);
        if activated == 0 {
            self.starved_frames = self.starved_frames.saturating_add(1);
        } else {
            self.starved_frames = 0;
        }

        let step = if self.starved_frames >= self.config.boost_after {
            self.config.step * self.config.boost_factor
        } else {
            self.config.step
        };
        self.sweep += step;

        if self.sweep >= self.radius {
            self.sweep = self.radius;
            activated += activate_crossed(points, self.radius + self.config.epsilon, frame);
            self.phase = Phase::Done;
            tracing::info!(frame, "reveal sweep complete");
        }

        activated
    }
}

fn activate_crossed(points: &mut [Point], threshold: f32, frame: u64) -> usize {
    let mut activated = 0;
    for point in points.iter_mut().filter(|p| !p.active) {
        if point.anchor.x <= threshold {
            point.activate(frame);
            activated += 1;
        }
    }
    activated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Hsb;
    use glam::Vec3;

    fn line_of_points(xs: &[f32]) -> Vec<Point> {
        xs.iter()
            .map(|&x| Point::new(Vec3::new(x, 0.0, 0.0), 0.0, Hsb::new(0.0, 0.0, 0.0), 8.0, 0.0))
            .collect()
    }

    fn config(step: f32) -> RevealConfig {
        RevealConfig {
            step,
            boost_factor: 2.0,
            boost_after: 3,
            epsilon: 0.0,
        }
    }

    #[test]
    fn test_activates_crossed_anchors_with_frame() {
        let mut points = line_of_points(&[-9.5, -8.5, 0.0, 9.0]);
        let mut reveal = RevealController::new(&config(1.0), 10.0);

        assert_eq!(reveal.step(&mut points, 1), 0);
        assert_eq!(reveal.sweep_position(), -9.0);
        assert_eq!(reveal.step(&mut points, 2), 1);
        assert!(points[0].active);
        assert_eq!(points[0].activation_frame, 2);
        assert!(!points[1].active);
    }

    #[test]
    fn test_boost_after_starvation() {
        let mut points = line_of_points(&[9.9]);
        let mut reveal = RevealController::new(&config(1.0), 10.0);
        for frame in 0..2 {
            reveal.step(&mut points, frame);
        }
        assert_eq!(reveal.sweep_position(), -8.0);
        reveal.step(&mut points, 2);
        assert_eq!(reveal.starved_frames(), 3);
        assert_eq!(reveal.sweep_position(), -6.0);
    }

    #[test]
    fn test_done_once_and_everything_active() {
        let mut points = line_of_points(&[-3.0, 4.0, 9.95, 10.0]);
        let mut reveal = RevealController::new(&config(1.0), 10.0);

        let mut transitions = 0;
        let mut previous = reveal.phase();
        let mut was_active = vec![false; points.len()];
        for frame in 0..100 {
            reveal.step(&mut points, frame);
            if previous == Phase::Run && reveal.phase() == Phase::Done {
                transitions += 1;
            }
            assert!(!(previous == Phase::Done && reveal.phase() == Phase::Run));
            previous = reveal.phase();

            for (i, p) in points.iter().enumerate() {
                assert!(p.active || !was_active[i], "activation reverted");
                was_active[i] = p.active;
            }
        }

        assert_eq!(transitions, 1);
        assert_eq!(reveal.phase(), Phase::Done);
        assert_eq!(reveal.sweep_position(), 10.0);
        assert!(points.iter().all(|p| p.active));
    }

    #[test]
    fn test_done_is_inert() {
        let mut points = line_of_points(&[0.0]);
        let mut reveal = RevealController::new(&config(50.0), 10.0);
        reveal.step(&mut points, 0);
        assert_eq!(reveal.phase(), Phase::Done);

        points[0].deactivate();
        assert_eq!(reveal.step(&mut points, 1), 0);
        assert!(!points[0].active);
    }

    #[test]
    fn test_restart_clamps_origin() {
        let mut points = line_of_points(&[0.0]);
        let mut reveal = RevealController::new(&config(50.0), 10.0);
        reveal.step(&mut points, 0);

        reveal.restart(-25.0);
        assert_eq!(reveal.phase(), Phase::Run);
        assert_eq!(reveal.sweep_position(), -10.0);
        assert_eq!(reveal.starved_frames(), 0);
    }
}
