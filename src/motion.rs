//! Floating motion for revealed points.
//!
//! Each active point is pulled back toward its anchor by a spring split into
//! radial and tangential parts, pushed around by two layers of coherent noise,
//! and occasionally kicked in a random direction. Velocity is integrated with
//! drag and positions are kept inside the boundary sphere.

use glam::Vec3;
use rand::Rng;

use crate::config::MotionConfig;
use crate::noise::NoiseField;
use crate::placement::random_direction;
use crate::point::Point;

/// Per-axis noise offsets for each layer, so the axes drift independently.
const NOISE_OFFSETS: [Vec3; 2] = [Vec3::new(0.31, 1.71, 3.47), Vec3::new(4.99, 7.37, 9.13)];

/// Integrates point motion once per frame.
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    config: MotionConfig,
    radius: f32,
    wall_clamp: f32,
}

impl MotionIntegrator {
    pub fn new(config: &MotionConfig, radius: f32, wall_clamp: f32) -> Self {
        Self {
            config: config.clone(),
            radius,
            wall_clamp,
        }
    }

    /// Radius of the boundary sphere.
    #[inline]
    pub fn boundary(&self) -> f32 {
        self.radius * self.wall_clamp
    }

    /// Spring force toward `anchor`, stiffer along the anchor's radial axis.
    ///
    /// An anchor at the origin has no radial axis; the whole displacement is
    /// then treated as tangential.
    pub fn restoring_force(&self, anchor: Vec3, position: Vec3) -> Vec3 {
        let displacement = anchor - position;
        let radial_axis = anchor.normalize_or_zero();
        let radial = radial_axis * displacement.dot(radial_axis);
        let tangential = displacement - radial;
        radial * self.config.radial_stiffness + tangential * self.config.tangential_stiffness
    }

    /// Two-layer noise drift for a point with `seed` at `frame`.
    pub fn drift<N: NoiseField + ?Sized>(&self, noise: &N, seed: f32, frame: u64) -> Vec3 {
        let mut drift = Vec3::ZERO;
        for (layer, offsets) in self.config.noise.iter().zip(NOISE_OFFSETS) {
            let phase = seed + frame as f32 * layer.frequency;
            let centered = Vec3::new(
                noise.sample(Vec3::new(phase + offsets.x, 0.0, 0.0)),
                noise.sample(Vec3::new(phase + offsets.y, 0.0, 0.0)),
                noise.sample(Vec3::new(phase + offsets.z, 0.0, 0.0)),
            ) - Vec3::splat(0.5);
            drift += centered * layer.amplitude;
        }
        drift
    }

    /// Advance every active point by one frame. Inactive points are skipped.
    pub fn step<R, N>(&self, points: &mut [Point], frame: u64, rng: &mut R, noise: &N)
    where
        R: Rng + ?Sized,
        N: NoiseField + ?Sized,
    {
        let boundary = self.boundary();

        for point in points.iter_mut().filter(|p| p.active) {
            let force = self.restoring_force(point.anchor, point.position);
            let drift = self.drift(noise, point.seed, frame);

            if rng.gen::<f32>() < self.config.impulse_probability {
                point.velocity += random_direction(rng) * self.config.impulse_magnitude;
            }

            point.velocity = point.velocity * self.config.drag + force + drift;
            point.position += point.velocity;

            let distance = point.position.length();
            if distance > boundary {
                point.position *= boundary / distance;
                point.velocity *= self.config.wall_damping;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoiseLayer;
    use crate::palette::Hsb;
    use crate::noise::PerlinNoise;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn point_at(anchor: Vec3) -> Point {
        Point::new(anchor, 12.5, Hsb::new(0.0, 0.0, 0.0), 8.0, 0.0)
    }

    fn quiet_config() -> MotionConfig {
        MotionConfig {
            noise: [
                NoiseLayer {
                    frequency: 0.002,
                    amplitude: 0.0,
                },
                NoiseLayer {
                    frequency: 0.007,
                    amplitude: 0.0,
                },
            ],
            impulse_probability: 0.0,
            ..MotionConfig::default()
        }
    }

    #[test]
    fn test_inactive_points_untouched() {
        let integrator = MotionIntegrator::new(&MotionConfig::default(), 100.0, 0.995);
        let mut rng = SmallRng::seed_from_u64(1);
        let noise = PerlinNoise::new(1);

        let mut points = vec![point_at(Vec3::new(10.0, 0.0, 0.0)), point_at(Vec3::new(0.0, 20.0, 0.0))];
        points[1].position = Vec3::new(1.0, 2.0, 3.0);
        points[1].velocity = Vec3::new(0.5, 0.0, 0.0);
        let before = points.clone();

        for frame in 0..100 {
            integrator.step(&mut points, frame, &mut rng, &noise);
        }
        assert_eq!(points, before);
    }

    #[test]
    fn test_converges_to_anchor_without_noise() {
        let integrator = MotionIntegrator::new(&quiet_config(), 100.0, 0.995);
        let mut rng = SmallRng::seed_from_u64(2);
        let noise = PerlinNoise::new(2);

        let mut points = vec![point_at(Vec3::new(30.0, -20.0, 10.0))];
        points[0].activate(0);
        points[0].position = Vec3::new(45.0, -5.0, 0.0);
        points[0].velocity = Vec3::new(-2.0, 3.0, 1.0);

        let start = points[0].position.distance(points[0].anchor);
        for frame in 0..2000 {
            integrator.step(&mut points, frame, &mut rng, &noise);
        }
        let end = points[0].position.distance(points[0].anchor);
        assert!(end < start * 1e-3, "{start} -> {end}");
    }

    #[test]
    fn test_restoring_force_split() {
        let integrator = MotionIntegrator::new(&MotionConfig::default(), 100.0, 0.995);
        let anchor = Vec3::new(10.0, 0.0, 0.0);

        let radial = integrator.restoring_force(anchor, Vec3::new(8.0, 0.0, 0.0));
        assert!((radial - Vec3::new(2.0 * 0.07, 0.0, 0.0)).length() < 1e-6);

        let tangential = integrator.restoring_force(anchor, Vec3::new(10.0, 4.0, 0.0));
        assert!((tangential - Vec3::new(0.0, -4.0 * 0.03, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_restoring_force_degenerate_vectors() {
        let integrator = MotionIntegrator::new(&MotionConfig::default(), 100.0, 0.995);
        assert_eq!(integrator.restoring_force(Vec3::ONE, Vec3::ONE), Vec3::ZERO);

        let f = integrator.restoring_force(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        assert!(f.is_finite());
        assert!((f - Vec3::new(0.0, -2.0 * 0.03, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_drift_is_zero_for_flat_field() {
        let integrator = MotionIntegrator::new(&MotionConfig::default(), 100.0, 0.995);
        let flat = |_: Vec3| 0.5;
        assert_eq!(integrator.drift(&flat, 3.0, 77), Vec3::ZERO);
    }

    #[test]
    fn test_drift_bounded_by_amplitudes() {
        let integrator = MotionIntegrator::new(&MotionConfig::default(), 100.0, 0.995);
        let noise = PerlinNoise::new(4);
        let limit = 0.5 * (0.45 + 0.18) + 1e-5;
        for frame in 0..500 {
            let d = integrator.drift(&noise, 17.0, frame);
            assert!(d.abs().max_element() <= limit);
        }
    }

    #[test]
    fn test_wall_clamp_and_damping() {
        let config = quiet_config();
        let integrator = MotionIntegrator::new(&config, 10.0, 0.9);
        let mut rng = SmallRng::seed_from_u64(5);
        let flat = |_: Vec3| 0.5;

        let mut points = vec![point_at(Vec3::new(8.0, 0.0, 0.0))];
        points[0].activate(0);
        points[0].velocity = Vec3::new(5.0, 0.0, 0.0);
        integrator.step(&mut points, 1, &mut rng, &flat);

        let p = &points[0];
        assert!((p.position.length() - 9.0).abs() < 1e-4);
        assert!((p.velocity.x - 5.0 * 0.94 * 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_impulses_fire_with_certainty() {
        let config = MotionConfig {
            impulse_probability: 1.0,
            impulse_magnitude: 2.0,
            drag: 1.0,
            ..quiet_config()
        };
        let integrator = MotionIntegrator::new(&config, 1000.0, 0.995);
        let mut rng = SmallRng::seed_from_u64(6);
        let flat = |_: Vec3| 0.5;

        let mut points = vec![point_at(Vec3::new(100.0, 0.0, 0.0))];
        points[0].activate(0);
        integrator.step(&mut points, 1, &mut rng, &flat);
        assert!((points[0].velocity.length() - 2.0).abs() < 1e-4);
    }
}
