//! Coherent noise for the floating drift.
//!
//! The motion integrator only needs a smooth scalar field with values in
//! `[0, 1)`. Anything implementing [`NoiseField`] can drive it, including plain
//! closures, which keeps tests free of noise when they want a still field:
//!
//! ```ignore
//! let still = |_: Vec3| 0.5;
//! ```
//!
//! [`PerlinNoise`] is the default: seeded `noise::Perlin` summed over a few
//! octaves.

use glam::Vec3;
use ::noise::{NoiseFn, Perlin};

/// A smooth 3D scalar field with values in `[0, 1)`.
pub trait NoiseField {
    fn sample(&self, position: Vec3) -> f32;
}

impl<F> NoiseField for F
where
    F: Fn(Vec3) -> f32,
{
    #[inline]
    fn sample(&self, position: Vec3) -> f32 {
        self(position)
    }
}

/// Largest value [`PerlinNoise`] returns.
const UPPER: f32 = 1.0 - f32::EPSILON;

/// Seeded multi-octave Perlin noise remapped to `[0, 1)`.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    noise: Perlin,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl PerlinNoise {
    /// Four octaves, each at half the amplitude and twice the frequency of
    /// the previous one.
    pub fn new(seed: u64) -> Self {
        Self::with_octaves(seed, 4, 0.5)
    }

    pub fn with_octaves(seed: u64, octaves: u32, persistence: f64) -> Self {
        Self {
            // Fold the high bits in so seeds differing only there still differ.
            noise: Perlin::new((seed ^ (seed >> 32)) as u32),
            octaves: octaves.max(1),
            persistence,
            lacunarity: 2.0,
        }
    }

    /// Single-octave Perlin noise, roughly in `[-1, 1]`.
    pub fn raw(&self, p: Vec3) -> f64 {
        self.noise.get([p.x as f64, p.y as f64, p.z as f64])
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseField for PerlinNoise {
    fn sample(&self, position: Vec3) -> f32 {
        let (total, norm, _, _) = (0..self.octaves).fold(
            (0.0, 0.0, 1.0, 1.0),
            |(total, norm, amp, freq): (f64, f64, f64, f64), _| {
                (
                    total + self.raw(position * freq as f32) * amp,
                    norm + amp,
                    amp * self.persistence,
                    freq * self.lacunarity,
                )
            },
        );
        let value = if norm > 0.0 { total / norm } else { 0.0 };
        ((value * 0.5 + 0.5) as f32).clamp(0.0, UPPER)
    }
}
