//! Radial color ramps.
//!
//! Points are colored by how far their anchor sits from the center of the
//! domain. Each [`PaletteMode`] is a closed-form ramp over a normalized radius
//! in `[0, 1]`, built from piecewise segments with a fixed or interpolated hue
//! and curved saturation/brightness interpolation.
//!
//! Colors are HSB with hue in degrees (`0..360`) and saturation/brightness in
//! percent (`0..100`). [`Hsb::to_rgb`] converts for GPU upload.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hue/saturation/brightness triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    /// Degrees, `0..360`.
    pub hue: f32,
    /// Percent, `0..=100`.
    pub saturation: f32,
    /// Percent, `0..=100`.
    pub brightness: f32,
}

impl Hsb {
    pub const fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Small random variation: hue ±6°, saturation ±4, brightness ±3.
    /// Hue wraps, saturation and brightness clamp to `0..=100`.
    pub fn jittered<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        Self {
            hue: (self.hue + rng.gen_range(-6.0..6.0)).rem_euclid(360.0),
            saturation: (self.saturation + rng.gen_range(-4.0..4.0)).clamp(0.0, 100.0),
            brightness: (self.brightness + rng.gen_range(-3.0..3.0)).clamp(0.0, 100.0),
        }
    }

    /// Convert to linear RGB in `0..=1`.
    pub fn to_rgb(self) -> Vec3 {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let v = (self.brightness / 100.0).clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 % 6 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Vec3::new(r + m, g + m, b + m)
    }
}

/// One piece of a ramp, covering `start..end` of the normalized radius.
///
/// Each channel is `lerp(from, to, u^curve)` with `u` the position inside
/// the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub hue: (f32, f32, f32),
    pub saturation: (f32, f32, f32),
    pub brightness: (f32, f32, f32),
}

impl Segment {
    const fn flat_hue(
        start: f32,
        end: f32,
        hue: f32,
        saturation: (f32, f32, f32),
        brightness: (f32, f32, f32),
    ) -> Self {
        Self {
            start,
            end,
            hue: (hue, hue, 1.0),
            saturation,
            brightness,
        }
    }

    /// Evaluate at normalized radius `x`, which should lie in this segment.
    pub fn eval(&self, x: f32) -> Hsb {
        let u = ((x - self.start) / (self.end - self.start)).clamp(0.0, 1.0);
        let channel = |(from, to, curve): (f32, f32, f32)| from + (to - from) * u.powf(curve);
        Hsb::new(
            channel(self.hue),
            channel(self.saturation),
            channel(self.brightness),
        )
    }
}

const SEISMIC: [Segment; 2] = [
    Segment::flat_hue(0.0, 0.46, 215.0, (90.0, 8.0, 1.4), (85.0, 100.0, 1.68)),
    Segment::flat_hue(0.46, 1.0, 0.0, (8.0, 96.0, 0.8), (100.0, 92.0, 0.8)),
];

const TWILIGHT: [Segment; 1] = [Segment {
    start: 0.0,
    end: 1.0,
    hue: (210.0, 285.0, 0.9),
    saturation: (18.0, 40.0, 1.0),
    brightness: (98.0, 90.0, 1.1),
}];

const PIYG: [Segment; 2] = [
    Segment::flat_hue(0.0, 0.5, 330.0, (60.0, 0.0, 1.0), (92.0, 100.0, 1.0)),
    Segment::flat_hue(0.5, 1.0, 130.0, (0.0, 65.0, 1.0), (100.0, 95.0, 1.0)),
];

const SPECTRAL: [Segment; 2] = [
    Segment::flat_hue(0.0, 0.5, 220.0, (70.0, 0.0, 1.0), (90.0, 100.0, 1.0)),
    Segment::flat_hue(0.5, 1.0, 25.0, (0.0, 85.0, 1.0), (100.0, 95.0, 1.0)),
];

/// Named radial color ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaletteMode {
    /// Blue core fading to white, then red at the rim.
    #[default]
    Seismic,
    /// Pale blue drifting to lilac.
    Twilight,
    /// Pink through white to green.
    PiYg,
    /// Blue through white to orange.
    Spectral,
}

impl PaletteMode {
    /// Every mode, in cycling order.
    pub const ALL: [PaletteMode; 4] = [
        PaletteMode::Seismic,
        PaletteMode::Twilight,
        PaletteMode::PiYg,
        PaletteMode::Spectral,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            PaletteMode::Seismic => "Seismic",
            PaletteMode::Twilight => "Twilight",
            PaletteMode::PiYg => "PiYG",
            PaletteMode::Spectral => "Spectral",
        }
    }

    /// Position in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Ramp segments, ordered by radius.
    pub fn segments(self) -> &'static [Segment] {
        match self {
            PaletteMode::Seismic => &SEISMIC,
            PaletteMode::Twilight => &TWILIGHT,
            PaletteMode::PiYg => &PIYG,
            PaletteMode::Spectral => &SPECTRAL,
        }
    }

    /// Evaluate the ramp. Input is clamped to `[0, 1]`; NaN maps to 0.
    pub fn color(self, normalized_radius: f32) -> Hsb {
        let x = if normalized_radius.is_nan() {
            0.0
        } else {
            normalized_radius.clamp(0.0, 1.0)
        };
        let segments = self.segments();
        segments
            .iter()
            .find(|s| x < s.end)
            .or_else(|| segments.last())
            .map_or(Hsb::new(0.0, 0.0, 0.0), |segment| segment.eval(x))
    }

    /// Jittered color for a point anchored at `anchor` in a domain of `radius`.
    pub fn point_color<R: Rng + ?Sized>(
        self,
        anchor: Vec3,
        radius: f32,
        exponent: f32,
        rng: &mut R,
    ) -> Hsb {
        let t = normalized_radius(anchor, radius).powf(exponent);
        self.color(t).jittered(rng)
    }

    /// Pale tint of the ramp at `t`, used for edges.
    pub fn edge_color(self, t: f32) -> Hsb {
        let base = self.color(t);
        Hsb::new(base.hue, base.saturation * 0.2, 96.0)
    }

    /// A random mode different from `self`.
    pub fn next_random<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let count = Self::ALL.len();
        let mut next = rng.gen_range(0..count);
        if next == self.index() {
            next = (next + 1) % count;
        }
        Self::ALL[next]
    }
}

/// Evaluate `mode` at `normalized_radius`.
pub fn palette_color(mode: PaletteMode, normalized_radius: f32) -> Hsb {
    mode.color(normalized_radius)
}

/// `|anchor| / radius`, clamped to `[0, 1]`.
#[inline]
pub fn normalized_radius(anchor: Vec3, radius: f32) -> f32 {
    if radius > 0.0 {
        (anchor.length() / radius).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn assert_valid(c: Hsb) {
        assert!(c.hue.is_finite() && (0.0..360.0).contains(&c.hue), "{c:?}");
        assert!((0.0..=100.0).contains(&c.saturation), "{c:?}");
        assert!((0.0..=100.0).contains(&c.brightness), "{c:?}");
    }

    #[test]
    fn test_endpoints_are_well_defined() {
        for mode in PaletteMode::ALL {
            assert_valid(palette_color(mode, 0.0));
            assert_valid(palette_color(mode, 1.0));
        }
    }

    #[test]
    fn test_continuous_at_segment_boundaries() {
        for mode in PaletteMode::ALL {
            for pair in mode.segments().windows(2) {
                let (lower, upper) = (pair[0], pair[1]);
                assert_eq!(lower.end, upper.start);
                let a = lower.eval(lower.end);
                let b = upper.eval(upper.start);
                assert!((a.saturation - b.saturation).abs() < 1e-4, "{}", mode.name());
                assert!((a.brightness - b.brightness).abs() < 1e-4, "{}", mode.name());
            }
        }
    }

    #[test]
    fn test_ramp_is_continuous_across_sweep() {
        for mode in PaletteMode::ALL {
            let mut prev = mode.color(0.0);
            for i in 1..=1000 {
                let c = mode.color(i as f32 / 1000.0);
                assert!((c.saturation - prev.saturation).abs() < 2.0, "{}", mode.name());
                assert!((c.brightness - prev.brightness).abs() < 2.0, "{}", mode.name());
                prev = c;
            }
        }
    }

    #[test]
    fn test_seismic_known_values() {
        let core = palette_color(PaletteMode::Seismic, 0.0);
        assert_eq!(core, Hsb::new(215.0, 90.0, 85.0));
        let rim = palette_color(PaletteMode::Seismic, 1.0);
        assert_eq!(rim.hue, 0.0);
        assert!((rim.saturation - 96.0).abs() < 1e-4);
        assert!((rim.brightness - 92.0).abs() < 1e-4);
    }

    #[test]
    fn test_ramps_cover_unit_interval() {
        for mode in PaletteMode::ALL {
            let segments = mode.segments();
            assert_eq!(segments.first().map(|s| s.start), Some(0.0), "{}", mode.name());
            assert_eq!(segments.last().map(|s| s.end), Some(1.0), "{}", mode.name());
            assert_eq!(mode.color(1.0), segments[segments.len() - 1].eval(1.0));
        }
    }

    #[test]
    fn test_input_is_clamped() {
        for mode in PaletteMode::ALL {
            assert_eq!(mode.color(-3.0), mode.color(0.0));
            assert_eq!(mode.color(7.0), mode.color(1.0));
            assert_eq!(mode.color(f32::NAN), mode.color(0.0));
        }
    }

    #[test]
    fn test_modes_are_distinct() {
        for a in PaletteMode::ALL {
            for b in PaletteMode::ALL {
                if a != b {
                    assert_ne!(a.color(0.1), b.color(0.1));
                }
            }
        }
    }

    #[test]
    fn test_next_random_never_repeats() {
        let mut rng = SmallRng::seed_from_u64(3);
        for mode in PaletteMode::ALL {
            for _ in 0..50 {
                assert_ne!(mode.next_random(&mut rng), mode);
            }
        }
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            assert_valid(Hsb::new(358.0, 99.0, 1.0).jittered(&mut rng));
            assert_valid(Hsb::new(2.0, 1.0, 99.5).jittered(&mut rng));
        }
    }

    #[test]
    fn test_hsb_to_rgb() {
        let red = Hsb::new(0.0, 100.0, 100.0).to_rgb();
        assert!((red.x - 1.0).abs() < 1e-3 && red.y < 1e-3 && red.z < 1e-3);

        let white = Hsb::new(215.0, 0.0, 100.0).to_rgb();
        assert!((white - Vec3::ONE).abs().max_element() < 1e-4);

        let blue = Hsb::new(240.0, 100.0, 50.0).to_rgb();
        assert!((blue.z - 0.5).abs() < 1e-3 && blue.x < 1e-3);
    }

    #[test]
    fn test_normalized_radius() {
        assert_eq!(normalized_radius(Vec3::new(5.0, 0.0, 0.0), 10.0), 0.5);
        assert_eq!(normalized_radius(Vec3::new(0.0, 30.0, 0.0), 10.0), 1.0);
        assert_eq!(normalized_radius(Vec3::ZERO, 10.0), 0.0);
    }
}
