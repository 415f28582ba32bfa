//! Frame timing.
//!
//! The simulation never reads the wall clock itself. The host produces one
//! [`FrameTick`] per rendered frame, either from a [`FrameClock`] or directly
//! with [`FrameTick::fixed`] when stepping headless:
//!
//! ```ignore
//! use nodeweave::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your render loop:
//! sim.step(clock.tick());
//! ```
//!
//! Pausing belongs to the simulation. A paused simulation still consumes
//! ticks, so the clock keeps running.

use std::time::Instant;

/// One frame's worth of timing, handed to [`Simulation::step`](crate::Simulation::step).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTick {
    /// Monotonic frame counter. Drives the reveal and the noise phase.
    pub frame: u64,
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

impl FrameTick {
    /// Tick for `frame` of a fixed-rate run at `fps` frames per second.
    pub fn fixed(frame: u64, fps: f32) -> Self {
        let delta = if fps > 0.0 { 1.0 / fps } else { 0.0 };
        Self {
            frame,
            elapsed: frame as f32 * delta,
            delta,
        }
    }
}

/// Frame timer, wall-clock by default.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    /// Fixed delta time for deterministic runs.
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Create a wall-clock timer starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fixed_delta: None,
        }
    }

    /// A clock advancing exactly `1 / fps` seconds per tick.
    pub fn fixed(fps: f32) -> Self {
        let mut clock = Self::new();
        clock.set_fixed_delta((fps > 0.0).then(|| 1.0 / fps));
        clock
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameTick {
        let now = Instant::now();
        self.frame_count += 1;

        match self.fixed_delta {
            Some(delta) => {
                self.delta_secs = delta;
                self.elapsed_secs += delta;
            }
            None => {
                self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
            }
        }
        self.last_frame = now;

        self.current()
    }

    /// The most recent tick without advancing.
    pub fn current(&self) -> FrameTick {
        FrameTick {
            frame: self.frame_count,
            elapsed: self.elapsed_secs,
            delta: self.delta_secs,
        }
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Use a fixed timestep instead of wall-clock deltas. `None` restores
    /// real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_tick_advances_frame_and_time() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        let tick = clock.tick();
        assert_eq!(tick.frame, 1);
        assert!(tick.elapsed > 0.0);
        assert!(tick.delta > 0.0);
    }

    #[test]
    fn test_fixed_clock_matches_fixed_ticks() {
        let mut clock = FrameClock::fixed(4.0);
        thread::sleep(Duration::from_millis(5));
        for frame in 1..=8 {
            let tick = clock.tick();
            assert_eq!(tick, FrameTick::fixed(frame, 4.0));
        }
        assert_eq!(clock.elapsed(), 2.0);
    }

    #[test]
    fn test_fixed_tick() {
        let tick = FrameTick::fixed(120, 60.0);
        assert_eq!(tick.frame, 120);
        assert!((tick.elapsed - 2.0).abs() < 1e-5);
        assert_eq!(FrameTick::fixed(3, 0.0).delta, 0.0);
    }
}
