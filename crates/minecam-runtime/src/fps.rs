//! Frames-per-second meter.

use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts published frames and recomputes the rate once per window.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    frames: u32,
    window_start: Instant,
    current: f64,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub const fn starting_at(start: Instant) -> Self {
        Self {
            frames: 0,
            window_start: start,
            current: 0.0,
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= WINDOW {
            self.current = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub const fn current(&self) -> f64 {
        self.current
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}
