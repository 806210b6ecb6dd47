//! Fixed-rate frame clock
//!
//! Produces the `(time, dt)` pair handed to the update pass each frame.

use std::time::Duration;

/// Default simulation tick rate (60 Hz = 16.666ms per tick)
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Simulation time tracker
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick_rate_hz: u32,
    tick_count: u64,
}

impl FrameClock {
    /// A zero tick rate is treated as 1 Hz.
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz: tick_rate_hz.max(1),
            tick_count: 0,
        }
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Advance one tick and return the simulation time at the end of it
    /// together with the tick length, both in seconds.
    pub fn advance_tick(&mut self) -> (f32, f32) {
        self.tick_count += 1;
        (self.total_seconds() as f32, self.dt())
    }

    pub fn total_time(&self) -> Duration {
        Duration::from_secs_f64(self.total_seconds())
    }

    // Derived from the tick count so long runs do not accumulate rounding.
    fn total_seconds(&self) -> f64 {
        self.tick_count as f64 / self.tick_rate_hz as f64
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}
