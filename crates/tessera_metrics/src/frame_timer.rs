//! Per-frame statistics of the update pass

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

/// Rolling timing and workload of the last `capacity` update passes.
///
/// Bracket each pass with [`begin`](Self::begin) and [`end`](Self::end),
/// passing the number of component updates the pass performed.
pub struct FrameTimer {
    pass_start: Instant,
    pass_times: RingBuffer<Duration>,
    updates: RingBuffer<f64>,
    frames: u64,
    total_updates: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            pass_start: Instant::now(),
            pass_times: RingBuffer::new(capacity),
            updates: RingBuffer::new(capacity),
            frames: 0,
            total_updates: 0,
        }
    }

    pub fn begin(&mut self) {
        self.pass_start = Instant::now();
    }

    pub fn end(&mut self, updates: usize) {
        self.pass_times.push(self.pass_start.elapsed());
        self.updates.push(updates as f64);
        self.frames += 1;
        self.total_updates += updates as u64;
    }

    /// Passes measured since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Component updates performed since construction.
    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    /// Mean component updates per pass over the window.
    pub fn updates_per_frame(&self) -> f64 {
        self.updates.average()
    }

    pub fn pass_time_ms(&self) -> f64 {
        self.pass_times.average().as_secs_f64() * 1000.0
    }

    pub fn pass_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.pass_times.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }

    /// Mean wall time of a single component update, in microseconds.
    pub fn update_cost_us(&self) -> f64 {
        let updates = self.updates.average();
        if updates > 0.0 {
            self.pass_times.average().as_secs_f64() * 1_000_000.0 / updates
        } else {
            0.0
        }
    }
}
