//! Tessera Metrics - timing utilities for the simulation loop
//!
//! Provides zero-cost abstractions for metrics collection that completely
//! vanish in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use tessera_metrics::{FrameTimer, UpdateProfiler};
//!
//! let mut timer = FrameTimer::new(60); // Track last 60 frames
//! let mut profiler = UpdateProfiler::new();
//! timer.begin();
//! let updates = profiler.time_type(3, "Spinner", || { /* update every Spinner */ 128 });
//! timer.end(updates);
//! println!("pass: {:.3}ms, {:.0} updates", timer.pass_time_ms(), timer.updates_per_frame());
//! ```
//!
//! In production builds (without `metrics` feature), all instrumentation
//! is compiled out to zero overhead.

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod update_profiler;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;
#[cfg(feature = "metrics")]
pub use update_profiler::{TypeTiming, UpdateProfiler};

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self, _updates: usize) {}
    pub fn frames(&self) -> u64 { 0 }
    pub fn total_updates(&self) -> u64 { 0 }
    pub fn updates_per_frame(&self) -> f64 { 0.0 }
    pub fn pass_time_ms(&self) -> f64 { 0.0 }
    pub fn pass_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
    pub fn update_cost_us(&self) -> f64 { 0.0 }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy)]
pub struct TypeTiming {
    pub name: &'static str,
    pub total: std::time::Duration,
    pub calls: u64,
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct UpdateProfiler;

#[cfg(not(feature = "metrics"))]
impl UpdateProfiler {
    pub fn new() -> Self { Self }
    #[inline(always)]
    pub fn time_type<F, R>(&mut self, _id: u32, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn timing(&self, _id: u32) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn reset(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (u32, &TypeTiming)> { std::iter::empty() }
}
