//! Per-component-type timing of the update pass

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Accumulated update time for one component type.
#[derive(Debug, Clone, Copy)]
pub struct TypeTiming {
    pub name: &'static str,
    pub total: Duration,
    pub calls: u64,
}

/// Keyed by component type id so reports come out in update order.
#[derive(Debug, Default)]
pub struct UpdateProfiler {
    timings: BTreeMap<u32, TypeTiming>,
}

impl UpdateProfiler {
    pub fn new() -> Self {
        Self {
            timings: BTreeMap::new(),
        }
    }

    /// Run `f`, charging its wall time to component type `id`.
    pub fn time_type<F, R>(&mut self, id: u32, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let entry = self.timings.entry(id).or_insert(TypeTiming {
            name,
            total: Duration::ZERO,
            calls: 0,
        });
        entry.total += elapsed;
        entry.calls += 1;
        result
    }

    pub fn timing(&self, id: u32) -> Duration {
        self.timings.get(&id).map(|t| t.total).unwrap_or(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &TypeTiming)> {
        self.timings.iter().map(|(id, timing)| (*id, timing))
    }
}
