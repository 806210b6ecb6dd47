//! Tessera Runtime
//!
//! Boots a registry, builds the demo scene and runs a fixed number of frames
//! through the update pass.
//!
//! Usage: `tessera [config.json]`

mod scene;
mod settings;

use anyhow::{Context, Result};
use settings::RuntimeConfig;
use std::path::PathBuf;
use tessera_core::ecs::{InputEvent, Registry};
use tessera_core::math::Vec2;
use tessera_core::time::FrameClock;
use tessera_metrics::FrameTimer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Tessera v{}", tessera_core::VERSION);

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => RuntimeConfig::load(&path)?,
        None => RuntimeConfig::default(),
    };
    tracing::info!(?config, "configuration loaded");

    let mut registry = Registry::with_config(config.registry.clone());
    scene::build(&mut registry, config.satellites).context("building demo scene")?;
    tracing::info!(entities = registry.entity_count(), "scene ready");

    run(&mut registry, &config);
    report_profile(&registry);

    Ok(())
}

fn run(registry: &mut Registry, config: &RuntimeConfig) {
    let mut clock = FrameClock::new(config.tick_rate_hz);
    let mut timer = FrameTimer::new(config.tick_rate_hz as usize);

    for frame in 0..config.frames {
        timer.begin();

        // Synthetic mouse sweep standing in for a window's event stream.
        let t = frame as f32 * 0.05;
        registry.dispatch_input(&InputEvent::MouseMove(Vec2::new(t.cos(), t.sin()) * 100.0));

        let (time, dt) = clock.advance_tick();
        let updates = registry.update_components(time, dt);
        scene::sync_poses(registry);

        timer.end(updates);

        if config.report_every > 0 && clock.tick_count() % config.report_every == 0 {
            let (min_ms, max_ms) = timer.pass_time_range_ms();
            tracing::info!(
                tick = clock.tick_count(),
                sim_time = time,
                entities = registry.entity_count(),
                pass_ms = timer.pass_time_ms(),
                updates_per_frame = timer.updates_per_frame(),
                update_us = timer.update_cost_us(),
                min_ms,
                max_ms,
                "frame summary"
            );
        }
    }

    tracing::info!(
        ticks = clock.tick_count(),
        total = ?clock.total_time(),
        entities = registry.entity_count(),
        "simulation finished"
    );
}

fn report_profile(registry: &Registry) {
    for (id, timing) in registry.profiler().iter() {
        let per_call = timing
            .total
            .checked_div(timing.calls.max(1) as u32)
            .unwrap_or_default();
        tracing::info!(
            id,
            component = timing.name,
            calls = timing.calls,
            total = ?timing.total,
            per_call = ?per_call,
            "update profile"
        );
    }
}
