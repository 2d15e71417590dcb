use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use sim::Simulation;
use thiserror::Error;
use tracing::{info, warn};

use crate::content::{self, ContentLoadError};
use crate::input::InputCollector;
use crate::ui::{self, TerminalGuard};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Content(#[from] ContentLoadError),
    #[error("invalid world content: {0}")]
    WorldValidation(#[from] sim::ContentError),
    #[error("terminal io failed: {0}")]
    Terminal(#[source] io::Error),
}

/// Fixed-timestep frame loop over the terminal session: drain key
/// events, run the owed simulation ticks, redraw, then sleep until the
/// next frame or the next key event, whichever comes first.
pub fn run_app(config: LoopConfig) -> Result<(), AppError> {
    let def = content::load_world()?;
    let mut simulation = Simulation::new(def)?;
    info!(room = %simulation.state().room_id(), "world_loaded");

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_ms = fixed_dt.as_secs_f32() * 1000.0;

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        "loop_config"
    );

    let mut terminal = TerminalGuard::enter().map_err(AppError::Terminal)?;
    let mut collector = InputCollector::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();

    loop {
        while event::poll(Duration::ZERO).map_err(AppError::Terminal)? {
            if let Event::Key(key) = event::read().map_err(AppError::Terminal)? {
                collector.handle_key_event(&key, Instant::now());
            }
        }
        if collector.quit_requested() {
            info!(reason = "quit_key", "shutdown_requested");
            break;
        }

        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;
        accumulator = accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));

        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
        for _ in 0..step_plan.ticks_to_run {
            if collector.take_interact_pressed() {
                simulation.interact();
            }
            if collector.take_inspect_pressed() {
                simulation.inspect();
            }
            if collector.take_inventory_pressed() {
                simulation.announce_inventory();
            }
            let snapshot = collector.snapshot_for_tick(Instant::now());
            simulation.tick(fixed_dt_ms, &snapshot);
        }
        accumulator = step_plan.remaining_accumulator;

        if step_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame, "sim_clamp_triggered"
            );
        }

        ui::draw(terminal.out(), &simulation).map_err(AppError::Terminal)?;

        // Frame pacing; a key event ends the wait early.
        event::poll(fixed_dt).map_err(AppError::Terminal)?;
    }

    info!("shutdown");
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
