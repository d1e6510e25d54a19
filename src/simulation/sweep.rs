//! # Scenario Sweep
//!
//! Re-runs a simplified step rule for every (external temperature, volume)
//! pair of a grid and reports the cumulative energy per pair.
//!
//! Compared with [`RefrigeratorSimulator`](super::RefrigeratorSimulator) each
//! scenario starts at the setpoint, holds the ambient temperature constant,
//! has no door openings, prices cooling on the overshoot only and feeds no
//! cooling effect back into the temperature.
//!
//! ## Accumulation
//!
//! [`AccumulationMode::Cumulative`] adds the running energy sum to the total
//! on every step, so a step's energy is weighted by the number of steps left
//! in the horizon. Totals therefore grow roughly with the square of the
//! horizon. [`AccumulationMode::Linear`] is the plain sum of per-step energy.
//!
//! ## Cancellation
//!
//! [`run_sweep_until`] and [`run_sweep_cancellable`] watch a shared stop flag
//! and give up with [`SimulationError::Cancelled`] at the next step once it
//! is set. The async entry point keeps the sweep off the runtime thread in
//! both sequential and parallel mode.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tokio::task::JoinSet;
use tracing::{debug, info};
use validator::Validate;

use super::enclosure::{leakage_c, overshoot_power_w, step_energy_wh};
use super::refrigerator::SimulationConfig;
use super::types::ScenarioResult;
use crate::controller::{PidController, PidGains};
use crate::error::{ensure_finite, ensure_positive, Result, SimulationError};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccumulationMode {
    /// Running sum added to the total every step.
    ///
    /// The running sum is carried forward instead of re-summing the whole
    /// prefix on each step. Totals agree with the re-summed form up to
    /// floating-point rounding, not bit for bit.
    #[default]
    Cumulative,
    /// Plain sum of per-step energy
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SweepConfig {
    /// Ambient temperatures to sweep (°C), outer loop
    #[validate(length(min = 1))]
    pub external_temperatures_c: Vec<f64>,
    /// Enclosure volumes to sweep (m³), inner loop
    #[validate(length(min = 1))]
    pub volumes_m3: Vec<f64>,
    pub accumulation: AccumulationMode,
    /// Run scenarios on the blocking thread pool
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            external_temperatures_c: vec![25.0, 30.0, 35.0],
            volumes_m3: vec![0.5, 1.0, 2.0],
            accumulation: AccumulationMode::Cumulative,
            parallel: false,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.external_temperatures_c.is_empty() || self.volumes_m3.is_empty() {
            return Err(SimulationError::EmptySweepGrid);
        }
        for &temp in &self.external_temperatures_c {
            ensure_finite("external_temperature_c", temp)?;
        }
        for &volume in &self.volumes_m3 {
            ensure_positive("volume_m3", volume)?;
        }
        Validate::validate(self)?;
        Ok(())
    }

    /// Grid pairs in sweep order
    pub fn grid(&self) -> Vec<(f64, f64)> {
        itertools::iproduct!(
            self.external_temperatures_c.iter().copied(),
            self.volumes_m3.iter().copied()
        )
        .collect()
    }
}

/// Parameters shared by every scenario of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioParams {
    pub setpoint_c: f64,
    pub gains: PidGains,
    pub time_steps: usize,
    pub accumulation: AccumulationMode,
}

impl ScenarioParams {
    pub fn new(config: &SimulationConfig, accumulation: AccumulationMode) -> Self {
        Self {
            setpoint_c: config.setpoint_c,
            gains: config.gains,
            time_steps: config.time_steps,
            accumulation,
        }
    }
}

/// Total energy for one grid cell (Wh).
///
/// Builds its own controller, so scenarios never share state.
pub fn run_scenario(
    params: &ScenarioParams,
    external_temperature_c: f64,
    volume_m3: f64,
) -> f64 {
    let never = AtomicBool::new(false);
    scenario_total(params, external_temperature_c, volume_m3, &never).unwrap_or_default()
}

/// `None` once `stop` is set
fn scenario_total(
    params: &ScenarioParams,
    external_temperature_c: f64,
    volume_m3: f64,
    stop: &AtomicBool,
) -> Option<f64> {
    let setpoint = params.setpoint_c;
    let mut pid = PidController::with_gains(params.gains);
    let mut temperature = setpoint;
    let mut running_energy_wh = 0.0;
    let mut total_energy_wh = 0.0;

    for _ in 0..params.time_steps {
        if stop.load(Ordering::SeqCst) {
            return None;
        }
        let control_output = pid.control(setpoint, temperature);
        temperature += control_output - leakage_c(temperature, external_temperature_c);

        let energy_wh = step_energy_wh(overshoot_power_w(temperature, setpoint, volume_m3));
        running_energy_wh += energy_wh;

        total_energy_wh += match params.accumulation {
            AccumulationMode::Cumulative => running_energy_wh,
            AccumulationMode::Linear => energy_wh,
        };
    }

    Some(total_energy_wh)
}

/// Run every grid cell sequentially, in grid order
pub fn run_sweep(config: &SimulationConfig, sweep: &SweepConfig) -> Result<ScenarioResult> {
    run_sweep_until(config, sweep, &AtomicBool::new(false))
}

/// Sequential sweep that stops with [`SimulationError::Cancelled`] once `stop` is set
pub fn run_sweep_until(
    config: &SimulationConfig,
    sweep: &SweepConfig,
    stop: &AtomicBool,
) -> Result<ScenarioResult> {
    config.validate()?;
    sweep.validate()?;

    let params = ScenarioParams::new(config, sweep.accumulation);
    let mut results = ScenarioResult::new();
    for (external_c, volume_m3) in sweep.grid() {
        let total = scenario_total(&params, external_c, volume_m3, stop)
            .ok_or(SimulationError::Cancelled)?;
        debug!(external_c, volume_m3, total_energy_wh = total, "scenario finished");
        results.push(external_c, volume_m3, total);
    }

    info!(
        scenarios = results.len(),
        accumulation = %sweep.accumulation,
        "sweep finished"
    );
    Ok(results)
}

/// Run every grid cell on the blocking pool; results keep grid order
pub async fn run_sweep_parallel(
    config: &SimulationConfig,
    sweep: &SweepConfig,
) -> Result<ScenarioResult> {
    parallel_sweep(config, sweep, Arc::new(AtomicBool::new(false))).await
}

/// Run the sweep off the runtime thread, honouring `sweep.parallel`.
///
/// Setting `stop` makes every running scenario return at its next step and
/// the sweep resolve to [`SimulationError::Cancelled`]. Dropping the returned
/// future does not stop the blocking work; set the flag for that.
pub async fn run_sweep_cancellable(
    config: &SimulationConfig,
    sweep: &SweepConfig,
    stop: Arc<AtomicBool>,
) -> Result<ScenarioResult> {
    if sweep.parallel {
        return parallel_sweep(config, sweep, stop).await;
    }

    let config = config.clone();
    let sweep = sweep.clone();
    tokio::task::spawn_blocking(move || run_sweep_until(&config, &sweep, &stop)).await?
}

async fn parallel_sweep(
    config: &SimulationConfig,
    sweep: &SweepConfig,
    stop: Arc<AtomicBool>,
) -> Result<ScenarioResult> {
    config.validate()?;
    sweep.validate()?;

    let params = ScenarioParams::new(config, sweep.accumulation);
    let grid = sweep.grid();

    let mut tasks = JoinSet::new();
    for (index, &(external_c, volume_m3)) in grid.iter().enumerate() {
        let stop = Arc::clone(&stop);
        tasks.spawn_blocking(move || {
            (index, scenario_total(&params, external_c, volume_m3, &stop))
        });
    }

    let mut totals = vec![0.0; grid.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, total) = joined?;
        totals[index] = total.ok_or(SimulationError::Cancelled)?;
    }

    let mut results = ScenarioResult::new();
    for (&(external_c, volume_m3), total) in grid.iter().zip(totals) {
        results.push(external_c, volume_m3, total);
    }

    info!(
        scenarios = results.len(),
        accumulation = %sweep.accumulation,
        "parallel sweep finished"
    );
    Ok(results)
}
