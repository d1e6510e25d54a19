//! # Refrigerator Simulation Loop
//!
//! Drives a [`PidController`] once per step against an enclosure exposed to a
//! sinusoidal ambient temperature and random door openings.
//!
//! Step order:
//! 1. read the ambient temperature for the step
//! 2. door check; an opening adds `heat_gain_c` to the enclosure
//! 3. controller correction from `(setpoint, temperature)`
//! 4. apply the correction and passive leakage towards ambient
//! 5. record temperature, error and controller internals
//! 6. cooling power from the overshoot and the ambient load
//! 7. energy for the step (Wh)
//! 8. subtract the temperature drop caused by that energy

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::disturbance::{DisturbanceSource, DoorConfig, RandomDisturbance};
use super::enclosure::{cooling_power_w, leakage_c, step_energy_wh, EnclosureConfig};
use super::profile::ExternalTemperatureProfile;
use super::types::{SimulationResult, SimulationState, StepRecord};
use crate::controller::{PidController, PidGains};
use crate::error::{ensure_finite, Result, SimulationError};

/// One minute per step over a day
pub const DEFAULT_TIME_STEPS: usize = 1440;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    /// Target enclosure temperature (°C)
    pub setpoint_c: f64,
    /// Enclosure temperature at step 0 (°C)
    pub initial_temperature_c: f64,
    pub external: ExternalTemperatureProfile,
    #[validate(range(min = 1))]
    pub time_steps: usize,
    pub gains: PidGains,
    #[validate(nested)]
    pub enclosure: EnclosureConfig,
    #[validate(nested)]
    pub door: DoorConfig,
    /// Random seed for reproducibility (None = random)
    pub random_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            setpoint_c: 5.0,
            initial_temperature_c: 15.0,
            external: ExternalTemperatureProfile::default(),
            time_steps: DEFAULT_TIME_STEPS,
            gains: PidGains::default(),
            enclosure: EnclosureConfig::default(),
            door: DoorConfig::default(),
            random_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Check the configuration before any step runs
    pub fn validate(&self) -> Result<()> {
        if self.time_steps == 0 {
            return Err(SimulationError::InvalidTimeSteps(self.time_steps));
        }
        ensure_finite("setpoint_c", self.setpoint_c)?;
        ensure_finite("initial_temperature_c", self.initial_temperature_c)?;
        ensure_finite("external.baseline_c", self.external.baseline_c)?;
        ensure_finite("gains.kp", self.gains.kp)?;
        ensure_finite("gains.ki", self.gains.ki)?;
        ensure_finite("gains.kd", self.gains.kd)?;
        ensure_finite("door.heat_gain_c", self.door.heat_gain_c)?;
        self.enclosure.check()?;

        Validate::validate(self)?;
        Ok(())
    }
}

/// Single-run simulator owning its controller and state
pub struct RefrigeratorSimulator {
    config: SimulationConfig,
    pid: PidController,
    state: SimulationState,
    external_temperatures: Vec<f64>,
}

impl RefrigeratorSimulator {
    /// Create a new simulator; fails on an invalid configuration
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let external_temperatures = config.external.trajectory(config.time_steps);

        Ok(Self {
            pid: PidController::with_gains(config.gains),
            state: SimulationState {
                temperature_c: config.initial_temperature_c,
                step: 0,
            },
            external_temperatures,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn controller(&self) -> &PidController {
        &self.pid
    }

    pub fn is_finished(&self) -> bool {
        self.state.step >= self.config.time_steps
    }

    /// Advance one step; `None` once the horizon is reached
    pub fn step<S>(&mut self, source: &mut S) -> Option<StepRecord>
    where
        S: DisturbanceSource + ?Sized,
    {
        let step = self.state.step;
        let external_c = *self.external_temperatures.get(step)?;
        let setpoint = self.config.setpoint_c;
        let mut temperature = self.state.temperature_c;

        let door_opened = self.config.door.door_opens(source, self.config.time_steps);
        if door_opened {
            temperature += self.config.door.heat_gain_c;
            debug!(step, temperature_c = temperature, "door opened");
        }

        let control_output = self.pid.control(setpoint, temperature);
        temperature += control_output - leakage_c(temperature, external_c);

        let error = setpoint - temperature;
        let derivative_error = self.pid.previous_error() - error;
        let integral_error = self.pid.integral();

        let volume_m3 = self.config.enclosure.volume_m3;
        let power_w = cooling_power_w(temperature, setpoint, external_c, volume_m3);
        let energy_wh = step_energy_wh(power_w);

        let record = StepRecord {
            step,
            external_temperature_c: external_c,
            temperature_c: temperature,
            error,
            control_output,
            derivative_error,
            integral_error,
            energy_wh,
            door_opened,
        };

        temperature -= energy_wh / self.config.enclosure.heat_capacity_j_per_c();

        self.state = SimulationState {
            temperature_c: temperature,
            step: step + 1,
        };

        Some(record)
    }

    /// Run the remaining steps and collect the result
    pub fn run<S>(mut self, source: &mut S) -> SimulationResult
    where
        S: DisturbanceSource + ?Sized,
    {
        let mut records = Vec::with_capacity(self.config.time_steps - self.state.step);
        while let Some(record) = self.step(source) {
            records.push(record);
        }

        let result = SimulationResult::from_records(self.config.setpoint_c, records);
        info!(
            time_steps = result.len(),
            door_openings = result.door_openings.len(),
            total_energy_wh = result.total_energy_wh,
            average_energy_wh = result.average_energy_wh,
            final_temperature_c = self.state.temperature_c,
            "simulation finished"
        );
        result
    }
}

/// Run a full simulation with randomness drawn from `config.random_seed`
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationResult> {
    let mut source = RandomDisturbance::new(config.random_seed);
    run_simulation_with(config, &mut source)
}

/// Run a full simulation with an injected disturbance source
pub fn run_simulation_with<S>(
    config: &SimulationConfig,
    source: &mut S,
) -> Result<SimulationResult>
where
    S: DisturbanceSource + ?Sized,
{
    let simulator = RefrigeratorSimulator::new(config.clone())?;
    Ok(simulator.run(source))
}
