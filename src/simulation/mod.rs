//! # Cold Storage Simulation Module
//!
//! Discrete-time simulation of a refrigerated enclosure regulated by a PID
//! controller.
//!
//! ## Components
//!
//! - **Refrigerator**: the main loop; door disturbances, control correction,
//!   passive leakage, cooling energy and its feedback on temperature
//! - **Sweep**: simplified reruns over an (ambient temperature, volume) grid
//! - **Disturbance**: injectable randomness for door openings
//! - **Enclosure**: physical parameters and the linear cooling-power model
//! - **Profile**: sinusoidal ambient temperature
//!
//! ## Usage
//!
//! ```rust
//! use cold_storage_sim::simulation::{run_simulation, run_sweep, SimulationConfig, SweepConfig};
//!
//! let config = SimulationConfig {
//!     time_steps: 60,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let result = run_simulation(&config).unwrap();
//! assert_eq!(result.temperatures().len(), 60);
//!
//! let scenarios = run_sweep(&config, &SweepConfig::default()).unwrap();
//! assert_eq!(scenarios.len(), 9);
//! ```

pub mod disturbance;
pub mod enclosure;
pub mod profile;
pub mod refrigerator;
pub mod sweep;
pub mod types;

pub use disturbance::{DisturbanceSource, DoorConfig, RandomDisturbance, ScheduledDoorOpenings};
pub use enclosure::EnclosureConfig;
pub use profile::ExternalTemperatureProfile;
pub use refrigerator::{
    run_simulation, run_simulation_with, RefrigeratorSimulator, SimulationConfig,
    DEFAULT_TIME_STEPS,
};
pub use sweep::{
    run_scenario, run_sweep, run_sweep_cancellable, run_sweep_parallel, run_sweep_until,
    AccumulationMode, ScenarioParams, SweepConfig,
};
pub use types::{ScenarioEntry, ScenarioResult, SimulationResult, SimulationState, StepRecord};
