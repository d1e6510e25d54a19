use cold_storage_sim::controller::PidGains;
use cold_storage_sim::report::door_opening_deltas;
use cold_storage_sim::simulation::{
    run_simulation, run_simulation_with, DisturbanceSource, DoorConfig, EnclosureConfig,
    RefrigeratorSimulator, ScheduledDoorOpenings, SimulationConfig,
};
use cold_storage_sim::SimulationError;

/// Setpoint 5, start at 15, 10 steps, default gains, 0.40 m³, doors disabled
fn baseline_config() -> SimulationConfig {
    SimulationConfig {
        setpoint_c: 5.0,
        initial_temperature_c: 15.0,
        time_steps: 10,
        gains: PidGains::new(0.5, 0.1, 0.05),
        enclosure: EnclosureConfig::with_volume(0.40),
        door: DoorConfig::disabled(),
        ..Default::default()
    }
}

#[test]
fn baseline_first_step() {
    let result = run_simulation(&baseline_config()).unwrap();
    let first = result.records[0];

    // error = -10 on the first call; integral and derivative both equal it
    assert!((first.control_output - (-6.5)).abs() < 1e-12);

    let after_control = 15.0 + first.control_output - (15.0 - 25.0) * 0.01;
    assert!((first.temperature_c - after_control).abs() < 1e-12);

    let power_w = (after_control - 5.0) * 10.0 * 0.40 + (25.0 - 5.0) * 7.0 * 0.40;
    let energy_wh = power_w / 3600.0;
    assert!((first.energy_wh - energy_wh).abs() < 1e-12);

    // Second step starts from the cooled temperature
    let cooled = after_control - energy_wh / (0.40 * 1.225 * 1005.0);
    let mut simulator = RefrigeratorSimulator::new(baseline_config()).unwrap();
    let mut source = ScheduledDoorOpenings::none();
    simulator.step(&mut source).unwrap();
    assert!((simulator.state().temperature_c - cooled).abs() < 1e-12);
    assert!((simulator.controller().previous_error() - (-10.0)).abs() < 1e-12);
}

#[test]
fn output_sequences_have_horizon_length() {
    let result = run_simulation(&SimulationConfig {
        random_seed: Some(99),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(result.temperatures().len(), 1440);
    assert_eq!(result.errors().len(), 1440);
    assert_eq!(result.outputs().len(), 1440);
    assert_eq!(result.derivative_errors().len(), 1440);
    assert_eq!(result.integral_errors().len(), 1440);
    assert_eq!(result.energy_consumption().len(), 1440);
}

#[test]
fn errors_match_temperatures_exactly() {
    let result = run_simulation(&SimulationConfig {
        random_seed: Some(17),
        ..Default::default()
    })
    .unwrap();

    for (error, temperature) in result.errors().iter().zip(result.temperatures()) {
        assert_eq!(*error, 5.0 - temperature);
    }
    assert!(result.energy_consumption().iter().all(|&e| e >= 0.0));
}

#[test]
fn integral_error_is_running_sum_of_pre_control_errors() {
    let result = run_simulation(&baseline_config()).unwrap();
    let integrals = result.integral_errors();
    let derivatives = result.derivative_errors();

    // Controller error at step t is setpoint minus the temperature it saw,
    // so consecutive integral differences recover it
    let first_error = integrals[0];
    assert_eq!(first_error, -10.0);
    for t in 1..integrals.len() {
        let controller_error = integrals[t] - integrals[t - 1];
        let expected = controller_error - result.errors()[t];
        assert!((derivatives[t] - expected).abs() < 1e-9);
    }
}

#[test]
fn zero_gains_leave_only_passive_dynamics() {
    let config = SimulationConfig {
        gains: PidGains::zero(),
        ..baseline_config()
    };
    let result = run_simulation(&config).unwrap();
    assert!(result.outputs().iter().all(|&u| u == 0.0));
    // Enclosure drifts towards the warmer ambient
    assert!(result.records[0].temperature_c > 15.0);
}

#[test]
fn single_step_horizon() {
    let config = SimulationConfig {
        time_steps: 1,
        ..baseline_config()
    };
    let result = run_simulation(&config).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.total_energy_wh, result.average_energy_wh);
}

#[test]
fn scheduled_door_openings_are_recorded() {
    let config = SimulationConfig {
        time_steps: 200,
        door: DoorConfig::default(),
        ..baseline_config()
    };
    let mut source = ScheduledDoorOpenings::new([20, 21, 150]);
    let result = run_simulation_with(&config, &mut source).unwrap();

    assert_eq!(result.door_openings, vec![20, 21, 150]);
    assert_eq!(door_opening_deltas(&result).len(), 2);
}

#[test]
fn single_door_opening_at_last_step() {
    let config = SimulationConfig {
        door: DoorConfig::default(),
        ..baseline_config()
    };
    let mut source = ScheduledDoorOpenings::new([9]);
    let result = run_simulation_with(&config, &mut source).unwrap();

    assert_eq!(result.door_openings, vec![9]);
    assert!(door_opening_deltas(&result).is_empty());
}

/// Door source that always opens, to check the draw contract from outside
struct AlwaysOpen {
    draws: usize,
}

impl DisturbanceSource for AlwaysOpen {
    fn daily_openings(&mut self, min: u32, max: u32) -> u32 {
        assert_eq!((min, max), (1, 5));
        self.draws += 1;
        max
    }

    fn unit_sample(&mut self) -> f64 {
        0.0
    }
}

#[test]
fn custom_source_drives_every_step() {
    let config = SimulationConfig {
        door: DoorConfig::default(),
        ..baseline_config()
    };
    let mut source = AlwaysOpen { draws: 0 };
    let result = run_simulation_with(&config, &mut source).unwrap();

    assert_eq!(source.draws, 10);
    assert_eq!(result.door_openings, (0..10).collect::<Vec<_>>());
}

#[test]
fn seeded_runs_are_reproducible_and_seed_sensitive() {
    let seeded = |seed| {
        run_simulation(&SimulationConfig {
            random_seed: Some(seed),
            ..Default::default()
        })
        .unwrap()
    };

    assert_eq!(seeded(1), seeded(1));
    let openings: Vec<Vec<usize>> = (0..20).map(|s| seeded(s).door_openings).collect();
    assert!(openings.iter().any(|o| o != &openings[0]));
}

#[test]
fn zero_volume_fails_before_simulating() {
    let config = SimulationConfig {
        enclosure: EnclosureConfig::with_volume(0.0),
        ..baseline_config()
    };
    let err = run_simulation(&config).unwrap_err();
    assert!(matches!(err, SimulationError::NonPositiveParameter { .. }));
}

#[test]
fn zero_time_steps_fails_before_simulating() {
    let config = SimulationConfig {
        time_steps: 0,
        ..baseline_config()
    };
    assert!(matches!(
        RefrigeratorSimulator::new(config),
        Err(SimulationError::InvalidTimeSteps(0))
    ));
}
