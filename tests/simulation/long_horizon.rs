use cold_storage_sim::controller::PidController;
use cold_storage_sim::simulation::{run_simulation, DoorConfig, SimulationConfig};

#[test]
#[ignore]
fn week_long_run_stays_finite() {
    let config = SimulationConfig {
        time_steps: 7 * 1440,
        random_seed: Some(7),
        ..Default::default()
    };
    let result = run_simulation(&config).unwrap();

    assert_eq!(result.len(), 7 * 1440);
    assert!(result.temperatures().iter().all(|t| t.is_finite()));
    assert!(result.total_energy_wh.is_finite());
    assert!(result.energy_consumption().iter().all(|&e| e >= 0.0));
}

#[test]
#[ignore]
fn unbounded_integral_keeps_growing() {
    // A controller that can never reach its setpoint accumulates without limit
    let mut pid = PidController::new(0.0, 1.0, 0.0);
    let mut last = 0.0;
    for _ in 0..1_000_000 {
        let output = pid.control(-18.0, 20.0);
        assert!(output < last);
        last = output;
    }
    assert_eq!(pid.integral(), -38.0 * 1_000_000.0);
}

#[test]
fn year_long_horizon_without_doors() {
    let config = SimulationConfig {
        time_steps: 365 * 24,
        door: DoorConfig::disabled(),
        ..Default::default()
    };
    let result = run_simulation(&config).unwrap();
    assert!(result.door_openings.is_empty());
    assert!(result.integral_errors().iter().all(|i| i.is_finite()));
}
