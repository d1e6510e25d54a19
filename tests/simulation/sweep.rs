use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cold_storage_sim::controller::PidGains;
use cold_storage_sim::simulation::{
    run_scenario, run_sweep, run_sweep_cancellable, run_sweep_parallel, AccumulationMode,
    ScenarioParams, SimulationConfig, SweepConfig,
};
use cold_storage_sim::SimulationError;
use rstest::rstest;

fn config(time_steps: usize) -> SimulationConfig {
    SimulationConfig {
        time_steps,
        random_seed: Some(1),
        ..Default::default()
    }
}

#[test]
fn default_grid_covers_every_pair_in_order() {
    let results = run_sweep(&config(1440), &SweepConfig::default()).unwrap();

    let keys: Vec<(f64, f64)> = results
        .iter()
        .map(|e| (e.external_temperature_c, e.volume_m3))
        .collect();
    assert_eq!(
        keys,
        vec![
            (25.0, 0.5),
            (25.0, 1.0),
            (25.0, 2.0),
            (30.0, 0.5),
            (30.0, 1.0),
            (30.0, 2.0),
            (35.0, 0.5),
            (35.0, 1.0),
            (35.0, 2.0),
        ]
    );
}

#[test]
fn sweep_is_idempotent() {
    let sweep = SweepConfig::default();
    assert_eq!(
        run_sweep(&config(1440), &sweep).unwrap(),
        run_sweep(&config(1440), &sweep).unwrap()
    );
}

#[test]
fn sweep_ignores_door_settings_and_seed() {
    let sweep = SweepConfig::default();
    let a = run_sweep(&config(300), &sweep).unwrap();
    let b = run_sweep(
        &SimulationConfig {
            random_seed: None,
            ..config(300)
        },
        &sweep,
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn volume_scales_energy_linearly() {
    let results = run_sweep(&config(500), &SweepConfig::default()).unwrap();
    for temp in [25.0, 30.0, 35.0] {
        let half = results.get(temp, 0.5).unwrap();
        let double = results.get(temp, 2.0).unwrap();
        assert!((double - 4.0 * half).abs() < 1e-9 * double.max(1.0));
    }
}

#[rstest]
#[case(10)]
#[case(100)]
#[case(1000)]
fn cumulative_total_dominates_linear(#[case] time_steps: usize) {
    let params = ScenarioParams::new(&config(time_steps), AccumulationMode::Cumulative);
    let linear = ScenarioParams {
        accumulation: AccumulationMode::Linear,
        ..params
    };
    let cumulative = run_scenario(&params, 30.0, 1.0);
    let plain = run_scenario(&linear, 30.0, 1.0);

    assert!(plain > 0.0);
    assert!(cumulative >= plain);
    // No step can be weighted more than the horizon length
    assert!(cumulative <= plain * time_steps as f64 + 1e-9);
}

#[test]
fn each_scenario_uses_a_fresh_controller() {
    let params = ScenarioParams {
        setpoint_c: 5.0,
        gains: PidGains::default(),
        time_steps: 200,
        accumulation: AccumulationMode::Linear,
    };
    let first = run_scenario(&params, 35.0, 1.0);
    let _ = run_scenario(&params, 25.0, 1.0);
    assert_eq!(run_scenario(&params, 35.0, 1.0), first);
}

#[tokio::test]
async fn parallel_sweep_keeps_grid_order() {
    let sweep = SweepConfig {
        external_temperatures_c: vec![40.0, 20.0, 30.0],
        volumes_m3: vec![3.0, 0.25],
        accumulation: AccumulationMode::Linear,
        parallel: true,
    };
    let parallel = run_sweep_parallel(&config(1440), &sweep).await.unwrap();
    let sequential = run_sweep(&config(1440), &sweep).unwrap();

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.entries()[0].external_temperature_c, 40.0);
    assert_eq!(parallel.entries()[1].volume_m3, 0.25);
}

#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test]
async fn shutdown_wins_race_against_long_sweep(#[case] parallel: bool) {
    let config = config(5_000_000);
    let sweep = SweepConfig {
        parallel,
        ..Default::default()
    };
    let stop = Arc::new(AtomicBool::new(false));

    let cancelled = tokio::select! {
        _ = run_sweep_cancellable(&config, &sweep, Arc::clone(&stop)) => false,
        _ = tokio::time::sleep(Duration::from_millis(10)) => true,
    };
    assert!(cancelled, "sweep blocked the runtime until it finished");
    stop.store(true, Ordering::SeqCst);
}

#[tokio::test]
async fn stop_flag_ends_running_sweep() {
    let stop = Arc::new(AtomicBool::new(false));
    let handle = tokio::spawn({
        let stop = Arc::clone(&stop);
        async move {
            run_sweep_cancellable(&config(5_000_000), &SweepConfig::default(), stop).await
        }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    stop.store(true, Ordering::SeqCst);

    let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("sweep kept running after stop")
        .unwrap();
    assert!(matches!(outcome, Err(SimulationError::Cancelled)));
}
