use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use cold_storage_sim::report::{FullReport, RunReport};
use cold_storage_sim::simulation::{run_simulation, run_sweep_cancellable, ScenarioResult};
use cold_storage_sim::{config, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    if cfg.simulation.random_seed.is_none() {
        info!("no random_seed configured, door openings will differ between runs");
    }

    let result = run_simulation(&cfg.simulation)?;
    let report = RunReport::from_result(&result);

    if let Some(summary) = report.temperature {
        info!(
            min_c = summary.min_c,
            max_c = summary.max_c,
            mean_c = summary.mean_c,
            "temperature summary"
        );
    }
    info!(
        total_energy_wh = report.total_energy_wh,
        average_energy_wh = report.average_energy_wh,
        door_openings = ?report.door_openings,
        "energy summary"
    );
    for delta in &report.door_opening_deltas {
        info!(
            from_step = delta.from_step,
            to_step = delta.to_step,
            temperature_increase_c = delta.temperature_increase_c,
            energy_increase_wh = delta.energy_increase_wh,
            "change between door openings"
        );
    }

    if cfg.report.print_steps {
        for record in &result.records {
            println!(
                "minute {:>4}  temp {:>7.2} °C  setpoint {:>5.1} °C  diff {:>6.2} °C  \
                 error {:>6.2}  pid {:>7.2}  energy {:.4} Wh",
                record.step + 1,
                record.temperature_c,
                result.setpoint_c,
                record.temperature_c - result.setpoint_c,
                record.error,
                record.control_output,
                record.energy_wh,
            );
        }
    }

    let scenarios = if cfg.report.run_sweep {
        let stop = Arc::new(AtomicBool::new(false));
        let sweep = run_sweep_cancellable(&cfg.simulation, &cfg.sweep, Arc::clone(&stop));

        tokio::select! {
            res = sweep => Some(res?),
            _ = telemetry::shutdown_signal() => {
                stop.store(true, Ordering::SeqCst);
                warn!("sweep cancelled");
                None
            }
        }
    } else {
        None
    };

    if let Some(scenarios) = &scenarios {
        print_scenarios(scenarios);
    }

    if cfg.report.json {
        let full = FullReport {
            run: report,
            scenarios,
        };
        println!("{}", serde_json::to_string_pretty(&full)?);
    }

    Ok(())
}

fn print_scenarios(scenarios: &ScenarioResult) {
    println!("{:>10} {:>10} {:>16}", "ext °C", "volume m³", "energy Wh");
    for entry in scenarios {
        println!(
            "{:>10.1} {:>10.2} {:>16.2}",
            entry.external_temperature_c, entry.volume_m3, entry.total_energy_wh
        );
    }
}
