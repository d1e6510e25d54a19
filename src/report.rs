//! # Run Reports
//!
//! Plain-data summaries of a [`SimulationResult`] for presentation layers.
//! Nothing here formats text or renders charts.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::simulation::{ScenarioResult, SimulationResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub min_c: f64,
    pub max_c: f64,
    pub mean_c: f64,
}

impl TemperatureSummary {
    /// `None` for an empty run
    pub fn from_result(result: &SimulationResult) -> Option<Self> {
        if result.is_empty() {
            return None;
        }

        let temps = result.temperatures();
        let (min_c, max_c) = temps
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        let mean_c = temps.iter().sum::<f64>() / temps.len() as f64;

        Some(Self {
            min_c,
            max_c,
            mean_c,
        })
    }
}

/// Change between two consecutive door openings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorOpeningDelta {
    pub from_step: usize,
    pub to_step: usize,
    /// Temperature at `to_step` minus temperature at `from_step` (°C)
    pub temperature_increase_c: f64,
    /// Energy at `to_step` minus energy at `from_step` (Wh)
    pub energy_increase_wh: f64,
}

/// Deltas for each consecutive pair of door openings.
///
/// Empty when the run saw fewer than two openings.
pub fn door_opening_deltas(result: &SimulationResult) -> Vec<DoorOpeningDelta> {
    result
        .door_openings
        .iter()
        .tuple_windows()
        .filter_map(|(&from, &to)| {
            let start = result.records.get(from)?;
            let end = result.records.get(to)?;
            Some(DoorOpeningDelta {
                from_step: from,
                to_step: to,
                temperature_increase_c: end.temperature_c - start.temperature_c,
                energy_increase_wh: end.energy_wh - start.energy_wh,
            })
        })
        .collect()
}

/// Everything a presentation layer needs about one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub setpoint_c: f64,
    pub time_steps: usize,
    pub temperature: Option<TemperatureSummary>,
    pub total_energy_wh: f64,
    pub average_energy_wh: f64,
    pub door_openings: Vec<usize>,
    pub door_opening_deltas: Vec<DoorOpeningDelta>,
}

impl RunReport {
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            setpoint_c: result.setpoint_c,
            time_steps: result.len(),
            temperature: TemperatureSummary::from_result(result),
            total_energy_wh: result.total_energy_wh,
            average_energy_wh: result.average_energy_wh,
            door_openings: result.door_openings.clone(),
            door_opening_deltas: door_opening_deltas(result),
        }
    }
}

/// Run report plus sweep totals, serialisable as one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub run: RunReport,
    pub scenarios: Option<ScenarioResult>,
}
