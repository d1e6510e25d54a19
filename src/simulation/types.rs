use serde::{Deserialize, Serialize};

/// Mutable state carried between steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Current enclosure temperature (°C)
    pub temperature_c: f64,
    /// Index of the next step to simulate
    pub step: usize,
}

/// Everything observed during one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    /// Ambient temperature for this step (°C)
    pub external_temperature_c: f64,
    /// Temperature after the control correction and leakage (°C)
    pub temperature_c: f64,
    /// `setpoint - temperature_c`
    pub error: f64,
    pub control_output: f64,
    /// Controller's previous error minus this step's error
    pub derivative_error: f64,
    /// Controller's accumulated integral after this step
    pub integral_error: f64,
    /// Energy drawn by cooling in this step (Wh)
    pub energy_wh: f64,
    pub door_opened: bool,
}

/// Output of a complete run, in step order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub setpoint_c: f64,
    pub records: Vec<StepRecord>,
    /// Steps at which the door was opened, ascending
    pub door_openings: Vec<usize>,
    pub total_energy_wh: f64,
    pub average_energy_wh: f64,
}

impl SimulationResult {
    pub(crate) fn from_records(setpoint_c: f64, records: Vec<StepRecord>) -> Self {
        let door_openings = records
            .iter()
            .filter(|r| r.door_opened)
            .map(|r| r.step)
            .collect();
        let total_energy_wh: f64 = records.iter().map(|r| r.energy_wh).sum();
        let average_energy_wh = if records.is_empty() {
            0.0
        } else {
            total_energy_wh / records.len() as f64
        };

        Self {
            setpoint_c,
            records,
            door_openings,
            total_energy_wh,
            average_energy_wh,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn column(&self, f: impl Fn(&StepRecord) -> f64) -> Vec<f64> {
        self.records.iter().map(f).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.column(|r| r.temperature_c)
    }

    pub fn external_temperatures(&self) -> Vec<f64> {
        self.column(|r| r.external_temperature_c)
    }

    pub fn errors(&self) -> Vec<f64> {
        self.column(|r| r.error)
    }

    pub fn outputs(&self) -> Vec<f64> {
        self.column(|r| r.control_output)
    }

    pub fn derivative_errors(&self) -> Vec<f64> {
        self.column(|r| r.derivative_error)
    }

    pub fn integral_errors(&self) -> Vec<f64> {
        self.column(|r| r.integral_error)
    }

    pub fn energy_consumption(&self) -> Vec<f64> {
        self.column(|r| r.energy_wh)
    }

    /// Temperature minus setpoint per step
    pub fn deviations(&self) -> Vec<f64> {
        self.column(|r| r.temperature_c - self.setpoint_c)
    }
}

/// Total energy for one (external temperature, volume) combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub external_temperature_c: f64,
    pub volume_m3: f64,
    pub total_energy_wh: f64,
}

/// Sweep output; iterates in grid order (external temperature outer, volume inner)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    entries: Vec<ScenarioEntry>,
}

impl ScenarioResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &mut self,
        external_temperature_c: f64,
        volume_m3: f64,
        total_energy_wh: f64,
    ) {
        self.entries.push(ScenarioEntry {
            external_temperature_c,
            volume_m3,
            total_energy_wh,
        });
    }

    /// Total energy for an exact grid key
    pub fn get(&self, external_temperature_c: f64, volume_m3: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| {
                e.external_temperature_c == external_temperature_c && e.volume_m3 == volume_m3
            })
            .map(|e| e.total_energy_wh)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ScenarioEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScenarioResult {
    type Item = &'a ScenarioEntry;
    type IntoIter = std::slice::Iter<'a, ScenarioEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
