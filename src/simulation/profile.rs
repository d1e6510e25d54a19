//! # External Temperature Profile
//!
//! Sinusoidal ambient temperature around the enclosure:
//! `T_ext(t) = sin(t / 10) * 5 + baseline`, one sample per simulation step.

use serde::{Deserialize, Serialize};

/// Swing of the ambient temperature around its baseline (°C)
pub const AMPLITUDE_C: f64 = 5.0;
/// Steps per radian of the ambient oscillation
pub const PERIOD_DIVISOR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalTemperatureProfile {
    /// Mean ambient temperature (°C)
    pub baseline_c: f64,
}

impl Default for ExternalTemperatureProfile {
    fn default() -> Self {
        Self { baseline_c: 25.0 }
    }
}

impl ExternalTemperatureProfile {
    pub fn new(baseline_c: f64) -> Self {
        Self { baseline_c }
    }

    /// Ambient temperature at a given step
    pub fn at(&self, step: usize) -> f64 {
        (step as f64 / PERIOD_DIVISOR).sin() * AMPLITUDE_C + self.baseline_c
    }

    /// Precompute the trajectory for `time_steps` steps
    pub fn trajectory(&self, time_steps: usize) -> Vec<f64> {
        (0..time_steps).map(|step| self.at(step)).collect()
    }
}
