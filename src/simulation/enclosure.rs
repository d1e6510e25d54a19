//! # Enclosure and Cooling Model
//!
//! Physical parameters of the refrigerated volume plus the simplified linear
//! cooling-power approximation used to account for energy.
//!
//! The cooling model is not a thermodynamic model of a compressor. Power is
//! proportional to how far the enclosure sits above its setpoint and how warm
//! the surroundings are, both scaled by volume.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ensure_positive, Result};

/// Fraction of the indoor/outdoor difference leaking in per step
pub const LEAKAGE_COEFFICIENT: f64 = 0.01;
/// Cooling power per degree above setpoint per m³ (W)
pub const OVERSHOOT_POWER_W_PER_C_M3: f64 = 10.0;
/// Cooling power per degree of ambient above setpoint per m³ (W)
pub const AMBIENT_POWER_W_PER_C_M3: f64 = 7.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct EnclosureConfig {
    /// Internal air volume (m³)
    #[validate(range(exclusive_min = 0.0))]
    pub volume_m3: f64,
    /// Air density (kg/m³)
    #[validate(range(exclusive_min = 0.0))]
    pub air_density_kg_m3: f64,
    /// Specific heat of air (J/(kg·°C))
    #[validate(range(exclusive_min = 0.0))]
    pub specific_heat_j_kg_c: f64,
}

impl Default for EnclosureConfig {
    fn default() -> Self {
        Self {
            volume_m3: 0.40,
            air_density_kg_m3: 1.225,
            specific_heat_j_kg_c: 1005.0,
        }
    }
}

impl EnclosureConfig {
    pub fn with_volume(volume_m3: f64) -> Self {
        Self {
            volume_m3,
            ..Default::default()
        }
    }

    /// Mass of the enclosed air (kg)
    pub fn mass_kg(&self) -> f64 {
        self.volume_m3 * self.air_density_kg_m3
    }

    /// Heat required to move the enclosed air by one degree (J/°C)
    pub fn heat_capacity_j_per_c(&self) -> f64 {
        self.mass_kg() * self.specific_heat_j_kg_c
    }

    /// Fail fast on anything that would make the heat capacity zero
    pub fn check(&self) -> Result<()> {
        ensure_positive("volume_m3", self.volume_m3)?;
        ensure_positive("air_density_kg_m3", self.air_density_kg_m3)?;
        ensure_positive("specific_heat_j_kg_c", self.specific_heat_j_kg_c)?;
        Ok(())
    }
}

/// Passive heat exchange with the surroundings for one step (°C)
pub fn leakage_c(temperature_c: f64, external_c: f64) -> f64 {
    (temperature_c - external_c) * LEAKAGE_COEFFICIENT
}

/// Cooling power needed while the enclosure is above its setpoint (W).
///
/// Zero at or below the setpoint, never negative.
pub fn cooling_power_w(
    temperature_c: f64,
    setpoint_c: f64,
    external_c: f64,
    volume_m3: f64,
) -> f64 {
    let overshoot = temperature_c - setpoint_c;
    if overshoot > 0.0 {
        let ambient_load = external_c - setpoint_c;
        let power = overshoot * OVERSHOOT_POWER_W_PER_C_M3 * volume_m3
            + ambient_load * AMBIENT_POWER_W_PER_C_M3 * volume_m3;
        power.max(0.0)
    } else {
        0.0
    }
}

/// Overshoot-only cooling power used by the scenario sweep (W)
pub fn overshoot_power_w(temperature_c: f64, setpoint_c: f64, volume_m3: f64) -> f64 {
    let overshoot = temperature_c - setpoint_c;
    if overshoot > 0.0 {
        (overshoot * OVERSHOOT_POWER_W_PER_C_M3 * volume_m3).max(0.0)
    } else {
        0.0
    }
}

/// Energy drawn in one step for a given cooling power (Wh)
pub fn step_energy_wh(power_w: f64) -> f64 {
    power_w / SECONDS_PER_HOUR
}
