//! # Door Opening Disturbances
//!
//! Each step the simulator draws an expected daily number of door openings
//! (uniform in `1..=5`) and a uniform sample in `[0, 1)`. The door opens when
//! `sample < openings / time_steps`. The check runs independently on every
//! step, so the realised number of openings per run is itself random and is
//! not capped at five.
//!
//! Randomness is injected through [`DisturbanceSource`] so runs can be seeded
//! or scripted.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fewest door openings a day is drawn with
pub const MIN_DAILY_OPENINGS: u32 = 1;
/// Most door openings a day is drawn with
pub const MAX_DAILY_OPENINGS: u32 = 5;

/// Random draws consumed by the door model
#[cfg_attr(test, mockall::automock)]
pub trait DisturbanceSource {
    /// Expected openings per day, uniform in `min..=max`
    fn daily_openings(&mut self, min: u32, max: u32) -> u32;

    /// Uniform sample in `[0, 1)`
    fn unit_sample(&mut self) -> f64;
}

/// `StdRng` backed source; seeded for reproducible runs
pub struct RandomDisturbance {
    rng: StdRng,
}

impl RandomDisturbance {
    pub fn new(random_seed: Option<u64>) -> Self {
        let rng = match random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl DisturbanceSource for RandomDisturbance {
    fn daily_openings(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }

    fn unit_sample(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Opens the door at exactly the listed steps and nowhere else.
///
/// Assumes it is polled once per step in order, which is how the simulator
/// drives it. The requested range is ignored.
#[derive(Debug, Clone, Default)]
pub struct ScheduledDoorOpenings {
    steps: BTreeSet<usize>,
    next_step: usize,
}

impl ScheduledDoorOpenings {
    pub fn new(steps: impl IntoIterator<Item = usize>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            next_step: 0,
        }
    }

    /// Never opens
    pub fn none() -> Self {
        Self::default()
    }
}

impl DisturbanceSource for ScheduledDoorOpenings {
    fn daily_openings(&mut self, _min: u32, max: u32) -> u32 {
        let step = self.next_step;
        self.next_step += 1;
        if self.steps.contains(&step) {
            max.max(1)
        } else {
            0
        }
    }

    fn unit_sample(&mut self) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct DoorConfig {
    /// Disable to run without any door openings
    pub enabled: bool,
    /// Temperature rise from a single opening (°C)
    #[validate(range(min = 0.0))]
    pub heat_gain_c: f64,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heat_gain_c: 1.0,
        }
    }
}

impl DoorConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Openings only happen when enabled and they actually add heat
    pub fn is_active(&self) -> bool {
        self.enabled && self.heat_gain_c > 0.0
    }

    /// Decide whether the door opens on this step.
    ///
    /// Consumes one openings draw and one unit sample from `source`.
    pub fn door_opens<S>(&self, source: &mut S, time_steps: usize) -> bool
    where
        S: DisturbanceSource + ?Sized,
    {
        if !self.is_active() {
            return false;
        }
        let openings = source.daily_openings(MIN_DAILY_OPENINGS, MAX_DAILY_OPENINGS);
        let sample = source.unit_sample();
        sample < openings as f64 / time_steps as f64
    }
}
