use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::simulation::{SimulationConfig, SweepConfig};

pub const CONFIG_FILE: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "COLD_STORAGE__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub sweep: SweepConfig,
    pub report: ReportConfig,
}

/// What the binary prints after a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Print one line per simulated step
    pub print_steps: bool,
    /// Print the full report as JSON
    pub json: bool,
    /// Run the scenario sweep after the main simulation
    pub run_sweep: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            print_steps: false,
            json: false,
            run_sweep: true,
        }
    }
}

impl Config {
    /// Built-in defaults, then `config/default.toml`, then `COLD_STORAGE__*` env vars
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let cfg: Config = Self::figment().extract()?;
        cfg.simulation.validate()?;
        cfg.sweep.validate()?;
        Ok(cfg)
    }
}
