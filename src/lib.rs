pub mod config;
pub mod controller;
pub mod error;
pub mod report;
pub mod simulation;
pub mod telemetry;

pub use error::{Result, SimulationError};
