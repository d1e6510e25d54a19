use thiserror::Error;

/// Errors raised while checking a simulation or sweep configuration.
///
/// Every run validates its inputs before the first step, so apart from
/// `Task` and `Cancelled` none of these can surface mid-simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("time_steps must be at least 1 (got {0})")]
    InvalidTimeSteps(usize),

    #[error("{name} must be positive (got {value})")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("{name} is not finite: {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("sweep grid is empty")]
    EmptySweepGrid,

    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("scenario task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("sweep cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::NonFiniteParameter { name, value })
    }
}

/// Reject zero, negative and non-finite values.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::NonPositiveParameter { name, value })
    }
}
