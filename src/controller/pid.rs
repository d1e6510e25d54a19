/// PID (Proportional-Integral-Derivative) Controller
///
/// A PID controller continuously calculates an error value as the difference
/// between a desired setpoint and a measured process variable, and applies
/// a correction based on proportional, integral, and derivative terms.
///
/// # Theory
/// - **P (Proportional)**: Responds to the current error
/// - **I (Integral)**: Responds to accumulated past errors
/// - **D (Derivative)**: Responds to the change of error since the last step
///
/// Output = Kp * error + Ki * Σerror + Kd * (error - previous_error)
///
/// The controller runs on a fixed discrete step, so there is no `dt` term.
/// The integral is never clamped: long horizons with a persistent offset let
/// it grow without bound.
use serde::{Deserialize, Serialize};

/// Controller gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// All gains zero; the controller output is then always 0.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Default for PidGains {
    fn default() -> Self {
        // Tuned for a small enclosure stepped once per minute
        Self::new(0.5, 0.1, 0.05)
    }
}

#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,

    /// Accumulated error
    integral: f64,
    /// Error seen on the previous call
    previous_error: f64,
}

impl PidController {
    /// Create a new PID controller with zeroed state
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self::with_gains(PidGains::new(kp, ki, kd))
    }

    pub fn with_gains(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            previous_error: 0.0,
        }
    }

    /// Update gains without touching the accumulated state
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Reset the controller state
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    /// Calculate control output for one step
    ///
    /// # Arguments
    /// * `setpoint` - Target value
    /// * `measured_value` - Current reading
    ///
    /// # Returns
    /// Control output value. Mutates the integral and previous error.
    pub fn control(&mut self, setpoint: f64, measured_value: f64) -> f64 {
        let error = setpoint - measured_value;

        self.integral += error;
        let derivative = error - self.previous_error;

        let output = self.gains.kp * error
            + self.gains.ki * self.integral
            + self.gains.kd * derivative;

        self.previous_error = error;

        output
    }

    /// Get current integral term
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Get previous error
    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }
}

impl Default for PidController {
    fn default() -> Self {
        Self::with_gains(PidGains::default())
    }
}
