//! Evaluation configuration.
//!
//! [`EvalConfig`] holds the call-site parameters of the evaluation pipeline.

use crate::variable::INTEGER_TOLERANCE;

/// Configuration for candidate evaluation.
///
/// # Defaults
///
/// ```
/// use u_evoprob::eval::EvalConfig;
///
/// let config = EvalConfig::default();
/// assert_eq!(config.integer_tolerance, 1e-9);
/// assert!(config.time_limit_ms.is_none());
/// assert!(config.parallel);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evoprob::eval::EvalConfig;
///
/// let config = EvalConfig::default()
///     .with_time_limit_ms(2_000)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Largest fractional residue accepted for integer variables.
    pub integer_tolerance: f64,

    /// Optional wall-clock limit per candidate, in milliseconds.
    ///
    /// Checked at each call-site boundary (before repair, before analysis,
    /// between single-response callables, after analysis). A running user
    /// hook is never interrupted; the limit is enforced once it returns.
    ///
    /// `None` disables the limit (the default).
    pub time_limit_ms: Option<u64>,

    /// Whether batch evaluation runs candidates in parallel.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            integer_tolerance: INTEGER_TOLERANCE,
            time_limit_ms: None,
            parallel: true,
        }
    }
}

impl EvalConfig {
    /// Sets the integer tolerance. Negative values are clamped to zero.
    pub fn with_integer_tolerance(mut self, tolerance: f64) -> Self {
        self.integer_tolerance = tolerance.max(0.0);
        self
    }

    /// Sets the per-candidate time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Enables or disables parallel batch evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.integer_tolerance.is_finite() || self.integer_tolerance < 0.0 {
            return Err("integer_tolerance must be finite and non-negative".into());
        }
        if self.integer_tolerance >= 0.5 {
            return Err("integer_tolerance must be below 0.5".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
