//! # Error Types
//!
//! Structured error types for kappa_core. Input problems and section
//! capacity violations are errors; numeric non-convergence inside the
//! second-order solvers is *not* an error and is reported as a result field
//! (`converged: false`, `m2d: None`) so partial reports can still be shown.
//!
//! ## Example
//!
//! ```rust
//! use kappa_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(h_cm: f64) -> CalcResult<()> {
//!     if h_cm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "h_cm",
//!             h_cm.to_string(),
//!             "Column height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for kappa_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Direction of a pure axial capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxialDirection {
    Compression,
    Tension,
}

impl std::fmt::Display for AxialDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxialDirection::Compression => write!(f, "compression"),
            AxialDirection::Tension => write!(f, "tension"),
        }
    }
}

/// Structured error type for column calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, outside the section, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The section cannot carry the axial demand even without bending
    #[error("Axial {direction} capacity exceeded: demand {demand_kn:.2} kN, capacity {capacity_kn:.2} kN")]
    CapacityExceeded {
        direction: AxialDirection,
        demand_kn: f64,
        capacity_kn: f64,
    },

    /// An iterative solver hit its iteration cap
    #[error("No convergence in {calculation} after {iterations} iterations")]
    NonConvergence {
        calculation: String,
        iterations: usize,
    },

    /// Calculation failed for a reason not covered above
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CapacityExceeded error
    pub fn capacity_exceeded(direction: AxialDirection, demand_kn: f64, capacity_kn: f64) -> Self {
        CalcError::CapacityExceeded {
            direction,
            demand_kn,
            capacity_kn,
        }
    }

    /// Create a NonConvergence error
    pub fn non_convergence(calculation: impl Into<String>, iterations: usize) -> Self {
        CalcError::NonConvergence {
            calculation: calculation.into(),
            iterations,
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that leave the rest of the report usable.
    ///
    /// A capacity violation or a stalled neutral-axis search only removes the
    /// resistance envelope; the first- and second-order demand values are
    /// still valid.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::CapacityExceeded { .. } | CalcError::NonConvergence { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            CalcError::NonConvergence { .. } => "NON_CONVERGENCE",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
        }
    }
}
