//! # Column Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` / `*Outputs` - Calculation results (JSON-serializable)
//! - a pure function taking the input and [`SolverSettings`](crate::settings::SolverSettings)
//!
//! ## Available Calculations
//!
//! - [`kappa`] - κ amplifier for the second-order moment M2d
//! - [`column`] - Full slender column design and report
//! - [`safety`] - Safety coefficient against the resistance envelope
//! - [`demand`] - Critical moment pairs along the column height

pub mod column;
pub mod demand;
pub mod kappa;
pub mod safety;

// Re-export commonly used types
pub use column::{
    analyze, compute_design, AxisDesign, CheckedDemand, ColumnInput, ColumnReport, DesignOutputs, EnvelopeMoments,
    SegmentResult,
};
pub use demand::{critical_demand_points, DemandKind, DemandPoint};
pub use kappa::{calculate_m2d, m2d_for_segment, KappaInput, KappaResult, SegmentKappaInput};
pub use safety::{safety_coefficient, MinimumMomentEllipse, PolarEnvelope, Resistance};
