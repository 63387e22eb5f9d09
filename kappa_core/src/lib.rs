//! # kappa_core - Slender Concrete Column Engine
//!
//! `kappa_core` checks rectangular reinforced-concrete columns under axial
//! compression and biaxial bending. Second-order effects are estimated with
//! the κ (approximate curvature) method, and the section resistance comes
//! from a fiber model swept over every loading direction.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Partial results**: Non-convergence is a result field, not an error
//! - **Quiet**: Diagnostics are `tracing` events; the caller installs a subscriber
//!
//! ## Quick Start
//!
//! ```rust
//! use kappa_core::calculations::column::{compute_design, ColumnInput};
//! use kappa_core::restraints::Axis;
//! use kappa_core::settings::SolverSettings;
//!
//! let mut input = ColumnInput {
//!     label: "P1".to_string(),
//!     a_cm: 20.0, b_cm: 40.0, h_cm: 340.0,
//!     gamma_c: 1.4, gamma_s: 1.15, gamma_f: 1.0,
//!     fck_mpa: 30.0, fyk_mpa: 500.0,
//!     nsk_kn: 540.0,
//!     msk_tx: -30.0, msk_bx: 50.0, msk_ty: -10.0, msk_by: 48.0,
//!     restraints: vec![],
//!     bars: vec![],
//! };
//! input.add_restraint(Axis::X, 170.0);
//!
//! let design = compute_design(&input, None, &SolverSettings::default()).unwrap();
//! assert_eq!(design.x.effective_length_cm, 170.0);
//!
//! let json = serde_json::to_string_pretty(&design).unwrap();
//! assert!(json.contains("segments"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - κ amplifier, column design, safety coefficient
//! - [`section`] - Fiber mesh, neutral axis, resistance envelope
//! - [`restraints`] - Lateral restraints, segments, buckling lengths
//! - [`materials`] - Concrete and steel stress-strain laws
//! - [`equations`] - Closed-form design formulas
//! - [`settings`] - Solver tolerances and limits
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod materials;
pub mod restraints;
pub mod section;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{analyze, compute_design, ColumnInput, ColumnReport, DesignOutputs};
pub use errors::{CalcError, CalcResult};
pub use restraints::{Axis, Restraint};
pub use section::{ReinforcingBar, ResistanceEnvelope};
pub use settings::SolverSettings;
