//! # Cross-Section Capacity
//!
//! Fiber model of a rectangular reinforced-concrete section.
//!
//! - [`mesh`] - Fiber grid, bars, rotation, effective depth
//! - [`forces`] - Strain domains, internal forces, resisting moments
//! - [`neutral_axis`] - Axial-equilibrium search
//! - [`envelope`] - Axial capacity checks and the `(MRdX, MRdY)` sweep
//!
//! ## Sign Conventions
//!
//! Inside this module strains, stresses and axial forces are negative in
//! compression. Public entry points that take a design axial force
//! (`nsd_kn`) use compression positive, like the rest of the crate.

pub mod envelope;
pub mod forces;
pub mod mesh;
pub mod neutral_axis;

pub use envelope::{
    build_resistance_envelope, check_axial_capacity, compression_capacity, tension_capacity, EnvelopePoint,
    ResistanceEnvelope,
};
pub use forces::{
    axial_residual, resisting_moment_x, resisting_moment_y, section_response, SectionResponse, StrainDomain,
    StrainState, StressRecord,
};
pub use mesh::{Fiber, Point2, ReinforcingBar, RotatedPoint, RotatedSection, SectionMesh};
pub use neutral_axis::{solve_neutral_axis, NeutralAxis};
