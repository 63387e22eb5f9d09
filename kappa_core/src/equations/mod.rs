//! # Column Design Equations
//!
//! Closed-form formulas used by the calculations, kept in one place so they
//! can be checked against the code clauses they come from.
//!
//! ## Modules
//!
//! - [`section`] - Cross-section properties (A, I, i, λ, bar area)
//! - [`column`] - First- and second-order demand formulas (MA/MB, α_b, λ1, ν, M1d,min, κ)
//!
//! ## Sign Conventions
//!
//! - **Axial demand**: Compression positive (Nsd > 0)
//! - **Section engine strains/stresses**: Compression negative
//! - **Moments**: kN·m, sign carried from the input end moments

pub mod column;
pub mod section;

// Re-export commonly used items
pub use column::{
    alpha_b,
    amplification_denominator,
    dimensionless_axial_force,
    eccentricity_cm,
    end_moments,
    initial_kappa,
    kappa_base,
    kappa_for_moment,
    limit_slenderness,
    minimum_first_order_moment,
};
pub use section::{
    bar_area_cm2,
    radius_of_gyration,
    rectangular_area,
    rectangular_moment_of_inertia,
    slenderness,
};
