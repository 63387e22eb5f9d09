//! # Materials
//!
//! Constitutive laws used by the section engine.
//!
//! - **Concrete**: parabola-rectangle law, exponent depending on fck
//! - **Reinforcing steel**: bilinear elastic-perfectly plastic law
//!
//! ## Example
//!
//! ```rust
//! use kappa_core::materials::{Concrete, ReinforcingSteel, SectionMaterials};
//!
//! let materials = SectionMaterials::new(
//!     Concrete::new(30.0, 1.4),
//!     ReinforcingSteel::new(500.0, 1.15),
//! );
//! println!("fcd = {:.3} kN/cm², fyd = {:.2} kN/cm²",
//!     materials.concrete.fcd().0, materials.steel.fyd().0);
//! ```

pub mod concrete;
pub mod steel;

pub use concrete::{concrete_stress, Concrete};
pub use steel::{steel_stress, ReinforcingSteel, STEEL_MODULUS_MPA};

use serde::{Deserialize, Serialize};

use crate::settings::SolverSettings;

/// Concrete and steel of one cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionMaterials {
    pub concrete: Concrete,
    pub steel: ReinforcingSteel,
}

impl SectionMaterials {
    pub fn new(concrete: Concrete, steel: ReinforcingSteel) -> Self {
        SectionMaterials { concrete, steel }
    }

    /// Take the steel modulus from the solver settings.
    pub fn with_settings(mut self, settings: &SolverSettings) -> Self {
        self.steel = self.steel.with_modulus(settings.steel_modulus_mpa);
        self
    }

    /// Concrete stress (kN/cm²) at a strain, using the settings' limits and β.
    pub fn concrete_stress(&self, strain: f64, settings: &SolverSettings) -> f64 {
        self.concrete.stress(strain, &settings.strain, settings.beta)
    }

    /// Steel stress (kN/cm²) at a strain.
    pub fn steel_stress(&self, strain: f64) -> f64 {
        self.steel.stress(strain)
    }
}
