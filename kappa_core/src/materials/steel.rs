//! Reinforcing Steel (bilinear elastic-perfectly plastic law)
//!
//! Stresses in kN/cm², tension positive.

use serde::{Deserialize, Serialize};

use crate::units::{KnPerCm2, Mpa};

/// Default elastic modulus of reinforcing steel (MPa)
pub const STEEL_MODULUS_MPA: f64 = 210_000.0;

/// Reinforcing steel grade with its partial safety factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcingSteel {
    /// Characteristic yield strength fyk (MPa)
    pub fyk_mpa: f64,
    /// Partial safety factor γs
    pub gamma_s: f64,
    /// Elastic modulus Es (MPa)
    #[serde(default = "default_modulus")]
    pub es_mpa: f64,
}

fn default_modulus() -> f64 {
    STEEL_MODULUS_MPA
}

impl ReinforcingSteel {
    pub fn new(fyk_mpa: f64, gamma_s: f64) -> Self {
        ReinforcingSteel {
            fyk_mpa,
            gamma_s,
            es_mpa: STEEL_MODULUS_MPA,
        }
    }

    /// Override the elastic modulus
    pub fn with_modulus(mut self, es_mpa: f64) -> Self {
        self.es_mpa = es_mpa;
        self
    }

    /// Design yield strength fyd = fyk/γs in kN/cm²
    pub fn fyd(&self) -> KnPerCm2 {
        KnPerCm2::from(Mpa(self.fyk_mpa)) / self.gamma_s
    }

    /// Design yield strain εyd = fyd/Es
    pub fn yield_strain(&self) -> f64 {
        self.fyk_mpa / self.gamma_s / self.es_mpa
    }

    /// Design stress (kN/cm²) at the given strain.
    pub fn stress(&self, strain: f64) -> f64 {
        steel_stress(strain, self.yield_strain(), self.fyd().0)
    }

    /// Display name such as "CA-50"
    pub fn display_name(&self) -> String {
        format!("CA-{}", self.fyk_mpa / 10.0)
    }
}

/// Bilinear law: linear up to the yield strain, constant `±fyd` beyond it.
pub fn steel_stress(strain: f64, eps_yd: f64, fyd: f64) -> f64 {
    if strain.abs() >= eps_yd {
        strain.signum() * fyd
    } else {
        (fyd / eps_yd) * strain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ca50() -> ReinforcingSteel {
        ReinforcingSteel::new(500.0, 1.15)
    }

    #[test]
    fn test_design_values() {
        let s = ca50();
        // fyd = 500 / 1.15 / 10 = 43.478 kN/cm²
        assert!((s.fyd().0 - 43.478).abs() < 1e-3);
        // εyd = 434.78 / 210000 = 0.00207
        assert!((s.yield_strain() - 0.0020704).abs() < 1e-6);
    }

    #[test]
    fn test_plastic_branch() {
        let s = ca50();
        assert!((s.stress(0.01) - s.fyd().0).abs() < 1e-12);
        assert!((s.stress(-0.0035) + s.fyd().0).abs() < 1e-12);
    }

    #[test]
    fn test_elastic_branch() {
        let s = ca50();
        // 0.001 * 21000 kN/cm² = 21 kN/cm²
        assert!((s.stress(0.001) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_odd_symmetry() {
        let s = ca50();
        for eps in [0.0005, 0.001, 0.002, 0.00207, 0.003, 0.01] {
            assert!((s.stress(-eps) + s.stress(eps)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ca50().display_name(), "CA-50");
    }
}
