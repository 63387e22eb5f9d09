//! Concrete (parabola-rectangle law)
//!
//! Design compressive stress of concrete as a function of strain. Strains are
//! negative in compression; stresses are returned in kN/cm², also negative in
//! compression.
//!
//! ```text
//!   σ
//!   │   εcu        εc2          0
//!   │    ├──────────┬───────────┤──► ε
//!   │    │ -β·fcd   │  parabola │
//!   │    └──────────┘ ╲_________│
//! ```

use serde::{Deserialize, Serialize};

use crate::settings::StrainLimits;
use crate::units::{KnPerCm2, Mpa};

/// Concrete strength class with its partial safety factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concrete {
    /// Characteristic compressive strength fck (MPa)
    pub fck_mpa: f64,
    /// Partial safety factor γc
    pub gamma_c: f64,
}

impl Concrete {
    pub fn new(fck_mpa: f64, gamma_c: f64) -> Self {
        Concrete { fck_mpa, gamma_c }
    }

    /// Characteristic strength in kN/cm²
    pub fn fck(&self) -> KnPerCm2 {
        Mpa(self.fck_mpa).into()
    }

    /// Design strength fcd = fck/γc in kN/cm²
    pub fn fcd(&self) -> KnPerCm2 {
        self.fck() / self.gamma_c
    }

    /// Exponent of the parabola branch.
    ///
    /// n = 2 up to C50; above that n = 1.4 + 23.4·((90 − fck)/100)⁴.
    pub fn parabola_exponent(&self) -> f64 {
        if self.fck_mpa > 50.0 {
            1.4 + 23.4 * ((90.0 - self.fck_mpa) / 100.0).powi(4)
        } else {
            2.0
        }
    }

    /// Design stress (kN/cm²) at the given strain.
    pub fn stress(&self, strain: f64, limits: &StrainLimits, beta: f64) -> f64 {
        concrete_stress(
            strain,
            limits.eps_cu,
            limits.eps_c2,
            self.parabola_exponent(),
            self.fcd().0,
            beta,
        )
    }

    /// Display name such as "C30"
    pub fn display_name(&self) -> String {
        format!("C{}", self.fck_mpa)
    }
}

impl std::fmt::Display for Concrete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Parabola-rectangle stress-strain law.
///
/// Zero for tension (`ε > 0`) and beyond the crushing strain (`ε < εcu`);
/// `−β·fcd·(1 − (1 − ε/εc2)ⁿ)` between εc2 and zero; the plateau `−β·fcd`
/// between εcu and εc2.
pub fn concrete_stress(strain: f64, eps_cu: f64, eps_c2: f64, n: f64, fcd: f64, beta: f64) -> f64 {
    if strain <= 0.0 && strain >= eps_c2 {
        -beta * fcd * (1.0 - (1.0 - strain / eps_c2).powf(n))
    } else if strain > 0.0 || strain < eps_cu {
        0.0
    } else {
        -beta * fcd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c30() -> Concrete {
        Concrete::new(30.0, 1.4)
    }

    #[test]
    fn test_design_strength() {
        // fcd = 30 / 1.4 / 10 = 2.1429 kN/cm²
        assert!((c30().fcd().0 - 2.142857).abs() < 1e-5);
    }

    #[test]
    fn test_exponent_by_class() {
        assert_eq!(c30().parabola_exponent(), 2.0);
        assert_eq!(Concrete::new(50.0, 1.4).parabola_exponent(), 2.0);
        // C90: n = 1.4
        assert!((Concrete::new(90.0, 1.4).parabola_exponent() - 1.4).abs() < 1e-12);
        // C70: 1.4 + 23.4 * 0.2^4 = 1.43744
        assert!((Concrete::new(70.0, 1.4).parabola_exponent() - 1.43744).abs() < 1e-9);
    }

    #[test]
    fn test_zero_outside_compression_range() {
        let limits = StrainLimits::default();
        let c = c30();
        assert_eq!(c.stress(0.001, &limits, 0.85), 0.0);
        assert_eq!(c.stress(-0.0036, &limits, 0.85), 0.0);
        assert_eq!(c.stress(0.0, &limits, 0.85), 0.0);
    }

    #[test]
    fn test_plateau_value_at_eps_c2() {
        let limits = StrainLimits::default();
        let c = c30();
        let expected = -0.85 * c.fcd().0;
        assert!((c.stress(limits.eps_c2, &limits, 0.85) - expected).abs() < 1e-12);
        assert!((c.stress(-0.003, &limits, 0.85) - expected).abs() < 1e-12);
        assert!((c.stress(limits.eps_cu, &limits, 0.85) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_continuity_across_eps_c2() {
        let limits = StrainLimits::default();
        let c = Concrete::new(70.0, 1.4);
        let below = c.stress(limits.eps_c2 - 1e-9, &limits, 0.85);
        let above = c.stress(limits.eps_c2 + 1e-9, &limits, 0.85);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn test_parabola_midpoint() {
        let limits = StrainLimits::default();
        let c = c30();
        // ε = εc2/2 with n = 2: 1 - (0.5)^2 = 0.75
        let s = c.stress(-0.001, &limits, 0.85);
        assert!((s + 0.85 * c.fcd().0 * 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(c30().display_name(), "C30");
    }
}
