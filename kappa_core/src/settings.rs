//! # Solver Settings
//!
//! Numeric configuration shared by every engine entry point: tolerances,
//! iteration caps, the section mesh size, the envelope angle step and the
//! code-prescribed strain limits. Settings are passed by reference on each
//! call; nothing is read from files or the environment.
//!
//! ```rust
//! use kappa_core::settings::SolverSettings;
//!
//! let settings = SolverSettings::default();
//! assert_eq!(settings.mesh_divisions, 20);
//! assert_eq!(settings.angle_samples(), 36);
//! ```

use serde::{Deserialize, Serialize};

/// Ultimate strain limits of the section (compression negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrainLimits {
    /// Ultimate concrete strain in bending (εcu)
    pub eps_cu: f64,
    /// Concrete strain at the end of the parabola (εc2)
    pub eps_c2: f64,
    /// Ultimate steel elongation (εsu)
    pub eps_su: f64,
}

impl Default for StrainLimits {
    fn default() -> Self {
        StrainLimits {
            eps_cu: -0.0035,
            eps_c2: -0.002,
            eps_su: 0.01,
        }
    }
}

/// Global solver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Relative change of M2d between iterations that counts as converged
    pub kappa_tolerance: f64,

    /// Iteration cap of the κ fixed-point loop
    pub kappa_max_iterations: usize,

    /// Weight of the new κ estimate when mixing (0.5 = plain average)
    pub kappa_relaxation: f64,

    /// Relative axial-force tolerance of the neutral-axis search
    pub neutral_axis_tolerance: f64,

    /// Absolute floor of the neutral-axis tolerance (kN)
    pub neutral_axis_min_tolerance_kn: f64,

    /// Iteration cap for each phase of the neutral-axis search
    pub neutral_axis_max_iterations: usize,

    /// Fibers per side of the section mesh
    pub mesh_divisions: usize,

    /// Rotation step of the resistance envelope sweep (degrees)
    pub angle_step_deg: f64,

    /// Concrete and steel strain limits
    pub strain: StrainLimits,

    /// Elastic modulus of reinforcing steel (MPa)
    pub steel_modulus_mpa: f64,

    /// Concrete stress block reduction factor β
    pub beta: f64,

    /// Model uncertainty factor applied to the resistances
    pub gamma_f3: f64,

    /// Lower clamp of α_b
    pub alpha_b_min: f64,

    /// Upper clamp of α_b
    pub alpha_b_max: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            kappa_tolerance: 0.001,
            kappa_max_iterations: 9999,
            kappa_relaxation: 0.5,
            neutral_axis_tolerance: 0.0001,
            neutral_axis_min_tolerance_kn: 0.01,
            neutral_axis_max_iterations: 550,
            mesh_divisions: 20,
            angle_step_deg: 10.0,
            strain: StrainLimits::default(),
            steel_modulus_mpa: 210_000.0,
            beta: 0.85,
            gamma_f3: 1.0,
            alpha_b_min: 0.4,
            alpha_b_max: 1.0,
        }
    }
}

impl SolverSettings {
    /// Number of angle steps in a full turn. The sweep evaluates
    /// `angle_samples() + 1` angles so the envelope closes on itself.
    pub fn angle_samples(&self) -> usize {
        if self.angle_step_deg > 0.0 {
            ((360.0 / self.angle_step_deg).floor() as usize).max(1)
        } else {
            1
        }
    }

    /// Clamp α_b into the configured range.
    pub fn clamp_alpha_b(&self, alpha_b: f64) -> f64 {
        alpha_b.clamp(self.alpha_b_min, self.alpha_b_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = SolverSettings::default();
        assert_eq!(s.neutral_axis_max_iterations, 550);
        assert!((s.strain.eps_cu + 0.0035).abs() < 1e-15);
        assert_eq!(s.angle_samples(), 36);
    }

    #[test]
    fn test_angle_samples_degenerate_step() {
        let s = SolverSettings {
            angle_step_deg: 0.0,
            ..SolverSettings::default()
        };
        assert_eq!(s.angle_samples(), 1);

        let s = SolverSettings {
            angle_step_deg: 7.0,
            ..SolverSettings::default()
        };
        assert_eq!(s.angle_samples(), 51);
    }

    #[test]
    fn test_alpha_b_clamp() {
        let s = SolverSettings::default();
        assert_eq!(s.clamp_alpha_b(0.2), 0.4);
        assert_eq!(s.clamp_alpha_b(1.3), 1.0);
        assert_eq!(s.clamp_alpha_b(0.75), 0.75);
    }

    #[test]
    fn test_settings_serialization() {
        let s = SolverSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let roundtrip: SolverSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.mesh_divisions, s.mesh_divisions);
        assert_eq!(roundtrip.strain, s.strain);
    }
}
