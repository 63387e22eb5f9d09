//! Neutral-axis search (false position on axial equilibrium)
//!
//! Finds the depth `x` at which the section's internal axial force balances
//! the demand. The bracket starts at `[−d, 2d]` and is widened tenfold on
//! whichever side does not yet enclose the root; then regula falsi narrows it.

use serde::{Deserialize, Serialize};

use super::forces::axial_residual;
use super::mesh::RotatedSection;
use crate::errors::{CalcError, CalcResult};
use crate::materials::SectionMaterials;
use crate::settings::SolverSettings;

/// Converged neutral-axis position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeutralAxis {
    /// Depth below the most compressed fiber (cm)
    pub depth_cm: f64,
    /// Effective depth used for the strain domains (cm)
    pub effective_depth_cm: f64,
    /// Remaining axial imbalance (kN)
    pub residual_kn: f64,
    /// False-position iterations after bracketing
    pub iterations: usize,
}

/// Solve for the neutral-axis depth of a rotated section.
///
/// `axial_demand_kn` is compression negative. Each phase (lower bracket,
/// upper bracket, false position) is capped at
/// `settings.neutral_axis_max_iterations`; hitting a cap returns
/// [`CalcError::NonConvergence`].
pub fn solve_neutral_axis(
    section: &RotatedSection,
    materials: &SectionMaterials,
    axial_demand_kn: f64,
    settings: &SolverSettings,
) -> CalcResult<NeutralAxis> {
    let d = section.effective_depth();
    if !d.is_finite() {
        return Err(CalcError::calculation_failed(
            "neutral axis",
            "Section has no reinforcing bars to define an effective depth",
        ));
    }

    let f = |x: f64| axial_residual(x, d, axial_demand_kn, section, materials, settings);
    let max_iter = settings.neutral_axis_max_iterations;
    let tolerance = (axial_demand_kn.abs() * settings.neutral_axis_tolerance)
        .max(settings.neutral_axis_min_tolerance_kn);

    let mut x_min = -d;
    let mut x_max = 2.0 * d;

    let mut f_min = f(x_min);
    let mut expansions = 0;
    while f_min > 0.0 {
        if expansions > max_iter {
            tracing::warn!(angle_rad = section.angle_rad, x_min, "lower neutral-axis bracket not found");
            return Err(CalcError::non_convergence("neutral axis lower bracket", expansions));
        }
        x_max = x_min;
        x_min *= 10.0;
        f_min = f(x_min);
        expansions += 1;
    }

    let mut f_max = f(x_max);
    expansions = 0;
    while f_max < 0.0 {
        if expansions > max_iter {
            tracing::warn!(angle_rad = section.angle_rad, x_max, "upper neutral-axis bracket not found");
            return Err(CalcError::non_convergence("neutral axis upper bracket", expansions));
        }
        x_min = x_max;
        f_min = f_max;
        x_max *= 10.0;
        f_max = f(x_max);
        expansions += 1;
    }

    let mut x = x_min;
    let mut fx = f_min;
    let mut iterations = 0;
    while fx.abs() > tolerance {
        if iterations > max_iter {
            tracing::warn!(
                angle_rad = section.angle_rad,
                residual_kn = fx,
                "neutral-axis false position did not converge"
            );
            return Err(CalcError::non_convergence("neutral axis", iterations));
        }

        let denominator_f_max = if f_max == f_min { f_max + 1.0 } else { f_max };
        x = (x_min * denominator_f_max - x_max * f_min) / (denominator_f_max - f_min);
        fx = f(x);
        if fx > 0.0 {
            x_min = x;
            f_min = fx;
        } else {
            x_max = x;
            f_max = fx;
        }
        iterations += 1;
    }

    tracing::debug!(angle_rad = section.angle_rad, depth_cm = x, iterations, "neutral axis found");

    Ok(NeutralAxis {
        depth_cm: x,
        effective_depth_cm: d,
        residual_kn: fx,
        iterations,
    })
}
