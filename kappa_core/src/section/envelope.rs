//! # Resistance Envelope
//!
//! Biaxial moment capacity `(MRdX, MRdY)` of a reinforced section under a
//! fixed axial demand, obtained by rotating the section through a full turn
//! and solving the neutral axis at each angle.
//!
//! ## Example
//!
//! ```rust
//! use kappa_core::materials::{Concrete, ReinforcingSteel, SectionMaterials};
//! use kappa_core::section::{build_resistance_envelope, ReinforcingBar, SectionMesh};
//! use kappa_core::settings::SolverSettings;
//!
//! let settings = SolverSettings::default();
//! let mesh = SectionMesh::new(20.0, 40.0, settings.mesh_divisions);
//! let bars = [
//!     ReinforcingBar::new(4.0, 4.0, 16.0),
//!     ReinforcingBar::new(16.0, 4.0, 16.0),
//!     ReinforcingBar::new(4.0, 36.0, 16.0),
//!     ReinforcingBar::new(16.0, 36.0, 16.0),
//! ];
//! let materials = SectionMaterials::new(Concrete::new(30.0, 1.4), ReinforcingSteel::new(500.0, 1.15));
//!
//! let envelope = build_resistance_envelope(&mesh, &bars, &materials, 540.0, &settings).unwrap();
//! assert_eq!(envelope.points.len(), 37);
//! assert!(envelope.max_abs_mrd_x() > envelope.max_abs_mrd_y());
//! ```

use serde::{Deserialize, Serialize};

use super::forces::{resisting_moment_x, resisting_moment_y, section_response};
use super::mesh::{ReinforcingBar, SectionMesh};
use super::neutral_axis::solve_neutral_axis;
use super::RotatedSection;
use crate::errors::{AxialDirection, CalcError, CalcResult};
use crate::materials::SectionMaterials;
use crate::settings::SolverSettings;

/// Capacity at one loading angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub angle_rad: f64,
    /// kN·m
    pub mrd_x: f64,
    /// kN·m
    pub mrd_y: f64,
    pub neutral_axis_cm: f64,
}

/// Envelope points in sweep order, one per solved angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceEnvelope {
    /// Design axial force the envelope was built for (kN, compression positive)
    pub axial_demand_kn: f64,
    pub points: Vec<EnvelopePoint>,
    /// Angles whose neutral-axis search failed
    pub failed_angles_rad: Vec<f64>,
}

impl ResistanceEnvelope {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest |MRdX| over the envelope
    pub fn max_abs_mrd_x(&self) -> f64 {
        self.points.iter().map(|p| p.mrd_x.abs()).fold(0.0, f64::max)
    }

    /// Largest |MRdY| over the envelope
    pub fn max_abs_mrd_y(&self) -> f64 {
        self.points.iter().map(|p| p.mrd_y.abs()).fold(0.0, f64::max)
    }

    /// `(MRdX, MRdY)` pairs in sweep order
    pub fn moment_pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.mrd_x, p.mrd_y))
    }
}

/// Pure compression capacity (kN, negative), all fibers at εc2.
pub fn compression_capacity(
    mesh: &SectionMesh,
    bars: &[ReinforcingBar],
    materials: &SectionMaterials,
    settings: &SolverSettings,
) -> f64 {
    let eps = settings.strain.eps_c2;
    let sigma_c = materials.concrete_stress(eps, settings);
    let sigma_s = materials.steel_stress(eps);
    let bar_area: f64 = bars.iter().map(|b| b.area_cm2()).sum();

    (mesh.total_area() * sigma_c - bar_area * sigma_c + bar_area * sigma_s) / settings.gamma_f3
}

/// Pure tension capacity (kN, positive), all bars at εsu.
pub fn tension_capacity(bars: &[ReinforcingBar], materials: &SectionMaterials, settings: &SolverSettings) -> f64 {
    let sigma_s = materials.steel_stress(settings.strain.eps_su);
    bars.iter().map(|b| b.area_cm2() * sigma_s).sum::<f64>() / settings.gamma_f3
}

/// Check that the section can carry `nsd_kn` (compression positive) without
/// bending.
pub fn check_axial_capacity(
    mesh: &SectionMesh,
    bars: &[ReinforcingBar],
    materials: &SectionMaterials,
    nsd_kn: f64,
    settings: &SolverSettings,
) -> CalcResult<()> {
    let demand = -nsd_kn;
    if demand < 0.0 {
        let capacity = compression_capacity(mesh, bars, materials, settings);
        if capacity > demand {
            tracing::error!(demand_kn = demand, capacity_kn = capacity, "axial compression capacity exceeded");
            return Err(CalcError::capacity_exceeded(AxialDirection::Compression, demand, capacity));
        }
    } else {
        let capacity = tension_capacity(bars, materials, settings);
        if capacity < demand {
            tracing::error!(demand_kn = demand, capacity_kn = capacity, "axial tension capacity exceeded");
            return Err(CalcError::capacity_exceeded(AxialDirection::Tension, demand, capacity));
        }
    }
    Ok(())
}

/// Sweep the loading angle over a full turn and collect `(MRdX, MRdY)`.
///
/// Angles `0, step, …, 360°` are evaluated, so the last point repeats the
/// first. An angle whose neutral-axis search fails is logged and left out.
pub fn build_resistance_envelope(
    mesh: &SectionMesh,
    bars: &[ReinforcingBar],
    materials: &SectionMaterials,
    nsd_kn: f64,
    settings: &SolverSettings,
) -> CalcResult<ResistanceEnvelope> {
    if bars.is_empty() {
        return Err(CalcError::missing_field("bars"));
    }
    check_axial_capacity(mesh, bars, materials, nsd_kn, settings)?;

    let demand = -nsd_kn;
    let samples = settings.angle_samples();
    let step = std::f64::consts::TAU / samples as f64;

    let mut points = Vec::with_capacity(samples + 1);
    let mut failed_angles_rad = Vec::new();

    for i in 0..=samples {
        let angle = step * i as f64;
        let section = RotatedSection::new(mesh, bars, angle);

        let na = match solve_neutral_axis(&section, materials, demand, settings) {
            Ok(na) => na,
            Err(err) => {
                tracing::warn!(angle_rad = angle, error = %err, "skipping envelope angle");
                failed_angles_rad.push(angle);
                continue;
            }
        };

        let response = section_response(na.depth_cm, na.effective_depth_cm, demand, &section, materials, settings);
        points.push(EnvelopePoint {
            angle_rad: angle,
            mrd_x: resisting_moment_x(&response, mesh.depth_cm, settings.gamma_f3),
            mrd_y: resisting_moment_y(&response, mesh.width_cm, settings.gamma_f3),
            neutral_axis_cm: na.depth_cm,
        });
    }

    tracing::debug!(
        points = points.len(),
        failed = failed_angles_rad.len(),
        nsd_kn,
        "resistance envelope built"
    );

    Ok(ResistanceEnvelope {
        axial_demand_kn: nsd_kn,
        points,
        failed_angles_rad,
    })
}
