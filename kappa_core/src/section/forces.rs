//! # Section Forces
//!
//! Internal axial force and resisting moments of a rotated section for a
//! trial neutral-axis depth `x` (measured down from the most compressed
//! fiber).
//!
//! ## Strain Domains
//!
//! | Domain | Range               | Fixed strain                  |
//! |--------|---------------------|-------------------------------|
//! | 2      | x ≤ x₂₃             | εsu at the lowest bar         |
//! | 4      | x₂₃ < x ≤ H         | εcu at the top fiber          |
//! | 5      | x > H               | εc2 at the pivot depth Λ·H    |
//!
//! with `x₂₃ = −εcu/(−εcu + εsu) · d` and `Λ = (εc2 − εcu)/(−εcu)`.
//! The strain at rotated ordinate `y` is `εCG + Φ·y`.

use serde::{Deserialize, Serialize};

use super::mesh::{Point2, RotatedPoint, RotatedSection};
use crate::materials::SectionMaterials;
use crate::settings::{SolverSettings, StrainLimits};
use crate::units::{KnCm, KnM};

/// Failure-mode domain of a linear strain plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrainDomain {
    /// Steel at its ultimate elongation
    Two,
    /// Concrete at its ultimate strain, neutral axis inside the section
    Four,
    /// Whole section compressed
    Five,
}

impl StrainDomain {
    pub fn number(&self) -> u8 {
        match self {
            StrainDomain::Two => 2,
            StrainDomain::Four => 4,
            StrainDomain::Five => 5,
        }
    }
}

/// Linear strain plane `ε(y) = reference_strain + curvature · y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrainState {
    pub domain: StrainDomain,
    /// Φ (1/cm)
    pub curvature: f64,
    /// εCG, strain at y = 0 of the rotated frame
    pub reference_strain: f64,
}

impl StrainState {
    /// Classify `x` and build the strain plane for a section of rotated
    /// height `section.height()` and effective depth `d`.
    pub fn at_depth(x: f64, d: f64, section: &RotatedSection, limits: &StrainLimits) -> Self {
        let eps_cu = limits.eps_cu;
        let eps_c2 = limits.eps_c2;
        let eps_su = limits.eps_su;

        let height = section.height();
        let y_top = section.top_y().abs();
        let y_bottom = d - y_top;
        let domain_2_limit = (-eps_cu / (-eps_cu + eps_su)) * d;

        if x <= domain_2_limit {
            let curvature = -eps_su / (d - x);
            StrainState {
                domain: StrainDomain::Two,
                curvature,
                reference_strain: eps_su + curvature * y_bottom,
            }
        } else if x <= height {
            let curvature = eps_cu / x;
            StrainState {
                domain: StrainDomain::Four,
                curvature,
                reference_strain: eps_cu - curvature * y_top,
            }
        } else {
            let pivot = (-eps_cu + eps_c2) / -eps_cu;
            let curvature = eps_c2 / (x - pivot * height);
            StrainState {
                domain: StrainDomain::Five,
                curvature,
                reference_strain: curvature * (x - y_top),
            }
        }
    }

    pub fn strain_at(&self, y: f64) -> f64 {
        self.reference_strain + self.curvature * y
    }
}

/// Strain and stress at one fiber or bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressRecord {
    /// Unrotated position (cm)
    pub position: Point2,
    pub area_cm2: f64,
    pub strain: f64,
    /// kN/cm², compression negative
    pub stress: f64,
}

impl StressRecord {
    fn force(&self) -> f64 {
        self.stress * self.area_cm2
    }
}

/// Section state for one neutral-axis depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResponse {
    pub depth_cm: f64,
    pub strain: StrainState,
    /// `N − compression − tension` (kN); zero at equilibrium
    pub residual_kn: f64,
    pub compression_kn: f64,
    pub tension_kn: f64,
    /// Concrete fibers
    pub concrete: Vec<StressRecord>,
    /// Concrete stress at compressed bar locations (deducted)
    pub displaced: Vec<StressRecord>,
    /// Steel bars
    pub steel: Vec<StressRecord>,
}

fn record(point: &RotatedPoint, strain: f64, stress: f64) -> StressRecord {
    StressRecord {
        position: point.original,
        area_cm2: point.area_cm2,
        strain,
        stress,
    }
}

fn evaluate(
    x: f64,
    d: f64,
    axial_demand_kn: f64,
    section: &RotatedSection,
    materials: &SectionMaterials,
    settings: &SolverSettings,
    keep_records: bool,
) -> SectionResponse {
    let strain = StrainState::at_depth(x, d, section, &settings.strain);

    let mut concrete = Vec::new();
    let mut displaced = Vec::new();
    let mut steel = Vec::new();

    let mut concrete_force = 0.0;
    for fiber in &section.fibers {
        let eps = strain.strain_at(fiber.calc.y);
        let rec = record(fiber, eps, materials.concrete_stress(eps, settings));
        concrete_force += rec.force();
        if keep_records {
            concrete.push(rec);
        }
    }

    let mut compression = 0.0;
    let mut tension = 0.0;
    for bar in &section.bars {
        let eps = strain.strain_at(bar.calc.y);

        if eps < 0.0 {
            let hole = record(bar, eps, materials.concrete_stress(eps, settings));
            concrete_force -= hole.force();
            if keep_records {
                displaced.push(hole);
            }
        }

        let rec = record(bar, eps, materials.steel_stress(eps));
        let force = rec.force();
        if force > 0.0 {
            tension += force;
        } else {
            compression += force;
        }
        if keep_records {
            steel.push(rec);
        }
    }
    compression += concrete_force;

    SectionResponse {
        depth_cm: x,
        strain,
        residual_kn: axial_demand_kn - compression - tension,
        compression_kn: compression,
        tension_kn: tension,
        concrete,
        displaced,
        steel,
    }
}

/// Full section response, including per-fiber and per-bar records.
///
/// `axial_demand_kn` follows the section sign convention: compression
/// negative.
pub fn section_response(
    x: f64,
    d: f64,
    axial_demand_kn: f64,
    section: &RotatedSection,
    materials: &SectionMaterials,
    settings: &SolverSettings,
) -> SectionResponse {
    evaluate(x, d, axial_demand_kn, section, materials, settings, true)
}

/// Axial equilibrium residual only (no records kept).
pub fn axial_residual(
    x: f64,
    d: f64,
    axial_demand_kn: f64,
    section: &RotatedSection,
    materials: &SectionMaterials,
    settings: &SolverSettings,
) -> f64 {
    evaluate(x, d, axial_demand_kn, section, materials, settings, false).residual_kn
}

fn first_moment(records: &[StressRecord], lever: impl Fn(&Point2) -> f64) -> f64 {
    records.iter().map(|r| r.force() * lever(&r.position)).sum()
}

fn resisting_moment(response: &SectionResponse, gamma_f3: f64, lever: impl Fn(&Point2) -> f64) -> f64 {
    let kn_cm = first_moment(&response.concrete, &lever) - first_moment(&response.displaced, &lever)
        + first_moment(&response.steel, &lever);
    KnM::from(KnCm(kn_cm / gamma_f3)).0
}

/// Resisting moment about the section's x axis (kN·m), levers measured
/// from mid-depth `b/2`.
pub fn resisting_moment_x(response: &SectionResponse, depth_cm: f64, gamma_f3: f64) -> f64 {
    resisting_moment(response, gamma_f3, |p| p.y - depth_cm / 2.0)
}

/// Resisting moment about the section's y axis (kN·m), levers measured
/// from mid-width `a/2`, sign reversed.
pub fn resisting_moment_y(response: &SectionResponse, width_cm: f64, gamma_f3: f64) -> f64 {
    -resisting_moment(response, gamma_f3, |p| p.x - width_cm / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Concrete, ReinforcingSteel};
    use crate::section::mesh::{ReinforcingBar, SectionMesh};

    fn materials() -> SectionMaterials {
        SectionMaterials::new(Concrete::new(30.0, 1.4), ReinforcingSteel::new(500.0, 1.15))
    }

    fn section(angle: f64) -> RotatedSection {
        let mesh = SectionMesh::new(20.0, 40.0, 20);
        let bars = vec![
            ReinforcingBar::new(4.0, 4.0, 16.0),
            ReinforcingBar::new(16.0, 4.0, 16.0),
            ReinforcingBar::new(4.0, 36.0, 16.0),
            ReinforcingBar::new(16.0, 36.0, 16.0),
        ];
        RotatedSection::new(&mesh, &bars, angle)
    }

    #[test]
    fn test_domain_classification() {
        let s = section(0.0);
        let limits = StrainLimits::default();
        let d = s.effective_depth();
        // x₂₃ = 0.0035/0.0135 · 36 = 9.33 cm
        assert_eq!(StrainState::at_depth(5.0, d, &s, &limits).domain, StrainDomain::Two);
        assert_eq!(StrainState::at_depth(20.0, d, &s, &limits).domain, StrainDomain::Four);
        assert_eq!(StrainState::at_depth(45.0, d, &s, &limits).domain, StrainDomain::Five);
    }

    #[test]
    fn test_domain_pivots() {
        let s = section(0.0);
        let limits = StrainLimits::default();
        let d = s.effective_depth();
        let top = s.top_y();

        // Domain 2: lowest bar at εsu
        let st = StrainState::at_depth(5.0, d, &s, &limits);
        assert!((st.strain_at(top - d) - limits.eps_su).abs() < 1e-12);

        // Domain 4: top fiber at εcu, zero strain at depth x
        let st = StrainState::at_depth(20.0, d, &s, &limits);
        assert!((st.strain_at(top) - limits.eps_cu).abs() < 1e-12);
        assert!(st.strain_at(top - 20.0).abs() < 1e-12);

        // Domain 5: εc2 at Λ·H below the top
        let st = StrainState::at_depth(60.0, d, &s, &limits);
        let pivot = (3.0 / 7.0) * 40.0;
        assert!((st.strain_at(top - pivot) - limits.eps_c2).abs() < 1e-12);
    }

    #[test]
    fn test_residual_is_monotonic_in_depth() {
        let s = section(0.0);
        let settings = SolverSettings::default();
        let m = materials();
        let d = s.effective_depth();
        let shallow = axial_residual(2.0, d, -540.0, &s, &m, &settings);
        let deep = axial_residual(60.0, d, -540.0, &s, &m, &settings);
        // Deeper neutral axis means more internal compression
        assert!(shallow < 0.0);
        assert!(deep > 0.0);
    }

    #[test]
    fn test_symmetric_section_has_no_cross_moment() {
        let s = section(0.0);
        let settings = SolverSettings::default();
        let m = materials();
        let d = s.effective_depth();
        let response = section_response(18.0, d, -540.0, &s, &m, &settings);
        let my = resisting_moment_y(&response, 20.0, 1.0);
        let mx = resisting_moment_x(&response, 40.0, 1.0);
        assert!(my.abs() < 1e-6);
        // Compression at the top face gives a negative lever sum
        assert!(mx < 0.0);
    }

    #[test]
    fn test_records_match_residual() {
        let s = section(0.3);
        let settings = SolverSettings::default();
        let m = materials();
        let d = s.effective_depth();
        let response = section_response(15.0, d, -300.0, &s, &m, &settings);
        assert_eq!(response.concrete.len(), 400);
        assert_eq!(response.steel.len(), 4);
        let residual = axial_residual(15.0, d, -300.0, &s, &m, &settings);
        assert!((response.residual_kn - residual).abs() < 1e-9);
    }
}
