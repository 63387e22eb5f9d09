//! # Slender Column Design
//!
//! First- and second-order design of a rectangular reinforced-concrete
//! column under axial compression and biaxial end moments.
//!
//! ## Flow
//!
//! 1. Design forces (characteristic × γf), section properties, slenderness
//! 2. End-moment combination `MA`, `MB`, `α_b` and the limit slenderness λ1
//! 3. Minimum first-order moments and their amplified values Md,tot,min
//! 4. Global and per-segment M2d via the κ amplifier
//! 5. (`analyze` only) resistance envelope, then a second pass using its
//!    extreme moments, then safety coefficients at the critical heights
//!
//! ## Axes
//!
//! Bending *about x* uses the depth `b` (Ix = a·b³/12, M1d,min,xx);
//! bending *about y* uses the width `a`.
//!
//! ## Example
//!
//! ```rust
//! use kappa_core::calculations::column::{analyze, ColumnInput};
//! use kappa_core::section::ReinforcingBar;
//! use kappa_core::settings::SolverSettings;
//!
//! let mut input = ColumnInput {
//!     label: "P1".to_string(),
//!     a_cm: 20.0,
//!     b_cm: 40.0,
//!     h_cm: 340.0,
//!     gamma_c: 1.4,
//!     gamma_s: 1.15,
//!     gamma_f: 1.0,
//!     fck_mpa: 30.0,
//!     fyk_mpa: 500.0,
//!     nsk_kn: 540.0,
//!     msk_tx: -30.0,
//!     msk_bx: 50.0,
//!     msk_ty: -10.0,
//!     msk_by: 48.0,
//!     restraints: vec![],
//!     bars: vec![],
//! };
//! for (x, y) in [(4.0, 4.0), (16.0, 4.0), (4.0, 36.0), (16.0, 36.0)] {
//!     input.bars.push(ReinforcingBar::new(x, y, 20.0));
//! }
//!
//! let report = analyze(&input, &SolverSettings::default()).unwrap();
//! assert!((report.design.nsd_kn - 540.0).abs() < 1e-9);
//! assert!(report.envelope.is_some());
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::demand::{critical_demand_points, DemandPoint};
use super::kappa::{calculate_m2d, m2d_for_segment, KappaInput, KappaResult, SegmentKappaInput};
use super::safety::{safety_coefficient, MinimumMomentEllipse, PolarEnvelope, Resistance};
use crate::equations::column::{
    alpha_b, dimensionless_axial_force, eccentricity_cm, end_moments, limit_slenderness,
    minimum_first_order_moment,
};
use crate::equations::section::{radius_of_gyration, rectangular_area, rectangular_moment_of_inertia, slenderness};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{Concrete, ReinforcingSteel, SectionMaterials};
use crate::restraints::{
    divide_into_segments, effective_buckling_length, restraint_at, AxialLoadDiagram, Axis, DesignWarning,
    Restraint, COORDINATE_TOLERANCE,
};
use crate::section::{build_resistance_envelope, ReinforcingBar, ResistanceEnvelope, SectionMesh};
use crate::settings::SolverSettings;

// ============================================================================
// Input
// ============================================================================

/// Column geometry, materials, characteristic loads, restraints and bars.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "P1",
///   "a_cm": 20.0, "b_cm": 40.0, "h_cm": 340.0,
///   "gamma_c": 1.4, "gamma_s": 1.15, "gamma_f": 1.0,
///   "fck_mpa": 30.0, "fyk_mpa": 500.0,
///   "nsk_kn": 540.0,
///   "msk_tx": -30.0, "msk_bx": 50.0, "msk_ty": -10.0, "msk_by": 48.0,
///   "restraints": [],
///   "bars": [{ "x_cm": 4.0, "y_cm": 4.0, "diameter_mm": 20.0 }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInput {
    /// User label (e.g., "P1")
    #[serde(default)]
    pub label: String,

    /// Section width `a` (cm)
    pub a_cm: f64,

    /// Section depth `b` (cm)
    pub b_cm: f64,

    /// Column height `h` (cm)
    pub h_cm: f64,

    /// Concrete partial factor γc
    pub gamma_c: f64,

    /// Steel partial factor γs
    pub gamma_s: f64,

    /// Load factor γf
    pub gamma_f: f64,

    /// Concrete characteristic strength (MPa)
    pub fck_mpa: f64,

    /// Steel characteristic yield strength (MPa)
    pub fyk_mpa: f64,

    /// Characteristic axial compression at the top (kN)
    pub nsk_kn: f64,

    /// Characteristic moment about x at the top (kN·m)
    pub msk_tx: f64,

    /// Characteristic moment about x at the base (kN·m)
    pub msk_bx: f64,

    /// Characteristic moment about y at the top (kN·m)
    pub msk_ty: f64,

    /// Characteristic moment about y at the base (kN·m)
    pub msk_by: f64,

    /// Lateral restraints
    #[serde(default)]
    pub restraints: Vec<Restraint>,

    /// Longitudinal bars
    #[serde(default)]
    pub bars: Vec<ReinforcingBar>,
}

fn require_positive(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

impl ColumnInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("a_cm", self.a_cm, "Section width must be positive")?;
        require_positive("b_cm", self.b_cm, "Section depth must be positive")?;
        require_positive("h_cm", self.h_cm, "Column height must be positive")?;
        require_positive("gamma_c", self.gamma_c, "Safety factor must be positive")?;
        require_positive("gamma_s", self.gamma_s, "Safety factor must be positive")?;
        require_positive("gamma_f", self.gamma_f, "Safety factor must be positive")?;
        require_positive("fck_mpa", self.fck_mpa, "Concrete strength must be positive")?;
        require_positive("fyk_mpa", self.fyk_mpa, "Steel strength must be positive")?;

        for (field, value) in [
            ("nsk_kn", self.nsk_kn),
            ("msk_tx", self.msk_tx),
            ("msk_bx", self.msk_bx),
            ("msk_ty", self.msk_ty),
            ("msk_by", self.msk_by),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Load must be a finite number"));
            }
        }

        for (i, r) in self.restraints.iter().enumerate() {
            if !(r.coordinate_cm >= 0.0 && r.coordinate_cm <= self.h_cm) {
                return Err(CalcError::invalid_input(
                    format!("restraints[{i}].coordinate_cm"),
                    r.coordinate_cm.to_string(),
                    format!("Restraint must lie between 0 and h = {} cm", self.h_cm),
                ));
            }
            let duplicate = self.restraints[..i]
                .iter()
                .any(|other| other.axis == r.axis && other.is_at(r.coordinate_cm));
            if duplicate {
                return Err(CalcError::invalid_input(
                    format!("restraints[{i}].coordinate_cm"),
                    r.coordinate_cm.to_string(),
                    format!("Another restraint on axis {} already sits at this height", r.axis),
                ));
            }
        }

        for (i, bar) in self.bars.iter().enumerate() {
            if !bar.is_within(self.a_cm, self.b_cm) {
                return Err(CalcError::invalid_input(
                    format!("bars[{i}]"),
                    format!("({}, {})", bar.x_cm, bar.y_cm),
                    format!("Bar must lie inside the {} x {} cm section", self.a_cm, self.b_cm),
                ));
            }
            require_positive(&format!("bars[{i}].diameter_mm"), bar.diameter_mm, "Bar diameter must be positive")?;
        }

        Ok(())
    }

    pub fn materials(&self, settings: &SolverSettings) -> SectionMaterials {
        SectionMaterials::new(
            Concrete::new(self.fck_mpa, self.gamma_c),
            ReinforcingSteel::new(self.fyk_mpa, self.gamma_s),
        )
        .with_settings(settings)
    }

    pub fn mesh(&self, settings: &SolverSettings) -> SectionMesh {
        SectionMesh::new(self.a_cm, self.b_cm, settings.mesh_divisions)
    }

    /// Design axial force Nsd = Nsk · γf (kN)
    pub fn nsd_kn(&self) -> f64 {
        self.nsk_kn * self.gamma_f
    }

    /// Characteristic `(top, base)` moments about `axis`
    pub fn characteristic_end_moments(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.msk_tx, self.msk_bx),
            Axis::Y => (self.msk_ty, self.msk_by),
        }
    }

    /// Section dimension in the bending plane of `axis` (cm)
    pub fn dimension_cm(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.b_cm,
            Axis::Y => self.a_cm,
        }
    }

    // ------------------------------------------------------------------------
    // Restraint management
    // ------------------------------------------------------------------------

    /// Add a restraint with zero compression and moments; returns its id.
    pub fn add_restraint(&mut self, axis: Axis, coordinate_cm: f64) -> Uuid {
        let restraint = Restraint::new(axis, self.clamp_coordinate(coordinate_cm));
        let id = restraint.id;
        self.restraints.push(restraint);
        id
    }

    pub fn remove_restraint(&mut self, id: Uuid) -> Option<Restraint> {
        let index = self.restraints.iter().position(|r| r.id == id)?;
        Some(self.restraints.remove(index))
    }

    pub fn restraint_mut(&mut self, id: Uuid) -> Option<&mut Restraint> {
        self.restraints.iter_mut().find(|r| r.id == id)
    }

    /// Move a restraint, clamping the height into `[0, h]`.
    ///
    /// Returns false when no restraint has this id.
    pub fn set_restraint_coordinate(&mut self, id: Uuid, coordinate_cm: f64) -> bool {
        let clamped = self.clamp_coordinate(coordinate_cm);
        match self.restraint_mut(id) {
            Some(r) => {
                r.coordinate_cm = clamped;
                true
            }
            None => false,
        }
    }

    fn clamp_coordinate(&self, coordinate_cm: f64) -> f64 {
        coordinate_cm.max(0.0).min(self.h_cm.max(0.0))
    }
}

// ============================================================================
// Output
// ============================================================================

/// Second-order result of one segment between restraints on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub start_cm: f64,
    pub end_cm: f64,
    pub length_cm: f64,
    pub centre_cm: f64,
    /// Characteristic compression in the segment (kN)
    pub nk_top_kn: f64,
    /// Design compression in the segment (kN)
    pub nsd_kn: f64,
    /// Design moment at the lower end (kN·m)
    pub m_base: f64,
    /// Design moment at the upper end (kN·m)
    pub m_top: f64,
    pub lambda: f64,
    pub kappa: KappaResult,
    /// `None` when the amplification did not converge
    pub m2d: Option<f64>,
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl SegmentResult {
    /// The larger-magnitude end moment (top wins ties)
    pub fn governing_end_moment(&self) -> f64 {
        if self.m_top.abs() >= self.m_base.abs() {
            self.m_top
        } else {
            self.m_base
        }
    }

    /// |M2d| carrying the sign of the governing end moment
    pub fn signed_m2d(&self) -> Option<f64> {
        self.m2d.map(|m| m.abs() * sign(self.governing_end_moment()))
    }
}

/// Design values for bending about one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDesign {
    pub axis: Axis,
    /// Design moment at the top (kN·m)
    pub msd_top: f64,
    /// Design moment at the base (kN·m)
    pub msd_base: f64,
    /// Section dimension in the bending plane (cm)
    pub dimension_cm: f64,
    pub inertia_cm4: f64,
    pub radius_of_gyration_cm: f64,
    pub effective_length_cm: f64,
    pub lambda: f64,
    pub ma: f64,
    pub mb: f64,
    /// Clamped α_b
    pub alpha_b: f64,
    /// e1 = |Msd,base| / Nsd (cm)
    pub eccentricity_cm: f64,
    pub relative_eccentricity: f64,
    /// λ1
    pub lambda_limit: f64,
    /// M1d,min (kN·m)
    pub m1d_min: f64,
    /// Md,tot,min (kN·m)
    pub md_tot_min: KappaResult,
    /// Envelope moment used for the closed-form κ, if any
    pub mrd: Option<f64>,
    /// Global M2d
    pub kappa: KappaResult,
    pub segments: Vec<SegmentResult>,
}

impl AxisDesign {
    /// True when λ exceeds λ1 and second-order effects must be considered
    pub fn is_slender(&self) -> bool {
        self.lambda > self.lambda_limit
    }
}

/// Everything derived from a [`ColumnInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignOutputs {
    /// kN/cm²
    pub fcd: f64,
    /// kN/cm²
    pub fyd: f64,
    /// kN
    pub nsd_kn: f64,
    /// Gross area a·b (cm²)
    pub area_cm2: f64,
    /// ν = Nsd / (Ac · fcd)
    pub fa: f64,
    pub x: AxisDesign,
    pub y: AxisDesign,
    pub axial_diagram: AxialLoadDiagram,
    pub warnings: Vec<DesignWarning>,
}

impl DesignOutputs {
    pub fn axis(&self, axis: Axis) -> &AxisDesign {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Ellipse of the amplified minimum moments, when both converged
    pub fn minimum_moment_ellipse(&self) -> Option<MinimumMomentEllipse> {
        Some(MinimumMomentEllipse {
            m_min_xx: self.x.md_tot_min.value()?,
            m_min_yy: self.y.md_tot_min.value()?,
        })
    }
}

/// Extreme envelope moments fed back into the κ amplifier (kN·m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMoments {
    pub mrd_x: f64,
    pub mrd_y: f64,
}

impl EnvelopeMoments {
    pub fn from_envelope(envelope: &ResistanceEnvelope) -> Self {
        Self {
            mrd_x: envelope.max_abs_mrd_x(),
            mrd_y: envelope.max_abs_mrd_y(),
        }
    }

    fn for_axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.mrd_x,
            Axis::Y => self.mrd_y,
        }
    }
}

// ============================================================================
// Design
// ============================================================================

struct AxisContext<'a> {
    input: &'a ColumnInput,
    settings: &'a SolverSettings,
    diagram: &'a AxialLoadDiagram,
    nsd: f64,
    fa: f64,
    area: f64,
    fcd: f64,
}

fn segment_results(ctx: &AxisContext<'_>, axis: Axis, radius: f64, mrd: Option<f64>) -> Vec<SegmentResult> {
    let input = ctx.input;
    let gamma_f = input.gamma_f;
    let (top_k, base_k) = input.characteristic_end_moments(axis);
    let dimension = input.dimension_cm(axis);

    divide_into_segments(input.h_cm, &input.restraints, Some(axis))
        .into_iter()
        .map(|seg| {
            let m_base = if seg.start_cm.abs() <= COORDINATE_TOLERANCE {
                base_k * gamma_f
            } else {
                restraint_at(&input.restraints, axis, seg.start_cm).map_or(0.0, |r| r.moment_above_knm * gamma_f)
            };
            let m_top = if (seg.end_cm - input.h_cm).abs() <= COORDINATE_TOLERANCE {
                top_k * gamma_f
            } else {
                restraint_at(&input.restraints, axis, seg.end_cm).map_or(0.0, |r| r.moment_below_knm * gamma_f)
            };

            let nk_top = ctx.diagram.nk_for_segment_top(seg.end_cm);
            let nsd = nk_top * gamma_f;
            let lambda = slenderness(seg.length(), radius);

            let kappa = m2d_for_segment(
                &SegmentKappaInput {
                    m_top,
                    m_base,
                    lambda,
                    fa: dimensionless_axial_force(nsd, ctx.area, ctx.fcd),
                    dimension_cm: dimension,
                    axial_kn: nsd,
                    mrd,
                },
                ctx.settings,
            );
            if !kappa.converged {
                tracing::warn!(%axis, start_cm = seg.start_cm, end_cm = seg.end_cm, "segment M2d did not converge");
            }

            SegmentResult {
                start_cm: seg.start_cm,
                end_cm: seg.end_cm,
                length_cm: seg.length(),
                centre_cm: seg.centre(),
                nk_top_kn: nk_top,
                nsd_kn: nsd,
                m_base,
                m_top,
                lambda,
                m2d: kappa.value(),
                kappa,
            }
        })
        .collect()
}

fn design_axis(ctx: &AxisContext<'_>, axis: Axis, envelope: Option<&EnvelopeMoments>) -> AxisDesign {
    let input = ctx.input;
    let settings = ctx.settings;

    let (top_k, base_k) = input.characteristic_end_moments(axis);
    let msd_top = top_k * input.gamma_f;
    let msd_base = base_k * input.gamma_f;

    let dimension = input.dimension_cm(axis);
    let inertia = match axis {
        Axis::X => rectangular_moment_of_inertia(input.a_cm, input.b_cm),
        Axis::Y => rectangular_moment_of_inertia(input.b_cm, input.a_cm),
    };
    let radius = radius_of_gyration(inertia, ctx.area);
    let effective_length = effective_buckling_length(input.h_cm, &input.restraints, axis);
    let lambda = slenderness(effective_length, radius);

    let (ma, mb) = end_moments(msd_top, msd_base);
    let alpha = settings.clamp_alpha_b(alpha_b(ma, mb));

    let eccentricity = eccentricity_cm(msd_base, ctx.nsd);
    // Both axes are normalised by the width `a`
    let relative_eccentricity = if input.a_cm != 0.0 { eccentricity / input.a_cm } else { 0.0 };
    let lambda_limit = limit_slenderness(relative_eccentricity, alpha);

    let m1d_min = minimum_first_order_moment(ctx.nsd, dimension);
    let mrd = envelope.map(|e| e.for_axis(axis)).filter(|m| m.is_finite() && *m > 0.0);

    let md_tot_min = calculate_m2d(
        &KappaInput {
            lambda,
            fa: ctx.fa,
            alpha_b: 1.0,
            ma: m1d_min,
            dimension_cm: dimension,
            axial_kn: ctx.nsd,
            mrd: None,
        },
        settings,
    );

    let kappa = calculate_m2d(
        &KappaInput {
            lambda,
            fa: ctx.fa,
            alpha_b: alpha,
            ma,
            dimension_cm: dimension,
            axial_kn: ctx.nsd,
            mrd,
        },
        settings,
    );
    if !kappa.converged {
        tracing::warn!(%axis, lambda, "global M2d did not converge");
    }

    AxisDesign {
        axis,
        msd_top,
        msd_base,
        dimension_cm: dimension,
        inertia_cm4: inertia,
        radius_of_gyration_cm: radius,
        effective_length_cm: effective_length,
        lambda,
        ma,
        mb,
        alpha_b: alpha,
        eccentricity_cm: eccentricity,
        relative_eccentricity,
        lambda_limit,
        m1d_min,
        md_tot_min,
        mrd,
        kappa,
        segments: segment_results(ctx, axis, radius, mrd),
    }
}

/// First- and second-order design values.
///
/// Pass the extreme envelope moments to switch the κ amplifier to its
/// closed form. Non-convergence is reported inside the result.
///
/// # Errors
///
/// The input is checked with [`ColumnInput::validate`] before anything is
/// computed, so callers that skip their own validation still get
/// [`CalcError::InvalidInput`] for non-positive dimensions, restraints
/// outside the column or bars outside the section. This is the only `Err`
/// path.
pub fn compute_design(
    input: &ColumnInput,
    envelope: Option<&EnvelopeMoments>,
    settings: &SolverSettings,
) -> CalcResult<DesignOutputs> {
    input.validate()?;

    let materials = input.materials(settings);
    let fcd = materials.concrete.fcd().0;
    let fyd = materials.steel.fyd().0;
    let nsd = input.nsd_kn();
    let area = rectangular_area(input.a_cm, input.b_cm);
    let fa = dimensionless_axial_force(nsd, area, fcd);

    let diagram = AxialLoadDiagram::build(input.h_cm, input.nsk_kn, &input.restraints);

    let ctx = AxisContext {
        input,
        settings,
        diagram: &diagram,
        nsd,
        fa,
        area,
        fcd,
    };
    let x = design_axis(&ctx, Axis::X, envelope);
    let y = design_axis(&ctx, Axis::Y, envelope);

    tracing::debug!(
        label = %input.label,
        nsd_kn = nsd,
        lambda_x = x.lambda,
        lambda_y = y.lambda,
        "column design computed"
    );

    let warnings = diagram.warnings.clone();
    Ok(DesignOutputs {
        fcd,
        fyd,
        nsd_kn: nsd,
        area_cm2: area,
        fa,
        x,
        y,
        axial_diagram: diagram,
        warnings,
    })
}

// ============================================================================
// Full analysis
// ============================================================================

/// A critical moment pair with its safety coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedDemand {
    pub point: DemandPoint,
    /// γ = resistance / demand; `+∞` for zero demand, NaN if unavailable
    pub safety: f64,
}

/// Design values, resistance envelope and safety checks of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub design: DesignOutputs,
    pub envelope: Option<ResistanceEnvelope>,
    /// Why the envelope is missing, if it was attempted
    pub envelope_error: Option<CalcError>,
    pub demands: Vec<CheckedDemand>,
}

impl ColumnReport {
    /// True when every finite safety coefficient is at least 1
    pub fn passes(&self) -> bool {
        self.demands
            .iter()
            .filter(|d| d.safety.is_finite())
            .all(|d| d.safety >= 1.0)
    }

    /// The demand with the smallest finite safety coefficient
    pub fn governing(&self) -> Option<&CheckedDemand> {
        self.demands
            .iter()
            .filter(|d| d.safety.is_finite())
            .min_by(|a, b| a.safety.total_cmp(&b.safety))
    }
}

/// Run the complete column check.
///
/// A failed envelope (no bars, axial capacity exceeded) is logged and
/// recorded in [`ColumnReport::envelope_error`]; the rest of the report is
/// still produced, with safety coefficients taken from the Md,tot,min
/// ellipse.
pub fn analyze(input: &ColumnInput, settings: &SolverSettings) -> CalcResult<ColumnReport> {
    let first_pass = compute_design(input, None, settings)?;

    let (envelope, envelope_error) = if input.bars.is_empty() {
        tracing::debug!("no bars, resistance envelope skipped");
        (None, None)
    } else {
        match build_resistance_envelope(
            &input.mesh(settings),
            &input.bars,
            &input.materials(settings),
            first_pass.nsd_kn,
            settings,
        ) {
            Ok(env) => (Some(env), None),
            Err(err) if err.is_recoverable() => {
                tracing::error!(error = %err, code = err.error_code(), "resistance envelope not available");
                (None, Some(err))
            }
            Err(err) => return Err(err),
        }
    };

    let design = match &envelope {
        Some(env) if !env.is_empty() => {
            compute_design(input, Some(&EnvelopeMoments::from_envelope(env)), settings)?
        }
        _ => first_pass,
    };

    let polar = envelope
        .as_ref()
        .map(PolarEnvelope::from_envelope)
        .filter(|p| !p.is_empty());
    let ellipse = design.minimum_moment_ellipse();
    let resistance = match (&polar, ellipse) {
        (Some(p), _) => Resistance::Envelope(p),
        (None, Some(e)) => Resistance::Ellipse(e),
        (None, None) => Resistance::Unavailable,
    };

    let demands = critical_demand_points(input, &design)
        .into_iter()
        .map(|point| CheckedDemand {
            safety: safety_coefficient(point.msd_x, point.msd_y, resistance),
            point,
        })
        .collect();

    Ok(ColumnReport {
        design,
        envelope,
        envelope_error,
        demands,
    })
}
