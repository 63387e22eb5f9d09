//! # Cross-Section Property Formulas
//!
//! Geometric properties of the rectangular column section.
//!
//! ## Notation
//!
//! - `a` = width of the section (along the local x axis), cm
//! - `b` = depth of the section (along the local y axis), cm
//! - `A` = gross area
//! - `I` = second moment of area
//! - `i` = radius of gyration √(I/A)
//! - `λ` = slenderness le/i
//!
//! Bending *about x* stretches the fibers along y, so `Ix = a·b³/12` and the
//! x-axis quantities use the depth `b`.

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Gross area of a rectangular section
///
/// ```text
///     ┌─────────┐
///     │         │
///   b │         │
///     │         │
///     └─────────┘
///          a
/// ```
///
/// # Formula
/// A = a × b
///
/// # Example
/// ```rust
/// use kappa_core::equations::section::rectangular_area;
///
/// assert!((rectangular_area(20.0, 40.0) - 800.0).abs() < 1e-9);
/// ```
#[inline]
pub fn rectangular_area(a: f64, b: f64) -> f64 {
    a * b
}

/// Second moment of area of a rectangle about its centroidal axis
/// perpendicular to `depth`.
///
/// ```text
///     ┌─────────┐
///     │         │
/// depth ════════│ ← centroidal axis at depth/2
///     │         │
///     └─────────┘
///        width
/// ```
///
/// # Formula
/// I = width · depth³ / 12
///
/// # Example
/// ```rust
/// use kappa_core::equations::section::rectangular_moment_of_inertia;
///
/// // Ix of a 20 x 40 cm column
/// let ix = rectangular_moment_of_inertia(20.0, 40.0);
/// assert!((ix - 106_666.667).abs() < 0.01);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(width: f64, depth: f64) -> f64 {
    width * depth.powi(3) / 12.0
}

/// Radius of gyration i = √(I/A)
///
/// Returns NaN when the area is zero, so downstream slenderness values are
/// visibly unavailable instead of infinite.
#[inline]
pub fn radius_of_gyration(inertia: f64, area: f64) -> f64 {
    if area == 0.0 {
        return f64::NAN;
    }
    (inertia / area).sqrt()
}

/// Slenderness λ = le / i
///
/// # Example
/// ```rust
/// use kappa_core::equations::section::slenderness;
///
/// // 340 cm column, i = 40/√12 = 11.547 cm
/// let lambda = slenderness(340.0, 40.0 / 12.0_f64.sqrt());
/// assert!((lambda - 29.445).abs() < 0.01);
/// ```
#[inline]
pub fn slenderness(effective_length: f64, radius_of_gyration: f64) -> f64 {
    effective_length / radius_of_gyration
}

/// Area of a round bar in cm² from its diameter in mm.
///
/// # Formula
/// As = π · (Ø/20)²
#[inline]
pub fn bar_area_cm2(diameter_mm: f64) -> f64 {
    std::f64::consts::PI * (diameter_mm / 20.0).powi(2)
}

// =============================================================================
// UNIT TESTS
// =============================================================================
