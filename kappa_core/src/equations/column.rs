//! # Column Second-Order Formulas
//!
//! Closed-form pieces of the κ (curvature amplification) method for slender
//! columns. The iterative parts live in [`crate::calculations::kappa`].
//!
//! ## Units
//!
//! - Forces in kN, moments in kN·m, section dimensions in cm
//! - `fa` (ν) is dimensionless: Nsd / (Ac · fcd)
//!
//! ## Sign Conventions
//!
//! - Axial force: compression positive in the demand formulas
//! - End moments keep their sign; `MB` is negative when the column is bent in
//!   double curvature

/// Combine the two end moments into `(MA, MB)`.
///
/// `MA` is the larger magnitude. `MB` is the smaller magnitude, positive
/// when both ends bend the column the same way and negative otherwise.
///
/// # Example
/// ```rust
/// use kappa_core::equations::column::end_moments;
///
/// let (ma, mb) = end_moments(-30.0, 50.0);
/// assert_eq!(ma, 50.0);
/// assert_eq!(mb, -30.0);
/// ```
pub fn end_moments(top: f64, base: f64) -> (f64, f64) {
    let ma = top.abs().max(base.abs());
    let mb_min = top.abs().min(base.abs());
    let mb = if top * base >= 0.0 { mb_min } else { -mb_min };
    (ma, mb)
}

/// End-moment ratio coefficient α_b (unclamped).
///
/// # Formula
/// α_b = 0.6 + 0.4 · MB/MA, or 1.0 when MA = 0
pub fn alpha_b(ma: f64, mb: f64) -> f64 {
    if ma != 0.0 {
        0.6 + 0.4 * (mb / ma)
    } else {
        1.0
    }
}

/// First-order eccentricity in cm: |M| / N · 100
pub fn eccentricity_cm(moment_knm: f64, axial_kn: f64) -> f64 {
    if axial_kn != 0.0 {
        moment_knm.abs() / axial_kn * 100.0
    } else {
        0.0
    }
}

/// Limit slenderness below which second-order effects may be ignored.
///
/// # Formula
/// λ1 = (25 + 12.5 · e1/h) / α_b
pub fn limit_slenderness(relative_eccentricity: f64, alpha_b: f64) -> f64 {
    if alpha_b != 0.0 {
        (25.0 + 12.5 * relative_eccentricity) / alpha_b
    } else {
        f64::NAN
    }
}

/// Dimensionless axial force ν = Nsd / (Ac · fcd), with fcd in kN/cm².
pub fn dimensionless_axial_force(nsd_kn: f64, area_cm2: f64, fcd_kn_cm2: f64) -> f64 {
    if area_cm2 != 0.0 && fcd_kn_cm2 != 0.0 {
        nsd_kn / (area_cm2 * fcd_kn_cm2)
    } else {
        f64::NAN
    }
}

/// Minimum first-order design moment (kN·m) for a section dimension in cm.
///
/// # Formula
/// M1d,min = Nsd · (0.015 + 0.03 · h), h in meters
///
/// # Example
/// ```rust
/// use kappa_core::equations::column::minimum_first_order_moment;
///
/// // 540 kN on a 40 cm face: 540 · (0.015 + 0.012) = 14.58 kN·m
/// assert!((minimum_first_order_moment(540.0, 40.0) - 14.58).abs() < 1e-9);
/// ```
pub fn minimum_first_order_moment(nsd_kn: f64, dimension_cm: f64) -> f64 {
    nsd_kn * (0.015 + 0.03 * dimension_cm / 100.0)
}

/// Reference moment `h · N / 100` (kN·m) used to normalize M in κ.
pub fn kappa_base(dimension_cm: f64, axial_kn: f64) -> f64 {
    dimension_cm * axial_kn / 100.0
}

/// Curvature coefficient for a given total moment.
///
/// # Formula
/// κ = 32 · ν · (1 + 5 · M / (h · N))
pub fn kappa_for_moment(fa: f64, moment_knm: f64, base_knm: f64) -> f64 {
    32.0 * fa * (1.0 + 5.0 * moment_knm / base_knm)
}

/// Starting κ of the fixed-point iteration: 2 · λ² · ν / 120.
///
/// This value makes the first amplification denominator exactly 0.5.
pub fn initial_kappa(lambda: f64, fa: f64) -> f64 {
    2.0 * lambda * lambda * fa / 120.0
}

/// Amplification denominator `1 − λ²·ν / (120·κ)`.
pub fn amplification_denominator(lambda: f64, fa: f64, kappa: f64) -> f64 {
    1.0 - (lambda * lambda * fa) / (120.0 * kappa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_moments_same_sign() {
        let (ma, mb) = end_moments(20.0, 30.0);
        assert_eq!(ma, 30.0);
        assert_eq!(mb, 20.0);
    }

    #[test]
    fn test_end_moments_opposite_sign() {
        let (ma, mb) = end_moments(-10.0, 48.0);
        assert_eq!(ma, 48.0);
        assert_eq!(mb, -10.0);
    }

    #[test]
    fn test_end_moments_zero_end() {
        let (ma, mb) = end_moments(0.0, -25.0);
        assert_eq!(ma, 25.0);
        assert_eq!(mb, 0.0);
    }

    #[test]
    fn test_alpha_b() {
        assert!((alpha_b(50.0, -30.0) - 0.36).abs() < 1e-12);
        assert!((alpha_b(30.0, 20.0) - (0.6 + 0.4 * 20.0 / 30.0)).abs() < 1e-12);
        assert_eq!(alpha_b(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_eccentricity() {
        // 50 kN·m / 540 kN = 9.259 cm
        assert!((eccentricity_cm(50.0, 540.0) - 9.259).abs() < 1e-3);
        assert_eq!(eccentricity_cm(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_limit_slenderness() {
        assert!((limit_slenderness(0.0, 1.0) - 25.0).abs() < 1e-12);
        assert!((limit_slenderness(0.4, 0.5) - 60.0).abs() < 1e-12);
        assert!(limit_slenderness(0.4, 0.0).is_nan());
    }

    #[test]
    fn test_dimensionless_axial_force() {
        // 540 / (800 · 2.142857) = 0.315
        let fa = dimensionless_axial_force(540.0, 800.0, 3.0 / 1.4);
        assert!((fa - 0.315).abs() < 1e-9);
        assert!(dimensionless_axial_force(540.0, 0.0, 2.0).is_nan());
    }

    #[test]
    fn test_initial_kappa_halves_denominator() {
        let k0 = initial_kappa(58.89, 0.315);
        assert!((amplification_denominator(58.89, 0.315, k0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kappa_for_moment() {
        // base = 40 · 540 / 100 = 216 kN·m
        let base = kappa_base(40.0, 540.0);
        assert!((base - 216.0).abs() < 1e-12);
        let k = kappa_for_moment(0.315, 21.6, base);
        assert!((k - 32.0 * 0.315 * 1.5).abs() < 1e-12);
    }
}
