//! # Safety Coefficient
//!
//! Ratio between the section resistance and a design moment pair, measured
//! along the direction of the demand in the `(Msd,y, Msd,x)` plane.
//!
//! The resistance comes from the envelope when one exists. Otherwise an
//! ellipse with semi-axes `Md,tot,min,xx` and `Md,tot,min,yy` stands in for
//! it.
//!
//! ```text
//!   Msd,x
//!     │     ∙ R (interpolated envelope point)
//!     │   ∙´
//!     │ ∙ D (demand)          γ = |R| / |D|
//!     └──────── Msd,y
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::section::ResistanceEnvelope;

/// Demands with both components below this are treated as zero.
const ZERO_DEMAND: f64 = 1e-9;

/// Envelope points closer than this in polar angle are merged.
const SAME_ANGLE: f64 = 1e-9;

/// Ellipse of the minimum total design moments (kN·m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimumMomentEllipse {
    pub m_min_xx: f64,
    pub m_min_yy: f64,
}

/// What the demand is compared against.
#[derive(Debug, Clone, Copy)]
pub enum Resistance<'a> {
    Envelope(&'a PolarEnvelope),
    Ellipse(MinimumMomentEllipse),
    Unavailable,
}

/// One envelope point with its polar angle in the `(MRdY, MRdX)` plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    pub angle_rad: f64,
    pub mrd_x: f64,
    pub mrd_y: f64,
}

/// Envelope points sorted by polar angle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarEnvelope {
    points: Vec<PolarPoint>,
}

fn polar_angle(mx: f64, my: f64) -> f64 {
    mx.atan2(my)
}

/// Signed angular difference `to − from`, wrapped into `(−π, π]`.
fn angle_between(from: f64, to: f64) -> f64 {
    let mut diff = (to - from) % TAU;
    if diff > PI {
        diff -= TAU;
    } else if diff <= -PI {
        diff += TAU;
    }
    diff
}

impl PolarEnvelope {
    /// Sort `(MRdX, MRdY)` pairs by polar angle, dropping non-finite ones.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut points: Vec<PolarPoint> = pairs
            .into_iter()
            .filter(|(mx, my)| mx.is_finite() && my.is_finite())
            .map(|(mrd_x, mrd_y)| PolarPoint {
                angle_rad: polar_angle(mrd_x, mrd_y),
                mrd_x,
                mrd_y,
            })
            .collect();
        points.sort_by(|a, b| a.angle_rad.total_cmp(&b.angle_rad));

        // A full sweep repeats its first point at 360°
        points.dedup_by(|a, b| angle_between(b.angle_rad, a.angle_rad).abs() < SAME_ANGLE);
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if points.len() > 1 && angle_between(last.angle_rad, first.angle_rad).abs() < SAME_ANGLE {
                points.pop();
            }
        }
        Self { points }
    }

    pub fn from_envelope(envelope: &ResistanceEnvelope) -> Self {
        Self::from_pairs(envelope.moment_pairs())
    }

    pub fn points(&self) -> &[PolarPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point whose polar angle is closest to `angle_rad`.
    pub fn nearest_index(&self, angle_rad: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                angle_between(a.angle_rad, angle_rad)
                    .abs()
                    .total_cmp(&angle_between(b.angle_rad, angle_rad).abs())
            })
            .map(|(i, _)| i)
    }

    /// Resistance point on the demand direction `angle_rad`, interpolated
    /// linearly in angle between the nearest point and the neighbour on the
    /// other side of the demand.
    pub fn resistance_at(&self, angle_rad: f64) -> Option<(f64, f64)> {
        let i = self.nearest_index(angle_rad)?;
        let n = self.points.len();
        let near = self.points[i];

        let offset = angle_between(near.angle_rad, angle_rad);
        let j = if offset >= 0.0 { (i + 1) % n } else { (i + n - 1) % n };
        let other = self.points[j];

        let span = angle_between(near.angle_rad, other.angle_rad);
        if j == i || span.abs() < SAME_ANGLE {
            return Some((near.mrd_x, near.mrd_y));
        }

        let t = offset / span;
        Some((
            near.mrd_x + t * (other.mrd_x - near.mrd_x),
            near.mrd_y + t * (other.mrd_y - near.mrd_y),
        ))
    }
}

/// Safety coefficient γ of a design moment pair (kN·m).
///
/// `+∞` for a zero demand; NaN when no resistance is available.
///
/// # Example
/// ```rust
/// use kappa_core::calculations::safety::{safety_coefficient, MinimumMomentEllipse, Resistance};
///
/// let ellipse = Resistance::Ellipse(MinimumMomentEllipse { m_min_xx: 20.0, m_min_yy: 10.0 });
/// assert!((safety_coefficient(10.0, 0.0, ellipse) - 2.0).abs() < 1e-12);
/// assert_eq!(safety_coefficient(0.0, 0.0, ellipse), f64::INFINITY);
/// ```
pub fn safety_coefficient(msd_x: f64, msd_y: f64, resistance: Resistance<'_>) -> f64 {
    if msd_x.abs() < ZERO_DEMAND && msd_y.abs() < ZERO_DEMAND {
        return f64::INFINITY;
    }

    match resistance {
        Resistance::Envelope(envelope) => {
            let demand = msd_x.hypot(msd_y);
            match envelope.resistance_at(polar_angle(msd_x, msd_y)) {
                Some((rx, ry)) => rx.hypot(ry) / demand,
                None => f64::NAN,
            }
        }
        Resistance::Ellipse(e) => {
            let utilization = ((msd_x / e.m_min_xx).powi(2) + (msd_y / e.m_min_yy).powi(2)).sqrt();
            1.0 / utilization
        }
        Resistance::Unavailable => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Circle of radius 100 sampled every 10°, closing on itself
    fn circle() -> PolarEnvelope {
        PolarEnvelope::from_pairs((0..=36).map(|i| {
            let a = (i as f64 * 10.0).to_radians();
            (100.0 * a.sin(), 100.0 * a.cos())
        }))
    }

    #[test]
    fn test_zero_demand_is_infinite() {
        assert_eq!(safety_coefficient(0.0, 0.0, Resistance::Unavailable), f64::INFINITY);
        assert_eq!(
            safety_coefficient(0.0, 0.0, Resistance::Envelope(&circle())),
            f64::INFINITY
        );
    }

    #[test]
    fn test_unavailable_is_nan() {
        assert!(safety_coefficient(5.0, 1.0, Resistance::Unavailable).is_nan());
        assert!(safety_coefficient(5.0, 1.0, Resistance::Envelope(&PolarEnvelope::default())).is_nan());
    }

    #[test]
    fn test_ellipse() {
        let e = Resistance::Ellipse(MinimumMomentEllipse {
            m_min_xx: 30.0,
            m_min_yy: 40.0,
        });
        assert!((safety_coefficient(0.0, 20.0, e) - 2.0).abs() < 1e-12);
        // Point on the ellipse
        let a = 0.7_f64;
        let g = safety_coefficient(30.0 * a.sin(), 40.0 * a.cos(), e);
        assert!((g - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_envelope_on_sample_direction() {
        let env = circle();
        // Demand along 30°: a sampled point
        let a = 30.0_f64.to_radians();
        let g = safety_coefficient(50.0 * a.sin(), 50.0 * a.cos(), Resistance::Envelope(&env));
        assert!((g - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_between_samples() {
        let env = circle();
        // Chord interpolation lies slightly inside the circle
        for deg in [5.0_f64, 95.0, 185.0, 275.0, 355.0] {
            let a = deg.to_radians();
            let g = safety_coefficient(25.0 * a.sin(), 25.0 * a.cos(), Resistance::Envelope(&env));
            assert!(g < 4.0 && g > 3.95, "{deg}°: {g}");
        }
    }

    #[test]
    fn test_wraparound_nearest() {
        let env = circle();
        // -179° is closest to ±180°, not to 170° or 0°
        let i = env.nearest_index((-179.0_f64).to_radians()).unwrap();
        let p = env.points()[i];
        assert!((p.angle_rad.abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_points_dropped() {
        let env = PolarEnvelope::from_pairs(vec![(f64::NAN, 1.0), (1.0, 2.0), (3.0, f64::INFINITY)]);
        assert_eq!(env.points().len(), 1);
    }
}
