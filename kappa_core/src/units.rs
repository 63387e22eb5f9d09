//! # Unit Types
//!
//! Type-safe wrappers for the units used by the column engine. These are plain
//! `f64` newtypes that serialize as bare numbers.
//!
//! ## SI Working Units
//!
//! The engine follows the usual conventions of concrete column design sheets:
//! - Length: centimeters (cm) for sections, heights and eccentricities
//! - Force: kilonewtons (kN)
//! - Stress: megapascals (MPa) on input, kN/cm² inside the section engine
//! - Moment: kN·m on input and output, kN·cm inside the section engine
//!
//! ## Example
//!
//! ```rust
//! use kappa_core::units::{KnCm, KnM, KnPerCm2, Mpa};
//!
//! let fck = Mpa(30.0);
//! let fck_kn_cm2: KnPerCm2 = fck.into();
//! assert!((fck_kn_cm2.0 - 3.0).abs() < 1e-12);
//!
//! let m: KnM = KnCm(2500.0).into();
//! assert!((m.0 - 25.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in megapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mpa(pub f64);

/// Stress in kilonewtons per square centimeter (1 kN/cm² = 10 MPa)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerCm2(pub f64);

impl From<Mpa> for KnPerCm2 {
    fn from(mpa: Mpa) -> Self {
        KnPerCm2(mpa.0 / 10.0)
    }
}

impl From<KnPerCm2> for Mpa {
    fn from(s: KnPerCm2) -> Self {
        Mpa(s.0 * 10.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kilonewton-meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnM(pub f64);

/// Moment in kilonewton-centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnCm(pub f64);

impl From<KnM> for KnCm {
    fn from(m: KnM) -> Self {
        KnCm(m.0 * 100.0)
    }
}

impl From<KnCm> for KnM {
    fn from(m: KnCm) -> Self {
        KnM(m.0 / 100.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Mpa);
impl_arithmetic!(KnPerCm2);
impl_arithmetic!(KnM);
impl_arithmetic!(KnCm);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpa_to_kn_per_cm2() {
        let fyk = Mpa(500.0);
        let s: KnPerCm2 = fyk.into();
        assert!((s.0 - 50.0).abs() < 1e-12);
        let back: Mpa = s.into();
        assert!((back.0 - 500.0).abs() < 1e-12);
    }

    #[test]
    fn test_moment_conversion() {
        let m: KnCm = KnM(48.0).into();
        assert!((m.0 - 4800.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = KnM(20.0);
        let b = KnM(5.0);
        assert_eq!((a + b).0, 25.0);
        assert_eq!((a - b).0, 15.0);
        assert_eq!((a * 2.0).0, 40.0);
        assert_eq!((a / 2.0).0, 10.0);
    }

    #[test]
    fn test_serialization() {
        let m = KnM(12.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: KnM = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
