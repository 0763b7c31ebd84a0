//! # Units and Output Rounding
//!
//! Lightweight newtype wrappers for the US customary units the engine
//! works in, plus the rounding conventions every reported number follows.
//!
//! ## Reported precision
//!
//! | Quantity | Unit | Decimals |
//! |----------|------|----------|
//! | Pressure | psf | 2 |
//! | Moment | ft·lb (= lb·in / 12) | 1 |
//! | Spacing | ft | 2 |
//! | Ratios | - | 3 |
//! | Concrete | ft³ | 3 |
//! | Concrete | yd³ (= ft³ / 27) | 2 |
//!
//! ## Example
//!
//! ```rust
//! use windcalc_core::units::{FtLb, InLb, round_moment_ftlb};
//!
//! let m: FtLb = InLb(48_000.0).into();
//! assert_eq!(m.0, 4_000.0);
//! assert_eq!(round_moment_ftlb(InLb(1234.0)), 102.8);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in pounds per square inch (psi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psi(pub f64);

/// Stress in kips per square inch (ksi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksi(pub f64);

impl From<Ksi> for Psi {
    fn from(ksi: Ksi) -> Self {
        Psi(ksi.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in foot-pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FtLb(pub f64);

/// Moment in inch-pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InLb(pub f64);

impl From<FtLb> for InLb {
    fn from(ftlb: FtLb) -> Self {
        InLb(ftlb.0 * 12.0)
    }
}

impl From<InLb> for FtLb {
    fn from(inlb: InLb) -> Self {
        FtLb(inlb.0 / 12.0)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicFeet(pub f64);

/// Ready-mix is ordered by the cubic yard
pub const CUBIC_FEET_PER_YARD: f64 = 27.0;

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
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(Psi);
impl_arithmetic!(Ksi);
impl_arithmetic!(FtLb);
impl_arithmetic!(InLb);
impl_arithmetic!(CubicFeet);

// ============================================================================
// Rounding
// ============================================================================

/// True for finite values strictly greater than zero (NaN is rejected).
#[inline]
pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Round to `places` decimals, ties to even (banker's rounding).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Pressure in psf, 2 decimals
pub fn round_psf(psf: f64) -> f64 {
    round_to(psf, 2)
}

/// Moment reported in ft·lb with 1 decimal
pub fn round_moment_ftlb(moment: InLb) -> f64 {
    round_to(FtLb::from(moment).0, 1)
}

/// Spacing in ft, 2 decimals
pub fn round_spacing_ft(ft: f64) -> f64 {
    round_to(ft, 2)
}

/// Utilization ratios, 3 decimals
pub fn round_ratio(ratio: f64) -> f64 {
    round_to(ratio, 3)
}

/// Concrete volume in ft³, 3 decimals
pub fn round_cf(volume: CubicFeet) -> f64 {
    round_to(volume.0, 3)
}

/// Concrete volume in yd³ (from ft³), 2 decimals
pub fn round_cy(volume: CubicFeet) -> f64 {
    round_to(volume.0 / CUBIC_FEET_PER_YARD, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_inches() {
        let inches: Inches = Feet(8.0).into();
        assert_eq!(inches.0, 96.0);
    }

    #[test]
    fn test_ksi_to_psi() {
        let psi: Psi = Ksi(50.0).into();
        assert_eq!(psi.0, 50_000.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = CubicFeet(10.0);
        let b = CubicFeet(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_rounding_conventions() {
        assert_eq!(round_psf(33.9349), 33.93);
        assert_eq!(round_moment_ftlb(InLb(48_082.0)), 4006.8);
        assert_eq!(round_ratio(1.23456), 1.235);
        assert_eq!(round_cf(CubicFeet(1.30899)), 1.309);
        assert_eq!(round_cy(CubicFeet(54.0)), 2.0);
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(12.25, 1), 12.2);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn test_serialization() {
        let ft = Feet(12.5);
        let json = serde_json::to_string(&ft).unwrap();
        assert_eq!(json, "12.5");
    }
}
