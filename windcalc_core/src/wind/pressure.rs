//! # Design Wind Pressure (ASCE 7-22)
//!
//! Velocity pressure and net force coefficients for freestanding fences
//! and walls, ASCE 7-22 Chapters 26 and 29.
//!
//! ## Method
//!
//! ```text
//! Kz = 2.01 × (max(z, 15) / zg)^(2/α)        Table 26.10-1
//! qz = 0.00256 × Kz × Kzt × Kd × V²          Eq. 26.10-1
//! Cf = Cf_solid(B/s) × ε                      Figure 29.3-1, Case A
//! p  = qz × G × Cf
//! ```
//!
//! ## Example
//!
//! ```rust
//! use windcalc_core::wind::{compute_design_pressure, Exposure};
//!
//! let dp = compute_design_pressure(120.0, 8.0, Exposure::C, 1.0, 1.0, "solid_panel", None);
//! assert!((dp.design_pressure_psf - 33.91).abs() < 0.01);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::units::round_to;

/// Edition tag carried on every pressure snapshot
pub const ASCE7_EDITION: &str = "ASCE 7-22";

/// Wind directionality factor, Table 26.6-1 (open signs and lattice framework)
pub const KD_FENCE: f64 = 0.85;

/// Gust-effect factor for rigid structures, Section 26.11
pub const G_RIGID: f64 = 0.85;

/// Solid-wall Cf when the run length is unknown (B/s ≥ 20 assumed)
pub const CF_SOLID_LONG_FENCE: f64 = 1.5;

/// Reference height floor for Kz (ft)
pub const KZ_MIN_HEIGHT_FT: f64 = 15.0;

/// (B/s, Cf) for a ground-mounted solid wall, s/h = 0
const CF_SOLID_TABLE: [(f64, f64); 5] = [(2.0, 1.2), (5.0, 1.3), (10.0, 1.4), (20.0, 1.5), (45.0, 1.75)];

/// Exposure category per ASCE 7-22 Section 26.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Exposure {
    B,
    #[default]
    C,
    D,
}

impl Exposure {
    pub const ALL: [Exposure; 3] = [Exposure::B, Exposure::C, Exposure::D];

    /// Terrain exposure constants (α, zg in ft), Table 26.11-1
    pub fn constants(self) -> (f64, f64) {
        match self {
            Exposure::B => (7.0, 1200.0),
            Exposure::C => (9.5, 900.0),
            Exposure::D => (11.5, 700.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Exposure::B => "B",
            Exposure::C => "C",
            Exposure::D => "D",
        }
    }
}

impl std::fmt::Display for Exposure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exposure {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Ok(Exposure::B),
            "C" => Ok(Exposure::C),
            "D" => Ok(Exposure::D),
            _ => Err(CalcError::invalid_exposure(s)),
        }
    }
}

impl TryFrom<String> for Exposure {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A fence type and its solidity ratio ε.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FenceTypeInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub solidity: f64,
    pub description: &'static str,
}

/// Registered fence types, in display order.
pub const FENCE_TYPES: [FenceTypeInfo; 5] = [
    FenceTypeInfo {
        key: "chain_link_open",
        label: "Open Chain Link",
        solidity: 0.35,
        description: "Standard chain link fabric, no screen or slats. Approximately 35% solid.",
    },
    FenceTypeInfo {
        key: "chain_link_windscreen_50",
        label: "Chain Link w/ 50% Windscreen",
        solidity: 0.50,
        description: "Chain link with 50% windscreen mesh.",
    },
    FenceTypeInfo {
        key: "chain_link_windscreen_80",
        label: "Chain Link w/ 80% Windscreen",
        solidity: 0.80,
        description: "Chain link with 80% privacy windscreen.",
    },
    FenceTypeInfo {
        key: "chain_link_slats",
        label: "Chain Link w/ Privacy Slats",
        solidity: 0.85,
        description: "Chain link with vertical privacy slats. Approximately 85% solid.",
    },
    FenceTypeInfo {
        key: "solid_panel",
        label: "Solid Panel (Wood / Vinyl / Metal)",
        solidity: 1.0,
        description: "Solid fence panel. 100% solid.",
    },
];

/// Look up a fence type by key.
pub fn fence_type(key: &str) -> Option<&'static FenceTypeInfo> {
    FENCE_TYPES.iter().find(|f| f.key == key)
}

/// Solidity for a fence type key; unknown keys are treated as fully solid.
pub fn solidity_for(key: &str) -> f64 {
    fence_type(key).map(|f| f.solidity).unwrap_or(1.0)
}

/// Velocity pressure exposure coefficient Kz.
///
/// Heights below 15 ft use z = 15 ft.
pub fn compute_kz(height_ft: f64, exposure: Exposure) -> f64 {
    let (alpha, zg) = exposure.constants();
    let z = height_ft.max(KZ_MIN_HEIGHT_FT);
    2.01 * (z / zg).powf(2.0 / alpha)
}

/// Velocity pressure qz (psf), Eq. 26.10-1.
pub fn compute_qz(wind_speed_mph: f64, height_ft: f64, exposure: Exposure, kzt: f64) -> f64 {
    let kz = compute_kz(height_ft, exposure);
    0.00256 * kz * kzt * KD_FENCE * wind_speed_mph.powi(2)
}

/// Force coefficient for a solid freestanding wall at grade.
///
/// Linear interpolation on B/s, clamped to the table ends. `None` means a
/// long run and returns [`CF_SOLID_LONG_FENCE`].
pub fn compute_cf_solid(aspect_ratio_bs: Option<f64>) -> f64 {
    let Some(bs) = aspect_ratio_bs else {
        return CF_SOLID_LONG_FENCE;
    };

    let (first_bs, first_cf) = CF_SOLID_TABLE[0];
    let (last_bs, last_cf) = CF_SOLID_TABLE[CF_SOLID_TABLE.len() - 1];
    if bs <= first_bs {
        return first_cf;
    }
    if bs >= last_bs {
        return last_cf;
    }

    for pair in CF_SOLID_TABLE.windows(2) {
        let (bs_lo, cf_lo) = pair[0];
        let (bs_hi, cf_hi) = pair[1];
        if bs <= bs_hi {
            let t = (bs - bs_lo) / (bs_hi - bs_lo);
            return cf_lo + t * (cf_hi - cf_lo);
        }
    }
    last_cf
}

/// Net force coefficient scaled by solidity (negative solidity counts as 0).
pub fn compute_cf(solidity: f64, aspect_ratio_bs: Option<f64>) -> f64 {
    compute_cf_solid(aspect_ratio_bs) * solidity.max(0.0)
}

/// Snapshot of one pressure computation with every intermediate coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPressureResult {
    /// p = qz × G × Cf (psf, 2 dp)
    pub design_pressure_psf: f64,
    /// Velocity pressure (psf, 2 dp)
    pub qz_psf: f64,
    /// 4 dp
    pub kz: f64,
    pub kzt: f64,
    pub kd: f64,
    pub g: f64,
    /// 3 dp
    pub cf_solid: f64,
    /// 3 dp
    pub cf: f64,
    pub solidity: f64,
    pub fence_type: String,
    pub asce7_edition: String,
}

/// Full design wind pressure on a fence surface.
///
/// Rounding is applied to the snapshot only; `p` is computed from the
/// unrounded coefficients.
pub fn compute_design_pressure(
    wind_speed_mph: f64,
    height_ft: f64,
    exposure: Exposure,
    solidity: f64,
    kzt: f64,
    fence_type: &str,
    aspect_ratio_bs: Option<f64>,
) -> DesignPressureResult {
    let kz = compute_kz(height_ft, exposure);
    let qz = compute_qz(wind_speed_mph, height_ft, exposure, kzt);
    let cf_solid = compute_cf_solid(aspect_ratio_bs);
    let cf = compute_cf(solidity, aspect_ratio_bs);
    let pressure = qz * G_RIGID * cf;

    DesignPressureResult {
        design_pressure_psf: round_to(pressure, 2),
        qz_psf: round_to(qz, 2),
        kz: round_to(kz, 4),
        kzt,
        kd: KD_FENCE,
        g: G_RIGID,
        cf_solid: round_to(cf_solid, 3),
        cf: round_to(cf, 3),
        solidity,
        fence_type: fence_type.to_string(),
        asce7_edition: ASCE7_EDITION.to_string(),
    }
}
