//! # Concrete Takeoff
//!
//! Standalone hole-by-hole concrete estimate for ordering: rows of
//! (post type, diameter, depth, count) become cubic feet, cubic yards and
//! 60 lb bag counts, with an optional waste allowance.
//!
//! ## Example
//!
//! ```rust
//! use windcalc_core::concrete::{calculate, ConcreteEstimateInput, HoleSpec};
//!
//! let input = ConcreteEstimateInput {
//!     hole_specs: vec![HoleSpec::new("Line", 10.0, 24.0, 19)],
//!     include_waste: false,
//!     waste_percent: 0.0,
//! };
//! let out = calculate(&input).unwrap();
//! assert_eq!(out.total_holes, 19);
//! assert_eq!(out.bags_60lb, 47);
//! ```

use serde::{Deserialize, Serialize};

use crate::checks::pier_volume_cf;
use crate::errors::{CalcError, CalcResult};
use crate::units::{is_positive, round_cf, round_cy, round_to, CubicFeet};

/// Nominal yield of a 60 lb bag (ft³)
pub const BAG_60LB_YIELD_CF: f64 = 0.45;

/// Depth above which a row is flagged (in)
pub const DEEP_HOLE_IN: f64 = 72.0;

/// Diameter above which a row is flagged (in)
pub const LARGE_HOLE_IN: f64 = 24.0;

fn default_include_waste() -> bool {
    true
}

fn default_waste_percent() -> f64 {
    10.0
}

fn default_post_type() -> String {
    "Post".to_string()
}

/// One row of identical holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleSpec {
    #[serde(default = "default_post_type")]
    pub post_type: String,
    pub hole_diameter_in: f64,
    pub hole_depth_in: f64,
    pub hole_count: u32,
}

impl HoleSpec {
    pub fn new(post_type: impl Into<String>, hole_diameter_in: f64, hole_depth_in: f64, hole_count: u32) -> Self {
        HoleSpec {
            post_type: post_type.into(),
            hole_diameter_in,
            hole_depth_in,
            hole_count,
        }
    }

    fn display_name(&self) -> &str {
        let name = self.post_type.trim();
        if name.is_empty() {
            "Post"
        } else {
            name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteEstimateInput {
    pub hole_specs: Vec<HoleSpec>,
    #[serde(default = "default_include_waste")]
    pub include_waste: bool,
    /// Waste allowance, 0-100 %
    #[serde(default = "default_waste_percent")]
    pub waste_percent: f64,
}

impl ConcreteEstimateInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.hole_specs.is_empty() {
            return Err(CalcError::invalid_input("hole_specs", "[]", "at least one row is required"));
        }
        for (index, spec) in self.hole_specs.iter().enumerate() {
            if !is_positive(spec.hole_diameter_in) {
                return Err(CalcError::invalid_input(
                    format!("hole_specs[{}].hole_diameter_in", index),
                    spec.hole_diameter_in.to_string(),
                    "must be greater than zero",
                ));
            }
            if !is_positive(spec.hole_depth_in) {
                return Err(CalcError::invalid_input(
                    format!("hole_specs[{}].hole_depth_in", index),
                    spec.hole_depth_in.to_string(),
                    "must be greater than zero",
                ));
            }
            if spec.hole_count == 0 {
                return Err(CalcError::invalid_input(
                    format!("hole_specs[{}].hole_count", index),
                    "0",
                    "must be at least 1",
                ));
            }
        }
        self.total_holes()?;
        if !(0.0..=100.0).contains(&self.waste_percent) {
            return Err(CalcError::invalid_input(
                "waste_percent",
                self.waste_percent.to_string(),
                "must be between 0 and 100",
            ));
        }
        Ok(())
    }

    /// Holes across every row; a count that overflows is invalid input.
    fn total_holes(&self) -> CalcResult<u32> {
        self.hole_specs
            .iter()
            .try_fold(0u32, |total, spec| total.checked_add(spec.hole_count))
            .ok_or_else(|| CalcError::invalid_input("hole_specs", "hole_count", "total hole count is too large"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleRowOutput {
    pub post_type: String,
    pub hole_diameter_in: f64,
    pub hole_depth_in: f64,
    pub hole_count: u32,
    pub volume_per_hole_cf: f64,
    pub total_volume_cf: f64,
    pub total_volume_cy: f64,
    pub bags_60lb: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteEstimateOutput {
    pub rows: Vec<HoleRowOutput>,
    pub total_holes: u32,
    pub subtotal_volume_cf: f64,
    pub waste_percent: f64,
    pub waste_volume_cf: f64,
    pub total_volume_cf: f64,
    pub total_volume_cy: f64,
    pub bags_60lb: u32,
    pub assumptions: Vec<String>,
    pub warnings: Vec<String>,
}

/// 60 lb bags needed for a volume, rounded up
pub fn bags_for(volume_cf: f64) -> u32 {
    (volume_cf / BAG_60LB_YIELD_CF).ceil() as u32
}

pub fn calculate(input: &ConcreteEstimateInput) -> CalcResult<ConcreteEstimateOutput> {
    input.validate()?;

    let mut rows = Vec::with_capacity(input.hole_specs.len());
    let mut warnings = Vec::new();
    let mut subtotal_cf = 0.0;
    let total_holes = input.total_holes()?;

    for spec in &input.hole_specs {
        let per_hole_cf = pier_volume_cf(spec.hole_diameter_in, spec.hole_depth_in);
        let row_cf = per_hole_cf * f64::from(spec.hole_count);
        let name = spec.display_name();

        if spec.hole_depth_in > DEEP_HOLE_IN {
            warnings.push(format!("{} depth {:.0} in is unusually deep.", name, spec.hole_depth_in));
        }
        if spec.hole_diameter_in > LARGE_HOLE_IN {
            warnings.push(format!("{} diameter {:.0} in is unusually large.", name, spec.hole_diameter_in));
        }

        rows.push(HoleRowOutput {
            post_type: name.to_string(),
            hole_diameter_in: spec.hole_diameter_in,
            hole_depth_in: spec.hole_depth_in,
            hole_count: spec.hole_count,
            volume_per_hole_cf: round_cf(CubicFeet(per_hole_cf)),
            total_volume_cf: round_cf(CubicFeet(row_cf)),
            total_volume_cy: round_cy(CubicFeet(row_cf)),
            bags_60lb: bags_for(row_cf),
        });

        subtotal_cf += row_cf;
    }

    let waste_percent = if input.include_waste { input.waste_percent } else { 0.0 };
    let waste_cf = subtotal_cf * waste_percent / 100.0;
    let total_cf = subtotal_cf + waste_cf;

    Ok(ConcreteEstimateOutput {
        rows,
        total_holes,
        subtotal_volume_cf: round_cf(CubicFeet(subtotal_cf)),
        waste_percent: round_to(waste_percent, 2),
        waste_volume_cf: round_cf(CubicFeet(waste_cf)),
        total_volume_cf: round_cf(CubicFeet(total_cf)),
        total_volume_cy: round_cy(CubicFeet(total_cf)),
        bags_60lb: bags_for(total_cf),
        assumptions: vec![
            "Hole volume modeled as a full cylinder.".to_string(),
            "No bell/bulb footing shape included.".to_string(),
            format!("60 lb bag yield assumed as {:.2} cf per bag.", BAG_60LB_YIELD_CF),
        ],
        warnings,
    })
}
