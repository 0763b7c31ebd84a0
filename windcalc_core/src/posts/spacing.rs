//! # Max Spacing Fallback Formula
//!
//! When no manufacturer table row covers a post, the allowable spacing is
//! scaled from the record's base spacing:
//!
//! ```text
//! S_max = S_table × Cf1(group, V) × Cf2(exposure) × Cf3
//! ```
//!
//! Cf1 is interpolated over 105-130 mph and clamped outside that band.

use serde::{Deserialize, Serialize};

use super::{PostGroup, PostRecord};
use crate::wind::Exposure;

/// Reserved site/fabric adjustment
pub const DEFAULT_CF3: f64 = 1.0;

/// (wind speed mph, Cf1) per group
const CF1_IA_REG: [(f64, f64); 4] = [(105.0, 2.2), (110.0, 2.0), (120.0, 1.7), (130.0, 1.4)];
const CF1_IA_HIGH: [(f64, f64); 4] = [(105.0, 3.7), (110.0, 3.4), (120.0, 2.8), (130.0, 2.4)];
const CF1_IC_PIPE: [(f64, f64); 4] = [(105.0, 3.1), (110.0, 2.8), (120.0, 2.4), (130.0, 2.0)];
const CF1_II_CSHAPE: [(f64, f64); 4] = [(105.0, 3.1), (110.0, 2.8), (120.0, 2.4), (130.0, 2.0)];

fn cf1_table(group: PostGroup) -> &'static [(f64, f64); 4] {
    match group {
        PostGroup::IaRegular => &CF1_IA_REG,
        PostGroup::IaHigh => &CF1_IA_HIGH,
        PostGroup::IcPipe => &CF1_IC_PIPE,
        PostGroup::IiCShape => &CF1_II_CSHAPE,
    }
}

/// Wind speed factor Cf1, plus a diagnostic when V falls outside the table.
pub fn get_cf1(group: PostGroup, wind_speed_mph: f64) -> (f64, Option<String>) {
    let table = cf1_table(group);
    let (lo_ws, lo_cf) = table[0];
    let (hi_ws, hi_cf) = table[table.len() - 1];

    if wind_speed_mph < lo_ws {
        let msg = format!(
            "Wind speed {:.0} mph is below the {:.0}-{:.0} mph spacing factor table; using Cf1 = {} at {:.0} mph.",
            wind_speed_mph, lo_ws, hi_ws, lo_cf, lo_ws
        );
        return (lo_cf, Some(msg));
    }
    if wind_speed_mph > hi_ws {
        let msg = format!(
            "Wind speed {:.0} mph is above the {:.0}-{:.0} mph spacing factor table; using Cf1 = {} at {:.0} mph.",
            wind_speed_mph, lo_ws, hi_ws, hi_cf, hi_ws
        );
        return (hi_cf, Some(msg));
    }

    for pair in table.windows(2) {
        let (ws_lo, cf_lo) = pair[0];
        let (ws_hi, cf_hi) = pair[1];
        if wind_speed_mph <= ws_hi {
            let t = (wind_speed_mph - ws_lo) / (ws_hi - ws_lo);
            return (cf_lo + t * (cf_hi - cf_lo), None);
        }
    }
    (hi_cf, None)
}

/// Exposure factor Cf2
pub fn exposure_cf2(exposure: Exposure) -> f64 {
    match exposure {
        Exposure::B => 1.0,
        Exposure::C => 0.69,
        Exposure::D => 0.57,
    }
}

/// Formula spacing and the factors that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaSpacing {
    /// Unrounded S_max (ft)
    pub max_spacing_ft: f64,
    pub cf1: f64,
    pub cf2: f64,
    pub cf3: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// Max recommended spacing from the Cf1/Cf2/Cf3 method.
pub fn compute_max_spacing_cf(record: &PostRecord, wind_speed_mph: f64, exposure: Exposure, cf3: f64) -> FormulaSpacing {
    let (cf1, diagnostic) = get_cf1(record.group, wind_speed_mph);
    let cf2 = exposure_cf2(exposure);
    FormulaSpacing {
        max_spacing_ft: record.spacing_base_ft * cf1 * cf2 * cf3,
        cf1,
        cf2,
        cf3,
        diagnostic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::PostCatalog;

    #[test]
    fn test_cf1_interpolation() {
        let (cf1, diag) = get_cf1(PostGroup::IcPipe, 115.0);
        assert!((cf1 - 2.6).abs() < 1e-12);
        assert!(diag.is_none());

        let (cf1, _) = get_cf1(PostGroup::IaHigh, 110.0);
        assert_eq!(cf1, 3.4);
    }

    #[test]
    fn test_cf1_clamps_with_diagnostic() {
        let (cf1, diag) = get_cf1(PostGroup::IcPipe, 150.0);
        assert_eq!(cf1, 2.0);
        assert!(diag.unwrap().contains("above"));

        let (cf1, diag) = get_cf1(PostGroup::IaRegular, 90.0);
        assert_eq!(cf1, 2.2);
        assert!(diag.unwrap().contains("below"));
    }

    #[test]
    fn test_table_edges_have_no_diagnostic() {
        assert!(get_cf1(PostGroup::IcPipe, 105.0).1.is_none());
        assert!(get_cf1(PostGroup::IcPipe, 130.0).1.is_none());
    }

    #[test]
    fn test_max_spacing_formula() {
        let catalog = PostCatalog::builtin();
        let post = catalog.lookup("2_3_8_SS40").unwrap();
        // 8 ft × 2.4 × 0.69 × 1.0
        let spacing = compute_max_spacing_cf(post, 120.0, Exposure::C, DEFAULT_CF3);
        assert!((spacing.max_spacing_ft - 13.248).abs() < 1e-9);
        assert_eq!(spacing.cf2, 0.69);
    }
}
