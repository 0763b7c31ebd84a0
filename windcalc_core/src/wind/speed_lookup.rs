//! # ZIP Code Wind Speed Aid
//!
//! Approximate ASCE 7-22 basic wind speeds by 3-digit ZIP prefix, for Risk
//! Category II, scaled for other risk categories. This is an estimating aid
//! only; project drawings or the ASCE hazard maps govern.
//!
//! ```rust
//! use windcalc_core::settings::RiskCategory;
//! use windcalc_core::wind::lookup_wind_speed;
//!
//! let hit = lookup_wind_speed("33101", RiskCategory::II);
//! assert_eq!(hit.wind_speed_mph, Some(170));
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::settings::RiskCategory;

/// (prefix range, Risk Cat II speed in mph, region). Later rows override
/// earlier ones where ranges overlap.
const REGIONS: &[(u16, u16, u32, &str)] = &[
    (320, 340, 150, "Florida"),
    (330, 335, 170, "South Florida Coast"),
    (339, 340, 160, "Florida Keys"),
    (700, 715, 130, "Louisiana"),
    (770, 780, 130, "Texas Gulf Coast"),
    (780, 800, 115, "Texas Interior"),
    (386, 398, 120, "Mississippi"),
    (350, 370, 115, "Alabama"),
    (270, 290, 130, "North Carolina Coast"),
    (290, 300, 130, "South Carolina"),
    (300, 320, 120, "Georgia"),
    (220, 247, 115, "Virginia"),
    (230, 237, 125, "Virginia Tidewater"),
    (200, 220, 115, "DC / Maryland"),
    (206, 219, 115, "Maryland"),
    (100, 150, 110, "New York"),
    (150, 200, 105, "Pennsylvania"),
    (10, 70, 115, "New England"),
    (70, 90, 110, "New Jersey / Connecticut"),
    (400, 430, 105, "Kentucky"),
    (430, 460, 105, "Ohio"),
    (460, 480, 105, "Indiana"),
    (480, 500, 105, "Michigan"),
    (500, 530, 105, "Iowa / Minnesota"),
    (530, 550, 105, "Wisconsin"),
    (550, 570, 105, "Minnesota"),
    (570, 590, 115, "South Dakota"),
    (590, 600, 105, "Montana"),
    (600, 630, 105, "Illinois"),
    (630, 660, 105, "Missouri"),
    (660, 680, 115, "Kansas"),
    (680, 700, 115, "Nebraska"),
    (800, 840, 110, "Colorado / Wyoming"),
    (840, 850, 105, "Utah"),
    (850, 870, 105, "Arizona"),
    (870, 885, 110, "New Mexico"),
    (900, 935, 95, "California (Southern)"),
    (935, 970, 95, "California (Northern)"),
    (970, 980, 95, "Oregon"),
    (980, 995, 95, "Washington"),
    (995, 1000, 120, "Alaska"),
    (967, 968, 105, "Hawaii"),
    (968, 969, 130, "Hawaii (Windward)"),
];

static ZIP_WIND_MAP: Lazy<HashMap<u16, (u32, &'static str)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &(start, end, speed, region) in REGIONS {
        for prefix in start..end {
            map.insert(prefix, (speed, region));
        }
    }
    map
});

/// Approximate scale from the Risk Category II map speed
pub fn risk_multiplier(risk: RiskCategory) -> f64 {
    match risk {
        RiskCategory::I => 0.87,
        RiskCategory::II => 1.00,
        RiskCategory::III => 1.10,
        RiskCategory::IV => 1.15,
    }
}

/// Result of a ZIP lookup. `wind_speed_mph` is `None` when the ZIP is
/// malformed or its prefix is not tabulated; `region` then explains why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindSpeedEstimate {
    pub zip_code: String,
    pub risk_category: RiskCategory,
    pub wind_speed_mph: Option<u32>,
    pub region: String,
}

/// Look up an approximate design wind speed from a US ZIP code.
pub fn lookup_wind_speed(zip_code: &str, risk_category: RiskCategory) -> WindSpeedEstimate {
    let zip = zip_code.trim();
    let miss = |reason: &str| WindSpeedEstimate {
        zip_code: zip.to_string(),
        risk_category,
        wind_speed_mph: None,
        region: reason.to_string(),
    };

    let prefix = match zip.get(..3) {
        Some(p) if p.bytes().all(|b| b.is_ascii_digit()) => p,
        _ => return miss("Invalid ZIP code"),
    };
    let Ok(prefix) = prefix.parse::<u16>() else {
        return miss("Invalid ZIP code");
    };

    match ZIP_WIND_MAP.get(&prefix) {
        Some(&(base_speed, region)) => WindSpeedEstimate {
            zip_code: zip.to_string(),
            risk_category,
            wind_speed_mph: Some((base_speed as f64 * risk_multiplier(risk_category)).round_ties_even() as u32),
            region: region.to_string(),
        },
        None => miss("ZIP code region not in database"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_in_order() {
        assert_eq!(lookup_wind_speed("32801", RiskCategory::II).wind_speed_mph, Some(150));
        assert_eq!(lookup_wind_speed("33101", RiskCategory::II).wind_speed_mph, Some(170));
        let keys = lookup_wind_speed("33901", RiskCategory::II);
        assert_eq!(keys.wind_speed_mph, Some(160));
        assert_eq!(keys.region, "Florida Keys");
        assert_eq!(lookup_wind_speed("96813", RiskCategory::II).region, "Hawaii (Windward)");
    }

    #[test]
    fn test_leading_zero_prefix() {
        let boston = lookup_wind_speed("02108", RiskCategory::II);
        assert_eq!(boston.wind_speed_mph, Some(115));
        assert_eq!(boston.region, "New England");
    }

    #[test]
    fn test_risk_category_scaling() {
        // Texas Gulf Coast: 130 mph base
        assert_eq!(lookup_wind_speed("77001", RiskCategory::III).wind_speed_mph, Some(143));
        // Ohio: 105 mph base
        assert_eq!(lookup_wind_speed("43001", RiskCategory::IV).wind_speed_mph, Some(121));
        assert_eq!(lookup_wind_speed("43001", RiskCategory::I).wind_speed_mph, Some(91));
    }

    #[test]
    fn test_invalid_and_unknown() {
        let short = lookup_wind_speed("12", RiskCategory::II);
        assert_eq!(short.wind_speed_mph, None);
        assert_eq!(short.region, "Invalid ZIP code");

        assert_eq!(lookup_wind_speed("ab123", RiskCategory::II).region, "Invalid ZIP code");

        let unknown = lookup_wind_speed("00501", RiskCategory::II);
        assert_eq!(unknown.wind_speed_mph, None);
        assert_eq!(unknown.region, "ZIP code region not in database");
    }
}
