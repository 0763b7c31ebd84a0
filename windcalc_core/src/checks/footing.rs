//! # Footing Lateral Resistance (IBC 1807.3)
//!
//! Round concrete pier in soil with lateral bearing increasing linearly with
//! depth at S1 (psf per ft), IBC Table 1806.2.
//!
//! ```text
//!        P ──→ at H/2 above grade
//!  ═════╪═════ grade
//!      ┃┃┃     M_ot     = P × H/2
//!      ┃┃┃ d   M_resist = S1 × b × d² / 3
//!      ┗┻┛     SF       = M_resist / M_ot
//!       b
//! ```
//!
//! Solving `M_resist = SF_req × M_ot` for d gives the minimum embedment.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::units::{round_to, Feet, Inches};

/// Required overturning safety factor
pub const REQUIRED_SF: f64 = 1.5;

/// Reported when there is no overturning moment
pub const SF_NO_DEMAND: f64 = 999.0;

/// Soil class with its allowable lateral bearing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilClass {
    pub key: &'static str,
    pub label: &'static str,
    /// psf per ft of depth
    pub lateral_bearing_psf_per_ft: f64,
}

pub const SOIL_CLASSES: [SoilClass; 6] = [
    SoilClass {
        key: "rock_crystalline",
        label: "Crystalline bedrock (Class 1)",
        lateral_bearing_psf_per_ft: 1200.0,
    },
    SoilClass {
        key: "rock_sedimentary",
        label: "Sedimentary rock (Class 2)",
        lateral_bearing_psf_per_ft: 400.0,
    },
    SoilClass {
        key: "gravel",
        label: "Sandy gravel, GW/GP (Class 3)",
        lateral_bearing_psf_per_ft: 200.0,
    },
    SoilClass {
        key: "sand",
        label: "Sand, silty sand, SW/SP/SM (Class 4)",
        lateral_bearing_psf_per_ft: 150.0,
    },
    SoilClass {
        key: "clay",
        label: "Clay, sandy clay, CL/ML (Class 5)",
        lateral_bearing_psf_per_ft: 100.0,
    },
    SoilClass {
        key: "default",
        label: "Default - stiff soil (conservative)",
        lateral_bearing_psf_per_ft: 150.0,
    },
];

/// Soil class by key; unknown keys resolve to the conservative default.
pub fn soil_class(key: &str) -> &'static SoilClass {
    SOIL_CLASSES
        .iter()
        .find(|s| s.key == key)
        .unwrap_or(&SOIL_CLASSES[SOIL_CLASSES.len() - 1])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootingResult {
    pub overturning_moment_ft_lb: f64,
    pub resisting_moment_ft_lb: f64,
    pub safety_factor: f64,
    pub footing_ok: bool,
    pub min_embedment_ft: f64,
    pub actual_embedment_ft: f64,
    pub footing_diameter_in: f64,
    /// Key actually used (after default fallback)
    pub soil_class: String,
    pub soil_label: String,
    pub lateral_bearing_psf_per_ft: f64,
    pub concrete_volume_cf: f64,
}

/// Concrete volume of a cylindrical pier (ft³)
#[inline]
pub fn pier_volume_cf(diameter_in: f64, depth_in: f64) -> f64 {
    let radius_ft = Feet::from(Inches(diameter_in)).value() / 2.0;
    PI * radius_ft.powi(2) * Feet::from(Inches(depth_in)).value()
}

/// Check footing lateral resistance against overturning.
pub fn check_footing(
    load_per_post_lb: f64,
    height_above_grade_ft: f64,
    footing_diameter_in: f64,
    embedment_depth_in: f64,
    soil_key: &str,
    required_sf: f64,
) -> FootingResult {
    let soil = soil_class(soil_key);
    let s1 = soil.lateral_bearing_psf_per_ft;

    let d_ft = Feet::from(Inches(embedment_depth_in)).value();
    let b_ft = Feet::from(Inches(footing_diameter_in)).value();

    let m_ot = load_per_post_lb * (height_above_grade_ft / 2.0);
    let m_resist = s1 * b_ft * d_ft.powi(2) / 3.0;

    let sf = if m_ot > 0.0 { m_resist / m_ot } else { SF_NO_DEMAND };
    let d_min_ft = if s1 > 0.0 && b_ft > 0.0 && m_ot > 0.0 {
        (3.0 * required_sf * m_ot / (s1 * b_ft)).sqrt()
    } else {
        d_ft
    };

    FootingResult {
        overturning_moment_ft_lb: round_to(m_ot, 1),
        resisting_moment_ft_lb: round_to(m_resist, 1),
        safety_factor: round_to(sf, 2),
        footing_ok: sf >= required_sf,
        min_embedment_ft: round_to(d_min_ft, 2),
        actual_embedment_ft: round_to(d_ft, 2),
        footing_diameter_in,
        soil_class: soil.key.to_string(),
        soil_label: soil.label.to_string(),
        lateral_bearing_psf_per_ft: s1,
        concrete_volume_cf: round_to(pier_volume_cf(footing_diameter_in, embedment_depth_in), 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_moments_round_ties_to_even() {
        // M_ot = 3.5 × 3.5 = 12.25 exactly
        let r = check_footing(3.5, 7.0, 12.0, 36.0, "sand", REQUIRED_SF);
        assert_eq!(r.overturning_moment_ft_lb, 12.2);
    }

    #[test]
    fn test_footing_hand_calc() {
        // 400 lb, 8 ft fence, 12 in × 36 in in sand
        // M_ot = 400 × 4 = 1600; M_resist = 150 × 1 × 9 / 3 = 450
        let r = check_footing(400.0, 8.0, 12.0, 36.0, "sand", REQUIRED_SF);
        assert_eq!(r.overturning_moment_ft_lb, 1600.0);
        assert_eq!(r.resisting_moment_ft_lb, 450.0);
        assert_eq!(r.safety_factor, 0.28);
        assert!(!r.footing_ok);
        // sqrt(3 × 1.5 × 1600 / 150) = 6.93 ft
        assert!((r.min_embedment_ft - 6.93).abs() < 0.005);
        assert_eq!(r.actual_embedment_ft, 3.0);
        // π × 0.5² × 3 = 2.356 ft³
        assert_eq!(r.concrete_volume_cf, 2.356);
    }

    #[test]
    fn test_rock_passes() {
        let r = check_footing(100.0, 6.0, 12.0, 36.0, "rock_crystalline", REQUIRED_SF);
        // 1200 × 9 / 3 = 3600 vs 300
        assert_eq!(r.safety_factor, 12.0);
        assert!(r.footing_ok);
    }

    #[test]
    fn test_unknown_soil_uses_default() {
        let r = check_footing(100.0, 6.0, 12.0, 30.0, "peat", REQUIRED_SF);
        assert_eq!(r.soil_class, "default");
        assert_eq!(r.soil_label, "Default - stiff soil (conservative)");
        assert_eq!(r.lateral_bearing_psf_per_ft, 150.0);
    }

    #[test]
    fn test_zero_load() {
        let r = check_footing(0.0, 8.0, 12.0, 30.0, "clay", REQUIRED_SF);
        assert_eq!(r.safety_factor, 999.0);
        assert!(r.footing_ok);
        assert_eq!(r.min_embedment_ft, 2.5);
    }
}
