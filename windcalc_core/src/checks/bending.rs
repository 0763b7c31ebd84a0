//! Cantilever bending check (AISC 360 ASD).
//!
//! ```text
//! M_demand = P × (H/2) × 12          (lb·in, uniform load resultant)
//! M_allow  = Fy × 1000 × S / Ω       (Ω = 1.67)
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::resultant_moment_at_base;
use crate::posts::PostRecord;
use crate::units::{Ksi, Psi};

/// ASD safety factor for flexure, AISC 360 Chapter F
pub const OMEGA_BENDING: f64 = 1.67;

/// Allowable moment (lb·in) for a section modulus and yield strength.
#[inline]
pub fn bending_capacity_lb_in(section_modulus_in3: f64, fy_ksi: f64) -> f64 {
    Psi::from(Ksi(fy_ksi)).value() * section_modulus_in3 / OMEGA_BENDING
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendingCheck {
    pub demand_lb_in: f64,
    pub allow_lb_in: f64,
    pub ok: bool,
    /// True when the record has no section data
    pub skipped: bool,
}

impl BendingCheck {
    /// demand / allowable, or None when the check did not run
    pub fn ratio(&self) -> Option<f64> {
        if self.skipped || self.allow_lb_in <= 0.0 {
            None
        } else {
            Some(self.demand_lb_in / self.allow_lb_in)
        }
    }
}

/// Bending check for a post carrying `load_per_post_lb` over `height_ft`.
pub fn check_bending(record: &PostRecord, height_ft: f64, load_per_post_lb: f64) -> BendingCheck {
    let Some(s) = record.section_modulus_in3() else {
        return BendingCheck {
            demand_lb_in: 0.0,
            allow_lb_in: 0.0,
            ok: true,
            skipped: true,
        };
    };

    let allow = bending_capacity_lb_in(s, record.fy_ksi);
    let demand = resultant_moment_at_base(load_per_post_lb, height_ft * 12.0);

    BendingCheck {
        demand_lb_in: demand,
        allow_lb_in: allow,
        ok: demand <= allow,
        skipped: false,
    }
}
