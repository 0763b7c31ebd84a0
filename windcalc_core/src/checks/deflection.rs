//! Serviceability deflection check for a cantilevered post.

use serde::{Deserialize, Serialize};

use crate::equations::cantilever_uniform_max_deflection;
use crate::posts::PostRecord;
use crate::units::{round_ratio, round_to, Feet, Inches};

/// Modulus of elasticity for steel (psi)
pub const E_STEEL_PSI: f64 = 29_000_000.0;

/// Deflection limit denominator (L/60)
pub const DEFLECTION_LIMIT_RATIO: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeflectionResult {
    /// Tip deflection (in, 3 dp)
    pub deflection_in: f64,
    /// L/60 (in, 3 dp)
    pub allowable_in: f64,
    pub deflection_ok: bool,
    /// deflection / allowable (3 dp), 0 when the limit is 0
    pub ratio: f64,
}

/// Deflection under the bay load, or None when the record has no moment of
/// inertia (non-pipe geometry).
pub fn check_deflection(record: &PostRecord, height_ft: f64, load_per_post_lb: f64) -> Option<DeflectionResult> {
    let Some(i) = record.moment_of_inertia_in4() else {
        tracing::debug!(post_key = %record.key, "deflection check skipped: no pipe geometry");
        return None;
    };

    let length = Inches::from(Feet(height_ft)).value();
    let delta = cantilever_uniform_max_deflection(load_per_post_lb, length, E_STEEL_PSI, i);
    let limit = length / DEFLECTION_LIMIT_RATIO;
    let ratio = if limit > 0.0 { delta / limit } else { 0.0 };

    Some(DeflectionResult {
        deflection_in: round_to(delta, 3),
        allowable_in: round_to(limit, 3),
        deflection_ok: delta <= limit,
        ratio: round_ratio(ratio),
    })
}
