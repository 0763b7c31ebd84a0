//! # Cantilever Post Formulas
//!
//! A fence post is idealized as a vertical cantilever fixed at grade with
//! the bay's wind load applied as a uniform line load over its height.
//!
//! ## Notation
//!
//! - `P` = Total lateral load on the post (w × L)
//! - `L` = Height above grade (cantilever length)
//! - `E` = Modulus of elasticity
//! - `I` = Moment of inertia
//!
//! ```text
//!    ─┬─  free end (top rail)
//!   →│
//!   →│   w = P / L
//!   →│
//!  ▨▨▨▨▨ fixed at grade
//! ```
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1, Case 2a

/// Base moment from a uniform load, acting at the resultant lever arm L/2
///
/// # Formula
/// M = P × L / 2
///
/// Units follow the inputs (lb and in ⇒ lb·in).
#[inline]
pub fn resultant_moment_at_base(p: f64, l: f64) -> f64 {
    p * (l / 2.0)
}

/// Tip deflection of a cantilever under a uniform load
///
/// # Formula (Roark's Table 8.1, Case 2a)
/// δ_max = P L³ / (8 E I)
///
/// # Arguments
/// * `p` - Total uniform load (lb)
/// * `l` - Cantilever length (in)
/// * `e` - Modulus of elasticity (psi)
/// * `i` - Moment of inertia (in⁴)
///
/// # Example
/// ```rust
/// use windcalc_core::equations::cantilever::cantilever_uniform_max_deflection;
///
/// let delta = cantilever_uniform_max_deflection(300.0, 96.0, 29_000_000.0, 0.5796);
/// assert!((delta - 1.972).abs() < 0.01);
/// ```
#[inline]
pub fn cantilever_uniform_max_deflection(p: f64, l: f64, e: f64, i: f64) -> f64 {
    if e <= 0.0 || i <= 0.0 {
        return 0.0;
    }
    p * l.powi(3) / (8.0 * e * i)
}
