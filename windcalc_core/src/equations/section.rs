//! # Cross-Section Property Formulas
//!
//! Geometric properties of hollow circular sections (steel pipe and round
//! tube fence posts).
//!
//! ## Notation
//!
//! - `D` = Outside diameter
//! - `t` = Wall thickness
//! - `d` = Inside diameter = D - 2t
//! - `I` = Moment of inertia (second moment of area)
//! - `S` = Elastic section modulus = I / (D/2)
//!
//! ## References
//!
//! - AISC Steel Construction Manual, Part 1: Dimensions and Properties
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1

use std::f64::consts::PI;

/// Inside diameter of a hollow circular section
///
/// ```text
///        ╭───────╮
///      ╭─┤       ├─╮   t = wall
///      │ │   d   │ │
///      ╰─┤       ├─╯
///        ╰───────╯
///            D
/// ```
#[inline]
pub fn pipe_inner_diameter(od: f64, wall: f64) -> f64 {
    od - 2.0 * wall
}

/// Moment of inertia for a hollow circular section
///
/// # Formula
/// I = π(D⁴ − d⁴) / 64
///
/// # Example
/// ```rust
/// use windcalc_core::equations::section::pipe_moment_of_inertia;
///
/// // 2-3/8" OD x 0.130" wall
/// let i = pipe_moment_of_inertia(2.375, 0.130);
/// assert!((i - 0.5793).abs() < 0.001);
/// ```
#[inline]
pub fn pipe_moment_of_inertia(od: f64, wall: f64) -> f64 {
    let d = pipe_inner_diameter(od, wall);
    PI * (od.powi(4) - d.powi(4)) / 64.0
}

/// Elastic section modulus for a hollow circular section
///
/// # Formula
/// S = I / c = π(D⁴ − d⁴) / (32D)
///
/// # Example
/// ```rust
/// use windcalc_core::equations::section::pipe_section_modulus;
///
/// // 2-3/8" OD x 0.130" wall
/// let s = pipe_section_modulus(2.375, 0.130);
/// assert!((s - 0.4878).abs() < 0.001);
/// ```
///
/// # Reference
/// - AISC 360-22 Section F8 (round HSS)
#[inline]
pub fn pipe_section_modulus(od: f64, wall: f64) -> f64 {
    if od <= 0.0 {
        return 0.0;
    }
    let d = pipe_inner_diameter(od, wall);
    PI * (od.powi(4) - d.powi(4)) / (32.0 * od)
}
