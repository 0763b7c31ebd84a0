//! # Structural Mechanics Equations
//!
//! Closed-form formulas used by the post checks. Keeping them in one place
//! makes them easy to verify against the references.
//!
//! ## Modules
//!
//! - [`section`] - Hollow circular section properties (S, I)
//! - [`cantilever`] - Cantilever posts fixed at grade under uniform wind load
//!
//! ## References
//!
//! - AISC 360-22: Specification for Structural Steel Buildings
//! - Roark's Formulas for Stress and Strain, 8th Edition

pub mod cantilever;
pub mod section;

pub use cantilever::{
    cantilever_uniform_max_deflection,
    resultant_moment_at_base,
};
pub use section::{
    pipe_inner_diameter,
    pipe_moment_of_inertia,
    pipe_section_modulus,
};
