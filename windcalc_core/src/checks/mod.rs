//! # Structural Checks
//!
//! Three independent checks against a post's tributary load:
//!
//! - [`bending`] - ASD cantilever bending (demand vs Fy·S/Ω)
//! - [`deflection`] - tip deflection vs L/60
//! - [`footing`] - pier overturning vs soil lateral bearing (IBC 1807.3)
//!
//! A failing check is never an error. It is reported in the result and the
//! block evaluator decides whether it affects status.

pub mod bending;
pub mod deflection;
pub mod footing;

pub use bending::{bending_capacity_lb_in, check_bending, BendingCheck, OMEGA_BENDING};
pub use deflection::{check_deflection, DeflectionResult, E_STEEL_PSI};
pub use footing::{check_footing, pier_volume_cf, soil_class, FootingResult, SoilClass, REQUIRED_SF, SOIL_CLASSES};
