//! # windcalc_core - Fence Wind-Load Estimating Engine
//!
//! `windcalc_core` estimates wind demand on freestanding fences and selects
//! and checks the posts and footings that resist it. All inputs and outputs
//! are JSON-serializable so the same structures feed a CLI, a web form or a
//! report renderer.
//!
//! ## Methodology
//!
//! - **Pressure**: ASCE 7-22 velocity pressure (Kz, Kzt, Kd) with the
//!   Figure 29.3-1 force coefficient scaled by fence solidity
//! - **Bending**: ASD cantilever, `M_allow = Fy × S / 1.67`
//! - **Deflection**: `P·L³ / (8EI)` against L/60
//! - **Footing**: IBC 1807.3 lateral soil bearing, SF ≥ 1.5
//!
//! ## Design Philosophy
//!
//! - **Injected state**: catalog, settings and spacing tables live in an
//!   [`Engine`] passed by reference; no globals
//! - **Diagnostics, not side channels**: every fallback taken is returned in
//!   the result
//! - **Status, not errors**: structural inadequacy is a RED/YELLOW verdict;
//!   only bad input (and strict footing mode) fails
//!
//! ## Quick Start
//!
//! ```rust
//! use windcalc_core::{Engine, EstimateInput, Status};
//!
//! let engine = Engine::with_defaults();
//!
//! let mut input = EstimateInput::new(150.0, 12.0, 6.0);
//! input.terminal_post_key = Some("2_3_8_SS40".to_string());
//!
//! let out = engine.estimate(&input).unwrap();
//! assert_eq!(out.overall_status, Status::Red);
//!
//! let json = serde_json::to_string_pretty(&out).unwrap();
//! assert!(json.contains("\"overall_status\": \"RED\""));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Bay estimate and multi-segment project
//! - [`wind`] - Design pressure and ZIP wind-speed lookup
//! - [`posts`] - Post catalog, spacing formula and manufacturer tables
//! - [`checks`] - Bending, deflection and footing checks
//! - [`selection`] - Member auto-selection
//! - [`risk`] - Status classification and reasons
//! - [`quantities`] - Material takeoff
//! - [`concrete`] - Hole-by-hole concrete estimate
//! - [`settings`] - Engine settings and risk categories
//! - [`units`] - Unit wrappers and output rounding
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod checks;
pub mod concrete;
pub mod engine;
pub mod equations;
pub mod errors;
pub mod posts;
pub mod quantities;
pub mod risk;
pub mod selection;
pub mod settings;
pub mod units;
pub mod wind;

// Re-export commonly used types at crate root for convenience
pub use calculations::{EstimateInput, EstimateOutput, PostRole, ProjectInput, ProjectOutput, SegmentInput, Status};
pub use engine::Engine;
pub use errors::{CalcError, CalcResult};
pub use posts::{PostCatalog, PostRecord};
pub use settings::{RiskCategory, Settings};
pub use wind::Exposure;
