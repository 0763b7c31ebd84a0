//! # Wind Module
//!
//! Design pressure on fence surfaces, plus a ZIP-code wind speed aid.
//!
//! ## Modules
//!
//! - [`pressure`] - ASCE 7-22 Kz, qz, Cf and the design pressure snapshot
//! - [`speed_lookup`] - Approximate basic wind speed by ZIP prefix

pub mod pressure;
pub mod speed_lookup;

pub use pressure::{
    compute_cf, compute_cf_solid, compute_design_pressure, compute_kz, compute_qz, fence_type, solidity_for,
    DesignPressureResult, Exposure, FenceTypeInfo, ASCE7_EDITION, FENCE_TYPES, G_RIGID, KD_FENCE,
};
pub use speed_lookup::{lookup_wind_speed, risk_multiplier, WindSpeedEstimate};
