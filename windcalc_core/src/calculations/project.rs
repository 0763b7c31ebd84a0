//! # Multi-Segment Project
//!
//! Runs one full bay estimate per fence segment with shared wind
//! parameters, keeps the worst status and totals the segment quantities.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "project_name": "Lot 12 perimeter",
//!   "wind_speed_mph": 115,
//!   "exposure": "C",
//!   "segments": [
//!     { "label": "North", "fence_length_ft": 180, "height_total_ft": 6, "post_spacing_ft": 10 },
//!     { "label": "Court", "fence_length_ft": 120, "height_total_ft": 10, "post_spacing_ft": 8,
//!       "fence_type": "chain_link_windscreen_80", "num_gates": 1 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::estimate::{calculate as calculate_estimate, EstimateInput, EstimateOutput};
use crate::calculations::Status;
use crate::engine::Engine;
use crate::errors::{CalcError, CalcResult};
use crate::quantities::ProjectQuantities;
use crate::settings::RiskCategory;
use crate::wind::Exposure;

fn default_fence_type() -> String {
    "chain_link_open".to_string()
}

fn default_kzt() -> f64 {
    1.0
}

/// One fence run within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentInput {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub fence_length_ft: Option<f64>,
    pub height_total_ft: f64,
    pub post_spacing_ft: f64,
    #[serde(default = "default_fence_type")]
    pub fence_type: String,
    #[serde(default)]
    pub line_post_key: Option<String>,
    #[serde(default)]
    pub terminal_post_key: Option<String>,
    #[serde(default)]
    pub gate_post_key: Option<String>,
    #[serde(default)]
    pub corner_post_key: Option<String>,
    #[serde(default)]
    pub num_gates: u32,
    #[serde(default)]
    pub num_corners: u32,
}

/// Segments sharing wind, site and footing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    #[serde(default)]
    pub project_name: Option<String>,
    pub wind_speed_mph: f64,
    #[serde(default)]
    pub exposure: Exposure,
    #[serde(default)]
    pub risk_category: RiskCategory,
    #[serde(default = "default_kzt")]
    pub kzt: f64,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub embedment_depth_in: Option<f64>,
    #[serde(default)]
    pub footing_diameter_in: Option<f64>,
    pub segments: Vec<SegmentInput>,
}

impl ProjectInput {
    /// Estimate input for one segment with the shared parameters applied.
    pub fn segment_estimate_input(&self, segment: &SegmentInput) -> EstimateInput {
        EstimateInput {
            fence_length_ft: segment.fence_length_ft,
            exposure: self.exposure,
            fence_type: segment.fence_type.clone(),
            risk_category: self.risk_category,
            kzt: self.kzt,
            soil_type: self.soil_type.clone(),
            line_post_key: segment.line_post_key.clone(),
            terminal_post_key: segment.terminal_post_key.clone(),
            gate_post_key: segment.gate_post_key.clone(),
            corner_post_key: segment.corner_post_key.clone(),
            embedment_depth_in: self.embedment_depth_in,
            footing_diameter_in: self.footing_diameter_in,
            num_gates: segment.num_gates,
            num_corners: segment.num_corners,
            ..EstimateInput::new(self.wind_speed_mph, segment.height_total_ft, segment.post_spacing_ft)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentOutput {
    pub label: String,
    pub estimate: EstimateOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectOutput {
    pub project_name: Option<String>,
    pub segments: Vec<SegmentOutput>,
    pub overall_status: Status,
    pub total_quantities: ProjectQuantities,
}

/// Evaluate every segment in order.
///
/// A segment failing validation fails the whole project; the error names
/// the offending field.
pub fn calculate(engine: &Engine, input: &ProjectInput) -> CalcResult<ProjectOutput> {
    if input.segments.is_empty() {
        return Err(CalcError::invalid_input("segments", "[]", "at least one segment is required"));
    }

    let mut segments = Vec::with_capacity(input.segments.len());
    let mut overall_status = Status::Green;

    for (index, segment) in input.segments.iter().enumerate() {
        let estimate = calculate_estimate(engine, &input.segment_estimate_input(segment))?;
        overall_status = overall_status.worst(estimate.overall_status);

        let label = if segment.label.trim().is_empty() {
            format!("Segment {}", index + 1)
        } else {
            segment.label.clone()
        };
        tracing::debug!(segment = %label, status = %estimate.overall_status, "segment evaluated");

        segments.push(SegmentOutput { label, estimate });
    }

    let total_quantities = ProjectQuantities::new(
        segments
            .iter()
            .filter_map(|s| s.estimate.quantities.clone())
            .collect(),
    );

    Ok(ProjectOutput {
        project_name: input.project_name.clone(),
        segments,
        overall_status,
        total_quantities,
    })
}
