//! # Material Quantity Takeoff
//!
//! Post counts, pier concrete, top rail and fabric for a fence run, and the
//! project-level roll-up across segments.
//!
//! ## Counting
//!
//! ```text
//! bays       = max(round(L / s), 1)     (ties to even)
//! line posts = bays − 1
//! total      = line + terminals + corners + gate posts
//! ```
//!
//! Corner and gate posts take their footing from their own record when one
//! is named, else from the terminal record.
//!
//! ## Example
//!
//! ```rust
//! use windcalc_core::posts::PostCatalog;
//! use windcalc_core::quantities::{compute_segment_quantities, TakeoffInput};
//!
//! let catalog = PostCatalog::builtin();
//! let q = compute_segment_quantities(&catalog, &TakeoffInput::new(200.0, 8.0, 10.0)).unwrap();
//! assert_eq!(q.num_line_posts, 19);
//! assert_eq!(q.fabric_sf, 1600.0);
//! ```

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::checks::pier_volume_cf;
use crate::errors::{CalcError, CalcResult};
use crate::posts::PostCatalog;
use crate::units::{is_positive, round_cf, round_cy, round_to, CubicFeet};

/// Line-post footing when the line record is unknown (dia, embed in inches)
pub const DEFAULT_LINE_FOOTING_IN: (f64, f64) = (10.0, 24.0);

/// Terminal/corner/gate footing when the terminal record is unknown
pub const DEFAULT_TERMINAL_FOOTING_IN: (f64, f64) = (16.0, 36.0);

/// Inputs for one segment's takeoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoffInput {
    pub fence_length_ft: f64,
    pub height_ft: f64,
    pub post_spacing_ft: f64,
    #[serde(default)]
    pub line_post_key: Option<String>,
    #[serde(default)]
    pub terminal_post_key: Option<String>,
    #[serde(default)]
    pub corner_post_key: Option<String>,
    #[serde(default)]
    pub gate_post_key: Option<String>,
    #[serde(default = "default_terminals")]
    pub num_terminals: u32,
    #[serde(default)]
    pub num_corners: u32,
    /// Gate posts (usually 2 per opening)
    #[serde(default)]
    pub num_gate_posts: u32,
    #[serde(default)]
    pub embedment_override_in: Option<f64>,
    #[serde(default)]
    pub footing_diameter_override_in: Option<f64>,
}

fn default_terminals() -> u32 {
    2
}

impl TakeoffInput {
    /// A straight run with two terminals and catalog-default footings.
    pub fn new(fence_length_ft: f64, height_ft: f64, post_spacing_ft: f64) -> Self {
        TakeoffInput {
            fence_length_ft,
            height_ft,
            post_spacing_ft,
            line_post_key: None,
            terminal_post_key: None,
            corner_post_key: None,
            gate_post_key: None,
            num_terminals: 2,
            num_corners: 0,
            num_gate_posts: 0,
            embedment_override_in: None,
            footing_diameter_override_in: None,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !is_positive(self.fence_length_ft) {
            return Err(CalcError::invalid_input(
                "fence_length_ft",
                self.fence_length_ft.to_string(),
                "Fence length must be positive",
            ));
        }
        if !is_positive(self.post_spacing_ft) {
            return Err(CalcError::invalid_input(
                "post_spacing_ft",
                self.post_spacing_ft.to_string(),
                "Post spacing must be positive",
            ));
        }
        if self.height_ft < 0.0 {
            return Err(CalcError::invalid_input(
                "height_ft",
                self.height_ft.to_string(),
                "Height cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Material quantities for a single fence segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentQuantities {
    pub fence_length_ft: f64,
    pub height_ft: f64,
    pub post_spacing_ft: f64,

    pub num_line_posts: u32,
    pub num_terminal_posts: u32,
    pub num_corner_posts: u32,
    pub num_gate_posts: u32,
    pub total_posts: u32,

    pub top_rail_lf: f64,
    pub fabric_sf: f64,

    pub line_footing_diameter_in: f64,
    pub line_embedment_in: f64,
    pub terminal_footing_diameter_in: f64,
    pub terminal_embedment_in: f64,
    pub corner_footing_diameter_in: f64,
    pub corner_embedment_in: f64,
    pub gate_footing_diameter_in: f64,
    pub gate_embedment_in: f64,

    pub concrete_per_line_cf: f64,
    pub concrete_per_terminal_cf: f64,
    pub concrete_per_corner_cf: f64,
    pub concrete_per_gate_cf: f64,
    pub total_concrete_cf: f64,
    pub total_concrete_cy: f64,

    /// Above grade + embedment (ft)
    pub line_post_length_ft: f64,
    pub terminal_post_length_ft: f64,
}

/// Compute material quantities for one segment.
///
/// Line posts take their footing from the line record, terminals from the
/// terminal record, corner and gate posts from their own record falling
/// back to the terminal one. Overrides win.
pub fn compute_segment_quantities(catalog: &PostCatalog, input: &TakeoffInput) -> CalcResult<SegmentQuantities> {
    input.validate()?;

    let total_bays = ((input.fence_length_ft / input.post_spacing_ft).round_ties_even() as u32).max(1);
    let num_line = total_bays.saturating_sub(1);
    let total_posts = [input.num_terminals, input.num_corners, input.num_gate_posts]
        .into_iter()
        .try_fold(num_line, u32::checked_add)
        .ok_or_else(|| CalcError::invalid_input("num_posts", "overflow", "post count is too large"))?;

    let record_footing = |key: Option<&str>, fallback: (f64, f64)| -> (f64, f64) {
        let (dia, embed) = key
            .and_then(|k| catalog.get(k))
            .and_then(|r| r.footing_defaults_in())
            .unwrap_or(fallback);
        (
            input.footing_diameter_override_in.unwrap_or(dia),
            input.embedment_override_in.unwrap_or(embed),
        )
    };
    let terminal_key = input.terminal_post_key.as_deref();
    let (line_dia, line_embed) = record_footing(input.line_post_key.as_deref(), DEFAULT_LINE_FOOTING_IN);
    let (term_dia, term_embed) = record_footing(terminal_key, DEFAULT_TERMINAL_FOOTING_IN);
    let (corner_dia, corner_embed) = record_footing(
        input.corner_post_key.as_deref().or(terminal_key),
        DEFAULT_TERMINAL_FOOTING_IN,
    );
    let (gate_dia, gate_embed) = record_footing(
        input.gate_post_key.as_deref().or(terminal_key),
        DEFAULT_TERMINAL_FOOTING_IN,
    );

    let concrete_line = pier_volume_cf(line_dia, line_embed);
    let concrete_term = pier_volume_cf(term_dia, term_embed);
    let concrete_corner = pier_volume_cf(corner_dia, corner_embed);
    let concrete_gate = pier_volume_cf(gate_dia, gate_embed);
    let total_concrete = CubicFeet(
        f64::from(num_line) * concrete_line
            + f64::from(input.num_terminals) * concrete_term
            + f64::from(input.num_corners) * concrete_corner
            + f64::from(input.num_gate_posts) * concrete_gate,
    );

    Ok(SegmentQuantities {
        fence_length_ft: round_to(input.fence_length_ft, 1),
        height_ft: round_to(input.height_ft, 1),
        post_spacing_ft: round_to(input.post_spacing_ft, 1),
        num_line_posts: num_line,
        num_terminal_posts: input.num_terminals,
        num_corner_posts: input.num_corners,
        num_gate_posts: input.num_gate_posts,
        total_posts,
        top_rail_lf: round_to(input.fence_length_ft, 1),
        fabric_sf: round_to(input.fence_length_ft * input.height_ft, 1),
        line_footing_diameter_in: line_dia,
        line_embedment_in: line_embed,
        terminal_footing_diameter_in: term_dia,
        terminal_embedment_in: term_embed,
        corner_footing_diameter_in: corner_dia,
        corner_embedment_in: corner_embed,
        gate_footing_diameter_in: gate_dia,
        gate_embedment_in: gate_embed,
        concrete_per_line_cf: round_cf(CubicFeet(concrete_line)),
        concrete_per_terminal_cf: round_cf(CubicFeet(concrete_term)),
        concrete_per_corner_cf: round_cf(CubicFeet(concrete_corner)),
        concrete_per_gate_cf: round_cf(CubicFeet(concrete_gate)),
        total_concrete_cf: round_cf(total_concrete),
        total_concrete_cy: round_cy(total_concrete),
        line_post_length_ft: round_to(input.height_ft + line_embed / 12.0, 2),
        terminal_post_length_ft: round_to(input.height_ft + term_embed / 12.0, 2),
    })
}

/// Quantities across every segment of a project.
///
/// Holds only the segment list; every total is recomputed from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectQuantities {
    segments: Vec<SegmentQuantities>,
}

impl ProjectQuantities {
    pub fn new(segments: Vec<SegmentQuantities>) -> Self {
        ProjectQuantities { segments }
    }

    pub fn segments(&self) -> &[SegmentQuantities] {
        &self.segments
    }

    pub fn total_fence_length_ft(&self) -> f64 {
        round_to(self.segments.iter().map(|s| s.fence_length_ft).sum(), 1)
    }

    pub fn total_line_posts(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.num_line_posts)).sum()
    }

    pub fn total_terminal_posts(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.num_terminal_posts)).sum()
    }

    pub fn total_corner_posts(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.num_corner_posts)).sum()
    }

    pub fn total_gate_posts(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.num_gate_posts)).sum()
    }

    pub fn total_posts(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.total_posts)).sum()
    }

    pub fn total_top_rail_lf(&self) -> f64 {
        round_to(self.segments.iter().map(|s| s.top_rail_lf).sum(), 1)
    }

    pub fn total_fabric_sf(&self) -> f64 {
        round_to(self.segments.iter().map(|s| s.fabric_sf).sum(), 1)
    }

    pub fn total_concrete_cf(&self) -> f64 {
        round_cf(self.concrete_sum())
    }

    pub fn total_concrete_cy(&self) -> f64 {
        round_cy(self.concrete_sum())
    }

    fn concrete_sum(&self) -> CubicFeet {
        CubicFeet(self.segments.iter().map(|s| s.total_concrete_cf).sum())
    }
}

impl Serialize for ProjectQuantities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProjectQuantities", 11)?;
        state.serialize_field("segments", &self.segments)?;
        state.serialize_field("fence_length_ft", &self.total_fence_length_ft())?;
        state.serialize_field("num_line_posts", &self.total_line_posts())?;
        state.serialize_field("num_terminal_posts", &self.total_terminal_posts())?;
        state.serialize_field("num_corner_posts", &self.total_corner_posts())?;
        state.serialize_field("num_gate_posts", &self.total_gate_posts())?;
        state.serialize_field("total_posts", &self.total_posts())?;
        state.serialize_field("top_rail_lf", &self.total_top_rail_lf())?;
        state.serialize_field("fabric_sf", &self.total_fabric_sf())?;
        state.serialize_field("total_concrete_cf", &self.total_concrete_cf())?;
        state.serialize_field("total_concrete_cy", &self.total_concrete_cy())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_run() {
        let catalog = PostCatalog::builtin();
        let q = compute_segment_quantities(&catalog, &TakeoffInput::new(200.0, 8.0, 10.0)).unwrap();
        assert_eq!(q.num_line_posts, 19);
        assert_eq!(q.num_terminal_posts, 2);
        assert_eq!(q.total_posts, 21);
        assert_eq!(q.top_rail_lf, 200.0);
        assert_eq!(q.fabric_sf, 1600.0);
        // Unknown records: 10×24 line, 16×36 terminal
        assert_eq!(q.concrete_per_line_cf, 1.091);
        assert_eq!(q.concrete_per_terminal_cf, 4.189);
        assert_eq!(q.line_post_length_ft, 10.0);
        assert_eq!(q.terminal_post_length_ft, 11.0);
    }

    #[test]
    fn test_concrete_totals() {
        let catalog = PostCatalog::builtin();
        let q = compute_segment_quantities(&catalog, &TakeoffInput::new(200.0, 8.0, 10.0)).unwrap();
        // 19 × 1.0908 + 2 × 4.1888 = 29.103
        assert!((q.total_concrete_cf - 29.103).abs() < 0.002);
        assert_eq!(q.total_concrete_cy, 1.08);
    }

    #[test]
    fn test_record_footings_and_overrides() {
        let catalog = PostCatalog::builtin();
        let mut input = TakeoffInput::new(100.0, 6.0, 10.0);
        input.line_post_key = Some("2_7_8_SS40".to_string());
        input.terminal_post_key = Some("4_0_PIPE".to_string());
        let q = compute_segment_quantities(&catalog, &input).unwrap();
        assert_eq!((q.line_footing_diameter_in, q.line_embedment_in), (12.0, 30.0));
        assert_eq!((q.terminal_footing_diameter_in, q.terminal_embedment_in), (18.0, 42.0));

        input.embedment_override_in = Some(48.0);
        let q = compute_segment_quantities(&catalog, &input).unwrap();
        assert_eq!(q.line_embedment_in, 48.0);
        assert_eq!(q.terminal_embedment_in, 48.0);
        assert_eq!(q.terminal_post_length_ft, 10.0);
    }

    #[test]
    fn test_corner_and_gate_posts_use_their_own_footings() {
        let catalog = PostCatalog::builtin();
        let mut input = TakeoffInput::new(100.0, 6.0, 10.0);
        input.terminal_post_key = Some("2_7_8_SS40".to_string());
        input.num_corners = 1;
        input.num_gate_posts = 2;
        let shared = compute_segment_quantities(&catalog, &input).unwrap();
        assert_eq!((shared.gate_footing_diameter_in, shared.gate_embedment_in), (12.0, 30.0));
        assert_eq!(shared.concrete_per_corner_cf, shared.concrete_per_terminal_cf);

        input.gate_post_key = Some("8_5_8_PIPE".to_string());
        input.corner_post_key = Some("4_0_PIPE".to_string());
        let sized = compute_segment_quantities(&catalog, &input).unwrap();
        assert_eq!((sized.gate_footing_diameter_in, sized.gate_embedment_in), (30.0, 54.0));
        assert_eq!((sized.corner_footing_diameter_in, sized.corner_embedment_in), (18.0, 42.0));
        assert_eq!(sized.total_posts, shared.total_posts);
        // 2 × (π × 1.25² × 4.5 − π × 0.5² × 2.5) + (π × 0.75² × 3.5 − π × 0.5² × 2.5)
        assert!((sized.total_concrete_cf - shared.total_concrete_cf - 44.473).abs() < 0.002);
    }

    #[test]
    fn test_post_count_overflow_is_invalid_input() {
        let catalog = PostCatalog::builtin();
        let mut input = TakeoffInput::new(100.0, 6.0, 10.0);
        input.num_gate_posts = u32::MAX;
        let err = compute_segment_quantities(&catalog, &input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_short_run_has_one_bay() {
        let catalog = PostCatalog::builtin();
        let mut input = TakeoffInput::new(3.0, 6.0, 10.0);
        input.num_corners = 1;
        input.num_gate_posts = 2;
        let q = compute_segment_quantities(&catalog, &input).unwrap();
        assert_eq!(q.num_line_posts, 0);
        assert_eq!(q.total_posts, 5);
    }

    #[test]
    fn test_invalid_spacing() {
        let catalog = PostCatalog::builtin();
        let err = compute_segment_quantities(&catalog, &TakeoffInput::new(100.0, 6.0, 0.0)).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_project_totals_derive_from_segments() {
        let catalog = PostCatalog::builtin();
        let a = compute_segment_quantities(&catalog, &TakeoffInput::new(200.0, 8.0, 10.0)).unwrap();
        let b = compute_segment_quantities(&catalog, &TakeoffInput::new(100.0, 6.0, 10.0)).unwrap();
        let project = ProjectQuantities::new(vec![a.clone(), b.clone()]);

        assert_eq!(project.total_line_posts(), 19 + 9);
        assert_eq!(project.total_posts(), u64::from(a.total_posts + b.total_posts));
        assert_eq!(project.total_fabric_sf(), 2200.0);
        assert_eq!(project.total_fence_length_ft(), 300.0);

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["num_line_posts"], 28);
        assert_eq!(json["segments"].as_array().unwrap().len(), 2);
    }
}
