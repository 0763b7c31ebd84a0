//! # Bay Estimate
//!
//! Evaluates one representative bay of a fence run: shared design pressure
//! and tributary load, then a line-post block and a terminal-post block.
//!
//! ## Pipeline
//!
//! ```text
//! EstimateInput
//!   → compute_design_pressure        (wind::pressure)
//!   → total = p × H × s, per post = total / 2
//!   → evaluate_block(Line)           (selection, spacing, checks, status)
//!   → evaluate_block(Terminal)
//!   → risk::classify_blocks          (overall status + reasons)
//!   → compute_segment_quantities     (when a fence length is given)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use windcalc_core::calculations::estimate::{calculate, EstimateInput};
//! use windcalc_core::engine::Engine;
//!
//! let engine = Engine::with_defaults();
//! let mut input = EstimateInput::new(120.0, 8.0, 10.0);
//! input.fence_type = "solid_panel".to_string();
//!
//! let out = calculate(&engine, &input).unwrap();
//! assert!((out.shared.pressure_psf - 33.9).abs() < 1.0);
//! println!("{} / {}", out.line.post_key, out.overall_status);
//! ```

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::calculations::{PostRole, Status};
use crate::checks::{check_bending, check_deflection, check_footing, DeflectionResult, FootingResult, REQUIRED_SF};
use crate::engine::Engine;
use crate::errors::{CalcError, CalcResult};
use crate::posts::{compute_max_spacing_cf, LabelResolution, DEFAULT_CF3};
use crate::quantities::{compute_segment_quantities, SegmentQuantities, TakeoffInput};
use crate::risk::{classify_blocks, RiskDetails};
use crate::selection::{MemberOverride, Recommendation};
use crate::settings::RiskCategory;
use crate::units::{is_positive, round_moment_ftlb, round_ratio, round_spacing_ft, round_to, InLb};
use crate::wind::{compute_design_pressure, fence_type, DesignPressureResult, Exposure};

/// Spacing ratio above which a block is RED
pub const SPACING_RED: f64 = 1.0;
/// Spacing ratio above which a block is YELLOW
pub const SPACING_YELLOW: f64 = 0.85;
/// Terminal bending ratio above which the terminal block is RED
pub const TERMINAL_MOMENT_RED: f64 = 1.0;
/// Terminal bending ratio above which the terminal block is YELLOW
pub const TERMINAL_MOMENT_YELLOW: f64 = 0.80;

fn default_fence_type() -> String {
    "chain_link_open".to_string()
}

fn default_kzt() -> f64 {
    1.0
}

/// Input for a single-bay estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "wind_speed_mph": 115,
///   "height_total_ft": 6,
///   "post_spacing_ft": 10,
///   "fence_length_ft": 250,
///   "exposure": "C",
///   "fence_type": "chain_link_windscreen_50",
///   "terminal_post_key": "2_7_8_SS40",
///   "num_gates": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    /// Basic wind speed V (mph, 3-s gust)
    pub wind_speed_mph: f64,
    /// Fence height above grade (ft)
    pub height_total_ft: f64,
    /// Center-to-center post spacing (ft)
    pub post_spacing_ft: f64,
    /// Total run length (ft). Enables B/s and quantity takeoff.
    #[serde(default)]
    pub fence_length_ft: Option<f64>,
    #[serde(default)]
    pub exposure: Exposure,
    /// Fence type registry key
    #[serde(default = "default_fence_type")]
    pub fence_type: String,
    #[serde(default)]
    pub risk_category: RiskCategory,
    /// Topographic factor, ≥ 1.0
    #[serde(default = "default_kzt")]
    pub kzt: f64,
    #[serde(default)]
    pub soil_type: Option<String>,

    /// Legacy single-member override applied to both roles
    #[serde(default)]
    pub post_key: Option<String>,
    /// Legacy display-label override, resolved through label normalization
    #[serde(default)]
    pub post_size: Option<String>,
    #[serde(default)]
    pub line_post_key: Option<String>,
    #[serde(default)]
    pub terminal_post_key: Option<String>,
    /// Gate post member; sizes gate footings in the takeoff
    #[serde(default)]
    pub gate_post_key: Option<String>,
    /// Corner post member; sizes corner footings in the takeoff
    #[serde(default)]
    pub corner_post_key: Option<String>,

    #[serde(default)]
    pub embedment_depth_in: Option<f64>,
    #[serde(default)]
    pub footing_diameter_in: Option<f64>,
    #[serde(default)]
    pub num_gates: u32,
    #[serde(default)]
    pub num_corners: u32,
}

impl EstimateInput {
    /// Minimal input with defaults for everything but V, H and spacing.
    pub fn new(wind_speed_mph: f64, height_total_ft: f64, post_spacing_ft: f64) -> Self {
        EstimateInput {
            wind_speed_mph,
            height_total_ft,
            post_spacing_ft,
            fence_length_ft: None,
            exposure: Exposure::default(),
            fence_type: default_fence_type(),
            risk_category: RiskCategory::default(),
            kzt: default_kzt(),
            soil_type: None,
            post_key: None,
            post_size: None,
            line_post_key: None,
            terminal_post_key: None,
            gate_post_key: None,
            corner_post_key: None,
            embedment_depth_in: None,
            footing_diameter_in: None,
            num_gates: 0,
            num_corners: 0,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("wind_speed_mph", self.wind_speed_mph),
            ("height_total_ft", self.height_total_ft),
            ("post_spacing_ft", self.post_spacing_ft),
        ];
        for (field, value) in positive {
            if !is_positive(value) {
                return Err(CalcError::invalid_input(field, value.to_string(), "must be greater than zero"));
            }
        }

        if let Some(length) = self.fence_length_ft {
            if !length.is_finite() || length < 0.0 {
                return Err(CalcError::invalid_input(
                    "fence_length_ft",
                    length.to_string(),
                    "must be zero or greater",
                ));
            }
        }

        if !self.kzt.is_finite() || self.kzt < 1.0 {
            return Err(CalcError::invalid_input("kzt", self.kzt.to_string(), "must be at least 1.0"));
        }

        let overrides = [
            ("embedment_depth_in", self.embedment_depth_in),
            ("footing_diameter_in", self.footing_diameter_in),
        ];
        for (field, value) in overrides {
            if let Some(v) = value {
                if !is_positive(v) {
                    return Err(CalcError::invalid_input(field, v.to_string(), "must be greater than zero"));
                }
            }
        }

        self.gate_post_count()?;

        Ok(())
    }

    /// Two posts per gate opening
    pub fn gate_post_count(&self) -> CalcResult<u32> {
        self.num_gates.checked_mul(2).ok_or_else(|| {
            CalcError::invalid_input("num_gates", self.num_gates.to_string(), "too many gates")
        })
    }

    /// Tributary area of one bay (ft²)
    pub fn area_per_bay_ft2(&self) -> f64 {
        self.height_total_ft * self.post_spacing_ft
    }

    /// B/s for the Cf lookup, when a run length is known
    pub fn aspect_ratio_bs(&self) -> Option<f64> {
        match self.fence_length_ft {
            Some(length) if length > 0.0 && self.height_total_ft > 0.0 => Some(length / self.height_total_ft),
            _ => None,
        }
    }

    /// Member override for a role: role-specific key, then the shared
    /// `post_key`, then the legacy `post_size` label.
    pub fn member_override(&self, role: PostRole) -> Option<MemberOverride> {
        let role_key = match role {
            PostRole::Line => self.line_post_key.as_deref(),
            PostRole::Terminal => self.terminal_post_key.as_deref(),
        };
        MemberOverride::parse(role_key)
            .or_else(|| MemberOverride::parse(self.post_key.as_deref()))
            .or_else(|| MemberOverride::parse(self.post_size.as_deref()))
    }

    fn soil_key<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.soil_type.as_deref().map(str::trim) {
            Some(soil) if !soil.is_empty() => soil,
            _ => fallback,
        }
    }
}

/// Pressure and load shared by both blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedResult {
    pub pressure_psf: f64,
    pub post_spacing_ft: f64,
    pub area_per_bay_ft2: f64,
    pub total_load_lb: f64,
    pub load_per_post_lb: f64,
    pub design_params: DesignPressureResult,
}

/// Where a block's max spacing came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SpacingSource {
    /// Manufacturer table for the selected wind-speed bucket
    Table { table_wind_speed_mph: u32 },
    /// S_base × Cf1 × Cf2 × Cf3
    Formula { cf1: f64, cf2: f64, cf3: f64 },
}

/// Result for one structural role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResult {
    pub role: PostRole,
    pub post_key: String,
    pub post_label: String,
    pub recommended: Recommendation,
    pub max_spacing_ft: f64,
    pub spacing_source: SpacingSource,
    #[serde(rename = "M_demand_ft_lb")]
    pub m_demand_ft_lb: f64,
    #[serde(rename = "M_allow_ft_lb")]
    pub m_allow_ft_lb: f64,
    pub moment_ok: bool,
    /// Bending not evaluated (record has no section geometry)
    pub bending_skipped: bool,
    pub spacing_ratio: Option<f64>,
    pub moment_ratio: Option<f64>,
    pub footing: FootingResult,
    pub deflection: Option<DeflectionResult>,
    /// Status-affecting conditions and general cautions
    pub warnings: Vec<String>,
    pub assumptions: Vec<String>,
    /// Checks that failed without affecting status
    pub advisories: Vec<String>,
    /// Fallbacks taken while resolving members and tables
    pub diagnostics: Vec<String>,
    pub status: Status,
}

/// Flat fields kept for callers of the single-block output shape.
///
/// Built on demand from `shared` and the line block; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct LegacyView<'a> {
    pub pressure_psf: f64,
    pub area_per_bay_ft2: f64,
    pub total_load_lb: f64,
    pub load_per_post_lb: f64,
    pub recommended: &'a Recommendation,
    pub warnings: Vec<&'a str>,
    pub assumptions: &'a [String],
    pub max_spacing_ft: f64,
    #[serde(rename = "M_demand_ft_lb")]
    pub m_demand_ft_lb: f64,
    #[serde(rename = "M_allow_ft_lb")]
    pub m_allow_ft_lb: f64,
}

/// Full estimate result.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateOutput {
    pub shared: SharedResult,
    pub line: BlockResult,
    pub terminal: BlockResult,
    pub overall_status: Status,
    pub quantities: Option<SegmentQuantities>,
    pub risk: RiskDetails,
}

impl EstimateOutput {
    pub fn legacy(&self) -> LegacyView<'_> {
        LegacyView {
            pressure_psf: self.shared.pressure_psf,
            area_per_bay_ft2: self.shared.area_per_bay_ft2,
            total_load_lb: self.shared.total_load_lb,
            load_per_post_lb: self.shared.load_per_post_lb,
            recommended: &self.line.recommended,
            warnings: self
                .line
                .warnings
                .iter()
                .chain(self.terminal.warnings.iter())
                .map(String::as_str)
                .collect(),
            assumptions: &self.line.assumptions,
            max_spacing_ft: self.line.max_spacing_ft,
            m_demand_ft_lb: self.line.m_demand_ft_lb,
            m_allow_ft_lb: self.line.m_allow_ft_lb,
        }
    }

    pub fn block(&self, role: PostRole) -> &BlockResult {
        match role {
            PostRole::Line => &self.line,
            PostRole::Terminal => &self.terminal,
        }
    }

    /// Every diagnostic from both blocks, line first
    pub fn diagnostics(&self) -> impl Iterator<Item = &str> {
        self.line
            .diagnostics
            .iter()
            .chain(self.terminal.diagnostics.iter())
            .map(String::as_str)
    }
}

#[derive(Serialize)]
struct EstimateOutputWire<'a> {
    shared: &'a SharedResult,
    line: &'a BlockResult,
    terminal: &'a BlockResult,
    overall_status: Status,
    quantities: Option<&'a SegmentQuantities>,
    risk: &'a RiskDetails,
    #[serde(flatten)]
    legacy: LegacyView<'a>,
}

impl Serialize for EstimateOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EstimateOutputWire {
            shared: &self.shared,
            line: &self.line,
            terminal: &self.terminal,
            overall_status: self.overall_status,
            quantities: self.quantities.as_ref(),
            risk: &self.risk,
            legacy: self.legacy(),
        }
        .serialize(serializer)
    }
}

/// Shared design pressure and tributary loads for an input.
pub fn compute_shared(input: &EstimateInput) -> SharedResult {
    let solidity = fence_type(&input.fence_type).map_or(1.0, |info| info.solidity);
    let design_params = compute_design_pressure(
        input.wind_speed_mph,
        input.height_total_ft,
        input.exposure,
        solidity,
        input.kzt,
        &input.fence_type,
        input.aspect_ratio_bs(),
    );

    let pressure_psf = design_params.design_pressure_psf;
    let area = input.area_per_bay_ft2();
    let total_load_lb = round_to(pressure_psf * area, 2);
    let load_per_post_lb = round_to(total_load_lb / 2.0, 2);

    SharedResult {
        pressure_psf,
        post_spacing_ft: input.post_spacing_ft,
        area_per_bay_ft2: round_to(area, 2),
        total_load_lb,
        load_per_post_lb,
        design_params,
    }
}

/// Status for one block from its ratios.
pub fn block_status(role: PostRole, spacing_ratio: Option<f64>, moment_ratio: Option<f64>) -> Status {
    let mut status = Status::Green;

    if let Some(ratio) = spacing_ratio {
        if ratio > SPACING_RED {
            status = Status::Red;
        } else if ratio > SPACING_YELLOW {
            status = Status::Yellow;
        }
    }

    // Line-post bending is advisory and never enters here.
    if role == PostRole::Terminal {
        if let Some(ratio) = moment_ratio {
            if ratio > TERMINAL_MOMENT_RED {
                status = Status::Red;
            } else if ratio > TERMINAL_MOMENT_YELLOW {
                status = status.worst(Status::Yellow);
            }
        }
    }

    status
}

/// Evaluate one role against the shared load.
pub fn evaluate_block(
    engine: &Engine,
    role: PostRole,
    member: Option<&MemberOverride>,
    input: &EstimateInput,
    shared: &SharedResult,
    assumptions: &[String],
) -> CalcResult<BlockResult> {
    let load = shared.load_per_post_lb;
    let height = input.height_total_ft;
    let ws = input.wind_speed_mph;

    let selection = engine.selector().select(load, height, member)?;
    let mut diagnostics = selection.diagnostics;
    let recommended = selection.recommendation;
    let record = engine.catalog().lookup(&recommended.post_key)?;

    let mut warnings = general_warnings(input, shared.pressure_psf, load);
    let mut advisories = Vec::new();

    // Max spacing: table first, formula otherwise
    let (max_spacing_ft, spacing_source) = match engine.tables().lookup(record, ws, height) {
        Some(hit) => (
            round_spacing_ft(hit.spacing_ft),
            SpacingSource::Table {
                table_wind_speed_mph: hit.table_wind_speed_mph,
            },
        ),
        None => {
            let formula = compute_max_spacing_cf(record, ws, input.exposure, DEFAULT_CF3);
            if let Some(diagnostic) = formula.diagnostic {
                diagnostics.push(diagnostic);
            }
            (
                round_spacing_ft(formula.max_spacing_ft),
                SpacingSource::Formula {
                    cf1: formula.cf1,
                    cf2: formula.cf2,
                    cf3: formula.cf3,
                },
            )
        }
    };

    if input.post_spacing_ft > max_spacing_ft {
        warnings.push(format!(
            "For post {} at {:.0} mph and exposure {}, max recommended spacing is about {:.2} ft; \
             current spacing {:.2} ft exceeds this simplified limit.",
            record.label, ws, input.exposure, max_spacing_ft, input.post_spacing_ft
        ));
    }

    let bending = check_bending(record, height, load);

    let embedment_in = input.embedment_depth_in.unwrap_or(recommended.embedment_in);
    let diameter_in = input.footing_diameter_in.unwrap_or(recommended.footing_diameter_in);
    let soil = input.soil_key(&engine.settings().default_soil_class);
    let footing = check_footing(load, height, diameter_in, embedment_in, soil, REQUIRED_SF);
    if !footing.footing_ok {
        advisories.push(format!(
            "Footing SF = {:.2} (need >= 1.50). Min embedment: {:.1} ft ({:.0} in).",
            footing.safety_factor,
            footing.min_embedment_ft,
            footing.min_embedment_ft * 12.0
        ));
    }

    let deflection = check_deflection(record, height, load);
    if let Some(d) = deflection.as_ref().filter(|d| !d.deflection_ok) {
        advisories.push(format!(
            "Deflection {:.2} in exceeds L/60 limit of {:.2} in. Consider a stiffer post.",
            d.deflection_in, d.allowable_in
        ));
    }

    let spacing_ratio = (max_spacing_ft > 0.0).then(|| round_ratio(input.post_spacing_ft / max_spacing_ft));
    let moment_ratio = bending.ratio().map(round_ratio);

    let status = block_status(role, spacing_ratio, moment_ratio);

    match (role, moment_ratio) {
        (PostRole::Terminal, Some(ratio)) if ratio > TERMINAL_MOMENT_RED => {
            warnings.push("Terminal bending exceeds capacity; increase post size or reduce spacing.".to_string());
        }
        (PostRole::Line, Some(ratio)) if ratio > 1.0 => {
            advisories.push(format!(
                "Line post bending at {:.0}% of simplified cantilever capacity (advisory; rail and fabric restrain line posts).",
                ratio * 100.0
            ));
        }
        _ => {}
    }

    tracing::debug!(
        role = role.name(),
        post_key = %record.key,
        ?spacing_ratio,
        ?moment_ratio,
        status = %status,
        "block evaluated"
    );

    Ok(BlockResult {
        role,
        post_key: record.key.clone(),
        post_label: record.label.clone(),
        recommended,
        max_spacing_ft,
        spacing_source,
        m_demand_ft_lb: round_moment_ftlb(InLb(bending.demand_lb_in)),
        m_allow_ft_lb: round_moment_ftlb(InLb(bending.allow_lb_in)),
        moment_ok: bending.ok,
        bending_skipped: bending.skipped,
        spacing_ratio,
        moment_ratio,
        footing,
        deflection,
        warnings,
        assumptions: assumptions.to_vec(),
        advisories,
        diagnostics,
        status,
    })
}

/// Run the full single-bay estimate.
pub fn calculate(engine: &Engine, input: &EstimateInput) -> CalcResult<EstimateOutput> {
    input.validate()?;

    let shared = compute_shared(input);
    let assumptions = build_assumptions(input, &shared.design_params);

    let line_member = input.member_override(PostRole::Line);
    let terminal_member = input.member_override(PostRole::Terminal);

    let line = evaluate_block(engine, PostRole::Line, line_member.as_ref(), input, &shared, &assumptions)?;
    let mut terminal = evaluate_block(
        engine,
        PostRole::Terminal,
        terminal_member.as_ref(),
        input,
        &shared,
        &assumptions,
    )?;

    let (overall_status, risk) = classify_blocks(&line, &terminal, shared.post_spacing_ft);

    let quantities = match input.fence_length_ft {
        Some(length) if length > 0.0 => {
            let corner_post_key =
                special_post_key(engine, "corner", input.corner_post_key.as_deref(), &mut terminal.diagnostics);
            let gate_post_key =
                special_post_key(engine, "gate", input.gate_post_key.as_deref(), &mut terminal.diagnostics);
            let takeoff = TakeoffInput {
                line_post_key: Some(line.post_key.clone()),
                terminal_post_key: Some(terminal.post_key.clone()),
                corner_post_key,
                gate_post_key,
                num_terminals: 2,
                num_corners: input.num_corners,
                num_gate_posts: input.gate_post_count()?,
                embedment_override_in: input.embedment_depth_in,
                footing_diameter_override_in: input.footing_diameter_in,
                ..TakeoffInput::new(length, input.height_total_ft, input.post_spacing_ft)
            };
            Some(compute_segment_quantities(engine.catalog(), &takeoff)?)
        }
        _ => None,
    };

    Ok(EstimateOutput {
        shared,
        line,
        terminal,
        overall_status,
        quantities,
        risk,
    })
}

/// Catalog key for a corner or gate member. Unknown labels fall back to the
/// terminal footing with a diagnostic.
fn special_post_key(engine: &Engine, kind: &str, raw: Option<&str>, diagnostics: &mut Vec<String>) -> Option<String> {
    let member = MemberOverride::parse(raw)?;
    match engine.catalog().normalize_label(member.as_str()) {
        LabelResolution::Key(key) => Some(key),
        LabelResolution::Unknown(label) => {
            tracing::warn!(label = %label, kind, "unknown post label, using terminal footing");
            diagnostics.push(format!(
                "Unknown {} post label '{}', terminal post footing used.",
                kind, label
            ));
            None
        }
    }
}

fn general_warnings(input: &EstimateInput, pressure_psf: f64, load_per_post_lb: f64) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.height_total_ft > 12.0 {
        warnings.push("Fence height exceeds common tabulated limits; PE review recommended.".to_string());
    }
    if input.wind_speed_mph > 150.0 {
        warnings.push("Wind speed beyond standard tables; verify with local code official.".to_string());
    }
    if pressure_psf > 60.0 {
        warnings.push("Calculated pressure is very high; check exposure and risk category.".to_string());
    }
    if load_per_post_lb > 2000.0 {
        warnings.push("Post load exceeds simplified recommendations.".to_string());
    }
    warnings
}

/// Methodology notes with the coefficients actually used.
pub fn build_assumptions(input: &EstimateInput, dp: &DesignPressureResult) -> Vec<String> {
    let fence_label = fence_type(&input.fence_type).map_or(input.fence_type.as_str(), |info| info.label);

    let bs_note = match (input.aspect_ratio_bs(), input.fence_length_ft) {
        (Some(bs), Some(length)) => format!(
            "B/s = {:.1} (fence length {:.0} ft / height {} ft)",
            bs, length, input.height_total_ft
        ),
        _ => "B/s >= 20 assumed (long run; fence length not specified)".to_string(),
    };

    let kzt_note = if dp.kzt > 1.0 {
        format!("Kzt = {} (user-specified topographic factor, Section 26.8).", dp.kzt)
    } else {
        format!("Kzt = {} (flat terrain assumed).", dp.kzt)
    };

    let mut assumptions = vec![
        format!(
            "Design wind speed V = {} mph (3-sec gust at 33 ft) for Risk Category {}, \
             entered by user from ASCE 7 wind maps or project drawings.",
            input.wind_speed_mph, input.risk_category
        ),
        format!(
            "Velocity pressure per {} Eq. 26.10-1: qz = 0.00256 x Kz x Kzt x Kd x V^2 = {:.2} psf.",
            dp.asce7_edition, dp.qz_psf
        ),
        format!(
            "Kz = {:.3} (Exposure {}, h = {} ft, Table 26.10-1).",
            dp.kz, input.exposure, input.height_total_ft
        ),
        format!("Kd = {} (fences/signs, Table 26.6-1).", dp.kd),
        kzt_note,
        format!("G = {} (rigid structure gust-effect factor, Section 26.11).", dp.g),
        format!(
            "Cf = {:.3} ({}, solidity = {:.2}, {}, Figure 29.3-1).",
            dp.cf, fence_label, dp.solidity, bs_note
        ),
    ];

    if fence_type(&input.fence_type).is_none() {
        assumptions.push(format!(
            "Unknown fence type '{}'; solidity 1.0 (solid) assumed.",
            input.fence_type
        ));
    }

    assumptions.extend(
        [
            "Uniform pressure distribution assumed across the bay.",
            "Post tributary load = total bay load / 2.",
            "Bending demand: M = P x (H/2), uniform load resultant at mid-height.",
            "Allowable bending: M_allow = Fy x S / omega, omega = 1.67 (ASD, AISC F1).",
            "Deflection check: delta_max = P*L^3 / (8*E*I), limit L/60.",
            "Footing check per IBC 1807.3: triangular soil pressure, SF >= 1.5.",
            "Pipe posts per ASTM F1083 Group IC (commercial chain-link). Fy = 50 ksi.",
            "Terminal posts modeled as cantilevers fixed at grade; \
             line posts restrained by top rail and fabric (advisory check).",
            "Status: GREEN (<85% utilization), YELLOW (85-100%), RED (>100%).",
        ]
        .map(String::from),
    );

    assumptions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults_from_json() {
        let input: EstimateInput =
            serde_json::from_str(r#"{"wind_speed_mph": 110, "height_total_ft": 6, "post_spacing_ft": 10}"#).unwrap();
        assert_eq!(input.exposure, Exposure::C);
        assert_eq!(input.fence_type, "chain_link_open");
        assert_eq!(input.kzt, 1.0);
        assert_eq!(input.risk_category, RiskCategory::II);
        assert_eq!(input.num_gates, 0);
    }

    #[test]
    fn test_bad_exposure_rejected_on_parse() {
        let result: Result<EstimateInput, _> = serde_json::from_str(
            r#"{"wind_speed_mph": 110, "height_total_ft": 6, "post_spacing_ft": 10, "exposure": "Q"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        assert!(EstimateInput::new(120.0, 8.0, 10.0).validate().is_ok());
        assert!(EstimateInput::new(0.0, 8.0, 10.0).validate().is_err());
        assert!(EstimateInput::new(120.0, -1.0, 10.0).validate().is_err());
        assert!(EstimateInput::new(120.0, 8.0, f64::NAN).validate().is_err());

        let mut input = EstimateInput::new(120.0, 8.0, 10.0);
        input.kzt = 0.9;
        assert!(matches!(input.validate(), Err(CalcError::InvalidInput { ref field, .. }) if field == "kzt"));

        let mut input = EstimateInput::new(120.0, 8.0, 10.0);
        input.embedment_depth_in = Some(0.0);
        assert!(input.validate().is_err());

        let mut input = EstimateInput::new(120.0, 8.0, 10.0);
        input.num_gates = 3_000_000_000;
        assert!(matches!(input.validate(), Err(CalcError::InvalidInput { ref field, .. }) if field == "num_gates"));
    }

    #[test]
    fn test_member_override_precedence() {
        let mut input = EstimateInput::new(120.0, 8.0, 10.0);
        input.post_size = Some("2 3/8\" Steel Pipe".to_string());
        input.post_key = Some("auto".to_string());
        input.terminal_post_key = Some("3_1_2_SS40".to_string());

        assert_eq!(
            input.member_override(PostRole::Terminal).unwrap().as_str(),
            "3_1_2_SS40"
        );
        assert_eq!(
            input.member_override(PostRole::Line).unwrap().as_str(),
            "2 3/8\" Steel Pipe"
        );
    }

    #[test]
    fn test_aspect_ratio() {
        let mut input = EstimateInput::new(120.0, 8.0, 10.0);
        assert_eq!(input.aspect_ratio_bs(), None);
        input.fence_length_ft = Some(0.0);
        assert_eq!(input.aspect_ratio_bs(), None);
        input.fence_length_ft = Some(200.0);
        assert_eq!(input.aspect_ratio_bs(), Some(25.0));
    }

    #[test]
    fn test_shared_loads() {
        let mut input = EstimateInput::new(120.0, 8.0, 10.0);
        input.fence_type = "solid_panel".to_string();
        let shared = compute_shared(&input);

        assert_eq!(shared.area_per_bay_ft2, 80.0);
        assert_eq!(shared.total_load_lb, round_to(shared.pressure_psf * 80.0, 2));
        assert_eq!(shared.load_per_post_lb, round_to(shared.total_load_lb / 2.0, 2));
        assert!((shared.pressure_psf - 33.91).abs() < 0.05);
    }

    #[test]
    fn test_block_status_rules() {
        assert_eq!(block_status(PostRole::Line, Some(0.5), Some(5.0)), Status::Green);
        assert_eq!(block_status(PostRole::Line, Some(0.9), None), Status::Yellow);
        assert_eq!(block_status(PostRole::Line, Some(1.01), None), Status::Red);
        assert_eq!(block_status(PostRole::Terminal, Some(0.5), Some(1.2)), Status::Red);
        assert_eq!(block_status(PostRole::Terminal, Some(0.5), Some(0.9)), Status::Yellow);
        assert_eq!(block_status(PostRole::Terminal, Some(1.2), Some(0.9)), Status::Red);
        assert_eq!(block_status(PostRole::Terminal, None, None), Status::Green);
    }

    #[test]
    fn test_unknown_fence_type_noted() {
        let mut input = EstimateInput::new(120.0, 8.0, 10.0);
        input.fence_type = "bamboo".to_string();
        let shared = compute_shared(&input);
        assert_eq!(shared.design_params.solidity, 1.0);
        let notes = build_assumptions(&input, &shared.design_params);
        assert!(notes.iter().any(|n| n.contains("Unknown fence type 'bamboo'")));
    }
}
