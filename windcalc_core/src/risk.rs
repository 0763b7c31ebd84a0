//! # Risk Classification
//!
//! Combines the line and terminal blocks into one verdict with readable
//! reasons. `reasons` hold the facts that drive status; `advanced_reasons`
//! hold everything reviewed but non-driving. A numeric fact lands in one
//! list only.

use serde::{Deserialize, Serialize};

use crate::calculations::estimate::{BlockResult, EstimateOutput, SPACING_YELLOW, TERMINAL_MOMENT_YELLOW};
use crate::calculations::Status;

/// Footing SF below this (while passing) is reported as marginal
pub const MARGINAL_FOOTING_SF: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskDetails {
    pub reasons: Vec<String>,
    pub advanced_reasons: Vec<String>,
    pub line_spacing_ratio: Option<f64>,
    pub line_max_spacing_ft: f64,
    pub terminal_bending_ratio: Option<f64>,
}

/// Overall status and details for an evaluated estimate.
pub fn classify(output: &EstimateOutput) -> (Status, RiskDetails) {
    classify_blocks(&output.line, &output.terminal, output.shared.post_spacing_ft)
}

/// Overall status and details for a pair of blocks at `spacing_ft`.
pub fn classify_blocks(line: &BlockResult, terminal: &BlockResult, spacing_ft: f64) -> (Status, RiskDetails) {
    let status = line.status.worst(terminal.status);
    let mut details = RiskDetails {
        line_spacing_ratio: line.spacing_ratio,
        line_max_spacing_ft: line.max_spacing_ft,
        terminal_bending_ratio: terminal.moment_ratio,
        ..RiskDetails::default()
    };

    for block in [line, terminal] {
        spacing_reason(block, spacing_ft, &mut details);
    }

    if let Some(ratio) = line.moment_ratio {
        details.advanced_reasons.push(format!(
            "Advisory - Simplified cantilever bending check (conservative): {:.0}% ({:.0} / {:.0} ft-lb)",
            ratio * 100.0,
            line.m_demand_ft_lb,
            line.m_allow_ft_lb
        ));
    }

    if let Some(ratio) = terminal.moment_ratio {
        let fact = format!(
            "Terminal bending utilization: {:.0}% ({:.0} / {:.0} ft-lb)",
            ratio * 100.0,
            terminal.m_demand_ft_lb,
            terminal.m_allow_ft_lb
        );
        if ratio > TERMINAL_MOMENT_YELLOW {
            details.reasons.push(fact);
        } else {
            details.advanced_reasons.push(format!("{} - within capacity", fact));
        }
    }

    for block in [line, terminal] {
        footing_reason(block, &mut details);
        if let Some(d) = block.deflection.as_ref().filter(|d| !d.deflection_ok) {
            details.advanced_reasons.push(format!(
                "{} deflection {:.2} in exceeds L/60 limit ({:.2} in).",
                block.role.name(),
                d.deflection_in,
                d.allowable_in
            ));
        }
    }

    (status, details)
}

fn spacing_reason(block: &BlockResult, spacing_ft: f64, details: &mut RiskDetails) {
    let Some(ratio) = block.spacing_ratio else {
        return;
    };
    if ratio <= SPACING_YELLOW {
        return;
    }

    let tail = if ratio > 1.0 { "" } else { " - review recommended" };
    let level = if ratio > 1.0 { "at" } else { "near limit at" };
    details.reasons.push(format!(
        "{} spacing {} {:.0}% of limit ({:.2} ft vs {:.2} ft max){}",
        block.role.name(),
        level,
        ratio * 100.0,
        spacing_ft,
        block.max_spacing_ft,
        tail
    ));
}

fn footing_reason(block: &BlockResult, details: &mut RiskDetails) {
    let footing = &block.footing;
    if !footing.footing_ok {
        details.reasons.push(format!(
            "{} footing SF = {:.2} (need ≥ 1.50). Min embedment: {:.2} ft.",
            block.role.name(),
            footing.safety_factor,
            footing.min_embedment_ft
        ));
    } else if footing.safety_factor < MARGINAL_FOOTING_SF {
        details.advanced_reasons.push(format!(
            "{} footing SF = {:.2} (adequate but marginal).",
            block.role.name(),
            footing.safety_factor
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::estimate::{calculate, EstimateInput};
    use crate::engine::Engine;

    fn estimate(input: &EstimateInput) -> EstimateOutput {
        calculate(&Engine::with_defaults(), input).unwrap()
    }

    #[test]
    fn test_classify_matches_estimate() {
        let out = estimate(&EstimateInput::new(120.0, 8.0, 10.0));
        let (status, details) = classify(&out);
        assert_eq!(status, out.overall_status);
        assert_eq!(details, out.risk);
    }

    #[test]
    fn test_terminal_overload_reason() {
        let mut input = EstimateInput::new(150.0, 12.0, 6.0);
        input.terminal_post_key = Some("2_3_8_SS40".to_string());
        let out = estimate(&input);

        assert_eq!(out.overall_status, Status::Red);
        assert!(out.risk.reasons.iter().any(|r| r.starts_with("Terminal bending utilization")));
        assert!(!out
            .risk
            .advanced_reasons
            .iter()
            .any(|r| r.starts_with("Terminal bending utilization")));
    }

    #[test]
    fn test_line_bending_is_advanced_only() {
        let mut input = EstimateInput::new(150.0, 12.0, 6.0);
        input.line_post_key = Some("2_3_8_SS40".to_string());
        let out = estimate(&input);

        assert!(out.line.moment_ratio.unwrap() > 1.0);
        assert!(out.risk.advanced_reasons.iter().any(|r| r.starts_with("Advisory - Simplified cantilever")));
        assert!(!out.risk.reasons.iter().any(|r| r.contains("cantilever")));
    }

    #[test]
    fn test_spacing_reason_once_per_block() {
        let mut input = EstimateInput::new(120.0, 8.0, 30.0);
        input.post_key = Some("2_3_8_SS40".to_string());
        let out = estimate(&input);

        let spacing_reasons: Vec<_> = out.risk.reasons.iter().filter(|r| r.contains("spacing")).collect();
        assert_eq!(spacing_reasons.len(), 2);
        assert!(spacing_reasons[0].starts_with("Line spacing at"));
        assert!(spacing_reasons[1].starts_with("Terminal spacing at"));
    }
}
