//! End-to-end estimates checked against hand calculations.

use approx::assert_abs_diff_eq;

use windcalc_core::calculations::estimate::block_status;
use windcalc_core::selection::{MemberOverride, MemberSelector};
use windcalc_core::units::round_to;
use windcalc_core::{Engine, EstimateInput, PostRole, Status};

fn engine() -> Engine {
    Engine::with_defaults()
}

fn input(ws: f64, h: f64, s: f64) -> EstimateInput {
    EstimateInput::new(ws, h, s)
}

#[test]
fn solid_panel_pressure() {
    let mut bay = input(120.0, 8.0, 10.0);
    bay.fence_type = "solid_panel".to_string();
    let out = engine().estimate(&bay).unwrap();

    assert_abs_diff_eq!(out.shared.pressure_psf, 33.9, epsilon = 1.0);
    assert_abs_diff_eq!(out.shared.design_params.qz_psf, 26.6, epsilon = 0.1);
    assert_eq!(out.shared.design_params.solidity, 1.0);
}

#[test]
fn open_chain_link_pressure() {
    let out = engine().estimate(&input(120.0, 8.0, 10.0)).unwrap();

    assert_eq!(out.shared.design_params.fence_type, "chain_link_open");
    assert_abs_diff_eq!(out.shared.pressure_psf, 11.9, epsilon = 0.5);
}

#[test]
fn overloaded_terminal_is_red() {
    let mut bay = input(150.0, 12.0, 6.0);
    bay.terminal_post_key = Some("2_3_8_SS40".to_string());
    let out = engine().estimate(&bay).unwrap();

    assert_eq!(out.terminal.post_key, "2_3_8_SS40");
    assert!(out.terminal.moment_ratio.unwrap() > 1.0);
    assert_eq!(out.terminal.status, Status::Red);
    assert_eq!(out.overall_status, Status::Red);
    assert!(out
        .terminal
        .warnings
        .iter()
        .any(|w| w.starts_with("Terminal bending exceeds capacity")));
    assert!(out.risk.reasons.iter().any(|r| r.starts_with("Terminal bending utilization")));
}

#[test]
fn moment_demand_is_load_times_half_height() {
    let mut bay = input(120.0, 8.0, 10.0);
    bay.post_key = Some("2_3_8_SS40".to_string());
    let out = engine().estimate(&bay).unwrap();

    let expected = round_to(out.shared.load_per_post_lb * 4.0, 1);
    assert_abs_diff_eq!(out.line.m_demand_ft_lb, expected, epsilon = 0.05);
    assert_abs_diff_eq!(out.terminal.m_demand_ft_lb, expected, epsilon = 0.05);
}

#[test]
fn two_hundred_foot_run_quantities() {
    let mut bay = input(120.0, 8.0, 10.0);
    bay.fence_length_ft = Some(200.0);
    let out = engine().estimate(&bay).unwrap();

    let q = out.quantities.expect("quantities for a run with length");
    assert_eq!(q.num_line_posts, 19);
    assert_eq!(q.num_terminal_posts, 2);
    assert_eq!(q.top_rail_lf, 200.0);
    assert_eq!(q.fabric_sf, 1600.0);
}

#[test]
fn gates_add_two_posts_each() {
    let mut bay = input(110.0, 6.0, 10.0);
    bay.fence_length_ft = Some(100.0);
    bay.num_gates = 2;
    bay.num_corners = 1;
    let q = engine().estimate(&bay).unwrap().quantities.unwrap();

    assert_eq!(q.num_gate_posts, 4);
    assert_eq!(q.num_corner_posts, 1);
    assert_eq!(q.total_posts, 9 + 2 + 1 + 4);
}

#[test]
fn gate_and_corner_members_size_their_footings() {
    let mut bay = input(110.0, 6.0, 10.0);
    bay.fence_length_ft = Some(100.0);
    bay.num_gates = 2;
    bay.num_corners = 1;
    let engine = engine();
    let plain = engine.estimate(&bay).unwrap().quantities.unwrap();

    bay.gate_post_key = Some("8_5_8_PIPE".to_string());
    bay.corner_post_key = Some("4\" Steel Pipe".to_string());
    let sized = engine.estimate(&bay).unwrap().quantities.unwrap();

    assert_eq!((sized.gate_footing_diameter_in, sized.gate_embedment_in), (30.0, 54.0));
    assert_eq!((sized.corner_footing_diameter_in, sized.corner_embedment_in), (18.0, 42.0));
    assert_eq!(sized.total_posts, plain.total_posts);
    assert!(sized.total_concrete_cf > plain.total_concrete_cf);
}

#[test]
fn unknown_gate_label_keeps_terminal_footing() {
    let mut bay = input(110.0, 6.0, 10.0);
    bay.fence_length_ft = Some(100.0);
    bay.num_gates = 1;
    bay.gate_post_key = Some("Swing gate post".to_string());
    let out = engine().estimate(&bay).unwrap();
    let q = out.quantities.as_ref().unwrap();

    assert_eq!(q.gate_footing_diameter_in, q.terminal_footing_diameter_in);
    assert!(out
        .diagnostics()
        .any(|d| d == "Unknown gate post label 'Swing gate post', terminal post footing used."));
}

#[test]
fn gate_count_overflow_is_rejected() {
    let mut bay = input(110.0, 6.0, 10.0);
    bay.fence_length_ft = Some(100.0);
    bay.num_gates = 3_000_000_000;
    let err = engine().estimate(&bay).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

#[test]
fn footing_and_deflection_failures_are_advisory() {
    // 120 mph open chain link, 10 ft tall at 6 ft spacing: ~356 lb per post
    let mut bay = input(120.0, 10.0, 6.0);
    bay.line_post_key = Some("2_3_8_SS40".to_string());
    bay.terminal_post_key = Some("8_5_8_PIPE".to_string());
    bay.soil_type = Some("clay".to_string());
    bay.embedment_depth_in = Some(12.0);
    bay.footing_diameter_in = Some(10.0);
    let out = engine().estimate(&bay).unwrap();

    assert!(!out.line.footing.footing_ok);
    assert!(!out.terminal.footing.footing_ok);
    let line_deflection = out.line.deflection.as_ref().unwrap();
    assert!(!line_deflection.deflection_ok);

    assert_eq!(out.line.status, Status::Green);
    assert_eq!(out.terminal.status, Status::Green);
    assert_eq!(out.overall_status, Status::Green);

    assert!(out.line.advisories.iter().any(|a| a.starts_with("Footing SF")));
    assert!(out.line.advisories.iter().any(|a| a.starts_with("Deflection")));
    assert!(out.line.warnings.iter().all(|w| !w.contains("Footing") && !w.contains("Deflection")));

    let footing_reason = |r: &String| r.starts_with("Line footing SF");
    let deflection_reason = |r: &String| r.starts_with("Line deflection");
    assert!(out.risk.reasons.iter().any(footing_reason));
    assert!(!out.risk.advanced_reasons.iter().any(footing_reason));
    assert!(out.risk.advanced_reasons.iter().any(deflection_reason));
    assert!(!out.risk.reasons.iter().any(deflection_reason));
}

#[test]
fn line_bending_never_drives_status() {
    let mut bay = input(150.0, 12.0, 4.0);
    bay.line_post_key = Some("2_3_8_SS40".to_string());
    let out = engine().estimate(&bay).unwrap();

    assert!(out.line.moment_ratio.unwrap() > 1.0);
    assert_eq!(out.line.status, block_status(PostRole::Line, out.line.spacing_ratio, None));
    assert_eq!(out.line.status, Status::Green);
    assert!(!out.line.advisories.is_empty());
}

#[test]
fn spacing_over_limit_is_red_for_both_roles() {
    let mut bay = input(120.0, 8.0, 20.0);
    bay.post_key = Some("2_3_8_SS40".to_string());
    let out = engine().estimate(&bay).unwrap();

    // Formula limit: 8.0 × 2.4 × 0.69 = 13.25 ft
    assert_abs_diff_eq!(out.line.max_spacing_ft, 13.25, epsilon = 1e-9);
    assert!(out.line.spacing_ratio.unwrap() > 1.15);
    assert_eq!(out.line.status, Status::Red);
    assert_eq!(out.terminal.status, Status::Red);
}

#[test]
fn spacing_near_limit_is_yellow() {
    // 12 / 13.25 = 0.906
    let mut bay = input(120.0, 6.0, 12.0);
    bay.line_post_key = Some("2_3_8_SS40".to_string());
    bay.terminal_post_key = Some("8_5_8_PIPE".to_string());
    let out = engine().estimate(&bay).unwrap();

    assert_eq!(out.line.spacing_ratio, Some(0.906));
    assert_eq!(out.line.status, Status::Yellow);
    assert!(out.overall_status >= Status::Yellow);
}

#[test]
fn auto_selection_prefers_passing_member() {
    let engine = engine();
    let selector = engine.selector();

    for &(load, height) in &[(150.0, 6.0), (400.0, 8.0), (900.0, 10.0), (2500.0, 12.0)] {
        let selection = selector.select(load, height, None).unwrap();
        let record = engine.catalog().lookup(&selection.recommendation.post_key).unwrap();
        let any_passes = engine
            .catalog()
            .ordered_pipe_keys()
            .iter()
            .filter_map(|k| engine.catalog().get(k))
            .any(|r| windcalc_core::checks::check_bending(r, height, load).ok);

        if any_passes {
            assert!(
                windcalc_core::checks::check_bending(record, height, load).ok,
                "{} fails at {} lb / {} ft",
                record.key,
                load,
                height
            );
        }
    }
}

#[test]
fn auto_selected_key_round_trips_as_override() {
    let engine = engine();
    let selector = MemberSelector::new(engine.catalog(), engine.settings());

    for &(load, height) in &[(200.0, 6.0), (800.0, 8.0), (3000.0, 10.0)] {
        let auto = selector.select(load, height, None).unwrap().recommendation;
        let member = MemberOverride::parse(Some(&auto.post_key));
        let explicit = selector.select(load, height, member.as_ref()).unwrap().recommendation;

        assert_eq!(explicit.post_key, auto.post_key);
        assert_eq!(explicit.footing_diameter_in, auto.footing_diameter_in);
        assert_eq!(explicit.embedment_in, auto.embedment_in);
    }
}

#[test]
fn unknown_label_is_a_diagnostic_not_an_error() {
    let mut bay = input(115.0, 6.0, 8.0);
    bay.post_size = Some("Bamboo pole".to_string());
    let out = engine().estimate(&bay).unwrap();

    assert!(out
        .diagnostics()
        .any(|d| d == "Unknown post label 'Bamboo pole', falling back to auto selection."));
}

#[test]
fn high_wind_speed_diagnostic_from_spacing_factor() {
    let out = engine().estimate(&input(160.0, 6.0, 6.0)).unwrap();
    assert!(out.diagnostics().any(|d| d.contains("above the 105-130 mph")));
    assert!(out.line.warnings.iter().any(|w| w.starts_with("Wind speed beyond standard tables")));
}

#[test]
fn legacy_fields_mirror_line_block() {
    let mut bay = input(120.0, 8.0, 10.0);
    bay.fence_length_ft = Some(150.0);
    let out = engine().estimate(&bay).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["overall_status"], serde_json::json!(out.overall_status.as_str()));
    assert_eq!(json["pressure_psf"], json["shared"]["pressure_psf"]);
    assert_eq!(json["max_spacing_ft"], json["line"]["max_spacing_ft"]);
    assert_eq!(json["M_demand_ft_lb"], json["line"]["M_demand_ft_lb"]);
    assert_eq!(json["recommended"], json["line"]["recommended"]);
    assert_eq!(
        json["warnings"].as_array().unwrap().len(),
        out.line.warnings.len() + out.terminal.warnings.len()
    );
    assert!(json["quantities"].is_object());
}

#[test]
fn invalid_input_fails_fast() {
    let err = engine().estimate(&input(120.0, 0.0, 10.0)).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
    assert!(err.is_recoverable());
}
