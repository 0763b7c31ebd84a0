//! # Windcalc CLI
//!
//! Command-line front end for `windcalc_core`. Reads flags or JSON files,
//! runs the engine and prints either a text summary or a JSON envelope.
//!
//! ```text
//! windcalc estimate --wind-speed 120 --height 8 --spacing 10 --length 200
//! windcalc estimate --input bay.json --json
//! windcalc project site.json
//! windcalc concrete holes.json
//! windcalc wind-speed 33101 --risk-category III
//! windcalc posts | soils | fence-types
//! ```
//!
//! Settings are layered: defaults < `--config` file < `WINDCALC_*`
//! environment < flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use windcalc_core::calculations::{BlockResult, EstimateInput, EstimateOutput, ProjectInput, ProjectOutput};
use windcalc_core::checks::SOIL_CLASSES;
use windcalc_core::concrete::{self, ConcreteEstimateInput, ConcreteEstimateOutput};
use windcalc_core::wind::{lookup_wind_speed, WindSpeedEstimate, FENCE_TYPES};
use windcalc_core::{Engine, Exposure, RiskCategory, Settings};

#[derive(Parser, Debug)]
#[command(name = "windcalc", author, version, about = "Fence wind-load estimates (ASCE 7-22)", long_about = None)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, global = true, env = "WINDCALC_CONFIG")]
    config: Option<PathBuf>,

    /// Fail when a selected post has no footing data
    #[arg(long, global = true)]
    strict_footing: bool,

    /// Soil class used when an input names none
    #[arg(long, global = true)]
    default_soil: Option<String>,

    /// Directory of <ws>mph.csv manufacturer spacing tables
    #[arg(long, global = true)]
    table_dir: Option<PathBuf>,

    /// Print a JSON envelope instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one bay (line + terminal posts)
    Estimate(EstimateArgs),
    /// Evaluate a multi-segment project from a JSON file
    Project {
        /// ProjectInput JSON
        file: PathBuf,
    },
    /// Concrete takeoff from a JSON file of hole rows
    Concrete {
        /// ConcreteEstimateInput JSON
        file: PathBuf,
    },
    /// Approximate basic wind speed for a ZIP code
    WindSpeed {
        zip: String,
        #[arg(short, long, default_value = "II")]
        risk_category: RiskCategory,
    },
    /// List the post catalog
    Posts,
    /// List soil classes
    Soils,
    /// List fence types and solidity
    FenceTypes,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// EstimateInput JSON; other estimate flags are ignored when given
    #[arg(short, long, conflicts_with_all = ["wind_speed", "height", "spacing"])]
    input: Option<PathBuf>,

    /// Basic wind speed (mph)
    #[arg(short, long, required_unless_present = "input")]
    wind_speed: Option<f64>,

    /// Fence height above grade (ft)
    #[arg(short = 'H', long, required_unless_present = "input")]
    height: Option<f64>,

    /// Post spacing (ft)
    #[arg(short, long, required_unless_present = "input")]
    spacing: Option<f64>,

    /// Run length (ft); enables quantities
    #[arg(short, long)]
    length: Option<f64>,

    #[arg(short, long, default_value = "C")]
    exposure: Exposure,

    #[arg(long, default_value = "chain_link_open")]
    fence_type: String,

    #[arg(long, default_value = "II")]
    risk_category: RiskCategory,

    #[arg(long, default_value_t = 1.0)]
    kzt: f64,

    #[arg(long)]
    soil: Option<String>,

    /// Member for both roles (key or label)
    #[arg(long)]
    post: Option<String>,

    #[arg(long)]
    line_post: Option<String>,

    #[arg(long)]
    terminal_post: Option<String>,

    /// Gate post member (sizes gate footings)
    #[arg(long)]
    gate_post: Option<String>,

    /// Corner post member (sizes corner footings)
    #[arg(long)]
    corner_post: Option<String>,

    /// Footing embedment override (in)
    #[arg(long)]
    embedment: Option<f64>,

    /// Footing diameter override (in)
    #[arg(long)]
    footing_diameter: Option<f64>,

    #[arg(long, default_value_t = 0)]
    gates: u32,

    #[arg(long, default_value_t = 0)]
    corners: u32,
}

impl EstimateArgs {
    fn to_input(&self) -> Result<EstimateInput> {
        if let Some(path) = &self.input {
            return read_json(path);
        }

        let (Some(ws), Some(h), Some(s)) = (self.wind_speed, self.height, self.spacing) else {
            anyhow::bail!("--wind-speed, --height and --spacing are required without --input");
        };

        Ok(EstimateInput {
            fence_length_ft: self.length,
            exposure: self.exposure,
            fence_type: self.fence_type.clone(),
            risk_category: self.risk_category,
            kzt: self.kzt,
            soil_type: self.soil.clone(),
            post_key: self.post.clone(),
            line_post_key: self.line_post.clone(),
            terminal_post_key: self.terminal_post.clone(),
            gate_post_key: self.gate_post.clone(),
            corner_post_key: self.corner_post.clone(),
            embedment_depth_in: self.embedment,
            footing_diameter_in: self.footing_diameter,
            num_gates: self.gates,
            num_corners: self.corners,
            ..EstimateInput::new(ws, h, s)
        })
    }
}

/// JSON output wrapper
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    engine_version: &'static str,
    command: &'a str,
    result: &'a T,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli)?;
    tracing::debug!(?settings, "settings resolved");

    match &cli.command {
        Command::Estimate(args) => {
            let engine = Engine::new(windcalc_core::PostCatalog::builtin(), settings);
            let input = args.to_input()?;
            let output = engine.estimate(&input).context("estimate failed")?;
            emit(&cli, "estimate", &output, print_estimate)
        }
        Command::Project { file } => {
            let engine = Engine::new(windcalc_core::PostCatalog::builtin(), settings);
            let input: ProjectInput = read_json(file)?;
            let output = engine
                .project(&input)
                .with_context(|| format!("project {} failed", file.display()))?;
            emit(&cli, "project", &output, print_project)
        }
        Command::Concrete { file } => {
            let input: ConcreteEstimateInput = read_json(file)?;
            let output = concrete::calculate(&input).context("concrete estimate failed")?;
            emit(&cli, "concrete", &output, print_concrete)
        }
        Command::WindSpeed { zip, risk_category } => {
            let estimate = lookup_wind_speed(zip, *risk_category);
            emit(&cli, "wind-speed", &estimate, print_wind_speed)
        }
        Command::Posts => {
            let catalog = windcalc_core::PostCatalog::builtin();
            let records = catalog.records();
            emit(&cli, "posts", &records, |records| {
                for record in records {
                    println!("{}", record);
                }
            })
        }
        Command::Soils => emit(&cli, "soils", &SOIL_CLASSES, |soils| {
            for soil in soils {
                println!("{:<18} {:>6} psf/ft  {}", soil.key, soil.lateral_bearing_psf_per_ft, soil.label);
            }
        }),
        Command::FenceTypes => emit(&cli, "fence-types", &FENCE_TYPES, |types| {
            for fence in types {
                println!("{:<26} {:.2}  {}", fence.key, fence.solidity, fence.label);
            }
        }),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    }
    .with_env_overrides();

    if cli.strict_footing {
        settings.strict_footing = true;
    }
    if let Some(soil) = &cli.default_soil {
        settings.default_soil_class = soil.clone();
    }
    if let Some(dir) = &cli.table_dir {
        settings.spacing_table_dir = Some(dir.clone());
    }
    Ok(settings)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn emit<T: Serialize>(cli: &Cli, command: &str, result: &T, text: impl Fn(&T)) -> Result<()> {
    if cli.json {
        let envelope = Envelope {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION"),
            command,
            result,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        text(result);
    }
    Ok(())
}

fn print_estimate(out: &EstimateOutput) {
    let shared = &out.shared;
    let dp = &shared.design_params;
    println!("═══════════════════════════════════════");
    println!("  FENCE WIND LOAD ESTIMATE  [{}]", out.overall_status);
    println!("═══════════════════════════════════════");
    println!();
    println!("Pressure ({}):", dp.asce7_edition);
    println!("  qz = {:.2} psf  (Kz={:.4}, Kzt={}, Kd={})", dp.qz_psf, dp.kz, dp.kzt, dp.kd);
    println!("  Cf = {:.3}  (solidity {:.2}, {})", dp.cf, dp.solidity, dp.fence_type);
    println!("  p  = {:.2} psf", shared.pressure_psf);
    println!();
    println!("Load:");
    println!("  Area/bay  = {:.2} ft²", shared.area_per_bay_ft2);
    println!("  Bay load  = {:.2} lb", shared.total_load_lb);
    println!("  Per post  = {:.2} lb", shared.load_per_post_lb);
    println!();
    print_block(&out.line);
    print_block(&out.terminal);

    if !out.risk.reasons.is_empty() {
        println!("Reasons:");
        for reason in &out.risk.reasons {
            println!("  - {}", reason);
        }
        println!();
    }
    if !out.risk.advanced_reasons.is_empty() {
        println!("Also reviewed:");
        for reason in &out.risk.advanced_reasons {
            println!("  - {}", reason);
        }
        println!();
    }

    if let Some(q) = &out.quantities {
        println!("Quantities ({:.1} ft run):", q.fence_length_ft);
        println!(
            "  Posts: {} line, {} terminal, {} corner, {} gate ({} total)",
            q.num_line_posts, q.num_terminal_posts, q.num_corner_posts, q.num_gate_posts, q.total_posts
        );
        println!("  Top rail {:.1} lf, fabric {:.1} sf", q.top_rail_lf, q.fabric_sf);
        println!("  Concrete {:.3} cf ({:.2} cy)", q.total_concrete_cf, q.total_concrete_cy);
        println!();
    }
}

fn print_block(block: &BlockResult) {
    println!("{} post: {} [{}]  {}", block.role.name(), block.post_label, block.post_key, block.status);
    println!(
        "  Spacing   max {:.2} ft, ratio {}",
        block.max_spacing_ft,
        fmt_ratio(block.spacing_ratio)
    );
    if block.bending_skipped {
        println!("  Bending   skipped (no section data)");
    } else {
        println!(
            "  Bending   {:.1} / {:.1} ft-lb, ratio {}",
            block.m_demand_ft_lb,
            block.m_allow_ft_lb,
            fmt_ratio(block.moment_ratio)
        );
    }
    println!(
        "  Footing   {}\" dia x {:.2} ft in {}, SF {:.2}",
        block.footing.footing_diameter_in,
        block.footing.actual_embedment_ft,
        block.footing.soil_class,
        block.footing.safety_factor
    );
    if let Some(d) = &block.deflection {
        println!("  Deflect.  {:.3} in (limit {:.3} in)", d.deflection_in, d.allowable_in);
    }
    for line in block.warnings.iter().chain(&block.advisories).chain(&block.diagnostics) {
        println!("  ! {}", line);
    }
    println!();
}

fn fmt_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.3}", r))
}

fn print_project(out: &ProjectOutput) {
    if let Some(name) = &out.project_name {
        println!("Project: {}", name);
    }
    println!("Overall status: {}", out.overall_status);
    println!();
    for segment in &out.segments {
        let est = &segment.estimate;
        println!(
            "  {:<20} {:<6} p={:.2} psf  line={}  terminal={}",
            segment.label, est.overall_status, est.shared.pressure_psf, est.line.post_key, est.terminal.post_key
        );
    }
    let q = &out.total_quantities;
    println!();
    println!("Totals ({} segments with quantities):", q.segments().len());
    println!("  Length {:.1} ft, posts {}", q.total_fence_length_ft(), q.total_posts());
    println!("  Concrete {:.3} cf ({:.2} cy)", q.total_concrete_cf(), q.total_concrete_cy());
}

fn print_concrete(out: &ConcreteEstimateOutput) {
    for row in &out.rows {
        println!(
            "  {:<12} {:>3} x {}\"dia x {}\"  {:>8.3} cf  {:>4} bags",
            row.post_type, row.hole_count, row.hole_diameter_in, row.hole_depth_in, row.total_volume_cf, row.bags_60lb
        );
    }
    println!();
    println!(
        "Total: {:.3} cf ({:.2} cy) incl. {:.0}% waste, {} x 60 lb bags",
        out.total_volume_cf, out.total_volume_cy, out.waste_percent, out.bags_60lb
    );
    for warning in &out.warnings {
        println!("  ! {}", warning);
    }
}

fn print_wind_speed(estimate: &WindSpeedEstimate) {
    match estimate.wind_speed_mph {
        Some(v) => println!(
            "ZIP {}: ~{} mph (Risk Category {}, {})",
            estimate.zip_code, v, estimate.risk_category, estimate.region
        ),
        None => println!("ZIP {}: {}", estimate.zip_code, estimate.region),
    }
}
