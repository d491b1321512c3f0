//! CRT Timing Studio command-line front end.
//!
//! Thin wrapper over `cts_core`: builds a timing from the requested
//! geometry and refresh rate, optionally refines the pixel clock toward
//! a target, and prints the fixed-layout report or a JSON summary.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cts_core::config::ConfigManager;
use cts_core::logging::init_tracing;
use cts_core::models::{DisplayClass, TimingMode, TimingSummary};
use cts_core::refine::{refine_to_clock, ClockTarget, RefineError};
use cts_core::timing::{report, DetailedTiming};

#[derive(Parser, Debug)]
#[command(name = "crt-timing-studio", version, about = "Scan-timing parameter calculator")]
struct Cli {
    /// Active width in pixels.
    #[arg(long)]
    h_active: i64,

    /// Active height in lines.
    #[arg(long)]
    v_active: i64,

    /// Target vertical refresh rate in Hz.
    #[arg(long)]
    rate: f64,

    /// Timing mode.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<TimingMode>,

    /// Display class selecting the validity ranges.
    #[arg(long, value_parser = parse_class)]
    class: Option<DisplayClass>,

    /// Interlaced scan.
    #[arg(long)]
    interlaced: bool,

    /// Refine the pixel clock toward this target, in MHz.
    #[arg(long)]
    target_clock: Option<f64>,

    /// Config file path.
    #[arg(long, default_value = ".config/cts.toml")]
    config: PathBuf,

    /// Print a JSON summary instead of the text report.
    #[arg(long)]
    json: bool,
}

fn parse_mode(s: &str) -> Result<TimingMode, String> {
    match s {
        "manual" => Ok(TimingMode::Manual),
        "lcd-standard" => Ok(TimingMode::LcdStandard),
        "lcd-native" => Ok(TimingMode::LcdNative),
        "lcd-reduced" => Ok(TimingMode::LcdReduced),
        "crt-standard" => Ok(TimingMode::CrtStandard),
        "old-standard" => Ok(TimingMode::OldStandard),
        _ => Err(format!(
            "unknown mode '{s}' (expected manual, lcd-standard, lcd-native, \
             lcd-reduced, crt-standard, or old-standard)"
        )),
    }
}

fn parse_class(s: &str) -> Result<DisplayClass, String> {
    match s {
        "crt" => Ok(DisplayClass::Crt),
        "lcd" => Ok(DisplayClass::Lcd),
        _ => Err(format!("unknown display class '{s}' (expected crt or lcd)")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::new(&cli.config);
    config
        .load_or_create()
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let settings = config.settings().clone();

    init_tracing(settings.logging.level);

    let class = cli.class.unwrap_or(settings.general.display_class);
    let mode = cli.mode.unwrap_or(settings.general.mode);
    let interlaced = cli.interlaced || settings.general.interlaced;

    let mut timing = DetailedTiming::new(class);
    timing.set_h_active(cli.h_active);
    timing.set_v_active(cli.v_active);
    timing.set_interlaced(interlaced);
    timing.set_mode(mode);
    timing.set_v_rate((cli.rate * 1000.0).round() as i64);

    if !timing.start() {
        bail!(
            "no consistent timing for {}x{}{} at {} Hz in {} mode",
            cli.h_active,
            cli.v_active,
            if interlaced { "i" } else { "p" },
            cli.rate,
            mode
        );
    }

    let target = cli
        .target_clock
        .map(|mhz| (mhz * 100.0).round() as i64)
        .or(settings.refine.target_clock);
    if let Some(clock) = target {
        let target = ClockTarget::new(clock).with_budget(settings.refine.budget);
        match refine_to_clock(&mut timing, target) {
            Ok(steps) => tracing::info!(steps, clock, "pixel clock refined"),
            Err(RefineError::BudgetExhausted { steps }) => {
                tracing::warn!(steps, clock, "pixel clock refinement did not converge");
            }
        }
    }

    if let Err(e) = timing.validate() {
        tracing::warn!(error = %e, "timing failed validation");
    }

    if cli.json {
        let summary = TimingSummary::from(&timing);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", report::render(&timing));
    }

    Ok(())
}
