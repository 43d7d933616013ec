use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use label_coverage::core::{denormalize_bbox, ImageExtent};
use label_coverage::{analyze_inputs, render_table, CoverageConfig, LabelInput};

#[cfg(not(feature = "tracing"))]
use log::{info, LevelFilter};
#[cfg(feature = "tracing")]
use tracing::info;

#[cfg(feature = "tracing")]
use label_coverage::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use label_coverage::core::init_with_level;

#[derive(Debug, Parser)]
#[command(name = "label-coverage", version, about = "Pixel coverage of normalized detection labels")]
struct Cli {
    /// Log level for this tool's records (off, error, warn, info, debug, trace);
    /// dependencies log at warn or quieter
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Coverage table for one or more label files
    Analyze(AnalyzeArgs),
    /// Pixel corners of a single normalized box
    Bbox(BboxArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Label files; replace the inputs listed in the config
    label_files: Vec<PathBuf>,

    /// JSON config with class names, image sizes and inputs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image width in pixels, applied to every input
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Image height in pixels, applied to every input
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Write the JSON report here
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(allow_negative_numbers = true)]
struct BboxArgs {
    x_center: f64,
    y_center: f64,
    #[arg(value_name = "WIDTH")]
    box_width: f64,
    #[arg(value_name = "HEIGHT")]
    box_height: f64,

    /// Image width in pixels
    #[arg(long = "width")]
    image_width: u32,

    /// Image height in pixels
    #[arg(long = "height")]
    image_height: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Bbox(args) => bbox(&args),
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| format!("invalid log level {level:?}"))?;
    init_with_level(level)?;
    Ok(())
}

/// `RUST_LOG`, when set, takes precedence over `--log-level`.
#[cfg(feature = "tracing")]
fn init_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(false, level).map_err(|e| format!("invalid log level {level:?}: {e}"))?;
    Ok(())
}

fn load_config(args: &AnalyzeArgs) -> Result<CoverageConfig, Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => CoverageConfig::load_json(path)
            .map_err(|e| format!("failed to load config {}: {e}", path.display()))?,
        None => CoverageConfig::default(),
    };

    if !args.label_files.is_empty() {
        cfg.inputs = args
            .label_files
            .iter()
            .map(|p| LabelInput::new(p.to_string_lossy()))
            .collect();
    }

    if let (Some(w), Some(h)) = (args.width, args.height) {
        let extent = ImageExtent::new(w, h)?;
        cfg.default_extent = extent;
        for input in &mut cfg.inputs {
            input.extent = Some(extent);
        }
    }

    if let Some(json) = &args.json {
        cfg.output_path = Some(json.to_string_lossy().into_owned());
    }

    Ok(cfg)
}

fn analyze(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(&args)?;
    if cfg.inputs.is_empty() {
        return Err("no label files given (pass paths or a config with `inputs`)".into());
    }

    let report = analyze_inputs(&cfg);
    for (i, file) in report.files.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", render_table(file));
    }

    if let Some(path) = cfg.output_path() {
        report.write_json(&path)?;
        info!("wrote report to {}", path.display());
    }

    match report.failed_count() {
        0 => Ok(()),
        n => Err(format!("{n} of {} label files failed", report.files.len()).into()),
    }
}

fn bbox(args: &BboxArgs) -> Result<(), Box<dyn std::error::Error>> {
    let b = denormalize_bbox(
        f64::from(args.image_width),
        f64::from(args.image_height),
        args.x_center,
        args.y_center,
        args.box_width,
        args.box_height,
    );
    println!("{} {} {} {}", b.xmin, b.ymin, b.xmax, b.ymax);
    Ok(())
}
