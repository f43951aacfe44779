use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use soil_advisor::{
    AdvisorConfig, Classification, InputSample, OutputFormat, Recommendation, ReferenceData,
    RequirementReport, assess_requirements, evaluate_with, reference_or_builtin,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "soil-advisor",
    about = "Soil and crop advisory recommendations",
    after_help = "Examples:\n  soil-advisor evaluate --soil loamy_soil --crop wheat --nitrogen 100 \\\n    --phosphorous 30 --potassium 300 --ph 8 --humidity 90\n  soil-advisor crops"
)]
struct Cli {
    #[arg(long, global = true, help = "Path to an advisor config file (TOML)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Path to alternative reference tables (TOML)")]
    reference: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Evaluate one soil sample and print recommendations")]
    Evaluate(EvaluateArgs),
    #[command(about = "List selectable soil types")]
    Soils,
    #[command(about = "List selectable crops by category")]
    Crops,
}

#[derive(Debug, Args)]
struct EvaluateArgs {
    #[arg(long, help = "Soil identifier, e.g. clay_soil")]
    soil: String,
    #[arg(long, help = "Crop identifier, e.g. rice")]
    crop: String,
    #[arg(long, help = "Nitrogen [PPM]")]
    nitrogen: f64,
    #[arg(long, help = "Phosphorous [PPM]")]
    phosphorous: f64,
    #[arg(long, help = "Potassium [PPM]")]
    potassium: f64,
    #[arg(long, help = "Soil pH [0-14]")]
    ph: f64,
    #[arg(long, help = "Humidity [%]")]
    humidity: f64,
    #[arg(long, help = "Emit machine-readable JSON output")]
    json: bool,
    #[arg(long, help = "Also compare the sample with the crop's requirements")]
    details: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AdvisorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if cli.reference.is_some() {
        config.reference_path = cli.reference;
    }
    init_tracing(&config.log_level);

    let loaded = match config.load_reference() {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let reference = reference_or_builtin(loaded.as_ref());

    match cli.command {
        Command::Evaluate(args) => run_evaluate(reference, &config, args),
        Command::Soils => {
            for soil in reference.soil_options() {
                println!("{:<16} {}", soil.id, soil.label);
            }
            ExitCode::SUCCESS
        }
        Command::Crops => {
            for category in reference.crop_categories() {
                println!("{}:", category.label);
                for crop in category.crops {
                    println!("  {:<14} {}", crop.id, crop.label);
                }
            }
            ExitCode::SUCCESS
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_evaluate(reference: &ReferenceData, config: &AdvisorConfig, args: EvaluateArgs) -> ExitCode {
    let sample = InputSample::new(
        args.soil,
        args.crop,
        args.nitrogen,
        args.phosphorous,
        args.potassium,
        args.ph,
        args.humidity,
    );
    if let Err(err) = sample.validate() {
        eprintln!("invalid {}: {err}", err.field());
        return ExitCode::from(2);
    }
    if !reference.is_known_soil(&sample.soil_type) {
        warn!(soil = %sample.soil_type, "soil type is not in the catalogue");
    }
    if !reference.is_known_crop(&sample.crop_type) {
        warn!(crop = %sample.crop_type, "crop type is not in the catalogue");
    }

    let recommendations = evaluate_with(reference, &sample);
    let report = if args.details {
        assess_requirements(reference, &sample)
    } else {
        None
    };

    let format = if args.json { OutputFormat::Json } else { config.format };
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "recommendations": recommendations,
                "requirements": report,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
        OutputFormat::Text => {
            print!("{}", render_recommendations(&recommendations));
            if let Some(report) = &report {
                print!("{}", render_requirements(report));
            }
        }
    }
    ExitCode::SUCCESS
}

fn render_recommendations(recommendations: &[Recommendation]) -> String {
    let mut out = String::new();
    for rec in recommendations {
        let tag = match rec.classification {
            Classification::Favorable => "OK",
            Classification::Advisory => "ACTION",
        };
        out.push_str(&format!("[{tag}] {}\n", rec.parameter));
        out.push_str(&format!("  {}\n", rec.message));
        out.push_str(&format!("  Recommended: {}\n\n", rec.action));
    }
    out
}

fn render_requirements(report: &RequirementReport) -> String {
    let mut out = format!("{} requirements:\n", report.crop);
    for check in &report.checks {
        let mark = if check.met { "met" } else { "not met" };
        out.push_str(&format!(
            "  {:<12} expected {:<8} observed {:<18} {mark}\n",
            check.parameter, check.expected, check.observed
        ));
    }
    out
}
