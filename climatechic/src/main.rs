//! ClimateChic command line
//!
//! `climatechic map` writes the drawing tool, `climatechic analyze FILE`
//! turns a downloaded boundary into a restoration plan.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use climatechic::dataset::Dataset;
use climatechic::drawing_tool::{DrawingTool, MapStyle};
use climatechic::process::process_geojson_file;
use climatechic::report::{plan_to_json, rule};

#[derive(Parser)]
#[command(
    name = "climatechic",
    about = "Restoration planning for hand-drawn farm boundaries",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a GeoJSON boundary and save the restoration plan
    Analyze {
        /// Boundary file downloaded from the drawing tool
        file: PathBuf,

        /// Region and flora dataset (JSON); the built-in demo dataset otherwise
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Report path (defaults to <FILE stem>_report.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the plan as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Create the map page used to draw a boundary
    Map {
        /// Minimal click-to-draw page
        #[arg(long)]
        simple: bool,

        /// Output HTML path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Map centre latitude
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Map centre longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Initial zoom level
        #[arg(short, long)]
        zoom: Option<u8>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            dataset,
            output,
            json,
        } => match run_analyze(&file, dataset, output, json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error processing file: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Map {
            simple,
            output,
            lat,
            lon,
            zoom,
        } => match run_map(simple, output, lat.zip(lon), zoom) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error creating drawing tool: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_analyze(
    file: &Path,
    dataset_path: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let dataset = match dataset_path {
        Some(path) => Dataset::from_json_file(path)?,
        None => Dataset::builtin(),
    };

    let processed = process_geojson_file(file, &dataset, output.as_deref())?;

    if json {
        println!("{}", plan_to_json(&processed.plan)?);
        return Ok(());
    }

    println!(
        "Analysis complete! Report saved: {}",
        processed.report_path.display()
    );
    println!("\n{}", rule());
    print!("{}", processed.report);
    println!("{}", rule());

    Ok(())
}

fn run_map(
    simple: bool,
    output: Option<PathBuf>,
    center: Option<(f64, f64)>,
    zoom: Option<u8>,
) -> Result<()> {
    let style = if simple {
        MapStyle::Simple
    } else {
        MapStyle::Full
    };

    let mut tool = DrawingTool::new(style);
    if let Some((lat, lon)) = center {
        tool = tool.with_center(lat, lon);
    }
    if let Some(zoom) = zoom {
        tool = tool.with_zoom(zoom);
    }

    println!("Creating ClimateChic Drawing Tool...");
    let path = tool.write(output.as_deref())?;
    println!("Drawing tool created: {}", path.display());

    println!("\nINSTRUCTIONS:");
    println!("1. Open '{}' in your browser", path.display());
    println!("2. Draw your farm boundary using the drawing tools");
    println!("3. Download the boundary as GeoJSON");
    println!("4. Run: climatechic analyze YOUR_FILE.geojson");

    Ok(())
}
