use clap::Parser;
use image::Rgb;
use log::{error, info};
use std::path::PathBuf;

use changemark::config::{self, parse_color};
use changemark::{ChangeConfig, ChangeDetector, Orchestrator};

#[derive(Parser)]
#[command(name = "changemark")]
#[command(about = "Mark what changed between before/after photos of the same scene")]
struct Cli {
    /// Folder holding X.jpg / X~2.jpg pairs
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Folder receiving X.jpg and the annotated X~3.jpg (created if missing)
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Drop regions whose contour area is at or below this many pixels
    #[arg(long, default_value_t = config::DEFAULT_MIN_REGION_AREA)]
    min_area: u32,

    /// Side of the square dilation kernel (odd)
    #[arg(long, default_value_t = config::DEFAULT_DILATION_KERNEL_SIZE)]
    kernel_size: u32,

    /// Number of dilation passes
    #[arg(long, default_value_t = config::DEFAULT_DILATION_ITERATIONS)]
    iterations: u32,

    /// Box colour as #rrggbb or r,g,b
    #[arg(long, value_parser = parse_color, default_value = "#ff0000")]
    box_color: Rgb<u8>,

    /// Box stroke width in pixels
    #[arg(long, default_value_t = config::DEFAULT_BOX_THICKNESS)]
    thickness: u32,

    /// Side of the SSIM window (odd, >= 3)
    #[arg(long, default_value_t = config::DEFAULT_SIMILARITY_WINDOW)]
    window: u32,

    /// Process pairs one at a time
    #[arg(long)]
    sequential: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = ChangeConfig::new()
        .with_minimum_region_area(args.min_area)
        .with_dilation(args.kernel_size, args.iterations)
        .with_box_color(args.box_color)
        .with_box_thickness(args.thickness)
        .with_similarity_window(args.window);
    let detector = ChangeDetector::new(config)?;

    let outcomes = Orchestrator::new(detector, &args.output_dir)
        .with_parallel(!args.sequential)
        .run(&args.input_dir)?;

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(
        "Done: {} pair(s) processed, {} failed, outputs in {}",
        outcomes.len() - failed,
        failed,
        args.output_dir.display()
    );

    if failed > 0 {
        for outcome in outcomes.iter().filter(|o| !o.is_ok()) {
            if let Err(e) = &outcome.result {
                error!("{}: {:#}", outcome.id, e);
            }
        }
        anyhow::bail!("{} of {} pair(s) failed", failed, outcomes.len());
    }

    Ok(())
}
