use std::path::PathBuf;

use checkerboard_calibration::board::Board;
use checkerboard_calibration::calibration::calibrate_intrinsics;
use checkerboard_calibration::config::CollectorConfig;
use checkerboard_calibration::data_loader::collect_observations;
use checkerboard_calibration::detection::DetectorStack;
use checkerboard_calibration::io::save_calibration;
use clap::Parser;

/// Collect checkerboard observations from a folder of images and calibrate
/// camera intrinsics.
#[derive(Parser)]
#[command(version, about, author)]
struct CollectCli {
    /// Folder with calibration photos.
    images_dir: PathBuf,

    /// Folder for annotated copies of accepted images.
    #[arg(default_value = "annotated")]
    output_dir: PathBuf,

    /// Collector configuration JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Internal corners per board row.
    #[arg(long)]
    cols: Option<usize>,

    /// Internal corners per board column.
    #[arg(long)]
    rows: Option<usize>,

    /// Physical square size; 1.0 is fine for intrinsics only.
    #[arg(long)]
    square_size: Option<f64>,

    /// Where to write the calibration result.
    #[arg(long)]
    params_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = CollectCli::parse();

    let mut config = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => CollectorConfig::default(),
    };
    if let Some(cols) = cli.cols {
        config.board.cols = cols;
    }
    if let Some(rows) = cli.rows {
        config.board.rows = rows;
    }
    if let Some(square_size) = cli.square_size {
        config.board.square_size = square_size;
    }
    if let Some(params_file) = cli.params_file {
        config.params_file = params_file;
    }

    let stack = DetectorStack::standard();
    let outcome = collect_observations(&cli.images_dir, &cli.output_dir, &config, &stack)?;
    println!(
        "{} of {} images usable",
        outcome.observations.len(),
        outcome.images_seen
    );

    if outcome.observations.is_empty() {
        println!("No valid images found!");
        return Ok(());
    }
    let frame_size = outcome
        .frame_size
        .ok_or("accepted observations without a frame size")?;

    let board = Board::from_config(&config.board);
    let result = calibrate_intrinsics(&board, &outcome.observations, frame_size)?;
    save_calibration(&config.params_file, &result)?;
    println!(
        "Calibration done. Parameters saved to {}",
        config.params_file.display()
    );
    Ok(())
}
