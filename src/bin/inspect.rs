use std::path::PathBuf;

use checkerboard_calibration::io::{DEFAULT_PARAMS_FILE, load_calibration};
use clap::Parser;

/// Load a persisted calibration result and print a summary.
#[derive(Parser)]
#[command(version, about, author)]
struct InspectCli {
    /// Path to the calibration parameter file.
    #[arg(default_value = DEFAULT_PARAMS_FILE)]
    params_file: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = InspectCli::parse();
    let result = load_calibration(&cli.params_file)?;

    println!("Camera matrix shape: 3x3");
    for row in &result.camera_matrix {
        println!("  [{:12.4} {:12.4} {:12.4}]", row[0], row[1], row[2]);
    }
    println!("Distortion coefficients: {:?}", result.dist_coefs);
    println!(
        "Calibration frame: {}x{}, reprojection rms {:.4} px",
        result.image_width, result.image_height, result.rms_error
    );
    Ok(())
}
