use std::path::{Path, PathBuf};

use checkerboard_calibration::board::BoardConfig;
use checkerboard_calibration::synthetic::{board_pose, render_checkerboard};
use clap::{Parser, Subcommand};
use nalgebra as na;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a synthetic checkerboard dataset with known intrinsics.
    Generate {
        /// Output directory.
        #[arg(short, long)]
        output: PathBuf,

        /// Internal corners per row.
        #[arg(long, default_value = "9")]
        cols: usize,

        /// Internal corners per column.
        #[arg(long, default_value = "6")]
        rows: usize,

        /// Physical square size.
        #[arg(long, default_value = "0.03")]
        square_size: f64,

        /// Number of frames to generate.
        #[arg(short, long, default_value = "8")]
        num_frames: usize,

        /// Image width.
        #[arg(long, default_value = "640")]
        width: u32,

        /// Image height.
        #[arg(long, default_value = "480")]
        height: u32,

        /// Ground-truth focal length in pixels.
        #[arg(long, default_value = "600.0")]
        focal: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    match args.command {
        Commands::Generate {
            output,
            cols,
            rows,
            square_size,
            num_frames,
            width,
            height,
            focal,
        } => generate_dataset(&output, cols, rows, square_size, num_frames, width, height, focal),
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_dataset(
    output_dir: &Path,
    cols: usize,
    rows: usize,
    square_size: f64,
    num_frames: usize,
    width: u32,
    height: u32,
    focal: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output_dir)?;
    let board = BoardConfig {
        cols,
        rows,
        square_size,
    };
    let k = na::Matrix3::new(
        focal, 0.0, (width as f64 - 1.0) / 2.0,
        0.0, focal, (height as f64 - 1.0) / 2.0,
        0.0, 0.0, 1.0,
    );

    // Deterministic pose sweep: tilts alternate around both axes so the
    // view set always constrains focal length.
    for idx in 0..num_frames {
        let phase = idx as f64 / num_frames.max(1) as f64;
        let tilt_x = 0.35 * (2.0 * std::f64::consts::PI * phase).sin();
        let tilt_y = 0.35 * (2.0 * std::f64::consts::PI * phase).cos();
        let roll = 0.2 * phase;
        let distance = focal * square_size * (cols + 2) as f64 / (0.8 * width as f64);
        let pose = board_pose(&board, tilt_x, tilt_y, roll, distance);
        let img = render_checkerboard(&k, &pose, &board, width, height);
        img.save(output_dir.join(format!("{:06}.png", idx)))?;
    }

    let truth = serde_json::json!({
        "camera_matrix": [
            [k[(0, 0)], k[(0, 1)], k[(0, 2)]],
            [k[(1, 0)], k[(1, 1)], k[(1, 2)]],
            [k[(2, 0)], k[(2, 1)], k[(2, 2)]],
        ],
        "board": board,
    });
    std::fs::write(
        output_dir.join("ground_truth.json"),
        serde_json::to_string_pretty(&truth)?,
    )?;
    println!("Generated {} frames in {}", num_frames, output_dir.display());
    Ok(())
}
