use std::path::PathBuf;

use camera_intrinsic_model::{GenericModel, OpenCVModel5};
use checkerboard_calibration::board::{Board, BoardConfig};
use checkerboard_calibration::calibration::calibrate_intrinsics;
use checkerboard_calibration::detected_points::FrameObservation;
use checkerboard_calibration::error::CalibError;
use checkerboard_calibration::synthetic::{board_pose, project_corners};
use glam::Vec2;
use nalgebra as na;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FOCAL: f64 = 600.0;

fn test_board() -> Board {
    Board::from_config(&BoardConfig {
        cols: 9,
        rows: 6,
        square_size: 0.03,
    })
}

fn test_camera() -> na::Matrix3<f64> {
    na::Matrix3::new(
        FOCAL, 0.0, (WIDTH as f64 - 1.0) / 2.0,
        0.0, FOCAL, (HEIGHT as f64 - 1.0) / 2.0,
        0.0, 0.0, 1.0,
    )
}

fn make_obs(idx: usize, corners: Vec<Vec2>) -> FrameObservation {
    FrameObservation {
        path: PathBuf::from(format!("view{:02}.png", idx)),
        corners,
        img_w_h: (WIDTH, HEIGHT),
        detector: "synthetic",
    }
}

/// A tilt sweep that keeps the board inside the frame while exercising
/// both tilt axes.
fn tilt_sweep(n: usize) -> Vec<(f64, f64, f64)> {
    (0..n)
        .map(|i| {
            let phase = i as f64 / n as f64;
            let a = 2.0 * std::f64::consts::PI * phase;
            (0.35 * a.sin(), 0.35 * a.cos(), 0.15 * phase)
        })
        .collect()
}

#[test]
fn test_recovers_pinhole_intrinsics_from_exact_corners() {
    let board = test_board();
    let k = test_camera();

    let observations: Vec<FrameObservation> = tilt_sweep(6)
        .into_iter()
        .enumerate()
        .map(|(i, (tx, ty, roll))| {
            let pose = board_pose(&board.config, tx, ty, roll, 0.5);
            make_obs(i, project_corners(&k, &pose, &board.config))
        })
        .collect();

    let result = calibrate_intrinsics(&board, &observations, (WIDTH, HEIGHT))
        .expect("exact corners must calibrate");

    assert!((result.fx() - FOCAL).abs() < 1.5, "fx = {}", result.fx());
    assert!((result.fy() - FOCAL).abs() < 1.5, "fy = {}", result.fy());
    assert!((result.camera_matrix[0][2] - 319.5).abs() < 1.5);
    assert!((result.camera_matrix[1][2] - 239.5).abs() < 1.5);
    assert_eq!(result.dist_coefs.len(), 5);
    for d in &result.dist_coefs {
        assert!(d.abs() < 0.02, "distortion leaked: {:?}", result.dist_coefs);
    }
    assert!(result.rms_error < 0.5, "rms = {}", result.rms_error);
    assert_eq!(result.image_width, WIDTH);
    assert_eq!(result.image_height, HEIGHT);
}

#[test]
fn test_recovers_radial_distortion() {
    let board = test_board();
    let truth = GenericModel::OpenCVModel5(OpenCVModel5::new(
        &na::dvector![FOCAL, FOCAL, 319.5, 239.5, -0.1, 0.02, 0.0, 0.0, 0.0],
        WIDTH,
        HEIGHT,
    ));

    let observations: Vec<FrameObservation> = tilt_sweep(6)
        .into_iter()
        .enumerate()
        .map(|(i, (tx, ty, roll))| {
            let pose = board_pose(&board.config, tx, ty, roll, 0.5);
            let corners = board
                .object_points
                .iter()
                .map(|p| {
                    let p_cam =
                        pose * na::Point3::new(p.x as f64, p.y as f64, p.z as f64);
                    let uv =
                        truth.project_one(&na::Vector3::new(p_cam.x, p_cam.y, p_cam.z));
                    Vec2::new(uv[0] as f32, uv[1] as f32)
                })
                .collect();
            make_obs(i, corners)
        })
        .collect();

    let result = calibrate_intrinsics(&board, &observations, (WIDTH, HEIGHT))
        .expect("distorted corners must still calibrate");

    assert!((result.fx() - FOCAL).abs() < 5.0, "fx = {}", result.fx());
    assert!((result.fy() - FOCAL).abs() < 5.0, "fy = {}", result.fy());
    assert!(
        (result.dist_coefs[0] - (-0.1)).abs() < 0.02,
        "k1 = {}",
        result.dist_coefs[0]
    );
    assert!(
        (result.dist_coefs[1] - 0.02).abs() < 0.02,
        "k2 = {}",
        result.dist_coefs[1]
    );
    assert!(result.rms_error < 0.5, "rms = {}", result.rms_error);
}

#[test]
fn test_fronto_parallel_views_do_not_constrain_focal() {
    let board = test_board();
    let k = test_camera();

    // Same pose class every time: no tilt, varying distance only.
    let observations: Vec<FrameObservation> = (0..4)
        .map(|i| {
            let pose = board_pose(&board.config, 0.0, 0.0, 0.0, 0.45 + 0.05 * i as f64);
            make_obs(i, project_corners(&k, &pose, &board.config))
        })
        .collect();

    match calibrate_intrinsics(&board, &observations, (WIDTH, HEIGHT)) {
        Err(CalibError::Solver(_)) => {}
        other => panic!("expected solver failure, got {:?}", other.map(|r| r.rms_error)),
    }
}

#[test]
fn test_empty_observation_set_is_an_error() {
    let board = test_board();
    match calibrate_intrinsics(&board, &[], (WIDTH, HEIGHT)) {
        Err(CalibError::Solver(_)) => {}
        other => panic!("expected solver failure, got {:?}", other.map(|r| r.rms_error)),
    }
}
