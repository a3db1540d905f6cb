//! Intrinsic calibration from accumulated checkerboard observations.
//!
//! Linear bootstrap (per-view homographies, focal from the homography
//! constraint, planar pose decomposition) followed by a joint nonlinear
//! refinement of the OpenCV 5-coefficient model and all view poses.
//!
//! Solver failures are loud: degenerate view sets, non-finite parameters
//! and implausible reprojection error all surface as [`CalibError::Solver`]
//! instead of silently producing junk parameters.

pub mod factors;
pub mod linear;

use std::collections::HashMap;

use camera_intrinsic_model::{GenericModel, OpenCVModel5};
use log::{debug, info};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use tiny_solver::Optimizer;

use crate::board::Board;
use crate::detected_points::FrameObservation;
use crate::error::CalibError;
use factors::ReprojectionFactor;

/// Final reprojection RMS above this is treated as solver failure.
const MAX_RMS_PX: f64 = 5.0;

/// The persisted calibration artifact: intrinsic matrix plus distortion
/// coefficients `[k1, k2, p1, p2, k3]`, with the calibration frame size
/// and the final reprojection RMS for the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub camera_matrix: [[f64; 3]; 3],
    pub dist_coefs: Vec<f64>,
    pub image_width: u32,
    pub image_height: u32,
    pub rms_error: f64,
}

impl CalibrationResult {
    pub fn matrix(&self) -> na::Matrix3<f64> {
        na::Matrix3::from_fn(|r, c| self.camera_matrix[r][c])
    }

    pub fn fx(&self) -> f64 {
        self.camera_matrix[0][0]
    }

    pub fn fy(&self) -> f64 {
        self.camera_matrix[1][1]
    }
}

/// Calibrate intrinsics from all accepted observations.
///
/// `frame_size` must already be validated as shared by every observation;
/// the collector does that before calling in here.
pub fn calibrate_intrinsics(
    board: &Board,
    observations: &[FrameObservation],
    frame_size: (u32, u32),
) -> Result<CalibrationResult, CalibError> {
    if observations.is_empty() {
        return Err(CalibError::Solver("no observations to calibrate from".into()));
    }
    let (width, height) = frame_size;
    let cx0 = (width as f64 - 1.0) / 2.0;
    let cy0 = (height as f64 - 1.0) / 2.0;

    let world: Vec<na::Point2<f64>> = board
        .object_points
        .iter()
        .map(|p| na::Point2::new(p.x as f64, p.y as f64))
        .collect();

    // Per-view homographies.
    let mut views: Vec<(&FrameObservation, na::Matrix3<f64>)> = Vec::new();
    for obs in observations {
        let img: Vec<na::Point2<f64>> = obs
            .corners
            .iter()
            .map(|c| na::Point2::new(c.x as f64, c.y as f64))
            .collect();
        match linear::homography_dlt(&world, &img) {
            Some(h) => views.push((obs, h)),
            None => {
                debug!("degenerate homography for {}, view dropped", obs.path.display());
            }
        }
    }
    if views.is_empty() {
        return Err(CalibError::Solver(
            "no view admits a board homography".into(),
        ));
    }

    // Focal bootstrap; fronto-parallel views contribute nothing here.
    let focals: Vec<f64> = views
        .iter()
        .filter_map(|(_, h)| linear::focal_from_homography(h, cx0, cy0))
        .filter(|f| f.is_finite() && *f > 0.0)
        .collect();
    if focals.is_empty() {
        return Err(CalibError::Solver(
            "views do not constrain focal length (board never tilted?)".into(),
        ));
    }
    let f0 = focals.iter().map(|f| f.ln()).sum::<f64>() / focals.len() as f64;
    let f0 = f0.exp();
    debug!("initial focal estimate {:.2} px from {} views", f0, focals.len());

    let k0 = na::Matrix3::new(
        f0, 0.0, cx0,
        0.0, f0, cy0,
        0.0, 0.0, 1.0,
    );

    let init_params = na::dvector![f0, f0, cx0, cy0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let model = GenericModel::OpenCVModel5(OpenCVModel5::new(&init_params, width, height));

    let mut problem = tiny_solver::Problem::new();
    let mut initial_values = HashMap::<String, na::DVector<f64>>::new();
    initial_values.insert("params".to_string(), init_params);

    for (i, (obs, h)) in views.iter().enumerate() {
        let (rvec, tvec) = linear::pose_from_homography(h, &k0).ok_or_else(|| {
            CalibError::Solver(format!("pose bootstrap failed for {}", obs.path.display()))
        })?;
        let rvec_name = format!("rvec{}", i);
        let tvec_name = format!("tvec{}", i);
        for (p3d, p2d) in board.object_points.iter().zip(obs.corners.iter()) {
            let cost = ReprojectionFactor::new(&model, p3d, p2d);
            problem.add_residual_block(
                2,
                vec![
                    ("params".to_string(), 9),
                    (rvec_name.clone(), 3),
                    (tvec_name.clone(), 3),
                ],
                Box::new(cost),
                None,
            );
        }
        initial_values.insert(rvec_name, na::dvector![rvec[0], rvec[1], rvec[2]]);
        initial_values.insert(tvec_name, na::dvector![tvec[0], tvec[1], tvec[2]]);
    }

    let optimizer = tiny_solver::GaussNewtonOptimizer {};
    let result = optimizer.optimize(&problem, &initial_values, None);

    let params = result
        .get("params")
        .ok_or_else(|| CalibError::Solver("optimizer returned no parameters".into()))?;
    if !params.iter().all(|v| v.is_finite()) {
        return Err(CalibError::Solver("non-finite parameters after refinement".into()));
    }

    let refined = GenericModel::OpenCVModel5(OpenCVModel5::new(params, width, height));
    let rms = reprojection_rms(&refined, board, &views, &result)?;
    if !rms.is_finite() || rms > MAX_RMS_PX {
        return Err(CalibError::Solver(format!(
            "implausible reprojection rms {:.3} px",
            rms
        )));
    }
    info!(
        "calibrated {} views, reprojection rms {:.4} px",
        views.len(),
        rms
    );

    Ok(CalibrationResult {
        camera_matrix: [
            [params[0], 0.0, params[2]],
            [0.0, params[1], params[3]],
            [0.0, 0.0, 1.0],
        ],
        dist_coefs: vec![params[4], params[5], params[6], params[7], params[8]],
        image_width: width,
        image_height: height,
        rms_error: rms,
    })
}

fn reprojection_rms(
    model: &GenericModel<f64>,
    board: &Board,
    views: &[(&FrameObservation, na::Matrix3<f64>)],
    result: &HashMap<String, na::DVector<f64>>,
) -> Result<f64, CalibError> {
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;
    for (i, (obs, _)) in views.iter().enumerate() {
        let rvec = result
            .get(&format!("rvec{}", i))
            .ok_or_else(|| CalibError::Solver("optimizer dropped a pose block".into()))?;
        let tvec = result
            .get(&format!("tvec{}", i))
            .ok_or_else(|| CalibError::Solver("optimizer dropped a pose block".into()))?;
        let transform = na::Isometry3::new(
            na::Vector3::new(tvec[0], tvec[1], tvec[2]),
            na::Vector3::new(rvec[0], rvec[1], rvec[2]),
        );
        for (p3d, p2d) in board.object_points.iter().zip(obs.corners.iter()) {
            let p_cam = transform * na::Point3::new(p3d.x as f64, p3d.y as f64, p3d.z as f64);
            if p_cam.z <= 1e-9 {
                continue;
            }
            let proj = model.project_one(&na::Vector3::new(p_cam.x, p_cam.y, p_cam.z));
            let du = proj[0] - p2d.x as f64;
            let dv = proj[1] - p2d.y as f64;
            sum_sq += du * du + dv * dv;
            count += 1;
        }
    }
    if count == 0 {
        return Err(CalibError::Solver("no reprojectable points".into()));
    }
    Ok((sum_sq / count as f64).sqrt())
}
