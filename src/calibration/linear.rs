//! Linear bootstrap for the nonlinear refinement: per-view homographies,
//! focal length from the homography constraint, and planar pose
//! decomposition.

use nalgebra as na;

/// Normalized DLT homography mapping board-plane points (z = 0) to image
/// points. Returns `None` for degenerate configurations.
pub fn homography_dlt(
    world: &[na::Point2<f64>],
    img: &[na::Point2<f64>],
) -> Option<na::Matrix3<f64>> {
    let n = world.len();
    if n != img.len() || n < 4 {
        return None;
    }
    let (world_n, t_world) = normalize_points(world)?;
    let (img_n, t_img) = normalize_points(img)?;

    let mut a = na::DMatrix::<f64>::zeros(2 * n, 9);
    for (idx, (w, p)) in world_n.iter().zip(img_n.iter()).enumerate() {
        let (x, y) = (w.x, w.y);
        let (u, v) = (p.x, p.y);
        a.set_row(
            2 * idx,
            &na::RowDVector::from_row_slice(&[x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y, -u]),
        );
        a.set_row(
            2 * idx + 1,
            &na::RowDVector::from_row_slice(&[0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y, -v]),
        );
    }
    let svd = a.svd(false, true);
    let v_t = svd.v_t?;
    let h_vec = v_t.row(8);
    let h_norm = na::Matrix3::from_row_slice(&[
        h_vec[0], h_vec[1], h_vec[2],
        h_vec[3], h_vec[4], h_vec[5],
        h_vec[6], h_vec[7], h_vec[8],
    ]);

    let h = t_img.try_inverse()? * h_norm * t_world;
    if h[(2, 2)].abs() < 1e-12 {
        return None;
    }
    Some(h / h[(2, 2)])
}

/// Hartley normalization: centroid to origin, mean distance sqrt(2).
fn normalize_points(points: &[na::Point2<f64>]) -> Option<(Vec<na::Point2<f64>>, na::Matrix3<f64>)> {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p.x - mean_x).powi(2) + (p.y - mean_y).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if mean_dist < 1e-12 {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    let t = na::Matrix3::new(
        s, 0.0, -s * mean_x,
        0.0, s, -s * mean_y,
        0.0, 0.0, 1.0,
    );
    let normed = points
        .iter()
        .map(|p| na::Point2::new(s * (p.x - mean_x), s * (p.y - mean_y)))
        .collect();
    Some((normed, t))
}

/// Focal length (assuming fx = fy and a known principal point) from the
/// orthonormality constraints on the first two homography columns.
///
/// Returns `None` when the view does not constrain focal length, e.g. a
/// fronto-parallel board.
pub fn focal_from_homography(h: &na::Matrix3<f64>, cx: f64, cy: f64) -> Option<f64> {
    // Move the principal point to the origin before applying the
    // constraint equations.
    let t = na::Matrix3::new(
        1.0, 0.0, -cx,
        0.0, 1.0, -cy,
        0.0, 0.0, 1.0,
    );
    let h = t * h;

    let h0 = h[(0, 0)];
    let h1 = h[(0, 1)];
    let h3 = h[(1, 0)];
    let h4 = h[(1, 1)];
    let h6 = h[(2, 0)];
    let h7 = h[(2, 1)];

    // h1^T w h2 = 0 and h1^T w h1 = h2^T w h2, with w = diag(1, 1, f^2).
    let f_a = {
        let d = h6 * h7;
        if d.abs() > 1e-12 {
            let v = -(h0 * h1 + h3 * h4) / d;
            if v > 0.0 { Some(v.sqrt()) } else { None }
        } else {
            None
        }
    };
    let f_b = {
        let d = h6 * h6 - h7 * h7;
        if d.abs() > 1e-12 {
            let v = (h1 * h1 + h4 * h4 - h0 * h0 - h3 * h3) / d;
            if v > 0.0 { Some(v.sqrt()) } else { None }
        } else {
            None
        }
    };

    match (f_a, f_b) {
        (Some(a), Some(b)) => Some((a * b).sqrt()),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Decompose a board-plane homography into a camera pose given intrinsics.
///
/// r1 and r2 come from the scaled first two columns of K^-1 H, r3 from
/// their cross product; the nearest rotation matrix absorbs the numerical
/// non-orthogonality. The scale sign is chosen so the board sits in front
/// of the camera.
pub fn pose_from_homography(
    h: &na::Matrix3<f64>,
    k: &na::Matrix3<f64>,
) -> Option<(na::Vector3<f64>, na::Vector3<f64>)> {
    let k_inv = k.try_inverse()?;
    let a = k_inv * h;
    let a1 = a.column(0).into_owned();
    let a2 = a.column(1).into_owned();
    let a3 = a.column(2).into_owned();
    let norm1 = a1.norm();
    if norm1 < 1e-12 {
        return None;
    }
    let mut lambda = 1.0 / norm1;
    if a3[2] * lambda < 0.0 {
        lambda = -lambda;
    }
    let r1 = a1 * lambda;
    let r2 = a2 * lambda;
    let r3 = r1.cross(&r2);
    let mut r = na::Matrix3::zeros();
    r.set_column(0, &r1);
    r.set_column(1, &r2);
    r.set_column(2, &r3);
    let rot = na::Rotation3::from_matrix(&r);
    let tvec = a3 * lambda;
    if !tvec.iter().all(|v| v.is_finite()) {
        return None;
    }
    Some((rot.scaled_axis(), tvec))
}
