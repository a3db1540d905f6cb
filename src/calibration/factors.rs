use camera_intrinsic_model::*;
use nalgebra as na;
use num_dual::DualDVec64;
use tiny_solver::factors::Factor;

/// One observed corner: residual between its measured pixel position and
/// the projection of its board point through the camera model and the
/// view's pose.
///
/// Parameter blocks: `[model params, rvec, tvec]`.
pub struct ReprojectionFactor {
    pub target: GenericModel<DualDVec64>,
    pub p3d: na::Point3<DualDVec64>,
    pub p2d: na::Vector2<DualDVec64>,
}

impl ReprojectionFactor {
    pub fn new(
        target: &GenericModel<f64>,
        p3d: &glam::Vec3,
        p2d: &glam::Vec2,
    ) -> ReprojectionFactor {
        let target = target.cast();
        let p3d = na::Point3::new(p3d.x, p3d.y, p3d.z).cast();
        let p2d = na::Vector2::new(p2d.x, p2d.y).cast();
        ReprojectionFactor { target, p3d, p2d }
    }
}

impl Factor for ReprojectionFactor {
    fn residual_func(
        &self,
        params: &[nalgebra::DVector<num_dual::DualDVec64>],
    ) -> nalgebra::DVector<num_dual::DualDVec64> {
        let model = self.target.new_from_params(&params[0]);
        let rvec = na::Vector3::new(
            params[1][0].clone(),
            params[1][1].clone(),
            params[1][2].clone(),
        );
        let tvec = na::Vector3::new(
            params[2][0].clone(),
            params[2][1].clone(),
            params[2][2].clone(),
        );
        let transform = na::Isometry3::new(tvec, rvec);
        let p3d_t = transform * self.p3d.clone();
        let p3d_t = na::Vector3::new(p3d_t.x.clone(), p3d_t.y.clone(), p3d_t.z.clone());
        let p2d_p = model.project_one(&p3d_t);

        na::dvector![
            p2d_p[0].clone() - self.p2d[0].clone(),
            p2d_p[1].clone() - self.p2d[1].clone()
        ]
    }
}
