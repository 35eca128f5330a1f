//! EPnP pose solver
//!
//! Recovers the rigid transform between object and camera frames from 2D-3D
//! correspondences: four control points span the object points, the camera
//! frame coordinates of the control points fall out of the null space of the
//! projection constraint matrix, and Kabsch alignment turns the recovered
//! point sets into a pose.

use crate::correspondence::Correspondences;
use log::debug;
use nalgebra::{DMatrix, Matrix4, SymmetricEigen, Vector4};
use pose6d_core::{Camera, Error, Matrix3, PinholeCamera, Point3d, Pose, Result, Vector3};

/// Minimum number of correspondences for a stable solve
pub const MIN_CORRESPONDENCES: usize = 6;

/// Result of a full scene solve
#[derive(Debug, Clone, Copy)]
pub struct PnpSolution {
    /// Object pose in the camera frame
    pub camera_pose: Pose,
    /// Object pose in the world frame the scene registry stores
    pub world_pose: Pose,
}

impl PnpSolution {
    /// Sum of absolute differences between the solved world pose and a
    /// ground-truth pose
    pub fn error_against(&self, gt_pose: &Pose) -> f64 {
        self.world_pose.abs_diff(gt_pose)
    }
}

/// Solve for the object pose in the camera frame with EPnP
pub fn solve_epnp(corr: &Correspondences, camera: &PinholeCamera) -> Result<Pose> {
    let n = corr.len();
    if n < MIN_CORRESPONDENCES {
        return Err(Error::Solver(format!(
            "need at least {MIN_CORRESPONDENCES} correspondences, got {n}"
        )));
    }

    let control = control_points(&corr.points3d)?;
    let alphas = barycentric_coordinates(&corr.points3d, &control)?;

    // Projection constraints: for u = fx*x/z + cx each correspondence gives
    //   sum_j a_j * (fx * cx_j + (cx - u) * cz_j) = 0
    // and the analogous row for v.
    let fx = camera.fx();
    let fy = camera.fy();
    let (cx, cy) = camera.principal_point();

    let mut m = DMatrix::<f64>::zeros(2 * n, 12);
    for i in 0..n {
        let a = alphas[i];
        let u = corr.points2d[i].x;
        let v = corr.points2d[i].y;
        for j in 0..4 {
            m[(2 * i, 3 * j)] = a[j] * fx;
            m[(2 * i, 3 * j + 2)] = a[j] * (cx - u);
            m[(2 * i + 1, 3 * j + 1)] = a[j] * fy;
            m[(2 * i + 1, 3 * j + 2)] = a[j] * (cy - v);
        }
    }

    let svd = m.svd(false, true);
    let v_t = svd
        .v_t
        .ok_or_else(|| Error::Solver("SVD V^T not available".into()))?;
    let mut kernel_row = 0;
    for (i, sv) in svd.singular_values.iter().enumerate() {
        if *sv < svd.singular_values[kernel_row] {
            kernel_row = i;
        }
    }
    let kernel = v_t.row(kernel_row);

    let mut camera_control = [Vector3::zeros(); 4];
    for j in 0..4 {
        camera_control[j] = Vector3::new(kernel[3 * j], kernel[3 * j + 1], kernel[3 * j + 2]);
    }

    // The kernel is known only up to scale; recover it from the control point
    // distances in the object frame
    let mut num = 0.0;
    let mut den = 0.0;
    for j in 0..4 {
        for k in (j + 1)..4 {
            let dc = (camera_control[j] - camera_control[k]).norm();
            let dw = (control[j] - control[k]).norm();
            num += dc * dw;
            den += dc * dc;
        }
    }
    if den <= f64::EPSILON {
        return Err(Error::Solver("control points collapsed in camera frame".into()));
    }
    let beta = num / den;
    for c in &mut camera_control {
        *c *= beta;
    }

    // Camera-frame positions of the correspondences
    let mut camera_points = Vec::with_capacity(n);
    let mut mean_z = 0.0;
    for a in &alphas {
        let mut p = Vector3::zeros();
        for j in 0..4 {
            p += a[j] * camera_control[j];
        }
        mean_z += p.z;
        camera_points.push(p);
    }

    // Cheirality: the scale sign is ambiguous, points must sit in front of
    // the camera
    if mean_z < 0.0 {
        for p in &mut camera_points {
            *p = -*p;
        }
    }

    let camera_points: Vec<Point3d> = camera_points.into_iter().map(Point3d::from).collect();
    let pose = pose_from_points(&corr.points3d, &camera_points)?;
    debug!("epnp solve complete over {n} correspondences");
    Ok(pose)
}

/// Solve EPnP and lift the camera-frame pose into the world frame of the
/// annotation scene
pub fn solve_world_pose(corr: &Correspondences, camera: &Camera) -> Result<PnpSolution> {
    let camera_pose = solve_epnp(corr, &camera.intrinsics)?;
    let world_pose = camera.extrinsics.camera_to_world()?.compose(&camera_pose);
    Ok(PnpSolution {
        camera_pose,
        world_pose,
    })
}

/// Root-mean-square pixel error of a camera-frame pose over correspondences
pub fn reprojection_rmse(
    corr: &Correspondences,
    camera_pose: &Pose,
    camera: &PinholeCamera,
) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (p3, p2) in corr.points3d.iter().zip(&corr.points2d) {
        if let Some(projected) = camera.project(&camera_pose.transform_point(p3)) {
            sum += (projected - *p2).norm_squared();
            count += 1;
        }
    }
    if count == 0 {
        return f64::INFINITY;
    }
    (sum / count as f64).sqrt()
}

/// Four control points spanning the object points: the centroid plus the
/// principal directions scaled by the point spread
fn control_points(points: &[Point3d]) -> Result<[Vector3<f64>; 4]> {
    let n = points.len() as f64;
    let mut centroid = Vector3::zeros();
    for p in points {
        centroid += p.coords;
    }
    centroid /= n;

    let mut cov = Matrix3::zeros();
    for p in points {
        let d = p.coords - centroid;
        cov += d * d.transpose();
    }
    cov /= n;

    let eigen = SymmetricEigen::new(cov);
    let max_ev = eigen.eigenvalues.amax();
    if max_ev <= f64::EPSILON {
        return Err(Error::Solver("all points coincide".into()));
    }

    let mut control = [centroid; 4];
    for j in 0..3 {
        let ev = eigen.eigenvalues[j];
        if ev < 1e-10 * max_ev {
            return Err(Error::Solver(
                "degenerate point set, control points are not independent".into(),
            ));
        }
        control[j + 1] = centroid + ev.sqrt() * eigen.eigenvectors.column(j);
    }
    Ok(control)
}

/// Barycentric coordinates of every point with respect to the control points
fn barycentric_coordinates(
    points: &[Point3d],
    control: &[Vector3<f64>; 4],
) -> Result<Vec<Vector4<f64>>> {
    let mut c = Matrix4::zeros();
    for j in 0..4 {
        c.fixed_view_mut::<3, 1>(0, j).copy_from(&control[j]);
        c[(3, j)] = 1.0;
    }
    let c_inv = c
        .try_inverse()
        .ok_or_else(|| Error::Solver("control point basis is singular".into()))?;

    Ok(points
        .iter()
        .map(|p| c_inv * Vector4::new(p.x, p.y, p.z, 1.0))
        .collect())
}

/// Recover the rigid transform mapping `world` onto `camera` points with the
/// Kabsch algorithm (SVD rotation alignment plus translation)
pub fn pose_from_points(world: &[Point3d], camera: &[Point3d]) -> Result<Pose> {
    if world.len() != camera.len() || world.len() < 3 {
        return Err(Error::Solver("degenerate point correspondence".into()));
    }

    let n = world.len() as f64;
    let mut c_w = Vector3::zeros();
    let mut c_c = Vector3::zeros();
    for (pw, pc) in world.iter().zip(camera.iter()) {
        c_w += pw.coords;
        c_c += pc.coords;
    }
    c_w /= n;
    c_c /= n;

    let mut h = Matrix3::zeros();
    for (pw, pc) in world.iter().zip(camera.iter()) {
        let dw = pw.coords - c_w;
        let dc = pc.coords - c_c;
        h += dc * dw.transpose();
    }

    let svd = h.svd(true, true);
    let u = svd
        .u
        .ok_or_else(|| Error::Solver("SVD U not available".into()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| Error::Solver("SVD V^T not available".into()))?;
    let mut r = u * v_t;
    if r.determinant() < 0.0 {
        let mut u_fix = u;
        u_fix.column_mut(2).neg_mut();
        r = u_fix * v_t;
    }

    let t = c_c - r * c_w;
    Ok(Pose::from_rot_trans(r, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pose6d_core::{Point2d, Pose};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn planted_pose() -> Pose {
        let rot = nalgebra::Rotation3::from_euler_angles(0.2, -0.4, 0.9);
        Pose::from_rot_trans(rot.into_inner(), Vector3::new(1.5, -0.8, 3.0))
    }

    fn scatter(rng: &mut StdRng, n: usize) -> Vec<Point3d> {
        (0..n)
            .map(|_| {
                Point3d::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                )
            })
            .collect()
    }

    fn project_through(
        points: &[Point3d],
        pose: &Pose,
        camera: &Camera,
    ) -> Correspondences {
        let view = camera.extrinsics.view_matrix().unwrap();
        let mut corr = Correspondences::default();
        for p in points {
            let cam = view.transform_point(&pose.transform_point(p));
            let pixel = camera.intrinsics.project(&cam).expect("in front of camera");
            corr.points3d.push(*p);
            corr.points2d.push(pixel);
        }
        corr
    }

    #[test]
    fn noiseless_solve_recovers_planted_pose() {
        let camera = Camera::annotation_default(1920, 1080, 5e4).unwrap();
        let pose = planted_pose();
        let mut rng = StdRng::seed_from_u64(7);
        let points = scatter(&mut rng, 40);
        let corr = project_through(&points, &pose, &camera);

        let solution = solve_world_pose(&corr, &camera).unwrap();
        assert_relative_eq!(
            solution.world_pose.matrix(),
            pose.matrix(),
            epsilon = 1e-6
        );
        assert!(solution.error_against(&pose) < 1e-4);
        assert!(reprojection_rmse(&corr, &solution.camera_pose, &camera.intrinsics) < 1e-6);
    }

    #[test]
    fn camera_pose_composes_view_and_object_pose() {
        let camera = Camera::annotation_default(1920, 1080, 5e4).unwrap();
        let pose = planted_pose();
        let mut rng = StdRng::seed_from_u64(3);
        let points = scatter(&mut rng, 24);
        let corr = project_through(&points, &pose, &camera);

        let solution = solve_world_pose(&corr, &camera).unwrap();
        let view = camera.extrinsics.view_matrix().unwrap();
        let expected = view * pose;
        assert_relative_eq!(
            solution.camera_pose.matrix(),
            expected.matrix(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn minimum_correspondence_count_is_enforced() {
        let camera = Camera::annotation_default(1920, 1080, 5e4).unwrap();
        let pose = planted_pose();
        let mut rng = StdRng::seed_from_u64(11);
        let points = scatter(&mut rng, MIN_CORRESPONDENCES - 1);
        let corr = project_through(&points, &pose, &camera);
        assert!(solve_epnp(&corr, &camera.intrinsics).is_err());
    }

    #[test]
    fn collinear_points_are_rejected() {
        let camera = Camera::annotation_default(1920, 1080, 5e4).unwrap();
        let pose = planted_pose();
        let points: Vec<Point3d> = (0..10)
            .map(|i| Point3d::new(i as f64, 2.0 * i as f64, -i as f64))
            .collect();
        let corr = project_through(&points, &pose, &camera);
        assert!(solve_epnp(&corr, &camera.intrinsics).is_err());
    }

    #[test]
    fn kabsch_aligns_exact_point_sets() {
        let pose = planted_pose();
        let mut rng = StdRng::seed_from_u64(5);
        let world = scatter(&mut rng, 12);
        let camera: Vec<Point3d> = world.iter().map(|p| pose.transform_point(p)).collect();
        let recovered = pose_from_points(&world, &camera).unwrap();
        assert_relative_eq!(recovered.matrix(), pose.matrix(), epsilon = 1e-9);
    }

    #[test]
    fn kabsch_rejects_mismatched_lengths() {
        let world = vec![Point3d::origin(); 4];
        let camera = vec![Point3d::origin(); 3];
        assert!(pose_from_points(&world, &camera).is_err());
        assert!(pose_from_points(&world[..2].to_vec(), &camera[..2].to_vec()).is_err());
    }

    #[test]
    fn reprojection_rmse_is_infinite_behind_the_camera() {
        let camera = PinholeCamera::from_focal_length(640, 480, 100.0).unwrap();
        let corr = Correspondences {
            points2d: vec![Point2d::new(320.0, 240.0)],
            points3d: vec![Point3d::new(0.0, 0.0, -10.0)],
        };
        assert_eq!(
            reprojection_rmse(&corr, &Pose::identity(), &camera),
            f64::INFINITY
        );
    }
}
