//! Pinhole camera model
//!
//! Converts calibration-style intrinsics (focal length, principal point) into
//! the parameters a perspective renderer consumes: vertical view angle in
//! degrees and a normalized window center. Extrinsics follow the surgical
//! microscope convention: the camera sits on the negative z axis looking at
//! the origin with view-up `(0, -1, 0)`.

use crate::error::{Error, Result};
use crate::point::{Point2d, Point3d, Vector3d};
use crate::pose::Pose;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Intrinsic camera parameters over a fixed image size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeCamera {
    pub width: u32,
    pub height: u32,
    intrinsics: Matrix3<f64>,
}

impl PinholeCamera {
    /// Build intrinsics from a single focal length with the principal point
    /// at the image center
    pub fn from_focal_length(width: u32, height: u32, focal_length: f64) -> Result<Self> {
        let intrinsics = Matrix3::new(
            focal_length,
            0.0,
            width as f64 / 2.0,
            0.0,
            focal_length,
            height as f64 / 2.0,
            0.0,
            0.0,
            1.0,
        );
        Self::from_matrix(width, height, intrinsics)
    }

    /// Build a camera from an explicit 3x3 intrinsic matrix
    pub fn from_matrix(width: u32, height: u32, intrinsics: Matrix3<f64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Camera("image size must be non-zero".into()));
        }
        if intrinsics[(0, 0)] <= 0.0 || intrinsics[(1, 1)] <= 0.0 {
            return Err(Error::Camera("focal length must be positive".into()));
        }
        Ok(Self {
            width,
            height,
            intrinsics,
        })
    }

    /// The 3x3 intrinsic matrix
    pub fn intrinsics(&self) -> &Matrix3<f64> {
        &self.intrinsics
    }

    pub fn fx(&self) -> f64 {
        self.intrinsics[(0, 0)]
    }

    pub fn fy(&self) -> f64 {
        self.intrinsics[(1, 1)]
    }

    /// Principal point `(cx, cy)` in pixels
    pub fn principal_point(&self) -> (f64, f64) {
        (self.intrinsics[(0, 2)], self.intrinsics[(1, 2)])
    }

    /// Vertical view angle in degrees: `degrees(2 * atan2(h/2, fy))`
    pub fn view_angle_deg(&self) -> f64 {
        (2.0 * (self.height as f64 / 2.0).atan2(self.fy())).to_degrees()
    }

    /// Principal point expressed as a normalized window center offset,
    /// `(-2(cx - w/2)/w, 2(cy - h/2)/h)`
    pub fn window_center(&self) -> (f64, f64) {
        let (cx, cy) = self.principal_point();
        let w = self.width as f64;
        let h = self.height as f64;
        (-2.0 * (cx - w / 2.0) / w, 2.0 * (cy - h / 2.0) / h)
    }

    /// Project a point in the camera frame to pixel coordinates
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub fn project(&self, point: &Point3d) -> Option<Point2d> {
        if point.z <= 0.0 {
            return None;
        }
        let (cx, cy) = self.principal_point();
        Some(Point2d::new(
            self.fx() * point.x / point.z + cx,
            self.fy() * point.y / point.z + cy,
        ))
    }
}

/// Invert [`PinholeCamera::view_angle_deg`]: the focal length that yields the
/// given vertical view angle over an image of the given height
pub fn focal_from_view_angle(height: u32, view_angle_deg: f64) -> f64 {
    (height as f64 / 2.0) / (view_angle_deg.to_radians() / 2.0).tan()
}

/// Extrinsic camera parameters: where the rendering camera sits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraExtrinsics {
    pub position: Point3d,
    pub focal_point: Point3d,
    pub view_up: Vector3d,
}

impl CameraExtrinsics {
    /// Default placement for a camera with the given focal length: on the
    /// negative z axis at `-f/100` millimeters, looking at the origin,
    /// y pointing down
    pub fn facing_origin(focal_length: f64) -> Self {
        Self {
            position: Point3d::new(0.0, 0.0, -focal_length / 100.0),
            focal_point: Point3d::origin(),
            view_up: Vector3d::new(0.0, -1.0, 0.0),
        }
    }

    /// World-to-camera rigid transform in the OpenCV convention
    /// (x right, y down, z forward)
    pub fn view_matrix(&self) -> Result<Pose> {
        let forward = self.focal_point - self.position;
        if forward.norm() == 0.0 {
            return Err(Error::Camera(
                "camera position coincides with focal point".into(),
            ));
        }
        let forward = forward.normalize();
        let down = -self.view_up;
        let right = down.cross(&forward);
        if right.norm() == 0.0 {
            return Err(Error::Camera("view-up is parallel to view direction".into()));
        }
        let right = right.normalize();
        let down = forward.cross(&right);

        let rotation =
            Matrix3::from_rows(&[right.transpose(), down.transpose(), forward.transpose()]);
        let translation = -rotation * self.position.coords;
        Ok(Pose::from_rot_trans(rotation, translation))
    }

    /// Camera-to-world rigid transform, the inverse of [`Self::view_matrix`]
    pub fn camera_to_world(&self) -> Result<Pose> {
        let view = self.view_matrix()?;
        let rotation = view.rotation().transpose();
        Ok(Pose::from_rot_trans(rotation, self.position.coords))
    }
}

/// Full camera entity: intrinsics plus placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub intrinsics: PinholeCamera,
    pub extrinsics: CameraExtrinsics,
}

impl Camera {
    /// The default annotation camera: centered intrinsics over the given
    /// image size, extrinsics facing the origin
    pub fn annotation_default(width: u32, height: u32, focal_length: f64) -> Result<Self> {
        Ok(Self {
            intrinsics: PinholeCamera::from_focal_length(width, height, focal_length)?,
            extrinsics: CameraExtrinsics::facing_origin(focal_length),
        })
    }

    /// Project a world-frame point to pixel coordinates
    pub fn project_world(&self, point: &Point3d) -> Result<Option<Point2d>> {
        let view = self.extrinsics.view_matrix()?;
        Ok(self.intrinsics.project(&view.transform_point(point)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Matrix4;

    #[test]
    fn view_angle_round_trips_through_focal_length() {
        for f in [100.0, 5_000.0, 50_000.0] {
            let cam = PinholeCamera::from_focal_length(1920, 1080, f).unwrap();
            let angle = cam.view_angle_deg();
            assert_relative_eq!(focal_from_view_angle(1080, angle), f, epsilon = 1e-9 * f);
        }
    }

    #[test]
    fn surgical_microscope_view_angle_is_about_one_degree() {
        // focal length 5e4 over a 1080-pixel-high image
        let cam = PinholeCamera::from_focal_length(1920, 1080, 5e4).unwrap();
        assert_relative_eq!(cam.view_angle_deg(), 1.2374, epsilon = 1e-3);
    }

    #[test]
    fn centered_principal_point_has_zero_window_center() {
        let cam = PinholeCamera::from_focal_length(1920, 1080, 5e4).unwrap();
        let (wcx, wcy) = cam.window_center();
        assert_eq!((wcx, wcy), (0.0, 0.0));
    }

    #[test]
    fn offset_principal_point_is_normalized() {
        let k = Matrix3::new(100.0, 0.0, 1060.0, 0.0, 100.0, 440.0, 0.0, 0.0, 1.0);
        let cam = PinholeCamera::from_matrix(1920, 1080, k).unwrap();
        let (wcx, wcy) = cam.window_center();
        assert_relative_eq!(wcx, -2.0 * 100.0 / 1920.0, epsilon = 1e-12);
        assert_relative_eq!(wcy, 2.0 * -100.0 / 1080.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_intrinsics_are_rejected() {
        assert!(PinholeCamera::from_focal_length(0, 1080, 100.0).is_err());
        assert!(PinholeCamera::from_focal_length(1920, 1080, 0.0).is_err());
        assert!(PinholeCamera::from_focal_length(1920, 1080, -5.0).is_err());
    }

    #[test]
    fn default_extrinsics_match_opencv_frame() {
        // position (0,0,-500), view-up (0,-1,0): the camera frame coincides
        // with the OpenCV convention, so the view rotation is the identity
        let ext = CameraExtrinsics::facing_origin(5e4);
        let view = ext.view_matrix().unwrap();
        assert_relative_eq!(view.rotation(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(
            view.translation(),
            Vector3d::new(0.0, 0.0, 500.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn camera_to_world_inverts_view_matrix() {
        let ext = CameraExtrinsics {
            position: Point3d::new(3.0, -2.0, -40.0),
            focal_point: Point3d::new(0.5, 1.0, 2.0),
            view_up: Vector3d::new(0.1, -1.0, 0.05),
        };
        let view = ext.view_matrix().unwrap();
        let back = ext.camera_to_world().unwrap();
        let product = view * back;
        assert_relative_eq!(product.matrix(), &Matrix4::identity(), epsilon = 1e-12);
    }

    #[test]
    fn projection_puts_origin_at_principal_point() {
        let cam = Camera::annotation_default(1920, 1080, 5e4).unwrap();
        let pixel = cam.project_world(&Point3d::origin()).unwrap().unwrap();
        assert_relative_eq!(pixel, Point2d::new(960.0, 540.0), epsilon = 1e-9);
    }

    #[test]
    fn points_behind_the_camera_do_not_project() {
        let cam = PinholeCamera::from_focal_length(1920, 1080, 100.0).unwrap();
        assert!(cam.project(&Point3d::new(0.0, 0.0, -1.0)).is_none());
        assert!(cam.project(&Point3d::new(0.0, 0.0, 0.0)).is_none());
    }
}
