/// Perspective camera and screen projection
use nalgebra::{Matrix4, Point3, Vector3};

/// Camera configuration for 3D rendering
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera. `fov` is the vertical field of view in
    /// radians.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov,
            aspect,
            near,
            far,
        }
    }

    /// Update the aspect ratio; the projection matrix is derived on use, so
    /// no further refresh step is needed.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Aim the camera at a point.
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let view = self.view_matrix();
        let projection = self.projection_matrix();
        let mvp = projection * view * model_matrix;

        // transform_point performs the homogeneous divide, yielding NDC
        let ndc = mvp.transform_point(point);
        if !ndc.x.is_finite() || !ndc.y.is_finite() || !ndc.z.is_finite() {
            return None;
        }

        // Clip test, including the depth range
        if !(-1.0..=1.0).contains(&ndc.x)
            || !(-1.0..=1.0).contains(&ndc.y)
            || !(-1.0..=1.0).contains(&ndc.z)
        {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::perspective(70f32.to_radians(), 800.0 / 600.0, 1.0, 1000.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((camera.fov - 70f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_feeds_projection() {
        let mut camera = Camera::perspective(70f32.to_radians(), 1.0, 1.0, 1000.0);
        let before = camera.projection_matrix();
        camera.set_aspect(2.0);
        let after = camera.projection_matrix();
        assert!((before - after).norm() > 1e-6);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::perspective(70f32.to_radians(), 1.0, 1.0, 1000.0);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_project_point_in_front_of_camera() {
        let mut camera = Camera::perspective(70f32.to_radians(), 1.0, 1.0, 1000.0);
        camera.position = Point3::new(0.0, 0.0, 10.0);
        camera.look_at(Point3::origin());

        let projected = camera.project_to_screen(
            &Point3::origin(),
            &Matrix4::identity(),
            800,
            600,
        );

        // The look-at target lands in the middle of the screen
        let (x, y, _) = projected.unwrap();
        assert!((x - 400.0).abs() < 1.0);
        assert!((y - 300.0).abs() < 1.0);
    }
}
