/// Affine transform builders
use nalgebra::{Matrix4, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from Euler angles in radians
    pub fn rotation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(0.0, 0.0, 0.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_translation_moves_points() {
        let matrix = Transform::translation_matrix(1.0, 2.0, 3.0);
        let moved = matrix.transform_point(&Point3::origin());
        assert!((moved - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-6);
    }

    #[test]
    fn test_scale() {
        let matrix = Transform::scale_matrix(2.0, 2.0, 2.0);
        let scaled = matrix.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert!((scaled - Point3::new(2.0, 2.0, 2.0)).norm() < 1e-6);
    }

    #[test]
    fn test_mvp_multiplication_order() {
        let model = Transform::translation_matrix(1.0, 0.0, 0.0);
        let view = Transform::translation_matrix(0.0, 2.0, 0.0);
        let projection = Transform::scale_matrix(2.0, 2.0, 2.0);

        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        let p = mvp.transform_point(&Point3::origin());
        assert!((p - Point3::new(2.0, 4.0, 0.0)).norm() < 1e-6);
    }
}
