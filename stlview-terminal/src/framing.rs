/// One-time framing: center the mesh and back the camera off far enough to
/// see all of it
use nalgebra::Vector3;
use stlview_core::Mesh;

/// Extra margin so the model does not touch the viewport edges
const FIT_PADDING: f32 = 1.2;

/// Camera distance at which a sphere of `radius` fills the vertical field
/// of view `fov` (radians), with padding.
pub fn fit_distance(radius: f32, fov: f32) -> f32 {
    radius / (fov / 2.0).sin() * FIT_PADDING
}

/// Translate the mesh so its bounding-box center sits at the origin.
/// Returns the applied offset; an empty mesh is left untouched.
pub fn center_at_origin(mesh: &mut Mesh) -> Vector3<f32> {
    match mesh.bounding_box() {
        Some(aabb) => {
            let offset = -aabb.center().coords;
            mesh.translate(&offset);
            offset
        }
        None => Vector3::zeros(),
    }
}
