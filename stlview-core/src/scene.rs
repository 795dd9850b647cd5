/// Scene container: meshes plus directional lights
use nalgebra::Vector3;

use crate::geometry::Mesh;

/// A directional light shining along `direction`
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            intensity,
        }
    }
}

/// A renderable collection of meshes and lights
pub struct Scene {
    meshes: Vec<Mesh>,
    lights: Vec<DirectionalLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn add_light(&mut self, light: DirectionalLight) {
        self.lights.push(light);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Lights in the scene; a headlight pointing down the view axis is
    /// substituted when none were added.
    pub fn lights(&self) -> Vec<DirectionalLight> {
        if self.lights.is_empty() {
            vec![DirectionalLight::new(Vector3::new(0.0, 0.0, -1.0), 1.0)]
        } else {
            self.lights.clone()
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
