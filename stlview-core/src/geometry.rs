/// Geometry primitives and bounding volumes
use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Minimal enclosing sphere, centered on the bounding-box center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Axis-aligned bounding box over all vertices. None for an empty mesh.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut verts = self.vertices();
        let first = verts.next()?.position;
        let mut min = first;
        let mut max = first;

        for v in verts {
            let p = v.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some(Aabb { min, max })
    }

    /// Bounding sphere centered on the bounding-box center, with radius the
    /// maximum distance from that center to any vertex.
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        let center = self.bounding_box()?.center();
        let radius_sq = self
            .vertices()
            .map(|v| nalgebra::distance_squared(&center, &v.position))
            .fold(0.0f32, f32::max);

        Some(BoundingSphere {
            center,
            radius: radius_sq.sqrt(),
        })
    }

    /// Apply an affine transform to every vertex. Positions get the full
    /// transform; normals only its rotational part.
    pub fn apply_transform(&mut self, matrix: &Matrix4<f32>) {
        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position = matrix.transform_point(&vertex.position);
                vertex.normal = matrix.transform_vector(&vertex.normal);
            }
        }
    }

    /// Translate every vertex by the given offset.
    pub fn translate(&mut self, offset: &Vector3<f32>) {
        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position += offset;
            }
        }
    }

    /// Create a simple cube mesh for demos and tests
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::new();

        // Each face as two triangles, normals pointing outward
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            (
                [0.0, 0.0, 1.0],
                [
                    [-half, -half, half],
                    [half, -half, half],
                    [half, half, half],
                    [-half, half, half],
                ],
            ),
            (
                [0.0, 0.0, -1.0],
                [
                    [half, -half, -half],
                    [-half, -half, -half],
                    [-half, half, -half],
                    [half, half, -half],
                ],
            ),
            (
                [0.0, 1.0, 0.0],
                [
                    [-half, half, half],
                    [half, half, half],
                    [half, half, -half],
                    [-half, half, -half],
                ],
            ),
            (
                [0.0, -1.0, 0.0],
                [
                    [-half, -half, -half],
                    [half, -half, -half],
                    [half, -half, half],
                    [-half, -half, half],
                ],
            ),
            (
                [1.0, 0.0, 0.0],
                [
                    [half, -half, half],
                    [half, -half, -half],
                    [half, half, -half],
                    [half, half, half],
                ],
            ),
            (
                [-1.0, 0.0, 0.0],
                [
                    [-half, -half, -half],
                    [-half, -half, half],
                    [-half, half, half],
                    [-half, half, -half],
                ],
            ),
        ];

        for (n, corners) in faces {
            let v = |c: [f32; 3]| Vertex::new(c[0], c[1], c[2], n[0], n[1], n[2]);
            mesh.add_triangle(Triangle::new(v(corners[0]), v(corners[1]), v(corners[2])));
            mesh.add_triangle(Triangle::new(v(corners[0]), v(corners[2]), v(corners[3])));
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = Mesh::new();
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.bounding_sphere().is_none());
    }

    #[test]
    fn test_cube_bounding_box() {
        let mesh = Mesh::cube(2.0);
        let aabb = mesh.bounding_box().unwrap();

        assert!((aabb.min - Point3::new(-1.0, -1.0, -1.0)).norm() < 1e-6);
        assert!((aabb.max - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-6);
        assert!(aabb.center().coords.norm() < 1e-6);
    }

    #[test]
    fn test_cube_bounding_sphere() {
        let mesh = Mesh::cube(2.0);
        let sphere = mesh.bounding_sphere().unwrap();

        // Half-diagonal of a 2-unit cube
        assert!(sphere.center.coords.norm() < 1e-6);
        assert!((sphere.radius - 3.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_translate_moves_bounds() {
        let mut mesh = Mesh::cube(2.0);
        mesh.translate(&Vector3::new(5.0, -3.0, 1.0));

        let center = mesh.bounding_box().unwrap().center();
        assert!((center - Point3::new(5.0, -3.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_transform_leaves_normals_unit_length() {
        let mut mesh = Mesh::cube(2.0);
        let rotation = crate::transform::Transform::rotation_matrix(0.3, 0.7, 0.1);
        mesh.apply_transform(&rotation);

        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                assert!((vertex.normal.norm() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_translation_does_not_touch_normals() {
        let mut mesh = Mesh::cube(2.0);
        let before: Vec<Vector3<f32>> = mesh
            .triangles
            .iter()
            .map(|t| t.vertices[0].normal)
            .collect();

        let translation = crate::transform::Transform::translation_matrix(3.0, 0.0, -2.0);
        mesh.apply_transform(&translation);

        for (t, n) in mesh.triangles.iter().zip(before) {
            assert!((t.vertices[0].normal - n).norm() < 1e-6);
        }
    }
}
