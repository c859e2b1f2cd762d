//! Flat-shaded meshes for each render group
//!
//! Every triangle carries its own three vertices so the face normal can be
//! stored per vertex. Shapes are centred on the origin with unit radius
//! (the cube has unit edge) and scaled per instance.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use particle_layout::RenderGroup;
use std::f32::consts::{FRAC_PI_2, PI};

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
}

impl Mesh {
    /// Geometry drawn for a particle group
    pub fn for_group(group: RenderGroup) -> Self {
        match group {
            RenderGroup::Ribbon => Self::tetrahedron(),
            RenderGroup::DecorCube => Self::cube(),
            RenderGroup::DecorIco => Self::icosahedron(),
            RenderGroup::Leaf => Self::octahedron(),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Add a triangle, wound so its normal faces away from the origin.
    ///
    /// Valid for every shape here: each face of a convex solid or of the
    /// extruded star sees the origin from behind.
    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };

        for p in [a, b, c] {
            self.vertices.push(MeshVertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    fn from_faces(points: &[Vec3], faces: &[[usize; 3]]) -> Self {
        let mut mesh = Self::default();
        for [a, b, c] in faces {
            mesh.push_triangle(points[*a], points[*b], points[*c]);
        }
        mesh
    }

    pub fn tetrahedron() -> Self {
        let points = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ]
        .map(Vec3::normalize);
        Self::from_faces(&points, &[[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]])
    }

    pub fn cube() -> Self {
        let mut mesh = Self::default();
        for axis in 0..3 {
            for sign in [-0.5f32, 0.5] {
                let mut normal = Vec3::ZERO;
                normal[axis] = sign;
                let mut u = Vec3::ZERO;
                u[(axis + 1) % 3] = 0.5;
                let mut v = Vec3::ZERO;
                v[(axis + 2) % 3] = 0.5;

                let corners = [
                    normal - u - v,
                    normal + u - v,
                    normal + u + v,
                    normal - u + v,
                ];
                mesh.push_triangle(corners[0], corners[1], corners[2]);
                mesh.push_triangle(corners[0], corners[2], corners[3]);
            }
        }
        mesh
    }

    pub fn octahedron() -> Self {
        let mut mesh = Self::default();
        for sx in [-1.0f32, 1.0] {
            for sy in [-1.0f32, 1.0] {
                for sz in [-1.0f32, 1.0] {
                    mesh.push_triangle(Vec3::X * sx, Vec3::Y * sy, Vec3::Z * sz);
                }
            }
        }
        mesh
    }

    pub fn icosahedron() -> Self {
        let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
        let points = [
            Vec3::new(-1.0, phi, 0.0),
            Vec3::new(1.0, phi, 0.0),
            Vec3::new(-1.0, -phi, 0.0),
            Vec3::new(1.0, -phi, 0.0),
            Vec3::new(0.0, -1.0, phi),
            Vec3::new(0.0, 1.0, phi),
            Vec3::new(0.0, -1.0, -phi),
            Vec3::new(0.0, 1.0, -phi),
            Vec3::new(phi, 0.0, -1.0),
            Vec3::new(phi, 0.0, 1.0),
            Vec3::new(-phi, 0.0, -1.0),
            Vec3::new(-phi, 0.0, 1.0),
        ]
        .map(Vec3::normalize);

        Self::from_faces(
            &points,
            &[
                [0, 11, 5],
                [0, 5, 1],
                [0, 1, 7],
                [0, 7, 10],
                [0, 10, 11],
                [1, 5, 9],
                [5, 11, 4],
                [11, 10, 2],
                [10, 7, 6],
                [7, 1, 8],
                [3, 9, 4],
                [3, 4, 2],
                [3, 2, 6],
                [3, 6, 8],
                [3, 8, 9],
                [4, 9, 5],
                [2, 4, 11],
                [6, 2, 10],
                [8, 6, 7],
                [9, 8, 1],
            ],
        )
    }

    /// Five-pointed star in the XY plane, extruded along Z, one tip up
    pub fn star(outer_radius: f32, inner_radius: f32, depth: f32) -> Self {
        let rim: Vec<Vec3> = (0..10)
            .map(|i| {
                let angle = FRAC_PI_2 + i as f32 * PI / 5.0;
                let r = if i % 2 == 0 { outer_radius } else { inner_radius };
                Vec3::new(angle.cos() * r, angle.sin() * r, 0.0)
            })
            .collect();

        let front = Vec3::Z * (depth / 2.0);
        let back = -front;
        let mut mesh = Self::default();

        for i in 0..rim.len() {
            let a = rim[i];
            let b = rim[(i + 1) % rim.len()];
            mesh.push_triangle(front, a + front, b + front);
            mesh.push_triangle(back, b + back, a + back);
            mesh.push_triangle(a + front, a + back, b + back);
            mesh.push_triangle(a + front, b + back, b + front);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.vertices.chunks(3) {
            let centroid = tri
                .iter()
                .fold(Vec3::ZERO, |acc, v| acc + Vec3::from(v.position))
                / 3.0;
            let normal = Vec3::from(tri[0].normal);
            assert!((normal.length() - 1.0).abs() < 1e-5);
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_vertex_counts() {
        assert_eq!(Mesh::tetrahedron().vertex_count(), 4 * 3);
        assert_eq!(Mesh::cube().vertex_count(), 12 * 3);
        assert_eq!(Mesh::octahedron().vertex_count(), 8 * 3);
        assert_eq!(Mesh::icosahedron().vertex_count(), 20 * 3);
        assert_eq!(Mesh::star(0.6, 0.25, 0.1).vertex_count(), 40 * 3);
    }

    #[test]
    fn test_normals_face_outward() {
        for group in RenderGroup::ALL {
            assert_outward(&Mesh::for_group(group));
        }
        assert_outward(&Mesh::star(0.6, 0.25, 0.1));
    }

    #[test]
    fn test_polyhedra_have_unit_radius() {
        for mesh in [Mesh::tetrahedron(), Mesh::octahedron(), Mesh::icosahedron()] {
            for v in &mesh.vertices {
                assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
            }
        }
        for v in &Mesh::cube().vertices {
            assert!(Vec3::from(v.position).abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_star_tip_points_up() {
        let star = Mesh::star(0.6, 0.25, 0.1);
        let top = star
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert!((top - 0.6).abs() < 1e-5);
    }
}
