use std::collections::HashMap;

use crate::{
    error::{MarchingCubesError, Result},
    types::{Point, Value, Vector},
};

/// Indexed triangle mesh produced by the marching cubes algorithm.
///
/// `normals[i]` belongs to `vertices[i]`. Every group of three consecutive
/// entries in `indices` forms one triangle, wound so that its face normal
/// points toward decreasing field values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedMesh {
    /// Vertex positions, one per distinct edge crossing.
    pub vertices: Vec<Point>,

    /// Unit surface normals, index-aligned with `vertices`.
    ///
    /// A zero vector marks a vertex where the field gradient vanished.
    pub normals: Vec<Vector>,

    /// Triangle vertex indices into `vertices`: `[a0, b0, c0, a1, b1, c1, ...]`
    pub indices: Vec<u32>,
}

impl GeneratedMesh {
    /// Creates an empty mesh with no vertices, normals, or triangles.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Appends a vertex and its normal, returning the new vertex's index.
    ///
    /// Returns [`MarchingCubesError::TooManyVertices`] once the vertex count
    /// no longer fits in a `u32` index.
    pub fn push_vertex(&mut self, vertex: Point, normal: Vector) -> Result<u32> {
        let index = u32::try_from(self.vertices.len())
            .map_err(|_| MarchingCubesError::TooManyVertices(u32::MAX as usize))?;
        self.vertices.push(vertex);
        self.normals.push(normal);
        Ok(index)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as triples of vertex indices.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Returns the three vertex positions of triangle `tri`.
    ///
    /// # Panics
    /// Panics if `tri` or one of its indices is out of range.
    pub fn triangle(&self, tri: usize) -> [Point; 3] {
        let i = &self.indices[tri * 3..tri * 3 + 3];
        [
            self.vertices[i[0] as usize],
            self.vertices[i[1] as usize],
            self.vertices[i[2] as usize],
        ]
    }

    /// Computes the unit face normal of triangle `tri` from its winding.
    ///
    /// Returns the zero vector if the triangle is degenerate.
    pub fn face_normal(&self, tri: usize) -> Vector {
        let [a, b, c] = self.triangle(tri);
        let cross = (b - a).cross(&(c - b));
        cross.try_normalize(0.0).unwrap_or_else(Vector::zeros)
    }

    /// Signed volume enclosed by the mesh, by the divergence theorem.
    ///
    /// Positive when faces wind outward; only meaningful for closed meshes.
    pub fn volume(&self) -> Value {
        (0..self.triangle_count())
            .map(|tri| {
                let [a, b, c] = self.triangle(tri);
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum::<Value>()
            / 6.0
    }

    /// Counts undirected edges not shared by exactly two triangles.
    ///
    /// Zero for a closed two-manifold surface.
    pub fn boundary_edges(&self) -> usize {
        let mut uses: HashMap<(u32, u32), usize> = HashMap::new();
        for [a, b, c] in self.triangles() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *uses.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        uses.values().filter(|&&n| n != 2).count()
    }

    /// Checks the structural invariants: parallel vertex/normal lists, whole
    /// triangles, and indices that all refer to existing vertices.
    pub fn validate(&self) -> bool {
        self.normals.len() == self.vertices.len()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    /// Vertex positions as plain `[x, y, z]` arrays for upload to a render buffer.
    pub fn vertex_buffer(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Normals as plain `[x, y, z]` arrays, index-aligned with [`vertex_buffer`](Self::vertex_buffer).
    pub fn normal_buffer(&self) -> Vec<[f32; 3]> {
        self.normals.iter().map(|n| [n.x, n.y, n.z]).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Unit tetrahedron with outward winding.
    fn tetrahedron() -> GeneratedMesh {
        let mut mesh = GeneratedMesh::new_empty();
        for p in [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ] {
            mesh.push_vertex(p, Vector::zeros()).unwrap();
        }
        mesh.indices = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
        mesh
    }

    #[test]
    fn push_vertex_returns_sequential_indices() {
        let mut mesh = GeneratedMesh::new_empty();
        assert_eq!(mesh.push_vertex(Point::origin(), Vector::x()), Ok(0));
        assert_eq!(mesh.push_vertex(Point::origin(), Vector::y()), Ok(1));
        assert_eq!(mesh.normals, vec![Vector::x(), Vector::y()]);
    }

    #[test]
    fn closed_tetrahedron_has_no_boundary() {
        let mesh = tetrahedron();
        assert!(mesh.validate());
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.boundary_edges(), 0);
        assert_relative_eq!(mesh.volume(), 1.0 / 6.0);
    }

    #[test]
    fn open_mesh_reports_boundary_edges() {
        let mut mesh = tetrahedron();
        mesh.indices.truncate(9);
        assert_eq!(mesh.boundary_edges(), 3);
    }

    #[test]
    fn face_normal_follows_winding() {
        let mesh = tetrahedron();
        assert_relative_eq!(mesh.face_normal(0), -Vector::z());
        assert_relative_eq!(mesh.face_normal(3), Vector::new(1.0, 1.0, 1.0).normalize());
    }

    #[test]
    fn degenerate_face_has_zero_normal() {
        let mut mesh = tetrahedron();
        mesh.indices = vec![0, 1, 1];
        assert_eq!(mesh.face_normal(0), Vector::zeros());
    }

    #[test]
    fn validate_rejects_dangling_index() {
        let mut mesh = tetrahedron();
        mesh.indices.extend([0, 1, 4]);
        assert!(!mesh.validate());
    }

    #[test]
    fn buffers_flatten_points() {
        let mesh = tetrahedron();
        assert_eq!(mesh.vertex_buffer()[1], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.normal_buffer().len(), 4);
    }
}
