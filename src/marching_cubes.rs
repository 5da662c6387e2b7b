use crate::{
    classify::{cube_mask, is_crossed},
    edge_cache::{EdgeKey, VertexCache},
    error::{MarchingCubesError, Result},
    grid::{Grid, Lattice, corner_indices},
    interp::{find_t, interpolate_points},
    mesh::GeneratedMesh,
    normal::{NORMAL_EPSILON, estimate_normal},
    tables::{EDGE_CORNERS, triangles},
    types::{GridIndex, Point, ScalarField, Value, Vector},
};

/// Tunable parameters for mesh generation.
///
/// ```rust,ignore
/// let mc = MarchingCubes::new(field, grid)
///     .with_config(MarchingCubesConfig { threshold: 1.5, ..Default::default() })?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchingCubesConfig {
    /// Iso-surface threshold. Corners **strictly below** it are "inside". Default: `0.0`.
    pub threshold: Value,
    /// Finite-difference step used to estimate vertex normals. Default: `1e-3`.
    pub normal_epsilon: Value,
}

impl Default for MarchingCubesConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            normal_epsilon: NORMAL_EPSILON,
        }
    }
}

impl MarchingCubesConfig {
    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(MarchingCubesError::NonFiniteThreshold(self.threshold));
        }
        if !self.normal_epsilon.is_finite() || self.normal_epsilon <= 0.0 {
            return Err(MarchingCubesError::InvalidNormalEpsilon(self.normal_epsilon));
        }
        Ok(())
    }
}

/// Extracts the iso-surface of a [`ScalarField`] over a regular [`Grid`].
///
/// ```text
/// Per cell, in lexicographic (i, j, k) order:
/// 1. Lattice::corner_values   →  8 scalar values
/// 2. cube_mask                →  256-entry lookup key
/// 3. triangles(mask)          →  up to 5 triangles of edge identifiers
/// 4. VertexCache              →  one vertex per distinct crossed edge
/// 5. find_t, estimate_normal  →  interpolated position and normal
/// ```
pub struct MarchingCubes<F> {
    field: F,
    grid: Grid,
    config: MarchingCubesConfig,
}

impl<F> MarchingCubes<F>
where
    F: ScalarField,
{
    /// Creates a generator with the default [`MarchingCubesConfig`].
    ///
    /// The axes were validated when the [`Grid`] was built, so this cannot fail;
    /// see [`with_config`](Self::with_config) for the remaining checks.
    pub fn new(field: F, grid: Grid) -> Self {
        Self {
            field,
            grid,
            config: MarchingCubesConfig::default(),
        }
    }

    /// Replaces the configuration, rejecting a non-finite threshold or a
    /// non-positive normal epsilon before any sampling happens.
    pub fn with_config(mut self, config: MarchingCubesConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Sets the iso-surface threshold.
    pub fn with_threshold(self, threshold: Value) -> Result<Self> {
        let config = MarchingCubesConfig {
            threshold,
            ..self.config
        };
        self.with_config(config)
    }

    /// Sets the finite-difference step used for normals.
    pub fn with_normal_epsilon(self, normal_epsilon: Value) -> Result<Self> {
        let config = MarchingCubesConfig {
            normal_epsilon,
            ..self.config
        };
        self.with_config(config)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &MarchingCubesConfig {
        &self.config
    }

    pub fn threshold(&self) -> Value {
        self.config.threshold
    }

    /// Evaluates the field at the 8 corners of `cell` and returns its cube mask.
    pub fn mask(&self, cell: GridIndex) -> Result<u8> {
        self.grid.check_cell(cell)?;
        let values = corner_indices(cell).map(|corner| self.sample(corner));
        Ok(cube_mask(&values, self.config.threshold))
    }

    /// Returns the point on the edge between corners `a` and `b` of `cell`
    /// where the field crosses the threshold.
    ///
    /// Corners are numbered `0..8` by offset bits (bit 0 = x, bit 1 = y, bit 2 = z)
    /// and must be joined by one of the 12 cell edges, in either order.
    /// If the corner values are equal the edge midpoint is returned.
    pub fn interpolate_vertex(&self, cell: GridIndex, a: usize, b: usize) -> Result<Point> {
        self.grid.check_cell(cell)?;
        let corners = corner_indices(cell);
        let start = *corners.get(a).ok_or(MarchingCubesError::InvalidCorner(a))?;
        let end = *corners.get(b).ok_or(MarchingCubesError::InvalidCorner(b))?;
        if !EDGE_CORNERS.contains(&[a, b]) && !EDGE_CORNERS.contains(&[b, a]) {
            return Err(MarchingCubesError::NotAnEdge { a, b });
        }
        let key = EdgeKey::new(start, end);
        Ok(self.edge_vertex(key, self.sample(key.start()), self.sample(key.end())))
    }

    /// Estimates the unit surface normal at `p`, pointing toward decreasing field values.
    ///
    /// Returns the zero vector where the gradient vanishes.
    pub fn interpolate_normal(&self, p: Point) -> Vector {
        estimate_normal(&self.field, p, self.config.normal_epsilon)
    }

    /// Runs marching cubes over every cell of the grid.
    ///
    /// The field is sampled once per lattice point. Fails with
    /// [`MarchingCubesError::GridTooLarge`] before sampling if the lattice cannot
    /// be allocated, and with [`MarchingCubesError::TooManyVertices`] if the mesh
    /// cannot be indexed with `u32`; no partial mesh is returned.
    pub fn generate(&self) -> Result<GeneratedMesh> {
        let _span = self.span().entered();
        let lattice = Lattice::sample(&self.grid, &self.field)?;
        self.assemble(&lattice)
    }

    /// Like [`generate`](Self::generate), but samples the lattice on the rayon thread pool.
    ///
    /// Cells are still processed on the calling thread, so the output is
    /// identical to [`generate`](Self::generate).
    #[cfg(feature = "parallel")]
    pub fn generate_par(&self) -> Result<GeneratedMesh>
    where
        F: Sync,
    {
        let _span = self.span().entered();
        let lattice = Lattice::sample_par(&self.grid, &self.field)?;
        self.assemble(&lattice)
    }

    fn span(&self) -> tracing::Span {
        let [nx, ny, nz] = self.grid.cells();
        tracing::debug_span!(
            "marching_cubes",
            nx,
            ny,
            nz,
            cells = self.grid.cell_count().unwrap_or(usize::MAX),
            threshold = self.config.threshold
        )
    }

    fn assemble(&self, lattice: &Lattice) -> Result<GeneratedMesh> {
        let mut mesh = GeneratedMesh::new_empty();
        let mut cache = VertexCache::new();

        for cell in self.grid.iter_cells() {
            let values = lattice.corner_values(cell);
            let mask = cube_mask(&values, self.config.threshold);
            if !is_crossed(mask) {
                continue;
            }

            let corners = corner_indices(cell);
            for tri in triangles(mask) {
                for edge in tri {
                    let [a, b] = EDGE_CORNERS[edge];
                    let key = EdgeKey::new(corners[a], corners[b]);
                    let index = cache.get_or_emit(key, |key| {
                        let vertex =
                            self.edge_vertex(key, lattice.get(key.start()), lattice.get(key.end()));
                        let normal = self.interpolate_normal(vertex);
                        mesh.push_vertex(vertex, normal)
                    })?;
                    mesh.indices.push(index);
                }
            }
        }

        tracing::debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            "generated mesh"
        );
        Ok(mesh)
    }

    /// Interpolates along `key` from its first endpoint, so the result does not
    /// depend on which neighbouring cell asks.
    fn edge_vertex(&self, key: EdgeKey, start_value: Value, end_value: Value) -> Point {
        let t = find_t(start_value, end_value, self.config.threshold);
        interpolate_points(
            self.grid.point(key.start()),
            self.grid.point(key.end()),
            t,
        )
    }

    fn sample(&self, index: GridIndex) -> Value {
        self.field.sample(self.grid.point(index))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{axis::AxisResolution, error::Axis};

    fn unit_grid(n: usize) -> Grid {
        Grid::new(
            AxisResolution::new(Axis::X, n, 0.0, 1.0).unwrap(),
            AxisResolution::new(Axis::Y, n, 0.0, 1.0).unwrap(),
            AxisResolution::new(Axis::Z, n, 0.0, 1.0).unwrap(),
        )
    }

    #[test]
    fn config_rejects_bad_values() {
        let mc = MarchingCubes::new(|p: Point| p.x, unit_grid(1));
        assert!(matches!(
            mc.with_threshold(Value::NAN),
            Err(MarchingCubesError::NonFiniteThreshold(_))
        ));

        let mc = MarchingCubes::new(|p: Point| p.x, unit_grid(1));
        assert!(matches!(
            mc.with_normal_epsilon(0.0),
            Err(MarchingCubesError::InvalidNormalEpsilon(_))
        ));
    }

    #[test]
    fn with_threshold_keeps_epsilon() {
        let mc = MarchingCubes::new(|p: Point| p.x, unit_grid(1))
            .with_normal_epsilon(0.01)
            .unwrap()
            .with_threshold(0.25)
            .unwrap();
        assert_eq!(
            *mc.config(),
            MarchingCubesConfig {
                threshold: 0.25,
                normal_epsilon: 0.01
            }
        );
    }

    #[test]
    fn mask_marks_corners_below_threshold() {
        let mc = MarchingCubes::new(|p: Point| p.x, unit_grid(1))
            .with_threshold(0.5)
            .unwrap();
        // Corners 0, 2, 4, 6 sit at x = 0.
        assert_eq!(mc.mask([0, 0, 0]), Ok(0b1001_1001));
    }

    #[test]
    fn mask_rejects_cell_outside_grid() {
        let mc = MarchingCubes::new(|p: Point| p.x, unit_grid(2));
        assert!(matches!(
            mc.mask([2, 0, 0]),
            Err(MarchingCubesError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn interpolate_vertex_is_symmetric() {
        let mc = MarchingCubes::new(|p: Point| p.x * p.x, unit_grid(1))
            .with_threshold(0.25)
            .unwrap();
        let forward = mc.interpolate_vertex([0, 0, 0], 0, 1).unwrap();
        let backward = mc.interpolate_vertex([0, 0, 0], 1, 0).unwrap();
        assert_eq!(forward, backward);
        assert_relative_eq!(forward, Point::new(0.25, 0.0, 0.0));
    }

    #[test]
    fn interpolate_vertex_uses_midpoint_for_flat_edge() {
        let mc = MarchingCubes::new(|_: Point| 1.0, unit_grid(1));
        let p = mc.interpolate_vertex([0, 0, 0], 0, 4).unwrap();
        assert_relative_eq!(p, Point::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn interpolate_vertex_rejects_bad_corner() {
        let mc = MarchingCubes::new(|p: Point| p.x, unit_grid(1));
        assert_eq!(
            mc.interpolate_vertex([0, 0, 0], 0, 8),
            Err(MarchingCubesError::InvalidCorner(8))
        );
    }

    #[test]
    fn interpolate_vertex_rejects_corners_off_an_edge() {
        let mc = MarchingCubes::new(|p: Point| p.x, unit_grid(1));
        // Opposite corners of the cube, and a face diagonal.
        assert_eq!(
            mc.interpolate_vertex([0, 0, 0], 0, 7),
            Err(MarchingCubesError::NotAnEdge { a: 0, b: 7 })
        );
        assert_eq!(
            mc.interpolate_vertex([0, 0, 0], 1, 2),
            Err(MarchingCubesError::NotAnEdge { a: 1, b: 2 })
        );
        assert_eq!(
            mc.interpolate_vertex([0, 0, 0], 3, 3),
            Err(MarchingCubesError::NotAnEdge { a: 3, b: 3 })
        );
        // Every table edge is accepted in both orders.
        for [a, b] in EDGE_CORNERS {
            assert!(mc.interpolate_vertex([0, 0, 0], a, b).is_ok());
            assert!(mc.interpolate_vertex([0, 0, 0], b, a).is_ok());
        }
    }

    #[test]
    fn generate_rejects_oversized_grid_before_sampling() {
        let n = 1 << 22;
        let grid = Grid::new(
            AxisResolution::new(Axis::X, n, -1.0, 1.0).unwrap(),
            AxisResolution::new(Axis::Y, n, -1.0, 1.0).unwrap(),
            AxisResolution::new(Axis::Z, n, -1.0, 1.0).unwrap(),
        );
        let sampled = std::cell::Cell::new(false);
        let mc = MarchingCubes::new(
            |p: Point| {
                sampled.set(true);
                p.x
            },
            grid,
        );
        assert_eq!(
            mc.generate(),
            Err(MarchingCubesError::GridTooLarge { cells: [n, n, n] })
        );
        assert!(!sampled.get());
    }

    #[test]
    fn generated_normals_point_down_the_field() {
        let mc = MarchingCubes::new(|p: Point| p.z, unit_grid(3))
            .with_threshold(0.5)
            .unwrap();
        let mesh = mc.generate().unwrap();
        assert!(!mesh.is_empty());
        for normal in &mesh.normals {
            assert_relative_eq!(*normal, -Vector::z(), epsilon = 1e-4);
        }
        for tri in 0..mesh.triangle_count() {
            assert_relative_eq!(mesh.face_normal(tri), -Vector::z(), epsilon = 1e-4);
        }
    }
}
