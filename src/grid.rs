use ndarray::Array3;

use crate::{
    axis::AxisResolution,
    error::{MarchingCubesError, Result},
    tables::CORNER_OFFSETS,
    types::{GridIndex, Point, ScalarField, Value},
};

/// The regular sampling grid, made of one [`AxisResolution`] per axis.
///
/// The grid has `(x.count + 1) × (y.count + 1) × (z.count + 1)` lattice points
/// and `x.count × y.count × z.count` cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub x: AxisResolution,
    pub y: AxisResolution,
    pub z: AxisResolution,
}

impl Grid {
    pub fn new(x: AxisResolution, y: AxisResolution, z: AxisResolution) -> Self {
        Self { x, y, z }
    }

    /// Number of cells along each axis.
    pub fn cells(&self) -> GridIndex {
        [self.x.count(), self.y.count(), self.z.count()]
    }

    /// Total number of cells in the grid, or `None` if it overflows `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        self.x
            .count()
            .checked_mul(self.y.count())?
            .checked_mul(self.z.count())
    }

    /// Number of lattice points along each axis.
    ///
    /// Saturates at `usize::MAX`; [`check_size`](Self::check_size) rejects such grids.
    pub fn points(&self) -> GridIndex {
        self.cells().map(|n| n.saturating_add(1))
    }

    /// Returns the number of lattice points, or [`MarchingCubesError::GridTooLarge`]
    /// if a lattice of [`Value`]s that size cannot be addressed in memory.
    pub fn check_size(&self) -> Result<usize> {
        let [px, py, pz] = self.points_checked();
        px.zip(py)
            .zip(pz)
            .and_then(|((px, py), pz)| px.checked_mul(py)?.checked_mul(pz))
            .filter(|total| {
                total
                    .checked_mul(size_of::<Value>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(MarchingCubesError::GridTooLarge {
                cells: self.cells(),
            })
    }

    fn points_checked(&self) -> [Option<usize>; 3] {
        self.cells().map(|n| n.checked_add(1))
    }

    /// World-space position of lattice point `[i, j, k]`.
    #[inline]
    pub fn point(&self, [i, j, k]: GridIndex) -> Point {
        Point::new(self.x.at(i), self.y.at(j), self.z.at(k))
    }

    /// Returns [`MarchingCubesError::CellOutOfRange`] unless `cell` names a cell of this grid.
    pub fn check_cell(&self, cell: GridIndex) -> Result<()> {
        let cells = self.cells();
        if cell.iter().zip(cells.iter()).all(|(c, n)| c < n) {
            Ok(())
        } else {
            Err(MarchingCubesError::CellOutOfRange { cell, cells })
        }
    }

    /// Iterates every cell index in lexicographic `(i, j, k)` order, `k` varying fastest.
    pub fn iter_cells(&self) -> impl Iterator<Item = GridIndex> + use<> {
        let [nx, ny, nz] = self.cells();
        (0..nx).flat_map(move |i| (0..ny).flat_map(move |j| (0..nz).map(move |k| [i, j, k])))
    }
}

/// Returns the 8 lattice indices `[i, j, k]` of the corners of `cell`.
///
/// Corner `v` is offset from the cell by `(v & 1, (v & 2) >> 1, (v & 4) >> 2)`:
///
/// ```text
///     6----7          Y
///    /|   /|          |
///   2----3 |          *-- X
///   | 4--|-5         /
///   |/   |/         Z
///   0----1
/// ```
#[inline]
pub fn corner_indices([i, j, k]: GridIndex) -> [GridIndex; 8] {
    CORNER_OFFSETS.map(|[dx, dy, dz]| [i + dx, j + dy, k + dz])
}

/// Scalar field values sampled once at every lattice point of a [`Grid`].
///
/// Neighbouring cells share corners, so generation reads corner values from
/// here instead of evaluating the field up to eight times per point.
/// Values are indexed `[i, j, k]`.
#[derive(Debug, Clone)]
pub struct Lattice {
    values: Array3<Value>,
}

impl Lattice {
    /// Evaluates `field` at every lattice point of `grid`.
    ///
    /// Fails with [`MarchingCubesError::GridTooLarge`] before evaluating anything
    /// if the lattice cannot be allocated.
    pub fn sample<F>(grid: &Grid, field: &F) -> Result<Self>
    where
        F: ScalarField + ?Sized,
    {
        grid.check_size()?;
        let [px, py, pz] = grid.points();
        let values = Array3::from_shape_fn((px, py, pz), |(i, j, k)| {
            field.sample(grid.point([i, j, k]))
        });
        Ok(Self { values })
    }

    /// Like [`sample`](Lattice::sample), but evaluates the field on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub fn sample_par<F>(grid: &Grid, field: &F) -> Result<Self>
    where
        F: ScalarField + Sync + ?Sized,
    {
        grid.check_size()?;
        let [px, py, pz] = grid.points();
        let mut values = Array3::<Value>::zeros((px, py, pz));
        ndarray::Zip::indexed(&mut values).par_for_each(|(i, j, k), value| {
            *value = field.sample(grid.point([i, j, k]));
        });
        Ok(Self { values })
    }

    /// Returns the sampled value at lattice point `[i, j, k]`.
    ///
    /// # Panics
    /// Panics if the index lies outside the lattice.
    #[inline]
    pub fn get(&self, [i, j, k]: GridIndex) -> Value {
        self.values[[i, j, k]]
    }

    /// Returns the 8 corner values of `cell`, in corner-index order.
    #[inline]
    pub fn corner_values(&self, cell: GridIndex) -> [Value; 8] {
        corner_indices(cell).map(|corner| self.get(corner))
    }

    /// Lattice dimensions, `count + 1` per axis.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.values.dim()
    }
}
