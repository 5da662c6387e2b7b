use derive_more::Display;

use crate::types::{GridIndex, Value};

pub type Result<T> = core::result::Result<T, MarchingCubesError>;

/// One of the three grid axes, used to name the axis a configuration error refers to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    #[display("x")]
    X,
    #[display("y")]
    Y,
    #[display("z")]
    Z,
}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum MarchingCubesError {
    /// An axis was configured with zero cells.
    #[display("axis {axis} must have at least one cell")]
    ZeroCellCount { axis: Axis },

    /// An axis has identical lower and upper bounds.
    #[display("axis {axis} has an empty range: lower and upper are both {bound}")]
    EmptyRange { axis: Axis, bound: Value },

    /// An axis bound is NaN or infinite.
    #[display("axis {axis} bounds [{lower}, {upper}] are not finite")]
    NonFiniteBounds {
        axis: Axis,
        lower: Value,
        upper: Value,
    },

    /// The lattice for these cell counts cannot be indexed or allocated.
    #[display("a grid of {cells:?} cells is too large to sample")]
    GridTooLarge { cells: GridIndex },

    #[display("threshold {_0} is not finite")]
    NonFiniteThreshold(Value),

    /// The finite-difference step used for normals must be finite and positive.
    #[display("normal epsilon {_0} must be finite and positive")]
    InvalidNormalEpsilon(Value),

    #[display("cell {cell:?} is outside a grid of {cells:?} cells")]
    CellOutOfRange { cell: GridIndex, cells: GridIndex },

    /// Corner indices run from 0 to 7.
    #[display("corner index {_0} is not in 0..8")]
    InvalidCorner(usize),

    /// The two corners are not joined by a cell edge.
    #[display("corners {a} and {b} do not share a cell edge")]
    NotAnEdge { a: usize, b: usize },

    /// The mesh needs more vertices than a `u32` index can address.
    #[display("mesh exceeds {_0} vertices")]
    TooManyVertices(usize),
}

impl std::error::Error for MarchingCubesError {}
