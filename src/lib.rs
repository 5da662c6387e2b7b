//! Extracts a triangulated iso-surface from a scalar field sampled on a regular
//! 3D grid, using the classic Marching Cubes algorithm.
//!
//! ```rust
//! use marching_cubes::{Axis, AxisResolution, Grid, MarchingCubes, Point};
//!
//! let axis = |axis| AxisResolution::new(axis, 16, -1.5, 1.5);
//! let grid = Grid::new(axis(Axis::X)?, axis(Axis::Y)?, axis(Axis::Z)?);
//!
//! let sphere = |p: Point| p.coords.norm_squared();
//! let mesh = MarchingCubes::new(sphere, grid).with_threshold(1.0)?.generate()?;
//!
//! assert!(mesh.validate());
//! assert_eq!(mesh.boundary_edges(), 0);
//! # Ok::<(), marching_cubes::MarchingCubesError>(())
//! ```

pub mod axis;
pub mod classify;
pub mod edge_cache;
pub mod error;
pub mod grid;
pub mod interp;
pub mod marching_cubes;
pub mod mesh;
pub mod normal;
pub mod tables;
pub mod types;

pub use axis::AxisResolution;
pub use error::{Axis, MarchingCubesError, Result};
pub use grid::{Grid, Lattice};
pub use marching_cubes::{MarchingCubes, MarchingCubesConfig};
pub use mesh::GeneratedMesh;
pub use types::{GridIndex, Point, ScalarField, Value, Vector};
