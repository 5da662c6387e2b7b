use nalgebra::{Point3, Vector3};

/// Scalar field value at a point in space.
pub type Value = f32;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// A 3D vector with [`Value`] components.
pub type Vector = Vector3<Value>;

/// Integer `[i, j, k]` position of a grid cell or lattice point.
pub type GridIndex = [usize; 3];

/// A scalar field: maps a [`Point`] to a [`Value`].
///
/// Points where the field is **strictly below** the threshold are classified as
/// "inside" when building cube masks. Implementations must be free of side
/// effects: the same point is sampled several times during a single generation.
pub trait ScalarField {
    fn sample(&self, p: Point) -> Value;
}

impl<F> ScalarField for F
where
    F: Fn(Point) -> Value,
{
    #[inline]
    fn sample(&self, p: Point) -> Value {
        self(p)
    }
}
