use crate::{
    error::{Axis, MarchingCubesError, Result},
    interp::remap,
    types::Value,
};

/// Sampling descriptor for one grid axis.
///
/// An axis with `count` cells has `count + 1` sample points, evenly spaced from
/// `lower` to `upper` inclusive:
///
/// ```text
///  at(i) = lower + (i / count) * (upper - lower),   i in 0..=count
/// ```
///
/// `lower > upper` is allowed and mirrors the axis, which also flips the
/// winding of every generated triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    count: usize,
    lower: Value,
    upper: Value,
}

impl AxisResolution {
    /// Creates an axis descriptor, rejecting configurations that cannot be sampled.
    ///
    /// `axis` only labels the error. Returns [`MarchingCubesError::ZeroCellCount`],
    /// [`MarchingCubesError::NonFiniteBounds`] or [`MarchingCubesError::EmptyRange`].
    pub fn new(axis: Axis, count: usize, lower: Value, upper: Value) -> Result<Self> {
        if count == 0 {
            return Err(MarchingCubesError::ZeroCellCount { axis });
        }
        if !lower.is_finite() || !upper.is_finite() {
            return Err(MarchingCubesError::NonFiniteBounds { axis, lower, upper });
        }
        if lower == upper {
            return Err(MarchingCubesError::EmptyRange { axis, bound: lower });
        }
        Ok(Self {
            count,
            lower,
            upper,
        })
    }

    /// Number of cells along this axis.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn lower(&self) -> Value {
        self.lower
    }

    pub fn upper(&self) -> Value {
        self.upper
    }

    /// World coordinate of sample point `i`.
    ///
    /// Defined for `i` in `0..=count`; larger indices extrapolate past `upper`.
    #[inline]
    pub fn at(&self, i: usize) -> Value {
        remap(
            i as Value,
            [0.0, self.count as Value],
            [self.lower, self.upper],
        )
    }

    /// Signed distance between neighbouring sample points.
    pub fn step(&self) -> Value {
        (self.upper - self.lower) / self.count as Value
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn at_hits_both_bounds() {
        let axis = AxisResolution::new(Axis::X, 4, -1.0, 3.0).unwrap();
        assert_eq!(axis.at(0), -1.0);
        assert_eq!(axis.at(4), 3.0);
        assert_relative_eq!(axis.at(1), 0.0);
        assert_relative_eq!(axis.step(), 1.0);
    }

    #[test]
    fn reversed_range_is_mirrored() {
        let axis = AxisResolution::new(Axis::Y, 2, 1.0, -1.0).unwrap();
        assert_eq!(axis.at(0), 1.0);
        assert_relative_eq!(axis.at(1), 0.0);
        assert_eq!(axis.at(2), -1.0);
        assert_relative_eq!(axis.step(), -1.0);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(
            AxisResolution::new(Axis::Z, 0, 0.0, 1.0),
            Err(MarchingCubesError::ZeroCellCount { axis: Axis::Z })
        );
    }

    #[test]
    fn empty_range_is_rejected() {
        assert_eq!(
            AxisResolution::new(Axis::X, 8, 0.5, 0.5),
            Err(MarchingCubesError::EmptyRange {
                axis: Axis::X,
                bound: 0.5
            })
        );
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        assert!(matches!(
            AxisResolution::new(Axis::Y, 8, Value::NEG_INFINITY, 0.0),
            Err(MarchingCubesError::NonFiniteBounds { axis: Axis::Y, .. })
        ));
        assert!(matches!(
            AxisResolution::new(Axis::Y, 8, 0.0, Value::NAN),
            Err(MarchingCubesError::NonFiniteBounds { .. })
        ));
    }
}
