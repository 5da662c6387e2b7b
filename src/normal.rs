use crate::types::{Point, ScalarField, Value, Vector};

/// Default finite-difference step for [`estimate_normal`].
pub const NORMAL_EPSILON: Value = 1e-3;

/// Estimates the surface normal at `p` as the normalised negative gradient of `field`.
///
/// Each component is a symmetric difference along one axis:
///
/// ```text
/// n.x = f(p - ε·x̂) - f(p + ε·x̂)
/// ```
///
/// so normals point toward decreasing field values. Returns the zero vector
/// when the difference vector is too small to normalise, e.g. at a critical
/// point of the field or where it is flat at the scale of `epsilon`.
pub fn estimate_normal<F>(field: &F, p: Point, epsilon: Value) -> Vector
where
    F: ScalarField + ?Sized,
{
    let difference =
        |axis: Vector| field.sample(p - axis * epsilon) - field.sample(p + axis * epsilon);
    let gradient = Vector::new(
        difference(Vector::x()),
        difference(Vector::y()),
        difference(Vector::z()),
    );

    gradient.try_normalize(Value::EPSILON).unwrap_or_else(|| {
        tracing::trace!(x = p.x, y = p.y, z = p.z, "flat field, storing zero normal");
        Vector::zeros()
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn linear_field_normal_opposes_gradient() {
        let field = |p: Point| 2.0 * p.x;
        let n = estimate_normal(&field, Point::new(0.3, 0.1, -0.2), NORMAL_EPSILON);
        assert_relative_eq!(n, -Vector::x(), epsilon = 1e-6);
    }

    #[test]
    fn radial_field_normal_points_outward() {
        // Field decreases away from the origin.
        let field = |p: Point| 1.0 / p.coords.norm_squared();
        let p = Point::new(0.0, 0.6, 0.8);
        let n = estimate_normal(&field, p, NORMAL_EPSILON);
        assert_relative_eq!(n, p.coords, epsilon = 1e-3);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn flat_field_yields_zero_normal() {
        let field = |_: Point| 4.0;
        assert_eq!(estimate_normal(&field, Point::origin(), NORMAL_EPSILON), Vector::zeros());
    }
}
