use crate::types::{Point, Value};

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

/// Returns the interpolation factor `t` at which the field crosses `iso_val`
/// along an edge from `v0` to `v1`.
///
/// ```text
/// t = |v0 - iso_val| / |v0 - v1|
/// ```
///
/// Falls back to the midpoint (`0.5`) when either value is not finite or
/// `v0 == v1`, so swapping the endpoints mirrors the result. Clamps to `[0, 1]`
/// otherwise.
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    let delta = (v0 - v1).abs();
    if !v0.is_finite() || !v1.is_finite() || delta == 0.0 || !delta.is_finite() {
        tracing::trace!(v0, v1, iso_val, "degenerate edge, using midpoint");
        return 0.5;
    }
    ((v0 - iso_val).abs() / delta).clamp(0.0, 1.0)
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Linearly interpolate between two points by factor t
pub fn interpolate_points(p0: Point, p1: Point, t: Value) -> Point {
    Point::new(lerp(p0.x, p1.x, t), lerp(p0.y, p1.y, t), lerp(p0.z, p1.z, t))
}
