use crate::{
    tables::{CORNER_BITS, EDGE_TABLE},
    types::Value,
};

/// Computes the marching cubes mask for a cell from its 8 corner values.
///
/// A corner's bit is set when its value is **strictly below** the threshold.
/// Corner `v` sets bit [`CORNER_BITS[v]`](CORNER_BITS), so the mask indexes the
/// triangle table directly:
///
/// ```text
/// mask bit:     7  6  5  4  3  2  1  0
/// corner:      [6][7][5][4][2][3][1][0]
/// ```
///
/// NaN values are never below the threshold and count as outside.
#[inline]
pub fn cube_mask(corner_values: &[Value; 8], threshold: Value) -> u8 {
    corner_values
        .iter()
        .zip(CORNER_BITS)
        .filter(|&(&v, _)| v < threshold)
        .fold(0, |mask, (_, bit)| mask | (1 << bit))
}

/// Returns `true` when the surface crosses at least one edge of a cell with this mask.
#[inline]
pub fn is_crossed(mask: u8) -> bool {
    EDGE_TABLE[mask as usize] != 0
}
