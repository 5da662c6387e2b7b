use std::collections::HashMap;

use crate::types::GridIndex;

/// Identifies a cell edge by the lattice indices of its two endpoints.
///
/// The endpoints are stored in lexicographic order, so every cell sharing the
/// edge (up to four of them) builds the same key.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EdgeKey(GridIndex, GridIndex);

impl EdgeKey {
    pub fn new(a: GridIndex, b: GridIndex) -> Self {
        if a > b { Self(b, a) } else { Self(a, b) }
    }

    /// The endpoint that sorts first.
    pub fn start(&self) -> GridIndex {
        self.0
    }

    pub fn end(&self) -> GridIndex {
        self.1
    }
}

/// Tracks the vertex emitted for each crossed edge so that neighbouring cells
/// reuse it instead of emitting a duplicate.
///
/// Owned by a single generation run.
#[derive(Debug, Default)]
pub struct VertexCache {
    indices: HashMap<EdgeKey, u32>,
}

impl VertexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vertex index stored for `key`, if that edge was already emitted.
    pub fn get(&self, key: &EdgeKey) -> Option<u32> {
        self.indices.get(key).copied()
    }

    /// Records `index` as the vertex for `key`.
    pub fn put(&mut self, key: EdgeKey, index: u32) {
        self.indices.insert(key, index);
    }

    /// Returns the cached index for `key`, or calls `emit` to create the vertex and caches its index.
    ///
    /// `emit` runs at most once per distinct edge. If it fails nothing is cached.
    pub fn get_or_emit<E, F>(&mut self, key: EdgeKey, emit: F) -> Result<u32, E>
    where
        F: FnOnce(EdgeKey) -> Result<u32, E>,
    {
        if let Some(index) = self.get(&key) {
            return Ok(index);
        }
        let index = emit(key)?;
        self.put(key, index);
        Ok(index)
    }

    /// Number of distinct edges seen so far.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_endpoint_order() {
        let a = [1, 2, 3];
        let b = [1, 2, 4];
        assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
        assert_eq!(EdgeKey::new(b, a).start(), a);
        assert_eq!(EdgeKey::new(b, a).end(), b);
    }

    #[test]
    fn key_orders_lexicographically() {
        // x dominates even when y and z are larger.
        let key = EdgeKey::new([1, 0, 0], [0, 9, 9]);
        assert_eq!(key.start(), [0, 9, 9]);
    }

    #[test]
    fn emit_runs_once_per_edge() {
        let mut cache = VertexCache::new();
        let mut emitted = 0;
        let key = EdgeKey::new([0, 0, 0], [1, 0, 0]);

        for _ in 0..4 {
            let index = cache
                .get_or_emit::<(), _>(key, |_| {
                    emitted += 1;
                    Ok(7)
                })
                .unwrap();
            assert_eq!(index, 7);
        }
        assert_eq!(emitted, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_emit_is_not_cached() {
        let mut cache = VertexCache::new();
        let key = EdgeKey::new([0, 0, 0], [0, 1, 0]);
        assert_eq!(cache.get_or_emit(key, |_| Err("full")), Err("full"));
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key), None);
    }
}
