use bytemuck::Pod;

/// Default growth increment: 1 MiB of vertex data.
pub const DEFAULT_GROWTH_CHUNK_BYTES: usize = 1 << 20;

/// Growable CPU-side vertex store for one lane.
///
/// Invariants:
/// - `len() <= capacity()`
/// - capacity only grows; `clear()` keeps it
/// - growth is prefix-stable: every vertex appended before a growth event is
///   still present, in order, afterwards
///
/// Capacity grows in chunks of `max(overflow, chunk)` vertices rather than to
/// the exact size needed, so a steady stream of small appends reallocates
/// rarely.
#[derive(Debug)]
pub struct GeometryLane<V: Pod> {
    label: &'static str,
    vertices: Vec<V>,
    chunk: usize,
    growth_events: u32,
}

impl<V: Pod> GeometryLane<V> {
    /// Creates a lane with room for `capacity` vertices.
    ///
    /// `chunk_bytes` is converted to a vertex count (at least one vertex).
    pub fn new(label: &'static str, capacity: usize, chunk_bytes: usize) -> Self {
        let chunk = (chunk_bytes / std::mem::size_of::<V>()).max(1);
        Self {
            label,
            vertices: Vec::with_capacity(capacity),
            chunk,
            growth_events: 0,
        }
    }

    /// Vertices appended since the last `clear()`.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.vertices.capacity()
    }

    /// Growth increment in vertices.
    #[inline]
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Number of growth events since construction.
    #[inline]
    pub fn growth_events(&self) -> u32 {
        self.growth_events
    }

    #[inline]
    pub fn as_slice(&self) -> &[V] {
        &self.vertices
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Grows capacity by `max(needed, chunk)` vertices.
    ///
    /// Existing content is moved into the new store unchanged.
    pub fn grow(&mut self, needed: usize) {
        let old = self.vertices.capacity();
        let by = needed.max(self.chunk);
        let target = old.saturating_add(by);
        self.vertices.reserve_exact(target - self.vertices.len());
        self.growth_events = self.growth_events.wrapping_add(1);
        log::debug!(
            "{} lane grew: {} -> {} vertices (len {})",
            self.label,
            old,
            self.vertices.capacity(),
            self.vertices.len()
        );
    }

    /// Ensures room for `additional` more vertices, growing if needed.
    ///
    /// Returns `true` if a growth event happened.
    pub fn reserve(&mut self, additional: usize) -> bool {
        let required = self.vertices.len().saturating_add(additional);
        let cap = self.vertices.capacity();
        if required <= cap {
            return false;
        }
        self.grow(required - cap);
        true
    }

    /// Appends one vertex, growing first if the lane is full.
    #[inline]
    pub fn push(&mut self, v: V) {
        self.reserve(1);
        self.vertices.push(v);
    }

    /// Appends a run of vertices with at most one growth event.
    pub fn extend_from_slice(&mut self, vs: &[V]) {
        self.reserve(vs.len());
        self.vertices.extend_from_slice(vs);
    }

    /// Truncates the logical length to zero. Capacity is retained.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane(capacity: usize, chunk_vertices: usize) -> GeometryLane<[f32; 2]> {
        GeometryLane::new("test", capacity, chunk_vertices * std::mem::size_of::<[f32; 2]>())
    }

    // ── growth ────────────────────────────────────────────────────────────

    #[test]
    fn append_within_capacity_does_not_grow() {
        let mut l = lane(4, 16);
        l.extend_from_slice(&[[0.0, 0.0]; 4]);
        assert_eq!(l.growth_events(), 0);
        assert_eq!(l.len(), 4);
    }

    #[test]
    fn small_overflow_grows_by_chunk() {
        let mut l = lane(4, 16);
        l.extend_from_slice(&[[0.0, 0.0]; 5]);
        assert_eq!(l.growth_events(), 1);
        assert!(l.capacity() >= 4 + 16);
    }

    #[test]
    fn large_overflow_grows_by_overflow() {
        let mut l = lane(4, 2);
        l.extend_from_slice(&[[0.0, 0.0]; 50]);
        assert_eq!(l.growth_events(), 1);
        assert!(l.capacity() >= 50);
        assert_eq!(l.len(), 50);
    }

    #[test]
    fn growth_is_prefix_stable() {
        let mut l = lane(3, 1);
        let before: Vec<[f32; 2]> = (0..3).map(|i| [i as f32, -(i as f32)]).collect();
        l.extend_from_slice(&before);
        let bytes_before = l.as_bytes().to_vec();

        l.push([99.0, 99.0]);

        assert_eq!(l.growth_events(), 1);
        assert_eq!(&l.as_bytes()[..bytes_before.len()], &bytes_before[..]);
        assert_eq!(l.as_slice()[3], [99.0, 99.0]);
    }

    #[test]
    fn explicit_grow_uses_chunk_minimum() {
        let mut l = lane(0, 32);
        l.grow(1);
        assert!(l.capacity() >= 32);
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_keeps_capacity() {
        let mut l = lane(2, 8);
        l.extend_from_slice(&[[1.0, 1.0]; 9]);
        let cap = l.capacity();
        l.clear();
        assert!(l.is_empty());
        assert_eq!(l.capacity(), cap);
    }

    #[test]
    fn chunk_is_at_least_one_vertex() {
        let l: GeometryLane<[f32; 2]> = GeometryLane::new("tiny", 0, 1);
        assert_eq!(l.chunk(), 1);
    }
}
