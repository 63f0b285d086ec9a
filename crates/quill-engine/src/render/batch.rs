use super::texture::TextureId;

/// Contiguous run of fill-lane vertices sharing one texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Batch {
    pub start: u32,
    pub count: u32,
    pub texture: TextureId,
}

impl Batch {
    /// Vertex range covered by this batch.
    #[inline]
    pub fn range(&self) -> std::ops::Range<u32> {
        self.start..self.start + self.count
    }
}

/// Ordered partition of the fill lane into texture-homogeneous batches.
///
/// Batches follow submission order. Adjacent appends with the same texture
/// extend the last batch; a texture change starts a new one, even if an
/// earlier batch used the same texture.
#[derive(Debug, Default)]
pub struct BatchList {
    batches: Vec<Batch>,
}

impl BatchList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            batches: Vec::with_capacity(capacity),
        }
    }

    /// Records that `count` vertices bound to `texture` were appended, leaving
    /// the fill lane at `total` vertices.
    pub fn record(&mut self, count: u32, texture: TextureId, total: u32) {
        if count == 0 {
            return;
        }
        debug_assert!(count <= total, "batch count exceeds lane length");

        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.count += count,
            _ => self.batches.push(Batch {
                start: total - count,
                count,
                texture,
            }),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Batch] {
        &self.batches
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Sum of all batch counts.
    pub fn vertex_count(&self) -> u32 {
        self.batches.iter().map(|b| b.count).sum()
    }

    /// Returns `true` if the batches exactly partition `[0, total)`.
    pub fn covers(&self, total: u32) -> bool {
        let mut next = 0u32;
        for b in &self.batches {
            if b.start != next || b.count == 0 {
                return false;
            }
            next += b.count;
        }
        next == total
    }

    #[inline]
    pub fn clear(&mut self) {
        self.batches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: TextureId = TextureId(1);
    const B: TextureId = TextureId(2);

    #[test]
    fn same_texture_extends_last_batch() {
        let mut list = BatchList::default();
        list.record(6, A, 6);
        list.record(6, A, 12);
        assert_eq!(list.as_slice(), &[Batch { start: 0, count: 12, texture: A }]);
    }

    #[test]
    fn texture_change_never_merges_across() {
        let mut list = BatchList::default();
        list.record(6, A, 6);
        list.record(6, B, 12);
        list.record(6, A, 18);
        let textures: Vec<_> = list.as_slice().iter().map(|b| b.texture).collect();
        assert_eq!(textures, vec![A, B, A]);
        assert!(list.covers(18));
    }

    #[test]
    fn zero_count_is_ignored() {
        let mut list = BatchList::default();
        list.record(0, A, 0);
        assert!(list.is_empty());
        assert!(list.covers(0));
    }

    #[test]
    fn covers_detects_gaps() {
        let mut list = BatchList::default();
        list.record(3, A, 3);
        assert!(!list.covers(6));
        assert_eq!(list.vertex_count(), 3);
    }
}
