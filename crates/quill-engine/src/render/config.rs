use crate::transform::PopPolicy;

use super::lane::DEFAULT_GROWTH_CHUNK_BYTES;

/// Renderer construction parameters.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial fill-lane capacity, in vertices.
    pub fill_capacity: usize,

    /// Initial stroke-lane capacity, in vertices.
    pub stroke_capacity: usize,

    /// Minimum lane growth increment, in bytes of vertex data.
    ///
    /// A growth event adds `max(overflow, growth_chunk_bytes / stride)` vertices.
    pub growth_chunk_bytes: usize,

    /// What an unbalanced `pop()` does.
    pub pop_policy: PopPolicy,

    /// Number of sides used to approximate an ellipse.
    pub ellipse_segments: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fill_capacity: 6 * 1024,
            stroke_capacity: 2 * 1024,
            growth_chunk_bytes: DEFAULT_GROWTH_CHUNK_BYTES,
            pop_policy: PopPolicy::Lenient,
            ellipse_segments: 48,
        }
    }
}
