/// Stable texture identifier used as the fill-lane batching key.
///
/// Ids are issued by the device backend that owns the texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Width/height sentinel meaning "use the image's native size".
pub const NATIVE_SIZE: f32 = -1.0;

/// Anything drawable with [`Renderer::image`](super::Renderer::image).
///
/// Implemented by texture owners outside the renderer; decoding and upload
/// are their concern.
pub trait Image {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn texture_id(&self) -> TextureId;
}

impl<T: Image + ?Sized> Image for &T {
    fn width(&self) -> f32 {
        (**self).width()
    }

    fn height(&self) -> f32 {
        (**self).height()
    }

    fn texture_id(&self) -> TextureId {
        (**self).texture_id()
    }
}

/// Resolves a requested draw size against the image's native size.
#[inline]
pub(crate) fn resolve_size(requested: f32, native: f32) -> f32 {
    if requested == NATIVE_SIZE { native } else { requested }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_sentinel_resolves_to_image_size() {
        assert_eq!(resolve_size(NATIVE_SIZE, 64.0), 64.0);
        assert_eq!(resolve_size(32.0, 64.0), 32.0);
        assert_eq!(resolve_size(0.0, 64.0), 0.0);
    }
}
