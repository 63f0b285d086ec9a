use crate::render::texture::{Image, TextureId};

/// An RGBA8 texture owned by a [`WgpuDevice`](super::WgpuDevice).
///
/// Created with [`WgpuDevice::create_image`](super::WgpuDevice::create_image);
/// released with `GraphicsDevice::release_texture`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GpuImage {
    id: TextureId,
    width: u32,
    height: u32,
}

impl GpuImage {
    pub(super) fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}

impl Image for GpuImage {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn texture_id(&self) -> TextureId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_size_is_pixel_size() {
        let img = GpuImage::new(TextureId(7), 64, 32);
        assert_eq!(img.width(), 64.0);
        assert_eq!(img.height(), 32.0);
        assert_eq!(img.texture_id(), TextureId(7));
    }
}
