use crate::render::RenderTarget;

/// One offscreen frame: a color texture plus the encoder recording into it.
///
/// Finalize with [`Gpu::submit`](super::Gpu::submit).
pub struct OffscreenFrame {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl OffscreenFrame {
    /// Clears the whole target to `color`.
    pub fn clear(&mut self, color: wgpu::Color) {
        let _pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quill clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Borrows the encoder and view as a render target.
    #[inline]
    pub fn target(&mut self) -> RenderTarget<'_> {
        RenderTarget::new(&mut self.encoder, &self.view)
    }
}
