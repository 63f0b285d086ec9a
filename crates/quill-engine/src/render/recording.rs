use std::collections::BTreeSet;
use std::ops::Range;

use crate::error::RenderError;

use super::device::{GraphicsDevice, LaneKind, MatrixUniforms, ShaderProgram, Topology};
use super::texture::TextureId;

/// One recorded [`GraphicsDevice`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    PreparePrograms,
    CreateTexture { id: TextureId, width: u32, height: u32 },
    ReleaseTexture(TextureId),
    Upload { lane: LaneKind, bytes: Vec<u8> },
    UseProgram(ShaderProgram),
    SetMatrices(MatrixUniforms),
    BindTexture(TextureId),
    Draw { topology: Topology, vertices: Range<u32> },
}

/// Device that records calls instead of issuing them.
///
/// Useful for tests and for inspecting what a frame would submit without a GPU.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    calls: Vec<DeviceCall>,
    next_texture: u64,
    live_textures: BTreeSet<TextureId>,
    fail_program: Option<ShaderProgram>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose `prepare_programs` reports a link failure for `program`.
    pub fn failing(program: ShaderProgram) -> Self {
        Self {
            fail_program: Some(program),
            ..Self::default()
        }
    }

    #[inline]
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Returns and forgets all recorded calls.
    pub fn take_calls(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Recorded draw calls, in order.
    pub fn draws(&self) -> Vec<(Topology, Range<u32>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Draw { topology, vertices } => Some((*topology, vertices.clone())),
                _ => None,
            })
            .collect()
    }

    /// Textures created and not yet released.
    pub fn live_textures(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.live_textures.iter().copied()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn prepare_programs(&mut self) -> Result<(), RenderError> {
        self.calls.push(DeviceCall::PreparePrograms);
        match self.fail_program {
            Some(program) => Err(RenderError::ShaderLink {
                program,
                message: "recording device configured to fail".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn create_texture_rgba8(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, RenderError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::Texture(format!(
                "expected {expected} bytes for {width}x{height} RGBA8, got {}",
                pixels.len()
            )));
        }
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.live_textures.insert(id);
        self.calls.push(DeviceCall::CreateTexture { id, width, height });
        Ok(id)
    }

    fn release_texture(&mut self, id: TextureId) {
        self.live_textures.remove(&id);
        self.calls.push(DeviceCall::ReleaseTexture(id));
    }

    fn upload(&mut self, lane: LaneKind, bytes: &[u8]) {
        self.calls.push(DeviceCall::Upload {
            lane,
            bytes: bytes.to_vec(),
        });
    }

    fn use_program(&mut self, program: ShaderProgram) {
        self.calls.push(DeviceCall::UseProgram(program));
    }

    fn set_matrices(&mut self, uniforms: &MatrixUniforms) {
        self.calls.push(DeviceCall::SetMatrices(*uniforms));
    }

    fn bind_texture(&mut self, id: TextureId) {
        self.calls.push(DeviceCall::BindTexture(id));
    }

    fn draw(&mut self, topology: Topology, vertices: Range<u32>) {
        self.calls.push(DeviceCall::Draw { topology, vertices });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_ids_start_at_one_and_track_liveness() {
        let mut d = RecordingDevice::new();
        let a = d.create_texture_rgba8(1, 1, &[0; 4]).unwrap();
        let b = d.create_texture_rgba8(2, 1, &[0; 8]).unwrap();
        assert_eq!(a, TextureId(1));
        assert_eq!(b, TextureId(2));

        d.release_texture(a);
        assert_eq!(d.live_textures().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn wrong_pixel_length_is_rejected() {
        let mut d = RecordingDevice::new();
        let err = d.create_texture_rgba8(2, 2, &[0; 4]).unwrap_err();
        assert!(matches!(err, RenderError::Texture(_)));
        assert_eq!(d.live_textures().count(), 0);
    }
}
