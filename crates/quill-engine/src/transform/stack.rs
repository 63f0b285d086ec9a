use glam::{Mat4, Vec3};

use crate::error::RenderError;

/// Behavior of [`TransformStack::pop`] when no matrix has been saved.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PopPolicy {
    /// Unbalanced `pop()` is a no-op; the current matrix is left unchanged.
    #[default]
    Lenient,
    /// Unbalanced `pop()` returns [`RenderError::TransformUnderflow`].
    Strict,
}

/// Current model matrix plus a save/restore stack.
///
/// All elementary operations post-multiply (`current = current * op`), so a
/// transform applied inside a `push()` scope is expressed relative to its
/// parent, the way a scene graph composes.
///
/// The stack is explicit caller state. Flushing geometry never resets it.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
    policy: PopPolicy,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new(PopPolicy::default())
    }
}

impl TransformStack {
    pub fn new(policy: PopPolicy) -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
            policy,
        }
    }

    #[inline]
    pub fn current(&self) -> &Mat4 {
        &self.current
    }

    /// Number of saved matrices.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    #[inline]
    pub fn policy(&self) -> PopPolicy {
        self.policy
    }

    /// Saves a copy of the current matrix.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the most recently saved matrix.
    ///
    /// With nothing saved the current matrix is left untouched; whether that is
    /// reported depends on the [`PopPolicy`].
    pub fn pop(&mut self) -> Result<(), RenderError> {
        match self.saved.pop() {
            Some(m) => {
                self.current = m;
                Ok(())
            }
            None => match self.policy {
                PopPolicy::Lenient => {
                    log::debug!("TransformStack: pop() on empty stack ignored");
                    Ok(())
                }
                PopPolicy::Strict => Err(RenderError::TransformUnderflow),
            },
        }
    }

    /// Resets the current matrix to identity. Saved matrices are kept.
    pub fn reset(&mut self) {
        self.current = Mat4::IDENTITY;
    }

    /// Post-multiplies an arbitrary matrix.
    #[inline]
    pub fn apply(&mut self, m: Mat4) {
        self.current *= m;
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.translate_3d(x, y, 0.0);
    }

    pub fn translate_3d(&mut self, x: f32, y: f32, z: f32) {
        self.apply(Mat4::from_translation(Vec3::new(x, y, z)));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.scale_3d(sx, sy, 1.0);
    }

    pub fn scale_3d(&mut self, sx: f32, sy: f32, sz: f32) {
        self.apply(Mat4::from_scale(Vec3::new(sx, sy, sz)));
    }

    /// Rotates by `angle` radians about +Z (the 2D rotation).
    pub fn rotate(&mut self, angle: f32) {
        self.rotate_axis(angle, Vec3::Z);
    }

    /// Rotates by `angle` radians about an arbitrary axis.
    ///
    /// A zero-length axis leaves the matrix unchanged.
    pub fn rotate_axis(&mut self, angle: f32, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.apply(Mat4::from_axis_angle(axis, angle));
    }

    /// Maps a local-space point through the current matrix.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.current.transform_point3(p)
    }
}
