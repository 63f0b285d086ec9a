use crate::render::ShaderProgram;

/// Errors reported by the renderer core and its device backends.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A shader program failed to parse or validate.
    #[error("{program:?} program failed to compile: {message}")]
    ShaderCompile {
        program: ShaderProgram,
        message: String,
    },

    /// A shader program compiled but is missing a required stage entry point.
    #[error("{program:?} program failed to link: {message}")]
    ShaderLink {
        program: ShaderProgram,
        message: String,
    },

    /// `pop()` was called with no saved transform under `PopPolicy::Strict`.
    #[error("transform stack underflow: pop() without a matching push()")]
    TransformUnderflow,

    /// Texture creation was rejected by the device.
    #[error("texture error: {0}")]
    Texture(String),
}
