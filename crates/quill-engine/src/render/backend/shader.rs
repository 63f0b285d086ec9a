//! WGSL sources for the two fixed programs and their up-front validation.
//!
//! wgpu reports shader errors asynchronously through the device error
//! handler. Validating with naga first turns a broken program into a
//! construction-time `RenderError` instead.

use crate::error::RenderError;
use crate::render::device::ShaderProgram;

pub(super) const VERTEX_ENTRY: &str = "vs_main";
pub(super) const FRAGMENT_ENTRY: &str = "fs_main";

/// Shipped WGSL source for `program`.
pub(super) fn source(program: ShaderProgram) -> &'static str {
    match program {
        ShaderProgram::Simple => include_str!("shaders/simple.wgsl"),
        ShaderProgram::Textured => include_str!("shaders/textured.wgsl"),
    }
}

/// Parses and validates `src`, then checks both stage entry points exist.
///
/// Parse and validation failures are compile errors; a missing entry point is
/// a link error.
pub(super) fn validate(program: ShaderProgram, src: &str) -> Result<(), RenderError> {
    let module = naga::front::wgsl::parse_str(src).map_err(|e| RenderError::ShaderCompile {
        program,
        message: e.to_string(),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| RenderError::ShaderCompile {
        program,
        message: e.to_string(),
    })?;

    for (name, stage) in [
        (VERTEX_ENTRY, naga::ShaderStage::Vertex),
        (FRAGMENT_ENTRY, naga::ShaderStage::Fragment),
    ] {
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage);
        if !found {
            return Err(RenderError::ShaderLink {
                program,
                message: format!("missing {stage:?} entry point `{name}`"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_programs_validate() {
        for program in [ShaderProgram::Simple, ShaderProgram::Textured] {
            validate(program, source(program)).unwrap();
        }
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = validate(ShaderProgram::Simple, "fn vs_main( {").unwrap_err();
        assert!(matches!(err, RenderError::ShaderCompile { program: ShaderProgram::Simple, .. }));
    }

    #[test]
    fn missing_fragment_stage_is_a_link_error() {
        let src = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        let err = validate(ShaderProgram::Textured, src).unwrap_err();
        assert!(matches!(err, RenderError::ShaderLink { program: ShaderProgram::Textured, .. }));
    }
}
