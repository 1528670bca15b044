use std::borrow::Cow;

use anyhow::{anyhow, Result};
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::ShaderStage;

/// Parses and validates a GLSL stage on the CPU, surfacing the front end's
/// diagnostics as the error. Shader text is static, so a failure here is
/// permanent and deterministic: the caller disables the affected tile and
/// keeps going. No retries.
pub fn validate_source(stage: ShaderStage, label: &str, source: &str) -> Result<()> {
    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(stage), source)
        .map_err(|errors| anyhow!("{label}: shader failed to compile: {errors:?}"))?;
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|error| anyhow!("{label}: shader failed validation: {error:?}"))?;
    Ok(())
}

/// Validates, then hands the source to wgpu's GLSL front end.
///
/// Validation happens up front because `create_shader_module` reports
/// problems through the device error scope, long after we could still
/// cleanly disable the tile.
pub(crate) fn create_shader_module(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    validate_source(stage, label, source)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_string()),
            stage,
            defines: &[],
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_fragment_is_an_error_not_a_panic() {
        let result = validate_source(
            ShaderStage::Fragment,
            "broken",
            "void main() { this is not glsl; }",
        );
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("broken"));
    }

    #[test]
    fn type_errors_are_caught_before_any_device_exists() {
        // Parses structurally but misuses types.
        let source = r#"#version 450
layout(location = 0) out vec4 out_color;
void main() {
    vec3 color = vec3(1.0) + vec2(0.5);
    out_color = vec4(color, 1.0);
}
"#;
        assert!(validate_source(ShaderStage::Fragment, "typed", source).is_err());
    }

    #[test]
    fn every_registered_tile_validates() {
        for id in crate::tiles::TileId::ALL {
            let spec = crate::tiles::TileSpec::with_defaults(id, 7.0);
            let passes = crate::tiles::build_passes(&spec);
            assert!(!passes.is_empty());
            for pass in &passes {
                validate_source(ShaderStage::Vertex, pass.label, pass.vertex_source)
                    .unwrap_or_else(|err| panic!("{id} vertex stage: {err:#}"));
                validate_source(ShaderStage::Fragment, pass.label, pass.fragment_source)
                    .unwrap_or_else(|err| panic!("{id} fragment stage: {err:#}"));
            }
        }
    }
}
