/// Fullscreen vertex stage shared by every post-process fragment shader.
///
/// Generates a clip-space quad from vertex indices (no vertex buffer
/// needed) and hands the fragment stage a texture-space `uv` with `v = 0`
/// on the top row.
pub const FULLSCREEN_WGSL: &str = r#"
struct VertexOut {
    @builtin(position) pos: vec4<f32>,
    @location(0)       uv:  vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VertexOut {
    // Two triangles covering clip space
    var positions = array<vec2<f32>, 6>(
        vec2(-1.0, -1.0), vec2( 1.0, -1.0), vec2(-1.0,  1.0),
        vec2(-1.0,  1.0), vec2( 1.0, -1.0), vec2( 1.0,  1.0),
    );
    let p = positions[vi];
    var out: VertexOut;
    out.pos = vec4(p, 0.0, 1.0);
    out.uv  = vec2(p.x * 0.5 + 0.5, 0.5 - p.y * 0.5);
    return out;
}
"#;

/// The pixel-art fragment stage; entry point `fragment`.
pub const PIXEL_ART_WGSL: &str = include_str!("../shaders/pixel_art.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fragment";

/// Vertices per fullscreen draw.
pub const FULLSCREEN_VERTICES: u32 = 6;

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(src: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(src)
            .unwrap_or_else(|e| panic!("WGSL parse failed: {}", e.emit_to_string(src)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("WGSL validation failed: {e:?}"));
        module
    }

    fn entry<'a>(module: &'a naga::Module, name: &str) -> &'a naga::EntryPoint {
        module
            .entry_points
            .iter()
            .find(|ep| ep.name == name)
            .unwrap_or_else(|| panic!("missing entry point {name}"))
    }

    #[test]
    fn fullscreen_shader_is_valid() {
        let module = validate(FULLSCREEN_WGSL);
        assert_eq!(entry(&module, VERTEX_ENTRY).stage, naga::ShaderStage::Vertex);
    }

    #[test]
    fn pixel_art_shader_is_valid() {
        let module = validate(PIXEL_ART_WGSL);
        assert_eq!(
            entry(&module, FRAGMENT_ENTRY).stage,
            naga::ShaderStage::Fragment
        );
    }

    #[test]
    fn pixel_art_shader_binds_texture_sampler_uniform() {
        let module = validate(PIXEL_ART_WGSL);
        let mut bindings: Vec<(u32, u32, String)> = module
            .global_variables
            .iter()
            .filter_map(|(_, var)| {
                let binding = var.binding.as_ref()?;
                Some((binding.group, binding.binding, var.name.clone().unwrap_or_default()))
            })
            .collect();
        bindings.sort();
        assert_eq!(
            bindings,
            vec![
                (0, 0, "screen_texture".to_string()),
                (0, 1, "texture_sampler".to_string()),
                (0, 2, "settings".to_string()),
            ]
        );
    }

    #[test]
    fn uniform_struct_matches_rust_layout() {
        let module = validate(PIXEL_ART_WGSL);
        let (_, ty) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("PixelArtSettings"))
            .expect("PixelArtSettings struct");
        match &ty.inner {
            naga::TypeInner::Struct { members, span } => {
                assert_eq!(*span as usize, std::mem::size_of::<crate::Uniforms>());
                let names: Vec<_> = members.iter().filter_map(|m| m.name.as_deref()).collect();
                assert_eq!(names, ["grid", "color_levels", "enabled"]);
                let offsets: Vec<_> = members.iter().map(|m| m.offset).collect();
                assert_eq!(offsets, [0, 8, 12]);
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }
}
