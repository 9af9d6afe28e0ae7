//! Static lookup tables shared with the geometry and material writers.
//!
//! The builder never interprets these; they are exposed so attribute values and
//! stream data can be produced consistently by collaborators.

/// Material flag names, indexed by flag number minus one.
pub const MATERIAL_FLAGS: [&str; 64] = [
    "_F01_DIFFUSEMAP", "_F02_SKINNED", "_F03_NORMALMAP", "_F04_", "_F05_",
    "_F06_", "_F07_UNLIT", "_F08_", "_F09_TRANSPARENT", "_F10_NORECEIVESHADOW",
    "_F11_ALPHACUTOUT", "_F12_BATCHED_BILLBOARD", "_F13_UVANIMATION", "_F14_UVSCROLL", "_F15_WIND",
    "_F16_DIFFUSE2MAP", "_F17_MULTIPLYDIFFUSE2MAP", "_F18_UVTILES", "_F19_BILLBOARD", "_F20_PARALLAXMAP",
    "_F21_VERTEXCOLOUR", "_F22_TRANSPARENT_SCALAR", "_F23_CAMERA_RELATIVE", "_F24_AOMAP", "_F25_ROUGHNESS_MASK",
    "_F26_STRETCHY_PARTICLE", "_F27_VBTANGENT", "_F28_VBSKINNED", "_F29_VBCOLOUR", "_F30_REFRACTION_MAP",
    "_F31_DISPLACEMENT", "_F32_LEAF", "_F33_GRASS", "_F34_GLOW", "_F35_GLOW_MASK",
    "_F36_DOUBLESIDED", "_F37_RECOLOUR", "_F38_NO_DEFORM", "_F39_METALLIC_MASK", "_F40_SUBSURFACE_MASK",
    "_F41_DETAIL_DIFFUSE", "_F42_DETAIL_NORMAL", "_F43_NORMAL_TILING", "_F44_IMPOSTER", "_F45_SCANABLE",
    "_F46_BILLBOARD_AT", "_F47_WRITE_LOG_Z", "_F48_WARPED_DIFFUSE_LIGHTING", "_F49_DISABLE_AMBIENT", "_F50_DISABLE_POSTPROCESS",
    "_F51_DECAL_DIFFUSE", "_F52_DECAL_NORMAL", "_F53_", "_F54_", "_F55_",
    "_F56_", "_F57_", "_F58_", "_F59_", "_F60_",
    "_F61_", "_F62_", "_F63_", "_F64_",
];

/// Vertex stream index to semantic name.
pub const SEMANTICS: [(u32, &str); 4] = [
    (0, "vertex_stream"),
    (1, "uv_stream"),
    (2, "n_stream"),
    (3, "t_stream"),
];

/// Semantic name for a stream index.
pub fn semantic(index: u32) -> Option<&'static str> {
    SEMANTICS
        .iter()
        .find(|(i, _)| *i == index)
        .map(|(_, name)| *name)
}

/// Zero-based position of a material flag by name.
pub fn material_flag_index(name: &str) -> Option<usize> {
    MATERIAL_FLAGS.iter().position(|flag| *flag == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_lookup() {
        assert_eq!(semantic(0), Some("vertex_stream"));
        assert_eq!(semantic(2), Some("n_stream"));
        assert_eq!(semantic(4), None);
    }

    #[test]
    fn test_material_flags_are_numbered_in_order() {
        for (i, flag) in MATERIAL_FLAGS.iter().enumerate() {
            assert!(flag.starts_with(&format!("_F{:02}_", i + 1)), "{flag}");
        }
    }

    #[test]
    fn test_material_flag_index() {
        assert_eq!(material_flag_index("_F01_DIFFUSEMAP"), Some(0));
        assert_eq!(material_flag_index("_F36_DOUBLESIDED"), Some(35));
        assert_eq!(material_flag_index("_F99_"), None);
    }
}
