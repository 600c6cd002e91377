//! Resource payload types and upload validation
//!
//! These are the host-side payloads behind handles. The guest never sees
//! them; it only sees the u32 handle the loaders return. Validation here
//! is the boundary's defense against malformed uploads - everything is
//! checked before a handle is allocated, so a resolved handle always
//! refers to well-formed data.

use duskcore_core::{CoreError, CoreResult};
use gx_common::{FORMAT_MASK, FORMAT_SKINNED, vertex_stride};

/// Audio sample rate for PCM sounds (22.05 kHz, 16-bit signed, mono)
pub const SAMPLE_RATE: u32 = 22_050;

/// Maximum bones per skeleton
pub const MAX_BONES: u32 = 64;

/// RGBA8 texture payload
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, `width * height * 4` bytes
    pub data: Vec<u8>,
}

/// Interleaved f32 mesh payload
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Vertex format flags (see `gx_common::packing`)
    pub format: u32,
    pub vertex_count: u32,
    /// Interleaved attributes, `vertex_count * stride / 4` floats
    pub vertex_data: Vec<f32>,
    /// Triangle list indices (length a multiple of 3), or `None` for
    /// non-indexed draws
    pub index_data: Option<Vec<u16>>,
}

/// Raw PCM sound payload
#[derive(Debug, Clone)]
pub struct SoundData {
    /// Mono samples at [`SAMPLE_RATE`]
    pub samples: Vec<i16>,
}

/// Skeleton payload: inverse bind matrices for skinning
#[derive(Debug, Clone)]
pub struct SkeletonData {
    pub bone_count: u32,
    /// One 3x4 row-major matrix per bone
    pub inverse_bind: Vec<[f32; 12]>,
}

/// Bitmap font payload
#[derive(Debug, Clone)]
pub struct FontData {
    /// Texture handle holding the glyph atlas
    pub texture: u32,
    pub glyph_width: u32,
    pub glyph_height: u32,
}

/// Keyframe animation payload (opaque bone-transform stream)
#[derive(Debug, Clone)]
pub struct KeyframesData {
    pub bone_count: u32,
    pub frame_count: u32,
    /// `frame_count * bone_count` packed bone transforms
    pub data: Vec<u8>,
}

/// Tracker music module payload (opaque; the audio backend interprets it)
#[derive(Debug, Clone)]
pub struct TrackerModule {
    pub data: Vec<u8>,
}

// =============================================================================
// Validation helpers
// =============================================================================

/// Validate vertex format flags (0-15).
pub(crate) fn validate_vertex_format(format: u32) -> CoreResult<u32> {
    if format & !FORMAT_MASK != 0 {
        return Err(CoreError::MalformedInput(format!(
            "vertex format {format:#x} has unknown flag bits"
        )));
    }
    Ok(format)
}

/// Validate a texture upload.
pub(crate) fn validate_texture(width: u32, height: u32, data: &[u8]) -> CoreResult<()> {
    if width == 0 || height == 0 {
        return Err(CoreError::MalformedInput(format!(
            "texture dimensions {width}x{height} must be non-zero"
        )));
    }
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(CoreError::MalformedInput(format!(
            "texture data is {} bytes, expected {expected} for {width}x{height} RGBA8",
            data.len()
        )));
    }
    Ok(())
}

/// Validate an interleaved vertex stream against its declared format.
pub(crate) fn validate_mesh(format: u32, vertex_count: u32, data: &[f32]) -> CoreResult<()> {
    validate_vertex_format(format)?;
    if vertex_count == 0 {
        return Err(CoreError::MalformedInput("vertex_count is zero".into()));
    }
    if format & FORMAT_SKINNED != 0 {
        return Err(CoreError::MalformedInput(
            "skinned meshes must be loaded through the packed path".into(),
        ));
    }
    let stride = vertex_stride(format);
    let expected_floats = vertex_count as usize * (stride as usize / 4);
    if data.len() != expected_floats {
        return Err(CoreError::MalformedInput(format!(
            "vertex data is {} floats, expected {expected_floats} for {vertex_count} vertices",
            data.len()
        )));
    }
    Ok(())
}

/// Validate a triangle index list against a vertex count.
pub(crate) fn validate_indices(indices: &[u16], vertex_count: u32) -> CoreResult<()> {
    if indices.is_empty() || indices.len() % 3 != 0 {
        return Err(CoreError::MalformedInput(format!(
            "index count {} is not a non-zero multiple of 3",
            indices.len()
        )));
    }
    if let Some(&bad) = indices.iter().find(|&&i| i as u32 >= vertex_count) {
        return Err(CoreError::MalformedInput(format!(
            "index {bad} out of range for {vertex_count} vertices"
        )));
    }
    Ok(())
}

/// Validate a skeleton upload.
pub(crate) fn validate_skeleton(bone_count: u32, inverse_bind: &[[f32; 12]]) -> CoreResult<()> {
    if bone_count == 0 || bone_count > MAX_BONES {
        return Err(CoreError::MalformedInput(format!(
            "bone_count {bone_count} out of range 1-{MAX_BONES}"
        )));
    }
    if inverse_bind.len() != bone_count as usize {
        return Err(CoreError::MalformedInput(format!(
            "{} inverse bind matrices for {bone_count} bones",
            inverse_bind.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gx_common::{FORMAT_NORMAL, FORMAT_UV};

    #[test]
    fn texture_size_must_match() {
        assert!(validate_texture(2, 2, &[0u8; 16]).is_ok());
        assert!(validate_texture(2, 2, &[0u8; 15]).is_err());
        assert!(validate_texture(0, 2, &[]).is_err());
    }

    #[test]
    fn mesh_float_count_must_match_stride() {
        let format = FORMAT_UV | FORMAT_NORMAL; // stride 32 bytes = 8 floats
        assert!(validate_mesh(format, 3, &[0.0; 24]).is_ok());
        assert!(validate_mesh(format, 3, &[0.0; 23]).is_err());
        assert!(validate_mesh(format, 0, &[]).is_err());
        assert!(validate_mesh(0x10, 1, &[0.0; 3]).is_err());
    }

    #[test]
    fn indices_must_be_triangles_in_range() {
        assert!(validate_indices(&[0, 1, 2], 3).is_ok());
        assert!(validate_indices(&[0, 1], 3).is_err());
        assert!(validate_indices(&[], 3).is_err());
        assert!(validate_indices(&[0, 1, 3], 3).is_err());
    }

    #[test]
    fn skeleton_bounds() {
        let bind = vec![[0.0f32; 12]; 2];
        assert!(validate_skeleton(2, &bind).is_ok());
        assert!(validate_skeleton(3, &bind).is_err());
        assert!(validate_skeleton(0, &[]).is_err());
        assert!(validate_skeleton(MAX_BONES + 1, &[]).is_err());
    }
}
