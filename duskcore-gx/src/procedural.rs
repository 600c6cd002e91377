//! Procedural mesh generation
//!
//! Small analytic primitives generated host-side during init. All
//! generators emit interleaved `[position, uv, normal]` vertices
//! (FORMAT_UV | FORMAT_NORMAL) with an indexed triangle list, so a
//! procedural mesh is indistinguishable from a loaded one downstream.

use duskcore_core::{CoreError, CoreResult};
use gx_common::{FORMAT_NORMAL, FORMAT_UV};

use crate::resources::MeshData;

const FORMAT: u32 = FORMAT_UV | FORMAT_NORMAL;

fn push_vertex(out: &mut Vec<f32>, pos: [f32; 3], uv: [f32; 2], normal: [f32; 3]) {
    out.extend_from_slice(&pos);
    out.extend_from_slice(&uv);
    out.extend_from_slice(&normal);
}

/// Generate an axis-aligned cube centered at the origin.
///
/// 24 vertices (4 per face, so normals stay hard) and 36 indices.
pub fn cube(size: f32) -> CoreResult<MeshData> {
    if !(size > 0.0) {
        return Err(CoreError::MalformedInput(format!(
            "cube size {size} must be positive"
        )));
    }
    let h = size * 0.5;

    // (normal, u axis, v axis) per face
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),   // +Z
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), // -Z
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),  // +X
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),  // -X
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),  // +Y
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),  // -Y
    ];

    let mut vertices = Vec::with_capacity(24 * 8);
    let mut indices = Vec::with_capacity(36);

    for (face, &(n, u, v)) in faces.iter().enumerate() {
        let base = (face * 4) as u16;
        for (du, dv, tu, tv) in [
            (-1.0, -1.0, 0.0, 1.0),
            (1.0, -1.0, 1.0, 1.0),
            (1.0, 1.0, 1.0, 0.0),
            (-1.0, 1.0, 0.0, 0.0),
        ] {
            let pos = [
                n[0] * h + u[0] * h * du + v[0] * h * dv,
                n[1] * h + u[1] * h * du + v[1] * h * dv,
                n[2] * h + u[2] * h * du + v[2] * h * dv,
            ];
            push_vertex(&mut vertices, pos, [tu, tv], n);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Ok(MeshData {
        format: FORMAT,
        vertex_count: 24,
        vertex_data: vertices,
        index_data: Some(indices),
    })
}

/// Generate a flat XZ plane centered at the origin, facing +Y.
pub fn plane(width: f32, depth: f32) -> CoreResult<MeshData> {
    if !(width > 0.0) || !(depth > 0.0) {
        return Err(CoreError::MalformedInput(format!(
            "plane dimensions {width}x{depth} must be positive"
        )));
    }
    let (hw, hd) = (width * 0.5, depth * 0.5);
    let up = [0.0, 1.0, 0.0];

    let mut vertices = Vec::with_capacity(4 * 8);
    push_vertex(&mut vertices, [-hw, 0.0, -hd], [0.0, 0.0], up);
    push_vertex(&mut vertices, [-hw, 0.0, hd], [0.0, 1.0], up);
    push_vertex(&mut vertices, [hw, 0.0, hd], [1.0, 1.0], up);
    push_vertex(&mut vertices, [hw, 0.0, -hd], [1.0, 0.0], up);

    Ok(MeshData {
        format: FORMAT,
        vertex_count: 4,
        vertex_data: vertices,
        index_data: Some(vec![0, 1, 2, 0, 2, 3]),
    })
}

/// Generate a UV sphere centered at the origin.
///
/// `rings` is the latitude subdivision (>= 2), `sectors` the longitude
/// subdivision (>= 3).
pub fn sphere(radius: f32, rings: u32, sectors: u32) -> CoreResult<MeshData> {
    if !(radius > 0.0) {
        return Err(CoreError::MalformedInput(format!(
            "sphere radius {radius} must be positive"
        )));
    }
    if rings < 2 || sectors < 3 {
        return Err(CoreError::MalformedInput(format!(
            "sphere subdivision {rings}x{sectors} below minimum 2x3"
        )));
    }

    let vertex_count = (rings + 1) * (sectors + 1);
    if vertex_count > u16::MAX as u32 {
        return Err(CoreError::MalformedInput(format!(
            "sphere subdivision {rings}x{sectors} produces {vertex_count} vertices, \
             exceeding the u16 index range"
        )));
    }
    let mut vertices = Vec::with_capacity(vertex_count as usize * 8);
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = std::f32::consts::PI * v; // 0 at north pole
        let (sin_phi, cos_phi) = phi.sin_cos();
        for sector in 0..=sectors {
            let u = sector as f32 / sectors as f32;
            let theta = 2.0 * std::f32::consts::PI * u;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let normal = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            let pos = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
            push_vertex(&mut vertices, pos, [u, v], normal);
        }
    }

    let stride = sectors + 1;
    for ring in 0..rings {
        for sector in 0..sectors {
            let a = (ring * stride + sector) as u16;
            let b = a + stride as u16;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Ok(MeshData {
        format: FORMAT,
        vertex_count,
        vertex_data: vertices,
        index_data: Some(indices),
    })
}
