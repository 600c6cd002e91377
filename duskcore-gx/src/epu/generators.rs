//! EPU generator functions
//!
//! One function per opcode, mapping a texel direction to a coverage value
//! in [0, 1]. The compositor turns coverage into a source color/alpha by
//! interpolating between the instruction's secondary (t = 0) and primary
//! (t = 1) color. Everything here is a pure function of the instruction
//! fields and the texel direction - noise comes from integer hashes, not
//! from any global RNG, so identical configs produce identical layers on
//! every client.

use glam::{Vec2, Vec3};

use gx_common::{EpuInstruction, EpuOpcode, decode_direction, unpack_meta5};

use super::blend::mix;

/// Evaluate an instruction's generator at one texel.
///
/// `dir` is the texel's unit direction, `oct_uv` its octahedral map
/// coordinate in [0, 1]^2 (the domain planar generators pattern over).
pub fn coverage(inst: &EpuInstruction, dir: Vec3, oct_uv: Vec2) -> f32 {
    let axis = decode_direction(inst.direction);
    let (_domain, variant) = unpack_meta5(inst.meta5);

    match inst.opcode {
        EpuOpcode::Nop => 0.0,
        EpuOpcode::Ramp => ramp(inst, dir, axis),
        EpuOpcode::Split => split(inst, dir, axis),
        EpuOpcode::Decal => decal(inst, variant, dir, axis),
        EpuOpcode::Grid => grid(inst, variant, dir, axis),
        EpuOpcode::Scatter => scatter(inst, oct_uv),
        EpuOpcode::Flow => flow(inst, variant, oct_uv),
        EpuOpcode::Celestial => celestial(inst, dir, axis),
        EpuOpcode::LobeRadiance => lobe(inst, dir, axis),
        EpuOpcode::BandRadiance => band(inst, dir, axis),
    }
}

/// Vertical gradient between the floor threshold (t=0, secondary color)
/// and the ceiling threshold (t=1, primary color).
///
/// param_a: transition softness. param_c: packed thresholds,
/// `(ceil_q << 4) | floor_q`, each nibble mapping 0..15 to [-1, 1].
fn ramp(inst: &EpuInstruction, dir: Vec3, up: Vec3) -> f32 {
    let ceil_t = (inst.param_c >> 4) as f32 / 15.0 * 2.0 - 1.0;
    let floor_t = (inst.param_c & 0x0F) as f32 / 15.0 * 2.0 - 1.0;
    let softness = inst.param_a as f32 / 255.0 * 0.5 + 0.01;
    let h = dir.dot(up);
    smoothstep(floor_t - softness, ceil_t + softness, h)
}

/// Planar cut along the instruction axis.
///
/// param_a: blend width across the cut.
fn split(inst: &EpuInstruction, dir: Vec3, axis: Vec3) -> f32 {
    let width = inst.param_a as f32 / 255.0 * 0.5 + 0.005;
    smoothstep(-width, width, dir.dot(axis))
}

/// Sharp SDF shapes around the instruction axis.
///
/// variant 0 = disk, 1 = ring, 2 = rect, 3 = line.
/// param_a: radius / extent. param_b: edge softness / second extent.
/// param_c: ring half-width.
fn decal(inst: &EpuInstruction, variant: u8, dir: Vec3, axis: Vec3) -> f32 {
    let cos_angle = dir.dot(axis).clamp(-1.0, 1.0);
    let angle = cos_angle.acos();
    let radius = inst.param_a as f32 / 255.0 * std::f32::consts::FRAC_PI_2;

    match variant {
        // Disk: soft-edged spherical cap
        0 => {
            let edge = inst.param_b as f32 / 255.0 * radius + 1e-3;
            smoothstep(radius, radius - edge, angle)
        }
        // Ring: annulus centered on `radius`
        1 => {
            let half_width = inst.param_c as f32 / 255.0 * radius * 0.5 + 1e-3;
            smoothstep(half_width, half_width * 0.5, (angle - radius).abs())
        }
        // Rect: gnomonic-projected box in the axis frame
        2 => {
            if cos_angle <= 0.0 {
                return 0.0;
            }
            let (tangent, bitangent) = basis(axis);
            let pu = dir.dot(tangent) / cos_angle;
            let pv = dir.dot(bitangent) / cos_angle;
            let half_w = inst.param_a as f32 / 255.0 + 1e-3;
            let half_h = inst.param_b as f32 / 255.0 + 1e-3;
            let edge_u = smoothstep(half_w, half_w * 0.9, pu.abs());
            let edge_v = smoothstep(half_h, half_h * 0.9, pv.abs());
            edge_u * edge_v
        }
        // Line: great circle perpendicular to the axis
        _ => {
            let width = inst.param_a as f32 / 255.0 * 0.5 + 0.002;
            smoothstep(width, width * 0.5, cos_angle.abs())
        }
    }
}

/// Repeating stripes/grid/checkerboard in the axis frame.
///
/// variant 0 = stripes, 1 = crosshatch, 2 = checker.
/// param_a: azimuth count. param_b: band width. param_c: elevation count.
fn grid(inst: &EpuInstruction, variant: u8, dir: Vec3, axis: Vec3) -> f32 {
    let (tangent, bitangent) = basis(axis);
    let azimuth = dir.dot(bitangent).atan2(dir.dot(tangent));
    let azimuth01 = azimuth / std::f32::consts::TAU + 0.5;
    let elevation01 = dir.dot(axis) * 0.5 + 0.5;

    let count_az = inst.param_a.max(1) as f32;
    let count_el = inst.param_c.max(1) as f32;
    let width = (inst.param_b as f32 / 255.0).clamp(0.02, 0.98);

    let stripe = |coord: f32, count: f32| -> f32 {
        let centered = (coord * count).fract() - 0.5;
        let distance = centered.abs() * 2.0;
        smoothstep(width, width * 0.8, distance)
    };

    match variant {
        0 => stripe(azimuth01, count_az),
        1 => stripe(azimuth01, count_az).max(stripe(elevation01, count_el)),
        _ => {
            let cx = (azimuth01 * count_az).floor() as i32;
            let cy = (elevation01 * count_el).floor() as i32;
            if (cx + cy).rem_euclid(2) == 0 { 1.0 } else { 0.0 }
        }
    }
}

/// Hash-seeded point field (stars/dust) over the octahedral map.
///
/// param_a: cell density. param_b: point radius. param_c: fill
/// probability per cell. param_d: hash seed.
fn scatter(inst: &EpuInstruction, oct_uv: Vec2) -> f32 {
    let cells = inst.param_a.max(1) as f32;
    let scaled = oct_uv * cells;
    let cell = scaled.floor();
    let (cx, cy) = (cell.x as i32, cell.y as i32);
    let seed = inst.param_d as u32;

    let density = inst.param_c as f32 / 255.0;
    if hash01(cx, cy, seed) >= density {
        return 0.0;
    }

    // Jittered point position inside the cell
    let jitter = Vec2::new(
        hash01(cx, cy, seed ^ 0x9E37),
        hash01(cx, cy, seed ^ 0x79B9),
    );
    let point = cell + Vec2::splat(0.15) + jitter * 0.7;
    let radius = inst.param_b as f32 / 255.0 * 0.4 + 0.02;
    let distance = (scaled - point).length();
    smoothstep(radius, radius * 0.4, distance)
}

/// Value-noise fields.
///
/// variant 0 = noise, 1 = streaks, 2 = ridged (caustic-like).
/// param_a: frequency. param_b: streak stretch. param_d: hash seed.
fn flow(inst: &EpuInstruction, variant: u8, oct_uv: Vec2) -> f32 {
    let frequency = 1.0 + inst.param_a as f32 / 16.0;
    let seed = inst.param_d as u32;

    let sample_at = |p: Vec2| -> f32 {
        let coarse = value_noise(p, seed);
        let fine = value_noise(p * 2.0 + Vec2::splat(17.31), seed ^ 0x51F3);
        coarse * 0.65 + fine * 0.35
    };

    match variant {
        // Directional streaks: compress one axis
        1 => {
            let stretch = 1.0 + inst.param_b as f32 / 32.0;
            sample_at(Vec2::new(oct_uv.x * frequency * stretch, oct_uv.y * frequency / stretch))
        }
        // Ridged: bright creases where the noise crosses its midline
        2 => 1.0 - (2.0 * sample_at(oct_uv * frequency) - 1.0).abs(),
        _ => sample_at(oct_uv * frequency),
    }
}

/// Sun/moon body: a hard-edged core with an exponential halo.
///
/// param_a: core radius. param_b: core edge softness. param_c: halo
/// extent.
fn celestial(inst: &EpuInstruction, dir: Vec3, axis: Vec3) -> f32 {
    let angle = dir.dot(axis).clamp(-1.0, 1.0).acos();
    let core = inst.param_a as f32 / 255.0 * 0.5 + 1e-3;
    let edge = inst.param_b as f32 / 255.0 * core + 1e-3;
    let halo_extent = inst.param_c as f32 / 255.0 + 1e-3;

    let core_coverage = smoothstep(core, core - edge, angle);
    let halo = (-(angle - core).max(0.0) / halo_extent).exp();
    core_coverage.max(halo * 0.5)
}

/// Directional glow lobe.
///
/// param_a: focus (higher = tighter lobe).
fn lobe(inst: &EpuInstruction, dir: Vec3, axis: Vec3) -> f32 {
    let exponent = 1.0 + inst.param_a as f32 / 16.0;
    dir.dot(axis).max(0.0).powf(exponent)
}

/// Horizon band: gaussian falloff around a latitude.
///
/// param_a: band width. param_b: band center latitude.
fn band(inst: &EpuInstruction, dir: Vec3, axis: Vec3) -> f32 {
    let center = inst.param_b as f32 / 255.0 * 2.0 - 1.0;
    let width = inst.param_a as f32 / 255.0 + 0.02;
    let offset = (dir.dot(axis) - center) / width;
    (-offset * offset).exp()
}

// =============================================================================
// Shared math
// =============================================================================

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < 1e-9 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Orthonormal frame around an axis
fn basis(axis: Vec3) -> (Vec3, Vec3) {
    let helper = if axis.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
    let tangent = helper.cross(axis).normalize_or_zero();
    let tangent = if tangent == Vec3::ZERO { Vec3::X } else { tangent };
    (tangent, axis.cross(tangent))
}

/// Integer coordinate hash (xxhash-style avalanche), stable across
/// platforms
fn hash2(x: i32, y: i32, seed: u32) -> u32 {
    let mut h = (x as u32)
        .wrapping_mul(0x85EB_CA6B)
        .wrapping_add((y as u32).wrapping_mul(0xC2B2_AE35))
        .wrapping_add(seed.wrapping_mul(0x27D4_EB2F));
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^= h >> 15;
    h
}

fn hash01(x: i32, y: i32, seed: u32) -> f32 {
    hash2(x, y, seed) as f32 / u32::MAX as f32
}

/// Bilinear value noise over an integer lattice
fn value_noise(p: Vec2, seed: u32) -> f32 {
    let cell = p.floor();
    let frac = p - cell;
    let (x, y) = (cell.x as i32, cell.y as i32);

    let n00 = hash01(x, y, seed);
    let n10 = hash01(x + 1, y, seed);
    let n01 = hash01(x, y + 1, seed);
    let n11 = hash01(x + 1, y + 1, seed);

    let sx = frac.x * frac.x * (3.0 - 2.0 * frac.x);
    let sy = frac.y * frac.y * (3.0 - 2.0 * frac.y);
    mix(mix(n00, n10, sx), mix(n01, n11, sx), sy)
}
