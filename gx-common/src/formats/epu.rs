//! EPU instruction encoding (v2 format)
//!
//! The Environment Processing Unit consumes 128-byte packed configurations:
//! 8 instructions of 128 bits each, every instruction stored as two u64
//! values `[hi, lo]`. Bit 63 is the MSB of each word. The decoder on every
//! platform must interpret this layout identically; it is the one
//! wire-exact format the console core owns end to end.
//!
//! ```text
//! u64 hi [bits 127..64]:
//!   bits 63..59: opcode     (5)
//!   bits 58..56: region     (3) - SKY=0b100, WALLS=0b010, FLOOR=0b001
//!   bits 55..53: blend      (3)
//!   bits 52..48: meta5      (5) - (domain_id << 3) | variant_id
//!   bits 47..24: color_a    (24) RGB
//!   bits 23..0:  color_b    (24) RGB
//!
//! u64 lo [bits 63..0]:
//!   bits 63..56: intensity  (8)
//!   bits 55..48: param_a    (8)
//!   bits 47..40: param_b    (8)
//!   bits 39..32: param_c    (8)
//!   bits 31..24: param_d    (8)
//!   bits 23..8:  direction  (16) octahedral-encoded unit vector
//!   bits 7..4:   alpha_a    (4)
//!   bits 3..0:   alpha_b    (4)
//! ```

use glam::{Vec2, Vec3};

// =============================================================================
// Enums
// =============================================================================

/// EPU instruction opcodes (5-bit space, closed and versioned).
///
/// Opcodes 0x1..=0x2 are enclosure sources, 0x3..=0x9 are radiance and
/// detail generators. The remaining encodings are reserved; a decoder must
/// reject them rather than guess.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EpuOpcode {
    /// Disable slot
    #[default]
    Nop = 0x0,
    /// Enclosure gradient (sky/walls/floor)
    Ramp = 0x1,
    /// Planar cut enclosure source
    Split = 0x2,
    /// Sharp SDF shape (disk/ring/rect/line)
    Decal = 0x3,
    /// Repeating lines/panels
    Grid = 0x4,
    /// Point field (stars/dust)
    Scatter = 0x5,
    /// Noise/streak fields
    Flow = 0x6,
    /// Moon/sun/planet bodies
    Celestial = 0x7,
    /// Region-masked directional glow
    LobeRadiance = 0x8,
    /// Region-masked horizon band
    BandRadiance = 0x9,
}

impl EpuOpcode {
    /// Decode a 5-bit opcode field.
    ///
    /// Returns `None` for reserved encodings.
    pub fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0x0 => Self::Nop,
            0x1 => Self::Ramp,
            0x2 => Self::Split,
            0x3 => Self::Decal,
            0x4 => Self::Grid,
            0x5 => Self::Scatter,
            0x6 => Self::Flow,
            0x7 => Self::Celestial,
            0x8 => Self::LobeRadiance,
            0x9 => Self::BandRadiance,
            _ => return None,
        })
    }
}

// =============================================================================
// Region Mask Constants (3-bit bitfield)
// =============================================================================

/// Sky/ceiling region bit
pub const REGION_SKY: u8 = 0b100;
/// Wall/horizon belt region bit
pub const REGION_WALLS: u8 = 0b010;
/// Floor/ground region bit
pub const REGION_FLOOR: u8 = 0b001;
/// All regions combined (sky + walls + floor)
pub const REGION_ALL: u8 = 0b111;
/// No regions (slot paints nothing)
pub const REGION_NONE: u8 = 0b000;

/// EPU blend mode (3-bit, 8 modes)
///
/// Each mode is a pure per-pixel binary operator over (dst, src, alpha).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EpuBlend {
    /// dst += src * a
    #[default]
    Add = 0,
    /// dst *= mix(1, src, a) (absorption)
    Multiply = 1,
    /// dst = max(dst, src * a)
    Max = 2,
    /// dst = mix(dst, src, a)
    Lerp = 3,
    /// dst = 1 - (1-dst) * (1-src*a)
    Screen = 4,
    /// HSV shift of dst by src, scaled by a
    HsvMod = 5,
    /// dst = min(dst, src * a)
    Min = 6,
    /// Photoshop-style overlay, mixed by a
    Overlay = 7,
}

impl EpuBlend {
    /// Decode a 3-bit blend field (total, all 8 encodings are valid).
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => Self::Add,
            1 => Self::Multiply,
            2 => Self::Max,
            3 => Self::Lerp,
            4 => Self::Screen,
            5 => Self::HsvMod,
            6 => Self::Min,
            _ => Self::Overlay,
        }
    }
}

/// Pack `(domain_id, variant_id)` into the 5-bit `meta5` field.
///
/// `meta5 = (domain_id << 3) | variant_id`.
#[inline]
pub const fn pack_meta5(domain_id: u8, variant_id: u8) -> u8 {
    ((domain_id & 0x03) << 3) | (variant_id & 0x07)
}

/// Split `meta5` back into `(domain_id, variant_id)`.
#[inline]
pub const fn unpack_meta5(meta5: u8) -> (u8, u8) {
    ((meta5 >> 3) & 0x03, meta5 & 0x07)
}

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced while decoding packed EPU data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EpuFormatError {
    #[error("reserved opcode 0x{0:02X} in instruction slot")]
    ReservedOpcode(u8),
    #[error("config buffer is {0} bytes, expected {CONFIG_BYTES}")]
    BadConfigLength(usize),
}

// =============================================================================
// Instruction
// =============================================================================

/// A single EPU instruction (unpacked form).
///
/// Use [`encode`](Self::encode) / [`decode`](Self::decode) to convert to
/// and from the 128-bit packed format. The zeroed instruction is the
/// canonical NOP: a slot whose packed form is `[0, 0]` contributes nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpuInstruction {
    /// Which generator to run (5-bit opcode)
    pub opcode: EpuOpcode,
    /// Region mask (3-bit bitfield: SKY=4, WALLS=2, FLOOR=1)
    pub region_mask: u8,
    /// How to combine generator output (3-bit, 8 modes)
    pub blend: EpuBlend,
    /// `(domain_id << 3) | variant_id`, selects the generator sub-algorithm
    pub meta5: u8,
    /// Primary RGB color
    pub color_a: [u8; 3],
    /// Secondary RGB color
    pub color_b: [u8; 3],
    /// Primary alpha (0-15)
    pub alpha_a: u8,
    /// Secondary alpha (0-15)
    pub alpha_b: u8,
    /// Generator-specific brightness/strength
    pub intensity: u8,
    /// Generator-specific parameter A
    pub param_a: u8,
    /// Generator-specific parameter B
    pub param_b: u8,
    /// Generator-specific parameter C
    pub param_c: u8,
    /// Generator-specific parameter D
    pub param_d: u8,
    /// Octahedral-encoded direction (low byte = u, high byte = v)
    pub direction: u16,
}

impl EpuInstruction {
    /// The canonical disabled slot (packs to `[0, 0]`)
    #[inline]
    pub fn nop() -> Self {
        Self::default()
    }

    /// Encode this instruction to the 128-bit packed format as `[hi, lo]`.
    pub fn encode(self) -> [u64; 2] {
        let color_a = ((self.color_a[0] as u64) << 16)
            | ((self.color_a[1] as u64) << 8)
            | (self.color_a[2] as u64);
        let color_b = ((self.color_b[0] as u64) << 16)
            | ((self.color_b[1] as u64) << 8)
            | (self.color_b[2] as u64);

        let hi = ((self.opcode as u64 & 0x1F) << 59)
            | ((self.region_mask as u64 & 0x7) << 56)
            | ((self.blend as u64 & 0x7) << 53)
            | ((self.meta5 as u64 & 0x1F) << 48)
            | (color_a << 24)
            | color_b;

        let lo = ((self.intensity as u64) << 56)
            | ((self.param_a as u64) << 48)
            | ((self.param_b as u64) << 40)
            | ((self.param_c as u64) << 32)
            | ((self.param_d as u64) << 24)
            | ((self.direction as u64) << 8)
            | ((self.alpha_a as u64 & 0xF) << 4)
            | (self.alpha_b as u64 & 0xF);

        [hi, lo]
    }

    /// Decode a packed `[hi, lo]` pair.
    ///
    /// Fails on reserved opcode encodings; every other bit pattern is a
    /// valid instruction.
    pub fn decode(words: [u64; 2]) -> Result<Self, EpuFormatError> {
        let [hi, lo] = words;

        let opcode_bits = ((hi >> 59) & 0x1F) as u8;
        let opcode =
            EpuOpcode::from_bits(opcode_bits).ok_or(EpuFormatError::ReservedOpcode(opcode_bits))?;

        let color_a_packed = (hi >> 24) & 0xFF_FFFF;
        let color_b_packed = hi & 0xFF_FFFF;

        Ok(Self {
            opcode,
            region_mask: ((hi >> 56) & 0x7) as u8,
            blend: EpuBlend::from_bits(((hi >> 53) & 0x7) as u8),
            meta5: ((hi >> 48) & 0x1F) as u8,
            color_a: [
                (color_a_packed >> 16) as u8,
                (color_a_packed >> 8) as u8,
                color_a_packed as u8,
            ],
            color_b: [
                (color_b_packed >> 16) as u8,
                (color_b_packed >> 8) as u8,
                color_b_packed as u8,
            ],
            intensity: (lo >> 56) as u8,
            param_a: (lo >> 48) as u8,
            param_b: (lo >> 40) as u8,
            param_c: (lo >> 32) as u8,
            param_d: (lo >> 24) as u8,
            direction: (lo >> 8) as u16,
            alpha_a: ((lo >> 4) & 0xF) as u8,
            alpha_b: (lo & 0xF) as u8,
        })
    }

    /// Set the region mask, builder style.
    #[inline]
    pub fn with_region(mut self, region_mask: u8) -> Self {
        self.region_mask = region_mask & REGION_ALL;
        self
    }

    /// Set both colors, builder style.
    #[inline]
    pub fn with_colors(mut self, color_a: [u8; 3], color_b: [u8; 3]) -> Self {
        self.color_a = color_a;
        self.color_b = color_b;
        self
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Number of instruction slots in one environment configuration
pub const CONFIG_SLOTS: usize = 8;
/// Packed configuration size in u64 words
pub const CONFIG_WORDS: usize = CONFIG_SLOTS * 2;
/// Packed configuration size in bytes
pub const CONFIG_BYTES: usize = CONFIG_WORDS * 8;

/// First radiance slot; slots below this are enclosure slots
pub const RADIANCE_SLOT_BASE: usize = 4;

/// Packed EPU configuration (128 bytes = 8 x 128-bit instructions).
///
/// Slots 0-3 are enclosure slots, slots 4-7 are radiance slots. The
/// compositor applies slots in index order, so the partition is a
/// convention the encoder honors rather than a decoder branch.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EpuConfig {
    /// 8 packed 128-bit instructions (each as [hi, lo])
    pub slots: [[u64; 2]; CONFIG_SLOTS],
}

impl EpuConfig {
    /// Build from the guest-visible flat word layout.
    ///
    /// Instruction `i` occupies words `2i` (hi) and `2i + 1` (lo).
    pub fn from_words(words: [u64; CONFIG_WORDS]) -> Self {
        let mut slots = [[0u64; 2]; CONFIG_SLOTS];
        for (i, slot) in slots.iter_mut().enumerate() {
            slot[0] = words[i * 2];
            slot[1] = words[i * 2 + 1];
        }
        Self { slots }
    }

    /// Build from the 128-byte wire buffer (little-endian words).
    pub fn from_bytes(bytes: &[u8; CONFIG_BYTES]) -> Self {
        let mut words = [0u64; CONFIG_WORDS];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            words[i] = u64::from_le_bytes(chunk.try_into().unwrap());
        }
        Self::from_words(words)
    }

    /// Serialize to the 128-byte wire buffer (little-endian words).
    pub fn to_bytes(&self) -> [u8; CONFIG_BYTES] {
        let mut out = [0u8; CONFIG_BYTES];
        for (i, slot) in self.slots.iter().enumerate() {
            out[i * 16..i * 16 + 8].copy_from_slice(&slot[0].to_le_bytes());
            out[i * 16 + 8..i * 16 + 16].copy_from_slice(&slot[1].to_le_bytes());
        }
        out
    }

    /// Replace one instruction slot.
    pub fn set_slot(&mut self, index: usize, instruction: EpuInstruction) {
        self.slots[index] = instruction.encode();
    }

    /// Compute a stable hash of the packed config for dirty-state caching.
    pub fn state_hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        self.slots.hash(&mut hasher);
        hasher.finish()
    }
}

impl TryFrom<&[u8]> for EpuConfig {
    type Error = EpuFormatError;

    /// Length-checked conversion for dynamically sized wire buffers.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let fixed: &[u8; CONFIG_BYTES] = bytes
            .try_into()
            .map_err(|_| EpuFormatError::BadConfigLength(bytes.len()))?;
        Ok(Self::from_bytes(fixed))
    }
}

// =============================================================================
// Direction Encoding
// =============================================================================

/// Encode a direction vector to octahedral u16 format.
///
/// Components are unsigned bytes scaled from [0, 255] representing [-1, 1].
/// Decoders and any encoder used by tooling must agree on this exact
/// mapping or directions silently skew.
///
/// Zero-length input encodes as +Y.
pub fn encode_direction(dir: Vec3) -> u16 {
    let n = dir.normalize_or_zero();
    if n == Vec3::ZERO {
        return encode_direction(Vec3::Y);
    }

    let denom = n.x.abs() + n.y.abs() + n.z.abs();
    let mut p = Vec2::new(n.x, n.y) / denom;

    if n.z < 0.0 {
        let sign_x = if p.x >= 0.0 { 1.0 } else { -1.0 };
        let sign_y = if p.y >= 0.0 { 1.0 } else { -1.0 };
        p = Vec2::new((1.0 - p.y.abs()) * sign_x, (1.0 - p.x.abs()) * sign_y);
    }

    let u = ((p.x * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u16;
    let v = ((p.y * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u16;
    (u & 0xFF) | ((v & 0xFF) << 8)
}

/// Decode an octahedral u16 back to a unit direction vector.
///
/// Inverse of [`encode_direction`] up to quantization. Every u16 value is
/// a valid encoding; there is no error case.
pub fn decode_direction(packed: u16) -> Vec3 {
    let u = (packed & 0xFF) as f32 / 255.0 * 2.0 - 1.0;
    let v = ((packed >> 8) & 0xFF) as f32 / 255.0 * 2.0 - 1.0;
    decode_octahedral(u, v)
}

/// Decode octahedral [-1, 1]^2 coordinates to a unit direction.
///
/// This is the continuous-domain half of [`decode_direction`]; the
/// compositor uses it directly to assign a direction to every texel of an
/// octahedral-mapped layer.
pub fn decode_octahedral(oct_x: f32, oct_y: f32) -> Vec3 {
    let mut n_x = oct_x;
    let mut n_y = oct_y;
    let n_z = 1.0 - oct_x.abs() - oct_y.abs();

    if n_z < 0.0 {
        let sign_x = if n_x >= 0.0 { 1.0 } else { -1.0 };
        let sign_y = if n_y >= 0.0 { 1.0 } else { -1.0 };
        let old_x = n_x;
        n_x = (1.0 - n_y.abs()) * sign_x;
        n_y = (1.0 - old_x.abs()) * sign_y;
    }

    Vec3::new(n_x, n_y, n_z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_packs_to_zero() {
        assert_eq!(EpuInstruction::nop().encode(), [0, 0]);
        let decoded = EpuInstruction::decode([0, 0]).unwrap();
        assert_eq!(decoded, EpuInstruction::nop());
    }

    #[test]
    fn opcode_occupies_top_bits_of_hi() {
        let inst = EpuInstruction {
            opcode: EpuOpcode::Flow, // 0x6
            ..EpuInstruction::nop()
        };
        let [hi, _] = inst.encode();
        assert_eq!((hi >> 59) & 0x1F, 0x6);
    }

    #[test]
    fn region_blend_meta_positions() {
        let inst = EpuInstruction {
            opcode: EpuOpcode::Ramp,
            region_mask: REGION_SKY | REGION_FLOOR, // 0b101
            blend: EpuBlend::Screen,                // 4
            meta5: pack_meta5(2, 5),                // 0b10101
            ..EpuInstruction::nop()
        };
        let [hi, _] = inst.encode();
        assert_eq!((hi >> 56) & 0x7, 0b101);
        assert_eq!((hi >> 53) & 0x7, 4);
        assert_eq!((hi >> 48) & 0x1F, 0b10101);
    }

    #[test]
    fn colors_pack_as_rgb24() {
        let inst = EpuInstruction {
            opcode: EpuOpcode::Ramp,
            color_a: [0x12, 0x34, 0x56],
            color_b: [0xAB, 0xCD, 0xEF],
            ..EpuInstruction::nop()
        };
        let [hi, _] = inst.encode();
        assert_eq!((hi >> 24) & 0xFF_FFFF, 0x123456);
        assert_eq!(hi & 0xFF_FFFF, 0xABCDEF);
    }

    #[test]
    fn low_word_field_positions() {
        let inst = EpuInstruction {
            opcode: EpuOpcode::Decal,
            intensity: 0x11,
            param_a: 0x22,
            param_b: 0x33,
            param_c: 0x44,
            param_d: 0x55,
            direction: 0x8080,
            alpha_a: 0xA,
            alpha_b: 0x5,
            ..EpuInstruction::nop()
        };
        let [_, lo] = inst.encode();
        assert_eq!(lo >> 56, 0x11);
        assert_eq!((lo >> 48) & 0xFF, 0x22);
        assert_eq!((lo >> 40) & 0xFF, 0x33);
        assert_eq!((lo >> 32) & 0xFF, 0x44);
        assert_eq!((lo >> 24) & 0xFF, 0x55);
        assert_eq!((lo >> 8) & 0xFFFF, 0x8080);
        assert_eq!((lo >> 4) & 0xF, 0xA);
        assert_eq!(lo & 0xF, 0x5);
    }

    #[test]
    fn encode_decode_round_trip_is_exact() {
        let inst = EpuInstruction {
            opcode: EpuOpcode::Celestial,
            region_mask: REGION_ALL,
            blend: EpuBlend::Lerp,
            meta5: pack_meta5(1, 3),
            color_a: [200, 150, 100],
            color_b: [10, 20, 30],
            alpha_a: 15,
            alpha_b: 7,
            intensity: 180,
            param_a: 1,
            param_b: 2,
            param_c: 3,
            param_d: 4,
            direction: encode_direction(Vec3::new(0.3, 0.8, -0.2)),
        };
        let decoded = EpuInstruction::decode(inst.encode()).unwrap();
        assert_eq!(decoded, inst);
    }

    #[test]
    fn reserved_opcode_is_rejected() {
        let words = [(0x1Fu64) << 59, 0];
        assert_eq!(
            EpuInstruction::decode(words),
            Err(EpuFormatError::ReservedOpcode(0x1F))
        );
    }

    #[test]
    fn config_byte_round_trip() {
        let mut config = EpuConfig::default();
        config.set_slot(
            0,
            EpuInstruction {
                opcode: EpuOpcode::Ramp,
                region_mask: REGION_ALL,
                color_a: [100, 200, 220],
                color_b: [64, 64, 64],
                alpha_a: 15,
                alpha_b: 15,
                intensity: 255,
                ..EpuInstruction::nop()
            },
        );
        config.set_slot(
            5,
            EpuInstruction {
                opcode: EpuOpcode::Scatter,
                region_mask: REGION_SKY,
                intensity: 128,
                ..EpuInstruction::nop()
            },
        );

        let bytes = config.to_bytes();
        assert_eq!(bytes.len(), CONFIG_BYTES);
        let restored = EpuConfig::from_bytes(&bytes);
        assert_eq!(restored, config);
        assert_eq!(restored.state_hash(), config.state_hash());

        // Dynamic-slice path agrees with the fixed-size path
        assert_eq!(EpuConfig::try_from(&bytes[..]).unwrap(), restored);
    }

    #[test]
    fn config_rejects_short_buffer() {
        assert_eq!(
            EpuConfig::try_from(&[0u8; 64][..]),
            Err(EpuFormatError::BadConfigLength(64))
        );
    }

    #[test]
    fn octahedral_round_trip_within_tolerance() {
        // Sweep a latitude/longitude grid of unit vectors; 8-bit octahedral
        // quantization should stay within ~1.5 degrees of the input.
        let mut worst = 1.0f32;
        for lat_step in 0..=16 {
            for lon_step in 0..32 {
                let lat = -std::f32::consts::FRAC_PI_2
                    + std::f32::consts::PI * lat_step as f32 / 16.0;
                let lon = 2.0 * std::f32::consts::PI * lon_step as f32 / 32.0;
                let dir = Vec3::new(
                    lat.cos() * lon.cos(),
                    lat.sin(),
                    lat.cos() * lon.sin(),
                );
                let decoded = decode_direction(encode_direction(dir));
                worst = worst.min(dir.dot(decoded));
            }
        }
        assert!(worst > 0.999, "worst-case cosine was {worst}");
    }

    #[test]
    fn zero_direction_encodes_as_up() {
        let decoded = decode_direction(encode_direction(Vec3::ZERO));
        assert!(decoded.y > 0.99);
    }

    #[test]
    fn meta5_pack_unpack() {
        for domain in 0..4u8 {
            for variant in 0..8u8 {
                assert_eq!(unpack_meta5(pack_meta5(domain, variant)), (domain, variant));
            }
        }
    }
}
