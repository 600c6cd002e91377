//! EPU (Environment Processing Unit) decoder/compositor
//!
//! Interprets 128-byte packed environment configurations and produces a
//! composited background layer. This is the reference CPU compositor: a
//! GPU backend may reimplement it, but must match it texel-for-texel,
//! because `composite` is specified as a pure function of the 1024-bit
//! configuration alone.
//!
//! The layer is an octahedral-mapped RGB grid: texel (x, y) covers the
//! unit direction obtained by decoding its center through the same
//! octahedral mapping the instruction `direction` field uses. Regions
//! (sky/walls/floor) are classified per texel from the world-up
//! component of that direction.

pub mod blend;
pub mod generators;

use glam::{Vec2, Vec3};
use tracing::warn;

use gx_common::{
    CONFIG_SLOTS, EpuConfig, EpuInstruction, EpuOpcode, REGION_FLOOR, REGION_SKY, REGION_WALLS,
    decode_octahedral,
};

/// Default composited layer resolution (texels per octahedral axis)
pub const LAYER_RESOLUTION: usize = 32;

/// Directions with `y` above this are sky; below the negation, floor;
/// walls in between.
const SKY_MIN_Y: f32 = 0.25;

/// Classify a direction into its region bit.
pub fn region_of(dir: Vec3) -> u8 {
    if dir.y > SKY_MIN_Y {
        REGION_SKY
    } else if dir.y < -SKY_MIN_Y {
        REGION_FLOOR
    } else {
        REGION_WALLS
    }
}

/// A composited environment layer over the octahedral direction domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositedLayer {
    size: usize,
    texels: Vec<[f32; 3]>,
}

impl CompositedLayer {
    fn zeroed(size: usize) -> Self {
        Self {
            size,
            texels: vec![[0.0; 3]; size * size],
        }
    }

    /// Texels per axis
    pub fn resolution(&self) -> usize {
        self.size
    }

    /// RGB value of texel (x, y)
    pub fn texel(&self, x: usize, y: usize) -> [f32; 3] {
        self.texels[y * self.size + x]
    }

    /// Octahedral map coordinate of the texel center, in [0, 1]^2
    pub fn texel_uv(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.size as f32,
            (y as f32 + 0.5) / self.size as f32,
        )
    }

    /// Unit direction covered by texel (x, y)
    pub fn texel_direction(&self, x: usize, y: usize) -> Vec3 {
        let uv = self.texel_uv(x, y);
        decode_octahedral(uv.x * 2.0 - 1.0, uv.y * 2.0 - 1.0)
    }

    /// True if every texel is exactly zero (the all-NOP result)
    pub fn is_zero(&self) -> bool {
        self.texels.iter().all(|t| *t == [0.0; 3])
    }

    /// Raw texel bytes (row-major RGB f32), for host-side upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

/// Composite a configuration at the default resolution.
pub fn composite(config: &EpuConfig) -> CompositedLayer {
    composite_sized(config, LAYER_RESOLUTION)
}

/// Composite a configuration into a `size` x `size` layer.
///
/// Slots apply in fixed index order 0-7 (enclosure slots 0-3 before
/// radiance slots 4-7). NOP slots contribute nothing; slots with a
/// reserved opcode are ignored with a warning, so a newer cartridge
/// degrades instead of crashing an older host.
pub fn composite_sized(config: &EpuConfig, size: usize) -> CompositedLayer {
    let mut layer = CompositedLayer::zeroed(size);

    let mut instructions: Vec<EpuInstruction> = Vec::with_capacity(CONFIG_SLOTS);
    for (slot, &words) in config.slots.iter().enumerate() {
        match EpuInstruction::decode(words) {
            Ok(inst) => {
                if inst.opcode != EpuOpcode::Nop {
                    instructions.push(inst);
                }
            }
            Err(e) => warn!("epu: slot {} ignored: {}", slot, e),
        }
    }

    for inst in &instructions {
        let color_a = rgb_f32(inst.color_a);
        let color_b = rgb_f32(inst.color_b);
        let alpha_a = inst.alpha_a as f32 / 15.0;
        let alpha_b = inst.alpha_b as f32 / 15.0;
        let intensity = inst.intensity as f32 / 255.0;

        for y in 0..size {
            for x in 0..size {
                let dir = layer.texel_direction(x, y);
                if inst.region_mask & region_of(dir) == 0 {
                    continue;
                }

                let uv = layer.texel_uv(x, y);
                let t = generators::coverage(inst, dir, uv);
                let src = [
                    blend::mix(color_b[0], color_a[0], t) * intensity,
                    blend::mix(color_b[1], color_a[1], t) * intensity,
                    blend::mix(color_b[2], color_a[2], t) * intensity,
                ];
                let alpha = blend::mix(alpha_b, alpha_a, t);

                let index = y * size + x;
                layer.texels[index] = blend::apply(inst.blend, layer.texels[index], src, alpha);
            }
        }
    }

    layer
}

fn rgb_f32(rgb: [u8; 3]) -> [f32; 3] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gx_common::{EpuBlend, REGION_ALL, encode_direction};

    fn ramp_slot(color_a: [u8; 3], color_b: [u8; 3]) -> EpuInstruction {
        EpuInstruction {
            opcode: EpuOpcode::Ramp,
            region_mask: REGION_ALL,
            blend: EpuBlend::Add,
            color_a,
            color_b,
            alpha_a: 15,
            alpha_b: 15,
            intensity: 255,
            param_a: 128,
            param_c: 0xA5,
            direction: encode_direction(Vec3::Y),
            ..EpuInstruction::nop()
        }
    }

    fn find_texel(layer: &CompositedLayer, predicate: impl Fn(Vec3) -> bool) -> (usize, usize) {
        for y in 0..layer.resolution() {
            for x in 0..layer.resolution() {
                if predicate(layer.texel_direction(x, y)) {
                    return (x, y);
                }
            }
        }
        panic!("no texel matched the direction predicate");
    }

    #[test]
    fn all_nop_config_is_transparent() {
        let layer = composite(&EpuConfig::default());
        assert!(layer.is_zero());
    }

    #[test]
    fn composite_is_a_pure_function() {
        let mut config = EpuConfig::default();
        config.set_slot(0, ramp_slot([100, 200, 220], [40, 40, 48]));
        config.set_slot(
            4,
            EpuInstruction {
                opcode: EpuOpcode::Scatter,
                region_mask: REGION_SKY,
                blend: EpuBlend::Add,
                color_a: [255, 255, 255],
                alpha_a: 15,
                intensity: 200,
                param_a: 12,
                param_b: 200,
                param_c: 90,
                param_d: 3,
                ..EpuInstruction::nop()
            },
        );
        assert_eq!(composite(&config), composite(&config));
    }

    #[test]
    fn differing_config_differs() {
        let mut a = EpuConfig::default();
        a.set_slot(0, ramp_slot([100, 200, 220], [40, 40, 48]));
        let mut b = EpuConfig::default();
        b.set_slot(0, ramp_slot([200, 100, 20], [40, 40, 48]));
        assert_ne!(composite(&a), composite(&b));
    }

    #[test]
    fn region_mask_confines_painting() {
        let mut config = EpuConfig::default();
        config.set_slot(
            0,
            EpuInstruction {
                region_mask: REGION_SKY,
                ..ramp_slot([255, 255, 255], [255, 255, 255])
            },
        );
        let layer = composite(&config);

        let (sx, sy) = find_texel(&layer, |d| d.y > 0.5);
        let (fx, fy) = find_texel(&layer, |d| d.y < -0.5);
        assert_ne!(layer.texel(sx, sy), [0.0; 3]);
        assert_eq!(layer.texel(fx, fy), [0.0; 3]);
    }

    #[test]
    fn reserved_opcode_slots_are_ignored() {
        let mut config = EpuConfig::default();
        config.set_slot(0, ramp_slot([10, 20, 30], [1, 2, 3]));
        // Slot 1 carries a reserved opcode pattern
        config.slots[1] = [(0x1Eu64) << 59, 0];

        let mut clean = EpuConfig::default();
        clean.set_slot(0, ramp_slot([10, 20, 30], [1, 2, 3]));

        assert_eq!(composite(&config), composite(&clean));
    }

    #[test]
    fn slots_apply_in_index_order() {
        // Slot 0 paints everything red; slot 4 LERPs everything to blue
        // at full alpha. Index order means blue wins.
        let mut config = EpuConfig::default();
        config.set_slot(0, ramp_slot([255, 0, 0], [255, 0, 0]));
        config.set_slot(
            4,
            EpuInstruction {
                opcode: EpuOpcode::Split,
                region_mask: REGION_ALL,
                blend: EpuBlend::Lerp,
                color_a: [0, 0, 255],
                color_b: [0, 0, 255],
                alpha_a: 15,
                alpha_b: 15,
                intensity: 255,
                direction: encode_direction(Vec3::Y),
                ..EpuInstruction::nop()
            },
        );
        let layer = composite(&config);
        let (x, y) = find_texel(&layer, |d| d.y > 0.5);
        let texel = layer.texel(x, y);
        assert!(texel[2] > 0.9, "blue channel should win, got {texel:?}");
        assert!(texel[0] < 0.1, "red should be fully replaced, got {texel:?}");
    }

    #[test]
    fn texel_directions_are_unit_length() {
        let layer = composite(&EpuConfig::default());
        for y in 0..layer.resolution() {
            for x in 0..layer.resolution() {
                let len = layer.texel_direction(x, y).length();
                assert!((len - 1.0).abs() < 1e-4);
            }
        }
    }
}
