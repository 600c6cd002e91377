//! Duskcore GX binary formats
//!
//! Wire-exact formats the console core must reproduce bit-for-bit on every
//! platform:
//!
//! - [`container`] - versioned asset container conventions (extensions,
//!   format version). The core never parses container payloads; it only
//!   routes opaque byte spans by kind.
//! - [`epu`] - the 128-bit EPU instruction encoding and the octahedral
//!   direction codec.

pub mod container;
pub mod epu;

pub use container::{
    ContainerKind, GX_ANIMATION_EXT, GX_FONT_EXT, GX_FORMAT_VERSION, GX_MESH_EXT, GX_SKELETON_EXT,
    GX_SOUND_EXT, GX_TEXTURE_EXT,
};
pub use epu::{
    CONFIG_BYTES, CONFIG_SLOTS, CONFIG_WORDS, EpuBlend, EpuConfig, EpuFormatError, EpuInstruction,
    EpuOpcode, RADIANCE_SLOT_BASE, REGION_ALL, REGION_FLOOR, REGION_NONE, REGION_SKY,
    REGION_WALLS, decode_direction, decode_octahedral, encode_direction, pack_meta5, unpack_meta5,
};
