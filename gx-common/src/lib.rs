//! Shared types and utilities for the Duskcore GX console
//!
//! This crate provides GX-specific vocabulary shared between:
//! - `duskcore-core` (session state)
//! - `duskcore-gx` (console core)
//! - host-side tooling (asset exporters, inspectors)
//!
//! # Modules
//!
//! - [`buttons`] - The fixed 14-button controller enumeration
//! - [`input`] - Raw per-player input state (POD, wire-exact)
//! - [`console`] - Console hardware specification table
//! - [`packing`] - Vertex format flags and stride arithmetic
//! - [`formats`] - GX binary formats: asset containers and the EPU
//!   instruction encoding

pub mod buttons;
pub mod console;
pub mod formats;
pub mod input;
pub mod packing;

pub use buttons::{BUTTON_COUNT, Button};
pub use console::{ConsoleSpecs, GX_TICK_RATES, duskware_gx_specs};
pub use input::{InputState, stick_axis_f32, trigger_axis_f32};
pub use packing::{
    FORMAT_COLOR, FORMAT_MASK, FORMAT_NORMAL, FORMAT_SKINNED, FORMAT_UV, vertex_stride,
};

// Re-export commonly used format items
pub use formats::{
    CONFIG_BYTES,
    CONFIG_SLOTS,
    CONFIG_WORDS,
    ContainerKind,
    EpuBlend,
    EpuConfig,
    EpuFormatError,
    EpuInstruction,
    EpuOpcode,
    GX_FORMAT_VERSION,
    REGION_ALL,
    REGION_FLOOR,
    REGION_NONE,
    REGION_SKY,
    REGION_WALLS,
    decode_direction,
    decode_octahedral,
    encode_direction,
    pack_meta5,
    unpack_meta5,
};
