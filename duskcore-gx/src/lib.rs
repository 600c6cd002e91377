//! Duskcore GX - fantasy console session core
//!
//! This crate is the GX console's half of the guest/host boundary: the
//! resource handle registry, the transform stack, the render pass state
//! machine with draw-command recording, and the EPU environment
//! decoder/compositor. It builds on `duskcore-core` for the
//! console-agnostic session state (clock, input, saves).
//!
//! The rendering and audio backends are external: a host drains the
//! [`Frame`](context::Frame) produced by [`GxContext::end_frame`] after
//! each tick and resolves it however it likes. Nothing in this crate
//! touches a GPU, which is what keeps the command stream deterministic
//! and replayable.

pub mod context;
pub mod epu;
pub mod frame;
pub mod music;
pub mod pass;
pub mod procedural;
pub mod registry;
pub mod resources;
pub mod rom;
pub mod transform;
pub mod viewport;

/// GX render resolution (fixed at 540p; the host upscales)
pub const RESOLUTION: (u32, u32) = (960, 540);

pub use context::{Frame, GxContext};
pub use epu::{CompositedLayer, LAYER_RESOLUTION, composite};
pub use frame::{FrameCommand, FrameRecorder, MAX_FRAME_MATRICES};
pub use music::{MusicKind, TRACKER_HANDLE_FLAG, is_tracker_handle, raw_music_handle};
pub use pass::{CompareFunc, PassConfig, PassState, StencilOp};
pub use registry::{MAX_HANDLES_PER_CLASS, Registry, ResourceClass};
pub use rom::{RomEntry, RomPack};
pub use transform::TransformStack;
pub use viewport::Viewport;
