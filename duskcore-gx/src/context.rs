//! Per-session GX context
//!
//! [`GxContext`] is the console's entire guest-visible surface: resource
//! loading, transform and pass state, draw submission, and the EPU. All
//! mutable state is explicit per-context - current transform top, active
//! pass, bound font/skeleton - so concurrent sessions never share
//! anything through process globals.
//!
//! Error surfacing follows the ABI's two conventions:
//! - runtime-upload loaders (`load_*`) return 0 on failure and log a
//!   warning; the guest branches on the sentinel.
//! - cartridge loaders (`rom_*`) return `Err(CoreError::Trap)` on a
//!   missing asset; the host turns that into a session-ending fault.

use glam::Mat4;
use hashbrown::HashMap;
use tracing::warn;

use duskcore_core::{CoreError, CoreResult, Session, SessionConfig};
use gx_common::{CONFIG_BYTES, CONFIG_WORDS, EpuConfig};

use crate::RESOLUTION;
use crate::frame::{FrameCommand, FrameRecorder};
use crate::music::{MusicKind, TRACKER_HANDLE_FLAG, is_tracker_handle, raw_music_handle};
use crate::pass::{CompareFunc, PassConfig, StencilOp};
use crate::procedural;
use crate::registry::{Registry, ResourceClass};
use crate::resources::{
    FontData, KeyframesData, MeshData, SkeletonData, SoundData, TextureData, TrackerModule,
    validate_indices, validate_mesh, validate_skeleton, validate_texture,
};
use crate::rom::RomPack;
use crate::transform::TransformStack;
use crate::viewport::Viewport;

/// Maximum environment slot ID accepted by the EPU entry points
pub const MAX_ENV_ID: u32 = 255;

/// One frame's resolved output, consumed by the host backend after the
/// tick boundary.
#[derive(Debug)]
pub struct Frame {
    /// Pass configurations, indexed by pass_id
    pub passes: Vec<PassConfig>,
    /// Ordered command stream (pass boundaries are barriers)
    pub commands: Vec<FrameCommand>,
    /// Model matrices referenced by mesh commands
    pub matrices: Vec<Mat4>,
    /// Environment configurations set this frame, keyed by env_id
    pub environments: HashMap<u32, EpuConfig>,
}

/// A GX console session: core session state plus the console's resource,
/// transform, pass, and EPU state.
pub struct GxContext {
    session: Session,
    rom: RomPack,

    textures: Registry<TextureData>,
    meshes: Registry<MeshData>,
    sounds: Registry<SoundData>,
    skeletons: Registry<SkeletonData>,
    fonts: Registry<FontData>,
    keyframes: Registry<KeyframesData>,
    trackers: Registry<TrackerModule>,

    /// Currently bound font handle (0 = built-in font)
    bound_font: u32,
    /// Currently bound skeleton handle (0 = none, raw mode)
    bound_skeleton: u32,

    transform: TransformStack,
    recorder: FrameRecorder,
    /// Environment configs pushed this frame (last `epu_set` per id wins)
    epu_configs: HashMap<u32, EpuConfig>,
}

impl GxContext {
    /// Create a session with an empty cartridge.
    pub fn new(config: &SessionConfig) -> CoreResult<Self> {
        Self::with_rom(config, RomPack::new())
    }

    /// Create a session over a cartridge data pack.
    pub fn with_rom(config: &SessionConfig, rom: RomPack) -> CoreResult<Self> {
        Ok(Self {
            session: Session::new(config)?,
            rom,
            textures: Registry::new(ResourceClass::Texture),
            meshes: Registry::new(ResourceClass::Mesh),
            sounds: Registry::new(ResourceClass::Sound),
            skeletons: Registry::new(ResourceClass::Skeleton),
            fonts: Registry::new(ResourceClass::Font),
            keyframes: Registry::new(ResourceClass::Keyframes),
            trackers: Registry::new(ResourceClass::Tracker),
            bound_font: 0,
            bound_skeleton: 0,
            transform: TransformStack::new(),
            recorder: FrameRecorder::new(),
            epu_configs: HashMap::new(),
        })
    }

    /// Core session state (clock, input, saves, RNG)
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Leave the init phase; resource loading closes here.
    pub fn finish_init(&mut self) -> CoreResult<()> {
        self.session.finish_init()
    }

    fn check_init_only(&self, op: &'static str) -> CoreResult<()> {
        if self.session.phase() != duskcore_core::Phase::Init {
            return Err(CoreError::OutOfPhase { op });
        }
        Ok(())
    }

    /// Run a fallible init-only loader with the sentinel convention:
    /// failures log a warning and surface as handle 0.
    fn sentinel(result: CoreResult<u32>, op: &str) -> u32 {
        match result {
            Ok(handle) => handle,
            Err(e) => {
                warn!("{}: {}", op, e);
                0
            }
        }
    }

    // =========================================================================
    // Runtime resource uploads (init-only, 0 on failure)
    // =========================================================================

    /// Load an RGBA8 texture. Returns the handle, or 0 on failure.
    pub fn load_texture(&mut self, width: u32, height: u32, data: &[u8]) -> u32 {
        Self::sentinel(self.try_load_texture(width, height, data), "load_texture")
    }

    fn try_load_texture(&mut self, width: u32, height: u32, data: &[u8]) -> CoreResult<u32> {
        self.check_init_only("load_texture")?;
        validate_texture(width, height, data)?;
        self.textures.allocate(TextureData {
            width,
            height,
            data: data.to_vec(),
        })
    }

    /// Load a non-indexed mesh. Returns the handle, or 0 on failure.
    pub fn load_mesh(&mut self, data: &[f32], vertex_count: u32, format: u32) -> u32 {
        Self::sentinel(
            self.try_load_mesh(data, vertex_count, format, None),
            "load_mesh",
        )
    }

    /// Load an indexed mesh. Returns the handle, or 0 on failure.
    pub fn load_mesh_indexed(
        &mut self,
        data: &[f32],
        vertex_count: u32,
        indices: &[u16],
        format: u32,
    ) -> u32 {
        Self::sentinel(
            self.try_load_mesh(data, vertex_count, format, Some(indices)),
            "load_mesh_indexed",
        )
    }

    fn try_load_mesh(
        &mut self,
        data: &[f32],
        vertex_count: u32,
        format: u32,
        indices: Option<&[u16]>,
    ) -> CoreResult<u32> {
        self.check_init_only("load_mesh")?;
        validate_mesh(format, vertex_count, data)?;
        if let Some(indices) = indices {
            validate_indices(indices, vertex_count)?;
        }
        self.meshes.allocate(MeshData {
            format,
            vertex_count,
            vertex_data: data.to_vec(),
            index_data: indices.map(<[u16]>::to_vec),
        })
    }

    /// Load raw PCM sound data (22.05 kHz, 16-bit signed, mono).
    /// Returns the handle, or 0 on failure.
    pub fn load_sound(&mut self, samples: &[i16]) -> u32 {
        Self::sentinel(self.try_load_sound(samples), "load_sound")
    }

    fn try_load_sound(&mut self, samples: &[i16]) -> CoreResult<u32> {
        self.check_init_only("load_sound")?;
        if samples.is_empty() {
            return Err(CoreError::MalformedInput("sound data is empty".into()));
        }
        self.sounds.allocate(SoundData {
            samples: samples.to_vec(),
        })
    }

    /// Load PCM sound data from a raw byte span (each sample is 2 bytes,
    /// little-endian, so the length must be even).
    /// Returns the handle, or 0 on failure.
    pub fn load_sound_bytes(&mut self, data: &[u8]) -> u32 {
        if data.len() % 2 != 0 {
            warn!(
                "load_sound_bytes: byte length {} is odd - samples are 2 bytes each",
                data.len()
            );
            return 0;
        }
        let samples: Vec<i16> = data
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        self.load_sound(&samples)
    }

    /// Load a bitmap font over a previously loaded texture.
    /// Returns the handle, or 0 on failure.
    pub fn load_font(&mut self, texture: u32, glyph_width: u32, glyph_height: u32) -> u32 {
        Self::sentinel(
            self.try_load_font(texture, glyph_width, glyph_height),
            "load_font",
        )
    }

    fn try_load_font(
        &mut self,
        texture: u32,
        glyph_width: u32,
        glyph_height: u32,
    ) -> CoreResult<u32> {
        self.check_init_only("load_font")?;
        if glyph_width == 0 || glyph_height == 0 {
            return Err(CoreError::MalformedInput(format!(
                "glyph dimensions {glyph_width}x{glyph_height} must be non-zero"
            )));
        }
        self.textures.require(texture)?;
        self.fonts.allocate(FontData {
            texture,
            glyph_width,
            glyph_height,
        })
    }

    /// Load a skeleton (inverse bind matrices).
    /// Returns the handle, or 0 on failure.
    pub fn load_skeleton(&mut self, bone_count: u32, inverse_bind: &[[f32; 12]]) -> u32 {
        Self::sentinel(
            self.try_load_skeleton(bone_count, inverse_bind),
            "load_skeleton",
        )
    }

    fn try_load_skeleton(
        &mut self,
        bone_count: u32,
        inverse_bind: &[[f32; 12]],
    ) -> CoreResult<u32> {
        self.check_init_only("load_skeleton")?;
        validate_skeleton(bone_count, inverse_bind)?;
        self.skeletons.allocate(SkeletonData {
            bone_count,
            inverse_bind: inverse_bind.to_vec(),
        })
    }

    /// Load a keyframe animation stream.
    /// Returns the handle, or 0 on failure.
    pub fn load_keyframes(&mut self, bone_count: u32, frame_count: u32, data: &[u8]) -> u32 {
        Self::sentinel(
            self.try_load_keyframes(bone_count, frame_count, data),
            "load_keyframes",
        )
    }

    fn try_load_keyframes(
        &mut self,
        bone_count: u32,
        frame_count: u32,
        data: &[u8],
    ) -> CoreResult<u32> {
        self.check_init_only("load_keyframes")?;
        if bone_count == 0 || frame_count == 0 {
            return Err(CoreError::MalformedInput(format!(
                "keyframes {bone_count} bones x {frame_count} frames must be non-zero"
            )));
        }
        self.keyframes.allocate(KeyframesData {
            bone_count,
            frame_count,
            data: data.to_vec(),
        })
    }

    /// Load a tracker module. Returns a flagged music handle (MSB set),
    /// or 0 on failure.
    pub fn load_tracker(&mut self, data: &[u8]) -> u32 {
        match self.try_load_tracker(data) {
            Ok(handle) => handle | TRACKER_HANDLE_FLAG,
            Err(e) => {
                warn!("load_tracker: {}", e);
                0
            }
        }
    }

    fn try_load_tracker(&mut self, data: &[u8]) -> CoreResult<u32> {
        self.check_init_only("load_tracker")?;
        if data.is_empty() {
            return Err(CoreError::MalformedInput("tracker module is empty".into()));
        }
        self.trackers.allocate(TrackerModule {
            data: data.to_vec(),
        })
    }

    // =========================================================================
    // Procedural mesh generation (init-only, 0 on failure)
    // =========================================================================

    /// Generate a cube mesh. Returns the handle, or 0 on failure.
    pub fn gen_mesh_cube(&mut self, size: f32) -> u32 {
        let result = self
            .check_init_only("gen_mesh_cube")
            .and_then(|_| procedural::cube(size))
            .and_then(|mesh| self.meshes.allocate(mesh));
        Self::sentinel(result, "gen_mesh_cube")
    }

    /// Generate a flat plane mesh. Returns the handle, or 0 on failure.
    pub fn gen_mesh_plane(&mut self, width: f32, depth: f32) -> u32 {
        let result = self
            .check_init_only("gen_mesh_plane")
            .and_then(|_| procedural::plane(width, depth))
            .and_then(|mesh| self.meshes.allocate(mesh));
        Self::sentinel(result, "gen_mesh_plane")
    }

    /// Generate a UV sphere mesh. Returns the handle, or 0 on failure.
    pub fn gen_mesh_sphere(&mut self, radius: f32, rings: u32, sectors: u32) -> u32 {
        let result = self
            .check_init_only("gen_mesh_sphere")
            .and_then(|_| procedural::sphere(radius, rings, sectors))
            .and_then(|mesh| self.meshes.allocate(mesh));
        Self::sentinel(result, "gen_mesh_sphere")
    }

    // =========================================================================
    // Cartridge loads (init-only, trap on failure)
    // =========================================================================

    fn rom_missing(op: &str, id: &str) -> CoreError {
        CoreError::Trap(format!("{op}: asset '{id}' not found in data pack"))
    }

    /// Load a texture from the cartridge by ID. Traps if missing.
    pub fn rom_texture(&mut self, id: &str) -> CoreResult<u32> {
        self.check_init_only("rom_texture")?;
        let texture = self
            .rom
            .find_texture(id)
            .cloned()
            .ok_or_else(|| Self::rom_missing("rom_texture", id))?;
        self.textures.allocate(texture)
    }

    /// Load a mesh from the cartridge by ID. Traps if missing.
    pub fn rom_mesh(&mut self, id: &str) -> CoreResult<u32> {
        self.check_init_only("rom_mesh")?;
        let mesh = self
            .rom
            .find_mesh(id)
            .cloned()
            .ok_or_else(|| Self::rom_missing("rom_mesh", id))?;
        self.meshes.allocate(mesh)
    }

    /// Load a sound from the cartridge by ID. Traps if missing.
    pub fn rom_sound(&mut self, id: &str) -> CoreResult<u32> {
        self.check_init_only("rom_sound")?;
        let sound = self
            .rom
            .find_sound(id)
            .cloned()
            .ok_or_else(|| Self::rom_missing("rom_sound", id))?;
        self.sounds.allocate(sound)
    }

    /// Load a skeleton from the cartridge by ID. Traps if missing.
    pub fn rom_skeleton(&mut self, id: &str) -> CoreResult<u32> {
        self.check_init_only("rom_skeleton")?;
        let skeleton = self
            .rom
            .find_skeleton(id)
            .cloned()
            .ok_or_else(|| Self::rom_missing("rom_skeleton", id))?;
        self.skeletons.allocate(skeleton)
    }

    /// Load a font from the cartridge by ID. Traps if missing.
    pub fn rom_font(&mut self, id: &str) -> CoreResult<u32> {
        self.check_init_only("rom_font")?;
        let font = self
            .rom
            .find_font(id)
            .cloned()
            .ok_or_else(|| Self::rom_missing("rom_font", id))?;
        self.fonts.allocate(font)
    }

    /// Load keyframes from the cartridge by ID. Traps if missing.
    pub fn rom_keyframes(&mut self, id: &str) -> CoreResult<u32> {
        self.check_init_only("rom_keyframes")?;
        let keyframes = self
            .rom
            .find_keyframes(id)
            .cloned()
            .ok_or_else(|| Self::rom_missing("rom_keyframes", id))?;
        self.keyframes.allocate(keyframes)
    }

    /// Load a tracker module from the cartridge by ID. Traps if missing.
    /// Returns a flagged music handle (MSB set).
    pub fn rom_tracker(&mut self, id: &str) -> CoreResult<u32> {
        self.check_init_only("rom_tracker")?;
        let module = self
            .rom
            .find_tracker(id)
            .cloned()
            .ok_or_else(|| Self::rom_missing("rom_tracker", id))?;
        Ok(self.trackers.allocate(module)? | TRACKER_HANDLE_FLAG)
    }

    /// Size of a raw cartridge blob, or 0 if absent (query-style).
    pub fn rom_data_len(&self, id: &str) -> u32 {
        self.rom.find_data(id).map_or(0, |d| d.len() as u32)
    }

    /// Raw cartridge blob contents (query-style, no trap).
    pub fn rom_data(&self, id: &str) -> Option<&[u8]> {
        self.rom.find_data(id)
    }

    // =========================================================================
    // Resource resolution (host backend side)
    // =========================================================================

    pub fn texture(&self, handle: u32) -> Option<&TextureData> {
        self.textures.resolve(handle)
    }

    pub fn mesh(&self, handle: u32) -> Option<&MeshData> {
        self.meshes.resolve(handle)
    }

    pub fn sound(&self, handle: u32) -> Option<&SoundData> {
        self.sounds.resolve(handle)
    }

    pub fn skeleton(&self, handle: u32) -> Option<&SkeletonData> {
        self.skeletons.resolve(handle)
    }

    pub fn font(&self, handle: u32) -> Option<&FontData> {
        self.fonts.resolve(handle)
    }

    pub fn keyframes(&self, handle: u32) -> Option<&KeyframesData> {
        self.keyframes.resolve(handle)
    }

    /// What a unified music handle refers to.
    pub fn music_kind(&self, handle: u32) -> MusicKind {
        if handle == 0 {
            MusicKind::None
        } else if is_tracker_handle(handle) {
            match self.trackers.resolve(raw_music_handle(handle)) {
                Some(_) => MusicKind::Tracker,
                None => MusicKind::None,
            }
        } else if self.sounds.resolve(handle).is_some() {
            MusicKind::Pcm
        } else {
            MusicKind::None
        }
    }

    // =========================================================================
    // Binding state
    // =========================================================================

    /// Bind a font for subsequent text draws (0 = built-in font).
    pub fn bind_font(&mut self, handle: u32) {
        if handle != 0 && self.fonts.resolve(handle).is_none() {
            warn!("bind_font: invalid font handle {} - keeping current", handle);
            return;
        }
        self.bound_font = handle;
    }

    pub fn bound_font(&self) -> u32 {
        self.bound_font
    }

    /// Bind a skeleton for subsequent skinned draws (0 = raw mode).
    pub fn bind_skeleton(&mut self, handle: u32) {
        if handle != 0 && self.skeletons.resolve(handle).is_none() {
            warn!(
                "bind_skeleton: invalid skeleton handle {} - keeping current",
                handle
            );
            return;
        }
        self.bound_skeleton = handle;
    }

    pub fn bound_skeleton(&self) -> u32 {
        self.bound_skeleton
    }

    // =========================================================================
    // Frame lifecycle
    // =========================================================================

    /// Start a frame's draw context: transform resets to identity, the
    /// pass machine returns to the implicit pass 0, and the previous
    /// frame's EPU configs are dropped.
    pub fn begin_frame(&mut self) {
        self.transform.reset();
        self.recorder.reset();
        self.epu_configs.clear();
    }

    /// Finish the frame and hand the ordered command stream to the host.
    pub fn end_frame(&mut self) -> Frame {
        let (passes, commands, matrices) = self.recorder.finish();
        Frame {
            passes,
            commands,
            matrices,
            environments: std::mem::take(&mut self.epu_configs),
        }
    }

    // =========================================================================
    // Transform stack
    // =========================================================================

    pub fn push_identity(&mut self) {
        self.transform.push_identity();
    }

    pub fn transform_set(&mut self, matrix: &[f32; 16]) {
        self.transform.transform_set(matrix);
    }

    pub fn push_translate(&mut self, x: f32, y: f32, z: f32) {
        self.transform.push_translate(x, y, z);
    }

    pub fn push_rotate_x(&mut self, angle_deg: f32) {
        self.transform.push_rotate_x(angle_deg);
    }

    pub fn push_rotate_y(&mut self, angle_deg: f32) {
        self.transform.push_rotate_y(angle_deg);
    }

    pub fn push_rotate_z(&mut self, angle_deg: f32) {
        self.transform.push_rotate_z(angle_deg);
    }

    pub fn push_rotate(&mut self, angle_deg: f32, axis_x: f32, axis_y: f32, axis_z: f32) {
        self.transform.push_rotate(angle_deg, axis_x, axis_y, axis_z);
    }

    pub fn push_scale(&mut self, x: f32, y: f32, z: f32) {
        self.transform.push_scale(x, y, z);
    }

    pub fn push_scale_uniform(&mut self, s: f32) {
        self.transform.push_scale_uniform(s);
    }

    /// Current transform top (host/debug use)
    pub fn current_transform(&self) -> Mat4 {
        self.transform.top()
    }

    // =========================================================================
    // Render passes
    // =========================================================================

    /// Begin a standard pass with optional depth clear.
    pub fn begin_pass(&mut self, clear_depth: bool) {
        self.recorder.begin_pass(PassConfig::standard(clear_depth));
    }

    /// Begin a stencil write pass (mask creation).
    pub fn begin_pass_stencil_write(&mut self, ref_value: u32, clear_depth: bool) {
        self.recorder
            .begin_pass(PassConfig::stencil_write(ref_value as u8, clear_depth));
    }

    /// Begin a stencil test pass (render inside the mask).
    pub fn begin_pass_stencil_test(&mut self, ref_value: u32, clear_depth: bool) {
        self.recorder
            .begin_pass(PassConfig::stencil_test(ref_value as u8, clear_depth));
    }

    /// Begin a fully parameterized pass (wire-value arguments; see
    /// [`CompareFunc`] and [`StencilOp`] for the constants).
    #[allow(clippy::too_many_arguments)]
    pub fn begin_pass_full(
        &mut self,
        depth_compare: u32,
        depth_write: bool,
        clear_depth: bool,
        stencil_compare: u32,
        stencil_ref: u32,
        stencil_pass_op: u32,
        stencil_fail_op: u32,
        stencil_depth_fail_op: u32,
    ) {
        let config = PassConfig {
            depth_compare: CompareFunc::from_u32(depth_compare),
            depth_write,
            depth_clear: clear_depth,
            stencil_compare: CompareFunc::from_u32(stencil_compare),
            stencil_ref: stencil_ref as u8,
            stencil_pass: StencilOp::from_u32(stencil_pass_op),
            stencil_fail: StencilOp::from_u32(stencil_fail_op),
            stencil_depth_fail: StencilOp::from_u32(stencil_depth_fail_op),
            color_write: true,
        };
        self.recorder.begin_pass(config);
    }

    /// Set the z-index for 2D ordering within the current pass.
    pub fn set_z_index(&mut self, z: u32) {
        self.recorder.set_z_index(z);
    }

    /// Set the viewport for subsequent draws. Out-of-bounds rectangles
    /// are rejected with a warning; dimensions clamp to the screen.
    pub fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let (res_w, res_h) = RESOLUTION;
        if x >= res_w || y >= res_h {
            warn!(
                "viewport: origin ({}, {}) out of bounds (screen is {}x{})",
                x, y, res_w, res_h
            );
            return;
        }
        if width == 0 || height == 0 {
            warn!("viewport: dimensions must be > 0 (got {}x{})", width, height);
            return;
        }
        self.recorder.set_viewport(Viewport {
            x,
            y,
            width: width.min(res_w - x),
            height: height.min(res_h - y),
        });
    }

    /// Reset the viewport to fullscreen.
    pub fn viewport_clear(&mut self) {
        self.recorder.set_viewport(Viewport::FULLSCREEN);
    }

    // =========================================================================
    // Draw submission
    // =========================================================================

    /// Submit a mesh draw with the current transform/pass/viewport.
    ///
    /// An invalid handle logs a warning and draws nothing; exhausting the
    /// frame matrix pool is a real error.
    pub fn draw_mesh(&mut self, handle: u32) -> CoreResult<()> {
        if self.meshes.resolve(handle).is_none() {
            warn!("draw_mesh: invalid mesh handle {} - skipping", handle);
            return Ok(());
        }
        self.recorder.submit_mesh(handle, self.transform.top())
    }

    // =========================================================================
    // EPU
    // =========================================================================

    /// Set an environment configuration from the guest's 128-byte buffer.
    /// Re-setting the same env_id in one frame replaces the config.
    pub fn epu_set(&mut self, env_id: u32, config: &[u8; CONFIG_BYTES]) {
        if env_id > MAX_ENV_ID {
            warn!(
                "epu_set: env_id {} exceeds maximum {} - ignoring",
                env_id, MAX_ENV_ID
            );
            return;
        }
        // 128 bytes of any content decode structurally; reserved opcodes
        // are skipped at composite time.
        self.epu_configs.insert(env_id, EpuConfig::from_bytes(config));
    }

    /// Set an environment configuration from 16 packed words.
    pub fn epu_set_words(&mut self, env_id: u32, words: &[u64; CONFIG_WORDS]) {
        if env_id > MAX_ENV_ID {
            warn!(
                "epu_set_words: env_id {} exceeds maximum {} - ignoring",
                env_id, MAX_ENV_ID
            );
            return;
        }
        self.epu_configs.insert(env_id, EpuConfig::from_words(*words));
    }

    /// Draw the background using the given environment for the current
    /// viewport and pass. Only the most recent call per (viewport, pass)
    /// in a frame is visible.
    pub fn epu_draw(&mut self, env_id: u32) {
        if env_id > MAX_ENV_ID {
            warn!(
                "epu_draw: env_id {} exceeds maximum {} - ignoring",
                env_id, MAX_ENV_ID
            );
            return;
        }
        if !self.epu_configs.contains_key(&env_id) {
            warn!(
                "epu_draw: env_id {} not configured - call epu_set first",
                env_id
            );
            return;
        }
        self.recorder.submit_environment(env_id);
    }

    /// Legacy v1 ABI name for [`epu_draw`](Self::epu_draw).
    #[deprecated(note = "v1 ABI name; use epu_draw()")]
    pub fn draw_env(&mut self, env_id: u32) {
        self.epu_draw(env_id);
    }

    /// Composite an environment set this frame through the reference CPU
    /// compositor.
    pub fn composite_environment(&self, env_id: u32) -> Option<crate::epu::CompositedLayer> {
        self.epu_configs.get(&env_id).map(crate::epu::composite)
    }
}
