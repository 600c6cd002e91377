//! Per-frame draw command recording
//!
//! FFI-side draw submissions accumulate here during a tick and are
//! flushed to the host as one ordered command stream at frame end. Pass
//! boundaries are strict barriers: the finished stream orders every
//! command of pass N before any command of pass N+1, which is what makes
//! stencil masks and viewmodel-over-world layering correct.

use glam::Mat4;
use hashbrown::HashMap;

use duskcore_core::{CoreError, CoreResult};

use crate::pass::PassConfig;
use crate::viewport::Viewport;

/// Per-frame matrix pool cap
pub const MAX_FRAME_MATRICES: usize = 4096;

/// Default z-index for 2D ordering (background layer, reset each frame)
pub const DEFAULT_Z_INDEX: u32 = 0;

/// One recorded draw submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCommand {
    /// Retained mesh draw
    Mesh {
        /// Mesh handle
        mesh: u32,
        /// Index into the frame's matrix pool
        matrix_index: u32,
        /// Ordering within the pass (higher = closer to camera)
        z_index: u32,
        /// Viewport captured at submission time
        viewport: Viewport,
        /// Pass this command belongs to
        pass_id: u32,
    },
    /// EPU environment background draw
    Environment {
        /// Environment slot ID
        env_id: u32,
        viewport: Viewport,
        pass_id: u32,
    },
}

impl FrameCommand {
    /// Pass the command belongs to
    pub fn pass_id(&self) -> u32 {
        match *self {
            Self::Mesh { pass_id, .. } | Self::Environment { pass_id, .. } => pass_id,
        }
    }

    /// Sort rank within a pass: meshes by z-index first, environments
    /// last so the background shader only runs where geometry left gaps.
    fn sort_key(&self) -> (u32, u8, u32) {
        match *self {
            Self::Mesh {
                pass_id, z_index, ..
            } => (pass_id, 0, z_index),
            Self::Environment { pass_id, .. } => (pass_id, 1, 0),
        }
    }
}

/// Accumulates draw commands for one frame.
#[derive(Debug)]
pub struct FrameRecorder {
    passes: Vec<PassConfig>,
    current_pass: u32,
    commands: Vec<FrameCommand>,
    matrices: Vec<Mat4>,
    /// Environment draw requests, keyed by (viewport, pass). Re-drawing
    /// the environment for the same key replaces the request: only the
    /// most recent call in a frame is visible.
    env_draws: HashMap<(Viewport, u32), u32>,
    current_z: u32,
    viewport: Viewport,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self {
            // Pass 0 is always the implicit default pass
            passes: vec![PassConfig::default()],
            current_pass: 0,
            commands: Vec::new(),
            matrices: Vec::new(),
            env_draws: HashMap::new(),
            current_z: DEFAULT_Z_INDEX,
            viewport: Viewport::FULLSCREEN,
        }
    }

    /// Reset to the start-of-frame state.
    pub fn reset(&mut self) {
        self.passes.clear();
        self.passes.push(PassConfig::default());
        self.current_pass = 0;
        self.commands.clear();
        self.matrices.clear();
        self.env_draws.clear();
        self.current_z = DEFAULT_Z_INDEX;
        self.viewport = Viewport::FULLSCREEN;
    }

    /// Begin a new pass. The config applies to all subsequent draws
    /// until the next transition, and the boundary is an execution
    /// barrier for everything already submitted.
    pub fn begin_pass(&mut self, config: PassConfig) -> u32 {
        self.current_pass += 1;
        self.passes.push(config);
        self.current_pass
    }

    /// Currently active pass ID
    pub fn current_pass(&self) -> u32 {
        self.current_pass
    }

    /// Config of the given pass
    pub fn pass_config(&self, pass_id: u32) -> Option<&PassConfig> {
        self.passes.get(pass_id as usize)
    }

    /// Set the z-index for subsequent 2D-ordered draws within a pass
    pub fn set_z_index(&mut self, z: u32) {
        self.current_z = z;
    }

    /// Set the viewport captured by subsequent draws
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Record a mesh draw with the given model transform.
    pub fn submit_mesh(&mut self, mesh: u32, transform: Mat4) -> CoreResult<()> {
        if self.matrices.len() >= MAX_FRAME_MATRICES {
            return Err(CoreError::ResourceExhausted {
                what: "frame matrix pool",
                limit: MAX_FRAME_MATRICES as u32,
            });
        }
        let matrix_index = self.matrices.len() as u32;
        self.matrices.push(transform);
        self.commands.push(FrameCommand::Mesh {
            mesh,
            matrix_index,
            z_index: self.current_z,
            viewport: self.viewport,
            pass_id: self.current_pass,
        });
        Ok(())
    }

    /// Record an environment draw for the current (viewport, pass).
    /// Last call wins per key.
    pub fn submit_environment(&mut self, env_id: u32) {
        self.env_draws
            .insert((self.viewport, self.current_pass), env_id);
    }

    /// Number of commands recorded so far (environment draws excluded)
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Flush into an ordered command stream.
    ///
    /// The stream is sorted by (pass, kind, z); the sort is stable so
    /// submission order breaks ties, preserving the call-order guarantee
    /// within a pass.
    pub fn finish(&mut self) -> (Vec<PassConfig>, Vec<FrameCommand>, Vec<Mat4>) {
        let mut commands = std::mem::take(&mut self.commands);
        // Drain environment draws in a deterministic order; hash map
        // iteration order must never leak into the command stream.
        let mut env_draws: Vec<((Viewport, u32), u32)> = self.env_draws.drain().collect();
        env_draws.sort_by_key(|&((v, pass_id), _)| (pass_id, v.x, v.y, v.width, v.height));
        for ((viewport, pass_id), env_id) in env_draws {
            commands.push(FrameCommand::Environment {
                env_id,
                viewport,
                pass_id,
            });
        }
        commands.sort_by_key(FrameCommand::sort_key);

        let passes = std::mem::take(&mut self.passes);
        let matrices = std::mem::take(&mut self.matrices);
        (passes, commands, matrices)
    }
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_barriered_by_pass() {
        let mut recorder = FrameRecorder::new();
        recorder.submit_mesh(1, Mat4::IDENTITY).unwrap();
        recorder.begin_pass(PassConfig::standard(true));
        recorder.submit_mesh(2, Mat4::IDENTITY).unwrap();
        recorder.begin_pass(PassConfig::standard(false));
        recorder.submit_mesh(3, Mat4::IDENTITY).unwrap();

        let (passes, commands, _) = recorder.finish();
        assert_eq!(passes.len(), 3);
        let pass_ids: Vec<u32> = commands.iter().map(FrameCommand::pass_id).collect();
        assert_eq!(pass_ids, vec![0, 1, 2]);
    }

    #[test]
    fn exactly_one_pass_state_is_active() {
        let mut recorder = FrameRecorder::new();
        assert_eq!(recorder.current_pass(), 0);
        recorder.begin_pass(PassConfig::stencil_write(1, false));
        assert_eq!(recorder.current_pass(), 1);
        // A draw lands in the newest pass only
        recorder.submit_mesh(9, Mat4::IDENTITY).unwrap();
        let (_, commands, _) = recorder.finish();
        assert!(commands.iter().all(|c| c.pass_id() == 1));
    }

    #[test]
    fn z_index_orders_within_a_pass() {
        let mut recorder = FrameRecorder::new();
        recorder.set_z_index(5);
        recorder.submit_mesh(1, Mat4::IDENTITY).unwrap();
        recorder.set_z_index(0);
        recorder.submit_mesh(2, Mat4::IDENTITY).unwrap();

        let (_, commands, _) = recorder.finish();
        let meshes: Vec<u32> = commands
            .iter()
            .map(|c| match c {
                FrameCommand::Mesh { mesh, .. } => *mesh,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(meshes, vec![2, 1]);
    }

    #[test]
    fn environment_draws_render_after_meshes() {
        let mut recorder = FrameRecorder::new();
        recorder.submit_environment(0);
        recorder.submit_mesh(1, Mat4::IDENTITY).unwrap();

        let (_, commands, _) = recorder.finish();
        assert!(matches!(commands[0], FrameCommand::Mesh { .. }));
        assert!(matches!(commands[1], FrameCommand::Environment { .. }));
    }

    #[test]
    fn repeated_environment_draws_last_call_wins() {
        let mut recorder = FrameRecorder::new();
        recorder.submit_environment(1);
        recorder.submit_environment(2);

        let (_, commands, _) = recorder.finish();
        assert_eq!(commands.len(), 1);
        assert!(matches!(
            commands[0],
            FrameCommand::Environment { env_id: 2, .. }
        ));
    }

    #[test]
    fn environment_draws_are_per_viewport() {
        let mut recorder = FrameRecorder::new();
        recorder.set_viewport(Viewport {
            x: 0,
            y: 0,
            width: 480,
            height: 540,
        });
        recorder.submit_environment(1);
        recorder.set_viewport(Viewport {
            x: 480,
            y: 0,
            width: 480,
            height: 540,
        });
        recorder.submit_environment(2);

        let (_, commands, _) = recorder.finish();
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn matrix_pool_is_bounded() {
        let mut recorder = FrameRecorder::new();
        for _ in 0..MAX_FRAME_MATRICES {
            recorder.submit_mesh(1, Mat4::IDENTITY).unwrap();
        }
        let err = recorder.submit_mesh(1, Mat4::IDENTITY).unwrap_err();
        assert!(matches!(err, CoreError::ResourceExhausted { .. }));
    }

    #[test]
    fn reset_restores_the_implicit_pass() {
        let mut recorder = FrameRecorder::new();
        recorder.begin_pass(PassConfig::stencil_write(1, true));
        recorder.submit_mesh(1, Mat4::IDENTITY).unwrap();
        recorder.reset();
        assert_eq!(recorder.current_pass(), 0);
        assert_eq!(recorder.command_count(), 0);
        assert_eq!(recorder.pass_config(0), Some(&PassConfig::default()));
        assert!(recorder.pass_config(1).is_none());
    }
}
