//! Per-instance session context
//!
//! All mutable session state - phase, clock, inputs, saves, RNG - lives
//! on [`Session`]. There are no process-wide singletons, so a host (or a
//! test harness) can run any number of sessions side by side without
//! cross-talk.

use serde::{Deserialize, Serialize};
use tracing::warn;

use gx_common::{Button, InputState};

use crate::clock::{Elapsed, FixedDelta, TickClock, TickRate};
use crate::error::{CoreError, CoreResult};
use crate::save::{SaveSlots, SaveStatus};
use crate::snapshot::{InputSnapshot, MAX_PLAYERS};

/// Session lifecycle phase.
///
/// Resource loading and configuration are only legal during `Init`;
/// ticking is only legal during `Running`. The transition happens exactly
/// once, when the host calls [`Session::finish_init`] after the game's
/// init entry point returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Running,
}

/// Host-supplied session parameters, typically read from a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of players (1-4)
    pub player_count: u32,
    /// Deterministic RNG seed shared by all clients
    pub seed: u64,
    /// Optional tick-rate index preselected by the host (0=24, 1=30,
    /// 2=60, 3=120); games may still pick their own during init
    pub tick_rate: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_count: 1,
            seed: 0,
            tick_rate: None,
        }
    }
}

/// A single guest session.
pub struct Session {
    phase: Phase,
    clock: TickClock,
    player_count: u32,
    input_prev: [InputState; MAX_PLAYERS],
    input_curr: [InputState; MAX_PLAYERS],
    snapshot: InputSnapshot,
    saves: SaveSlots,
    rng_state: u64,
    quit_requested: bool,
}

impl Session {
    /// Create a session in the init phase.
    pub fn new(config: &SessionConfig) -> CoreResult<Self> {
        if config.player_count == 0 || config.player_count > MAX_PLAYERS as u32 {
            return Err(CoreError::Configuration(format!(
                "player_count {} out of range 1-{}",
                config.player_count, MAX_PLAYERS
            )));
        }

        let mut session = Self {
            phase: Phase::Init,
            clock: TickClock::new(),
            player_count: config.player_count,
            input_prev: [InputState::default(); MAX_PLAYERS],
            input_curr: [InputState::default(); MAX_PLAYERS],
            snapshot: InputSnapshot::default(),
            saves: SaveSlots::new(),
            rng_state: config.seed,
            quit_requested: false,
        };

        if let Some(index) = config.tick_rate {
            session.set_tick_rate(index)?;
        }

        Ok(session)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player_count(&self) -> u32 {
        self.player_count
    }

    // =========================================================================
    // Configuration (init-only)
    // =========================================================================

    /// Select the tick rate by wire index (0=24, 1=30, 2=60, 3=120).
    ///
    /// Init-only and single-shot: a second call, or any call after
    /// `finish_init`, is a configuration error reported to the caller -
    /// not silently ignored, since every client must agree on the rate
    /// before the first tick.
    pub fn set_tick_rate(&mut self, index: u32) -> CoreResult<()> {
        if self.phase != Phase::Init {
            return Err(CoreError::Configuration(
                "set_tick_rate called after init() completed".into(),
            ));
        }
        let rate = TickRate::from_index(index).ok_or_else(|| {
            CoreError::Configuration(format!("set_tick_rate({index}) invalid - must be 0-3"))
        })?;
        self.clock.configure(rate)
    }

    /// Leave the init phase. Applies the default tick rate if the game
    /// never chose one. Calling twice is a host bug.
    pub fn finish_init(&mut self) -> CoreResult<()> {
        if self.phase != Phase::Init {
            return Err(CoreError::Configuration(
                "finish_init called twice".into(),
            ));
        }
        if !self.clock.is_configured() {
            self.clock.configure(TickRate::default_rate())?;
        }
        self.phase = Phase::Running;
        Ok(())
    }

    // =========================================================================
    // Ticking
    // =========================================================================

    /// Begin a tick: capture the input snapshot from the previous tick's
    /// state plus fresh raw input. Guest simulation runs between
    /// `begin_tick` and `end_tick`.
    pub fn begin_tick(&mut self, raw: &[InputState]) -> CoreResult<()> {
        if self.phase != Phase::Running {
            return Err(CoreError::Configuration(
                "begin_tick called during init()".into(),
            ));
        }
        for (slot, state) in self.input_curr.iter_mut().zip(raw.iter()) {
            *slot = *state;
        }
        for slot in self.input_curr.iter_mut().skip(raw.len()) {
            *slot = InputState::default();
        }
        self.snapshot =
            InputSnapshot::capture(self.player_count, &self.input_prev, &self.input_curr);
        Ok(())
    }

    /// End the tick: rotate input state and advance the clock.
    pub fn end_tick(&mut self) {
        self.input_prev = self.input_curr;
        self.clock.advance();
    }

    /// Current tick number
    pub fn tick_count(&self) -> u64 {
        self.clock.current_tick()
    }

    /// Exact elapsed time since session start
    pub fn elapsed_time(&self) -> CoreResult<Elapsed> {
        self.clock.elapsed()
    }

    /// The immutable per-tick duration
    pub fn fixed_delta(&self) -> CoreResult<FixedDelta> {
        self.clock.fixed_delta()
    }

    // =========================================================================
    // Input queries (ABI-shaped: numeric indices, sentinel results)
    // =========================================================================

    /// The frozen input snapshot for the current tick
    pub fn input(&self) -> &InputSnapshot {
        &self.snapshot
    }

    /// Is a button held? Invalid player or button indices report not-held.
    pub fn button_held(&self, player: u32, button: u32) -> bool {
        let Some(button) = Button::from_index(button) else {
            warn!("button_held: invalid button {} (max 13)", button);
            return false;
        };
        self.snapshot.held(player, button)
    }

    /// Was a button pressed this tick?
    pub fn button_pressed(&self, player: u32, button: u32) -> bool {
        let Some(button) = Button::from_index(button) else {
            warn!("button_pressed: invalid button {} (max 13)", button);
            return false;
        };
        self.snapshot.pressed(player, button)
    }

    /// Was a button released this tick?
    pub fn button_released(&self, player: u32, button: u32) -> bool {
        let Some(button) = Button::from_index(button) else {
            warn!("button_released: invalid button {} (max 13)", button);
            return false;
        };
        self.snapshot.released(player, button)
    }

    // =========================================================================
    // Deterministic RNG
    // =========================================================================

    /// Reseed the deterministic RNG.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng_state = seed;
    }

    /// Generate a deterministic random u32 (PCG-XSH-RR).
    pub fn random(&mut self) -> u32 {
        let old_state = self.rng_state;
        self.rng_state = old_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Legacy v1 ABI name for [`random`](Self::random).
    #[deprecated(note = "v1 ABI name; use random()")]
    pub fn random_u32(&mut self) -> u32 {
        self.random()
    }

    // =========================================================================
    // Logging
    // =========================================================================

    /// Log a message on behalf of the guest.
    pub fn log(&self, msg: &str) {
        tracing::info!("[GAME] {}", msg);
    }

    /// Legacy v1 ABI name for [`log`](Self::log).
    #[deprecated(note = "v1 ABI name; use log()")]
    pub fn log_msg(&self, msg: &str) {
        self.log(msg);
    }

    // =========================================================================
    // Save slots
    // =========================================================================

    pub fn save(&mut self, slot: u32, data: &[u8]) -> SaveStatus {
        self.saves.save(slot, data)
    }

    pub fn load_save(&self, slot: u32, dst: &mut [u8]) -> usize {
        self.saves.load(slot, dst)
    }

    pub fn delete_save(&mut self, slot: u32) -> SaveStatus {
        self.saves.delete(slot)
    }

    /// Raw slot access for host-side persistence
    pub fn saves(&self) -> &SaveSlots {
        &self.saves
    }

    // =========================================================================
    // Quit
    // =========================================================================

    /// Guest request to quit to the library
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_session() -> Session {
        let mut session = Session::new(&SessionConfig::default()).unwrap();
        session.finish_init().unwrap();
        session
    }

    fn press(buttons: u16) -> [InputState; 1] {
        [InputState {
            buttons,
            ..Default::default()
        }]
    }

    #[test]
    fn sixty_hz_scenario() {
        // Tick rate 60fps (index 2) during init; 120 ticks -> exactly 2s.
        let mut session = Session::new(&SessionConfig::default()).unwrap();
        session.set_tick_rate(2).unwrap();
        session.finish_init().unwrap();

        for _ in 0..120 {
            session.begin_tick(&[]).unwrap();
            session.end_tick();
        }
        assert_eq!(session.tick_count(), 120);
        assert_eq!(session.elapsed_time().unwrap().as_secs_f64(), 2.0);
    }

    #[test]
    fn tick_rate_after_init_is_a_configuration_error() {
        let mut session = running_session();
        let err = session.set_tick_rate(0).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn default_rate_applies_when_game_never_chose() {
        let session = running_session();
        assert_eq!(session.fixed_delta().unwrap().hz(), 60);
    }

    #[test]
    fn elapsed_before_init_is_rejected() {
        let session = Session::new(&SessionConfig::default()).unwrap();
        assert!(matches!(
            session.elapsed_time(),
            Err(CoreError::Configuration(_))
        ));
    }

    #[test]
    fn edge_detection_across_ticks() {
        let mut session = running_session();
        let a = Button::A.mask();

        session.begin_tick(&press(a)).unwrap();
        assert!(session.button_pressed(0, Button::A as u32));
        assert!(session.button_held(0, Button::A as u32));
        session.end_tick();

        session.begin_tick(&press(a)).unwrap();
        assert!(!session.button_pressed(0, Button::A as u32));
        assert!(session.button_held(0, Button::A as u32));
        session.end_tick();

        session.begin_tick(&press(0)).unwrap();
        assert!(session.button_released(0, Button::A as u32));
        session.end_tick();
    }

    #[test]
    fn invalid_button_index_reports_not_held() {
        let mut session = running_session();
        session.begin_tick(&press(0xFFFF)).unwrap();
        assert!(!session.button_held(0, 14));
        assert!(!session.button_pressed(0, 999));
    }

    #[test]
    fn ticking_during_init_is_rejected() {
        let mut session = Session::new(&SessionConfig::default()).unwrap();
        assert!(session.begin_tick(&[]).is_err());
    }

    #[test]
    fn rng_streams_are_reproducible() {
        let mut a = Session::new(&SessionConfig {
            seed: 0xDEADBEEF,
            ..Default::default()
        })
        .unwrap();
        let mut b = Session::new(&SessionConfig {
            seed: 0xDEADBEEF,
            ..Default::default()
        })
        .unwrap();
        let stream_a: Vec<u32> = (0..16).map(|_| a.random()).collect();
        let stream_b: Vec<u32> = (0..16).map(|_| b.random()).collect();
        assert_eq!(stream_a, stream_b);

        b.seed_rng(1);
        let diverged: Vec<u32> = (0..16).map(|_| b.random()).collect();
        assert_ne!(stream_a, diverged);
    }

    #[test]
    fn save_scenario() {
        let mut session = running_session();
        assert_eq!(session.save(0, b"0123456789").code(), 0);

        let mut buf = [0u8; 32];
        let read = session.load_save(0, &mut buf);
        assert_eq!(read, 10);
        assert_eq!(&buf[..10], b"0123456789");

        assert_eq!(session.delete_save(0).code(), 0);
        assert_eq!(session.load_save(0, &mut buf), 0);
    }

    #[test]
    fn config_manifest_round_trip() {
        let config = SessionConfig {
            player_count: 2,
            seed: 42,
            tick_rate: Some(3),
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.player_count, 2);
        assert_eq!(restored.seed, 42);
        assert_eq!(restored.tick_rate, Some(3));
    }

    #[test]
    fn invalid_player_count_rejected() {
        assert!(Session::new(&SessionConfig {
            player_count: 0,
            ..Default::default()
        })
        .is_err());
        assert!(Session::new(&SessionConfig {
            player_count: 5,
            ..Default::default()
        })
        .is_err());
    }
}
