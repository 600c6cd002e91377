//! Per-tick input snapshots
//!
//! Input is captured once at tick start and frozen: every query within
//! the tick reads the same masks, so two pieces of guest logic polling
//! input in the same tick cannot observe different states. Edge masks
//! (pressed/released) are derived from the previous tick's held mask at
//! capture time, never recomputed per query.

use gx_common::{Button, InputState, stick_axis_f32, trigger_axis_f32};

/// Maximum number of players per session
pub const MAX_PLAYERS: usize = 4;

/// Frozen input for a single player
#[derive(Debug, Clone, Copy, Default)]
struct PlayerInput {
    held: u16,
    pressed: u16,
    released: u16,
    raw: InputState,
}

/// Immutable capture of all player input for one tick
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    players: [PlayerInput; MAX_PLAYERS],
    player_count: u32,
}

impl InputSnapshot {
    /// Capture a snapshot from the previous tick's raw state and this
    /// tick's raw state.
    ///
    /// `pressed = held & !prev_held`, `released = prev_held & !held`,
    /// computed here exactly once.
    pub fn capture(
        player_count: u32,
        prev: &[InputState; MAX_PLAYERS],
        curr: &[InputState; MAX_PLAYERS],
    ) -> Self {
        let mut players = [PlayerInput::default(); MAX_PLAYERS];
        for (i, slot) in players.iter_mut().enumerate() {
            let held = curr[i].buttons;
            let prev_held = prev[i].buttons;
            *slot = PlayerInput {
                held,
                pressed: held & !prev_held,
                released: prev_held & !held,
                raw: curr[i],
            };
        }
        Self {
            players,
            player_count: player_count.min(MAX_PLAYERS as u32),
        }
    }

    /// Number of players this snapshot covers
    pub fn player_count(&self) -> u32 {
        self.player_count
    }

    fn player(&self, player: u32) -> Option<&PlayerInput> {
        if player < self.player_count {
            Some(&self.players[player as usize])
        } else {
            None
        }
    }

    /// Is `button` currently held by `player`?
    ///
    /// Out-of-range players report not-held rather than erroring; guest
    /// code probes indices defensively.
    pub fn held(&self, player: u32, button: Button) -> bool {
        self.player(player)
            .is_some_and(|p| p.held & button.mask() != 0)
    }

    /// Was `button` pressed this tick (not held last tick, held now)?
    pub fn pressed(&self, player: u32, button: Button) -> bool {
        self.player(player)
            .is_some_and(|p| p.pressed & button.mask() != 0)
    }

    /// Was `button` released this tick (held last tick, not held now)?
    pub fn released(&self, player: u32, button: Button) -> bool {
        self.player(player)
            .is_some_and(|p| p.released & button.mask() != 0)
    }

    /// Left stick axes in [-1, 1]
    pub fn left_stick(&self, player: u32) -> (f32, f32) {
        self.player(player).map_or((0.0, 0.0), |p| {
            (
                stick_axis_f32(p.raw.left_stick_x),
                stick_axis_f32(p.raw.left_stick_y),
            )
        })
    }

    /// Right stick axes in [-1, 1]
    pub fn right_stick(&self, player: u32) -> (f32, f32) {
        self.player(player).map_or((0.0, 0.0), |p| {
            (
                stick_axis_f32(p.raw.right_stick_x),
                stick_axis_f32(p.raw.right_stick_y),
            )
        })
    }

    /// Trigger axes in [0, 1]
    pub fn triggers(&self, player: u32) -> (f32, f32) {
        self.player(player).map_or((0.0, 0.0), |p| {
            (
                trigger_axis_f32(p.raw.left_trigger),
                trigger_axis_f32(p.raw.right_trigger),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(buttons: u16) -> InputState {
        InputState {
            buttons,
            ..Default::default()
        }
    }

    fn states(player0: u16) -> [InputState; MAX_PLAYERS] {
        let mut all = [InputState::default(); MAX_PLAYERS];
        all[0] = raw(player0);
        all
    }

    #[test]
    fn pressed_requires_rising_edge() {
        let a = Button::A;
        // not held -> held
        let snap = InputSnapshot::capture(1, &states(0), &states(a.mask()));
        assert!(snap.held(0, a));
        assert!(snap.pressed(0, a));
        assert!(!snap.released(0, a));

        // held -> held: no edge
        let snap = InputSnapshot::capture(1, &states(a.mask()), &states(a.mask()));
        assert!(snap.held(0, a));
        assert!(!snap.pressed(0, a));
        assert!(!snap.released(0, a));
    }

    #[test]
    fn released_is_the_mirror_condition() {
        let b = Button::B;
        let snap = InputSnapshot::capture(1, &states(b.mask()), &states(0));
        assert!(!snap.held(0, b));
        assert!(!snap.pressed(0, b));
        assert!(snap.released(0, b));
    }

    #[test]
    fn edges_are_per_button() {
        let prev = states(Button::A.mask() | Button::B.mask());
        let curr = states(Button::B.mask() | Button::X.mask());
        let snap = InputSnapshot::capture(1, &prev, &curr);
        assert!(snap.released(0, Button::A));
        assert!(snap.held(0, Button::B) && !snap.pressed(0, Button::B));
        assert!(snap.pressed(0, Button::X));
    }

    #[test]
    fn out_of_range_player_reports_not_held() {
        let snap = InputSnapshot::capture(2, &states(0), &states(Button::A.mask()));
        assert!(!snap.held(2, Button::A));
        assert!(!snap.pressed(3, Button::A));
        assert_eq!(snap.left_stick(7), (0.0, 0.0));
        assert_eq!(snap.triggers(u32::MAX), (0.0, 0.0));
    }

    #[test]
    fn repeated_queries_are_identical() {
        let snap = InputSnapshot::capture(1, &states(0), &states(Button::Start.mask()));
        let first = snap.pressed(0, Button::Start);
        for _ in 0..10 {
            assert_eq!(snap.pressed(0, Button::Start), first);
        }
    }

    #[test]
    fn analog_axes_map_to_unit_range() {
        let mut curr = [InputState::default(); MAX_PLAYERS];
        curr[0] = InputState {
            left_stick_x: 127,
            left_stick_y: -128,
            right_trigger: 255,
            ..Default::default()
        };
        let snap = InputSnapshot::capture(1, &[InputState::default(); MAX_PLAYERS], &curr);
        assert_eq!(snap.left_stick(0), (1.0, -1.0));
        assert_eq!(snap.triggers(0).1, 1.0);
    }
}
