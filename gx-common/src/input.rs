//! Raw input state
//!
//! One `InputState` is the wire-exact capture of a single pad for a single
//! tick. It is the unit the host feeds into the session each tick and the
//! unit serialized into input streams for replay and netplay, so it must
//! stay POD with a fixed 8-byte layout.

use bytemuck::{Pod, Zeroable};

/// Raw input state for a single player
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct InputState {
    /// Button bitmask (bit N = button index N held)
    pub buttons: u16,
    /// Left stick X (-128 to 127)
    pub left_stick_x: i8,
    /// Left stick Y (-128 to 127)
    pub left_stick_y: i8,
    /// Right stick X (-128 to 127)
    pub right_stick_x: i8,
    /// Right stick Y (-128 to 127)
    pub right_stick_y: i8,
    /// Left trigger (0-255)
    pub left_trigger: u8,
    /// Right trigger (0-255)
    pub right_trigger: u8,
}

/// Convert a raw stick axis to the [-1, 1] range guests observe.
///
/// -128 clamps to -1.0 so the range stays symmetric.
#[inline]
pub fn stick_axis_f32(raw: i8) -> f32 {
    (raw as f32 / 127.0).max(-1.0)
}

/// Convert a raw trigger value to the [0, 1] range guests observe.
#[inline]
pub fn trigger_axis_f32(raw: u8) -> f32 {
    raw as f32 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_state_is_8_bytes() {
        assert_eq!(std::mem::size_of::<InputState>(), 8);
    }

    #[test]
    fn stick_axis_range() {
        assert_eq!(stick_axis_f32(0), 0.0);
        assert_eq!(stick_axis_f32(127), 1.0);
        assert_eq!(stick_axis_f32(-128), -1.0);
        assert_eq!(stick_axis_f32(-127), -1.0);
    }

    #[test]
    fn trigger_axis_range() {
        assert_eq!(trigger_axis_f32(0), 0.0);
        assert_eq!(trigger_axis_f32(255), 1.0);
        assert!((trigger_axis_f32(128) - 128.0 / 255.0).abs() < f32::EPSILON);
    }
}
