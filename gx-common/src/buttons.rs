//! Controller button enumeration
//!
//! The GX pad exposes a fixed 14-button layout. The numbering is part of the
//! ABI contract and must stay stable across every consumer (runtime, carts,
//! input recording, netplay).

/// Number of buttons on a GX pad
pub const BUTTON_COUNT: u32 = 14;

/// GX pad buttons, indices 0-13.
///
/// The discriminants are wire values: guest code passes them to the button
/// query entry points, and bit `N` of the held bitmask corresponds to the
/// button with index `N`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    A = 4,
    B = 5,
    X = 6,
    Y = 7,
    L1 = 8,
    R1 = 9,
    L3 = 10,
    R3 = 11,
    Start = 12,
    Select = 13,
}

impl Button {
    /// Convert a numeric button index to a `Button`.
    ///
    /// Returns `None` for indices outside 0-13. Guests probe indices
    /// defensively, so callers should treat `None` as "not held" rather
    /// than an error.
    pub fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => Self::Up,
            1 => Self::Down,
            2 => Self::Left,
            3 => Self::Right,
            4 => Self::A,
            5 => Self::B,
            6 => Self::X,
            7 => Self::Y,
            8 => Self::L1,
            9 => Self::R1,
            10 => Self::L3,
            11 => Self::R3,
            12 => Self::Start,
            13 => Self::Select,
            _ => return None,
        })
    }

    /// Bitmask for this button within a 16-bit held mask
    #[inline]
    pub fn mask(self) -> u16 {
        1u16 << (self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_covers_full_range() {
        for i in 0..BUTTON_COUNT {
            let button = Button::from_index(i).expect("valid index");
            assert_eq!(button as u32, i);
        }
        assert!(Button::from_index(BUTTON_COUNT).is_none());
        assert!(Button::from_index(u32::MAX).is_none());
    }

    #[test]
    fn masks_are_disjoint() {
        let mut seen = 0u16;
        for i in 0..BUTTON_COUNT {
            let mask = Button::from_index(i).unwrap().mask();
            assert_eq!(seen & mask, 0);
            seen |= mask;
        }
        assert_eq!(seen, 0x3FFF);
    }
}
