//! Unified music handle space
//!
//! PCM sounds and tracker modules are different resource classes, but the
//! music API takes a single u32 handle. Tracker handles carry the most
//! significant bit so one numeric handle disambiguates the two kinds
//! without a side channel.

/// Flag bit set on tracker module handles
pub const TRACKER_HANDLE_FLAG: u32 = 0x8000_0000;

/// Check if a music handle refers to a tracker module
#[inline]
pub fn is_tracker_handle(handle: u32) -> bool {
    (handle & TRACKER_HANDLE_FLAG) != 0
}

/// Strip the tracker flag, yielding the raw registry handle
#[inline]
pub fn raw_music_handle(handle: u32) -> u32 {
    handle & !TRACKER_HANDLE_FLAG
}

/// What kind of music a handle refers to.
///
/// The discriminants are the wire values of the `music_type` query.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicKind {
    None = 0,
    Pcm = 1,
    Tracker = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_round_trip() {
        let flagged = 3 | TRACKER_HANDLE_FLAG;
        assert!(is_tracker_handle(flagged));
        assert_eq!(raw_music_handle(flagged), 3);
        assert!(!is_tracker_handle(3));
        assert_eq!(raw_music_handle(3), 3);
    }
}
