//! Duskcore Core - console-agnostic session state
//!
//! This crate owns the deterministic boundary between a sandboxed game
//! module and its host runtime: the simulation clock, per-tick input
//! snapshots, save slots, and the deterministic RNG. Console-specific
//! concerns (resources, draw submission, the EPU) live in the console
//! crates built on top of it.
//!
//! # Architecture
//!
//! - [`Session`] - Per-instance context; every operation goes through it,
//!   so multiple sessions (e.g., test harnesses running many guests) stay
//!   isolated within one process.
//! - [`TickClock`] - Monotonic tick counter with an exact rational
//!   fixed-timestep delta.
//! - [`InputSnapshot`] - Frozen per-tick input with edge detection.
//! - [`SaveSlots`] - In-session save data; disk persistence is the host's
//!   concern.

pub mod clock;
pub mod error;
pub mod save;
pub mod session;
pub mod snapshot;

pub use clock::{Elapsed, FixedDelta, TickClock, TickRate};
pub use error::{CoreError, CoreResult};
pub use save::{MAX_SAVE_SIZE, MAX_SAVE_SLOTS, SaveSlots, SaveStatus};
pub use session::{Phase, Session, SessionConfig};
pub use snapshot::{InputSnapshot, MAX_PLAYERS};
