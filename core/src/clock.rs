//! Simulation tick clock
//!
//! Time in a session is a tick count times an exact rational delta. The
//! clock never accumulates floating point: two clients that agree on the
//! rate and the tick count agree on elapsed time bit-for-bit, which is
//! what rollback networking replays against.

use gx_common::GX_TICK_RATES;

use crate::error::{CoreError, CoreResult};

/// Fixed simulation rates supported by the console.
///
/// The wire value is the index into [`GX_TICK_RATES`] (0=24, 1=30, 2=60,
/// 3=120). The rate is chosen once during init and is immutable for the
/// rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickRate {
    Hz24,
    Hz30,
    Hz60,
    Hz120,
}

impl TickRate {
    /// Convert a wire index (0-3) to a tick rate.
    pub fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => Self::Hz24,
            1 => Self::Hz30,
            2 => Self::Hz60,
            3 => Self::Hz120,
            _ => return None,
        })
    }

    /// Wire index of this rate
    pub fn index(self) -> u32 {
        match self {
            Self::Hz24 => 0,
            Self::Hz30 => 1,
            Self::Hz60 => 2,
            Self::Hz120 => 3,
        }
    }

    /// Ticks per second
    pub fn hz(self) -> u32 {
        GX_TICK_RATES[self.index() as usize]
    }

    /// Exact per-tick duration
    pub fn delta(self) -> FixedDelta {
        FixedDelta { hz: self.hz() }
    }

    /// Default rate when a game never calls `set_tick_rate` (60 Hz)
    pub fn default_rate() -> Self {
        Self::Hz60
    }
}

/// Exact per-tick duration: the rational `1 / hz` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelta {
    hz: u32,
}

impl FixedDelta {
    /// Denominator of the rational duration
    pub fn hz(self) -> u32 {
        self.hz
    }

    /// Approximate duration in seconds (for display; simulation code
    /// should stay in tick space)
    pub fn as_secs_f32(self) -> f32 {
        1.0 / self.hz as f32
    }

    pub fn as_secs_f64(self) -> f64 {
        1.0 / self.hz as f64
    }
}

/// Elapsed session time as the exact rational `ticks / hz` seconds.
///
/// Equality compares the rational values, so `Elapsed` at 120 ticks of
/// 60 Hz equals `Elapsed` at 60 ticks of 30 Hz.
#[derive(Debug, Clone, Copy)]
pub struct Elapsed {
    ticks: u64,
    hz: u32,
}

impl Elapsed {
    /// Elapsed time of `ticks` ticks at `rate`
    pub fn of(ticks: u64, rate: TickRate) -> Self {
        Self {
            ticks,
            hz: rate.hz(),
        }
    }

    /// A whole number of seconds (any rate)
    pub fn seconds(secs: u64) -> Self {
        Self { ticks: secs, hz: 1 }
    }

    /// Tick count numerator
    pub fn ticks(self) -> u64 {
        self.ticks
    }

    /// Rate denominator in Hz
    pub fn hz(self) -> u32 {
        self.hz
    }

    /// Seconds as f64 (exact for tick counts below 2^52)
    pub fn as_secs_f64(self) -> f64 {
        self.ticks as f64 / self.hz as f64
    }

    pub fn as_secs_f32(self) -> f32 {
        self.as_secs_f64() as f32
    }
}

impl PartialEq for Elapsed {
    fn eq(&self, other: &Self) -> bool {
        // Cross-multiplied rational comparison; u128 cannot overflow here.
        self.ticks as u128 * other.hz as u128 == other.ticks as u128 * self.hz as u128
    }
}

impl Eq for Elapsed {}

/// The authoritative simulation clock.
///
/// [`advance`](Self::advance) is the only mutator; everything else is a
/// pure read. The tick counter starts at 0 and never decreases - rollback
/// restores guest state snapshots host-side and re-simulates forward, it
/// never rewinds this counter's monotonic guarantee past the rollback
/// horizon.
#[derive(Debug)]
pub struct TickClock {
    rate: Option<TickRate>,
    ticks: u64,
}

impl TickClock {
    /// A new, unconfigured clock at tick 0
    pub fn new() -> Self {
        Self {
            rate: None,
            ticks: 0,
        }
    }

    /// Select the tick rate. Rejected once a rate is already set - every
    /// client and every replay must agree on the rate before the first
    /// tick.
    pub fn configure(&mut self, rate: TickRate) -> CoreResult<()> {
        if self.rate.is_some() {
            return Err(CoreError::Configuration(
                "tick rate already configured".into(),
            ));
        }
        self.rate = Some(rate);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.rate.is_some()
    }

    /// Advance the clock by exactly one tick.
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Current tick number (0 before the first `advance`)
    pub fn current_tick(&self) -> u64 {
        self.ticks
    }

    /// The immutable per-tick duration.
    ///
    /// Reading it before a rate is configured is a configuration error,
    /// not a default - a caller observing a delta the session later
    /// changes would silently diverge from its peers.
    pub fn fixed_delta(&self) -> CoreResult<FixedDelta> {
        self.rate
            .map(TickRate::delta)
            .ok_or_else(|| CoreError::Configuration("tick rate not configured".into()))
    }

    /// Exact elapsed time, `ticks / hz`.
    pub fn elapsed(&self) -> CoreResult<Elapsed> {
        let rate = self
            .rate
            .ok_or_else(|| CoreError::Configuration("tick rate not configured".into()))?;
        Ok(Elapsed::of(self.ticks, rate))
    }

    pub fn rate(&self) -> Option<TickRate> {
        self.rate
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
