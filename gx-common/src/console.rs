//! Console specifications for the Duskware GX fantasy console.

/// Specifications for a fantasy console.
///
/// Defines the hardware limits and capabilities of a console generation.
/// Used by the host backend for validation and by the console core for
/// enforcement.
#[derive(Debug, Clone)]
pub struct ConsoleSpecs {
    /// Console name (e.g., "Duskware GX")
    pub name: &'static str,
    /// Available resolutions (width, height)
    pub resolutions: &'static [(u32, u32)],
    /// Default resolution index
    pub default_resolution: usize,
    /// Available tick rates in Hz
    pub tick_rates: &'static [u32],
    /// Default tick rate index
    pub default_tick_rate: usize,
    /// Maximum guest RAM in bytes
    pub ram_limit: usize,
    /// Maximum VRAM in bytes
    pub vram_limit: usize,
    /// Maximum ROM size in bytes (uncompressed)
    pub rom_limit: usize,
    /// CPU budget per tick in microseconds
    pub cpu_budget_us: u64,
}

/// Duskware GX resolutions (16:9 aspect ratio)
pub const GX_RESOLUTIONS: &[(u32, u32)] = &[
    (640, 360),   // 360p
    (960, 540),   // 540p (default)
    (1280, 720),  // 720p
    (1920, 1080), // 1080p
];

/// Duskware GX tick rates (simulation steps per second)
///
/// The index into this table is the wire value `set_tick_rate` accepts.
pub const GX_TICK_RATES: &[u32] = &[24, 30, 60, 120];

/// Duskware GX ROM limit (12 MB total cartridge: guest code + assets)
pub const GX_ROM_LIMIT: usize = 12 * 1024 * 1024;

/// Duskware GX RAM limit (4 MB guest linear memory)
pub const GX_RAM_LIMIT: usize = 4 * 1024 * 1024;

/// Duskware GX VRAM limit (4 MB GPU textures and mesh buffers)
pub const GX_VRAM_LIMIT: usize = 4 * 1024 * 1024;

/// Get Duskware GX console specifications.
///
/// # Memory Model
///
/// Duskware GX separates immutable cartridge data from game state. Assets
/// loaded via the `rom_*` entry points go directly to host memory; only
/// handles (u32 IDs) live in guest state, which keeps rollback snapshots
/// small and cheap.
///
/// - **ROM (Cartridge):** 12 MB total (guest code + assets)
/// - **RAM:** 4 MB guest linear memory (code + heap + stack)
/// - **VRAM:** 4 MB GPU textures and mesh buffers
pub const fn duskware_gx_specs() -> &'static ConsoleSpecs {
    &ConsoleSpecs {
        name: "Duskware GX",
        resolutions: GX_RESOLUTIONS,
        default_resolution: 1, // 540p
        tick_rates: GX_TICK_RATES,
        default_tick_rate: 2, // 60 fps
        ram_limit: GX_RAM_LIMIT,
        vram_limit: GX_VRAM_LIMIT,
        rom_limit: GX_ROM_LIMIT,
        cpu_budget_us: 4000, // 4ms per tick at 60fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_indices_are_in_range() {
        let specs = duskware_gx_specs();
        assert!(specs.default_resolution < specs.resolutions.len());
        assert!(specs.default_tick_rate < specs.tick_rates.len());
        assert_eq!(specs.tick_rates[specs.default_tick_rate], 60);
    }
}
