//! Resource handle registry
//!
//! Host-owned resources are referenced by opaque non-zero u32 handles
//! instead of pointers: an arena slot per resource, validated on every
//! use, so a stale or forged handle can never alias host memory. Each
//! class has its own numbering space and a monotonically increasing
//! allocation counter - handles are never reused within a session, which
//! turns "guest cached a dead handle" bugs into clean lookup misses.
//! Handle 0 is reserved as invalid/none in every class.

use duskcore_core::{CoreError, CoreResult};

/// Per-class handle allocation cap
pub const MAX_HANDLES_PER_CLASS: u32 = 65_535;

/// Resource classes. Classes do not share a numbering space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    Texture,
    Mesh,
    Sound,
    Skeleton,
    Font,
    Keyframes,
    Tracker,
}

impl ResourceClass {
    /// Class name for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::Texture => "texture",
            Self::Mesh => "mesh",
            Self::Sound => "sound",
            Self::Skeleton => "skeleton",
            Self::Font => "font",
            Self::Keyframes => "keyframes",
            Self::Tracker => "tracker",
        }
    }
}

/// Arena of resources for one class.
///
/// Handle `N` lives at index `N - 1`. Entries are only removed by
/// dropping the whole registry at session teardown, so a plain index
/// check is a complete liveness check - no generation counter needed
/// until handles can be revoked mid-session.
#[derive(Debug)]
pub struct Registry<T> {
    class: ResourceClass,
    entries: Vec<T>,
}

impl<T> Registry<T> {
    pub fn new(class: ResourceClass) -> Self {
        Self {
            class,
            entries: Vec::new(),
        }
    }

    pub fn class(&self) -> ResourceClass {
        self.class
    }

    /// Allocate a fresh handle for `resource`.
    ///
    /// Allocation order matches call order and is part of the
    /// replay-determinism contract: two clients issuing identical load
    /// calls in identical order obtain identical handle values.
    pub fn allocate(&mut self, resource: T) -> CoreResult<u32> {
        if self.entries.len() as u32 >= MAX_HANDLES_PER_CLASS {
            return Err(CoreError::ResourceExhausted {
                what: self.class.name(),
                limit: MAX_HANDLES_PER_CLASS,
            });
        }
        self.entries.push(resource);
        Ok(self.entries.len() as u32)
    }

    /// Resolve a handle. Handle 0 is never allocated and always misses.
    pub fn resolve(&self, handle: u32) -> Option<&T> {
        if handle == 0 {
            return None;
        }
        self.entries.get(handle as usize - 1)
    }

    pub fn resolve_mut(&mut self, handle: u32) -> Option<&mut T> {
        if handle == 0 {
            return None;
        }
        self.entries.get_mut(handle as usize - 1)
    }

    /// Resolve a handle or produce the taxonomy error for trap-style calls.
    pub fn require(&self, handle: u32) -> CoreResult<&T> {
        self.resolve(handle).ok_or(CoreError::InvalidHandle {
            class: self.class.name(),
            handle,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handle the next allocation will return
    pub fn next_handle(&self) -> u32 {
        self.entries.len() as u32 + 1
    }
}
