//! Cartridge data pack
//!
//! Assets bundled with the cartridge, pre-decoded by the host's asset
//! pipeline and keyed by string ID. `rom_*` loads go straight from here
//! to host memory without touching guest RAM, which is what keeps
//! rollback snapshots small.
//!
//! Unlike the runtime upload path, a missing ROM asset is a trap: the
//! cartridge shipped with a reference to an asset it does not contain,
//! and no in-game branch can recover that.

use hashbrown::HashMap;

use crate::resources::{
    FontData, KeyframesData, MeshData, SkeletonData, SoundData, TextureData, TrackerModule,
};

/// One pre-decoded cartridge asset
#[derive(Debug, Clone)]
pub enum RomEntry {
    Texture(TextureData),
    Mesh(MeshData),
    Sound(SoundData),
    Skeleton(SkeletonData),
    Font(FontData),
    Keyframes(KeyframesData),
    Tracker(TrackerModule),
    /// Untyped blob, readable only via `rom_data`
    Data(Vec<u8>),
}

/// The cartridge's asset table
#[derive(Debug, Default)]
pub struct RomPack {
    entries: HashMap<String, RomEntry>,
}

impl RomPack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset under `id` (host pipeline only)
    pub fn insert(&mut self, id: impl Into<String>, entry: RomEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn find(&self, id: &str) -> Option<&RomEntry> {
        self.entries.get(id)
    }

    pub fn find_texture(&self, id: &str) -> Option<&TextureData> {
        match self.entries.get(id)? {
            RomEntry::Texture(t) => Some(t),
            _ => None,
        }
    }

    pub fn find_mesh(&self, id: &str) -> Option<&MeshData> {
        match self.entries.get(id)? {
            RomEntry::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn find_sound(&self, id: &str) -> Option<&SoundData> {
        match self.entries.get(id)? {
            RomEntry::Sound(s) => Some(s),
            _ => None,
        }
    }

    pub fn find_skeleton(&self, id: &str) -> Option<&SkeletonData> {
        match self.entries.get(id)? {
            RomEntry::Skeleton(s) => Some(s),
            _ => None,
        }
    }

    pub fn find_font(&self, id: &str) -> Option<&FontData> {
        match self.entries.get(id)? {
            RomEntry::Font(f) => Some(f),
            _ => None,
        }
    }

    pub fn find_keyframes(&self, id: &str) -> Option<&KeyframesData> {
        match self.entries.get(id)? {
            RomEntry::Keyframes(k) => Some(k),
            _ => None,
        }
    }

    pub fn find_tracker(&self, id: &str) -> Option<&TrackerModule> {
        match self.entries.get(id)? {
            RomEntry::Tracker(t) => Some(t),
            _ => None,
        }
    }

    pub fn find_data(&self, id: &str) -> Option<&[u8]> {
        match self.entries.get(id)? {
            RomEntry::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup_rejects_kind_mismatch() {
        let mut pack = RomPack::new();
        pack.insert("blob", RomEntry::Data(vec![1, 2, 3]));
        assert!(pack.find_texture("blob").is_none());
        assert_eq!(pack.find_data("blob"), Some(&[1u8, 2, 3][..]));
        assert!(pack.find_data("missing").is_none());
    }
}
