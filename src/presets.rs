//! Preset and recent-color lists shared by every picker on the thread.
//!
//! Floem runs its views on a single thread, so the shared cache lives in a
//! `thread_local!` behind `Rc<RefCell<_>>`. Pickers receive a [`PresetStore`]
//! handle at construction; [`PresetStore::shared`] hands out the common one
//! and [`PresetStore::new`] an isolated one.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::color::SolidColor;
use crate::constants;

#[derive(Debug)]
struct PresetCache {
    presets: Vec<SolidColor>,
    recent: Vec<SolidColor>,
    recent_capacity: usize,
    revision: u64,
}

/// Handle to a preset cache. Clones share the same lists.
#[derive(Debug, Clone)]
pub struct PresetStore {
    inner: Rc<RefCell<PresetCache>>,
}

thread_local! {
    static SHARED: RefCell<Option<PresetStore>> = const { RefCell::new(None) };
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetStore {
    /// An isolated, empty store.
    pub fn new() -> Self {
        Self::with_recent_capacity(constants::RECENT_PRESET_CAPACITY)
    }

    pub fn with_recent_capacity(recent_capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PresetCache {
                presets: Vec::new(),
                recent: Vec::new(),
                recent_capacity: recent_capacity.max(1),
                revision: 0,
            })),
        }
    }

    /// The thread's shared store, created on first use.
    pub fn shared() -> Self {
        SHARED.with(|shared| shared.borrow_mut().get_or_insert_with(Self::new).clone())
    }

    /// Drop the shared store. Pickers still holding a handle keep their
    /// lists; the next [`PresetStore::shared`] call starts empty.
    pub fn teardown_shared() {
        SHARED.with(|shared| shared.borrow_mut().take());
    }

    /// Whether two handles point at the same lists.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Bumped on every mutation; lets pickers tell when their mirror is stale.
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    pub fn presets(&self) -> Vec<SolidColor> {
        self.inner.borrow().presets.clone()
    }

    /// Recent colors, oldest first.
    pub fn recent_presets(&self) -> Vec<SolidColor> {
        self.inner.borrow().recent.clone()
    }

    pub fn recent_capacity(&self) -> usize {
        self.inner.borrow().recent_capacity
    }

    pub fn contains(&self, color: SolidColor) -> bool {
        self.inner.borrow().presets.contains(&color)
    }

    pub fn contains_recent(&self, color: SolidColor) -> bool {
        self.inner.borrow().recent.contains(&color)
    }

    /// Append `color` unless it is already present. Returns whether it was added.
    pub fn add(&self, color: SolidColor) -> bool {
        let mut cache = self.inner.borrow_mut();
        if cache.presets.contains(&color) {
            return false;
        }
        cache.presets.push(color);
        cache.revision += 1;
        debug!("preset added: {}", color.to_hex(true));
        true
    }

    /// Remove the first exact match. Returns whether anything was removed.
    pub fn erase(&self, color: SolidColor) -> bool {
        let mut cache = self.inner.borrow_mut();
        let Some(idx) = cache.presets.iter().position(|c| *c == color) else {
            return false;
        };
        cache.presets.remove(idx);
        cache.revision += 1;
        debug!("preset erased: {}", color.to_hex(true));
        true
    }

    /// Append `color` to the recent list unless present, evicting the oldest
    /// entries past capacity.
    pub fn add_recent(&self, color: SolidColor) -> bool {
        let mut cache = self.inner.borrow_mut();
        if cache.recent.contains(&color) {
            return false;
        }
        cache.recent.push(color);
        let overflow = cache.recent.len().saturating_sub(cache.recent_capacity);
        cache.recent.drain(..overflow);
        cache.revision += 1;
        true
    }

    pub fn erase_recent(&self, color: SolidColor) -> bool {
        let mut cache = self.inner.borrow_mut();
        let Some(idx) = cache.recent.iter().position(|c| *c == color) else {
            return false;
        };
        cache.recent.remove(idx);
        cache.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(n: u8) -> SolidColor {
        SolidColor::from_rgb(n, n, n)
    }

    #[test]
    fn add_deduplicates() {
        let store = PresetStore::new();
        assert!(store.add(gray(1)));
        assert!(!store.add(gray(1)));
        assert_eq!(store.presets(), vec![gray(1)]);
    }

    #[test]
    fn erase_removes_one_and_keeps_order() {
        let store = PresetStore::new();
        for n in 1..=4 {
            store.add(gray(n));
        }
        assert!(store.erase(gray(2)));
        assert!(!store.erase(gray(2)));
        assert_eq!(store.presets(), vec![gray(1), gray(3), gray(4)]);
    }

    #[test]
    fn recent_evicts_oldest_first() {
        let store = PresetStore::with_recent_capacity(3);
        for n in 1..=4 {
            store.add_recent(gray(n));
        }
        assert_eq!(store.recent_presets(), vec![gray(2), gray(3), gray(4)]);
    }

    #[test]
    fn recent_duplicates_do_not_reorder() {
        let store = PresetStore::new();
        store.add_recent(gray(1));
        store.add_recent(gray(2));
        assert!(!store.add_recent(gray(1)));
        assert_eq!(store.recent_presets(), vec![gray(1), gray(2)]);
    }

    #[test]
    fn clones_share_lists() {
        let a = PresetStore::new();
        let b = a.clone();
        let before = b.revision();
        a.add(gray(9));
        assert!(b.contains(gray(9)));
        assert!(b.revision() > before);
        assert!(!PresetStore::new().contains(gray(9)));
    }

    #[test]
    fn shared_store_lifecycle() {
        PresetStore::teardown_shared();
        let first = PresetStore::shared();
        assert!(first.ptr_eq(&PresetStore::shared()));
        first.add(gray(7));
        PresetStore::teardown_shared();
        let second = PresetStore::shared();
        assert!(!second.ptr_eq(&first));
        assert!(second.presets().is_empty());
        PresetStore::teardown_shared();
    }
}
