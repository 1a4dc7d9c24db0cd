//! Shared snapshot cell

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// The locally held copy of an entity's server-side fields.
///
/// Clones share the same cell, so an `update()` through one handle is visible
/// through every clone, including the one stored in a collection cache.
///
/// A snapshot built with [`Snapshot::unloaded`] holds placeholder values until
/// the first [`Snapshot::replace`]; callers that send snapshot fields back to
/// the server check [`Snapshot::is_loaded`] first.
pub struct Snapshot<I> {
    inner: Arc<RwLock<Slot<I>>>,
}

struct Slot<I> {
    info: I,
    loaded: bool,
}

impl<I: Clone> Snapshot<I> {
    /// Snapshot hydrated from a server response
    pub fn new(info: I) -> Self {
        Self::with_state(info, true)
    }

    fn with_state(info: I, loaded: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Slot { info, loaded })),
        }
    }

    /// True once the fields came from the server
    pub fn is_loaded(&self) -> bool {
        self.inner.read().loaded
    }

    /// Copy of the current snapshot
    pub fn get(&self) -> I {
        self.inner.read().info.clone()
    }

    /// Read without cloning
    pub fn read<R>(&self, f: impl FnOnce(&I) -> R) -> R {
        f(&self.inner.read().info)
    }

    /// Replace the whole snapshot and mark it loaded
    pub fn replace(&self, info: I) {
        let mut slot = self.inner.write();
        slot.info = info;
        slot.loaded = true;
    }

    /// Mutate in place
    pub fn update(&self, f: impl FnOnce(&mut I)) {
        f(&mut self.inner.write().info);
    }
}

impl<I: Clone + Default> Snapshot<I> {
    /// Empty placeholder for a handle built from its identifier alone
    pub fn unloaded() -> Self {
        Self::with_state(I::default(), false)
    }
}

impl<I> Clone for Snapshot<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: fmt::Debug> fmt::Debug for Snapshot<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner.read().info, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_updates() {
        let a = Snapshot::new(String::from("old"));
        let b = a.clone();
        a.replace("new".to_string());
        assert_eq!(b.get(), "new");

        b.update(|s| s.push('!'));
        assert_eq!(a.read(|s| s.len()), 4);
    }

    #[test]
    fn replace_marks_an_unloaded_snapshot_loaded() {
        let a: Snapshot<String> = Snapshot::unloaded();
        let b = a.clone();
        assert!(!b.is_loaded());

        b.update(|s| s.push('x'));
        assert!(!a.is_loaded());

        a.replace("server".to_string());
        assert!(b.is_loaded());
        assert!(Snapshot::new(String::new()).is_loaded());
    }
}
