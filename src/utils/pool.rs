use std::marker::PhantomData;

use super::handle::{HandleIndex, HandleLike};

/// An arena of objects addressed by generation-checked handles. Every time a
/// handle is created or freed, the attached instance `T` is created or dropped.
///
/// A slot is alive while its version is odd. Freeing bumps the version to the
/// next even number, and reusing the slot bumps it again, so stale handles never
/// resolve to the new occupant. Versions wrap around after 2^31 reuses of one
/// slot, keeping their parity.
pub struct ObjectPool<H: HandleLike, T: Sized> {
    versions: Vec<HandleIndex>,
    entries: Vec<Option<T>>,
    frees: Vec<HandleIndex>,
    _phantom: PhantomData<H>,
}

impl<H: HandleLike, T: Sized> Default for ObjectPool<H, T> {
    fn default() -> Self {
        ObjectPool::new()
    }
}

impl<H: HandleLike, T: Sized> ObjectPool<H, T> {
    /// Constructs a new, empty `ObjectPool`.
    pub fn new() -> Self {
        ObjectPool::with_capacity(0)
    }

    /// Constructs a new `ObjectPool` with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        ObjectPool {
            versions: Vec::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            frees: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Creates a `T` and names it with a fresh handle.
    pub fn create(&mut self, value: T) -> H {
        if let Some(index) = self.frees.pop() {
            let i = index as usize;
            self.versions[i] = self.versions[i].wrapping_add(1);
            self.entries[i] = Some(value);
            H::new(index, self.versions[i])
        } else {
            self.versions.push(1);
            self.entries.push(Some(value));
            H::new(self.versions.len() as HandleIndex - 1, 1)
        }
    }

    /// Returns true if this handle was created by this pool, and has not been
    /// freed yet.
    #[inline]
    pub fn contains(&self, handle: H) -> bool {
        let index = handle.index() as usize;
        index < self.versions.len()
            && self.versions[index] & 0x1 == 1
            && self.versions[index] == handle.version()
    }

    /// Returns true if the handle points into this pool, but its object has
    /// been freed since.
    #[inline]
    pub fn is_freed(&self, handle: H) -> bool {
        let index = handle.index() as usize;
        index < self.versions.len() && handle.version() & 0x1 == 1 && !self.contains(handle)
    }

    /// Returns immutable reference to internal value with name `handle`.
    #[inline]
    pub fn get(&self, handle: H) -> Option<&T> {
        if self.contains(handle) {
            self.entries[handle.index() as usize].as_ref()
        } else {
            None
        }
    }

    /// Returns mutable reference to internal value with name `handle`.
    #[inline]
    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        if self.contains(handle) {
            self.entries[handle.index() as usize].as_mut()
        } else {
            None
        }
    }

    /// Recycles the value with name `handle`.
    pub fn free(&mut self, handle: H) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }

        let index = handle.index();
        let i = index as usize;
        self.versions[i] = self.versions[i].wrapping_add(1);
        self.frees.push(index);
        self.entries[i].take()
    }

    /// Returns the total number of alive handle in this `ObjectPool`.
    #[inline]
    pub fn len(&self) -> usize {
        self.versions.len() - self.frees.len()
    }

    /// Checks if the pool is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the alive handles.
    #[inline]
    pub fn handles<'a>(&'a self) -> impl Iterator<Item = H> + 'a {
        self.versions
            .iter()
            .enumerate()
            .filter(|&(_, v)| *v & 0x1 == 1)
            .map(|(i, &v)| H::new(i as HandleIndex, v))
    }

    /// Returns an iterator over the alive values.
    #[inline]
    pub fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T> + 'a {
        self.entries.iter_mut().filter_map(|v| v.as_mut())
    }
}
