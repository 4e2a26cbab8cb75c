//! Opaque handle bridge
//!
//! ## Design
//!
//! Heap-owned entities cross the query boundary as opaque tokens. A
//! `HandleTable` maps pointer-sized tokens to reference-counted entity
//! slots, making the "borrowed, non-owning" contract explicit:
//!
//! - `insert` registers an entity with a reference count of 1 (the
//!   registry's share) and mints its token.
//! - `resolve` is a weak lookup: it never touches the reference count.
//! - `retain` / `release` are the only operations that move the count.
//!   Releasing to zero frees the slot; the token then resolves to nothing.
//!
//! Tokens come from one process-wide monotone counter shared by every
//! table and are never reused, so two equal raw tokens always denote the
//! same entity, even across entity kinds.
//!
//! ## Thread safety
//!
//! The slot map is guarded by a `parking_lot::RwLock`; concurrent
//! retain/release on the same entity is safe, as a shared-library boundary
//! requires.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use prism_core::{Error, Result};

/// Opaque, non-owning token denoting one live entity
///
/// Two handles compare equal iff they denote the same entity. `NULL` never
/// resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    /// The null handle; resolving it is always `InvalidHandle`
    pub const NULL: Handle = Handle(0);

    /// Whether this is the null handle
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The raw token bits, for callers crossing an ABI boundary
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Reconstruct a handle from raw token bits
    #[inline]
    pub const fn from_raw(raw: u64) -> Handle {
        Handle(raw)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

struct Slot<T> {
    entity: Arc<T>,
    refs: usize,
}

// One token space for every table: a raw token identifies at most one
// entity process-wide, regardless of entity kind. Token 0 is reserved for
// Handle::NULL.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Table mapping opaque tokens to reference-counted entity slots
pub struct HandleTable<T> {
    slots: RwLock<FxHashMap<u64, Slot<T>>>,
}

impl<T> HandleTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        HandleTable {
            slots: RwLock::new(FxHashMap::default()),
        }
    }

    /// Register an entity and mint its token
    ///
    /// The slot starts with a reference count of 1, held by whichever owner
    /// performed the registration.
    pub fn insert(&self, entity: Arc<T>) -> Handle {
        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        self.slots
            .write()
            .insert(token, Slot { entity, refs: 1 });
        Handle(token)
    }

    /// Resolve a token back to its entity
    ///
    /// Non-owning lookup: the reference count is unaffected. Fails with
    /// `InvalidHandle` for the null token or a token whose entity has been
    /// fully released.
    pub fn resolve(&self, handle: Handle) -> Result<Arc<T>> {
        if handle.is_null() {
            return Err(Error::InvalidHandle("null handle".to_string()));
        }
        self.slots
            .read()
            .get(&handle.0)
            .map(|slot| Arc::clone(&slot.entity))
            .ok_or_else(|| {
                Error::InvalidHandle(format!(
                    "token {} does not resolve to a live entity",
                    handle.0
                ))
            })
    }

    /// Increment the entity's reference count, returning the new count
    pub fn retain(&self, handle: Handle) -> Result<usize> {
        if handle.is_null() {
            return Err(Error::InvalidHandle("null handle".to_string()));
        }
        let mut slots = self.slots.write();
        let slot = slots.get_mut(&handle.0).ok_or_else(|| {
            Error::InvalidHandle(format!("token {} is not live", handle.0))
        })?;
        slot.refs += 1;
        Ok(slot.refs)
    }

    /// Decrement the entity's reference count, returning the new count
    ///
    /// On reaching zero the slot is removed and the entity becomes eligible
    /// for destruction; the token never resolves again.
    pub fn release(&self, handle: Handle) -> Result<usize> {
        if handle.is_null() {
            return Err(Error::InvalidHandle("null handle".to_string()));
        }
        let mut slots = self.slots.write();
        let slot = slots.get_mut(&handle.0).ok_or_else(|| {
            Error::InvalidHandle(format!("token {} is not live", handle.0))
        })?;
        slot.refs -= 1;
        let remaining = slot.refs;
        if remaining == 0 {
            slots.remove(&handle.0);
        }
        Ok(remaining)
    }

    /// Decrement the entity's reference count without freeing the slot
    ///
    /// The count floors at 1 and the entity stays live; used for singleton
    /// entities that must outlive every caller share.
    pub fn release_pinned(&self, handle: Handle) -> Result<usize> {
        if handle.is_null() {
            return Err(Error::InvalidHandle("null handle".to_string()));
        }
        let mut slots = self.slots.write();
        let slot = slots.get_mut(&handle.0).ok_or_else(|| {
            Error::InvalidHandle(format!("token {} is not live", handle.0))
        })?;
        if slot.refs > 1 {
            slot.refs -= 1;
        }
        Ok(slot.refs)
    }

    /// Whether the token currently resolves
    pub fn contains(&self, handle: Handle) -> bool {
        !handle.is_null() && self.slots.read().contains_key(&handle.0)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether the table holds no live entities
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        HandleTable::new()
    }
}
