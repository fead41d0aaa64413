//! Arena slots and entry handles for the ordered list

/// Key/value pair held by a live slot
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Handle to an entry stored in a [`List`](crate::List)
///
/// Returned by [`List::prepend`](crate::List::prepend) and
/// [`List::append`](crate::List::append). A handle only resolves while its
/// entry is still linked: once the entry is removed the slot's generation
/// moves on and the old handle is ignored by every list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// Slot in the list arena
///
/// `prev`/`next` are arena indices of the neighbours in traversal order.
/// They never own anything; the arena `Vec` owns every slot.
pub(crate) struct Slot<K, V> {
    pub(crate) prev: usize,
    pub(crate) next: usize,
    pub(crate) generation: u32,
    /// `None` for sentinels and for slots sitting on the free list
    pub(crate) entry: Option<Entry<K, V>>,
}

impl<K, V> Slot<K, V> {
    pub(crate) fn sentinel(prev: usize, next: usize) -> Self {
        Self {
            prev,
            next,
            generation: 0,
            entry: None,
        }
    }

    pub(crate) fn occupied(key: K, value: V) -> Self {
        Self {
            prev: 0,
            next: 0,
            generation: 0,
            entry: Some(Entry { key, value }),
        }
    }

    pub(crate) fn is_live(&self, generation: u32) -> bool {
        self.generation == generation && self.entry.is_some()
    }
}
