//! Append-only logs shared between successive game states.
//!
//! Every transition clones the whole `GameState`, so the move and position
//! logs are persistent lists: a clone shares all existing entries and a push
//! allocates one node. Serialized as a plain sequence, oldest entry first.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

struct Node<T> {
    item: T,
    prev: Option<Arc<Node<T>>>,
}

pub struct History<T> {
    head: Option<Arc<Node<T>>>,
    len: usize,
}

impl<T> History<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, item: T) {
        let prev = self.head.take();
        self.head = Some(Arc::new(Node { item, prev }));
        self.len += 1;
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.item)
    }

    /// Entries from newest to oldest.
    pub fn recent(&self) -> Recent<'_, T> {
        Recent {
            next: self.head.as_deref(),
        }
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.recent().any(|entry| entry == item)
    }

    /// Entries from oldest to newest.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut items: Vec<T> = self.recent().cloned().collect();
        items.reverse();
        items
    }
}

pub struct Recent<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Recent<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next.map(|node| {
            self.next = node.prev.as_deref();
            &node.item
        })
    }
}

impl<T> Clone for History<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlinks nodes one at a time so a long log cannot overflow the stack.
impl<T> Drop for History<T> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            let Ok(mut node) = Arc::try_unwrap(node) else {
                break;
            };
            next = node.prev.take();
        }
    }
}

impl<T: PartialEq> PartialEq for History<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.recent().eq(other.recent())
    }
}

impl<T: Eq> Eq for History<T> {}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<&T> = self.recent().collect();
        items.reverse();
        f.debug_list().entries(items).finish()
    }
}

impl<T> FromIterator<T> for History<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut history = Self::new();
        for item in iter {
            history.push(item);
        }
        history
    }
}

impl<T> From<Vec<T>> for History<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Serialize> Serialize for History<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut items: Vec<&T> = self.recent().collect();
        items.reverse();
        serializer.collect_seq(items)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for History<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}
