use std::collections::{vec_deque, VecDeque};

/// Where new items land and which end is evicted once the list is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// Append at the back, evict from the front.
    DropOldest,
    /// Insert at the front, truncate from the back.
    PrependTruncate,
}

/// Fixed-capacity ordered list.
///
/// Eviction happens before insertion, so `len() <= capacity()` holds at every
/// point, not only between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedList<T> {
    items: VecDeque<T>,
    capacity: usize,
    eviction: Eviction,
}

impl<T> BoundedList<T> {
    pub fn new(capacity: usize, eviction: Eviction) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            eviction,
        }
    }

    pub fn fifo(capacity: usize) -> Self {
        Self::new(capacity, Eviction::DropOldest)
    }

    pub fn prepend_truncate(capacity: usize) -> Self {
        Self::new(capacity, Eviction::PrependTruncate)
    }

    /// Builds a list by pushing `items` in iteration order.
    pub fn seeded(
        capacity: usize,
        eviction: Eviction,
        items: impl IntoIterator<Item = T>,
    ) -> Self {
        let mut list = Self::new(capacity, eviction);
        for item in items {
            list.push(item);
        }
        list
    }

    /// Inserts per the eviction policy and returns the evicted item, if any.
    /// With zero capacity the pushed item itself is returned.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }

        let evicted = if self.items.len() >= self.capacity {
            match self.eviction {
                Eviction::DropOldest => self.items.pop_front(),
                Eviction::PrependTruncate => self.items.pop_back(),
            }
        } else {
            None
        };

        match self.eviction {
            Eviction::DropOldest => self.items.push_back(item),
            Eviction::PrependTruncate => self.items.push_front(item),
        }

        evicted
    }

    /// The most recently pushed item.
    pub fn newest(&self) -> Option<&T> {
        match self.eviction {
            Eviction::DropOldest => self.items.back(),
            Eviction::PrependTruncate => self.items.front(),
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<'a, T> IntoIterator for &'a BoundedList<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
