//! Bucketed slot storage with stable indices
//!
//! Slots live in fixed-size buckets that are never reallocated, so a value
//! keeps its address and its index for as long as it is stored. Indices map
//! to buckets with a shift and mask. Freed slots are reused lowest-index
//! first.

use std::mem::{size_of, MaybeUninit};

/// Upper bound for the payload footprint of a single bucket.
const BUCKET_BYTE_BUDGET: usize = 1024 * 1024;

struct Bucket<E> {
    occupied: Box<[bool]>,
    slots: Box<[MaybeUninit<E>]>,
}

impl<E> Bucket<E> {
    fn new(len: usize) -> Self {
        Self {
            occupied: vec![false; len].into_boxed_slice(),
            slots: std::iter::repeat_with(MaybeUninit::uninit).take(len).collect(),
        }
    }
}

impl<E> Drop for Bucket<E> {
    fn drop(&mut self) {
        for (slot, occupied) in self.slots.iter_mut().zip(self.occupied.iter()) {
            if *occupied {
                unsafe {
                    // SAFETY: occupied slots hold an initialized value.
                    slot.assume_init_drop();
                }
            }
        }
    }
}

/// Slot storage that hands out the lowest free index on every `add`.
pub struct EntityStorage<E> {
    buckets: Vec<Bucket<E>>,
    first_free: usize,
    len: usize,
}

impl<E> EntityStorage<E> {
    /// Largest power of two that keeps one bucket within the byte budget.
    pub const BUCKET_LEN: usize = bit_floor(BUCKET_BYTE_BUDGET / non_zero_size::<E>());
    const SHIFT: u32 = Self::BUCKET_LEN.trailing_zeros();
    const MASK: usize = Self::BUCKET_LEN - 1;

    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            first_free: 0,
            len: 0,
        }
    }

    #[inline]
    fn split(index: usize) -> (usize, usize) {
        (index >> Self::SHIFT, index & Self::MASK)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots backed by allocated buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len() * Self::BUCKET_LEN
    }

    /// Store `value` in the lowest free slot.
    pub fn add(&mut self, value: E) -> (&mut E, usize) {
        let index = self.first_free;
        let (bucket, local) = Self::split(index);

        while self.buckets.len() <= bucket {
            self.buckets.push(Bucket::new(Self::BUCKET_LEN));
        }

        let target = &mut self.buckets[bucket];
        debug_assert!(!target.occupied[local], "slot {index} handed out twice");
        target.slots[local].write(value);
        target.occupied[local] = true;
        self.len += 1;

        self.advance_first_free();

        let value = unsafe {
            // SAFETY: written just above.
            self.buckets[bucket].slots[local].assume_init_mut()
        };
        (value, index)
    }

    /// Move the value out of `index`, leaving the slot free for reuse.
    ///
    /// Returns `None` if the slot is not occupied.
    pub fn remove(&mut self, index: usize) -> Option<E> {
        let (bucket, local) = Self::split(index);
        let target = self.buckets.get_mut(bucket)?;
        if !target.occupied[local] {
            return None;
        }

        target.occupied[local] = false;
        let value = unsafe {
            // SAFETY: the slot was occupied and is now marked free, so the
            // value is read exactly once.
            target.slots[local].assume_init_read()
        };
        self.len -= 1;

        if index < self.first_free {
            self.first_free = index;
        }
        Some(value)
    }

    /// Borrow an occupied slot. Empty slots and missing buckets yield `None`.
    pub fn get(&self, index: usize) -> Option<&E> {
        let (bucket, local) = Self::split(index);
        let target = self.buckets.get(bucket)?;
        if !target.occupied[local] {
            return None;
        }
        Some(unsafe {
            // SAFETY: occupancy checked above.
            target.slots[local].assume_init_ref()
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        let (bucket, local) = Self::split(index);
        let target = self.buckets.get_mut(bucket)?;
        if !target.occupied[local] {
            return None;
        }
        Some(unsafe {
            // SAFETY: occupancy checked above.
            target.slots[local].assume_init_mut()
        })
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Iterate occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &E)> {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(bucket, b)| {
                b.slots
                    .iter()
                    .zip(b.occupied.iter())
                    .enumerate()
                    .filter(|(_, (_, occupied))| **occupied)
                    .map(move |(local, (slot, _))| {
                        let value = unsafe {
                            // SAFETY: filtered to occupied slots.
                            slot.assume_init_ref()
                        };
                        ((bucket << Self::SHIFT) | local, value)
                    })
            })
    }

    // Skip forward over occupied slots; stops at the first free slot or at
    // the end of the allocated buckets.
    fn advance_first_free(&mut self) {
        loop {
            let (bucket, local) = Self::split(self.first_free);
            match self.buckets.get(bucket) {
                Some(b) if b.occupied[local] => self.first_free += 1,
                _ => break,
            }
        }
    }
}

impl<E> Default for EntityStorage<E> {
    fn default() -> Self {
        Self::new()
    }
}

const fn non_zero_size<E>() -> usize {
    let size = size_of::<E>();
    if size == 0 {
        1
    } else {
        size
    }
}

const fn bit_floor(value: usize) -> usize {
    if value == 0 {
        1
    } else {
        1 << (usize::BITS - 1 - value.leading_zeros())
    }
}
