//! Fixed-capacity slot arena
//!
//! Slots are allocated once at construction and never resized. An explicit
//! active bitset tracks which slots are live. Released slots keep stale data
//! until the next `acquire` overwrites them completely.

/// Index of a slot inside a `Pool`
pub type SlotId = usize;

const WORD_BITS: usize = 64;

/// A fixed-size pool of `T` slots
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Box<[T]>,
    active: Box<[u64]>,
    live: usize,
}

impl<T: Default> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        let slots: Vec<T> = (0..capacity).map(|_| T::default()).collect();
        Self {
            slots: slots.into_boxed_slice(),
            active: vec![0u64; capacity.div_ceil(WORD_BITS)].into_boxed_slice(),
            live: 0,
        }
    }
}

impl<T> Pool<T> {
    #[inline]
    fn bit(index: SlotId) -> (usize, u64) {
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of active slots
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_full(&self) -> bool {
        self.live == self.slots.len()
    }

    #[inline]
    pub fn is_active(&self, index: SlotId) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        let (word, mask) = Self::bit(index);
        self.active[word] & mask != 0
    }

    /// First inactive slot, if any
    fn first_free(&self) -> Option<SlotId> {
        for (word_idx, &word) in self.active.iter().enumerate() {
            if word != u64::MAX {
                let index = word_idx * WORD_BITS + (!word).trailing_zeros() as usize;
                return (index < self.slots.len()).then_some(index);
            }
        }
        None
    }

    /// Claim the first free slot, overwriting it with `value`.
    ///
    /// Returns `None` when the pool is exhausted; callers skip the spawn.
    pub fn acquire(&mut self, value: T) -> Option<SlotId> {
        let index = self.first_free()?;
        self.slots[index] = value;
        let (word, mask) = Self::bit(index);
        self.active[word] |= mask;
        self.live += 1;
        Some(index)
    }

    /// Mark a slot inactive. Releasing an inactive slot is a no-op.
    pub fn release(&mut self, index: SlotId) {
        if !self.is_active(index) {
            return;
        }
        let (word, mask) = Self::bit(index);
        self.active[word] &= !mask;
        self.live -= 1;
    }

    /// Release every slot
    pub fn clear(&mut self) {
        self.active.iter_mut().for_each(|w| *w = 0);
        self.live = 0;
    }

    pub fn get(&self, index: SlotId) -> Option<&T> {
        self.is_active(index).then(|| &self.slots[index])
    }

    pub fn get_mut(&mut self, index: SlotId) -> Option<&mut T> {
        if self.is_active(index) {
            Some(&mut self.slots[index])
        } else {
            None
        }
    }

    /// Active slots in index order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        let active = &self.active;
        self.slots.iter().enumerate().filter(move |(i, _)| {
            let (word, mask) = Self::bit(*i);
            active[word] & mask != 0
        })
    }

    /// Active slots in index order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> + '_ {
        let active = &self.active;
        self.slots.iter_mut().enumerate().filter(move |(i, _)| {
            let (word, mask) = Self::bit(*i);
            active[word] & mask != 0
        })
    }

    /// Release every active slot for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for index in 0..self.slots.len() {
            if self.is_active(index) && !keep(&mut self.slots[index]) {
                self.release(index);
            }
        }
    }

    /// True if any active slot matches
    pub fn any(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.iter().any(|(_, t)| pred(t))
    }

    /// Count active slots matching
    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.iter().filter(|(_, t)| pred(t)).count()
    }
}
