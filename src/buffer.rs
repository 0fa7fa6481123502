//! Fixed-size sliding window with a designated center slot.
//!
//! The window always holds `size` slots, logical index 0 being the oldest.
//! Slots admitted by `skip` (or present since the last reset) are invalid.
//! A monotone cursor starts at `-size`, so `abs_position(i)` equals the
//! 1-based admission index of slot `i` once real data has filled the ring.

#[derive(Debug, Clone)]
pub struct SlidingBuffer<T> {
    slots: Vec<T>,
    valid: Vec<bool>,
    head: usize,
    pos: i64,
    center: usize,
}

impl<T: Copy + Default> SlidingBuffer<T> {
    pub fn new(size: usize) -> Self {
        assert!(size > 0);
        Self {
            slots: vec![T::default(); size],
            valid: vec![false; size],
            head: 0,
            pos: -(size as i64),
            center: size / 2,
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Empties the window: every slot invalid, cursor back at `-size`.
    pub fn reset(&mut self) {
        self.slots.fill(T::default());
        self.valid.fill(false);
        self.head = 0;
        self.pos = -(self.size() as i64);
    }

    /// Admits a valid value, returning the evicted oldest one.
    pub fn put(&mut self, value: T) -> T {
        self.advance(value, true)
    }

    /// Admits an invalid placeholder, returning the evicted oldest value.
    pub fn skip(&mut self) -> T {
        self.advance(T::default(), false)
    }

    fn advance(&mut self, value: T, valid: bool) -> T {
        self.pos += 1;
        let evicted = self.slots[self.head];
        self.slots[self.head] = value;
        self.valid[self.head] = valid;
        self.head = (self.head + 1) % self.size();
        evicted
    }

    pub fn get(&self, index: usize) -> T {
        self.slots[self.physical(index)]
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.valid[self.physical(index)]
    }

    pub fn invalidate(&mut self, index: usize) {
        let i = self.physical(index);
        self.valid[i] = false;
    }

    pub fn center_index(&self) -> usize {
        self.center
    }

    pub fn center(&self) -> T {
        self.get(self.center)
    }

    pub fn center_available(&self) -> bool {
        self.is_valid(self.center)
    }

    /// Signed slot distance from the center.
    pub fn pos_from_center(&self, index: usize) -> i64 {
        index as i64 - self.center as i64
    }

    /// Admission index of slot `index`; `index` may point one past the end
    /// to address the next admission.
    pub fn abs_position(&self, index: usize) -> i64 {
        index as i64 + self.pos
    }

    fn physical(&self, index: usize) -> usize {
        debug_assert!(index < self.size());
        (self.head + index) % self.size()
    }
}
