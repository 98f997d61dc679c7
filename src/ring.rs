//! Wrap-aware index arithmetic over a fixed number of slots.
//!
//! [`Ring`] translates between logical offsets and physical slots, and
//! [`Cursor`] walks a live run of slots from both ends. Neither type knows
//! anything about the elements stored in those slots.

/// Modular arithmetic over `slots` physical positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ring {
    slots: usize,
}

impl Ring {
    #[inline]
    pub(crate) const fn new(slots: usize) -> Self {
        Ring { slots }
    }

    #[inline]
    pub(crate) fn slots(self) -> usize {
        self.slots
    }

    /// Returns the slot `addend` positions after `index`.
    #[inline]
    pub(crate) fn add(self, index: usize, addend: usize) -> usize {
        debug_assert!(index < self.slots);
        debug_assert!(addend <= self.slots);
        (index + addend) % self.slots
    }

    /// Returns the slot `subtrahend` positions before `index`.
    #[inline]
    pub(crate) fn sub(self, index: usize, subtrahend: usize) -> usize {
        debug_assert!(index < self.slots);
        debug_assert!(subtrahend <= self.slots);
        (index + self.slots - subtrahend) % self.slots
    }

    #[inline]
    pub(crate) fn next(self, index: usize) -> usize {
        self.add(index, 1)
    }

    #[inline]
    pub(crate) fn prev(self, index: usize) -> usize {
        self.sub(index, 1)
    }

    /// Returns `true` if a run of `len` slots starting at `front` crosses
    /// the last physical slot.
    #[inline]
    pub(crate) fn wraps(self, front: usize, len: usize) -> bool {
        front + len > self.slots
    }
}

/// Double-ended walk over the live run `[front, front + len)`.
///
/// `head` starts at the front slot. `tail` is the end sentinel, one past the
/// back slot; it is only reduced modulo the slot count when the run wraps, so
/// for a run ending in the last slot it equals `slots`. Stepping is a plain
/// increment unless the run wraps.
///
/// A full buffer that wraps has `head == tail` before the first step, so
/// exhaustion is decided by `remaining`, not by comparing positions.
#[derive(Clone, Debug)]
pub(crate) struct Cursor {
    ring: Ring,
    wrapped: bool,
    head: usize,
    tail: usize,
    remaining: usize,
}

impl Cursor {
    pub(crate) fn new(ring: Ring, front: usize, len: usize) -> Self {
        debug_assert!(len <= ring.slots());
        let (wrapped, tail) = if len == 0 {
            (false, front)
        } else {
            (ring.wraps(front, len), ring.add(front, len - 1) + 1)
        };

        Cursor {
            ring,
            wrapped,
            head: front,
            tail,
            remaining: len,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.remaining
    }

    /// Yields the physical slot of the next element from the front.
    #[inline]
    pub(crate) fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        let slot = self.head;
        self.head = if self.wrapped {
            self.ring.next(self.head)
        } else {
            self.head + 1
        };
        self.remaining -= 1;
        debug_assert!(self.remaining != 0 || self.head == self.tail);

        Some(slot)
    }

    /// Yields the physical slot of the next element from the back.
    #[inline]
    pub(crate) fn next_back(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        self.tail = if self.wrapped {
            self.ring.prev(self.tail)
        } else {
            self.tail - 1
        };
        self.remaining -= 1;
        debug_assert!(self.remaining != 0 || self.head == self.tail);

        Some(self.tail)
    }
}
