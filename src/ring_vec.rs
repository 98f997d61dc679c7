//! A growable vector implemented with a ring buffer.
//!
//! [`RingVec`] keeps its elements in a single contiguous block, treated as a
//! circle: the live elements occupy `len` consecutive slots starting at some
//! front slot, wrapping around the end of the block if necessary. This gives
//! O(1) indexing like a vector and amortized O(1) pushes and pops at both ends.
//!
//! The buffer is resized in steps of a fixed *increment*, and shrunk back as
//! soon as the unused slots reach a full increment. Each resize moves every
//! element into a freshly allocated block, so positional insertions and
//! removals that need a resize anyway fold the shift into that single copy.
//!
//! An explicit [`reserve`](RingVec::reserve) sets a sticky floor that shrinking
//! never goes below, until the next [`clear`](RingVec::clear).

use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::{FromIterator, FusedIterator};
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ops::{Index, IndexMut};
use core::ptr;

use crate::ring::{Cursor, Ring};
use crate::storage::{BufferSource, ContiguousStorage, Global};
use crate::{Error, InsertError, Result};

/// A growable vector implemented with a ring buffer.
///
/// See the [module-level documentation](crate::ring_vec) for more.
///
/// # Examples
/// ```
/// use ringvec::RingVec;
///
/// let mut v = RingVec::with_increment(4);
/// v.push_back(2);
/// v.push_back(3);
/// v.push_front(1);
/// assert_eq!(v, [1, 2, 3]);
/// assert_eq!(v.capacity(), 4);
///
/// v.insert(1, 7);
/// assert_eq!(v, [1, 7, 2, 3]);
/// assert_eq!(v.remove(2), Ok(2));
/// assert_eq!(v.find(&3), Some(2));
/// ```
pub struct RingVec<T, A: BufferSource<T> = Global> {
    front: usize,
    len: usize,
    increment: usize,
    reserved: usize,
    buf: A::Storage,
    alloc: A,
    elem: PhantomData<T>,
}

/// A snapshot of the internal layout of a [`RingVec`].
///
/// Two containers holding the same elements may have different shapes;
/// equality never looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Total number of slots in the buffer.
    pub capacity: usize,
    /// Number of live elements.
    pub len: usize,
    /// Physical slot of the first element.
    pub front: usize,
    /// Physical slot of the last element, or `None` if empty.
    pub back: Option<usize>,
    /// Number of slots added whenever the buffer is full.
    pub increment: usize,
    /// Capacity floor set by [`RingVec::reserve`], zero if unset.
    pub reserved: usize,
}

/// Optional single-element edit folded into a relocation.
enum Splice<T> {
    Keep,
    /// Leave out the element at this logical position; the caller has already
    /// moved it out.
    Skip(usize),
    Insert(usize, T),
}

#[inline(never)]
#[cold]
#[track_caller]
fn index_out_of_bounds(index: usize, len: usize) -> ! {
    panic!(
        "index out of bounds: the len is {} but the index is {}",
        len, index
    )
}

#[inline]
unsafe fn slice_assume_init<T>(slice: &[MaybeUninit<T>]) -> &[T] {
    &*(slice as *const [MaybeUninit<T>] as *const [T])
}

#[inline]
unsafe fn slice_assume_init_mut<T>(slice: &mut [MaybeUninit<T>]) -> &mut [T] {
    &mut *(slice as *mut [MaybeUninit<T>] as *mut [T])
}

impl<T> RingVec<T> {
    /// Creates an empty `RingVec` that grows one slot at a time.
    ///
    /// Does not allocate.
    ///
    /// # Examples
    /// ```
    /// let v = ringvec::RingVec::<u32>::new();
    /// assert_eq!(v.len(), 0);
    /// assert_eq!(v.capacity(), 0);
    /// assert_eq!(v.increment(), 1);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_increment_in(1, Global)
    }

    /// Creates an empty `RingVec` that grows `increment` slots at a time.
    ///
    /// An increment of zero is treated as one.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::with_increment(10);
    /// v.push_back('a');
    /// assert_eq!(v.capacity(), 10);
    /// ```
    #[inline]
    pub fn with_increment(increment: usize) -> Self {
        Self::with_increment_in(increment, Global)
    }

    /// Creates a `RingVec` holding `items`, in order, with a single allocation.
    ///
    /// The increment is set to the number of items, and the item count becomes
    /// the reserved capacity floor.
    ///
    /// # Examples
    /// ```
    /// let v = ringvec::RingVec::try_from_items([10, 20, 30])?;
    /// assert_eq!(v, [10, 20, 30]);
    /// assert_eq!(v.capacity(), 3);
    /// assert_eq!(v.increment(), 3);
    /// # Ok::<(), ringvec::Error>(())
    /// ```
    pub fn try_from_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Self::try_from_items_in(items, Global)
    }
}

impl<T, A: BufferSource<T>> RingVec<T, A> {
    /// Creates an empty `RingVec` that obtains its buffers from `alloc`.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self::with_increment_in(1, alloc)
    }

    /// Creates an empty `RingVec` that grows `increment` slots at a time and
    /// obtains its buffers from `alloc`.
    ///
    /// An increment of zero is treated as one.
    pub fn with_increment_in(increment: usize, alloc: A) -> Self {
        let buf = alloc.unallocated();
        RingVec {
            front: 0,
            len: 0,
            increment: increment.max(1),
            reserved: 0,
            buf,
            alloc,
            elem: PhantomData,
        }
    }

    /// Creates a `RingVec` holding `items`, in order, with a single allocation
    /// from `alloc`.
    ///
    /// See [`try_from_items`](RingVec::try_from_items).
    pub fn try_from_items_in<I>(items: I, alloc: A) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        let count = items.len();
        Self::from_counted_in(items, count, alloc)
    }

    /// Builds from `items` expected to yield `count` elements. An inaccurate
    /// count only costs extra resizes.
    fn from_counted_in<I: Iterator<Item = T>>(items: I, count: usize, alloc: A) -> Result<Self> {
        let mut result = Self::with_increment_in(count, alloc);
        result.reserve(count)?;
        for item in items {
            result.try_push_back(item)?;
        }

        Ok(result)
    }

    /// Returns the number of elements the `RingVec` can hold without
    /// reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements currently in the `RingVec`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` exactly when the `RingVec` contains zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` exactly when the next push has to reallocate.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Returns the number of slots added whenever the buffer is full.
    #[inline]
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Returns the capacity floor set by the last [`reserve`](RingVec::reserve),
    /// or zero if there is none.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Returns a reference to the buffer source.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns a snapshot of the internal layout.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::with_increment(4);
    /// v.push_back(1);
    /// v.push_front(0);
    ///
    /// let shape = v.shape();
    /// assert_eq!(shape.capacity, 4);
    /// assert_eq!(shape.front, 3);
    /// assert_eq!(shape.back, Some(0));
    /// ```
    pub fn shape(&self) -> Shape {
        Shape {
            capacity: self.capacity(),
            len: self.len,
            front: self.front,
            back: self.back_slot(),
            increment: self.increment,
            reserved: self.reserved,
        }
    }

    #[inline(always)]
    fn ring(&self) -> Ring {
        Ring::new(self.capacity())
    }

    #[inline(always)]
    fn physical_index(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }

        Some(self.ring().add(self.front, index))
    }

    #[inline]
    fn back_slot(&self) -> Option<usize> {
        self.physical_index(self.len.checked_sub(1)?)
    }

    /// Returns a reference to the element at logical position `index`, or
    /// [`None`] if the index is out of bounds.
    ///
    /// The element at index 0 is the front of the sequence.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        let slot = self.physical_index(index)?;
        Some(unsafe { self.buf.storage()[slot].assume_init_ref() })
    }

    /// Returns a mutable reference to the element at logical position `index`,
    /// or [`None`] if the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let slot = self.physical_index(index)?;
        Some(unsafe { self.buf.storage_mut()[slot].assume_init_mut() })
    }

    /// Returns a reference to the element at logical position `index`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPosition`] if the index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// use ringvec::{Error, RingVec};
    ///
    /// let v = RingVec::from([1, 2]);
    /// assert_eq!(v.at(1), Ok(&2));
    /// assert_eq!(v.at(2), Err(Error::InvalidPosition { position: 2, len: 2 }));
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.get(index)
            .ok_or(Error::InvalidPosition { position: index, len })
    }

    /// Returns a mutable reference to the element at logical position `index`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPosition`] if the index is out of bounds.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.get_mut(index)
            .ok_or(Error::InvalidPosition { position: index, len })
    }

    /// Returns a reference to the front element, or [`None`] if the `RingVec` is empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a mutable reference to the front element, or [`None`] if the `RingVec` is empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns a reference to the back element, or [`None`] if the `RingVec` is empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.get(self.len.checked_sub(1)?)
    }

    /// Returns a mutable reference to the back element, or [`None`] if the `RingVec` is empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let index = self.len.checked_sub(1)?;
        self.get_mut(index)
    }

    /// Returns the logical position of the first element equal to `x`, or
    /// [`None`] if there is none.
    ///
    /// # Examples
    /// ```
    /// let v = ringvec::RingVec::from([200, 300, 400]);
    /// assert_eq!(v.find(&400), Some(2));
    /// assert_eq!(v.find(&500), None);
    /// ```
    pub fn find(&self, x: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|e| e == x)
    }

    /// Returns `true` if the `RingVec` contains an element equal to `x`.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        let (a, b) = self.as_slices();
        a.contains(x) || b.contains(x)
    }

    /// Sets the capacity to exactly `capacity` slots and makes it the floor
    /// below which removals will not shrink the buffer.
    ///
    /// Reserving exactly the current length changes nothing. Reserving more
    /// than the current length reallocates unless the capacity already
    /// matches, which may also shrink an oversized buffer. The floor is kept
    /// until [`clear`](RingVec::clear).
    ///
    /// # Errors
    /// Returns [`Error::CapacityBelowLength`] if `capacity` is less than the
    /// current length, or [`Error::AllocationFailure`] if the buffer source
    /// refuses the block. The `RingVec` is unchanged in both cases.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::new();
    /// v.reserve(5)?;
    /// for i in 0..5 {
    ///     v.push_back(i);
    /// }
    /// v.pop_back()?;
    /// v.pop_back()?;
    /// assert_eq!(v.capacity(), 5);
    /// # Ok::<(), ringvec::Error>(())
    /// ```
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.len {
            return Err(Error::CapacityBelowLength {
                requested: capacity,
                len: self.len,
            });
        }

        if capacity > self.len {
            if capacity != self.capacity() {
                self.change_capacity(capacity)?;
            }
            self.reserved = capacity;
        }

        Ok(())
    }

    /// Drops all elements, releases the buffer and removes the capacity floor.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::from([1, 2, 3]);
    /// v.clear();
    /// assert!(v.is_empty());
    /// assert_eq!(v.capacity(), 0);
    /// assert_eq!(v.reserved(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.reserved = 0;
        self.release();
    }

    fn drop_live(&mut self) {
        let (a, b) = self.as_mut_slices();
        let a: *mut [T] = a;
        let b: *mut [T] = b;
        self.len = 0;
        unsafe {
            ptr::drop_in_place(a);
            ptr::drop_in_place(b);
        }
    }

    fn release(&mut self) {
        self.drop_live();
        self.buf = self.alloc.unallocated();
        self.front = 0;
    }

    #[inline]
    fn allocate(&mut self, capacity: usize) -> Result<A::Storage> {
        let buf = self.alloc.try_allocate(capacity)?;
        if buf.capacity() != capacity {
            log::debug!(
                "buffer source returned {} slots instead of {}",
                buf.capacity(),
                capacity
            );
            return Err(Error::AllocationFailure { requested: capacity });
        }

        Ok(buf)
    }

    /// Resizes the buffer, keeping all elements in order. A capacity of zero
    /// releases the buffer and drops all elements.
    fn change_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            self.release();
            return Ok(());
        }

        debug_assert!(capacity >= self.len);
        let buf = self.allocate(capacity)?;
        self.relocate(buf, Splice::Keep);
        Ok(())
    }

    /// Moves the live elements into `buf` starting at slot 0, applying
    /// `splice` on the way, and releases the old buffer.
    fn relocate(&mut self, mut buf: A::Storage, splice: Splice<T>) {
        let old_capacity = self.capacity();
        let len = self.len;
        let dst = buf.get_mut_ptr(0);

        let new_len = unsafe {
            match splice {
                Splice::Keep => {
                    self.move_run(0, len, dst);
                    len
                }
                Splice::Skip(at) => {
                    debug_assert!(at < len);
                    self.move_run(0, at, dst);
                    self.move_run(at + 1, len - at - 1, dst.add(at));
                    len - 1
                }
                Splice::Insert(at, value) => {
                    debug_assert!(at <= len);
                    debug_assert!(len < buf.capacity());
                    self.move_run(0, at, dst);
                    dst.add(at).write(value);
                    self.move_run(at, len - at, dst.add(at + 1));
                    len + 1
                }
            }
        };
        debug_assert!(new_len <= buf.capacity());

        self.buf = buf; // drops previous buffer
        self.front = 0;
        self.len = new_len;

        log::trace!(
            "ring buffer resized from {} to {} slots, {} live",
            old_capacity,
            self.capacity(),
            new_len
        );
    }

    /// Bitwise copies `count` live elements, starting at logical position
    /// `from`, to the contiguous destination `dst`.
    ///
    /// # Safety
    /// `dst` must be valid for `count` writes and must not overlap the buffer.
    /// The copied slots are left logically uninitialized.
    unsafe fn move_run(&self, from: usize, count: usize, dst: *mut T) {
        if count == 0 {
            return;
        }

        let ring = self.ring();
        let start = ring.add(self.front, from);
        let first = usize::min(count, ring.slots() - start);
        ptr::copy_nonoverlapping(self.buf.get_ptr(start), dst, first);
        ptr::copy_nonoverlapping(self.buf.get_ptr(0), dst.add(first), count - first);
    }

    /// Bitwise copies the value in physical slot `src` to physical slot `dst`.
    #[inline]
    unsafe fn move_slot(&mut self, src: usize, dst: usize) {
        let base = self.buf.get_mut_ptr(0);
        ptr::copy_nonoverlapping(base.add(src), base.add(dst), 1);
    }

    fn grow(&mut self) -> Result<()> {
        let capacity = self.capacity().saturating_add(self.increment);
        self.change_capacity(capacity)
    }

    /// Returns `true` if a buffer holding `len` elements has at least a full
    /// increment of unused slots and no floor prevents shrinking it.
    #[inline]
    fn should_shrink_to(&self, len: usize) -> bool {
        debug_assert!(len <= self.capacity());
        self.capacity() - len >= self.increment && (self.reserved == 0 || len >= self.reserved)
    }

    fn shrink_if_slack(&mut self) {
        let len = self.len;
        if !self.should_shrink_to(len) {
            return;
        }

        if let Err(err) = self.change_capacity(len) {
            log::debug!(
                "keeping {} slots for {} elements: {}",
                self.capacity(),
                len,
                err
            );
        }
    }

    /// Appends an element to the back of the `RingVec`, growing the buffer by
    /// one increment if it is full.
    ///
    /// # Errors
    /// Returns the element inside an [`InsertError`] if the buffer had to grow
    /// and the buffer source refused; the `RingVec` is unchanged.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::new();
    /// assert!(v.try_push_back(1).is_ok());
    /// assert!(v.try_push_back(2).is_ok());
    /// assert_eq!(v, [1, 2]);
    /// ```
    pub fn try_push_back(&mut self, value: T) -> core::result::Result<(), InsertError<T>> {
        if self.is_full() {
            if let Err(error) = self.grow() {
                return Err(InsertError::new(error, value));
            }
        }

        let slot = self.ring().add(self.front, self.len);
        self.buf.storage_mut()[slot].write(value);
        self.len += 1;
        Ok(())
    }

    /// Appends an element to the back of the `RingVec`.
    ///
    /// # Panics
    /// Panics if the buffer had to grow and the buffer source refused. See
    /// [`try_push_back`](RingVec::try_push_back) for a checked variant.
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            panic!("failed to push back: {}", err);
        }
    }

    /// Prepends an element to the front of the `RingVec`, growing the buffer
    /// by one increment if it is full.
    ///
    /// # Errors
    /// Returns the element inside an [`InsertError`] if the buffer had to grow
    /// and the buffer source refused; the `RingVec` is unchanged.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::new();
    /// v.try_push_front(3).unwrap();
    /// v.try_push_front(2).unwrap();
    /// v.try_push_front(1).unwrap();
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    pub fn try_push_front(&mut self, value: T) -> core::result::Result<(), InsertError<T>> {
        if self.is_full() {
            if let Err(error) = self.grow() {
                return Err(InsertError::new(error, value));
            }
        }

        let slot = self.ring().prev(self.front);
        self.buf.storage_mut()[slot].write(value);
        self.front = slot;
        self.len += 1;
        Ok(())
    }

    /// Prepends an element to the front of the `RingVec`.
    ///
    /// # Panics
    /// Panics if the buffer had to grow and the buffer source refused. See
    /// [`try_push_front`](RingVec::try_push_front) for a checked variant.
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            panic!("failed to push front: {}", err);
        }
    }

    fn take_back(&mut self) -> Option<T> {
        let slot = self.back_slot()?;
        self.len -= 1;
        Some(unsafe { self.buf.storage()[slot].assume_init_read() })
    }

    fn take_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let slot = self.front;
        self.front = self.ring().next(slot);
        self.len -= 1;
        Some(unsafe { self.buf.storage()[slot].assume_init_read() })
    }

    /// Removes the last element and returns it.
    ///
    /// Shrinks the buffer to the new length if a full increment of slots is
    /// unused and the capacity floor allows it. A failed shrink is ignored.
    ///
    /// # Errors
    /// Returns [`Error::Underflow`] if the `RingVec` is empty.
    ///
    /// # Examples
    /// ```
    /// use ringvec::{Error, RingVec};
    ///
    /// let mut v = RingVec::from([1, 3]);
    /// assert_eq!(v.pop_back(), Ok(3));
    /// assert_eq!(v.pop_back(), Ok(1));
    /// assert_eq!(v.pop_back(), Err(Error::Underflow));
    /// ```
    pub fn pop_back(&mut self) -> Result<T> {
        let value = self.take_back().ok_or(Error::Underflow)?;
        self.shrink_if_slack();
        Ok(value)
    }

    /// Removes the first element and returns it.
    ///
    /// Shrinks the buffer like [`pop_back`](RingVec::pop_back).
    ///
    /// # Errors
    /// Returns [`Error::Underflow`] if the `RingVec` is empty.
    ///
    /// # Examples
    /// ```
    /// use ringvec::{Error, RingVec};
    ///
    /// let mut v = RingVec::from([1, 2]);
    /// assert_eq!(v.pop_front(), Ok(1));
    /// assert_eq!(v.pop_front(), Ok(2));
    /// assert_eq!(v.pop_front(), Err(Error::Underflow));
    /// ```
    pub fn pop_front(&mut self) -> Result<T> {
        let value = self.take_front().ok_or(Error::Underflow)?;
        self.shrink_if_slack();
        Ok(value)
    }

    /// Inserts an element at logical position `index`, shifting all elements
    /// after it towards the back.
    ///
    /// Inserting at `len()` appends and inserting at 0 prepends; inserting at
    /// `len() - 1` places the element before the current last one. If the buffer
    /// is full it is grown by one increment, and the new element is placed
    /// during that copy. Otherwise whichever end is closer to `index` is moved
    /// by one slot to open the gap.
    ///
    /// # Errors
    /// Returns the element inside an [`InsertError`] carrying
    /// [`Error::InvalidPosition`] if `index > len()`, or
    /// [`Error::AllocationFailure`] if the buffer had to grow and the buffer
    /// source refused. The `RingVec` is unchanged in both cases.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::from([10, 20, 30]);
    /// assert!(v.try_insert(1, 99).is_ok());
    /// assert_eq!(v, [10, 99, 20, 30]);
    ///
    /// let err = v.try_insert(9, 0).unwrap_err();
    /// assert_eq!(err.into_inner(), 0);
    /// ```
    pub fn try_insert(&mut self, index: usize, value: T) -> core::result::Result<(), InsertError<T>> {
        let len = self.len;
        if index > len {
            let error = Error::InvalidPosition { position: index, len };
            return Err(InsertError::new(error, value));
        }

        if index == len {
            return self.try_push_back(value);
        }
        if index == 0 {
            return self.try_push_front(value);
        }

        if self.is_full() {
            let capacity = self.capacity().saturating_add(self.increment);
            return match self.allocate(capacity) {
                Ok(buf) => {
                    self.relocate(buf, Splice::Insert(index, value));
                    Ok(())
                }
                Err(error) => Err(InsertError::new(error, value)),
            };
        }

        let ring = self.ring();
        let front = self.front;
        if index < len - index {
            let new_front = ring.prev(front);
            for offset in 0..index {
                unsafe { self.move_slot(ring.add(front, offset), ring.add(new_front, offset)) };
            }
            self.front = new_front;
        } else {
            for offset in (index..len).rev() {
                unsafe { self.move_slot(ring.add(front, offset), ring.add(front, offset + 1)) };
            }
        }

        let slot = ring.add(self.front, index);
        self.buf.storage_mut()[slot].write(value);
        self.len += 1;
        Ok(())
    }

    /// Inserts an element at logical position `index`.
    ///
    /// # Panics
    /// Panics if `index > len()`, or if the buffer had to grow and the buffer
    /// source refused. See [`try_insert`](RingVec::try_insert) for a checked
    /// variant.
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            panic!("failed to insert: {}", err);
        }
    }

    /// Removes and returns the element at logical position `index`.
    ///
    /// If removing the element leaves a full increment of slots unused (and
    /// the capacity floor allows it), the buffer is shrunk and the gap closed
    /// in the same copy. Otherwise whichever end is closer to `index` is
    /// moved by one slot to fill the gap.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPosition`] if `index >= len()`.
    ///
    /// # Examples
    /// ```
    /// let mut v: ringvec::RingVec<_> = (1..=5).collect();
    /// assert_eq!(v.remove(2), Ok(3));
    /// assert_eq!(v, [1, 2, 4, 5]);
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let len = self.len;
        if index >= len {
            return Err(Error::InvalidPosition { position: index, len });
        }

        if index == len - 1 {
            return self.pop_back();
        }
        if index == 0 {
            return self.pop_front();
        }

        let ring = self.ring();
        let front = self.front;
        let slot = ring.add(front, index);

        if self.should_shrink_to(len - 1) {
            match self.allocate(len - 1) {
                Ok(buf) => {
                    let value = unsafe { self.buf.storage()[slot].assume_init_read() };
                    self.relocate(buf, Splice::Skip(index));
                    return Ok(value);
                }
                Err(err) => log::debug!("removing without shrinking: {}", err),
            }
        }

        let value = unsafe { self.buf.storage()[slot].assume_init_read() };
        if index < len - index {
            for offset in (0..index).rev() {
                unsafe { self.move_slot(ring.add(front, offset), ring.add(front, offset + 1)) };
            }
            self.front = ring.next(front);
        } else {
            for offset in index + 1..len {
                unsafe { self.move_slot(ring.add(front, offset), ring.add(front, offset - 1)) };
            }
        }

        self.len -= 1;
        Ok(value)
    }

    /// Appends every element of `items`, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the element that could not be added inside an [`InsertError`].
    /// Elements appended before it stay in the `RingVec`; the rest of `items`
    /// is dropped.
    pub fn try_extend<I: IntoIterator<Item = T>>(
        &mut self,
        items: I,
    ) -> core::result::Result<(), InsertError<T>> {
        for item in items {
            self.try_push_back(item)?;
        }
        Ok(())
    }

    /// Replaces the contents with clones of the elements of `source`.
    ///
    /// The `RingVec` is cleared first and then reserves exactly
    /// `source.len()` slots, so at most one allocation takes place.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailure`] if the reservation fails, in which
    /// case the `RingVec` is left empty.
    ///
    /// # Examples
    /// ```
    /// let source = ringvec::RingVec::from(['x', 'y']);
    /// let mut target = ringvec::RingVec::from(['a', 'b', 'c']);
    /// target.assign_from(&source)?;
    /// assert_eq!(target, source);
    /// assert_eq!(target.capacity(), 2);
    /// # Ok::<(), ringvec::Error>(())
    /// ```
    pub fn assign_from<B: BufferSource<T>>(&mut self, source: &RingVec<T, B>) -> Result<()>
    where
        T: Clone,
    {
        self.clear();
        self.reserve(source.len())?;
        for item in source {
            self.try_push_back(item.clone())?;
        }
        Ok(())
    }

    /// Returns an independent deep copy with the same increment and a clone
    /// of the buffer source.
    ///
    /// The copy's capacity and floor equal the source's length.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailure`] if the buffer source refuses.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        A: Clone,
    {
        let mut copy = Self::with_increment_in(self.increment, self.alloc.clone());
        copy.assign_from(self)?;
        Ok(copy)
    }

    /// Returns a pair of slices which contain, in order, the contents of the
    /// `RingVec`.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::with_increment(4);
    /// v.push_back(2);
    /// v.push_back(1);
    /// v.push_front(3);
    /// assert_eq!(v.as_slices(), (&[3][..], &[2, 1][..]));
    /// ```
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let cap = self.capacity();
        let front = self.front;
        let end = front + self.len;
        let storage = self.buf.storage();

        let (a, b) = if end <= cap {
            (&storage[front..end], &storage[..0])
        } else {
            (&storage[front..], &storage[..end - cap])
        };

        unsafe { (slice_assume_init(a), slice_assume_init(b)) }
    }

    /// Returns a pair of mutable slices which contain, in order, the contents
    /// of the `RingVec`.
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let cap = self.capacity();
        let front = self.front;
        let len = self.len;
        let end = front + len;
        let storage = self.buf.storage_mut();

        let (wrapped, rest) = storage.split_at_mut(front);
        let (a, b) = if end <= cap {
            (&mut rest[..len], &mut wrapped[..0])
        } else {
            (rest, &mut wrapped[..end - cap])
        };

        unsafe { (slice_assume_init_mut(a), slice_assume_init_mut(b)) }
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::with_increment(3);
    /// v.push_back(5);
    /// v.push_back(3);
    /// v.push_front(4);
    ///
    /// let mut it = v.iter();
    /// assert_eq!(it.next(), Some(&4));
    /// assert_eq!(it.next(), Some(&5));
    /// assert_eq!(it.next(), Some(&3));
    /// assert!(it.next().is_none());
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buf: self.buf.storage(),
            cursor: Cursor::new(self.ring(), self.front, self.len),
        }
    }

    /// Returns a front-to-back iterator that returns mutable references.
    ///
    /// # Examples
    /// ```
    /// let mut v = ringvec::RingVec::from([5, 3, 4]);
    /// for num in v.iter_mut() {
    ///     *num -= 2;
    /// }
    /// assert_eq!(v, [3, 1, 2]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let cursor = Cursor::new(self.ring(), self.front, self.len);
        IterMut {
            base: self.buf.get_mut_ptr(0),
            cursor,
            _ref: PhantomData,
        }
    }
}

impl<T, A: BufferSource<T>> Drop for RingVec<T, A> {
    fn drop(&mut self) {
        self.drop_live();
    }
}

impl<T, A: BufferSource<T> + Default> Default for RingVec<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: BufferSource<T>> Index<usize> for RingVec<T, A> {
    type Output = T;

    /// # Panics
    /// Panics if `index` is out of bounds.
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => index_out_of_bounds(index, self.len),
        }
    }
}

impl<T, A: BufferSource<T>> IndexMut<usize> for RingVec<T, A> {
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => index_out_of_bounds(index, len),
        }
    }
}

impl<T: Debug, A: BufferSource<T>> Debug for RingVec<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash, A: BufferSource<T>> Hash for RingVec<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        self.iter().for_each(|x| x.hash(state));
    }
}

impl<T, U, A, B> PartialEq<RingVec<U, B>> for RingVec<T, A>
where
    T: PartialEq<U>,
    A: BufferSource<T>,
    B: BufferSource<U>,
{
    fn eq(&self, other: &RingVec<U, B>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, A: BufferSource<T>> Eq for RingVec<T, A> {}

impl<T, A: BufferSource<T>> RingVec<T, A> {
    fn eq_slice<U>(&self, other: &[U]) -> bool
    where
        T: PartialEq<U>,
    {
        if self.len() != other.len() {
            return false;
        }

        let (front, back) = self.as_slices();
        let mid = front.len();
        front == &other[..mid] && back == &other[mid..]
    }
}

impl<T, U, A, const N: usize> PartialEq<[U; N]> for RingVec<T, A>
where
    T: PartialEq<U>,
    A: BufferSource<T>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.eq_slice(&other[..])
    }
}

impl<T, U, A, const N: usize> PartialEq<&[U; N]> for RingVec<T, A>
where
    T: PartialEq<U>,
    A: BufferSource<T>,
{
    fn eq(&self, other: &&[U; N]) -> bool {
        self.eq_slice(&other[..])
    }
}

impl<T, U, A> PartialEq<&[U]> for RingVec<T, A>
where
    T: PartialEq<U>,
    A: BufferSource<T>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.eq_slice(other)
    }
}

impl<T, U, A> PartialEq<alloc::vec::Vec<U>> for RingVec<T, A>
where
    T: PartialEq<U>,
    A: BufferSource<T>,
{
    fn eq(&self, other: &alloc::vec::Vec<U>) -> bool {
        self.eq_slice(other)
    }
}

impl<T, A, B> PartialOrd<RingVec<T, B>> for RingVec<T, A>
where
    T: PartialOrd,
    A: BufferSource<T>,
    B: BufferSource<T>,
{
    fn partial_cmp(&self, other: &RingVec<T, B>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, A: BufferSource<T>> Ord for RingVec<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Clone, A: BufferSource<T> + Clone> Clone for RingVec<T, A> {
    /// # Panics
    /// Panics if the buffer source refuses the copy's buffer. See
    /// [`try_clone`](RingVec::try_clone) for a checked variant.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("failed to clone: {}", err),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign_from(source) {
            panic!("failed to clone: {}", err);
        }
    }
}

impl<T, A: BufferSource<T>> Extend<T> for RingVec<T, A> {
    /// # Panics
    /// Panics if the buffer has to grow and the buffer source refuses. See
    /// [`try_extend`](RingVec::try_extend) for a checked variant.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push_back(item));
    }
}

impl<'a, T: 'a + Clone, A: BufferSource<T>> Extend<&'a T> for RingVec<T, A> {
    /// # Panics
    /// Panics if the buffer has to grow and the buffer source refuses.
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push_back(item.clone()));
    }
}

impl<T> FromIterator<T> for RingVec<T> {
    /// Iterators reporting an exact size are consumed directly; others are
    /// buffered first so the element count is known up front.
    ///
    /// # Panics
    /// Panics if the buffer cannot be allocated.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items = iter.into_iter();
        let built = match items.size_hint() {
            (lower, Some(upper)) if lower == upper => Self::from_counted_in(items, lower, Global),
            _ => Self::try_from_items(items.collect::<alloc::vec::Vec<T>>()),
        };
        match built {
            Ok(result) => result,
            Err(err) => panic!("failed to collect: {}", err),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for RingVec<T> {
    /// # Panics
    /// Panics if the buffer cannot be allocated. See
    /// [`try_from_items`](RingVec::try_from_items) for a checked variant.
    fn from(items: [T; N]) -> Self {
        match Self::try_from_items(items) {
            Ok(result) => result,
            Err(err) => panic!("failed to build from array: {}", err),
        }
    }
}

/// An iterator over the elements of a [`RingVec`].
///
/// This `struct` is created by the [`iter`](RingVec::iter) method on [`RingVec`].
/// See its documentation for more.
pub struct Iter<'a, T> {
    buf: &'a [MaybeUninit<T>],
    cursor: Cursor,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            buf: self.buf,
            cursor: self.cursor.clone(),
        }
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let slot = self.cursor.next()?;
        let buf: &'a [MaybeUninit<T>] = self.buf;
        Some(unsafe { buf[slot].assume_init_ref() })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.cursor.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        let slot = self.cursor.next_back()?;
        let buf: &'a [MaybeUninit<T>] = self.buf;
        Some(unsafe { buf[slot].assume_init_ref() })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// An iterator over the elements of a [`RingVec`] that returns mutable
/// references.
///
/// This `struct` is created by the [`iter_mut`](RingVec::iter_mut) method on
/// [`RingVec`]. See its documentation for more.
pub struct IterMut<'a, T> {
    base: *mut T,
    cursor: Cursor,
    _ref: PhantomData<&'a mut T>,
}

unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<T> Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.cursor.len())
            .finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        let slot = self.cursor.next()?;
        Some(unsafe { &mut *self.base.add(slot) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.cursor.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        let slot = self.cursor.next_back()?;
        Some(unsafe { &mut *self.base.add(slot) })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// A consuming iterator over the elements of a [`RingVec`].
///
/// This `struct` is created by the `into_iter` method on [`RingVec`] (provided
/// by the [`IntoIterator`] trait). Elements are moved out without
/// reallocating the buffer.
pub struct IntoIter<T, A: BufferSource<T> = Global> {
    inner: RingVec<T, A>,
}

impl<T: Debug, A: BufferSource<T>> Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T, A: BufferSource<T>> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.take_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.len(), Some(self.inner.len()))
    }
}

impl<T, A: BufferSource<T>> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.take_back()
    }
}

impl<T, A: BufferSource<T>> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: BufferSource<T>> FusedIterator for IntoIter<T, A> {}

impl<T, A: BufferSource<T>> IntoIterator for RingVec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { inner: self }
    }
}

impl<'a, T, A: BufferSource<T>> IntoIterator for &'a RingVec<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: BufferSource<T>> IntoIterator for &'a mut RingVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DropCounter, Droppable, FailSwitch, RNG_SEED};
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;

    fn assert_invariants<T, A: BufferSource<T>>(v: &RingVec<T, A>) {
        let shape = v.shape();
        assert!(shape.len <= shape.capacity);
        if shape.capacity == 0 {
            assert_eq!(shape.len, 0);
            assert_eq!(shape.front, 0);
        } else {
            assert!(shape.front < shape.capacity);
        }
        assert!(shape.reserved == 0 || shape.capacity >= shape.reserved);
        assert!(
            shape.capacity - shape.len < shape.increment || shape.len < shape.reserved,
            "too much slack: {:?}",
            shape
        );
        assert_eq!(v.iter().count(), shape.len);
    }

    #[test]
    fn push_back_then_erase_in_the_middle() {
        let mut v = RingVec::new();
        for i in 1..=5 {
            v.push_back(i);
        }
        assert_eq!(v.len(), 5);
        assert_eq!(v.capacity(), 5);
        assert_eq!(v.find(&3), Some(2));

        assert_eq!(v.remove(2), Ok(3));
        assert_eq!(v, [1, 2, 4, 5]);
        assert_eq!(v.capacity(), 4);
        assert_invariants(&v);
    }

    #[test]
    fn push_front_builds_in_reverse() {
        let mut v = RingVec::new();
        v.push_front(3);
        v.push_front(2);
        v.push_front(1);
        assert_eq!(v, [1, 2, 3]);
        assert_eq!(v.front(), Some(&1));
        assert_eq!(v.back(), Some(&3));
        assert_invariants(&v);
    }

    #[test]
    fn insert_into_full_buffer_then_pop() {
        let mut v = RingVec::try_from_items([10, 20, 30]).unwrap();
        assert_eq!(v.shape().reserved, 3);

        v.try_insert(1, 99).unwrap();
        assert_eq!(v, [10, 99, 20, 30]);
        assert_eq!(v.capacity(), 6);

        assert_eq!(v.pop_back(), Ok(30));
        assert_eq!(v, [10, 99, 20]);
        assert_eq!(v.capacity(), 3);
        assert_invariants(&v);
    }

    #[test]
    fn reserve_sets_a_floor() {
        let mut v = RingVec::new();
        v.reserve(5).unwrap();
        for i in 0..5 {
            v.push_back(i);
        }
        for _ in 0..3 {
            v.pop_back().unwrap();
        }
        assert_eq!(v.capacity(), 5);
        assert_eq!(v, [0, 1]);

        v.clear();
        assert_eq!(v.reserved(), 0);
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn reserve_is_idempotent() {
        let mut v = RingVec::from([1, 2, 3]);
        v.reserve(8).unwrap();
        let shape = v.shape();
        v.reserve(8).unwrap();
        assert_eq!(v.shape(), shape);
        assert_eq!(v.capacity(), 8);
        assert_eq!(v, [1, 2, 3]);

        assert_eq!(
            v.reserve(2),
            Err(Error::CapacityBelowLength { requested: 2, len: 3 })
        );
        assert_eq!(v.shape(), shape);

        v.reserve(3).unwrap();
        assert_eq!(v.shape(), shape);

        v.reserve(4).unwrap();
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.reserved(), 4);
    }

    #[test]
    fn pops_on_empty_underflow() {
        let mut v = RingVec::<u8>::new();
        assert_eq!(v.pop_back(), Err(Error::Underflow));
        assert_eq!(v.pop_front(), Err(Error::Underflow));
        assert_eq!(v.front(), None);
        assert_eq!(v.back(), None);
        assert_eq!(v.shape().back, None);
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let mut v = RingVec::from(['a', 'b']);
        assert_eq!(v.get(2), None);
        assert_eq!(v.at(2), Err(Error::InvalidPosition { position: 2, len: 2 }));
        assert_eq!(v.remove(2), Err(Error::InvalidPosition { position: 2, len: 2 }));

        let err = v.try_insert(3, 'z').unwrap_err();
        assert_eq!(err.error(), Error::InvalidPosition { position: 3, len: 2 });
        assert_eq!(err.into_inner(), 'z');
        assert_eq!(v, ['a', 'b']);

        v.try_insert(2, 'c').unwrap();
        assert_eq!(v, ['a', 'b', 'c']);
    }

    #[test]
    #[should_panic(expected = "index out of bounds: the len is 3 but the index is 3")]
    fn indexing_past_the_end_panics() {
        let v = RingVec::from([1, 2, 3]);
        let _value = v[3];
    }

    #[test]
    fn index_follows_logical_order() {
        let mut v = RingVec::with_increment(4);
        v.push_back(1);
        v.push_back(2);
        v.push_front(0);
        v.push_front(-1);
        assert!(v.is_full());
        assert_eq!(v.shape().front, 2);

        for (i, expected) in (-1..=2).enumerate() {
            assert_eq!(v[i], expected);
        }
        v[3] = 20;
        *v.at_mut(0).unwrap() = -10;
        *v.back_mut().unwrap() += 1;
        *v.front_mut().unwrap() -= 1;
        assert_eq!(v, [-11, 0, 1, 21]);
    }

    #[test]
    fn all_insertion_cases() {
        // every position, in every rotation of a buffer with one free slot
        for front in 0..6 {
            for index in 0..=5 {
                let mut v: RingVec<i32> = RingVec::with_increment(6);
                v.reserve(6).unwrap();
                for _ in 0..front {
                    v.push_back(0);
                    v.pop_front().unwrap();
                }
                for i in 0..5 {
                    v.push_back(i);
                }
                assert_eq!(v.shape().front, front);

                let mut expected: Vec<i32> = (0..5).collect();
                expected.insert(index, 99);
                v.insert(index, 99);

                assert_eq!(v, expected, "front {} index {}", front, index);
                assert_eq!(v.capacity(), 6);
                assert_invariants(&v);
            }
        }
    }

    #[test]
    fn all_removal_cases() {
        for front in 0..6 {
            for index in 0..6 {
                let mut v: RingVec<i32> = RingVec::with_increment(6);
                v.reserve(6).unwrap();
                for _ in 0..front {
                    v.push_back(0);
                    v.pop_front().unwrap();
                }
                for i in 0..6 {
                    v.push_back(i);
                }
                assert_eq!(v.shape().front, front);

                let mut expected: Vec<i32> = (0..6).collect();
                let removed = expected.remove(index);
                assert_eq!(v.remove(index), Ok(removed));

                assert_eq!(v, expected, "front {} index {}", front, index);
                assert_eq!(v.capacity(), 6);
                assert_invariants(&v);
            }
        }
    }

    #[test]
    fn shift_touches_the_closer_end() {
        let mut v = RingVec::with_increment(8);
        v.reserve(8).unwrap();
        for i in 0..6 {
            v.push_back(i);
        }

        v.insert(1, 10);
        assert_eq!(v.shape().front, 7);
        assert_eq!(v.as_slices(), (&[0][..], &[10, 1, 2, 3, 4, 5][..]));

        v.insert(6, 11);
        assert_eq!(v.shape().front, 7);
        assert_eq!(v, [0, 10, 1, 2, 3, 4, 11, 5]);

        assert_eq!(v.remove(1), Ok(10));
        assert_eq!(v.shape().front, 0);
        assert_eq!(v.remove(5), Ok(11));
        assert_eq!(v.shape().front, 0);
        assert_eq!(v, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn insert_then_remove_round_trips() {
        let base = [3, 1, 4, 1, 5, 9, 2, 6];
        for increment in 1..4 {
            for index in 0..=base.len() {
                let mut v = RingVec::with_increment(increment);
                for &x in &base[..4] {
                    v.push_front(x);
                }
                for &x in &base[4..] {
                    v.push_back(x);
                }
                let before: Vec<i32> = v.iter().copied().collect();
                let capacity = v.capacity();

                v.insert(index, 0);
                assert_eq!(v[index], 0);
                assert_eq!(v.remove(index), Ok(0));
                assert_eq!(v, before);
                assert!(v.capacity() <= capacity + increment);
                assert_invariants(&v);
            }
        }
    }

    #[test]
    fn growth_is_amortized_by_the_increment() {
        let source = FailSwitch::new();
        let mut v = RingVec::with_increment_in(4, source.clone());
        for i in 0..8 {
            v.push_back(i);
        }
        assert_eq!(source.allocations(), 2);
        assert_eq!(v.capacity(), 8);

        v.push_front(-1);
        assert_eq!(source.allocations(), 3);
        assert_eq!(v.capacity(), 12);
        assert_eq!(v.shape().front, 11);

        assert_eq!(v.pop_front(), Ok(-1));
        assert_eq!(source.allocations(), 4);
        assert_eq!(v.capacity(), 8);

        for _ in 0..3 {
            v.pop_front().unwrap();
        }
        assert_eq!(source.allocations(), 4);

        v.pop_front().unwrap();
        assert_eq!(source.allocations(), 5);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v, [4, 5, 6, 7]);
    }

    #[test]
    fn full_insert_and_shrinking_remove_allocate_once() {
        let source = FailSwitch::new();
        let mut v = RingVec::with_increment_in(2, source.clone());
        for i in 0..4 {
            v.push_back(i);
        }
        let allocations = source.allocations();

        v.insert(2, 7);
        assert_eq!(source.allocations(), allocations + 1);
        assert_eq!(v, [0, 1, 7, 2, 3]);
        assert_eq!(v.capacity(), 6);

        v.insert(3, 8);
        assert_eq!(v.remove(2), Ok(7));
        assert_eq!(v.capacity(), 6);
        assert_eq!(v.remove(2), Ok(8));
        assert_eq!(source.allocations(), allocations + 2);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.shape().front, 0);
        assert_eq!(v, [0, 1, 2, 3]);
    }

    #[test]
    fn failed_growth_leaves_everything_untouched() {
        let source = FailSwitch::new();
        let mut v = RingVec::with_increment_in(3, source.clone());
        v.push_back(2);
        v.push_back(3);
        v.push_front(1);
        assert!(v.is_full());
        let shape = v.shape();

        source.fail(true);
        let err = v.try_push_back(4).unwrap_err();
        assert_eq!(err.error(), Error::AllocationFailure { requested: 6 });
        assert_eq!(err.into_inner(), 4);

        let err = v.try_push_front(0).unwrap_err();
        assert_eq!(err.into_inner(), 0);

        let err = v.try_insert(1, 9).unwrap_err();
        assert_eq!(err.error(), Error::AllocationFailure { requested: 6 });
        assert_eq!(err.into_inner(), 9);

        assert_eq!(v.reserve(10), Err(Error::AllocationFailure { requested: 10 }));

        assert_eq!(v.shape(), shape);
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn failed_shrink_is_tolerated() {
        let source = FailSwitch::new();
        let mut v = RingVec::with_increment_in(2, source.clone());
        for i in 0..6 {
            v.push_back(i);
        }
        v.push_back(6);
        assert_eq!(v.capacity(), 8);

        source.fail(true);
        assert_eq!(v.pop_back(), Ok(6));
        assert_eq!(v.pop_back(), Ok(5));
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.remove(1), Ok(1));
        assert_eq!(v.remove(2), Ok(3));
        assert_eq!(v.capacity(), 8);
        assert_eq!(v, [0, 2, 4]);

        source.fail(false);
        assert_eq!(v.pop_front(), Ok(0));
        assert_eq!(v.capacity(), 2);
        assert_eq!(v, [2, 4]);
    }

    #[test]
    fn iteration_covers_a_full_wrapped_buffer() {
        let mut v = RingVec::with_increment(4);
        v.push_back(3);
        v.push_back(4);
        v.push_front(2);
        v.push_front(1);
        assert!(v.is_full());
        assert_eq!(v.shape().front, 2);
        assert_eq!(v.shape().back, Some(1));

        let items: Vec<_> = v.iter().copied().collect();
        assert_eq!(items, [1, 2, 3, 4]);
        let reversed: Vec<_> = v.iter().rev().copied().collect();
        assert_eq!(reversed, [4, 3, 2, 1]);
        assert_eq!(v.iter().len(), 4);

        for x in &mut v {
            *x *= 10;
        }
        assert_eq!(v.as_slices(), (&[10, 20][..], &[30, 40][..]));

        let mut into_iter = v.into_iter();
        assert_eq!(into_iter.next_back(), Some(40));
        assert_eq!(into_iter.next(), Some(10));
        assert_eq!(into_iter.len(), 2);
        let rest: Vec<_> = into_iter.collect();
        assert_eq!(rest, [20, 30]);
    }

    #[test]
    fn empty_container_iterates_nothing() {
        let mut v = RingVec::<u32>::with_increment(3);
        assert_eq!(v.iter().next(), None);
        assert_eq!(v.iter_mut().next_back(), None);

        v.push_back(1);
        assert_eq!(v.pop_front(), Ok(1));
        assert_eq!(v.capacity(), 0);

        v.reserve(3).unwrap();
        v.push_back(1);
        assert_eq!(v.pop_front(), Ok(1));
        assert_eq!(v.capacity(), 3);
        assert_eq!(v.shape().front, 1);
        assert_eq!(v.iter().next(), None);
        let (a, b) = v.as_slices();
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn equality_ignores_layout() {
        let a = RingVec::from([1, 2, 3, 4]);

        let mut b = RingVec::with_increment(7);
        b.push_back(3);
        b.push_back(4);
        b.push_front(2);
        b.push_front(1);
        b.reserve(9).unwrap();

        let mut c = RingVec::with_increment(2);
        c.push_back(2);
        c.push_back(3);
        c.push_back(4);
        c.push_front(1);

        assert_ne!(a.shape(), b.shape());
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(b, c);
        assert_eq!(a, c);
        assert_eq!(c, &[1, 2, 3, 4][..]);
        assert_eq!(c, &[1, 2, 3, 4]);
        assert_eq!(c, alloc::vec![1, 2, 3, 4]);

        c.pop_back().unwrap();
        assert_ne!(a, c);
        assert!(c < a);
        assert_eq!(c.cmp(&c), Ordering::Equal);
        assert_eq!(RingVec::<u8>::new(), RingVec::<u8>::with_increment(5));
    }

    #[test]
    fn hashing_ignores_layout() {
        use rustc_hash::FxHasher;

        fn fx_hash<T: Hash>(value: &T) -> u64 {
            let mut hasher = FxHasher::default();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let a = RingVec::from([1u8, 2, 3, 4, 5]);
        let mut b = RingVec::with_increment(5);
        for x in (1u8..=3).rev() {
            b.push_front(x);
        }
        b.push_back(4);
        b.push_back(5);
        assert_ne!(a.shape().front, b.shape().front);

        assert_eq!(fx_hash(&a), fx_hash(&b));
        b.pop_back().unwrap();
        assert_ne!(fx_hash(&a), fx_hash(&b));
    }

    #[test]
    fn clones_are_independent() {
        use alloc::string::String;

        let mut original = RingVec::with_increment(3);
        original.push_back(String::from("b"));
        original.push_front(String::from("a"));

        let copy = original.try_clone().unwrap();
        assert_eq!(copy, original);
        assert_eq!(copy.increment(), 3);
        assert_eq!(copy.capacity(), 2);
        assert_eq!(copy.reserved(), 2);

        original[0].push('!');
        assert_eq!(copy[0], "a");
        assert_eq!(original[0], "a!");

        let mut target = RingVec::from([String::new(), String::new(), String::new()]);
        target.clone_from(&copy);
        assert_eq!(target, copy);
        assert_eq!(target.capacity(), 2);
    }

    #[test]
    fn failed_assignment_leaves_target_empty() {
        let source = RingVec::from([1, 2, 3]);
        let switch = FailSwitch::new();
        let mut target: RingVec<i32, FailSwitch> = RingVec::with_increment_in(2, switch.clone());
        target.extend(&[7, 8]);

        switch.fail(true);
        assert_eq!(
            target.assign_from(&source),
            Err(Error::AllocationFailure { requested: 3 })
        );
        assert!(target.is_empty());
        assert_eq!(target.capacity(), 0);
        assert!(target.try_clone().is_ok());
    }

    #[test]
    fn bulk_construction() {
        let v: RingVec<_> = (0..4).collect();
        assert_eq!(v, [0, 1, 2, 3]);
        assert_eq!(v.increment(), 4);
        assert_eq!(v.capacity(), 4);

        let empty = RingVec::<u8>::try_from_items(Vec::new()).unwrap();
        assert_eq!(empty.increment(), 1);
        assert_eq!(empty.capacity(), 0);

        let bounded = RingVec::try_from_items_in([1, 2, 3], crate::Bounded::new(2));
        assert_eq!(bounded.err(), Some(Error::AllocationFailure { requested: 3 }));

        let mut v = RingVec::with_increment_in(1, crate::Bounded::new(3));
        let err = v.try_extend(1..=5).unwrap_err();
        assert_eq!(err.into_inner(), 4);
        assert_eq!(v, [1, 2, 3]);
        assert!(v.contains(&2));
        assert!(!v.contains(&4));
    }

    #[test]
    fn collect_counts_items_without_buffering_exact_iterators() {
        let v: RingVec<u32> = (0..10).filter(|x| x % 3 == 0).collect();
        assert_eq!(v, [0, 3, 6, 9]);
        assert_eq!(v.increment(), 4);
        assert_eq!(v.capacity(), 4);

        let v: RingVec<u32> = (0..6).map(|x| x * 2).collect();
        assert_eq!(v, [0, 2, 4, 6, 8, 10]);
        assert_eq!(v.capacity(), 6);

        struct Overpromise(core::ops::Range<u32>);

        impl Iterator for Overpromise {
            type Item = u32;

            fn next(&mut self) -> Option<u32> {
                self.0.next()
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (2, Some(2))
            }
        }

        let v: RingVec<u32> = Overpromise(0..5).collect();
        assert_eq!(v, [0, 1, 2, 3, 4]);
        assert_eq!(v.increment(), 2);
        assert_invariants(&v);
    }

    #[test]
    fn short_blocks_are_refused() {
        use crate::storage::HeapStorage;

        #[derive(Clone, Debug, Default)]
        struct Stingy;

        impl<T> BufferSource<T> for Stingy {
            type Storage = HeapStorage<T>;

            fn unallocated(&self) -> HeapStorage<T> {
                HeapStorage::default()
            }

            fn try_allocate(&mut self, _: usize) -> Result<HeapStorage<T>> {
                <Global as BufferSource<T>>::try_allocate(&mut Global, 1)
            }
        }

        let mut v = RingVec::with_increment_in(1, Stingy);
        v.push_back(1);
        assert_eq!(v.capacity(), 1);

        let err = v.try_push_back(2).unwrap_err();
        assert_eq!(err.error(), Error::AllocationFailure { requested: 2 });
        assert_eq!(v.try_push_front(0).unwrap_err().into_inner(), 0);
        assert_eq!(v.try_insert(0, 3).unwrap_err().into_inner(), 3);
        assert_eq!(v.reserve(4), Err(Error::AllocationFailure { requested: 4 }));
        assert_eq!(v.len(), 1);
        assert_eq!(v.capacity(), 1);
        assert_eq!(v, [1]);

        assert_eq!(v.pop_back(), Ok(1));
        assert_eq!(v.capacity(), 0);
        assert!(v.try_clone().is_ok());
    }

    #[test]
    fn zero_increment_is_clamped() {
        let mut v = RingVec::with_increment(0);
        assert_eq!(v.increment(), 1);
        v.push_back(());
        v.push_back(());
        assert_eq!(v.capacity(), 2);
        assert_eq!(v.remove(0), Ok(()));
        assert_eq!(v.capacity(), 1);
    }

    #[test]
    fn elements_are_dropped_exactly_once() {
        let drop_count = DropCounter::new();
        let mut v: RingVec<Droppable<usize>> = RingVec::with_increment(3);
        for i in 0..10 {
            if i % 2 == 0 {
                v.push_back(drop_count.new_droppable(i));
            } else {
                v.push_front(drop_count.new_droppable(i));
            }
        }
        assert_eq!(drop_count.dropped(), 0);

        v.insert(4, drop_count.new_droppable(100));
        v.insert(9, drop_count.new_droppable(101));
        assert_eq!(drop_count.dropped(), 0);

        assert_eq!(v.remove(4).unwrap().value, 100);
        assert_eq!(drop_count.dropped(), 1);
        assert_eq!(v.pop_back().unwrap().value, 8);
        assert_eq!(v.pop_front().unwrap().value, 9);
        assert_eq!(drop_count.dropped(), 3);

        let mut into_iter = v.clone().into_iter();
        assert_eq!(drop_count.dropped(), 3);
        assert_eq!(into_iter.next().unwrap().value, 7);
        assert_eq!(drop_count.dropped(), 4);
        drop(into_iter);
        assert_eq!(drop_count.dropped(), 12);

        v.clear();
        assert_eq!(drop_count.dropped(), 21);

        v.push_back(drop_count.new_droppable(0));
        drop(v);
        assert_eq!(drop_count.dropped(), 22);
    }

    #[test]
    fn randomized_operations_match_vec_deque() {
        use rand::{rngs::SmallRng, Rng, SeedableRng};
        let mut rng = SmallRng::seed_from_u64(RNG_SEED);

        for round in 0..50 {
            let increment = rng.gen_range(1..6);
            let mut v = RingVec::with_increment(increment);
            let mut model = VecDeque::new();

            for step in 0..400 {
                let value: u32 = rng.gen();
                match rng.gen_range(0..10) {
                    0 | 1 => {
                        v.push_back(value);
                        model.push_back(value);
                    }
                    2 | 3 => {
                        v.push_front(value);
                        model.push_front(value);
                    }
                    4 => assert_eq!(v.pop_back().ok(), model.pop_back()),
                    5 => assert_eq!(v.pop_front().ok(), model.pop_front()),
                    6 => {
                        let index = rng.gen_range(0..=model.len());
                        v.insert(index, value);
                        model.insert(index, value);
                    }
                    7 | 8 => {
                        let index = rng.gen_range(0..=model.len());
                        assert_eq!(v.remove(index).ok(), model.remove(index));
                    }
                    _ => {
                        if rng.gen_ratio(1, 8) {
                            v.clear();
                            model.clear();
                        } else {
                            let extra = rng.gen_range(0..8);
                            v.reserve(model.len() + extra).unwrap();
                        }
                    }
                }

                assert_eq!(v.len(), model.len(), "round {} step {}", round, step);
                assert!(v.iter().eq(model.iter()), "round {} step {}", round, step);
                assert!(v.iter().rev().eq(model.iter().rev()));
                assert_invariants(&v);
            }
        }
    }
}
