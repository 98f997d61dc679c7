//! Traits providing genericity over where element buffers come from.
//!
//! A [`RingVec`](crate::RingVec) never grows its buffer in place. Every
//! capacity change asks a [`BufferSource`] for a fresh [`ContiguousStorage`]
//! block, moves the live elements over and releases the old block. A source
//! that refuses a request leaves the container untouched.

use core::mem::MaybeUninit;

use crate::{Error, Result};

/// A fixed-size block of element slots owned by a container.
///
/// # Safety
/// Implementors must ensure the length of the slices returned by
/// [`storage`](ContiguousStorage::storage) and
/// [`storage_mut`](ContiguousStorage::storage_mut) never changes, and that
/// both refer to the same memory.
pub unsafe trait ContiguousStorage<T>: Sized {
    /// Returns every slot of the block.
    fn storage(&self) -> &[MaybeUninit<T>];
    /// Returns every slot of the block, mutably.
    fn storage_mut(&mut self) -> &mut [MaybeUninit<T>];

    /// Returns the number of slots in the block.
    #[inline]
    fn capacity(&self) -> usize {
        self.storage().len()
    }

    /// Returns a raw pointer to slot `index`, which may be one past the end.
    ///
    /// The slot may be uninitialized; reading through the pointer is up to
    /// the caller.
    #[inline]
    fn get_ptr(&self, index: usize) -> *const T {
        debug_assert!(index <= self.storage().len());
        self.storage().as_ptr().wrapping_add(index) as _
    }

    /// Returns a raw mutable pointer to slot `index`, which may be one past
    /// the end.
    #[inline]
    fn get_mut_ptr(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.storage_mut().len());
        self.storage_mut().as_mut_ptr().wrapping_add(index) as _
    }
}

/// Shorthand for [`alloc::boxed::Box<[MaybeUninit<T>]>`](alloc::boxed::Box),
/// the block type handed out by [`Global`] and [`Bounded`].
pub type HeapStorage<T> = alloc::boxed::Box<[MaybeUninit<T>]>;

unsafe impl<T> ContiguousStorage<T> for HeapStorage<T> {
    #[inline]
    fn storage(&self) -> &[MaybeUninit<T>] {
        self
    }
    #[inline]
    fn storage_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self
    }
}

/// A provider of element buffers.
///
/// Implementations decide how much memory a container may obtain. Refusing a
/// request is not a programming error; the container reports it as
/// [`Error::AllocationFailure`] and keeps its previous buffer.
pub trait BufferSource<T> {
    /// The block type produced by this source.
    type Storage: ContiguousStorage<T>;

    /// Returns a zero-capacity block without allocating.
    fn unallocated(&self) -> Self::Storage;

    /// Attempts to obtain a block of exactly `capacity` uninitialized slots.
    ///
    /// Containers reject a block of any other size as
    /// [`Error::AllocationFailure`].
    fn try_allocate(&mut self, capacity: usize) -> Result<Self::Storage>;
}

/// The global heap, accessed fallibly.
///
/// Allocation failures, including capacity overflow, are reported instead of
/// aborting the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

impl<T> BufferSource<T> for Global {
    type Storage = HeapStorage<T>;

    #[inline]
    fn unallocated(&self) -> HeapStorage<T> {
        HeapStorage::default()
    }

    fn try_allocate(&mut self, capacity: usize) -> Result<HeapStorage<T>> {
        let mut slots = alloc::vec::Vec::new();
        if slots.try_reserve_exact(capacity).is_err() {
            log::debug!("global heap refused a block of {} slots", capacity);
            return Err(Error::AllocationFailure { requested: capacity });
        }

        slots.resize_with(capacity, MaybeUninit::uninit);
        Ok(slots.into_boxed_slice())
    }
}

/// The global heap with an upper bound on block size.
///
/// Requests for more than `limit` slots are refused, which lets a container
/// run under a fixed memory budget on targets where exhausting the heap is
/// not an option.
///
/// # Examples
/// ```
/// use ringvec::{Bounded, Error, RingVec};
///
/// let mut v = RingVec::with_increment_in(2, Bounded::new(4));
/// v.push_back(1);
/// v.push_back(2);
/// v.push_back(3);
/// v.push_back(4);
/// assert_eq!(v.capacity(), 4);
///
/// let err = v.try_push_back(5).unwrap_err();
/// assert_eq!(err.error(), Error::AllocationFailure { requested: 6 });
/// assert_eq!(v, [1, 2, 3, 4]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounded {
    limit: usize,
}

impl Bounded {
    /// Creates a source that hands out blocks of at most `limit` slots.
    #[inline]
    pub const fn new(limit: usize) -> Self {
        Bounded { limit }
    }

    /// Returns the largest block size this source will hand out.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<T> BufferSource<T> for Bounded {
    type Storage = HeapStorage<T>;

    #[inline]
    fn unallocated(&self) -> HeapStorage<T> {
        HeapStorage::default()
    }

    fn try_allocate(&mut self, capacity: usize) -> Result<HeapStorage<T>> {
        if capacity > self.limit {
            log::debug!(
                "refusing a block of {} slots, the limit is {}",
                capacity,
                self.limit
            );
            return Err(Error::AllocationFailure { requested: capacity });
        }

        <Global as BufferSource<T>>::try_allocate(&mut Global, capacity)
    }
}
