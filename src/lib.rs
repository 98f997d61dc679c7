#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! A growable vector over a circular buffer, for targets where memory is
//! scarce and reallocation is expensive.
//!
//! [`RingVec`] stores its elements in one contiguous block used as a ring, so
//! elements can be added and removed at both ends in amortized constant time
//! while indexing stays O(1). Capacity changes happen in steps of a fixed
//! growth increment, and the buffer is shrunk again once a full increment of
//! slots is unused. An explicit [`reserve`](RingVec::reserve) pins a capacity
//! floor below which it never shrinks.
//!
//! Buffers come from a [`BufferSource`]. [`Global`] uses the global heap,
//! reporting exhaustion as an [`Error`] instead of aborting; [`Bounded`] caps
//! the block size for memory-budgeted targets. Every fallible operation
//! leaves the container unchanged when it fails.
//!
//! ```
//! use ringvec::{Error, RingVec};
//!
//! let mut queue = RingVec::with_increment(8);
//! queue.push_back("b");
//! queue.push_back("c");
//! queue.push_front("a");
//! assert_eq!(queue, ["a", "b", "c"]);
//!
//! assert_eq!(queue.pop_front(), Ok("a"));
//! assert_eq!(queue.remove(5), Err(Error::InvalidPosition { position: 5, len: 2 }));
//! ```
//!
//! The crate is `no_std` and only requires the `alloc` crate. Resizes are
//! reported through the [`log`](https://docs.rs/log) facade at `trace` level.

extern crate alloc;

pub mod error;
mod ring;
pub mod ring_vec;
pub mod storage;

#[cfg(test)]
mod test_utils;

pub use crate::error::{Error, InsertError};
pub use crate::ring_vec::{IntoIter, Iter, IterMut, RingVec, Shape};
pub use crate::storage::{Bounded, BufferSource, ContiguousStorage, Global, HeapStorage};

/// Shorthand for results of fallible container operations.
pub type Result<T> = core::result::Result<T, Error>;
