//! Error types reported by fallible container operations.

use core::fmt::{self, Debug, Display, Formatter};

/// The ways an operation on a [`RingVec`](crate::RingVec) can fail.
///
/// Every variant is recoverable: a failed call leaves the container exactly
/// as it was before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The buffer source could not provide a block of `requested` slots.
    #[error("failed to allocate a buffer of {requested} slots")]
    AllocationFailure {
        /// The number of slots that was asked for.
        requested: usize,
    },
    /// An element was requested from an empty container.
    #[error("the container is empty")]
    Underflow,
    /// A logical position was outside the valid range.
    #[error("position {position} is out of range for length {len}")]
    InvalidPosition {
        /// The offending position.
        position: usize,
        /// The length of the container at the time of the call.
        len: usize,
    },
    /// A reservation was smaller than the number of live elements.
    #[error("cannot reserve {requested} slots for {len} live elements")]
    CapacityBelowLength {
        /// The requested capacity.
        requested: usize,
        /// The number of live elements.
        len: usize,
    },
}

/// Error value returned when an element could not be added.
///
/// Owns the rejected element, so a failed insertion never loses the value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InsertError<T> {
    error: Error,
    element: T,
}

impl<T> InsertError<T> {
    #[inline]
    pub(crate) fn new(error: Error, element: T) -> Self {
        InsertError { error, element }
    }

    /// Returns the reason the element was rejected.
    #[inline]
    pub fn error(&self) -> Error {
        self.error
    }

    /// Returns a reference to the rejected element.
    #[inline]
    pub fn element(&self) -> &T {
        &self.element
    }

    /// Takes back ownership of the rejected element.
    ///
    /// # Examples
    /// ```
    /// use ringvec::{Bounded, RingVec};
    ///
    /// let mut v = RingVec::with_increment_in(1, Bounded::new(1));
    /// v.push_back("kept");
    /// let err = v.try_push_back("rejected").unwrap_err();
    /// assert_eq!(err.into_inner(), "rejected");
    /// ```
    #[inline]
    pub fn into_inner(self) -> T {
        self.element
    }
}

impl<T> Display for InsertError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.error, f)
    }
}

impl<T> Debug for InsertError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> core::error::Error for InsertError<T> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<InsertError<T>> for Error {
    fn from(err: InsertError<T>) -> Self {
        err.error
    }
}
