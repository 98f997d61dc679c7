use alloc::rc::Rc;
use core::cell::Cell;

use crate::storage::{BufferSource, Global, HeapStorage};
use crate::{Error, Result};

pub(crate) const RNG_SEED: u64 = 0x5432_1012_3454_3210;

#[derive(Debug, Default)]
pub(crate) struct DropCounter {
    count: Rc<Cell<usize>>,
}

impl DropCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn new_droppable<T>(&self, value: T) -> Droppable<T> {
        Droppable {
            value,
            counter: Rc::clone(&self.count),
        }
    }

    pub(crate) fn dropped(&self) -> usize {
        self.count.get()
    }
}

#[derive(Debug)]
pub(crate) struct Droppable<T = ()> {
    pub value: T,
    counter: Rc<Cell<usize>>,
}

impl<T: Clone> Clone for Droppable<T> {
    fn clone(&self) -> Self {
        Droppable {
            value: self.value.clone(),
            counter: Rc::clone(&self.counter),
        }
    }
}

impl<T: PartialEq> PartialEq for Droppable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Drop for Droppable<T> {
    fn drop(&mut self) {
        self.counter.set(self.counter.get() + 1);
    }
}

/// Heap buffer source that can be told to refuse every request.
///
/// Clones share the switch and the allocation count, so a test can keep a
/// handle while the container owns another.
#[derive(Clone, Debug, Default)]
pub(crate) struct FailSwitch {
    failing: Rc<Cell<bool>>,
    allocations: Rc<Cell<usize>>,
}

impl FailSwitch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Number of blocks handed out so far.
    pub(crate) fn allocations(&self) -> usize {
        self.allocations.get()
    }
}

impl<T> BufferSource<T> for FailSwitch {
    type Storage = HeapStorage<T>;

    fn unallocated(&self) -> HeapStorage<T> {
        HeapStorage::default()
    }

    fn try_allocate(&mut self, capacity: usize) -> Result<HeapStorage<T>> {
        if self.failing.get() {
            return Err(Error::AllocationFailure { requested: capacity });
        }

        let block = <Global as BufferSource<T>>::try_allocate(&mut Global, capacity)?;
        self.allocations.set(self.allocations.get() + 1);
        Ok(block)
    }
}
