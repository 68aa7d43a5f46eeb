//! Sequential ID allocation for auxiliary CNF variables.
//!
//! `railsat`'s primary variables (`dir`, `occ`) use a direct index formula and never touch this
//! crate — it exists for the one place where variable IDs are *not* known ahead of a fixed
//! formula: the auxiliary counters the sequential-counter encoding allocates on demand. Keeping
//! that bookkeeping in its own small crate mirrors how the allocator is split out from the solver
//! proper upstream.

use fnv::FnvHashMap;

#[cfg(feature = "logging")]
use log::trace;

/// Hands out contiguous positive variable IDs starting right after a caller-supplied watermark,
/// and remembers a debug tag for each one so callers can explain a clause back to a human.
#[derive(Debug, Clone)]
pub struct AuxAllocator<T> {
    next_id: u32,
    tags: FnvHashMap<u32, T>,
}

impl<T> AuxAllocator<T> {
    /// `first_id` is the first ID this allocator will ever hand out; it must be one past the
    /// highest primary variable ID already in use.
    pub fn new(first_id: u32) -> Self {
        assert!(first_id >= 1, "variable IDs are 1-based");
        Self {
            next_id: first_id,
            tags: FnvHashMap::default(),
        }
    }

    /// Allocate the next ID, tagging it with `tag` for later lookup via `tag_of`.
    pub fn alloc(&mut self, tag: T) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.tags.insert(id, tag);
        #[cfg(feature = "logging")]
        trace!("allocated aux variable {}", id);
        id
    }

    /// One past the highest ID handed out so far (i.e. the total variable count if this
    /// allocator's range is the tail of the ID space).
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// How many IDs this allocator has handed out.
    pub fn count(&self) -> u32 {
        self.next_id - self.first_allocated()
    }

    fn first_allocated(&self) -> u32 {
        self.next_id - self.tags.len() as u32
    }

    pub fn tag_of(&self, id: u32) -> Option<&T> {
        self.tags.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_contiguously() {
        let mut a: AuxAllocator<&'static str> = AuxAllocator::new(100);
        assert_eq!(a.alloc("first"), 100);
        assert_eq!(a.alloc("second"), 101);
        assert_eq!(a.next_id(), 102);
        assert_eq!(a.count(), 2);
    }

    #[test]
    fn remembers_tags() {
        let mut a = AuxAllocator::new(1);
        let id = a.alloc((2, 3, 4));
        assert_eq!(a.tag_of(id), Some(&(2, 3, 4)));
        assert_eq!(a.tag_of(id + 1), None);
    }

    #[test]
    #[should_panic]
    fn rejects_zero_watermark() {
        let _: AuxAllocator<()> = AuxAllocator::new(0);
    }
}
