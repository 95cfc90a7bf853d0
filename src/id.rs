//! Object identifiers written to the id buffer for picking.

/// Identifier of a pickable object. Negative values are not pickable.
pub type ObjectId = i32;

/// Id of primitives that never win a pick.
pub const NO_OBJECT: ObjectId = -1;

/// Hands out object ids for one scene.
///
/// Ids start at 0 and increase by one per call. Dropping the allocator along
/// with its scene is the only way to start over.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: ObjectId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ObjectId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> usize {
        self.next as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_pickable() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), 0);
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.allocated(), 2);
        assert!(NO_OBJECT < 0);
    }

    #[test]
    fn allocators_are_independent() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        a.allocate();
        assert_eq!(b.allocate(), 0);
    }
}
