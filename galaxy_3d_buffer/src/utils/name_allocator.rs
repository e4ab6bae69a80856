use rustc_hash::FxHashSet;

use crate::context::BufferId;

/// Allocates and recycles device buffer names.
///
/// Names start at 1 (0 is the device's "no buffer" name). Freed names are
/// recycled on subsequent allocations, last freed first, and a name is only
/// accepted back once: freeing a name that is not live is reported instead
/// of corrupting the free list.
///
/// # Example
///
/// ```ignore
/// let mut names = NameAllocator::new();
/// let a = names.alloc().unwrap();  // 1
/// let b = names.alloc().unwrap();  // 2
/// names.free(a);                   // 1 is now available
/// let c = names.alloc().unwrap();  // 1 (recycled)
/// ```
pub struct NameAllocator {
    free_list: Vec<BufferId>,
    live: FxHashSet<BufferId>,
    next_name: u32,
}

impl NameAllocator {
    /// Create a new empty allocator
    pub fn new() -> Self {
        Self {
            free_list: Vec::new(),
            live: FxHashSet::default(),
            next_name: 1,
        }
    }

    /// Allocate the next available name, `None` once the name space is exhausted
    pub fn alloc(&mut self) -> Option<BufferId> {
        let id = match self.free_list.pop() {
            Some(id) => id,
            None => {
                let id = BufferId::new(self.next_name)?;
                self.next_name = self.next_name.checked_add(1)?;
                id
            }
        };
        self.live.insert(id);
        Some(id)
    }

    /// Return a name to the pool; false if it was not live
    pub fn free(&mut self, id: BufferId) -> bool {
        if !self.live.remove(&id) {
            return false;
        }
        self.free_list.push(id);
        true
    }

    /// Whether `id` is currently allocated
    pub fn is_live(&self, id: BufferId) -> bool {
        self.live.contains(&id)
    }

    /// Highest name ever handed out
    pub fn high_water_mark(&self) -> u32 {
        self.next_name - 1
    }

    /// Number of currently allocated names
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no names are currently allocated
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "name_allocator_tests.rs"]
mod tests;
