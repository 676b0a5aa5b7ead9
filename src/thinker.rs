//! The thinker list: a circular, doubly-linked list with a sentinel node
//! (`thinkercap`) and two-phase deferred removal.
//!
//! Vanilla never frees a thinker mid-iteration: `P_RemoveThinker` just
//! swaps its function pointer for a stub (`P_RemoveThinkerDelayed`) so
//! the *next* pass through `P_RunThinkers` frees it instead, because the
//! list is singly-threaded through `next` pointers that a live iterator
//! is mid-walk of. Here the list is a `Vec<Slot<T>>` addressed by a
//! stable `ThinkerId` (never reused while an entry is pending removal),
//! and removal is the same two-phase drain: `remove()` marks a slot
//! `PendingRemoval`, and `run_all()` compacts those out at the end of its
//! pass rather than while iterating.
//!
//! `T` is a closed, data-only behavior enum (see `specials::SpecialThinker`)
//! rather than a trait object: the mapping from a thinker to its behavior
//! is a plain stored value, not a vtable pointer, so `run_all` takes the
//! step function as its caller's single dispatch point instead of each
//! slot carrying one.

use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThinkerId(pub u32);

enum Slot<T> {
    Live(T),
    PendingRemoval,
    Empty,
}

pub struct ThinkerList<T> {
    slots: Vec<Slot<T>>,
    next_id: u32,
    free_list: Vec<u32>,
}

impl<T> Default for ThinkerList<T> {
    fn default() -> Self {
        ThinkerList { slots: Vec::new(), next_id: 0, free_list: Vec::new() }
    }
}

impl<T> ThinkerList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `P_AddThinker` — append to the tail of the (conceptual) circular
    /// list. The actual storage is flat; iteration order is slot order,
    /// which is the same traversal order a real linked list gives since
    /// new thinkers are only ever appended.
    pub fn add(&mut self, thinker: T) -> ThinkerId {
        if let Some(id) = self.free_list.pop() {
            self.slots[id as usize] = Slot::Live(thinker);
            return ThinkerId(id);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(Slot::Live(thinker));
        ThinkerId(id)
    }

    /// `P_RemoveThinker` — defer the actual free to the end of the next
    /// `run_all` pass so a thinker can safely remove itself or another
    /// thinker mid-iteration without invalidating the cursor.
    pub fn remove(&mut self, id: ThinkerId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            *slot = Slot::PendingRemoval;
        }
    }

    pub fn get_mut(&mut self, id: ThinkerId) -> Option<&mut T> {
        match self.slots.get_mut(id.0 as usize) {
            Some(Slot::Live(t)) => Some(t),
            _ => None,
        }
    }

    pub fn is_live(&self, id: ThinkerId) -> bool {
        matches!(self.slots.get(id.0 as usize), Some(Slot::Live(_)))
    }

    /// `P_RunThinkers` — run every live thinker once through `step`, then
    /// drain anything that asked for removal (either via a `false` return
    /// or an explicit `remove()` call made during this pass). `step`
    /// returning `false` requests removal, matching a thinker's own
    /// `think()` returning `false` under the old trait-object design.
    pub fn run_all(&mut self, mut step: impl FnMut(&mut T) -> bool) {
        let mut to_remove = Vec::new();
        for i in 0..self.slots.len() {
            let should_remove = match &mut self.slots[i] {
                Slot::Live(t) => !step(t),
                Slot::PendingRemoval => true,
                Slot::Empty => false,
            };
            if should_remove {
                to_remove.push(i as u32);
            }
        }
        for id in to_remove {
            self.slots[id as usize] = Slot::Empty;
            self.free_list.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, Slot::Live(_))).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use alloc::rc::Rc;

    struct CountingThinker {
        runs: Rc<RefCell<u32>>,
        die_after: u32,
    }

    fn tick(t: &mut CountingThinker) -> bool {
        let mut r = t.runs.borrow_mut();
        *r += 1;
        *r < t.die_after
    }

    #[test]
    fn add_and_run_increments() {
        let mut list = ThinkerList::new();
        let runs = Rc::new(RefCell::new(0));
        list.add(CountingThinker { runs: runs.clone(), die_after: 1000 });
        list.run_all(tick);
        list.run_all(tick);
        assert_eq!(*runs.borrow(), 2);
    }

    #[test]
    fn self_removal_is_deferred_one_pass() {
        let mut list = ThinkerList::new();
        let runs = Rc::new(RefCell::new(0));
        let id = list.add(CountingThinker { runs: runs.clone(), die_after: 2 });
        list.run_all(tick); // runs=1, still alive
        assert!(list.is_live(id));
        list.run_all(tick); // runs=2, tick() returns false -> removed at end of this pass
        assert!(!list.is_live(id));
    }

    #[test]
    fn explicit_remove_is_compacted_next_pass() {
        let mut list = ThinkerList::new();
        let runs = Rc::new(RefCell::new(0));
        let id = list.add(CountingThinker { runs, die_after: 1000 });
        list.remove(id);
        assert!(!list.is_live(id)); // pending removal, not Live anymore
        list.run_all(tick);
        assert!(!list.is_live(id));
    }

    #[test]
    fn freed_slot_is_reused() {
        let mut list = ThinkerList::new();
        let runs = Rc::new(RefCell::new(0));
        let id1 = list.add(CountingThinker { runs: runs.clone(), die_after: 1 });
        list.run_all(tick);
        assert!(!list.is_live(id1));
        let id2 = list.add(CountingThinker { runs, die_after: 1000 });
        assert_eq!(id2, id1);
    }
}
