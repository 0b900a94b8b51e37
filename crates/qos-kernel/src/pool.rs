//! Qubit pool arena.
//!
//! The pool is a fixed array of slots. Each slot is either free or owned by
//! a task or a lease; acquisition is all-or-nothing.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KernelError, KernelResult};
use crate::task::TaskId;

/// A slot in the qubit pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitHandle(pub u32);

impl QubitHandle {
    /// Slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Identifier of a client-held lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseId(pub u64);

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lease-{}", self.0)
    }
}

/// Who holds a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Task(TaskId),
    Lease(LeaseId),
}

/// Handles granted by [`crate::Kernel::allocate_qubits`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitLease {
    pub id: LeaseId,
    /// Distinct handles, ascending.
    pub handles: Vec<QubitHandle>,
}

#[derive(Debug)]
pub(crate) struct QubitPool {
    slots: Vec<Option<Owner>>,
    leases: FxHashMap<LeaseId, Vec<QubitHandle>>,
    next_lease: u64,
}

impl QubitPool {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            leases: FxHashMap::default(),
            next_lease: 0,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    #[cfg(test)]
    pub(crate) fn owner_of(&self, handle: QubitHandle) -> Option<Owner> {
        self.slots.get(handle.index()).copied().flatten()
    }

    /// Take the `count` lowest free slots for `owner`.
    pub(crate) fn acquire(&mut self, count: usize, owner: Owner) -> KernelResult<Vec<QubitHandle>> {
        let available = self.free_count();
        if count > available {
            return Err(KernelError::InsufficientResources {
                requested: count,
                available,
            });
        }

        let handles: Vec<QubitHandle> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .take(count)
            .map(|(i, _)| QubitHandle(i as u32))
            .collect();
        for h in &handles {
            self.slots[h.index()] = Some(owner);
        }
        Ok(handles)
    }

    /// Check that `handles` are distinct and in range.
    pub(crate) fn check_handles(&self, handles: &[QubitHandle]) -> KernelResult<()> {
        for (i, &h) in handles.iter().enumerate() {
            if h.index() >= self.slots.len() {
                return Err(KernelError::InvalidHandle(h));
            }
            if handles[..i].contains(&h) {
                return Err(KernelError::DuplicateHandle(h));
            }
        }
        Ok(())
    }

    /// Check that `handles` are distinct, in range and free.
    pub(crate) fn check_specific(&self, handles: &[QubitHandle]) -> KernelResult<()> {
        self.check_handles(handles)?;
        match handles.iter().find(|h| self.slots[h.index()].is_some()) {
            Some(&h) => Err(KernelError::QubitBusy(h)),
            None => Ok(()),
        }
    }

    /// Take exactly `handles` for `owner`.
    pub(crate) fn acquire_specific(
        &mut self,
        handles: &[QubitHandle],
        owner: Owner,
    ) -> KernelResult<()> {
        self.check_specific(handles)?;
        for h in handles {
            self.slots[h.index()] = Some(owner);
        }
        Ok(())
    }

    /// Grant a new lease of `count` handles.
    pub(crate) fn lease(&mut self, count: usize) -> KernelResult<QubitLease> {
        let id = LeaseId(self.next_lease);
        let handles = self.acquire(count, Owner::Lease(id))?;
        self.next_lease += 1;
        self.leases.insert(id, handles.clone());
        Ok(QubitLease { id, handles })
    }

    pub(crate) fn lease_width(&self, id: LeaseId) -> KernelResult<usize> {
        self.leases
            .get(&id)
            .map(Vec::len)
            .ok_or(KernelError::UnknownLease(id))
    }

    /// Return a lease's handles to the pool.
    pub(crate) fn release_lease(&mut self, id: LeaseId) -> KernelResult<Vec<QubitHandle>> {
        let handles = self.leases.remove(&id).ok_or(KernelError::UnknownLease(id))?;
        self.release_owner(Owner::Lease(id));
        Ok(handles)
    }

    /// Hand a lease's handles over to a task.
    pub(crate) fn transfer_lease(
        &mut self,
        id: LeaseId,
        task: TaskId,
    ) -> KernelResult<Vec<QubitHandle>> {
        let handles = self.leases.remove(&id).ok_or(KernelError::UnknownLease(id))?;
        for h in &handles {
            self.slots[h.index()] = Some(Owner::Task(task));
        }
        Ok(handles)
    }

    /// Free every slot held by `owner`, returning how many were freed.
    pub(crate) fn release_owner(&mut self, owner: Owner) -> usize {
        let mut freed = 0;
        for slot in &mut self.slots {
            if *slot == Some(owner) {
                *slot = None;
                freed += 1;
            }
        }
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_lowest_free() {
        let mut pool = QubitPool::new(4);
        let a = pool.acquire(2, Owner::Task(TaskId(0))).unwrap();
        assert_eq!(a, vec![QubitHandle(0), QubitHandle(1)]);
        let b = pool.acquire(1, Owner::Task(TaskId(1))).unwrap();
        assert_eq!(b, vec![QubitHandle(2)]);
        assert_eq!(pool.free_count(), 1);

        pool.release_owner(Owner::Task(TaskId(0)));
        let c = pool.acquire(3, Owner::Task(TaskId(2))).unwrap();
        assert_eq!(c, vec![QubitHandle(0), QubitHandle(1), QubitHandle(3)]);
    }

    #[test]
    fn test_acquire_failure_leaves_pool() {
        let mut pool = QubitPool::new(3);
        pool.acquire(2, Owner::Task(TaskId(0))).unwrap();
        let err = pool.acquire(2, Owner::Task(TaskId(1))).unwrap_err();
        assert!(matches!(
            err,
            KernelError::InsufficientResources {
                requested: 2,
                available: 1
            }
        ));
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.owner_of(QubitHandle(2)), None);
    }

    #[test]
    fn test_specific_checks() {
        let mut pool = QubitPool::new(3);
        pool.acquire_specific(&[QubitHandle(1)], Owner::Task(TaskId(0)))
            .unwrap();

        assert!(matches!(
            pool.acquire_specific(&[QubitHandle(0), QubitHandle(1)], Owner::Task(TaskId(1))),
            Err(KernelError::QubitBusy(QubitHandle(1)))
        ));
        // Nothing taken on failure.
        assert_eq!(pool.owner_of(QubitHandle(0)), None);

        assert!(matches!(
            pool.check_specific(&[QubitHandle(5)]),
            Err(KernelError::InvalidHandle(QubitHandle(5)))
        ));
        assert!(matches!(
            pool.check_specific(&[QubitHandle(2), QubitHandle(2)]),
            Err(KernelError::DuplicateHandle(QubitHandle(2)))
        ));
        assert!(matches!(
            pool.check_handles(&[QubitHandle(1), QubitHandle(1)]),
            Err(KernelError::DuplicateHandle(QubitHandle(1)))
        ));
    }

    #[test]
    fn test_lease_lifecycle() {
        let mut pool = QubitPool::new(4);
        let lease = pool.lease(2).unwrap();
        assert_eq!(lease.id, LeaseId(0));
        assert_eq!(pool.lease_width(lease.id).unwrap(), 2);

        let handles = pool.transfer_lease(lease.id, TaskId(3)).unwrap();
        assert_eq!(handles, lease.handles);
        assert_eq!(pool.owner_of(handles[0]), Some(Owner::Task(TaskId(3))));
        assert!(matches!(
            pool.release_lease(lease.id),
            Err(KernelError::UnknownLease(_))
        ));

        assert_eq!(pool.release_owner(Owner::Task(TaskId(3))), 2);
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn test_failed_lease_does_not_consume_id() {
        let mut pool = QubitPool::new(1);
        assert!(pool.lease(2).is_err());
        assert_eq!(pool.lease(1).unwrap().id, LeaseId(0));
    }
}
