//! Injected buffer allocators

use crate::error::OffsetError;
use crate::index::Index;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Allocation capability passed to every primitive
///
/// Implementors decide whether a request of `bytes` may proceed; the provided
/// methods perform the actual allocation once it is granted.
pub trait BufferAllocator: Send + Sync {
    /// Account for an allocation of `bytes`
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::AllocationLimit` if the request is refused
    fn reserve(&self, bytes: usize) -> Result<(), OffsetError>;

    /// Allocate a zero-filled buffer of `len` elements
    ///
    /// # Errors
    ///
    /// Returns error if `reserve` refuses the request
    fn allocate_zeroed<T: Index>(&self, len: usize) -> Result<Vec<T>, OffsetError>
    where
        Self: Sized,
    {
        self.reserve(len.saturating_mul(std::mem::size_of::<T>()))?;
        Ok(vec![T::ZERO; len])
    }
}

/// Allocator that grants every request
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn reserve(&self, _bytes: usize) -> Result<(), OffsetError> {
        Ok(())
    }
}

/// Allocator that counts requests and optionally enforces a byte budget
///
/// The budget is cumulative over the allocator's lifetime; buffers handed to
/// callers are never returned to it.
#[derive(Debug, Default)]
pub struct TrackingAllocator {
    allocations: AtomicUsize,
    bytes: AtomicUsize,
    budget: Option<usize>,
}

impl TrackingAllocator {
    /// Unbounded tracking allocator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracking allocator refusing requests beyond `budget` bytes in total
    #[must_use]
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget: Some(budget),
            ..Self::default()
        }
    }

    /// Number of granted allocations
    #[must_use]
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Total bytes granted
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }
}

impl BufferAllocator for TrackingAllocator {
    fn reserve(&self, bytes: usize) -> Result<(), OffsetError> {
        let budget = self.budget;
        self.bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                let next = used.checked_add(bytes)?;
                match budget {
                    Some(limit) if next > limit => None,
                    _ => Some(next),
                }
            })
            .map_err(|used| OffsetError::AllocationLimit {
                requested: bytes,
                available: budget.unwrap_or(usize::MAX).saturating_sub(used),
            })?;

        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_allocator_zeroed() {
        let buf: Vec<u64> = SystemAllocator.allocate_zeroed(4).unwrap();
        assert_eq!(buf, vec![0; 4]);
    }

    #[test]
    fn test_tracking_allocator_counts() {
        let alloc = TrackingAllocator::new();
        let _a: Vec<u32> = alloc.allocate_zeroed(10).unwrap();
        let _b: Vec<u64> = alloc.allocate_zeroed(2).unwrap();

        assert_eq!(alloc.allocations(), 2);
        assert_eq!(alloc.bytes(), 10 * 4 + 2 * 8);
    }

    #[test]
    fn test_tracking_allocator_budget() {
        let alloc = TrackingAllocator::with_budget(16);
        let _ok: Vec<u32> = alloc.allocate_zeroed(3).unwrap();

        let err = alloc.allocate_zeroed::<u32>(2).unwrap_err();
        assert_eq!(
            err,
            OffsetError::AllocationLimit {
                requested: 8,
                available: 4
            }
        );
        assert_eq!(alloc.allocations(), 1);
        assert_eq!(alloc.bytes(), 12);
    }
}
