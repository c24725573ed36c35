use thiserror::Error;

/// A region buffer could not be obtained from the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to allocate a {len} byte region buffer")]
pub struct AllocError {
    pub len: u32,
}

/// Source of region backing buffers.
///
/// Every buffer returned by [`RegionAllocator::allocate`] is passed back to
/// [`RegionAllocator::release`] exactly once, when the owning [`crate::RegionStore`] is dropped
/// (or when a partially built store is unwound).
pub trait RegionAllocator: Send + Sync {
    /// Returns a zero-filled buffer of exactly `len` bytes.
    fn allocate(&self, len: u32) -> Result<Vec<u8>, AllocError>;

    fn release(&self, buf: Vec<u8>) {
        drop(buf);
    }
}

/// Default allocator backed by the global heap.
///
/// Uses fallible reservation so an oversized request surfaces as [`AllocError`] instead of
/// aborting the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl RegionAllocator for HeapAllocator {
    fn allocate(&self, len: u32) -> Result<Vec<u8>, AllocError> {
        let len_usize = usize::try_from(len).map_err(|_| AllocError { len })?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len_usize)
            .map_err(|_| AllocError { len })?;
        buf.resize(len_usize, 0);
        Ok(buf)
    }
}
