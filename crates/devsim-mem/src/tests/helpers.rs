use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{AllocError, HeapAllocator, RegionAllocator, RegionDescriptor, RegionStore};

/// Heap allocator that tracks live buffers and can be told to fail on the n-th request.
#[derive(Default)]
pub(super) struct CountingAllocator {
    pub live: AtomicUsize,
    pub calls: AtomicUsize,
    pub fail_on_call: Option<usize>,
}

impl CountingAllocator {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl RegionAllocator for CountingAllocator {
    fn allocate(&self, len: u32) -> Result<Vec<u8>, AllocError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(call) {
            return Err(AllocError { len });
        }
        let buf = HeapAllocator.allocate(len)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(buf)
    }

    fn release(&self, buf: Vec<u8>) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        drop(buf);
    }
}

pub(super) fn new_store(descs: &[(u32, u32)]) -> RegionStore {
    let descs: Vec<RegionDescriptor> = descs.iter().copied().map(Into::into).collect();
    RegionStore::allocate(&descs, Arc::new(HeapAllocator)).unwrap()
}
