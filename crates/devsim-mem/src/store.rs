use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::alloc::RegionAllocator;
use crate::region::{Region, RegionDescriptor};

/// Allocation of one region failed while building a [`RegionStore`].
///
/// Buffers allocated for earlier regions have already been released when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("region {index} ({len} bytes) could not be allocated")]
pub struct RegionAllocError {
    pub index: usize,
    pub len: u32,
}

/// A bounds-checked access produced by [`RegionStore::checked_access`].
///
/// Only the store can construct one, so holding a `RegionAccess` means the range
/// `[offset, offset + len)` lies inside region `region`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionAccess {
    region: usize,
    offset: usize,
    len: usize,
}

impl RegionAccess {
    /// Index of the matched region in creation order.
    pub fn region(&self) -> usize {
        self.region
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The set of regions owned by one device.
///
/// Regions need not be contiguous or address-ordered. If descriptors overlap, the first region
/// in creation order that contains an address wins; keeping descriptors disjoint is the caller's
/// responsibility unless it was validated up front.
pub struct RegionStore {
    regions: Vec<Region>,
    allocator: Arc<dyn RegionAllocator>,
}

impl RegionStore {
    /// Allocates one zero-filled buffer per descriptor, in order.
    ///
    /// If any allocation fails, every buffer obtained so far is handed back to `allocator` before
    /// the error is returned.
    pub fn allocate(
        descriptors: &[RegionDescriptor],
        allocator: Arc<dyn RegionAllocator>,
    ) -> Result<Self, RegionAllocError> {
        let mut store = Self {
            regions: Vec::with_capacity(descriptors.len()),
            allocator,
        };

        for (index, desc) in descriptors.iter().enumerate() {
            match store.allocator.allocate(desc.len) {
                Ok(data) => store.regions.push(Region::new(*desc, data)),
                Err(err) => {
                    tracing::warn!(
                        index,
                        len = err.len,
                        released = store.regions.len(),
                        "region allocation failed; unwinding"
                    );
                    // Dropping `store` releases the regions allocated so far.
                    return Err(RegionAllocError {
                        index,
                        len: desc.len,
                    });
                }
            }
        }

        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = RegionDescriptor> + '_ {
        self.regions.iter().map(Region::descriptor)
    }

    /// Total number of backing bytes held by this store.
    pub fn total_bytes(&self) -> u64 {
        self.regions.iter().map(|r| u64::from(r.len())).sum()
    }

    fn position(&self, addr: u32) -> Option<usize> {
        self.regions.iter().position(|r| r.contains(addr))
    }

    /// Returns the first region (in creation order) whose range contains `addr`.
    pub fn resolve(&self, addr: u32) -> Option<&Region> {
        self.position(addr).map(|idx| &self.regions[idx])
    }

    pub fn resolve_mut(&mut self, addr: u32) -> Option<&mut Region> {
        let idx = self.position(addr)?;
        Some(&mut self.regions[idx])
    }

    /// Resolves `addr` and checks that `len` bytes starting there fit inside the matched region.
    ///
    /// `offset + len` is computed in `u64`, so huge lengths cannot wrap into a false positive.
    pub fn checked_access(&self, addr: u32, len: usize) -> Option<RegionAccess> {
        let region = self.position(addr)?;
        let r = &self.regions[region];
        let offset = addr - r.base();
        let end = u64::from(offset).checked_add(u64::try_from(len).ok()?)?;
        if end > u64::from(r.len()) {
            return None;
        }
        Some(RegionAccess {
            region,
            offset: offset as usize,
            len,
        })
    }

    /// Bytes covered by a previously checked access.
    ///
    /// # Panics
    /// Panics if `access` was produced by a different store.
    pub fn read_bytes(&self, access: &RegionAccess) -> &[u8] {
        &self.regions[access.region].as_slice()[access.offset..access.offset + access.len]
    }

    /// Copies `src` into the range covered by a previously checked access.
    ///
    /// Returns `None` without writing anything if `src.len()` differs from `access.len()`.
    ///
    /// # Panics
    /// Panics if `access` was produced by a different store.
    pub fn write_bytes(&mut self, access: &RegionAccess, src: &[u8]) -> Option<()> {
        if src.len() != access.len {
            return None;
        }
        self.regions[access.region].data_mut()[access.offset..access.offset + access.len]
            .copy_from_slice(src);
        Some(())
    }

    /// Checked copy out of the store. Returns `None` if the range does not fit one region.
    pub fn read_into(&self, addr: u32, dst: &mut [u8]) -> Option<()> {
        let access = self.checked_access(addr, dst.len())?;
        dst.copy_from_slice(self.read_bytes(&access));
        Some(())
    }

    /// Checked copy into the store. Returns `None` if the range does not fit one region.
    pub fn write_from(&mut self, addr: u32, src: &[u8]) -> Option<()> {
        let access = self.checked_access(addr, src.len())?;
        self.write_bytes(&access, src)
    }
}

impl fmt::Debug for RegionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionStore")
            .field("regions", &self.descriptors().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Drop for RegionStore {
    fn drop(&mut self) {
        for region in self.regions.drain(..) {
            self.allocator.release(region.into_storage());
        }
    }
}
