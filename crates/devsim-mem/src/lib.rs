//! Per-device region storage for the device simulator.
//!
//! A device exposes one or more [`Region`]s, each a zero-initialised byte buffer anchored at a
//! caller-chosen 32-bit base address. [`RegionStore`] owns a device's regions, resolves addresses
//! to the region containing them and is the only place where access lengths are checked against
//! region bounds: every read and write goes through [`RegionStore::checked_access`].
//!
//! Region buffers are obtained from a [`RegionAllocator`] and handed back to it when the store is
//! dropped, so allocation failure is an ordinary error and release is observable.

#![forbid(unsafe_code)]

mod alloc;
mod region;
mod store;

pub use alloc::{AllocError, HeapAllocator, RegionAllocator};
pub use region::{validate_descriptors, DescriptorError, Region, RegionDescriptor};
pub use store::{RegionAccess, RegionAllocError, RegionStore};

#[cfg(test)]
mod tests;
