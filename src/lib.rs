//! Host-side simulator for memory-mapped devices.
//!
//! This crate re-exports the region store ([`mem`]) and the device registry ([`devices`]) so
//! callers can depend on a single crate.

#![forbid(unsafe_code)]

pub use devsim_devices as devices;
pub use devsim_mem as mem;

pub use devsim_devices::{
    CounterSensorOps, DefaultOps, Device, DeviceError, DeviceKey, DeviceOps, DeviceRegistry,
    DeviceResult, DeviceType, OpsOverride, OverlapPolicy, RegionDescriptor, RegistryConfig,
};
