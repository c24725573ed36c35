//! Device registry and operation dispatch for the device simulator.
//!
//! [`DeviceRegistry`] owns every simulated [`Device`], keyed by `(DeviceType, id)`. Each device
//! owns a [`devsim_mem::RegionStore`] and a [`DeviceOps`] implementation chosen at creation time:
//! [`DefaultOps`] copies bytes in and out of the regions, while overrides such as
//! [`CounterSensorOps`] or a closure-based [`OpsOverride`] replace individual operations.

#![forbid(unsafe_code)]

pub mod config;
mod device;
mod device_type;
mod error;
pub mod ops;
mod registry;
pub mod sensor;

pub use config::{ConfigError, OverlapPolicy, RegistryConfig};
pub use device::{Device, DeviceKey};
pub use device_type::DeviceType;
pub use error::{DeviceError, DeviceResult};
pub use ops::{DefaultOps, DeviceOps, OpsOverride};
pub use registry::DeviceRegistry;
pub use sensor::{CounterSensorOps, SENSOR_CMD_RESET, SENSOR_CMD_SET};

pub use devsim_mem::RegionDescriptor;

#[cfg(test)]
mod tests;
