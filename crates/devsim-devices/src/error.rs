use thiserror::Error;

use crate::device_type::DeviceType;

pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors returned by the registry and by device operations.
///
/// Every failure is terminal for the call that produced it; nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Missing or empty input (e.g. no region descriptors, zero-length region).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("device type {0} is out of range")]
    InvalidType(u32),

    #[error("{device_type} device {id} already exists")]
    AlreadyExists { device_type: DeviceType, id: u32 },

    /// A region buffer could not be obtained. Buffers for earlier regions of the same device
    /// were released before this was returned.
    #[error("failed to allocate region {region} ({len} bytes)")]
    AllocationFailure { region: usize, len: u32 },

    #[error("{device_type} device {id} is not registered")]
    NotFound { device_type: DeviceType, id: u32 },

    /// The address/length pair does not fit inside any single region of the device.
    #[error("access out of range: addr=0x{addr:08x} len={len}")]
    OutOfRange { addr: u32, len: usize },
}

impl From<devsim_mem::DescriptorError> for DeviceError {
    fn from(err: devsim_mem::DescriptorError) -> Self {
        DeviceError::InvalidArgument(err.to_string())
    }
}

impl From<devsim_mem::RegionAllocError> for DeviceError {
    fn from(err: devsim_mem::RegionAllocError) -> Self {
        DeviceError::AllocationFailure {
            region: err.index,
            len: err.len,
        }
    }
}
