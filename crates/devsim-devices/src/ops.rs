//! Per-device operation sets.
//!
//! A device's behaviour is a [`DeviceOps`] implementation chosen once at creation. Every method
//! has a default that operates on the device's [`RegionStore`], so an override only implements
//! what differs (e.g. a sensor whose `read` synthesizes values).

use core::fmt;

use devsim_mem::RegionStore;

use crate::error::{DeviceError, DeviceResult};

/// The `{read, write, ioctl}` capability bound to a device.
pub trait DeviceOps: Send {
    fn read(&mut self, regions: &RegionStore, addr: u32, dst: &mut [u8]) -> DeviceResult<()> {
        default_read(regions, addr, dst)
    }

    fn write(&mut self, regions: &mut RegionStore, addr: u32, src: &[u8]) -> DeviceResult<()> {
        default_write(regions, addr, src)
    }

    /// Device-defined control command. No bounds checking applies.
    fn ioctl(&mut self, regions: &mut RegionStore, cmd: u32, arg: u64) -> DeviceResult<()> {
        default_ioctl(regions, cmd, arg)
    }
}

/// Plain memory-backed behaviour: reads and writes copy region bytes, ioctl does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultOps;

impl DeviceOps for DefaultOps {}

pub fn default_read(regions: &RegionStore, addr: u32, dst: &mut [u8]) -> DeviceResult<()> {
    let access = regions
        .checked_access(addr, dst.len())
        .ok_or_else(|| out_of_range(addr, dst.len()))?;
    dst.copy_from_slice(regions.read_bytes(&access));
    Ok(())
}

pub fn default_write(regions: &mut RegionStore, addr: u32, src: &[u8]) -> DeviceResult<()> {
    let access = regions
        .checked_access(addr, src.len())
        .ok_or_else(|| out_of_range(addr, src.len()))?;
    regions
        .write_bytes(&access, src)
        .ok_or_else(|| out_of_range(addr, src.len()))
}

pub fn default_ioctl(_regions: &mut RegionStore, _cmd: u32, _arg: u64) -> DeviceResult<()> {
    Ok(())
}

pub(crate) fn out_of_range(addr: u32, len: usize) -> DeviceError {
    tracing::trace!(addr = format_args!("{addr:#x}"), len, "access outside device regions");
    DeviceError::OutOfRange { addr, len }
}

type ReadFn = dyn FnMut(&RegionStore, u32, &mut [u8]) -> DeviceResult<()> + Send;
type WriteFn = dyn FnMut(&mut RegionStore, u32, &[u8]) -> DeviceResult<()> + Send;
type IoctlFn = dyn FnMut(&mut RegionStore, u32, u64) -> DeviceResult<()> + Send;

/// Operation set assembled from individual closures.
///
/// Any operation left unset falls back to the default implementation.
///
/// ```
/// use devsim_devices::OpsOverride;
///
/// let ops = OpsOverride::new().ioctl(|_regions, cmd, _arg| {
///     assert_eq!(cmd, 1);
///     Ok(())
/// });
/// # let _ = ops;
/// ```
#[derive(Default)]
pub struct OpsOverride {
    read: Option<Box<ReadFn>>,
    write: Option<Box<WriteFn>>,
    ioctl: Option<Box<IoctlFn>>,
}

impl OpsOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<F>(mut self, f: F) -> Self
    where
        F: FnMut(&RegionStore, u32, &mut [u8]) -> DeviceResult<()> + Send + 'static,
    {
        self.read = Some(Box::new(f));
        self
    }

    pub fn write<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut RegionStore, u32, &[u8]) -> DeviceResult<()> + Send + 'static,
    {
        self.write = Some(Box::new(f));
        self
    }

    pub fn ioctl<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut RegionStore, u32, u64) -> DeviceResult<()> + Send + 'static,
    {
        self.ioctl = Some(Box::new(f));
        self
    }
}

impl DeviceOps for OpsOverride {
    fn read(&mut self, regions: &RegionStore, addr: u32, dst: &mut [u8]) -> DeviceResult<()> {
        match self.read.as_mut() {
            Some(f) => f(regions, addr, dst),
            None => default_read(regions, addr, dst),
        }
    }

    fn write(&mut self, regions: &mut RegionStore, addr: u32, src: &[u8]) -> DeviceResult<()> {
        match self.write.as_mut() {
            Some(f) => f(regions, addr, src),
            None => default_write(regions, addr, src),
        }
    }

    fn ioctl(&mut self, regions: &mut RegionStore, cmd: u32, arg: u64) -> DeviceResult<()> {
        match self.ioctl.as_mut() {
            Some(f) => f(regions, cmd, arg),
            None => default_ioctl(regions, cmd, arg),
        }
    }
}

impl fmt::Debug for OpsOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpsOverride")
            .field("read", &self.read.is_some())
            .field("write", &self.write.is_some())
            .field("ioctl", &self.ioctl.is_some())
            .finish()
    }
}
