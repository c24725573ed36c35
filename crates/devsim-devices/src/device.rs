use core::fmt;

use devsim_mem::{RegionDescriptor, RegionStore};

use crate::device_type::DeviceType;
use crate::error::DeviceResult;
use crate::ops::{out_of_range, DeviceOps};

/// Registry key: id uniqueness is scoped per device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceKey {
    pub device_type: DeviceType,
    pub id: u32,
}

impl DeviceKey {
    pub const fn new(device_type: DeviceType, id: u32) -> Self {
        Self { device_type, id }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device_type, self.id)
    }
}

/// A simulated device: its regions plus the operation set chosen when it was created.
///
/// Devices are owned by a [`crate::DeviceRegistry`] and only reachable through it.
pub struct Device {
    key: DeviceKey,
    regions: RegionStore,
    ops: Box<dyn DeviceOps>,
}

impl Device {
    pub(crate) fn new(key: DeviceKey, regions: RegionStore, ops: Box<dyn DeviceOps>) -> Self {
        Self { key, regions, ops }
    }

    pub fn key(&self) -> DeviceKey {
        self.key
    }

    pub fn device_type(&self) -> DeviceType {
        self.key.device_type
    }

    pub fn id(&self) -> u32 {
        self.key.id
    }

    pub fn regions(&self) -> &RegionStore {
        &self.regions
    }

    pub fn region_descriptors(&self) -> Vec<RegionDescriptor> {
        self.regions.descriptors().collect()
    }

    /// Reads `dst.len()` bytes starting at `addr` through the installed operation set.
    pub fn read_into(&mut self, addr: u32, dst: &mut [u8]) -> DeviceResult<()> {
        self.ops.read(&self.regions, addr, dst)
    }

    /// Reads `len` bytes starting at `addr`.
    ///
    /// A length longer than the device's largest region can never fit and is refused before
    /// the output buffer is allocated.
    pub fn read(&mut self, addr: u32, len: usize) -> DeviceResult<Vec<u8>> {
        let longest = self.regions.iter().map(|r| r.len()).max().unwrap_or(0);
        if len > longest as usize {
            return Err(out_of_range(addr, len));
        }
        let mut buf = vec![0u8; len];
        self.read_into(addr, &mut buf)?;
        Ok(buf)
    }

    pub fn write(&mut self, addr: u32, src: &[u8]) -> DeviceResult<()> {
        self.ops.write(&mut self.regions, addr, src)
    }

    pub fn ioctl(&mut self, cmd: u32, arg: u64) -> DeviceResult<()> {
        self.ops.ioctl(&mut self.regions, cmd, arg)
    }

    pub fn read_u8(&mut self, addr: u32) -> DeviceResult<u8> {
        let mut buf = [0u8; 1];
        self.read_into(addr, &mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self, addr: u32) -> DeviceResult<u16> {
        let mut buf = [0u8; 2];
        self.read_into(addr, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self, addr: u32) -> DeviceResult<u32> {
        let mut buf = [0u8; 4];
        self.read_into(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn write_u8(&mut self, addr: u32, value: u8) -> DeviceResult<()> {
        self.write(addr, &[value])
    }

    pub fn write_u16(&mut self, addr: u32, value: u16) -> DeviceResult<()> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> DeviceResult<()> {
        self.write(addr, &value.to_le_bytes())
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("type", &self.key.device_type)
            .field("id", &self.key.id)
            .field("regions", &self.regions)
            .finish_non_exhaustive()
    }
}
