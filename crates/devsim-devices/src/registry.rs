use std::collections::BTreeMap;
use std::sync::Arc;

use devsim_mem::{
    validate_descriptors, HeapAllocator, RegionAllocator, RegionDescriptor, RegionStore,
};

use crate::config::{OverlapPolicy, RegistryConfig};
use crate::device::{Device, DeviceKey};
use crate::device_type::DeviceType;
use crate::error::{DeviceError, DeviceResult};
use crate::ops::{DefaultOps, DeviceOps};

/// Owning collection of every simulated device, keyed by `(type, id)`.
///
/// Devices are ordered by type and then id, so per-type iteration is a range scan. The registry
/// is the sole owner of its devices; dropping it tears all of them down.
pub struct DeviceRegistry {
    devices: BTreeMap<DeviceKey, Device>,
    allocator: Arc<dyn RegionAllocator>,
    config: RegistryConfig,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_allocator(config, Arc::new(HeapAllocator))
    }

    /// Uses `allocator` for every region buffer of every device created through this registry.
    pub fn with_allocator(config: RegistryConfig, allocator: Arc<dyn RegionAllocator>) -> Self {
        Self {
            devices: BTreeMap::new(),
            allocator,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Creates and registers a device.
    ///
    /// One zero-filled buffer is allocated per descriptor, in order. `ops` replaces the default
    /// operation set for this device; it is resolved here and never re-selected per call.
    ///
    /// # Errors
    /// - [`DeviceError::InvalidArgument`] for an empty descriptor list, a zero-length region, a
    ///   region running past 4GiB, or overlapping regions under [`OverlapPolicy::Reject`].
    /// - [`DeviceError::AlreadyExists`] if `(device_type, id)` is already registered.
    /// - [`DeviceError::AllocationFailure`] if a region buffer cannot be obtained. Buffers
    ///   allocated for earlier regions are released and the registry is left unchanged.
    pub fn create(
        &mut self,
        device_type: DeviceType,
        id: u32,
        regions: &[RegionDescriptor],
        ops: Option<Box<dyn DeviceOps>>,
    ) -> DeviceResult<&mut Device> {
        let key = DeviceKey::new(device_type, id);

        let reject_overlaps = self.config.overlap_policy == OverlapPolicy::Reject;
        if let Err(err) = validate_descriptors(regions, reject_overlaps) {
            tracing::warn!(device = %key, %err, "rejected region descriptors");
            return Err(err.into());
        }

        if self.devices.contains_key(&key) {
            tracing::warn!(device = %key, "device already exists");
            return Err(DeviceError::AlreadyExists { device_type, id });
        }

        let store = RegionStore::allocate(regions, Arc::clone(&self.allocator)).map_err(|err| {
            tracing::warn!(device = %key, %err, "device creation unwound");
            DeviceError::from(err)
        })?;

        let ops = ops.unwrap_or_else(|| Box::new(DefaultOps));
        tracing::debug!(
            device = %key,
            regions = store.len(),
            bytes = store.total_bytes(),
            "device created"
        );

        Ok(self
            .devices
            .entry(key)
            .or_insert(Device::new(key, store, ops)))
    }

    /// [`DeviceRegistry::create`] for callers holding an untyped device type number.
    pub fn create_raw(
        &mut self,
        raw_type: u32,
        id: u32,
        regions: &[RegionDescriptor],
        ops: Option<Box<dyn DeviceOps>>,
    ) -> DeviceResult<&mut Device> {
        let device_type = DeviceType::try_from(raw_type)?;
        self.create(device_type, id, regions, ops)
    }

    /// Looks up a device. Never matches a device of another type with the same id.
    pub fn find(&self, device_type: DeviceType, id: u32) -> Option<&Device> {
        self.devices.get(&DeviceKey::new(device_type, id))
    }

    pub fn find_mut(&mut self, device_type: DeviceType, id: u32) -> Option<&mut Device> {
        self.devices.get_mut(&DeviceKey::new(device_type, id))
    }

    pub fn contains(&self, device_type: DeviceType, id: u32) -> bool {
        self.find(device_type, id).is_some()
    }

    fn get_mut(&mut self, device_type: DeviceType, id: u32) -> DeviceResult<&mut Device> {
        self.find_mut(device_type, id)
            .ok_or(DeviceError::NotFound { device_type, id })
    }

    /// Destroys one device, releasing its regions.
    pub fn remove(&mut self, device_type: DeviceType, id: u32) -> DeviceResult<()> {
        let key = DeviceKey::new(device_type, id);
        match self.devices.remove(&key) {
            Some(device) => {
                drop(device);
                tracing::debug!(device = %key, "device removed");
                Ok(())
            }
            None => Err(DeviceError::NotFound { device_type, id }),
        }
    }

    pub fn read(
        &mut self,
        device_type: DeviceType,
        id: u32,
        addr: u32,
        len: usize,
    ) -> DeviceResult<Vec<u8>> {
        self.get_mut(device_type, id)?.read(addr, len)
    }

    pub fn write(
        &mut self,
        device_type: DeviceType,
        id: u32,
        addr: u32,
        src: &[u8],
    ) -> DeviceResult<()> {
        self.get_mut(device_type, id)?.write(addr, src)
    }

    pub fn ioctl(
        &mut self,
        device_type: DeviceType,
        id: u32,
        cmd: u32,
        arg: u64,
    ) -> DeviceResult<()> {
        self.get_mut(device_type, id)?.ioctl(cmd, arg)
    }

    /// Number of live devices.
    pub fn count(&self) -> u32 {
        self.devices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// All devices of one type, in ascending id order.
    pub fn devices_of_type(&self, device_type: DeviceType) -> impl Iterator<Item = &Device> {
        self.devices
            .range(DeviceKey::new(device_type, 0)..=DeviceKey::new(device_type, u32::MAX))
            .map(|(_, device)| device)
    }

    /// All devices, ordered by type and then id.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Destroys every device. Each device's region buffers are released before the device
    /// itself. Safe to call on an empty registry and more than once.
    pub fn destroy_all(&mut self) {
        if self.devices.is_empty() {
            return;
        }
        let destroyed = self.devices.len();
        for (_, device) in std::mem::take(&mut self.devices) {
            drop(device);
        }
        tracing::debug!(destroyed, "registry torn down");
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeviceRegistry {
    fn drop(&mut self) {
        self.destroy_all();
    }
}
