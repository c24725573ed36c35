use crate::{DeviceRegistry, DeviceType, RegionDescriptor};

mod registry;


pub(super) const SCENARIO_REGIONS: [RegionDescriptor; 2] = [
    RegionDescriptor::new(0x1000, 1024),
    RegionDescriptor::new(0x2000, 512),
];

pub(super) fn registry_with_memory_device() -> DeviceRegistry {
    let mut registry = DeviceRegistry::new();
    registry
        .create(DeviceType::Memory, 1, &SCENARIO_REGIONS, None)
        .unwrap();
    registry
}
