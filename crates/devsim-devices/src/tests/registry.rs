use super::{registry_with_memory_device, SCENARIO_REGIONS};
use crate::{
    DeviceError, DeviceRegistry, DeviceType, OverlapPolicy, RegionDescriptor, RegistryConfig,
};

#[test]
fn create_registers_device_and_counts_it() {
    let mut registry = DeviceRegistry::new();
    assert!(registry.is_empty());

    let dev = registry
        .create(DeviceType::Memory, 1, &SCENARIO_REGIONS, None)
        .unwrap();
    assert_eq!(dev.device_type(), DeviceType::Memory);
    assert_eq!(dev.id(), 1);
    assert_eq!(dev.region_descriptors(), SCENARIO_REGIONS.to_vec());

    assert_eq!(registry.count(), 1);
    assert!(registry.contains(DeviceType::Memory, 1));
}

#[test]
fn duplicate_type_and_id_is_rejected() {
    let mut registry = registry_with_memory_device();

    let err = registry
        .create(DeviceType::Memory, 1, &SCENARIO_REGIONS, None)
        .unwrap_err();
    assert_eq!(
        err,
        DeviceError::AlreadyExists {
            device_type: DeviceType::Memory,
            id: 1
        }
    );
    assert_eq!(registry.count(), 1);
}

#[test]
fn same_id_under_another_type_is_independent() {
    let mut registry = registry_with_memory_device();

    registry
        .create(DeviceType::Io, 1, &[RegionDescriptor::new(0x1000, 4)], None)
        .unwrap();
    assert_eq!(registry.count(), 2);

    registry.write(DeviceType::Io, 1, 0x1000, &[7, 7]).unwrap();
    assert_eq!(
        registry.read(DeviceType::Memory, 1, 0x1000, 2).unwrap(),
        vec![0, 0]
    );
}

#[test]
fn find_is_scoped_by_type() {
    let registry = registry_with_memory_device();

    assert!(registry.find(DeviceType::Memory, 1).is_some());
    assert!(registry.find(DeviceType::Io, 1).is_none());
    assert!(registry.find(DeviceType::Memory, 2).is_none());
}

#[test]
fn create_raw_rejects_unknown_type() {
    let mut registry = DeviceRegistry::new();

    let err = registry
        .create_raw(DeviceType::COUNT, 1, &SCENARIO_REGIONS, None)
        .unwrap_err();
    assert_eq!(err, DeviceError::InvalidType(DeviceType::COUNT));
    assert!(registry.is_empty());

    let dev = registry
        .create_raw(DeviceType::Spi.as_raw(), 9, &SCENARIO_REGIONS, None)
        .unwrap();
    assert_eq!(dev.device_type(), DeviceType::Spi);
}

#[test]
fn invalid_descriptors_are_rejected() {
    let mut registry = DeviceRegistry::new();

    let err = registry.create(DeviceType::Memory, 1, &[], None).unwrap_err();
    assert!(matches!(err, DeviceError::InvalidArgument(_)));

    let err = registry
        .create(
            DeviceType::Memory,
            1,
            &[RegionDescriptor::new(0x1000, 0)],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, DeviceError::InvalidArgument(_)));

    let err = registry
        .create(
            DeviceType::Memory,
            1,
            &[RegionDescriptor::new(u32::MAX, 2)],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, DeviceError::InvalidArgument(_)));

    assert!(registry.is_empty());
}

#[test]
fn overlap_policy_controls_overlapping_descriptors() {
    let overlapping = [
        RegionDescriptor::new(0x1000, 0x100),
        RegionDescriptor::new(0x1080, 0x100),
    ];

    let mut lenient = DeviceRegistry::new();
    lenient
        .create(DeviceType::Flash, 0, &overlapping, None)
        .unwrap();

    let mut strict = DeviceRegistry::with_config(RegistryConfig {
        overlap_policy: OverlapPolicy::Reject,
    });
    let err = strict
        .create(DeviceType::Flash, 0, &overlapping, None)
        .unwrap_err();
    assert_eq!(
        err,
        DeviceError::InvalidArgument("regions 0 and 1 overlap".to_string())
    );
    assert!(strict.is_empty());
}

#[test]
fn invalid_argument_names_the_offending_descriptor() {
    let mut registry = DeviceRegistry::new();
    let err = registry
        .create(
            DeviceType::Memory,
            0,
            &[RegionDescriptor::new(0x1000, 4), RegionDescriptor::new(0x2000, 0)],
            None,
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid argument: region 1 has zero length (base=0x2000)"
    );
}

#[test]
fn remove_destroys_one_device() {
    let mut registry = registry_with_memory_device();
    registry
        .create(DeviceType::Memory, 2, &SCENARIO_REGIONS, None)
        .unwrap();

    registry.remove(DeviceType::Memory, 1).unwrap();
    assert_eq!(registry.count(), 1);
    assert!(registry.find(DeviceType::Memory, 1).is_none());
    assert!(registry.find(DeviceType::Memory, 2).is_some());

    assert_eq!(
        registry.remove(DeviceType::Memory, 1),
        Err(DeviceError::NotFound {
            device_type: DeviceType::Memory,
            id: 1
        })
    );

    // The key is free again.
    registry
        .create(DeviceType::Memory, 1, &SCENARIO_REGIONS, None)
        .unwrap();
}

#[test]
fn operations_on_unregistered_device_are_not_found() {
    let mut registry = registry_with_memory_device();
    let not_found = DeviceError::NotFound {
        device_type: DeviceType::Sensor,
        id: 1,
    };

    assert_eq!(
        registry.read(DeviceType::Sensor, 1, 0x1000, 4),
        Err(not_found.clone())
    );
    assert_eq!(
        registry.write(DeviceType::Sensor, 1, 0x1000, &[1]),
        Err(not_found.clone())
    );
    assert_eq!(registry.ioctl(DeviceType::Sensor, 1, 0, 0), Err(not_found));
}

#[test]
fn type_iteration_is_ordered_and_isolated() {
    let mut registry = DeviceRegistry::new();
    let regions = [RegionDescriptor::new(0, 4)];
    for id in [5, 1, 3] {
        registry
            .create(DeviceType::Sensor, id, &regions, None)
            .unwrap();
    }
    registry
        .create(DeviceType::Memory, 2, &regions, None)
        .unwrap();
    registry.create(DeviceType::Spi, 0, &regions, None).unwrap();

    let ids: Vec<u32> = registry
        .devices_of_type(DeviceType::Sensor)
        .map(|d| d.id())
        .collect();
    assert_eq!(ids, vec![1, 3, 5]);
    assert_eq!(registry.devices_of_type(DeviceType::I2c).count(), 0);

    let keys: Vec<(DeviceType, u32)> = registry
        .iter()
        .map(|d| (d.device_type(), d.id()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (DeviceType::Memory, 2),
            (DeviceType::Sensor, 1),
            (DeviceType::Sensor, 3),
            (DeviceType::Sensor, 5),
            (DeviceType::Spi, 0),
        ]
    );
}

#[test]
fn destroy_all_empties_registry_and_is_repeatable() {
    let mut registry = registry_with_memory_device();
    registry
        .create(DeviceType::Io, 4, &SCENARIO_REGIONS, None)
        .unwrap();

    registry.destroy_all();
    assert_eq!(registry.count(), 0);
    assert!(registry.find(DeviceType::Memory, 1).is_none());

    registry.destroy_all();
    assert!(registry.is_empty());

    let mut empty = DeviceRegistry::new();
    empty.destroy_all();
    assert!(empty.is_empty());
}
