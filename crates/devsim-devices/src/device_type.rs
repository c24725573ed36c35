use core::fmt;

use crate::error::DeviceError;

/// Closed set of simulated device kinds.
///
/// Bus-flavoured kinds (`I2c`, `Spi`) are identifiers only; no wire protocol is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum DeviceType {
    Memory = 0,
    Io = 1,
    Sensor = 2,
    Flash = 3,
    TemperatureSensor = 4,
    I2c = 5,
    Spi = 6,
}

impl DeviceType {
    pub const COUNT: u32 = 7;

    pub const ALL: [DeviceType; Self::COUNT as usize] = [
        DeviceType::Memory,
        DeviceType::Io,
        DeviceType::Sensor,
        DeviceType::Flash,
        DeviceType::TemperatureSensor,
        DeviceType::I2c,
        DeviceType::Spi,
    ];

    pub fn as_raw(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceType::Memory => "memory",
            DeviceType::Io => "io",
            DeviceType::Sensor => "sensor",
            DeviceType::Flash => "flash",
            DeviceType::TemperatureSensor => "temperature-sensor",
            DeviceType::I2c => "i2c",
            DeviceType::Spi => "spi",
        }
    }
}

impl TryFrom<u32> for DeviceType {
    type Error = DeviceError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(DeviceError::InvalidType(raw))
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
