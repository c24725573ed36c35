use devsim_mem::RegionStore;

use crate::error::{DeviceError, DeviceResult};
use crate::ops::{out_of_range, DeviceOps};

/// Resets the sample counter to zero.
pub const SENSOR_CMD_RESET: u32 = 0x01;
/// Loads the sample counter with the ioctl argument. Arguments above `u32::MAX` are rejected.
pub const SENSOR_CMD_SET: u32 = 0x02;

/// Sensor whose reads report a free-running sample counter instead of stored bytes.
///
/// Each read fills the destination with the little-endian counter value (repeated as needed)
/// and then advances the counter. The address must still fall inside one of the device's
/// regions. Writes use the default region-backed behaviour.
#[derive(Debug, Default, Clone)]
pub struct CounterSensorOps {
    counter: u32,
}

impl CounterSensorOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(counter: u32) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }
}

impl DeviceOps for CounterSensorOps {
    fn read(&mut self, regions: &RegionStore, addr: u32, dst: &mut [u8]) -> DeviceResult<()> {
        if regions.checked_access(addr, dst.len()).is_none() {
            return Err(out_of_range(addr, dst.len()));
        }

        let sample = self.counter.to_le_bytes();
        for (i, b) in dst.iter_mut().enumerate() {
            *b = sample[i % sample.len()];
        }
        self.counter = self.counter.wrapping_add(1);
        Ok(())
    }

    fn ioctl(&mut self, _regions: &mut RegionStore, cmd: u32, arg: u64) -> DeviceResult<()> {
        match cmd {
            SENSOR_CMD_RESET => self.counter = 0,
            SENSOR_CMD_SET => {
                self.counter = u32::try_from(arg).map_err(|_| {
                    DeviceError::InvalidArgument(format!(
                        "sensor counter value 0x{arg:x} exceeds 32 bits"
                    ))
                })?;
            }
            _ => {
                return Err(DeviceError::InvalidArgument(format!(
                    "unknown sensor command 0x{cmd:x}"
                )))
            }
        }
        tracing::debug!(cmd, counter = self.counter, "sensor ioctl");
        Ok(())
    }
}
