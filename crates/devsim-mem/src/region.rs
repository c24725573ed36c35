use thiserror::Error;

/// Exclusive upper bound of the 32-bit device address space.
const ADDRESS_SPACE_END: u64 = 1 << 32;

/// A caller-supplied `(base, len)` pair describing one region of a device.
///
/// Descriptors are not validated against any platform memory map; each device has its own
/// region set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    pub base: u32,
    pub len: u32,
}

impl RegionDescriptor {
    pub const fn new(base: u32, len: u32) -> Self {
        Self { base, len }
    }

    /// Exclusive end address. Widened so a region may end exactly at 4GiB.
    #[inline]
    pub fn end(&self) -> u64 {
        u64::from(self.base) + u64::from(self.len)
    }

    /// Whether `addr` lies in the half-open range `[base, base + len)`.
    #[inline]
    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.base && u64::from(addr) < self.end()
    }

    #[inline]
    pub fn overlaps(&self, other: &RegionDescriptor) -> bool {
        u64::from(self.base) < other.end() && u64::from(other.base) < self.end()
    }
}

impl From<(u32, u32)> for RegionDescriptor {
    fn from((base, len): (u32, u32)) -> Self {
        Self::new(base, len)
    }
}

/// Reasons a descriptor list is refused before any buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("no regions supplied")]
    Empty,

    #[error("region {index} has zero length (base=0x{base:x})")]
    ZeroLength { index: usize, base: u32 },

    #[error("region {index} runs past the 32-bit address space: base=0x{base:x} len=0x{len:x}")]
    EndOverflow { index: usize, base: u32, len: u32 },

    #[error("regions {first} and {second} overlap")]
    Overlap { first: usize, second: usize },
}

/// Checks a descriptor list for a new device.
///
/// Overlapping descriptors are only reported when `reject_overlaps` is set; otherwise they are
/// accepted and address resolution picks the first matching region in list order.
pub fn validate_descriptors(
    descriptors: &[RegionDescriptor],
    reject_overlaps: bool,
) -> Result<(), DescriptorError> {
    if descriptors.is_empty() {
        return Err(DescriptorError::Empty);
    }

    for (index, desc) in descriptors.iter().enumerate() {
        if desc.len == 0 {
            return Err(DescriptorError::ZeroLength {
                index,
                base: desc.base,
            });
        }
        if desc.end() > ADDRESS_SPACE_END {
            return Err(DescriptorError::EndOverflow {
                index,
                base: desc.base,
                len: desc.len,
            });
        }
    }

    if reject_overlaps {
        for (first, a) in descriptors.iter().enumerate() {
            for (offset, b) in descriptors[first + 1..].iter().enumerate() {
                if a.overlaps(b) {
                    return Err(DescriptorError::Overlap {
                        first,
                        second: first + 1 + offset,
                    });
                }
            }
        }
    }

    Ok(())
}

/// One addressable byte range owned by a device.
///
/// `data.len()` always equals the descriptor length.
#[derive(Debug)]
pub struct Region {
    desc: RegionDescriptor,
    data: Vec<u8>,
}

impl Region {
    pub(crate) fn new(desc: RegionDescriptor, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len() as u64, u64::from(desc.len));
        Self { desc, data }
    }

    pub fn base(&self) -> u32 {
        self.desc.base
    }

    pub fn len(&self) -> u32 {
        self.desc.len
    }

    pub fn is_empty(&self) -> bool {
        self.desc.len == 0
    }

    pub fn end(&self) -> u64 {
        self.desc.end()
    }

    pub fn descriptor(&self) -> RegionDescriptor {
        self.desc
    }

    pub fn contains(&self, addr: u32) -> bool {
        self.desc.contains(addr)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub(crate) fn into_storage(self) -> Vec<u8> {
        self.data
    }
}
