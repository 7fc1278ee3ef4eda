use crate::error::MonitorError;
use crate::{OPEN_BUS_BYTE, TOTAL_ADDRESS_SPACE};

/// Emulated RAM backing the CPU's address space.
///
/// Only the first `size` addresses exist; the rest of the 16-bit space is
/// open bus. Contents are zero-filled at power-on and mutated only by bus
/// write transactions and host-driven loads.
pub struct MemoryStore {
    bytes: Box<[u8]>,
}

impl MemoryStore {
    /// Returns a zero-filled store covering addresses `[0, size)`.
    /// Panics if `size` is zero or exceeds the 16-bit address space.
    pub fn new(size: usize) -> Self {
        assert!(size > 0 && size <= TOTAL_ADDRESS_SPACE);
        Self {
            bytes: vec![0u8; size].into_boxed_slice(),
        }
    }

    /// Number of emulated bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Whether `addr` falls inside emulated memory.
    #[inline]
    pub fn in_range(&self, addr: u16) -> bool {
        (addr as usize) < self.bytes.len()
    }

    /// Reads the byte at `addr`, or `InvalidAddress` beyond the emulated
    /// range. Bus-side callers fold the error to [`OPEN_BUS_BYTE`].
    pub fn read(&self, addr: u16) -> Result<u8, MonitorError> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(MonitorError::InvalidAddress(addr))
    }

    /// Stores `value` at `addr`, or `InvalidAddress` (storage untouched)
    /// beyond the emulated range.
    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), MonitorError> {
        match self.bytes.get_mut(addr as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MonitorError::InvalidAddress(addr)),
        }
    }

    /// Stores `data` sequentially starting at `base`, with 16-bit address
    /// wraparound past 0xFFFF.
    ///
    /// Stops *before* the first out-of-range address and reports the
    /// payload offset it could not write; earlier bytes stay written.
    /// An empty payload succeeds without touching anything.
    pub fn load(&mut self, base: u16, data: &[u8]) -> Result<(), MonitorError> {
        for (offset, &byte) in data.iter().enumerate() {
            let addr = base.wrapping_add(offset as u16);
            if self.write(addr, byte).is_err() {
                return Err(MonitorError::PartialLoad {
                    offset: offset as u16,
                });
            }
        }
        Ok(())
    }

    /// Copies an image into the bottom of memory, truncating at the
    /// emulated size. Returns how many bytes landed.
    pub fn preload(&mut self, image: &[u8]) -> usize {
        let len = image.len().min(self.bytes.len());
        self.bytes[..len].copy_from_slice(&image[..len]);
        len
    }
}
