use crate::error::MonitorError;

/// Bounded set of addresses that halt the CPU when they appear on the
/// address bus.
///
/// The protocol has no remove or clear command, so the table only ever
/// grows; inserts deduplicate so a re-sent breakpoint does not burn a
/// slot. The responder checks it every bus cycle, which keeps the lookup
/// a plain linear scan over a handful of entries.
pub struct BreakpointTable {
    addrs: Vec<u16>,
    capacity: usize,
}

impl BreakpointTable {
    /// Returns an empty table holding at most `capacity` addresses.
    pub fn new(capacity: usize) -> Self {
        Self {
            addrs: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds `addr` to the watched set.
    ///
    /// Re-adding a present address succeeds without consuming capacity.
    /// Fails with `BreakpointsFull` once `capacity` distinct addresses
    /// are held.
    pub fn add(&mut self, addr: u16) -> Result<(), MonitorError> {
        if self.addrs.contains(&addr) {
            return Ok(());
        }
        if self.addrs.len() >= self.capacity {
            return Err(MonitorError::BreakpointsFull);
        }
        self.addrs.push(addr);
        Ok(())
    }

    /// Whether `addr` is watched.
    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        self.addrs.contains(&addr)
    }

    /// Number of distinct watched addresses.
    #[inline]
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.addrs.len() >= self.capacity
    }

    /// The watched addresses, in insertion order.
    pub fn addresses(&self) -> &[u16] {
        &self.addrs
    }
}
