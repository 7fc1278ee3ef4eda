use std::collections::VecDeque;
use std::time::Duration;

use crate::error::MonitorError;

/// Byte-stream transport carrying the debug protocol.
///
/// The monitor never blocks on a channel while the CPU is running, so
/// the read side is split in two: [`poll_byte`](ByteChannel::poll_byte)
/// is the non-blocking poll used between bus cycles, and
/// [`recv_byte`](ByteChannel::recv_byte) is the bounded wait used for
/// the argument bytes that follow a command byte.
pub trait ByteChannel {
    /// Returns the next byte if one is already buffered, `Ok(None)` if
    /// the channel is idle.
    fn poll_byte(&mut self) -> Result<Option<u8>, MonitorError>;

    /// Waits up to `timeout` for the next byte.
    ///
    /// Returns [`MonitorError::ChannelTimeout`] if nothing arrives in
    /// time and [`MonitorError::ChannelClosed`] once the peer is gone.
    fn recv_byte(&mut self, timeout: Duration) -> Result<u8, MonitorError>;

    /// Writes `bytes` to the peer.
    fn send(&mut self, bytes: &[u8]) -> Result<(), MonitorError>;
}

/// In-memory channel for tests and scripted sessions: commands are
/// queued up front, responses accumulate in an output buffer.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues raw bytes for the monitor to read.
    pub fn push_command(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    /// Everything the monitor has sent so far.
    pub fn output(&self) -> &[u8] {
        &self.outbound
    }

    /// Drains and returns the accumulated output.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outbound)
    }
}

impl ByteChannel for MemoryChannel {
    fn poll_byte(&mut self) -> Result<Option<u8>, MonitorError> {
        Ok(self.inbound.pop_front())
    }

    fn recv_byte(&mut self, _timeout: Duration) -> Result<u8, MonitorError> {
        // Nothing ever arrives later on an in-memory channel, so an
        // empty queue is an immediate timeout.
        self.inbound.pop_front().ok_or(MonitorError::ChannelTimeout)
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), MonitorError> {
        self.outbound.extend_from_slice(bytes);
        Ok(())
    }
}
