use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use rammon_core::{ByteChannel, MonitorError};

/// How long to sleep between polls while waiting on the socket.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Debug channel over a TCP connection.
///
/// The stream is kept non-blocking so [`poll_byte`](ByteChannel::poll_byte)
/// can interleave with bus servicing; the blocking-with-timeout receive
/// needed for command arguments is built on top of it. A peer that
/// vanishes, whether it shut down cleanly or died mid-session, surfaces
/// as [`MonitorError::ChannelClosed`] so the monitor outlives the
/// connection.
pub struct TcpChannel {
    stream: TcpStream,
}

impl TcpChannel {
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nodelay(true)?;
        stream.set_nonblocking(true)?;
        Ok(TcpChannel { stream })
    }
}

/// Error kinds that mean the peer is gone, not that the transport broke.
fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}

impl ByteChannel for TcpChannel {
    fn poll_byte(&mut self) -> Result<Option<u8>, MonitorError> {
        let mut buf = [0u8; 1];
        match self.stream.read(&mut buf) {
            Ok(0) => Err(MonitorError::ChannelClosed),
            Ok(_) => Ok(Some(buf[0])),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(err) if is_disconnect(&err) => Err(MonitorError::ChannelClosed),
            Err(err) => Err(MonitorError::Io(err)),
        }
    }

    fn recv_byte(&mut self, timeout: Duration) -> Result<u8, MonitorError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(byte) = self.poll_byte()? {
                return Ok(byte);
            }
            if Instant::now() >= deadline {
                return Err(MonitorError::ChannelTimeout);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), MonitorError> {
        let mut rest = bytes;
        while !rest.is_empty() {
            match self.stream.write(rest) {
                Ok(0) => return Err(MonitorError::ChannelClosed),
                Ok(n) => rest = &rest[n..],
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) if is_disconnect(&err) => return Err(MonitorError::ChannelClosed),
                Err(err) => return Err(MonitorError::Io(err)),
            }
        }
        Ok(())
    }
}
