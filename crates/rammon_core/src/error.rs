use std::fmt;
use std::io;

/// Failure modes of the monitor.
///
/// None of these are fatal: the session reports a failure once and goes
/// back to waiting for the next command. Unknown or unsupported command
/// bytes are answered with protocol text directly and never surface here.
#[derive(Debug)]
pub enum MonitorError {
    /// Address at or beyond the configured memory size.
    InvalidAddress(u16),
    /// Breakpoint table already holds its configured maximum.
    BreakpointsFull,
    /// Bulk load stopped before writing the payload byte at this offset.
    /// Bytes before the offset were written and stay written.
    PartialLoad { offset: u16 },
    /// Single-step gave up waiting for a SYNC rise/fall pair after this
    /// many clocked bus cycles.
    StepTimeout { cycles: u32 },
    /// The command channel's peer went away.
    ChannelClosed,
    /// No byte arrived on the command channel within the timeout.
    ChannelTimeout,
    /// Transport-level I/O failure.
    Io(io::Error),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MonitorError::InvalidAddress(addr) => {
                write!(f, "address 0x{addr:04X} is outside emulated memory")
            }
            MonitorError::BreakpointsFull => {
                write!(f, "breakpoint table is full")
            }
            MonitorError::PartialLoad { offset } => {
                write!(f, "bulk load aborted at payload offset {offset}")
            }
            MonitorError::StepTimeout { cycles } => {
                write!(f, "no SYNC edge pair within {cycles} bus cycles")
            }
            MonitorError::ChannelClosed => {
                write!(f, "command channel closed by peer")
            }
            MonitorError::ChannelTimeout => {
                write!(f, "timed out waiting for a command channel byte")
            }
            MonitorError::Io(err) => write!(f, "channel I/O error: {err}"),
        }
    }
}

impl std::error::Error for MonitorError {}

impl From<io::Error> for MonitorError {
    fn from(err: io::Error) -> Self {
        MonitorError::Io(err)
    }
}
