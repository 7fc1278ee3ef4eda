//! Debug-protocol command bytes and response text.
//!
//! The protocol is a raw byte stream: a single ASCII command byte,
//! followed by fixed-length binary arguments where the command takes
//! any. Multi-byte values travel big endian. Responses are human
//! readable ASCII lines so the monitor can be driven from a plain
//! terminal as well as from a host-side tool.

use std::time::Duration;

use byteorder::{BigEndian, ByteOrder};

use crate::channel::ByteChannel;
use crate::error::MonitorError;

/// `R`: pulse reset and let the CPU run.
pub const CMD_RESET: u8 = b'R';
/// `H`: stop answering bus cycles.
pub const CMD_HALT: u8 = b'H';
/// `C`: continue after a halt.
pub const CMD_CONTINUE: u8 = b'C';
/// `S`: step one instruction (SYNC rise then fall).
pub const CMD_STEP: u8 = b'S';
/// `W`: write one byte: `W addr_hi addr_lo value`.
pub const CMD_WRITE: u8 = b'W';
/// `M`: read one byte: `M addr_hi addr_lo`.
pub const CMD_READ: u8 = b'M';
/// `L`: bulk load: `L addr_hi addr_lo size_hi size_lo payload...`.
pub const CMD_LOAD: u8 = b'L';
/// `B`: set a breakpoint: `B addr_hi addr_lo`.
pub const CMD_BREAKPOINT: u8 = b'B';
/// `G`: read CPU registers (unsupported on this hardware).
pub const CMD_REGISTERS: u8 = b'G';

pub(crate) const MSG_RESET: &str = "CPU reset.\n";
pub(crate) const MSG_HALTED: &str = "CPU halted.\n";
pub(crate) const MSG_CONTINUED: &str = "CPU continued.\n";
pub(crate) const MSG_STEPPED: &str = "CPU stepped one instruction.\n";
pub(crate) const MSG_STEP_TIMEOUT: &str = "Error: Step timed out waiting for SYNC.\n";
pub(crate) const MSG_INVALID_ADDRESS: &str = "Error: Invalid address.\n";
pub(crate) const MSG_LOADED: &str = "Data loaded successfully.\n";
pub(crate) const MSG_LOAD_INVALID: &str = "Error: Invalid address during load.\n";
pub(crate) const MSG_BREAKPOINTS_FULL: &str = "Error: Maximum number of breakpoints reached.\n";
pub(crate) const MSG_NO_REGISTERS: &str = "Error: Register reading not supported.\n";
pub(crate) const MSG_UNKNOWN: &str = "Error: Unknown command.\n";

/// Receives one big-endian u16 argument, byte by byte.
pub(crate) fn recv_u16(
    chan: &mut impl ByteChannel,
    timeout: Duration,
) -> Result<u16, MonitorError> {
    let mut raw = [0u8; 2];
    raw[0] = chan.recv_byte(timeout)?;
    raw[1] = chan.recv_byte(timeout)?;
    Ok(BigEndian::read_u16(&raw))
}
