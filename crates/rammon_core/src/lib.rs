//! Core of the rammon bus monitor.
//!
//! This crate holds everything that is independent of how the bus and
//! the debug channel are physically attached: the emulated memory, the
//! breakpoint table, the cycle responder, the single-step state machine
//! and the command dispatcher. Platform backends plug in through the
//! [`CpuBus`], [`ByteChannel`] and [`DelaySource`] traits.

mod breakpoint;
mod bus;
mod channel;
pub mod command;
mod config;
mod delay;
mod error;
mod memory;
mod monitor;
mod responder;
mod session;
mod step;

pub use breakpoint::BreakpointTable;
pub use bus::{BusSample, CpuBus};
pub use channel::{ByteChannel, MemoryChannel};
pub use config::MonitorConfig;
pub use delay::{DelaySource, SpinDelay};
pub use error::MonitorError;
pub use memory::MemoryStore;
pub use monitor::{Monitor, RunState};
pub use responder::CycleOutcome;
pub use session::{Activity, MonitorSession};
pub use step::StepOutcome;

/// Default bytes of emulated memory, matching the target board.
pub const DEFAULT_MEMORY_SIZE: usize = 4096;
/// Default number of breakpoint slots.
pub const DEFAULT_BREAKPOINT_CAPACITY: usize = 10;
/// Byte seen by reads outside emulated memory, mimicking pulled-up
/// open-bus lines.
pub const OPEN_BUS_BYTE: u8 = 0xFF;
/// Size of the CPU's 16-bit address space.
pub const TOTAL_ADDRESS_SPACE: usize = 0x1_0000;
