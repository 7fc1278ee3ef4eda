//! Software-simulated CPU bus for rammon.
//!
//! Stands in for the hardware attachment so the monitor can be run and
//! exercised without a board on the bench: a [`ScriptedCpu`] plays a
//! fixed cycle program and a [`SimBus`] adapts it to the monitor's bus
//! interface, including the read-latch and write-accept handshakes.

mod bus;
mod cpu;

pub use bus::{ControlLines, SimBus};
pub use cpu::{demo_program, CpuCycle, ScriptedCpu};
